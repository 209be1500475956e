use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::utils::logging::{log_cache_hit, log_cache_invalidated};

/// Coleção cacheada
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entidade {
    Clientes,
    Tarefas,
}

impl Entidade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Entidade::Clientes => "clientes",
            Entidade::Tarefas => "tarefas",
        }
    }
}

/// Chave do cache: uma coleção completa por usuário
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChaveConsulta {
    pub user_id: Uuid,
    pub entidade: Entidade,
}

impl ChaveConsulta {
    pub fn new(user_id: Uuid, entidade: Entidade) -> Self {
        Self { user_id, entidade }
    }
}

impl fmt::Display for ChaveConsulta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entidade.as_str(), self.user_id)
    }
}

#[derive(Debug, Clone)]
struct Entrada<T> {
    valor: T,
    carregado_em: DateTime<Utc>,
}

#[derive(Debug)]
struct Estado<T> {
    entradas: HashMap<ChaveConsulta, Entrada<T>>,
    /// Incrementada a cada invalidação da chave
    geracoes: HashMap<ChaveConsulta, u64>,
}

impl<T> Estado<T> {
    fn geracao(&self, chave: &ChaveConsulta) -> u64 {
        self.geracoes.get(chave).copied().unwrap_or(0)
    }
}

/// Cache de consultas com invalidação explícita
///
/// Toda mutação bem sucedida chama `invalidate_and_reload` para a chave do
/// usuário, substituindo a coleção inteira pela versão do banco.
/// Falhas do carregador nunca são cacheadas.
///
/// Cada chave tem uma geração. Um carregamento só grava se a geração não mudou
/// enquanto o carregador rodava, então uma leitura iniciada antes de uma
/// invalidação nunca sobrescreve o recarregamento que veio depois dela.
#[derive(Debug, Clone)]
pub struct QueryCache<T> {
    estado: Arc<RwLock<Estado<T>>>,
    ttl: Duration,
}

impl<T: Clone> QueryCache<T> {
    pub fn new(ttl_seconds: u64) -> Self {
        Self {
            estado: Arc::new(RwLock::new(Estado {
                entradas: HashMap::new(),
                geracoes: HashMap::new(),
            })),
            ttl: Duration::seconds(ttl_seconds as i64),
        }
    }

    /// Valor em cache, se ainda dentro do TTL
    pub async fn get(&self, chave: &ChaveConsulta) -> Option<T> {
        let estado = self.estado.read().await;
        let entrada = estado.entradas.get(chave)?;

        if Utc::now() - entrada.carregado_em < self.ttl {
            log_cache_hit(&chave.to_string());
            Some(entrada.valor.clone())
        } else {
            None
        }
    }

    pub async fn get_or_load<F, Fut, E>(&self, chave: ChaveConsulta, loader: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(valor) = self.get(&chave).await {
            return Ok(valor);
        }
        let geracao = self.estado.read().await.geracao(&chave);
        self.load(chave, geracao, loader).await
    }

    pub async fn invalidate(&self, chave: &ChaveConsulta) {
        self.invalidar(chave).await;
    }

    /// Descarta a entrada e busca a coleção completa de novo
    pub async fn invalidate_and_reload<F, Fut, E>(&self, chave: ChaveConsulta, loader: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let geracao = self.invalidar(&chave).await;
        self.load(chave, geracao, loader).await
    }

    /// Remove a entrada e avança a geração; devolve a nova geração
    async fn invalidar(&self, chave: &ChaveConsulta) -> u64 {
        let mut estado = self.estado.write().await;
        let geracao = estado.geracao(chave) + 1;
        estado.geracoes.insert(*chave, geracao);
        if estado.entradas.remove(chave).is_some() {
            log_cache_invalidated(&chave.to_string());
        }
        geracao
    }

    async fn load<F, Fut, E>(&self, chave: ChaveConsulta, geracao: u64, loader: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let valor = loader().await?;

        let mut estado = self.estado.write().await;
        if estado.geracao(&chave) == geracao {
            estado.entradas.insert(
                chave,
                Entrada {
                    valor: valor.clone(),
                    carregado_em: Utc::now(),
                },
            );
        } else {
            tracing::debug!("Carregamento descartado para {}: chave invalidada durante a leitura", chave);
        }
        Ok(valor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn chave() -> ChaveConsulta {
        ChaveConsulta::new(Uuid::nil(), Entidade::Clientes)
    }

    #[test]
    fn test_empty_cache_misses() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new(60);
        assert!(tokio_test::block_on(cache.get(&chave())).is_none());
    }

    #[tokio::test]
    async fn test_get_or_load_uses_cache() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new(60);
        let chamadas = AtomicUsize::new(0);

        for _ in 0..3 {
            let valor = cache
                .get_or_load(chave(), || async {
                    chamadas.fetch_add(1, Ordering::SeqCst);
                    Ok::<_, String>(vec![1, 2, 3])
                })
                .await
                .unwrap();
            assert_eq!(valor, vec![1, 2, 3]);
        }

        assert_eq!(chamadas.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_load_is_not_cached() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new(60);

        let erro = cache
            .get_or_load(chave(), || async { Err::<Vec<u32>, _>("offline") })
            .await;
        assert!(erro.is_err());
        assert!(cache.get(&chave()).await.is_none());

        let valor = cache
            .get_or_load(chave(), || async { Ok::<_, &str>(vec![7]) })
            .await
            .unwrap();
        assert_eq!(valor, vec![7]);
    }

    #[tokio::test]
    async fn test_invalidate_and_reload_replaces_entry() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new(60);
        cache
            .get_or_load(chave(), || async { Ok::<_, String>(vec![1]) })
            .await
            .unwrap();

        let recarregado = cache
            .invalidate_and_reload(chave(), || async { Ok::<_, String>(vec![1, 2]) })
            .await
            .unwrap();
        assert_eq!(recarregado, vec![1, 2]);
        assert_eq!(cache.get(&chave()).await, Some(vec![1, 2]));
    }

    #[tokio::test]
    async fn test_keys_are_per_user_and_entity() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new(60);
        cache
            .get_or_load(chave(), || async { Ok::<_, String>(vec![1]) })
            .await
            .unwrap();

        let tarefas = ChaveConsulta::new(Uuid::nil(), Entidade::Tarefas);
        let outro = ChaveConsulta::new(Uuid::new_v4(), Entidade::Clientes);
        assert!(cache.get(&tarefas).await.is_none());
        assert!(cache.get(&outro).await.is_none());

        cache.invalidate(&chave()).await;
        assert!(cache.get(&chave()).await.is_none());
    }

    #[tokio::test]
    async fn test_zero_ttl_always_reloads() {
        let cache: QueryCache<Vec<u32>> = QueryCache::new(0);
        cache
            .get_or_load(chave(), || async { Ok::<_, String>(vec![1]) })
            .await
            .unwrap();
        assert!(cache.get(&chave()).await.is_none());
    }

    #[tokio::test]
    async fn test_read_started_before_reload_does_not_overwrite_it() {
        use tokio::sync::Notify;

        let cache: QueryCache<Vec<u32>> = QueryCache::new(60);
        let iniciou = Arc::new(Notify::new());
        let liberar = Arc::new(Notify::new());

        let leitura = {
            let cache = cache.clone();
            let iniciou = iniciou.clone();
            let liberar = liberar.clone();
            tokio::spawn(async move {
                cache
                    .get_or_load(chave(), || async move {
                        iniciou.notify_one();
                        liberar.notified().await;
                        Ok::<_, String>(vec![1])
                    })
                    .await
            })
        };

        iniciou.notified().await;
        let recarregado = cache
            .invalidate_and_reload(chave(), || async { Ok::<_, String>(vec![1, 2]) })
            .await
            .unwrap();
        assert_eq!(recarregado, vec![1, 2]);

        liberar.notify_one();
        assert_eq!(leitura.await.unwrap().unwrap(), vec![1]);

        assert_eq!(cache.get(&chave()).await, Some(vec![1, 2]));
    }
}
