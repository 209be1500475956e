use supabase::{Query, SupabaseClient, SupabaseError};
use tracing::{info, warn};
use uuid::Uuid;

use super::filtros::{quadro_tarefas, FiltroTarefas, QuadroTarefas};
use super::notificacoes::{mensagens, Notificacao};
use super::query_cache::{ChaveConsulta, Entidade, QueryCache};
use super::{Carregamento, Mutacao};
use crate::models::tarefa::{NovaTarefa, TarefaPatch, TABELA};
use crate::models::{Session, Tarefa};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::*;

/// Operações sobre a tabela `tarefas`, no escopo do usuário da sessão
#[derive(Clone)]
pub struct TarefasService {
    supabase: SupabaseClient,
    cache: QueryCache<Vec<Tarefa>>,
}

impl TarefasService {
    pub fn new(supabase: SupabaseClient, cache_ttl_seconds: u64) -> Self {
        Self {
            supabase,
            cache: QueryCache::new(cache_ttl_seconds),
        }
    }

    fn chave(session: &Session) -> ChaveConsulta {
        ChaveConsulta::new(session.user_id, Entidade::Tarefas)
    }

    fn consulta_registro(session: &Session, id: Uuid) -> Query {
        Query::table(TABELA)
            .eq("id", id)
            .eq("user_id", session.user_id)
    }

    async fn buscar_todas(&self, session: &Session) -> supabase::Result<Vec<Tarefa>> {
        let query = Query::table(TABELA)
            .eq("user_id", session.user_id)
            .order("created_at", false);

        let tarefas: Vec<Tarefa> = self.supabase.select(&session.access_token, &query).await?;
        log_records_loaded("Tarefas", &session.user_id, tarefas.len());
        Ok(tarefas)
    }

    pub async fn carregar(&self, session: &Session) -> Carregamento<Vec<Tarefa>> {
        match self
            .cache
            .get_or_load(Self::chave(session), || self.buscar_todas(session))
            .await
        {
            Ok(tarefas) => Carregamento::ok(tarefas),
            Err(e) => {
                log_backend_error("carregar tarefas", e.status(), &e.to_string());
                Carregamento::erro(Vec::new(), mensagens::TAREFAS_ERRO_CARREGAR)
            }
        }
    }

    pub async fn listar(&self, session: &Session, filtro: &FiltroTarefas) -> Carregamento<Vec<Tarefa>> {
        self.carregar(session).await.map(|tarefas| filtro.aplicar(tarefas))
    }

    /// Tarefas filtradas e agrupadas nas colunas do quadro
    pub async fn quadro(&self, session: &Session, filtro: &FiltroTarefas) -> Carregamento<QuadroTarefas> {
        self.listar(session, filtro).await.map(quadro_tarefas)
    }

    pub async fn buscar(&self, session: &Session, id: Uuid) -> AppResult<Tarefa> {
        self.supabase
            .select_one(&session.access_token, &Self::consulta_registro(session, id))
            .await
            .map_err(|e| match e {
                SupabaseError::NotFound(_) => AppError::NotFound(mensagens::TAREFA_NAO_ENCONTRADA.to_string()),
                other => {
                    log_backend_error("buscar tarefa", other.status(), &other.to_string());
                    AppError::backend(mensagens::TAREFAS_ERRO_CARREGAR, other)
                }
            })
    }

    pub async fn criar(&self, session: &Session, nova: NovaTarefa) -> AppResult<Mutacao<Tarefa>> {
        let insert = nova.into_insert(session.user_id)?;

        let tarefa: Tarefa = self
            .supabase
            .insert(&session.access_token, TABELA, &insert)
            .await
            .map_err(|e| {
                log_backend_error("criar tarefa", e.status(), &e.to_string());
                AppError::backend(mensagens::TAREFA_ERRO_ADICIONAR, e)
            })?;

        log_record_created("Tarefa", &tarefa.id);
        self.recarregar(session).await;

        Ok(Mutacao::new(tarefa, Notificacao::sucesso(mensagens::TAREFA_ADICIONADA)))
    }

    pub async fn atualizar(&self, session: &Session, id: Uuid, patch: TarefaPatch) -> AppResult<Mutacao<Tarefa>> {
        let tarefa = self
            .aplicar_patch(session, id, patch, mensagens::TAREFA_ERRO_ATUALIZAR)
            .await?;
        Ok(Mutacao::new(tarefa, Notificacao::sucesso(mensagens::TAREFA_ATUALIZADA)))
    }

    /// Mover o cartão entre colunas do quadro
    pub async fn atualizar_status(&self, session: &Session, id: Uuid, status: &str) -> AppResult<Mutacao<Tarefa>> {
        let tarefa = self
            .aplicar_patch(session, id, TarefaPatch::status(status), mensagens::TAREFA_ERRO_STATUS)
            .await?;
        Ok(Mutacao::new(tarefa, Notificacao::sucesso(mensagens::TAREFA_STATUS_ATUALIZADO)))
    }

    pub async fn atualizar_prioridade(&self, session: &Session, id: Uuid, prioridade: &str) -> AppResult<Mutacao<Tarefa>> {
        let tarefa = self
            .aplicar_patch(
                session,
                id,
                TarefaPatch::prioridade(prioridade),
                mensagens::TAREFA_ERRO_PRIORIDADE,
            )
            .await?;
        Ok(Mutacao::new(
            tarefa,
            Notificacao::sucesso(mensagens::TAREFA_PRIORIDADE_ATUALIZADA),
        ))
    }

    pub async fn excluir(&self, session: &Session, id: Uuid) -> AppResult<Notificacao> {
        self.supabase
            .delete(&session.access_token, &Self::consulta_registro(session, id))
            .await
            .map_err(|e| {
                log_backend_error("excluir tarefa", e.status(), &e.to_string());
                AppError::backend(mensagens::TAREFA_ERRO_REMOVER, e)
            })?;

        log_record_deleted("Tarefa", &id);
        self.recarregar(session).await;

        Ok(Notificacao::sucesso(mensagens::TAREFA_REMOVIDA))
    }

    async fn aplicar_patch(
        &self,
        session: &Session,
        id: Uuid,
        patch: TarefaPatch,
        mensagem_erro: &str,
    ) -> AppResult<Tarefa> {
        let update = patch.into_update()?;
        let campos = update.campos().join(", ");

        let mut linhas: Vec<Tarefa> = self
            .supabase
            .update(&session.access_token, &Self::consulta_registro(session, id), &update)
            .await
            .map_err(|e| {
                log_backend_error("atualizar tarefa", e.status(), &e.to_string());
                AppError::backend(mensagem_erro, e)
            })?;

        if linhas.is_empty() {
            return Err(AppError::NotFound(mensagens::TAREFA_NAO_ENCONTRADA.to_string()));
        }

        let tarefa = linhas.swap_remove(0);
        log_record_updated("Tarefa", &tarefa.id, &campos);
        self.recarregar(session).await;

        Ok(tarefa)
    }

    async fn recarregar(&self, session: &Session) {
        match self
            .cache
            .invalidate_and_reload(Self::chave(session), || self.buscar_todas(session))
            .await
        {
            Ok(tarefas) => info!("Cache de tarefas recarregado: {} registros", tarefas.len()),
            Err(e) => warn!("Falha ao recarregar tarefas após escrita: {}", e),
        }
    }
}
