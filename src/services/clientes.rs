use supabase::{Query, SupabaseClient, SupabaseError};
use tracing::{info, warn};
use uuid::Uuid;

use super::filtros::FiltroClientes;
use super::notificacoes::{mensagens, Notificacao};
use super::query_cache::{ChaveConsulta, Entidade, QueryCache};
use super::{Carregamento, Mutacao};
use crate::models::cliente::{ClientePatch, NovoCliente, TABELA};
use crate::models::status::emblema_status_cliente;
use crate::models::{Cliente, Session};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::*;

/// Operações sobre a tabela `clientes`, sempre no escopo do usuário da sessão
#[derive(Clone)]
pub struct ClientesService {
    supabase: SupabaseClient,
    cache: QueryCache<Vec<Cliente>>,
}

impl ClientesService {
    pub fn new(supabase: SupabaseClient, cache_ttl_seconds: u64) -> Self {
        Self {
            supabase,
            cache: QueryCache::new(cache_ttl_seconds),
        }
    }

    fn chave(session: &Session) -> ChaveConsulta {
        ChaveConsulta::new(session.user_id, Entidade::Clientes)
    }

    /// Linhas do usuário, mais recentes primeiro
    fn consulta_usuario(session: &Session) -> Query {
        Query::table(TABELA)
            .eq("user_id", session.user_id)
            .order("created_at", false)
    }

    fn consulta_registro(session: &Session, id: Uuid) -> Query {
        Query::table(TABELA)
            .eq("id", id)
            .eq("user_id", session.user_id)
    }

    async fn buscar_todos(&self, session: &Session) -> supabase::Result<Vec<Cliente>> {
        let clientes: Vec<Cliente> = self
            .supabase
            .select(&session.access_token, &Self::consulta_usuario(session))
            .await?;
        log_records_loaded("Clientes", &session.user_id, clientes.len());
        Ok(clientes)
    }

    /// Coleção completa do usuário (cacheada)
    ///
    /// Nunca falha: erro do backend vira lista vazia com notificação de erro.
    pub async fn carregar(&self, session: &Session) -> Carregamento<Vec<Cliente>> {
        let resultado = self
            .cache
            .get_or_load(Self::chave(session), || self.buscar_todos(session))
            .await;

        match resultado {
            Ok(clientes) => Carregamento::ok(clientes),
            Err(e) => {
                log_backend_error("carregar clientes", e.status(), &e.to_string());
                Carregamento::erro(Vec::new(), mensagens::CLIENTES_ERRO_CARREGAR)
            }
        }
    }

    pub async fn listar(&self, session: &Session, filtro: &FiltroClientes) -> Carregamento<Vec<Cliente>> {
        self.carregar(session).await.map(|clientes| filtro.aplicar(clientes))
    }

    pub async fn buscar(&self, session: &Session, id: Uuid) -> AppResult<Cliente> {
        self.supabase
            .select_one(&session.access_token, &Self::consulta_registro(session, id))
            .await
            .map_err(|e| match e {
                SupabaseError::NotFound(_) => AppError::NotFound(mensagens::CLIENTE_NAO_ENCONTRADO.to_string()),
                other => {
                    log_backend_error("buscar cliente", other.status(), &other.to_string());
                    AppError::backend(mensagens::CLIENTES_ERRO_CARREGAR, other)
                }
            })
    }

    pub async fn criar(&self, session: &Session, novo: NovoCliente) -> AppResult<Mutacao<Cliente>> {
        let insert = novo.into_insert(session.user_id)?;

        let cliente: Cliente = self
            .supabase
            .insert(&session.access_token, TABELA, &insert)
            .await
            .map_err(|e| {
                log_backend_error("criar cliente", e.status(), &e.to_string());
                AppError::backend(mensagens::CLIENTE_ERRO_ADICIONAR, e)
            })?;

        log_record_created("Cliente", &cliente.id);
        self.recarregar(session).await;

        Ok(Mutacao::new(cliente, Notificacao::sucesso(mensagens::CLIENTE_ADICIONADO)))
    }

    /// Diálogo de edição: só os campos da lista branca de `ClientePatch`
    pub async fn atualizar(&self, session: &Session, id: Uuid, patch: ClientePatch) -> AppResult<Mutacao<Cliente>> {
        let cliente = self
            .aplicar_patch(session, id, patch, mensagens::CLIENTE_ERRO_ATUALIZAR)
            .await?;
        Ok(Mutacao::new(cliente, Notificacao::sucesso(mensagens::CLIENTE_ATUALIZADO)))
    }

    pub async fn atualizar_status(&self, session: &Session, id: Uuid, status: &str) -> AppResult<Mutacao<Cliente>> {
        let cliente = self
            .aplicar_patch(session, id, ClientePatch::status(status), mensagens::CLIENTE_ERRO_STATUS)
            .await?;
        let rotulo = emblema_status_cliente(&cliente.status).rotulo;
        Ok(Mutacao::new(
            cliente,
            Notificacao::sucesso(mensagens::cliente_status_atualizado(&rotulo)),
        ))
    }

    pub async fn atualizar_prioridade(&self, session: &Session, id: Uuid, prioridade: &str) -> AppResult<Mutacao<Cliente>> {
        let cliente = self
            .aplicar_patch(
                session,
                id,
                ClientePatch::prioridade(prioridade),
                mensagens::CLIENTE_ERRO_PRIORIDADE,
            )
            .await?;
        Ok(Mutacao::new(
            cliente,
            Notificacao::sucesso(mensagens::CLIENTE_PRIORIDADE_ATUALIZADA),
        ))
    }

    pub async fn excluir(&self, session: &Session, id: Uuid) -> AppResult<Notificacao> {
        self.supabase
            .delete(&session.access_token, &Self::consulta_registro(session, id))
            .await
            .map_err(|e| {
                log_backend_error("excluir cliente", e.status(), &e.to_string());
                AppError::backend(mensagens::CLIENTE_ERRO_EXCLUIR, e)
            })?;

        log_record_deleted("Cliente", &id);
        self.recarregar(session).await;

        Ok(Notificacao::sucesso(mensagens::CLIENTE_EXCLUIDO))
    }

    async fn aplicar_patch(
        &self,
        session: &Session,
        id: Uuid,
        patch: ClientePatch,
        mensagem_erro: &str,
    ) -> AppResult<Cliente> {
        let update = patch.into_update()?;
        let campos = update.campos().join(", ");

        let mut linhas: Vec<Cliente> = self
            .supabase
            .update(&session.access_token, &Self::consulta_registro(session, id), &update)
            .await
            .map_err(|e| {
                log_backend_error("atualizar cliente", e.status(), &e.to_string());
                AppError::backend(mensagem_erro, e)
            })?;

        if linhas.is_empty() {
            return Err(AppError::NotFound(mensagens::CLIENTE_NAO_ENCONTRADO.to_string()));
        }

        let cliente = linhas.swap_remove(0);
        log_record_updated("Cliente", &cliente.id, &campos);
        self.recarregar(session).await;

        Ok(cliente)
    }

    /// A escrita já foi aceita; falha na releitura só é registrada
    async fn recarregar(&self, session: &Session) {
        let resultado = self
            .cache
            .invalidate_and_reload(Self::chave(session), || self.buscar_todos(session))
            .await;

        match resultado {
            Ok(clientes) => info!("Cache de clientes recarregado: {} registros", clientes.len()),
            Err(e) => warn!("Falha ao recarregar clientes após escrita: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::json;

    const USER_ID: &str = "7f0c1a52-4a55-4c5e-9d7e-2f8a4d1b6c11";
    const CLIENTE_ID: &str = "0b5e8f0e-3c4d-4a1b-9e2f-6a7b8c9d0e1f";

    fn session() -> Session {
        Session::new(Uuid::parse_str(USER_ID).unwrap(), Some("ana@tech.com".into()), "token-usuario")
    }

    fn service(server: &MockServer) -> ClientesService {
        let supabase = SupabaseClient::new(server.base_url(), "anon-key").unwrap();
        ClientesService::new(supabase, 60)
    }

    fn linha(status: &str) -> serde_json::Value {
        json!({
            "id": CLIENTE_ID,
            "user_id": USER_ID,
            "nome": "Ana",
            "empresa": "TechSolutions",
            "email": "ana@tech.com",
            "telefone": null,
            "status": status,
            "prioridade": "media",
            "valor_estimado": "R$ 15.000,00",
            "responsavel": null,
            "links": null,
            "ultimo_contato": "2024-03-05",
            "data_fechamento": null,
            "created_at": "2024-03-01T10:00:00+00:00"
        })
    }

    #[tokio::test]
    async fn test_carregar_scoped_by_user_and_cached() {
        let server = MockServer::start();
        let lista = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/clientes")
                .query_param("user_id", format!("eq.{}", USER_ID))
                .query_param("order", "created_at.desc")
                .header("apikey", "anon-key")
                .header("Authorization", "Bearer token-usuario");
            then.status(200).json_body(json!([linha("lead")]));
        });

        let service = service(&server);
        let primeira = service.carregar(&session()).await;
        let segunda = service.carregar(&session()).await;

        assert!(primeira.notificacao.is_none());
        assert_eq!(primeira.dados.len(), 1);
        assert_eq!(segunda.dados, primeira.dados);
        lista.assert_hits(1);
    }

    #[tokio::test]
    async fn test_carregar_backend_error_returns_empty_with_notification() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/clientes");
            then.status(500).json_body(json!({ "message": "boom" }));
        });

        let carregamento = service(&server).carregar(&session()).await;
        assert!(carregamento.dados.is_empty());
        let notificacao = carregamento.notificacao.unwrap();
        assert!(notificacao.is_erro());
        assert_eq!(notificacao.mensagem, mensagens::CLIENTES_ERRO_CARREGAR);
    }

    #[tokio::test]
    async fn test_criar_stamps_user_and_reloads_cache() {
        let server = MockServer::start();
        let lista = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/clientes")
                .query_param("user_id", format!("eq.{}", USER_ID));
            then.status(200).json_body(json!([linha("lead")]));
        });
        let insert = server.mock(|when, then| {
            when.method(POST)
                .path("/rest/v1/clientes")
                .header("Prefer", "return=representation")
                .json_body_partial(
                    json!({
                        "user_id": USER_ID,
                        "nome": "Ana",
                        "status": "lead",
                        "prioridade": "media",
                        "valor_estimado": "R$ 15.000,00"
                    })
                    .to_string(),
                );
            then.status(201).json_body(json!([linha("lead")]));
        });

        let service = service(&server);
        service.carregar(&session()).await;

        let novo = NovoCliente {
            nome: "Ana".into(),
            empresa: "TechSolutions".into(),
            email: "ana@tech.com".into(),
            valor_estimado: Some("15000".into()),
            ..Default::default()
        };
        let mutacao = service.criar(&session(), novo).await.unwrap();

        assert_eq!(mutacao.notificacao.mensagem, mensagens::CLIENTE_ADICIONADO);
        insert.assert();
        lista.assert_hits(2);
    }

    #[tokio::test]
    async fn test_criar_validation_skips_backend() {
        let server = MockServer::start();
        let insert = server.mock(|when, then| {
            when.method(POST).path("/rest/v1/clientes");
            then.status(201).json_body(json!([]));
        });

        let erro = service(&server)
            .criar(&session(), NovoCliente::default())
            .await
            .unwrap_err();
        assert!(matches!(erro, AppError::ValidationError(_)));
        insert.assert_hits(0);
    }

    #[tokio::test]
    async fn test_atualizar_status_scoped_update() {
        let server = MockServer::start();
        let patch = server.mock(|when, then| {
            when.method(PATCH)
                .path("/rest/v1/clientes")
                .query_param("id", format!("eq.{}", CLIENTE_ID))
                .query_param("user_id", format!("eq.{}", USER_ID))
                .json_body(json!({ "status": "fechado" }));
            then.status(200).json_body(json!([linha("fechado")]));
        });
        let lista = server.mock(|when, then| {
            when.method(GET).path("/rest/v1/clientes");
            then.status(200).json_body(json!([linha("fechado")]));
        });

        let id = Uuid::parse_str(CLIENTE_ID).unwrap();
        let mutacao = service(&server)
            .atualizar_status(&session(), id, "fechado")
            .await
            .unwrap();

        assert_eq!(mutacao.registro.status, "fechado");
        assert_eq!(mutacao.notificacao.mensagem, "Status do cliente atualizado para Fechado");
        patch.assert();
        lista.assert_hits(1);
    }

    #[tokio::test]
    async fn test_atualizar_missing_row_is_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PATCH).path("/rest/v1/clientes");
            then.status(200).json_body(json!([]));
        });

        let erro = service(&server)
            .atualizar_prioridade(&session(), Uuid::new_v4(), "alta")
            .await
            .unwrap_err();
        assert!(matches!(erro, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_excluir_backend_error_keeps_message() {
        let server = MockServer::start();
        let delete = server.mock(|when, then| {
            when.method(DELETE)
                .path("/rest/v1/clientes")
                .query_param("user_id", format!("eq.{}", USER_ID));
            then.status(500).json_body(json!({ "message": "violates foreign key" }));
        });

        let erro = service(&server)
            .excluir(&session(), Uuid::parse_str(CLIENTE_ID).unwrap())
            .await
            .unwrap_err();
        assert_eq!(erro.notificacao().mensagem, mensagens::CLIENTE_ERRO_EXCLUIR);
        delete.assert();
    }

    #[tokio::test]
    async fn test_buscar_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/clientes")
                .query_param("id", format!("eq.{}", CLIENTE_ID));
            then.status(200).json_body(json!([]));
        });

        let erro = service(&server)
            .buscar(&session(), Uuid::parse_str(CLIENTE_ID).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(erro, AppError::NotFound(_)));
    }
}
