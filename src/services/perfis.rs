use supabase::{Query, SupabaseClient, SupabaseError};
use uuid::Uuid;

use super::notificacoes::{mensagens, Notificacao};
use super::Mutacao;
use crate::models::perfil::{PerfilPatch, TABELA};
use crate::models::{Perfil, Session};
use crate::utils::error::{AppError, AppResult};
use crate::utils::logging::*;

/// Perfil do usuário logado (linha de `perfis` com `id` = usuário)
#[derive(Clone)]
pub struct PerfisService {
    supabase: SupabaseClient,
}

impl PerfisService {
    pub fn new(supabase: SupabaseClient) -> Self {
        Self { supabase }
    }

    fn consulta(user_id: Uuid) -> Query {
        Query::table(TABELA).eq("id", user_id)
    }

    pub async fn obter(&self, session: &Session) -> AppResult<Perfil> {
        self.supabase
            .select_one(&session.access_token, &Self::consulta(session.user_id))
            .await
            .map_err(|e| {
                log_backend_error("carregar perfil", e.status(), &e.to_string());
                AppError::backend(mensagens::PERFIL_ERRO_CARREGAR, e)
            })
    }

    pub async fn atualizar(&self, session: &Session, patch: PerfilPatch) -> AppResult<Mutacao<Perfil>> {
        let update = patch.into_update()?;

        let mut linhas: Vec<Perfil> = self
            .supabase
            .update(&session.access_token, &Self::consulta(session.user_id), &update)
            .await
            .map_err(|e| {
                log_backend_error("atualizar perfil", e.status(), &e.to_string());
                AppError::backend(mensagens::PERFIL_ERRO_ATUALIZAR, e)
            })?;

        if linhas.is_empty() {
            return Err(AppError::backend(
                mensagens::PERFIL_ERRO_ATUALIZAR,
                SupabaseError::NotFound(format!("perfil {}", session.user_id)),
            ));
        }

        let perfil = linhas.swap_remove(0);
        log_info(&format!("Perfil atualizado: {}", perfil.id));
        Ok(Mutacao::new(perfil, Notificacao::sucesso(mensagens::PERFIL_ATUALIZADO)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::json;

    const USER_ID: &str = "7f0c1a52-4a55-4c5e-9d7e-2f8a4d1b6c11";

    fn session() -> Session {
        Session::new(Uuid::parse_str(USER_ID).unwrap(), None, "token-usuario")
    }

    fn linha(cargo: &str) -> serde_json::Value {
        json!({
            "id": USER_ID,
            "nome": "Ana Souza",
            "cargo": cargo,
            "avatar_url": null,
            "criado_em": "2024-01-01T00:00:00+00:00"
        })
    }

    #[tokio::test]
    async fn test_obter_by_session_user() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/perfis")
                .query_param("id", format!("eq.{}", USER_ID));
            then.status(200).json_body(json!([linha("CEO")]));
        });

        let service = PerfisService::new(SupabaseClient::new(server.base_url(), "anon").unwrap());
        let perfil = service.obter(&session()).await.unwrap();
        assert_eq!(perfil.nome.as_deref(), Some("Ana Souza"));
        mock.assert();
    }

    #[tokio::test]
    async fn test_obter_missing_is_404() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/perfis");
            then.status(200).json_body(json!([]));
        });

        let service = PerfisService::new(SupabaseClient::new(server.base_url(), "anon").unwrap());
        let erro = service.obter(&session()).await.unwrap_err();
        assert!(matches!(
            erro,
            AppError::Backend { origem: SupabaseError::NotFound(_), .. }
        ));
    }

    #[tokio::test]
    async fn test_atualizar() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PATCH)
                .path("/rest/v1/perfis")
                .query_param("id", format!("eq.{}", USER_ID))
                .json_body(json!({ "cargo": "Diretora" }));
            then.status(200).json_body(json!([linha("Diretora")]));
        });

        let service = PerfisService::new(SupabaseClient::new(server.base_url(), "anon").unwrap());
        let patch = PerfilPatch {
            cargo: Some(Some("Diretora".into())),
            ..Default::default()
        };
        let mutacao = service.atualizar(&session(), patch).await.unwrap();
        assert_eq!(mutacao.registro.cargo.as_deref(), Some("Diretora"));
        assert_eq!(mutacao.notificacao.mensagem, mensagens::PERFIL_ATUALIZADO);
        mock.assert();
    }
}
