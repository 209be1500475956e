//! CRM de clientes e tarefas
//!
//! Arquitetura:
//! - API JSON (axum) consumida pelo front-end
//! - Supabase como backend: PostgREST para as tabelas, GoTrue para autenticação
//! - Toda rota do CRM roda no escopo do usuário resolvido pelo middleware de sessão
//! - Coleções cacheadas por usuário e recarregadas após cada escrita

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crm_clientes::{config, middleware as app_middleware, utils, AppState};

mod handlers;

use config::Settings;
use handlers::*;
use utils::logging::*;

/// Monta o router completo
///
/// Públicas: `/health` e `/auth/*`. As demais passam pelo middleware de sessão.
fn app(state: Arc<AppState>) -> Router {
    let protegidas = Router::new()
        .route("/clientes", get(listar_clientes).post(criar_cliente))
        .route(
            "/clientes/:id",
            get(obter_cliente)
                .patch(atualizar_cliente)
                .delete(excluir_cliente),
        )
        .route("/clientes/:id/status", patch(atualizar_status_cliente))
        .route("/clientes/:id/prioridade", patch(atualizar_prioridade_cliente))
        .route("/tarefas", get(listar_tarefas).post(criar_tarefa))
        .route("/tarefas/quadro", get(quadro_tarefas))
        .route(
            "/tarefas/:id",
            get(obter_tarefa)
                .patch(atualizar_tarefa)
                .delete(excluir_tarefa),
        )
        .route("/tarefas/:id/status", patch(atualizar_status_tarefa))
        .route("/tarefas/:id/prioridade", patch(atualizar_prioridade_tarefa))
        .route("/dashboard", get(obter_dashboard))
        .route("/perfil", get(obter_perfil).patch(atualizar_perfil))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            app_middleware::require_session,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/signup", post(signup))
        .route("/auth/logout", post(logout))
        .merge(protegidas)
        .layer(middleware::from_fn(app_middleware::log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 🔧 Carregar variáveis de ambiente do arquivo .env (se existir)
    let env_carregado = dotenvy::dotenv().is_ok();

    // Inicializar tracing (RUST_LOG sobrescreve o filtro padrão)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("crm_clientes=info,supabase=info,tower_http=info")),
        )
        .init();

    if env_carregado {
        tracing::info!("✅ Arquivo .env carregado com sucesso");
    } else {
        tracing::debug!("Arquivo .env não encontrado - usando variáveis de ambiente do sistema");
    }

    // Carregar configurações
    let settings = Settings::new()
        .map_err(|e| anyhow::anyhow!("Failed to load settings: {}", e))?;

    log_config_loaded(&std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string()));

    if settings.supabase.anon_key.is_empty() {
        log_warning("⚠️  SUPABASE_ANON_KEY não configurada - chamadas ao Supabase serão recusadas");
    }

    let host = settings.server.host.clone();
    // No Cloud Run, usar a variável de ambiente PORT
    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(settings.server.port);

    let app_state = Arc::new(AppState::new(settings)?);
    log_info(&format!("Supabase: {}", app_state.supabase.base_url()));

    log_server_startup(port);
    let listener = TcpListener::bind(format!("{}:{}", host, port)).await?;
    log_server_ready(port);

    // Graceful shutdown com signal handling
    axum::serve(listener, app(app_state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log_info("🛑 Server shut down gracefully");
    Ok(())
}

/// Signal handler para graceful shutdown
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log_error(&format!("failed to install Ctrl+C handler: {}", e));
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sinal) => {
                sinal.recv().await;
            }
            Err(e) => {
                log_error(&format!("failed to install signal handler: {}", e));
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            log_info("🛑 Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            log_info("🛑 Received SIGTERM, shutting down gracefully...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use crm_clientes::config::settings::{CacheSettings, DashboardSettings, ServerSettings, SupabaseSettings};
    use httpmock::prelude::*;
    use httpmock::Method::PATCH;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    const USER_ID: &str = "7f0c1a52-4a55-4c5e-9d7e-2f8a4d1b6c11";

    fn router(server: &MockServer) -> Router {
        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".into(),
                port: 0,
            },
            supabase: SupabaseSettings {
                url: server.base_url(),
                anon_key: "anon-key".into(),
                timeout_seconds: 5,
            },
            dashboard: DashboardSettings { top_n: 3 },
            cache: CacheSettings { ttl_seconds: 60 },
        };
        app(Arc::new(AppState::new(settings).unwrap()))
    }

    fn mock_usuario(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET)
                .path("/auth/v1/user")
                .header("Authorization", "Bearer token-valido");
            then.status(200)
                .json_body(json!({ "id": USER_ID, "email": "ana@tech.com" }));
        });
    }

    fn linha_cliente(nome: &str, status: &str, valor: &str, fechamento: Option<&str>) -> Value {
        json!({
            "id": uuid::Uuid::new_v4(),
            "user_id": USER_ID,
            "nome": nome,
            "empresa": "TechSolutions",
            "email": "contato@tech.com",
            "status": status,
            "prioridade": "alta",
            "valor_estimado": valor,
            "data_fechamento": fechamento,
            "created_at": "2024-03-01T10:00:00+00:00"
        })
    }

    async fn corpo(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .uri(uri)
            .header("Authorization", "Bearer token-valido")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let server = MockServer::start();
        let response = router(&server)
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(corpo(response).await["status"], "healthy");
    }

    #[tokio::test]
    async fn test_crm_routes_require_session() {
        let server = MockServer::start();
        let response = router(&server)
            .oneshot(Request::builder().uri("/clientes").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = corpo(response).await;
        assert_eq!(body["notificacao"]["nivel"], "erro");
    }

    #[tokio::test]
    async fn test_rejected_token_is_unauthorized() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/auth/v1/user");
            then.status(401).json_body(json!({ "msg": "invalid JWT" }));
        });

        let response = router(&server).oneshot(get("/clientes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_forbidden_token_is_unauthorized() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/auth/v1/user");
            then.status(403)
                .json_body(json!({ "code": 403, "error_code": "bad_jwt", "msg": "invalid JWT" }));
        });

        let response = router(&server).oneshot(get("/clientes")).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = corpo(response).await;
        assert_eq!(body["notificacao"]["mensagem"], "Sessão expirada. Faça login novamente.");
    }

    #[tokio::test]
    async fn test_listar_clientes_with_search() {
        let server = MockServer::start();
        mock_usuario(&server);
        let lista = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/v1/clientes")
                .query_param("user_id", format!("eq.{}", USER_ID))
                .header("Authorization", "Bearer token-valido");
            then.status(200).json_body(json!([
                linha_cliente("João", "lead", "R$ 1.000,00", None),
                linha_cliente("Ana", "fechado", "R$ 2.000,00", Some("2024-02-10"))
            ]));
        });

        let response = router(&server)
            .oneshot(get("/clientes?busca=joao"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = corpo(response).await;
        let dados = body["dados"].as_array().unwrap();
        assert_eq!(dados.len(), 1);
        assert_eq!(dados[0]["nome"], "João");
        assert_eq!(dados[0]["valor_numerico"], 1000.0);
        assert_eq!(dados[0]["status_emblema"]["rotulo"], "Lead");
        assert!(body.get("notificacao").is_none());
        lista.assert();
    }

    #[tokio::test]
    async fn test_read_failure_returns_empty_list_with_notification() {
        let server = MockServer::start();
        mock_usuario(&server);
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/tarefas");
            then.status(500).json_body(json!({ "message": "db down" }));
        });

        let response = router(&server).oneshot(get("/tarefas")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = corpo(response).await;
        assert_eq!(body["dados"], json!([]));
        assert_eq!(body["notificacao"]["mensagem"], "Erro ao carregar tarefas");
    }

    #[tokio::test]
    async fn test_criar_cliente_validation() {
        let server = MockServer::start();
        mock_usuario(&server);

        let request = Request::builder()
            .method("POST")
            .uri("/clientes")
            .header("Authorization", "Bearer token-valido")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "nome": "Ana" }).to_string()))
            .unwrap();

        let response = router(&server).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = corpo(response).await;
        assert_eq!(body["notificacao"]["mensagem"], "Preencha os campos obrigatórios");
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let server = MockServer::start();
        mock_usuario(&server);
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/rest/v1/clientes");
            then.status(204);
        });

        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/clientes/{}", uuid::Uuid::new_v4()))
            .header("Authorization", "Bearer token-valido")
            .body(Body::empty())
            .unwrap();

        let response = router(&server).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        delete.assert_hits(0);
    }

    #[tokio::test]
    async fn test_write_failure_is_bad_gateway() {
        let server = MockServer::start();
        mock_usuario(&server);
        server.mock(|when, then| {
            when.method(PATCH).path("/rest/v1/tarefas");
            then.status(500).json_body(json!({ "message": "timeout" }));
        });

        let request = Request::builder()
            .method("PATCH")
            .uri(format!("/tarefas/{}/prioridade", uuid::Uuid::new_v4()))
            .header("Authorization", "Bearer token-valido")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "prioridade": "alta" }).to_string()))
            .unwrap();

        let response = router(&server).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = corpo(response).await;
        assert_eq!(
            body["notificacao"]["mensagem"],
            "Erro ao atualizar prioridade da tarefa"
        );
    }

    #[tokio::test]
    async fn test_dashboard() {
        let server = MockServer::start();
        mock_usuario(&server);
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/clientes");
            then.status(200).json_body(json!([
                linha_cliente("A", "fechado", "R$ 100,00", Some("2024-01-10")),
                linha_cliente("B", "fechado", "R$ 100,00", Some("2024-01-20")),
                linha_cliente("C", "fechado", "R$ 100,00", Some("2024-03-05")),
                linha_cliente("D", "negociacao", "R$ 5.000,00", None),
                linha_cliente("E", "lead", "R$ 50,00", None)
            ]));
        });

        let response = router(&server)
            .oneshot(get("/dashboard?ano=2024"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = corpo(response).await;
        let dados = &body["dados"];
        assert_eq!(dados["ano"], 2024);
        assert_eq!(dados["receita_mensal"][0]["valor"], 200.0);
        assert_eq!(dados["receita_mensal"][2]["valor"], 100.0);
        assert_eq!(dados["receita_mensal"].as_array().unwrap().len(), 12);
        assert_eq!(dados["top_clientes"].as_array().unwrap().len(), 3);
        assert_eq!(dados["top_clientes"][0]["nome"], "D");
        assert_eq!(dados["pipeline"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_quadro_route_not_shadowed_by_id() {
        let server = MockServer::start();
        mock_usuario(&server);
        server.mock(|when, then| {
            when.method(GET).path("/rest/v1/tarefas");
            then.status(200).json_body(json!([]));
        });

        let response = router(&server).oneshot(get("/tarefas/quadro")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = corpo(response).await;
        assert_eq!(body["dados"]["a_fazer"], json!([]));
    }

    #[tokio::test]
    async fn test_login_rejected_credentials() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/v1/token");
            then.status(400)
                .json_body(json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" }));
        });

        let request = Request::builder()
            .method("POST")
            .uri("/auth/login")
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "email": "a@b.com", "password": "x" }).to_string()))
            .unwrap();

        let response = router(&server).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = corpo(response).await;
        assert_eq!(body["notificacao"]["mensagem"], "Email ou senha inválidos");
    }
}
