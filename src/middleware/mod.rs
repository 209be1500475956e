/// Middleware layer para o Axum router
///
/// - Resolução da sessão do usuário (rotas do CRM)
/// - Log de status e duração das requisições

pub mod request_log;
pub mod session_auth;

pub use request_log::log_requests;
pub use session_auth::{bearer_token, require_session};
