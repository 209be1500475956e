//! Middleware de sessão para as rotas do CRM
//!
//! Resolve o `Authorization: Bearer <token>` no usuário do Supabase e anexa
//! uma `Session` às extensões da requisição. Handlers a recebem com
//! `Extension<Session>` e a repassam explicitamente aos serviços.
//!
//! # Respostas
//!
//! - **401 Unauthorized**: header ausente, malformado ou token rejeitado pelo Supabase
//! - **502 Bad Gateway**: Supabase indisponível

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use supabase::SupabaseError;

use crate::models::Session;
use crate::utils::error::AppError;
use crate::utils::logging::log_backend_error;
use crate::AppState;

/// Token do header `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Qualquer 4xx do GoTrue significa token rejeitado (401, ou 403 `bad_jwt` /
/// `session_not_found`); só falhas de transporte e 5xx viram 502
fn erro_sessao(erro: SupabaseError) -> AppError {
    log_backend_error("resolver sessão", erro.status(), &erro.to_string());
    match erro {
        SupabaseError::ApiError { status: 400..=499, message } => AppError::Unauthorized(message),
        outro => AppError::from(outro),
    }
}

pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?
        .to_string();

    let user = state
        .supabase
        .auth()
        .get_user(&token)
        .await
        .map_err(erro_sessao)?;

    tracing::debug!("✅ Sessão resolvida para {}", user.id);

    request
        .extensions_mut()
        .insert(Session::from_auth_user(user, token));

    Ok(next.run(request).await)
}
