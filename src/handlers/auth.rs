// ============================================================================
// Login, cadastro e logout
// ============================================================================
//
// Repasses finos para o GoTrue do Supabase. O CRM não guarda sessão: o
// cliente recebe o access token e o envia em `Authorization: Bearer` nas
// rotas protegidas.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crm_clientes::middleware::bearer_token;
use crm_clientes::services::notificacoes::{mensagens, Notificacao};
use crm_clientes::utils::logging::*;
use crm_clientes::utils::{campos_obrigatorios, AppError};
use crm_clientes::AppState;
use supabase::{SignUpResponse, SupabaseError};

#[derive(Debug, Deserialize)]
pub struct Credenciais {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct Cadastro {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Recusa do GoTrue (4xx) vira erro de formulário; o resto é falha de backend
fn erro_auth(mensagem: &str, erro: SupabaseError) -> AppError {
    match erro {
        SupabaseError::AuthError(_) => AppError::ValidationError(mensagem.to_string()),
        SupabaseError::ApiError { status, .. } if status < 500 => {
            AppError::ValidationError(mensagem.to_string())
        }
        other => AppError::backend(mensagem, other),
    }
}

/// `POST /auth/login`
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credenciais): Json<Credenciais>,
) -> Result<Json<Value>, AppError> {
    log_request_received("/auth/login", "POST");

    if credenciais.email.trim().is_empty() || credenciais.password.is_empty() {
        return Err(campos_obrigatorios());
    }

    let sessao = state
        .supabase
        .auth()
        .sign_in_with_password(credenciais.email.trim(), &credenciais.password)
        .await
        .map_err(|e| {
            log_warning(&format!("Login recusado para {}: {}", credenciais.email, e));
            erro_auth(mensagens::LOGIN_ERRO, e)
        })?;

    log_info(&format!("✅ Login: {}", sessao.user.id));

    Ok(Json(json!({
        "sessao": sessao,
        "notificacao": Notificacao::sucesso(mensagens::LOGIN_SUCESSO)
    })))
}

/// `POST /auth/signup`
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(cadastro): Json<Cadastro>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    log_request_received("/auth/signup", "POST");

    let nome = cadastro.nome.trim();
    let email = cadastro.email.trim();
    if nome.is_empty() || email.is_empty() || cadastro.password.is_empty() {
        return Err(campos_obrigatorios());
    }

    let resposta = state
        .supabase
        .auth()
        .sign_up(email, &cadastro.password, nome)
        .await
        .map_err(|e| {
            log_warning(&format!("Cadastro recusado para {}: {}", email, e));
            erro_auth(mensagens::CADASTRO_ERRO, e)
        })?;

    log_info(&format!("✅ Usuário cadastrado: {}", resposta.user().id));

    let sessao = match &resposta {
        SignUpResponse::Session(sessao) => Some(sessao),
        SignUpResponse::User(_) => None,
    };

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "usuario": resposta.user(),
            "sessao": sessao,
            "notificacao": Notificacao::sucesso(mensagens::CADASTRO_SUCESSO)
        })),
    ))
}

/// `POST /auth/logout`
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    log_request_received("/auth/logout", "POST");

    let token = bearer_token(&headers)
        .ok_or_else(|| AppError::Unauthorized("missing bearer token".to_string()))?;

    state.supabase.auth().sign_out(token).await?;

    Ok(Json(json!({
        "notificacao": Notificacao::sucesso(mensagens::LOGOUT_SUCESSO)
    })))
}
