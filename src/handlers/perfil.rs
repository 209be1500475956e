use axum::{extract::State, response::Json, Extension};
use std::sync::Arc;

use crm_clientes::models::{Perfil, PerfilPatch, Session};
use crm_clientes::services::Mutacao;
use crm_clientes::utils::logging::*;
use crm_clientes::utils::AppError;
use crm_clientes::AppState;

/// `GET /perfil`
pub async fn obter_perfil(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
) -> Result<Json<Perfil>, AppError> {
    log_request_received("/perfil", "GET");

    Ok(Json(state.perfis.obter(&session).await?))
}

/// `PATCH /perfil`
pub async fn atualizar_perfil(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(patch): Json<PerfilPatch>,
) -> Result<Json<Mutacao<Perfil>>, AppError> {
    log_request_received("/perfil", "PATCH");

    Ok(Json(state.perfis.atualizar(&session, patch).await?))
}
