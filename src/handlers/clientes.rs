// ============================================================================
// Rotas de clientes
// ============================================================================
//
// Cada operação dos editores da tela de clientes vira uma rota:
// lista com busca, formulário de criação, diálogo de edição, editores de
// status e prioridade em linha e exclusão com confirmação.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use crm_clientes::models::{ClientePatch, ClienteView, NovoCliente, Session};
use crm_clientes::services::{Carregamento, FiltroClientes, Mutacao};
use crm_clientes::utils::logging::*;
use crm_clientes::utils::AppError;
use crm_clientes::AppState;

#[derive(Debug, Deserialize)]
pub struct NovoStatus {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub struct NovaPrioridade {
    #[serde(default)]
    pub prioridade: String,
}

/// `?confirmar=true` exigido pelo DELETE
#[derive(Debug, Default, Deserialize)]
pub struct Confirmacao {
    #[serde(default)]
    pub confirmar: bool,
}

impl Confirmacao {
    pub fn exigir(&self) -> Result<(), AppError> {
        if self.confirmar {
            Ok(())
        } else {
            Err(AppError::ValidationError(
                "Confirme a exclusão com ?confirmar=true".to_string(),
            ))
        }
    }
}

/// `GET /clientes?busca=&status=`
///
/// Falha do backend não é erro HTTP: a lista volta vazia com a notificação.
pub async fn listar_clientes(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(filtro): Query<FiltroClientes>,
) -> Json<Carregamento<Vec<ClienteView>>> {
    log_request_received("/clientes", "GET");

    let carregamento = state.clientes.listar(&session, &filtro).await;
    Json(carregamento.map(|clientes| clientes.into_iter().map(ClienteView::from).collect()))
}

/// `POST /clientes`
pub async fn criar_cliente(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(novo): Json<NovoCliente>,
) -> Result<(StatusCode, Json<Mutacao<ClienteView>>), AppError> {
    log_request_received("/clientes", "POST");

    let mutacao = state.clientes.criar(&session, novo).await?;
    Ok((StatusCode::CREATED, Json(mutacao.map(ClienteView::from))))
}

/// `GET /clientes/:id`
pub async fn obter_cliente(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<ClienteView>, AppError> {
    log_request_received("/clientes/:id", "GET");

    let cliente = state.clientes.buscar(&session, id).await?;
    Ok(Json(ClienteView::from(cliente)))
}

/// `PATCH /clientes/:id` (diálogo de edição)
pub async fn atualizar_cliente(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(patch): Json<ClientePatch>,
) -> Result<Json<Mutacao<ClienteView>>, AppError> {
    log_request_received("/clientes/:id", "PATCH");

    let mutacao = state.clientes.atualizar(&session, id, patch).await?;
    Ok(Json(mutacao.map(ClienteView::from)))
}

/// `PATCH /clientes/:id/status`
pub async fn atualizar_status_cliente(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(corpo): Json<NovoStatus>,
) -> Result<Json<Mutacao<ClienteView>>, AppError> {
    log_request_received("/clientes/:id/status", "PATCH");

    let mutacao = state
        .clientes
        .atualizar_status(&session, id, &corpo.status)
        .await?;
    Ok(Json(mutacao.map(ClienteView::from)))
}

/// `PATCH /clientes/:id/prioridade`
pub async fn atualizar_prioridade_cliente(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(corpo): Json<NovaPrioridade>,
) -> Result<Json<Mutacao<ClienteView>>, AppError> {
    log_request_received("/clientes/:id/prioridade", "PATCH");

    let mutacao = state
        .clientes
        .atualizar_prioridade(&session, id, &corpo.prioridade)
        .await?;
    Ok(Json(mutacao.map(ClienteView::from)))
}

/// `DELETE /clientes/:id?confirmar=true`
pub async fn excluir_cliente(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Query(confirmacao): Query<Confirmacao>,
) -> Result<Json<Value>, AppError> {
    log_request_received("/clientes/:id", "DELETE");
    confirmacao.exigir()?;

    let notificacao = state.clientes.excluir(&session, id).await?;
    Ok(Json(json!({ "notificacao": notificacao })))
}
