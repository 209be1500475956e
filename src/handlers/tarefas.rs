// ============================================================================
// Rotas de tarefas
// ============================================================================

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

use super::clientes::{Confirmacao, NovaPrioridade, NovoStatus};
use crm_clientes::models::{NovaTarefa, Session, Tarefa, TarefaPatch, TarefaView};
use crm_clientes::services::{Carregamento, FiltroTarefas, Mutacao, QuadroTarefas};
use crm_clientes::utils::logging::*;
use crm_clientes::utils::AppError;
use crm_clientes::AppState;

/// Quadro com os cartões já prontos para exibição
#[derive(Debug, Serialize)]
pub struct QuadroView {
    pub a_fazer: Vec<TarefaView>,
    pub em_andamento: Vec<TarefaView>,
    pub concluido: Vec<TarefaView>,
}

impl From<QuadroTarefas> for QuadroView {
    fn from(quadro: QuadroTarefas) -> Self {
        let views = |tarefas: Vec<Tarefa>| -> Vec<TarefaView> {
            tarefas.into_iter().map(TarefaView::from).collect()
        };
        Self {
            a_fazer: views(quadro.a_fazer),
            em_andamento: views(quadro.em_andamento),
            concluido: views(quadro.concluido),
        }
    }
}

/// `GET /tarefas?busca=&status=`
pub async fn listar_tarefas(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(filtro): Query<FiltroTarefas>,
) -> Json<Carregamento<Vec<TarefaView>>> {
    log_request_received("/tarefas", "GET");

    let carregamento = state.tarefas.listar(&session, &filtro).await;
    Json(carregamento.map(|tarefas| tarefas.into_iter().map(TarefaView::from).collect()))
}

/// `GET /tarefas/quadro?busca=`
pub async fn quadro_tarefas(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(filtro): Query<FiltroTarefas>,
) -> Json<Carregamento<QuadroView>> {
    log_request_received("/tarefas/quadro", "GET");

    let carregamento = state.tarefas.quadro(&session, &filtro).await;
    Json(carregamento.map(QuadroView::from))
}

/// `POST /tarefas`
pub async fn criar_tarefa(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Json(nova): Json<NovaTarefa>,
) -> Result<(StatusCode, Json<Mutacao<TarefaView>>), AppError> {
    log_request_received("/tarefas", "POST");

    let mutacao = state.tarefas.criar(&session, nova).await?;
    Ok((StatusCode::CREATED, Json(mutacao.map(TarefaView::from))))
}

/// `GET /tarefas/:id`
pub async fn obter_tarefa(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
) -> Result<Json<TarefaView>, AppError> {
    log_request_received("/tarefas/:id", "GET");

    let tarefa = state.tarefas.buscar(&session, id).await?;
    Ok(Json(TarefaView::from(tarefa)))
}

/// `PATCH /tarefas/:id`
pub async fn atualizar_tarefa(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(patch): Json<TarefaPatch>,
) -> Result<Json<Mutacao<TarefaView>>, AppError> {
    log_request_received("/tarefas/:id", "PATCH");

    let mutacao = state.tarefas.atualizar(&session, id, patch).await?;
    Ok(Json(mutacao.map(TarefaView::from)))
}

/// `PATCH /tarefas/:id/status` (cartão arrastado para outra coluna)
pub async fn atualizar_status_tarefa(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(corpo): Json<NovoStatus>,
) -> Result<Json<Mutacao<TarefaView>>, AppError> {
    log_request_received("/tarefas/:id/status", "PATCH");

    let mutacao = state
        .tarefas
        .atualizar_status(&session, id, &corpo.status)
        .await?;
    Ok(Json(mutacao.map(TarefaView::from)))
}

/// `PATCH /tarefas/:id/prioridade`
pub async fn atualizar_prioridade_tarefa(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Json(corpo): Json<NovaPrioridade>,
) -> Result<Json<Mutacao<TarefaView>>, AppError> {
    log_request_received("/tarefas/:id/prioridade", "PATCH");

    let mutacao = state
        .tarefas
        .atualizar_prioridade(&session, id, &corpo.prioridade)
        .await?;
    Ok(Json(mutacao.map(TarefaView::from)))
}

/// `DELETE /tarefas/:id?confirmar=true`
pub async fn excluir_tarefa(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Path(id): Path<Uuid>,
    Query(confirmacao): Query<Confirmacao>,
) -> Result<Json<Value>, AppError> {
    log_request_received("/tarefas/:id", "DELETE");
    confirmacao.exigir()?;

    let notificacao = state.tarefas.excluir(&session, id).await?;
    Ok(Json(json!({ "notificacao": notificacao })))
}
