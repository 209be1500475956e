use axum::{
    extract::{Query, State},
    response::Json,
    Extension,
};
use chrono::Datelike;
use serde::Deserialize;
use std::sync::Arc;

use crm_clientes::models::Session;
use crm_clientes::services::dashboard::{montar_dashboard, Dashboard};
use crm_clientes::services::Carregamento;
use crm_clientes::utils::dates;
use crm_clientes::utils::logging::*;
use crm_clientes::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ParametrosDashboard {
    /// Ano da série de receita (padrão: ano corrente)
    pub ano: Option<i32>,
}

/// `GET /dashboard?ano=2024`
///
/// Calculado sobre a mesma coleção cacheada da lista de clientes.
pub async fn obter_dashboard(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<Session>,
    Query(parametros): Query<ParametrosDashboard>,
) -> Json<Carregamento<Dashboard>> {
    log_request_received("/dashboard", "GET");

    let hoje = dates::hoje();
    let ano = parametros.ano.unwrap_or_else(|| hoje.year());
    let top_n = state.settings.dashboard.top_n;

    let carregamento = state.clientes.carregar(&session).await;
    Json(carregamento.map(|clientes| montar_dashboard(&clientes, ano, hoje, top_n)))
}
