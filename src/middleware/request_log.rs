//! Registra status e duração de cada requisição
//!
//! Complementa o `TraceLayer` com uma linha no formato dos demais logs do serviço.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::utils::logging::log_request_processed;

pub async fn log_requests(request: Request, next: Next) -> Response {
    let endpoint = format!("{} {}", request.method(), request.uri().path());
    let inicio = Instant::now();

    let response = next.run(request).await;

    log_request_processed(
        &endpoint,
        response.status().as_u16(),
        inicio.elapsed().as_millis() as u64,
    );
    response
}
