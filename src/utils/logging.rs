use tracing::{debug, error, info, warn};
use uuid::Uuid;

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_request_processed(endpoint: &str, status: u16, duration_ms: u64) {
    info!("Request processed: {} - Status: {} - Duration: {}ms",
          endpoint, status, duration_ms);
}

pub fn log_records_loaded(entidade: &str, user_id: &Uuid, count: usize) {
    info!("📥 {} carregados para {}: {} registros", entidade, user_id, count);
}

pub fn log_record_created(entidade: &str, id: &Uuid) {
    info!("✅ {} criado: {}", entidade, id);
}

pub fn log_record_updated(entidade: &str, id: &Uuid, campos: &str) {
    info!("✏️ {} atualizado: {} - Campos: {}", entidade, id, campos);
}

pub fn log_record_deleted(entidade: &str, id: &Uuid) {
    info!("🗑️ {} excluído: {}", entidade, id);
}

pub fn log_backend_error(operacao: &str, status: Option<u16>, error: &str) {
    error!("Supabase error: {} - Status: {:?} - Error: {}", operacao, status, error);
}

pub fn log_cache_hit(chave: &str) {
    debug!("Cache hit: {}", chave);
}

pub fn log_cache_invalidated(chave: &str) {
    debug!("🔄 Cache invalidado: {}", chave);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 CRM Clientes server starting on port {}", port);
}

pub fn log_server_ready(port: u16) {
    info!("✅ Server ready and listening on http://0.0.0.0:{}", port);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_unknown_status(entidade: &str, status: &str) {
    warn!("Status desconhecido em {}: '{}' (exibido com rótulo padrão)", entidade, status);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
