// Biblioteca do CRM de clientes
// Expõe módulos para uso em testes e no binário

pub mod config;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use supabase::SupabaseClient;

use services::{ClientesService, PerfisService, TarefasService};
use utils::{AppError, AppResult};

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub supabase: SupabaseClient,
    pub clientes: ClientesService,
    pub tarefas: TarefasService,
    pub perfis: PerfisService,
}

impl AppState {
    pub fn new(settings: config::Settings) -> AppResult<Self> {
        let supabase = SupabaseClient::with_timeouts(
            settings.supabase.url.clone(),
            settings.supabase.anon_key.clone(),
            settings.supabase.timeout_seconds,
            5,
        )
        .map_err(|e| AppError::ConfigError(format!("Failed to create Supabase client: {}", e)))?;

        let ttl = settings.cache.ttl_seconds;

        Ok(Self {
            clientes: ClientesService::new(supabase.clone(), ttl),
            tarefas: TarefasService::new(supabase.clone(), ttl),
            perfis: PerfisService::new(supabase.clone()),
            supabase,
            settings,
        })
    }
}
