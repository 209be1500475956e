use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub dashboard: DashboardSettings,
    #[serde(default)]
    pub cache: CacheSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DashboardSettings {
    /// Tamanho do ranking de clientes
    pub top_n: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheSettings {
    /// Validade das coleções em cache (0 desliga o cache)
    pub ttl_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    30
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self { top_n: 10 }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_seconds: 60 }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Nomes usados pelo painel do Supabase
        if let Ok(url) = std::env::var("SUPABASE_URL") {
            builder = builder.set_override("supabase.url", url)?;
        }
        if let Ok(anon_key) = std::env::var("SUPABASE_ANON_KEY") {
            builder = builder.set_override("supabase.anon_key", anon_key)?;
        }

        // CRM_CLIENTES__SERVER__PORT=9000 etc.
        builder = builder.add_source(Environment::with_prefix("CRM_CLIENTES").separator("__"));

        let s = builder.build()?;

        s.try_deserialize()
    }
}
