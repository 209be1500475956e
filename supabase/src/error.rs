//! Tipos de erro para o crate supabase

use thiserror::Error;

/// Erros do cliente Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// Erro de requisição HTTP
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Erro devolvido pelo PostgREST/GoTrue (status não-2xx)
    #[error("Supabase API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Token ausente, expirado ou rejeitado
    #[error("Authentication failed: {0}")]
    AuthError(String),

    /// Erro de parsing JSON
    #[error("JSON parsing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Linha não encontrada (ou não pertence ao usuário)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Erro de configuração
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SupabaseError {
    /// Status HTTP associado ao erro, quando houver
    pub fn status(&self) -> Option<u16> {
        match self {
            SupabaseError::ApiError { status, .. } => Some(*status),
            SupabaseError::HttpError(e) => e.status().map(|s| s.as_u16()),
            SupabaseError::AuthError(_) => Some(401),
            SupabaseError::NotFound(_) => Some(404),
            _ => None,
        }
    }
}

/// Tipo Result padrão para o crate
pub type Result<T> = std::result::Result<T, SupabaseError>;
