use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use std::fmt;

use crate::services::notificacoes::{mensagens, Notificacao};

#[derive(Debug)]
pub enum AppError {
    /// Falha numa chamada ao Supabase durante uma escrita ou leitura pontual.
    /// `mensagem` é o texto da notificação exibida ao usuário.
    Backend {
        mensagem: String,
        origem: supabase::SupabaseError,
    },
    NotFound(String),
    Unauthorized(String),
    ConfigError(String),
    ValidationError(String),
}

impl AppError {
    /// Envolve um erro do Supabase com a mensagem de notificação da operação.
    /// Linha inexistente responde 404 com a mesma mensagem.
    pub fn backend(mensagem: impl Into<String>, origem: supabase::SupabaseError) -> Self {
        AppError::Backend {
            mensagem: mensagem.into(),
            origem,
        }
    }

    /// Notificação que acompanha a resposta de erro
    pub fn notificacao(&self) -> Notificacao {
        match self {
            AppError::Backend { mensagem, .. } => Notificacao::erro(mensagem.clone()),
            AppError::NotFound(msg) | AppError::ValidationError(msg) => Notificacao::erro(msg.clone()),
            AppError::Unauthorized(_) => Notificacao::erro("Sessão expirada. Faça login novamente."),
            _ => Notificacao::erro("Erro inesperado. Tente novamente."),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Backend { origem, .. } => match origem {
                supabase::SupabaseError::NotFound(_) => StatusCode::NOT_FOUND,
                supabase::SupabaseError::AuthError(_) => StatusCode::UNAUTHORIZED,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Backend { mensagem, origem } => write!(f, "Backend error: {} ({})", mensagem, origem),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<supabase::SupabaseError> for AppError {
    fn from(err: supabase::SupabaseError) -> Self {
        match err {
            supabase::SupabaseError::AuthError(msg) => AppError::Unauthorized(msg),
            supabase::SupabaseError::ConfigError(msg) => AppError::ConfigError(msg),
            other => AppError::backend("Erro ao comunicar com o servidor", other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let notificacao = self.notificacao();
        let error_message = match &self {
            AppError::Backend { origem, .. } => origem.to_string(),
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::ConfigError(msg)
            | AppError::ValidationError(msg) => msg.clone(),
        };

        let body = json!({
            "error": error_message,
            "status": status.as_u16(),
            "notificacao": notificacao
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Erro de validação de formulário com a mensagem padrão
pub fn campos_obrigatorios() -> AppError {
    AppError::ValidationError(mensagens::CAMPOS_OBRIGATORIOS.to_string())
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_not_found_maps_to_404() {
        let err = AppError::backend(
            mensagens::CLIENTE_NAO_ENCONTRADO,
            supabase::SupabaseError::NotFound("clientes".into()),
        );
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.notificacao().mensagem, "Cliente não encontrado");
    }

    #[test]
    fn test_backend_api_error_maps_to_bad_gateway() {
        let err = AppError::backend(
            mensagens::CLIENTE_ERRO_EXCLUIR,
            supabase::SupabaseError::ApiError { status: 500, message: "boom".into() },
        );
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.notificacao().is_erro());
    }

    #[test]
    fn test_validation_error_response() {
        let response = campos_obrigatorios().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_error_conversion() {
        let err: AppError = supabase::SupabaseError::AuthError("JWT expired".into()).into();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
