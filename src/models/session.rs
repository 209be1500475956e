//! Sessão do usuário autenticado
//!
//! Substitui o contexto global de autenticação: o middleware resolve o token
//! em uma `Session` e ela é passada explicitamente a cada serviço.

use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    /// Dono de todos os registros lidos e gravados nesta requisição
    pub user_id: Uuid,
    pub email: Option<String>,
    /// Token repassado ao Supabase (as políticas RLS dependem dele)
    #[serde(skip_serializing)]
    pub access_token: String,
}

impl Session {
    pub fn new(user_id: Uuid, email: Option<String>, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            email,
            access_token: access_token.into(),
        }
    }

    pub fn from_auth_user(user: supabase::AuthUser, access_token: impl Into<String>) -> Self {
        Self::new(user.id, user.email, access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_not_serialized() {
        let session = Session::new(Uuid::nil(), Some("a@b.com".into()), "segredo");
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("segredo"));
        assert!(json.contains("a@b.com"));
    }
}
