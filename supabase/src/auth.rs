//! Rotas de autenticação do Supabase (GoTrue)
//!
//! O CRM não implementa protocolo de autenticação próprio: apenas repassa
//! login/cadastro/logout e resolve um access token no usuário dono dele.

use crate::client::{read_json, SupabaseClient};
use crate::error::{Result, SupabaseError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

/// Usuário autenticado, como devolvido por `GET /auth/v1/user`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
}

/// Sessão devolvida pelo login com senha
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

/// Resultado do cadastro
///
/// Com confirmação de e-mail ligada o GoTrue devolve só o usuário;
/// sem confirmação devolve uma sessão completa.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(AuthSession),
    User(AuthUser),
}

impl SignUpResponse {
    pub fn user(&self) -> &AuthUser {
        match self {
            SignUpResponse::Session(session) => &session.user,
            SignUpResponse::User(user) => user,
        }
    }
}

/// Acesso às rotas `/auth/v1/*`
pub struct AuthClient<'a> {
    client: &'a SupabaseClient,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(client: &'a SupabaseClient) -> Self {
        Self { client }
    }

    /// Resolve um access token no usuário dono dele
    ///
    /// `GET /auth/v1/user`
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser> {
        if access_token.trim().is_empty() {
            return Err(SupabaseError::AuthError("missing access token".to_string()));
        }

        let url = self.client.url("/auth/v1/user");
        tracing::debug!("GET {}", url);

        let request = self.client.http().get(&url);
        let response = self
            .client
            .send(self.client.with_headers(request, access_token))
            .await?;
        read_json(response).await
    }

    /// Login com e-mail e senha
    ///
    /// `POST /auth/v1/token?grant_type=password`
    pub async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<AuthSession> {
        let url = self.client.url("/auth/v1/token?grant_type=password");
        tracing::debug!("POST {}", url);

        let request = self
            .client
            .http()
            .post(&url)
            .json(&json!({ "email": email, "password": password }));
        let response = self
            .client
            .send(self.client.with_headers(request, self.client.anon_key()))
            .await?;
        read_json(response).await
    }

    /// Cadastro com e-mail, senha e nome (gravado em `user_metadata.nome`)
    ///
    /// `POST /auth/v1/signup`
    pub async fn sign_up(&self, email: &str, password: &str, nome: &str) -> Result<SignUpResponse> {
        let url = self.client.url("/auth/v1/signup");
        tracing::debug!("POST {}", url);

        let request = self.client.http().post(&url).json(&json!({
            "email": email,
            "password": password,
            "data": { "nome": nome }
        }));
        let response = self
            .client
            .send(self.client.with_headers(request, self.client.anon_key()))
            .await?;
        read_json(response).await
    }

    /// Encerra a sessão do token
    ///
    /// `POST /auth/v1/logout`
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let url = self.client.url("/auth/v1/logout");
        tracing::debug!("POST {}", url);

        let request = self.client.http().post(&url);
        self.client
            .send(self.client.with_headers(request, access_token))
            .await?;
        Ok(())
    }
}
