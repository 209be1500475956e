//! Cliente HTTP para o Supabase (PostgREST)

use crate::error::{Result, SupabaseError};
use crate::query::Query;
use reqwest::{Client as HttpClient, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

/// Cliente para as tabelas do Supabase
///
/// Toda requisição leva dois cabeçalhos:
/// - `apikey`: chave anônima do projeto
/// - `Authorization: Bearer <token>`: token do usuário (as políticas RLS usam o `sub` dele)
#[derive(Clone)]
pub struct SupabaseClient {
    http_client: HttpClient,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    /// Cria um novo cliente Supabase
    ///
    /// # Timeouts
    ///
    /// - Total: 30s
    /// - Connect: 5s
    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Result<Self> {
        Self::with_timeouts(base_url, anon_key, 30, 5)
    }

    /// Cria um novo cliente com timeouts customizados
    pub fn with_timeouts(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        total_timeout_secs: u64,
        connect_timeout_secs: u64,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(SupabaseError::ConfigError("Supabase URL is empty".to_string()));
        }

        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(total_timeout_secs))
            .connect_timeout(Duration::from_secs(connect_timeout_secs))
            .build()
            .map_err(|e| SupabaseError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url,
            anon_key: anon_key.into(),
        })
    }

    /// Acesso às rotas de autenticação (GoTrue)
    pub fn auth(&self) -> crate::auth::AuthClient<'_> {
        crate::auth::AuthClient::new(self)
    }

    /// `GET /rest/v1/{tabela}` retornando todas as linhas que casam com a consulta
    pub async fn select<T: DeserializeOwned>(&self, token: &str, query: &Query) -> Result<Vec<T>> {
        let url = self.url(&query.to_path());

        tracing::debug!("GET {}", url);

        let request = self.http_client.get(&url);
        let response = self.send(self.with_headers(request, token)).await?;
        read_json(response).await
    }

    /// Igual a `select`, mas exige exatamente uma linha
    pub async fn select_one<T: DeserializeOwned>(&self, token: &str, query: &Query) -> Result<T> {
        let mut rows: Vec<T> = self.select(token, query).await?;
        if rows.is_empty() {
            return Err(SupabaseError::NotFound(format!(
                "no row in '{}' matching {}",
                query.table_name(),
                query.to_query_string()
            )));
        }
        Ok(rows.swap_remove(0))
    }

    /// `POST /rest/v1/{tabela}` com `Prefer: return=representation`
    ///
    /// Retorna a linha criada (com `id` e `created_at` preenchidos pelo banco).
    pub async fn insert<B, T>(&self, token: &str, table: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(&format!("/rest/v1/{}", table));

        tracing::debug!(
            "POST {} with body: {}",
            url,
            serde_json::to_string(body).unwrap_or_default()
        );

        let request = self
            .http_client
            .post(&url)
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.send(self.with_headers(request, token)).await?;

        let mut rows: Vec<T> = read_json(response).await?;
        if rows.is_empty() {
            return Err(SupabaseError::ApiError {
                status: 201,
                message: format!("insert into '{}' returned no rows", table),
            });
        }
        Ok(rows.swap_remove(0))
    }

    /// `PATCH /rest/v1/{tabela}?{filtros}` com `Prefer: return=representation`
    ///
    /// Retorna as linhas alteradas; vazio significa que nenhuma linha casou com os filtros.
    pub async fn update<B, T>(&self, token: &str, query: &Query, body: &B) -> Result<Vec<T>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(&query.to_path());

        tracing::debug!("PATCH {}", url);

        let request = self
            .http_client
            .patch(&url)
            .header("Prefer", "return=representation")
            .json(body);
        let response = self.send(self.with_headers(request, token)).await?;
        read_json(response).await
    }

    /// `DELETE /rest/v1/{tabela}?{filtros}`
    pub async fn delete(&self, token: &str, query: &Query) -> Result<()> {
        let url = self.url(&query.to_path());

        tracing::debug!("DELETE {}", url);

        let request = self.http_client.delete(&url);
        self.send(self.with_headers(request, token)).await?;
        Ok(())
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn http(&self) -> &HttpClient {
        &self.http_client
    }

    pub(crate) fn with_headers(&self, request: RequestBuilder, token: &str) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", token))
            .header("Content-Type", "application/json")
    }

    pub(crate) async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        self.handle_response(response).await
    }

    /// Processa a resposta HTTP e trata erros
    async fn handle_response(&self, response: Response) -> Result<Response> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let status_code = status.as_u16();
        let error_body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());

        tracing::error!("Supabase API error ({}): {}", status_code, error_body);

        // PostgREST usa "message", GoTrue usa "msg" ou "error_description"
        let message = if let Ok(json) = serde_json::from_str::<Value>(&error_body) {
            json.get("message")
                .or_else(|| json.get("msg"))
                .or_else(|| json.get("error_description"))
                .or_else(|| json.get("error"))
                .and_then(|v| v.as_str())
                .unwrap_or(&error_body)
                .to_string()
        } else {
            error_body
        };

        if status_code == 401 {
            return Err(SupabaseError::AuthError(message));
        }

        Err(SupabaseError::ApiError {
            status: status_code,
            message,
        })
    }

    /// URL base do projeto
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chave anônima do projeto
    pub fn anon_key(&self) -> &str {
        &self.anon_key
    }
}

/// Lê o corpo inteiro e decodifica; corpo fora do formato esperado vira `JsonError`
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}
