//! Cliente mínimo do Supabase
//!
//! Este crate fornece uma interface tipo-segura para as duas partes do Supabase
//! usadas pelo CRM:
//!
//! - **PostgREST** (`/rest/v1`): leitura e escrita de linhas com filtros por coluna
//! - **GoTrue** (`/auth/v1`): resolução do usuário dono de um access token,
//!   login, cadastro e logout
//!
//! Todas as chamadas de tabela recebem o access token do usuário; as políticas
//! RLS do banco e o filtro explícito por `user_id` garantem o isolamento entre
//! usuários.
//!
//! # Exemplo Básico
//!
//! ```rust,ignore
//! use supabase::{Query, SupabaseClient};
//!
//! #[tokio::main]
//! async fn main() -> supabase::Result<()> {
//!     let url = std::env::var("SUPABASE_URL").expect("SUPABASE_URL não configurado");
//!     let anon_key = std::env::var("SUPABASE_ANON_KEY").expect("SUPABASE_ANON_KEY não configurado");
//!
//!     let client = SupabaseClient::new(url, anon_key)?;
//!     let user = client.auth().get_user(&token).await?;
//!
//!     let query = Query::table("clientes")
//!         .eq("user_id", user.id)
//!         .order("created_at", false);
//!     let rows: Vec<serde_json::Value> = client.select(&token, &query).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod error;
pub mod query;

pub use auth::{AuthSession, AuthUser, SignUpResponse};
pub use client::SupabaseClient;
pub use error::{Result, SupabaseError};
pub use query::Query;
