// Handlers HTTP do CRM
pub mod auth;
pub mod clientes;
pub mod dashboard;
pub mod health;
pub mod perfil;
pub mod tarefas;

pub use auth::*;
pub use clientes::*;
pub use dashboard::*;
pub use health::*;
pub use perfil::*;
pub use tarefas::*;
