//! Perfil do usuário (tabela `perfis`, `id` = id do usuário no auth)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::texto_opcional;
use crate::utils::error::{AppError, AppResult};

pub const TABELA: &str = "perfis";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Perfil {
    pub id: Uuid,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub cargo: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub criado_em: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PerfilPatch {
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub nome: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub cargo: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub avatar_url: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerfilUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cargo: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<Option<String>>,
}

impl PerfilPatch {
    pub fn into_update(self) -> AppResult<PerfilUpdate> {
        let update = PerfilUpdate {
            nome: self.nome.map(texto_opcional),
            cargo: self.cargo.map(texto_opcional),
            avatar_url: self.avatar_url.map(texto_opcional),
        };

        if update == PerfilUpdate::default() {
            return Err(AppError::ValidationError("Nenhum campo para atualizar".to_string()));
        }
        Ok(update)
    }
}
