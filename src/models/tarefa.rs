//! Tarefa do quadro (tabela `tarefas`)
//!
//! `cliente` é texto livre (nome digitado no formulário), não chave estrangeira.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{emblema_prioridade, emblema_status_tarefa, Emblema, Prioridade, StatusTarefa};
use super::{campo_obrigatorio, texto_opcional, validar_prioridade};
use crate::utils::currency::{normalize_currency, parse_currency};
use crate::utils::dates::{format_date_local, to_iso_date_or_null};
use crate::utils::error::{AppError, AppResult};

pub const TABELA: &str = "tarefas";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tarefa {
    pub id: Uuid,
    pub user_id: Uuid,
    pub titulo: String,
    #[serde(default)]
    pub descricao: Option<String>,
    #[serde(default)]
    pub cliente: Option<String>,
    #[serde(default)]
    pub valor_contrato: Option<String>,
    #[serde(default)]
    pub responsavel: Option<String>,
    #[serde(default)]
    pub data_entrega: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub prioridade: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub criado_em: Option<DateTime<Utc>>,
}

impl Tarefa {
    pub fn valor(&self) -> f64 {
        parse_currency(self.valor_contrato.as_deref())
    }

    /// Coluna do quadro; status desconhecido cai em `a_fazer`
    pub fn coluna(&self) -> StatusTarefa {
        StatusTarefa::parse(&self.status).unwrap_or_default()
    }

    pub fn emblema_status(&self) -> Emblema {
        emblema_status_tarefa(&self.status)
    }

    pub fn emblema_prioridade(&self) -> Emblema {
        emblema_prioridade(&self.prioridade)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TarefaView {
    #[serde(flatten)]
    pub tarefa: Tarefa,
    pub valor_numerico: f64,
    pub status_emblema: Emblema,
    pub prioridade_emblema: Emblema,
    pub data_entrega_exibicao: String,
    pub criada_em_exibicao: String,
}

impl From<Tarefa> for TarefaView {
    fn from(tarefa: Tarefa) -> Self {
        let criada_em = tarefa.criado_em.unwrap_or(tarefa.created_at);
        Self {
            valor_numerico: tarefa.valor(),
            status_emblema: tarefa.emblema_status(),
            prioridade_emblema: tarefa.emblema_prioridade(),
            data_entrega_exibicao: format_date_local(tarefa.data_entrega.as_deref()),
            criada_em_exibicao: format_date_local(criada_em),
            tarefa,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NovaTarefa {
    #[serde(default)]
    pub titulo: String,
    pub descricao: Option<String>,
    #[serde(default)]
    pub cliente: String,
    pub valor_contrato: Option<String>,
    pub responsavel: Option<String>,
    pub data_entrega: Option<String>,
    pub status: Option<String>,
    pub prioridade: Option<String>,
}

/// Corpo gravado no `POST /rest/v1/tarefas`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TarefaInsert {
    pub user_id: Uuid,
    pub titulo: String,
    pub descricao: Option<String>,
    pub cliente: String,
    pub valor_contrato: Option<String>,
    pub responsavel: Option<String>,
    pub data_entrega: Option<String>,
    pub status: String,
    pub prioridade: String,
}

impl NovaTarefa {
    /// Obrigatórios: título e cliente. Padrões: `a_fazer`, `media`.
    pub fn into_insert(self, user_id: Uuid) -> AppResult<TarefaInsert> {
        let titulo = campo_obrigatorio("titulo", &self.titulo)?;
        let cliente = campo_obrigatorio("cliente", &self.cliente)?;

        let status = match texto_opcional(self.status) {
            Some(status) => validar_status_tarefa(&status)?,
            None => StatusTarefa::default(),
        };
        let prioridade = match texto_opcional(self.prioridade) {
            Some(prioridade) => validar_prioridade(&prioridade)?,
            None => Prioridade::default(),
        };

        Ok(TarefaInsert {
            user_id,
            titulo,
            descricao: texto_opcional(self.descricao),
            cliente,
            valor_contrato: normalize_currency(self.valor_contrato.as_deref()),
            responsavel: texto_opcional(self.responsavel),
            data_entrega: self.data_entrega.as_deref().and_then(|d| to_iso_date_or_null(d)),
            status: status.as_str().to_string(),
            prioridade: prioridade.as_str().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TarefaPatch {
    pub titulo: Option<String>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub descricao: Option<Option<String>>,
    pub cliente: Option<String>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub valor_contrato: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub responsavel: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub data_entrega: Option<Option<String>>,
    pub status: Option<String>,
    pub prioridade: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TarefaUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub titulo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub descricao: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cliente: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_contrato: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsavel: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_entrega: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prioridade: Option<String>,
}

impl TarefaPatch {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    pub fn prioridade(prioridade: impl Into<String>) -> Self {
        Self {
            prioridade: Some(prioridade.into()),
            ..Default::default()
        }
    }

    pub fn into_update(self) -> AppResult<TarefaUpdate> {
        let update = TarefaUpdate {
            titulo: self.titulo.map(|v| campo_obrigatorio("titulo", &v)).transpose()?,
            descricao: self.descricao.map(texto_opcional),
            cliente: self.cliente.map(|v| campo_obrigatorio("cliente", &v)).transpose()?,
            valor_contrato: self.valor_contrato.map(|v| normalize_currency(v.as_deref())),
            responsavel: self.responsavel.map(texto_opcional),
            data_entrega: self.data_entrega.map(|d| to_iso_date_or_null(d.as_deref())),
            status: self
                .status
                .map(|s| validar_status_tarefa(s.trim()).map(|s| s.as_str().to_string()))
                .transpose()?,
            prioridade: self
                .prioridade
                .map(|p| validar_prioridade(p.trim()).map(|p| p.as_str().to_string()))
                .transpose()?,
        };

        if update.campos().is_empty() {
            return Err(AppError::ValidationError("Nenhum campo para atualizar".to_string()));
        }

        Ok(update)
    }
}

impl TarefaUpdate {
    pub fn campos(&self) -> Vec<&'static str> {
        [
            ("titulo", self.titulo.is_some()),
            ("descricao", self.descricao.is_some()),
            ("cliente", self.cliente.is_some()),
            ("valor_contrato", self.valor_contrato.is_some()),
            ("responsavel", self.responsavel.is_some()),
            ("data_entrega", self.data_entrega.is_some()),
            ("status", self.status.is_some()),
            ("prioridade", self.prioridade.is_some()),
        ]
        .into_iter()
        .filter_map(|(campo, presente)| presente.then_some(campo))
        .collect()
    }
}

fn validar_status_tarefa(valor: &str) -> AppResult<StatusTarefa> {
    StatusTarefa::parse(valor)
        .ok_or_else(|| AppError::ValidationError(format!("Status inválido: {}", valor)))
}
