//! Registro de cliente (tabela `clientes`)
//!
//! Três formatos convivem aqui:
//! - `Cliente`: a linha como vem do banco
//! - `NovoCliente` → `ClienteInsert`: formulário de criação e o corpo gravado
//! - `ClientePatch` → `ClienteUpdate`: edição parcial com campos em lista branca

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::status::{emblema_prioridade, emblema_status_cliente, Emblema, Prioridade, StatusCliente};
use super::{campo_obrigatorio, texto_opcional, validar_prioridade};
use crate::utils::currency::{normalize_currency, parse_currency};
use crate::utils::dates::{format_date_local, hoje_iso, parse_date, to_iso_date_or_null};
use crate::utils::error::{AppError, AppResult};

pub const TABELA: &str = "clientes";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cliente {
    pub id: Uuid,
    pub user_id: Uuid,
    pub nome: String,
    pub empresa: String,
    pub email: String,
    #[serde(default)]
    pub telefone: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub prioridade: String,
    /// Texto de exibição, ex.: "R$ 12.345,67"
    #[serde(default)]
    pub valor_estimado: Option<String>,
    #[serde(default)]
    pub responsavel: Option<String>,
    #[serde(default)]
    pub links: Option<String>,
    #[serde(default)]
    pub ultimo_contato: Option<String>,
    #[serde(default)]
    pub data_fechamento: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Cliente {
    /// Valor estimado como número (0 quando vazio ou ilegível)
    pub fn valor(&self) -> f64 {
        parse_currency(self.valor_estimado.as_deref())
    }

    pub fn status_conhecido(&self) -> Option<StatusCliente> {
        StatusCliente::parse(&self.status)
    }

    pub fn fechado_em(&self) -> Option<NaiveDate> {
        self.data_fechamento.as_deref().and_then(parse_date)
    }

    pub fn emblema_status(&self) -> Emblema {
        emblema_status_cliente(&self.status)
    }

    pub fn emblema_prioridade(&self) -> Emblema {
        emblema_prioridade(&self.prioridade)
    }
}

/// Cliente pronto para a lista: linha original + campos derivados de exibição
#[derive(Debug, Clone, Serialize)]
pub struct ClienteView {
    #[serde(flatten)]
    pub cliente: Cliente,
    pub valor_numerico: f64,
    pub status_emblema: Emblema,
    pub prioridade_emblema: Emblema,
    pub ultimo_contato_exibicao: String,
    pub data_fechamento_exibicao: String,
}

impl From<Cliente> for ClienteView {
    fn from(cliente: Cliente) -> Self {
        Self {
            valor_numerico: cliente.valor(),
            status_emblema: cliente.emblema_status(),
            prioridade_emblema: cliente.emblema_prioridade(),
            ultimo_contato_exibicao: format_date_local(cliente.ultimo_contato.as_deref()),
            data_fechamento_exibicao: format_date_local(cliente.data_fechamento.as_deref()),
            cliente,
        }
    }
}

/// Formulário de criação
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NovoCliente {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub empresa: String,
    #[serde(default)]
    pub email: String,
    pub telefone: Option<String>,
    pub status: Option<String>,
    pub prioridade: Option<String>,
    pub valor_estimado: Option<String>,
    pub responsavel: Option<String>,
    pub links: Option<String>,
    pub ultimo_contato: Option<String>,
    pub data_fechamento: Option<String>,
}

/// Corpo gravado no `POST /rest/v1/clientes`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClienteInsert {
    pub user_id: Uuid,
    pub nome: String,
    pub empresa: String,
    pub email: String,
    pub telefone: Option<String>,
    pub status: String,
    pub prioridade: String,
    pub valor_estimado: Option<String>,
    pub responsavel: Option<String>,
    pub links: Option<String>,
    pub ultimo_contato: Option<String>,
    pub data_fechamento: Option<String>,
}

impl NovoCliente {
    /// Valida e normaliza o formulário, carimbando o dono do registro
    ///
    /// Obrigatórios: nome, empresa e email. Padrões: status `lead`,
    /// prioridade `media`, último contato hoje.
    pub fn into_insert(self, user_id: Uuid) -> AppResult<ClienteInsert> {
        let nome = campo_obrigatorio("nome", &self.nome)?;
        let empresa = campo_obrigatorio("empresa", &self.empresa)?;
        let email = campo_obrigatorio("email", &self.email)?;

        let status = match texto_opcional(self.status) {
            Some(status) => validar_status_cliente(&status)?,
            None => StatusCliente::default(),
        };
        let prioridade = match texto_opcional(self.prioridade) {
            Some(prioridade) => validar_prioridade(&prioridade)?,
            None => Prioridade::default(),
        };

        let ultimo_contato = match texto_opcional(self.ultimo_contato) {
            Some(data) => to_iso_date_or_null(data.as_str()),
            None => Some(hoje_iso()),
        };

        Ok(ClienteInsert {
            user_id,
            nome,
            empresa,
            email,
            telefone: texto_opcional(self.telefone),
            status: status.as_str().to_string(),
            prioridade: prioridade.as_str().to_string(),
            valor_estimado: normalize_currency(self.valor_estimado.as_deref()),
            responsavel: texto_opcional(self.responsavel),
            links: texto_opcional(self.links),
            ultimo_contato,
            data_fechamento: self
                .data_fechamento
                .as_deref()
                .and_then(|d| to_iso_date_or_null(d)),
        })
    }
}

/// Edição parcial vinda do diálogo de edição
///
/// Só estes campos podem ser alterados; `id`, `user_id` e `created_at`
/// enviados pelo formulário são descartados na desserialização.
/// Nos campos opcionais, `null` e `""` limpam a coluna.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientePatch {
    pub nome: Option<String>,
    pub empresa: Option<String>,
    pub email: Option<String>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub telefone: Option<Option<String>>,
    pub status: Option<String>,
    pub prioridade: Option<String>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub valor_estimado: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub responsavel: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub links: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub ultimo_contato: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::campo_anulavel")]
    pub data_fechamento: Option<Option<String>>,
}

/// Corpo do `PATCH`: campo ausente não é enviado, `Some(None)` grava nulo
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClienteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empresa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub telefone: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prioridade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valor_estimado: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsavel: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ultimo_contato: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_fechamento: Option<Option<String>>,
}

impl ClientePatch {
    /// Patch do editor de status em linha
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: Some(status.into()),
            ..Default::default()
        }
    }

    /// Patch do editor de prioridade em linha
    pub fn prioridade(prioridade: impl Into<String>) -> Self {
        Self {
            prioridade: Some(prioridade.into()),
            ..Default::default()
        }
    }

    pub fn into_update(self) -> AppResult<ClienteUpdate> {
        let obrigatorio = |campo: &str, valor: Option<String>| -> AppResult<Option<String>> {
            valor.map(|v| campo_obrigatorio(campo, &v)).transpose()
        };

        let update = ClienteUpdate {
            nome: obrigatorio("nome", self.nome)?,
            empresa: obrigatorio("empresa", self.empresa)?,
            email: obrigatorio("email", self.email)?,
            telefone: self.telefone.map(texto_opcional),
            status: self
                .status
                .map(|s| validar_status_cliente(s.trim()).map(|s| s.as_str().to_string()))
                .transpose()?,
            prioridade: self
                .prioridade
                .map(|p| validar_prioridade(p.trim()).map(|p| p.as_str().to_string()))
                .transpose()?,
            valor_estimado: self.valor_estimado.map(|v| normalize_currency(v.as_deref())),
            responsavel: self.responsavel.map(texto_opcional),
            links: self.links.map(texto_opcional),
            ultimo_contato: self.ultimo_contato.map(|d| to_iso_date_or_null(d.as_deref())),
            data_fechamento: self.data_fechamento.map(|d| to_iso_date_or_null(d.as_deref())),
        };

        if update.campos().is_empty() {
            return Err(AppError::ValidationError("Nenhum campo para atualizar".to_string()));
        }

        Ok(update)
    }
}

impl ClienteUpdate {
    /// Nomes dos campos presentes no patch (para log)
    pub fn campos(&self) -> Vec<&'static str> {
        let presentes = [
            ("nome", self.nome.is_some()),
            ("empresa", self.empresa.is_some()),
            ("email", self.email.is_some()),
            ("telefone", self.telefone.is_some()),
            ("status", self.status.is_some()),
            ("prioridade", self.prioridade.is_some()),
            ("valor_estimado", self.valor_estimado.is_some()),
            ("responsavel", self.responsavel.is_some()),
            ("links", self.links.is_some()),
            ("ultimo_contato", self.ultimo_contato.is_some()),
            ("data_fechamento", self.data_fechamento.is_some()),
        ];
        presentes
            .into_iter()
            .filter_map(|(campo, presente)| presente.then_some(campo))
            .collect()
    }
}

fn validar_status_cliente(valor: &str) -> AppResult<StatusCliente> {
    StatusCliente::parse(valor)
        .ok_or_else(|| AppError::ValidationError(format!("Status inválido: {}", valor)))
}
