//! Status e prioridades de clientes e tarefas
//!
//! Os registros guardam o valor cru (string) vindo do banco; estes enums
//! definem o conjunto conhecido, o rótulo e a cor de cada valor.
//! Valores fora do conjunto nunca são erro: são exibidos com o emblema padrão.
//!
//! Não há grafo de transição: qualquer status pode ir para qualquer outro.

use serde::{Deserialize, Serialize};

/// Cor neutra usada para valores desconhecidos
pub const COR_PADRAO: &str = "#9CA3AF";

/// Rótulo e cor prontos para exibição
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emblema {
    pub valor: String,
    pub rotulo: String,
    pub cor: String,
    /// `false` quando o valor não pertence ao conjunto conhecido
    pub conhecido: bool,
}

impl Emblema {
    fn padrao(valor: &str, rotulo_vazio: &str) -> Self {
        let rotulo = if valor.trim().is_empty() {
            rotulo_vazio.to_string()
        } else {
            valor.to_string()
        };
        Self {
            valor: valor.to_string(),
            rotulo,
            cor: COR_PADRAO.to_string(),
            conhecido: false,
        }
    }
}

/// Etapas do pipeline de clientes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusCliente {
    Lead,
    Novo,
    Qualificado,
    Desqualificado,
    Negociacao,
    Fechado,
    Perdido,
}

impl StatusCliente {
    /// Ordem de exibição no pipeline
    pub const TODOS: [StatusCliente; 7] = [
        StatusCliente::Lead,
        StatusCliente::Novo,
        StatusCliente::Qualificado,
        StatusCliente::Negociacao,
        StatusCliente::Fechado,
        StatusCliente::Perdido,
        StatusCliente::Desqualificado,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusCliente::Lead => "lead",
            StatusCliente::Novo => "novo",
            StatusCliente::Qualificado => "qualificado",
            StatusCliente::Desqualificado => "desqualificado",
            StatusCliente::Negociacao => "negociacao",
            StatusCliente::Fechado => "fechado",
            StatusCliente::Perdido => "perdido",
        }
    }

    pub fn parse(valor: &str) -> Option<Self> {
        Self::TODOS.into_iter().find(|s| s.as_str() == valor)
    }

    pub fn rotulo(&self) -> &'static str {
        match self {
            StatusCliente::Lead => "Lead",
            StatusCliente::Novo => "Novo",
            StatusCliente::Qualificado => "Qualificado",
            StatusCliente::Desqualificado => "Desqualificado",
            StatusCliente::Negociacao => "Negociação",
            StatusCliente::Fechado => "Fechado",
            StatusCliente::Perdido => "Perdido",
        }
    }

    pub fn cor(&self) -> &'static str {
        match self {
            StatusCliente::Lead => "#E5E7EB",
            StatusCliente::Novo => "#A78BFA",
            StatusCliente::Qualificado => "#93C5FD",
            StatusCliente::Desqualificado => "#FB923C",
            StatusCliente::Negociacao => "#4A5FC1",
            StatusCliente::Fechado => "#10B981",
            StatusCliente::Perdido => "#EF4444",
        }
    }

    /// Clientes que ainda contam como carteira ativa
    pub fn is_ativo(&self) -> bool {
        !matches!(self, StatusCliente::Perdido | StatusCliente::Desqualificado)
    }

    /// Negócios ainda em aberto (entram na projeção de ganhos)
    pub fn is_em_aberto(&self) -> bool {
        self.is_ativo() && *self != StatusCliente::Fechado
    }

    pub fn emblema(&self) -> Emblema {
        Emblema {
            valor: self.as_str().to_string(),
            rotulo: self.rotulo().to_string(),
            cor: self.cor().to_string(),
            conhecido: true,
        }
    }
}

impl Default for StatusCliente {
    fn default() -> Self {
        StatusCliente::Lead
    }
}

impl std::fmt::Display for StatusCliente {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Prioridade, compartilhada por clientes e tarefas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prioridade {
    Alta,
    Media,
    Baixa,
}

impl Prioridade {
    pub const TODAS: [Prioridade; 3] = [Prioridade::Alta, Prioridade::Media, Prioridade::Baixa];

    pub fn as_str(&self) -> &'static str {
        match self {
            Prioridade::Alta => "alta",
            Prioridade::Media => "media",
            Prioridade::Baixa => "baixa",
        }
    }

    pub fn parse(valor: &str) -> Option<Self> {
        Self::TODAS.into_iter().find(|p| p.as_str() == valor)
    }

    pub fn rotulo(&self) -> &'static str {
        match self {
            Prioridade::Alta => "Alta",
            Prioridade::Media => "Média",
            Prioridade::Baixa => "Baixa",
        }
    }

    pub fn cor(&self) -> &'static str {
        match self {
            Prioridade::Alta => "#EF4444",
            Prioridade::Media => "#F59E0B",
            Prioridade::Baixa => "#10B981",
        }
    }

    pub fn emblema(&self) -> Emblema {
        Emblema {
            valor: self.as_str().to_string(),
            rotulo: self.rotulo().to_string(),
            cor: self.cor().to_string(),
            conhecido: true,
        }
    }
}

impl Default for Prioridade {
    fn default() -> Self {
        Prioridade::Media
    }
}

impl std::fmt::Display for Prioridade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Colunas do quadro de tarefas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusTarefa {
    AFazer,
    EmAndamento,
    Concluido,
}

impl StatusTarefa {
    pub const TODOS: [StatusTarefa; 3] = [
        StatusTarefa::AFazer,
        StatusTarefa::EmAndamento,
        StatusTarefa::Concluido,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatusTarefa::AFazer => "a_fazer",
            StatusTarefa::EmAndamento => "em_andamento",
            StatusTarefa::Concluido => "concluido",
        }
    }

    pub fn parse(valor: &str) -> Option<Self> {
        Self::TODOS.into_iter().find(|s| s.as_str() == valor)
    }

    pub fn rotulo(&self) -> &'static str {
        match self {
            StatusTarefa::AFazer => "A Fazer",
            StatusTarefa::EmAndamento => "Em Andamento",
            StatusTarefa::Concluido => "Concluído",
        }
    }

    pub fn cor(&self) -> &'static str {
        match self {
            StatusTarefa::AFazer => "#E5E7EB",
            StatusTarefa::EmAndamento => "#93C5FD",
            StatusTarefa::Concluido => "#10B981",
        }
    }

    pub fn emblema(&self) -> Emblema {
        Emblema {
            valor: self.as_str().to_string(),
            rotulo: self.rotulo().to_string(),
            cor: self.cor().to_string(),
            conhecido: true,
        }
    }
}

impl Default for StatusTarefa {
    fn default() -> Self {
        StatusTarefa::AFazer
    }
}

impl std::fmt::Display for StatusTarefa {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn emblema_status_cliente(valor: &str) -> Emblema {
    StatusCliente::parse(valor)
        .map(|s| s.emblema())
        .unwrap_or_else(|| Emblema::padrao(valor, "Sem status"))
}

pub fn emblema_prioridade(valor: &str) -> Emblema {
    Prioridade::parse(valor)
        .map(|p| p.emblema())
        .unwrap_or_else(|| Emblema::padrao(valor, "Sem prioridade"))
}

pub fn emblema_status_tarefa(valor: &str) -> Emblema {
    StatusTarefa::parse(valor)
        .map(|s| s.emblema())
        .unwrap_or_else(|| Emblema::padrao(valor, "Sem status"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_cliente_round_trip() {
        for status in StatusCliente::TODOS {
            assert_eq!(StatusCliente::parse(status.as_str()), Some(status));
        }
        assert_eq!(StatusCliente::default(), StatusCliente::Lead);
        assert_eq!(StatusCliente::Negociacao.rotulo(), "Negociação");
    }

    #[test]
    fn test_status_cliente_serde_matches_as_str() {
        let json = serde_json::to_string(&StatusCliente::Negociacao).unwrap();
        assert_eq!(json, "\"negociacao\"");
        let json = serde_json::to_string(&StatusTarefa::EmAndamento).unwrap();
        assert_eq!(json, "\"em_andamento\"");
    }

    #[test]
    fn test_unknown_status_fallback() {
        let emblema = emblema_status_cliente("arquivado");
        assert_eq!(emblema.rotulo, "arquivado");
        assert_eq!(emblema.cor, COR_PADRAO);
        assert!(!emblema.conhecido);

        let vazio = emblema_status_cliente("");
        assert_eq!(vazio.rotulo, "Sem status");

        assert_eq!(emblema_prioridade("urgente").cor, COR_PADRAO);
        assert_eq!(emblema_prioridade(" ").rotulo, "Sem prioridade");
        assert_eq!(emblema_status_tarefa("bloqueada").rotulo, "bloqueada");
    }

    #[test]
    fn test_known_emblems() {
        let fechado = emblema_status_cliente("fechado");
        assert_eq!(fechado.rotulo, "Fechado");
        assert_eq!(fechado.cor, "#10B981");
        assert!(fechado.conhecido);

        assert_eq!(emblema_prioridade("media").rotulo, "Média");
        assert_eq!(emblema_status_tarefa("concluido").rotulo, "Concluído");
    }

    #[test]
    fn test_pipeline_flags() {
        assert!(StatusCliente::Negociacao.is_em_aberto());
        assert!(!StatusCliente::Fechado.is_em_aberto());
        assert!(StatusCliente::Fechado.is_ativo());
        assert!(!StatusCliente::Perdido.is_ativo());
        assert!(!StatusCliente::Desqualificado.is_em_aberto());
    }
}
