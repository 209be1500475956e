pub mod clientes;
pub mod dashboard;
pub mod filtros;
pub mod notificacoes;
pub mod perfis;
pub mod query_cache;
pub mod tarefas;

pub use clientes::ClientesService;
pub use filtros::{FiltroClientes, FiltroTarefas, QuadroTarefas};
pub use notificacoes::{NivelNotificacao, Notificacao};
pub use perfis::PerfisService;
pub use query_cache::{ChaveConsulta, Entidade, QueryCache};
pub use tarefas::TarefasService;

use serde::Serialize;

/// Resultado de uma leitura de lista: os dados e, se a leitura falhou, a
/// notificação de erro (os dados vêm vazios nesse caso)
#[derive(Debug, Clone, Serialize)]
pub struct Carregamento<T> {
    pub dados: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notificacao: Option<Notificacao>,
}

impl<T> Carregamento<T> {
    pub fn ok(dados: T) -> Self {
        Self {
            dados,
            notificacao: None,
        }
    }

    pub fn erro(dados: T, mensagem: &str) -> Self {
        Self {
            dados,
            notificacao: Some(Notificacao::erro(mensagem)),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Carregamento<U> {
        Carregamento {
            dados: f(self.dados),
            notificacao: self.notificacao,
        }
    }
}

/// Resultado de uma escrita bem sucedida
#[derive(Debug, Clone, Serialize)]
pub struct Mutacao<T> {
    pub registro: T,
    pub notificacao: Notificacao,
}

impl<T> Mutacao<T> {
    pub fn new(registro: T, notificacao: Notificacao) -> Self {
        Self {
            registro,
            notificacao,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mutacao<U> {
        Mutacao {
            registro: f(self.registro),
            notificacao: self.notificacao,
        }
    }
}
