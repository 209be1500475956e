//! Filtros das listas e agrupamento do quadro de tarefas

use serde::{Deserialize, Serialize};

use crate::models::{Cliente, StatusTarefa, Tarefa};
use crate::utils::logging::log_unknown_status;
use crate::utils::normalization::contains_term;

/// Status vazio ou "todos" não filtra
fn status_filtrado(status: &Option<String>) -> Option<&str> {
    status
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && *s != "todos")
}

/// Query string de `GET /clientes`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroClientes {
    pub busca: Option<String>,
    pub status: Option<String>,
}

impl FiltroClientes {
    /// Busca em nome, empresa e email, sem diferenciar maiúsculas e acentos
    pub fn aceita(&self, cliente: &Cliente) -> bool {
        if let Some(status) = status_filtrado(&self.status) {
            if cliente.status != status {
                return false;
            }
        }

        let termo = self.busca.as_deref().unwrap_or_default();
        contains_term(
            [
                Some(cliente.nome.as_str()),
                Some(cliente.empresa.as_str()),
                Some(cliente.email.as_str()),
            ],
            termo,
        )
    }

    pub fn aplicar(&self, clientes: Vec<Cliente>) -> Vec<Cliente> {
        clientes.into_iter().filter(|c| self.aceita(c)).collect()
    }
}

/// Query string de `GET /tarefas` e `GET /tarefas/quadro`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FiltroTarefas {
    pub busca: Option<String>,
    pub status: Option<String>,
}

impl FiltroTarefas {
    /// Busca em título, cliente e responsável
    pub fn aceita(&self, tarefa: &Tarefa) -> bool {
        if let Some(status) = status_filtrado(&self.status) {
            if tarefa.status != status {
                return false;
            }
        }

        let termo = self.busca.as_deref().unwrap_or_default();
        contains_term(
            [
                Some(tarefa.titulo.as_str()),
                tarefa.cliente.as_deref(),
                tarefa.responsavel.as_deref(),
            ],
            termo,
        )
    }

    pub fn aplicar(&self, tarefas: Vec<Tarefa>) -> Vec<Tarefa> {
        tarefas.into_iter().filter(|t| self.aceita(t)).collect()
    }
}

/// Colunas do quadro kanban
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuadroTarefas {
    pub a_fazer: Vec<Tarefa>,
    pub em_andamento: Vec<Tarefa>,
    pub concluido: Vec<Tarefa>,
}

impl QuadroTarefas {
    pub fn coluna(&self, status: StatusTarefa) -> &[Tarefa] {
        match status {
            StatusTarefa::AFazer => &self.a_fazer,
            StatusTarefa::EmAndamento => &self.em_andamento,
            StatusTarefa::Concluido => &self.concluido,
        }
    }

    pub fn total(&self) -> usize {
        self.a_fazer.len() + self.em_andamento.len() + self.concluido.len()
    }
}

/// Distribui as tarefas nas colunas, mantendo a ordem de entrada
pub fn quadro_tarefas(tarefas: Vec<Tarefa>) -> QuadroTarefas {
    let mut quadro = QuadroTarefas::default();
    for tarefa in tarefas {
        if !tarefa.emblema_status().conhecido {
            log_unknown_status("tarefa", &tarefa.status);
        }
        match tarefa.coluna() {
            StatusTarefa::AFazer => quadro.a_fazer.push(tarefa),
            StatusTarefa::EmAndamento => quadro.em_andamento.push(tarefa),
            StatusTarefa::Concluido => quadro.concluido.push(tarefa),
        }
    }
    quadro
}
