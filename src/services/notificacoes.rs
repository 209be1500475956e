//! Notificações não bloqueantes devolvidas junto com as respostas
//!
//! Equivalem aos "toasts" da interface: toda operação de escrita devolve uma
//! notificação de sucesso ou erro, e leituras que falham devolvem uma de erro
//! junto com a coleção vazia.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NivelNotificacao {
    Sucesso,
    Erro,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notificacao {
    pub nivel: NivelNotificacao,
    pub mensagem: String,
}

impl Notificacao {
    pub fn sucesso(mensagem: impl Into<String>) -> Self {
        Self {
            nivel: NivelNotificacao::Sucesso,
            mensagem: mensagem.into(),
        }
    }

    pub fn erro(mensagem: impl Into<String>) -> Self {
        Self {
            nivel: NivelNotificacao::Erro,
            mensagem: mensagem.into(),
        }
    }

    pub fn is_erro(&self) -> bool {
        self.nivel == NivelNotificacao::Erro
    }
}

/// Mensagens exibidas ao usuário
pub mod mensagens {
    pub const CAMPOS_OBRIGATORIOS: &str = "Preencha os campos obrigatórios";

    pub const CLIENTES_ERRO_CARREGAR: &str = "Erro ao carregar clientes";
    pub const CLIENTE_ADICIONADO: &str = "Cliente adicionado com sucesso";
    pub const CLIENTE_ERRO_ADICIONAR: &str = "Erro ao adicionar cliente";
    pub const CLIENTE_ATUALIZADO: &str = "Cliente atualizado com sucesso!";
    pub const CLIENTE_ERRO_ATUALIZAR: &str = "Erro ao atualizar as informações do cliente";
    pub const CLIENTE_ERRO_STATUS: &str = "Erro ao atualizar status do cliente";
    pub const CLIENTE_PRIORIDADE_ATUALIZADA: &str = "Prioridade atualizada com sucesso";
    pub const CLIENTE_ERRO_PRIORIDADE: &str = "Erro ao atualizar prioridade do cliente";
    pub const CLIENTE_EXCLUIDO: &str = "Cliente excluído com sucesso";
    pub const CLIENTE_ERRO_EXCLUIR: &str = "Erro ao excluir o cliente";
    pub const CLIENTE_NAO_ENCONTRADO: &str = "Cliente não encontrado";

    pub const TAREFAS_ERRO_CARREGAR: &str = "Erro ao carregar tarefas";
    pub const TAREFA_ADICIONADA: &str = "Tarefa adicionada com sucesso";
    pub const TAREFA_ERRO_ADICIONAR: &str = "Erro ao adicionar tarefa";
    pub const TAREFA_ATUALIZADA: &str = "Tarefa atualizada com sucesso";
    pub const TAREFA_ERRO_ATUALIZAR: &str = "Erro ao atualizar a tarefa";
    pub const TAREFA_STATUS_ATUALIZADO: &str = "Status da tarefa atualizado com sucesso";
    pub const TAREFA_ERRO_STATUS: &str = "Erro ao atualizar status da tarefa";
    pub const TAREFA_PRIORIDADE_ATUALIZADA: &str = "Prioridade da tarefa atualizada com sucesso";
    pub const TAREFA_ERRO_PRIORIDADE: &str = "Erro ao atualizar prioridade da tarefa";
    pub const TAREFA_REMOVIDA: &str = "Tarefa removida com sucesso";
    pub const TAREFA_ERRO_REMOVER: &str = "Erro ao remover a tarefa";
    pub const TAREFA_NAO_ENCONTRADA: &str = "Tarefa não encontrada";

    pub const PERFIL_ERRO_CARREGAR: &str = "Erro ao carregar o perfil";
    pub const PERFIL_ATUALIZADO: &str = "Perfil atualizado com sucesso";
    pub const PERFIL_ERRO_ATUALIZAR: &str = "Erro ao atualizar o perfil";

    pub const LOGIN_SUCESSO: &str = "Login realizado com sucesso";
    pub const LOGIN_ERRO: &str = "Email ou senha inválidos";
    pub const CADASTRO_SUCESSO: &str = "Conta criada com sucesso! Verifique seu email.";
    pub const CADASTRO_ERRO: &str = "Erro ao criar conta";
    pub const LOGOUT_SUCESSO: &str = "Você saiu da sua conta";

    pub fn cliente_status_atualizado(status: &str) -> String {
        format!("Status do cliente atualizado para {}", status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_notificacao_serialization() {
        let n = Notificacao::erro(mensagens::CLIENTE_ERRO_EXCLUIR);
        assert!(n.is_erro());
        assert_eq!(
            serde_json::to_value(&n).unwrap(),
            json!({ "nivel": "erro", "mensagem": "Erro ao excluir o cliente" })
        );
    }

    #[test]
    fn test_status_message() {
        assert_eq!(
            mensagens::cliente_status_atualizado("fechado"),
            "Status do cliente atualizado para fechado"
        );
    }
}
