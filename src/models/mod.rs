pub mod cliente;
pub mod perfil;
pub mod session;
pub mod status;
pub mod tarefa;

pub use cliente::{Cliente, ClientePatch, ClienteView, NovoCliente};
pub use perfil::{Perfil, PerfilPatch};
pub use session::Session;
pub use status::{Emblema, Prioridade, StatusCliente, StatusTarefa};
pub use tarefa::{NovaTarefa, Tarefa, TarefaPatch, TarefaView};

use serde::{Deserialize, Deserializer};

use crate::utils::error::{campos_obrigatorios, AppError, AppResult};
use crate::utils::logging::log_validation_error;

/// Campo de texto obrigatório: apara espaços e rejeita vazio
pub(crate) fn campo_obrigatorio(campo: &str, valor: &str) -> AppResult<String> {
    let valor = valor.trim();
    if valor.is_empty() {
        log_validation_error(campo, "campo obrigatório vazio");
        return Err(campos_obrigatorios());
    }
    Ok(valor.to_string())
}

/// Campo anulável de patch: ausente vira `None`, `null` vira `Some(None)`
///
/// Usar junto com `#[serde(default)]` para que o campo ausente continue `None`.
pub(crate) fn campo_anulavel<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Campo de texto opcional: vazio ou só espaços vira `None`
pub(crate) fn texto_opcional(valor: Option<String>) -> Option<String> {
    valor
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn validar_prioridade(valor: &str) -> AppResult<Prioridade> {
    Prioridade::parse(valor)
        .ok_or_else(|| AppError::ValidationError(format!("Prioridade inválida: {}", valor)))
}
