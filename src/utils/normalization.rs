//! Normalização de texto para a busca das listas
//!
//! A busca das telas de clientes e tarefas ignora maiúsculas e acentos:
//! "negociacao" encontra "Negociação", "joao" encontra "João".

use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Remove acentos, converte para lowercase e colapsa espaços
/// usando NFKD (Normalization Form Compatibility Decomposition)
///
/// # Exemplos
/// ```
/// use crm_clientes::utils::normalization::normalize_string;
///
/// assert_eq!(normalize_string("  João   Silva  "), "joao silva");
/// assert_eq!(normalize_string("Negociação"), "negociacao");
/// assert_eq!(normalize_string("ana@empresa.com.br"), "ana@empresa.com.br");
/// ```
pub fn normalize_string(input: &str) -> String {
    input
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Verifica se algum dos campos contém o termo buscado (após normalização)
///
/// Termo vazio casa com tudo, como na busca das listas. Campos `None` são ignorados.
pub fn contains_term<'a, I>(campos: I, termo: &str) -> bool
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let termo = normalize_string(termo);
    if termo.is_empty() {
        return true;
    }

    campos
        .into_iter()
        .flatten()
        .any(|campo| normalize_string(campo).contains(&termo))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_string() {
        assert_eq!(normalize_string("Café & Cia"), "cafe & cia");
        assert_eq!(normalize_string("INOVAÇÃO   Tech"), "inovacao tech");
        assert_eq!(normalize_string(""), "");
    }

    #[test]
    fn test_contains_term() {
        let campos = [Some("Inovação Tech"), None, Some("contato@inovacao.com")];
        assert!(contains_term(campos, "inovacao"));
        assert!(contains_term(campos, "TECH"));
        assert!(contains_term(campos, "  "));
        assert!(!contains_term(campos, "marketing"));
    }

    #[test]
    fn test_contains_term_no_fields() {
        let vazio: [Option<&str>; 0] = [];
        assert!(!contains_term(vazio, "x"));
        assert!(contains_term(vazio, ""));
    }
}
