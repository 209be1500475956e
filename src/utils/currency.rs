//! Conversão entre valores monetários em reais e números
//!
//! Os valores são gravados no banco como texto de exibição ("R$ 12.345,67"),
//! mas toda agregação do dashboard trabalha sobre o número equivalente.
//! As funções daqui são totais: nunca entram em pânico e degradam para 0.

use once_cell::sync::Lazy;
use regex::Regex;

/// Símbolo da moeda usado na exibição
pub const SIMBOLO_MOEDA: &str = "R$";

/// Maior prefixo numérico aceito depois da limpeza (mesma regra de um parseFloat)
static PREFIXO_NUMERICO: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?").expect("regex de moeda válida")
});

/// Extrai o número de um texto monetário no formato brasileiro
///
/// Remove o símbolo "R$" e os pontos de milhar, troca a vírgula decimal por ponto
/// e lê o maior prefixo numérico. Entrada nula, vazia, ilegível ou que resulte em
/// número não finito retorna 0.
///
/// # Exemplos
/// ```
/// use crm_clientes::utils::currency::parse_currency;
///
/// assert_eq!(parse_currency(Some("R$ 1.234,56")), 1234.56);
/// assert_eq!(parse_currency(Some("R$ 10.000")), 10000.0);
/// assert_eq!(parse_currency(Some("garbage")), 0.0);
/// assert_eq!(parse_currency(None), 0.0);
/// ```
pub fn parse_currency(text: Option<&str>) -> f64 {
    let Some(text) = text else {
        return 0.0;
    };

    let limpo = text
        .replacen(SIMBOLO_MOEDA, "", 1)
        .replace('.', "")
        .replacen(',', ".", 1);
    let limpo = limpo.trim();

    PREFIXO_NUMERICO
        .find(limpo)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|valor| valor.is_finite())
        .unwrap_or(0.0)
}

/// Formata um número como moeda brasileira: `R$ 1.234,50`
///
/// Sempre duas casas decimais, ponto como separador de milhar e vírgula decimal.
/// Valores não finitos viram `R$ 0,00`.
///
/// # Exemplos
/// ```
/// use crm_clientes::utils::currency::format_currency;
///
/// assert_eq!(format_currency(1234.5), "R$ 1.234,50");
/// assert_eq!(format_currency(0.0), "R$ 0,00");
/// ```
pub fn format_currency(value: f64) -> String {
    if !value.is_finite() {
        return format!("{} 0,00", SIMBOLO_MOEDA);
    }

    let fixo = format!("{:.2}", value.abs());
    let (inteiro, decimal) = fixo.split_once('.').unwrap_or((fixo.as_str(), "00"));

    let digitos: Vec<char> = inteiro.chars().collect();
    let mut agrupado = String::with_capacity(digitos.len() + digitos.len() / 3);
    for (i, c) in digitos.iter().enumerate() {
        if i > 0 && (digitos.len() - i) % 3 == 0 {
            agrupado.push('.');
        }
        agrupado.push(*c);
    }

    // -0,004 arredonda para 0,00 e não deve exibir sinal
    let negativo = value < 0.0 && fixo.chars().any(|c| c != '0' && c != '.');
    let sinal = if negativo { "-" } else { "" };

    format!("{} {}{},{}", SIMBOLO_MOEDA, sinal, agrupado, decimal)
}

/// Normaliza um valor digitado no formulário antes de gravar
///
/// Vazio ou só espaços vira `None` (coluna nula); qualquer outro texto é
/// regravado no formato canônico de exibição.
pub fn normalize_currency(text: Option<&str>) -> Option<String> {
    let text = text?.trim();
    if text.is_empty() {
        return None;
    }
    Some(format_currency(parse_currency(Some(text))))
}
