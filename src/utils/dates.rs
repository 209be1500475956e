//! Normalização de datas entre formulário, banco e exibição
//!
//! Dois formatos textuais convivem nos registros:
//! - ISO `AAAA-MM-DD` (inputs `type="date"` e colunas do banco)
//! - local `DD/MM/AAAA` (valores digitados e dados antigos)
//!
//! Além disso `created_at` chega como timestamp RFC 3339.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Formato ISO usado na gravação
pub const FORMATO_ISO: &str = "%Y-%m-%d";

/// Formato de exibição pt-BR
pub const FORMATO_LOCAL: &str = "%d/%m/%Y";

/// Entrada aceita pelas funções de data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntradaData<'a> {
    Vazia,
    Texto(&'a str),
    Data(NaiveDate),
    DataHora(DateTime<Utc>),
}

impl<'a> From<&'a str> for EntradaData<'a> {
    fn from(texto: &'a str) -> Self {
        EntradaData::Texto(texto)
    }
}

impl<'a> From<&'a String> for EntradaData<'a> {
    fn from(texto: &'a String) -> Self {
        EntradaData::Texto(texto.as_str())
    }
}

impl<'a> From<Option<&'a str>> for EntradaData<'a> {
    fn from(texto: Option<&'a str>) -> Self {
        texto.map(EntradaData::Texto).unwrap_or(EntradaData::Vazia)
    }
}

impl From<NaiveDate> for EntradaData<'_> {
    fn from(data: NaiveDate) -> Self {
        EntradaData::Data(data)
    }
}

impl From<DateTime<Utc>> for EntradaData<'_> {
    fn from(data: DateTime<Utc>) -> Self {
        EntradaData::DataHora(data)
    }
}

impl EntradaData<'_> {
    fn para_data(&self) -> Option<NaiveDate> {
        match self {
            EntradaData::Vazia => None,
            EntradaData::Texto(texto) => parse_date(texto),
            EntradaData::Data(data) => Some(*data),
            EntradaData::DataHora(data) => Some(data.date_naive()),
        }
    }
}

/// Lê uma data em qualquer um dos formatos conhecidos
///
/// Ordem: ISO `AAAA-MM-DD`, timestamp RFC 3339, data-hora ISO sem fuso e,
/// por último, o formato local `DD/MM/AAAA`.
pub fn parse_date(texto: &str) -> Option<NaiveDate> {
    let texto = texto.trim();
    if texto.is_empty() {
        return None;
    }

    NaiveDate::parse_from_str(texto, FORMATO_ISO)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(texto).ok().map(|d| d.date_naive()))
        .or_else(|| {
            NaiveDateTime::parse_from_str(texto, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|d| d.date())
        })
        .or_else(|| NaiveDate::parse_from_str(texto, FORMATO_LOCAL).ok())
}

/// Formata para exibição `DD/MM/AAAA`
///
/// Entrada vazia vira `""`; texto que não é data volta sem alteração.
///
/// # Exemplos
/// ```
/// use crm_clientes::utils::dates::format_date_local;
///
/// assert_eq!(format_date_local("2024-03-05"), "05/03/2024");
/// assert_eq!(format_date_local("05/03/2024"), "05/03/2024");
/// assert_eq!(format_date_local(""), "");
/// assert_eq!(format_date_local("not-a-date"), "not-a-date");
/// ```
pub fn format_date_local<'a>(entrada: impl Into<EntradaData<'a>>) -> String {
    let entrada = entrada.into();

    if let EntradaData::Texto(texto) = entrada {
        if texto.trim().is_empty() {
            return String::new();
        }
    }

    match entrada.para_data() {
        Some(data) => data.format(FORMATO_LOCAL).to_string(),
        None => match entrada {
            EntradaData::Texto(texto) => texto.to_string(),
            _ => String::new(),
        },
    }
}

/// Converte para `AAAA-MM-DD` antes de gravar
///
/// Entrada vazia ou ilegível vira `None` (coluna nula), nunca uma data sentinela.
pub fn to_iso_date_or_null<'a>(entrada: impl Into<EntradaData<'a>>) -> Option<String> {
    entrada
        .into()
        .para_data()
        .map(|data| data.format(FORMATO_ISO).to_string())
}

/// Data de hoje em UTC, o único relógio do serviço
pub fn hoje() -> NaiveDate {
    Utc::now().date_naive()
}

/// Data de hoje em ISO, usada como padrão de `ultimo_contato`
pub fn hoje_iso() -> String {
    hoje().format(FORMATO_ISO).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_date_local_both_encodings() {
        assert_eq!(format_date_local("2024-03-05"), "05/03/2024");
        assert_eq!(format_date_local("05/03/2024"), "05/03/2024");
        assert_eq!(format_date_local(" 2024-12-31 "), "31/12/2024");
    }

    #[test]
    fn test_format_date_local_timestamps() {
        assert_eq!(format_date_local("2024-03-05T13:45:00+00:00"), "05/03/2024");
        assert_eq!(format_date_local("2024-03-05T13:45:00.123456"), "05/03/2024");

        let data_hora = Utc.with_ymd_and_hms(2023, 7, 1, 23, 59, 0).unwrap();
        assert_eq!(format_date_local(data_hora), "01/07/2023");
        assert_eq!(
            format_date_local(NaiveDate::from_ymd_opt(2020, 2, 29).unwrap()),
            "29/02/2020"
        );
    }

    #[test]
    fn test_format_date_local_safe_defaults() {
        assert_eq!(format_date_local(""), "");
        assert_eq!(format_date_local("   "), "");
        assert_eq!(format_date_local(None::<&str>), "");
        assert_eq!(format_date_local("not-a-date"), "not-a-date");
        assert_eq!(format_date_local("31/02/2024"), "31/02/2024");
    }

    #[test]
    fn test_to_iso_date_or_null() {
        assert_eq!(to_iso_date_or_null("05/03/2024").as_deref(), Some("2024-03-05"));
        assert_eq!(to_iso_date_or_null("2024-03-05").as_deref(), Some("2024-03-05"));
        assert_eq!(to_iso_date_or_null(""), None);
        assert_eq!(to_iso_date_or_null(None::<&str>), None);
        assert_eq!(to_iso_date_or_null("amanhã"), None);
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-15"), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(parse_date("15/01/2024"), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(parse_date("2024-13-01"), None);
    }

    #[test]
    fn test_hoje_iso_round_trips() {
        let hoje = hoje_iso();
        assert_eq!(to_iso_date_or_null(hoje.as_str()), Some(hoje.clone()));
    }

    #[test]
    fn test_hoje_iso_uses_same_clock_as_hoje() {
        let antes = hoje();
        let iso = hoje_iso();
        let depois = hoje();
        let lido = parse_date(&iso).unwrap();
        assert!(lido == antes || lido == depois);
    }
}
