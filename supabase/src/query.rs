//! Construtor de consultas PostgREST
//!
//! Cobre apenas os operadores usados pelo CRM:
//! - `eq` (igualdade), usado para escopo por dono (`user_id`) e por `id`
//! - `order` (ordenação por coluna)
//!
//! Todas as consultas retornam todas as colunas (`select=*`).
//!
//! A string final segue o formato `?select=*&user_id=eq.<uuid>&order=created_at.desc`.

/// Consulta sobre uma tabela do PostgREST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
}

impl Query {
    /// Inicia uma consulta sobre `table`
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            filters: Vec::new(),
            order: None,
        }
    }

    /// Filtro `coluna = valor`
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters
            .push((column.into(), format!("eq.{}", value.to_string())));
        self
    }

    /// Ordenação por coluna
    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some((column.into(), ascending));
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// Monta a query string (sem o `?` inicial) com valores url-encoded
    pub fn to_query_string(&self) -> String {
        let mut parts = vec![format!("select={}", urlencoding::encode("*"))];

        for (column, value) in &self.filters {
            parts.push(format!(
                "{}={}",
                urlencoding::encode(column),
                urlencoding::encode(value)
            ));
        }

        if let Some((column, ascending)) = &self.order {
            let direction = if *ascending { "asc" } else { "desc" };
            parts.push(format!("order={}.{}", urlencoding::encode(column), direction));
        }

        parts.join("&")
    }

    /// Caminho REST completo: `/rest/v1/{tabela}?{query}`
    pub fn to_path(&self) -> String {
        format!("/rest/v1/{}?{}", self.table, self.to_query_string())
    }
}
