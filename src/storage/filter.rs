//! Exact-match search filters.

use super::schema::TableSchema;

/// AND-combined exact-match conditions on text columns.
///
/// Absent values are skipped; a filter with no present value is invalid
/// for searching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchFilter {
    columns: Vec<&'static str>,
    conditions: Vec<(&'static str, String)>,
}

impl SearchFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a condition on `column` if `value` is present
    pub fn and(mut self, column: &'static str, value: Option<String>) -> Self {
        self.columns.push(column);
        if let Some(value) = value {
            self.conditions.push((column, value));
        }
        self
    }

    /// True when no condition was supplied
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Every column the filter was declared over, present or not
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Builds the SELECT statement and its positional parameters.
    pub(crate) fn to_sql(&self, schema: &TableSchema) -> (String, Vec<String>) {
        let mut sql = format!("SELECT {} FROM {}", schema.column_list(), schema.table);
        let mut params = Vec::with_capacity(self.conditions.len());
        for (i, (column, value)) in self.conditions.iter().enumerate() {
            sql.push_str(if i == 0 { " WHERE " } else { " AND " });
            sql.push_str(&format!("{} = ?{}", column, i + 1));
            params.push(value.clone());
        }
        (sql, params)
    }
}
