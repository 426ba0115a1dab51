use std::collections::BTreeMap;

/// A row filter for the table API.
///
/// Only equality is needed so far, every condition is rendered as
/// `column=eq.value` and all conditions must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    conditions: BTreeMap<String, String>,
}

impl Filter {
    /// A filter matching rows where `column` equals `value`.
    pub fn eq<C, V>(column: C, value: V) -> Self
    where
        C: Into<String>,
        V: Into<String>,
    {
        Self::default().and_eq(column, value)
    }

    /// Adds another equality condition.
    pub fn and_eq<C, V>(mut self, column: C, value: V) -> Self
    where
        C: Into<String>,
        V: Into<String>,
    {
        self.conditions
            .insert(column.into(), format!("eq.{}", value.into()));
        self
    }

    /// Query parameters selecting at most `limit` matching rows.
    pub(crate) fn to_params(&self, limit: u32) -> BTreeMap<String, String> {
        let mut params = self.conditions.clone();
        params.insert("select".to_string(), "*".to_string());
        params.insert("limit".to_string(), limit.to_string());
        params
    }
}
