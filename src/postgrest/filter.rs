//! Filter operations for PostgrestClient

/// Operator for filter expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOperator {
    /// Equal to
    Eq,
}

impl FilterOperator {
    /// Convert the operator to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOperator::Eq => "eq",
        }
    }

    /// Render the right hand side of a `column=op.value` query parameter
    pub fn render(&self, value: &str) -> String {
        format!("{}.{}", self.as_str(), value)
    }
}
