// src/model/function.rs
use serde::{Deserialize, Serialize};

/// A stored procedure or function.
///
/// `specific_name` identifies an overload; `name` may repeat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Function {
    pub name: String,
    pub category: Option<String>,
    pub schema: Option<String>,
    /// `PROCEDURE_TYPE`: 0 unknown, 1 no result, 2 returns result.
    pub function_type: Option<i16>,
    pub remarks: Option<String>,
    pub specific_name: Option<String>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: None,
            schema: None,
            function_type: None,
            remarks: None,
            specific_name: None,
        }
    }

    /// The overload-unique name, falling back to the plain name.
    pub fn identity(&self) -> &str {
        self.specific_name.as_deref().unwrap_or(&self.name)
    }
}
