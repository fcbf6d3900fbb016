use serde::{Deserialize, Serialize};

use crate::dialect::is_plain_identifier;
use crate::LanternError;

/// Names the fragment builder splices into generated SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanternConfig {
    /// Core extension (default: `"lantern"`).
    pub extension: String,
    /// Companion extension providing the embedding functions (default:
    /// `"lantern_extras"`).
    pub extras_extension: String,
    /// Schema the embedding functions live in. `None` leaves them
    /// unqualified and resolved through `search_path`.
    pub function_schema: Option<String>,
}

impl Default for LanternConfig {
    fn default() -> Self {
        Self {
            extension: "lantern".to_string(),
            extras_extension: "lantern_extras".to_string(),
            function_schema: None,
        }
    }
}

impl LanternConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_extras_extension(mut self, extension: impl Into<String>) -> Self {
        self.extras_extension = extension.into();
        self
    }

    pub fn with_function_schema(mut self, schema: impl Into<String>) -> Self {
        self.function_schema = Some(schema.into());
        self
    }

    /// Check that every configured name can be spliced into SQL verbatim.
    pub fn validate(&self) -> Result<(), LanternError> {
        check_name("extension", &self.extension)?;
        check_name("extras_extension", &self.extras_extension)?;
        if let Some(schema) = &self.function_schema {
            if schema.contains('.') {
                return Err(LanternError::Config(format!(
                    "function_schema '{schema}' must be a single schema name"
                )));
            }
            check_name("function_schema", schema)?;
        }
        Ok(())
    }
}

fn check_name(field: &str, value: &str) -> Result<(), LanternError> {
    if is_plain_identifier(value) {
        Ok(())
    } else {
        Err(LanternError::Config(format!(
            "{field} '{value}': only alphanumeric and underscore characters are allowed"
        )))
    }
}
