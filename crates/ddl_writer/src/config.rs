//! Writer configuration

use crate::error::DdlResult;
use serde::{Deserialize, Serialize};

/// DDL writer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DdlWriterConfig {
    /// Spaces added per nesting level
    pub indent: usize,
    /// Spaces in front of every line
    pub initial_indent: usize,
    /// Column at which `write` wraps text
    pub line_width: usize,
    /// Whether object comments are written as `//` lines
    pub write_comments: bool,
}

impl Default for DdlWriterConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            initial_indent: 0,
            line_width: 80,
            write_comments: true,
        }
    }
}

impl DdlWriterConfig {
    /// Load a configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> DdlResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = DdlWriterConfig::from_json(r#"{ "indent": 4 }"#).unwrap();
        assert_eq!(config.indent, 4);
        assert_eq!(config.line_width, 80);
        assert!(config.write_comments);
    }

    #[test]
    fn test_invalid_json() {
        assert!(DdlWriterConfig::from_json("{ indent: }").is_err());
    }
}
