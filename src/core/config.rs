use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::errors::Result;

/// Longest accepted entry name, in characters, unless configured otherwise.
pub const DEFAULT_MAX_NAME_LEN: usize = 49;

/// Session-wide settings. Every field has a default, so a config file only
/// needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// Name given to the root folder. Shown by the tree renderer; paths omit it.
    pub root_name: String,
    /// `None` disables the length check.
    pub max_name_len: Option<usize>,
    /// Upper bound on hits returned by a search request that sets no limit.
    pub search_limit: Option<usize>,
    /// Ask before deleting a folder together with its contents.
    pub confirm_recursive_delete: bool,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            root_name: "root".to_string(),
            max_name_len: Some(DEFAULT_MAX_NAME_LEN),
            search_limit: None,
            confirm_recursive_delete: true,
        }
    }
}

impl ExplorerConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&text)?;
        tracing::debug!(path = %path.as_ref().display(), ?config, "loaded config");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::Error;

    #[test]
    fn missing_fields_fall_back_to_defaults() -> Result<()> {
        let config = ExplorerConfig::from_json(r#"{ "root_name": "home" }"#)?;
        assert_eq!(config.root_name, "home");
        assert_eq!(config.max_name_len, Some(DEFAULT_MAX_NAME_LEN));
        assert!(config.confirm_recursive_delete);
        Ok(())
    }

    #[test]
    fn null_limit_means_unbounded() -> Result<()> {
        let config = ExplorerConfig::from_json(r#"{ "max_name_len": null }"#)?;
        assert_eq!(config.max_name_len, None);
        Ok(())
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let result = ExplorerConfig::from_json("{ root_name: ");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn load_reads_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("treex.json");
        fs::write(&path, r#"{ "search_limit": 3, "confirm_recursive_delete": false }"#)?;

        let config = ExplorerConfig::load(&path)?;
        assert_eq!(config.search_limit, Some(3));
        assert!(!config.confirm_recursive_delete);
        Ok(())
    }
}
