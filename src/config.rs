//! Configuration from `sql2blueprint.toml`.
//!
//! ```toml
//! schema = "shop"
//!
//! [import]
//! path = "database/migrations"
//! stub = "stubs/migration.stub"
//! indent = 2
//! squash = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::definition::DEFAULT_INDENT;
use crate::error::{BlueprintError, BlueprintResult};

/// Project-local config file name.
pub const CONFIG_FILE: &str = "sql2blueprint.toml";

/// Deepest base indent accepted.
pub const MAX_INDENT: usize = 16;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Schema whose `database_model/<schema>_diff.sql` is imported by default.
    pub schema: Option<String>,
    pub import: ImportConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportConfig {
    /// Output directory for migration files.
    pub path: PathBuf,
    /// Custom stub; the built-in one when unset.
    pub stub: Option<PathBuf>,
    pub indent: usize,
    pub squash: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("database/migrations"),
            stub: None,
            indent: DEFAULT_INDENT,
            squash: false,
        }
    }
}

impl Config {
    pub fn from_toml(text: &str) -> BlueprintResult<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> BlueprintResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            BlueprintError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&text)
    }

    /// Files tried when no config is given explicitly, in order.
    pub fn candidates() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sql2blueprint").join("config.toml"));
        }
        paths
    }

    /// Load `explicit` if given, else the first existing candidate, else
    /// defaults. Returns the file that was used.
    pub fn discover(explicit: Option<&Path>) -> BlueprintResult<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        for path in Self::candidates() {
            if path.is_file() {
                debug!(path = %path.display(), "loading config");
                return Ok((Self::load(&path)?, Some(path)));
            }
        }

        debug!("no config file, using defaults");
        Ok((Self::default(), None))
    }

    fn validate(&self) -> BlueprintResult<()> {
        check_indent(self.import.indent)?;
        if self.schema.as_deref().is_some_and(|s| s.trim().is_empty()) {
            return Err(BlueprintError::Config("schema must not be empty".to_string()));
        }
        Ok(())
    }

    /// Default input for the configured schema.
    pub fn input_file(&self) -> Option<PathBuf> {
        self.schema.as_deref().map(diff_file)
    }
}

/// Reject a base indent deeper than [`MAX_INDENT`], wherever it came from.
pub fn check_indent(indent: usize) -> BlueprintResult<()> {
    if indent > MAX_INDENT {
        return Err(BlueprintError::Config(format!(
            "indent must be at most {}, got {}",
            MAX_INDENT, indent
        )));
    }
    Ok(())
}

/// `database_model/<schema>_diff.sql`.
pub fn diff_file(schema: &str) -> PathBuf {
    Path::new("database_model").join(format!("{}_diff.sql", schema))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.import.indent, 2);
        assert_eq!(config.import.path, PathBuf::from("database/migrations"));
        assert_eq!(config.input_file(), None);
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml(
            r#"
            schema = "shop"

            [import]
            path = "out"
            stub = "stubs/m.stub"
            indent = 1
            squash = true
            "#,
        )
        .unwrap();

        assert_eq!(config.schema.as_deref(), Some("shop"));
        assert_eq!(config.import.stub, Some(PathBuf::from("stubs/m.stub")));
        assert_eq!(config.import.indent, 1);
        assert!(config.import.squash);
        assert_eq!(
            config.input_file(),
            Some(PathBuf::from("database_model/shop_diff.sql"))
        );
    }

    #[test]
    fn test_invalid_files() {
        assert!(matches!(
            Config::from_toml("[import]\nindent = 99"),
            Err(BlueprintError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("schema = \" \""),
            Err(BlueprintError::Config(_))
        ));
        assert!(matches!(
            Config::from_toml("colour = true"),
            Err(BlueprintError::Toml(_))
        ));
        assert!(matches!(
            Config::from_toml("[import]\nindent = \"two\""),
            Err(BlueprintError::Toml(_))
        ));
    }

    #[test]
    fn test_indent_bound() {
        assert!(check_indent(MAX_INDENT).is_ok());
        assert!(matches!(check_indent(17), Err(BlueprintError::Config(_))));
    }

    #[test]
    fn test_explicit_missing_file() {
        let missing = Path::new("/nonexistent/sql2blueprint.toml");
        assert!(matches!(
            Config::discover(Some(missing)),
            Err(BlueprintError::Config(_))
        ));
    }

    #[test]
    fn test_candidates_start_local() {
        assert_eq!(Config::candidates()[0], PathBuf::from(CONFIG_FILE));
    }
}
