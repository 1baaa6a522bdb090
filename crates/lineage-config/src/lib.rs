//! Configuration management for lineage tags.
//!
//! Parses `lineage.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `tags.dev_host`

mod expand;

use std::path::{Path, PathBuf};

use lineage_pages::{PageField, SortDirection, Status};
use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "lineage.toml";

/// Status keyword that selects every non-virtual page.
pub const ALL_STATUSES: &str = "all";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tag defaults.
    pub tags: TagsConfig,
    /// Pagination defaults.
    pub pagination: PaginationConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Defaults applied when a tag omits an attribute.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TagsConfig {
    /// Status used when the `status` attribute is omitted.
    pub default_status: String,
    /// Development host.
    ///
    /// Requests to the development host list draft pages by default. When
    /// unset, any host starting with `dev.` counts as a development host.
    pub dev_host: Option<String>,
    /// Sort key used when the `by` attribute is omitted.
    pub default_order_by: PageField,
    /// Sort direction used when the `order` attribute is omitted.
    pub default_order: SortDirection,
}

impl Default for TagsConfig {
    fn default() -> Self {
        Self {
            default_status: "published".to_owned(),
            dev_host: None,
            default_order_by: PageField::PublishedAt,
            default_order: SortDirection::Asc,
        }
    }
}

impl TagsConfig {
    /// Check whether a request host is the development host.
    #[must_use]
    pub fn is_dev_host(&self, host: &str) -> bool {
        match &self.dev_host {
            Some(dev_host) => dev_host == host,
            None => host.starts_with("dev."),
        }
    }
}

/// Pagination defaults, overridable per tag.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Entries per page when neither the tag nor the request sets one.
    pub per_page: usize,
    /// Query parameter carrying the page number.
    pub param_name: String,
    /// Label of the previous-page link.
    pub previous_label: String,
    /// Label of the next-page link.
    pub next_label: String,
    /// CSS class of the pagination container.
    pub class: String,
    /// Separator between page links.
    pub separator: String,
    /// Pages shown on each side of the current page.
    pub inner_window: usize,
    /// Pages always shown at each end.
    pub outer_window: usize,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: 20,
            param_name: "page".to_owned(),
            previous_label: "&laquo; Previous".to_owned(),
            next_label: "Next &raquo;".to_owned(),
            class: "pagination".to_owned(),
            separator: " ".to_owned(),
            inner_window: 4,
            outer_window: 1,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`tags.dev_host`").
        field: String,
        /// Error message (e.g., "${`DEV_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `lineage.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse, expand and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, environment expansion or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.validate()?;
        Ok(config)
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                tracing::debug!(path = %candidate.display(), "Discovered configuration file");
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after parsing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_tags()?;
        self.validate_pagination()?;
        Ok(())
    }

    fn validate_tags(&self) -> Result<(), ConfigError> {
        let status = &self.tags.default_status;
        if !status.eq_ignore_ascii_case(ALL_STATUSES) && status.parse::<Status>().is_err() {
            return Err(ConfigError::Validation(format!(
                "tags.default_status must be one of draft, reviewed, published, hidden or all (got {status:?})"
            )));
        }
        if let Some(dev_host) = &self.tags.dev_host {
            require_non_empty(dev_host, "tags.dev_host")?;
        }
        Ok(())
    }

    fn validate_pagination(&self) -> Result<(), ConfigError> {
        if self.pagination.per_page == 0 {
            return Err(ConfigError::Validation(
                "pagination.per_page must be greater than 0".to_owned(),
            ));
        }
        require_non_empty(&self.pagination.param_name, "pagination.param_name")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dev_host) = self.tags.dev_host {
            self.tags.dev_host = Some(expand::expand_env(dev_host, "tags.dev_host")?);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    static_assertions::assert_impl_all!(Config: Send, Sync);

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tags.default_status, "published");
        assert_eq!(config.tags.dev_host, None);
        assert_eq!(config.tags.default_order_by, PageField::PublishedAt);
        assert_eq!(config.tags.default_order, SortDirection::Asc);
        assert_eq!(config.pagination.per_page, 20);
        assert_eq!(config.pagination.param_name, "page");
        assert_eq!(config.pagination.inner_window, 4);
        assert_eq!(config.pagination.outer_window, 1);
        assert!(config.config_path.is_none());
        config.validate().unwrap();
    }

    #[test]
    fn test_parse_minimal_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.tags.default_status, "published");
        assert_eq!(config.pagination.per_page, 20);
    }

    #[test]
    fn test_parse_tags_config() {
        let toml = r#"
[tags]
default_status = "all"
dev_host = "preview.site.com"
default_order_by = "breadcrumb"
default_order = "desc"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.tags.default_status, "all");
        assert_eq!(config.tags.dev_host.as_deref(), Some("preview.site.com"));
        assert_eq!(config.tags.default_order_by, PageField::Breadcrumb);
        assert_eq!(config.tags.default_order, SortDirection::Desc);
    }

    #[test]
    fn test_parse_pagination_config() {
        let toml = r#"
[pagination]
per_page = 5
previous_label = "before"
next_label = "after"
separator = " | "
inner_window = 1
outer_window = 0
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.pagination.per_page, 5);
        assert_eq!(config.pagination.previous_label, "before");
        assert_eq!(config.pagination.next_label, "after");
        assert_eq!(config.pagination.separator, " | ");
        assert_eq!(config.pagination.inner_window, 1);
        assert_eq!(config.pagination.outer_window, 0);
        // Unset keys keep their defaults
        assert_eq!(config.pagination.class, "pagination");
    }

    #[test]
    fn test_unknown_order_by_field_is_parse_error() {
        let toml = r#"
[tags]
default_order_by = "non-existant-field"
"#;
        let err = Config::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_invalid_default_status_is_validation_error() {
        let toml = r#"
[tags]
default_status = "askdf"
"#;
        let err = Config::parse(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {err:?}");
        assert!(err.to_string().contains("default_status"));
    }

    #[test]
    fn test_zero_per_page_is_validation_error() {
        let toml = r"
[pagination]
per_page = 0
";
        let err = Config::parse(toml).unwrap_err();
        assert!(err.to_string().contains("pagination.per_page"));
    }

    #[test]
    fn test_empty_dev_host_is_validation_error() {
        let toml = r#"
[tags]
dev_host = ""
"#;
        let err = Config::parse(toml).unwrap_err();
        assert!(err.to_string().contains("tags.dev_host cannot be empty"));
    }

    #[test]
    fn test_is_dev_host_prefix_rule_when_unset() {
        let tags = TagsConfig::default();
        assert!(tags.is_dev_host("dev.site.com"));
        assert!(!tags.is_dev_host("site.com"));
        assert!(!tags.is_dev_host("preview.site.com"));
    }

    #[test]
    fn test_is_dev_host_exact_match_when_set() {
        let tags = TagsConfig {
            dev_host: Some("preview.site.com".to_owned()),
            ..Default::default()
        };
        assert!(tags.is_dev_host("preview.site.com"));
        assert!(!tags.is_dev_host("dev.site.com"));
    }

    #[test]
    fn test_dev_host_env_expansion() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("LINEAGE_TEST_DEV_HOST", "staging.site.com");
        }
        let toml = r#"
[tags]
dev_host = "${LINEAGE_TEST_DEV_HOST}"
"#;
        let config = Config::parse(toml).unwrap();
        assert_eq!(config.tags.dev_host.as_deref(), Some("staging.site.com"));
        unsafe {
            std::env::remove_var("LINEAGE_TEST_DEV_HOST");
        }
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[pagination]\nper_page = 3\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.pagination.per_page, 3);
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_missing_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let err = Config::load(Some(&path)).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_discover_config_in_parent() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "").unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Config::discover_config(&nested);

        assert_eq!(found, Some(dir.path().join(CONFIG_FILENAME)));
    }

    #[test]
    fn test_discover_config_none() {
        let dir = tempfile::tempdir().unwrap();
        // A config further up the real filesystem could still be found, so
        // only assert that discovery never returns a path inside the temp dir.
        let found = Config::discover_config(dir.path());
        assert!(found.is_none_or(|p| !p.starts_with(dir.path())));
    }
}
