//! Environment variable expansion for configuration strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// `field` names the config key for error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: format!("${{{}}} not set", e.var_name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_unchanged() {
        assert_eq!(expand_env("dev.site.com", "tags.dev_host").unwrap(), "dev.site.com");
    }

    #[test]
    fn test_default_used_when_unset() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("LINEAGE_EXPAND_UNSET");
        }
        let value = expand_env("${LINEAGE_EXPAND_UNSET:-preview.site.com}", "tags.dev_host").unwrap();
        assert_eq!(value, "preview.site.com");
    }

    #[test]
    fn test_set_variable_expands() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::set_var("LINEAGE_EXPAND_HOST", "staging.site.com");
        }
        let value = expand_env("${LINEAGE_EXPAND_HOST}", "tags.dev_host").unwrap();
        assert_eq!(value, "staging.site.com");
        unsafe {
            std::env::remove_var("LINEAGE_EXPAND_HOST");
        }
    }

    #[test]
    fn test_missing_variable_is_error() {
        // SAFETY: test runs single-threaded per test function
        unsafe {
            std::env::remove_var("LINEAGE_EXPAND_MISSING");
        }
        let err = expand_env("${LINEAGE_EXPAND_MISSING}", "tags.dev_host").unwrap_err();
        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("LINEAGE_EXPAND_MISSING"));
        assert!(err.to_string().contains("tags.dev_host"));
    }
}
