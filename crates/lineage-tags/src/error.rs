//! Tag expansion errors.
//!
//! The messages of the attribute validation variants are shown to template
//! authors verbatim and must not change.

use lineage_pages::RepositoryError;

/// Error raised while expanding a tag.
#[derive(Debug, thiserror::Error)]
pub enum TagError {
    /// `status` is not a known status keyword.
    #[error("`status' attribute of `each' tag must be set to a valid status")]
    InvalidStatus,
    /// `by` does not name a page field.
    #[error("`by' attribute of `each' tag must be set to a valid field name")]
    InvalidField,
    /// `order` is neither `asc` nor `desc`.
    #[error("`order' attribute of `each' tag must be set to either \"asc\" or \"desc\"")]
    InvalidOrder,
    /// `limit` is not a positive integer.
    #[error("`limit' attribute must be a positive number")]
    InvalidLimit,
    /// `offset` is not a non-negative integer.
    #[error("`offset' attribute must be a positive number")]
    InvalidOffset,
    /// `per_page` is not a positive integer.
    #[error("`per_page' attribute must be a positive number")]
    InvalidPerPage,
    /// A tag needs context that no enclosing tag provided.
    #[error("`{tag}' tag requires a contextual {what}")]
    MissingContext {
        /// Qualified tag name.
        tag: String,
        /// Missing context value (e.g. "page").
        what: &'static str,
    },
    /// No handler is registered under this name.
    #[error("undefined tag `{0}'")]
    UndefinedTag(String),
    /// `format` is not a valid strftime pattern.
    #[error("invalid date format `{0}'")]
    InvalidDateFormat(String),
    /// `for` names no page timestamp.
    #[error("invalid value for `for' attribute: {0}")]
    InvalidDateFor(String),
    /// Repository failure, passed through unmodified.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl TagError {
    pub(crate) fn missing(tag: &str, what: &'static str) -> Self {
        Self::MissingContext {
            tag: tag.to_owned(),
            what,
        }
    }
}

#[cfg(test)]
mod tests {
    use lineage_pages::{PageId, RepositoryErrorKind};

    use super::*;

    #[test]
    fn test_validation_messages_are_literal() {
        assert_eq!(
            TagError::InvalidLimit.to_string(),
            "`limit' attribute must be a positive number"
        );
        assert_eq!(
            TagError::InvalidOffset.to_string(),
            "`offset' attribute must be a positive number"
        );
        assert_eq!(
            TagError::InvalidField.to_string(),
            "`by' attribute of `each' tag must be set to a valid field name"
        );
        assert_eq!(
            TagError::InvalidOrder.to_string(),
            r#"`order' attribute of `each' tag must be set to either "asc" or "desc""#
        );
        assert_eq!(
            TagError::InvalidStatus.to_string(),
            "`status' attribute of `each' tag must be set to a valid status"
        );
    }

    #[test]
    fn test_missing_context_message() {
        let err = TagError::missing("grandchildren:each:if_first", "iteration");
        assert_eq!(
            err.to_string(),
            "`grandchildren:each:if_first' tag requires a contextual iteration"
        );
    }

    #[test]
    fn test_repository_error_is_transparent() {
        let inner = RepositoryError::not_found(PageId(3)).with_backend("Memory");
        let expected = inner.to_string();
        let err = TagError::from(inner);
        assert_eq!(err.to_string(), expected);
        assert!(matches!(
            err,
            TagError::Repository(ref e) if e.kind == RepositoryErrorKind::NotFound
        ));
    }
}
