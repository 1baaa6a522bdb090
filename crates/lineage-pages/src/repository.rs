//! Repository trait and error types.
//!
//! Provides the [`PageRepository`] trait the tag engine reads pages through,
//! along with [`RepositoryError`] for unified error handling across backends.
//! The tag engine never writes, so the trait is read-only.

use crate::page::{Page, PageId};
use crate::query::QuerySpec;

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RepositoryErrorKind {
    /// Page does not exist.
    NotFound,
    /// Backend is temporarily unavailable (connection lost, pool exhausted).
    Unavailable,
    /// Other/unknown error category.
    Other,
}

/// Repository error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct RepositoryError {
    /// Semantic error category.
    pub kind: RepositoryErrorKind,
    /// Page context (if applicable).
    pub page: Option<PageId>,
    /// Backend identifier (e.g., "Memory", "Postgres").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RepositoryError {
    /// Create a new repository error.
    #[must_use]
    pub fn new(kind: RepositoryErrorKind) -> Self {
        Self {
            kind,
            page: None,
            backend: None,
            source: None,
        }
    }

    /// Attach page context.
    #[must_use]
    pub fn with_page(mut self, page: PageId) -> Self {
        self.page = Some(page);
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error for a page.
    #[must_use]
    pub fn not_found(page: PageId) -> Self {
        Self::new(RepositoryErrorKind::NotFound).with_page(page)
    }
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (page: 42)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            RepositoryErrorKind::NotFound => "Not found",
            RepositoryErrorKind::Unavailable => "Unavailable",
            RepositoryErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(page) = self.page {
            write!(f, " (page: {page})")?;
        }

        Ok(())
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Read access to the host's page tree.
///
/// Implementations must be safe for concurrent readers; every render
/// holds only a shared reference.
pub trait PageRepository: Send + Sync {
    /// Look up a page by id.
    ///
    /// Returns `Ok(None)` when no page has this id.
    fn page(&self, id: PageId) -> Result<Option<Page>, RepositoryError>;

    /// Direct children of a page in natural order, virtual pages included.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryErrorKind::NotFound`] if `id` is unknown.
    fn children(&self, id: PageId) -> Result<Vec<Page>, RepositoryError>;

    /// Execute a query: filter, stable sort, then window.
    fn find(&self, query: &QuerySpec) -> Result<Vec<Page>, RepositoryError>;

    /// Number of pages [`find`](Self::find) would return for the same query.
    fn count(&self, query: &QuerySpec) -> Result<usize, RepositoryError>;
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn test_display_kind_only() {
        let err = RepositoryError::new(RepositoryErrorKind::Unavailable);
        assert_eq!(err.to_string(), "Unavailable");
    }

    #[test]
    fn test_display_with_backend_and_page() {
        let err = RepositoryError::not_found(PageId(42)).with_backend("Memory");
        assert_eq!(err.to_string(), "[Memory] Not found (page: 42)");
    }

    #[test]
    fn test_display_with_source() {
        let io = std::io::Error::other("connection reset");
        let err = RepositoryError::new(RepositoryErrorKind::Unavailable)
            .with_backend("Postgres")
            .with_source(io);
        assert_eq!(err.to_string(), "[Postgres] Unavailable: connection reset");
        assert!(err.source().is_some());
    }

    #[test]
    fn test_source_absent_by_default() {
        let err = RepositoryError::new(RepositoryErrorKind::Other);
        assert!(err.source().is_none());
    }
}
