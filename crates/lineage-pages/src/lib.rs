//! Page model and repository abstraction for lineage tags.
//!
//! This crate provides the host-side vocabulary the tag engine queries with:
//!
//! - [`Page`], [`PageId`], [`Status`]: the page record and its publication state
//! - [`PageField`], [`SortDirection`]: sort keys accepted by the `by`/`order` attributes
//! - [`QuerySpec`], [`StatusSet`]: a validated filter + sort + window request
//! - [`PageRepository`]: read-only access to the page tree
//! - [`MemoryRepository`] for testing (behind `memory` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::collections::BTreeSet;
//! use lineage_pages::{
//!     MemoryRepository, NewPage, PageField, PageRepository, QuerySpec, SortDirection, StatusSet,
//! };
//!
//! let mut repo = MemoryRepository::new();
//! let home = repo.insert(NewPage::new("/"));
//! let blog = repo.insert(NewPage::new("blog").parent(home));
//! repo.insert(NewPage::new("hello").parent(blog));
//!
//! let query = QuerySpec {
//!     parent_ids: BTreeSet::from([blog]),
//!     statuses: StatusSet::all(),
//!     order_by: PageField::Slug,
//!     direction: SortDirection::Asc,
//!     limit: None,
//!     offset: None,
//! };
//! assert_eq!(repo.count(&query).unwrap(), 1);
//! ```

#[cfg(any(test, feature = "memory"))]
mod memory;
mod page;
mod query;
mod repository;

#[cfg(any(test, feature = "memory"))]
pub use memory::{MemoryRepository, NewPage};
pub use page::{
    Page, PageField, PageId, SortDirection, Status, UnknownDirection, UnknownField, UnknownStatus,
};
pub use query::{QuerySpec, StatusSet};
pub use repository::{PageRepository, RepositoryError, RepositoryErrorKind};
