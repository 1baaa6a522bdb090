//! In-memory repository for tests and benchmarks.
//!
//! Provides [`MemoryRepository`], a [`PageRepository`] backed by a flat page
//! list with parent/children relationships tracked by indices.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::page::{Page, PageId, SortDirection, Status};
use crate::query::QuerySpec;
use crate::repository::{PageRepository, RepositoryError};

/// Backend identifier used in errors.
const BACKEND: &str = "Memory";

/// Page to insert into a [`MemoryRepository`].
///
/// Starts as a published, non-virtual root page created at the Unix epoch
/// and never published; use the builder methods to adjust it.
#[derive(Clone, Debug)]
pub struct NewPage {
    parent_id: Option<PageId>,
    title: String,
    slug: String,
    breadcrumb: Option<String>,
    status: Status,
    published_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: Option<DateTime<Utc>>,
    is_virtual: bool,
}

impl NewPage {
    /// Create a page with the given slug. The title defaults to the slug.
    #[must_use]
    pub fn new(slug: impl Into<String>) -> Self {
        let slug = slug.into();
        Self {
            parent_id: None,
            title: slug.clone(),
            slug,
            breadcrumb: None,
            status: Status::Published,
            published_at: None,
            created_at: DateTime::<Utc>::UNIX_EPOCH,
            updated_at: None,
            is_virtual: false,
        }
    }

    #[must_use]
    pub fn parent(mut self, parent: PageId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the breadcrumb. Defaults to the title.
    #[must_use]
    pub fn breadcrumb(mut self, breadcrumb: impl Into<String>) -> Self {
        self.breadcrumb = Some(breadcrumb.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn published_at(mut self, at: DateTime<Utc>) -> Self {
        self.published_at = Some(at);
        self
    }

    #[must_use]
    pub fn created_at(mut self, at: DateTime<Utc>) -> Self {
        self.created_at = at;
        self
    }

    /// Set the modification time. Defaults to the creation time.
    #[must_use]
    pub fn updated_at(mut self, at: DateTime<Utc>) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Mark the page as virtual.
    #[must_use]
    pub fn virtual_page(mut self) -> Self {
        self.is_virtual = true;
        self
    }
}

/// In-memory page repository.
///
/// Pages are stored in insertion order and receive sequential ids starting
/// at 1, so id order is the natural order used to break sort ties.
///
/// # Example
///
/// ```ignore
/// use lineage_pages::{MemoryRepository, NewPage, PageRepository};
///
/// let mut repo = MemoryRepository::new();
/// let home = repo.insert(NewPage::new("/").title("Home"));
/// let news = repo.insert(NewPage::new("news").parent(home));
///
/// let children = repo.children(home).unwrap();
/// assert_eq!(children[0].id, news);
/// ```
#[derive(Debug, Default)]
pub struct MemoryRepository {
    pages: Vec<Page>,
    children: Vec<Vec<usize>>,
    id_index: HashMap<PageId, usize>,
}

impl MemoryRepository {
    /// Create an empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a page and return its id.
    ///
    /// # Panics
    ///
    /// Panics if the parent id is not in the repository.
    pub fn insert(&mut self, new: NewPage) -> PageId {
        let idx = self.pages.len();
        let id = PageId(idx as u64 + 1);

        if let Some(parent) = new.parent_id {
            let parent_idx = self.id_index[&parent];
            self.children[parent_idx].push(idx);
        }

        let breadcrumb = new.breadcrumb.unwrap_or_else(|| new.title.clone());
        self.pages.push(Page {
            id,
            parent_id: new.parent_id,
            title: new.title,
            slug: new.slug,
            breadcrumb,
            status: new.status,
            published_at: new.published_at,
            created_at: new.created_at,
            updated_at: new.updated_at.unwrap_or(new.created_at),
            is_virtual: new.is_virtual,
        });
        self.children.push(Vec::new());
        self.id_index.insert(id, idx);

        id
    }

    /// Insert a page, builder style.
    #[must_use]
    pub fn with_page(mut self, new: NewPage) -> Self {
        self.insert(new);
        self
    }

    /// Number of stored pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Filter and sort without windowing.
    fn matching(&self, query: &QuerySpec) -> Vec<&Page> {
        let mut matched: Vec<&Page> = self.pages.iter().filter(|p| query.matches(p)).collect();
        matched.sort_by(|a, b| {
            let ord = a
                .compare_by(query.order_by, b)
                .then_with(|| a.id.cmp(&b.id));
            match query.direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            }
        });
        matched
    }
}

impl PageRepository for MemoryRepository {
    fn page(&self, id: PageId) -> Result<Option<Page>, RepositoryError> {
        Ok(self.id_index.get(&id).map(|&i| self.pages[i].clone()))
    }

    fn children(&self, id: PageId) -> Result<Vec<Page>, RepositoryError> {
        let &idx = self
            .id_index
            .get(&id)
            .ok_or_else(|| RepositoryError::not_found(id).with_backend(BACKEND))?;
        Ok(self.children[idx]
            .iter()
            .map(|&c| self.pages[c].clone())
            .collect())
    }

    fn find(&self, query: &QuerySpec) -> Result<Vec<Page>, RepositoryError> {
        let matched = self.matching(query);
        Ok(query.window(matched).into_iter().cloned().collect())
    }

    fn count(&self, query: &QuerySpec) -> Result<usize, RepositoryError> {
        Ok(query.window(self.matching(query)).len())
    }
}
