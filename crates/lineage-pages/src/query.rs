//! Query specification executed by a [`PageRepository`](crate::PageRepository).

use std::collections::BTreeSet;

use crate::page::{Page, PageField, PageId, SortDirection, Status};

/// Set of allowed publication states.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusSet(BTreeSet<Status>);

impl StatusSet {
    /// Every status.
    #[must_use]
    pub fn all() -> Self {
        Self(Status::ALL.into_iter().collect())
    }

    /// A single status.
    #[must_use]
    pub fn only(status: Status) -> Self {
        Self(BTreeSet::from([status]))
    }

    /// Check whether `status` is allowed.
    #[must_use]
    pub fn contains(&self, status: Status) -> bool {
        self.0.contains(&status)
    }

    /// Iterate allowed statuses in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = Status> + '_ {
        self.0.iter().copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Status> for StatusSet {
    fn from_iter<I: IntoIterator<Item = Status>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Validated query over the pages whose parent is in a given scope.
///
/// Built once per tag invocation and discarded after execution. Virtual
/// pages never match, whatever the status filter says.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySpec {
    /// Pages whose `parent_id` is one of these match.
    pub parent_ids: BTreeSet<PageId>,
    /// Allowed publication states.
    pub statuses: StatusSet,
    /// Sort key.
    pub order_by: PageField,
    /// Sort direction.
    pub direction: SortDirection,
    /// Maximum number of results.
    pub limit: Option<usize>,
    /// Number of leading results to skip.
    pub offset: Option<usize>,
}

impl QuerySpec {
    /// Same filter and ordering with the limit/offset window removed.
    #[must_use]
    pub fn without_window(&self) -> Self {
        Self {
            limit: None,
            offset: None,
            ..self.clone()
        }
    }

    /// Check whether a page passes the filter part of the query.
    #[must_use]
    pub fn matches(&self, page: &Page) -> bool {
        !page.is_virtual
            && self.statuses.contains(page.status)
            && page
                .parent_id
                .is_some_and(|parent| self.parent_ids.contains(&parent))
    }

    /// Apply the limit/offset window to an already sorted result sequence.
    #[must_use]
    pub fn window<T>(&self, items: Vec<T>) -> Vec<T> {
        let offset = self.offset.unwrap_or(0);
        let limit = self.limit.unwrap_or(usize::MAX);
        items.into_iter().skip(offset).take(limit).collect()
    }
}
