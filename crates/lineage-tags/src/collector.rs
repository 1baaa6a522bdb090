//! Grandchild collector: the parent scope of a grandchildren query.

use std::collections::BTreeSet;

use lineage_pages::{Page, PageId, PageRepository};

use crate::TagError;

/// Ids of the direct children of `page`.
///
/// Grandchildren are the pages whose parent is in this set. Virtual
/// children still contribute their own children.
///
/// # Errors
///
/// Returns [`TagError::MissingContext`] naming `tag` when there is no
/// contextual page, and passes repository failures through.
pub fn scope_of(
    repository: &dyn PageRepository,
    page: Option<&Page>,
    tag: &str,
) -> Result<BTreeSet<PageId>, TagError> {
    let page = page.ok_or_else(|| TagError::missing(tag, "page"))?;
    let children = repository.children(page.id)?;
    Ok(children.into_iter().map(|child| child.id).collect())
}

#[cfg(test)]
mod tests {
    use lineage_pages::{MemoryRepository, NewPage};

    use super::*;

    #[test]
    fn test_scope_is_direct_children() {
        let mut repo = MemoryRepository::new();
        let root = repo.insert(NewPage::new("/"));
        let a = repo.insert(NewPage::new("a").parent(root));
        let b = repo.insert(NewPage::new("b").parent(root).virtual_page());
        repo.insert(NewPage::new("a1").parent(a));
        let page = repo.page(root).unwrap();

        let scope = scope_of(&repo, page.as_ref(), "grandchildren").unwrap();

        assert_eq!(scope, BTreeSet::from([a, b]));
    }

    #[test]
    fn test_childless_page_has_empty_scope() {
        let mut repo = MemoryRepository::new();
        let root = repo.insert(NewPage::new("/"));
        let page = repo.page(root).unwrap();

        assert!(scope_of(&repo, page.as_ref(), "grandchildren").unwrap().is_empty());
    }

    #[test]
    fn test_absent_page_is_missing_context() {
        let repo = MemoryRepository::new();
        let err = scope_of(&repo, None, "if_grandchildren").unwrap_err();
        assert!(matches!(
            err,
            TagError::MissingContext { ref tag, what: "page" } if tag == "if_grandchildren"
        ));
    }

    #[test]
    fn test_unknown_page_propagates_repository_error() {
        let repo = MemoryRepository::new();
        let mut other = MemoryRepository::new();
        let ghost = other.insert(NewPage::new("ghost"));
        let ghost = other.page(ghost).unwrap();

        let err = scope_of(&repo, ghost.as_ref(), "grandchildren").unwrap_err();

        assert!(matches!(err, TagError::Repository(_)));
    }
}
