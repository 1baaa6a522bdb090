//! Query builder: translates tag attributes into a validated [`QuerySpec`].
//!
//! Building and execution are separate steps, so a caller can count
//! matches without materializing them.

use std::collections::BTreeSet;

use lineage_config::TagsConfig;
use lineage_pages::{Page, PageField, PageId, PageRepository, QuerySpec, SortDirection};

use crate::{TagAttrs, TagError, status};

/// Builds grandchildren queries from tag attributes.
///
/// Attribute defaults come from the injected [`TagsConfig`]; whether the
/// request targets the development host is decided by the caller.
///
/// # Example
///
/// ```
/// use std::collections::BTreeSet;
/// use lineage_config::TagsConfig;
/// use lineage_pages::{PageField, PageId, SortDirection};
/// use lineage_tags::{QueryBuilder, TagAttrs};
///
/// let config = TagsConfig::default();
/// let builder = QueryBuilder::new(&config, false);
/// let attrs = TagAttrs::parse(r#"by="slug" order="desc" limit="5""#);
///
/// let query = builder.build(BTreeSet::from([PageId(2)]), &attrs).unwrap();
/// assert_eq!(query.order_by, PageField::Slug);
/// assert_eq!(query.direction, SortDirection::Desc);
/// assert_eq!(query.limit, Some(5));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct QueryBuilder<'a> {
    config: &'a TagsConfig,
    dev_request: bool,
}

impl<'a> QueryBuilder<'a> {
    #[must_use]
    pub fn new(config: &'a TagsConfig, dev_request: bool) -> Self {
        Self {
            config,
            dev_request,
        }
    }

    /// Validate `attrs` and build a query over the pages whose parent is
    /// in `scope`.
    ///
    /// Attributes are checked in the order `limit`, `offset`, `by`,
    /// `order`, `status`; the first invalid one fails the build.
    pub fn build(&self, scope: BTreeSet<PageId>, attrs: &TagAttrs) -> Result<QuerySpec, TagError> {
        let limit = attrs
            .get("limit")
            .map(|v| parse_count(v).filter(|&n| n > 0).ok_or(TagError::InvalidLimit))
            .transpose()?;
        let offset = attrs
            .get("offset")
            .map(|v| parse_count(v).ok_or(TagError::InvalidOffset))
            .transpose()?;

        let order_by = match attrs.get("by") {
            Some(by) => by
                .trim()
                .parse::<PageField>()
                .map_err(|_| TagError::InvalidField)?,
            None => self.config.default_order_by,
        };
        let direction = match attrs.get("order") {
            Some(order) => order
                .trim()
                .parse::<SortDirection>()
                .map_err(|_| TagError::InvalidOrder)?,
            None => self.config.default_order,
        };

        let statuses = status::resolve(
            attrs.get("status"),
            self.dev_request,
            &self.config.default_status,
        )?;

        Ok(QuerySpec {
            parent_ids: scope,
            statuses,
            order_by,
            direction,
            limit,
            offset,
        })
    }
}

/// Parse a non-negative decimal count. Signs are rejected.
pub(crate) fn parse_count(value: &str) -> Option<usize> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// Execute a query.
pub fn find(repository: &dyn PageRepository, query: &QuerySpec) -> Result<Vec<Page>, TagError> {
    let pages = repository.find(query)?;
    tracing::debug!(
        parents = query.parent_ids.len(),
        statuses = ?query.statuses,
        order_by = %query.order_by,
        direction = ?query.direction,
        limit = ?query.limit,
        offset = ?query.offset,
        results = pages.len(),
        "Executed grandchildren query"
    );
    Ok(pages)
}

/// Count the matches of a query.
pub fn count(repository: &dyn PageRepository, query: &QuerySpec) -> Result<usize, TagError> {
    let count = repository.count(query)?;
    tracing::debug!(
        parents = query.parent_ids.len(),
        statuses = ?query.statuses,
        limit = ?query.limit,
        offset = ?query.offset,
        count,
        "Counted grandchildren"
    );
    Ok(count)
}
