//! Grandchildren tags.
//!
//! Exposes a page's grandchildren (the children of its children) to
//! templates:
//!
//! | Tag | Renders |
//! |-----|---------|
//! | `if_grandchildren [status]` | body if at least one grandchild matches |
//! | `unless_grandchildren [status]` | body if none matches |
//! | `grandchildren` | body, with the grandchildren scope set |
//! | `grandchildren:count` | number of matches |
//! | `grandchildren:first`, `grandchildren:last` | body for the first/last match |
//! | `grandchildren:each` | body once per match, plus pagination controls |
//! | `grandchildren:each:child` | body for the current element |
//! | `grandchildren:each:if_first`, `:unless_first`, `:if_last`, `:unless_last` | body depending on position |
//! | `grandchildren:each:header [name] [restart]` | body when it differs from the last time |
//! | `pagination` | controls of the enclosing paginated `each` |
//!
//! Query tags accept `status`, `by`, `order`, `limit` and `offset`.
//! `each` also accepts `paginated="true"`, `per_page` and the control
//! options `previous_label`, `next_label`, `class`, `separator`,
//! `inner_window` and `outer_window`.

use std::collections::BTreeSet;

use lineage_pages::{PageId, QuerySpec};
use serde::Serialize;

use crate::iteration::DEFAULT_HEADER;
use crate::query::{self, QueryBuilder};
use crate::{
    IterationState, Locals, PaginationControls, PaginationOptions, PaginationWindow, TagCall,
    TagError, TagRegistry, collector,
};

/// Window and size of a paginated `each` pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PaginatedList {
    pub window: PaginationWindow,
    pub total_entries: usize,
}

impl PaginatedList {
    #[must_use]
    pub fn total_pages(&self) -> usize {
        self.window.total_pages(self.total_entries)
    }
}

/// Register the grandchildren tags.
pub fn register(registry: &mut TagRegistry) {
    registry.register("if_grandchildren", if_grandchildren);
    registry.register("unless_grandchildren", unless_grandchildren);
    registry.register("grandchildren", grandchildren);
    registry.register("grandchildren:count", count);
    registry.register("grandchildren:first", first);
    registry.register("grandchildren:last", last);
    registry.register("grandchildren:each", each);
    registry.register("grandchildren:each:child", child);
    registry.register("grandchildren:each:if_first", if_first);
    registry.register("grandchildren:each:unless_first", unless_first);
    registry.register("grandchildren:each:if_last", if_last);
    registry.register("grandchildren:each:unless_last", unless_last);
    registry.register("grandchildren:each:header", header);
    registry.register("pagination", pagination);
}

/// Scope of the contextual page, computed afresh.
fn own_scope(call: &TagCall<'_>) -> Result<BTreeSet<PageId>, TagError> {
    collector::scope_of(call.host().repository, call.locals.page.as_ref(), call.name)
}

/// Scope set by an enclosing `grandchildren`, or the contextual page's.
fn scope(call: &TagCall<'_>) -> Result<BTreeSet<PageId>, TagError> {
    match &call.locals.parent_ids {
        Some(ids) => Ok(ids.clone()),
        None => own_scope(call),
    }
}

fn build_query(call: &TagCall<'_>, scope: BTreeSet<PageId>) -> Result<QuerySpec, TagError> {
    let host = call.host();
    QueryBuilder::new(&host.config.tags, host.is_dev_request()).build(scope, call.attrs)
}

fn has_grandchildren(call: &mut TagCall<'_>) -> Result<bool, TagError> {
    let scope = own_scope(call)?;
    call.locals.parent_ids = Some(scope.clone());
    let query = build_query(call, scope)?;
    Ok(query::count(call.host().repository, &query)? > 0)
}

fn if_grandchildren(call: &mut TagCall<'_>) -> Result<String, TagError> {
    if has_grandchildren(call)? {
        call.expand()
    } else {
        Ok(String::new())
    }
}

fn unless_grandchildren(call: &mut TagCall<'_>) -> Result<String, TagError> {
    if has_grandchildren(call)? {
        Ok(String::new())
    } else {
        call.expand()
    }
}

fn grandchildren(call: &mut TagCall<'_>) -> Result<String, TagError> {
    call.locals.parent_ids = Some(own_scope(call)?);
    call.expand()
}

fn count(call: &mut TagCall<'_>) -> Result<String, TagError> {
    let query = build_query(call, scope(call)?)?;
    Ok(query::count(call.host().repository, &query)?.to_string())
}

fn first(call: &mut TagCall<'_>) -> Result<String, TagError> {
    let query = build_query(call, scope(call)?)?;
    let found = query::find(call.host().repository, &query)?;
    match found.into_iter().next() {
        Some(page) => {
            call.locals.page = Some(page);
            call.expand()
        }
        None => Ok(String::new()),
    }
}

fn last(call: &mut TagCall<'_>) -> Result<String, TagError> {
    let query = build_query(call, scope(call)?)?;
    let mut found = query::find(call.host().repository, &query)?;
    match found.pop() {
        Some(page) => {
            call.locals.page = Some(page);
            call.expand()
        }
        None => Ok(String::new()),
    }
}

/// Iterate the grandchildren.
///
/// With `paginated="true"`, only the requested page of results is shown
/// and the `pagination` tag is rendered after the last element when there
/// is more than one page.
fn each(call: &mut TagCall<'_>) -> Result<String, TagError> {
    let host = call.host();
    let mut query = build_query(call, scope(call)?)?;

    let mut locals = call.locals.clone();
    if call.attrs.flag("paginated") {
        let window = PaginationWindow::resolve(host.request, call.attrs, &host.config.pagination)?;
        let total_entries = query::count(host.repository, &query.without_window())?;
        query = window.apply(query);
        locals.paginated = Some(PaginatedList {
            window,
            total_entries,
        });
    }

    let mut state = IterationState::begin(query::find(host.repository, &query)?);
    let mut output = String::new();
    while let Some(visit) = state.advance() {
        locals.child = Some(visit.page.clone());
        locals.page = Some(visit.page);
        output.push_str(&call.expand_iterating(&locals, &mut state)?);
    }

    if let Some(list) = locals.paginated
        && list.total_pages() > 1
    {
        let mut locals = call.locals.clone();
        locals.paginated = Some(list);
        let attrs = call.attrs;
        output.push_str(&call.render_tag("pagination", attrs, &locals)?);
    }

    Ok(output)
}

fn child(call: &mut TagCall<'_>) -> Result<String, TagError> {
    let page = call
        .locals
        .child
        .clone()
        .ok_or_else(|| TagError::missing(call.name, "child"))?;
    call.locals.page = Some(page);
    call.expand()
}

fn if_first(call: &mut TagCall<'_>) -> Result<String, TagError> {
    expand_if(call, IterationState::is_first)
}

fn unless_first(call: &mut TagCall<'_>) -> Result<String, TagError> {
    expand_if(call, |state| !state.is_first())
}

fn if_last(call: &mut TagCall<'_>) -> Result<String, TagError> {
    expand_if(call, IterationState::is_last)
}

fn unless_last(call: &mut TagCall<'_>) -> Result<String, TagError> {
    expand_if(call, |state| !state.is_last())
}

fn expand_if(
    call: &mut TagCall<'_>,
    condition: impl FnOnce(&IterationState) -> bool,
) -> Result<String, TagError> {
    if condition(&*call.iteration()?) {
        call.expand()
    } else {
        Ok(String::new())
    }
}

/// Render the body only when it differs from the last rendering of the
/// same named header. `restart` lists headers (separated by `;`) whose
/// memory is cleared whenever this one changes.
fn header(call: &mut TagCall<'_>) -> Result<String, TagError> {
    // Fail before rendering when used outside a pass
    call.iteration()?;

    let name = call.attr("name").unwrap_or(DEFAULT_HEADER);
    let restart: Vec<&str> = call
        .attr("restart")
        .map(|names| names.split(';').filter(|n| !n.is_empty()).collect())
        .unwrap_or_default();

    let rendered = call.expand()?;
    Ok(call
        .iteration()?
        .header(name, rendered, &restart)
        .unwrap_or_default())
}

/// Pagination controls of the enclosing paginated `each`, drawn by the
/// host renderer. Renders nothing outside a paginated pass.
fn pagination(call: &mut TagCall<'_>) -> Result<String, TagError> {
    let Some(list) = call.locals.paginated else {
        return Ok(String::new());
    };
    let host = call.host();
    let options = PaginationOptions::from(&host.config.pagination).merged(call.attrs);
    let controls =
        PaginationControls::compute(list.window, list.total_entries, &host.request.path, options);
    Ok(host.paginator.render(&controls))
}
