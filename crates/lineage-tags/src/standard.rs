//! Page attribute tags.
//!
//! Render fields of the contextual page: `slug`, `title`, `breadcrumb`,
//! `date [format] [for]`, and `parent`, which moves the context to the
//! parent page.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::{TagCall, TagError, TagRegistry};

/// Format used by `date` without a `format` attribute.
const DEFAULT_DATE_FORMAT: &str = "%A, %B %d, %Y";

/// Register the page attribute tags.
pub fn register(registry: &mut TagRegistry) {
    registry.register("slug", slug);
    registry.register("title", title);
    registry.register("breadcrumb", breadcrumb);
    registry.register("date", date);
    registry.register("parent", parent);
}

fn slug(call: &mut TagCall<'_>) -> Result<String, TagError> {
    Ok(call.page()?.slug.clone())
}

fn title(call: &mut TagCall<'_>) -> Result<String, TagError> {
    Ok(call.page()?.title.clone())
}

fn breadcrumb(call: &mut TagCall<'_>) -> Result<String, TagError> {
    Ok(call.page()?.breadcrumb.clone())
}

/// Render a page timestamp with a strftime `format`.
///
/// `for` selects `published_at`, `created_at`, `updated_at` or `now`; by
/// default the publication date is used, falling back to the creation date.
fn date(call: &mut TagCall<'_>) -> Result<String, TagError> {
    let page = call.page()?;
    let at: DateTime<Utc> = match call.attr("for") {
        None => page.date(),
        Some("now") => Utc::now(),
        Some("published_at") => page.published_at.unwrap_or(page.created_at),
        Some("created_at") => page.created_at,
        Some("updated_at") => page.updated_at,
        Some(other) => return Err(TagError::InvalidDateFor(other.to_owned())),
    };

    let format = call.attr("format").unwrap_or(DEFAULT_DATE_FORMAT);
    let mut rendered = String::new();
    write!(rendered, "{}", at.format(format))
        .map_err(|_| TagError::InvalidDateFormat(format.to_owned()))?;
    Ok(rendered)
}

/// Expand the body with the parent page as context. Renders nothing at a
/// root page.
fn parent(call: &mut TagCall<'_>) -> Result<String, TagError> {
    let Some(parent_id) = call.page()?.parent_id else {
        return Ok(String::new());
    };
    match call.host().repository.page(parent_id)? {
        Some(parent) => {
            call.locals.page = Some(parent);
            call.expand()
        }
        None => Ok(String::new()),
    }
}
