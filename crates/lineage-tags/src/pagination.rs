//! Pagination window and control metadata.
//!
//! The engine computes which slice of results a page shows and the data a
//! pagination control needs (link targets, labels, visible page numbers).
//! Turning [`PaginationControls`] into markup is left to a host-supplied
//! [`PaginationRenderer`].

use lineage_config::PaginationConfig;
use lineage_pages::QuerySpec;
use serde::Serialize;

use crate::query::parse_count;
use crate::{Request, TagAttrs, TagError};

/// One page of results: `page` and `per_page` are both at least 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationWindow {
    page: usize,
    per_page: usize,
}

impl PaginationWindow {
    /// Create a window, or `None` if either value is zero.
    #[must_use]
    pub fn new(page: usize, per_page: usize) -> Option<Self> {
        (page > 0 && per_page > 0).then_some(Self { page, per_page })
    }

    /// Window for an `each` tag.
    ///
    /// The page number comes from the request parameter named by
    /// `param_name`; a missing or invalid value means page 1. `per_page` is
    /// taken from the tag attribute, then the request, then `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidPerPage`] if the `per_page` attribute is
    /// not a positive number.
    pub fn resolve(
        request: &Request,
        attrs: &TagAttrs,
        config: &PaginationConfig,
    ) -> Result<Self, TagError> {
        let per_page = match attrs.get("per_page") {
            Some(value) => parse_count(value)
                .filter(|&n| n > 0)
                .ok_or(TagError::InvalidPerPage)?,
            None => request
                .param("per_page")
                .and_then(|value| {
                    let parsed = parse_count(value).filter(|&n| n > 0);
                    if parsed.is_none() {
                        tracing::warn!(
                            value,
                            default = config.per_page,
                            "Invalid per_page parameter, using default"
                        );
                    }
                    parsed
                })
                .unwrap_or(config.per_page)
                .max(1),
        };

        let page = request
            .param(&config.param_name)
            .and_then(|value| {
                let parsed = parse_count(value).filter(|&n| n > 0);
                if parsed.is_none() {
                    tracing::warn!(
                        param = %config.param_name,
                        value,
                        "Invalid page parameter, using page 1"
                    );
                }
                parsed
            })
            .unwrap_or(1);

        Ok(Self { page, per_page })
    }

    #[must_use]
    pub fn page(&self) -> usize {
        self.page
    }

    #[must_use]
    pub fn per_page(&self) -> usize {
        self.per_page
    }

    /// Number of results skipped before this page.
    #[must_use]
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Replace the query's limit/offset with this window.
    #[must_use]
    pub fn apply(&self, query: QuerySpec) -> QuerySpec {
        QuerySpec {
            limit: Some(self.per_page),
            offset: Some(self.offset()),
            ..query
        }
    }

    /// Number of pages needed for `total_entries`.
    #[must_use]
    pub fn total_pages(&self, total_entries: usize) -> usize {
        total_entries.div_ceil(self.per_page)
    }
}

/// Presentation options for pagination controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationOptions {
    pub previous_label: String,
    pub next_label: String,
    pub class: String,
    pub separator: String,
    pub inner_window: usize,
    pub outer_window: usize,
    pub param_name: String,
}

impl From<&PaginationConfig> for PaginationOptions {
    fn from(config: &PaginationConfig) -> Self {
        Self {
            previous_label: config.previous_label.clone(),
            next_label: config.next_label.clone(),
            class: config.class.clone(),
            separator: config.separator.clone(),
            inner_window: config.inner_window,
            outer_window: config.outer_window,
            param_name: config.param_name.clone(),
        }
    }
}

impl PaginationOptions {
    /// Override options with the pass-through attributes of a tag.
    ///
    /// Unparseable window sizes are ignored with a warning.
    #[must_use]
    pub fn merged(mut self, attrs: &TagAttrs) -> Self {
        for (key, target) in [
            ("previous_label", &mut self.previous_label),
            ("next_label", &mut self.next_label),
            ("class", &mut self.class),
            ("separator", &mut self.separator),
        ] {
            if let Some(value) = attrs.get(key) {
                value.clone_into(target);
            }
        }

        for (key, target) in [
            ("inner_window", &mut self.inner_window),
            ("outer_window", &mut self.outer_window),
        ] {
            if let Some(value) = attrs.get(key) {
                match parse_count(value) {
                    Some(n) => *target = n,
                    None => {
                        tracing::warn!(
                            attribute = key,
                            value,
                            default = *target,
                            "Invalid window size, using default"
                        );
                    }
                }
            }
        }

        self
    }
}

/// Link to another page of results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
}

/// Entry in the visible page list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageItem {
    /// Numbered page; `current` marks the page being shown.
    Page {
        number: usize,
        href: String,
        current: bool,
    },
    /// Run of hidden pages.
    Gap,
}

/// Everything a renderer needs to draw pagination controls.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PaginationControls {
    pub current_page: usize,
    pub per_page: usize,
    pub total_entries: usize,
    pub total_pages: usize,
    pub previous: Option<PageLink>,
    pub next: Option<PageLink>,
    pub pages: Vec<PageItem>,
    pub options: PaginationOptions,
}

impl PaginationControls {
    /// Compute controls for `window` over `total_entries` results.
    ///
    /// Links point at `"{path}?{param_name}={n}"`.
    #[must_use]
    pub fn compute(
        window: PaginationWindow,
        total_entries: usize,
        path: &str,
        options: PaginationOptions,
    ) -> Self {
        let total_pages = window.total_pages(total_entries);
        let current = window.page;
        let link = |number: usize| PageLink {
            number,
            href: format!("{path}?{}={number}", options.param_name),
        };

        let previous = (current > 1).then(|| link(current - 1));
        let next = (current < total_pages).then(|| link(current + 1));

        let mut pages = Vec::new();
        let mut last_shown = 0;
        let visible = visible_pages(
            current,
            total_pages,
            options.inner_window,
            options.outer_window,
        );
        for number in visible {
            if number > last_shown + 1 {
                pages.push(PageItem::Gap);
            }
            let PageLink { number, href } = link(number);
            pages.push(PageItem::Page {
                number,
                href,
                current: number == current,
            });
            last_shown = number;
        }

        tracing::debug!(
            current_page = current,
            per_page = window.per_page,
            total_entries,
            total_pages,
            "Computed pagination controls"
        );

        Self {
            current_page: current,
            per_page: window.per_page,
            total_entries,
            total_pages,
            previous,
            next,
            pages,
            options,
        }
    }

    /// Controls are only worth drawing when there is more than one page.
    #[must_use]
    pub fn is_paginated(&self) -> bool {
        self.total_pages > 1
    }
}

/// Page numbers shown by the control.
///
/// Shows `inner` pages on each side of `current` (the window shifts to
/// stay within `1..=total`), `outer` pages after the first and before the
/// last, and hides a run only when it spans at least two pages.
fn visible_pages(current: usize, total: usize, inner: usize, outer: usize) -> Vec<usize> {
    let span = inner.saturating_mul(2);
    let upper = current.saturating_add(inner).min(total);
    let (from, to) = if upper > span {
        (upper - span, upper)
    } else {
        (1, span.saturating_add(1).min(total))
    };

    let left_gap = (outer.saturating_add(2), from);
    let right_gap = (to.saturating_add(1), total.saturating_sub(outer));
    let hidden = |gap: (usize, usize), n: usize| {
        gap.1 > gap.0.saturating_add(1) && (gap.0..gap.1).contains(&n)
    };

    (1..=total)
        .filter(|&n| !hidden(left_gap, n) && !hidden(right_gap, n))
        .collect()
}

/// Draws pagination controls. Supplied by the host.
pub trait PaginationRenderer: Send + Sync {
    /// Render controls to markup.
    fn render(&self, controls: &PaginationControls) -> String;
}
