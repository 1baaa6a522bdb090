//! Page records as the host repository exposes them.
//!
//! Pages are opaque to the tag engine except for the queryable fields
//! listed in [`PageField`]. Nothing in this workspace mutates a page once
//! it has been handed out by a [`PageRepository`](crate::PageRepository).

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique page identifier.
///
/// Identifiers are assigned in insertion order, so comparing ids also
/// compares the repository's natural order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(pub u64);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Publication state of a page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Work in progress, hidden from visitors.
    Draft,
    /// Awaiting approval.
    Reviewed,
    /// Visible to everyone.
    Published,
    /// Published but left out of listings.
    Hidden,
}

impl Status {
    /// All statuses in ascending id order.
    pub const ALL: [Self; 4] = [Self::Draft, Self::Reviewed, Self::Published, Self::Hidden];

    /// Numeric status id as stored by the host.
    #[must_use]
    pub const fn id(self) -> u32 {
        match self {
            Self::Draft => 1,
            Self::Reviewed => 50,
            Self::Published => 100,
            Self::Hidden => 101,
        }
    }

    /// Keyword used in tag attributes and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Reviewed => "reviewed",
            Self::Published => "published",
            Self::Hidden => "hidden",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a [`Status`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown page status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for Status {
    type Err = UnknownStatus;

    /// Status keywords are matched case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownStatus(s.to_owned()))
    }
}

/// Queryable page column.
///
/// The external names match the host's column names and are the only
/// values accepted by the `by` attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageField {
    /// `id`
    Id,
    /// `title`
    Title,
    /// `slug`
    Slug,
    /// `breadcrumb`
    Breadcrumb,
    /// `status_id`
    StatusId,
    /// `parent_id`
    ParentId,
    /// `virtual`
    Virtual,
    /// `published_at`
    PublishedAt,
    /// `created_at`
    CreatedAt,
    /// `updated_at`
    UpdatedAt,
}

impl PageField {
    /// Every queryable field.
    pub const ALL: [Self; 10] = [
        Self::Id,
        Self::Title,
        Self::Slug,
        Self::Breadcrumb,
        Self::StatusId,
        Self::ParentId,
        Self::Virtual,
        Self::PublishedAt,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// Column name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Title => "title",
            Self::Slug => "slug",
            Self::Breadcrumb => "breadcrumb",
            Self::StatusId => "status_id",
            Self::ParentId => "parent_id",
            Self::Virtual => "virtual",
            Self::PublishedAt => "published_at",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

impl fmt::Display for PageField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string does not name a [`PageField`].
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown page field: {0}")]
pub struct UnknownField(pub String);

impl FromStr for PageField {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.name() == s)
            .ok_or_else(|| UnknownField(s.to_owned()))
    }
}

/// Sort direction for ordered queries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

/// Error returned when a string is neither `asc` nor `desc`.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort direction: {0}")]
pub struct UnknownDirection(pub String);

impl FromStr for SortDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(UnknownDirection(other.to_owned())),
        }
    }
}

/// Page record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Unique identifier.
    pub id: PageId,
    /// Parent page, `None` for the root.
    pub parent_id: Option<PageId>,
    /// Display title.
    pub title: String,
    /// URL segment.
    pub slug: String,
    /// Short title used in navigation trails.
    pub breadcrumb: String,
    /// Publication state.
    pub status: Status,
    /// Publication timestamp (unset for pages that were never published).
    pub published_at: Option<DateTime<Utc>>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last modification timestamp.
    pub updated_at: DateTime<Utc>,
    /// Virtual pages (feeds, archives, error pages) are never listed.
    #[serde(default, rename = "virtual")]
    pub is_virtual: bool,
}

impl Page {
    /// Date shown for the page: publication date, or creation date for
    /// pages that were never published.
    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }

    /// Compare two pages by a single field in ascending order.
    ///
    /// Absent values (unpublished pages, roots) sort before present ones.
    #[must_use]
    pub fn compare_by(&self, field: PageField, other: &Self) -> Ordering {
        match field {
            PageField::Id => self.id.cmp(&other.id),
            PageField::Title => self.title.cmp(&other.title),
            PageField::Slug => self.slug.cmp(&other.slug),
            PageField::Breadcrumb => self.breadcrumb.cmp(&other.breadcrumb),
            PageField::StatusId => self.status.id().cmp(&other.status.id()),
            PageField::ParentId => self.parent_id.cmp(&other.parent_id),
            PageField::Virtual => self.is_virtual.cmp(&other.is_virtual),
            PageField::PublishedAt => self.published_at.cmp(&other.published_at),
            PageField::CreatedAt => self.created_at.cmp(&other.created_at),
            PageField::UpdatedAt => self.updated_at.cmp(&other.updated_at),
        }
    }
}
