//! Status filter: maps a `status` keyword to the set of allowed states.

use lineage_config::ALL_STATUSES;
use lineage_pages::{Status, StatusSet};

use crate::TagError;

/// Resolve a `status` attribute to the allowed publication states.
///
/// Keywords are matched case-insensitively. `all` allows every status;
/// virtual pages stay excluded by the query itself. Without an explicit
/// token, development requests see every status and other requests fall
/// back to `default`.
///
/// # Errors
///
/// Returns [`TagError::InvalidStatus`] for anything but a single known
/// keyword.
///
/// # Example
///
/// ```
/// use lineage_pages::{Status, StatusSet};
/// use lineage_tags::status;
///
/// let drafts = status::resolve(Some("Draft"), false, "published").unwrap();
/// assert_eq!(drafts, StatusSet::only(Status::Draft));
///
/// let dev_default = status::resolve(None, true, "published").unwrap();
/// assert_eq!(dev_default, StatusSet::all());
///
/// assert!(status::resolve(Some("askdf"), false, "published").is_err());
/// ```
pub fn resolve(token: Option<&str>, dev_request: bool, default: &str) -> Result<StatusSet, TagError> {
    let keyword = match token {
        Some(token) => token,
        None if dev_request => ALL_STATUSES,
        None => default,
    };

    if keyword.eq_ignore_ascii_case(ALL_STATUSES) {
        return Ok(StatusSet::all());
    }

    keyword
        .parse::<Status>()
        .map(StatusSet::only)
        .map_err(|_| TagError::InvalidStatus)
}
