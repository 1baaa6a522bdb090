//! Tag attribute parsing.
//!
//! Parses the `key="value"` attribute syntax of a tag.

use std::collections::BTreeMap;

/// Attributes of a single tag invocation.
///
/// # Example
///
/// ```
/// use lineage_tags::TagAttrs;
///
/// let attrs = TagAttrs::parse(r#"by="title" order='desc' limit=5"#);
/// assert_eq!(attrs.get("by"), Some("title"));
/// assert_eq!(attrs.get("order"), Some("desc"));
/// assert_eq!(attrs.get("limit"), Some("5"));
/// assert_eq!(attrs.get("status"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagAttrs(BTreeMap<String, String>);

/// Attributes of compound tag prefixes, which never carry any.
pub(crate) static EMPTY: TagAttrs = TagAttrs(BTreeMap::new());

impl TagAttrs {
    /// Create an empty attribute set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an attribute string into an attribute set.
    ///
    /// Supports `key="value"`, `key='value'` and `key=value`. Later
    /// duplicates win; unrecognized characters are skipped.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let mut attrs = Self::default();
        let mut remaining = s.trim();

        while !remaining.is_empty() {
            remaining = remaining.trim_start();

            if let Some((key, value, rest)) = parse_key_value(remaining) {
                attrs.insert(key, value);
                remaining = rest;
            } else {
                let skip = remaining.chars().next().map_or(0, char::len_utf8);
                remaining = &remaining[skip..];
            }
        }

        attrs
    }

    /// Set an attribute, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set an attribute.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Get an attribute value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Check whether a boolean attribute is exactly `"true"`.
    #[must_use]
    pub fn flag(&self, key: &str) -> bool {
        self.get(key) == Some("true")
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate attributes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TagAttrs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Parse a key-value pair from the attributes string.
///
/// Supports: `key="value"`, `key='value'`, `key=value`
fn parse_key_value(s: &str) -> Option<(&str, &str, &str)> {
    let eq_pos = s.find('=')?;
    let key = s[..eq_pos].trim();

    if key.is_empty() || key.contains(char::is_whitespace) {
        return None;
    }

    let after_eq = &s[eq_pos + 1..];

    if let Some(stripped) = after_eq.strip_prefix('"') {
        let end_quote = stripped.find('"')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else if let Some(stripped) = after_eq.strip_prefix('\'') {
        let end_quote = stripped.find('\'')?;
        Some((key, &stripped[..end_quote], &stripped[end_quote + 1..]))
    } else {
        // Unquoted value (until whitespace)
        let end = after_eq.find(char::is_whitespace).unwrap_or(after_eq.len());
        Some((key, &after_eq[..end], &after_eq[end..]))
    }
}
