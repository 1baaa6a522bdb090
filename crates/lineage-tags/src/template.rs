//! Pre-parsed template tree.
//!
//! Templates reach the expander already parsed; these builders exist so
//! hosts and tests can assemble trees directly.

use crate::TagAttrs;

/// Node of a template tree.
///
/// # Example
///
/// ```
/// use lineage_tags::Node;
///
/// // <r:grandchildren:each by="slug"><r:slug /> </r:grandchildren:each>
/// let each = Node::tag("grandchildren:each")
///     .attrs(r#"by="slug""#)
///     .child(Node::tag("slug"))
///     .child(Node::text(" "));
/// assert!(matches!(each, Node::Tag { ref body, .. } if body.len() == 2));
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// Literal output.
    Text(String),
    /// Tag invocation. `name` may be compound (`grandchildren:each`).
    Tag {
        name: String,
        attrs: TagAttrs,
        body: Vec<Node>,
    },
}

impl Node {
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Tag without attributes or body.
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag {
            name: name.into(),
            attrs: TagAttrs::new(),
            body: Vec::new(),
        }
    }

    /// Set one attribute. No effect on text nodes.
    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Self::Tag { attrs, .. } = &mut self {
            attrs.insert(key, value);
        }
        self
    }

    /// Set attributes from `key="value"` syntax. No effect on text nodes.
    #[must_use]
    pub fn attrs(mut self, syntax: &str) -> Self {
        if let Self::Tag { attrs, .. } = &mut self {
            for (key, value) in TagAttrs::parse(syntax).iter() {
                attrs.insert(key, value);
            }
        }
        self
    }

    /// Append a body node. No effect on text nodes.
    #[must_use]
    pub fn child(mut self, node: Node) -> Self {
        if let Self::Tag { body, .. } = &mut self {
            body.push(node);
        }
        self
    }

    /// Append body nodes. No effect on text nodes.
    #[must_use]
    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        if let Self::Tag { body, .. } = &mut self {
            body.extend(nodes);
        }
        self
    }
}
