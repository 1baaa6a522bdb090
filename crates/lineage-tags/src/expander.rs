//! Tag dispatch and template expansion.
//!
//! Tags are looked up by name in a [`TagRegistry`] and called with a
//! [`TagCall`] describing the invocation. Name resolution works on the
//! stack of enclosing tag names:
//!
//! - A compound name `a:b:c` expands as `a` containing `b` containing `c`;
//!   attributes and body belong to `c`.
//! - A simple name resolves to the most specific registered name that ends
//!   with it and whose other parts appear, in order, among the enclosing
//!   tags (`if_first` inside `grandchildren:each` finds
//!   `grandchildren:each:if_first`), falling back to the bare name.

use std::collections::{BTreeSet, HashMap};

use lineage_pages::{Page, PageId};

use crate::attrs::EMPTY;
use crate::{Host, IterationState, Node, TagAttrs, TagError};

/// Tag handler: renders one invocation.
pub type TagHandler = fn(&mut TagCall<'_>) -> Result<String, TagError>;

/// Dispatch table from qualified tag names to handlers.
#[derive(Clone, Debug, Default)]
pub struct TagRegistry {
    handlers: HashMap<String, TagHandler>,
}

impl TagRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the standard page tags and the grandchildren tags.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::standard::register(&mut registry);
        crate::grandchildren::register(&mut registry);
        registry
    }

    /// Register a handler, replacing any previous one with the same name.
    pub fn register(&mut self, name: impl Into<String>, handler: TagHandler) {
        self.handlers.insert(name.into(), handler);
    }

    /// Register a handler, builder style.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, handler: TagHandler) -> Self {
        self.register(name, handler);
        self
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Resolve the innermost part of `nesting` to a registered tag.
    fn resolve(&self, nesting: &[String]) -> Option<(&str, TagHandler)> {
        let name = nesting.last()?;
        let specific = nesting.join(":");
        if let Some((key, handler)) = self.handlers.get_key_value(&specific) {
            return Some((key, *handler));
        }

        let suffix = format!(":{name}");
        self.handlers
            .iter()
            .filter(|(key, _)| *key == name || key.ends_with(&suffix))
            .filter_map(|(key, handler)| specificity(key, nesting).map(|s| (s, key, handler)))
            .max_by(|a, b| a.0.cmp(&b.0))
            .map(|(_, key, handler)| (key.as_str(), *handler))
    }
}

/// How closely `tag_name` matches the enclosing tags.
///
/// Walks `nesting` from the innermost tag outward, consuming the parts of
/// `tag_name` from the end. Returns `None` unless every part is consumed.
/// A match closer to the innermost tag outranks any number of matches
/// further out, which is the lexicographic order of the returned flags.
fn specificity(tag_name: &str, nesting: &[String]) -> Option<Vec<bool>> {
    let mut parts: Vec<&str> = tag_name.split(':').collect();
    let mut score = Vec::with_capacity(nesting.len());
    for part in nesting.iter().rev() {
        let matched = parts.last() == Some(&part.as_str());
        if matched {
            parts.pop();
        }
        score.push(matched);
    }
    parts.is_empty().then_some(score)
}

/// Contextual values visible to a tag and inherited by its body.
///
/// Each tag gets its own copy; changes apply to the body it expands, never
/// to its siblings.
#[derive(Clone, Debug, Default)]
pub struct Locals {
    /// Page that page attribute tags refer to.
    pub page: Option<Page>,
    /// Parent scope set by `grandchildren`.
    pub parent_ids: Option<BTreeSet<PageId>>,
    /// Element of the innermost `each` pass.
    pub child: Option<Page>,
    /// Pagination of the innermost paginated `each` pass.
    pub paginated: Option<crate::grandchildren::PaginatedList>,
}

impl Locals {
    /// Locals for rendering `page`.
    #[must_use]
    pub fn for_page(page: Page) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }
}

/// Body of a tag invocation.
#[derive(Clone, Copy)]
enum Body<'t> {
    Nodes(&'t [Node]),
    /// Remainder of a compound name, expanded as the only body node.
    Nested {
        name: &'t str,
        attrs: &'t TagAttrs,
        body: &'t [Node],
    },
}

/// A single tag invocation.
pub struct TagCall<'t> {
    expander: &'t Expander<'t>,
    /// Qualified name the tag resolved to.
    pub name: &'t str,
    /// Attributes of the invocation.
    pub attrs: &'t TagAttrs,
    /// Contextual values; [`expand`](Self::expand) passes them to the body.
    pub locals: Locals,
    body: Body<'t>,
    nesting: Vec<String>,
    iteration: Option<&'t mut IterationState>,
}

impl<'t> TagCall<'t> {
    /// Host collaborators.
    #[must_use]
    pub fn host(&self) -> &'t Host<'t> {
        &self.expander.host
    }

    /// Attribute value by key.
    #[must_use]
    pub fn attr(&self, key: &str) -> Option<&'t str> {
        self.attrs.get(key)
    }

    /// Contextual page, or [`TagError::MissingContext`].
    pub fn page(&self) -> Result<&Page, TagError> {
        self.locals
            .page
            .as_ref()
            .ok_or_else(|| TagError::missing(self.name, "page"))
    }

    /// Iteration state of the innermost `each` pass, or
    /// [`TagError::MissingContext`].
    pub fn iteration(&mut self) -> Result<&mut IterationState, TagError> {
        let name = self.name;
        self.iteration
            .as_deref_mut()
            .ok_or_else(|| TagError::missing(name, "iteration"))
    }

    /// Expand the body with the current locals.
    pub fn expand(&mut self) -> Result<String, TagError> {
        let locals = std::mem::take(&mut self.locals);
        let result = self.expand_with(&locals);
        self.locals = locals;
        result
    }

    /// Expand the body with `locals`.
    pub fn expand_with(&mut self, locals: &Locals) -> Result<String, TagError> {
        let iteration = self.iteration.as_deref_mut();
        self.expander
            .expand_body(self.body, &self.nesting, locals, iteration)
    }

    /// Expand the body with `locals` as part of the pass `state`.
    pub fn expand_iterating(
        &mut self,
        locals: &Locals,
        state: &mut IterationState,
    ) -> Result<String, TagError> {
        self.expander
            .expand_body(self.body, &self.nesting, locals, Some(state))
    }

    /// Render another tag by name, without a body, as if it were nested in
    /// this one.
    pub fn render_tag(
        &mut self,
        name: &str,
        attrs: &TagAttrs,
        locals: &Locals,
    ) -> Result<String, TagError> {
        let iteration = self.iteration.as_deref_mut();
        self.expander
            .expand_tag(name, attrs, &[], &self.nesting, locals, iteration)
    }
}

/// Expands template trees against a registry and host.
///
/// One expander serves one render; see the crate documentation for a
/// complete example.
pub struct Expander<'h> {
    registry: &'h TagRegistry,
    host: Host<'h>,
}

impl<'h> Expander<'h> {
    #[must_use]
    pub fn new(registry: &'h TagRegistry, host: Host<'h>) -> Self {
        Self { registry, host }
    }

    /// Render `template` with `page` as the contextual page.
    ///
    /// # Errors
    ///
    /// Aborts on the first tag error; no partial output is returned.
    pub fn render(&self, page: &Page, template: &[Node]) -> Result<String, TagError> {
        let locals = Locals::for_page(page.clone());
        self.expand_nodes(template, &[], &locals, None)
    }

    fn expand_body(
        &self,
        body: Body<'_>,
        nesting: &[String],
        locals: &Locals,
        iteration: Option<&mut IterationState>,
    ) -> Result<String, TagError> {
        match body {
            Body::Nodes(nodes) => self.expand_nodes(nodes, nesting, locals, iteration),
            Body::Nested { name, attrs, body } => {
                self.expand_tag(name, attrs, body, nesting, locals, iteration)
            }
        }
    }

    pub(crate) fn expand_nodes(
        &self,
        nodes: &[Node],
        nesting: &[String],
        locals: &Locals,
        mut iteration: Option<&mut IterationState>,
    ) -> Result<String, TagError> {
        let mut output = String::new();
        for node in nodes {
            match node {
                Node::Text(text) => output.push_str(text),
                Node::Tag { name, attrs, body } => {
                    let rendered = self.expand_tag(
                        name,
                        attrs,
                        body,
                        nesting,
                        locals,
                        iteration.as_deref_mut(),
                    )?;
                    output.push_str(&rendered);
                }
            }
        }
        Ok(output)
    }

    fn expand_tag(
        &self,
        name: &str,
        attrs: &TagAttrs,
        body: &[Node],
        nesting: &[String],
        locals: &Locals,
        iteration: Option<&mut IterationState>,
    ) -> Result<String, TagError> {
        match name.split_once(':') {
            Some((outer, rest)) => self.call(
                outer,
                &EMPTY,
                Body::Nested {
                    name: rest,
                    attrs,
                    body,
                },
                nesting,
                locals,
                iteration,
            ),
            None => self.call(name, attrs, Body::Nodes(body), nesting, locals, iteration),
        }
    }

    fn call(
        &self,
        part: &str,
        attrs: &TagAttrs,
        body: Body<'_>,
        nesting: &[String],
        locals: &Locals,
        iteration: Option<&mut IterationState>,
    ) -> Result<String, TagError> {
        let mut nesting = nesting.to_vec();
        nesting.push(part.to_owned());

        let (name, handler) = self
            .registry
            .resolve(&nesting)
            .ok_or_else(|| TagError::UndefinedTag(nesting.join(":")))?;

        let mut call = TagCall {
            expander: self,
            name,
            attrs,
            locals: locals.clone(),
            body,
            nesting,
            iteration,
        };
        handler(&mut call)
    }
}

#[cfg(test)]
mod tests {
    use lineage_config::Config;
    use lineage_pages::{MemoryRepository, NewPage, PageRepository};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{PaginationControls, PaginationRenderer, Request};

    static_assertions::assert_impl_all!(TagRegistry: Send, Sync);

    struct NoControls;

    impl PaginationRenderer for NoControls {
        fn render(&self, _controls: &PaginationControls) -> String {
            String::new()
        }
    }

    fn nesting(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|&p| p.to_owned()).collect()
    }

    fn echo_name(call: &mut TagCall<'_>) -> Result<String, TagError> {
        Ok(format!("[{}]", call.name))
    }

    fn wrap(call: &mut TagCall<'_>) -> Result<String, TagError> {
        let inner = call.expand()?;
        Ok(format!("<{}>{inner}</{}>", call.name, call.name))
    }

    fn attr_x(call: &mut TagCall<'_>) -> Result<String, TagError> {
        Ok(call.attr("x").unwrap_or("-").to_owned())
    }

    fn render(registry: &TagRegistry, template: &[Node]) -> Result<String, TagError> {
        let mut repo = MemoryRepository::new();
        let id = repo.insert(NewPage::new("/"));
        let page = repo.page(id).unwrap().unwrap();
        let config = Config::default();
        let request = Request::new("site.com", "/");
        let host = Host {
            repository: &repo,
            config: &config,
            request: &request,
            paginator: &NoControls,
        };
        Expander::new(registry, host).render(&page, template)
    }

    #[test]
    fn test_specificity_requires_all_parts() {
        let stack = nesting(&["grandchildren", "each", "if_first"]);
        assert!(specificity("grandchildren:each:if_first", &stack).is_some());
        assert!(specificity("if_first", &stack).is_some());
        assert!(specificity("children:each:if_first", &stack).is_none());
    }

    #[test]
    fn test_specificity_prefers_inner_matches() {
        let stack = nesting(&["a", "b", "x"]);
        let outer = specificity("a:x", &stack).unwrap();
        let inner = specificity("b:x", &stack).unwrap();
        assert!(inner > outer);
    }

    #[test]
    fn test_resolve_exact_nested_name() {
        let registry = TagRegistry::new()
            .with("if_first", echo_name)
            .with("grandchildren:each:if_first", echo_name);
        let (name, _) = registry
            .resolve(&nesting(&["grandchildren", "each", "if_first"]))
            .unwrap();
        assert_eq!(name, "grandchildren:each:if_first");
    }

    #[test]
    fn test_resolve_falls_back_to_bare_name() {
        let registry = TagRegistry::new().with("slug", echo_name);
        let (name, _) = registry
            .resolve(&nesting(&["grandchildren", "each", "slug"]))
            .unwrap();
        assert_eq!(name, "slug");
    }

    #[test]
    fn test_resolve_skips_intermediate_tags() {
        let registry = TagRegistry::new()
            .with("header", echo_name)
            .with("grandchildren:each:header", echo_name);
        let (name, _) = registry
            .resolve(&nesting(&["grandchildren", "each", "parent", "header"]))
            .unwrap();
        assert_eq!(name, "grandchildren:each:header");
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = TagRegistry::new().with("slug", echo_name);
        assert!(registry.resolve(&nesting(&["title"])).is_none());
        assert!(registry.resolve(&[]).is_none());
    }

    #[test]
    fn test_compound_name_nests_with_attrs_on_innermost() {
        let registry = TagRegistry::new()
            .with("outer", wrap)
            .with("outer:inner", wrap)
            .with("x", attr_x);
        let template = [Node::tag("outer:inner")
            .attr("x", "1")
            .child(Node::tag("x").attr("x", "2"))];

        let output = render(&registry, &template).unwrap();

        assert_eq!(output, "<outer><outer:inner>2</outer:inner></outer>");
    }

    #[test]
    fn test_compound_prefix_gets_no_attrs() {
        let registry = TagRegistry::new().with("x", attr_x).with("y", attr_x);
        // `x` renders its own attribute and ignores the nested `y`
        let output = render(&registry, &[Node::tag("x:y").attr("x", "1")]).unwrap();
        assert_eq!(output, "-");
    }

    #[test]
    fn test_text_and_tags_concatenate() {
        let registry = TagRegistry::new().with("name", echo_name);
        let template = [Node::text("a "), Node::tag("name"), Node::text(" b")];
        assert_eq!(render(&registry, &template).unwrap(), "a [name] b");
    }

    #[test]
    fn test_undefined_tag() {
        let registry = TagRegistry::new().with("outer", wrap);
        let template = [Node::tag("outer").child(Node::tag("missing"))];

        let err = render(&registry, &template).unwrap_err();

        assert!(matches!(err, TagError::UndefinedTag(ref name) if name == "outer:missing"));
    }

    #[test]
    fn test_iteration_absent_outside_each() {
        fn needs_iteration(call: &mut TagCall<'_>) -> Result<String, TagError> {
            call.iteration()?;
            Ok(String::new())
        }
        let registry = TagRegistry::new().with("if_first", needs_iteration);

        let err = render(&registry, &[Node::tag("if_first")]).unwrap_err();

        assert!(matches!(err, TagError::MissingContext { what: "iteration", .. }));
    }

    #[test]
    fn test_with_defaults_registers_surface() {
        let registry = TagRegistry::with_defaults();
        for name in [
            "if_grandchildren",
            "unless_grandchildren",
            "grandchildren",
            "grandchildren:count",
            "grandchildren:first",
            "grandchildren:last",
            "grandchildren:each",
            "grandchildren:each:child",
            "grandchildren:each:if_first",
            "grandchildren:each:unless_first",
            "grandchildren:each:if_last",
            "grandchildren:each:unless_last",
            "grandchildren:each:header",
            "pagination",
            "slug",
            "title",
            "breadcrumb",
            "date",
            "parent",
        ] {
            assert!(registry.contains(name), "{name} not registered");
        }
    }
}
