//! Grandchildren template tags.
//!
//! Gives template authors access to the grandchildren of a page (the
//! children of its children): existence checks, counts, first/last access,
//! and iteration with pagination and change-triggered headers.
//!
//! The engine is layered as:
//!
//! - [`status`]: maps a `status` keyword to the allowed publication states
//! - [`collector`]: the parent scope of a page's grandchildren
//! - [`QueryBuilder`]: validates tag attributes into a [`QuerySpec`](lineage_pages::QuerySpec)
//! - [`IterationState`]: one `each` pass with first/last tracking and
//!   header memory
//! - [`PaginationWindow`], [`PaginationControls`]: the paginated slice and
//!   the data needed to draw its controls
//! - [`TagRegistry`], [`Expander`]: dispatch of tag names to handlers over
//!   a pre-parsed [`Node`] tree
//!
//! Pages are read through a host [`PageRepository`](lineage_pages::PageRepository);
//! pagination markup comes from a host [`PaginationRenderer`].
//!
//! # Example
//!
//! ```
//! use lineage_config::Config;
//! use lineage_pages::{MemoryRepository, NewPage, PageRepository};
//! use lineage_tags::{
//!     Expander, Host, Node, PaginationControls, PaginationRenderer, Request, TagRegistry,
//! };
//!
//! struct Plain;
//!
//! impl PaginationRenderer for Plain {
//!     fn render(&self, controls: &PaginationControls) -> String {
//!         format!("page {} of {}", controls.current_page, controls.total_pages)
//!     }
//! }
//!
//! let mut repo = MemoryRepository::new();
//! let home = repo.insert(NewPage::new("/"));
//! let news = repo.insert(NewPage::new("news").parent(home));
//! repo.insert(NewPage::new("hello").parent(news));
//! repo.insert(NewPage::new("again").parent(news));
//!
//! let registry = TagRegistry::with_defaults();
//! let config = Config::default();
//! let request = Request::new("site.com", "/");
//! let host = Host {
//!     repository: &repo,
//!     config: &config,
//!     request: &request,
//!     paginator: &Plain,
//! };
//!
//! // <r:grandchildren:each by="slug"><r:slug /> </r:grandchildren:each>
//! let template = [Node::tag("grandchildren:each")
//!     .attr("by", "slug")
//!     .children([Node::tag("slug"), Node::text(" ")])];
//!
//! let home = repo.page(home).unwrap().unwrap();
//! let output = Expander::new(&registry, host).render(&home, &template).unwrap();
//! assert_eq!(output, "again hello ");
//! ```

mod attrs;
pub mod collector;
mod error;
mod expander;
mod grandchildren;
mod host;
mod iteration;
mod pagination;
pub mod query;
mod standard;
pub mod status;
mod template;

pub use attrs::TagAttrs;
pub use error::TagError;
pub use expander::{Expander, Locals, TagCall, TagHandler, TagRegistry};
pub use grandchildren::PaginatedList;
pub use host::{Host, Request};
pub use iteration::{DEFAULT_HEADER, IterationState, Position, Visit};
pub use pagination::{
    PageItem, PageLink, PaginationControls, PaginationOptions, PaginationRenderer,
    PaginationWindow,
};
pub use query::QueryBuilder;
pub use template::Node;
