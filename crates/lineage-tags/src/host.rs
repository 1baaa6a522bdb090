//! Host collaborators consumed during expansion.

use std::collections::BTreeMap;

use lineage_config::Config;
use lineage_pages::PageRepository;

use crate::PaginationRenderer;

/// The request a template is rendered for.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    /// Host name, used for the development host rule.
    pub host: String,
    /// Request path, used as the base of pagination links.
    pub path: String,
    /// Query parameters.
    pub params: BTreeMap<String, String>,
}

impl Request {
    #[must_use]
    pub fn new(host: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            path: path.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add a query parameter, builder style.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Get a query parameter.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

/// Everything the tags read from the host for one render.
#[derive(Clone, Copy)]
pub struct Host<'a> {
    pub repository: &'a dyn PageRepository,
    pub config: &'a Config,
    pub request: &'a Request,
    pub paginator: &'a dyn PaginationRenderer,
}

impl Host<'_> {
    /// Whether the request targets the development host.
    #[must_use]
    pub fn is_dev_request(&self) -> bool {
        self.config.tags.is_dev_host(&self.request.host)
    }
}
