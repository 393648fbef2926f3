//! Path routing: verb + template registration and first-match dispatch.
//!
//! Templates are compiled once at registration; dispatch is a segment-wise
//! scan of the method's routes in insertion order, so the first registered
//! structural match always wins. A path that matches nothing is a normal
//! [`Dispatch::NotFound`] outcome, never an error: the caller owns the 404
//! policy.

mod template;

pub use template::Segment;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use template::{compile, match_path, normalize, same_shape};

/// The HTTP verbs this application routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl FromStr for Method {
    type Err = UnknownMethod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// An HTTP method this router does not know.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown HTTP method: {0}")]
pub struct UnknownMethod(pub String);

/// Registration-time template errors. These fail at boot, never at dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("unbalanced braces in route template `{template}`")]
    UnbalancedBraces { template: String },
    #[error("empty parameter name in route template `{template}`")]
    EmptyParam { template: String },
    #[error("duplicate parameter `{name}` in route template `{template}`")]
    DuplicateParam { template: String, name: String },
}

/// Parameters captured from a matched path, in template order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    entries: Vec<(String, String)>,
}

impl PathParams {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A registered route: the original template, its compiled segments, and the
/// handler. Immutable once registered.
pub struct Route<H> {
    template: String,
    segments: Vec<Segment>,
    handler: H,
}

impl<H> Route<H> {
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }
}

/// A successful dispatch: the matched handler and the captured parameters.
pub struct RouteMatch<'r, H> {
    pub handler: &'r H,
    pub params: PathParams,
    pub template: &'r str,
}

/// The outcome of a dispatch. `NotFound` is a normal result; the router
/// never guesses a handler.
pub enum Dispatch<'r, H> {
    Matched(RouteMatch<'r, H>),
    NotFound,
}

impl<'r, H> Dispatch<'r, H> {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Dispatch::NotFound)
    }

    #[must_use]
    pub fn into_match(self) -> Option<RouteMatch<'r, H>> {
        match self {
            Dispatch::Matched(matched) => Some(matched),
            Dispatch::NotFound => None,
        }
    }
}

/// The route table: per-method ordered lists of compiled routes.
pub struct Router<H> {
    tables: HashMap<Method, Vec<Route<H>>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Router<H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    /// Register a handler for `method` + `template`.
    ///
    /// A template with the same shape as one already registered for this
    /// method is skipped (first registration wins) and logged, keeping
    /// dispatch deterministic under repeated grouping.
    ///
    /// # Errors
    /// Returns `RouteError` for a malformed template.
    pub fn register(&mut self, method: Method, template: &str, handler: H) -> Result<(), RouteError> {
        let segments = compile(template)?;
        let routes = self.tables.entry(method).or_default();
        if routes.iter().any(|route| same_shape(&route.segments, &segments)) {
            tracing::warn!(
                method = %method,
                template,
                "route shares its shape with an earlier registration; keeping the first"
            );
            return Ok(());
        }
        routes.push(Route {
            template: template.to_string(),
            segments,
            handler,
        });
        Ok(())
    }

    /// # Errors
    /// Returns `RouteError` for a malformed template.
    pub fn get(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::Get, template, handler)
    }

    /// # Errors
    /// Returns `RouteError` for a malformed template.
    pub fn post(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::Post, template, handler)
    }

    /// # Errors
    /// Returns `RouteError` for a malformed template.
    pub fn put(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::Put, template, handler)
    }

    /// # Errors
    /// Returns `RouteError` for a malformed template.
    pub fn delete(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::Delete, template, handler)
    }

    /// Register a block of routes under a shared prefix.
    ///
    /// # Errors
    /// Propagates the first `RouteError` from the builder.
    pub fn group<F>(&mut self, prefix: &str, build: F) -> Result<(), RouteError>
    where
        F: FnOnce(&mut RouteGroup<'_, H>) -> Result<(), RouteError>,
    {
        let mut group = RouteGroup {
            prefix: prefix.to_string(),
            router: self,
        };
        build(&mut group)
    }

    /// Resolve `method` + `path` to the first structurally matching route.
    #[must_use]
    pub fn dispatch(&self, method: Method, path: &str) -> Dispatch<'_, H> {
        let path = normalize(path);
        let Some(routes) = self.tables.get(&method) else {
            return Dispatch::NotFound;
        };

        for route in routes {
            if let Some(captured) = match_path(&route.segments, path) {
                let params = PathParams {
                    entries: captured
                        .into_iter()
                        .map(|(name, value)| (name.to_string(), value))
                        .collect(),
                };
                return Dispatch::Matched(RouteMatch {
                    handler: &route.handler,
                    params,
                    template: &route.template,
                });
            }
        }
        Dispatch::NotFound
    }

    /// Routes registered for one method, in priority order.
    pub fn routes(&self, method: Method) -> impl Iterator<Item = &Route<H>> {
        self.tables.get(&method).into_iter().flatten()
    }

    /// Total number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A scoped registrar whose registrations are prefixed automatically.
pub struct RouteGroup<'r, H> {
    prefix: String,
    router: &'r mut Router<H>,
}

impl<H> RouteGroup<'_, H> {
    fn join(&self, template: &str) -> String {
        format!(
            "{}/{}",
            self.prefix.trim_end_matches('/'),
            template.trim_start_matches('/')
        )
    }

    /// # Errors
    /// Returns `RouteError` for a malformed template.
    pub fn register(&mut self, method: Method, template: &str, handler: H) -> Result<(), RouteError> {
        let full = self.join(template);
        self.router.register(method, &full, handler)
    }

    /// # Errors
    /// Returns `RouteError` for a malformed template.
    pub fn get(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::Get, template, handler)
    }

    /// # Errors
    /// Returns `RouteError` for a malformed template.
    pub fn post(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::Post, template, handler)
    }

    /// # Errors
    /// Returns `RouteError` for a malformed template.
    pub fn put(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::Put, template, handler)
    }

    /// # Errors
    /// Returns `RouteError` for a malformed template.
    pub fn delete(&mut self, template: &str, handler: H) -> Result<(), RouteError> {
        self.register(Method::Delete, template, handler)
    }

    /// Nest a further prefix under this group.
    ///
    /// # Errors
    /// Propagates the first `RouteError` from the builder.
    pub fn group<F>(&mut self, prefix: &str, build: F) -> Result<(), RouteError>
    where
        F: FnOnce(&mut RouteGroup<'_, H>) -> Result<(), RouteError>,
    {
        let joined = self.join(prefix);
        let mut group = RouteGroup {
            prefix: joined,
            router: &mut *self.router,
        };
        build(&mut group)
    }
}
