//! Route dispatch: which endpoints carry bind paths, and in which shape.
//!
//! Paths may carry an API version prefix (`/v1.43/containers/json`), so every
//! pattern accepts an arbitrary leading path.

use crate::schema::Schema;
use axum::http::Method;
use regex::Regex;
use std::sync::LazyLock;

/// One entry of the route table.
#[derive(Debug)]
pub struct RouteRule {
    method: Method,
    pattern: Regex,
    schema: Schema,
}

impl RouteRule {
    fn new(method: Method, pattern: &str, schema: Schema) -> Self {
        Self {
            method,
            pattern: Regex::new(pattern).expect("valid route pattern"),
            schema,
        }
    }

    /// Returns true if the rule applies to `method` and `path`.
    #[must_use]
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        self.method == method && self.pattern.is_match(path)
    }

    /// Returns the HTTP method of the rule.
    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the URL path pattern of the rule.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Returns the schema bodies on this route follow.
    #[must_use]
    pub const fn schema(&self) -> Schema {
        self.schema
    }
}

// Ordered; the first matching rule wins.
static ROUTES: LazyLock<Vec<RouteRule>> = LazyLock::new(|| {
    vec![
        RouteRule::new(
            Method::GET,
            r"^(/.*)?/containers(/[^/]+)?/json$",
            Schema::ContainerSummary,
        ),
        RouteRule::new(
            Method::POST,
            r"^(/.*)?/containers/create$",
            Schema::ContainerConfig,
        ),
        RouteRule::new(
            Method::POST,
            r"^(/.*)?/services/create$",
            Schema::ServiceSpec,
        ),
        RouteRule::new(
            Method::POST,
            r"^(/.*)?/services/[^/]+/update$",
            Schema::ServiceSpec,
        ),
        RouteRule::new(Method::GET, r"^(/.*)?/services(/[^/]+)?$", Schema::Service),
        RouteRule::new(Method::GET, r"^(/.*)?/tasks(/[^/]+)?$", Schema::Task),
    ]
});

/// Returns the route table in priority order.
#[must_use]
pub fn routes() -> &'static [RouteRule] {
    &ROUTES
}

/// Resolves the schema for a request, or `None` if bodies on this route
/// carry no bind paths.
#[must_use]
pub fn resolve(method: &Method, path: &str) -> Option<Schema> {
    let rule = routes().iter().find(|rule| rule.matches(method, path))?;
    tracing::debug!(
        method = %rule.method(),
        pattern = rule.pattern(),
        schema = %rule.schema(),
        path,
        "matched rewrite route"
    );
    Some(rule.schema())
}
