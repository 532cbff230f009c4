//! The route table: one segment tree per HTTP method plus a flat mapping
//! from `(method, pattern)` to the registered handler.

use crate::error::Error;
use crate::handler::{BoxHandler, Handler};
use crate::tree::{self, Node};
use crate::types::RouteParams;
use http::{Method, StatusCode};
use std::collections::HashMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

/// A successful route lookup: the registered pattern, the parameters
/// extracted from the request path, and the handler to run.
pub struct RouteMatch {
    pub pattern: String,
    pub params: RouteParams,
    pub handler: Arc<dyn Handler>,
}

/// Maps `(method, pattern)` pairs to handlers through per-method segment
/// trees. Built during setup and read-only while serving; matching takes
/// `&self` and needs no locking as long as no registration runs
/// concurrently with traffic.
pub struct Router {
    trees: HashMap<Method, Node>,
    handlers: HashMap<String, BoxHandler>,
    strict_routing: bool,
}

impl Router {
    pub fn new(strict_routing: bool) -> Self {
        Router {
            trees: HashMap::new(),
            handlers: HashMap::new(),
            strict_routing,
        }
    }

    /// Registers `handler` under `(method, pattern)`.
    ///
    /// Registering the same `(method, pattern)` twice replaces the previous
    /// handler silently; the last registration wins. Returns a
    /// configuration error for malformed patterns: a `*` segment anywhere
    /// but the final position, or a `:` segment with no name.
    pub fn add_route<H: Handler>(
        &mut self,
        method: Method,
        pattern: &str,
        handler: H,
    ) -> crate::Result<()> {
        self.add_route_arc(method, pattern, Arc::new(handler))
    }

    pub(crate) fn add_route_arc(
        &mut self,
        method: Method,
        pattern: &str,
        handler: BoxHandler,
    ) -> crate::Result<()> {
        let segments = parse_pattern(pattern)?;
        let key = route_key(&method, pattern);
        let root = self.trees.entry(method).or_insert_with(Node::root);
        root.insert(pattern, &segments, 0);
        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Resolves `path` under `method` to a handler plus extracted
    /// parameters, or `None` when nothing matches. The handler is looked up
    /// under the key re-derived from the matched node's stored pattern, not
    /// from the request path.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let root = self.trees.get(method)?;
        let segments = tree::split_segments(path);
        let node = root.search(&segments, 0)?;
        let pattern = node.pattern()?;

        if self.strict_routing && !trailing_slash_agrees(path, pattern) {
            return None;
        }

        let params = tree::extract_params(pattern, &segments);
        let handler = self.handlers.get(&route_key(method, pattern))?.clone();
        Some(RouteMatch {
            pattern: pattern.to_string(),
            params,
            handler,
        })
    }

    /// The number of registered `(method, pattern)` pairs.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl Debug for Router {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut routes: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        routes.sort_unstable();
        f.debug_struct("Router")
            .field("routes", &routes)
            .field("strict_routing", &self.strict_routing)
            .finish()
    }
}

fn route_key(method: &Method, pattern: &str) -> String {
    format!("{}:{}", method, pattern)
}

/// Splits and validates a pattern at registration time, so malformed
/// patterns never reach the matching path.
fn parse_pattern(pattern: &str) -> crate::Result<Vec<&str>> {
    let segments = tree::split_segments(pattern);
    for (index, segment) in segments.iter().enumerate() {
        if segment.starts_with('*') && index != segments.len() - 1 {
            return Err(Error::with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("wildcard segment must be the last segment of a pattern: {pattern}"),
            )
            .into());
        }
        if *segment == ":" {
            return Err(Error::with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("param segment is missing a name: {pattern}"),
            )
            .into());
        }
    }
    Ok(segments)
}

/// Under strict routing, the request path and the registered pattern must
/// agree on a trailing slash (the root path is exempt).
fn trailing_slash_agrees(path: &str, pattern: &str) -> bool {
    fn trailing(p: &str) -> bool {
        p.len() > 1 && p.ends_with('/')
    }
    trailing(path) == trailing(pattern)
}
