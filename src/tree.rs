//! The per-method segment tree backing the [`Router`](crate::Router).
//!
//! Patterns are split on `/` into segments. A segment starting with `:`
//! matches exactly one path segment and binds it under the rest of the
//! segment name; a segment starting with `*` matches all remaining path
//! segments and must be the last segment of its pattern.

use crate::types::RouteParams;

/// One segment level of a method's tree. `pattern` is non-empty only on
/// nodes that terminate a completed registration; a structurally reachable
/// node with an empty `pattern` is not a route.
#[derive(Debug, Default)]
pub(crate) struct Node {
    part: String,
    pattern: String,
    statics: Vec<Node>,
    wild: Option<Box<Node>>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Node::default()
    }

    fn with_part(part: &str) -> Self {
        Node {
            part: part.to_string(),
            ..Node::default()
        }
    }

    /// The full pattern registered at this node, if it terminates a route.
    pub(crate) fn pattern(&self) -> Option<&str> {
        if self.pattern.is_empty() {
            None
        } else {
            Some(&self.pattern)
        }
    }

    /// Descends along `segments`, creating nodes as needed, and marks the
    /// terminal node with the full pattern. Inserting an already-registered
    /// segment path overwrites the terminal pattern in place.
    pub(crate) fn insert(&mut self, pattern: &str, segments: &[&str], depth: usize) {
        if depth == segments.len() {
            self.pattern = pattern.to_string();
            return;
        }
        self.child_mut(segments[depth]).insert(pattern, segments, depth + 1);
    }

    /// Finds the terminal node matching `segments`, or `None`. Static
    /// children are tried before the param/wildcard child; the first
    /// successful recursive result wins. A `*` node matches all remaining
    /// segments regardless of count.
    pub(crate) fn search(&self, segments: &[&str], depth: usize) -> Option<&Node> {
        if depth == segments.len() || self.part.starts_with('*') {
            if self.pattern.is_empty() {
                return None;
            }
            return Some(self);
        }

        let segment = segments[depth];
        let candidates = self
            .statics
            .iter()
            .filter(|child| child.part == segment)
            .chain(self.wild.as_deref());
        for child in candidates {
            if let Some(found) = child.search(segments, depth + 1) {
                return Some(found);
            }
        }
        None
    }

    fn child_mut(&mut self, part: &str) -> &mut Node {
        if is_wild(part) {
            // A single param/wildcard slot per level; the first registration
            // fixes the node's part.
            self.wild
                .get_or_insert_with(|| Box::new(Node::with_part(part)))
        } else {
            let index = match self.statics.iter().position(|child| child.part == part) {
                Some(index) => index,
                None => {
                    self.statics.push(Node::with_part(part));
                    self.statics.len() - 1
                }
            };
            &mut self.statics[index]
        }
    }
}

fn is_wild(part: &str) -> bool {
    part.starts_with(':') || part.starts_with('*')
}

/// Splits a path or pattern into its non-empty segments, which also
/// normalizes away leading, trailing and doubled slashes.
pub(crate) fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

/// Walks the matched pattern in lockstep with the concrete segments,
/// binding `:name` segments one-to-one and a trailing `*name` segment to
/// the `/`-join of everything left. A bare `*` binds nothing.
pub(crate) fn extract_params(pattern: &str, segments: &[&str]) -> RouteParams {
    let pattern_segments = split_segments(pattern);
    let mut params = RouteParams::with_capacity(pattern_segments.len());
    for (index, part) in pattern_segments.iter().enumerate() {
        if let Some(name) = part.strip_prefix(':') {
            if let Some(value) = segments.get(index) {
                params.set(name, *value);
            }
        } else if let Some(name) = part.strip_prefix('*') {
            if !name.is_empty() && index <= segments.len() {
                params.set(name, segments[index..].join("/"));
            }
            break;
        }
    }
    params
}
