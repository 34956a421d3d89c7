//! Public `Trie<T>` facade. Grounded on the teacher's `RadixTree` facade in
//! `routing/radix_tree.rs` (`new`/`insert`/`match_uri` shape), generalized
//! to the full `Insert`/`InsertThen`/`Lookup` contract: an arena of
//! [`Node`]s indexed by [`NodeId`] instead of the teacher's owned
//! `HashMap`-of-children tree, so a `parent` back-reference is a plain
//! index rather than `Weak`/`unsafe`.

mod insert;
mod lookup;
mod node;
mod segment;

use crate::error::RouteError;
use node::{Leaf, Node, NodeKind};
pub use node::NodeId;
use segment::{parse_pattern, RawSegment};

/// A hybrid radix trie over URL path patterns with an opaque per-route
/// context `T`. Build with repeated [`Trie::insert`]/[`Trie::insert_then`],
/// then serve with [`Trie::lookup`] — see spec §5 for the concurrency
/// contract between the two phases.
pub struct Trie<T> {
    nodes: Vec<Node<T>>,
    root: NodeId,
}

impl<T> Default for Trie<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A successful [`Trie::lookup`]: the matched node, its context, and the
/// captured parameters in left-to-right pattern order.
pub struct Match<'t, 'p, T> {
    pub node: NodeId,
    pub context: &'t T,
    pub params: Vec<(&'t str, &'p str)>,
}

impl<T> Trie<T> {
    pub fn new() -> Self {
        let root = Node::new(NodeKind::Static, Vec::new(), None);
        Self { nodes: vec![root], root: NodeId(0) }
    }

    /// Insert `pattern` with a fixed `context`. Shorthand for
    /// [`Trie::insert_then`] with a merge function that ignores any
    /// previous context.
    pub fn insert(&mut self, pattern: &str, context: T) -> Result<NodeId, RouteError> {
        self.insert_then(pattern, |_| context)
    }

    /// Insert `pattern`, deriving its leaf context from any previous one
    /// via `merge(previous)`. Useful for unioning per-method handler maps
    /// at a single path. Fails atomically: a rejected pattern leaves the
    /// trie exactly as it was.
    pub fn insert_then(&mut self, pattern: &str, merge: impl FnOnce(Option<T>) -> T) -> Result<NodeId, RouteError> {
        match self.try_insert_then(pattern, merge) {
            Ok(id) => {
                tracing::debug!(pattern, "inserted route");
                Ok(id)
            }
            Err(e) => {
                tracing::warn!(pattern, error = %e, "rejected route insert");
                Err(e)
            }
        }
    }

    fn try_insert_then(&mut self, pattern: &str, merge: impl FnOnce(Option<T>) -> T) -> Result<NodeId, RouteError> {
        let (segments, params) = parse_pattern(pattern)?;

        let mut node_id = self.root;
        for seg in segments {
            node_id = match seg {
                RawSegment::Static(literal) => self.insert_static(node_id, &literal),
                RawSegment::Wild => self.insert_wild(node_id),
                RawSegment::Regex(re) => self.insert_regex(node_id, re),
            };
        }

        if self.nodes[node_id.0].leaf.is_some() {
            let existing = &self.nodes[node_id.0].leaf.as_ref().unwrap().param_names;
            if existing != &params {
                return Err(RouteError::ParamConflict(pattern.to_string()));
            }
            let old_leaf = self.nodes[node_id.0].leaf.take().unwrap();
            let context = merge(Some(old_leaf.context));
            self.nodes[node_id.0].leaf = Some(Leaf { param_names: old_leaf.param_names, context });
        } else {
            let context = merge(None);
            self.nodes[node_id.0].leaf = Some(Leaf { param_names: params, context });
        }
        Ok(node_id)
    }

    /// Look up `path`. `fix_trailing_slash` allows a single missing or
    /// extra trailing `/` to still match (see spec §4.5); it never relaxes
    /// double-slash matching in the middle of the path.
    pub fn lookup<'t, 'p>(&'t self, path: &'p str, fix_trailing_slash: bool) -> Option<Match<'t, 'p, T>> {
        let raw = self.lookup_raw(path, fix_trailing_slash)?;
        let context = &self.nodes[raw.node.0].leaf.as_ref().unwrap().context;
        Some(Match { node: raw.node, context, params: raw.params })
    }

    /// Reconstruct the pattern that produced `id`, substituting the bound
    /// parameter names back into `{}`/`{:expr}` placeholders. Diagnostic
    /// only; round-trips a fresh insert modulo empty-name/`*` equivalence.
    pub fn full_path_pattern(&self, id: NodeId) -> String {
        let params: &[String] =
            self.nodes[id.0].leaf.as_ref().map(|l| l.param_names.as_slice()).unwrap_or(&[]);
        let mut param_idx = params.len() as isize - 1;
        let mut path = String::new();
        let mut cur = Some(id);
        while let Some(cn) = cur {
            let node = &self.nodes[cn.0];
            let piece = match node.kind {
                NodeKind::Static => String::from_utf8_lossy(&node.prefix).into_owned(),
                NodeKind::Wild => {
                    if param_idx >= 0 {
                        let name = &params[param_idx as usize];
                        param_idx -= 1;
                        format!("{{{}}}", name)
                    } else {
                        "{}".to_string()
                    }
                }
                NodeKind::Regex => {
                    let expr = String::from_utf8_lossy(&node.prefix);
                    if param_idx >= 0 {
                        let name = &params[param_idx as usize];
                        param_idx -= 1;
                        format!("{{{}:{}}}", name, expr)
                    } else {
                        format!("{{:{}}}", expr)
                    }
                }
            };
            path = piece + &path;
            cur = node.parent;
        }
        path
    }

    pub fn context(&self, id: NodeId) -> Option<&T> {
        self.nodes.get(id.0)?.leaf.as_ref().map(|l| &l.context)
    }

    pub fn params(&self, id: NodeId) -> &[String] {
        self.nodes[id.0].leaf.as_ref().map(|l| l.param_names.as_slice()).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotent_insert_with_same_names() {
        let mut t: Trie<&'static str> = Trie::new();
        let a = t.insert("/path/{a}/{b:.+}", "1").unwrap();
        let b = t.insert("/path/{a}/{b:.+}", "1").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn param_conflict_on_differing_names() {
        let mut t: Trie<&'static str> = Trie::new();
        t.insert("/path/{a}/{b:.+}", "1").unwrap();
        let err = t.insert("/path/{c}/{d:.+}", "2").unwrap_err();
        assert!(matches!(err, RouteError::ParamConflict(_)));
    }

    #[test]
    fn insert_then_merges_previous_context() {
        let mut t: Trie<Vec<&'static str>> = Trie::new();
        t.insert_then("/users", |prev| {
            let mut v = prev.unwrap_or_default();
            v.push("GET");
            v
        })
        .unwrap();
        t.insert_then("/users", |prev| {
            let mut v = prev.unwrap_or_default();
            v.push("POST");
            v
        })
        .unwrap();
        let m = t.lookup("/users", false).unwrap();
        assert_eq!(m.context, &vec!["GET", "POST"]);
    }

    #[test]
    fn full_path_pattern_round_trips_names() {
        let mut t: Trie<i32> = Trie::new();
        let id = t.insert("/users/{id}/{rest:.+}", 1).unwrap();
        assert_eq!(t.full_path_pattern(id), "/users/{id}/{rest:.+}");
    }
}
