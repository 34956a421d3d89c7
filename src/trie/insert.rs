//! Insertion: radix edge splitting for static runs, dedup-by-source-text
//! for regex children, and single wildcard children. Grounded on
//! `tree.go`'s `insertStaticNode`/`splitEdge`/`insertWildNode`/
//! `insertRegexpNode`, generalized from the teacher's segment-compressed
//! `Vec<String>` keying (`routing/radix_tree.rs`) down to per-byte radix
//! compression as spec §3/§4.3 require.

use crate::trie::node::{Node, NodeId, NodeKind};
use crate::trie::Trie;

impl<T> Trie<T> {
    pub(crate) fn insert_static(&mut self, node_id: NodeId, literal: &str) -> NodeId {
        let collapsed = crate::trie::segment::collapse_slashes(literal);
        if collapsed.is_empty() {
            return node_id;
        }
        self.insert_static_rec(node_id, collapsed.as_bytes())
    }

    fn insert_static_rec(&mut self, node_id: NodeId, literal: &[u8]) -> NodeId {
        let node = &self.nodes[node_id.0];
        if node.prefix.is_empty() && !node.has_static_children() {
            self.nodes[node_id.0].prefix = literal.to_vec();
            return node_id;
        }

        // Only a Static node's `prefix` is a literal match prefix that can
        // be radix-split; a Regex node's `prefix` is its source text and a
        // Wild node's is a display placeholder — neither participates in
        // common-prefix matching, so any literal text following one always
        // becomes a brand new static child instead.
        let mut i = 0usize;
        if node.kind == NodeKind::Static {
            let node = &self.nodes[node_id.0];
            let max = node.prefix.len().min(literal.len());
            while i < max && node.prefix[i] == literal[i] {
                i += 1;
            }
            if i < node.prefix.len() {
                self.split_edge(node_id, i);
            }
        }

        if i < literal.len() {
            let first_byte = literal[i] as usize;
            let child_id = match self.nodes[node_id.0].static_children[first_byte] {
                Some(id) => id,
                None => {
                    let new_id = self.alloc_node(NodeKind::Static, Vec::new(), Some(node_id));
                    self.nodes[node_id.0].static_children[first_byte] = Some(new_id);
                    new_id
                }
            };
            self.insert_static_rec(child_id, &literal[i..])
        } else {
            node_id
        }
    }

    /// Split `node_id`'s edge at byte offset `pos`: a new child inherits the
    /// tail of the prefix plus everything the node used to own, and the
    /// node is truncated to the common prefix.
    fn split_edge(&mut self, node_id: NodeId, pos: usize) {
        let node = &mut self.nodes[node_id.0];
        let tail = node.prefix.split_off(pos);
        let old_kind = node.kind;
        let old_static_children = std::mem::replace(&mut node.static_children, Box::new([None; 256]));
        let old_regex_children = std::mem::take(&mut node.regex_children);
        let old_wild_child = node.wild_child.take();
        let old_has_non_static = node.has_non_static;
        let old_leaf = node.leaf.take();
        let old_regex = node.compiled_regex.take();
        node.has_non_static = false;

        let branch_id = self.alloc_node(old_kind, tail, Some(node_id));
        {
            let branch = &mut self.nodes[branch_id.0];
            branch.static_children = old_static_children;
            branch.regex_children = old_regex_children;
            branch.wild_child = old_wild_child;
            branch.has_non_static = old_has_non_static;
            branch.leaf = old_leaf;
            branch.compiled_regex = old_regex;
        }
        self.reparent_children(branch_id);

        let first_byte = self.nodes[branch_id.0].prefix[0] as usize;
        self.nodes[node_id.0].static_children[first_byte] = Some(branch_id);
    }

    fn reparent_children(&mut self, node_id: NodeId) {
        let (statics, regexes, wild) = {
            let node = &self.nodes[node_id.0];
            (*node.static_children.clone(), node.regex_children.clone(), node.wild_child)
        };
        for child in statics.into_iter().flatten() {
            self.nodes[child.0].parent = Some(node_id);
        }
        for child in regexes {
            self.nodes[child.0].parent = Some(node_id);
        }
        if let Some(child) = wild {
            self.nodes[child.0].parent = Some(node_id);
        }
    }

    pub(crate) fn insert_wild(&mut self, node_id: NodeId) -> NodeId {
        if self.nodes[node_id.0].wild_child.is_none() {
            let new_id = self.alloc_node(NodeKind::Wild, b"{}".to_vec(), Some(node_id));
            self.nodes[node_id.0].wild_child = Some(new_id);
            self.nodes[node_id.0].has_non_static = true;
        }
        self.nodes[node_id.0].wild_child.unwrap()
    }

    pub(crate) fn insert_regex(&mut self, node_id: NodeId, compiled: regex::Regex) -> NodeId {
        let existing = self.nodes[node_id.0]
            .regex_children
            .iter()
            .copied()
            .find(|&child| self.nodes[child.0].compiled_regex.as_ref().unwrap().as_str() == compiled.as_str());
        if let Some(id) = existing {
            return id;
        }
        let expr_text = compiled.as_str().as_bytes().to_vec();
        let new_id = self.alloc_node(NodeKind::Regex, expr_text, Some(node_id));
        self.nodes[new_id.0].compiled_regex = Some(compiled);
        self.nodes[node_id.0].regex_children.push(new_id);
        self.nodes[node_id.0].has_non_static = true;
        new_id
    }

    pub(crate) fn alloc_node(&mut self, kind: NodeKind, prefix: Vec<u8>, parent: Option<NodeId>) -> NodeId {
        self.nodes.push(Node::new(kind, prefix, parent));
        NodeId(self.nodes.len() - 1)
    }
}
