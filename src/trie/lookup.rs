//! Iterative backtracking lookup. A direct port of `tree.go`'s `lookUp`:
//! the same state (`po`, `prefix_match`, `regex_idx`, `param_po`,
//! `param_len`, `wild_done`) carried across loop iterations instead of
//! `goto`-driven reentry, and an explicit `Vec<Frame>` standing in for the
//! Go source's `backStateStack` linked list. The frame-reuse-on-same-node
//! optimization from the `beforeNext:` label is kept; the separate
//! `pevStack` (reusing a *popped* frame's allocation) is dropped since a
//! `Vec` push is already cheap and the behavior is observationally
//! identical without it.

use crate::trie::node::NodeKind;
use crate::trie::Trie;
use crate::trie::node::NodeId;

#[derive(Clone, Copy)]
struct Frame {
    node: NodeId,
    po: usize,
    prefix_match: bool,
    regex_idx: usize,
    param_po: usize,
    param_len: usize,
    wild_done: bool,
}

pub(crate) struct RawMatch<'t, 'p> {
    pub(crate) node: NodeId,
    /// One entry per backtrack frame walked at success time, most-recent
    /// (deepest) first, mirroring a non-empty `param_len` capture. Already
    /// filtered to non-empty names and reversed into left-to-right order.
    pub(crate) params: Vec<(&'t str, &'p str)>,
}

impl<T> Trie<T> {
    pub(crate) fn lookup_raw<'t, 'p>(&'t self, path: &'p str, fix_trailing_slash: bool) -> Option<RawMatch<'t, 'p>> {
        let bytes = path.as_bytes();
        let mut n = self.root;
        let mut po = 0usize;
        let mut prefix_match = false;
        let mut regex_idx = 0usize;
        let mut param_po = 0usize;
        let mut param_len = 0usize;
        let mut wild_done = false;
        let mut stack: Vec<Frame> = Vec::new();

        loop {
            let mut next: Option<(NodeId, usize)> = None;
            let mut success: Option<NodeId> = None;

            match self.nodes[n.0].kind {
                NodeKind::Static => {
                    let node = &self.nodes[n.0];
                    if !prefix_match {
                        regex_idx = 0;
                        param_po = 0;
                        param_len = 0;
                        wild_done = false;
                        let plen = node.prefix.len();
                        if bytes.len() - po > plen && &bytes[po..po + plen] == node.prefix.as_slice() {
                            prefix_match = true;
                            let next_po = po + plen;
                            if let Some(child) = node.static_children[bytes[next_po] as usize] {
                                next = Some((child, next_po));
                            } else if fix_trailing_slash && bytes[next_po] == b'/' && node.leaf.is_some() {
                                success = Some(n);
                            }
                        } else if bytes.len() - po == plen && &bytes[po..] == node.prefix.as_slice() && node.leaf.is_some()
                        {
                            success = Some(n);
                        } else if fix_trailing_slash && &bytes[po..] == b"/" && node.prefix.first() == Some(&b'/') {
                            if let Some(parent) = node.parent {
                                if self.nodes[parent.0].leaf.is_some() {
                                    success = Some(parent);
                                }
                            }
                        }
                    }
                    if success.is_none() && next.is_none() {
                        let node = &self.nodes[n.0];
                        if prefix_match {
                            if param_len == 0 {
                                param_po = po + node.prefix.len();
                                while param_po + param_len < bytes.len() && bytes[param_po + param_len] != b'/' {
                                    param_len += 1;
                                }
                            }
                            if param_len > 0 {
                                let next_po = param_po;
                                let candidate = &path[param_po..param_po + param_len];
                                while regex_idx < node.regex_children.len() {
                                    let rc = node.regex_children[regex_idx];
                                    regex_idx += 1;
                                    let re = self.nodes[rc.0].compiled_regex.as_ref().unwrap();
                                    if re.find(candidate).map(|m| m.as_str() == candidate).unwrap_or(false) {
                                        next = Some((rc, next_po));
                                        break;
                                    }
                                }
                                if next.is_none() && !wild_done {
                                    wild_done = true;
                                    if let Some(w) = node.wild_child {
                                        next = Some((w, next_po));
                                    }
                                }
                            }
                        }
                    }
                }
                NodeKind::Wild | NodeKind::Regex => {
                    let node = &self.nodes[n.0];
                    let np = po + param_len;
                    if np == bytes.len() && node.leaf.is_some() {
                        success = Some(n);
                    } else if np < bytes.len() {
                        if let Some(child) = node.static_children[bytes[np] as usize] {
                            n = child;
                            po = np;
                            prefix_match = false;
                            continue;
                        } else if fix_trailing_slash && &bytes[np..] == b"/" && node.leaf.is_some() {
                            success = Some(n);
                        }
                    }
                }
            }

            if let Some(leaf_node) = success {
                return Some(self.collect_match(leaf_node, path, &stack));
            }

            if let Some((next_node, next_po)) = next {
                if self.nodes[n.0].has_non_static {
                    match stack.last_mut() {
                        Some(top) if top.node == n => {
                            top.regex_idx = regex_idx;
                            top.param_po = param_po;
                            top.param_len = param_len;
                            top.wild_done = wild_done;
                        }
                        _ => stack.push(Frame { node: n, po, prefix_match, regex_idx, param_po, param_len, wild_done }),
                    }
                }
                n = next_node;
                po = next_po;
                prefix_match = false;
                continue;
            }

            match stack.pop() {
                Some(frame) => {
                    n = frame.node;
                    po = frame.po;
                    prefix_match = frame.prefix_match;
                    regex_idx = frame.regex_idx;
                    param_po = frame.param_po;
                    param_len = frame.param_len;
                    wild_done = frame.wild_done;
                }
                None => return None,
            }
        }
    }

    fn collect_match<'t, 'p>(&'t self, leaf_node: NodeId, path: &'p str, stack: &[Frame]) -> RawMatch<'t, 'p> {
        let leaf = self.nodes[leaf_node.0].leaf.as_ref().unwrap();
        let mut idx = leaf.param_names.len();
        let mut collected: Vec<(&'t str, &'p str)> = Vec::new();
        for frame in stack.iter().rev() {
            if idx == 0 {
                break;
            }
            if frame.param_len > 0 {
                idx -= 1;
                let name = leaf.param_names[idx].as_str();
                if !name.is_empty() {
                    collected.push((name, &path[frame.param_po..frame.param_po + frame.param_len]));
                }
            }
        }
        collected.reverse();
        RawMatch { node: leaf_node, params: collected }
    }
}

#[cfg(test)]
mod tests {
    use crate::trie::Trie;

    #[test]
    fn static_match_no_params() {
        let mut t: Trie<&'static str> = Trie::new();
        t.insert("/path/1234", "1").unwrap();
        let m = t.lookup_raw("/path/1234", false).unwrap();
        assert!(m.params.is_empty());
        assert_eq!(*t.context(m.node).unwrap(), "1");
    }

    #[test]
    fn priority_static_then_regex_then_wild() {
        let mut t: Trie<&'static str> = Trie::new();
        t.insert("/path/1234", "1").unwrap();
        t.insert("/path/{:123}", "2").unwrap();
        t.insert("/path/{:cde}", "3").unwrap();
        t.insert("/path/{param}", "4").unwrap();
        t.insert("/pathto/{:123}", "5").unwrap();

        assert_eq!(*t.context(t.lookup_raw("/path/1234", false).unwrap().node).unwrap(), "1");
        assert_eq!(*t.context(t.lookup_raw("/path/123", false).unwrap().node).unwrap(), "2");
        assert_eq!(*t.context(t.lookup_raw("/path/cde", false).unwrap().node).unwrap(), "3");
        let m = t.lookup_raw("/path/abcde", false).unwrap();
        assert_eq!(*t.context(m.node).unwrap(), "4");
        assert_eq!(m.params, vec![("param", "abcde")]);
        assert_eq!(*t.context(t.lookup_raw("/pathto/123", false).unwrap().node).unwrap(), "5");
    }

    #[test]
    fn trailing_slash_fix() {
        let mut t: Trie<i32> = Trie::new();
        t.insert("/abc", 2).unwrap();
        assert!(t.lookup_raw("/abc/", false).is_none());
        assert_eq!(*t.context(t.lookup_raw("/abc/", true).unwrap().node).unwrap(), 2);
    }

    #[test]
    fn double_slash_never_matches_placeholder() {
        let mut t: Trie<&'static str> = Trie::new();
        t.insert("/{param:.*}/{id}/abc", "0").unwrap();
        assert_eq!(*t.context(t.lookup_raw("/123/456/abc", false).unwrap().node).unwrap(), "0");
        assert!(t.lookup_raw("//456/abc", true).is_none());
        assert!(t.lookup_raw("/123//abc", false).is_none());
    }

    #[test]
    fn multi_param_order() {
        let mut t: Trie<i32> = Trie::new();
        t.insert("/{a}/{b}/{c}", 3).unwrap();
        let m = t.lookup_raw("/1/2/3", false).unwrap();
        assert_eq!(*t.context(m.node).unwrap(), 3);
        assert_eq!(m.params, vec![("a", "1"), ("b", "2"), ("c", "3")]);
    }

    #[test]
    fn literal_double_slash_collapsed_on_insert_not_lookup() {
        let mut t: Trie<i32> = Trie::new();
        t.insert("/abc//", 1).unwrap();
        assert!(t.lookup_raw("/abc/", false).is_some());
        assert!(t.lookup_raw("/abc//", false).is_none());
    }
}
