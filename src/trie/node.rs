//! The trie's vertex type. An arena (`Vec<Node<T>>` owned by `Trie`) holds
//! every node; children and parents are `NodeId` indices rather than
//! pointers, which keeps edge splitting and backtracking free of `Rc`/
//! `RefCell`/`unsafe` while still letting `full_path_pattern` walk upward.

/// Opaque handle to a node in a [`crate::Trie`]. Stable for the trie's
/// lifetime — nodes are appended, never removed or reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Static,
    Wild,
    Regex,
}

pub(crate) struct Leaf<T> {
    pub(crate) param_names: Vec<String>,
    pub(crate) context: T,
}

/// One vertex. `static_children` is a dense 256-slot table keyed by the
/// next literal byte, giving O(1) dispatch among static branches; the
/// contract only requires a sparse byte-keyed map, but spec §9 notes the
/// dense array is what the reference implementation uses on the hot path.
///
/// `prefix` is raw bytes rather than `String`: radix edge splitting finds
/// the common-byte-prefix of two literal runs, and that split point can
/// land in the middle of a multi-byte UTF-8 sequence when two patterns
/// share a leading byte but diverge in a later continuation byte. Storing
/// bytes keeps every split safe without a char-boundary search.
pub(crate) struct Node<T> {
    pub(crate) kind: NodeKind,
    pub(crate) prefix: Vec<u8>,
    pub(crate) compiled_regex: Option<regex::Regex>,
    pub(crate) static_children: Box<[Option<NodeId>; 256]>,
    pub(crate) regex_children: Vec<NodeId>,
    pub(crate) wild_child: Option<NodeId>,
    pub(crate) has_non_static: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) leaf: Option<Leaf<T>>,
}

impl<T> Node<T> {
    pub(crate) fn new(kind: NodeKind, prefix: Vec<u8>, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            prefix,
            compiled_regex: None,
            static_children: Box::new([None; 256]),
            regex_children: Vec::new(),
            wild_child: None,
            has_non_static: false,
            parent,
            leaf: None,
        }
    }

    pub(crate) fn has_static_children(&self) -> bool {
        self.static_children.iter().any(|c| c.is_some())
    }
}
