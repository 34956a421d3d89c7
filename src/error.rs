use std::fmt;

/// Failures surfaced by `Trie::insert`/`Trie::insert_then`. `Lookup` never fails.
#[derive(Debug)]
pub enum RouteError {
    /// A `{` did not immediately follow `/`, or a `}` was not at the end of
    /// the pattern or immediately before `/`.
    PlaceholderPosition(String),
    /// `{name:}` — a regex placeholder with an empty expression.
    EmptyRegex(String),
    /// A parameter name did not match the grammar in spec §6.
    InvalidName(String),
    /// A non-empty, non-`*` parameter name repeated within one pattern.
    DuplicateName(String),
    /// The regex engine rejected a placeholder's expression.
    RegexCompile(String, regex::Error),
    /// The terminal node already carries a leaf with a different parameter list.
    ParamConflict(String),
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::PlaceholderPosition(p) => {
                write!(f, "pattern '{}': placeholder must be preceded by '/' and closed at end or before '/'", p)
            }
            RouteError::EmptyRegex(p) => write!(f, "pattern '{}': regex placeholder is empty", p),
            RouteError::InvalidName(name) => write!(f, "invalid param name '{}'", name),
            RouteError::DuplicateName(name) => write!(f, "param name '{}' duplicate", name),
            RouteError::RegexCompile(expr, e) => write!(f, "invalid regex '{}': {}", expr, e),
            RouteError::ParamConflict(p) => {
                write!(f, "pattern '{}': param names conflict with a previously inserted pattern at this node", p)
            }
        }
    }
}

impl std::error::Error for RouteError {}
