//! A hybrid radix trie for URL path routing: static, wildcard (`{name}`),
//! and regex (`{name:expr}`) segments coexist at every node with static
//! beating regex beating wildcard, and lookup backtracks through an
//! explicit stack rather than recursion. See `SPEC_FULL.md` for the full
//! contract this crate implements.

pub mod config;
pub mod error;
mod trie;

pub use error::RouteError;
pub use trie::{Match, NodeId, Trie};
