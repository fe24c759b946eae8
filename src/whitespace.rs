//! Whitespace policy.
//!
//! Every combinator skips whitespace before each step it takes, and each primitive
//! before it matches. [`no_auto_ws`] switches that off for a subtree, so that
//! whitespace-sensitive tokens can live inside an otherwise free-form grammar,
//! and [`ws`] skips whitespace explicitly where it is still wanted.

use crate::{
    node::Node,
    parser::{parsify, Parsable, Parser},
};

/// Consumes and discards a run of whitespace, always succeeding.
pub fn ws() -> Parser {
    Parser::from_fn("ws", |cur| {
        cur.skip_ws();
        Ok(Node::default())
    })
}

/// Suppresses implicit whitespace skipping for everything inside `p`.
pub fn no_auto_ws(p: impl Into<Parsable>) -> Parser {
    let inner = parsify(p);
    Parser::from_fn("no_auto_ws", move |cur| {
        cur.with_auto_ws(false, |cur| inner.parse(cur))
    })
}
