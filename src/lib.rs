/*!
`twine`
- a parser-combinator library: grammars are built by combining small matchers
  into bigger parsers, and run against a string in one backtracking pass
- grammars can be recursive, via [`Forward`] references resolved after use
- whitespace between tokens is skipped automatically, unless switched off with [`no_auto_ws`]

Main concepts:

# Parser
a function-shaped value from a [`Cursor`] to a [`Node`].
On a miss the cursor is left where it was, so alternatives can be tried in turn.

# Node
what a parser matched: the token text, the nodes of its sub-parsers, and an optional
[`Value`] set by [`map`].

# Cursor
the input, the current position, and the deepest failure seen so far. Error messages
always point at the furthest any alternative got, not the last one tried.

```
use twine::prelude::*;

let digits = chars("0-9", 1..);
let list = seq!["[", kleene_sep(&digits, ","), "]"]
    .map(|n| Value::List(n.children[1].children.iter().map(Node::value_or_token).collect()));

assert_eq!(
    run(&list, "[1, 22, 333]"),
    Ok(Value::List(vec!["1".into(), "22".into(), "333".into()]))
);
assert_eq!(run(&list, "[1, 22").unwrap_err().to_string(), "offset 6: expected ]");
```

Parsing can be traced with
```sh
RUST_LOG=twine=trace cargo test mytest -- --nocapture
```
*/
#![warn(clippy::all)]
#![warn(clippy::correctness)]
#![warn(clippy::style)]
#![warn(clippy::complexity)]
#![warn(clippy::perf)]
#![allow(mixed_script_confusables)]

use std::cell::Cell;

mod char_class;
mod combinators;
mod cursor;
mod error;
mod literals;
mod logging;
mod node;
mod parser;
mod run;
mod util;
mod whitespace;

pub mod prelude;

#[cfg(feature = "cookbook")]
pub mod cookbook;

pub(crate) const LOG_TARGET: &str = "twine"; // env!("CARGO_PKG_NAME");

thread_local!(pub(crate) static LABEL: Cell<&'static str> = Cell::new(""));

pub use crate::char_class::{CharClass, Counts};
pub use crate::combinators::{any, kleene, kleene_sep, map, maybe, merge, seq, some, some_sep};
pub use crate::cursor::Cursor;
pub use crate::error::{Failure, GrammarError, ParseError, Recoverable};
pub use crate::literals::{chars, exact, not_chars, number_lit, string_lit};
pub use crate::node::{Node, Value};
pub use crate::parser::{parsify, parsify_all, Forward, Parsable, Parser};
pub use crate::run::{run, run_with, ParseOptions, DEFAULT_MAX_DEPTH};
pub use crate::whitespace::{no_auto_ws, ws};
