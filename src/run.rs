use log::debug;

use crate::{
    cursor::Cursor,
    error::ParseError,
    node::Value,
    parser::Parser,
    LOG_TARGET,
};

/// How many parser calls may be nested on the stack before a parse is abandoned.
///
/// This counts calls, not grammar nesting: one level of brackets in a typical
/// expression grammar costs several calls.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// `None` disables the limit, leaving only the thread's stack
    pub max_depth: Option<usize>,
    pub auto_ws: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            auto_ws: true,
        }
    }
}

impl ParseOptions {
    pub fn with_max_depth(self, max_depth: Option<usize>) -> Self {
        Self { max_depth, ..self }
    }

    pub fn with_auto_ws(self, auto_ws: bool) -> Self {
        Self { auto_ws, ..self }
    }
}

/// Parses the whole of `input`.
///
/// - a miss returns the deepest failure seen, `offset N: expected X`
/// - a match that leaves non-whitespace behind returns [`ParseError::LeftUnparsed`],
///   which still carries the value
/// - otherwise the root node's value, or its token if it has none
pub fn run(parser: &Parser, input: &str) -> Result<Value, ParseError> {
    run_with(parser, input, &ParseOptions::default())
}

pub fn run_with(parser: &Parser, input: &str, options: &ParseOptions) -> Result<Value, ParseError> {
    let mut cur = Cursor::with_options(input, options);
    let node = match parser.parse(&mut cur) {
        Ok(node) => node,
        Err(ParseError::NoMatch(failure)) => {
            let furthest = cur.furthest_error().cloned().unwrap_or(failure);
            debug!(target: LOG_TARGET, "{name} failed: {furthest}", name = parser.name());
            return Err(ParseError::NoMatch(furthest));
        }
        Err(e) => {
            debug!(target: LOG_TARGET, "{name} aborted: {e}", name = parser.name());
            return Err(e);
        }
    };

    cur.skip_ws();
    let value = node.into_value();
    if cur.is_eos() {
        Ok(value)
    } else {
        let rest = cur.remaining().to_string();
        debug!(target: LOG_TARGET, "{name} left unparsed: {rest:?}", name = parser.name());
        Err(ParseError::LeftUnparsed { value, rest })
    }
}
