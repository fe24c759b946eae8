use std::{fmt, matches, sync::Arc};

use crate::node::Value;

/// Indicates whether an error can be recovered from, and parsing can continue.
/// A miss on one alternative is recoverable, whereas a grammar that was never
/// finished (an unresolved forward reference) is not, and must abort the parse.
pub trait Recoverable {
    fn is_recoverable(&self) -> bool;
}

/// The deepest point a parse reached before a matcher gave up, and what it wanted there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub offset: usize,
    pub expected: Arc<str>,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "offset {}: expected {}", self.offset, self.expected)
    }
}

/// Mistakes in the grammar definition itself, as opposed to input that does not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    TooManyCounts(usize),
    InvalidCounts { min: usize, max: usize },
    AlreadyResolved(Arc<str>),
    Unresolved(Arc<str>),
    Dropped(Arc<str>),
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::TooManyCounts(n) => write!(f, "expected 0-2 repetition counts, got {n}")?,
            Self::InvalidCounts { min, max } => {
                write!(f, "repetition minimum {min} exceeds maximum {max}")?
            }
            Self::AlreadyResolved(name) => {
                write!(f, "forward reference '{name}' was already resolved")?
            }
            Self::Unresolved(name) => {
                write!(f, "forward reference '{name}' used before it was resolved")?
            }
            Self::Dropped(name) => {
                write!(f, "forward reference '{name}' used after its grammar was dropped")?
            }
        };
        Ok(())
    }
}

impl std::error::Error for GrammarError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseError {
    NoMatch(Failure),
    /// the root parser matched, but `rest` was still unconsumed. The value it produced is kept.
    LeftUnparsed {
        value: Value,
        rest: String,
    },
    Grammar(GrammarError),
    DepthExceeded {
        offset: usize,
        limit: usize,
    },
}

impl Recoverable for ParseError {
    fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoMatch(..))
    }
}

impl ParseError {
    pub fn failure(&self) -> Option<&Failure> {
        match self {
            Self::NoMatch(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn partial_value(&self) -> Option<&Value> {
        match self {
            Self::LeftUnparsed { value, .. } => Some(value),
            _ => None,
        }
    }

    /// offset used to rank competing failures, grammar errors rank highest
    pub(crate) fn offset(&self) -> usize {
        match self {
            Self::NoMatch(failure) => failure.offset,
            Self::DepthExceeded { offset, .. } => *offset,
            Self::LeftUnparsed { .. } | Self::Grammar(..) => usize::MAX,
        }
    }
}

impl From<GrammarError> for ParseError {
    #[inline]
    fn from(e: GrammarError) -> Self {
        Self::Grammar(e)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoMatch(failure) => write!(f, "{failure}")?,
            Self::LeftUnparsed { rest, .. } => write!(f, "left unparsed: {rest}")?,
            Self::Grammar(e) => write!(f, "Fatal: {e}")?,
            Self::DepthExceeded { offset, limit } => {
                write!(f, "offset {offset}: more than {limit} nested parser calls")?
            }
        };
        Ok(())
    }
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grammar(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn test_error_display() {
        let e = ParseError::NoMatch(Failure {
            offset: 0,
            expected: "0-9".into(),
        });
        assert_eq!(e.to_string(), "offset 0: expected 0-9");
        assert!(e.is_recoverable());

        let e = ParseError::LeftUnparsed {
            value: Value::Str("hello".into()),
            rest: "world".into(),
        };
        assert_eq!(e.to_string(), "left unparsed: world");
        assert_eq!(e.partial_value(), Some(&Value::Str("hello".into())));
        assert!(!e.is_recoverable());

        let e: ParseError = GrammarError::Unresolved("tag".into()).into();
        assert_eq!(
            e.to_string(),
            "Fatal: forward reference 'tag' used before it was resolved"
        );
        assert!(!e.is_recoverable());
        assert!(std::error::Error::source(&e).is_some());

        let e = ParseError::DepthExceeded {
            offset: 127,
            limit: 1024,
        };
        assert_eq!(e.to_string(), "offset 127: more than 1024 nested parser calls");
        assert!(!e.is_recoverable());
    }
}
