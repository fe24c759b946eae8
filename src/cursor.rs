use std::{fmt, sync::Arc};

use crate::{
    error::{Failure, ParseError},
    run::ParseOptions,
    util,
};

/// The input text, the current scan position and the deepest failure seen so far.
///
/// One cursor is created per [`run`](crate::run) and threaded by `&mut` through every
/// parser. Backtracking moves `pos` back, but never forgets the furthest failure,
/// so the final diagnostic points at the deepest place any alternative reached.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    pub(crate) text: &'a str,
    pub(crate) pos: usize,
    pub(crate) furthest: Option<Failure>,
    pub(crate) auto_ws: bool,
    pub(crate) depth: usize,
    pub(crate) max_depth: Option<usize>,
}

impl<'a> From<&'a str> for Cursor<'a> {
    #[inline]
    fn from(s: &'a str) -> Self {
        Self::with_options(s, &ParseOptions::default())
    }
}

impl<'a> fmt::Display for Cursor<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Cursor({pos}, {rest})",
            pos = self.pos,
            rest = util::formatter_str(self.remaining())
        )
    }
}

impl<'a> Cursor<'a> {
    pub fn with_options(s: &'a str, options: &ParseOptions) -> Self {
        Self {
            text: s,
            pos: 0,
            furthest: None,
            auto_ws: options.auto_ws,
            depth: 0,
            max_depth: options.max_depth,
        }
    }

    #[inline]
    pub fn remaining(&self) -> &'a str {
        &self.text[self.pos..]
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn input(&self) -> &'a str {
        self.text
    }

    pub fn furthest_error(&self) -> Option<&Failure> {
        self.furthest.as_ref()
    }

    /// true once any matcher has recorded a failure, even if a later alternative recovered
    pub fn has_failed(&self) -> bool {
        self.furthest.is_some()
    }

    #[inline]
    pub fn is_eos(&self) -> bool {
        self.pos >= self.text.len()
    }

    pub fn skip_ws(&mut self) {
        let rest = self.remaining();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// skips whitespace unless inside a [`no_auto_ws`](crate::no_auto_ws) subtree
    #[inline]
    pub fn auto_ws(&mut self) {
        if self.auto_ws {
            self.skip_ws();
        }
    }

    pub fn is_auto_ws(&self) -> bool {
        self.auto_ws
    }

    /// moves forward `len` bytes, returning the text stepped over
    pub(crate) fn advance(&mut self, len: usize) -> &'a str {
        let token = &self.text[self.pos..self.pos + len];
        self.pos += len;
        token
    }

    #[inline]
    pub(crate) fn set_offset(&mut self, pos: usize) {
        debug_assert!(pos <= self.text.len());
        self.pos = pos;
    }

    /// the text between `start` and the current position
    pub(crate) fn since(&self, start: usize) -> &'a str {
        &self.text[start.min(self.pos)..self.pos]
    }

    /// Records a failure at the current position.
    pub fn fail(&mut self, expected: &Arc<str>) -> ParseError {
        self.fail_at(self.pos, expected)
    }

    /// Records a failure at `offset`. A failure at or beyond the furthest one replaces it.
    pub fn fail_at(&mut self, offset: usize, expected: &Arc<str>) -> ParseError {
        let failure = Failure {
            offset,
            expected: Arc::clone(expected),
        };
        match &self.furthest {
            Some(f) if f.offset > offset => {}
            _ => self.furthest = Some(failure.clone()),
        }
        ParseError::NoMatch(failure)
    }

    pub(crate) fn with_auto_ws<T>(&mut self, enabled: bool, f: impl FnOnce(&mut Self) -> T) -> T {
        let prev = std::mem::replace(&mut self.auto_ws, enabled);
        let out = f(self);
        self.auto_ws = prev;
        out
    }

    pub(crate) fn enter(&mut self) -> Result<(), ParseError> {
        if let Some(limit) = self.max_depth {
            if self.depth >= limit {
                return Err(ParseError::DepthExceeded {
                    offset: self.pos,
                    limit,
                });
            }
        }
        self.depth += 1;
        Ok(())
    }

    #[inline]
    pub(crate) fn leave(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
