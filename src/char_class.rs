use std::ops::{Bound, RangeBounds, RangeInclusive};

use crate::error::GrammarError;

/// A set of characters written compactly, e.g. `a-zA-Z_` or `1-4d-a`.
///
/// `x-y` is an inclusive range (reversed ranges are flipped), `\x` adds `x`
/// literally, anything else is a single member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharClass {
    singles: Vec<char>,
    ranges: Vec<RangeInclusive<char>>,
}

impl CharClass {
    pub fn new(spec: &str) -> Self {
        let chars: Vec<char> = spec.chars().collect();
        let mut singles = Vec::new();
        let mut ranges = Vec::new();
        let mut i = 0;
        while i < chars.len() {
            if chars[i] == '\\' && i + 1 < chars.len() {
                singles.push(chars[i + 1]);
                i += 2;
            } else if i + 2 < chars.len() && chars[i + 1] == '-' {
                let (lo, hi) = (chars[i], chars[i + 2]);
                ranges.push(lo.min(hi)..=lo.max(hi));
                i += 3;
            } else {
                singles.push(chars[i]);
                i += 1;
            }
        }
        Self { singles, ranges }
    }

    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.singles.contains(&c) || self.ranges.iter().any(|r| r.contains(&c))
    }
}

/// How many characters a class matcher may consume. `max` of `None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Counts {
    pub min: usize,
    pub max: Option<usize>,
}

impl Default for Counts {
    fn default() -> Self {
        Self { min: 1, max: None }
    }
}

impl Counts {
    /// Fails with [`GrammarError::InvalidCounts`] for a range whose end is below its start.
    pub fn from_bounds<R: RangeBounds<usize>>(rb: &R) -> Result<Self, GrammarError> {
        let min = match rb.start_bound() {
            Bound::Included(&i) => i,
            Bound::Excluded(&i) => i + 1,
            Bound::Unbounded => 0,
        };
        let max = match rb.end_bound() {
            Bound::Included(&i) => Some(i),
            Bound::Excluded(&i) => Some(i.saturating_sub(1)),
            Bound::Unbounded => None,
        };
        Self { min, max }.checked()
    }

    fn checked(self) -> Result<Self, GrammarError> {
        match self.max {
            Some(max) if max < self.min => Err(GrammarError::InvalidCounts {
                min: self.min,
                max,
            }),
            _ => Ok(self),
        }
    }
}

impl RangeBounds<usize> for Counts {
    fn start_bound(&self) -> Bound<&usize> {
        Bound::Included(&self.min)
    }

    fn end_bound(&self) -> Bound<&usize> {
        match &self.max {
            Some(max) => Bound::Included(max),
            None => Bound::Unbounded,
        }
    }
}

/// the variadic form: `[]`, `[min]` or `[min, max]`
impl TryFrom<&[usize]> for Counts {
    type Error = GrammarError;

    fn try_from(args: &[usize]) -> Result<Self, Self::Error> {
        let counts = match *args {
            [] => Self::default(),
            [min] => Self { min, max: None },
            [min, max] => Self {
                min,
                max: Some(max),
            },
            _ => return Err(GrammarError::TooManyCounts(args.len())),
        };
        counts.checked()
    }
}
