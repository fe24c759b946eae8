pub use crate::{
    any, chars, exact, kleene, kleene_sep, map, maybe, merge, no_auto_ws, not_chars, number_lit,
    parsify, parsify_all, run, run_with, seq, some, some_sep, string_lit, ws, Forward, Node,
    Parsable, ParseOptions, Parser, Recoverable, Value,
};

pub mod tw {
    pub use crate::char_class::{CharClass, Counts};
    pub use crate::cursor::Cursor;
    pub use crate::error::{Failure, GrammarError, ParseError};
}
