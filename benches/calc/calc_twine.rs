use twine::cookbook::calc::{calc, grammar};
use twine::prelude::*;

pub fn twine_parser(s: &str) -> f64 {
    calc(s).unwrap()
}

pub fn twine_grammar() -> Parser {
    grammar().unwrap()
}
