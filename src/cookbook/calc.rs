//! An arithmetic evaluator.
//!
//! `*` and `/` bind tighter than `+` and `-`, all four associate to the left,
//! and brackets nest to any depth. The rules refer to each other in a cycle
//! (`value` -> `group` -> `sum` -> `prod` -> `value`), so `value` is a [`Forward`]
//! that is resolved once the rest of the grammar exists.
//!
//! Operators are parsed with the strum derived `FromStr`.

use once_cell::sync::Lazy;
use strum_macros::{Display, EnumString};

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Op {
    #[strum(serialize = "+")]
    Add,
    #[strum(serialize = "-")]
    Sub,
    #[strum(serialize = "*")]
    Mul,
    #[strum(serialize = "/")]
    Div,
}

impl Op {
    pub fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
        }
    }
}

static GRAMMAR: Lazy<Result<Parser, tw::GrammarError>> = Lazy::new(grammar);

pub fn grammar() -> Result<Parser, tw::GrammarError> {
    let value = Forward::new("value");

    let sum_op = chars("+-", 1..=1);
    let prod_op = chars("/*", 1..=1);

    // ints and floats alike become f64
    let number = number_lit().map(|n| Value::Float(operand(n)));

    let prod = seq![&value, kleene(seq![prod_op, &value])]
        .map(fold_ops)
        .named("prod");
    let sum = seq![&prod, kleene(seq![sum_op, &prod])]
        .map(fold_ops)
        .named("sum");
    let group = seq!["(", &sum, ")"].map(|n| n.children[1].value_or_token());

    value.resolve(any![number, group])?;
    Ok(value.anchor(sum))
}

fn operand(n: &Node) -> f64 {
    match n.value {
        Some(Value::Float(x)) => x,
        Some(Value::Int(i)) => i as f64,
        _ => unreachable!("operand without a numeric value: {:?}", n.token),
    }
}

/// `first (op operand)*` folded from the left
fn fold_ops(n: &Node) -> Value {
    let first = operand(&n.children[0]);
    let total = n.children[1].children.iter().fold(first, |acc, term| {
        let token = &term.children[0].token;
        let op: Op = token
            .parse()
            .unwrap_or_else(|_| panic!("Unexpected operator {token:?} from the operator classes"));
        op.apply(acc, operand(&term.children[1]))
    });
    Value::Float(total)
}

pub fn calc(input: &str) -> Result<f64, tw::ParseError> {
    let parser = GRAMMAR.as_ref().map_err(|e| tw::ParseError::Grammar(e.clone()))?;
    match run(parser, input)? {
        Value::Float(x) => Ok(x),
        other => unreachable!("calc produced {other:?}"),
    }
}
