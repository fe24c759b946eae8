/*!
# Cookbook

Complete grammars built from the combinators, each with its own tests.

- [`calc`]: arithmetic with precedence and brackets, evaluated while parsing
- [`html`]: a toy HTML reader producing a typed tree of tags

Both grammars are recursive, so both are built around a [`Forward`](crate::Forward)
reference. Rules refer to it with `&fwd`, and the entry point owns it: `html` returns
`tag.parser()`, while `calc`, whose entry point is the `sum` rule, wraps that rule
with `value.anchor(..)`. Each built grammar is kept in a `once_cell::sync::Lazy` and
shared freely between threads.

# Testing

Tests use `test-log`, so the trace of every parser invocation can be seen with
```sh
RUST_LOG=twine=trace cargo test --features cookbook test_nested_tags -- --nocapture
```

*/

pub mod calc;
pub mod html;
