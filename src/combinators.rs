use crate::{
    error::{ParseError, Recoverable},
    node::{Node, Value},
    parser::{parsify, parsify_all, Parsable, Parser},
    whitespace::no_auto_ws,
};

/// `seq!["(", expr, ")"]` is `seq([...])` for mixed argument types.
#[macro_export]
macro_rules! seq {
    ($($p:expr),+ $(,)?) => {
        $crate::seq([$($crate::Parsable::from($p)),+])
    };
}

/// `any![number, group]` is `any([...])` for mixed argument types.
#[macro_export]
macro_rules! any {
    ($($p:expr),+ $(,)?) => {
        $crate::any([$($crate::Parsable::from($p)),+])
    };
}

/// Runs each parser in turn. The node's children are their nodes, in order.
///
/// If any one misses, the whole sequence misses and nothing it consumed is kept.
pub fn seq<I>(items: I) -> Parser
where
    I: IntoIterator,
    I::Item: Into<Parsable>,
{
    let parts = parsify_all(items);
    Parser::from_fn("seq", move |cur| {
        cur.auto_ws();
        let start = cur.offset();
        let mut children = Vec::with_capacity(parts.len());
        for p in parts.iter() {
            cur.auto_ws();
            children.push(p.parse(cur)?);
        }
        Ok(Node::branch(cur.since(start), children))
    })
}

/// Ordered choice: the first alternative to match wins.
///
/// When all of them miss, the miss reported is the one that got furthest into the input.
pub fn any<I>(items: I) -> Parser
where
    I: IntoIterator,
    I::Item: Into<Parsable>,
{
    let alternatives = parsify_all(items);
    Parser::from_fn("any", move |cur| {
        let start = cur.offset();
        let mut deepest: Option<ParseError> = None;
        for p in alternatives.iter() {
            cur.set_offset(start);
            cur.auto_ws();
            match p.parse(cur) {
                Ok(node) => return Ok(node),
                Err(e) if e.is_recoverable() => {
                    if deepest.as_ref().map_or(true, |d| e.offset() >= d.offset()) {
                        deepest = Some(e);
                    }
                }
                Err(e) => return Err(e),
            }
        }
        cur.set_offset(start);
        Err(deepest.unwrap_or_else(|| cur.fail(&"any alternative".into())))
    })
}

/// One or more.
pub fn some(p: impl Into<Parsable>) -> Parser {
    repeat("some", parsify(p), None, 1)
}

/// Zero or more. Never misses.
pub fn kleene(p: impl Into<Parsable>) -> Parser {
    repeat("kleene", parsify(p), None, 0)
}

/// One or more `p`, separated by `sep`. Separators are matched but not kept as children.
pub fn some_sep(p: impl Into<Parsable>, sep: impl Into<Parsable>) -> Parser {
    repeat("some_sep", parsify(p), Some(parsify(sep)), 1)
}

/// Zero or more `p`, separated by `sep`.
pub fn kleene_sep(p: impl Into<Parsable>, sep: impl Into<Parsable>) -> Parser {
    repeat("kleene_sep", parsify(p), Some(parsify(sep)), 0)
}

fn repeat(name: &str, item: Parser, sep: Option<Parser>, min: usize) -> Parser {
    Parser::from_fn(name, move |cur| {
        let entry = cur.offset();
        cur.auto_ws();
        let start = cur.offset();
        let mut children = Vec::new();
        loop {
            let before = cur.offset();
            if let (Some(sep), false) = (&sep, children.is_empty()) {
                cur.auto_ws();
                match sep.parse(cur) {
                    Ok(_) => {}
                    Err(e) if e.is_recoverable() => {
                        cur.set_offset(before);
                        break;
                    }
                    Err(e) => return Err(e),
                }
            }
            cur.auto_ws();
            match item.parse(cur) {
                Ok(node) => {
                    children.push(node);
                    // an item that consumes nothing would match forever
                    if cur.offset() == before {
                        break;
                    }
                }
                Err(e) if e.is_recoverable() => {
                    cur.set_offset(before);
                    if children.len() < min {
                        return Err(e);
                    }
                    break;
                }
                Err(e) => return Err(e),
            }
        }
        if children.is_empty() {
            cur.set_offset(entry);
        }
        Ok(Node::branch(cur.since(start), children))
    })
}

/// Zero or one. A miss yields an empty node and consumes nothing.
pub fn maybe(p: impl Into<Parsable>) -> Parser {
    let inner = parsify(p);
    Parser::from_fn("maybe", move |cur| {
        let start = cur.offset();
        cur.auto_ws();
        match inner.parse(cur) {
            Ok(node) => Ok(node),
            Err(e) if e.is_recoverable() => {
                cur.set_offset(start);
                Ok(Node::default())
            }
            Err(e) => Err(e),
        }
    })
}

/// Sets the node's value to `f(&node)`. Misses pass through untouched.
pub fn map<F>(p: impl Into<Parsable>, f: F) -> Parser
where
    F: Fn(&Node<'_>) -> Value + Send + Sync + 'static,
{
    let inner = parsify(p);
    let name = format!("map({})", inner.name());
    Parser::from_fn(&name, move |cur| {
        let node = inner.parse(cur)?;
        let value = f(&node);
        Ok(Node {
            value: Some(value),
            ..node
        })
    })
}

/// Runs `p` without implicit whitespace skipping and joins every leaf token
/// beneath it into one token. For identifiers and other multi-part words.
pub fn merge(p: impl Into<Parsable>) -> Parser {
    let inner = parsify(p);
    Parser::from_fn("merge", move |cur| {
        let node = cur.with_auto_ws(false, |cur| inner.parse(cur))?;
        Ok(Node::leaf(node.flatten()))
    })
}

impl Parser {
    pub fn map<F>(self, f: F) -> Parser
    where
        F: Fn(&Node<'_>) -> Value + Send + Sync + 'static,
    {
        map(self, f)
    }

    pub fn merge(self) -> Parser {
        merge(self)
    }

    pub fn maybe(self) -> Parser {
        maybe(self)
    }

    pub fn some(self) -> Parser {
        some(self)
    }

    pub fn kleene(self) -> Parser {
        kleene(self)
    }

    pub fn no_auto_ws(self) -> Parser {
        no_auto_ws(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use test_log::test;

    fn run_parser<'a>(
        input: &'a str,
        p: &Parser,
    ) -> (Result<Node<'a>, tw::ParseError>, tw::Cursor<'a>) {
        let mut cur = tw::Cursor::from(input);
        let res = p.parse(&mut cur);
        (res, cur)
    }

    fn tokens<'a>(node: &Node<'a>) -> Vec<String> {
        node.children.iter().map(|n| n.token.to_string()).collect()
    }

    #[test]
    fn test_seq() {
        let p = seq!["hello", chars("a-z", 1..), "!"];
        let (node, cur) = run_parser("hello  world ! tail", &p);
        let node = node.unwrap();
        assert_eq!(tokens(&node), ["hello", "world", "!"]);
        assert_eq!(node.token, "hello  world !");
        assert_eq!(cur.remaining(), " tail");

        // a miss part way through backtracks to the start, reporting the miss
        let (node, cur) = run_parser("hello world ?", &p);
        assert!(node.is_err());
        assert_eq!(cur.offset(), 0);
        assert_eq!(cur.furthest_error().unwrap().to_string(), "offset 12: expected !");
    }

    #[test]
    fn test_any() {
        let p = any![seq!["a", "b", "c"], seq!["a", "x"], "z"];
        let (node, cur) = run_parser("a x", &p);
        assert_eq!(tokens(&node.unwrap()), ["a", "x"]);
        assert!(cur.is_eos());

        // the deepest alternative is reported, not the last one tried
        let (node, cur) = run_parser("a b d", &p);
        let err = node.unwrap_err();
        assert_eq!(err.to_string(), "offset 4: expected c");
        assert_eq!(cur.furthest_error().unwrap().to_string(), "offset 4: expected c");
        assert_eq!(cur.offset(), 0);
    }

    #[test]
    fn test_some_and_kleene() {
        let digit = chars("0-9", 1..=1);
        let (node, cur) = run_parser("1 2 3x", &some(&digit));
        assert_eq!(tokens(&node.unwrap()), ["1", "2", "3"]);
        assert_eq!(cur.remaining(), "x");

        let (node, cur) = run_parser("x", &some(&digit));
        assert_eq!(node.unwrap_err().to_string(), "offset 0: expected 0-9");
        assert_eq!(cur.offset(), 0);

        let (node, cur) = run_parser("  x", &kleene(&digit));
        let node = node.unwrap();
        assert!(node.children.is_empty());
        assert_eq!(node.token, "");
        assert_eq!(cur.offset(), 0);

        // zero-width items stop the repetition instead of looping
        let (node, _) = run_parser("abc", &kleene(maybe("z")));
        assert_eq!(node.unwrap().children.len(), 1);
    }

    #[test]
    fn test_separated() {
        let num = number_lit();
        let (node, cur) = run_parser("1, 2 ,3,", &some_sep(&num, ","));
        let node = node.unwrap();
        let values: Vec<_> = node.children.iter().map(|n| n.value.clone().unwrap()).collect();
        assert_eq!(values, [Value::Int(1), Value::Int(2), Value::Int(3)]);
        assert_eq!(cur.remaining(), ",");

        let (node, cur) = run_parser("", &kleene_sep(&num, ","));
        assert!(node.unwrap().children.is_empty());
        assert!(cur.has_failed());
        assert!(run_parser("", &some_sep(&num, ",")).0.is_err());
    }

    #[test]
    fn test_maybe() {
        let p = seq!["a", maybe("b"), "c"];
        let (node, _) = run_parser("a c", &p);
        assert_eq!(tokens(&node.unwrap()), ["a", "", "c"]);
        let (node, cur) = run_parser("a b c", &p);
        assert_eq!(tokens(&node.unwrap()), ["a", "b", "c"]);
        assert!(cur.is_eos());

        // the miss still shows up in diagnostics
        let (node, cur) = run_parser("  q", &maybe("b"));
        assert_eq!(node.unwrap(), Node::default());
        assert_eq!(cur.offset(), 0);
        assert_eq!(cur.furthest_error().unwrap().to_string(), "offset 2: expected b");
    }

    #[test]
    fn test_map() {
        let p = seq![number_lit(), "+", number_lit()].map(|n| {
            let lhs = n.children[0].value.as_ref().and_then(Value::as_int).unwrap_or_default();
            let rhs = n.children[2].value.as_ref().and_then(Value::as_int).unwrap_or_default();
            Value::Int(lhs + rhs)
        });
        let (node, _) = run_parser("2 + 40", &p);
        let node = node.unwrap();
        assert_eq!(node.value, Some(Value::Int(42)));
        assert_eq!(node.children.len(), 3);

        let (node, cur) = run_parser("2 - 40", &p);
        assert_eq!(node.unwrap_err().to_string(), "offset 2: expected +");
        assert_eq!(cur.offset(), 0);
    }

    #[test]
    fn test_merge_and_no_auto_ws() {
        let ident = merge(seq![ws(), chars("a-zA-Z", 1..), chars("a-zA-Z0-9", 0..)]);
        let (node, cur) = run_parser("  abc123 rest", &ident);
        let node = node.unwrap();
        assert_eq!(node.token, "abc123");
        assert!(node.children.is_empty());
        assert_eq!(cur.remaining(), " rest");

        // merge forbids gaps between the parts
        let (node, _) = run_parser("abc 123", &ident);
        assert_eq!(node.unwrap().token, "abc");

        let spaced = seq!["a", "b"];
        assert!(run_parser("a b", &spaced).0.is_ok());
        assert!(run_parser("a b", &no_auto_ws(&spaced)).0.is_err());
        assert!(run_parser("ab", &spaced.clone().no_auto_ws()).0.is_ok());

        // the policy is restored once the subtree is done
        let p = seq![no_auto_ws("a"), "b"];
        assert!(run_parser("a   b", &p).0.is_ok());
    }

    #[test]
    fn test_fatal_errors_are_not_swallowed() {
        let fwd = Forward::new("missing");
        for p in [maybe(&fwd), kleene(&fwd), any!["y", &fwd], some_sep("x", &fwd)] {
            let (res, _) = run_parser("x x", &p);
            match res {
                Err(tw::ParseError::Grammar(tw::GrammarError::Unresolved(name))) => {
                    assert_eq!(&*name, "missing")
                }
                other => panic!("expected unresolved, got {other:?}"),
            }
        }
    }
}
