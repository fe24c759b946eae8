use std::{fmt, sync::Arc};

use once_cell::sync::OnceCell;

use crate::{
    cursor::Cursor,
    error::{GrammarError, ParseError},
    logging::Loggable,
    node::Node,
    LABEL,
};

pub(crate) type ParseFn =
    dyn for<'a> Fn(&mut Cursor<'a>) -> Result<Node<'a>, ParseError> + Send + Sync;

pub(crate) type ProduceFn = dyn Fn() -> Node<'static> + Send + Sync;

/// A function-shaped value mapping a cursor to a node.
///
/// On success the cursor has moved past the consumed text. On failure the cursor is
/// back where it was when the parser was called, with the failure recorded on it.
/// `parse` enforces the backtrack half of that contract for every parser, including
/// ones built with [`Parser::from_fn`].
///
/// Parsers are reference counted: cloning one shares the grammar, not copies it.
#[derive(Clone)]
pub struct Parser {
    name: Arc<str>,
    label: Option<&'static str>,
    func: Arc<ParseFn>,
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Parser({})", self.name)
    }
}

impl Parser {
    pub fn from_fn<F>(name: &str, f: F) -> Self
    where
        F: for<'a> Fn(&mut Cursor<'a>) -> Result<Node<'a>, ParseError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            label: None,
            func: Arc::new(f),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parse<'a>(&self, cur: &mut Cursor<'a>) -> Result<Node<'a>, ParseError> {
        let start = cur.offset();
        cur.enter()?;
        let outer = self.label.map(|label| LABEL.with(|f| f.replace(label)));
        cur.log_enter(&self.name, start);

        let res = (self.func)(cur);
        match &res {
            Ok(node) => cur.log_success(&self.name, start, &node.token),
            Err(e) => {
                cur.set_offset(start);
                cur.log_failure(&self.name, start, e);
            }
        }

        if let Some(outer) = outer {
            LABEL.with(|f| f.set(outer));
        }
        cur.leave();
        res
    }

    /// Labels trace output from this parser and everything beneath it.
    pub fn named(self, label: &'static str) -> Self {
        Self {
            name: label.into(),
            label: Some(label),
            func: self.func,
        }
    }
}

/// The shapes a grammar author may use wherever a parser is expected.
///
/// This is a closed set: anything else has no `From` conversion and is rejected
/// when the grammar is compiled, long before any input is parsed.
#[derive(Clone)]
pub enum Parsable {
    Literal(Arc<str>),
    Parser(Parser),
    Producer(Arc<ProduceFn>),
    Forward(Forward),
}

impl Parsable {
    /// a zero-argument callable whose node is returned without consuming input
    pub fn producer<F>(f: F) -> Self
    where
        F: Fn() -> Node<'static> + Send + Sync + 'static,
    {
        Self::Producer(Arc::new(f))
    }
}

impl From<&str> for Parsable {
    fn from(s: &str) -> Self {
        Self::Literal(s.into())
    }
}

impl From<String> for Parsable {
    fn from(s: String) -> Self {
        Self::Literal(s.into())
    }
}

impl From<Parser> for Parsable {
    fn from(p: Parser) -> Self {
        Self::Parser(p)
    }
}

impl From<&Parser> for Parsable {
    fn from(p: &Parser) -> Self {
        Self::Parser(p.clone())
    }
}

impl From<Forward> for Parsable {
    fn from(fwd: Forward) -> Self {
        Self::Forward(fwd)
    }
}

impl From<&Forward> for Parsable {
    fn from(fwd: &Forward) -> Self {
        Self::Forward(fwd.clone())
    }
}

/// Lifts any accepted shape into a [`Parser`].
pub fn parsify(p: impl Into<Parsable>) -> Parser {
    match p.into() {
        Parsable::Literal(lit) => crate::literals::exact(&lit),
        Parsable::Parser(p) => p,
        Parsable::Producer(f) => Parser::from_fn("producer", move |_cur| Ok(f())),
        Parsable::Forward(fwd) => fwd.reference(),
    }
}

pub fn parsify_all<I>(items: I) -> Vec<Parser>
where
    I: IntoIterator,
    I::Item: Into<Parsable>,
{
    items.into_iter().map(parsify).collect()
}

/// A holder for a parser that is defined after the parsers that use it.
///
/// Recursive grammars (nested tags, bracketed expressions) refer to a `Forward`
/// with `&fwd` and resolve it once the rule it stands for has been built. It can be
/// resolved only once, and parsing through it before then is a fatal [`GrammarError`].
///
/// References taken with `&fwd` (or by value) are weak, so a rule that refers to itself
/// does not own itself. Something outside the rules must own the cell: either the
/// entry point returned by [`Forward::parser`], or a root wrapped with [`Forward::anchor`].
/// Parsing through a weak reference after every owner has gone is a fatal
/// [`GrammarError::Dropped`].
#[derive(Clone)]
pub struct Forward {
    name: Arc<str>,
    slot: Arc<OnceCell<Parser>>,
}

impl fmt::Debug for Forward {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Forward({}, resolved={})", self.name, self.is_resolved())
    }
}

impl Forward {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            slot: Arc::new(OnceCell::new()),
        }
    }

    pub fn resolve(&self, p: impl Into<Parsable>) -> Result<(), GrammarError> {
        self.slot
            .set(parsify(p))
            .map_err(|_| GrammarError::AlreadyResolved(Arc::clone(&self.name)))
    }

    pub fn is_resolved(&self) -> bool {
        self.slot.get().is_some()
    }

    /// The grammar's entry point. Owns the cell, so it must not be used inside the
    /// rule this forward reference resolves to, use `&fwd` there.
    pub fn parser(&self) -> Parser {
        let name = Arc::clone(&self.name);
        let slot = Arc::clone(&self.slot);
        Parser::from_fn(&self.name, move |cur| deref(&name, &slot, cur))
    }

    /// Wraps `root` so that it owns this cell, for grammars whose entry point is
    /// not the forward reference itself.
    pub fn anchor(&self, root: impl Into<Parsable>) -> Parser {
        let name = Arc::clone(&self.name);
        let slot = Arc::clone(&self.slot);
        let root = parsify(root);
        Parser::from_fn(&root.name().to_string(), move |cur| match slot.get() {
            Some(_) => root.parse(cur),
            None => Err(GrammarError::Unresolved(Arc::clone(&name)).into()),
        })
    }

    /// a parser that looks the cell up each time it runs, without owning it
    pub(crate) fn reference(&self) -> Parser {
        let name = Arc::clone(&self.name);
        let slot = Arc::downgrade(&self.slot);
        Parser::from_fn(&self.name, move |cur| match slot.upgrade() {
            Some(slot) => deref(&name, &slot, cur),
            None => Err(GrammarError::Dropped(Arc::clone(&name)).into()),
        })
    }
}

fn deref<'a>(
    name: &Arc<str>,
    slot: &OnceCell<Parser>,
    cur: &mut Cursor<'a>,
) -> Result<Node<'a>, ParseError> {
    match slot.get() {
        Some(p) => p.parse(cur),
        None => Err(GrammarError::Unresolved(Arc::clone(name)).into()),
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use std::sync::Arc;
    use test_log::test;

    fn parse_with<'a>(
        input: &'a str,
        p: &Parser,
    ) -> (Result<Node<'a>, tw::ParseError>, tw::Cursor<'a>) {
        let mut cur = tw::Cursor::from(input);
        let res = p.parse(&mut cur);
        (res, cur)
    }

    #[test]
    fn test_parsify() {
        // strings
        let (node, _) = parse_with("ffooo", &parsify("ff"));
        assert_eq!(node.unwrap().token, "ff");

        // parsers
        let (node, _) = parse_with("ffooo", &parsify(chars("f", 1..)));
        assert_eq!(node.unwrap().token, "ff");

        // producers
        let p = parsify(Parsable::producer(|| Node::leaf("hello")));
        let (node, cur) = parse_with("ffooo", &p);
        assert_eq!(node.unwrap().token, "hello");
        assert_eq!(cur.offset(), 0);

        // forward references, resolved after use
        let fwd = Forward::new("f");
        let p = parsify(&fwd);
        fwd.resolve(chars("f", 1..)).unwrap();
        let (node, _) = parse_with("ffooo", &p);
        assert_eq!(node.unwrap().token, "ff");
    }

    #[test]
    fn test_parsify_all() {
        let parsers = parsify_all(["ff", "gg"]);
        let (node, _) = parse_with("ffooo", &parsers[0]);
        assert_eq!(node.unwrap().token, "ff");
        let (node, cur) = parse_with("ffooo", &parsers[1]);
        assert!(node.is_err());
        assert_eq!(cur.furthest_error().unwrap().to_string(), "offset 0: expected gg");
    }

    #[test]
    fn test_forward_errors() {
        let fwd = Forward::new("tag");
        assert!(!fwd.is_resolved());

        let p = any!["x", &fwd];
        let (res, cur) = parse_with("abc", &p);
        assert_eq!(
            res.unwrap_err(),
            tw::ParseError::Grammar(tw::GrammarError::Unresolved("tag".into()))
        );
        assert_eq!(cur.offset(), 0);

        fwd.resolve("abc").unwrap();
        assert!(fwd.is_resolved());
        assert_eq!(
            fwd.resolve("def"),
            Err(tw::GrammarError::AlreadyResolved("tag".into()))
        );
        let (res, _) = parse_with("abc", &p);
        assert_eq!(res.unwrap().token, "abc");
    }

    #[test]
    fn test_recursive_grammar_is_freed() {
        let guard = Arc::new(());
        let g = Arc::clone(&guard);
        let nested = Forward::new("nested");
        let leaf = Parsable::producer(move || {
            let _ = Arc::clone(&g);
            Node::default()
        });
        nested.resolve(any![seq!["(", &nested, ")"], leaf]).unwrap();
        let p = nested.parser();
        assert!(run(&p, "(())").is_ok());
        assert_eq!(Arc::strong_count(&guard), 2);

        // the entry point alone keeps the grammar alive
        drop(nested);
        assert!(run(&p, "(())").is_ok());

        drop(p);
        assert_eq!(Arc::strong_count(&guard), 1);
    }

    #[test]
    fn test_anchor() {
        let value = Forward::new("value");
        let group = seq!["(", &value, ")"];
        value.resolve(any![chars("0-9", 1..), &group]).unwrap();
        let root = value.anchor(seq![&group, "!"]);
        drop(value);
        assert!(run(&root, "((7))!").is_ok());

        // a weak reference whose owners have all gone
        let fwd = Forward::new("gone");
        fwd.resolve("b").unwrap();
        let p = seq!["a", &fwd];
        drop(fwd);
        let (res, cur) = parse_with("a b", &p);
        assert_eq!(
            res.unwrap_err(),
            tw::ParseError::Grammar(tw::GrammarError::Dropped("gone".into()))
        );
        assert_eq!(cur.offset(), 0);

        let unresolved = Forward::new("later");
        let (res, _) = parse_with("x", &unresolved.anchor("x"));
        assert_eq!(
            res.unwrap_err(),
            tw::ParseError::Grammar(tw::GrammarError::Unresolved("later".into()))
        );
    }

    #[test]
    fn test_backtrack_contract() {
        let greedy = Parser::from_fn("greedy", |cur| {
            cur.skip_ws();
            let _ = cur.fail(&"never".into());
            Err(tw::ParseError::NoMatch(cur.furthest_error().cloned().unwrap()))
        });
        let (res, cur) = parse_with("   abc", &greedy);
        assert!(res.is_err());
        assert_eq!(cur.offset(), 0);
        assert_eq!(cur.furthest_error().unwrap().offset, 3);
    }

    #[test]
    fn test_named() {
        let p = seq!["a", "b"].named("ab");
        assert_eq!(p.name(), "ab");
        let (node, _) = parse_with("a b", &p);
        assert_eq!(node.unwrap().children.len(), 2);
        assert_eq!(crate::LABEL.with(|f| f.get()), "");
    }
}
