//! A toy HTML reader: tags with quoted attributes, text, and nested tags.
//!
//! Closing tag names are not checked against the opening tag.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use crate::prelude::*;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tag {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub body: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(String),
    Tag(Tag),
}

impl Element {
    fn from_value(v: &Value) -> Option<Self> {
        match v {
            Value::Str(s) => Some(Self::Text(s.clone())),
            v => v.downcast_ref::<Tag>().cloned().map(Self::Tag),
        }
    }
}

static GRAMMAR: Lazy<Result<Parser, tw::GrammarError>> = Lazy::new(grammar);

pub fn grammar() -> Result<Parser, tw::GrammarError> {
    let tag = Forward::new("tag");

    let identifier = no_auto_ws(merge(seq![
        ws(),
        chars("a-zA-Z", 1..),
        chars("a-zA-Z0-9", 0..)
    ]))
    .named("identifier");

    let text = not_chars("<>", 1..).map(|n| Value::Str(n.token.to_string()));
    let elements = kleene(any![text, &tag]).map(|n| {
        Value::List(n.children.iter().map(Node::value_or_token).collect())
    });

    let attr = seq![&identifier, "=", string_lit("\"'")];
    let attrs = kleene(attr).map(|n| {
        Value::Map(
            n.children
                .iter()
                .map(|a| (a.children[0].token.to_string(), a.children[2].value_or_token()))
                .collect(),
        )
    });

    let tstart = seq!["<", &identifier, attrs, ">"];
    let tend = seq!["</", &identifier, ">"];

    tag.resolve(seq![tstart, elements, tend].map(build_tag).named("tag"))?;
    Ok(tag.parser())
}

fn build_tag(n: &Node) -> Value {
    let open = &n.children[0];
    let attributes: BTreeMap<String, String> = match &open.children[2].value {
        Some(Value::Map(m)) => m
            .iter()
            .map(|(k, v)| match v {
                Value::Str(s) => (k.clone(), s.clone()),
                other => unreachable!("attribute {k} has value {other:?}"),
            })
            .collect(),
        other => unreachable!("attributes parsed as {other:?}"),
    };
    let body: Vec<Element> = match &n.children[1].value {
        Some(Value::List(items)) => items
            .iter()
            .map(|v| {
                Element::from_value(v)
                    .unwrap_or_else(|| panic!("Unexpected element {v:?} in tag body"))
            })
            .collect(),
        other => unreachable!("tag body parsed as {other:?}"),
    };
    Value::custom(Tag {
        name: open.children[1].token.to_string(),
        attributes,
        body,
    })
}

pub fn parse_html(input: &str) -> Result<Tag, tw::ParseError> {
    let parser = GRAMMAR.as_ref().map_err(|e| tw::ParseError::Grammar(e.clone()))?;
    let value = run(parser, input)?;
    match value.downcast_ref::<Tag>() {
        Some(tag) => Ok(tag.clone()),
        None => unreachable!("html produced {value:?}"),
    }
}
