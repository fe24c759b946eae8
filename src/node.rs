use std::{any::Any, borrow::Cow, collections::BTreeMap, fmt, sync::Arc};

/// A transformed payload, set on a [`Node`] by [`map`](crate::map).
///
/// Grammar-specific types go in `Custom` and are recovered with [`Value::downcast_ref`].
#[derive(Clone)]
pub enum Value {
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Custom(Arc<dyn Any + Send + Sync>),
}

impl Value {
    pub fn custom<T: Any + Send + Sync>(t: T) -> Self {
        Self::Custom(Arc::new(t))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// integers widen to floats
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            Self::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match self {
            Self::Custom(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Int(i) => write!(f, "Int({i})"),
            Self::Float(x) => write!(f, "Float({x})"),
            Self::Str(s) => write!(f, "Str({s:?})"),
            Self::List(v) => f.debug_list().entries(v).finish(),
            Self::Map(m) => f.debug_map().entries(m).finish(),
            Self::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

// custom payloads are only equal to themselves
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

/// The result of running a parser: the text it consumed, the nodes of its
/// sub-parsers in order, and an optional transformed value.
///
/// Tokens borrow from the input wherever possible. Only [`merge`](crate::merge)
/// over non-adjacent pieces, or a producer, will own its token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node<'a> {
    pub token: Cow<'a, str>,
    pub children: Vec<Node<'a>>,
    pub value: Option<Value>,
}

impl<'a> Node<'a> {
    pub fn leaf(token: impl Into<Cow<'a, str>>) -> Self {
        Self {
            token: token.into(),
            children: Vec::new(),
            value: None,
        }
    }

    pub fn branch(token: impl Into<Cow<'a, str>>, children: Vec<Node<'a>>) -> Self {
        Self {
            token: token.into(),
            children,
            value: None,
        }
    }

    pub fn with_value(self, value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..self
        }
    }

    pub fn child(&self, i: usize) -> Option<&Node<'a>> {
        self.children.get(i)
    }

    /// the transformed value, or the token when there is none
    pub fn value_or_token(&self) -> Value {
        match &self.value {
            Some(v) => v.clone(),
            None => Value::Str(self.token.to_string()),
        }
    }

    pub fn into_value(self) -> Value {
        match self.value {
            Some(v) => v,
            None => Value::Str(self.token.into_owned()),
        }
    }

    /// Concatenates the tokens of all leaf descendants, depth first.
    pub fn flatten(&self) -> Cow<'a, str> {
        if self.children.is_empty() {
            return self.token.clone();
        }
        let mut parts = self
            .children
            .iter()
            .map(Node::flatten)
            .filter(|t| !t.is_empty());
        match (parts.next(), parts.next()) {
            (None, _) => Cow::Borrowed(""),
            (Some(only), None) => only,
            (Some(first), Some(second)) => {
                let mut s = first.into_owned();
                s.push_str(&second);
                parts.for_each(|p| s.push_str(&p));
                Cow::Owned(s)
            }
        }
    }
}
