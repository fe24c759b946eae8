use std::{ops::RangeBounds, sync::Arc};

use log::error;

use crate::{
    char_class::{CharClass, Counts},
    cursor::Cursor,
    error::{GrammarError, ParseError},
    node::{Node, Value},
    parser::Parser,
    LOG_TARGET,
};

/// Matches `literal` exactly, case sensitive.
pub fn exact(literal: &str) -> Parser {
    let expected: Arc<str> = literal.into();
    Parser::from_fn(literal, move |cur| {
        cur.auto_ws();
        if cur.remaining().starts_with(&*expected) {
            Ok(Node::leaf(cur.advance(expected.len())))
        } else {
            Err(cur.fail(&expected))
        }
    })
}

/// Greedily matches characters in the class `spec`, e.g. `chars("a-zA-Z_", 1..)`.
///
/// Stops at the first non-member, at end of input, or once `counts.max` characters
/// have been taken. Fewer than `counts.min` is a miss with `spec` as the expectation.
///
/// An inverted range such as `3..=1` is logged as an error when the matcher is built,
/// and every use of the matcher then fails with the fatal [`GrammarError::InvalidCounts`].
pub fn chars(spec: &str, counts: impl RangeBounds<usize>) -> Parser {
    class_run("chars", spec, Counts::from_bounds(&counts), false)
}

/// As [`chars`] but matches characters *not* in the class.
pub fn not_chars(spec: &str, counts: impl RangeBounds<usize>) -> Parser {
    class_run("not_chars", spec, Counts::from_bounds(&counts), true)
}

fn class_run(
    name: &str,
    spec: &str,
    counts: Result<Counts, GrammarError>,
    negate: bool,
) -> Parser {
    let name = format!("{name}({spec})");
    let counts = match counts {
        Ok(counts) => counts,
        Err(e) => {
            error!(target: LOG_TARGET, "{name}: {e}");
            return Parser::from_fn(&name, move |_cur| Err(e.clone().into()));
        }
    };
    let class = CharClass::new(spec);
    let expected: Arc<str> = spec.into();
    Parser::from_fn(&name, move |cur| {
        cur.auto_ws();
        let mut len = 0;
        let mut taken = 0;
        for c in cur.remaining().chars() {
            if counts.max.map_or(false, |max| taken >= max) || class.contains(c) == negate {
                break;
            }
            len += c.len_utf8();
            taken += 1;
        }
        if taken < counts.min {
            return Err(cur.fail(&expected));
        }
        Ok(Node::leaf(cur.advance(len)))
    })
}

/// An optionally signed integer or decimal, with an optional exponent.
///
/// The value is [`Value::Int`] when there is neither a decimal point nor an
/// exponent, and [`Value::Float`] otherwise.
pub fn number_lit() -> Parser {
    let expected: Arc<str> = "number".into();
    Parser::from_fn("number_lit", move |cur| {
        cur.auto_ws();
        let Some((len, is_float)) = scan_number(cur.remaining().as_bytes()) else {
            return Err(cur.fail(&expected));
        };
        let text = &cur.remaining()[..len];
        let value = if is_float {
            text.parse::<f64>().ok().map(Value::Float)
        } else {
            text.parse::<i64>().ok().map(Value::Int)
        };
        match value {
            Some(value) => Ok(Node::leaf(cur.advance(len)).with_value(value)),
            None => Err(cur.fail(&expected)),
        }
    })
}

fn scan_number(s: &[u8]) -> Option<(usize, bool)> {
    let digits_from = |i: usize| s[i..].iter().take_while(|b| b.is_ascii_digit()).count();

    let mut end = 0;
    if matches!(s.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = digits_from(end);
    end += int_digits;

    let mut is_float = false;
    let mut frac_digits = 0;
    if s.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            is_float = true;
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }

    if matches!(s.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(s.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_from(exp);
        if exp_digits > 0 {
            is_float = true;
            end = exp + exp_digits;
        }
    }
    Some((end, is_float))
}

/// A literal quoted by any one of `quotes` at both ends, e.g. `string_lit("\"'")`.
///
/// The token is the literal including its quotes, the value is the unescaped content.
/// Recognised escapes are `\n \t \r \0 \\ \/ \" \'` and `\uXXXX`, any other escaped
/// character stands for itself.
pub fn string_lit(quotes: &str) -> Parser {
    let quote_chars: Vec<char> = quotes.chars().collect();
    let expected: Arc<str> = quotes.into();
    Parser::from_fn("string_lit", move |cur| {
        cur.auto_ws();
        let next = cur.remaining().chars().next();
        let Some(quote) = next.filter(|c| quote_chars.contains(c)) else {
            return Err(cur.fail(&expected));
        };
        let (len, content) = scan_quoted(cur, quote)?;
        Ok(Node::leaf(cur.advance(len)).with_value(content))
    })
}

/// returns the byte length of the literal including both quotes, and its content
fn scan_quoted(cur: &mut Cursor<'_>, quote: char) -> Result<(usize, String), ParseError> {
    let body = &cur.remaining()[quote.len_utf8()..];
    let mut content = String::new();
    let mut iter = body.char_indices();
    while let Some((i, c)) = iter.next() {
        match c {
            c if c == quote => return Ok((quote.len_utf8() + i + c.len_utf8(), content)),
            '\\' => match iter.next() {
                Some((_, 'n')) => content.push('\n'),
                Some((_, 't')) => content.push('\t'),
                Some((_, 'r')) => content.push('\r'),
                Some((_, '0')) => content.push('\0'),
                Some((j, 'u')) => {
                    let hex = body.get(j + 1..j + 5).unwrap_or_default();
                    let decoded = (hex.len() == 4 && hex.bytes().all(|b| b.is_ascii_hexdigit()))
                        .then(|| u32::from_str_radix(hex, 16).ok())
                        .flatten()
                        .and_then(char::from_u32);
                    match decoded {
                        Some(ch) => {
                            content.push(ch);
                            iter.nth(3);
                        }
                        _ => {
                            let at = cur.offset() + quote.len_utf8() + j + 1;
                            return Err(cur.fail_at(at, &"4 hex digits".into()));
                        }
                    }
                }
                Some((_, other)) => content.push(other),
                None => break,
            },
            c => content.push(c),
        }
    }
    let end = cur.input().len();
    let expected: Arc<str> = quote.to_string().into();
    Err(cur.fail_at(end, &expected))
}
