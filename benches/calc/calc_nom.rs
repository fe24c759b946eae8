use nom::{
    branch::alt,
    character::complete::{char, multispace0, one_of},
    error::ParseError,
    multi::fold_many0,
    number::complete::double,
    sequence::{delimited, pair},
    IResult,
};

pub fn nom_parser(s: &str) -> f64 {
    expr(s).unwrap().1
}

fn ws<'a, F, O, E: ParseError<&'a str>>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O, E>
where
    F: FnMut(&'a str) -> IResult<&'a str, O, E>,
{
    delimited(multispace0, inner, multispace0)
}

fn factor(i: &str) -> IResult<&str, f64> {
    alt((ws(double), delimited(ws(char('(')), expr, ws(char(')')))))(i)
}

fn term(i: &str) -> IResult<&str, f64> {
    let (i, init) = factor(i)?;
    fold_many0(
        pair(ws(one_of("*/")), factor),
        move || init,
        |acc, (op, v)| if op == '*' { acc * v } else { acc / v },
    )(i)
}

fn expr(i: &str) -> IResult<&str, f64> {
    let (i, init) = term(i)?;
    fold_many0(
        pair(ws(one_of("+-")), term),
        move || init,
        |acc, (op, v)| if op == '+' { acc + v } else { acc - v },
    )(i)
}
