//! Nom parser for rule expressions
//!
//! Precedence, loosest first: `or`, `and`, `not`, comparison / `in`,
//! `+ -`, `* /`, method calls, primaries. Keywords have symbolic
//! spellings: `||`, `&&`, `!`.

use super::ast::{ArithOp, CmpOp, Expr, Func, Value};
use crate::RuleError;
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit1, multispace0, satisfy},
    combinator::{all_consuming, map, map_res, not, opt, recognize, value, verify},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated, tuple},
    IResult,
};

const RESERVED: &[&str] = &[
    "and", "or", "not", "in", "true", "false", "True", "False",
];

/// Longest expression text accepted, in bytes
pub const MAX_EXPRESSION_LEN: usize = 1024;

/// Deepest nesting of parentheses, lists, calls and `not` accepted
pub const MAX_NESTING: usize = 64;

/// Parse a complete expression
///
/// Text longer than [`MAX_EXPRESSION_LEN`] or nested deeper than
/// [`MAX_NESTING`] is a parse error, so the tree handed to the evaluator
/// is always shallow.
///
/// # Examples
///
/// ```
/// use claimwise_eligibility::expr::parse_expression;
///
/// assert!(parse_expression("employment_months >= 6 and earnings > 3000").is_ok());
/// assert!(parse_expression("employment_months >=").is_err());
/// ```
pub fn parse_expression(input: &str) -> Result<Expr, RuleError> {
    if input.trim().is_empty() {
        return Err(RuleError::Parse("empty expression".to_string()));
    }
    if input.len() > MAX_EXPRESSION_LEN {
        return Err(RuleError::Parse(format!(
            "expression longer than {} bytes",
            MAX_EXPRESSION_LEN
        )));
    }

    match all_consuming(ws(|i| or_expr(i, 0)))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Failure(e)) if e.code == ErrorKind::TooLarge => {
            Err(RuleError::Parse("expression nested too deeply".to_string()))
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(RuleError::Parse(format!(
            "unexpected input at {:?}",
            e.input
        ))),
        Err(nom::Err::Incomplete(_)) => Err(RuleError::Parse("incomplete expression".to_string())),
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn ws<'a, O, F>(inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// A keyword not followed by an identifier character (`or` but not `order`)
fn keyword<'a>(kw: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(kw), not(satisfy(is_ident_char)))
}

fn identifier(input: &str) -> IResult<&str, &str> {
    verify(
        recognize(pair(satisfy(is_ident_start), take_while(is_ident_char))),
        |s: &str| !RESERVED.contains(&s),
    )(input)
}

// =============================================================================
// BOOLEAN LAYERS
// =============================================================================

fn or_expr(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, first) = and_expr(input, depth)?;
    let (input, rest) = many0(preceded(
        ws(alt((keyword("or"), tag("||")))),
        |i| and_expr(i, depth),
    ))(input)?;

    let expr = rest
        .into_iter()
        .fold(first, |acc, rhs| Expr::Or(Box::new(acc), Box::new(rhs)));
    Ok((input, expr))
}

fn and_expr(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, first) = not_expr(input, depth)?;
    let (input, rest) = many0(preceded(
        ws(alt((keyword("and"), tag("&&")))),
        |i| not_expr(i, depth),
    ))(input)?;

    let expr = rest
        .into_iter()
        .fold(first, |acc, rhs| Expr::And(Box::new(acc), Box::new(rhs)));
    Ok((input, expr))
}

/// Every nested layer passes through here, so the depth check lives here
fn not_expr(input: &str, depth: usize) -> IResult<&str, Expr> {
    if depth > MAX_NESTING {
        return Err(nom::Err::Failure(Error::new(input, ErrorKind::TooLarge)));
    }

    alt((
        map(
            preceded(
                ws(alt((keyword("not"), terminated(tag("!"), not(char('=')))))),
                |i| not_expr(i, depth + 1),
            ),
            |e| Expr::Not(Box::new(e)),
        ),
        |i| comparison(i, depth),
    ))(input)
}

// =============================================================================
// COMPARISON
// =============================================================================

enum Suffix {
    Cmp(CmpOp, Expr),
    In(Expr, bool),
}

fn cmp_op(input: &str) -> IResult<&str, CmpOp> {
    alt((
        value(CmpOp::Eq, tag("==")),
        value(CmpOp::Ne, tag("!=")),
        value(CmpOp::Le, tag("<=")),
        value(CmpOp::Ge, tag(">=")),
        value(CmpOp::Lt, tag("<")),
        value(CmpOp::Gt, tag(">")),
    ))(input)
}

fn comparison(input: &str, depth: usize) -> IResult<&str, Expr> {
    let operand = |i| additive(i, depth);
    let (input, lhs) = operand(input)?;
    let (input, suffix) = opt(alt((
        map(pair(ws(cmp_op), operand), |(op, rhs)| Suffix::Cmp(op, rhs)),
        map(
            preceded(pair(ws(keyword("not")), ws(keyword("in"))), operand),
            |rhs| Suffix::In(rhs, true),
        ),
        map(preceded(ws(keyword("in")), operand), |rhs| Suffix::In(rhs, false)),
    )))(input)?;

    let expr = match suffix {
        None => lhs,
        Some(Suffix::Cmp(op, rhs)) => Expr::Compare(op, Box::new(lhs), Box::new(rhs)),
        Some(Suffix::In(haystack, negated)) => Expr::In {
            needle: Box::new(lhs),
            haystack: Box::new(haystack),
            negated,
        },
    };
    Ok((input, expr))
}

// =============================================================================
// ARITHMETIC
// =============================================================================

fn fold_arith(first: Expr, rest: Vec<(ArithOp, Expr)>) -> Expr {
    rest.into_iter()
        .fold(first, |acc, (op, rhs)| Expr::Arith(op, Box::new(acc), Box::new(rhs)))
}

fn additive(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, first) = term(input, depth)?;
    let (input, rest) = many0(pair(
        ws(alt((value(ArithOp::Add, char('+')), value(ArithOp::Sub, char('-'))))),
        |i| term(i, depth),
    ))(input)?;
    Ok((input, fold_arith(first, rest)))
}

fn term(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, first) = postfix(input, depth)?;
    let (input, rest) = many0(pair(
        ws(alt((value(ArithOp::Mul, char('*')), value(ArithOp::Div, char('/'))))),
        |i| postfix(i, depth),
    ))(input)?;
    Ok((input, fold_arith(first, rest)))
}

// =============================================================================
// CALLS AND PRIMARIES
// =============================================================================

fn method_name(input: &str) -> IResult<&str, Func> {
    alt((
        value(Func::Lower, keyword("lower")),
        value(Func::Upper, keyword("upper")),
        value(Func::Strip, keyword("strip")),
    ))(input)
}

fn func_name(input: &str) -> IResult<&str, Func> {
    alt((method_name, value(Func::Len, keyword("len"))))(input)
}

/// `x.lower().strip()`
fn postfix(input: &str, depth: usize) -> IResult<&str, Expr> {
    let (input, base) = primary(input, depth)?;
    let (input, methods) = many0(terminated(
        preceded(ws(char('.')), method_name),
        pair(ws(char('(')), char(')')),
    ))(input)?;

    let expr = methods
        .into_iter()
        .fold(base, |acc, f| Expr::Call(f, Box::new(acc)));
    Ok((input, expr))
}

fn primary(input: &str, depth: usize) -> IResult<&str, Expr> {
    ws(alt((
        number,
        string_literal,
        boolean,
        |i| list(i, depth + 1),
        |i| call(i, depth + 1),
        map(identifier, |name| Expr::Field(name.to_string())),
        delimited(char('('), |i| or_expr(i, depth + 1), char(')')),
    )))(input)
}

fn number(input: &str) -> IResult<&str, Expr> {
    map_res(
        recognize(tuple((opt(char('-')), digit1, opt(pair(char('.'), digit1))))),
        |s: &str| s.parse::<f64>().map(|n| Expr::Literal(Value::Number(n))),
    )(input)
}

/// Single- or double-quoted text; no escape sequences
fn string_literal(input: &str) -> IResult<&str, Expr> {
    map(
        alt((
            delimited(char('\''), take_while(|c: char| c != '\''), char('\'')),
            delimited(char('"'), take_while(|c: char| c != '"'), char('"')),
        )),
        |s: &str| Expr::Literal(Value::Str(s.to_string())),
    )(input)
}

fn boolean(input: &str) -> IResult<&str, Expr> {
    alt((
        value(
            Expr::Literal(Value::Bool(true)),
            alt((keyword("true"), keyword("True"))),
        ),
        value(
            Expr::Literal(Value::Bool(false)),
            alt((keyword("false"), keyword("False"))),
        ),
    ))(input)
}

fn list(input: &str, depth: usize) -> IResult<&str, Expr> {
    map(
        delimited(
            char('['),
            terminated(
                separated_list0(char(','), |i| or_expr(i, depth)),
                opt(char(',')),
            ),
            ws(char(']')),
        ),
        Expr::List,
    )(input)
}

fn call(input: &str, depth: usize) -> IResult<&str, Expr> {
    map(
        pair(func_name, delimited(ws(char('(')), |i| or_expr(i, depth), char(')'))),
        |(f, arg)| Expr::Call(f, Box::new(arg)),
    )(input)
}
