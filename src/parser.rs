use std::iter::Peekable;

use thiserror::Error;

use crate::expr::Expr;

/// Nesting deeper than this aborts the parse instead of riding the host
/// stack down.
pub const MAX_PARSE_DEPTH: usize = 256;

#[derive(Clone, Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("unexpected ')'")]
    UnexpectedClose,
    #[error("expression nesting exceeds depth limit {0}")]
    TooDeep(usize),
}

/// Consumes exactly one expression from the token cursor, leaving the
/// cursor on the first unconsumed token.
///
/// Tokens wrapped in double quotes become Symbols holding the unquoted
/// text (the language has no string type); tokens that fully parse as an
/// `f64` become Numbers; everything else is a bare Symbol. `(` gathers
/// sub-expressions until the matching `)`. One token of lookahead, no
/// backtracking.
pub fn parse<I>(tokens: &mut Peekable<I>) -> Result<Expr, ParseError>
where
    I: Iterator<Item = String>,
{
    parse_at(tokens, 0)
}

fn parse_at<I>(tokens: &mut Peekable<I>, depth: usize) -> Result<Expr, ParseError>
where
    I: Iterator<Item = String>,
{
    if depth > MAX_PARSE_DEPTH {
        return Err(ParseError::TooDeep(MAX_PARSE_DEPTH));
    }
    let token = match tokens.next() {
        Some(token) => token,
        None => return Err(ParseError::UnexpectedEof),
    };
    match token.as_str() {
        "(" => {
            let mut elements = Vec::new();
            loop {
                match tokens.peek() {
                    // The list is still open, so input ended where another
                    // element or the ')' was expected
                    None => return Err(ParseError::UnexpectedEof),
                    Some(next) if next == ")" => {
                        tokens.next();
                        return Ok(Expr::list(elements));
                    }
                    Some(_) => elements.push(parse_at(tokens, depth + 1)?),
                }
            }
        }
        ")" => Err(ParseError::UnexpectedClose),
        _ => Ok(atom(token)),
    }
}

/// Quote folding first, then number recognition, then bare symbol.
fn atom(token: String) -> Expr {
    // A lone quote left over from an unterminated string is not a string
    // literal, hence the length guard
    if token.len() >= 2 && token.starts_with('"') && token.ends_with('"') {
        return Expr::Symbol(token[1..token.len() - 1].to_string());
    }
    match token.parse::<f64>() {
        Ok(number) => Expr::Number(number),
        Err(_) => Expr::Symbol(token),
    }
}
