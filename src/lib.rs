//! deckscript is the embedded scripting core of a button-deck automation
//! shell: a small, dynamically-typed S-expression language with closures,
//! classes, and instances, evaluated by a tree walker over a chain of
//! reference-counted scope frames.
//!
//! The host-facing surface is [`eval_source`] / [`run_source`] plus
//! [`global_env`]; the `deckscript` binary wraps them in a line REPL and
//! a one-shot script runner.
//!
//! ```
//! use deckscript::{global_env, run_source};
//!
//! let env = global_env();
//! assert_eq!(run_source("(define x 4) (* x x)", &env).unwrap(), "16");
//! ```

use std::rc::Rc;

use thiserror::Error;

pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod repl;
pub mod scanner;
pub mod scripts;

pub use expr::Expr;
pub use interpreter::{global_env, Environment, EvalError};
pub use parser::ParseError;
pub use repl::repl;

/// Either way a source string can fail: at parse time or at evaluation
/// time. Both sides are normal, reportable outcomes for an embedding
/// host, never a crash.
#[derive(Clone, Error, Debug, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

/// Parses and evaluates every top-level form in `source` against `env`,
/// returning the last form's value. Empty source is a parse error, since
/// there is nothing to evaluate.
pub fn eval_source(source: &str, env: &Rc<Environment>) -> Result<Expr, Error> {
    let mut tokens = scanner::tokenize(source).into_iter().peekable();
    let mut result = parser::parse(&mut tokens)?.evaluate(env)?;
    while tokens.peek().is_some() {
        result = parser::parse(&mut tokens)?.evaluate(env)?;
    }
    Ok(result)
}

/// The embedding contract: source text in, rendered result text or a
/// classified error out.
pub fn run_source(source: &str, env: &Rc<Environment>) -> Result<String, Error> {
    Ok(eval_source(source, env)?.to_string())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn eval_source_returns_the_last_form() {
        let env = global_env();
        assert_eq!(
            eval_source("(define a 1) (define b 2) (+ a b)", &env),
            Ok(Expr::Number(3.0))
        );
    }

    #[test]
    fn empty_source_is_a_parse_error() {
        let env = global_env();
        assert_eq!(
            eval_source("", &env),
            Err(Error::Parse(ParseError::UnexpectedEof))
        );
        assert_eq!(
            eval_source("   \n\t", &env),
            Err(Error::Parse(ParseError::UnexpectedEof))
        );
    }

    #[test]
    fn run_source_renders_the_result() {
        let env = global_env();
        assert_eq!(run_source("(lambda (x) x)", &env).unwrap(), "<function>");
        assert_eq!(run_source("(+ 0.5 0.25)", &env).unwrap(), "0.75");
    }

    #[test]
    fn stray_close_paren_after_a_form_is_reported() {
        let env = global_env();
        assert_eq!(
            eval_source("(+ 1 1))", &env),
            Err(Error::Parse(ParseError::UnexpectedClose))
        );
    }

    #[test]
    fn eval_errors_carry_their_kind() {
        let env = global_env();
        assert_eq!(
            eval_source("ghost", &env),
            Err(Error::Eval(EvalError::UndefinedSymbol("ghost".to_string())))
        );
    }
}
