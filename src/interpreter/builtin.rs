use crate::expr::{Builtin, Expr};

use super::{Environment, EvalError};

fn number_operands(name: &'static str, args: &[Expr]) -> Result<(f64, f64), EvalError> {
    match args {
        [Expr::Number(left), Expr::Number(right)] => Ok((*left, *right)),
        _ => Err(EvalError::Type(format!("{} requires numbers", name))),
    }
}

fn add_impl(args: &[Expr]) -> Result<Expr, EvalError> {
    let (left, right) = number_operands("+", args)?;
    Ok(Expr::Number(left + right))
}

fn sub_impl(args: &[Expr]) -> Result<Expr, EvalError> {
    let (left, right) = number_operands("-", args)?;
    Ok(Expr::Number(left - right))
}

fn mul_impl(args: &[Expr]) -> Result<Expr, EvalError> {
    let (left, right) = number_operands("*", args)?;
    Ok(Expr::Number(left * right))
}

// Division by zero follows IEEE-754 and yields inf or nan, not an error
fn div_impl(args: &[Expr]) -> Result<Expr, EvalError> {
    let (left, right) = number_operands("/", args)?;
    Ok(Expr::Number(left / right))
}

/// Installs the native arithmetic functions into a frame. The evaluator
/// checks each builtin's arity before invoking it.
pub fn populate_builtins(env: &Environment) {
    env.define(
        "+",
        Expr::Builtin(Builtin {
            name: "+",
            arity: 2,
            call: add_impl,
        }),
    );
    env.define(
        "-",
        Expr::Builtin(Builtin {
            name: "-",
            arity: 2,
            call: sub_impl,
        }),
    );
    env.define(
        "*",
        Expr::Builtin(Builtin {
            name: "*",
            arity: 2,
            call: mul_impl,
        }),
    );
    env.define(
        "/",
        Expr::Builtin(Builtin {
            name: "/",
            arity: 2,
            call: div_impl,
        }),
    );
}
