use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;

use crate::expr::{Class, Expr, Function, Instance};

use super::Environment;

/// Evaluator recursion deeper than this aborts with a classified error
/// instead of exhausting the host stack. Self-recursion is the language's
/// only loop construct, so runaway scripts land here.
pub const MAX_EVAL_DEPTH: usize = 512;

#[derive(Clone, Error, Debug, PartialEq)]
pub enum EvalError {
    #[error("wrong number of operands for {form}: expected {expected}, got {got}")]
    Arity {
        form: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("type error: {0}")]
    Type(String),
    #[error("undefined symbol: {0}")]
    UndefinedSymbol(String),
    #[error("undefined method: {0}")]
    UndefinedMethod(String),
    #[error("invalid call: {0}")]
    InvalidCall(String),
    #[error("evaluation exceeds recursion limit {0}")]
    RecursionLimit(usize),
}

impl Expr {
    /// Evaluates this expression against the given frame. Numbers,
    /// functions, builtins, classes, and instances are themselves; symbols
    /// are looked up; lists dispatch to a special form or a call.
    pub fn evaluate(&self, env: &Rc<Environment>) -> Result<Expr, EvalError> {
        self.eval_at(env, 0)
    }

    fn eval_at(&self, env: &Rc<Environment>, depth: usize) -> Result<Expr, EvalError> {
        if depth > MAX_EVAL_DEPTH {
            return Err(EvalError::RecursionLimit(MAX_EVAL_DEPTH));
        }
        match self {
            Expr::Symbol(name) => match env.lookup(name) {
                Some(value) => Ok(value),
                None => Err(EvalError::UndefinedSymbol(name.clone())),
            },
            Expr::List(elements) => eval_list(elements, env, depth),
            other => Ok(other.clone()),
        }
    }
}

impl Function {
    /// Applies the closure to already-evaluated arguments: exact arity,
    /// then a fresh child frame of the captured closure frame with each
    /// parameter bound, then the body.
    pub fn apply(&self, args: Vec<Expr>) -> Result<Expr, EvalError> {
        apply_at(self, args, 0)
    }
}

fn apply_at(func: &Function, args: Vec<Expr>, depth: usize) -> Result<Expr, EvalError> {
    if args.len() != func.params.len() {
        return Err(EvalError::Arity {
            form: "function",
            expected: func.params.len(),
            got: args.len(),
        });
    }
    let frame = func.closure.open_scope();
    // Duplicate parameter names rebind in order, so the last one wins,
    // same as consecutive defines in one frame
    for (param, arg) in func.params.iter().zip(args) {
        frame.define(param, arg);
    }
    func.body.eval_at(&frame, depth + 1)
}

fn eval_list(elements: &[Expr], env: &Rc<Environment>, depth: usize) -> Result<Expr, EvalError> {
    let (head, operands) = match elements.split_first() {
        Some(split) => split,
        None => {
            return Err(EvalError::InvalidCall(
                "cannot evaluate an empty list".to_string(),
            ))
        }
    };
    // Special forms dispatch on the head's text before the head is ever
    // evaluated; a user binding named define/lambda/class/new changes
    // nothing in head position
    if let Expr::Symbol(name) = head {
        match name.as_str() {
            "define" => return eval_define(operands, env, depth),
            "lambda" => return eval_lambda(operands, env),
            "class" => return eval_class(operands, env, depth),
            "new" => return eval_new(operands, env, depth),
            _ => {}
        }
    }
    match head.eval_at(env, depth + 1)? {
        Expr::Function(func) => {
            let args = eval_operands(operands, env, depth)?;
            apply_at(&func, args, depth)
        }
        Expr::Builtin(builtin) => {
            let args = eval_operands(operands, env, depth)?;
            if args.len() != builtin.arity as usize {
                return Err(EvalError::Arity {
                    form: builtin.name,
                    expected: builtin.arity as usize,
                    got: args.len(),
                });
            }
            (builtin.call)(&args)
        }
        Expr::Instance(instance) => eval_method_call(&instance, operands, env, depth),
        other => Err(EvalError::InvalidCall(format!("{} is not callable", other))),
    }
}

/// `(define <symbol> <expr>)`: evaluate, bind in the local frame, return
/// the bound value.
fn eval_define(operands: &[Expr], env: &Rc<Environment>, depth: usize) -> Result<Expr, EvalError> {
    match operands {
        [Expr::Symbol(name), value] => {
            let value = value.eval_at(env, depth + 1)?;
            env.define(name, value.clone());
            Ok(value)
        }
        [_, _] => Err(EvalError::Type(
            "define requires a symbol to bind".to_string(),
        )),
        _ => Err(EvalError::Arity {
            form: "define",
            expected: 2,
            got: operands.len(),
        }),
    }
}

/// `(lambda (<param>*) <body>)`: capture the current frame by shared
/// reference; the single body expression is kept unevaluated.
fn eval_lambda(operands: &[Expr], env: &Rc<Environment>) -> Result<Expr, EvalError> {
    match operands {
        [Expr::List(params), body] => {
            let mut names = Vec::with_capacity(params.len());
            for param in params.iter() {
                match param {
                    Expr::Symbol(name) => names.push(name.clone()),
                    _ => {
                        return Err(EvalError::Type(
                            "lambda parameters must be symbols".to_string(),
                        ))
                    }
                }
            }
            Ok(Expr::Function(Rc::new(Function {
                params: names,
                body: body.clone(),
                closure: env.clone(),
            })))
        }
        [_, _] => Err(EvalError::Type(
            "lambda requires a parameter list".to_string(),
        )),
        _ => Err(EvalError::Arity {
            form: "lambda",
            expected: 2,
            got: operands.len(),
        }),
    }
}

/// `(class <name> <body> ...)`: name/body pairs. Bodies run now, in the
/// defining scope; a slot holds whatever its body produced, which acts as
/// a method only when the body was a lambda.
fn eval_class(operands: &[Expr], env: &Rc<Environment>, depth: usize) -> Result<Expr, EvalError> {
    if operands.is_empty() {
        return Err(EvalError::Arity {
            form: "class",
            expected: 2,
            got: 0,
        });
    }
    if operands.len() % 2 != 0 {
        return Err(EvalError::Type(
            "class requires name and body pairs".to_string(),
        ));
    }
    let mut methods = HashMap::new();
    for pair in operands.chunks(2) {
        let name = match &pair[0] {
            Expr::Symbol(name) => name.clone(),
            _ => {
                return Err(EvalError::Type(
                    "class method names must be symbols".to_string(),
                ))
            }
        };
        let body = pair[1].eval_at(env, depth + 1)?;
        methods.insert(name, body);
    }
    Ok(Expr::Class(Rc::new(Class::new(methods))))
}

/// `(new <class-expr>)`: a fresh instance with an empty attribute map.
fn eval_new(operands: &[Expr], env: &Rc<Environment>, depth: usize) -> Result<Expr, EvalError> {
    match operands {
        [class_expr] => match class_expr.eval_at(env, depth + 1)? {
            Expr::Class(class) => Ok(Expr::Instance(Instance::new(class))),
            other => Err(EvalError::Type(format!("new requires a class, got {}", other))),
        },
        _ => Err(EvalError::Arity {
            form: "new",
            expected: 1,
            got: operands.len(),
        }),
    }
}

/// `(<instance> <method-name> <arg>*)`: the name slot is read as written,
/// never evaluated; the instance rides along as the implicit first
/// argument.
fn eval_method_call(
    instance: &Instance,
    operands: &[Expr],
    env: &Rc<Environment>,
    depth: usize,
) -> Result<Expr, EvalError> {
    let (name_slot, rest) = match operands.split_first() {
        Some(split) => split,
        None => {
            return Err(EvalError::InvalidCall(
                "method call without a method name".to_string(),
            ))
        }
    };
    let name = match name_slot {
        Expr::Symbol(name) => name,
        _ => return Err(EvalError::Type("method name must be a symbol".to_string())),
    };
    let method = match instance.resolve(name) {
        Some(method) => method,
        None => return Err(EvalError::UndefinedMethod(name.clone())),
    };
    let func = match method {
        Expr::Function(func) => func,
        _ => {
            return Err(EvalError::InvalidCall(format!(
                "method {} is not a function",
                name
            )))
        }
    };
    let mut args = Vec::with_capacity(rest.len() + 1);
    args.push(Expr::Instance(instance.clone()));
    for operand in rest {
        args.push(operand.eval_at(env, depth + 1)?);
    }
    apply_at(&func, args, depth)
}

fn eval_operands(
    operands: &[Expr],
    env: &Rc<Environment>,
    depth: usize,
) -> Result<Vec<Expr>, EvalError> {
    operands
        .iter()
        .map(|operand| operand.eval_at(env, depth + 1))
        .collect()
}
