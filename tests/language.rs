use std::rc::Rc;

use pretty_assertions::assert_eq;

use deckscript::{
    eval_source, global_env, run_source, Environment, Error, EvalError, Expr, ParseError,
};

fn run(source: &str, env: &Rc<Environment>) -> String {
    run_source(source, env).unwrap()
}

#[test]
fn arithmetic_composes() {
    let env = global_env();
    assert_eq!(run("(+ (* 3 4) (/ 10 4))", &env), "14.5");
}

#[test]
fn definitions_persist_across_sources() {
    let env = global_env();
    run("(define x 5)", &env);
    assert_eq!(run("x", &env), "5");
}

#[test]
fn multi_form_source_returns_the_last_value() {
    let env = global_env();
    assert_eq!(run("(define a 1) (define b 2) (+ a b)", &env), "3");
}

#[test]
fn number_rendering_round_trips() {
    let env = global_env();
    for token in ["0", "5", "-3.25", "1e3", "0.5"] {
        let once = run(token, &env);
        let twice = run(&once, &env);
        assert_eq!(once, twice, "token {}", token);
    }
}

#[test]
fn adder_factory_keeps_private_state() {
    let env = global_env();
    run("(define make-adder (lambda (n) (lambda (m) (+ n m))))", &env);
    run("(define add2 (make-adder 2))", &env);
    run("(define add10 (make-adder 10))", &env);
    assert_eq!(run("(add2 40)", &env), "42");
    assert_eq!(run("(add10 32)", &env), "42");
    // n lives only in each closure's captured frame
    assert_eq!(
        run_source("n", &env),
        Err(Error::Eval(EvalError::UndefinedSymbol("n".to_string())))
    );
}

#[test]
fn defines_inside_calls_do_not_leak() {
    let env = global_env();
    run("(define leak (lambda (x) (define y x)))", &env);
    assert_eq!(run("(leak 1)", &env), "1");
    assert_eq!(
        run_source("y", &env),
        Err(Error::Eval(EvalError::UndefinedSymbol("y".to_string())))
    );
}

#[test]
fn wrong_operand_counts_are_arity_errors() {
    let env = global_env();
    assert!(matches!(
        run_source("(define x)", &env),
        Err(Error::Eval(EvalError::Arity { .. }))
    ));
    run("(define pair (lambda (a b) (+ a b)))", &env);
    assert!(matches!(
        run_source("(pair 1)", &env),
        Err(Error::Eval(EvalError::Arity { .. }))
    ));
    assert!(matches!(
        run_source("(pair 1 2 3)", &env),
        Err(Error::Eval(EvalError::Arity { .. }))
    ));
}

#[test]
fn parse_errors_are_classified() {
    let env = global_env();
    assert_eq!(
        run_source("(", &env),
        Err(Error::Parse(ParseError::UnexpectedEof))
    );
    assert_eq!(
        run_source(")", &env),
        Err(Error::Parse(ParseError::UnexpectedClose))
    );
}

#[test]
fn classes_and_instances_end_to_end() {
    let env = global_env();
    run("(define greeter (class greet (lambda (self) 42)))", &env);
    run("(define g (new greeter))", &env);
    assert_eq!(run("(g greet)", &env), "42");
    assert_eq!(run("greeter", &env), "<class>");
    assert_eq!(run("g", &env), "<instance>");
}

#[test]
fn methods_mix_arguments_and_globals() {
    let env = global_env();
    run("(define scale 10)", &env);
    run(
        "(define widget (class stretch (lambda (self n) (* n scale))))",
        &env,
    );
    run("(define w (new widget))", &env);
    assert_eq!(run("(w stretch 4)", &env), "40");
}

#[test]
fn attributes_shadow_class_methods() {
    let env = global_env();
    run("(define greeter (class greet (lambda (self) 42)))", &env);
    let instance = match eval_source("(define g (new greeter))", &env).unwrap() {
        Expr::Instance(instance) => instance,
        other => panic!("expected an instance, got {:?}", other),
    };
    let replacement = eval_source("(lambda (self) 7)", &env).unwrap();
    instance.set_attr("greet", replacement);
    assert_eq!(run("(g greet)", &env), "7");
}

#[test]
fn string_literals_name_symbols_with_spaces() {
    let env = global_env();
    // The quirk cuts both ways: a string literal can sit anywhere a
    // symbol can, including the name slot of define
    run("(define \"the answer\" 42)", &env);
    assert_eq!(run("\"the answer\"", &env), "42");
}

#[test]
fn runaway_recursion_is_a_classified_error() {
    let env = global_env();
    run("(define loop (lambda (n) (loop n)))", &env);
    assert!(matches!(
        run_source("(loop 0)", &env),
        Err(Error::Eval(EvalError::RecursionLimit(_)))
    ));
}
