mod builtin;
mod env;
mod eval;

pub use builtin::populate_builtins;
pub use env::Environment;
pub use eval::{EvalError, MAX_EVAL_DEPTH};

use std::rc::Rc;

/// A fresh global frame with the native builtins installed. Hosts that
/// want a completely bare frame use `Environment::new_global` directly.
pub fn global_env() -> Rc<Environment> {
    let env = Environment::new_global();
    populate_builtins(&env);
    env
}
