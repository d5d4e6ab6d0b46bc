use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::expr::Expr;

/// One scope frame: local bindings plus a link to the enclosing frame.
///
/// Frames are handed out as `Rc<Environment>` because closures keep their
/// defining frame alive past the call that created it; interior mutability
/// lets `define` write through the shared handle. Parent links only point
/// outward, so lookup walks a chain toward the global frame and never back
/// down.
pub struct Environment {
    bindings: RefCell<HashMap<String, Expr>>,
    parent: Option<Rc<Environment>>,
}

impl Environment {
    pub fn new_global() -> Rc<Environment> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: None,
        })
    }

    /// A fresh child frame; one is opened per function application.
    pub fn open_scope(self: &Rc<Self>) -> Rc<Environment> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            parent: Some(self.clone()),
        })
    }

    /// Binds in this frame only, overwriting any previous local binding.
    /// Ancestor frames are never written, so a `define` inside a call
    /// cannot leak into the caller's scope.
    pub fn define(&self, name: &str, value: Expr) {
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }

    /// Walks the frame chain to the root.
    pub fn lookup(&self, name: &str) -> Option<Expr> {
        if let Some(value) = self.bindings.borrow().get(name) {
            return Some(value.clone());
        }
        self.parent.as_ref().and_then(|parent| parent.lookup(name))
    }
}
