use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

use crate::interpreter::{Environment, EvalError};

/// Every piece of script code and every runtime value is one of these
/// variants. The parser produces only Number, Symbol, and List; the other
/// variants are created at runtime by the `lambda`, `class`, and `new`
/// forms, except Builtin values which the host installs directly.
///
/// Rendering goes through `Display`; evaluation lives in the interpreter
/// module.
#[derive(Clone)]
pub enum Expr {
    Number(f64),
    Symbol(String),
    List(Rc<Vec<Expr>>),
    Function(Rc<Function>),
    Builtin(Builtin),
    Class(Rc<Class>),
    Instance(Instance),
}

impl Expr {
    pub fn symbol(name: &str) -> Expr {
        Expr::Symbol(name.to_string())
    }

    pub fn list(elements: Vec<Expr>) -> Expr {
        Expr::List(Rc::new(elements))
    }
}

/// A closure: parameter names, one body expression, and the frame that was
/// current when the `lambda` form ran. The closure shares ownership of that
/// frame, keeping it alive past the call that created it.
pub struct Function {
    pub params: Vec<String>,
    pub body: Expr,
    pub closure: Rc<Environment>,
}

/// A native function installed in the global environment by the host.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: u8,
    pub call: fn(&[Expr]) -> Result<Expr, EvalError>,
}

/// A method table, populated once when the `class` form is evaluated and
/// never reassigned afterwards.
pub struct Class {
    methods: HashMap<String, Expr>,
}

impl Class {
    pub fn new(methods: HashMap<String, Expr>) -> Class {
        Class { methods }
    }

    pub fn method(&self, name: &str) -> Option<&Expr> {
        self.methods.get(name)
    }
}

/// An object: a shared attribute map plus a reference to its class.
/// Cloning an Instance clones the handles, so every copy sees the same
/// attributes and compares equal to the original.
#[derive(Clone)]
pub struct Instance {
    class: Rc<Class>,
    attrs: Rc<RefCell<HashMap<String, Expr>>>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Instance {
        Instance {
            class,
            attrs: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    /// Writes this instance's own attribute map. An attribute shadows a
    /// class method of the same name during resolution.
    pub fn set_attr(&self, name: &str, value: Expr) {
        self.attrs.borrow_mut().insert(name.to_string(), value);
    }

    /// Own attributes first, then the class method table.
    pub fn resolve(&self, name: &str) -> Option<Expr> {
        if let Some(value) = self.attrs.borrow().get(name) {
            return Some(value.clone());
        }
        self.class.method(name).cloned()
    }
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "{}", n),
            Expr::Symbol(name) => f.write_str(name),
            Expr::List(elements) => {
                f.write_str("(")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}", element)?;
                }
                f.write_str(")")
            }
            Expr::Function(_) => f.write_str("<function>"),
            Expr::Builtin(builtin) => write!(f, "<builtin {}>", builtin.name),
            Expr::Class(_) => f.write_str("<class>"),
            Expr::Instance(_) => f.write_str("<instance>"),
        }
    }
}

// Debug stays shallow for the shared variants: a closure's frame can hold
// the closure itself, so walking environments here would never terminate.
impl Debug for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Number(n) => write!(f, "Number({})", n),
            Expr::Symbol(name) => write!(f, "Symbol({})", name),
            Expr::List(elements) => f.debug_list().entries(elements.iter()).finish(),
            Expr::Function(func) => {
                write!(f, "Function(params={:?}, body={:?})", func.params, func.body)
            }
            Expr::Builtin(builtin) => write!(f, "Builtin({})", builtin.name),
            Expr::Class(class) => {
                let mut names: Vec<&str> = class.methods.keys().map(String::as_str).collect();
                names.sort_unstable();
                write!(f, "Class(methods={:?})", names)
            }
            Expr::Instance(instance) => {
                let attrs = instance.attrs.borrow();
                let mut names: Vec<&str> = attrs.keys().map(String::as_str).collect();
                names.sort_unstable();
                write!(f, "Instance(attrs={:?})", names)
            }
        }
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Expr::Number(left), Expr::Number(right)) => left == right,
            (Expr::Symbol(left), Expr::Symbol(right)) => left == right,
            (Expr::List(left), Expr::List(right)) => left == right,
            // Shared values compare by identity, not structure
            (Expr::Function(left), Expr::Function(right)) => Rc::ptr_eq(left, right),
            (Expr::Class(left), Expr::Class(right)) => Rc::ptr_eq(left, right),
            (Expr::Instance(left), Expr::Instance(right)) => {
                Rc::ptr_eq(&left.attrs, &right.attrs)
            }
            (Expr::Builtin(left), Expr::Builtin(right)) => left.name == right.name,
            _ => false,
        }
    }
}
