//! Lexical environments: scope stacks of call-by-need thunks.
//!
//! A variable binding is not a value but a [`Thunk`]: an expression paired
//! with a memoization cell. The first read forces it; every later read (and
//! every closure that captured the same binding) observes the same forced
//! value, because the cell is shared through the `Rc`, not copied.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use log::warn;

use crate::ast::{Expr, Spanned};

/// The state of a single variable binding.
#[derive(Debug, Clone)]
pub enum Thunk {
    /// `var x;` with no assignment yet: reading it is a fault, not a value.
    Uninitialized,
    /// An expression that has not been forced yet, captured together with
    /// the scope stack it must be evaluated in (its defining environment).
    Unevaluated(Spanned<Expr>, ScopeStack),
    /// A forced value, memoized in place of the expression that produced it.
    Evaluated(crate::value::Value),
}

pub type ThunkRef = Rc<RefCell<Thunk>>;

pub fn uninitialized() -> ThunkRef {
    Rc::new(RefCell::new(Thunk::Uninitialized))
}

pub fn unevaluated(expr: Spanned<Expr>, captured: ScopeStack) -> ThunkRef {
    Rc::new(RefCell::new(Thunk::Unevaluated(expr, captured)))
}

pub fn evaluated(value: crate::value::Value) -> ThunkRef {
    Rc::new(RefCell::new(Thunk::Evaluated(value)))
}

/// One block's worth of bindings.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    bindings: HashMap<String, ThunkRef>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: impl Into<String>, thunk: ThunkRef) {
        self.bindings.insert(name.into(), thunk);
    }

    pub fn get(&self, name: &str) -> Option<&ThunkRef> {
        self.bindings.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }
}

/// A call frame's visible environment: innermost block first.
///
/// Cloning a `ScopeStack` (done whenever a closure captures its defining
/// environment) allocates a fresh `Vec` of fresh `HashMap`s, but every
/// `ThunkRef` inside is an `Rc` clone — new maps, shared cells. A later
/// assignment through one copy of the stack is visible through every other
/// copy that still holds the same thunk.
#[derive(Debug, Clone, Default)]
pub struct ScopeStack {
    frames: Vec<Scope>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self { frames: vec![Scope::new()] }
    }

    /// Push a new, empty innermost block (`{ ... }`, loop body, catch body).
    pub fn push(&mut self) {
        self.frames.push(Scope::new());
    }

    /// Pop the innermost block. Popping the outermost (function) frame is
    /// not fatal — it just leaves the stack as-is and logs a warning,
    /// mirroring a push/pop bookkeeping bug rather than crashing on it.
    pub fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        } else {
            warn!("trying to pop outermost scope");
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Declare `name` as a fresh binding in the innermost block, shadowing
    /// any outer binding of the same name.
    pub fn define(&mut self, name: impl Into<String>, thunk: ThunkRef) {
        self.frames
            .last_mut()
            .expect("scope stack is never empty")
            .define(name, thunk);
    }

    /// Look up `name`, searching from the innermost block outward.
    pub fn lookup(&self, name: &str) -> Option<ThunkRef> {
        self.frames
            .iter()
            .rev()
            .find_map(|scope| scope.get(name).cloned())
    }

    /// Whether `name` is already bound in the innermost block (used to
    /// reject redeclaration of the same `var` within one block).
    pub fn defined_in_innermost(&self, name: &str) -> bool {
        self.frames
            .last()
            .map(|scope| scope.contains(name))
            .unwrap_or(false)
    }

    /// Rebind `name` to a new thunk in whichever block already declared it
    /// (searching innermost outward), without disturbing any other copy of
    /// this stack that still references the old `ThunkRef` — that sharing
    /// is exactly what lets a captured argument or closure stay memoized
    /// against its value as of capture time, even after the source
    /// variable is reassigned.
    ///
    /// Returns `false` if `name` was never declared with `var`.
    pub fn assign(&mut self, name: &str, thunk: ThunkRef) -> bool {
        for scope in self.frames.iter_mut().rev() {
            if scope.contains(name) {
                scope.define(name, thunk);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::value::Value;

    #[test]
    fn lookup_walks_outward_through_blocks() {
        let mut stack = ScopeStack::new();
        stack.define("x", evaluated(Value::Int(1)));
        stack.push();
        stack.define("y", evaluated(Value::Int(2)));
        assert_eq!(
            stack.lookup("x").unwrap().borrow().clone_value(),
            Value::Int(1)
        );
        assert!(stack.lookup("y").is_some());
        stack.pop();
        assert!(stack.lookup("y").is_none());
    }

    #[test]
    fn cloning_stack_shares_thunk_cells() {
        let mut stack = ScopeStack::new();
        let cell = evaluated(Value::Int(1));
        stack.define("x", cell.clone());
        let captured = stack.clone();
        // Mutate the shared cell through the original binding...
        *cell.borrow_mut() = Thunk::Evaluated(Value::Int(99));
        // ...and the captured copy observes it, because the ThunkRef (not
        // the value) was cloned.
        assert_eq!(
            captured.lookup("x").unwrap().borrow().clone_value(),
            Value::Int(99)
        );
    }

    #[test]
    fn redeclaration_only_checked_in_innermost_block() {
        let mut stack = ScopeStack::new();
        stack.define("x", evaluated(Value::Int(1)));
        stack.push();
        assert!(!stack.defined_in_innermost("x"));
        stack.define("x", evaluated(Value::Int(2)));
        assert!(stack.defined_in_innermost("x"));
    }

    impl Thunk {
        fn clone_value(&self) -> Value {
            match self {
                Thunk::Evaluated(v) => v.clone(),
                _ => panic!("thunk not evaluated"),
            }
        }
    }
}
