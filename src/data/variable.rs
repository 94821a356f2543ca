//! # External variables
//!
//! A `Variable` is a cheap handle to a shared value cell; cloning it yields
//! another reference to the *same* variable, not a copy. Equality and
//! hashing go by identity of the shared allocation, never by value:
//!
//! ```
//! use moa::Variable;
//!
//! let x = Variable::with_value(2.0);
//! let y = x.clone();
//! let z = Variable::with_value(2.0);
//!
//! assert_eq!(x, y); // y was cloned from x
//! assert_ne!(x, z); // same value, different variable
//!
//! y.set_value(4.0);
//! assert_eq!(x.value(), 4.0);
//! ```
//!
//! The solver writes computed values back through the handle, so results can
//! be read from the variable directly after solving. Note that handles are
//! single-threaded by construction; a solver and its variables stay on one
//! thread.
use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// A user-visible quantity constrained by the solver.
#[derive(Clone)]
pub struct Variable {
    data: Rc<VariableData>,
}

struct VariableData {
    name: Option<String>,
    value: Cell<f64>,
}

impl Variable {
    /// A fresh anonymous variable with value zero.
    pub fn new() -> Self {
        Self::with_value(0.0)
    }

    /// A fresh anonymous variable with the given initial value.
    pub fn with_value(value: f64) -> Self {
        Variable {
            data: Rc::new(VariableData {
                name: None,
                value: Cell::new(value),
            }),
        }
    }

    /// A fresh named variable. The name is only used for display purposes;
    /// identity is by allocation, so two variables may share a name.
    pub fn named(name: impl Into<String>, value: f64) -> Self {
        Variable {
            data: Rc::new(VariableData {
                name: Some(name.into()),
                value: Cell::new(value),
            }),
        }
    }

    /// The current value.
    pub fn value(&self) -> f64 {
        self.data.value.get()
    }

    /// Overwrite the current value. Does not notify any solver; to drive a
    /// solver toward a value, use an edit variable and `suggest` instead.
    pub fn set_value(&self, value: f64) {
        self.data.value.set(value);
    }

    /// The display name, if one was given at construction.
    pub fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }
}

impl Default for Variable {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.data) as usize).hash(state);
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Variable")
            .field("name", &self.name().unwrap_or("?"))
            .field("value", &self.value())
            .finish()
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name().unwrap_or("?"))
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::Variable;

    #[test]
    fn clones_share_identity_and_value() {
        let x = Variable::with_value(3.0);
        let y = x.clone();
        let z = Variable::with_value(3.0);

        assert_eq!(x, y);
        assert_ne!(x, z);
        assert_eq!(x.value(), 3.0);

        y.set_value(4.0);
        assert_eq!(x.value(), 4.0);
        assert_eq!(z.value(), 3.0);
    }

    #[test]
    fn hashing_follows_identity() {
        let x = Variable::new();
        let y = x.clone();

        let mut set = HashSet::new();
        set.insert(x);
        assert!(set.contains(&y));
        set.remove(&y);
        assert!(set.is_empty());
    }

    #[test]
    fn display_uses_the_name() {
        assert_eq!(Variable::named("width", 0.0).to_string(), "width");
        assert_eq!(Variable::new().to_string(), "?");
    }
}
