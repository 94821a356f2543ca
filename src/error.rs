//! # Error reporting for the solver
//!
//! A single enum covering every way a public operation can fail. The first
//! seven variants are user-facing: the solver state after such a failure is
//! indistinguishable from its state before the failing call. The last two
//! signal a broken internal invariant and need not be recoverable.
use std::error;
use std::fmt;

/// Everything that can go wrong while building expressions or solving.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Error {
    /// The constraint being added is already in the solver.
    DuplicateConstraint,
    /// The constraint being removed or modified is not in the solver.
    ConstraintNotFound,
    /// The variable is already registered as an edit variable.
    DuplicateEditVariable,
    /// A value was suggested for a variable that was never registered as an
    /// edit variable, or such a variable was removed.
    UnknownEditVariable,
    /// An edit variable or a strength change was given the `required`
    /// strength, which is reserved for hard constraints.
    BadRequiredStrength,
    /// A strength weight factor lies outside its legal range.
    BadWeight,
    /// The operation would produce a nonlinear expression, such as the
    /// product of two non-constant expressions.
    Nonlinear,
    /// No assignment of values satisfies all required constraints.
    RequiredFailure,
    /// A symbol that should have been basic has no defining row.
    RowNotFound,
    /// An internal invariant was violated; the solver state may be corrupt.
    Internal(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DuplicateConstraint => {
                write!(f, "the constraint has already been added")
            }
            Error::ConstraintNotFound => {
                write!(f, "tried to modify a constraint that was never added")
            }
            Error::DuplicateEditVariable => {
                write!(f, "the edit variable has already been added")
            }
            Error::UnknownEditVariable => {
                write!(f, "the variable is not registered for editing")
            }
            Error::BadRequiredStrength => {
                write!(f, "the required strength is not allowed here")
            }
            Error::BadWeight => {
                write!(f, "the strength weight factor is out of range")
            }
            Error::Nonlinear => {
                write!(f, "the resulting expression would be nonlinear")
            }
            Error::RequiredFailure => {
                write!(f, "a required constraint cannot be satisfied")
            }
            Error::RowNotFound => write!(f, "row does not exist"),
            Error::Internal(msg) => write!(f, "internal solver error: {msg}"),
        }
    }
}

impl error::Error for Error {}
