//! # An incremental linear constraint solver.
//!
//! Systems of linear equality and inequality constraints over real-valued
//! variables are solved with the Cassowary algorithm, a variant of the
//! Simplex method specialized for incremental use: constraints can be added
//! and removed one at a time, and values can be suggested for designated
//! edit variables, without re-solving the whole system from scratch.
//!
//! Constraints carry a [`Strength`]. Required constraints must hold exactly;
//! weaker constraints are preferences, and the solver minimizes the weighted
//! sum of their violations. A `strong` preference completely dominates any
//! `medium` one, which in turn dominates any `weak` one.
//!
//! ```
//! use moa::{SimplexSolver, Strength, Variable};
//!
//! let x = Variable::named("x", 0.0);
//! let y = Variable::named("y", 0.0);
//!
//! let mut solver = SimplexSolver::new();
//! solver.add_constraint(&x.at_most(&y)).unwrap();
//! solver.add_constraint(&y.equals(&x + 3.0)).unwrap();
//! solver.add_constraint(&(x.equals(10.0) | Strength::weak())).unwrap();
//!
//! assert_eq!(x.value(), 10.0);
//! assert_eq!(y.value(), 13.0);
//! ```

pub mod algorithm;
pub mod data;
pub mod io;

mod error;

pub use crate::algorithm::simplex::SimplexSolver;
pub use crate::algorithm::stays::Stays;
pub use crate::data::constraint::{Constraint, Relation};
pub use crate::data::expression::Expression;
pub use crate::data::linear::LinearExpression;
pub use crate::data::point::Point;
pub use crate::data::strength::Strength;
pub use crate::data::variable::Variable;
pub use crate::error::Error;
