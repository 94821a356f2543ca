//! # Solving algorithms
//!
//! The incremental simplex engine and the helpers layered on top of it. The
//! engine in [`simplex`] owns the tableau; [`stays`] is an optional client
//! of the public interface that keeps otherwise-unconstrained variables
//! anchored at their current values.
pub mod simplex;
pub mod stays;
