//! # Stay constraints
//!
//! A stay keeps an otherwise-unconstrained variable at its current value:
//! a weak preference `v == value` that is re-anchored whenever the variable
//! actually moves. Without stays, underconstrained variables drift to zero
//! as edits push the solution around.
//!
//! This is a plain client of the solver's public interface, not part of the
//! engine; the engine itself knows nothing about stays.
use std::collections::HashMap;

use crate::algorithm::simplex::SimplexSolver;
use crate::data::constraint::Constraint;
use crate::data::strength::Strength;
use crate::data::variable::Variable;
use crate::error::Error;

struct StayItem {
    constraint: Constraint,
    value: f64,
}

/// Keeps edit variables anchored at their last solved value.
#[derive(Default)]
pub struct Stays {
    stays: HashMap<Variable, StayItem>,
}

impl Stays {
    pub fn new() -> Self {
        Stays {
            stays: HashMap::new(),
        }
    }

    /// Anchor `variable` at its current value with a weak preference.
    /// Adding a variable twice is a no-op.
    pub fn add(&mut self, solver: &mut SimplexSolver, variable: &Variable) -> Result<(), Error> {
        if self.stays.contains_key(variable) {
            return Ok(());
        }
        let value = variable.value();
        let constraint = variable.equals(value) | Strength::weak();
        solver.add_constraint(&constraint)?;
        self.stays
            .insert(variable.clone(), StayItem { constraint, value });
        Ok(())
    }

    /// Drop the anchor for `variable`, if there is one.
    pub fn remove(&mut self, solver: &mut SimplexSolver, variable: &Variable) -> Result<(), Error> {
        if let Some(item) = self.stays.remove(variable) {
            solver.remove_constraint(&item.constraint)?;
        }
        Ok(())
    }

    /// Re-anchor every stayed variable that has moved since its anchor was
    /// placed. Call this after suggesting new values.
    pub fn update(&mut self, solver: &mut SimplexSolver) -> Result<(), Error> {
        // Collect first: re-anchoring mutates the solver, which refreshes
        // the variables being examined.
        let moved: Vec<Variable> = self
            .stays
            .iter()
            .filter(|(variable, item)| variable.value() != item.value)
            .map(|(variable, _)| variable.clone())
            .collect();

        for variable in moved {
            let value = variable.value();
            let constraint = variable.equals(value) | Strength::weak();
            let item = self
                .stays
                .get_mut(&variable)
                .ok_or(Error::Internal("stay disappeared while updating"))?;
            solver.remove_constraint(&item.constraint)?;
            solver.add_constraint(&constraint)?;
            item.constraint = constraint;
            item.value = value;
        }
        Ok(())
    }
}
