//! # Constraints
//!
//! A constraint is a linear equation or inequality over external variables,
//! together with a strength. The expression is kept in canonical form: the
//! stored expression `E` is understood as `E == 0`, `E <= 0` or `E >= 0`.
//!
//! Constraints are handles with identity semantics, like
//! [`Variable`](crate::Variable): cloning shares the underlying data, and
//! two structurally identical constraints built separately are distinct.
//! This is what lets a constraint be removed from a solver later — the
//! handle itself is the key.
use std::cell::Cell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::BitOr;
use std::rc::Rc;

use crate::data::linear::LinearExpression;
use crate::data::precision::{near_zero, EPSILON};
use crate::data::strength::Strength;
use crate::data::variable::Variable;

/// The relation between the two sides of a constraint.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Relation {
    /// Equal to.
    Equal,
    /// Less than or equal to. Strict inequalities cannot be expressed.
    LessOrEqual,
    /// Greater than or equal to.
    GreaterOrEqual,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Relation::Equal => write!(f, "=="),
            Relation::LessOrEqual => write!(f, "<="),
            Relation::GreaterOrEqual => write!(f, ">="),
        }
    }
}

struct ConstraintData {
    expression: LinearExpression,
    op: Relation,
    strength: Cell<Strength>,
}

/// A linear equation or inequality with a strength.
#[derive(Clone)]
pub struct Constraint {
    data: Rc<ConstraintData>,
}

impl Constraint {
    /// Wrap an expression as the constraint `expression op 0`.
    pub fn new(
        expression: impl Into<LinearExpression>,
        op: Relation,
        strength: Strength,
    ) -> Self {
        Constraint {
            data: Rc::new(ConstraintData {
                expression: expression.into(),
                op,
                strength: Cell::new(strength),
            }),
        }
    }

    /// The canonical expression `E` of `E op 0`.
    pub fn expression(&self) -> &LinearExpression {
        &self.data.expression
    }

    /// The relation against zero.
    pub fn op(&self) -> Relation {
        self.data.op
    }

    /// The current strength.
    pub fn strength(&self) -> Strength {
        self.data.strength.get()
    }

    // Strength changes go through the solver so the objective stays in sync.
    pub(crate) fn set_strength(&self, strength: Strength) {
        self.data.strength.set(strength);
    }

    /// Whether this constraint must hold exactly.
    pub fn is_required(&self) -> bool {
        self.strength().is_required()
    }

    /// Whether the relation is `<=` or `>=`.
    pub fn is_inequality(&self) -> bool {
        self.data.op != Relation::Equal
    }

    /// Evaluate the constraint against the variables' current values.
    pub fn is_satisfied(&self) -> bool {
        let value = self.data.expression.evaluate();
        match self.data.op {
            Relation::Equal => near_zero(value),
            Relation::LessOrEqual => value <= EPSILON,
            Relation::GreaterOrEqual => value >= -EPSILON,
        }
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.data, &other.data)
    }
}

impl Eq for Constraint {}

impl Hash for Constraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (Rc::as_ptr(&self.data) as usize).hash(state);
    }
}

impl fmt::Debug for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Constraint")
            .field("expression", &format_args!("{}", self.expression()))
            .field("op", &self.op())
            .field("strength", &self.strength())
            .finish()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {} 0 | {}", self.expression(), self.op(), self.strength())
    }
}

/// Re-strength a constraint: `(x.equals(10.0) | Strength::weak())`.
///
/// The result is a *new* constraint sharing nothing with the original, so
/// the two can be added to a solver independently.
impl BitOr<Strength> for Constraint {
    type Output = Constraint;

    fn bitor(self, strength: Strength) -> Constraint {
        Constraint::new(self.data.expression.clone(), self.data.op, strength)
    }
}

impl Variable {
    /// The required constraint `self == rhs`.
    pub fn equals(&self, rhs: impl Into<LinearExpression>) -> Constraint {
        LinearExpression::from(self).equals(rhs)
    }

    /// The required constraint `self <= rhs`.
    pub fn at_most(&self, rhs: impl Into<LinearExpression>) -> Constraint {
        LinearExpression::from(self).at_most(rhs)
    }

    /// The required constraint `self >= rhs`.
    pub fn at_least(&self, rhs: impl Into<LinearExpression>) -> Constraint {
        LinearExpression::from(self).at_least(rhs)
    }
}

impl LinearExpression {
    /// The required constraint `self == rhs`.
    pub fn equals(self, rhs: impl Into<LinearExpression>) -> Constraint {
        Constraint::new(self - &rhs.into(), Relation::Equal, Strength::required())
    }

    /// The required constraint `self <= rhs`.
    pub fn at_most(self, rhs: impl Into<LinearExpression>) -> Constraint {
        Constraint::new(
            self - &rhs.into(),
            Relation::LessOrEqual,
            Strength::required(),
        )
    }

    /// The required constraint `self >= rhs`.
    pub fn at_least(self, rhs: impl Into<LinearExpression>) -> Constraint {
        Constraint::new(
            self - &rhs.into(),
            Relation::GreaterOrEqual,
            Strength::required(),
        )
    }
}

#[cfg(test)]
mod test {
    use super::Relation;
    use crate::data::strength::Strength;
    use crate::data::variable::Variable;

    #[test]
    fn canonical_form_is_lhs_minus_rhs() {
        let x = Variable::with_value(0.0);
        let y = Variable::with_value(0.0);

        let c = (&x + 4.0).at_least(2.0 * &y);
        assert_eq!(c.op(), Relation::GreaterOrEqual);
        assert_eq!(c.expression().coefficient(&x), 1.0);
        assert_eq!(c.expression().coefficient(&y), -2.0);
        assert_eq!(c.expression().constant(), 4.0);
    }

    #[test]
    fn satisfaction_follows_current_values() {
        let x = Variable::with_value(2.0);

        let eq = (&x * 4.0 + 1.0).equals(9.0);
        assert!(eq.is_satisfied());

        let geq = (&x * 4.0 + 1.0).at_least(5.0);
        assert!(geq.is_satisfied());
        x.set_value(0.0);
        assert!(!geq.is_satisfied());
    }

    #[test]
    fn identity_not_structure() {
        let x = Variable::new();
        let a = x.at_most(10.0);
        let b = x.at_most(10.0);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn pipe_builds_a_new_constraint() {
        let x = Variable::new();
        let required = x.equals(100.0);
        assert!(required.is_required());

        let weak = required.clone() | Strength::weak();
        assert!(!weak.is_required());
        assert_eq!(weak.strength(), Strength::weak());
        assert_ne!(required, weak);
        assert!(required.is_required());
    }

    #[test]
    fn inequality_predicate() {
        let x = Variable::new();
        assert!(x.at_most(1.0).is_inequality());
        assert!(x.at_least(1.0).is_inequality());
        assert!(!x.equals(1.0).is_inequality());
    }
}
