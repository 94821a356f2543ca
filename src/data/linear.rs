//! # Expressions over external variables
//!
//! [`LinearExpression`] instantiates the generic [`Expression`] with
//! [`Variable`] keys and adds what only makes sense there: evaluation
//! against the variables' current values, and the operator sugar that lets
//! expressions be written naturally:
//!
//! ```
//! use moa::Variable;
//!
//! let x = Variable::with_value(3.0);
//! let y = Variable::with_value(5.0);
//! let expr = 5.0 * &x + &y + 2.0;
//! assert_eq!(expr.evaluate(), 22.0);
//! ```
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use itertools::Itertools;

use crate::data::expression::Expression;
use crate::data::variable::Variable;

/// A linear combination of external variables plus a constant.
pub type LinearExpression = Expression<Variable>;

impl LinearExpression {
    /// The current value of the expression: the constant plus each term's
    /// coefficient times its variable's value.
    pub fn evaluate(&self) -> f64 {
        self.constant()
            + self
                .terms()
                .iter()
                .map(|(variable, coefficient)| variable.value() * coefficient)
                .sum::<f64>()
    }
}

impl From<&Variable> for LinearExpression {
    fn from(variable: &Variable) -> Self {
        Expression::with_term(variable.clone(), 1.0)
    }
}

impl From<Variable> for LinearExpression {
    fn from(variable: Variable) -> Self {
        Expression::with_term(variable, 1.0)
    }
}

impl From<f64> for LinearExpression {
    fn from(constant: f64) -> Self {
        Expression::new(constant)
    }
}

impl fmt::Display for LinearExpression {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let terms = self
            .terms()
            .iter()
            .sorted_by(|(a, _), (b, _)| a.to_string().cmp(&b.to_string()))
            .format_with(" + ", |(variable, coefficient), f| {
                f(&format_args!("{coefficient}*{variable}"))
            });
        if self.is_constant() {
            write!(f, "{}", self.constant())
        } else if self.constant() == 0.0 {
            write!(f, "{terms}")
        } else {
            write!(f, "{terms} + {}", self.constant())
        }
    }
}

// Arithmetic on variables. Each operation hands off to the expression type;
// `&x + 3.0` and `x + 3.0` both work, the latter consuming the handle.

impl Add<f64> for &Variable {
    type Output = LinearExpression;

    fn add(self, constant: f64) -> LinearExpression {
        LinearExpression::from(self) + constant
    }
}

impl Add<f64> for Variable {
    type Output = LinearExpression;

    fn add(self, constant: f64) -> LinearExpression {
        LinearExpression::from(self) + constant
    }
}

impl Sub<f64> for &Variable {
    type Output = LinearExpression;

    fn sub(self, constant: f64) -> LinearExpression {
        LinearExpression::from(self) - constant
    }
}

impl Sub<f64> for Variable {
    type Output = LinearExpression;

    fn sub(self, constant: f64) -> LinearExpression {
        LinearExpression::from(self) - constant
    }
}

impl Add<&Variable> for &Variable {
    type Output = LinearExpression;

    fn add(self, other: &Variable) -> LinearExpression {
        LinearExpression::from(self) + &LinearExpression::from(other)
    }
}

impl Sub<&Variable> for &Variable {
    type Output = LinearExpression;

    fn sub(self, other: &Variable) -> LinearExpression {
        LinearExpression::from(self) - &LinearExpression::from(other)
    }
}

impl Mul<f64> for &Variable {
    type Output = LinearExpression;

    fn mul(self, factor: f64) -> LinearExpression {
        Expression::with_term(self.clone(), factor)
    }
}

impl Mul<f64> for Variable {
    type Output = LinearExpression;

    fn mul(self, factor: f64) -> LinearExpression {
        Expression::with_term(self, factor)
    }
}

impl Mul<&Variable> for f64 {
    type Output = LinearExpression;

    fn mul(self, variable: &Variable) -> LinearExpression {
        Expression::with_term(variable.clone(), self)
    }
}

impl Mul<Variable> for f64 {
    type Output = LinearExpression;

    fn mul(self, variable: Variable) -> LinearExpression {
        Expression::with_term(variable, self)
    }
}

impl Div<f64> for &Variable {
    type Output = LinearExpression;

    fn div(self, divisor: f64) -> LinearExpression {
        Expression::with_term(self.clone(), 1.0 / divisor)
    }
}

impl Neg for &Variable {
    type Output = LinearExpression;

    fn neg(self) -> LinearExpression {
        Expression::with_term(self.clone(), -1.0)
    }
}

impl Add<&Variable> for LinearExpression {
    type Output = LinearExpression;

    fn add(mut self, variable: &Variable) -> LinearExpression {
        self.add_term(variable.clone(), 1.0);
        self
    }
}

impl Sub<&Variable> for LinearExpression {
    type Output = LinearExpression;

    fn sub(mut self, variable: &Variable) -> LinearExpression {
        self.add_term(variable.clone(), -1.0);
        self
    }
}

impl Add<LinearExpression> for &Variable {
    type Output = LinearExpression;

    fn add(self, expression: LinearExpression) -> LinearExpression {
        expression + self
    }
}

impl Sub<LinearExpression> for &Variable {
    type Output = LinearExpression;

    fn sub(self, expression: LinearExpression) -> LinearExpression {
        -expression + self
    }
}

impl Add<LinearExpression> for f64 {
    type Output = LinearExpression;

    fn add(self, expression: LinearExpression) -> LinearExpression {
        expression + self
    }
}

impl Sub<LinearExpression> for f64 {
    type Output = LinearExpression;

    fn sub(self, expression: LinearExpression) -> LinearExpression {
        -expression + self
    }
}

impl Mul<LinearExpression> for f64 {
    type Output = LinearExpression;

    fn mul(self, expression: LinearExpression) -> LinearExpression {
        expression * self
    }
}

#[cfg(test)]
mod test {
    use super::LinearExpression;
    use crate::data::variable::Variable;

    #[test]
    fn evaluate_uses_current_values() {
        let x = Variable::with_value(3.0);
        let y = Variable::with_value(2.0);

        let expr = 2.0 * &x + 5.0 * &y + 1.0;
        assert_eq!(expr.evaluate(), 17.0);

        y.set_value(1.0);
        assert_eq!(expr.evaluate(), 12.0);
        x.set_value(10.0);
        assert_eq!(expr.evaluate(), 26.0);

        assert_eq!((-expr).evaluate(), -26.0);
    }

    #[test]
    fn operators_build_the_expected_terms() {
        let x = Variable::named("x", 0.0);
        let y = Variable::named("y", 0.0);

        let expr = &x + 4.0 - (&y - 2.0) / 1.0;
        let expr = expr - &y + 0.0 * &x;
        assert_eq!(expr.coefficient(&x), 1.0);
        assert_eq!(expr.coefficient(&y), -2.0);
        assert_eq!(expr.constant(), 6.0);
    }

    #[test]
    fn constant_expressions() {
        let five = LinearExpression::from(5.0);
        assert_eq!(five.evaluate(), 5.0);
        assert_eq!((five * -1.0).evaluate(), -5.0);
    }

    #[test]
    fn display_is_sorted_by_name() {
        let a = Variable::named("a", 0.0);
        let b = Variable::named("b", 0.0);
        let expr = 2.0 * &b + 1.0 * &a + 3.0;
        assert_eq!(expr.to_string(), "1*a + 2*b + 3");
    }
}
