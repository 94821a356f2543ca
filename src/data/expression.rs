//! # Linear expressions
//!
//! Expressions have the form `a0*x0 + a1*x1 + ... + c`, where the `x`s are
//! keys (user variables, or tableau symbols inside the solver), the `a`s are
//! nonzero coefficients, and `c` is a constant. The type is generic over the
//! key so that the same arithmetic serves both the public API and the
//! tableau rows.
//!
//! Terms whose coefficient lands within epsilon of zero are pruned on every
//! update, so the term map never carries dead weight.
use std::collections::HashMap;
use std::hash::Hash;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::data::precision::near_zero;
use crate::error::Error;

/// A linear combination of keys plus a constant.
#[derive(Clone, Debug, Default)]
pub struct Expression<K> {
    constant: f64,
    terms: HashMap<K, f64>,
}

impl<K: Eq + Hash> PartialEq for Expression<K> {
    fn eq(&self, other: &Self) -> bool {
        self.constant == other.constant && self.terms == other.terms
    }
}

impl<K> Expression<K> {
    /// A constant expression without any terms.
    pub fn new(constant: f64) -> Self {
        Expression {
            constant,
            terms: HashMap::new(),
        }
    }

    /// The constant part `c`.
    pub fn constant(&self) -> f64 {
        self.constant
    }

    /// Replace the constant part.
    pub fn set_constant(&mut self, constant: f64) {
        self.constant = constant;
    }

    /// Shift the constant part by `delta` and return the new constant.
    pub fn add_constant(&mut self, delta: f64) -> f64 {
        self.constant += delta;
        self.constant
    }

    /// All terms and their coefficients.
    pub fn terms(&self) -> &HashMap<K, f64> {
        &self.terms
    }

    /// Whether the expression consists of the constant alone.
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }

    /// Whether there are no terms and the constant is zero.
    pub fn is_empty(&self) -> bool {
        self.is_constant() && self.constant == 0.0
    }

    fn scale(&mut self, factor: f64) {
        self.constant *= factor;
        for coefficient in self.terms.values_mut() {
            *coefficient *= factor;
        }
    }
}

impl<K: Eq + Hash + Clone> Expression<K> {
    /// An expression holding a single term.
    pub fn with_term(key: K, coefficient: f64) -> Self {
        let mut expression = Expression::new(0.0);
        expression.add_term(key, coefficient);
        expression
    }

    /// The coefficient of `key`, or zero if `key` does not occur.
    pub fn coefficient(&self, key: &K) -> f64 {
        self.terms.get(key).copied().unwrap_or(0.0)
    }

    /// Add `coefficient * key`, merging with an existing term for `key`.
    /// The term is erased if the resulting coefficient is almost zero.
    pub fn add_term(&mut self, key: K, coefficient: f64) {
        let updated = {
            let entry = self.terms.entry(key.clone()).or_insert(0.0);
            *entry += coefficient;
            *entry
        };
        if near_zero(updated) {
            self.terms.remove(&key);
        }
    }

    /// Remove the term for `key`, if any.
    pub fn erase(&mut self, key: &K) {
        self.terms.remove(key);
    }

    /// Add `factor` times another expression.
    pub fn add_scaled(&mut self, other: &Self, factor: f64) {
        self.constant += factor * other.constant;
        for (key, coefficient) in &other.terms {
            self.add_term(key.clone(), factor * coefficient);
        }
    }

    /// Replace `key` with an equivalent expression.
    ///
    /// If `key` occurs with coefficient `m`, it is removed and `m * expr` is
    /// added instead. Returns whether `key` occurred at all.
    pub fn substitute_out(&mut self, key: &K, expr: &Self) -> bool {
        match self.terms.remove(key) {
            Some(multiplier) => {
                self.add_scaled(expr, multiplier);
                true
            }
            None => false,
        }
    }

    /// Solve the equation `self == 0` for `key`.
    ///
    /// Given `c + m*key + R == 0` the expression is rewritten in place to
    /// `-c/m - R/m`, the right-hand side of `key = ...`. Fails if `key` has
    /// no term.
    pub fn solve_for(&mut self, key: &K) -> Result<(), Error> {
        let coefficient = self
            .terms
            .remove(key)
            .ok_or(Error::Internal("cannot solve for a missing term"))?;
        self.scale(-1.0 / coefficient);
        Ok(())
    }

    /// Solve `lhs == self` for `rhs`.
    ///
    /// The expression currently defines `lhs`; afterwards it defines `rhs`,
    /// with `lhs` moved to the right-hand side. This is the pivot primitive:
    /// `rhs` enters the basis and `lhs` leaves it.
    pub fn solve_for_pair(&mut self, lhs: K, rhs: &K) -> Result<(), Error> {
        self.add_term(lhs, -1.0);
        self.solve_for(rhs)
    }

    /// Re-express `old == self` (where `new` occurs in `self`) as
    /// `new == self'` with `old` on the right-hand side.
    pub fn change_subject(&mut self, old: K, new: &K) -> Result<(), Error> {
        if old == *new {
            return Ok(());
        }
        let coefficient = self
            .terms
            .remove(new)
            .ok_or(Error::Internal("new subject does not occur in expression"))?;
        let reciprocal = 1.0 / coefficient;
        self.scale(-reciprocal);
        self.terms.insert(old, reciprocal);
        Ok(())
    }

    /// Multiply two expressions. Legal only when at least one of them is
    /// constant; anything else would leave the linear domain.
    pub fn try_mul(&self, other: &Self) -> Result<Self, Error> {
        if self.is_constant() {
            Ok(other.clone() * self.constant)
        } else if other.is_constant() {
            Ok(self.clone() * other.constant)
        } else {
            Err(Error::Nonlinear)
        }
    }

    /// Divide by another expression, which must be constant.
    pub fn try_div(&self, other: &Self) -> Result<Self, Error> {
        if other.is_constant() {
            Ok(self.clone() / other.constant)
        } else {
            Err(Error::Nonlinear)
        }
    }
}

impl<K: Eq + Hash + Clone> MulAssign<f64> for Expression<K> {
    fn mul_assign(&mut self, factor: f64) {
        self.scale(factor);
    }
}

impl<K: Eq + Hash + Clone> Mul<f64> for Expression<K> {
    type Output = Expression<K>;

    fn mul(mut self, factor: f64) -> Expression<K> {
        self *= factor;
        self
    }
}

impl<K: Eq + Hash + Clone> DivAssign<f64> for Expression<K> {
    fn div_assign(&mut self, divisor: f64) {
        self.scale(1.0 / divisor);
    }
}

impl<K: Eq + Hash + Clone> Div<f64> for Expression<K> {
    type Output = Expression<K>;

    fn div(mut self, divisor: f64) -> Expression<K> {
        self /= divisor;
        self
    }
}

impl<K: Eq + Hash + Clone> Neg for Expression<K> {
    type Output = Expression<K>;

    fn neg(mut self) -> Expression<K> {
        self.scale(-1.0);
        self
    }
}

impl<K: Eq + Hash + Clone> AddAssign<f64> for Expression<K> {
    fn add_assign(&mut self, constant: f64) {
        self.constant += constant;
    }
}

impl<K: Eq + Hash + Clone> SubAssign<f64> for Expression<K> {
    fn sub_assign(&mut self, constant: f64) {
        self.constant -= constant;
    }
}

impl<K: Eq + Hash + Clone> AddAssign<&Expression<K>> for Expression<K> {
    fn add_assign(&mut self, other: &Expression<K>) {
        self.add_scaled(other, 1.0);
    }
}

impl<K: Eq + Hash + Clone> SubAssign<&Expression<K>> for Expression<K> {
    fn sub_assign(&mut self, other: &Expression<K>) {
        self.add_scaled(other, -1.0);
    }
}

impl<K: Eq + Hash + Clone> Add<&Expression<K>> for Expression<K> {
    type Output = Expression<K>;

    fn add(mut self, other: &Expression<K>) -> Expression<K> {
        self += other;
        self
    }
}

impl<K: Eq + Hash + Clone> Add<Expression<K>> for Expression<K> {
    type Output = Expression<K>;

    fn add(self, other: Expression<K>) -> Expression<K> {
        self + &other
    }
}

impl<K: Eq + Hash + Clone> Sub<&Expression<K>> for Expression<K> {
    type Output = Expression<K>;

    fn sub(mut self, other: &Expression<K>) -> Expression<K> {
        self -= other;
        self
    }
}

impl<K: Eq + Hash + Clone> Sub<Expression<K>> for Expression<K> {
    type Output = Expression<K>;

    fn sub(self, other: Expression<K>) -> Expression<K> {
        self - &other
    }
}

impl<K: Eq + Hash + Clone> Add<f64> for Expression<K> {
    type Output = Expression<K>;

    fn add(mut self, constant: f64) -> Expression<K> {
        self += constant;
        self
    }
}

impl<K: Eq + Hash + Clone> Sub<f64> for Expression<K> {
    type Output = Expression<K>;

    fn sub(mut self, constant: f64) -> Expression<K> {
        self -= constant;
        self
    }
}
