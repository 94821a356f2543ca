//! # Two-dimensional points
//!
//! A convenience pairing of two variables for layout-style constraint
//! systems, where most quantities come as `(x, y)` coordinates.
use std::fmt;

use crate::data::variable::Variable;

/// A pair of variables treated as a 2D coordinate.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Point {
    pub x: Variable,
    pub y: Variable,
}

impl Point {
    /// A point from two existing variables.
    pub fn new(x: Variable, y: Variable) -> Self {
        Point { x, y }
    }

    /// A point with fresh anonymous variables at the given coordinates.
    pub fn at(x: f64, y: f64) -> Self {
        Point {
            x: Variable::with_value(x),
            y: Variable::with_value(y),
        }
    }

    pub fn x_value(&self) -> f64 {
        self.x.value()
    }

    pub fn y_value(&self) -> f64 {
        self.y.value()
    }

    /// Overwrite both coordinates.
    pub fn set_xy(&self, x: f64, y: f64) {
        self.x.set_value(x);
        self.y.set_value(y);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x_value(), self.y_value())
    }
}
