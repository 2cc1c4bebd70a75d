//! Two-component symbolic vectors
//!
//! Helper used by the constraint schemas to express directions, distances and
//! cross/dot products of 2D geometry.

use crate::expression::expr::Expr;
use crate::parameters::ParamRef;

/// A 2D vector whose components are expressions
#[derive(Debug, Clone)]
pub struct ExprVector {
    pub x: Expr,
    pub y: Expr,
}

impl ExprVector {
    /// Vector of two parameter references
    pub fn from_params(x: &ParamRef, y: &ParamRef) -> Self {
        Self {
            x: Expr::from_param(x),
            y: Expr::from_param(y),
        }
    }

    pub fn from_exprs(x: Expr, y: Expr) -> Self {
        Self { x, y }
    }

    /// Component-wise difference
    pub fn minus(&self, b: &ExprVector) -> ExprVector {
        ExprVector {
            x: self.x.clone().minus(b.x.clone()),
            y: self.y.clone().minus(b.y.clone()),
        }
    }

    /// Scalar 2D cross product `x1 * y2 - y1 * x2`
    pub fn cross(&self, b: &ExprVector) -> Expr {
        self.x
            .clone()
            .times(b.y.clone())
            .minus(self.y.clone().times(b.x.clone()))
    }

    pub fn dot(&self, b: &ExprVector) -> Expr {
        self.x
            .clone()
            .times(b.x.clone())
            .plus(self.y.clone().times(b.y.clone()))
    }

    pub fn scaled_by(&self, s: &Expr) -> ExprVector {
        ExprVector {
            x: self.x.clone().times(s.clone()),
            y: self.y.clone().times(s.clone()),
        }
    }

    pub fn negative(&self) -> ExprVector {
        self.scaled_by(&Expr::constant(-1.0))
    }

    /// Same direction, magnitude `s`
    pub fn with_magnitude(&self, s: &Expr) -> ExprVector {
        let m = self.magnitude();
        self.scaled_by(&s.clone().div(m))
    }

    /// Euclidean length
    pub fn magnitude(&self) -> Expr {
        self.x
            .clone()
            .square()
            .plus(self.y.clone().square())
            .sqrt()
    }
}
