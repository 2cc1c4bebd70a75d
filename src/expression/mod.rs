//! # Symbolic Expressions
//!
//! Residuals of geometric constraints are written as expression trees over
//! [`Param`](crate::parameters::Param) handles. The solver evaluates them,
//! differentiates them analytically to build the Jacobian, and freezes solved
//! parameters into constants between phases.
//!
//! ## Core Components
//!
//! - [`Expr`]: the expression tree and its combinators
//! - [`ExprVector`]: a 2D vector of expressions (cross, dot, magnitude)
//! - [`Equation`]: an expression that must evaluate to zero
//! - [`Expr::parse`]: a textual front end for writing residuals by hand
//!
//! ## Example Usage
//!
//! ```rust
//! use geosolve_rs::expression::{Equation, Expr};
//! use geosolve_rs::parameters::Param;
//!
//! let x = Param::shared(3.0, "x");
//! let y = Param::shared(4.0, "y");
//!
//! // the distance from the origin is 5
//! let eq = Equation::new(Expr::parse_with_params("sqrt(sq(x) + sq(y)) - 5", &[x.clone(), y.clone()]).unwrap());
//! assert!(eq.residual().abs() < 1e-12);
//!
//! // d/dx sqrt(x^2 + y^2) = x / r
//! assert!((eq.expr.derivative(&x).eval() - 0.6).abs() < 1e-12);
//! ```

pub mod equation;
pub mod expr;
pub mod parser;
pub mod vector;

pub use equation::{Equation, EQ_SUBSTITUTED};
pub use expr::{BinaryOp, Expr, ReferencedParams, UnaryOp};
pub use parser::ExpressionError;
pub use vector::ExprVector;
