//! # Numeric Solver
//!
//! The engine that drives a set of [`Equation`](crate::expression::Equation)s to
//! zero by adjusting the parameters they reference.
//!
//! ## Core Components
//!
//! - [`System`]: the solve pipeline (substitution, pre-processing, Jacobian,
//!   rank check, least-squares Newton iteration, post-processing)
//! - [`SolverConfig`]: limits and tolerances, loadable from JSON
//! - [`substitute`]: union-find elimination of `p - q` equations
//! - [`linalg`]: dense least-squares step, Gaussian elimination, rank
//!
//! ## Example Usage
//!
//! ```rust
//! use geosolve_rs::expression::{Equation, Expr};
//! use geosolve_rs::parameters::{IdList, Param};
//! use geosolve_rs::solver::System;
//!
//! let x = Param::shared(1.0, "x");
//! let y = Param::shared(1.0, "y");
//! let mut params = IdList::new();
//! params.add_and_assign_id(x.clone()).unwrap();
//! params.add_and_assign_id(y.clone()).unwrap();
//!
//! // x^2 + y^2 = 25
//! let mut equations = IdList::new();
//! equations
//!     .add_and_assign_id(Equation::new(
//!         Expr::from_param(&x).square() + Expr::from_param(&y).square() - Expr::constant(25.0),
//!     ))
//!     .unwrap();
//!
//! let mut system = System::default();
//! system.prepare(equations, &[]).unwrap();
//! let report = system.solve(false).unwrap();
//!
//! assert_eq!(report.dof, 1);
//! assert!((x.value().hypot(y.value()) - 5.0).abs() < 1e-8);
//! ```

pub mod config;
pub mod jacobian;
pub mod linalg;
pub mod substitution;
pub mod system;

pub use config::{RankMethod, SolverConfig};
pub use jacobian::Jacobian;
pub use substitution::{substitute, SubstitutionGroup};
pub use system::{SolveReport, System};
