//! # geosolve-rs
//!
//! `geosolve-rs` is a 2D geometric constraint solver. Sketch entities own
//! scalar parameters; declarative constraints between entities generate
//! symbolic equations; the solver drives those equations to zero with a
//! least-squares Newton iteration over an analytic Jacobian.
//!
//! The library provides:
//! - Symbolic expressions with evaluation, differentiation and a small parser
//! - Union-find substitution of equality equations before the numeric solve
//! - Minimum-norm Newton steps that keep dragged geometry where the user put it
//! - Solver spaces with snapshot rollback and rejection of conflicting
//!   constraints
//!
//! ## Basic Usage
//!
//! ```
//! use geosolve_rs::constraints::ConstraintManager;
//! use geosolve_rs::sketch::{Layer, Point};
//!
//! let mut layer = Layer::new("sketch");
//! let a = layer.add(Point::new(0.0, 0.0));
//! let b = layer.add(Point::new(10.0, 10.0));
//!
//! let mut manager = ConstraintManager::new(layer);
//! manager.coincide_points(a, b).unwrap();
//!
//! let pa = manager.layer().get(a).unwrap().as_point().unwrap();
//! let pb = manager.layer().get(b).unwrap().as_point().unwrap();
//! assert!(pa.distance_to(pb) < 1e-6);
//! ```

// Public modules
pub mod error;

// Parameter system
pub mod parameters;

pub mod expression;

pub mod sketch;

pub mod constraints;

pub mod solver;

// Re-exports for convenience
pub use constraints::{Constraint, ConstraintKind, ConstraintManager, SolverSpace};
pub use error::{Result, SolveStatus, SolverError};
pub use solver::{SolveReport, SolverConfig, System};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
