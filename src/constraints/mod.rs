//! # Constraints
//!
//! Declarative geometric relations over layer entities, and the machinery
//! that keeps them satisfied.
//!
//! ## Core Components
//!
//! - [`schema`]: the immutable registry mapping each [`ConstraintKind`] to its
//!   arity and equation generator
//! - [`Constraint`]: a relation instance with its flattened parameter list
//! - [`SolverSpace`]: a constraint set solved together, with snapshot rollback
//!   and conflict rejection
//! - [`ConstraintManager`]: owns the layer and the spaces, batches
//!   transactions and locks solving after a failure
//!
//! ## Example Usage
//!
//! ```rust
//! use geosolve_rs::constraints::{ConstraintKind, ConstraintManager};
//! use geosolve_rs::sketch::{Layer, Segment};
//!
//! let mut layer = Layer::new("sketch");
//! let s = layer.add(Segment::new(0.0, 0.0, 5.0, 3.0));
//!
//! let mut manager = ConstraintManager::new(layer);
//! manager.constrain(ConstraintKind::Horizontal, &[s]).unwrap();
//!
//! let segment = manager.layer().get(s).unwrap().as_segment().unwrap();
//! assert!((segment.a.y.value() - segment.b.y.value()).abs() < 1e-6);
//! ```

pub mod constraint;
pub mod manager;
pub mod schema;
pub mod space;

pub use constraint::{Constraint, ConstraintId, ConstraintRecord};
pub use manager::ConstraintManager;
pub use schema::{lookup, ConstraintKind, ConstraintSchema, EquationGenerator, SCHEMAS};
pub use space::{SolverSpace, UNKNOWN_DOF};
