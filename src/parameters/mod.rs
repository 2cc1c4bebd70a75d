//! # Parameter System
//!
//! This module provides the unknowns of a sketch and the ordered collection the
//! solver keeps them in.
//!
//! ## Core Components
//!
//! - [`Param`]: a scalar unknown with a stable id, a value, a display symbol and
//!   per-solve scratch state (tag, known flag, substitution target)
//! - [`ParamRef`]: the shared handle through which entities, expressions and the
//!   solver refer to a parameter
//! - [`IdList`]: a collection kept sorted by id, used for both parameters and
//!   equations
//!
//! ## Example Usage
//!
//! ```rust
//! use geosolve_rs::parameters::{IdList, Param};
//!
//! let x = Param::shared(1.0, "x");
//! let y = Param::shared(2.0, "y");
//!
//! let mut params = IdList::new();
//! params.add_and_assign_id(x.clone()).unwrap();
//! params.add_and_assign_id(y.clone()).unwrap();
//!
//! assert!(params.has(&x));
//! assert_eq!(params.find_by_id(y.id()).unwrap().value(), 2.0);
//! ```

pub mod id_list;
pub mod parameter;


// Re-export key types
pub use id_list::{IdEntity, IdList};
pub use parameter::{Param, ParamRef, UNASSIGNED_ID, VAR_SUBSTITUTED};
