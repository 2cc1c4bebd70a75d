//! # Sketch Geometry
//!
//! The geometry side of the solver boundary: entities that own parameters and
//! the layer that holds them. Constraints refer to entities by [`EntityId`] and
//! only ever read their parameters through [`HasParams`].
//!
//! ```rust
//! use geosolve_rs::sketch::{HasParams, Layer, Segment};
//!
//! let mut layer = Layer::new("sketch");
//! let seg = layer.add(Segment::new(0.0, 0.0, 5.0, 3.0));
//!
//! // the segment and its two end points
//! assert_eq!(layer.len(), 3);
//! assert_eq!(layer.get(seg).unwrap().params().len(), 4);
//! ```

pub mod entity;
pub mod layer;

pub use entity::{Arc, Circle, Entity, HasParams, Point, Segment};
pub use layer::{DecorationId, EntityId, Layer};
