//! End-to-end tests through solver spaces and the constraint manager
//!
//! These exercise whole sketches: geometry in a layer, constraints from the
//! schema registry, solving, dragging and rollback.

// Behavioural properties of constrained sketches
mod properties_tests;

// Manager lifecycle: transactions, locking, persistence
mod manager_tests;
