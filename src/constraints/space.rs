//! Solver spaces
//!
//! A [`SolverSpace`] owns a set of constraints and the numeric [`System`] that
//! solves them. Every solve attempt is bracketed by a snapshot of the
//! parameters the valid constraints touch; a failed attempt writes the snapshot
//! back before the error reaches the caller.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, warn};

use crate::constraints::constraint::{Constraint, ConstraintId};
use crate::error::{Result, SolverError};
use crate::expression::Equation;
use crate::parameters::{IdList, ParamRef, UNASSIGNED_ID};
use crate::sketch::{EntityId, HasParams, Layer};
use crate::solver::{SolveReport, SolverConfig, System};

/// Degrees of freedom reported before the first successful solve.
pub const UNKNOWN_DOF: usize = 1024;

/// A set of constraints solved together
#[derive(Debug)]
pub struct SolverSpace {
    index: usize,
    dof: usize,
    in_transaction: bool,

    constraints: Vec<Constraint>,
    conflicting: BTreeSet<ConstraintId>,

    /// Last good value per parameter id
    snapshot: BTreeMap<i64, f64>,

    params: IdList<ParamRef>,
    interactive: Vec<ParamRef>,
    dragged: Option<EntityId>,

    system: System,
}

impl SolverSpace {
    pub fn new(index: usize, config: SolverConfig) -> Self {
        Self {
            index,
            dof: UNKNOWN_DOF,
            in_transaction: false,
            constraints: Vec::new(),
            conflicting: BTreeSet::new(),
            snapshot: BTreeMap::new(),
            params: IdList::new(),
            interactive: Vec::new(),
            dragged: None,
            system: System::new(config),
        }
    }

    /// Position of this space in its manager
    pub fn index(&self) -> usize {
        self.index
    }

    /// Degrees of freedom of the last successful solve
    pub fn dof(&self) -> usize {
        self.dof
    }

    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.id() == id)
    }

    pub fn contains(&self, id: ConstraintId) -> bool {
        self.constraint(id).is_some()
    }

    pub fn is_conflicting(&self, id: ConstraintId) -> bool {
        self.conflicting.contains(&id)
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    /// Parameters loaded by the last prepare
    pub fn params(&self) -> &IdList<ParamRef> {
        &self.params
    }

    /// Parameters of the dragged entity
    pub fn interactive(&self) -> &[ParamRef] {
        &self.interactive
    }

    pub fn dragged(&self) -> Option<EntityId> {
        self.dragged
    }

    pub fn system(&self) -> &System {
        &self.system
    }

    pub fn set_config(&mut self, config: SolverConfig) {
        self.system.set_config(config);
    }

    /// Defer solving until [`SolverSpace::finish_transaction`]
    pub fn start_transaction(&mut self) {
        self.in_transaction = true;
    }

    /// Close a transaction, then prepare and solve once for the whole batch
    pub fn finish_transaction(&mut self, layer: &Layer) -> Result<SolveReport> {
        self.in_transaction = false;
        self.prepare(layer, None, true)?;
        self.solve(false)
    }

    /// Add a constraint and solve
    ///
    /// Inside a transaction the constraint is only registered. Otherwise a
    /// constraint that makes the space unsolvable is removed again, the space
    /// is rebuilt and solved without it, and the failure is returned.
    ///
    /// # Errors
    ///
    /// `AddConstraintFailed` wrapping the failed solve.
    pub fn add_constraint(&mut self, layer: &mut Layer, mut constraint: Constraint) -> Result<()> {
        constraint.space = Some(self.index);
        let id = constraint.id();

        if self.in_transaction {
            layer.register_constraint(id, constraint.entities());
            self.constraints.push(constraint);
            return Ok(());
        }

        self.constraints.push(constraint);
        self.prepare(layer, None, true)?;

        match self.solve(false) {
            Ok(_) => {
                if let Some(constraint) = self.constraint(id) {
                    layer.register_constraint(id, constraint.entities());
                }
                Ok(())
            }
            Err(err) => {
                self.conflicting.insert(id);
                warn!(constraint = %id, error = %err, "rejecting constraint");
                self.remove_constraint(layer, id)?;
                self.evaluate_and_build(layer)?;
                if let Err(e) = self.solve(false) {
                    warn!(error = %e, "space unsolvable after rejecting constraint");
                }
                Err(SolverError::AddConstraintFailed(Box::new(err)))
            }
        }
    }

    /// Detach a constraint from this space and from its entities
    ///
    /// Frees the constraint's decoration. Does not solve.
    pub fn remove_constraint(&mut self, layer: &mut Layer, id: ConstraintId) -> Result<Constraint> {
        let index = self
            .constraints
            .iter()
            .position(|c| c.id() == id)
            .ok_or(SolverError::ConstraintNotFound(id))?;

        let mut constraint = self.constraints.remove(index);
        self.conflicting.remove(&id);
        layer.detach_constraint(id, constraint.entities());
        constraint.remove_decoration(layer);
        constraint.space = None;
        debug!(constraint = %id, space = self.index, "constraint removed");
        Ok(constraint)
    }

    /// Remove every constraint, last first
    pub fn clear(&mut self, layer: &mut Layer) {
        while let Some(id) = self.constraints.last().map(|c| c.id()) {
            if self.remove_constraint(layer, id).is_err() {
                break;
            }
        }
        self.reset();
    }

    fn reset(&mut self) {
        self.params.clear();
        self.interactive.clear();
    }

    /// Load the solver from the layer and the valid constraints
    ///
    /// `dragged` names the entity under the pointer; its parameters become
    /// interactive. A repeated prepare for the same dragged entity is skipped
    /// unless `force` is set.
    pub fn prepare(&mut self, layer: &Layer, dragged: Option<EntityId>, force: bool) -> Result<()> {
        if dragged.is_some() && !force && self.dragged == dragged {
            return Ok(());
        }

        // stable, so constraints of one kind keep their insertion order
        self.constraints.sort_by_key(|c| c.kind().code());

        self.reset();
        self.dragged = dragged;
        if let Some(id) = dragged {
            let entity = layer.entity(id)?;
            entity.visit_params(&mut |p| self.interactive.push(p.clone()));
        }

        self.evaluate_and_build(layer)
    }

    fn evaluate_and_build(&mut self, layer: &Layer) -> Result<()> {
        let mut found = Vec::new();
        layer.visit_params(&mut |p| found.push(p.clone()));
        for constraint in &self.constraints {
            found.extend(constraint.params().iter().cloned());
        }

        // ids from an earlier prepare are stale
        for param in &found {
            param.detach();
        }
        self.params.clear();
        for param in found {
            if !self.params.has(&param) {
                self.params.add_and_assign_id(param)?;
            }
        }

        let mut equations = IdList::<Equation>::new();
        for constraint in self.valid_constraints() {
            constraint.collect_equations(&mut equations)?;
        }

        debug!(
            space = self.index,
            params = self.params.len(),
            equations = equations.len(),
            interactive = self.interactive.len(),
            "space prepared"
        );
        self.system.prepare(equations, &self.interactive)
    }

    fn valid_constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints
            .iter()
            .filter(|c| !self.conflicting.contains(&c.id()))
    }

    fn make_snapshot(&mut self) {
        let mut snapshot = BTreeMap::new();
        for constraint in self.valid_constraints() {
            for param in constraint.params() {
                if param.id() != UNASSIGNED_ID {
                    snapshot.insert(param.id(), param.value());
                }
            }
        }
        self.snapshot = snapshot;
    }

    fn rollback(&self) {
        for (id, value) in &self.snapshot {
            if let Some(param) = self.params.find_by_id(*id) {
                param.set(*value);
            }
        }
    }

    /// Solve the prepared system
    ///
    /// # Errors
    ///
    /// `SolveFailed` wrapping the solver error; every snapshotted parameter has
    /// been restored.
    pub fn solve(&mut self, rough: bool) -> Result<SolveReport> {
        self.make_snapshot();
        match self.system.solve(rough) {
            Ok(report) => {
                self.dof = report.dof;
                Ok(report)
            }
            Err(err) => {
                self.rollback();
                warn!(space = self.index, error = %err, "solve failed, parameters rolled back");
                Err(SolverError::SolveFailed(Box::new(err)))
            }
        }
    }
}
