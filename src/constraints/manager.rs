//! Constraint manager
//!
//! The [`ConstraintManager`] owns the active [`Layer`] and an ordered list of
//! [`SolverSpace`]s. New constraints go to the first space; transactions and
//! prepares fan out to every space. A failed solve locks the manager until the
//! user intervenes, either through [`ConstraintManager::solve_fine`] or by
//! removing constraints.

use tracing::{debug, info, warn};

use crate::constraints::constraint::{Constraint, ConstraintId, ConstraintRecord};
use crate::constraints::schema::ConstraintKind;
use crate::constraints::space::SolverSpace;
use crate::error::{Result, SolverError};
use crate::sketch::{EntityId, Layer};
use crate::solver::SolverConfig;

/// Solver spaces over one geometry layer, plus the solve lock
#[derive(Debug)]
pub struct ConstraintManager {
    layer: Layer,
    spaces: Vec<SolverSpace>,
    config: SolverConfig,
    in_transaction: bool,
    solve_locked: bool,
}

impl ConstraintManager {
    /// Manage `layer` with a single space and the default configuration
    pub fn new(layer: Layer) -> Self {
        Self::with_config(layer, SolverConfig::default())
    }

    pub fn with_config(layer: Layer, config: SolverConfig) -> Self {
        Self {
            layer,
            spaces: vec![SolverSpace::new(0, config.clone())],
            config,
            in_transaction: false,
            solve_locked: false,
        }
    }

    pub fn layer(&self) -> &Layer {
        &self.layer
    }

    /// Mutable access for adding geometry
    ///
    /// Call [`ConstraintManager::refresh`] afterwards so the spaces pick up the
    /// new parameters.
    pub fn layer_mut(&mut self) -> &mut Layer {
        &mut self.layer
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Replace the configuration of every space
    pub fn set_config(&mut self, config: SolverConfig) {
        for space in &mut self.spaces {
            space.set_config(config.clone());
        }
        self.config = config;
    }

    pub fn spaces(&self) -> &[SolverSpace] {
        &self.spaces
    }

    pub fn space(&self, index: usize) -> Result<&SolverSpace> {
        self.spaces.get(index).ok_or(SolverError::SpaceNotFound(index))
    }

    /// Append an empty space and return its index
    pub fn add_space(&mut self) -> usize {
        let index = self.spaces.len();
        self.spaces.push(SolverSpace::new(index, self.config.clone()));
        index
    }

    /// Whether solving is locked after a failure
    pub fn is_locked(&self) -> bool {
        self.solve_locked
    }

    /// Drop every space and start over with one empty space
    ///
    /// Constraint registrations on the layer are left as they are; use
    /// [`ConstraintManager::clear`] to detach constraints first.
    pub fn reset(&mut self) {
        self.spaces = vec![SolverSpace::new(0, self.config.clone())];
    }

    /// Remove every constraint of every space
    pub fn clear(&mut self) {
        for space in &mut self.spaces {
            space.clear(&mut self.layer);
        }
    }

    pub fn start_transaction(&mut self) {
        self.in_transaction = true;
        for space in &mut self.spaces {
            space.start_transaction();
        }
    }

    /// Close the transaction and solve each space once
    ///
    /// A space that fails to solve locks the manager. Every space is finished
    /// either way; the first failure is returned.
    pub fn finish_transaction(&mut self) -> Result<()> {
        self.in_transaction = false;
        let mut first = None;
        for space in &mut self.spaces {
            if let Err(err) = space.finish_transaction(&self.layer) {
                self.solve_locked = true;
                info!(space = space.index(), "solve locked");
                first.get_or_insert(err);
            }
        }
        match first {
            Some(err) => Err(err),
            None => self.refresh(),
        }
    }

    /// Re-prepare every space unless a transaction is open
    pub fn refresh(&mut self) -> Result<()> {
        if self.in_transaction {
            return Ok(());
        }
        self.prepare(None, false)
    }

    /// Look up a constraint in any space
    pub fn constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.spaces.iter().find_map(|space| space.constraint(id))
    }

    /// Every constraint, space by space
    pub fn constraints(&self) -> impl Iterator<Item = &Constraint> {
        self.spaces.iter().flat_map(|space| space.constraints().iter())
    }

    /// Add a constraint to the first space
    ///
    /// # Errors
    ///
    /// `AddConstraintFailed` when the constraint was rejected.
    pub fn add(&mut self, constraint: Constraint) -> Result<ConstraintId> {
        self.add_to_space(0, constraint)
    }

    /// Add a constraint to the space at `index`
    pub fn add_to_space(&mut self, index: usize, constraint: Constraint) -> Result<ConstraintId> {
        let id = constraint.id();
        let space = self
            .spaces
            .get_mut(index)
            .ok_or(SolverError::SpaceNotFound(index))?;
        space.add_constraint(&mut self.layer, constraint)?;
        debug!(constraint = %id, space = index, "constraint added");
        Ok(id)
    }

    /// Build a constraint of `kind` over `entities` and add it
    pub fn constrain(&mut self, kind: ConstraintKind, entities: &[EntityId]) -> Result<ConstraintId> {
        let constraint = Constraint::new(&mut self.layer, kind, entities)?;
        self.add(constraint)
    }

    /// Add a batch of constraints with a single solve
    pub fn add_constraints(&mut self, constraints: Vec<Constraint>) -> Result<Vec<ConstraintId>> {
        self.start_transaction();
        let mut ids = Vec::with_capacity(constraints.len());
        for constraint in constraints {
            match self.add(constraint) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    self.finish_transaction().ok();
                    return Err(err);
                }
            }
        }
        self.finish_transaction()?;
        Ok(ids)
    }

    fn detach(&mut self, id: ConstraintId) -> Result<Constraint> {
        let space = self
            .spaces
            .iter_mut()
            .find(|space| space.contains(id))
            .ok_or(SolverError::ConstraintNotFound(id))?;
        space.remove_constraint(&mut self.layer, id)
    }

    /// Remove constraints, then unlock and re-solve
    pub fn remove_constraints(&mut self, ids: &[ConstraintId]) -> Result<Vec<Constraint>> {
        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            removed.push(self.detach(*id)?);
        }
        self.solve_fine()?;
        self.refresh()?;
        Ok(removed)
    }

    /// Remove root entities together with their children and every
    /// constraint on any of them
    ///
    /// Ids of non-root entities are ignored.
    pub fn remove_entities(&mut self, ids: &[EntityId]) -> Result<()> {
        self.start_transaction();
        for id in ids {
            if !self.layer.contains(*id) || self.layer.parent(*id).is_some() {
                continue;
            }
            let mut attached = Vec::new();
            for each in self.layer.subtree(*id) {
                attached.extend(self.layer.constraints_of(each));
            }
            attached.sort();
            attached.dedup();
            for constraint in attached {
                if let Err(err) = self.detach(constraint) {
                    warn!(constraint = %constraint, error = %err, "dangling constraint registration");
                }
            }
            let removed = self.layer.remove(*id)?;
            debug!(entity = %id, removed = removed.len(), "entity removed");
        }
        self.finish_transaction()
    }

    /// Make two points coincide
    pub fn coincide_points(&mut self, a: EntityId, b: EntityId) -> Result<ConstraintId> {
        self.constrain(ConstraintKind::Coincident, &[a, b])
    }

    /// Put a point on a segment's line; the constraint gets a decoration
    pub fn point_on_line(&mut self, point: EntityId, line: EntityId) -> Result<ConstraintId> {
        self.decorated(ConstraintKind::PointOnLine, &[point, line])
    }

    /// Put a point on a circle; the constraint gets a decoration
    pub fn point_on_circle(&mut self, point: EntityId, circle: EntityId) -> Result<ConstraintId> {
        self.decorated(ConstraintKind::PointOnCircle, &[point, circle])
    }

    fn decorated(&mut self, kind: ConstraintKind, entities: &[EntityId]) -> Result<ConstraintId> {
        let mut constraint = Constraint::new(&mut self.layer, kind, entities)?;
        let decoration = self.layer.allocate_decoration();
        constraint.set_decoration(decoration);
        self.add(constraint)
    }

    /// Solve every space
    ///
    /// # Errors
    ///
    /// `SolveLocked` while locked. Otherwise the first space failure, which
    /// also locks the manager.
    pub fn solve(&mut self, rough: bool) -> Result<()> {
        if self.solve_locked {
            return Err(SolverError::SolveLocked);
        }

        let mut first = None;
        for space in &mut self.spaces {
            if let Err(err) = space.solve(rough) {
                self.solve_locked = true;
                info!(space = space.index(), "solve locked");
                first.get_or_insert(err);
            }
        }
        first.map_or(Ok(()), Err)
    }

    /// Unlock after a failure, re-prepare and solve precisely
    ///
    /// Does nothing when not locked.
    pub fn solve_fine(&mut self) -> Result<()> {
        if !self.solve_locked {
            return Ok(());
        }
        self.solve_locked = false;
        info!("solve unlocked");
        self.prepare(None, true)?;
        self.solve(false)
    }

    /// Prepare every space for `dragged`
    pub fn prepare(&mut self, dragged: Option<EntityId>, force: bool) -> Result<()> {
        for space in &mut self.spaces {
            space.prepare(&self.layer, dragged, force)?;
        }
        Ok(())
    }

    /// Move an entity by `(dx, dy)` and solve roughly around it
    ///
    /// The first call for an entity prepares the spaces with its parameters
    /// interactive; later calls for the same entity reuse that state. While
    /// locked the entity moves freely and `SolveLocked` is returned.
    pub fn drag(&mut self, entity: EntityId, dx: f64, dy: f64) -> Result<()> {
        let locked = self.solve_locked;
        self.prepare(Some(entity), locked)?;
        self.layer.entity(entity)?.translate(dx, dy);
        self.solve(true)
    }

    /// Finish a drag with a precise solve
    pub fn end_drag(&mut self) -> Result<()> {
        self.solve(false)
    }

    /// Persisted form of every constraint
    pub fn records(&self) -> Vec<ConstraintRecord> {
        self.constraints().map(|c| c.record()).collect()
    }

    /// Rebuild persisted constraints against the layer
    ///
    /// Spaces are created as needed to honour the recorded indices; records
    /// without a space go to the first one.
    pub fn restore(&mut self, records: &[ConstraintRecord]) -> Result<Vec<ConstraintId>> {
        let mut constraints = Vec::with_capacity(records.len());
        for record in records {
            let index = record.space.unwrap_or(0);
            while self.spaces.len() <= index {
                self.add_space();
            }
            constraints.push((index, Constraint::from_record(&mut self.layer, record)?));
        }

        self.start_transaction();
        let mut ids = Vec::with_capacity(constraints.len());
        for (index, constraint) in constraints {
            match self.add_to_space(index, constraint) {
                Ok(id) => ids.push(id),
                Err(err) => {
                    self.finish_transaction().ok();
                    return Err(err);
                }
            }
        }
        self.finish_transaction()?;
        Ok(ids)
    }
}
