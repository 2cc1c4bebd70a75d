//! The active geometry layer
//!
//! A [`Layer`] holds the entities of a sketch, the constraint set of every
//! entity, and the opaque decorations attached to constraints. Composite
//! entities are registered together with their children, so the end points of
//! a segment are entities of their own and can be constrained directly.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constraints::ConstraintId;
use crate::error::{Result, SolverError};
use crate::parameters::ParamRef;
use crate::sketch::entity::{Entity, HasParams};

/// Identifier of an entity within a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle of a constraint decoration owned by the layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DecorationId(pub u64);

#[derive(Debug)]
struct LayerEntry {
    entity: Entity,
    parent: Option<EntityId>,
    children: Vec<EntityId>,
    constraints: BTreeSet<ConstraintId>,
}

/// Entities, their constraint sets and constraint decorations
#[derive(Debug, Default)]
pub struct Layer {
    name: String,
    entries: BTreeMap<EntityId, LayerEntry>,
    decorations: BTreeSet<DecorationId>,
    next_entity: u64,
    next_decoration: u64,
    next_constraint: u64,
}

impl Layer {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add an entity and its children, children first
    ///
    /// # Returns
    ///
    /// The id of the entity itself. Child ids are available through
    /// [`Layer::children`].
    pub fn add(&mut self, entity: impl Into<Entity>) -> EntityId {
        self.add_entry(entity.into())
    }

    fn add_entry(&mut self, entity: Entity) -> EntityId {
        let children: Vec<EntityId> = entity
            .children()
            .into_iter()
            .map(|child| self.add_entry(child))
            .collect();
        self.next_entity += 1;
        let id = EntityId(self.next_entity);
        for child in &children {
            if let Some(entry) = self.entries.get_mut(child) {
                entry.parent = Some(id);
            }
        }
        self.entries.insert(
            id,
            LayerEntry {
                entity,
                parent: None,
                children,
                constraints: BTreeSet::new(),
            },
        );
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entries.get(&id).map(|entry| &entry.entity)
    }

    /// Like [`Layer::get`], failing with `EntityNotFound`
    pub fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.get(id).ok_or(SolverError::EntityNotFound(id.0))
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Ids of the direct children of an entity
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.entries
            .get(&id)
            .map_or(&[][..], |entry| entry.children.as_slice())
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entries.get(&id).and_then(|entry| entry.parent)
    }

    /// Entities in insertion order
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entries.iter().map(|(id, entry)| (*id, &entry.entity))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visit the parameters of every entity in insertion order
    ///
    /// Parameters shared between a composite and its children are visited
    /// once per owner.
    pub fn visit_params(&self, f: &mut dyn FnMut(&ParamRef)) {
        for entry in self.entries.values() {
            entry.entity.visit_params(f);
        }
    }

    /// Call `f` on an entity and all its descendants, descendants first
    pub fn traverse(&self, id: EntityId, f: &mut dyn FnMut(EntityId)) {
        if let Some(entry) = self.entries.get(&id) {
            for child in &entry.children {
                self.traverse(*child, f);
            }
            f(id);
        }
    }

    /// The entity and all its descendants, descendants first
    pub fn subtree(&self, id: EntityId) -> Vec<EntityId> {
        let mut ids = Vec::new();
        self.traverse(id, &mut |each| ids.push(each));
        ids
    }

    /// Remove an entity and its descendants
    ///
    /// # Returns
    ///
    /// The removed ids, parent first.
    pub fn remove(&mut self, id: EntityId) -> Result<Vec<EntityId>> {
        if !self.contains(id) {
            return Err(SolverError::EntityNotFound(id.0));
        }
        let mut removed = self.subtree(id);
        removed.reverse();
        for each in &removed {
            self.entries.remove(each);
        }
        Ok(removed)
    }

    /// Constraints registered on an entity
    pub fn constraints_of(&self, id: EntityId) -> impl Iterator<Item = ConstraintId> + '_ {
        self.entries
            .get(&id)
            .into_iter()
            .flat_map(|entry| entry.constraints.iter().copied())
    }

    /// Whether any constraint is registered on the entity or its descendants
    pub fn constraint_exists(&self, id: EntityId) -> bool {
        self.subtree(id)
            .iter()
            .any(|each| self.constraints_of(*each).next().is_some())
    }

    /// Register a constraint on each entity and all their descendants
    pub fn register_constraint(&mut self, constraint: ConstraintId, entities: &[EntityId]) {
        for id in entities {
            for each in self.subtree(*id) {
                if let Some(entry) = self.entries.get_mut(&each) {
                    entry.constraints.insert(constraint);
                }
            }
        }
    }

    /// Remove a constraint from each entity and all their descendants
    pub fn detach_constraint(&mut self, constraint: ConstraintId, entities: &[EntityId]) {
        for id in entities {
            for each in self.subtree(*id) {
                if let Some(entry) = self.entries.get_mut(&each) {
                    entry.constraints.remove(&constraint);
                }
            }
        }
    }

    pub(crate) fn allocate_constraint_id(&mut self) -> ConstraintId {
        self.next_constraint += 1;
        ConstraintId(self.next_constraint)
    }

    /// Create a decoration for a constraint
    pub fn allocate_decoration(&mut self) -> DecorationId {
        self.next_decoration += 1;
        let id = DecorationId(self.next_decoration);
        self.decorations.insert(id);
        id
    }

    pub fn has_decoration(&self, id: DecorationId) -> bool {
        self.decorations.contains(&id)
    }

    pub fn decoration_count(&self) -> usize {
        self.decorations.len()
    }

    /// Remove a decoration and release its handle
    pub fn remove_and_free(&mut self, id: DecorationId) -> bool {
        self.decorations.remove(&id)
    }
}
