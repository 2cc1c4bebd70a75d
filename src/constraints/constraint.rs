//! Constraint instances

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constraints::schema::ConstraintKind;
use crate::error::{Result, SolverError};
use crate::expression::Equation;
use crate::parameters::{IdList, ParamRef};
use crate::sketch::{DecorationId, EntityId, HasParams, Layer};

/// Identifier of a constraint, allocated by the layer it was created against
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ConstraintId(pub u64);

impl fmt::Display for ConstraintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

/// Persisted form of a constraint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintRecord {
    /// Kind code
    pub kind: u32,

    /// Referenced entities, in schema order
    pub entities: Vec<EntityId>,

    /// Index of the owning solver space, if attached
    pub space: Option<usize>,
}

/// A geometric relation between layer entities
///
/// The flattened parameter list is collected once, at construction, by
/// visiting the entities in order.
#[derive(Debug)]
pub struct Constraint {
    id: ConstraintId,
    kind: ConstraintKind,
    entities: Vec<EntityId>,
    params: Vec<ParamRef>,
    decoration: Option<DecorationId>,
    pub(crate) space: Option<usize>,
}

impl Constraint {
    /// Create a constraint over entities of `layer`
    ///
    /// # Errors
    ///
    /// `EntityNotFound` for an entity missing from the layer, `ArityMismatch`
    /// when the entity count or the flattened parameter count does not match
    /// the kind.
    pub fn new(layer: &mut Layer, kind: ConstraintKind, entities: &[EntityId]) -> Result<Self> {
        let schema = kind.schema();
        if entities.len() != schema.arity {
            return Err(SolverError::ArityMismatch {
                kind: schema.name,
                what: "entities",
                expected: schema.arity,
                found: entities.len(),
            });
        }

        let mut params = Vec::with_capacity(schema.param_count);
        for id in entities {
            layer.entity(*id)?.visit_params(&mut |p| params.push(p.clone()));
        }
        if params.len() != schema.param_count {
            return Err(SolverError::ArityMismatch {
                kind: schema.name,
                what: "parameters",
                expected: schema.param_count,
                found: params.len(),
            });
        }

        Ok(Self {
            id: layer.allocate_constraint_id(),
            kind,
            entities: entities.to_vec(),
            params,
            decoration: None,
            space: None,
        })
    }

    /// Rebuild a persisted constraint against `layer`
    ///
    /// The owning space is not restored; the caller adds the constraint to the
    /// space named by the record.
    pub fn from_record(layer: &mut Layer, record: &ConstraintRecord) -> Result<Self> {
        let kind = ConstraintKind::from_code(record.kind)?;
        Self::new(layer, kind, &record.entities)
    }

    pub fn record(&self) -> ConstraintRecord {
        ConstraintRecord {
            kind: self.kind.code(),
            entities: self.entities.clone(),
            space: self.space,
        }
    }

    pub fn id(&self) -> ConstraintId {
        self.id
    }

    pub fn kind(&self) -> ConstraintKind {
        self.kind
    }

    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Flattened parameters in schema order
    pub fn params(&self) -> &[ParamRef] {
        &self.params
    }

    /// Index of the owning space
    pub fn space(&self) -> Option<usize> {
        self.space
    }

    pub fn decoration(&self) -> Option<DecorationId> {
        self.decoration
    }

    /// Attach a decoration allocated from the layer
    pub fn set_decoration(&mut self, decoration: DecorationId) {
        self.decoration = Some(decoration);
    }

    /// Free the decoration through the layer that owns it
    pub fn remove_decoration(&mut self, layer: &mut Layer) {
        if let Some(decoration) = self.decoration.take() {
            layer.remove_and_free(decoration);
        }
    }

    /// Append the equations of this constraint
    pub fn collect_equations(&self, equations: &mut IdList<Equation>) -> Result<()> {
        (self.kind.schema().generate)(&self.params, equations)
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.id, self.kind)?;
        for (i, entity) in self.entities.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", entity)?;
        }
        write!(f, ")")
    }
}
