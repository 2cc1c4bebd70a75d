use thiserror::Error;

use crate::constraints::ConstraintId;
use crate::expression::ExpressionError;

/// Error types for the geosolve-rs library.
#[derive(Error, Debug)]
pub enum SolverError {
    /// Two substitution equations bind the same pair of parameters.
    #[error("Redundant constraint: parameters {first} and {second} are already equal")]
    RedundantConstraint { first: i64, second: i64 },

    /// The main Jacobian would exceed the configured number of columns or rows.
    #[error("Too many unknowns: {count} exceeds the limit of {limit}")]
    TooManyUnknowns { count: usize, limit: usize },

    /// The Jacobian is rank deficient, or a pivot vanished in the least-squares solve.
    #[error("Jacobian matrix is singular: rank {rank} of {rows} equations")]
    SingularJacobian { rank: usize, rows: usize },

    /// Newton iteration hit its cap or produced a NaN.
    #[error("Solver did not converge: {0}")]
    DidNotConverge(String),

    /// An item with this id is already present in an id list.
    #[error("Duplicate id {0}")]
    DuplicateId(i64),

    /// No schema is registered under this kind code.
    #[error("Constraint schema {0} doesn't exist")]
    UnknownConstraintKind(u32),

    /// A constraint was built with the wrong number of entities or parameters.
    #[error("{kind} expects {expected} {what}, found {found}")]
    ArityMismatch {
        kind: &'static str,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    /// The constraint is not hosted by this space.
    #[error("Constraint {0} not found")]
    ConstraintNotFound(ConstraintId),

    /// The referenced entity is not part of the layer.
    #[error("Entity {0} not found")]
    EntityNotFound(u64),

    /// No solver space at this index.
    #[error("Solver space {0} not found")]
    SpaceNotFound(usize),

    /// A previous solve failed and solving is locked until the user intervenes.
    #[error("Solving is locked after a failure; try to remove at least one constraint and try again")]
    SolveLocked,

    /// A solve failed; parameters were rolled back to their snapshot.
    #[error("Solve failed: {0}")]
    SolveFailed(Box<SolverError>),

    /// Adding a constraint made the space unsolvable; the constraint was rejected.
    #[error("Add constraint fails: {0}")]
    AddConstraintFailed(Box<SolverError>),

    /// Expression parse or evaluation error.
    #[error("Expression error: {0}")]
    Expression(#[from] ExpressionError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for geosolve-rs operations.
pub type Result<T> = std::result::Result<T, SolverError>;

/// Numeric status reported by a solve, matching the codes of the sketcher front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    SolvedOkay,
    SingularJacobian,
    DidNotConverge,
    TooManyUnknowns,
    RedundantConstraint,
}

impl SolveStatus {
    /// Returns the numeric status code.
    pub fn code(&self) -> u32 {
        match self {
            SolveStatus::SolvedOkay => 0,
            SolveStatus::SingularJacobian => 1,
            SolveStatus::DidNotConverge => 2,
            SolveStatus::TooManyUnknowns => 3,
            SolveStatus::RedundantConstraint => 4,
        }
    }

    /// Returns true for `SolvedOkay`.
    pub fn is_ok(&self) -> bool {
        matches!(self, SolveStatus::SolvedOkay)
    }
}

impl SolverError {
    /// The solve status this error corresponds to.
    ///
    /// Wrapper variants report the status of the failure they carry; errors
    /// that do not come from a solve report `DidNotConverge`.
    pub fn status(&self) -> SolveStatus {
        match self {
            SolverError::RedundantConstraint { .. } => SolveStatus::RedundantConstraint,
            SolverError::TooManyUnknowns { .. } => SolveStatus::TooManyUnknowns,
            SolverError::SingularJacobian { .. } => SolveStatus::SingularJacobian,
            SolverError::SolveFailed(inner) | SolverError::AddConstraintFailed(inner) => {
                inner.status()
            }
            _ => SolveStatus::DidNotConverge,
        }
    }

    /// Returns the innermost error, looking through the wrapper variants.
    pub fn root_cause(&self) -> &SolverError {
        match self {
            SolverError::SolveFailed(inner) | SolverError::AddConstraintFailed(inner) => {
                inner.root_cause()
            }
            other => other,
        }
    }
}
