//! Configuration options for the numeric solver.
//!
//! This module defines the limits, tolerances and thresholds used by the
//! substitution, Jacobian, rank and Newton phases of a solve.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Method used to estimate the rank of the main Jacobian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankMethod {
    /// Incremental Gram-Schmidt orthogonalization of the rows
    GramSchmidt,

    /// Count singular values above the threshold
    #[cfg(feature = "faer-rank")]
    Svd,
}

impl Default for RankMethod {
    fn default() -> Self {
        RankMethod::GramSchmidt
    }
}

/// Configuration options for the numeric solver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum number of Jacobian columns or rows. Default: 1024
    pub max_unknowns: usize,

    /// Maximum number of Newton steps per solve. Default: 10
    pub max_iterations: usize,

    /// Absolute residual tolerance for convergence. Default: 1e-8
    pub convergence_tolerance: f64,

    /// Residual tolerance used by rough (per-frame) solves. Default: 1e-6
    pub rough_tolerance: f64,

    /// Smallest pivot magnitude accepted by Gaussian elimination. Default: 1e-20
    pub pivot_threshold: f64,

    /// Squared row magnitude below which a row adds no rank. Default: 1e-12
    pub rank_threshold: f64,

    /// Column scale applied to dragged parameters. Default: 1/20
    pub dragged_scale: f64,

    /// Rank estimation method. Default: GramSchmidt
    pub rank_method: RankMethod,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_unknowns: 1024,
            max_iterations: 10,
            convergence_tolerance: 1e-8,
            rough_tolerance: 1e-6,
            pivot_threshold: 1e-20,
            rank_threshold: 1e-12,
            dragged_scale: 1.0 / 20.0,
            rank_method: RankMethod::default(),
        }
    }
}

impl SolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from JSON; missing fields take their defaults.
    ///
    /// # Examples
    ///
    /// ```
    /// use geosolve_rs::solver::SolverConfig;
    ///
    /// let config = SolverConfig::from_json(r#"{ "max_iterations": 25 }"#).unwrap();
    /// assert_eq!(config.max_iterations, 25);
    /// assert_eq!(config.max_unknowns, 1024);
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Tolerance for a rough or a fine solve.
    pub fn tolerance(&self, rough: bool) -> f64 {
        if rough {
            self.rough_tolerance
        } else {
            self.convergence_tolerance
        }
    }

    /// Set the maximum number of unknowns.
    pub fn with_max_unknowns(mut self, max_unknowns: usize) -> Self {
        self.max_unknowns = max_unknowns;
        self
    }

    /// Set the maximum number of Newton steps.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence tolerance.
    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance;
        self
    }

    /// Set the tolerance of rough solves.
    pub fn with_rough_tolerance(mut self, tolerance: f64) -> Self {
        self.rough_tolerance = tolerance;
        self
    }

    /// Set the pivot threshold.
    pub fn with_pivot_threshold(mut self, threshold: f64) -> Self {
        self.pivot_threshold = threshold;
        self
    }

    /// Set the rank threshold.
    pub fn with_rank_threshold(mut self, threshold: f64) -> Self {
        self.rank_threshold = threshold;
        self
    }

    /// Set the column scale of dragged parameters.
    pub fn with_dragged_scale(mut self, scale: f64) -> Self {
        self.dragged_scale = scale;
        self
    }

    /// Set the rank estimation method.
    pub fn with_rank_method(mut self, method: RankMethod) -> Self {
        self.rank_method = method;
        self
    }
}
