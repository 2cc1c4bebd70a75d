//! The numeric solver engine
//!
//! A [`System`] owns one set of equations and the parameters they reference.
//! Each call to [`System::solve`] runs the same phases in order:
//!
//! 1. reset the solver tags of every parameter and equation
//! 2. merge parameters bound by `p - q` equations ([`substitute`])
//! 3. solve equations with a single free unknown in isolation
//! 4. write the main Jacobian over the remaining unknowns
//! 5. check that the Jacobian has full row rank
//! 6. Newton iteration with a minimum-norm least-squares step
//! 7. copy representative values into substituted parameters
//!
//! Any failure aborts the solve; the caller owns rollback.

use std::collections::BTreeSet;
use std::fmt;
use std::rc::Rc;

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::{Result, SolveStatus, SolverError};
use crate::expression::{Equation, ReferencedParams};
use crate::parameters::{IdList, ParamRef};
use crate::solver::config::{RankMethod, SolverConfig};
use crate::solver::jacobian::Jacobian;
use crate::solver::linalg;
use crate::solver::substitution::substitute;

/// Outcome of a successful solve
#[derive(Debug, Clone, PartialEq)]
pub struct SolveReport {
    /// Always `SolvedOkay` for a returned report
    pub status: SolveStatus,

    /// Free unknowns minus main Jacobian rows
    pub dof: usize,

    /// Columns of the main Jacobian
    pub unknowns: usize,

    /// Rows of the main Jacobian
    pub equations: usize,

    /// Newton steps taken on the main system
    pub iterations: usize,

    /// Equations solved alone in pre-processing
    pub preprocessed: usize,

    /// Parameters eliminated by substitution
    pub substituted: usize,
}

impl fmt::Display for SolveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Solve Report")?;
        writeln!(f, "============")?;
        writeln!(f, "Status: {:?}", self.status)?;
        writeln!(f, "Degrees of freedom: {}", self.dof)?;
        writeln!(
            f,
            "Main system: {} equations, {} unknowns",
            self.equations, self.unknowns
        )?;
        writeln!(f, "Newton iterations: {}", self.iterations)?;
        writeln!(f, "Pre-processed equations: {}", self.preprocessed)?;
        write!(f, "Substituted parameters: {}", self.substituted)
    }
}

/// Equations, their parameters and the dragged subset
#[derive(Debug, Default)]
pub struct System {
    config: SolverConfig,
    params: IdList<ParamRef>,
    equations: IdList<Equation>,
    dragged: BTreeSet<i64>,
}

impl System {
    pub fn new(config: SolverConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SolverConfig) {
        self.config = config;
    }

    pub fn params(&self) -> &IdList<ParamRef> {
        &self.params
    }

    pub fn equations(&self) -> &IdList<Equation> {
        &self.equations
    }

    /// Load a new equation set
    ///
    /// The parameter set becomes every parameter the equations reference.
    /// Parameters must already carry ids, unique across the equations.
    pub fn prepare(&mut self, equations: IdList<Equation>, interactive: &[ParamRef]) -> Result<()> {
        self.equations = equations;

        self.params.clear();
        for equation in self.equations.iter() {
            let mut footprint = Vec::new();
            equation.expr.get_params(&mut footprint);
            for param in footprint {
                if !self.params.has(&param) {
                    self.params.add(param)?;
                }
            }
        }

        self.dragged = interactive.iter().map(|p| p.id()).collect();
        debug!(
            equations = self.equations.len(),
            params = self.params.len(),
            dragged = self.dragged.len(),
            "system prepared"
        );
        Ok(())
    }

    fn is_dragged(&self, id: i64) -> bool {
        self.dragged.contains(&id)
    }

    /// Solve the loaded equations in place
    ///
    /// `rough` selects the looser residual tolerance used for drag frames.
    ///
    /// # Errors
    ///
    /// `RedundantConstraint`, `TooManyUnknowns`, `SingularJacobian` or
    /// `DidNotConverge`. Parameter values may be partially updated on error.
    pub fn solve(&mut self, rough: bool) -> Result<SolveReport> {
        let tolerance = self.config.tolerance(rough);

        self.params.clear_tags();
        for param in self.params.iter() {
            param.solver_init();
        }
        self.equations.clear_tags();

        let groups = substitute(&self.params, &mut self.equations, &self.dragged)?;
        let substituted = groups.iter().map(|g| g.members.len() - 1).sum();

        let preprocessed = self.pre_process(tolerance)?;

        let mut jac = Jacobian::write(0, &self.params, &self.equations, self.config.max_unknowns)?;
        jac.eval_a();
        let rank = self.rank(&jac.a)?;
        debug!(rank = rank, rows = jac.m(), "rank check");
        if rank != jac.m() {
            return Err(SolverError::SingularJacobian {
                rank,
                rows: jac.m(),
            });
        }

        let dof = jac.n() - jac.m();
        let iterations = self.newton_solve(&mut jac, tolerance)?;

        self.post_process();

        debug!(
            dof = dof,
            iterations = iterations,
            preprocessed = preprocessed,
            substituted = substituted,
            "solved"
        );
        Ok(SolveReport {
            status: SolveStatus::SolvedOkay,
            dof,
            unknowns: jac.n(),
            equations: jac.m(),
            iterations,
            preprocessed,
            substituted,
        })
    }

    /// Solve every equation that has exactly one free unknown on its own
    fn pre_process(&mut self, tolerance: f64) -> Result<usize> {
        let mut alone: u32 = 1;
        let ids: Vec<i64> = self.equations.iter().map(|e| e.id).collect();

        for id in ids {
            let param = {
                let Some(equation) = self.equations.find_by_id_mut(id) else {
                    continue;
                };
                if equation.tag != 0 {
                    continue;
                }
                let ReferencedParams::Single(param_id) =
                    equation.expr.referenced_params(&self.params)
                else {
                    continue;
                };
                let Some(param) = self.params.find_by_id(param_id) else {
                    continue;
                };
                // a tagged parameter is left for the rank test
                if param.tag() != 0 {
                    continue;
                }
                equation.tag = alone;
                param.set_tag(alone);
                Rc::clone(param)
            };

            let mut jac =
                Jacobian::write(alone, &self.params, &self.equations, self.config.max_unknowns)?;
            self.newton_solve(&mut jac, tolerance).map_err(|e| {
                SolverError::DidNotConverge(format!("pre-process group {}: {}", alone, e))
            })?;
            param.set_known(true);
            debug!(group = alone, param = param.id(), value = param.value(), "solved alone");
            alone += 1;
        }

        Ok((alone - 1) as usize)
    }

    fn rank(&self, a: &Array2<f64>) -> Result<usize> {
        match self.config.rank_method {
            RankMethod::GramSchmidt => Ok(linalg::gram_schmidt_rank(a, self.config.rank_threshold)),
            #[cfg(feature = "faer-rank")]
            RankMethod::Svd => linalg::svd_rank(a, self.config.rank_threshold),
        }
    }

    /// Newton iteration on `jac`, returning the number of steps taken
    fn newton_solve(&self, jac: &mut Jacobian, tolerance: f64) -> Result<usize> {
        let (m, n) = (jac.m(), jac.n());
        if m > n {
            return Err(SolverError::DidNotConverge(format!(
                "{} equations for {} unknowns",
                m, n
            )));
        }

        let scale: Array1<f64> = jac
            .columns()
            .iter()
            .map(|p| {
                if self.is_dragged(p.id()) {
                    self.config.dragged_scale
                } else {
                    1.0
                }
            })
            .collect();

        jac.eval_b();
        if jac.converged(tolerance) {
            return Ok(0);
        }

        for iteration in 1..=self.config.max_iterations {
            jac.eval_a();
            let step =
                linalg::least_squares_step(&jac.a, &jac.b, &scale, self.config.pivot_threshold)?;

            for (param, dx) in jac.columns().iter().zip(step.iter()) {
                param.set(param.value() - dx);
                if param.value().is_nan() {
                    return Err(SolverError::DidNotConverge(format!(
                        "parameter {} became NaN",
                        param.id()
                    )));
                }
            }

            jac.eval_b();
            if jac.has_nan() {
                return Err(SolverError::DidNotConverge(
                    "residual became NaN".to_string(),
                ));
            }
            if jac.converged(tolerance) {
                return Ok(iteration);
            }
        }

        Err(SolverError::DidNotConverge(format!(
            "residuals above {} after {} iterations",
            tolerance, self.config.max_iterations
        )))
    }

    /// Write representative values into substituted parameters
    fn post_process(&self) {
        for param in self.params.iter() {
            if !param.is_substituted() {
                continue;
            }
            if let Some(rep) = self.params.find_by_id(param.substituted()) {
                param.set(rep.value());
                param.set_known(true);
            }
        }
    }
}
