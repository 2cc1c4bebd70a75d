//! Symbolic and numeric Jacobian of one solve group

use ndarray::{Array1, Array2};
use tracing::debug;

use crate::error::{Result, SolverError};
use crate::expression::{Equation, Expr};
use crate::parameters::{IdList, ParamRef};

/// Jacobian of the equations carrying one tag with respect to the parameters
/// carrying the same tag
///
/// Tag 0 selects the main system; a positive tag selects a single pre-process
/// group.
#[derive(Debug)]
pub struct Jacobian {
    /// Free unknowns, one per column
    columns: Vec<ParamRef>,

    /// Equation ids, one per row
    rows: Vec<i64>,

    /// Partial derivatives, row-major
    sym_a: Vec<Vec<Expr>>,

    /// Residuals with solved parameters frozen
    sym_b: Vec<Expr>,

    /// Numeric Jacobian
    pub a: Array2<f64>,

    /// Numeric residuals
    pub b: Array1<f64>,
}

impl Jacobian {
    /// Build the symbolic Jacobian for `tag`
    ///
    /// Every row is deep-copied against `params` so known parameters become
    /// constants and substituted ones read their representative; a derivative
    /// is only formed when the copy still depends on the column's parameter.
    ///
    /// # Errors
    ///
    /// `SolverError::TooManyUnknowns` when the columns or rows exceed
    /// `max_unknowns`.
    pub fn write(
        tag: u32,
        params: &IdList<ParamRef>,
        equations: &IdList<Equation>,
        max_unknowns: usize,
    ) -> Result<Self> {
        let columns: Vec<ParamRef> = params.iter().filter(|p| p.tag() == tag).cloned().collect();
        if columns.len() > max_unknowns {
            return Err(SolverError::TooManyUnknowns {
                count: columns.len(),
                limit: max_unknowns,
            });
        }

        let selected: Vec<&Equation> = equations.iter().filter(|e| e.tag == tag).collect();
        if selected.len() > max_unknowns {
            return Err(SolverError::TooManyUnknowns {
                count: selected.len(),
                limit: max_unknowns,
            });
        }

        let mut rows = Vec::with_capacity(selected.len());
        let mut sym_a = Vec::with_capacity(selected.len());
        let mut sym_b = Vec::with_capacity(selected.len());
        for equation in selected {
            let f = equation.expr.deep_copy(params);
            let used = f.param_used();
            let row = columns
                .iter()
                .map(|p| {
                    if used && f.depends_on(p) {
                        f.derivative(p)
                    } else {
                        Expr::Constant(0.0)
                    }
                })
                .collect();
            rows.push(equation.id);
            sym_a.push(row);
            sym_b.push(f);
        }

        let (m, n) = (rows.len(), columns.len());
        debug!(tag = tag, rows = m, columns = n, "jacobian written");
        Ok(Self {
            columns,
            rows,
            sym_a,
            sym_b,
            a: Array2::zeros((m, n)),
            b: Array1::zeros(m),
        })
    }

    /// Number of equation rows
    pub fn m(&self) -> usize {
        self.rows.len()
    }

    /// Number of unknown columns
    pub fn n(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[ParamRef] {
        &self.columns
    }

    pub fn equation_ids(&self) -> &[i64] {
        &self.rows
    }

    /// Evaluate the partial derivatives at the current parameter values
    pub fn eval_a(&mut self) {
        for (i, row) in self.sym_a.iter().enumerate() {
            for (j, entry) in row.iter().enumerate() {
                self.a[[i, j]] = entry.eval();
            }
        }
    }

    /// Evaluate the residuals at the current parameter values
    pub fn eval_b(&mut self) {
        for (i, f) in self.sym_b.iter().enumerate() {
            self.b[i] = f.eval();
        }
    }

    /// Whether every residual magnitude is below `tolerance`
    pub fn converged(&self, tolerance: f64) -> bool {
        self.b.iter().all(|r| r.abs() < tolerance)
    }

    pub fn has_nan(&self) -> bool {
        self.b.iter().any(|r| r.is_nan())
    }
}
