//! Equations: expressions driven to zero

use std::fmt;

use crate::expression::expr::Expr;
use crate::parameters::{IdEntity, ParamRef, UNASSIGNED_ID};

/// Tag marking an equation eliminated by substitution.
pub const EQ_SUBSTITUTED: u32 = 20000;

/// A residual expression whose value must be zero at a solution
#[derive(Debug, Clone)]
pub struct Equation {
    /// Id assigned by the equation list, -1 until inserted
    pub id: i64,

    /// Residual
    pub expr: Expr,

    /// 0 while active, a pre-process group id, or [`EQ_SUBSTITUTED`]
    pub tag: u32,
}

impl Equation {
    pub fn new(expr: Expr) -> Self {
        Self {
            id: UNASSIGNED_ID,
            expr,
            tag: 0,
        }
    }

    /// Call `f` for every parameter the residual references, duplicates included
    pub fn visit_params(&self, mut f: impl FnMut(&ParamRef)) {
        let mut params = Vec::new();
        self.expr.get_params(&mut params);
        for param in &params {
            f(param);
        }
    }

    /// Current residual value
    pub fn residual(&self) -> f64 {
        self.expr.eval()
    }
}

impl IdEntity for Equation {
    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn clear_tag(&mut self) {
        self.tag = 0;
    }
}

impl fmt::Display for Equation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = 0", self.expr)
    }
}
