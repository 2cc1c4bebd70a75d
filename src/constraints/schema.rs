//! Constraint schema registry
//!
//! Every constraint kind maps to one immutable [`ConstraintSchema`] entry in
//! [`SCHEMAS`]. The entity order of a constraint fixes the positional meaning
//! of its flattened parameter list; each generator below documents the layout
//! it expects.

use std::fmt;

use crate::error::{Result, SolverError};
use crate::expression::{Equation, Expr, ExprVector};
use crate::parameters::{IdList, ParamRef};

/// Kinds of geometric relation, with their persisted codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ConstraintKind {
    Coincident,
    PointOnLine,
    EqualLength,
    Symmetric,
    Horizontal,
    Vertical,
    PointOnCircle,
    Parallel,
    Perpendicular,
    Tangent,
    Collinear,
    EqualRadius,
}

impl ConstraintKind {
    /// Every kind, in ascending code order
    pub const ALL: [ConstraintKind; 12] = [
        ConstraintKind::Coincident,
        ConstraintKind::PointOnLine,
        ConstraintKind::EqualLength,
        ConstraintKind::Symmetric,
        ConstraintKind::Horizontal,
        ConstraintKind::Vertical,
        ConstraintKind::PointOnCircle,
        ConstraintKind::Parallel,
        ConstraintKind::Perpendicular,
        ConstraintKind::Tangent,
        ConstraintKind::Collinear,
        ConstraintKind::EqualRadius,
    ];

    /// Persisted kind code
    pub fn code(&self) -> u32 {
        match self {
            ConstraintKind::Coincident => 20,
            ConstraintKind::PointOnLine => 42,
            ConstraintKind::EqualLength => 50,
            ConstraintKind::Symmetric => 63,
            ConstraintKind::Horizontal => 80,
            ConstraintKind::Vertical => 81,
            ConstraintKind::PointOnCircle => 100,
            ConstraintKind::Parallel => 121,
            ConstraintKind::Perpendicular => 122,
            ConstraintKind::Tangent => 123,
            ConstraintKind::Collinear => 124,
            ConstraintKind::EqualRadius => 130,
        }
    }

    /// Kind for a persisted code
    ///
    /// # Errors
    ///
    /// `SolverError::UnknownConstraintKind` for an unregistered code.
    pub fn from_code(code: u32) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.code() == code)
            .ok_or(SolverError::UnknownConstraintKind(code))
    }

    /// The schema entry of this kind
    pub fn schema(&self) -> &'static ConstraintSchema {
        // SCHEMAS is laid out in the order of ALL
        &SCHEMAS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.schema().name
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Equation generator: reads the flattened parameters and appends equations
pub type EquationGenerator = fn(&[ParamRef], &mut IdList<Equation>) -> Result<()>;

/// One entry of the registry
#[derive(Debug)]
pub struct ConstraintSchema {
    pub kind: ConstraintKind,

    /// Display name
    pub name: &'static str,

    /// Number of referenced entities
    pub arity: usize,

    /// Length of the flattened parameter list
    pub param_count: usize,

    pub generate: EquationGenerator,
}

/// The registry, one entry per [`ConstraintKind`] in code order
pub static SCHEMAS: [ConstraintSchema; 12] = [
    ConstraintSchema {
        kind: ConstraintKind::Coincident,
        name: "Coincident",
        arity: 2,
        param_count: 4,
        generate: coincident,
    },
    ConstraintSchema {
        kind: ConstraintKind::PointOnLine,
        name: "Point on line",
        arity: 2,
        param_count: 6,
        generate: point_on_line,
    },
    ConstraintSchema {
        kind: ConstraintKind::EqualLength,
        name: "Equal Length",
        arity: 2,
        param_count: 8,
        generate: equal_length,
    },
    ConstraintSchema {
        kind: ConstraintKind::Symmetric,
        name: "Symmetric",
        arity: 3,
        param_count: 8,
        generate: symmetric,
    },
    ConstraintSchema {
        kind: ConstraintKind::Horizontal,
        name: "Horizontal",
        arity: 1,
        param_count: 4,
        generate: horizontal,
    },
    ConstraintSchema {
        kind: ConstraintKind::Vertical,
        name: "Vertical",
        arity: 1,
        param_count: 4,
        generate: vertical,
    },
    ConstraintSchema {
        kind: ConstraintKind::PointOnCircle,
        name: "Point on circle",
        arity: 2,
        param_count: 5,
        generate: point_on_circle,
    },
    ConstraintSchema {
        kind: ConstraintKind::Parallel,
        name: "Parallel",
        arity: 2,
        param_count: 8,
        generate: parallel,
    },
    ConstraintSchema {
        kind: ConstraintKind::Perpendicular,
        name: "Perpendicular",
        arity: 2,
        param_count: 8,
        generate: perpendicular,
    },
    ConstraintSchema {
        kind: ConstraintKind::Tangent,
        name: "Tangent",
        arity: 2,
        param_count: 7,
        generate: tangent,
    },
    ConstraintSchema {
        kind: ConstraintKind::Collinear,
        name: "Collinear",
        arity: 2,
        param_count: 8,
        generate: collinear,
    },
    ConstraintSchema {
        kind: ConstraintKind::EqualRadius,
        name: "Equal Radius",
        arity: 2,
        param_count: 6,
        generate: equal_radius,
    },
];

/// Look up a schema by persisted code
pub fn lookup(code: u32) -> Result<&'static ConstraintSchema> {
    ConstraintKind::from_code(code).map(|kind| kind.schema())
}

fn fixed<'a, const N: usize>(kind: &'static str, params: &'a [ParamRef]) -> Result<&'a [ParamRef; N]> {
    params.try_into().map_err(|_| SolverError::ArityMismatch {
        kind,
        what: "parameters",
        expected: N,
        found: params.len(),
    })
}

fn push(equations: &mut IdList<Equation>, expr: Expr) -> Result<()> {
    equations.add_and_assign_id(Equation::new(expr))?;
    Ok(())
}

/// `a - b` as a symbolic vector
fn direction(ax: &ParamRef, ay: &ParamRef, bx: &ParamRef, by: &ParamRef) -> ExprVector {
    ExprVector::from_params(ax, ay).minus(&ExprVector::from_params(bx, by))
}

fn distance(ax: &ParamRef, ay: &ParamRef, bx: &ParamRef, by: &ParamRef) -> Expr {
    direction(ax, ay, bx, by).magnitude()
}

/// Signed distance from `p` to the line through `la` and `lb`
fn point_to_line_distance(
    px: &ParamRef,
    py: &ParamRef,
    lax: &ParamRef,
    lay: &ParamRef,
    lbx: &ParamRef,
    lby: &ParamRef,
) -> Expr {
    let d = direction(lax, lay, lbx, lby);
    let m = d.magnitude();
    let proj = d.y.clone().times(Expr::from_param(lax).minus(Expr::from_param(px)))
        - d.x.times(Expr::from_param(lay).minus(Expr::from_param(py)));
    proj.div(m)
}

/// `[x1, y1, x2, y2]`: two points
fn coincident(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [x1, y1, x2, y2] = fixed::<4>("Coincident", params)?;
    push(equations, Expr::from_param(x1) - Expr::from_param(x2))?;
    push(equations, Expr::from_param(y1) - Expr::from_param(y2))
}

/// `[x1, y1, x2, y2]`: one segment
fn horizontal(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [_, y1, _, y2] = fixed::<4>("Horizontal", params)?;
    push(equations, Expr::from_param(y1) - Expr::from_param(y2))
}

/// `[x1, y1, x2, y2]`: one segment
fn vertical(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [x1, _, x2, _] = fixed::<4>("Vertical", params)?;
    push(equations, Expr::from_param(x1) - Expr::from_param(x2))
}

/// Two segments
fn parallel(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [x01, y01, x02, y02, x11, y11, x12, y12] = fixed::<8>("Parallel", params)?;
    let ae = direction(x01, y01, x02, y02);
    let be = direction(x11, y11, x12, y12);
    push(equations, ae.cross(&be))
}

/// Two segments
fn perpendicular(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [x01, y01, x02, y02, x11, y11, x12, y12] = fixed::<8>("Perpendicular", params)?;
    let ae = direction(x01, y01, x02, y02);
    let be = direction(x11, y11, x12, y12);
    push(equations, ae.dot(&be))
}

/// Two segments
fn collinear(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [x01, y01, x02, y02, x11, y11, x12, y12] = fixed::<8>("Collinear", params)?;
    let ae = direction(x01, y01, x02, y02);
    let be = direction(x11, y11, x12, y12);
    push(equations, ae.cross(&be))
}

/// `[x1, y1, r1, x2, y2, r2]`: two circles
fn equal_radius(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [_, _, r1, _, _, r2] = fixed::<6>("Equal Radius", params)?;
    push(equations, Expr::from_param(r1) - Expr::from_param(r2))
}

/// `[x0, y0, x1, y1, xc, yc, r]`: a segment then a circle
fn tangent(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [x0, y0, x1, y1, xc, yc, r] = fixed::<7>("Tangent", params)?;
    let dis = point_to_line_distance(xc, yc, x0, y0, x1, y1);
    push(equations, dis - Expr::from_param(r))
}

/// Two segments
fn equal_length(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [x01, y01, x02, y02, x11, y11, x12, y12] = fixed::<8>("Equal Length", params)?;
    let d1 = distance(x01, y01, x02, y02);
    let d2 = distance(x11, y11, x12, y12);
    push(equations, d1 - d2)
}

/// `[ax, ay, bx, by, lax, lay, lbx, lby]`: two points then the mirror segment
///
/// The line through the points is perpendicular to the mirror, and the signed
/// distances of the points to the mirror sum to zero.
fn symmetric(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [ax, ay, bx, by, lax, lay, lbx, lby] = fixed::<8>("Symmetric", params)?;
    let eab = direction(bx, by, ax, ay);
    let el = direction(lbx, lby, lax, lay);
    push(equations, eab.dot(&el))?;

    let eala = direction(lax, lay, ax, ay);
    let ebla = direction(lax, lay, bx, by);
    push(equations, eala.cross(&el) + ebla.cross(&el))
}

/// `[px, py, lax, lay, lbx, lby]`: a point then a segment
fn point_on_line(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [px, py, lax, lay, lbx, lby] = fixed::<6>("Point on line", params)?;
    push(equations, point_to_line_distance(px, py, lax, lay, lbx, lby))
}

/// `[px, py, cx, cy, r]`: a point then a circle
fn point_on_circle(params: &[ParamRef], equations: &mut IdList<Equation>) -> Result<()> {
    let [px, py, cx, cy, r] = fixed::<5>("Point on circle", params)?;
    let dis = distance(px, py, cx, cy);
    push(equations, dis - Expr::from_param(r))
}
