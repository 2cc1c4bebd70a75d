//! Symbolic expression trees over parameters
//!
//! An [`Expr`] is an owned tree whose leaves are parameter references or
//! constants. Trees are built once per equation with the combinators below and
//! then evaluated and differentiated many times per solve. Every operation that
//! returns an `Expr` allocates a fresh, independently owned tree.

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;

use crate::parameters::{IdList, Param, ParamRef};

/// One-child operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Negation (-a)
    Negate,

    /// Square root
    Sqrt,

    /// a * a
    Square,

    /// Sine
    Sin,

    /// Cosine
    Cos,
}

/// Two-child operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition (+)
    Plus,

    /// Subtraction (-)
    Minus,

    /// Multiplication (*)
    Times,

    /// Division (/)
    Div,
}

/// Symbolic expression node
#[derive(Debug, Clone)]
pub enum Expr {
    /// Reference to a live parameter
    Param(ParamRef),

    /// Literal value
    Constant(f64),

    /// Unary operation
    Unary(UnaryOp, Box<Expr>),

    /// Binary operation
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
}

/// Outcome of [`Expr::referenced_params`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferencedParams {
    /// No parameter of the set appears
    None,

    /// Exactly one distinct parameter id appears, possibly several times
    Single(i64),

    /// More than one distinct parameter id appears
    Multiple,
}

impl Expr {
    /// Leaf referencing `param`
    pub fn from_param(param: &ParamRef) -> Self {
        Expr::Param(Rc::clone(param))
    }

    /// Constant leaf
    pub fn constant(value: f64) -> Self {
        Expr::Constant(value)
    }

    fn unary(self, op: UnaryOp) -> Self {
        Expr::Unary(op, Box::new(self))
    }

    fn binary(self, op: BinaryOp, b: Expr) -> Self {
        Expr::Binary(op, Box::new(self), Box::new(b))
    }

    pub fn plus(self, b: Expr) -> Self {
        self.binary(BinaryOp::Plus, b)
    }

    pub fn minus(self, b: Expr) -> Self {
        self.binary(BinaryOp::Minus, b)
    }

    pub fn times(self, b: Expr) -> Self {
        self.binary(BinaryOp::Times, b)
    }

    pub fn div(self, b: Expr) -> Self {
        self.binary(BinaryOp::Div, b)
    }

    pub fn negate(self) -> Self {
        self.unary(UnaryOp::Negate)
    }

    pub fn sqrt(self) -> Self {
        self.unary(UnaryOp::Sqrt)
    }

    pub fn square(self) -> Self {
        self.unary(UnaryOp::Square)
    }

    pub fn sin(self) -> Self {
        self.unary(UnaryOp::Sin)
    }

    pub fn cos(self) -> Self {
        self.unary(UnaryOp::Cos)
    }

    /// Number of child expressions (0, 1 or 2)
    pub fn children(&self) -> usize {
        match self {
            Expr::Param(_) | Expr::Constant(_) => 0,
            Expr::Unary(..) => 1,
            Expr::Binary(..) => 2,
        }
    }

    /// Total number of nodes in the tree
    pub fn nodes(&self) -> usize {
        match self {
            Expr::Param(_) | Expr::Constant(_) => 1,
            Expr::Unary(_, a) => 1 + a.nodes(),
            Expr::Binary(_, a, b) => 1 + a.nodes() + b.nodes(),
        }
    }

    /// Evaluate against the current parameter values
    ///
    /// # Examples
    ///
    /// ```
    /// use geosolve_rs::expression::Expr;
    /// use geosolve_rs::parameters::Param;
    ///
    /// let x = Param::shared(3.0, "x");
    /// let e = Expr::from_param(&x).square().plus(Expr::constant(1.0));
    /// assert_eq!(e.eval(), 10.0);
    ///
    /// x.set(1.0);
    /// assert_eq!(e.eval(), 2.0);
    /// ```
    pub fn eval(&self) -> f64 {
        match self {
            Expr::Param(p) => p.value(),
            Expr::Constant(v) => *v,
            Expr::Unary(op, a) => {
                let a = a.eval();
                match op {
                    UnaryOp::Negate => -a,
                    UnaryOp::Sqrt => a.sqrt(),
                    UnaryOp::Square => a * a,
                    UnaryOp::Sin => a.sin(),
                    UnaryOp::Cos => a.cos(),
                }
            }
            Expr::Binary(op, a, b) => {
                let (a, b) = (a.eval(), b.eval());
                match op {
                    BinaryOp::Plus => a + b,
                    BinaryOp::Minus => a - b,
                    BinaryOp::Times => a * b,
                    BinaryOp::Div => a / b,
                }
            }
        }
    }

    /// Symbolic partial derivative with respect to `param`
    ///
    /// Parameters are matched by identity, not by id.
    ///
    /// # Examples
    ///
    /// ```
    /// use geosolve_rs::expression::Expr;
    /// use geosolve_rs::parameters::Param;
    ///
    /// let x = Param::shared(2.0, "x");
    /// let y = Param::shared(5.0, "y");
    /// // d(x * y)/dx = y
    /// let e = Expr::from_param(&x).times(Expr::from_param(&y));
    /// assert_eq!(e.derivative(&x).eval(), 5.0);
    /// ```
    pub fn derivative(&self, param: &Param) -> Expr {
        match self {
            Expr::Param(p) => {
                let same = std::ptr::eq(Rc::as_ptr(p), param);
                Expr::Constant(if same { 1.0 } else { 0.0 })
            }
            Expr::Constant(_) => Expr::Constant(0.0),
            Expr::Binary(op, a, b) => {
                let da = a.derivative(param);
                let db = b.derivative(param);
                let (a, b) = (a.as_ref().clone(), b.as_ref().clone());
                match op {
                    BinaryOp::Plus => da.plus(db),
                    BinaryOp::Minus => da.minus(db),
                    BinaryOp::Times => a.times(db).plus(b.times(da)),
                    BinaryOp::Div => da
                        .times(b.clone())
                        .minus(a.times(db))
                        .div(b.square()),
                }
            }
            Expr::Unary(op, a) => {
                let da = a.derivative(param);
                let a = a.as_ref().clone();
                match op {
                    UnaryOp::Negate => da.negate(),
                    UnaryOp::Sqrt => Expr::Constant(0.5).div(a.sqrt()).times(da),
                    UnaryOp::Square => Expr::Constant(2.0).times(a).times(da),
                    UnaryOp::Sin => a.cos().times(da),
                    UnaryOp::Cos => a.sin().negate().times(da),
                }
            }
        }
    }

    /// Whether `param` occurs anywhere in the tree (by identity)
    pub fn depends_on(&self, param: &Param) -> bool {
        match self {
            Expr::Param(p) => std::ptr::eq(Rc::as_ptr(p), param),
            Expr::Constant(_) => false,
            Expr::Unary(_, a) => a.depends_on(param),
            Expr::Binary(_, a, b) => a.depends_on(param) || b.depends_on(param),
        }
    }

    /// Whether any parameter reference remains in the tree
    pub fn param_used(&self) -> bool {
        match self {
            Expr::Param(_) => true,
            Expr::Constant(_) => false,
            Expr::Unary(_, a) => a.param_used(),
            Expr::Binary(_, a, b) => a.param_used() || b.param_used(),
        }
    }

    /// Classify the parameters of `params` referenced by the tree
    ///
    /// References to parameters outside `params` are ignored.
    pub fn referenced_params(&self, params: &IdList<ParamRef>) -> ReferencedParams {
        match self {
            Expr::Param(p) => {
                if params.has(p) {
                    ReferencedParams::Single(p.id())
                } else {
                    ReferencedParams::None
                }
            }
            Expr::Constant(_) => ReferencedParams::None,
            Expr::Unary(_, a) => a.referenced_params(params),
            Expr::Binary(_, a, b) => {
                use ReferencedParams::*;
                match (a.referenced_params(params), b.referenced_params(params)) {
                    (None, other) | (other, None) => other,
                    (Single(ia), Single(ib)) if ia == ib => Single(ia),
                    _ => Multiple,
                }
            }
        }
    }

    /// Structural copy with solved parameters frozen
    ///
    /// Each reference is first redirected to its representative when the
    /// parameter was eliminated by substitution; a reference whose (redirected)
    /// parameter is known in `params` then becomes a constant holding its
    /// current value. References to parameters outside `params` are kept.
    pub fn deep_copy(&self, params: &IdList<ParamRef>) -> Expr {
        match self {
            Expr::Param(p) => {
                let Some(stored) = params.find(p) else {
                    return Expr::Param(Rc::clone(p));
                };
                let target = if stored.is_substituted() {
                    params.find_by_id(stored.substituted()).unwrap_or(stored)
                } else {
                    stored
                };
                if target.is_known() {
                    Expr::Constant(target.value())
                } else {
                    Expr::Param(Rc::clone(target))
                }
            }
            Expr::Constant(v) => Expr::Constant(*v),
            Expr::Unary(op, a) => Expr::Unary(*op, Box::new(a.deep_copy(params))),
            Expr::Binary(op, a, b) => Expr::Binary(
                *op,
                Box::new(a.deep_copy(params)),
                Box::new(b.deep_copy(params)),
            ),
        }
    }

    /// Append every referenced parameter, duplicates included, in tree order
    pub fn get_params(&self, out: &mut Vec<ParamRef>) {
        match self {
            Expr::Param(p) => out.push(Rc::clone(p)),
            Expr::Constant(_) => {}
            Expr::Unary(_, a) => a.get_params(out),
            Expr::Binary(_, a, b) => {
                a.get_params(out);
                b.get_params(out);
            }
        }
    }

    /// Structural copy with every reference to the parameter `old_id`
    /// rebound to `new`
    pub fn substitute(&self, old_id: i64, new: &ParamRef) -> Expr {
        match self {
            Expr::Param(p) if p.id() == old_id => Expr::Param(Rc::clone(new)),
            Expr::Param(p) => Expr::Param(Rc::clone(p)),
            Expr::Constant(v) => Expr::Constant(*v),
            Expr::Unary(op, a) => Expr::Unary(*op, Box::new(a.substitute(old_id, new))),
            Expr::Binary(op, a, b) => Expr::Binary(
                *op,
                Box::new(a.substitute(old_id, new)),
                Box::new(b.substitute(old_id, new)),
            ),
        }
    }

    /// The two parameters of an expression that is exactly `p - q`
    pub fn as_param_difference(&self) -> Option<(&ParamRef, &ParamRef)> {
        match self {
            Expr::Binary(BinaryOp::Minus, a, b) => match (a.as_ref(), b.as_ref()) {
                (Expr::Param(p), Expr::Param(q)) => Some((p, q)),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<&ParamRef> for Expr {
    fn from(param: &ParamRef) -> Self {
        Expr::from_param(param)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Expr::Constant(value)
    }
}

impl Add for Expr {
    type Output = Expr;

    fn add(self, rhs: Expr) -> Expr {
        self.plus(rhs)
    }
}

impl Sub for Expr {
    type Output = Expr;

    fn sub(self, rhs: Expr) -> Expr {
        self.minus(rhs)
    }
}

impl Mul for Expr {
    type Output = Expr;

    fn mul(self, rhs: Expr) -> Expr {
        self.times(rhs)
    }
}

impl Div for Expr {
    type Output = Expr;

    fn div(self, rhs: Expr) -> Expr {
        Expr::div(self, rhs)
    }
}

impl Neg for Expr {
    type Output = Expr;

    fn neg(self) -> Expr {
        self.negate()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Param(p) => write!(f, "{}", p.symbol()),
            Expr::Constant(v) if *v < 0.0 => write!(f, "({})", v),
            Expr::Constant(v) => write!(f, "{}", v),
            Expr::Unary(op, a) => {
                let name = match op {
                    UnaryOp::Negate => "-",
                    UnaryOp::Sqrt => "sqrt",
                    UnaryOp::Square => "sq",
                    UnaryOp::Sin => "sin",
                    UnaryOp::Cos => "cos",
                };
                write!(f, "{}({})", name, a)
            }
            Expr::Binary(op, a, b) => {
                let symbol = match op {
                    BinaryOp::Plus => '+',
                    BinaryOp::Minus => '-',
                    BinaryOp::Times => '*',
                    BinaryOp::Div => '/',
                };
                write!(f, "({} {} {})", a, symbol, b)
            }
        }
    }
}
