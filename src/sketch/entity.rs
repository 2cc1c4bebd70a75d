//! Geometry entities
//!
//! Entities own the parameters the solver adjusts. The solver never looks at
//! their shape; it only walks their parameters through [`HasParams`], whose
//! visit order is fixed per kind because constraint schemas read the flattened
//! list positionally:
//!
//! | kind      | visit order                      |
//! |-----------|----------------------------------|
//! | `Point`   | x, y                             |
//! | `Segment` | a.x, a.y, b.x, b.y               |
//! | `Circle`  | c.x, c.y, r                      |
//! | `Arc`     | a.x, a.y, b.x, b.y, c.x, c.y     |

use std::fmt;

use crate::parameters::{Param, ParamRef};

/// Capability of enumerating owned parameters in a fixed order
pub trait HasParams {
    /// Call `f` once per owned parameter, children first in document order
    fn visit_params(&self, f: &mut dyn FnMut(&ParamRef));

    /// Collect the visited parameters into a vector
    fn params(&self) -> Vec<ParamRef> {
        let mut out = Vec::new();
        self.visit_params(&mut |p| out.push(p.clone()));
        out
    }
}

/// A point with two coordinate parameters
#[derive(Debug, Clone)]
pub struct Point {
    pub x: ParamRef,
    pub y: ParamRef,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Param::shared(x, "x"),
            y: Param::shared(y, "y"),
        }
    }

    /// Current coordinates
    pub fn position(&self) -> (f64, f64) {
        (self.x.value(), self.y.value())
    }

    /// Move the point by writing both parameters
    pub fn set_position(&self, x: f64, y: f64) {
        self.x.set(x);
        self.y.set(y);
    }

    /// Euclidean distance to another point at their current positions
    pub fn distance_to(&self, other: &Point) -> f64 {
        let (ax, ay) = self.position();
        let (bx, by) = other.position();
        (ax - bx).hypot(ay - by)
    }
}

impl HasParams for Point {
    fn visit_params(&self, f: &mut dyn FnMut(&ParamRef)) {
        f(&self.x);
        f(&self.y);
    }
}

/// A line segment between two end points
#[derive(Debug, Clone)]
pub struct Segment {
    pub a: Point,
    pub b: Point,
}

impl Segment {
    pub fn new(ax: f64, ay: f64, bx: f64, by: f64) -> Self {
        Self {
            a: Point::new(ax, ay),
            b: Point::new(bx, by),
        }
    }

    pub fn length(&self) -> f64 {
        self.a.distance_to(&self.b)
    }
}

impl HasParams for Segment {
    fn visit_params(&self, f: &mut dyn FnMut(&ParamRef)) {
        self.a.visit_params(f);
        self.b.visit_params(f);
    }
}

/// A circle given by its centre and radius
#[derive(Debug, Clone)]
pub struct Circle {
    pub c: Point,
    pub r: ParamRef,
}

impl Circle {
    pub fn new(cx: f64, cy: f64, r: f64) -> Self {
        Self {
            c: Point::new(cx, cy),
            r: Param::shared(r, "r"),
        }
    }

    pub fn radius(&self) -> f64 {
        self.r.value()
    }
}

impl HasParams for Circle {
    fn visit_params(&self, f: &mut dyn FnMut(&ParamRef)) {
        self.c.visit_params(f);
        f(&self.r);
    }
}

/// An arc from `a` to `b` around the centre `c`
#[derive(Debug, Clone)]
pub struct Arc {
    pub a: Point,
    pub b: Point,
    pub c: Point,
}

impl Arc {
    pub fn new(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Self {
        Self {
            a: Point::new(a.0, a.1),
            b: Point::new(b.0, b.1),
            c: Point::new(c.0, c.1),
        }
    }
}

impl HasParams for Arc {
    fn visit_params(&self, f: &mut dyn FnMut(&ParamRef)) {
        self.a.visit_params(f);
        self.b.visit_params(f);
        self.c.visit_params(f);
    }
}

/// Any geometry entity a layer can hold
#[derive(Debug, Clone)]
pub enum Entity {
    Point(Point),
    Segment(Segment),
    Circle(Circle),
    Arc(Arc),
}

impl Entity {
    /// Child entities sharing this entity's parameters, in document order
    pub fn children(&self) -> Vec<Entity> {
        match self {
            Entity::Point(_) => Vec::new(),
            Entity::Segment(s) => vec![Entity::Point(s.a.clone()), Entity::Point(s.b.clone())],
            Entity::Circle(c) => vec![Entity::Point(c.c.clone())],
            Entity::Arc(a) => vec![
                Entity::Point(a.a.clone()),
                Entity::Point(a.b.clone()),
                Entity::Point(a.c.clone()),
            ],
        }
    }

    /// Move every point of the entity by `(dx, dy)`; radii are unchanged
    pub fn translate(&self, dx: f64, dy: f64) {
        let shift = |p: &Point| {
            let (x, y) = p.position();
            p.set_position(x + dx, y + dy);
        };
        match self {
            Entity::Point(p) => shift(p),
            Entity::Segment(s) => {
                shift(&s.a);
                shift(&s.b);
            }
            Entity::Circle(c) => shift(&c.c),
            Entity::Arc(a) => {
                shift(&a.a);
                shift(&a.b);
                shift(&a.c);
            }
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Entity::Point(_) => "point",
            Entity::Segment(_) => "segment",
            Entity::Circle(_) => "circle",
            Entity::Arc(_) => "arc",
        }
    }

    pub fn as_point(&self) -> Option<&Point> {
        match self {
            Entity::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_segment(&self) -> Option<&Segment> {
        match self {
            Entity::Segment(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_circle(&self) -> Option<&Circle> {
        match self {
            Entity::Circle(c) => Some(c),
            _ => None,
        }
    }
}

impl HasParams for Entity {
    fn visit_params(&self, f: &mut dyn FnMut(&ParamRef)) {
        match self {
            Entity::Point(p) => p.visit_params(f),
            Entity::Segment(s) => s.visit_params(f),
            Entity::Circle(c) => c.visit_params(f),
            Entity::Arc(a) => a.visit_params(f),
        }
    }
}

impl From<Point> for Entity {
    fn from(p: Point) -> Self {
        Entity::Point(p)
    }
}

impl From<Segment> for Entity {
    fn from(s: Segment) -> Self {
        Entity::Segment(s)
    }
}

impl From<Circle> for Entity {
    fn from(c: Circle) -> Self {
        Entity::Circle(c)
    }
}

impl From<Arc> for Entity {
    fn from(a: Arc) -> Self {
        Entity::Arc(a)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind_name())?;
        let mut first = true;
        let mut result = Ok(());
        self.visit_params(&mut |p| {
            if result.is_ok() {
                result = if first {
                    write!(f, "{}", p.value())
                } else {
                    write!(f, ", {}", p.value())
                };
            }
            first = false;
        });
        result?;
        write!(f, ")")
    }
}
