//! Parameter definition and implementation
//!
//! A [`Param`] is a single scalar unknown of a sketch, such as the x coordinate
//! of a point. Geometry entities create and own their parameters; expressions,
//! equations and the solver hold shared [`ParamRef`] handles to them and only
//! ever read or write the value and the solver scratch fields.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

/// Id carried by a parameter that has not been inserted into an id list yet.
pub const UNASSIGNED_ID: i64 = -1;

/// Tag marking a parameter eliminated by substitution.
pub const VAR_SUBSTITUTED: u32 = 10001;

/// Shared handle to a parameter.
///
/// Identity is pointer identity: two handles refer to the same unknown if and
/// only if they point at the same [`Param`].
pub type ParamRef = Rc<Param>;

/// A named scalar unknown with solver scratch state
///
/// The scratch fields (`tag`, `known`, `substituted`) are reset at the start of
/// every solve and only mean something while a solve is running.
#[derive(Debug)]
pub struct Param {
    /// Id assigned by the id list the parameter was inserted into
    id: Cell<i64>,

    /// Current value of the parameter
    value: Cell<f64>,

    /// Display symbol
    symbol: String,

    /// Solver tag: 0 untouched, a pre-process group id, or [`VAR_SUBSTITUTED`]
    tag: Cell<u32>,

    /// Whether the value is fixed for the rest of the current solve
    known: Cell<bool>,

    /// Id of the surviving representative when substituted
    substituted: Cell<i64>,
}

impl Param {
    /// Create a new parameter with the given value and symbol
    ///
    /// # Arguments
    ///
    /// * `value` - Initial value of the parameter
    /// * `symbol` - Symbol used when displaying the parameter
    ///
    /// # Returns
    ///
    /// A new parameter with an unassigned id and cleared solver state.
    ///
    /// # Examples
    ///
    /// ```
    /// use geosolve_rs::parameters::parameter::{Param, UNASSIGNED_ID};
    ///
    /// let param = Param::new(3.5, "x");
    /// assert_eq!(param.value(), 3.5);
    /// assert_eq!(param.symbol(), "x");
    /// assert_eq!(param.id(), UNASSIGNED_ID);
    /// ```
    pub fn new(value: f64, symbol: &str) -> Self {
        Self {
            id: Cell::new(UNASSIGNED_ID),
            value: Cell::new(value),
            symbol: symbol.to_string(),
            tag: Cell::new(0),
            known: Cell::new(false),
            substituted: Cell::new(0),
        }
    }

    /// Create a new shared parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use geosolve_rs::parameters::parameter::Param;
    ///
    /// let x = Param::shared(1.0, "x");
    /// let alias = x.clone();
    /// alias.set(2.0);
    /// assert_eq!(x.value(), 2.0);
    /// ```
    pub fn shared(value: f64, symbol: &str) -> ParamRef {
        Rc::new(Self::new(value, symbol))
    }

    /// Create a new shared parameter with the default symbol `N`
    pub fn anonymous(value: f64) -> ParamRef {
        Self::shared(value, "N")
    }

    /// Get the id of the parameter
    pub fn id(&self) -> i64 {
        self.id.get()
    }

    pub(crate) fn assign_id(&self, id: i64) {
        self.id.set(id);
    }

    /// Forget the id assigned by a previous id list
    pub fn detach(&self) {
        self.id.set(UNASSIGNED_ID);
    }

    /// Get the current value of the parameter
    pub fn value(&self) -> f64 {
        self.value.get()
    }

    /// Set the value of the parameter
    pub fn set(&self, value: f64) {
        self.value.set(value);
    }

    /// Get the display symbol
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Get the solver tag
    pub fn tag(&self) -> u32 {
        self.tag.get()
    }

    /// Set the solver tag
    pub fn set_tag(&self, tag: u32) {
        self.tag.set(tag);
    }

    /// Whether the value is fixed for the rest of the current solve
    pub fn is_known(&self) -> bool {
        self.known.get()
    }

    /// Mark the value as fixed (or free) for the rest of the current solve
    pub fn set_known(&self, known: bool) {
        self.known.set(known);
    }

    /// Id of the representative this parameter was substituted by
    pub fn substituted(&self) -> i64 {
        self.substituted.get()
    }

    /// Record the representative this parameter is substituted by
    pub fn set_substituted(&self, id: i64) {
        self.substituted.set(id);
    }

    /// Whether this parameter was eliminated by substitution in the current solve
    pub fn is_substituted(&self) -> bool {
        self.tag.get() == VAR_SUBSTITUTED
    }

    /// Reset the per-solve state
    ///
    /// The tag is cleared separately through the owning id list.
    pub fn solver_init(&self) {
        self.known.set(false);
        self.substituted.set(0);
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol)
    }
}
