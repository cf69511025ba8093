use std::{any::Any, borrow::Cow, fmt, sync::Arc};

use ahash::AHashMap;

use crate::coords::{ProperMotions, SkyCoord};
use crate::error::{PawprintError, Result};
use crate::units::{Quantity, Unit};

// ---------------------------------------------------------------------------
// Input data
// ---------------------------------------------------------------------------

/// One element of a raw vertex array.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawValue {
    Bare(f64),
    Quantity(Quantity),
}

impl RawValue {
    /// The value in `unit`; bare numbers are taken to already be in it.
    pub fn value_in(&self, unit: Unit) -> Result<f64> {
        match self {
            RawValue::Bare(v) => Ok(*v),
            RawValue::Quantity(q) => q.to_value(unit),
        }
    }

    #[inline] pub fn unit(&self) -> Option<Unit> {
        match self {
            RawValue::Bare(_) => None,
            RawValue::Quantity(q) => Some(q.unit),
        }
    }
}

impl From<f64> for RawValue {
    fn from(v: f64) -> Self { RawValue::Bare(v) }
}

impl From<Quantity> for RawValue {
    fn from(q: Quantity) -> Self { RawValue::Quantity(q) }
}

/// Axis-aligned bounds `[min1, max1] x [min2, max2]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxBounds {
    pub min1: Quantity,
    pub max1: Quantity,
    pub min2: Quantity,
    pub max2: Quantity,
}

impl BoxBounds {
    pub fn new(min1: Quantity, max1: Quantity, min2: Quantity, max2: Quantity) -> Self {
        Self { min1, max1, min2, max2 }
    }

    /// Units of the lower bounds, one per axis.
    #[inline] pub fn units(&self) -> [Unit; 2] { [self.min1.unit, self.min2.unit] }

    /// Rectangle corners in `units`, traversed
    /// (min1,min2), (min1,max2), (max1,max2), (max1,min2).
    pub fn corners(&self, units: [Unit; 2]) -> Result<Vec<[f64; 2]>> {
        let (mn1, mx1) = (self.min1.to_value(units[0])?, self.max1.to_value(units[0])?);
        let (mn2, mx2) = (self.min2.to_value(units[1])?, self.max2.to_value(units[1])?);
        Ok(vec![[mn1, mn2], [mn1, mx2], [mx1, mx2], [mx1, mn2]])
    }
}

/// Tagged vertex input for `from_format` constructors.
#[derive(Clone)]
pub enum VertexData {
    Sky(SkyCoord),
    ProperMotions(ProperMotions),
    /// Two-column raw array; elements are bare numbers or quantities.
    Array(Vec<[RawValue; 2]>),
    Bounds(BoxBounds),
    /// Extension input, resolved by a handler registered for `kind`.
    Custom { kind: InputKind, payload: Arc<dyn Any + Send + Sync> },
}

impl VertexData {
    /// A raw array of bare numbers.
    pub fn bare(pairs: &[[f64; 2]]) -> Self {
        VertexData::Array(pairs.iter().map(|&[a, b]| [a.into(), b.into()]).collect())
    }

    /// A raw array where every element carries a unit.
    pub fn quantities(pairs: &[[Quantity; 2]]) -> Self {
        VertexData::Array(pairs.iter().map(|&[a, b]| [a.into(), b.into()]).collect())
    }

    /// Classify the input. Arrays mixing bare numbers and quantities are ambiguous.
    pub fn kind(&self) -> Result<InputKind> {
        Ok(match self {
            VertexData::Sky(_) => InputKind::SKY_COORDS,
            VertexData::ProperMotions(_) => InputKind::PROPER_MOTIONS,
            VertexData::Bounds(_) => InputKind::BOX_BOUNDS,
            VertexData::Custom { kind, .. } => kind.clone(),
            VertexData::Array(rows) => {
                let with_units = rows.iter().flatten().filter(|v| v.unit().is_some()).count();
                match with_units {
                    0 => InputKind::BARE_ARRAY,
                    n if n == rows.len() * 2 => InputKind::UNIT_ARRAY,
                    _ => return Err(PawprintError::AmbiguousUnits),
                }
            }
        })
    }

    /// Convert a raw array into `units`, taking bare numbers as already in them.
    pub(crate) fn array_in(rows: &[[RawValue; 2]], units: [Unit; 2]) -> Result<Vec<[f64; 2]>> {
        rows.iter()
            .map(|[a, b]| Ok([a.value_in(units[0])?, b.value_in(units[1])?]))
            .collect()
    }
}

impl fmt::Debug for VertexData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VertexData::Sky(c) => f.debug_tuple("Sky").field(c).finish(),
            VertexData::ProperMotions(p) => f.debug_tuple("ProperMotions").field(p).finish(),
            VertexData::Array(rows) => f.debug_tuple("Array").field(rows).finish(),
            VertexData::Bounds(b) => f.debug_tuple("Bounds").field(b).finish(),
            VertexData::Custom { kind, .. } => f.debug_struct("Custom").field("kind", kind).finish_non_exhaustive(),
        }
    }
}

/// Name of an input shape; the key of a dispatch table.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InputKind(Cow<'static, str>);

impl InputKind {
    pub const SKY_COORDS: InputKind = InputKind(Cow::Borrowed("sky_coords"));
    pub const PROPER_MOTIONS: InputKind = InputKind(Cow::Borrowed("proper_motions"));
    pub const UNIT_ARRAY: InputKind = InputKind(Cow::Borrowed("unit_array"));
    pub const BARE_ARRAY: InputKind = InputKind(Cow::Borrowed("bare_array"));
    pub const BOX_BOUNDS: InputKind = InputKind(Cow::Borrowed("box_bounds"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self { InputKind(name.into()) }

    #[inline] pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

// ---------------------------------------------------------------------------
// Dispatch table
// ---------------------------------------------------------------------------

/// A constructor for one input kind.
pub type Handler<F> = Arc<dyn Fn(&VertexData, &<F as FromFormat>::Options) -> Result<F> + Send + Sync>;

/// Footprint types that can be built from tagged vertex input.
pub trait FromFormat: Sized + 'static {
    /// Construction options (target frame, center, units, name, ...).
    type Options;

    /// Built-in handlers, created once.
    fn default_table() -> &'static DispatchTable<Self>;

    /// Build using the built-in handlers.
    fn from_format(data: &VertexData, options: &Self::Options) -> Result<Self> {
        Self::default_table().dispatch(data, options)
    }
}

/// Lookup table from input kind to constructor.
///
/// Extend a table by cloning it and registering new kinds; registering an
/// existing kind replaces its handler.
pub struct DispatchTable<F: FromFormat> {
    handlers: AHashMap<InputKind, Handler<F>>,
}

impl<F: FromFormat> DispatchTable<F> {
    pub fn new() -> Self {
        Self { handlers: AHashMap::new() }
    }

    pub fn register<H>(&mut self, kind: InputKind, handler: H) -> &mut Self
    where
        H: Fn(&VertexData, &F::Options) -> Result<F> + Send + Sync + 'static,
    {
        if self.handlers.insert(kind.clone(), Arc::new(handler)).is_some() {
            tracing::debug!(%kind, footprint = std::any::type_name::<F>(), "replaced dispatch handler");
        }
        self
    }

    pub fn unregister(&mut self, kind: &InputKind) -> Option<Handler<F>> {
        self.handlers.remove(kind)
    }

    #[inline] pub fn handles(&self, kind: &InputKind) -> bool { self.handlers.contains_key(kind) }

    /// Registered kinds, sorted by name.
    pub fn kinds(&self) -> Vec<&InputKind> {
        let mut kinds: Vec<_> = self.handlers.keys().collect();
        kinds.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        kinds
    }

    /// Classify `data` and run the matching handler.
    pub fn dispatch(&self, data: &VertexData, options: &F::Options) -> Result<F> {
        let kind = data.kind()?;
        let Some(handler) = self.handlers.get(&kind) else {
            return Err(PawprintError::UnsupportedInput(kind.to_string()));
        };
        tracing::debug!(%kind, footprint = std::any::type_name::<F>(), "dispatching constructor");
        handler(data, options)
    }
}

impl<F: FromFormat> Default for DispatchTable<F> {
    fn default() -> Self { Self::new() }
}

impl<F: FromFormat> Clone for DispatchTable<F> {
    fn clone(&self) -> Self {
        Self { handlers: self.handlers.clone() }
    }
}

impl<F: FromFormat> fmt::Debug for DispatchTable<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchTable").field("kinds", &self.kinds()).finish()
    }
}
