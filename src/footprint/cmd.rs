use std::sync::LazyLock;

use polypath::ClosedPath;

use crate::coords::Frame;
use crate::error::{PawprintError, Result};
use crate::units::Unit;

use super::dispatch::{BoxBounds, DispatchTable, FromFormat, InputKind, VertexData};
use super::sky::unexpected;
use super::{export::FootprintExport, Footprint, PolygonFootprint, QueryPoints};

/// A polygon in a color-magnitude diagram. Not tied to any sky frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CMDFootprint {
    path: ClosedPath,
    units: [Unit; 2],
    labels: [String; 2],
    name: Option<String>,
}

/// Options for building a [`CMDFootprint`] through [`FromFormat`].
#[derive(Debug, Clone)]
pub struct CmdOptions {
    /// Axis units; taken from the input when it carries units, else magnitudes.
    pub units: Option<[Unit; 2]>,
    pub labels: [String; 2],
    pub name: Option<String>,
}

impl Default for CmdOptions {
    fn default() -> Self {
        Self { units: None, labels: ["color".into(), "magnitude".into()], name: None }
    }
}

impl CmdOptions {
    pub fn labeled(color: impl Into<String>, magnitude: impl Into<String>) -> Self {
        Self { labels: [color.into(), magnitude.into()], ..Self::default() }
    }

    pub fn in_units(mut self, units: [Unit; 2]) -> Self {
        self.units = Some(units);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl CMDFootprint {
    pub fn new(vertices: &[[f64; 2]], units: [Unit; 2], labels: [String; 2]) -> Result<Self> {
        let path = ClosedPath::new(vertices.iter().map(|&[x, y]| (x, y)))?;
        Ok(Self { path, units, labels, name: None })
    }

    /// Rectangle spanning the bounds; axis units are those of `min1` and `min2`.
    pub fn from_box(bounds: &BoxBounds, labels: [String; 2]) -> Result<Self> {
        let units = bounds.units();
        Self::new(&bounds.corners(units)?, units, labels)
    }

    /// Rebuild from a `cmd` export mapping.
    pub fn from_export(export: &FootprintExport) -> Result<Self> {
        match export {
            FootprintExport::Cmd { units, labels, vertices, name } => {
                Ok(Self::new(vertices, *units, labels.clone())?.with_name(name.clone()))
            }
            other => Err(other.mismatch("cmd")),
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[inline] pub fn units(&self) -> [Unit; 2] { self.units }

    #[inline] pub fn labels(&self) -> &[String; 2] { &self.labels }
}

impl Footprint for CMDFootprint {
    fn frame(&self) -> Option<&Frame> { None }

    fn name(&self) -> Option<&str> { self.name.as_deref() }

    fn inside_footprint(&self, points: QueryPoints<'_>) -> Result<Vec<bool>> {
        match points {
            QueryPoints::Local(pairs) => Ok(self.path.contains_pairs(pairs)),
            QueryPoints::Sky(c) => Err(no_frame(c.frame())),
            QueryPoints::ProperMotions(pm) => Err(no_frame(pm.frame())),
        }
    }

    fn export(&self) -> FootprintExport {
        FootprintExport::Cmd {
            units: self.units,
            labels: self.labels.clone(),
            vertices: self.path.to_pairs(),
            name: self.name.clone(),
        }
    }
}

impl PolygonFootprint for CMDFootprint {
    fn path(&self) -> &ClosedPath { &self.path }
}

fn no_frame(found: &Frame) -> PawprintError {
    PawprintError::UnsupportedFrame(format!("CMD footprints have no frame to transform {found} points into"))
}

// ---------------------------------------------------------------------------
// Construction handlers
// ---------------------------------------------------------------------------

fn from_array(data: &VertexData, options: &CmdOptions) -> Result<CMDFootprint> {
    let VertexData::Array(rows) = data else { return Err(unexpected(data)) };
    let units = options.units
        .or_else(|| rows.first().and_then(|[a, b]| Some([a.unit()?, b.unit()?])))
        .unwrap_or([Unit::Magnitude, Unit::Magnitude]);
    let vertices = VertexData::array_in(rows, units)?;
    Ok(CMDFootprint::new(&vertices, units, options.labels.clone())?.with_name(options.name.clone()))
}

fn from_bounds(data: &VertexData, options: &CmdOptions) -> Result<CMDFootprint> {
    let VertexData::Bounds(bounds) = data else { return Err(unexpected(data)) };
    let units = options.units.unwrap_or(bounds.units());
    let vertices = bounds.corners(units)?;
    Ok(CMDFootprint::new(&vertices, units, options.labels.clone())?.with_name(options.name.clone()))
}

impl FromFormat for CMDFootprint {
    type Options = CmdOptions;

    fn default_table() -> &'static DispatchTable<Self> {
        static TABLE: LazyLock<DispatchTable<CMDFootprint>> = LazyLock::new(|| {
            let mut table = DispatchTable::<CMDFootprint>::new();
            table
                .register(InputKind::UNIT_ARRAY, from_array)
                .register(InputKind::BARE_ARRAY, from_array)
                .register(InputKind::BOX_BOUNDS, from_bounds);
            table
        });
        &TABLE
    }
}
