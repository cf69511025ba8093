use std::sync::LazyLock;

use polypath::ClosedPath;

use crate::coords::{Frame, SkyCoord};
use crate::error::{PawprintError, Result};
use crate::units::Unit;

use super::dispatch::{BoxBounds, DispatchTable, FromFormat, InputKind, VertexData};
use super::sky::unexpected;
use super::{export::FootprintExport, Footprint, PolygonFootprint, QueryPoints};

const MAS_PER_YR: [Unit; 2] = [Unit::MasPerYear, Unit::MasPerYear];

/// A polygon in proper-motion space (mas/yr) at a reference position.
///
/// The footprint's frame is the frame of its center.
#[derive(Debug, Clone, PartialEq)]
pub struct PMFootprint {
    path: ClosedPath,
    center: SkyCoord,
    is_reflex_corrected: bool,
    name: Option<String>,
}

/// Options for building a [`PMFootprint`] through [`FromFormat`].
#[derive(Debug, Clone, Default)]
pub struct PmOptions {
    pub center: Option<SkyCoord>,
    pub is_reflex_corrected: bool,
    pub name: Option<String>,
}

impl PmOptions {
    pub fn at(center: SkyCoord) -> Self {
        Self { center: Some(center), ..Self::default() }
    }

    pub fn reflex_corrected(mut self, corrected: bool) -> Self {
        self.is_reflex_corrected = corrected;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn required_center(&self) -> Result<&SkyCoord> {
        self.center.as_ref().ok_or_else(|| PawprintError::MissingField("center".into()))
    }
}

impl PMFootprint {
    /// Build from `[pm_lon_coslat, pm_lat]` vertices in mas/yr along the
    /// axes of `center`'s frame. `center` must hold exactly one position.
    pub fn new(center: SkyCoord, vertices: &[[f64; 2]], is_reflex_corrected: bool) -> Result<Self> {
        if center.len() != 1 {
            return Err(PawprintError::invalid(format!(
                "a proper motion center is a single position, got {}", center.len()
            )));
        }
        let path = ClosedPath::new(vertices.iter().map(|&[x, y]| (x, y)))?;
        Ok(Self { path, center, is_reflex_corrected, name: None })
    }

    /// Rectangle spanning the bounds, which must be angular velocities.
    pub fn from_box(bounds: &BoxBounds, center: SkyCoord, is_reflex_corrected: bool) -> Result<Self> {
        Self::new(center, &bounds.corners(MAS_PER_YR)?, is_reflex_corrected)
    }

    /// Rebuild from a `pm` export mapping.
    pub fn from_export(export: &FootprintExport) -> Result<Self> {
        match export {
            FootprintExport::Pm { frame, center, vertices, is_reflex_corrected, name } => {
                let center = SkyCoord::scalar(frame.clone(), center[0], center[1]);
                Ok(Self::new(center, vertices, *is_reflex_corrected)?.with_name(name.clone()))
            }
            other => Err(other.mismatch("pm")),
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[inline] pub fn center(&self) -> &SkyCoord { &self.center }

    #[inline] pub fn pm_frame(&self) -> &Frame { self.center.frame() }

    #[inline] pub fn is_reflex_corrected(&self) -> bool { self.is_reflex_corrected }
}

impl Footprint for PMFootprint {
    fn frame(&self) -> Option<&Frame> { Some(self.center.frame()) }

    fn name(&self) -> Option<&str> { self.name.as_deref() }

    fn inside_footprint(&self, points: QueryPoints<'_>) -> Result<Vec<bool>> {
        match points {
            QueryPoints::Local(pairs) => Ok(self.path.contains_pairs(pairs)),
            QueryPoints::ProperMotions(pm) => {
                Ok(self.path.contains_pairs(&pm.transform_to(self.pm_frame())?.pm_pairs()))
            }
            QueryPoints::Sky(_) => Err(PawprintError::UnsupportedInput(
                "sky positions without proper motions".into(),
            )),
        }
    }

    fn export(&self) -> FootprintExport {
        let center = self.center.get(0).unwrap_or([f64::NAN; 2]);
        FootprintExport::Pm {
            frame: self.pm_frame().clone(),
            center,
            vertices: self.path.to_pairs(),
            is_reflex_corrected: self.is_reflex_corrected,
            name: self.name.clone(),
        }
    }
}

impl PolygonFootprint for PMFootprint {
    fn path(&self) -> &ClosedPath { &self.path }
}

// ---------------------------------------------------------------------------
// Construction handlers
// ---------------------------------------------------------------------------

/// Proper motion vertices are rotated into the center's frame.
fn from_proper_motions(data: &VertexData, options: &PmOptions) -> Result<PMFootprint> {
    let VertexData::ProperMotions(pm) = data else { return Err(unexpected(data)) };
    let center = options.required_center()?.clone();
    let vertices = pm.transform_to(center.frame())?.pm_pairs();
    Ok(PMFootprint::new(center, &vertices, options.is_reflex_corrected)?.with_name(options.name.clone()))
}

/// Unit-carrying and bare arrays alike: bare numbers are mas/yr.
fn from_array(data: &VertexData, options: &PmOptions) -> Result<PMFootprint> {
    let VertexData::Array(rows) = data else { return Err(unexpected(data)) };
    let center = options.required_center()?.clone();
    let vertices = VertexData::array_in(rows, MAS_PER_YR)?;
    Ok(PMFootprint::new(center, &vertices, options.is_reflex_corrected)?.with_name(options.name.clone()))
}

fn from_bounds(data: &VertexData, options: &PmOptions) -> Result<PMFootprint> {
    let VertexData::Bounds(bounds) = data else { return Err(unexpected(data)) };
    let center = options.required_center()?.clone();
    Ok(PMFootprint::from_box(bounds, center, options.is_reflex_corrected)?.with_name(options.name.clone()))
}

impl FromFormat for PMFootprint {
    type Options = PmOptions;

    fn default_table() -> &'static DispatchTable<Self> {
        static TABLE: LazyLock<DispatchTable<PMFootprint>> = LazyLock::new(|| {
            let mut table = DispatchTable::<PMFootprint>::new();
            table
                .register(InputKind::PROPER_MOTIONS, from_proper_motions)
                .register(InputKind::UNIT_ARRAY, from_array)
                .register(InputKind::BARE_ARRAY, from_array)
                .register(InputKind::BOX_BOUNDS, from_bounds);
            table
        });
        &TABLE
    }
}
