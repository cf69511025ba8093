use std::sync::LazyLock;

use polypath::ClosedPath;

use crate::coords::{Frame, SkyCoord};
use crate::error::{PawprintError, Result};
use crate::units::Unit;

use super::dispatch::{BoxBounds, DispatchTable, FromFormat, InputKind, VertexData};
use super::{export::FootprintExport, Footprint, PolygonFootprint, QueryPoints};

const DEGREES: [Unit; 2] = [Unit::Degree, Unit::Degree];

/// A polygon of sky positions, in degrees, in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyFootprint {
    path: ClosedPath,
    frame: Frame,
    name: Option<String>,
}

/// Options for building a [`SkyFootprint`] through [`FromFormat`].
#[derive(Debug, Clone, Default)]
pub struct SkyOptions {
    /// Frame of raw input; coordinate input is reprojected into it when set.
    pub frame: Option<Frame>,
    pub name: Option<String>,
}

impl SkyOptions {
    pub fn in_frame(frame: Frame) -> Self {
        Self { frame: Some(frame), name: None }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    fn required_frame(&self) -> Result<&Frame> {
        self.frame.as_ref().ok_or_else(|| PawprintError::MissingField("frame".into()))
    }
}

impl SkyFootprint {
    /// Build from `[lon, lat]` vertices in degrees in `frame`.
    pub fn new(frame: Frame, vertices: &[[f64; 2]]) -> Result<Self> {
        let path = ClosedPath::new(vertices.iter().map(|&[x, y]| (x, y)))?;
        Ok(Self { path, frame, name: None })
    }

    /// Build from frame-bound vertices, keeping their frame.
    pub fn from_coords(vertices: &SkyCoord) -> Result<Self> {
        Self::new(vertices.frame().clone(), &vertices.pairs())
    }

    /// Rectangle spanning the bounds, which must be angles.
    pub fn from_box(bounds: &BoxBounds, frame: Frame) -> Result<Self> {
        Self::new(frame, &bounds.corners(DEGREES)?)
    }

    /// Rebuild from a `sky` export mapping.
    pub fn from_export(export: &FootprintExport) -> Result<Self> {
        match export {
            FootprintExport::Sky { frame, vertices, name } => {
                Ok(Self::new(frame.clone(), vertices)?.with_name(name.clone()))
            }
            other => Err(other.mismatch("sky")),
        }
    }

    pub fn with_name(mut self, name: Option<String>) -> Self {
        self.name = name;
        self
    }

    #[inline] pub fn sky_frame(&self) -> &Frame { &self.frame }

    /// Test `[lon, lat]` pairs after wrapping each longitude into the 360°
    /// window centred on the polygon's longitude span.
    fn contains_wrapped(&self, mut pairs: Vec<[f64; 2]>) -> Vec<bool> {
        let bounds = self.path.bounds();
        let lo = (bounds.min().x + bounds.max().x) / 2.0 - 180.0;
        for pair in &mut pairs {
            pair[0] = lo + (pair[0] - lo).rem_euclid(360.0);
        }
        self.path.contains_pairs(&pairs)
    }

    /// Vertices as frame-bound coordinates (closed ring).
    pub fn coords(&self) -> SkyCoord {
        SkyCoord::from_pairs(self.frame.clone(), &self.path.to_pairs())
    }
}

impl Footprint for SkyFootprint {
    fn frame(&self) -> Option<&Frame> { Some(&self.frame) }

    fn name(&self) -> Option<&str> { self.name.as_deref() }

    fn inside_footprint(&self, points: QueryPoints<'_>) -> Result<Vec<bool>> {
        match points {
            QueryPoints::Local(pairs) => Ok(self.contains_wrapped(pairs.to_vec())),
            QueryPoints::Sky(coords) => {
                Ok(self.contains_wrapped(coords.transform_to(&self.frame)?.pairs()))
            }
            QueryPoints::ProperMotions(pm) => {
                self.inside_footprint(QueryPoints::Sky(pm.positions()))
            }
        }
    }

    fn export(&self) -> FootprintExport {
        FootprintExport::Sky {
            frame: self.frame.clone(),
            vertices: self.path.to_pairs(),
            name: self.name.clone(),
        }
    }
}

impl PolygonFootprint for SkyFootprint {
    fn path(&self) -> &ClosedPath { &self.path }
}

// ---------------------------------------------------------------------------
// Construction handlers
// ---------------------------------------------------------------------------

fn from_sky_coords(data: &VertexData, options: &SkyOptions) -> Result<SkyFootprint> {
    let VertexData::Sky(coords) = data else { return Err(unexpected(data)) };
    let fp = match &options.frame {
        Some(frame) => SkyFootprint::from_coords(&coords.transform_to(frame)?)?,
        None => SkyFootprint::from_coords(coords)?,
    };
    Ok(fp.with_name(options.name.clone()))
}

/// Unit-carrying and bare arrays alike: bare numbers are degrees.
fn from_array(data: &VertexData, options: &SkyOptions) -> Result<SkyFootprint> {
    let VertexData::Array(rows) = data else { return Err(unexpected(data)) };
    let frame = options.required_frame()?.clone();
    Ok(SkyFootprint::new(frame, &VertexData::array_in(rows, DEGREES)?)?.with_name(options.name.clone()))
}

fn from_bounds(data: &VertexData, options: &SkyOptions) -> Result<SkyFootprint> {
    let VertexData::Bounds(bounds) = data else { return Err(unexpected(data)) };
    let frame = options.required_frame()?.clone();
    Ok(SkyFootprint::from_box(bounds, frame)?.with_name(options.name.clone()))
}

pub(super) fn unexpected(data: &VertexData) -> PawprintError {
    let kind = data.kind().map(|k| k.to_string()).unwrap_or_else(|e| e.to_string());
    PawprintError::UnsupportedInput(kind)
}

impl FromFormat for SkyFootprint {
    type Options = SkyOptions;

    fn default_table() -> &'static DispatchTable<Self> {
        static TABLE: LazyLock<DispatchTable<SkyFootprint>> = LazyLock::new(|| {
            let mut table = DispatchTable::<SkyFootprint>::new();
            table
                .register(InputKind::SKY_COORDS, from_sky_coords)
                .register(InputKind::UNIT_ARRAY, from_array)
                .register(InputKind::BARE_ARRAY, from_array)
                .register(InputKind::BOX_BOUNDS, from_bounds);
            table
        });
        &TABLE
    }
}
