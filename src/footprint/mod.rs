mod cmd;
mod composite;
mod dispatch;
mod export;
mod pm;
mod sky;

use polypath::ClosedPath;

use crate::coords::{Frame, ProperMotions, SkyCoord};
use crate::error::Result;

pub use cmd::{CMDFootprint, CmdOptions};
pub use composite::CompositePMFootprint;
pub use dispatch::{BoxBounds, DispatchTable, FromFormat, Handler, InputKind, RawValue, VertexData};
pub use export::FootprintExport;
pub use pm::{PMFootprint, PmOptions};
pub use sky::{SkyFootprint, SkyOptions};

/// Points handed to a containment test.
#[derive(Debug, Clone, Copy)]
pub enum QueryPoints<'a> {
    /// `[x, y]` pairs already in the footprint's local 2-D space.
    Local(&'a [[f64; 2]]),
    /// Frame-bound sky positions.
    Sky(&'a SkyCoord),
    /// Frame-bound proper motions (with their positions).
    ProperMotions(&'a ProperMotions),
}

impl<'a> From<&'a [[f64; 2]]> for QueryPoints<'a> {
    fn from(points: &'a [[f64; 2]]) -> Self { QueryPoints::Local(points) }
}

impl<'a> From<&'a SkyCoord> for QueryPoints<'a> {
    fn from(points: &'a SkyCoord) -> Self { QueryPoints::Sky(points) }
}

impl<'a> From<&'a ProperMotions> for QueryPoints<'a> {
    fn from(points: &'a ProperMotions) -> Self { QueryPoints::ProperMotions(points) }
}

impl QueryPoints<'_> {
    pub fn len(&self) -> usize {
        match self {
            QueryPoints::Local(p) => p.len(),
            QueryPoints::Sky(p) => p.len(),
            QueryPoints::ProperMotions(p) => p.len(),
        }
    }

    #[inline] pub fn is_empty(&self) -> bool { self.len() == 0 }
}

/// A region in one observational space that answers containment queries.
pub trait Footprint {
    /// Reference frame the region is defined in, if it has one.
    fn frame(&self) -> Option<&Frame>;

    fn name(&self) -> Option<&str>;

    /// One boolean per query point, in input order; boundary points are inside.
    fn inside_footprint(&self, points: QueryPoints<'_>) -> Result<Vec<bool>>;

    /// Serializable description sufficient to rebuild the footprint.
    fn export(&self) -> FootprintExport;
}

/// A footprint backed by a single polygon.
pub trait PolygonFootprint: Footprint {
    fn path(&self) -> &ClosedPath;

    /// Closed vertex ring as `[x, y]` pairs in local coordinates.
    fn vertices(&self) -> Vec<[f64; 2]> { self.path().to_pairs() }
}

/// Keyed, insertion-ordered collection of footprints.
pub trait KeyedFootprints {
    type Item;

    fn get(&self, key: &str) -> Result<&Self::Item>;

    /// Insert or replace `key`, returning the previous member.
    fn insert(&mut self, key: String, item: Self::Item) -> Result<Option<Self::Item>>;

    fn remove(&mut self, key: &str) -> Result<Self::Item>;

    fn contains_key(&self, key: &str) -> bool;

    fn keys(&self) -> Vec<&str>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool { self.len() == 0 }
}
