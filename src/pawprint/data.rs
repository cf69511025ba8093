use std::{any::Any, collections::BTreeMap, fmt, sync::Arc};

use serde::{Deserialize, Serialize};

use crate::coords::{Frame, SkyCoord};
use crate::footprint::VertexData;
use crate::units::{Quantity, Unit};

/// Opaque handle to an externally owned stream track.
///
/// Stored and handed back unmodified; never persisted.
#[derive(Clone)]
pub struct Track(Arc<dyn Any + Send + Sync>);

impl Track {
    pub fn new<T: Any + Send + Sync>(track: T) -> Self { Track(Arc::new(track)) }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> { self.0.downcast_ref::<T>() }
}

impl fmt::Debug for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("Track(..)") }
}

/// One photometric axis of a CMD selection: label, unit and range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhotometricAxis {
    pub label: String,
    pub unit: Unit,
    pub min: f64,
    pub max: f64,
}

impl PhotometricAxis {
    pub fn new(label: impl Into<String>, unit: Unit, min: f64, max: f64) -> Self {
        Self { label: label.into(), unit, min, max }
    }

    /// Magnitude-valued axis.
    pub fn mag(label: impl Into<String>, min: f64, max: f64) -> Self {
        Self::new(label, Unit::Magnitude, min, max)
    }
}

/// Color and magnitude ranges of one filter set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CmdFilter {
    pub color: PhotometricAxis,
    pub magnitude: PhotometricAxis,
}

impl CmdFilter {
    pub fn new(color: PhotometricAxis, magnitude: PhotometricAxis) -> Self {
        Self { color, magnitude }
    }

    #[inline] pub fn units(&self) -> [Unit; 2] { [self.color.unit, self.magnitude.unit] }

    pub fn labels(&self) -> [String; 2] { [self.color.label.clone(), self.magnitude.label.clone()] }
}

/// Raw proper-motion polygon input with its reference position.
#[derive(Debug, Clone)]
pub struct PmVertices {
    pub vertices: VertexData,
    pub center: SkyCoord,
    pub is_reflex_corrected: bool,
}

impl PmVertices {
    pub fn new(vertices: VertexData, center: SkyCoord, is_reflex_corrected: bool) -> Self {
        Self { vertices, center, is_reflex_corrected }
    }
}

/// Everything needed to build a [`Pawprint`](super::Pawprint).
#[derive(Debug, Clone)]
pub struct PawprintData {
    pub stream_name: String,
    pub pawprint_id: String,
    pub stream_frame: Frame,
    pub width: Quantity,
    pub stream_vertices: VertexData,
    pub background_vertices: VertexData,
    pub cmd_filters: Option<BTreeMap<String, CmdFilter>>,
    pub cmd_vertices: Option<BTreeMap<String, VertexData>>,
    pub pm_vertices: Option<BTreeMap<String, PmVertices>>,
    pub track: Option<Track>,
}

impl PawprintData {
    /// The mandatory sky part; CMD and PM sections start absent.
    pub fn new(
        stream_name: impl Into<String>,
        pawprint_id: impl Into<String>,
        stream_frame: Frame,
        width: Quantity,
        stream_vertices: VertexData,
        background_vertices: VertexData,
    ) -> Self {
        Self {
            stream_name: stream_name.into(),
            pawprint_id: pawprint_id.into(),
            stream_frame,
            width,
            stream_vertices,
            background_vertices,
            cmd_filters: None,
            cmd_vertices: None,
            pm_vertices: None,
            track: None,
        }
    }

    pub fn with_cmd(mut self, name: impl Into<String>, filter: CmdFilter, vertices: VertexData) -> Self {
        let name = name.into();
        self.cmd_filters.get_or_insert_with(BTreeMap::new).insert(name.clone(), filter);
        self.cmd_vertices.get_or_insert_with(BTreeMap::new).insert(name, vertices);
        self
    }

    pub fn with_pm(mut self, name: impl Into<String>, pm: PmVertices) -> Self {
        self.pm_vertices.get_or_insert_with(BTreeMap::new).insert(name.into(), pm);
        self
    }

    pub fn with_track(mut self, track: Track) -> Self {
        self.track = Some(track);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_downcasts() {
        let track = Track::new(vec![1.0_f64, 2.0]);
        assert_eq!(track.downcast_ref::<Vec<f64>>(), Some(&vec![1.0, 2.0]));
        assert!(track.downcast_ref::<String>().is_none());
        assert_eq!(format!("{track:?}"), "Track(..)");
    }

    #[test]
    fn filter_axes() {
        let filter = CmdFilter::new(PhotometricAxis::mag("g - r", 0.0, 1.0), PhotometricAxis::mag("g", 16.0, 22.0));
        assert_eq!(filter.units(), [Unit::Magnitude, Unit::Magnitude]);
        assert_eq!(filter.magnitude.max, 22.0);
        assert_eq!(filter.labels(), ["g - r".to_string(), "g".to_string()]);
    }

    #[test]
    fn builder_fills_both_cmd_maps() {
        let data = PawprintData::new(
            "GD-1", "pricewhelan2018", Frame::Icrs, Quantity::deg(1.0),
            VertexData::bare(&[]), VertexData::bare(&[]),
        )
        .with_cmd(
            "ms",
            CmdFilter::new(PhotometricAxis::mag("g - r", 0.0, 1.0), PhotometricAxis::mag("g", 16.0, 22.0)),
            VertexData::bare(&[[0.0, 16.0], [1.0, 16.0], [1.0, 22.0]]),
        );
        assert!(data.cmd_filters.as_ref().is_some_and(|m| m.contains_key("ms")));
        assert!(data.cmd_vertices.as_ref().is_some_and(|m| m.contains_key("ms")));
        assert!(data.pm_vertices.is_none());
    }
}
