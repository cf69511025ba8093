//! The external stream-track catalog, seen from the pawprint side.

use anyhow::{Context, Result};

use crate::coords::{Frame, SkyCoord};
use crate::error::PawprintError;
use crate::footprint::VertexData;
use crate::pawprint::{Pawprint, PawprintData, Track};
use crate::units::{Quantity, Unit};

/// Offset of the background polygon from the track, across the stream.
pub const BACKGROUND_PHI2_OFFSET_DEG: f64 = 3.0;

/// Source of stream frames and tracks.
pub trait StreamCatalog {
    fn stream_frame(&self, stream_name: &str, pawprint_id: &str) -> Result<Frame>;

    fn track(&self, stream_name: &str, pawprint_id: &str) -> Result<Track>;

    /// Track positions of a handle this catalog produced.
    fn track_coords(&self, track: &Track) -> Result<SkyCoord>;

    /// Polygon of total `width` around the track shifted by `phi2_offset`,
    /// in `frame`.
    fn sky_polygon(&self, track: &Track, frame: &Frame, width: Quantity, phi2_offset: Quantity) -> Result<VertexData> {
        let coords = self.track_coords(track)?;
        Ok(VertexData::Sky(track_polygon(&coords, frame, width, phi2_offset)?))
    }
}

/// Recommended half-selection width for a stream, by name.
pub fn recommended_stream_width(stream_name: &str) -> Quantity {
    let deg = if stream_name.contains("Jhelum") {
        if stream_name.contains("Jhelum-a") { 0.4 } else { 0.94 }
    } else if stream_name.contains("Fjorm") {
        0.9
    } else if stream_name.contains("Pal-5") {
        0.5
    } else if stream_name.contains("GD-1") {
        0.53
    } else if stream_name.contains("PS1-A") {
        0.45
    } else {
        1.0
    };
    Quantity::deg(deg)
}

/// Band of `width` centred `phi2_offset` off the track: the upper edge runs
/// along the track, the lower edge back.
pub fn track_polygon(track: &SkyCoord, frame: &Frame, width: Quantity, phi2_offset: Quantity) -> crate::error::Result<SkyCoord> {
    if track.len() < 2 {
        return Err(PawprintError::invalid(format!("a track needs at least 2 points, got {}", track.len())));
    }
    let half = width.to_value(Unit::Degree)? / 2.0;
    let offset = phi2_offset.to_value(Unit::Degree)?;

    let mut along = track.transform_to(frame)?.pairs();
    along.sort_by(|a, b| a[0].total_cmp(&b[0]));

    let upper = along.iter().map(|&[phi1, phi2]| [phi1, phi2 + offset + half]);
    let lower = along.iter().rev().map(|&[phi1, phi2]| [phi1, phi2 + offset - half]);
    Ok(SkyCoord::from_pairs(frame.clone(), &upper.chain(lower).collect::<Vec<_>>()))
}

impl Pawprint {
    /// Build the sky-only pawprint of a catalog stream: twice the recommended
    /// width, on the track and offset across it for the background.
    pub fn from_catalog(catalog: &impl StreamCatalog, stream_name: &str, pawprint_id: &str) -> Result<Pawprint> {
        let stream_frame = catalog.stream_frame(stream_name, pawprint_id)
            .with_context(|| format!("stream frame for {stream_name} {pawprint_id}"))?;
        let track = catalog.track(stream_name, pawprint_id)
            .with_context(|| format!("track for {stream_name} {pawprint_id}"))?;
        let width = recommended_stream_width(stream_name) * 2.0;

        let stream = catalog.sky_polygon(&track, &stream_frame, width, Quantity::deg(0.0))?;
        let background = catalog.sky_polygon(&track, &stream_frame, width, Quantity::deg(BACKGROUND_PHI2_OFFSET_DEG))?;
        tracing::debug!(stream_name, pawprint_id, %width, "building pawprint from catalog");

        let data = PawprintData::new(stream_name, pawprint_id, stream_frame, width, stream, background)
            .with_track(track);
        Ok(Pawprint::new(data)?)
    }
}
