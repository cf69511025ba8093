use serde::{Deserialize, Serialize};

use crate::coords::frame::{spherical, unit_vector, Frame};
use crate::error::{PawprintError, Result};
use crate::units::{Quantity, Unit};

/// A set of sky positions bound to a reference frame.
///
/// Longitudes and latitudes are stored in degrees, in the frame's own
/// component order (ra/dec, l/b or phi1/phi2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyCoord {
    frame: Frame,
    lon: Vec<f64>,
    lat: Vec<f64>,
}

impl SkyCoord {
    pub fn new(frame: Frame, lon: Vec<f64>, lat: Vec<f64>) -> Result<Self> {
        if lon.len() != lat.len() {
            let [lon_name, lat_name] = frame.component_names();
            return Err(PawprintError::invalid(format!(
                "{lon_name} and {lat_name} lengths differ ({} vs {})", lon.len(), lat.len()
            )));
        }
        Ok(Self { frame, lon, lat })
    }

    /// Build from `[lon, lat]` pairs in degrees.
    pub fn from_pairs(frame: Frame, pairs: &[[f64; 2]]) -> Self {
        let (lon, lat) = pairs.iter().map(|&[a, b]| (a, b)).unzip();
        Self { frame, lon, lat }
    }

    /// Build from angular quantities in any angle unit.
    pub fn from_quantities(frame: Frame, pairs: &[[Quantity; 2]]) -> Result<Self> {
        let mut lon = Vec::with_capacity(pairs.len());
        let mut lat = Vec::with_capacity(pairs.len());
        for [a, b] in pairs {
            lon.push(a.to_value(Unit::Degree)?);
            lat.push(b.to_value(Unit::Degree)?);
        }
        Ok(Self { frame, lon, lat })
    }

    /// A single position.
    pub fn scalar(frame: Frame, lon: f64, lat: f64) -> Self {
        Self { frame, lon: vec![lon], lat: vec![lat] }
    }

    #[inline] pub fn frame(&self) -> &Frame { &self.frame }

    #[inline] pub fn lon(&self) -> &[f64] { &self.lon }

    #[inline] pub fn lat(&self) -> &[f64] { &self.lat }

    #[inline] pub fn len(&self) -> usize { self.lon.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.lon.is_empty() }

    /// The `i`th position as `[lon, lat]`.
    pub fn get(&self, i: usize) -> Option<[f64; 2]> {
        Some([*self.lon.get(i)?, *self.lat.get(i)?])
    }

    /// All positions as `[lon, lat]` pairs.
    pub fn pairs(&self) -> Vec<[f64; 2]> {
        self.lon.iter().zip(&self.lat).map(|(&a, &b)| [a, b]).collect()
    }

    /// The same positions expressed in `target`.
    pub fn transform_to(&self, target: &Frame) -> Result<SkyCoord> {
        if &self.frame == target { return Ok(self.clone()) }

        let r = self.frame.rotation_to(target)?;
        let (lon, lat) = self.lon.iter().zip(&self.lat)
            .map(|(&lon, &lat)| {
                let (lon, lat) = spherical(&(r * unit_vector(lon, lat)));
                (target.wrap_longitude(lon), lat)
            })
            .unzip();

        Ok(SkyCoord { frame: target.clone(), lon, lat })
    }
}
