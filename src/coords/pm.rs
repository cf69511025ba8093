use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::coords::{frame::Frame, sky::SkyCoord};
use crate::error::{PawprintError, Result};

/// Proper motions attached to sky positions.
///
/// Components are `mu_lon * cos(lat)` and `mu_lat` in mas/yr, along the
/// positions' frame axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProperMotions {
    positions: SkyCoord,
    pm_lon_coslat: Vec<f64>,
    pm_lat: Vec<f64>,
}

impl ProperMotions {
    pub fn new(positions: SkyCoord, pm_lon_coslat: Vec<f64>, pm_lat: Vec<f64>) -> Result<Self> {
        if pm_lon_coslat.len() != positions.len() || pm_lat.len() != positions.len() {
            return Err(PawprintError::invalid(format!(
                "expected {} proper motion pairs, got ({}, {})",
                positions.len(), pm_lon_coslat.len(), pm_lat.len()
            )));
        }
        Ok(Self { positions, pm_lon_coslat, pm_lat })
    }

    /// The same `[pm_lon_coslat, pm_lat]` pairs repeated at one position.
    pub fn at(center: &SkyCoord, pairs: &[[f64; 2]]) -> Result<Self> {
        let [lon, lat] = center.get(0)
            .ok_or_else(|| PawprintError::invalid("proper motion center has no position"))?;
        let n = pairs.len();
        let positions = SkyCoord::new(center.frame().clone(), vec![lon; n], vec![lat; n])?;
        let (pm1, pm2) = pairs.iter().map(|&[a, b]| (a, b)).unzip();
        Self::new(positions, pm1, pm2)
    }

    #[inline] pub fn frame(&self) -> &Frame { self.positions.frame() }

    #[inline] pub fn positions(&self) -> &SkyCoord { &self.positions }

    #[inline] pub fn len(&self) -> usize { self.positions.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.positions.is_empty() }

    /// Proper motion components as `[pm_lon_coslat, pm_lat]` pairs.
    pub fn pm_pairs(&self) -> Vec<[f64; 2]> {
        self.pm_lon_coslat.iter().zip(&self.pm_lat).map(|(&a, &b)| [a, b]).collect()
    }

    /// Rotate positions and tangent-plane velocities into `target`.
    pub fn transform_to(&self, target: &Frame) -> Result<ProperMotions> {
        if self.frame() == target { return Ok(self.clone()) }

        let r = self.frame().rotation_to(target)?;
        let positions = self.positions.transform_to(target)?;

        let mut pm1 = Vec::with_capacity(self.len());
        let mut pm2 = Vec::with_capacity(self.len());
        for i in 0..self.len() {
            let (lon, lat) = (self.positions.lon()[i], self.positions.lat()[i]);
            let (e_lon, e_lat) = tangent_basis(lon, lat);
            let v = r * (e_lon * self.pm_lon_coslat[i] + e_lat * self.pm_lat[i]);

            let (e_lon, e_lat) = tangent_basis(positions.lon()[i], positions.lat()[i]);
            pm1.push(v.dot(&e_lon));
            pm2.push(v.dot(&e_lat));
        }

        Ok(ProperMotions { positions, pm_lon_coslat: pm1, pm_lat: pm2 })
    }
}

/// Unit vectors along increasing longitude and latitude at (lon, lat) degrees.
fn tangent_basis(lon: f64, lat: f64) -> (Vector3<f64>, Vector3<f64>) {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    let e_lon = Vector3::new(-lon.sin(), lon.cos(), 0.0);
    let e_lat = Vector3::new(-lat.sin() * lon.cos(), -lat.sin() * lon.sin(), lat.cos());
    (e_lon, e_lat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn length_mismatch_is_rejected() {
        let pos = SkyCoord::from_pairs(Frame::Icrs, &[[0.0, 0.0], [1.0, 1.0]]);
        assert!(ProperMotions::new(pos, vec![1.0], vec![1.0, 2.0]).is_err());
    }

    #[test]
    fn total_proper_motion_is_preserved() {
        let pos = SkyCoord::from_pairs(Frame::Icrs, &[[10.0, 20.0], [200.0, -60.0]]);
        let pm = ProperMotions::new(pos, vec![3.0, -1.5], vec![-4.0, 2.0]).unwrap();
        let frame = Frame::great_circle(34.5, 29.7, 200.0).unwrap();
        let moved = pm.transform_to(&frame).unwrap();

        assert_eq!(moved.frame(), &frame);
        for (a, b) in pm.pm_pairs().iter().zip(moved.pm_pairs()) {
            assert_relative_eq!(a[0].hypot(a[1]), b[0].hypot(b[1]), epsilon = 1e-9);
        }
    }

    #[test]
    fn rotation_about_the_pole_keeps_components() {
        // Same pole, shifted zero point: a pure rotation in longitude.
        let pos = SkyCoord::from_pairs(Frame::Icrs, &[[30.0, 10.0]]);
        let pm = ProperMotions::new(pos, vec![2.0], vec![-1.0]).unwrap();
        let frame = Frame::great_circle(0.0, 90.0, 20.0).unwrap();
        let moved = pm.transform_to(&frame).unwrap();
        assert_relative_eq!(moved.positions().lon()[0], 10.0, epsilon = 1e-9);
        assert_relative_eq!(moved.pm_pairs()[0][0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(moved.pm_pairs()[0][1], -1.0, epsilon = 1e-9);
    }

    #[test]
    fn round_trip_through_galactic() {
        let pos = SkyCoord::from_pairs(Frame::Icrs, &[[150.0, 5.0]]);
        let pm = ProperMotions::new(pos, vec![-7.0], vec![0.5]).unwrap();
        let back = pm.transform_to(&Frame::Galactic).unwrap().transform_to(&Frame::Icrs).unwrap();
        assert_relative_eq!(back.pm_pairs()[0][0], -7.0, epsilon = 1e-9);
        assert_relative_eq!(back.pm_pairs()[0][1], 0.5, epsilon = 1e-9);
    }

    #[test]
    fn repeated_center() {
        let center = SkyCoord::scalar(Frame::Galactic, 5.0, 6.0);
        let pm = ProperMotions::at(&center, &[[1.0, 2.0], [3.0, 4.0]]).unwrap();
        assert_eq!(pm.len(), 2);
        assert_eq!(pm.positions().pairs(), vec![[5.0, 6.0], [5.0, 6.0]]);
        assert_eq!(pm.pm_pairs(), vec![[1.0, 2.0], [3.0, 4.0]]);
    }
}
