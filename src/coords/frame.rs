use std::fmt;

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{PawprintError, Result};

/// Rotation from ICRS to Galactic cartesian axes (Hipparcos definition).
const ICRS_TO_GALACTIC: [[f64; 3]; 3] = [
    [-0.054_875_560_416_215_4, -0.873_437_090_234_885_0, -0.483_835_015_548_713_2],
    [0.494_109_427_875_583_7, -0.444_829_629_960_011_2, 0.746_982_244_497_218_9],
    [-0.867_666_149_019_004_7, -0.198_076_373_431_201_5, 0.455_983_776_175_066_9],
];

/// Poles closer than this (in sin(dec)) to the equator cannot fix the x-axis.
const EQUATORIAL_POLE_EPS: f64 = 1e-12;

/// A celestial reference frame, without any coordinate data attached.
///
/// Two frames are the same frame when their defining attributes are equal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Frame {
    /// International Celestial Reference System (ra, dec).
    Icrs,
    /// Galactic coordinates (l, b).
    Galactic,
    /// A stream-aligned frame (phi1, phi2) whose equator is the great circle
    /// with the given pole; phi1 = 0 lies on the meridian `ra0`. Angles in degrees.
    GreatCircle { pole_ra: f64, pole_dec: f64, ra0: f64 },
}

impl Frame {
    /// Build a great-circle frame, checking the pole can define the axes.
    pub fn great_circle(pole_ra: f64, pole_dec: f64, ra0: f64) -> Result<Frame> {
        let frame = Frame::GreatCircle { pole_ra, pole_dec, ra0 };
        frame.from_icrs()?;
        Ok(frame)
    }

    /// The great-circle frame through two ICRS points `[ra, dec]` (degrees),
    /// with phi1 = 0 at their midpoint.
    pub fn from_endpoints(a: [f64; 2], b: [f64; 2]) -> Result<Frame> {
        let (ua, ub) = (unit_vector(a[0], a[1]), unit_vector(b[0], b[1]));
        let pole = ua.cross(&ub);
        if pole.norm() < EQUATORIAL_POLE_EPS {
            return Err(PawprintError::InvalidFrame(
                "endpoints are identical or antipodal".into(),
            ));
        }
        let (pole_ra, pole_dec) = spherical(&pole);
        let (mid_ra, _) = spherical(&(ua + ub));
        Frame::great_circle(pole_ra.rem_euclid(360.0), pole_dec, mid_ra.rem_euclid(360.0))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Frame::Icrs => "icrs",
            Frame::Galactic => "galactic",
            Frame::GreatCircle { .. } => "great_circle",
        }
    }

    /// Names of the two angular components, in order.
    pub fn component_names(&self) -> [&'static str; 2] {
        match self {
            Frame::Icrs => ["ra", "dec"],
            Frame::Galactic => ["l", "b"],
            Frame::GreatCircle { .. } => ["phi1", "phi2"],
        }
    }

    /// Matrix `R` such that `v_frame = R * v_icrs` for cartesian unit vectors.
    pub fn from_icrs(&self) -> Result<Matrix3<f64>> {
        match *self {
            Frame::Icrs => Ok(Matrix3::identity()),
            Frame::Galactic => {
                let m = ICRS_TO_GALACTIC;
                Ok(Matrix3::new(
                    m[0][0], m[0][1], m[0][2],
                    m[1][0], m[1][1], m[1][2],
                    m[2][0], m[2][1], m[2][2],
                ))
            }
            Frame::GreatCircle { pole_ra, pole_dec, ra0 } => {
                if !(-90.0..=90.0).contains(&pole_dec) || !pole_ra.is_finite() || !ra0.is_finite() {
                    return Err(PawprintError::InvalidFrame(format!("{self}")));
                }
                let z = unit_vector(pole_ra, pole_dec);
                if z.z.abs() < EQUATORIAL_POLE_EPS {
                    return Err(PawprintError::InvalidFrame(format!(
                        "{self}: pole on the equator leaves the zero point undefined"
                    )));
                }
                // x lies in the ra0 meridian plane, orthogonal to the pole.
                let ra0 = ra0.to_radians();
                let mut x = Vector3::new(ra0.cos(), ra0.sin(), 0.0);
                x.z = -(z.x * x.x + z.y * x.y) / z.z;
                let x = x.normalize();
                let y = z.cross(&x);
                Ok(Matrix3::from_rows(&[x.transpose(), y.transpose(), z.transpose()]))
            }
        }
    }

    /// Rotation taking cartesian vectors in `self` to cartesian vectors in `target`.
    pub fn rotation_to(&self, target: &Frame) -> Result<Matrix3<f64>> {
        if self == target { return Ok(Matrix3::identity()) }
        Ok(target.from_icrs()? * self.from_icrs()?.transpose())
    }

    /// Wrap a longitude (degrees) into this frame's conventional range.
    pub fn wrap_longitude(&self, lon: f64) -> f64 {
        let wrapped = lon.rem_euclid(360.0);
        match self {
            Frame::GreatCircle { .. } if wrapped > 180.0 => wrapped - 360.0,
            _ => wrapped,
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frame::GreatCircle { pole_ra, pole_dec, ra0 } => {
                write!(f, "great_circle(pole=({pole_ra}, {pole_dec}), ra0={ra0})")
            }
            other => f.write_str(other.name()),
        }
    }
}

/// Cartesian unit vector of a (lon, lat) direction given in degrees.
pub(crate) fn unit_vector(lon: f64, lat: f64) -> Vector3<f64> {
    let (lon, lat) = (lon.to_radians(), lat.to_radians());
    Vector3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

/// (lon, lat) in degrees of a cartesian vector; lon in (-180, 180].
pub(crate) fn spherical(v: &Vector3<f64>) -> (f64, f64) {
    let norm = v.norm();
    if norm == 0.0 { return (0.0, 0.0) }
    let lat = (v.z / norm).clamp(-1.0, 1.0).asin();
    let lon = v.y.atan2(v.x);
    (lon.to_degrees(), lat.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn rotate(frame_from: &Frame, frame_to: &Frame, lon: f64, lat: f64) -> (f64, f64) {
        let r = frame_from.rotation_to(frame_to).unwrap();
        let (lon, lat) = spherical(&(r * unit_vector(lon, lat)));
        (frame_to.wrap_longitude(lon), lat)
    }

    #[test]
    fn galactic_center_and_pole() {
        let (ra, dec) = rotate(&Frame::Galactic, &Frame::Icrs, 0.0, 0.0);
        assert_relative_eq!(ra, 266.404_994_8, epsilon = 1e-6);
        assert_relative_eq!(dec, -28.936_174_0, epsilon = 1e-6);

        let (ra, dec) = rotate(&Frame::Galactic, &Frame::Icrs, 0.0, 90.0);
        assert_relative_eq!(ra, 192.859_48, epsilon = 1e-6);
        assert_relative_eq!(dec, 27.128_25, epsilon = 1e-6);
    }

    #[test]
    fn great_circle_with_celestial_pole_is_icrs() {
        let frame = Frame::great_circle(0.0, 90.0, 0.0).unwrap();
        let (phi1, phi2) = rotate(&Frame::Icrs, &frame, 30.0, 10.0);
        assert_relative_eq!(phi1, 30.0, epsilon = 1e-10);
        assert_relative_eq!(phi2, 10.0, epsilon = 1e-10);

        let (phi1, _) = rotate(&Frame::Icrs, &frame, 200.0, 0.0);
        assert_relative_eq!(phi1, -160.0, epsilon = 1e-10);
    }

    #[test]
    fn great_circle_matrix_is_orthonormal() {
        let frame = Frame::great_circle(34.5, 29.7, 200.0).unwrap();
        let r = frame.from_icrs().unwrap();
        assert_relative_eq!(r * r.transpose(), Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(r.determinant(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn pole_maps_to_phi2_ninety() {
        let frame = Frame::great_circle(34.5, 29.7, 200.0).unwrap();
        let (_, phi2) = rotate(&Frame::Icrs, &frame, 34.5, 29.7);
        assert_relative_eq!(phi2, 90.0, epsilon = 1e-8);
    }

    #[test]
    fn equatorial_pole_is_rejected() {
        let err = Frame::great_circle(10.0, 0.0, 0.0).unwrap_err();
        assert!(matches!(err, PawprintError::InvalidFrame(_)));
        assert!(Frame::great_circle(10.0, 95.0, 0.0).is_err());
    }

    #[test]
    fn endpoints_lie_on_the_equator() {
        let (a, b) = ([150.0, 10.0], [170.0, 30.0]);
        let frame = Frame::from_endpoints(a, b).unwrap();
        let (phi1_a, phi2_a) = rotate(&Frame::Icrs, &frame, a[0], a[1]);
        let (phi1_b, phi2_b) = rotate(&Frame::Icrs, &frame, b[0], b[1]);
        assert_relative_eq!(phi2_a, 0.0, epsilon = 1e-8);
        assert_relative_eq!(phi2_b, 0.0, epsilon = 1e-8);
        // Midpoint at phi1 = 0, endpoints symmetric about it.
        assert_relative_eq!(phi1_a, -phi1_b, epsilon = 1e-8);

        assert!(Frame::from_endpoints(a, a).is_err());
    }

    #[test]
    fn serde_round_trip() {
        let frame = Frame::great_circle(34.5, 29.7, 200.0).unwrap();
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.contains(r#""type":"great_circle""#));
        assert_eq!(serde_json::from_str::<Frame>(&json).unwrap(), frame);
        assert_eq!(serde_json::to_string(&Frame::Icrs).unwrap(), r#"{"type":"icrs"}"#);
    }
}
