use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::{PawprintError, Result};

/// Physical dimension of a unit; conversions are only defined within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Angle,
    AngularVelocity,
    Photometric,
    Dimensionless,
}

/// The small set of units footprints are expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "deg")] Degree,
    #[serde(rename = "rad")] Radian,
    #[serde(rename = "arcmin")] Arcminute,
    #[serde(rename = "arcsec")] Arcsecond,
    #[serde(rename = "mas")] Milliarcsecond,
    #[serde(rename = "mas/yr")] MasPerYear,
    #[serde(rename = "arcsec/yr")] ArcsecPerYear,
    #[serde(rename = "deg/yr")] DegreePerYear,
    #[serde(rename = "mag")] Magnitude,
    #[serde(rename = "")] Dimensionless,
}

impl Unit {
    pub const ALL: [Unit; 10] = [
        Unit::Degree,
        Unit::Radian,
        Unit::Arcminute,
        Unit::Arcsecond,
        Unit::Milliarcsecond,
        Unit::MasPerYear,
        Unit::ArcsecPerYear,
        Unit::DegreePerYear,
        Unit::Magnitude,
        Unit::Dimensionless,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            Unit::Degree => "deg",
            Unit::Radian => "rad",
            Unit::Arcminute => "arcmin",
            Unit::Arcsecond => "arcsec",
            Unit::Milliarcsecond => "mas",
            Unit::MasPerYear => "mas/yr",
            Unit::ArcsecPerYear => "arcsec/yr",
            Unit::DegreePerYear => "deg/yr",
            Unit::Magnitude => "mag",
            Unit::Dimensionless => "",
        }
    }

    pub fn dimension(&self) -> Dimension {
        match self {
            Unit::Degree | Unit::Radian | Unit::Arcminute | Unit::Arcsecond | Unit::Milliarcsecond => Dimension::Angle,
            Unit::MasPerYear | Unit::ArcsecPerYear | Unit::DegreePerYear => Dimension::AngularVelocity,
            Unit::Magnitude => Dimension::Photometric,
            Unit::Dimensionless => Dimension::Dimensionless,
        }
    }

    /// Size of one unit in its dimension's base unit (deg, mas/yr, mag, 1).
    fn scale(&self) -> f64 {
        match self {
            Unit::Degree => 1.0,
            Unit::Radian => 180.0 / std::f64::consts::PI,
            Unit::Arcminute => 1.0 / 60.0,
            Unit::Arcsecond => 1.0 / 3600.0,
            Unit::Milliarcsecond => 1.0 / 3_600_000.0,
            Unit::MasPerYear => 1.0,
            Unit::ArcsecPerYear => 1e3,
            Unit::DegreePerYear => 3.6e6,
            Unit::Magnitude => 1.0,
            Unit::Dimensionless => 1.0,
        }
    }

    /// Convert `value` expressed in `self` into `target`.
    pub fn convert(&self, value: f64, target: Unit) -> Result<f64> {
        if self == &target { return Ok(value) }
        if self.dimension() != target.dimension() {
            return Err(PawprintError::UnitConversion { from: *self, to: target });
        }
        Ok(value * self.scale() / target.scale())
    }

    #[inline] pub fn is_angle(&self) -> bool { self.dimension() == Dimension::Angle }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Dimensionless => f.write_str("dimensionless"),
            other => f.write_str(other.to_str()),
        }
    }
}

impl FromStr for Unit {
    type Err = PawprintError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "deg" | "degree" | "degrees" => Ok(Unit::Degree),
            "rad" | "radian" | "radians" => Ok(Unit::Radian),
            "arcmin" => Ok(Unit::Arcminute),
            "arcsec" => Ok(Unit::Arcsecond),
            "mas" => Ok(Unit::Milliarcsecond),
            "mas/yr" | "mas / yr" => Ok(Unit::MasPerYear),
            "arcsec/yr" | "arcsec / yr" => Ok(Unit::ArcsecPerYear),
            "deg/yr" | "deg / yr" => Ok(Unit::DegreePerYear),
            "mag" => Ok(Unit::Magnitude),
            "" | "dimensionless" => Ok(Unit::Dimensionless),
            _ => Err(PawprintError::InvalidInput(format!("Unknown unit: {s}"))),
        }
    }
}

/// A value paired with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    #[inline] pub fn new(value: f64, unit: Unit) -> Self { Self { value, unit } }

    #[inline] pub fn deg(value: f64) -> Self { Self::new(value, Unit::Degree) }

    #[inline] pub fn mas_per_yr(value: f64) -> Self { Self::new(value, Unit::MasPerYear) }

    #[inline] pub fn mag(value: f64) -> Self { Self::new(value, Unit::Magnitude) }

    /// The numeric value expressed in `unit`.
    #[inline] pub fn to_value(&self, unit: Unit) -> Result<f64> { self.unit.convert(self.value, unit) }

    /// The same quantity re-expressed in `unit`.
    pub fn to(&self, unit: Unit) -> Result<Quantity> {
        Ok(Quantity::new(self.to_value(unit)?, unit))
    }
}

impl std::ops::Mul<f64> for Quantity {
    type Output = Quantity;

    fn mul(self, rhs: f64) -> Quantity { Quantity::new(self.value * rhs, self.unit) }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            Unit::Dimensionless => write!(f, "{}", self.value),
            unit => write!(f, "{} {}", self.value, unit.to_str()),
        }
    }
}
