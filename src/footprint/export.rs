use serde::{Deserialize, Serialize};

use crate::coords::Frame;
use crate::error::{PawprintError, Result};
use crate::units::Unit;

/// Serializable form of a footprint, tagged by `footprint_type`.
///
/// Vertices are the closed ring in the footprint's local units: degrees for
/// sky footprints, mas/yr for proper-motion footprints and the footprint's own
/// axis units for CMD footprints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "footprint_type", rename_all = "snake_case")]
pub enum FootprintExport {
    Sky {
        frame: Frame,
        vertices: Vec<[f64; 2]>,
        name: Option<String>,
    },
    Pm {
        frame: Frame,
        /// Center position `[lon, lat]` in degrees, in `frame`.
        center: [f64; 2],
        vertices: Vec<[f64; 2]>,
        is_reflex_corrected: bool,
        name: Option<String>,
    },
    Cmd {
        units: [Unit; 2],
        labels: [String; 2],
        vertices: Vec<[f64; 2]>,
        name: Option<String>,
    },
    CompositePm {
        frame: Frame,
        name: Option<String>,
        members: Vec<(String, FootprintExport)>,
    },
}

impl FootprintExport {
    pub fn type_tag(&self) -> &'static str {
        match self {
            FootprintExport::Sky { .. } => "sky",
            FootprintExport::Pm { .. } => "pm",
            FootprintExport::Cmd { .. } => "cmd",
            FootprintExport::CompositePm { .. } => "composite_pm",
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            FootprintExport::Sky { name, .. }
            | FootprintExport::Pm { name, .. }
            | FootprintExport::Cmd { name, .. }
            | FootprintExport::CompositePm { name, .. } => name.as_deref(),
        }
    }

    pub(crate) fn mismatch(&self, expected: &'static str) -> PawprintError {
        PawprintError::ExportMismatch { expected, found: self.type_tag() }
    }

    /// Parse an export mapping from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| PawprintError::invalid(format!("footprint export: {e}")))
    }
}
