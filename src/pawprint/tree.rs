use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coords::Frame;
use crate::footprint::FootprintExport;
use crate::units::Quantity;

use super::data::CmdFilter;

/// Persisted shape of a pawprint. Absent CMD/PM sections are `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PawprintTree {
    pub stream_name: String,
    #[serde(rename = "pawprint_ID")]
    pub pawprint_id: String,
    pub stream_frame: Frame,
    pub width: Quantity,
    pub cmd_filters: Option<BTreeMap<String, CmdFilter>>,
    pub on_stream: StreamSection,
    pub off_stream: StreamSection,
}

/// Footprints of one selection region (on or off stream).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSection {
    pub sky: FootprintExport,
    pub cmd: Option<BTreeMap<String, FootprintExport>>,
    pub pm: Option<BTreeMap<String, FootprintExport>>,
}

impl StreamSection {
    /// A section with only a sky footprint.
    pub fn sky_only(sky: FootprintExport) -> Self {
        Self { sky, cmd: None, pm: None }
    }
}
