#![doc = "Pawprint public API: frame-aware polygon footprints for stellar-stream selections"]
mod catalog;
mod coords;
mod error;
mod footprint;
mod io;
mod pawprint;
mod registry;
mod units;

#[doc(inline)]
pub use coords::{Frame, ProperMotions, SkyCoord};

#[doc(inline)]
pub use error::{PawprintError, Result};

#[doc(inline)]
pub use units::{Dimension, Quantity, Unit};

#[doc(inline)]
pub use footprint::{
    BoxBounds, CMDFootprint, CmdOptions, CompositePMFootprint, DispatchTable, Footprint, FootprintExport, FromFormat,
    Handler, InputKind, KeyedFootprints, PMFootprint, PmOptions, PolygonFootprint, QueryPoints, RawValue,
    SkyFootprint, SkyOptions, VertexData,
};

#[doc(inline)]
pub use pawprint::{
    CmdFilter, Pawprint, PawprintData, PawprintTree, PhotometricAxis, PmVertices, SkyPrint, StreamSection, Track,
};

#[doc(inline)]
pub use registry::{
    ConvertIdentifier, ConvertReader, ConvertRegistry, ConvertWriter, FileIdentifier, FileReader, FileWriter, Origin,
    ReadWriteRegistry,
};

#[doc(inline)]
pub use io::{
    identify_json, identify_tree, pawprint_to_tree, read_json, tree_to_pawprint, write_json, PawprintRegistries,
    JSON_FORMAT, TREE_FORMAT,
};

#[doc(inline)]
pub use catalog::{recommended_stream_width, track_polygon, StreamCatalog, BACKGROUND_PHI2_OFFSET_DEG};

#[doc(inline)]
pub use polypath::{ClosedPath, FillRule, PathError};
