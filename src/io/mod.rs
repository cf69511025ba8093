mod fs;
mod json;
mod tree;

use std::path::Path;

use anyhow::Result;
use serde_json::Value;

use crate::pawprint::Pawprint;
use crate::registry::{ConvertRegistry, ReadWriteRegistry};

pub use json::{identify_json, read_json, write_json, JSON_FORMAT};
pub use tree::{identify_tree, pawprint_to_tree, tree_to_pawprint, TREE_FORMAT};

/// The file I/O and conversion registries pawprints are read and written through.
#[derive(Debug, Clone, Default)]
pub struct PawprintRegistries {
    pub files: ReadWriteRegistry<Pawprint>,
    pub convert: ConvertRegistry<Pawprint, Value>,
}

impl PawprintRegistries {
    /// Empty registries; nothing can be read or written until plugins register.
    pub fn new() -> Self { Self::default() }

    /// Registries with the built-in `json` file format and `tree` conversion.
    pub fn with_defaults() -> Self {
        let mut registries = Self::new();
        json::register(&mut registries.files);
        tree::register(&mut registries.convert);
        registries
    }
}

impl Pawprint {
    /// Read a pawprint file, identifying the format from the path if `format` is `None`.
    pub fn read(registries: &PawprintRegistries, path: impl AsRef<Path>, format: Option<&str>) -> Result<Pawprint> {
        registries.files.read(path.as_ref(), format)
    }

    pub fn write(&self, registries: &PawprintRegistries, path: impl AsRef<Path>, format: Option<&str>) -> Result<()> {
        registries.files.write(self, path.as_ref(), format)
    }

    /// Build from an in-memory representation, identifying its format if `None`.
    pub fn from_format(registries: &PawprintRegistries, obj: &Value, format: Option<&str>) -> Result<Pawprint> {
        registries.convert.from_format(obj, format)
    }

    pub fn to_format(&self, registries: &PawprintRegistries, format: &str) -> Result<Value> {
        registries.convert.to_format(self, format)
    }
}
