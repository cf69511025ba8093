use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

use crate::pawprint::{Pawprint, PawprintTree};
use crate::registry::{ConvertRegistry, Origin};

pub const TREE_FORMAT: &str = "tree";

pub fn tree_to_pawprint(value: &Value) -> Result<Pawprint> {
    let tree = PawprintTree::deserialize(value).context("decode pawprint tree")?;
    Ok(Pawprint::from_tree(&tree)?)
}

pub fn pawprint_to_tree(pawprint: &Pawprint) -> Result<Value> {
    serde_json::to_value(pawprint.export()).context("encode pawprint tree")
}

/// A JSON object carrying the top-level pawprint keys.
pub fn identify_tree(_origin: Origin, value: &Value) -> bool {
    value.get("stream_name").is_some() && value.get("on_stream").is_some()
}

pub(crate) fn register(registry: &mut ConvertRegistry<Pawprint, Value>) {
    registry
        .register_reader(TREE_FORMAT, tree_to_pawprint)
        .register_writer(TREE_FORMAT, pawprint_to_tree)
        .register_identifier(TREE_FORMAT, identify_tree);
}
