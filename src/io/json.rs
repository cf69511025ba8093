use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::pawprint::{Pawprint, PawprintTree};
use crate::registry::{Origin, ReadWriteRegistry};

use super::fs::write_atomic;

pub const JSON_FORMAT: &str = "json";

#[tracing::instrument(level = "debug")]
pub fn read_json(path: &Path) -> Result<Pawprint> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("open {}", path.display()))?;
    let tree: PawprintTree = serde_json::from_str(&text)
        .with_context(|| format!("parse pawprint tree in {}", path.display()))?;
    Ok(Pawprint::from_tree(&tree)?)
}

/// Write pretty JSON to `path`; a directory gets the pawprint's default file name.
#[tracing::instrument(level = "debug", skip(pawprint), fields(stream = pawprint.stream_name()))]
pub fn write_json(pawprint: &Pawprint, path: &Path) -> Result<()> {
    let target: PathBuf = if path.is_dir() {
        path.join(pawprint.default_file_name(JSON_FORMAT))
    } else {
        path.to_path_buf()
    };
    let bytes = serde_json::to_vec_pretty(&pawprint.export()).context("serialize pawprint tree")?;
    write_atomic(&target, &bytes)?;
    tracing::debug!(target = %target.display(), bytes = bytes.len(), "wrote pawprint");
    Ok(())
}

pub fn identify_json(_origin: Origin, path: &Path) -> bool {
    path.extension().is_some_and(|e| e.eq_ignore_ascii_case(JSON_FORMAT))
}

pub(crate) fn register(registry: &mut ReadWriteRegistry<Pawprint>) {
    registry
        .register_reader(JSON_FORMAT, read_json)
        .register_writer(JSON_FORMAT, write_json)
        .register_identifier(JSON_FORMAT, identify_json);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifies_by_extension() {
        assert!(identify_json(Origin::Read, Path::new("gd1.json")));
        assert!(identify_json(Origin::Write, Path::new("dir/GD1.JSON")));
        assert!(!identify_json(Origin::Read, Path::new("gd1.asdf")));
        assert!(!identify_json(Origin::Read, Path::new("json")));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = read_json(Path::new("/nonexistent/pawprint.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/pawprint.json"));
    }
}
