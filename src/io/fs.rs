use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

/// Write-then-rename wrapper so a target is either the old or the complete new file.
pub(crate) struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    pub(crate) fn open(target: &Path) -> Result<Self> {
        let dir = match target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("create dir {}", dir.display()))?;
        let tmp = NamedTempFile::new_in(dir).context("create temp file")?;
        Ok(Self { target: target.to_path_buf(), tmp })
    }

    /// Sync and move the temp file over the target.
    pub(crate) fn finalize(self) -> Result<()> {
        self.tmp.as_file().sync_all().ok(); // best-effort
        let target = self.target;
        self.tmp.persist(&target)
            .with_context(|| format!("rename to {}", target.display()))?;
        if let Some(dir) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            let _ = File::open(dir).and_then(|f| f.sync_all());
        }
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.tmp.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.tmp.flush() }
}

/// Atomically replace `target` with `bytes`.
pub(crate) fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    let mut pending = PendingWrite::open(target)?;
    pending.write_all(bytes).with_context(|| format!("write {}", target.display()))?;
    pending.finalize()
}
