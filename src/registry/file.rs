use std::{collections::BTreeMap, fmt, path::Path, sync::Arc};

use anyhow::{Context, Result};

use crate::error::PawprintError;

use super::{register, single_match, union_formats, Origin};

pub type FileReader<T> = Arc<dyn Fn(&Path) -> Result<T> + Send + Sync>;
pub type FileWriter<T> = Arc<dyn Fn(&T, &Path) -> Result<()> + Send + Sync>;
pub type FileIdentifier = Arc<dyn Fn(Origin, &Path) -> bool + Send + Sync>;

/// Readers, writers and identifiers for persisted representations of `T`,
/// keyed by format name.
pub struct ReadWriteRegistry<T> {
    readers: BTreeMap<String, FileReader<T>>,
    writers: BTreeMap<String, FileWriter<T>>,
    identifiers: BTreeMap<String, FileIdentifier>,
}

impl<T> ReadWriteRegistry<T> {
    pub fn new() -> Self {
        Self { readers: BTreeMap::new(), writers: BTreeMap::new(), identifiers: BTreeMap::new() }
    }

    pub fn register_reader<F>(&mut self, format: impl Into<String>, reader: F) -> &mut Self
    where
        F: Fn(&Path) -> Result<T> + Send + Sync + 'static,
    {
        register(&mut self.readers, format.into(), Arc::new(reader) as FileReader<T>, "reader");
        self
    }

    pub fn register_writer<F>(&mut self, format: impl Into<String>, writer: F) -> &mut Self
    where
        F: Fn(&T, &Path) -> Result<()> + Send + Sync + 'static,
    {
        register(&mut self.writers, format.into(), Arc::new(writer) as FileWriter<T>, "writer");
        self
    }

    pub fn register_identifier<F>(&mut self, format: impl Into<String>, identifier: F) -> &mut Self
    where
        F: Fn(Origin, &Path) -> bool + Send + Sync + 'static,
    {
        register(&mut self.identifiers, format.into(), Arc::new(identifier) as FileIdentifier, "identifier");
        self
    }

    pub fn unregister_reader(&mut self, format: &str) -> Option<FileReader<T>> { self.readers.remove(format) }

    pub fn unregister_writer(&mut self, format: &str) -> Option<FileWriter<T>> { self.writers.remove(format) }

    pub fn unregister_identifier(&mut self, format: &str) -> Option<FileIdentifier> { self.identifiers.remove(format) }

    /// Every format with at least one registered handler.
    pub fn formats(&self) -> Vec<&str> {
        union_formats([
            self.readers.keys().map(String::as_str).collect(),
            self.writers.keys().map(String::as_str).collect(),
            self.identifiers.keys().map(String::as_str).collect(),
        ])
    }

    /// The single format whose identifier accepts `path` and that can handle
    /// `origin`.
    pub fn identify_format(&self, origin: Origin, path: &Path) -> crate::error::Result<String> {
        let matches = self.identifiers.iter()
            .filter(|(format, _)| match origin {
                Origin::Read => self.readers.contains_key(*format),
                Origin::Write => self.writers.contains_key(*format),
            })
            .filter(|(_, identify)| identify(origin, path))
            .map(|(format, _)| format.as_str())
            .collect();
        single_match(origin, matches, || path.display().to_string())
    }

    /// Read `path` with `format`, or with the identified format if `None`.
    pub fn read(&self, path: &Path, format: Option<&str>) -> Result<T> {
        let format = match format {
            Some(f) => f.to_string(),
            None => self.identify_format(Origin::Read, path)?,
        };
        let reader = self.readers.get(&format)
            .ok_or_else(|| PawprintError::NoHandler { op: "reader", format: format.clone() })?;
        reader(path).with_context(|| format!("read {} as {format}", path.display()))
    }

    /// Write `value` to `path` with `format`, or with the identified format if `None`.
    pub fn write(&self, value: &T, path: &Path, format: Option<&str>) -> Result<()> {
        let format = match format {
            Some(f) => f.to_string(),
            None => self.identify_format(Origin::Write, path)?,
        };
        let writer = self.writers.get(&format)
            .ok_or_else(|| PawprintError::NoHandler { op: "writer", format: format.clone() })?;
        writer(value, path).with_context(|| format!("write {} as {format}", path.display()))
    }
}

impl<T> Default for ReadWriteRegistry<T> {
    fn default() -> Self { Self::new() }
}

impl<T> Clone for ReadWriteRegistry<T> {
    fn clone(&self) -> Self {
        Self {
            readers: self.readers.clone(),
            writers: self.writers.clone(),
            identifiers: self.identifiers.clone(),
        }
    }
}

impl<T> fmt::Debug for ReadWriteRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadWriteRegistry").field("formats", &self.formats()).finish()
    }
}
