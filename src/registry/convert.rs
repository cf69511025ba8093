use std::{collections::BTreeMap, fmt, sync::Arc};

use anyhow::{Context, Result};

use crate::error::PawprintError;

use super::{register, single_match, union_formats, Origin};

pub type ConvertReader<T, R> = Arc<dyn Fn(&R) -> Result<T> + Send + Sync>;
pub type ConvertWriter<T, R> = Arc<dyn Fn(&T) -> Result<R> + Send + Sync>;
pub type ConvertIdentifier<R> = Arc<dyn Fn(Origin, &R) -> bool + Send + Sync>;

/// Conversions between `T` and in-memory representations `R`, keyed by
/// format name.
pub struct ConvertRegistry<T, R> {
    readers: BTreeMap<String, ConvertReader<T, R>>,
    writers: BTreeMap<String, ConvertWriter<T, R>>,
    identifiers: BTreeMap<String, ConvertIdentifier<R>>,
}

impl<T, R> ConvertRegistry<T, R> {
    pub fn new() -> Self {
        Self { readers: BTreeMap::new(), writers: BTreeMap::new(), identifiers: BTreeMap::new() }
    }

    pub fn register_reader<F>(&mut self, format: impl Into<String>, reader: F) -> &mut Self
    where
        F: Fn(&R) -> Result<T> + Send + Sync + 'static,
    {
        register(&mut self.readers, format.into(), Arc::new(reader) as ConvertReader<T, R>, "reader");
        self
    }

    pub fn register_writer<F>(&mut self, format: impl Into<String>, writer: F) -> &mut Self
    where
        F: Fn(&T) -> Result<R> + Send + Sync + 'static,
    {
        register(&mut self.writers, format.into(), Arc::new(writer) as ConvertWriter<T, R>, "writer");
        self
    }

    pub fn register_identifier<F>(&mut self, format: impl Into<String>, identifier: F) -> &mut Self
    where
        F: Fn(Origin, &R) -> bool + Send + Sync + 'static,
    {
        register(&mut self.identifiers, format.into(), Arc::new(identifier) as ConvertIdentifier<R>, "identifier");
        self
    }

    pub fn unregister_reader(&mut self, format: &str) -> Option<ConvertReader<T, R>> { self.readers.remove(format) }

    pub fn unregister_writer(&mut self, format: &str) -> Option<ConvertWriter<T, R>> { self.writers.remove(format) }

    pub fn unregister_identifier(&mut self, format: &str) -> Option<ConvertIdentifier<R>> {
        self.identifiers.remove(format)
    }

    pub fn formats(&self) -> Vec<&str> {
        union_formats([
            self.readers.keys().map(String::as_str).collect(),
            self.writers.keys().map(String::as_str).collect(),
            self.identifiers.keys().map(String::as_str).collect(),
        ])
    }

    /// The single readable format whose identifier accepts `obj`.
    pub fn identify_format(&self, obj: &R) -> crate::error::Result<String> {
        let matches = self.identifiers.iter()
            .filter(|(format, _)| self.readers.contains_key(*format))
            .filter(|(_, identify)| identify(Origin::Read, obj))
            .map(|(format, _)| format.as_str())
            .collect();
        single_match(Origin::Read, matches, || "in-memory object".to_string())
    }

    /// Build a `T` from `obj`, identifying the format if `None`.
    pub fn from_format(&self, obj: &R, format: Option<&str>) -> Result<T> {
        let format = match format {
            Some(f) => f.to_string(),
            None => self.identify_format(obj)?,
        };
        let reader = self.readers.get(&format)
            .ok_or_else(|| PawprintError::NoHandler { op: "reader", format: format.clone() })?;
        reader(obj).with_context(|| format!("convert from {format}"))
    }

    /// Convert `value` into the named format.
    pub fn to_format(&self, value: &T, format: &str) -> Result<R> {
        let writer = self.writers.get(format)
            .ok_or_else(|| PawprintError::NoHandler { op: "writer", format: format.to_string() })?;
        writer(value).with_context(|| format!("convert to {format}"))
    }
}

impl<T, R> Default for ConvertRegistry<T, R> {
    fn default() -> Self { Self::new() }
}

impl<T, R> Clone for ConvertRegistry<T, R> {
    fn clone(&self) -> Self {
        Self {
            readers: self.readers.clone(),
            writers: self.writers.clone(),
            identifiers: self.identifiers.clone(),
        }
    }
}

impl<T, R> fmt::Debug for ConvertRegistry<T, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConvertRegistry").field("formats", &self.formats()).finish()
    }
}
