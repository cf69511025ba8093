//! Format-keyed dispatch tables for reading, writing and converting values.
//!
//! The registries know nothing about pawprints; I/O backends register
//! handlers against them under a format name.

mod convert;
mod file;

use std::collections::BTreeMap;

use crate::error::{PawprintError, Result};

pub use convert::{ConvertIdentifier, ConvertReader, ConvertRegistry, ConvertWriter};
pub use file::{FileIdentifier, FileReader, FileWriter, ReadWriteRegistry};

/// Direction of an identification query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Read,
    Write,
}

impl Origin {
    pub fn to_str(&self) -> &'static str {
        match self {
            Origin::Read => "read",
            Origin::Write => "write",
        }
    }
}

/// Insert a handler, logging when it replaces an existing one.
fn register<H>(table: &mut BTreeMap<String, H>, format: String, handler: H, what: &'static str) {
    if table.insert(format.clone(), handler).is_some() {
        tracing::debug!(%format, what, "replaced registered handler");
    } else {
        tracing::debug!(%format, what, "registered handler");
    }
}

/// Exactly one matching format, or an error naming what went wrong.
fn single_match(origin: Origin, matches: Vec<&str>, candidate: impl FnOnce() -> String) -> Result<String> {
    match matches.as_slice() {
        [] => Err(PawprintError::FormatNotFound(candidate())),
        [one] => {
            tracing::debug!(format = one, origin = origin.to_str(), "identified format");
            Ok(one.to_string())
        }
        many => Err(PawprintError::AmbiguousFormat {
            candidates: many.iter().map(|s| s.to_string()).collect(),
        }),
    }
}

/// All format names known to any of the tables, sorted and deduplicated.
fn union_formats<'a>(tables: impl IntoIterator<Item = Vec<&'a str>>) -> Vec<&'a str> {
    let mut names: Vec<&str> = tables.into_iter().flatten().collect();
    names.sort_unstable();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_match_outcomes() {
        assert_eq!(single_match(Origin::Write, vec!["json"], String::new).unwrap(), "json");
        assert!(matches!(
            single_match(Origin::Read, vec![], || "gd1.asdf".into()),
            Err(PawprintError::FormatNotFound(c)) if c == "gd1.asdf"
        ));
        assert!(matches!(
            single_match(Origin::Read, vec!["a", "b"], String::new),
            Err(PawprintError::AmbiguousFormat { candidates }) if candidates == ["a", "b"]
        ));
        assert_eq!(Origin::Write.to_str(), "write");
    }
}
