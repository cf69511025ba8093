use ahash::AHashMap;

use crate::coords::{Frame, SkyCoord};
use crate::error::{PawprintError, Result};

use super::pm::PMFootprint;
use super::{export::FootprintExport, Footprint, KeyedFootprints, QueryPoints};

/// Named proper-motion footprints sharing one frame, in insertion order.
///
/// Every member's frame equals the composite's frame; inserts that would
/// break this fail and leave the collection unchanged.
#[derive(Debug, Clone)]
pub struct CompositePMFootprint {
    frame: Frame,
    name: Option<String>,
    index: AHashMap<String, usize>, // key -> position in `entries`
    entries: Vec<(String, PMFootprint)>,
}

impl CompositePMFootprint {
    /// An empty composite in `frame`.
    pub fn empty(frame: Frame, name: Option<String>) -> Self {
        Self { frame, name, index: AHashMap::new(), entries: Vec::new() }
    }

    /// Build from an initial batch; fails as a whole if any member's frame differs.
    pub fn new<I, K>(frame: Frame, name: Option<String>, members: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, PMFootprint)>,
        K: Into<String>,
    {
        let mut composite = Self::empty(frame, name);
        for (key, fp) in members {
            composite.insert(key.into(), fp)?;
        }
        Ok(composite)
    }

    /// Rebuild from a `composite_pm` export mapping.
    pub fn from_export(export: &FootprintExport) -> Result<Self> {
        let FootprintExport::CompositePm { frame, name, members } = export else {
            return Err(export.mismatch("composite_pm"));
        };
        let members = members.iter()
            .map(|(key, member)| Ok((key.clone(), PMFootprint::from_export(member)?)))
            .collect::<Result<Vec<_>>>()?;
        Self::new(frame.clone(), name.clone(), members)
    }

    #[inline] pub fn composite_frame(&self) -> &Frame { &self.frame }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PMFootprint)> {
        self.entries.iter().map(|(k, fp)| (k.as_str(), fp))
    }

    /// Center of each member, keyed and in insertion order.
    pub fn centers(&self) -> Vec<(&str, &SkyCoord)> {
        self.iter().map(|(k, fp)| (k, fp.center())).collect()
    }

    /// True when every member is reflex corrected (vacuously true when empty).
    pub fn is_reflex_corrected(&self) -> bool {
        self.entries.iter().all(|(_, fp)| fp.is_reflex_corrected())
    }
}

impl PartialEq for CompositePMFootprint {
    fn eq(&self, other: &Self) -> bool {
        self.frame == other.frame && self.name == other.name && self.entries == other.entries
    }
}

impl KeyedFootprints for CompositePMFootprint {
    type Item = PMFootprint;

    fn get(&self, key: &str) -> Result<&PMFootprint> {
        self.index.get(key)
            .map(|&i| &self.entries[i].1)
            .ok_or_else(|| PawprintError::KeyNotFound(key.to_string()))
    }

    fn insert(&mut self, key: String, fp: PMFootprint) -> Result<Option<PMFootprint>> {
        if fp.pm_frame() != &self.frame {
            tracing::warn!(%key, expected = %self.frame, found = %fp.pm_frame(), "rejected composite member");
            return Err(PawprintError::frame_mismatch(&self.frame, fp.pm_frame()));
        }
        match self.index.get(&key) {
            Some(&i) => Ok(Some(std::mem::replace(&mut self.entries[i].1, fp))),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, fp));
                Ok(None)
            }
        }
    }

    fn remove(&mut self, key: &str) -> Result<PMFootprint> {
        let i = self.index.remove(key)
            .ok_or_else(|| PawprintError::KeyNotFound(key.to_string()))?;
        let (_, fp) = self.entries.remove(i);
        for pos in self.index.values_mut() {
            if *pos > i { *pos -= 1 }
        }
        Ok(fp)
    }

    fn contains_key(&self, key: &str) -> bool { self.index.contains_key(key) }

    fn keys(&self) -> Vec<&str> { self.entries.iter().map(|(k, _)| k.as_str()).collect() }

    fn len(&self) -> usize { self.entries.len() }
}

impl Footprint for CompositePMFootprint {
    fn frame(&self) -> Option<&Frame> { Some(&self.frame) }

    fn name(&self) -> Option<&str> { self.name.as_deref() }

    /// Union of the members.
    fn inside_footprint(&self, points: QueryPoints<'_>) -> Result<Vec<bool>> {
        let local = match points {
            QueryPoints::Local(pairs) => pairs.to_vec(),
            QueryPoints::ProperMotions(pm) => pm.transform_to(&self.frame)?.pm_pairs(),
            QueryPoints::Sky(_) => {
                return Err(PawprintError::UnsupportedInput("sky positions without proper motions".into()));
            }
        };

        let mut inside = vec![false; local.len()];
        for (_, fp) in &self.entries {
            let member = fp.inside_footprint(QueryPoints::Local(&local))?;
            inside.iter_mut().zip(member).for_each(|(acc, hit)| *acc |= hit);
        }
        Ok(inside)
    }

    fn export(&self) -> FootprintExport {
        FootprintExport::CompositePm {
            frame: self.frame.clone(),
            name: self.name.clone(),
            members: self.entries.iter().map(|(k, fp)| (k.clone(), fp.export())).collect(),
        }
    }
}
