mod data;
mod tree;

use std::collections::BTreeMap;

use crate::coords::Frame;
use crate::error::{PawprintError, Result};
use crate::footprint::{
    CMDFootprint, CmdOptions, Footprint, FootprintExport, FromFormat, PMFootprint, PmOptions, SkyFootprint, SkyOptions,
    VertexData,
};
use crate::units::Quantity;

pub use data::{CmdFilter, PawprintData, PhotometricAxis, PmVertices, Track};
pub use tree::{PawprintTree, StreamSection};

/// The on-stream and background sky footprints.
#[derive(Debug, Clone, PartialEq)]
pub struct SkyPrint {
    pub stream: SkyFootprint,
    pub background: SkyFootprint,
}

impl SkyPrint {
    /// Look up by `"stream"` or `"background"`.
    pub fn get(&self, key: &str) -> Result<&SkyFootprint> {
        match key {
            "stream" => Ok(&self.stream),
            "background" => Ok(&self.background),
            other => Err(PawprintError::KeyNotFound(other.to_string())),
        }
    }
}

/// The selection polygons of one stream, in sky, CMD and proper-motion space.
///
/// CMD and PM maps are `None` until a section is supplied or a first
/// footprint is added; an absent map is distinct from an empty one.
#[derive(Debug, Clone)]
pub struct Pawprint {
    stream_name: String,
    pawprint_id: String,
    stream_frame: Frame,
    width: Quantity,
    skyprint: SkyPrint,
    cmd_filters: Option<BTreeMap<String, CmdFilter>>,
    cmdprint: Option<BTreeMap<String, CMDFootprint>>,
    pmprint: Option<BTreeMap<String, PMFootprint>>,
    track: Option<Track>,
}

impl Pawprint {
    #[tracing::instrument(skip_all, fields(stream = %data.stream_name, id = %data.pawprint_id))]
    pub fn new(data: PawprintData) -> Result<Self> {
        if !data.width.unit.is_angle() {
            return Err(PawprintError::invalid(format!("stream width must be an angle, got {}", data.width)));
        }

        let sky = |vertices: &VertexData, name: &str| {
            SkyFootprint::from_format(vertices, &SkyOptions::in_frame(data.stream_frame.clone()).named(name))
        };
        let skyprint = SkyPrint {
            stream: sky(&data.stream_vertices, "stream")?,
            background: sky(&data.background_vertices, "background")?,
        };

        let cmdprint = match (&data.cmd_filters, &data.cmd_vertices) {
            (None, None) => None,
            (None, Some(_)) => return Err(PawprintError::MissingField("cmd_filters".into())),
            (Some(filters), vertices) => {
                let mut prints = BTreeMap::new();
                for (name, filter) in filters {
                    let v = vertices.as_ref()
                        .and_then(|m| m.get(name))
                        .ok_or_else(|| PawprintError::MissingField(format!("cmd_vertices.{name}")))?;
                    let options = CmdOptions {
                        units: Some(filter.units()),
                        labels: filter.labels(),
                        name: Some(name.clone()),
                    };
                    prints.insert(name.clone(), CMDFootprint::from_format(v, &options)?);
                }
                Some(prints)
            }
        };

        let pmprint = match &data.pm_vertices {
            None => None,
            Some(sections) => {
                let mut prints = BTreeMap::new();
                for (name, pm) in sections {
                    let options = PmOptions::at(pm.center.clone())
                        .reflex_corrected(pm.is_reflex_corrected)
                        .named(name.clone());
                    prints.insert(name.clone(), PMFootprint::from_format(&pm.vertices, &options)?);
                }
                Some(prints)
            }
        };

        tracing::debug!(
            cmd = cmdprint.as_ref().map_or(0, BTreeMap::len),
            pm = pmprint.as_ref().map_or(0, BTreeMap::len),
            "built pawprint"
        );

        Ok(Self {
            stream_name: data.stream_name,
            pawprint_id: data.pawprint_id,
            stream_frame: data.stream_frame,
            width: data.width,
            skyprint,
            cmd_filters: data.cmd_filters,
            cmdprint,
            pmprint,
            track: data.track,
        })
    }

    /// Rebuild from the persisted tree. The track is not persisted and is absent.
    pub fn from_tree(tree: &PawprintTree) -> Result<Self> {
        if !tree.width.unit.is_angle() {
            return Err(PawprintError::invalid(format!("stream width must be an angle, got {}", tree.width)));
        }

        let stream = SkyFootprint::from_export(&tree.on_stream.sky)?;
        let background = SkyFootprint::from_export(&tree.off_stream.sky)?;
        for fp in [&stream, &background] {
            if fp.sky_frame() != &tree.stream_frame {
                return Err(PawprintError::frame_mismatch(&tree.stream_frame, fp.sky_frame()));
            }
        }

        let cmdprint = match &tree.on_stream.cmd {
            None => None,
            Some(section) => {
                let filters = tree.cmd_filters.as_ref()
                    .ok_or_else(|| PawprintError::MissingField("cmd_filters".into()))?;
                let mut prints = BTreeMap::new();
                for (name, export) in section {
                    if !filters.contains_key(name) {
                        return Err(PawprintError::MissingField(format!("cmd_filters.{name}")));
                    }
                    prints.insert(name.clone(), CMDFootprint::from_export(export)?);
                }
                Some(prints)
            }
        };

        let pmprint = tree.on_stream.pm.as_ref()
            .map(|section| {
                section.iter()
                    .map(|(name, export)| Ok((name.clone(), PMFootprint::from_export(export)?)))
                    .collect::<Result<BTreeMap<_, _>>>()
            })
            .transpose()?;

        Ok(Self {
            stream_name: tree.stream_name.clone(),
            pawprint_id: tree.pawprint_id.clone(),
            stream_frame: tree.stream_frame.clone(),
            width: tree.width,
            skyprint: SkyPrint { stream, background },
            cmd_filters: tree.cmd_filters.clone(),
            cmdprint,
            pmprint,
            track: None,
        })
    }

    /// Serialize to the persisted tree shape.
    pub fn export(&self) -> PawprintTree {
        PawprintTree {
            stream_name: self.stream_name.clone(),
            pawprint_id: self.pawprint_id.clone(),
            stream_frame: self.stream_frame.clone(),
            width: self.width,
            cmd_filters: self.cmd_filters.clone(),
            on_stream: StreamSection {
                sky: self.skyprint.stream.export(),
                cmd: export_map(&self.cmdprint),
                pm: export_map(&self.pmprint),
            },
            off_stream: StreamSection::sky_only(self.skyprint.background.export()),
        }
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Add or replace a named CMD footprint and its filter ranges, creating
    /// the CMD maps on first use. Returns the replaced footprint, if any.
    pub fn add_cmd_footprint(
        &mut self,
        footprint: CMDFootprint,
        color: PhotometricAxis,
        magnitude: PhotometricAxis,
        name: impl Into<String>,
    ) -> Option<CMDFootprint> {
        let name = name.into();
        self.cmd_filters.get_or_insert_with(BTreeMap::new)
            .insert(name.clone(), CmdFilter::new(color, magnitude));
        let old = self.cmdprint.get_or_insert_with(BTreeMap::new).insert(name.clone(), footprint);
        if old.is_some() {
            tracing::debug!(%name, "replaced CMD footprint");
        }
        old
    }

    /// Add or replace a named PM footprint, creating the PM map on first use.
    pub fn add_pm_footprint(&mut self, footprint: PMFootprint, name: impl Into<String>) -> Option<PMFootprint> {
        let name = name.into();
        let old = self.pmprint.get_or_insert_with(BTreeMap::new).insert(name.clone(), footprint);
        if old.is_some() {
            tracing::debug!(%name, "replaced PM footprint");
        }
        old
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    #[inline] pub fn stream_name(&self) -> &str { &self.stream_name }

    #[inline] pub fn pawprint_id(&self) -> &str { &self.pawprint_id }

    #[inline] pub fn stream_frame(&self) -> &Frame { &self.stream_frame }

    #[inline] pub fn width(&self) -> Quantity { self.width }

    #[inline] pub fn skyprint(&self) -> &SkyPrint { &self.skyprint }

    #[inline] pub fn cmd_filters(&self) -> Option<&BTreeMap<String, CmdFilter>> { self.cmd_filters.as_ref() }

    #[inline] pub fn cmdprint(&self) -> Option<&BTreeMap<String, CMDFootprint>> { self.cmdprint.as_ref() }

    #[inline] pub fn pmprint(&self) -> Option<&BTreeMap<String, PMFootprint>> { self.pmprint.as_ref() }

    #[inline] pub fn track(&self) -> Option<&Track> { self.track.as_ref() }

    pub fn cmd_footprint(&self, name: &str) -> Result<&CMDFootprint> {
        self.cmdprint.as_ref()
            .and_then(|m| m.get(name))
            .ok_or_else(|| PawprintError::KeyNotFound(name.to_string()))
    }

    pub fn pm_footprint(&self, name: &str) -> Result<&PMFootprint> {
        self.pmprint.as_ref()
            .and_then(|m| m.get(name))
            .ok_or_else(|| PawprintError::KeyNotFound(name.to_string()))
    }

    /// Attach or replace the track handle.
    pub fn set_track(&mut self, track: Track) { self.track = Some(track) }

    /// `{stream_name}{pawprint_ID}.{ext}`
    pub fn default_file_name(&self, ext: &str) -> String {
        format!("{}{}.{}", self.stream_name, self.pawprint_id, ext.trim_start_matches('.'))
    }
}

fn export_map<F: Footprint>(map: &Option<BTreeMap<String, F>>) -> Option<BTreeMap<String, FootprintExport>> {
    map.as_ref().map(|m| m.iter().map(|(k, fp)| (k.clone(), fp.export())).collect())
}
