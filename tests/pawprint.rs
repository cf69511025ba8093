use anyhow::Context;
use pawprint::{
    BoxBounds, CMDFootprint, CmdFilter, CompositePMFootprint, Footprint, Frame, KeyedFootprints, PMFootprint, Pawprint,
    PawprintData, PawprintError, PhotometricAxis, PmVertices, ProperMotions, PolygonFootprint, Quantity, SkyCoord,
    SkyFootprint, StreamCatalog, Track, Unit, VertexData,
};
use serde_json::Value;

fn gd1_frame() -> Frame {
    Frame::great_circle(34.5, 29.7, 200.0).unwrap()
}

fn band(lo: f64, hi: f64) -> VertexData {
    VertexData::bare(&[[-20.0, lo], [-20.0, hi], [20.0, hi], [20.0, lo]])
}

fn sky_only() -> Pawprint {
    let data = PawprintData::new("GD-1", "v1", gd1_frame(), Quantity::deg(1.06), band(-0.5, 0.5), band(2.5, 3.5));
    Pawprint::new(data).unwrap()
}

fn full() -> Pawprint {
    let filter = CmdFilter::new(PhotometricAxis::mag("g-r", -0.5, 1.5), PhotometricAxis::mag("g", 14.0, 22.0));
    let center = SkyCoord::scalar(gd1_frame(), 0.0, 0.0);
    let data = PawprintData::new("GD-1", "v1", gd1_frame(), Quantity::deg(1.06), band(-0.5, 0.5), band(2.5, 3.5))
        .with_cmd("g_r", filter, VertexData::bare(&[[0.0, 22.0], [0.5, 14.0], [0.8, 14.0], [0.3, 22.0]]))
        .with_pm("main", PmVertices::new(VertexData::bare(&[[-9.0, -3.0], [-9.0, 0.0], [-5.0, 0.0], [-5.0, -3.0]]), center, true));
    Pawprint::new(data).unwrap()
}

#[test]
fn box_footprint_selects_inside_point() {
    let bounds = BoxBounds::new(Quantity::deg(0.0), Quantity::deg(10.0), Quantity::deg(-1.0), Quantity::deg(1.0));
    let fp = SkyFootprint::from_box(&bounds, Frame::Icrs).unwrap();

    let points = SkyCoord::from_pairs(Frame::Icrs, &[[5.0, 0.0], [20.0, 0.0]]);
    assert_eq!(fp.inside_footprint((&points).into()).unwrap(), vec![true, false]);
}

#[test]
fn box_footprint_answers_in_other_frames() {
    let bounds = BoxBounds::new(Quantity::deg(0.0), Quantity::deg(10.0), Quantity::deg(-1.0), Quantity::deg(1.0));
    let fp = SkyFootprint::from_box(&bounds, Frame::Icrs).unwrap();

    let galactic = SkyCoord::from_pairs(Frame::Icrs, &[[5.0, 0.0], [20.0, 0.0]]).transform_to(&Frame::Galactic).unwrap();
    assert_eq!(fp.inside_footprint((&galactic).into()).unwrap(), vec![true, false]);
}

#[test]
fn box_straddling_zero_ra_matches_in_every_frame() {
    let bounds = BoxBounds::new(Quantity::deg(-10.0), Quantity::deg(10.0), Quantity::deg(-1.0), Quantity::deg(1.0));
    let fp = SkyFootprint::from_box(&bounds, Frame::Icrs).unwrap();

    let icrs = SkyCoord::from_pairs(Frame::Icrs, &[[-5.0, 0.0]]);
    let galactic = icrs.transform_to(&Frame::Galactic).unwrap();
    assert_eq!(fp.inside_footprint((&icrs).into()).unwrap(), vec![true]);
    assert_eq!(fp.inside_footprint((&galactic).into()).unwrap(), vec![true]);
}

#[test]
fn composite_reflex_correction_needs_every_member() {
    let center = SkyCoord::scalar(Frame::Icrs, 150.0, 30.0);
    let bounds = |lo: f64, hi: f64| BoxBounds::new(
        Quantity::mas_per_yr(lo), Quantity::mas_per_yr(hi), Quantity::mas_per_yr(lo), Quantity::mas_per_yr(hi),
    );
    let a = PMFootprint::from_box(&bounds(0.0, 1.0), center.clone(), true).unwrap();
    let b = PMFootprint::from_box(&bounds(5.0, 6.0), center.clone(), false).unwrap();
    let composite = CompositePMFootprint::new(Frame::Icrs, None, [("a", a), ("b", b)]).unwrap();

    assert!(!composite.is_reflex_corrected());
    assert_eq!(composite.keys(), vec!["a", "b"]);

    let pms = ProperMotions::at(&center, &[[0.5, 0.5], [5.5, 5.5], [3.0, 3.0]]).unwrap();
    assert_eq!(composite.inside_footprint((&pms).into()).unwrap(), vec![true, true, false]);
}

#[test]
fn composite_rejects_foreign_frame() {
    let mut composite = CompositePMFootprint::empty(Frame::Icrs, Some("pm".into()));
    let galactic = PMFootprint::new(
        SkyCoord::scalar(Frame::Galactic, 10.0, 10.0),
        &[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]],
        false,
    ).unwrap();

    let err = composite.insert("gal".into(), galactic).unwrap_err();
    assert!(matches!(err, PawprintError::FrameMismatch { .. }));
    assert!(composite.is_empty());
}

#[test]
fn sky_only_pawprint_has_absent_sections() {
    let pawprint = sky_only();
    assert!(pawprint.cmd_filters().is_none());
    assert!(pawprint.cmdprint().is_none());
    assert!(pawprint.pmprint().is_none());
    assert_eq!(pawprint.skyprint().get("stream").unwrap().name(), Some("stream"));
    assert!(matches!(pawprint.skyprint().get("sideband"), Err(PawprintError::KeyNotFound(_))));

    let value = serde_json::to_value(pawprint.export()).unwrap();
    assert_eq!(value["cmd_filters"], Value::Null);
    assert_eq!(value["on_stream"]["cmd"], Value::Null);
    assert_eq!(value["on_stream"]["pm"], Value::Null);
    assert_eq!(value["pawprint_ID"], "v1");
    assert_eq!(value["on_stream"]["sky"]["footprint_type"], "sky");
}

#[test]
fn stream_and_background_split_the_sky() {
    let pawprint = sky_only();
    let points = SkyCoord::from_pairs(gd1_frame(), &[[0.0, 0.0], [0.0, 3.0], [0.0, 1.5]]);
    let stream = pawprint.skyprint().stream.inside_footprint((&points).into()).unwrap();
    let background = pawprint.skyprint().background.inside_footprint((&points).into()).unwrap();
    assert_eq!(stream, vec![true, false, false]);
    assert_eq!(background, vec![false, true, false]);
}

#[test]
fn cmd_vertices_without_filters_are_rejected() {
    let mut data = PawprintData::new("GD-1", "v1", gd1_frame(), Quantity::deg(1.0), band(-0.5, 0.5), band(2.5, 3.5));
    data.cmd_vertices = Some([("g_r".to_string(), band(14.0, 22.0))].into_iter().collect());
    assert!(matches!(Pawprint::new(data), Err(PawprintError::MissingField(f)) if f == "cmd_filters"));
}

#[test]
fn non_angular_width_is_rejected() {
    let data = PawprintData::new("GD-1", "v1", gd1_frame(), Quantity::mag(1.0), band(-0.5, 0.5), band(2.5, 3.5));
    assert!(matches!(Pawprint::new(data), Err(PawprintError::InvalidInput(_))));
}

#[test]
fn add_cmd_footprint_creates_then_replaces() {
    let mut pawprint = sky_only();
    let labels = || ["g-r".to_string(), "g".to_string()];
    let first = CMDFootprint::new(&[[0.0, 22.0], [0.5, 14.0], [0.8, 14.0]], [Unit::Magnitude; 2], labels()).unwrap();
    let second = CMDFootprint::new(&[[0.1, 21.0], [0.6, 15.0], [0.9, 15.0]], [Unit::Magnitude; 2], labels()).unwrap();

    let axes = || (PhotometricAxis::mag("g-r", -0.5, 1.5), PhotometricAxis::mag("g", 14.0, 22.0));
    let (color, magnitude) = axes();
    assert!(pawprint.add_cmd_footprint(first.clone(), color, magnitude, "g_r").is_none());
    assert_eq!(pawprint.cmd_filters().unwrap().len(), 1);

    let (color, magnitude) = axes();
    let replaced = pawprint.add_cmd_footprint(second.clone(), color, magnitude, "g_r");
    assert_eq!(replaced, Some(first));
    assert_eq!(pawprint.cmd_footprint("g_r").unwrap(), &second);
    assert_eq!(pawprint.cmdprint().unwrap().len(), 1);
}

#[test]
fn add_pm_footprint_creates_then_replaces() {
    let mut pawprint = sky_only();
    let fp = PMFootprint::new(SkyCoord::scalar(gd1_frame(), 0.0, 0.0), &[[0.0, 0.0], [0.0, 1.0], [1.0, 1.0]], false).unwrap();
    assert!(pawprint.add_pm_footprint(fp.clone(), "loose").is_none());
    assert!(pawprint.pm_footprint("loose").is_ok());
    assert!(matches!(pawprint.pm_footprint("tight"), Err(PawprintError::KeyNotFound(_))));

    let second = PMFootprint::new(SkyCoord::scalar(gd1_frame(), 0.0, 0.0), &[[0.0, 0.0], [0.0, 2.0], [2.0, 2.0]], false).unwrap();
    assert_eq!(pawprint.add_pm_footprint(second.clone(), "loose"), Some(fp));
    assert_eq!(pawprint.pm_footprint("loose").unwrap(), &second);
    assert_eq!(pawprint.pmprint().unwrap().len(), 1);
}

#[test]
fn full_pawprint_round_trips_through_tree() {
    let pawprint = full();
    let tree = pawprint.export();
    let rebuilt = Pawprint::from_tree(&tree).unwrap();

    assert_eq!(rebuilt.export(), tree);
    assert!(rebuilt.track().is_none());
    assert!(rebuilt.pm_footprint("main").unwrap().is_reflex_corrected());
    assert_eq!(rebuilt.cmd_footprint("g_r").unwrap().labels(), &["g-r".to_string(), "g".to_string()]);
    assert!(tree.off_stream.cmd.is_none());
    assert_eq!(rebuilt.pm_footprint("main").unwrap().path().len(), 4);
}

#[test]
fn tree_with_foreign_sky_frame_is_rejected() {
    let mut tree = sky_only().export();
    tree.stream_frame = Frame::Galactic;
    assert!(matches!(Pawprint::from_tree(&tree), Err(PawprintError::FrameMismatch { .. })));
}

struct MockCatalog;

impl StreamCatalog for MockCatalog {
    fn stream_frame(&self, stream_name: &str, _pawprint_id: &str) -> anyhow::Result<Frame> {
        match stream_name {
            "GD-1" => Ok(gd1_frame()),
            other => anyhow::bail!("unknown stream {other}"),
        }
    }

    fn track(&self, _stream_name: &str, _pawprint_id: &str) -> anyhow::Result<Track> {
        let phi1: Vec<f64> = (-20..=20).map(f64::from).collect();
        let phi2 = vec![0.0; phi1.len()];
        Ok(Track::new(SkyCoord::new(gd1_frame(), phi1, phi2)?))
    }

    fn track_coords(&self, track: &Track) -> anyhow::Result<SkyCoord> {
        track.downcast_ref::<SkyCoord>().cloned().context("not a mock track")
    }
}

#[test]
fn catalog_pawprint_doubles_recommended_width() {
    let pawprint = Pawprint::from_catalog(&MockCatalog, "GD-1", "pw1").unwrap();

    assert_eq!(pawprint.width().unit, Unit::Degree);
    assert!((pawprint.width().value - 1.06).abs() < 1e-12);
    assert!(pawprint.track().is_some());
    assert!(pawprint.cmdprint().is_none() && pawprint.pmprint().is_none());
    assert_eq!(pawprint.default_file_name("json"), "GD-1pw1.json");

    let points = SkyCoord::from_pairs(gd1_frame(), &[[0.0, 0.0], [0.0, 3.0], [0.0, 0.6], [25.0, 0.0]]);
    let stream = pawprint.skyprint().stream.inside_footprint((&points).into()).unwrap();
    let background = pawprint.skyprint().background.inside_footprint((&points).into()).unwrap();
    assert_eq!(stream, vec![true, false, false, false]);
    assert_eq!(background, vec![false, true, false, false]);
}

#[test]
fn catalog_errors_carry_context() {
    let err = Pawprint::from_catalog(&MockCatalog, "Orphan", "pw1").unwrap_err();
    assert_eq!(err.to_string(), "stream frame for Orphan pw1");
}
