use kicadcut_communication::{
    open_output, CutPlan, CutProgram, OutputTarget, PlotterOption, PlotterSession,
};
use kicadcut_core::{Orientation, Point, Stroke};
use proptest::prelude::*;

const INIT: &[u8] = b"\x1b\x04\x1b\x05TG1\x03FN0\x03TB50,0\x03\\0,0\x03Z6096,6096\x03J1\x03TJ3\x03FC18,1,1\x03TJ3\x03FE0,1\x03";
const TEARDOWN: &[u8] = b"L0\x03\\0,0\x03M0,0\x03J0\x03FN0\x03TB50,0\x03\x1b\x05";

fn emitted_move(orientation: Orientation, x: f64, y: f64) -> String {
    let mut session = PlotterSession::new(Vec::new(), orientation, 0.0);
    session.begin_job().unwrap();
    session.move_to(x, y).unwrap();
    // the handshake has the same length in both orientations
    let bytes = session.into_inner();
    String::from_utf8(bytes[INIT.len()..].to_vec()).unwrap()
}

#[test]
fn test_complete_job_framing() {
    let mut session = PlotterSession::new(Vec::new(), Orientation::Portrait, 0.02);
    session
        .configure_all([
            PlotterOption::MediaSize(304.8, 304.8),
            PlotterOption::Offset(Point::new(30.0, 20.0)),
            PlotterOption::Matrix([1.0, 0.0, 0.0, 1.0]),
        ])
        .unwrap();
    session.begin_job().unwrap();

    let square = Stroke::new(vec![
        Point::new(0.0, 0.0),
        Point::new(2.0, 0.0),
        Point::new(2.0, 1.0),
        Point::new(0.0, 1.0),
    ]);
    let lines = square.edges();
    CutProgram::from_lists(&[2, 2], &[8, 30])
        .execute(&mut session, CutPlan::Lines(&lines), None)
        .unwrap();
    session.end_job().unwrap();

    let out = session.into_inner();
    assert!(out.starts_with(INIT));
    assert!(out.ends_with(TEARDOWN));

    let body = String::from_utf8_lossy(&out[INIT.len()..out.len() - TEARDOWN.len()]).into_owned();
    assert_eq!(body.matches("!2,1\x03").count(), 2);
    assert_eq!(body.matches("\x03M").count(), 8);
    assert_eq!(body.matches("\x03D").count(), 8);
    // first compensated cut starts 0.02 mm before the corner: (30 - 0.02) * 20
    assert!(body.contains("M599.600,400.000\x03D640.400,400.000\x03"));
}

#[test]
fn test_job_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stencil.gpgl");
    let writer = open_output(&OutputTarget::File(path.clone())).unwrap();

    let mut session = PlotterSession::new(writer, Orientation::Portrait, 0.0);
    session.begin_job().unwrap();
    session.end_job().unwrap();
    drop(session);

    let written = std::fs::read(&path).unwrap();
    assert_eq!(written.len(), INIT.len() + TEARDOWN.len());
}

proptest! {
    #[test]
    fn landscape_exchanges_emitted_coordinates(x in -100.0f64..400.0, y in -100.0f64..400.0) {
        let portrait = emitted_move(Orientation::Portrait, x, y);
        let landscape = emitted_move(Orientation::Landscape, x, y);

        let pair = |s: &str| -> (String, String) {
            let body = s.trim_start_matches('M').trim_end_matches('\u{3}');
            let (a, b) = body.split_once(',').unwrap();
            (a.to_string(), b.to_string())
        };
        let (px, py) = pair(&portrait);
        let (lx, ly) = pair(&landscape);
        prop_assert_eq!(px, ly);
        prop_assert_eq!(py, lx);
    }
}
