//! Integration tests for the live measurement pipeline.
//!
//! These tests drive `IpdMeter` end to end:
//! - Landmark frame → iris circles → robust streams → distance and IPD
//! - Bilateral gating and outlier warnings
//! - Determinism across independent runs
//!
//! Run with: `cargo test --test measurement_integration`

use std::sync::Arc;

use ipdmeter::estimate::DistanceMode;
use ipdmeter::observation::{indices, read_recording, write_frame, LandmarkFrame};
use ipdmeter::pipeline::{IpdMeter, MeasurementReport, MeasurementWarning, MeterConfig};
use ipdmeter::store::MemoryStore;

// ============================================================================
// Helper Functions
// ============================================================================

const WIDTH: u32 = 1280;
const HEIGHT: u32 = 720;

/// Build a frame whose iris rings have the given pixel diameters and whose
/// iris centers are `ipd_px` apart.
fn make_frame(left_px: f64, right_px: f64, ipd_px: f64) -> LandmarkFrame {
    let mut landmarks = vec![[0.5, 0.5]; indices::REQUIRED_LANDMARKS];
    let mut place = |ring: [usize; 4], cx: f64, diameter: f64| {
        let r = diameter / 2.0;
        let offsets = [(r, 0.0), (0.0, r), (-r, 0.0), (0.0, -r)];
        for (idx, (dx, dy)) in ring.iter().zip(offsets) {
            landmarks[*idx] = [(cx + dx) / WIDTH as f64, (360.0 + dy) / HEIGHT as f64];
        }
    };
    place(indices::LEFT_IRIS_RING, 640.0 - ipd_px / 2.0, left_px);
    place(indices::RIGHT_IRIS_RING, 640.0 + ipd_px / 2.0, right_px);
    LandmarkFrame::new(WIDTH, HEIGHT, landmarks)
}

/// Meter with a calibrated focal length and an in-memory store.
fn calibrated_meter(f_px: f64) -> IpdMeter {
    let store = Arc::new(MemoryStore::with_entries([("ipd_fpx", f_px.to_string())]));
    IpdMeter::new(MeterConfig::default(), store).unwrap()
}

fn run_frames(meter: &mut IpdMeter, frames: &[LandmarkFrame]) -> Vec<MeasurementReport> {
    frames.iter().map(|f| meter.process_frame(Some(f))).collect()
}

// ============================================================================
// Estimation
// ============================================================================

#[test]
fn test_ipd_from_fixed_distance() {
    // f_px = 500, distance = 30 cm, ipd = 100 px → 6.0 cm raw, 6.6 cm displayed
    let mut meter = calibrated_meter(500.0);
    meter.set_fixed_distance(true);

    let report = meter.process_frame(Some(&make_frame(20.0, 20.0, 100.0)));

    assert_eq!(report.distance_mode, DistanceMode::Fixed);
    assert_eq!(report.distance_cm, Some(30.0));
    assert!((report.ipd_cm.unwrap() - 6.6).abs() < 1e-6);
}

#[test]
fn test_estimated_distance_tracks_iris_size() {
    let mut meter = calibrated_meter(1000.0);

    // Iris of 39 px at f_px 1000 and 1.17 cm → 30 cm
    let reports = run_frames(&mut meter, &vec![make_frame(39.0, 39.0, 210.0); 5]);
    let last = reports.last().unwrap();

    assert_eq!(last.distance_mode, DistanceMode::Estimated);
    assert!((last.distance_cm.unwrap() - 30.0).abs() < 1e-6);
    // 210 × 30 / 1000 + 0.6
    assert!((last.ipd_cm.unwrap() - 6.9).abs() < 1e-6);
}

#[test]
fn test_uncalibrated_meter_never_fabricates_cm() {
    let store = Arc::new(MemoryStore::new());
    let mut meter = IpdMeter::new(MeterConfig::default(), store).unwrap();

    for report in run_frames(&mut meter, &vec![make_frame(30.0, 30.0, 150.0); 10]) {
        assert_eq!(report.distance_mode, DistanceMode::Unavailable);
        assert!(report.distance_cm.is_none());
        assert!(report.ipd_cm.is_none());
        assert!(report.ipd_px.is_some());
    }
}

// ============================================================================
// Gating and Warnings
// ============================================================================

#[test]
fn test_bilateral_gate_still_feeds_ipd() {
    let mut meter = calibrated_meter(500.0);

    // 12 / 10 = 1.2 > 1.15
    let report = meter.process_frame(Some(&make_frame(10.0, 12.0, 100.0)));

    assert_eq!(report.warning, Some(MeasurementWarning::OffAxisGaze));
    assert!(meter.smoothed_iris_px().is_none());
    assert!((report.ipd_px.unwrap() - 100.0).abs() < 1e-6);
}

#[test]
fn test_missing_frames_hold_estimates() {
    let mut meter = calibrated_meter(1000.0);
    let before = run_frames(&mut meter, &vec![make_frame(39.0, 39.0, 210.0); 3]);
    let held = meter.process_frame(None);

    assert_eq!(held.warning, Some(MeasurementWarning::NoFace));
    assert_eq!(held.ipd_px, before.last().unwrap().ipd_px);
    assert_eq!(held.distance_cm, before.last().unwrap().distance_cm);
}

#[test]
fn test_single_spike_is_rejected() {
    let mut meter = calibrated_meter(1000.0);
    let steady = run_frames(&mut meter, &vec![make_frame(39.0, 39.0, 210.0); 8]);
    let spike = meter.process_frame(Some(&make_frame(39.0, 39.0, 260.0)));

    assert_eq!(spike.warning, Some(MeasurementWarning::Outlier));
    assert_eq!(spike.ipd_cm, steady.last().unwrap().ipd_cm);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn test_identical_runs_are_identical() {
    let frames = vec![make_frame(24.0, 24.5, 180.0); 20];

    let first = run_frames(&mut calibrated_meter(900.0), &frames);
    let second = run_frames(&mut calibrated_meter(900.0), &frames);

    assert_eq!(first, second);
    let last = first.last().unwrap();
    assert!(last.distance_cm.is_some());
    assert!(last.ipd_cm.is_some());
    // Identical input converges immediately
    assert_eq!(first[0].ipd_cm, last.ipd_cm);
}

#[test]
fn test_reset_then_replay_matches_fresh_meter() {
    let frames = vec![make_frame(24.0, 24.0, 180.0); 20];

    let mut reused = calibrated_meter(900.0);
    run_frames(&mut reused, &[make_frame(30.0, 30.0, 250.0)]);
    reused.reset().unwrap();
    let replay = run_frames(&mut reused, &frames);

    let store = Arc::new(MemoryStore::new());
    let mut fresh = IpdMeter::new(MeterConfig::default(), store).unwrap();
    assert_eq!(replay, run_frames(&mut fresh, &frames));
}

// ============================================================================
// Recordings
// ============================================================================

#[test]
fn test_recording_drives_meter() {
    let mut buffer = Vec::new();
    for _ in 0..5 {
        write_frame(&mut buffer, Some(&make_frame(39.0, 39.0, 210.0)), WIDTH, HEIGHT).unwrap();
    }
    write_frame(&mut buffer, None, WIDTH, HEIGHT).unwrap();

    let frames = read_recording(std::io::Cursor::new(buffer)).unwrap();
    assert_eq!(frames.len(), 6);

    let mut meter = calibrated_meter(1000.0);
    let reports: Vec<_> = frames
        .iter()
        .map(|frame| meter.process_frame(frame.as_ref()))
        .collect();

    assert!(reports[..5].iter().all(|r| r.warning.is_none()));
    assert_eq!(reports[5].warning, Some(MeasurementWarning::NoFace));
    assert_eq!(meter.frame_rate().total_frames(), 6);
}
