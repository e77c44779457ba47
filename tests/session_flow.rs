//! End-to-end session flow tests against the public pipeline API.

use heightsense::height::HeightConfig;
use heightsense::landmarks::{Landmark, LandmarkIndex, LandmarkSet};
use heightsense::session::{FrameOutcome, Session, SessionConfig};
use heightsense::source::{Detection, ReplaySource, SourceError};

/// A frontal standing figure at 640x480.
///
/// Torso midline runs from y=0.30 to y=0.55 (120 px), so calibration fixes
/// the scale near 50/120 cm/px; the resulting head-to-toe span lands around
/// 166 cm, inside the plausible band.
fn standing_detection(visibility: f64) -> Detection {
    let mut points = [Landmark::default(); LandmarkIndex::COUNT];
    let layout: [(LandmarkIndex, f64, f64); 13] = [
        (LandmarkIndex::Nose, 0.50, 0.14),
        (LandmarkIndex::LeftEye, 0.48, 0.13),
        (LandmarkIndex::RightEye, 0.52, 0.13),
        (LandmarkIndex::LeftEar, 0.46, 0.138),
        (LandmarkIndex::RightEar, 0.54, 0.138),
        (LandmarkIndex::LeftShoulder, 0.43, 0.30),
        (LandmarkIndex::RightShoulder, 0.57, 0.30),
        (LandmarkIndex::LeftHip, 0.455, 0.55),
        (LandmarkIndex::RightHip, 0.545, 0.55),
        (LandmarkIndex::LeftAnkle, 0.45, 0.88),
        (LandmarkIndex::RightAnkle, 0.55, 0.88),
        (LandmarkIndex::LeftFootIndex, 0.46, 0.90),
        (LandmarkIndex::RightFootIndex, 0.54, 0.90),
    ];
    for (i, x, y) in layout {
        points[i as usize] = Landmark::new(x, y, visibility);
    }
    Detection {
        landmarks: LandmarkSet::new(points),
        frame_width: 640,
        frame_height: 480,
    }
}

fn occluded_feet_detection() -> Detection {
    let detection = standing_detection(0.9);
    let mut points = [Landmark::default(); LandmarkIndex::COUNT];
    for (i, p) in points.iter_mut().enumerate() {
        *p = *detection.landmarks.iter().nth(i).unwrap();
    }
    for i in [
        LandmarkIndex::LeftFootIndex,
        LandmarkIndex::RightFootIndex,
        LandmarkIndex::LeftHeel,
        LandmarkIndex::RightHeel,
        LandmarkIndex::LeftAnkle,
        LandmarkIndex::RightAnkle,
    ] {
        points[i as usize].visibility = 0.1;
    }
    Detection {
        landmarks: LandmarkSet::new(points),
        frame_width: 640,
        frame_height: 480,
    }
}

/// The standing figure with feet pushed toward the frame bottom, inflating
/// the head-to-foot span without changing the torso used for calibration.
fn stretched_detection() -> Detection {
    let detection = standing_detection(0.9);
    let mut points = [Landmark::default(); LandmarkIndex::COUNT];
    for (i, p) in points.iter_mut().enumerate() {
        *p = *detection.landmarks.iter().nth(i).unwrap();
    }
    points[LandmarkIndex::LeftAnkle as usize].y = 0.96;
    points[LandmarkIndex::RightAnkle as usize].y = 0.96;
    points[LandmarkIndex::LeftFootIndex as usize].y = 0.98;
    points[LandmarkIndex::RightFootIndex as usize].y = 0.98;
    Detection {
        landmarks: LandmarkSet::new(points),
        frame_width: 640,
        frame_height: 480,
    }
}

fn session_over(frames: Vec<Result<Option<Detection>, SourceError>>) -> Session {
    Session::new(
        SessionConfig::default(),
        Box::new(ReplaySource::new(frames)),
    )
}

/// Full happy path: 40 calibration frames, then stable height updates.
#[test]
fn test_calibrate_then_measure() {
    let mut session = session_over(
        (0..50)
            .map(|_| Ok(Some(standing_detection(0.9))))
            .collect(),
    );

    let mut last_progress = 0;
    for frame in 0..40 {
        match session.process_frame(&[]) {
            FrameOutcome::Calibrating { progress, .. } => {
                assert!(progress >= last_progress, "progress regressed at {frame}");
                last_progress = progress;
            }
            other => panic!("frame {frame}: expected calibrating, got {other:?}"),
        }
    }
    assert_eq!(last_progress, 100);
    assert!(session.is_calibrated());

    let mut heights = Vec::new();
    for _ in 0..10 {
        match session.process_frame(&[]) {
            FrameOutcome::Measurement(reading) => {
                assert!(reading.height_cm > 120.0 && reading.height_cm < 220.0);
                assert!(reading.confidence_pct >= 0.0 && reading.confidence_pct <= 100.0);
                heights.push(reading.height_cm);
            }
            other => panic!("expected measurement, got {other:?}"),
        }
    }
    // Constant input: smoothed output stays put.
    let spread = heights
        .iter()
        .fold(f64::NEG_INFINITY, |a, &b| a.max(b))
        - heights.iter().fold(f64::INFINITY, |a, &b| a.min(b));
    assert!(spread < 1.0, "estimate wandered {spread} cm on a static pose");
}

/// A reset mid-calibration starts collection over from zero.
#[test]
fn test_reset_during_calibration() {
    let mut session = session_over(
        (0..30)
            .map(|_| Ok(Some(standing_detection(0.9))))
            .collect(),
    );
    for _ in 0..20 {
        session.process_frame(&[]);
    }
    session.reset();
    assert!(!session.is_calibrated());

    match session.process_frame(&[]) {
        FrameOutcome::Calibrating { progress, .. } => assert!(progress < 5),
        other => panic!("expected calibrating, got {other:?}"),
    }
}

/// Occluded feet after calibration yield a no-person outcome and leave the
/// running estimate untouched.
#[test]
fn test_occlusion_gap_does_not_disturb_estimate() {
    let mut frames: Vec<_> = (0..45)
        .map(|_| Ok(Some(standing_detection(0.9))))
        .collect();
    frames.push(Ok(Some(occluded_feet_detection())));
    frames.push(Ok(Some(standing_detection(0.9))));
    let mut session = session_over(frames);

    for _ in 0..40 {
        session.process_frame(&[]);
    }
    let mut before = 0.0;
    for _ in 0..5 {
        if let FrameOutcome::Measurement(reading) = session.process_frame(&[]) {
            before = reading.height_cm;
        }
    }

    assert!(matches!(
        session.process_frame(&[]),
        FrameOutcome::NoPerson { .. }
    ));

    match session.process_frame(&[]) {
        FrameOutcome::Measurement(reading) => {
            assert!((reading.height_cm - before).abs() < 0.5);
        }
        other => panic!("expected measurement after gap, got {other:?}"),
    }
}

/// An out-of-band reading is rejected before the filter: the frame answers
/// with a discard notice and the next measurement matches the prior
/// estimate.
#[test]
fn test_implausible_reading_does_not_disturb_estimate() {
    // Narrow the plausible band so the stretched figure (about 182 cm at
    // the calibrated scale) falls outside it while the standing figure
    // (about 166 cm) stays inside.
    let config = SessionConfig {
        height: HeightConfig {
            min_height_cm: 120.0,
            max_height_cm: 180.0,
        },
        ..SessionConfig::default()
    };

    let mut frames: Vec<_> = (0..45)
        .map(|_| Ok(Some(standing_detection(0.9))))
        .collect();
    frames.push(Ok(Some(stretched_detection())));
    frames.push(Ok(Some(standing_detection(0.9))));
    let mut session = Session::new(config, Box::new(ReplaySource::new(frames)));

    for _ in 0..40 {
        session.process_frame(&[]);
    }
    let mut before = 0.0;
    for _ in 0..5 {
        match session.process_frame(&[]) {
            FrameOutcome::Measurement(reading) => before = reading.height_cm,
            other => panic!("expected measurement, got {other:?}"),
        }
    }

    match session.process_frame(&[]) {
        FrameOutcome::NoPerson { message } => {
            assert!(
                message.contains("plausible"),
                "unexpected discard notice: {message}"
            );
        }
        other => panic!("expected discarded reading, got {other:?}"),
    }

    match session.process_frame(&[]) {
        FrameOutcome::Measurement(reading) => {
            assert!(
                (reading.height_cm - before).abs() < 0.2,
                "rejected frame moved the estimate from {before} to {}",
                reading.height_cm
            );
        }
        other => panic!("expected measurement after rejection, got {other:?}"),
    }
}

/// An undecodable frame is reported and skipped without touching state.
#[test]
fn test_bad_frame_is_isolated() {
    let mut frames: Vec<_> = (0..20)
        .map(|_| Ok(Some(standing_detection(0.9))))
        .collect();
    frames.insert(10, Err(SourceError::Decode("not an image".into())));
    let mut session = session_over(frames);

    let mut bad_frames = 0;
    let mut last_progress = 0;
    for _ in 0..21 {
        match session.process_frame(&[]) {
            FrameOutcome::Calibrating { progress, .. } => {
                assert!(progress >= last_progress);
                last_progress = progress;
            }
            FrameOutcome::BadFrame { .. } => bad_frames += 1,
            other => panic!("unexpected outcome {other:?}"),
        }
    }
    assert_eq!(bad_frames, 1);
    // 20 valid samples collected around the bad frame.
    assert_eq!(last_progress, 50);
}

/// Uncalibrated frames with no person still answer with calibration status.
#[test]
fn test_no_detection_while_uncalibrated() {
    let mut session = session_over(vec![Ok(None), Ok(Some(standing_detection(0.9)))]);
    match session.process_frame(&[]) {
        FrameOutcome::Calibrating { progress, .. } => assert_eq!(progress, 0),
        other => panic!("expected calibrating, got {other:?}"),
    }
    match session.process_frame(&[]) {
        FrameOutcome::Calibrating { progress, .. } => assert!(progress > 0),
        other => panic!("expected calibrating, got {other:?}"),
    }
}

/// Low-visibility torso frames are skipped without consuming progress.
#[test]
fn test_low_visibility_frames_do_not_advance_calibration() {
    let mut frames: Vec<_> = (0..5)
        .map(|_| Ok(Some(standing_detection(0.4))))
        .collect();
    frames.push(Ok(Some(standing_detection(0.9))));
    let mut session = session_over(frames);

    for _ in 0..5 {
        match session.process_frame(&[]) {
            FrameOutcome::Calibrating { progress, .. } => assert_eq!(progress, 0),
            other => panic!("expected calibrating, got {other:?}"),
        }
    }
    match session.process_frame(&[]) {
        FrameOutcome::Calibrating { progress, .. } => assert_eq!(progress, 2),
        other => panic!("expected calibrating, got {other:?}"),
    }
}
