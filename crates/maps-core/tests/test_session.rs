mod common;

use approx::assert_relative_eq;
use common::{build_raw_samples, frames_from_levels, write_raw_file};
use maps_core::config::AnalysisConfig;
use maps_core::cutoff::Threshold;
use maps_core::error::MapsError;
use maps_core::frame::Resolution;
use maps_core::pearson::{ChiSquareResult, FitStatus};
use maps_core::run::{Calibration, Run, RunId};
use maps_core::session::Session;
use ndarray::{Array2, Array3};

fn small_config(rows: usize, cols: usize) -> AnalysisConfig {
    AnalysisConfig {
        resolution: Resolution::new(rows, cols).unwrap(),
        ..AnalysisConfig::default()
    }
}

/// Raw dump of `levels.len()` frames (after the dropped leading slot).
fn write_level_dump(dir: &std::path::Path, name: &str, levels: &[u16], pixels: usize) {
    let mut slots = vec![vec![0u16; pixels]];
    slots.extend(levels.iter().map(|&l| vec![l; pixels]));
    write_raw_file(dir, name, &build_raw_samples(&slots));
}

#[test]
fn test_dark_run_calibrates_then_builds_curve() {
    let dir = tempfile::tempdir().unwrap();
    write_level_dump(dir.path(), "dark.raw", &[100, 102, 100, 102], 4);
    write_level_dump(dir.path(), "flat_a.raw", &[150, 150, 160, 160], 4);
    write_level_dump(dir.path(), "flat_b.raw", &[300, 300, 300, 300], 4);

    let mut session = Session::new(small_config(2, 2));
    let dark = session.load_run(&dir.path().join("dark.raw")).unwrap();
    let calibration = session.calibrate_from_run(&dark, 0).unwrap();
    assert_relative_eq!(calibration.offset[[0, 0]], 101.0);
    assert_relative_eq!(calibration.read_noise[[1, 1]], 1.0);

    let flats = session.load_run_dir(dir.path(), Some("flat")).unwrap();
    assert_eq!(session.run_set(&flats).unwrap().len(), 2);

    let curve = session.build_curve(&flats, true).unwrap();
    let ptc = session.curve(&curve).unwrap();
    assert_eq!(ptc.run_count(), 2);
    assert_relative_eq!(ptc.signal_mean()[[0, 0, 0]], 54.0);
    assert_relative_eq!(ptc.signal_mean()[[1, 0, 0]], 199.0);
    // Total noise 5 with read noise 1.
    assert_relative_eq!(ptc.shot_noise()[[0, 1, 0]], 24.0f64.sqrt(), epsilon = 1e-12);

    assert_eq!(session.run_names().count(), 2);
    assert_eq!(session.curve_names().collect::<Vec<_>>(), vec![curve.as_str()]);
}

#[test]
fn test_curve_needs_calibration() {
    let mut session = Session::new(small_config(1, 1));
    let run = Run::new(RunId::Auto(0), "r".into(), frames_from_levels(&[1, 2], 1, 1), 0).unwrap();
    let name = session.insert_runs(vec![run]).unwrap();
    assert!(matches!(
        session.build_curve(&name, false),
        Err(MapsError::MissingCalibration(_))
    ));
}

#[test]
fn test_configured_calibration_paths() {
    let dir = tempfile::tempdir().unwrap();
    let offset_path = dir.path().join("offset.npy");
    let noise_path = dir.path().join("noise.npy");
    Calibration::new(Array2::from_elem((2, 2), 5.0), Array2::from_elem((2, 2), 0.5))
        .unwrap()
        .save(&offset_path, &noise_path)
        .unwrap();

    let mut session = Session::new(small_config(2, 2));
    assert!(matches!(
        session.load_calibration(),
        Err(MapsError::MissingCalibration(_))
    ));

    let mut config = small_config(2, 2);
    config.calibration.offset = Some(offset_path.clone());
    config.calibration.read_noise = Some(noise_path.clone());
    let mut session = Session::new(config);
    session.load_calibration().unwrap();
    assert_eq!(session.calibration().unwrap().offset[[1, 0]], 5.0);

    let mut config = small_config(3, 3);
    config.calibration.offset = Some(offset_path);
    config.calibration.read_noise = Some(noise_path);
    let mut session = Session::new(config);
    assert!(matches!(
        session.load_calibration(),
        Err(MapsError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_pearson_and_cutoff_through_session() {
    let mut session = Session::new(small_config(2, 2));
    let mut data = Array3::<u16>::zeros((40, 2, 2));
    for (f, mut frame) in data.outer_iter_mut().enumerate() {
        frame.fill(100 + (f % 5) as u16);
    }
    // Pixel (1,1) never changes.
    data.slice_mut(ndarray::s![.., 1, 1]).fill(100);
    let run = Run::new(
        RunId::Auto(0),
        "r".into(),
        maps_core::frame::FrameSequence::new(data),
        0,
    )
    .unwrap();
    let runs = session.insert_runs(vec![run]).unwrap();

    let chi2 = session.run_pearson(&runs, 0, None).unwrap();
    let result = session.result(&chi2).unwrap();
    assert_eq!(result.status[[1, 1]], FitStatus::InsufficientVariance);
    assert_eq!(result.fitted_count(), 3);

    assert!(session.classify_result(&chi2, None).unwrap().is_none());
    let decision = session
        .classify_result(&chi2, Some(Threshold::new(0.0).unwrap()))
        .unwrap()
        .unwrap();
    assert_eq!(decision.passed_count, 3);
    assert!(!decision.passed_mask[[1, 1]]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chi2.npy");
    session.save_result(&chi2, &path).unwrap();
    let name = session.insert_result(ChiSquareResult::load(&path).unwrap());
    assert_ne!(name, chi2);
    assert_eq!(session.result_names().count(), 2);
}

#[test]
fn test_unknown_names() {
    let mut session = Session::new(AnalysisConfig::default());
    assert!(matches!(session.run_set("run_9"), Err(MapsError::RunNotFound(_))));
    assert!(matches!(session.curve("ptc_9"), Err(MapsError::CurveNotFound(_))));
    assert!(matches!(session.result("chi2_9"), Err(MapsError::ResultNotFound(_))));
    assert!(matches!(session.remove_run("run_9"), Err(MapsError::RunNotFound(_))));
    assert!(matches!(
        session.insert_runs(Vec::new()),
        Err(MapsError::EmptySequence)
    ));
}

#[test]
fn test_removed_run_frees_its_entry() {
    let mut session = Session::new(small_config(1, 1));
    let run = Run::new(RunId::Auto(0), "r".into(), frames_from_levels(&[1, 2], 1, 1), 0).unwrap();
    let name = session.insert_runs(vec![run]).unwrap();
    assert_eq!(session.run(&name, 0).unwrap().frame_count(), 2);
    assert!(matches!(session.run(&name, 1), Err(MapsError::RunNotFound(_))));

    let removed = session.remove_run(&name).unwrap();
    assert_eq!(removed.len(), 1);
    assert_eq!(session.run_names().count(), 0);
}

#[test]
fn test_save_calibration() {
    let dir = tempfile::tempdir().unwrap();
    let offset_path = dir.path().join("offset.npy");
    let noise_path = dir.path().join("noise.npy");

    let mut session = Session::new(small_config(1, 2));
    assert!(matches!(
        session.save_calibration(&offset_path, &noise_path),
        Err(MapsError::MissingCalibration(_))
    ));

    session
        .set_calibration(Calibration::new(Array2::from_elem((1, 2), 3.0), Array2::zeros((1, 2))).unwrap())
        .unwrap();
    session.save_calibration(&offset_path, &noise_path).unwrap();
    let loaded = Calibration::load(&offset_path, &noise_path).unwrap();
    assert_eq!(loaded.offset[[0, 1]], 3.0);
}

#[derive(Default)]
struct RecordingReporter {
    stages: std::sync::Mutex<Vec<maps_core::progress::AnalysisStage>>,
}

impl maps_core::progress::ProgressReporter for RecordingReporter {
    fn begin_stage(&self, stage: maps_core::progress::AnalysisStage, _total: Option<usize>) {
        self.stages.lock().unwrap().push(stage);
    }
}

#[test]
fn test_reporter_sees_each_stage() {
    use maps_core::progress::AnalysisStage;

    let dir = tempfile::tempdir().unwrap();
    write_level_dump(dir.path(), "dark.raw", &[10, 12, 10, 12, 11, 13], 1);

    let reporter = std::sync::Arc::new(RecordingReporter::default());
    let mut session = Session::new(small_config(1, 1)).with_reporter(reporter.clone());
    let dark = session.load_run(&dir.path().join("dark.raw")).unwrap();
    session.calibrate_from_run(&dark, 0).unwrap();
    session.build_curve(&dark, false).unwrap();
    let chi2 = session.run_pearson(&dark, 0, None).unwrap();
    session
        .classify_result(&chi2, Some(Threshold::new(0.05).unwrap()))
        .unwrap();

    assert_eq!(
        *reporter.stages.lock().unwrap(),
        vec![
            AnalysisStage::Decoding,
            AnalysisStage::Statistics,
            AnalysisStage::PhotonTransfer,
            AnalysisStage::GoodnessOfFit,
            AnalysisStage::Cutoff,
        ]
    );
}

#[test]
fn test_removed_curve_and_result_free_their_entries() {
    let mut session = Session::new(small_config(1, 1));
    session
        .set_calibration(Calibration::new(Array2::zeros((1, 1)), Array2::zeros((1, 1))).unwrap())
        .unwrap();
    let run = Run::new(
        RunId::Auto(0),
        "r".into(),
        frames_from_levels(&[10, 11, 12, 11, 10, 12], 1, 1),
        0,
    )
    .unwrap();
    let runs = session.insert_runs(vec![run]).unwrap();

    let curve = session.build_curve(&runs, false).unwrap();
    let chi2 = session.run_pearson(&runs, 0, None).unwrap();

    let removed = session.remove_curve(&curve).unwrap();
    assert_eq!(removed.run_count(), 1);
    assert_eq!(session.curve_names().count(), 0);
    assert!(matches!(session.curve(&curve), Err(MapsError::CurveNotFound(_))));
    assert!(matches!(
        session.remove_curve(&curve),
        Err(MapsError::CurveNotFound(_))
    ));

    let removed = session.remove_result(&chi2).unwrap();
    assert_eq!(removed.resolution(), (1, 1));
    assert_eq!(session.result_names().count(), 0);
    assert!(matches!(
        session.classify_result(&chi2, None),
        Err(MapsError::ResultNotFound(_))
    ));
    assert!(matches!(
        session.remove_result(&chi2),
        Err(MapsError::ResultNotFound(_))
    ));

    // The run set survives removal of what was derived from it.
    assert_eq!(session.run_set(&runs).unwrap().len(), 1);
    // Names are not reused after removal.
    let again = session.build_curve(&runs, false).unwrap();
    assert_ne!(again, curve);
}
