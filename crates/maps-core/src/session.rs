use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::info;

use crate::config::AnalysisConfig;
use crate::cutoff::{CutoffDecision, Threshold};
use crate::error::{MapsError, Result};
use crate::pearson::{run_test_reported, ChiSquareResult};
use crate::progress::{AnalysisStage, NoOpReporter, ProgressReporter};
use crate::ptc::{build_ptc_reported, PtcDataset};
use crate::run::{load_run_dir, Calibration, Run, RunId};

/// Working state of one analysis session.
///
/// Owns the loaded run sets, built curves and test results under
/// operator-visible names, plus the calibration maps every analysis reads.
pub struct Session {
    config: AnalysisConfig,
    runs: BTreeMap<String, Vec<Run>>,
    curves: BTreeMap<String, PtcDataset>,
    results: BTreeMap<String, ChiSquareResult>,
    calibration: Option<Calibration>,
    reporter: Arc<dyn ProgressReporter>,
    counter: usize,
}

impl Session {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            runs: BTreeMap::new(),
            curves: BTreeMap::new(),
            results: BTreeMap::new(),
            calibration: None,
            reporter: Arc::new(NoOpReporter),
            counter: 0,
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    fn next_name(&mut self, prefix: &str) -> String {
        loop {
            let name = format!("{prefix}_{}", self.counter);
            self.counter += 1;
            let taken = self.runs.contains_key(&name)
                || self.curves.contains_key(&name)
                || self.results.contains_key(&name);
            if !taken {
                return name;
            }
        }
    }

    // --- runs ---

    /// Register a set of runs under a new name.
    pub fn insert_runs(&mut self, runs: Vec<Run>) -> Result<String> {
        if runs.is_empty() {
            return Err(MapsError::EmptySequence);
        }
        let name = self.next_name("run");
        self.runs.insert(name.clone(), runs);
        Ok(name)
    }

    /// Decode a single raw dump into a new one-run set.
    pub fn load_run(&mut self, path: &Path) -> Result<String> {
        self.reporter.begin_stage(AnalysisStage::Decoding, Some(1));
        let run = Run::load(path, self.config.resolution, self.config.start_frame)?;
        self.reporter.advance(1);
        self.reporter.finish_stage();
        let name = self.insert_runs(vec![run])?;
        info!(name = %name, path = %path.display(), "Loaded run");
        Ok(name)
    }

    /// Decode every matching dump in a directory into a new run set.
    pub fn load_run_dir(&mut self, dir: &Path, identifier: Option<&str>) -> Result<String> {
        self.reporter.begin_stage(AnalysisStage::Decoding, None);
        let mut runs = load_run_dir(dir, identifier, &self.config)?;
        self.reporter.finish_stage();
        for (i, run) in runs.iter_mut().enumerate() {
            if let RunId::Auto(_) = run.id {
                run.id = RunId::Auto(i);
            }
        }
        let count = runs.len();
        let name = self.insert_runs(runs)?;
        info!(name = %name, runs = count, "Loaded run set");
        Ok(name)
    }

    pub fn run_names(&self) -> impl Iterator<Item = &str> {
        self.runs.keys().map(String::as_str)
    }

    pub fn run_set(&self, name: &str) -> Result<&[Run]> {
        self.runs
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| MapsError::RunNotFound(name.to_string()))
    }

    pub fn run(&self, name: &str, index: usize) -> Result<&Run> {
        self.run_set(name)?
            .get(index)
            .ok_or_else(|| MapsError::RunNotFound(format!("{name}[{index}]")))
    }

    pub fn remove_run(&mut self, name: &str) -> Result<Vec<Run>> {
        self.runs
            .remove(name)
            .ok_or_else(|| MapsError::RunNotFound(name.to_string()))
    }

    // --- calibration ---

    pub fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }

    pub fn set_calibration(&mut self, calibration: Calibration) -> Result<()> {
        let found = calibration.resolution();
        if found != self.config.resolution.shape() {
            return Err(MapsError::DimensionMismatch {
                context: "calibration".into(),
                expected: self.config.resolution.shape(),
                found,
            });
        }
        self.calibration = Some(calibration);
        Ok(())
    }

    /// Load the default calibration maps named in the configuration.
    pub fn load_calibration(&mut self) -> Result<()> {
        let paths = &self.config.calibration;
        let offset = paths
            .offset
            .clone()
            .ok_or(MapsError::MissingCalibration("offset path not configured"))?;
        let read_noise = paths
            .read_noise
            .clone()
            .ok_or(MapsError::MissingCalibration("read noise path not configured"))?;
        let calibration = Calibration::load(&offset, &read_noise)?;
        self.set_calibration(calibration)
    }

    /// Write the session calibration as two `.npy` files.
    pub fn save_calibration(&self, offset_path: &Path, read_noise_path: &Path) -> Result<()> {
        self.calibration
            .as_ref()
            .ok_or(MapsError::MissingCalibration("no calibration to save"))?
            .save(offset_path, read_noise_path)
    }

    /// Use a dark run's offset and noise as the session calibration.
    pub fn calibrate_from_run(&mut self, name: &str, index: usize) -> Result<&Calibration> {
        let run = self
            .runs
            .get_mut(name)
            .and_then(|set| set.get_mut(index))
            .ok_or_else(|| MapsError::RunNotFound(format!("{name}[{index}]")))?;
        self.reporter.begin_stage(AnalysisStage::Statistics, None);
        run.compute_statistics()?;
        self.reporter.finish_stage();
        let calibration = run
            .calibration()
            .ok_or(MapsError::MissingCalibration("run statistics unavailable"))?;
        self.set_calibration(calibration)?;
        Ok(self
            .calibration
            .as_ref()
            .ok_or(MapsError::MissingCalibration("calibration not stored"))?)
    }

    // --- PT curves ---

    /// Build a PT curve from a run set with the session calibration.
    pub fn build_curve(&mut self, run_name: &str, sort: bool) -> Result<String> {
        let calibration = self
            .calibration
            .as_ref()
            .ok_or(MapsError::MissingCalibration("offset and read noise not loaded"))?;
        let runs = self.run_set(run_name)?;
        let dataset = build_ptc_reported(
            runs,
            calibration,
            self.config.resolution,
            sort,
            self.reporter.as_ref(),
        )?;
        let name = self.next_name("ptc");
        self.curves.insert(name.clone(), dataset);
        Ok(name)
    }

    pub fn curve(&self, name: &str) -> Result<&PtcDataset> {
        self.curves
            .get(name)
            .ok_or_else(|| MapsError::CurveNotFound(name.to_string()))
    }

    pub fn curve_names(&self) -> impl Iterator<Item = &str> {
        self.curves.keys().map(String::as_str)
    }

    pub fn remove_curve(&mut self, name: &str) -> Result<PtcDataset> {
        self.curves
            .remove(name)
            .ok_or_else(|| MapsError::CurveNotFound(name.to_string()))
    }

    // --- chi-square results ---

    /// Test one run's usable frames. `points_per_bin = None` uses the
    /// configured bin occupancy.
    pub fn run_pearson(
        &mut self,
        run_name: &str,
        index: usize,
        points_per_bin: Option<usize>,
    ) -> Result<String> {
        let mut pearson = self.config.pearson.clone();
        if let Some(ppb) = points_per_bin {
            pearson.points_per_bin = ppb;
        }
        let run = self.run(run_name, index)?;
        let result = run_test_reported(
            run.usable_frames(),
            self.config.resolution,
            &pearson,
            self.reporter.as_ref(),
        )?;
        Ok(self.insert_result(result))
    }

    pub fn insert_result(&mut self, result: ChiSquareResult) -> String {
        let name = self.next_name("chi2");
        self.results.insert(name.clone(), result);
        name
    }

    pub fn result(&self, name: &str) -> Result<&ChiSquareResult> {
        self.results
            .get(name)
            .ok_or_else(|| MapsError::ResultNotFound(name.to_string()))
    }

    pub fn result_names(&self) -> impl Iterator<Item = &str> {
        self.results.keys().map(String::as_str)
    }

    pub fn remove_result(&mut self, name: &str) -> Result<ChiSquareResult> {
        self.results
            .remove(name)
            .ok_or_else(|| MapsError::ResultNotFound(name.to_string()))
    }

    pub fn save_result(&self, name: &str, path: &Path) -> Result<()> {
        let result = self.result(name)?;
        self.reporter.begin_stage(AnalysisStage::Writing, None);
        result.save(path)?;
        self.reporter.finish_stage();
        info!(name, path = %path.display(), "Saved chi-square result");
        Ok(())
    }

    /// Apply a cutoff to a stored result. `None` skips the cutoff.
    pub fn classify_result(
        &self,
        name: &str,
        threshold: Option<Threshold>,
    ) -> Result<Option<CutoffDecision>> {
        let result = self.result(name)?;
        let Some(threshold) = threshold else {
            return Ok(None);
        };
        self.reporter.begin_stage(AnalysisStage::Cutoff, None);
        let decision = result.classify(threshold)?;
        self.reporter.finish_stage();
        Ok(Some(decision))
    }
}
