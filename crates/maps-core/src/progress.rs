/// Analysis stage, used for progress reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisStage {
    Decoding,
    Statistics,
    PhotonTransfer,
    GoodnessOfFit,
    Cutoff,
    Writing,
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decoding => write!(f, "Decoding frames"),
            Self::Statistics => write!(f, "Computing statistics"),
            Self::PhotonTransfer => write!(f, "Building PT curve"),
            Self::GoodnessOfFit => write!(f, "Chi-square test"),
            Self::Cutoff => write!(f, "Applying cutoff"),
            Self::Writing => write!(f, "Writing output"),
        }
    }
}

/// Thread-safe progress reporting.
///
/// All methods default to no-ops, so implementors only override what they
/// display.
pub trait ProgressReporter: Send + Sync {
    /// A stage has started; `total_items` is the number of work items if known.
    fn begin_stage(&self, _stage: AnalysisStage, _total_items: Option<usize>) {}

    /// `items_done` work items of the current stage have completed.
    fn advance(&self, _items_done: usize) {}

    fn finish_stage(&self) {}
}

/// Reporter that ignores everything.
pub struct NoOpReporter;
impl ProgressReporter for NoOpReporter {}
