use std::fmt;

/// Errors raised by the statistics and valuation engine.
///
/// Variants fall into two groups: invalid input (the caller broke a
/// precondition) and degenerate aggregates (the input is well formed but the
/// requested statistic has no value, e.g. an empty trimming window).
#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    /// `samples` was not sorted ascending; `index` is the first position
    /// whose value is smaller than its predecessor.
    UnsortedInput { index: usize },
    /// A logical index past the end of the decompressed sequence.
    IndexOutOfRange { index: usize, len: usize },
    /// Two parallel arrays had different lengths.
    LengthMismatch { expected: usize, actual: usize },
    /// An argument outside its valid domain (proportions, bin counts, ...).
    InvalidArgument(&'static str),
    /// The sample has no outcomes at all (dense or implicit).
    EmptySample,
    /// A trimmed window selected no outcomes.
    EmptyWindow { lower: usize, upper: usize },
    /// Every outcome is zero, so a share-of-mass statistic is undefined.
    ZeroMass,
}

impl StatsError {
    /// Whether this error reports a degenerate (empty or massless) aggregate
    /// rather than a caller mistake.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        matches!(
            self,
            StatsError::EmptySample | StatsError::EmptyWindow { .. } | StatsError::ZeroMass
        )
    }
}

impl fmt::Display for StatsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsError::UnsortedInput { index } => {
                write!(f, "samples must be sorted ascending (violation at index {index})")
            }
            StatsError::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for {len} outcomes")
            }
            StatsError::LengthMismatch { expected, actual } => {
                write!(f, "expected {expected} values, got {actual}")
            }
            StatsError::InvalidArgument(reason) => write!(f, "invalid argument: {reason}"),
            StatsError::EmptySample => write!(f, "sample has no outcomes"),
            StatsError::EmptyWindow { lower, upper } => {
                write!(f, "trimmed window [{lower}, {upper}) contains no outcomes")
            }
            StatsError::ZeroMass => write!(f, "all outcomes are zero"),
        }
    }
}

impl std::error::Error for StatsError {}

pub type Result<T> = std::result::Result<T, StatsError>;
