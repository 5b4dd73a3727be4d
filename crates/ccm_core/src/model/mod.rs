mod distribution;
mod samples;
mod sparse;

pub use distribution::{
    Clip, ConfidenceShape, Credibility, DistributionSpec, FitOutcome, MomentTarget,
    distribution_bulk, distribution_mean, distribution_stdev, range_to_confidence_model,
    round_significant,
};
pub use samples::Samples;
pub use sparse::{Sign, SignBin, Significance, SparseSample};
