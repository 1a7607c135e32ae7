//! Necklace sampling: frames distributed along a curve by arc length, plus
//! the per-sample shift storage that survives recomputation.

mod cache;
mod config;
mod error;
mod sampler;

pub use cache::{ShiftCache, ShiftPolicy, reconcile};
pub use config::{NodeVariant, SamplingConfig, ValidatedConfig};
pub use error::{NecklaceError, NecklaceResult};
pub use sampler::{
    Sample, SampleDiagnostics, SampleResult, arc_length_targets, increment, resolve_length,
    sample, sample_validated,
};
