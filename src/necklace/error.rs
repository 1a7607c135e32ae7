/// Failures of a single sampling computation. None of them leave partial
/// output behind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NecklaceError {
    #[error("sample count must be >= 0, got {count}")]
    NegativeSampleCount { count: i64 },

    #[error("cannot allocate shift storage for {count} samples")]
    SampleCountTooLarge { count: usize },

    #[error("shift array has {actual} entries but {expected} samples were requested")]
    ShiftLengthMismatch { expected: usize, actual: usize },

    #[error("shift index {index} is out of range for {count} samples")]
    ShiftIndexOutOfRange { index: usize, count: usize },

    #[error("`{field}` must be finite")]
    NonFinite { field: &'static str },

    #[error("curve length must be finite, got {length}")]
    InvalidCurveLength { length: f64 },

    #[error("curve evaluation at parameter {param} returned a non-finite point")]
    NonFiniteEvaluation { param: f64 },
}

pub type NecklaceResult<T> = Result<T, NecklaceError>;
