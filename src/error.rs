//! Crate-wide error type: spec validation, parser, transform, and I/O
//! failures unified behind one enum, following the `thiserror` convention
//! used throughout the rest of this codebase's lineage.

/// Everything that can go wrong rendering a waveform or parsing its textual
/// description. Transform errors (bad hex digit, unknown transform prefix)
/// are intentionally not represented here -- per spec they are
/// warn-and-skip, never fatal, and are only ever logged.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sample rate must be nonzero")]
    ZeroSampleRate,

    #[error("negative step width (us): {0}")]
    NegativeStepWidth(i64),

    #[error("{context}: invalid number {token:?}")]
    InvalidNumber { context: &'static str, token: String },

    #[error("{context}: number out of range {token:?}")]
    NumberOutOfRange { context: &'static str, token: String },

    #[error("{context}: expected non-negative number (or -1), got {token:?}")]
    NegativeNumber { context: &'static str, token: String },

    #[error("{context}: unknown unit suffix near {token:?}")]
    UnknownUnit { context: &'static str, token: String },

    #[error("unterminated {0:?}")]
    Unterminated(char),

    #[error("failed to allocate output buffer of {0} bytes")]
    Allocation(usize),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
