//! Stable error kinds for the dotter core (spec §7).

use std::path::PathBuf;

/// Errors produced by the core. Each variant corresponds to one of the
/// "kinds" in the error-handling design: kinds 1-3 are hard failures,
/// kinds 4-5 are reported as warnings by their producer (via `tracing::warn!`)
/// and do not themselves construct an error.
#[derive(Debug, thiserror::Error)]
pub enum DotterError {
    /// Kind 1: invalid input.
    #[error("sequence '{name}' is empty")]
    EmptySequence { name: String },

    #[error("unknown comparison mode letter '{0}'")]
    UnknownMode(char),

    #[error("invalid nucleotide '{0}' has no complement")]
    InvalidNucleotide(char),

    #[error("matrix file '{path}' is invalid: {reason}")]
    InvalidMatrixFile { path: PathBuf, reason: String },

    #[error("matrix file '{0}' not found (also checked $BLASTMAT)")]
    MatrixNotFound(PathBuf),

    /// Kind 2: numerical out-of-range.
    #[error("pixel index {index} out of bounds for pixmap of length {len}")]
    PixelOutOfBounds { index: usize, len: usize },

    #[error("matrix has {0} rows, expected 24")]
    BadMatrixDimensions(usize),

    #[error("wrong number of pixels in '{path}': found {found}, expected {expected}")]
    WrongPixelCount {
        path: PathBuf,
        found: usize,
        expected: usize,
    },

    #[error("matrix name length {0} exceeds the maximum of 80")]
    MatrixNameTooLong(usize),

    #[error("unrecognised save-file format byte {0}")]
    UnknownFormat(u8),

    /// Kind 3: resource-budget breach.
    #[error("failed to allocate {what} ({size} bytes)")]
    AllocationFailed { what: &'static str, size: usize },

    /// I/O passthrough, reported the same way as other kind-1/2 failures.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, DotterError>;
