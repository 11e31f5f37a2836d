//! Error types.
//!
//! The reveal component itself never fails; these errors cover the two
//! boundaries that can: validating caller-supplied children, and talking to
//! the terminal.

use std::io;

use thiserror::Error;

/// Errors from validating reveal list input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RevealError {
    /// Two children were given the same explicit key.
    #[error("duplicate child key `{key}`")]
    DuplicateKey { key: String },
}

/// Errors from mounting and driving a terminal session.
#[derive(Debug, Error)]
pub enum MountError {
    /// Terminal setup, teardown, polling or output failed.
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}
