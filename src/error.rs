// Copyright (c) 2026-present, tst-trie
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

//! Error types returned by fallible, caller-visible operations.
//!
//! The warn-and-skip delete conditions (`DeleteMissingKey`,
//! `DeleteMissingPayload`, `InternalInconsistency`) are not represented
//! here: the index tolerates them at runtime and reports them through the
//! `log` crate instead of `Result`, since the caller's view of liveness
//! may lag the index's. See `Index::delete`.

use std::fmt;

/// Errors that can occur while configuring or encoding keys for a
/// [`crate::Index`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The configured S2 level was outside `[1, 30]`.
    InvalidS2Level(u8),

    /// The configured temporal resolution name was not one of
    /// `year`/`month`/`day`/`hour`/`minute`/`second`.
    InvalidResolution(String),

    /// `encode_time` was called with the wrong number of calendar fields
    /// for the configured resolution.
    InvalidArity {
        /// Number of fields the configured resolution requires.
        expected: usize,
        /// Number of fields actually supplied.
        got: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidS2Level(level) => {
                write!(f, "invalid S2 level {level}: must be between 1 and 30")
            }
            Self::InvalidResolution(name) => write!(
                f,
                "invalid temporal resolution {name:?}: must be one of \
                 year, month, day, hour, minute, second"
            ),
            Self::InvalidArity { expected, got } => write!(
                f,
                "wrong number of time fields: expected {expected}, got {got}"
            ),
        }
    }
}

impl std::error::Error for Error {}

/// Index result type.
pub type Result<T> = std::result::Result<T, Error>;
