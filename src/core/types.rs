use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that abort processing of a record (and with it the whole run)
#[derive(Error, Debug)]
pub enum FixError {
    #[error("Reference sequence '{contig}' is unavailable: {reason}")]
    ReferenceUnavailable { contig: String, reason: String },

    #[error("Unsupported CIGAR operator '{operator}'")]
    UnsupportedOperator { operator: char },

    #[error("Invalid CIGAR run length: {0}")]
    InvalidLength(String),

    #[error("CIGAR consumes {needed} read bases but the record has only {available}")]
    ReadTooShort { needed: usize, available: usize },

    #[error("Mapped record '{0}' has no alignment start")]
    MissingAlignmentStart(String),

    #[error("Mapped record '{0}' has no reference sequence")]
    MissingReferenceSequence(String),
}

/// What to do with operators that advance neither cursor (`H` and `P`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroAdvancePolicy {
    /// Remove them from the rewritten CIGAR
    #[default]
    Drop,
    /// Re-emit them unchanged at their original position
    Keep,
}

/// Why a record was forwarded without its CIGAR being touched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassThrough {
    Unmapped,
    NoCigar,
    NoBases,
}

impl std::fmt::Display for PassThrough {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unmapped => write!(f, "unmapped"),
            Self::NoCigar => write!(f, "no CIGAR"),
            Self::NoBases => write!(f, "no read bases"),
        }
    }
}
