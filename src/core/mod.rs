//! Core data types for CIGAR rewriting.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Operator`]: One of the nine SAM CIGAR operators (`MIDNSHP=X`)
//! - [`Run`] / [`OperationList`]: Run-length encoded alignment operations
//! - [`AlignmentRecord`]: The fields of a SAM/BAM record the rewrite needs
//! - [`FixError`], [`ZeroAdvancePolicy`], [`PassThrough`]: Errors and policies
//!
//! ## Operators
//!
//! | Operator | Consumes read | Consumes reference |
//! |----------|---------------|--------------------|
//! | `M`, `=`, `X` | yes | yes |
//! | `I`, `S` | yes | no |
//! | `D`, `N` | no | yes |
//! | `H`, `P` | no | no |
//!
//! After rewriting, `M` never appears in a record's CIGAR: every aligned
//! base is an explicit `=` or `X`.
//!
//! [`Operator`]: operator::Operator
//! [`Run`]: cigar::Run
//! [`OperationList`]: cigar::OperationList
//! [`AlignmentRecord`]: record::AlignmentRecord
//! [`FixError`]: types::FixError
//! [`ZeroAdvancePolicy`]: types::ZeroAdvancePolicy
//! [`PassThrough`]: types::PassThrough

pub mod cigar;
pub mod operator;
pub mod record;
pub mod types;
