//! CIGAR classification and compaction.
//!
//! This module provides the core rewrite:
//!
//! - [`classify`]: Expands every `M` run into single-base `=`/`X` runs against a reference
//! - [`compact`]: Merges adjacent runs with the same operator
//! - [`CigarFixer`]: Applies pass-through rules, the reference cache, and both steps per record
//! - [`pipeline::run`]: Streams a whole SAM/BAM file through a fixer
//!
//! ## Classification rules
//!
//! | Input | Output | Reference cursor | Read cursor |
//! |-------|--------|------------------|-------------|
//! | `M` | one `=` or `X` per base | +1 per base | +1 per base |
//! | `=`, `X` | unchanged | +len | +len |
//! | `D`, `N` | unchanged | +len | |
//! | `I`, `S` | unchanged | | +len |
//! | `H`, `P` | dropped (or kept, see [`ZeroAdvancePolicy`]) | | |
//!
//! A reference `N`, or a position past the end of the contig, matches any read base.
//! Comparison ignores case.
//!
//! ## Example
//!
//! ```rust
//! use cigar_fix::core::cigar::{format_cigar, parse_cigar};
//! use cigar_fix::core::types::ZeroAdvancePolicy;
//! use cigar_fix::fixing::{classify, compact};
//! use cigar_fix::reference::view::ReferenceView;
//!
//! let reference = ReferenceView::new("chr1", b"ACGA".to_vec());
//! let runs = parse_cigar("4M").unwrap();
//! let expanded = classify(&runs, b"ACGT", 1, &reference, ZeroAdvancePolicy::Drop).unwrap();
//! assert_eq!(format_cigar(&compact(&expanded)), "3=1X");
//! ```
//!
//! [`ZeroAdvancePolicy`]: crate::core::types::ZeroAdvancePolicy

pub mod classifier;
pub mod compactor;
pub mod engine;
pub mod pipeline;
pub mod stats;

pub use classifier::classify;
pub use compactor::compact;
pub use engine::{CigarFixer, FixConfig, FixOutcome};
pub use stats::FixStats;
