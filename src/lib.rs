//! # cigar-fix
//!
//! A library for replacing the ambiguous `M` operator in SAM/BAM CIGARs with explicit
//! `=` (sequence match) and `X` (sequence mismatch) operators.
//!
//! Aligners commonly report aligned bases as `M`, which says nothing about whether the
//! read agrees with the reference. Downstream tools that count mismatches or build
//! variant evidence need the distinction spelled out. `cigar-fix` compares every aligned
//! base against the reference and rewrites each record's CIGAR, leaving everything else
//! about the record untouched.
//!
//! ## Features
//!
//! - **Per-base classification**: Each `M` base becomes `=` or `X`; a reference `N` matches anything
//! - **Compaction**: Adjacent runs with the same operator are merged (`1=1=1X` becomes `2=1X`)
//! - **Single-contig cache**: Coordinate-sorted input loads each contig once
//! - **Indexed references**: FASTA files with a `.fai` index are read one contig at a time
//! - **Header validation**: Loaded contigs are checked against `@SQ` `LN` and, optionally, `M5`
//!
//! ## Example
//!
//! ```rust
//! use cigar_fix::core::cigar::{format_cigar, parse_cigar};
//! use cigar_fix::core::record::AlignmentRecord;
//! use cigar_fix::reference::provider::InMemoryProvider;
//! use cigar_fix::{CigarFixer, FixConfig, FixOutcome};
//!
//! let provider = InMemoryProvider::from_sequences([("chr1", b"ACGTACGTAC".to_vec())]);
//! let mut fixer = CigarFixer::new(provider, FixConfig::default());
//!
//! let record = AlignmentRecord {
//!     name: "read1".to_string(),
//!     reference_sequence_id: Some(0),
//!     reference_name: Some("chr1".to_string()),
//!     alignment_start: Some(1),
//!     operations: parse_cigar("4M").unwrap(),
//!     bases: b"ACGA".to_vec(),
//!     unmapped: false,
//! };
//!
//! match fixer.fix(&record).unwrap() {
//!     FixOutcome::Rewritten(runs) => assert_eq!(format_cigar(&runs), "3=1X"),
//!     FixOutcome::PassThrough(reason) => panic!("unexpected pass-through: {reason}"),
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: CIGAR operators, runs and the per-record view
//! - [`reference`]: Reference providers, the single-contig cache and header validation
//! - [`fixing`]: Classification, compaction and the record/file pipeline
//! - [`parsing`]: SAM/BAM reading and writing, `@PG` records
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod fixing;
pub mod parsing;
pub mod reference;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::cigar::{OperationList, Run};
pub use crate::core::operator::Operator;
pub use crate::core::types::*;
pub use fixing::{classify, compact, CigarFixer, FixConfig, FixOutcome, FixStats};
pub use reference::cache::ReferenceCache;
pub use reference::provider::ReferenceProvider;
pub use reference::view::ReferenceView;
