//! Reading and writing alignment files.
//!
//! This module provides:
//!
//! - **SAM/BAM input**: [`AlignmentReader`] yields the header and then records in file order
//! - **SAM/BAM output**: [`AlignmentWriter`] writes records in the order given
//! - **`@PG` records**: [`add_program_record`] appends this program to the header's chain
//!
//! Formats are detected from the file extension; `-` means SAM on stdin/stdout.
//!
//! ## Example
//!
//! ```rust,no_run
//! use cigar_fix::parsing::alignment::{AlignmentReader, AlignmentWriter};
//! use std::path::Path;
//!
//! let reader = AlignmentReader::open(Path::new("sample.bam"), None).unwrap();
//! let header = reader.header().clone();
//! let mut writer = AlignmentWriter::create(Path::new("fixed.bam"), None).unwrap();
//! writer.write_header(&header).unwrap();
//!
//! let (_, records) = reader.into_parts();
//! for record in records {
//!     writer.write_record(&header, &record.unwrap()).unwrap();
//! }
//! writer.finish(&header).unwrap();
//! ```
//!
//! [`AlignmentReader`]: alignment::AlignmentReader
//! [`AlignmentWriter`]: alignment::AlignmentWriter
//! [`add_program_record`]: header::add_program_record

pub mod alignment;
pub mod header;
