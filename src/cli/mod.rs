//! Command-line interface for cigar-fix.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **fix**: Rewrite the CIGAR of every record in a SAM/BAM file
//! - **classify**: Classify a single CIGAR against literal read and reference bases
//!
//! ## Usage
//!
//! ```text
//! # Rewrite a BAM file against an indexed reference
//! cigar-fix fix -i sample.bam -o fixed.bam -R ref.fa
//!
//! # Stream SAM through
//! samtools view -h sample.bam | cigar-fix fix -i - -o - -R ref.fa | samtools view -b -o fixed.bam
//!
//! # JSON summary, keeping hard clips in the rewritten CIGARs
//! cigar-fix --format json fix -i sample.bam -o fixed.bam -R ref.fa --keep-zero-advance-ops
//!
//! # Check a single alignment by hand
//! cigar-fix classify --cigar 2S4M --read TTACGT --reference ACGA
//! ```

use clap::{Parser, Subcommand};

pub mod classify;
pub mod fix;

#[derive(Parser)]
#[command(name = "cigar-fix")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Replace M operators in SAM/BAM CIGARs with explicit =/X operators")]
#[command(
    long_about = "cigar-fix compares every aligned base of each record with the reference and rewrites the CIGAR so that M runs become = (match) and X (mismatch) runs.\n\nGaps, insertions and clips are preserved; unmapped records and records without a CIGAR or bases are passed through unchanged. A reference N, or a position past the end of the contig, counts as a match."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format for summaries
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rewrite the CIGARs of a SAM/BAM file
    Fix(fix::FixArgs),

    /// Classify a single CIGAR against literal bases
    Classify(classify::ClassifyArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
