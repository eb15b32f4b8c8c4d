use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::info;

use crate::cli::OutputFormat;
use crate::core::types::ZeroAdvancePolicy;
use crate::fixing::engine::{CigarFixer, FixConfig};
use crate::fixing::pipeline;
use crate::fixing::stats::FixStats;
use crate::parsing::alignment::{AlignmentFormat, AlignmentReader, AlignmentWriter};
use crate::parsing::header::add_program_record;
use crate::reference::provider::open_reference;
use crate::utils::progress::{ProgressLogger, DEFAULT_PROGRESS_INTERVAL};

#[derive(Args)]
pub struct FixArgs {
    /// Input SAM or BAM file ('-' for SAM on stdin)
    #[arg(short, long, required = true)]
    pub input: PathBuf,

    /// Output SAM or BAM file ('-' for SAM on stdout)
    #[arg(short, long, required = true)]
    pub output: PathBuf,

    /// Reference FASTA (indexed with .fai for on-demand loading; may be gzipped)
    #[arg(short = 'R', long, required = true)]
    pub reference: PathBuf,

    /// Input format (detected from the extension by default)
    #[arg(long)]
    pub input_format: Option<AlignmentFormat>,

    /// Output format (detected from the extension by default)
    #[arg(long)]
    pub output_format: Option<AlignmentFormat>,

    /// Keep H and P operators in rewritten CIGARs instead of dropping them
    #[arg(long)]
    pub keep_zero_advance_ops: bool,

    /// Fail if a reference contig's MD5 differs from the header's M5 tag
    #[arg(long)]
    pub check_md5: bool,

    /// Log progress every N records
    #[arg(long, default_value_t = DEFAULT_PROGRESS_INTERVAL)]
    pub progress_interval: u64,
}

impl FixArgs {
    fn config(&self) -> FixConfig {
        FixConfig {
            zero_advance: if self.keep_zero_advance_ops {
                ZeroAdvancePolicy::Keep
            } else {
                ZeroAdvancePolicy::Drop
            },
            check_md5: self.check_md5,
        }
    }

    fn writes_stdout(&self) -> bool {
        self.output.as_os_str() == "-"
    }
}

/// Execute fix subcommand
///
/// # Errors
///
/// Returns an error if the input, output, or reference cannot be opened, or if
/// any record cannot be fixed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: FixArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let provider = open_reference(&args.reference)
        .with_context(|| format!("Failed to open reference {}", args.reference.display()))?;

    let reader = AlignmentReader::open(&args.input, args.input_format)
        .with_context(|| format!("Failed to open input {}", args.input.display()))?;

    let command_line = std::env::args().collect::<Vec<_>>().join(" ");
    let output_header = add_program_record(
        reader.header().clone(),
        env!("CARGO_PKG_VERSION"),
        &command_line,
    )?;

    let mut writer = AlignmentWriter::create(&args.output, args.output_format)
        .with_context(|| format!("Failed to create output {}", args.output.display()))?;

    let mut fixer = CigarFixer::with_header(provider, args.config(), reader.header());
    let mut progress = ProgressLogger::new(args.progress_interval);

    info!(
        input = %args.input.display(),
        reference = %args.reference.display(),
        "Rewriting CIGARs"
    );
    pipeline::run(reader, &mut writer, &output_header, &mut fixer, &mut progress)?;

    let stats = fixer.into_stats();
    // Keep the summary off stdout when records are streamed there
    let mut out: Box<dyn Write> = if args.writes_stdout() {
        Box::new(std::io::stderr())
    } else {
        Box::new(std::io::stdout())
    };

    match format {
        OutputFormat::Text => print_text_summary(&mut out, &stats, verbose)?,
        OutputFormat::Json => print_json_summary(&mut out, &stats)?,
        OutputFormat::Tsv => print_tsv_summary(&mut out, &stats)?,
    }

    Ok(())
}

fn print_text_summary(out: &mut dyn Write, stats: &FixStats, verbose: bool) -> anyhow::Result<()> {
    writeln!(out, "CIGAR Fix Summary")?;
    writeln!(out, "{}", "=".repeat(60))?;
    writeln!(out, "  Records: {}", stats.records)?;
    writeln!(out, "  Rewritten: {}", stats.rewritten)?;
    writeln!(out, "  Passed through: {}", stats.passed_through())?;
    if verbose {
        writeln!(out, "    Unmapped: {}", stats.unmapped)?;
        writeln!(out, "    No CIGAR: {}", stats.no_cigar)?;
        writeln!(out, "    No bases: {}", stats.no_bases)?;
        writeln!(out, "  Contig loads: {}", stats.contig_loads)?;
        writeln!(out, "  Dropped H/P operators: {}", stats.dropped_zero_advance_ops)?;
    }
    writeln!(out, "  Matched bases: {}", stats.matched_bases)?;
    writeln!(out, "  Mismatched bases: {}", stats.mismatched_bases)?;
    writeln!(out, "  Mismatch rate: {:.4}%", stats.mismatch_rate() * 100.0)?;
    Ok(())
}

fn print_json_summary(out: &mut dyn Write, stats: &FixStats) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "stats": stats,
        "passed_through": stats.passed_through(),
        "mismatch_rate": stats.mismatch_rate(),
    });

    writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
    Ok(())
}

fn print_tsv_summary(out: &mut dyn Write, stats: &FixStats) -> anyhow::Result<()> {
    writeln!(
        out,
        "records\trewritten\tunmapped\tno_cigar\tno_bases\tcontig_loads\tmatched_bases\tmismatched_bases\tdropped_zero_advance_ops"
    )?;
    writeln!(
        out,
        "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
        stats.records,
        stats.rewritten,
        stats.unmapped,
        stats.no_cigar,
        stats.no_bases,
        stats.contig_loads,
        stats.matched_bases,
        stats.mismatched_bases,
        stats.dropped_zero_advance_ops,
    )?;
    Ok(())
}
