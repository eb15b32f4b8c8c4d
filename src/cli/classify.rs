use clap::Args;

use crate::cli::OutputFormat;
use crate::core::cigar::{format_cigar, parse_cigar, read_length, reference_span, OperationList};
use crate::core::types::ZeroAdvancePolicy;
use crate::fixing::{classify, compact};
use crate::reference::view::ReferenceView;

#[derive(Args)]
pub struct ClassifyArgs {
    /// CIGAR string to classify (e.g. 2S4M1D3M)
    #[arg(long, required = true)]
    pub cigar: String,

    /// Read bases
    #[arg(long, required = true)]
    pub read: String,

    /// Reference bases
    #[arg(long, required = true)]
    pub reference: String,

    /// 1-based position of the first aligned base within the reference bases
    #[arg(long, default_value_t = 1)]
    pub start: usize,

    /// Keep H and P operators instead of dropping them
    #[arg(long)]
    pub keep_zero_advance_ops: bool,
}

struct Classification {
    input: OperationList,
    expanded: OperationList,
    compacted: OperationList,
}

fn classify_args(args: &ClassifyArgs) -> anyhow::Result<Classification> {
    let input = parse_cigar(&args.cigar)?;
    if input.is_empty() {
        anyhow::bail!("CIGAR '{}' has no operators", args.cigar);
    }
    if args.start == 0 {
        anyhow::bail!("--start is 1-based and must be at least 1");
    }

    let policy = if args.keep_zero_advance_ops {
        ZeroAdvancePolicy::Keep
    } else {
        ZeroAdvancePolicy::Drop
    };
    let reference = ReferenceView::new("reference", args.reference.as_bytes().to_vec());
    let expanded = classify(&input, args.read.as_bytes(), args.start, &reference, policy)?;
    let compacted = compact(&expanded);

    Ok(Classification { input, expanded, compacted })
}

/// Execute classify subcommand
///
/// # Errors
///
/// Returns an error if the CIGAR cannot be parsed or needs more read bases than given.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ClassifyArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let result = classify_args(&args)?;

    match format {
        OutputFormat::Text => print_text(&result, verbose),
        OutputFormat::Json => print_json(&result)?,
        OutputFormat::Tsv => print_tsv(&result),
    }

    Ok(())
}

fn print_text(result: &Classification, verbose: bool) {
    println!("Input:     {}", format_cigar(&result.input));
    if verbose {
        println!("Expanded:  {}", format_cigar(&result.expanded));
        println!("Read bases consumed: {}", read_length(&result.input));
        println!("Reference bases spanned: {}", reference_span(&result.input));
    }
    println!("Rewritten: {}", format_cigar(&result.compacted));
}

fn print_json(result: &Classification) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "input": format_cigar(&result.input),
        "expanded": format_cigar(&result.expanded),
        "rewritten": format_cigar(&result.compacted),
        "reference_span": reference_span(&result.input),
        "operations": result.compacted,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(result: &Classification) {
    println!("input\texpanded\trewritten");
    println!(
        "{}\t{}\t{}",
        format_cigar(&result.input),
        format_cigar(&result.expanded),
        format_cigar(&result.compacted)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(cigar: &str, read: &str, reference: &str, start: usize) -> ClassifyArgs {
        ClassifyArgs {
            cigar: cigar.to_string(),
            read: read.to_string(),
            reference: reference.to_string(),
            start,
            keep_zero_advance_ops: false,
        }
    }

    #[test]
    fn test_classify_args_mismatch() {
        let result = classify_args(&args("4M", "ACGT", "ACGA", 1)).unwrap();
        assert_eq!(format_cigar(&result.expanded), "1=1=1=1X");
        assert_eq!(format_cigar(&result.compacted), "3=1X");
    }

    #[test]
    fn test_classify_args_offset_start() {
        let result = classify_args(&args("2M", "GT", "ACGT", 3)).unwrap();
        assert_eq!(format_cigar(&result.compacted), "2=");
    }

    #[test]
    fn test_classify_args_keep_hard_clip() {
        let mut a = args("2H2M", "AC", "AC", 1);
        a.keep_zero_advance_ops = true;
        let result = classify_args(&a).unwrap();
        assert_eq!(format_cigar(&result.compacted), "2H2=");
    }

    #[test]
    fn test_classify_args_rejects_bad_input() {
        assert!(classify_args(&args("*", "ACGT", "ACGT", 1)).is_err());
        assert!(classify_args(&args("4M", "ACGT", "ACGT", 0)).is_err());
        assert!(classify_args(&args("4Q", "ACGT", "ACGT", 1)).is_err());
        assert!(classify_args(&args("6M", "ACGT", "ACGTAC", 1)).is_err());
        assert!(classify_args(&args("1M18446744073709551615N1M", "AA", "A", 1)).is_err());
    }
}
