//! End-to-end CLI tests.
//!
//! These tests run the `cigar-fix` binary and validate:
//! 1. Single-CIGAR classification in each output format
//! 2. Rewriting SAM to SAM and SAM to BAM with an @PG record added
//! 3. Failure on a contig missing from the reference

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use cigar_fix::core::cigar::{format_cigar, from_noodles};
use noodles::bam;
use predicates::prelude::*;
use tempfile::TempDir;

const REFERENCE: &str = ">chr1\nACGTACGTAC\nGTACGTACGT\n>chr2\nNNNNNNNN\n";

const SAM: &str = "@HD\tVN:1.6\tSO:coordinate\n\
@SQ\tSN:chr1\tLN:20\n\
@SQ\tSN:chr2\tLN:8\n\
@PG\tID:bwa\tPN:bwa\n\
r1\t0\tchr1\t1\t60\t8M\t*\t0\t0\tACGTACGA\tIIIIIIII\n\
r2\t0\tchr1\t9\t60\t3S2M2I3M\t*\t0\t0\tGGGACCCGTC\tIIIIIIIIII\n\
r3\t4\t*\t0\t0\t*\t*\t0\t0\tACGT\tIIII\n\
r4\t0\tchr2\t1\t60\t1H4M\t*\t0\t0\tACGT\tIIII\n";

fn cigar_fix() -> Command {
    Command::cargo_bin("cigar-fix").unwrap()
}

fn write_inputs(dir: &Path, sam: &str) -> (PathBuf, PathBuf) {
    let input = dir.join("input.sam");
    let reference = dir.join("ref.fa");
    fs::write(&input, sam).unwrap();
    fs::write(&reference, REFERENCE).unwrap();
    (input, reference)
}

fn sam_cigars(text: &str) -> Vec<String> {
    text.lines()
        .filter(|l| !l.starts_with('@'))
        .map(|l| l.split('\t').nth(5).unwrap().to_string())
        .collect()
}

#[test]
fn test_classify_text() {
    cigar_fix()
        .args(["classify", "--cigar", "4M", "--read", "ACGT", "--reference", "ACGA"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Rewritten: 3=1X"));
}

#[test]
fn test_classify_verbose_reports_spans() {
    cigar_fix()
        .args([
            "--verbose", "classify", "--cigar", "1S2M1D1M", "--read", "TACG", "--reference", "ACTG",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Read bases consumed: 4"))
        .stdout(predicate::str::contains("Reference bases spanned: 4"))
        .stdout(predicate::str::contains("Rewritten: 1S2=1D1="));
}

#[test]
fn test_classify_json_with_offset() {
    let output = cigar_fix()
        .args([
            "--format",
            "json",
            "classify",
            "--cigar",
            "2S3M",
            "--read",
            "TTGGA",
            "--reference",
            "AAGGG",
            "--start",
            "3",
        ])
        .output()
        .unwrap();

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["input"], "2S3M");
    assert_eq!(value["expanded"], "2S1=1=1X");
    assert_eq!(value["rewritten"], "2S2=1X");
    assert_eq!(value["reference_span"], 3);
}

#[test]
fn test_classify_rejects_unknown_operator() {
    cigar_fix()
        .args(["classify", "--cigar", "4Q", "--read", "ACGT", "--reference", "ACGT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Q"));
}

#[test]
fn test_fix_sam_to_sam() {
    let dir = TempDir::new().unwrap();
    let (input, reference) = write_inputs(dir.path(), SAM);
    let output = dir.path().join("output.sam");

    cigar_fix()
        .args(["--format", "tsv", "fix", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-R")
        .arg(&reference)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("records\trewritten"))
        .stdout(predicate::str::contains("4\t3\t1\t0\t0\t2\t"));

    let text = fs::read_to_string(&output).unwrap();
    assert_eq!(sam_cigars(&text), vec!["7=1X", "3S2=2I2=1X", "*", "4="]);

    let pg = text
        .lines()
        .find(|l| l.starts_with("@PG") && l.contains("ID:cigar-fix"))
        .expect("missing @PG record");
    assert!(pg.contains("PN:cigar-fix"));
    assert!(pg.contains("PP:bwa"));
}

#[test]
fn test_fix_sam_to_bam_keeping_hard_clips() {
    let dir = TempDir::new().unwrap();
    let (input, reference) = write_inputs(dir.path(), SAM);
    let output = dir.path().join("output.bam");

    cigar_fix()
        .args(["fix", "--keep-zero-advance-ops", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-R")
        .arg(&reference)
        .assert()
        .success()
        .stdout(predicate::str::contains("Rewritten: 3"));

    let mut reader = bam::io::Reader::new(fs::File::open(&output).unwrap());
    let header = reader.read_header().unwrap();
    let cigars: Vec<String> = reader
        .record_bufs(&header)
        .map(|r| format_cigar(&from_noodles(r.unwrap().cigar()).unwrap()))
        .collect();

    assert_eq!(cigars, vec!["7=1X", "3S2=2I2=1X", "*", "1H4="]);
}

#[test]
fn test_fix_to_stdout_keeps_summary_off_stdout() {
    let dir = TempDir::new().unwrap();
    let (input, reference) = write_inputs(dir.path(), SAM);

    let output = cigar_fix()
        .args(["fix", "-o", "-", "-i"])
        .arg(&input)
        .arg("-R")
        .arg(&reference)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.starts_with("@HD"));
    assert_eq!(sam_cigars(&stdout), vec!["7=1X", "3S2=2I2=1X", "*", "4="]);
    assert!(String::from_utf8(output.stderr).unwrap().contains("CIGAR Fix Summary"));
}

#[test]
fn test_fix_fails_on_missing_contig() {
    let dir = TempDir::new().unwrap();
    let sam = "@SQ\tSN:chrUn\tLN:4\n\
r1\t0\tchrUn\t1\t60\t4M\t*\t0\t0\tACGT\tIIII\n";
    let (input, reference) = write_inputs(dir.path(), sam);
    let output = dir.path().join("output.sam");

    cigar_fix()
        .args(["fix", "-i"])
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .arg("-R")
        .arg(&reference)
        .assert()
        .failure()
        .stderr(predicate::str::contains("chrUn"));
}
