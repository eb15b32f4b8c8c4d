use serde::{Deserialize, Serialize};

use crate::core::cigar::Run;
use crate::core::operator::Operator;
use crate::core::types::PassThrough;

/// Counters accumulated over a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixStats {
    /// Records seen
    pub records: u64,
    /// Records whose CIGAR was rewritten
    pub rewritten: u64,
    /// Records passed through because they are unmapped
    pub unmapped: u64,
    /// Records passed through because they have no CIGAR
    pub no_cigar: u64,
    /// Records passed through because they have no bases
    pub no_bases: u64,
    /// Reference contig loads
    pub contig_loads: u64,
    /// `=` bases in rewritten CIGARs
    pub matched_bases: u64,
    /// `X` bases in rewritten CIGARs
    pub mismatched_bases: u64,
    /// `H`/`P` runs removed from rewritten CIGARs
    pub dropped_zero_advance_ops: u64,
}

impl FixStats {
    pub fn record_pass_through(&mut self, reason: PassThrough) {
        self.records += 1;
        match reason {
            PassThrough::Unmapped => self.unmapped += 1,
            PassThrough::NoCigar => self.no_cigar += 1,
            PassThrough::NoBases => self.no_bases += 1,
        }
    }

    pub fn record_rewrite(&mut self, input: &[Run], output: &[Run]) {
        self.records += 1;
        self.rewritten += 1;

        for run in output {
            match run.operator {
                Operator::SeqMatch => self.matched_bases += run.length as u64,
                Operator::SeqMismatch => self.mismatched_bases += run.length as u64,
                _ => {}
            }
        }

        let zero_advance = |runs: &[Run]| {
            runs.iter()
                .filter(|r| matches!(r.operator, Operator::HardClip | Operator::Padding))
                .count() as u64
        };
        self.dropped_zero_advance_ops += zero_advance(input).saturating_sub(zero_advance(output));
    }

    /// Records forwarded unchanged
    #[must_use]
    pub fn passed_through(&self) -> u64 {
        self.unmapped + self.no_cigar + self.no_bases
    }

    /// Fraction of classified aligned bases that are mismatches
    #[must_use]
    pub fn mismatch_rate(&self) -> f64 {
        let total = self.matched_bases + self.mismatched_bases;
        if total == 0 {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        {
            self.mismatched_bases as f64 / total as f64
        }
    }
}
