use noodles::sam::alignment::RecordBuf;
use noodles::sam::Header;

use crate::core::cigar::{self, OperationList};
use crate::core::record::AlignmentRecord;
use crate::core::types::{FixError, PassThrough, ZeroAdvancePolicy};
use crate::fixing::classifier::classify;
use crate::fixing::compactor::compact;
use crate::fixing::stats::FixStats;
use crate::reference::cache::ReferenceCache;
use crate::reference::dictionary::SequenceDictionary;
use crate::reference::provider::ReferenceProvider;

/// Configuration for the CIGAR fixer
#[derive(Debug, Clone, Copy, Default)]
pub struct FixConfig {
    /// What to do with `H` and `P` runs
    pub zero_advance: ZeroAdvancePolicy,
    /// Compare each loaded contig's MD5 with the header's `M5`
    pub check_md5: bool,
}

/// Result of fixing one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixOutcome {
    /// The record's CIGAR should be replaced with these runs
    Rewritten(OperationList),
    /// The record should be forwarded unchanged
    PassThrough(PassThrough),
}

/// Rewrites `M` runs into `=`/`X` runs, one record at a time
pub struct CigarFixer<P> {
    cache: ReferenceCache<P>,
    config: FixConfig,
    stats: FixStats,
}

impl<P: ReferenceProvider> CigarFixer<P> {
    /// Create a fixer that does not validate contigs against a header
    pub fn new(provider: P, config: FixConfig) -> Self {
        Self {
            cache: ReferenceCache::new(provider),
            config,
            stats: FixStats::default(),
        }
    }

    /// Create a fixer that validates each loaded contig against the header's `@SQ` lines
    pub fn with_header(provider: P, config: FixConfig, header: &Header) -> Self {
        let dictionary = SequenceDictionary::from_header(header);
        Self {
            cache: ReferenceCache::new(provider).with_dictionary(dictionary, config.check_md5),
            config,
            stats: FixStats::default(),
        }
    }

    /// Compute the replacement CIGAR for a record.
    ///
    /// Unmapped records, records without a CIGAR and records without bases are
    /// passed through. Nothing is mutated; the caller applies the outcome.
    ///
    /// # Errors
    ///
    /// Returns `FixError::ReferenceUnavailable` if the contig cannot be loaded,
    /// `FixError::ReadTooShort` if the CIGAR overruns the bases, or
    /// `FixError::MissingReferenceSequence`/`FixError::MissingAlignmentStart`
    /// for a mapped record without a position.
    pub fn fix(&mut self, record: &AlignmentRecord) -> Result<FixOutcome, FixError> {
        if let Some(reason) = pass_through_reason(record) {
            self.stats.record_pass_through(reason);
            return Ok(FixOutcome::PassThrough(reason));
        }

        let (Some(id), Some(name)) = (record.reference_sequence_id, record.reference_name.as_deref())
        else {
            return Err(FixError::MissingReferenceSequence(record.name.clone()));
        };
        let start = record
            .alignment_start
            .ok_or_else(|| FixError::MissingAlignmentStart(record.name.clone()))?;

        let view = self.cache.get_view(id, name)?;
        let expanded = classify(
            &record.operations,
            &record.bases,
            start,
            view,
            self.config.zero_advance,
        )?;
        let compacted = compact(&expanded);

        self.stats.record_rewrite(&record.operations, &compacted);
        self.stats.contig_loads = self.cache.loads();
        Ok(FixOutcome::Rewritten(compacted))
    }

    /// Fix a noodles record in place, replacing its CIGAR when rewritten
    ///
    /// # Errors
    ///
    /// Returns any error from [`CigarFixer::fix`], or `FixError::InvalidLength`
    /// if the record holds a zero-length CIGAR op.
    pub fn fix_record_buf(
        &mut self,
        record: &mut RecordBuf,
        header: &Header,
    ) -> Result<FixOutcome, FixError> {
        let alignment = AlignmentRecord::from_record_buf(record, header)?;
        let outcome = self.fix(&alignment)?;
        if let FixOutcome::Rewritten(runs) = &outcome {
            *record.cigar_mut() = cigar::to_noodles(runs);
        }
        Ok(outcome)
    }

    #[must_use]
    pub fn stats(&self) -> &FixStats {
        &self.stats
    }

    #[must_use]
    pub fn into_stats(self) -> FixStats {
        self.stats
    }
}

fn pass_through_reason(record: &AlignmentRecord) -> Option<PassThrough> {
    if record.unmapped {
        Some(PassThrough::Unmapped)
    } else if record.operations.is_empty() {
        Some(PassThrough::NoCigar)
    } else if record.bases.is_empty() {
        Some(PassThrough::NoBases)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cigar::{format_cigar, parse_cigar};
    use crate::reference::provider::InMemoryProvider;

    fn fixer(reference: &str) -> CigarFixer<InMemoryProvider> {
        CigarFixer::new(
            InMemoryProvider::from_sequences([("chr1", reference)]),
            FixConfig::default(),
        )
    }

    fn record(cigar: &str, bases: &str, start: usize) -> AlignmentRecord {
        AlignmentRecord {
            name: "read1".to_string(),
            reference_sequence_id: Some(0),
            reference_name: Some("chr1".to_string()),
            alignment_start: Some(start),
            operations: parse_cigar(cigar).unwrap(),
            bases: bases.as_bytes().to_vec(),
            unmapped: false,
        }
    }

    fn rewritten(outcome: FixOutcome) -> String {
        match outcome {
            FixOutcome::Rewritten(runs) => format_cigar(&runs),
            FixOutcome::PassThrough(reason) => panic!("unexpected pass-through: {reason}"),
        }
    }

    #[test]
    fn test_mismatch_at_last_base() {
        let mut fixer = fixer("ACGA");
        let outcome = fixer.fix(&record("4M", "ACGT", 1)).unwrap();
        assert_eq!(rewritten(outcome), "3=1X");
    }

    #[test]
    fn test_reference_n_suppresses_mismatch() {
        let mut fixer = fixer("ACNT");
        let outcome = fixer.fix(&record("4M", "ACGT", 1)).unwrap();
        assert_eq!(rewritten(outcome), "4=");
    }

    #[test]
    fn test_soft_clip_then_match() {
        let mut fixer = fixer("AAGGGT");
        let outcome = fixer.fix(&record("2S3M", "TTGGG", 3)).unwrap();
        assert_eq!(rewritten(outcome), "2S3=");
    }

    #[test]
    fn test_adjacent_resolved_runs_merge() {
        let mut fixer = fixer("ACGTA");
        let outcome = fixer.fix(&record("2=3=", "ACGTA", 1)).unwrap();
        assert_eq!(rewritten(outcome), "5=");
    }

    #[test]
    fn test_reference_shorter_than_alignment() {
        let mut fixer = fixer("ACG");
        let outcome = fixer.fix(&record("2S6M", "TTACGTTT", 1)).unwrap();
        assert_eq!(rewritten(outcome), "2S6=");
    }

    #[test]
    fn test_pass_through_unmapped() {
        let mut fixer = fixer("ACGT");
        let mut rec = record("4M", "ACGT", 1);
        rec.unmapped = true;
        assert_eq!(
            fixer.fix(&rec).unwrap(),
            FixOutcome::PassThrough(PassThrough::Unmapped)
        );
        assert_eq!(fixer.stats().unmapped, 1);
        assert_eq!(fixer.stats().contig_loads, 0);
    }

    #[test]
    fn test_pass_through_no_cigar_or_bases() {
        let mut fixer = fixer("ACGT");
        assert_eq!(
            fixer.fix(&record("*", "ACGT", 1)).unwrap(),
            FixOutcome::PassThrough(PassThrough::NoCigar)
        );
        assert_eq!(
            fixer.fix(&record("4M", "", 1)).unwrap(),
            FixOutcome::PassThrough(PassThrough::NoBases)
        );
        assert_eq!(fixer.stats().passed_through(), 2);
    }

    #[test]
    fn test_unknown_contig_is_error() {
        let mut fixer = fixer("ACGT");
        let mut rec = record("4M", "ACGT", 1);
        rec.reference_sequence_id = Some(3);
        rec.reference_name = Some("chr9".to_string());
        assert!(matches!(
            fixer.fix(&rec),
            Err(FixError::ReferenceUnavailable { .. })
        ));
    }

    #[test]
    fn test_missing_position_is_error() {
        let mut fixer = fixer("ACGT");
        let mut rec = record("4M", "ACGT", 1);
        rec.alignment_start = None;
        assert!(matches!(
            fixer.fix(&rec),
            Err(FixError::MissingAlignmentStart(_))
        ));

        let mut rec = record("4M", "ACGT", 1);
        rec.reference_sequence_id = None;
        assert!(matches!(
            fixer.fix(&rec),
            Err(FixError::MissingReferenceSequence(_))
        ));
    }

    #[test]
    fn test_keep_zero_advance_policy() {
        let mut fixer = CigarFixer::new(
            InMemoryProvider::from_sequences([("chr1", "ACGT")]),
            FixConfig {
                zero_advance: ZeroAdvancePolicy::Keep,
                check_md5: false,
            },
        );
        let outcome = fixer.fix(&record("5H4M", "ACGT", 1)).unwrap();
        assert_eq!(rewritten(outcome), "5H4=");
        assert_eq!(fixer.stats().dropped_zero_advance_ops, 0);
    }

    #[test]
    fn test_stats_accumulate() {
        let mut fixer = fixer("ACGA");
        fixer.fix(&record("4M", "ACGT", 1)).unwrap();
        fixer.fix(&record("3H4M", "ACGA", 1)).unwrap();

        let stats = fixer.into_stats();
        assert_eq!(stats.rewritten, 2);
        assert_eq!(stats.matched_bases, 7);
        assert_eq!(stats.mismatched_bases, 1);
        assert_eq!(stats.contig_loads, 1);
        assert_eq!(stats.dropped_zero_advance_ops, 1);
    }
}
