use noodles::sam::alignment::RecordBuf;
use noodles::sam::Header;

use crate::core::cigar::{self, OperationList};
use crate::core::types::FixError;

/// The parts of an alignment record the CIGAR rewrite reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    /// Read name, used for error messages only
    pub name: String,

    /// Index of the reference sequence in the header dictionary
    pub reference_sequence_id: Option<usize>,

    /// Reference sequence name (`RNAME`)
    pub reference_name: Option<String>,

    /// 1-based leftmost reference position
    pub alignment_start: Option<usize>,

    pub operations: OperationList,

    /// Read bases, one per read position; empty when the record stores `*`
    pub bases: Vec<u8>,

    pub unmapped: bool,
}

impl AlignmentRecord {
    /// Extract the fields needed for rewriting from a noodles record
    ///
    /// # Errors
    ///
    /// Returns `FixError::InvalidLength` if the record carries a zero-length CIGAR op.
    pub fn from_record_buf(record: &RecordBuf, header: &Header) -> Result<Self, FixError> {
        let name = record
            .name()
            .map_or_else(|| "*".to_string(), |n| String::from_utf8_lossy(n).to_string());

        let reference_sequence_id = record.reference_sequence_id();
        let reference_name = reference_sequence_id
            .and_then(|id| header.reference_sequences().get_index(id))
            .map(|(name, _)| String::from_utf8_lossy(name).to_string());

        Ok(Self {
            name,
            reference_sequence_id,
            reference_name,
            alignment_start: record.alignment_start().map(usize::from),
            operations: cigar::from_noodles(record.cigar())?,
            bases: record.sequence().as_ref().to_vec(),
            unmapped: record.flags().is_unmapped(),
        })
    }
}
