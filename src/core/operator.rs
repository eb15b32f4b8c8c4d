use noodles::sam::alignment::record::cigar::op::Kind;
use serde::{Deserialize, Serialize};

use crate::core::types::FixError;

/// A CIGAR operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    /// `M`: aligned, match or mismatch unknown
    MatchOrMismatch,
    /// `I`
    Insertion,
    /// `D`
    Deletion,
    /// `N`: skipped reference region (intron)
    Skip,
    /// `S`
    SoftClip,
    /// `H`
    HardClip,
    /// `P`
    Padding,
    /// `=`
    SeqMatch,
    /// `X`
    SeqMismatch,
}

impl Operator {
    /// All operators in SAM specification order (`MIDNSHP=X`)
    pub const ALL: [Operator; 9] = [
        Operator::MatchOrMismatch,
        Operator::Insertion,
        Operator::Deletion,
        Operator::Skip,
        Operator::SoftClip,
        Operator::HardClip,
        Operator::Padding,
        Operator::SeqMatch,
        Operator::SeqMismatch,
    ];

    /// The SAM text symbol
    #[must_use]
    pub fn symbol(self) -> char {
        match self {
            Self::MatchOrMismatch => 'M',
            Self::Insertion => 'I',
            Self::Deletion => 'D',
            Self::Skip => 'N',
            Self::SoftClip => 'S',
            Self::HardClip => 'H',
            Self::Padding => 'P',
            Self::SeqMatch => '=',
            Self::SeqMismatch => 'X',
        }
    }

    /// Parse a SAM text symbol
    ///
    /// # Errors
    ///
    /// Returns `FixError::UnsupportedOperator` for anything outside `MIDNSHP=X`.
    pub fn from_symbol(symbol: char) -> Result<Self, FixError> {
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == symbol)
            .ok_or(FixError::UnsupportedOperator { operator: symbol })
    }

    #[must_use]
    pub fn consumes_read(self) -> bool {
        matches!(
            self,
            Self::MatchOrMismatch
                | Self::Insertion
                | Self::SoftClip
                | Self::SeqMatch
                | Self::SeqMismatch
        )
    }

    #[must_use]
    pub fn consumes_reference(self) -> bool {
        matches!(
            self,
            Self::MatchOrMismatch
                | Self::Deletion
                | Self::Skip
                | Self::SeqMatch
                | Self::SeqMismatch
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl From<Kind> for Operator {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Match => Self::MatchOrMismatch,
            Kind::Insertion => Self::Insertion,
            Kind::Deletion => Self::Deletion,
            Kind::Skip => Self::Skip,
            Kind::SoftClip => Self::SoftClip,
            Kind::HardClip => Self::HardClip,
            Kind::Pad => Self::Padding,
            Kind::SequenceMatch => Self::SeqMatch,
            Kind::SequenceMismatch => Self::SeqMismatch,
        }
    }
}

impl From<Operator> for Kind {
    fn from(op: Operator) -> Self {
        match op {
            Operator::MatchOrMismatch => Kind::Match,
            Operator::Insertion => Kind::Insertion,
            Operator::Deletion => Kind::Deletion,
            Operator::Skip => Kind::Skip,
            Operator::SoftClip => Kind::SoftClip,
            Operator::HardClip => Kind::HardClip,
            Operator::Padding => Kind::Pad,
            Operator::SeqMatch => Kind::SequenceMatch,
            Operator::SeqMismatch => Kind::SequenceMismatch,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols_are_sam_order() {
        let symbols: String = Operator::ALL.iter().map(|op| op.symbol()).collect();
        assert_eq!(symbols, "MIDNSHP=X");
    }

    #[test]
    fn test_from_symbol() {
        assert_eq!(Operator::from_symbol('=').unwrap(), Operator::SeqMatch);
        assert_eq!(Operator::from_symbol('N').unwrap(), Operator::Skip);
        assert!(matches!(
            Operator::from_symbol('B'),
            Err(FixError::UnsupportedOperator { operator: 'B' })
        ));
    }

    #[test]
    fn test_noodles_kind_conversion() {
        for op in Operator::ALL {
            assert_eq!(Operator::from(Kind::from(op)), op);
        }
    }

    #[test]
    fn test_consumption() {
        assert!(Operator::SoftClip.consumes_read());
        assert!(!Operator::SoftClip.consumes_reference());
        assert!(Operator::Skip.consumes_reference());
        assert!(!Operator::HardClip.consumes_read());
        assert!(!Operator::Padding.consumes_reference());
    }
}
