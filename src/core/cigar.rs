use noodles::sam::alignment::record::cigar::Op;
use noodles::sam::alignment::record_buf::Cigar;
use serde::{Deserialize, Serialize};

use crate::core::operator::Operator;
use crate::core::types::FixError;

/// Longest run a BAM CIGAR op can hold (28-bit length field)
pub const MAX_RUN_LENGTH: usize = (1 << 28) - 1;

/// A run-length encoded (operator, length) pair. `length` is always in `1..=MAX_RUN_LENGTH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub operator: Operator,
    pub length: usize,
}

impl Run {
    /// Create a run
    ///
    /// # Errors
    ///
    /// Returns `FixError::InvalidLength` if `length` is zero or above [`MAX_RUN_LENGTH`].
    pub fn new(operator: Operator, length: usize) -> Result<Self, FixError> {
        if length == 0 || length > MAX_RUN_LENGTH {
            return Err(FixError::InvalidLength(format!("{length}{operator}")));
        }
        Ok(Self { operator, length })
    }

    /// A single-position run
    #[must_use]
    pub fn single(operator: Operator) -> Self {
        Self {
            operator,
            length: 1,
        }
    }
}

impl std::fmt::Display for Run {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.length, self.operator)
    }
}

/// Ordered runs describing one alignment
pub type OperationList = Vec<Run>;

/// Parse SAM CIGAR text (`*` is the empty list)
///
/// # Errors
///
/// Returns `FixError::UnsupportedOperator` for an unknown operator symbol and
/// `FixError::InvalidLength` for a missing or zero length, or one above
/// [`MAX_RUN_LENGTH`].
pub fn parse_cigar(text: &str) -> Result<OperationList, FixError> {
    let text = text.trim();
    if text.is_empty() || text == "*" {
        return Ok(Vec::new());
    }

    let mut runs = Vec::new();
    let mut length: Option<usize> = None;

    for c in text.chars() {
        if let Some(digit) = c.to_digit(10) {
            let current = length.unwrap_or(0);
            length = Some(
                current
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(digit as usize))
                    .ok_or_else(|| FixError::InvalidLength(text.to_string()))?,
            );
        } else {
            let operator = Operator::from_symbol(c)?;
            let len = length
                .take()
                .ok_or_else(|| FixError::InvalidLength(format!("{c} has no length in {text}")))?;
            runs.push(Run::new(operator, len)?);
        }
    }

    if length.is_some() {
        return Err(FixError::InvalidLength(format!(
            "trailing length without operator in {text}"
        )));
    }

    Ok(runs)
}

/// Format runs as SAM CIGAR text (`*` for the empty list)
#[must_use]
pub fn format_cigar(runs: &[Run]) -> String {
    if runs.is_empty() {
        return "*".to_string();
    }
    runs.iter().map(ToString::to_string).collect()
}

/// Number of read bases the runs consume
#[must_use]
pub fn read_length(runs: &[Run]) -> usize {
    runs.iter()
        .filter(|r| r.operator.consumes_read())
        .map(|r| r.length)
        .sum()
}

/// Number of reference bases the runs span
#[must_use]
pub fn reference_span(runs: &[Run]) -> usize {
    runs.iter()
        .filter(|r| r.operator.consumes_reference())
        .map(|r| r.length)
        .sum()
}

/// Convert a noodles CIGAR into runs
///
/// # Errors
///
/// Returns `FixError::InvalidLength` if any op has length zero.
pub fn from_noodles(cigar: &Cigar) -> Result<OperationList, FixError> {
    cigar
        .as_ref()
        .iter()
        .map(|op| Run::new(Operator::from(op.kind()), op.len()))
        .collect()
}

/// Convert runs into a noodles CIGAR
#[must_use]
pub fn to_noodles(runs: &[Run]) -> Cigar {
    runs.iter()
        .map(|run| Op::new(run.operator.into(), run.length))
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use noodles::sam::alignment::record::cigar::op::Kind;

    #[test]
    fn test_parse_cigar() {
        let runs = parse_cigar("2S10M1I3D4=1X5H").unwrap();
        assert_eq!(runs.len(), 7);
        assert_eq!(runs[0], Run::new(Operator::SoftClip, 2).unwrap());
        assert_eq!(runs[1], Run::new(Operator::MatchOrMismatch, 10).unwrap());
        assert_eq!(runs[5], Run::new(Operator::SeqMismatch, 1).unwrap());
        assert_eq!(format_cigar(&runs), "2S10M1I3D4=1X5H");
    }

    #[test]
    fn test_parse_empty_cigar() {
        assert!(parse_cigar("*").unwrap().is_empty());
        assert!(parse_cigar("").unwrap().is_empty());
        assert_eq!(format_cigar(&[]), "*");
    }

    #[test]
    fn test_parse_cigar_errors() {
        assert!(matches!(
            parse_cigar("10M2B"),
            Err(FixError::UnsupportedOperator { operator: 'B' })
        ));
        assert!(matches!(parse_cigar("M"), Err(FixError::InvalidLength(_))));
        assert!(matches!(parse_cigar("0M"), Err(FixError::InvalidLength(_))));
        assert!(matches!(parse_cigar("10M5"), Err(FixError::InvalidLength(_))));
        assert!(matches!(
            parse_cigar("99999999999999999999999M"),
            Err(FixError::InvalidLength(_))
        ));
    }

    #[test]
    fn test_run_length_limit() {
        assert!(Run::new(Operator::Skip, MAX_RUN_LENGTH).is_ok());
        assert!(matches!(
            Run::new(Operator::Skip, MAX_RUN_LENGTH + 1),
            Err(FixError::InvalidLength(_))
        ));
        assert!(matches!(
            parse_cigar("1M18446744073709551615N1M"),
            Err(FixError::InvalidLength(_))
        ));
        assert!(matches!(
            parse_cigar("268435456="),
            Err(FixError::InvalidLength(_))
        ));
        assert_eq!(parse_cigar("268435455=").unwrap()[0].length, MAX_RUN_LENGTH);
    }

    #[test]
    fn test_lengths() {
        let runs = parse_cigar("3H2S5M2I1D4N3=1X").unwrap();
        assert_eq!(read_length(&runs), 2 + 5 + 2 + 3 + 1);
        assert_eq!(reference_span(&runs), 5 + 1 + 4 + 3 + 1);
    }

    #[test]
    fn test_noodles_conversion() {
        let runs = parse_cigar("2S8M1D3X").unwrap();
        let cigar = to_noodles(&runs);
        let kinds: Vec<(Kind, usize)> = cigar.as_ref().iter().map(|op| (op.kind(), op.len())).collect();
        assert_eq!(
            kinds,
            vec![
                (Kind::SoftClip, 2),
                (Kind::Match, 8),
                (Kind::Deletion, 1),
                (Kind::SequenceMismatch, 3),
            ]
        );
        assert_eq!(from_noodles(&cigar).unwrap(), runs);
    }

    #[test]
    fn test_from_noodles_rejects_zero_length() {
        let cigar: Cigar = vec![Op::new(Kind::Match, 0)].into();
        assert!(matches!(from_noodles(&cigar), Err(FixError::InvalidLength(_))));
    }
}
