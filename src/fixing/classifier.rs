use crate::core::cigar::{read_length, OperationList, Run};
use crate::core::operator::Operator;
use crate::core::types::{FixError, ZeroAdvancePolicy};
use crate::reference::view::ReferenceView;

/// Reference symbol that matches any read base
const REFERENCE_WILDCARD: u8 = b'N';

/// Move a cursor forward
fn advance(cursor: usize, by: usize) -> Result<usize, FixError> {
    cursor
        .checked_add(by)
        .ok_or_else(|| FixError::InvalidLength(format!("cursor at {cursor} cannot advance by {by}")))
}

/// Resolve every `M` run into single-base `=`/`X` runs.
///
/// Walks the runs with a 0-based reference cursor starting at `ref_start - 1`
/// (`ref_start` is the 1-based alignment start) and a read cursor starting at 0.
/// Gap, clip and already-resolved runs are copied through unchanged. An aligned
/// base is `=` when it equals the reference base ignoring case, when the
/// reference base is `N`, or when the reference position lies past the end of
/// the contig; otherwise it is `X`. `H` and `P` advance neither cursor and are
/// dropped or kept according to `policy`.
///
/// Positions past the contig end differ from the older Java `SamFixCigar`,
/// which compared the read base with `*` there and so always emitted `X`.
///
/// The result is not compacted.
///
/// # Errors
///
/// Returns `FixError::ReadTooShort` if an `M` run reaches past the last read base,
/// and `FixError::InvalidLength` if a cursor would overflow.
pub fn classify(
    runs: &[Run],
    bases: &[u8],
    ref_start: usize,
    reference: &ReferenceView,
    policy: ZeroAdvancePolicy,
) -> Result<OperationList, FixError> {
    let mut ref_pos = ref_start.saturating_sub(1);
    let mut read_pos = 0usize;
    let mut out = Vec::with_capacity(runs.len());

    for run in runs {
        match run.operator {
            Operator::HardClip | Operator::Padding => {
                if policy == ZeroAdvancePolicy::Keep {
                    out.push(*run);
                }
            }
            Operator::Skip | Operator::Deletion => {
                out.push(*run);
                ref_pos = advance(ref_pos, run.length)?;
            }
            Operator::SoftClip | Operator::Insertion => {
                out.push(*run);
                read_pos = advance(read_pos, run.length)?;
            }
            Operator::SeqMatch | Operator::SeqMismatch => {
                out.push(*run);
                ref_pos = advance(ref_pos, run.length)?;
                read_pos = advance(read_pos, run.length)?;
            }
            Operator::MatchOrMismatch => {
                out.reserve(run.length);
                for _ in 0..run.length {
                    let read_base = bases
                        .get(read_pos)
                        .ok_or(FixError::ReadTooShort {
                            needed: read_length(runs),
                            available: bases.len(),
                        })?
                        .to_ascii_uppercase();

                    let matched = match reference.base_at(ref_pos).map(|b| b.to_ascii_uppercase()) {
                        None | Some(REFERENCE_WILDCARD) => true,
                        Some(ref_base) => ref_base == read_base,
                    };

                    out.push(Run::single(if matched {
                        Operator::SeqMatch
                    } else {
                        Operator::SeqMismatch
                    }));

                    ref_pos = advance(ref_pos, 1)?;
                    read_pos += 1;
                }
            }
        }
    }

    Ok(out)
}
