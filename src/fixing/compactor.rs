use crate::core::cigar::{OperationList, Run, MAX_RUN_LENGTH};

/// Merge adjacent runs sharing an operator into a single run.
///
/// Order is preserved and merging chains through any number of neighbours,
/// so `compact(&compact(runs)) == compact(runs)`. A merged run never exceeds
/// [`MAX_RUN_LENGTH`]: the excess starts a new run of the same operator.
#[must_use]
pub fn compact(runs: &[Run]) -> OperationList {
    runs.iter().fold(Vec::with_capacity(runs.len()), |mut acc, run| {
        match acc.last_mut() {
            Some(last) if last.operator == run.operator && last.length < MAX_RUN_LENGTH => {
                let taken = run.length.min(MAX_RUN_LENGTH - last.length);
                last.length += taken;
                if taken < run.length {
                    acc.push(Run {
                        operator: run.operator,
                        length: run.length - taken,
                    });
                }
            }
            _ => acc.push(*run),
        }
        acc
    })
}
