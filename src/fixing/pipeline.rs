//! Streams records from a reader through a [`CigarFixer`] to a writer.

use noodles::sam::Header;
use thiserror::Error;

use crate::core::types::FixError;
use crate::fixing::engine::CigarFixer;
use crate::parsing::alignment::{AlignmentIoError, AlignmentReader, AlignmentWriter};
use crate::reference::provider::ReferenceProvider;
use crate::utils::progress::ProgressLogger;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Alignment(#[from] AlignmentIoError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fix record '{read}': {source}")]
    Fix {
        read: String,
        #[source]
        source: FixError,
    },
}

/// Rewrite every record from `reader` into `writer`, preserving order.
///
/// `output_header` is written first and used to encode records; it must carry
/// the same reference sequences as the input header. Stops at the first error
/// without writing the failing record or finishing the writer.
///
/// # Errors
///
/// Returns `PipelineError::Io`/`PipelineError::Alignment` on read or write
/// failure and `PipelineError::Fix` when a record cannot be fixed.
pub fn run<P: ReferenceProvider>(
    reader: AlignmentReader,
    writer: &mut AlignmentWriter,
    output_header: &Header,
    fixer: &mut CigarFixer<P>,
    progress: &mut ProgressLogger,
) -> Result<(), PipelineError> {
    let (input_header, records) = reader.into_parts();
    writer.write_header(output_header)?;

    for result in records {
        let mut record = result?;

        fixer
            .fix_record_buf(&mut record, &input_header)
            .map_err(|source| PipelineError::Fix {
                read: record
                    .name()
                    .map_or_else(|| "*".to_string(), |n| n.to_string()),
                source,
            })?;

        let contig = record
            .reference_sequence_id()
            .and_then(|id| input_header.reference_sequences().get_index(id))
            .map(|(name, _)| name.to_string());
        progress.record(contig.as_deref(), record.alignment_start().map(usize::from));

        writer.write_record(output_header, &record)?;
    }

    writer.finish(output_header)?;
    progress.finish();
    Ok(())
}
