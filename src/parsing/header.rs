//! Adds the `@PG` record describing this run to the output header.

use std::collections::HashSet;

use bstr::BString;
use noodles::sam::header::record::value::map::program::tag;
use noodles::sam::header::record::value::map::Program;
use noodles::sam::header::record::value::Map;
use noodles::sam::Header;

use crate::parsing::alignment::AlignmentIoError;

/// Program name written to `@PG PN`
pub const PROGRAM_NAME: &str = "cigar-fix";

/// ID of the last program in the `@PG` chain (the one no other `PP` points at)
#[must_use]
pub fn last_program_id(header: &Header) -> Option<String> {
    let programs = header.programs();
    let program_map = programs.as_ref();

    let referenced: HashSet<&[u8]> = program_map
        .values()
        .filter_map(|pg| pg.other_fields().get(&tag::PREVIOUS_PROGRAM_ID))
        .map(|pp| pp.as_ref())
        .collect();

    program_map
        .keys()
        .find(|id| !referenced.contains(id.as_slice()))
        .or_else(|| program_map.keys().next())
        .map(|id| String::from_utf8_lossy(id).to_string())
}

/// `base_id`, or `base_id.N` for the first N that is not taken
#[must_use]
pub fn unique_program_id(header: &Header, base_id: &str) -> String {
    let programs = header.programs();
    let program_map = programs.as_ref();

    if !program_map.contains_key(base_id.as_bytes()) {
        return base_id.to_string();
    }

    (1..)
        .map(|i| format!("{base_id}.{i}"))
        .find(|candidate| !program_map.contains_key(candidate.as_bytes()))
        .unwrap_or_else(|| base_id.to_string())
}

/// Return `header` with a `@PG` record for this program appended to the chain
///
/// # Errors
///
/// Returns `AlignmentIoError::Noodles` if the record cannot be built or added.
pub fn add_program_record(
    mut header: Header,
    version: &str,
    command_line: &str,
) -> Result<Header, AlignmentIoError> {
    let previous = last_program_id(&header);
    let id = unique_program_id(&header, PROGRAM_NAME);

    let mut builder = Map::<Program>::builder()
        .insert(tag::NAME, PROGRAM_NAME)
        .insert(tag::VERSION, version)
        .insert(tag::COMMAND_LINE, command_line);
    if let Some(pp) = previous.as_deref() {
        builder = builder.insert(tag::PREVIOUS_PROGRAM_ID, pp);
    }
    let program = builder
        .build()
        .map_err(|e| AlignmentIoError::Noodles(e.to_string()))?;

    header
        .programs_mut()
        .add(BString::from(id), program)
        .map_err(|e| AlignmentIoError::Noodles(e.to_string()))?;

    Ok(header)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_to_empty_header() {
        let header = add_program_record(Header::default(), "0.1.0", "cigar-fix fix").unwrap();
        let programs = header.programs();
        let pg = programs.as_ref().get(b"cigar-fix".as_slice()).unwrap();
        assert!(pg.other_fields().get(&tag::PREVIOUS_PROGRAM_ID).is_none());
        assert_eq!(
            pg.other_fields().get(&tag::VERSION).map(|v| v.to_string()),
            Some("0.1.0".to_string())
        );
    }

    #[test]
    fn test_chains_after_existing_program() {
        let header: Header = "@PG\tID:bwa\tPN:bwa\n".parse().unwrap();
        assert_eq!(last_program_id(&header), Some("bwa".to_string()));

        let header = add_program_record(header, "0.1.0", "cigar-fix fix").unwrap();
        let programs = header.programs();
        let pg = programs.as_ref().get(b"cigar-fix".as_slice()).unwrap();
        assert_eq!(
            pg.other_fields()
                .get(&tag::PREVIOUS_PROGRAM_ID)
                .map(|v| v.to_string()),
            Some("bwa".to_string())
        );
        assert_eq!(last_program_id(&header), Some("cigar-fix".to_string()));
    }

    #[test]
    fn test_unique_id_on_rerun() {
        let header = add_program_record(Header::default(), "0.1.0", "first").unwrap();
        assert_eq!(unique_program_id(&header, PROGRAM_NAME), "cigar-fix.1");

        let header = add_program_record(header, "0.1.0", "second").unwrap();
        let programs = header.programs();
        assert!(programs.as_ref().contains_key(b"cigar-fix.1".as_slice()));
        assert_eq!(last_program_id(&header), Some("cigar-fix.1".to_string()));
    }
}
