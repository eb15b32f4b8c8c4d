//! Expected contig lengths and checksums from the alignment header's `@SQ` lines.

use noodles::sam::header::record::value::map::tag::Other;
use noodles::sam::Header;
use tracing::warn;

use crate::core::types::FixError;
use crate::reference::view::ReferenceView;

/// What the alignment header says about one contig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedContig {
    pub name: String,
    pub length: usize,
    /// Lowercase hex MD5 (`M5` tag), if present and well formed
    pub md5: Option<String>,
}

/// `@SQ` entries indexed by reference sequence id
#[derive(Debug, Clone, Default)]
pub struct SequenceDictionary {
    contigs: Vec<ExpectedContig>,
}

/// Validate that a string is a valid MD5 checksum (32 hex characters).
fn normalize_md5(s: &str) -> Option<String> {
    if s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(s.to_lowercase())
    } else {
        None
    }
}

impl SequenceDictionary {
    #[must_use]
    pub fn from_header(header: &Header) -> Self {
        let contigs = header
            .reference_sequences()
            .iter()
            .map(|(name, map)| {
                let name = name.to_string();

                let mut md5 = None;
                if let Ok(m5_tag) = Other::try_from(*b"M5") {
                    if let Some(md5_value) = map.other_fields().get(&m5_tag) {
                        let raw = md5_value.to_string();
                        md5 = normalize_md5(&raw);
                        if md5.is_none() {
                            warn!(contig = %name, md5 = %raw, "Invalid MD5 checksum format, ignoring");
                        }
                    }
                }

                ExpectedContig {
                    name,
                    length: map.length().get(),
                    md5,
                }
            })
            .collect();

        Self { contigs }
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&ExpectedContig> {
        self.contigs.get(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    /// Compare a loaded view with the header entry for contig `id`.
    ///
    /// A length difference is only warned about. With `check_md5`, an `M5`
    /// mismatch means the wrong reference was supplied.
    ///
    /// # Errors
    ///
    /// Returns `FixError::ReferenceUnavailable` on an MD5 mismatch.
    pub fn validate(&self, id: usize, view: &ReferenceView, check_md5: bool) -> Result<(), FixError> {
        let Some(expected) = self.get(id) else {
            return Ok(());
        };

        if expected.length != view.len() {
            warn!(
                contig = %expected.name,
                header_length = expected.length,
                reference_length = view.len(),
                "Reference length differs from the alignment header"
            );
        }

        if check_md5 {
            if let Some(expected_md5) = &expected.md5 {
                let actual = view.md5();
                if &actual != expected_md5 {
                    return Err(FixError::ReferenceUnavailable {
                        contig: expected.name.clone(),
                        reason: format!("MD5 {actual} does not match header M5 {expected_md5}"),
                    });
                }
            }
        }

        Ok(())
    }
}
