use tracing::debug;

use crate::core::types::FixError;
use crate::reference::dictionary::SequenceDictionary;
use crate::reference::provider::ReferenceProvider;
use crate::reference::view::ReferenceView;

/// Holds at most one loaded contig, keyed by its reference sequence id.
///
/// Switching contig discards the held view and loads the new one. Results do
/// not depend on input order; coordinate-sorted input only keeps the number of
/// loads down to one per contig.
pub struct ReferenceCache<P> {
    provider: P,
    /// Reference sequence id of `view`, `None` when empty
    current: Option<usize>,
    view: Option<ReferenceView>,
    dictionary: Option<SequenceDictionary>,
    check_md5: bool,
    loads: u64,
}

impl<P: ReferenceProvider> ReferenceCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            current: None,
            view: None,
            dictionary: None,
            check_md5: false,
            loads: 0,
        }
    }

    /// Validate each loaded contig against the alignment header
    #[must_use]
    pub fn with_dictionary(mut self, dictionary: SequenceDictionary, check_md5: bool) -> Self {
        self.dictionary = Some(dictionary);
        self.check_md5 = check_md5;
        self
    }

    /// The view for contig `id` (named `name`), loading it if it is not the held one
    ///
    /// # Errors
    ///
    /// Returns `FixError::ReferenceUnavailable` if the provider cannot load the
    /// contig or it fails validation against the header.
    pub fn get_view(&mut self, id: usize, name: &str) -> Result<&ReferenceView, FixError> {
        if self.current != Some(id) || self.view.is_none() {
            self.invalidate();
            self.load(id, name)?;
        }

        self.view.as_ref().ok_or_else(|| FixError::ReferenceUnavailable {
            contig: name.to_string(),
            reason: "reference cache is empty after load".to_string(),
        })
    }

    /// Drop the held view
    pub fn invalidate(&mut self) {
        self.current = None;
        self.view = None;
    }

    fn load(&mut self, id: usize, name: &str) -> Result<(), FixError> {
        debug!(contig = %name, id, "Loading reference sequence");
        let view = self.provider.load(name)?;

        if let Some(dictionary) = &self.dictionary {
            dictionary.validate(id, &view, self.check_md5)?;
        }

        self.loads += 1;
        self.current = Some(id);
        self.view = Some(view);
        Ok(())
    }

    /// Number of contig loads performed so far
    #[must_use]
    pub fn loads(&self) -> u64 {
        self.loads
    }
}
