/// The bases of one contig, addressed by 0-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceView {
    name: String,
    bases: Vec<u8>,
}

impl ReferenceView {
    pub fn new(name: impl Into<String>, bases: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bases: bases.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Base at a 0-based position, or `None` past the end of the contig
    #[must_use]
    pub fn base_at(&self, pos: usize) -> Option<u8> {
        self.bases.get(pos).copied()
    }

    /// MD5 of the uppercased sequence, as stored in `@SQ M5`
    #[must_use]
    pub fn md5(&self) -> String {
        let uppercase: Vec<u8> = self.bases.iter().map(u8::to_ascii_uppercase).collect();
        format!("{:x}", md5::compute(&uppercase))
    }
}
