//! Sources of reference contig sequences.
//!
//! - [`IndexedFastaProvider`]: reads one contig at a time from a FASTA with a `.fai` index
//! - [`InMemoryProvider`]: holds every contig in memory (unindexed or gzipped FASTA, tests)

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs::File;
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use noodles::fasta;
use noodles::fasta::fai;
use thiserror::Error;
use tracing::debug;

use crate::core::types::FixError;
use crate::reference::view::ReferenceView;

#[derive(Error, Debug)]
pub enum ReferenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid FASTA index: {0}")]
    InvalidIndex(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("No sequences found in {0}")]
    NoSequences(String),
}

/// Loads the full sequence of a named contig
pub trait ReferenceProvider {
    /// Load a contig by name
    ///
    /// # Errors
    ///
    /// Returns `FixError::ReferenceUnavailable` if the contig is unknown or cannot be read.
    fn load(&mut self, contig: &str) -> Result<ReferenceView, FixError>;
}

impl<P: ReferenceProvider + ?Sized> ReferenceProvider for Box<P> {
    fn load(&mut self, contig: &str) -> Result<ReferenceView, FixError> {
        (**self).load(contig)
    }
}

fn unavailable(contig: &str, reason: impl std::fmt::Display) -> FixError {
    FixError::ReferenceUnavailable {
        contig: contig.to_string(),
        reason: reason.to_string(),
    }
}

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Path of the `.fai` index next to a FASTA, if one exists
#[must_use]
pub fn find_fai_path(fasta_path: &Path) -> Option<PathBuf> {
    let mut appended = OsString::from(fasta_path.as_os_str());
    appended.push(".fai");
    let appended = PathBuf::from(appended);
    if appended.exists() {
        return Some(appended);
    }

    let replaced = fasta_path.with_extension("fai");
    if replaced.exists() {
        return Some(replaced);
    }

    None
}

/// Open a reference FASTA, using its `.fai` index when present.
///
/// Gzipped FASTA cannot be randomly accessed and is always read into memory.
///
/// # Errors
///
/// Returns `ReferenceError` if the FASTA or its index cannot be read.
pub fn open_reference(path: &Path) -> Result<Box<dyn ReferenceProvider>, ReferenceError> {
    if !is_gzipped(path) {
        if let Some(fai_path) = find_fai_path(path) {
            debug!(index = %fai_path.display(), "Using FASTA index");
            return Ok(Box::new(IndexedFastaProvider::open(path, &fai_path)?));
        }
    }

    debug!(fasta = %path.display(), "No usable FASTA index, loading all sequences");
    Ok(Box::new(InMemoryProvider::from_fasta_path(path)?))
}

/// Reads contigs on demand from an indexed FASTA
pub struct IndexedFastaProvider {
    file: File,
    index: HashMap<String, fai::Record>,
}

impl IndexedFastaProvider {
    /// Open a FASTA and its `.fai` index
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::Io` if either file cannot be opened, or
    /// `ReferenceError::InvalidIndex` if the index cannot be parsed.
    pub fn open(fasta_path: &Path, fai_path: &Path) -> Result<Self, ReferenceError> {
        let reader = File::open(fai_path).map(BufReader::new)?;
        let index = fai::io::Reader::new(reader)
            .read_index()
            .map_err(|e| ReferenceError::InvalidIndex(format!("{}: {e}", fai_path.display())))?;

        let records: &[fai::Record] = index.as_ref();
        let index: HashMap<String, fai::Record> = records
            .iter()
            .map(|record| {
                let name: &[u8] = record.name().as_ref();
                (String::from_utf8_lossy(name).to_string(), record.clone())
            })
            .collect();

        if index.is_empty() {
            return Err(ReferenceError::NoSequences(fai_path.display().to_string()));
        }

        Ok(Self {
            file: File::open(fasta_path)?,
            index,
        })
    }

    /// Read the raw bytes spanned by a contig and strip line terminators
    fn read_sequence(&mut self, record: &fai::Record) -> std::io::Result<Vec<u8>> {
        let length = usize::try_from(record.length()).map_err(std::io::Error::other)?;
        if length == 0 {
            return Ok(Vec::new());
        }

        let line_bases = usize::try_from(record.line_bases()).map_err(std::io::Error::other)?;
        let line_width = usize::try_from(record.line_width()).map_err(std::io::Error::other)?;
        if line_bases == 0 || line_width < line_bases {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "invalid line layout in index",
            ));
        }

        let last = length - 1;
        let span = (last / line_bases) * line_width + last % line_bases + 1;

        self.file.seek(SeekFrom::Start(record.offset()))?;
        let mut raw = vec![0u8; span];
        self.file.read_exact(&mut raw)?;

        raw.retain(|b| !b.is_ascii_whitespace());
        if raw.len() != length {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("expected {length} bases, read {}", raw.len()),
            ));
        }

        Ok(raw)
    }
}

impl ReferenceProvider for IndexedFastaProvider {
    fn load(&mut self, contig: &str) -> Result<ReferenceView, FixError> {
        let record = self
            .index
            .get(contig)
            .cloned()
            .ok_or_else(|| unavailable(contig, "not present in FASTA index"))?;

        let bases = self
            .read_sequence(&record)
            .map_err(|e| unavailable(contig, e))?;

        Ok(ReferenceView::new(contig, bases))
    }
}

/// Every contig held in memory
#[derive(Debug, Default, Clone)]
pub struct InMemoryProvider {
    sequences: HashMap<String, Vec<u8>>,
}

impl InMemoryProvider {
    /// Build from (name, bases) pairs
    pub fn from_sequences<I, N, S>(sequences: I) -> Self
    where
        I: IntoIterator<Item = (N, S)>,
        N: Into<String>,
        S: Into<Vec<u8>>,
    {
        Self {
            sequences: sequences
                .into_iter()
                .map(|(name, seq)| (name.into(), seq.into()))
                .collect(),
        }
    }

    /// Read a whole FASTA (plain, gzip or bgzip) into memory
    ///
    /// # Errors
    ///
    /// Returns `ReferenceError::Io` if the file cannot be read, `ReferenceError::Noodles`
    /// if a record cannot be parsed, or `ReferenceError::NoSequences` if it is empty.
    pub fn from_fasta_path(path: &Path) -> Result<Self, ReferenceError> {
        let file = File::open(path)?;
        let provider = if is_gzipped(path) {
            Self::from_fasta_reader(BufReader::new(MultiGzDecoder::new(file)))?
        } else {
            Self::from_fasta_reader(BufReader::new(file))?
        };

        if provider.sequences.is_empty() {
            return Err(ReferenceError::NoSequences(path.display().to_string()));
        }

        debug!(contigs = provider.sequences.len(), "Loaded reference into memory");
        Ok(provider)
    }

    fn from_fasta_reader<R: BufRead>(reader: R) -> Result<Self, ReferenceError> {
        let mut reader = fasta::io::Reader::new(reader);
        let mut sequences = HashMap::new();

        for result in reader.records() {
            let record = result
                .map_err(|e| ReferenceError::Noodles(format!("Failed to parse FASTA record: {e}")))?;
            let name = String::from_utf8_lossy(record.name()).to_string();
            sequences.insert(name, record.sequence().as_ref().to_vec());
        }

        Ok(Self { sequences })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl ReferenceProvider for InMemoryProvider {
    fn load(&mut self, contig: &str) -> Result<ReferenceView, FixError> {
        self.sequences
            .get(contig)
            .map(|bases| ReferenceView::new(contig, bases.clone()))
            .ok_or_else(|| unavailable(contig, "not present in reference"))
    }
}
