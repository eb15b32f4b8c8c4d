use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::Path;

use noodles::sam::alignment::io::Write as AlignmentWrite;
use noodles::sam::alignment::RecordBuf;
use noodles::{bam, sam};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignmentIoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),
}

/// Alignment container formats that can be read and written
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AlignmentFormat {
    Sam,
    Bam,
}

impl AlignmentFormat {
    /// Detect the format from a path's extension; `-` is SAM on stdin/stdout
    ///
    /// # Errors
    ///
    /// Returns `AlignmentIoError::UnsupportedFormat` for extensions other than
    /// `.sam` and `.bam` (CRAM needs a reference-aware codec and is not handled).
    pub fn from_path(path: &Path) -> Result<Self, AlignmentIoError> {
        if is_stdio(path) {
            return Ok(Self::Sam);
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);

        match extension.as_deref() {
            Some("sam") => Ok(Self::Sam),
            Some("bam") => Ok(Self::Bam),
            Some(ext) => Err(AlignmentIoError::UnsupportedFormat(ext.to_string())),
            None => Err(AlignmentIoError::UnsupportedFormat(format!(
                "cannot detect format of {}",
                path.display()
            ))),
        }
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

type RecordIter = Box<dyn Iterator<Item = io::Result<RecordBuf>>>;

/// A header plus the records that follow it, in file order
pub struct AlignmentReader {
    header: sam::Header,
    records: RecordIter,
}

impl AlignmentReader {
    /// Open a SAM or BAM file (or `-` for SAM on stdin)
    ///
    /// # Errors
    ///
    /// Returns `AlignmentIoError::Io` if the file cannot be opened or
    /// `AlignmentIoError::Noodles` if the header cannot be parsed.
    pub fn open(path: &Path, format: Option<AlignmentFormat>) -> Result<Self, AlignmentIoError> {
        let format = match format {
            Some(format) => format,
            None => AlignmentFormat::from_path(path)?,
        };

        match format {
            AlignmentFormat::Sam => {
                let inner: Box<dyn BufRead> = if is_stdio(path) {
                    Box::new(BufReader::new(io::stdin()))
                } else {
                    Box::new(BufReader::new(File::open(path)?))
                };
                Self::from_sam_reader(inner)
            }
            AlignmentFormat::Bam => {
                let mut reader = File::open(path).map(bam::io::Reader::new)?;
                let header = reader
                    .read_header()
                    .map_err(|e| AlignmentIoError::Noodles(e.to_string()))?;

                let record_header = header.clone();
                let records = std::iter::from_fn(move || {
                    let mut record = RecordBuf::default();
                    match reader.read_record_buf(&record_header, &mut record) {
                        Ok(0) => None,
                        Ok(_) => Some(Ok(record)),
                        Err(e) => Some(Err(e)),
                    }
                });

                Ok(Self {
                    header,
                    records: Box::new(records),
                })
            }
        }
    }

    /// Read SAM text from any buffered source
    ///
    /// # Errors
    ///
    /// Returns `AlignmentIoError::Noodles` if the header cannot be parsed.
    pub fn from_sam_reader<R: BufRead + 'static>(inner: R) -> Result<Self, AlignmentIoError> {
        let mut reader = sam::io::Reader::new(inner);
        let header = reader
            .read_header()
            .map_err(|e| AlignmentIoError::Noodles(e.to_string()))?;

        let record_header = header.clone();
        let records = std::iter::from_fn(move || {
            let mut record = RecordBuf::default();
            match reader.read_record_buf(&record_header, &mut record) {
                Ok(0) => None,
                Ok(_) => Some(Ok(record)),
                Err(e) => Some(Err(e)),
            }
        });

        Ok(Self {
            header,
            records: Box::new(records),
        })
    }

    #[must_use]
    pub fn header(&self) -> &sam::Header {
        &self.header
    }

    /// Split into the header and the record stream
    #[must_use]
    pub fn into_parts(self) -> (sam::Header, RecordIter) {
        (self.header, self.records)
    }
}

/// Writes a header and then records, in the order given
pub struct AlignmentWriter {
    inner: Box<dyn AlignmentWrite>,
}

impl AlignmentWriter {
    /// Create a SAM or BAM file (or `-` for SAM on stdout)
    ///
    /// # Errors
    ///
    /// Returns `AlignmentIoError::Io` if the file cannot be created.
    pub fn create(path: &Path, format: Option<AlignmentFormat>) -> Result<Self, AlignmentIoError> {
        let format = match format {
            Some(format) => format,
            None => AlignmentFormat::from_path(path)?,
        };

        let inner: Box<dyn AlignmentWrite> = match format {
            AlignmentFormat::Sam if is_stdio(path) => {
                Box::new(sam::io::Writer::new(BufWriter::new(io::stdout())))
            }
            AlignmentFormat::Sam => Box::new(sam::io::Writer::new(BufWriter::new(File::create(path)?))),
            AlignmentFormat::Bam => Box::new(bam::io::Writer::new(File::create(path)?)),
        };

        Ok(Self { inner })
    }

    /// Write SAM text to any sink
    pub fn from_sam_writer<W: io::Write + 'static>(inner: W) -> Self {
        Self {
            inner: Box::new(sam::io::Writer::new(inner)),
        }
    }

    /// # Errors
    ///
    /// Returns `AlignmentIoError::Io` on write failure.
    pub fn write_header(&mut self, header: &sam::Header) -> Result<(), AlignmentIoError> {
        self.inner.write_alignment_header(header)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `AlignmentIoError::Io` on write failure.
    pub fn write_record(
        &mut self,
        header: &sam::Header,
        record: &RecordBuf,
    ) -> Result<(), AlignmentIoError> {
        self.inner.write_alignment_record(header, record)?;
        Ok(())
    }

    /// Flush buffered output (and the BAM EOF marker)
    ///
    /// # Errors
    ///
    /// Returns `AlignmentIoError::Io` on write failure.
    pub fn finish(&mut self, header: &sam::Header) -> Result<(), AlignmentIoError> {
        self.inner.finish(header)?;
        Ok(())
    }
}
