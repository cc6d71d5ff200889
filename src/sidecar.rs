//! Header sidecar files and per-record boundary reconstruction
//!
//! The image only carries a flat base stream. When headers are preserved, encode writes them
//! one per line to `<input>.hdr`, and restore cuts the decoded stream back into records.
//!
//! True per-record lengths are not stored. Restore assumes every record but the last has
//! `floor(total / records)` bases and hands the remainder to the last one, which is exact only
//! when all reads had the same length.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    ops::Range,
    path::{Path, PathBuf},
};

use crate::{
    pipeline::DecodedStream,
    record::{RefRecord, SequenceRecord},
    utils::append_suffix,
    Result,
};

/// Suffix of sidecar files
pub const SIDECAR_EXTENSION: &str = "hdr";

/// Header given to the single record restored without a sidecar
pub const PLACEHOLDER_HEADER: &str = "Pixel-DNA_Restored_Block";

/// Ordered record headers stored next to an encoded image
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HeaderSidecar {
    headers: Vec<String>,
}
impl HeaderSidecar {
    #[must_use]
    pub fn new(headers: Vec<String>) -> Self {
        Self { headers }
    }

    /// Collects the headers of `records` in order
    pub fn from_records<R: SequenceRecord>(records: &[R]) -> Self {
        Self::new(records.iter().map(|r| r.header().to_string()).collect())
    }

    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Writes the headers joined by newlines (no trailing newline)
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        for (idx, header) in self.headers.iter().enumerate() {
            if idx > 0 {
                writer.write_all(b"\n")?;
            }
            writer.write_all(header.as_bytes())?;
        }
        Ok(())
    }

    /// Reads one header per line
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self> {
        let headers = reader.lines().collect::<io::Result<Vec<_>>>()?;
        Ok(Self::new(headers))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = File::create(path).map(BufWriter::new)?;
        self.write_to(&mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// Loads a sidecar, returning `None` if the file does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Option<Self>> {
        match File::open(path) {
            Ok(handle) => Self::read_from(BufReader::new(handle)).map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Sidecar path written at encode time for an input file
pub fn path_for_input(input: &Path) -> PathBuf {
    append_suffix(input, SIDECAR_EXTENSION)
}

/// Sidecar path for an image, substituting its container suffix
///
/// The caller is responsible for checking that the image suffix is a recognized container.
pub fn path_for_image(image: &Path) -> PathBuf {
    image.with_extension(SIDECAR_EXTENSION)
}

/// Splits `total` items into `num_records` contiguous spans
///
/// Every span but the last has `floor(total / num_records)` items and the last takes what
/// remains. Zero records is treated as a single record.
#[must_use]
pub fn partition(total: usize, num_records: usize) -> Vec<Range<usize>> {
    if num_records <= 1 {
        return vec![0..total];
    }
    let avg_len = total / num_records;
    let last_start = (num_records - 1) * avg_len;
    (0..num_records - 1)
        .map(|i| i * avg_len..(i + 1) * avg_len)
        .chain(std::iter::once(last_start..total))
        .collect()
}

/// Cuts a decoded stream into records
///
/// With a non-empty sidecar, each header receives a span from [`partition`]. Otherwise the
/// whole stream becomes one record under [`PLACEHOLDER_HEADER`].
#[must_use]
pub fn reconcile<'a>(
    stream: &'a DecodedStream,
    sidecar: Option<&'a HeaderSidecar>,
) -> Vec<RefRecord<'a>> {
    let to_record = move |header: &'a str, span: Range<usize>| {
        RefRecord::new(
            header,
            &stream.bases[span.clone()],
            &stream.qualities[span],
        )
    };
    match sidecar {
        Some(sidecar) if !sidecar.is_empty() => sidecar
            .headers()
            .iter()
            .zip(partition(stream.len(), sidecar.len()))
            .map(|(header, span)| to_record(header.as_str(), span))
            .collect(),
        _ => vec![to_record(PLACEHOLDER_HEADER, 0..stream.len())],
    }
}
