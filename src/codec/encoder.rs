use std::{
    fs,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::anyhow;
use image::RgbImage;

use super::RasterFormat;
use crate::{
    color::phred_score,
    error::{CodecError, Result},
    fastq,
    layout::Dimensions,
    pipeline::{self, Progress, DEFAULT_ENCODE_CHUNK},
    record::SequenceRecord,
    sidecar::{self, HeaderSidecar},
    utils::append_suffix,
};

/// Outcome of an encode call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSummary {
    /// Path of the written image
    pub output_path: PathBuf,
    /// Path of the header sidecar, if one was written
    pub sidecar_path: Option<PathBuf>,
    /// Wall-clock time spent, including parsing and writing
    pub duration: Duration,
    /// Size of the written image in bytes
    pub output_size: u64,
    /// Number of bases painted
    pub total_bases: usize,
    /// Canvas size
    pub dimensions: Dimensions,
}
impl EncodeSummary {
    #[must_use]
    pub fn seconds(&self) -> f64 {
        super::seconds(self.duration)
    }

    /// Size of the written image in MiB
    #[must_use]
    pub fn size_mib(&self) -> f64 {
        self.output_size as f64 / (1024.0 * 1024.0)
    }
}

/// Paints reads into an image
///
/// Built with [`PixelEncoderBuilder`].
#[derive(Debug, Clone, Copy)]
pub struct PixelEncoder {
    /// Write the record headers to a sidecar file
    preserve_headers: bool,

    /// Number of bases painted between progress reports
    chunk_size: usize,

    /// Container the canvas is written to
    format: RasterFormat,
}
impl PixelEncoder {
    #[must_use]
    pub fn preserve_headers(&self) -> bool {
        self.preserve_headers
    }

    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    #[must_use]
    pub fn format(&self) -> RasterFormat {
        self.format
    }

    /// Parses a FASTQ file and encodes it next to the input as `<input>.<ext>`
    pub fn encode_path<P: AsRef<Path>, F: Progress + ?Sized>(
        &self,
        input: P,
        progress: &mut F,
    ) -> Result<EncodeSummary> {
        let start = Instant::now();
        let records = fastq::read_records(input.as_ref())?;
        self.write_records(&records, input.as_ref(), progress, start)
    }

    /// Encodes already-parsed records to `<stem>.<ext>` (and `<stem>.hdr` if preserving headers)
    ///
    /// Fails with [`CodecError::EmptyInput`] before writing anything if there are no bases.
    pub fn encode_records<R: SequenceRecord, P: AsRef<Path>, F: Progress + ?Sized>(
        &self,
        records: &[R],
        stem: P,
        progress: &mut F,
    ) -> Result<EncodeSummary> {
        self.write_records(records, stem.as_ref(), progress, Instant::now())
    }

    /// Paints records onto an in-memory image without touching the filesystem
    pub fn paint_records<R: SequenceRecord, F: Progress + ?Sized>(
        &self,
        records: &[R],
        progress: &mut F,
    ) -> Result<(RgbImage, Dimensions)> {
        let (bases, scores) = concatenate(records)?;
        let dims = Dimensions::for_bases(bases.len())?;
        let image = self.paint(&bases, &scores, dims, progress)?;
        Ok((image, dims))
    }

    fn write_records<R: SequenceRecord, F: Progress + ?Sized>(
        &self,
        records: &[R],
        stem: &Path,
        progress: &mut F,
        start: Instant,
    ) -> Result<EncodeSummary> {
        let (bases, scores) = concatenate(records)?;
        let dims = Dimensions::for_bases(bases.len())?;

        let sidecar_path = if self.preserve_headers {
            let path = sidecar::path_for_input(stem);
            HeaderSidecar::from_records(records).save(&path)?;
            Some(path)
        } else {
            None
        };

        let image = self.paint(&bases, &scores, dims, progress)?;
        let output_path = append_suffix(stem, self.format.extension());
        image.save_with_format(&output_path, self.format.image_format())?;
        let output_size = fs::metadata(&output_path)?.len();

        Ok(EncodeSummary {
            output_path,
            sidecar_path,
            duration: start.elapsed(),
            output_size,
            total_bases: bases.len(),
            dimensions: dims,
        })
    }

    fn paint<F: Progress + ?Sized>(
        &self,
        bases: &[u8],
        scores: &[u8],
        dims: Dimensions,
        progress: &mut F,
    ) -> Result<RgbImage> {
        let canvas = pipeline::paint(bases, scores, dims, self.chunk_size, progress);
        let raw: Vec<u8> = bytemuck::cast_slice(&canvas).to_vec();
        RgbImage::from_raw(dims.width as u32, dims.height as u32, raw)
            .ok_or_else(|| {
                anyhow!("canvas buffer does not match {}x{}", dims.width, dims.height).into()
            })
    }
}

/// Joins all sequences and their phred scores into two lockstep streams
fn concatenate<R: SequenceRecord>(records: &[R]) -> Result<(Vec<u8>, Vec<u8>)> {
    if records.is_empty() {
        return Err(CodecError::EmptyInput.into());
    }
    let total: usize = records.iter().map(SequenceRecord::len).sum();
    let mut bases = Vec::with_capacity(total);
    let mut scores = Vec::with_capacity(total);
    for (index, record) in records.iter().enumerate() {
        if record.seq().len() != record.qual().len() {
            return Err(CodecError::QualityLengthMismatch {
                index,
                seq_len: record.seq().len(),
                qual_len: record.qual().len(),
            }
            .into());
        }
        bases.extend(record.seq().iter().map(u8::to_ascii_uppercase));
        scores.extend(record.qual().iter().map(|&q| phred_score(q)));
    }
    Ok((bases, scores))
}

/// A builder for [`PixelEncoder`]
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelEncoderBuilder {
    preserve_headers: Option<bool>,
    chunk_size: Option<usize>,
    format: Option<RasterFormat>,
}
impl PixelEncoderBuilder {
    #[must_use]
    pub fn preserve_headers(mut self, preserve_headers: bool) -> Self {
        self.preserve_headers = Some(preserve_headers);
        self
    }

    /// Sets the number of bases painted per chunk (zero is treated as one)
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    #[must_use]
    pub fn format(mut self, format: RasterFormat) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn build(self) -> PixelEncoder {
        PixelEncoder {
            preserve_headers: self.preserve_headers.unwrap_or(false),
            chunk_size: self.chunk_size.unwrap_or(DEFAULT_ENCODE_CHUNK).max(1),
            format: self.format.unwrap_or_default(),
        }
    }
}
