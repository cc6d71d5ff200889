use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use image::RgbImage;

use super::RasterFormat;
use crate::{
    color::Pixel,
    error::Result,
    fastq::FastqWriter,
    pipeline::{self, DecodedStream, Progress, ScaledProgress, DEFAULT_RESTORE_CHUNK},
    sidecar::{self, HeaderSidecar},
    utils::append_suffix,
};

/// Suffix appended to the image path for the restored FASTQ file
pub const RESTORED_SUFFIX: &str = "restored.fastq";

/// Share of the progress range spent decoding pixels; writing the output takes the rest
const DECODE_SHARE: f64 = 90.0;

/// Outcome of a restore call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreSummary {
    /// Path of the restored FASTQ file
    pub output_path: PathBuf,
    /// Wall-clock time spent, including loading and writing
    pub duration: Duration,
    /// Number of bases recovered
    pub total_bases: usize,
    /// Number of records written
    pub num_records: usize,
    /// Whether record boundaries were taken from a header sidecar
    pub used_sidecar: bool,
}
impl RestoreSummary {
    #[must_use]
    pub fn seconds(&self) -> f64 {
        super::seconds(self.duration)
    }
}

/// Recovers reads from an encoded image
///
/// Built with [`PixelDecoderBuilder`].
#[derive(Debug, Clone, Copy)]
pub struct PixelDecoder {
    /// Number of pixels decoded between progress reports
    chunk_size: usize,
}
impl PixelDecoder {
    #[must_use]
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Decodes an in-memory image into flat base and quality streams
    ///
    /// Undoes the snake layout, drops sentinel cells and maps each remaining pixel back to a
    /// base and a phred+33 quality character.
    pub fn decode_image<F: Progress + ?Sized>(
        &self,
        image: &RgbImage,
        progress: &mut F,
    ) -> DecodedStream {
        let canvas: Vec<Pixel> = bytemuck::cast_slice(image.as_raw()).to_vec();
        let pixels = pipeline::linearize(canvas, image.width() as usize);
        pipeline::decode(&pixels, self.chunk_size, progress)
    }

    /// Restores an image into `<image>.restored.fastq`
    ///
    /// Record boundaries come from the `.hdr` sidecar sitting next to the image if there is one;
    /// otherwise the whole stream is written as a single record.
    pub fn restore<P: AsRef<Path>, F: Progress + ?Sized>(
        &self,
        image_path: P,
        progress: &mut F,
    ) -> Result<RestoreSummary> {
        let start = Instant::now();
        let image_path = image_path.as_ref();
        let format = RasterFormat::from_path(image_path)?;

        let handle = File::open(image_path).map(BufReader::new)?;
        let image = image::load(handle, format.image_format())?.into_rgb8();
        let mut decode_progress = ScaledProgress::new(&mut *progress, DECODE_SHARE);
        let stream = self.decode_image(&image, &mut decode_progress);
        drop(image);

        let sidecar = HeaderSidecar::load(sidecar::path_for_image(image_path))?
            .filter(|sidecar| !sidecar.is_empty());
        let records = sidecar::reconcile(&stream, sidecar.as_ref());

        let output_path = append_suffix(image_path, RESTORED_SUFFIX);
        let mut writer = FastqWriter::from_path(&output_path)?;
        for record in &records {
            writer.write_record(record)?;
        }
        writer.flush()?;
        progress.report(100.0);

        Ok(RestoreSummary {
            output_path,
            duration: start.elapsed(),
            total_bases: stream.len(),
            num_records: records.len(),
            used_sidecar: sidecar.is_some(),
        })
    }
}

/// A builder for [`PixelDecoder`]
#[derive(Debug, Default, Clone, Copy)]
pub struct PixelDecoderBuilder {
    chunk_size: Option<usize>,
}
impl PixelDecoderBuilder {
    /// Sets the number of pixels decoded per chunk (zero is treated as one)
    #[must_use]
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = Some(chunk_size);
        self
    }

    #[must_use]
    pub fn build(self) -> PixelDecoder {
        PixelDecoder {
            chunk_size: self.chunk_size.unwrap_or(DEFAULT_RESTORE_CHUNK).max(1),
        }
    }
}
