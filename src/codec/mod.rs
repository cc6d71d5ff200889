//! # Encode / restore orchestration
//!
//! Wires parsed reads through the pipeline into a raster image, and an image back into a FASTQ
//! file.
//!
//! ## Artifacts
//!
//! | Artifact | Path | Written by |
//! |----------|------|------------|
//! | Image | `<input>.<png\|bmp\|tiff>` | encode |
//! | Header sidecar | `<input>.hdr` (optional) | encode |
//! | Restored reads | `<image>.restored.fastq` | restore |
//!
//! ## Usage
//!
//! ```no_run
//! use pixseq::codec::{PixelDecoderBuilder, PixelEncoderBuilder};
//!
//! let encoder = PixelEncoderBuilder::default()
//!     .preserve_headers(true)
//!     .build();
//! let encoded = encoder.encode_path("reads.fastq", &mut |p: f64| eprintln!("{p:.0}%")).unwrap();
//!
//! let decoder = PixelDecoderBuilder::default().build();
//! let restored = decoder.restore(&encoded.output_path, &mut |_: f64| {}).unwrap();
//! assert_eq!(restored.total_bases, encoded.total_bases);
//! ```

mod decoder;
mod encoder;

use std::{fmt, path::Path, str::FromStr, time::Duration};

use crate::{error::CodecError, pipeline::Progress, Result};

pub use decoder::{PixelDecoder, PixelDecoderBuilder, RestoreSummary, RESTORED_SUFFIX};
pub use encoder::{EncodeSummary, PixelEncoder, PixelEncoderBuilder};

/// Lossless RGB containers an image can be written to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    #[default]
    Png,
    Bmp,
    Tiff,
}
impl RasterFormat {
    /// Suffix appended to the input path at encode time
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Bmp => "bmp",
            Self::Tiff => "tiff",
        }
    }

    #[must_use]
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Bmp => image::ImageFormat::Bmp,
            Self::Tiff => image::ImageFormat::Tiff,
        }
    }

    /// Recognizes the container from an image path's suffix (ignoring case)
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
            .ok_or_else(|| CodecError::UnsupportedExtension(path.display().to_string()).into())
    }
}
impl FromStr for RasterFormat {
    type Err = CodecError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "bmp" => Ok(Self::Bmp),
            "tif" | "tiff" => Ok(Self::Tiff),
            _ => Err(CodecError::UnsupportedExtension(s.to_string())),
        }
    }
}
impl fmt::Display for RasterFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Encodes a FASTQ file into `<input>.png` with default settings
///
/// When `preserve_headers` is set the record headers are also written to `<input>.hdr`.
pub fn encode<P: AsRef<Path>, F: Progress>(
    input: P,
    preserve_headers: bool,
    mut on_progress: F,
) -> Result<EncodeSummary> {
    PixelEncoderBuilder::default()
        .preserve_headers(preserve_headers)
        .build()
        .encode_path(input, &mut on_progress)
}

/// Restores an encoded image into `<image>.restored.fastq` with default settings
pub fn restore<P: AsRef<Path>, F: Progress>(
    image_path: P,
    mut on_progress: F,
) -> Result<RestoreSummary> {
    PixelDecoderBuilder::default()
        .build()
        .restore(image_path, &mut on_progress)
}

fn seconds(duration: Duration) -> f64 {
    duration.as_secs_f64()
}
