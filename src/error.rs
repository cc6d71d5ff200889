/// Custom Result type for pixseq operations, wrapping the custom [`Error`] type
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the pixseq library, encompassing all possible error cases
/// that can occur while encoding reads into an image or restoring them.
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub enum Error {
    /// Errors raised by the codec itself
    CodecError(#[from] CodecError),
    /// Standard I/O errors from the Rust standard library
    IoError(#[from] std::io::Error),
    /// Errors from the raster container (encoding, decoding or unsupported images)
    ImageError(#[from] image::ImageError),
    /// Malformed FASTQ input
    FastqError(#[from] seq_io::fastq::Error),
    /// Errors detecting or opening a (possibly compressed) input stream
    NifflerError(#[from] niffler::Error),
    /// UTF-8 encoding/decoding errors
    Utf8Error(#[from] std::str::Utf8Error),
    /// Generic errors that can occur in any part of the system
    AnyhowError(#[from] anyhow::Error),
}

/// Errors specific to encoding and restoring pixel images
#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    /// No bases were provided to encode
    ///
    /// Raised both for an empty record list and for records whose sequences are all empty,
    /// since no canvas exists for zero bases.
    #[error("Empty input: no bases to encode")]
    EmptyInput,

    /// A record's quality string does not line up with its sequence
    ///
    /// # Fields
    /// * `index` - Position of the offending record in the input
    /// * `seq_len` - Length of the nucleotide sequence
    /// * `qual_len` - Length of the quality string
    #[error("Record {index} has {seq_len} bases but {qual_len} quality scores")]
    QualityLengthMismatch {
        index: usize,
        seq_len: usize,
        qual_len: usize,
    },

    /// The canvas would not fit in the raster container
    ///
    /// # Arguments
    /// * `usize` - The requested canvas side length
    #[error("Canvas side of {0} pixels exceeds the raster container limit")]
    CanvasTooLarge(usize),

    /// The image path carries no suffix of a supported raster container
    ///
    /// # Arguments
    /// * `String` - The offending path
    #[error("Unsupported image extension: {0}")]
    UnsupportedExtension(String),
}
