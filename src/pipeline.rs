//! Chunked bulk processing of the base stream
//!
//! Both directions walk the stream in contiguous chunks and report the cumulative percentage
//! after each one. Chunk size only bounds the work done between progress reports: the output is
//! identical for any chunk size.

use crate::{
    color::{phred_ascii, to_base, to_pixel, Nucleotide, Pixel},
    layout::{self, Dimensions},
};

/// Default number of bases painted per chunk when encoding
pub const DEFAULT_ENCODE_CHUNK: usize = 500_000;

/// Default number of pixels decoded per chunk when restoring
pub const DEFAULT_RESTORE_CHUNK: usize = 200_000;

/// Receives cumulative progress percentages in `[0, 100]`
///
/// Reports are purely observational: they are never consulted for control flow. Implemented
/// for every `FnMut(f64)`, so a closure is the usual way to pass one.
pub trait Progress {
    fn report(&mut self, percent: f64);
}
impl<F: FnMut(f64) + ?Sized> Progress for F {
    fn report(&mut self, percent: f64) {
        self(percent);
    }
}

/// Rescales the percentages of an inner [`Progress`] into `[0, ceiling]`
///
/// Used when a pipeline pass is only part of a larger operation.
pub struct ScaledProgress<'a, P: Progress + ?Sized> {
    inner: &'a mut P,
    ceiling: f64,
}
impl<'a, P: Progress + ?Sized> ScaledProgress<'a, P> {
    pub fn new(inner: &'a mut P, ceiling: f64) -> Self {
        Self { inner, ceiling }
    }
}
impl<P: Progress + ?Sized> Progress for ScaledProgress<'_, P> {
    fn report(&mut self, percent: f64) {
        self.inner.report(percent * self.ceiling / 100.0);
    }
}

/// Tracks cumulative completion across chunks
struct ChunkTracker {
    total: usize,
    processed: usize,
}
impl ChunkTracker {
    fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
        }
    }

    /// Advances by `n` items and returns the percentage complete
    ///
    /// Only returns exactly 100 once every item has been processed.
    fn advance(&mut self, n: usize) -> f64 {
        self.processed += n;
        if self.processed >= self.total {
            100.0
        } else {
            (self.processed as f64 / self.total as f64 * 100.0).min(99.999)
        }
    }
}

/// Paints a base stream onto a snake-ordered canvas
///
/// `bases` are ASCII symbols (any case) and `qualities` are phred scores (not ASCII), one per
/// base. Cells beyond the end of the stream are left as [`Pixel::SENTINEL`].
///
/// # Panics
///
/// Panics if the streams differ in length or do not fit on the canvas.
pub fn paint<P: Progress + ?Sized>(
    bases: &[u8],
    qualities: &[u8],
    dims: Dimensions,
    chunk_size: usize,
    progress: &mut P,
) -> Vec<Pixel> {
    assert_eq!(bases.len(), qualities.len());
    assert!(bases.len() <= dims.area());

    let chunk_size = chunk_size.max(1);
    let mut canvas = vec![Pixel::SENTINEL; dims.area()];
    let mut tracker = ChunkTracker::new(bases.len());

    for (idx, (schunk, qchunk)) in bases
        .chunks(chunk_size)
        .zip(qualities.chunks(chunk_size))
        .enumerate()
    {
        let start = idx * chunk_size;
        for (offset, (&base, &qual)) in schunk.iter().zip(qchunk).enumerate() {
            let (row, col) = layout::forward(start + offset, dims.width);
            canvas[row * dims.width + col] = to_pixel(Nucleotide::from_ascii(base), qual);
        }
        progress.report(tracker.advance(schunk.len()));
    }

    canvas
}

/// Undoes the snake layout and drops every sentinel cell
///
/// The result holds one pixel per encoded base, in stream order.
#[must_use]
pub fn linearize(mut canvas: Vec<Pixel>, width: usize) -> Vec<Pixel> {
    layout::unsnake(&mut canvas, width);
    canvas.retain(|pixel| !pixel.is_sentinel());
    canvas
}

/// The flat base and quality streams recovered from an image
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedStream {
    /// ASCII nucleotides
    pub bases: Vec<u8>,
    /// Phred+33 ASCII quality characters
    pub qualities: Vec<u8>,
}
impl DecodedStream {
    #[must_use]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// Decodes a linear pixel stream back into bases and qualities
pub fn decode<P: Progress + ?Sized>(
    pixels: &[Pixel],
    chunk_size: usize,
    progress: &mut P,
) -> DecodedStream {
    let chunk_size = chunk_size.max(1);
    let mut stream = DecodedStream {
        bases: Vec::with_capacity(pixels.len()),
        qualities: Vec::with_capacity(pixels.len()),
    };
    if pixels.is_empty() {
        progress.report(100.0);
        return stream;
    }

    let mut tracker = ChunkTracker::new(pixels.len());
    for chunk in pixels.chunks(chunk_size) {
        for &pixel in chunk {
            let (base, qual) = to_base(pixel);
            stream.bases.push(base.as_ascii());
            stream.qualities.push(phred_ascii(qual));
        }
        progress.report(tracker.advance(chunk.len()));
    }

    stream
}
