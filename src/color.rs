//! Per-base color mapping
//!
//! Every base is painted as a single RGB pixel. The nucleotide selects a fixed hue and the
//! phred quality selects the saturation, while brightness is pinned at its maximum:
//!
//! | Base | Hue  |
//! |------|------|
//! | A, N | 0°   |
//! | T    | 60°  |
//! | C    | 120° |
//! | G    | 240° |
//!
//! Saturation is `0.1 + 0.9 * (q / 40)`, so even a zero-quality base keeps one channel at 255
//! and no real base is ever painted as [`Pixel::SENTINEL`].
//!
//! Decoding classifies the recovered hue into five half-open buckets. The band between C and G
//! (and the one between G and A) decodes to N; the forward map never lands there.

use bytemuck::{Pod, Zeroable};

/// Highest quality score representable in a pixel
pub const MAX_QUALITY: u8 = 40;

/// Offset between a phred score and its ASCII representation
pub const PHRED_OFFSET: u8 = 33;

/// Saturation assigned to a zero-quality base
const SATURATION_FLOOR: f64 = 0.1;

/// Saturation range spread across the quality scores
const SATURATION_SPAN: f64 = 0.9;

/// A nucleotide symbol as understood by the codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
    N,
}
impl Nucleotide {
    /// Parses an ASCII symbol, ignoring case
    ///
    /// Anything that is not A, C, G, or T is treated as `N`.
    #[must_use]
    pub fn from_ascii(byte: u8) -> Self {
        match byte.to_ascii_uppercase() {
            b'A' => Self::A,
            b'C' => Self::C,
            b'G' => Self::G,
            b'T' => Self::T,
            _ => Self::N,
        }
    }

    #[must_use]
    pub fn as_ascii(self) -> u8 {
        match self {
            Self::A => b'A',
            Self::C => b'C',
            Self::G => b'G',
            Self::T => b'T',
            Self::N => b'N',
        }
    }

    /// Hue in degrees used when painting this base
    ///
    /// N has no reserved hue and shares A's.
    #[must_use]
    pub fn hue(self) -> f64 {
        match self {
            Self::A | Self::N => 0.0,
            Self::T => 60.0,
            Self::C => 120.0,
            Self::G => 240.0,
        }
    }
}

/// A single RGB pixel
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}
impl Pixel {
    /// Marks canvas cells that hold no base
    pub const SENTINEL: Self = Self::new(0, 0, 0);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[must_use]
    pub fn is_sentinel(&self) -> bool {
        *self == Self::SENTINEL
    }
}

/// Hue (degrees), saturation and value of a color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsv {
    pub hue: f64,
    pub saturation: f64,
    pub value: f64,
}
impl Hsv {
    /// Converts to RGB using the standard 60° sector construction
    #[must_use]
    pub fn to_pixel(self) -> Pixel {
        let c = self.value * self.saturation;
        let x = c * (1.0 - ((self.hue / 60.0) % 2.0 - 1.0).abs());
        let m = self.value - c;
        let (r, g, b) = match self.hue {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        Pixel::new(scale(r + m), scale(g + m), scale(b + m))
    }

    /// Recovers hue, saturation and value from an RGB pixel
    ///
    /// The hue is computed from integer channel differences so that pixels sitting exactly on a
    /// bucket boundary land on it without floating point drift.
    #[must_use]
    pub fn from_pixel(pixel: Pixel) -> Self {
        let (r, g, b) = (
            i32::from(pixel.r),
            i32::from(pixel.g),
            i32::from(pixel.b),
        );
        let cmax = r.max(g).max(b);
        let cmin = r.min(g).min(b);
        let delta = cmax - cmin;

        let hue = if delta == 0 {
            0.0
        } else {
            let d = f64::from(delta);
            let h = if cmax == r {
                60.0 * (f64::from(g - b) / d).rem_euclid(6.0)
            } else if cmax == g {
                60.0 * (f64::from(b - r) / d + 2.0)
            } else {
                60.0 * (f64::from(r - g) / d + 4.0)
            };
            if h < 0.0 {
                h + 360.0
            } else {
                h
            }
        };
        let saturation = if cmax == 0 {
            0.0
        } else {
            f64::from(delta) / f64::from(cmax)
        };

        Self {
            hue,
            saturation,
            value: f64::from(cmax) / 255.0,
        }
    }
}

fn scale(channel: f64) -> u8 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Converts a phred+33 ASCII quality character into a score
///
/// Characters below the offset saturate at zero. Scores above [`MAX_QUALITY`] are kept here and
/// only clipped when painted.
#[must_use]
pub fn phred_score(ascii: u8) -> u8 {
    ascii.saturating_sub(PHRED_OFFSET)
}

/// Converts a score into its phred+33 ASCII character
#[must_use]
pub fn phred_ascii(score: u8) -> u8 {
    score.min(MAX_QUALITY) + PHRED_OFFSET
}

/// Saturation for a quality score, clipping it to `[0, 40]` first
#[must_use]
pub fn quality_to_saturation(quality: u8) -> f64 {
    let q = f64::from(quality.min(MAX_QUALITY));
    SATURATION_FLOOR + SATURATION_SPAN * (q / f64::from(MAX_QUALITY))
}

/// Quality score recovered from a saturation, clipped to `[0, 40]`
#[must_use]
pub fn saturation_to_quality(saturation: f64) -> u8 {
    let q = ((saturation - SATURATION_FLOOR) / SATURATION_SPAN) * f64::from(MAX_QUALITY);
    q.round().clamp(0.0, f64::from(MAX_QUALITY)) as u8
}

/// Classifies a hue (degrees) into a nucleotide
///
/// Buckets are half-open: `[330, 360) ∪ [0, 30)` is A, `[30, 90)` is T, `[90, 150)` is C,
/// `[210, 270)` is G, and everything else is N.
#[must_use]
pub fn base_for_hue(hue: f64) -> Nucleotide {
    match hue {
        h if !(30.0..330.0).contains(&h) => Nucleotide::A,
        h if h < 90.0 => Nucleotide::T,
        h if h < 150.0 => Nucleotide::C,
        h if (210.0..270.0).contains(&h) => Nucleotide::G,
        _ => Nucleotide::N,
    }
}

/// Paints a base with the given quality score
#[must_use]
pub fn to_pixel(base: Nucleotide, quality: u8) -> Pixel {
    Hsv {
        hue: base.hue(),
        saturation: quality_to_saturation(quality),
        value: 1.0,
    }
    .to_pixel()
}

/// Recovers a base and its quality score from a pixel
#[must_use]
pub fn to_base(pixel: Pixel) -> (Nucleotide, u8) {
    let hsv = Hsv::from_pixel(pixel);
    (
        base_for_hue(hsv.hue),
        saturation_to_quality(hsv.saturation),
    )
}
