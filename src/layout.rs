//! Snake (boustrophedon) layout of the base stream on a square-ish canvas
//!
//! Base `i` lands on row `i / width`. Even rows run left to right and odd rows run right to
//! left, so consecutive bases stay adjacent across row boundaries.

use crate::{error::CodecError, Result};

/// Width and height of a canvas holding a given number of bases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
}
impl Dimensions {
    /// Sizes the canvas for `total_bases` bases
    ///
    /// `width = ceil(sqrt(n))` and `height = ceil(n / width)`, so `width * height >= n`.
    ///
    /// Returns an error if there are no bases, or if a side would not fit in a `u32`.
    pub fn for_bases(total_bases: usize) -> Result<Self> {
        if total_bases == 0 {
            return Err(CodecError::EmptyInput.into());
        }
        let mut width = total_bases.isqrt();
        if width * width < total_bases {
            width += 1;
        }
        let height = total_bases.div_ceil(width);
        if u32::try_from(width).is_err() || u32::try_from(height).is_err() {
            return Err(CodecError::CanvasTooLarge(width.max(height)).into());
        }
        Ok(Self { width, height })
    }

    /// Number of cells on the canvas
    #[must_use]
    pub fn area(&self) -> usize {
        self.width * self.height
    }
}

/// Maps a linear base index onto its `(row, col)` canvas cell
#[must_use]
pub fn forward(index: usize, width: usize) -> (usize, usize) {
    let row = index / width;
    let col = index % width;
    if row % 2 == 1 {
        (row, width - 1 - col)
    } else {
        (row, col)
    }
}

/// Reverses every odd row of a row-major canvas in place
///
/// After this the cells are back in linear base order. Applying it to a buffer filled through
/// [`forward`] recovers the original stream.
pub fn unsnake<T>(cells: &mut [T], width: usize) {
    if width == 0 {
        return;
    }
    cells
        .chunks_exact_mut(width)
        .skip(1)
        .step_by(2)
        .for_each(<[T]>::reverse);
}

#[cfg(test)]
mod testing {
    use super::*;

    #[test]
    fn test_dimensions() -> Result<()> {
        for total in 1..=2_000 {
            let dims = Dimensions::for_bases(total)?;
            let expected = (total as f64).sqrt().ceil() as usize;
            assert_eq!(dims.width, expected);
            assert_eq!(dims.height, total.div_ceil(expected));
            assert!(dims.area() >= total);
        }
        assert_eq!(
            Dimensions::for_bases(12)?,
            Dimensions {
                width: 4,
                height: 3
            }
        );
        Ok(())
    }

    #[test]
    fn test_dimensions_empty() {
        assert!(Dimensions::for_bases(0).is_err());
    }

    #[test]
    fn test_forward() {
        let width = 4;
        assert_eq!(forward(0, width), (0, 0));
        assert_eq!(forward(3, width), (0, 3));
        assert_eq!(forward(4, width), (1, 3));
        assert_eq!(forward(7, width), (1, 0));
        assert_eq!(forward(8, width), (2, 0));
        for k in 0..64 {
            let (row, col) = forward(k, width);
            assert_eq!(row, k / width);
            if row % 2 == 0 {
                assert_eq!(col, k % width);
            } else {
                assert_eq!(col, width - 1 - k % width);
            }
        }
    }

    #[test]
    fn test_unsnake_recovers_order() {
        for width in 1..12 {
            let height = 7;
            let mut grid = vec![usize::MAX; width * height];
            for k in 0..width * height {
                let (row, col) = forward(k, width);
                grid[row * width + col] = k;
            }
            unsnake(&mut grid, width);
            assert!(grid.iter().enumerate().all(|(i, &k)| i == k));
        }
    }
}
