//! Planar 8-bit source images.
//!
//! Planar (BSQ) rasters store each channel as its own contiguous buffer of
//! `rows * columns` bytes, row-major, one byte per sample.

use imgref::ImgRef;
use rgb::Rgb;

use crate::error::PackError;

/// A borrowed one- or three-channel planar image.
///
/// A gray-scale image has a single plane that feeds all three color
/// channels. Dimensions are supplied separately when packing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlanarImage<'a> {
    /// One plane, replicated into red, green and blue.
    Gray(&'a [u8]),
    /// Red, green and blue planes.
    Rgb([&'a [u8]; 3]),
}

impl<'a> PlanarImage<'a> {
    /// Gray-scale image from a single plane.
    pub fn gray(plane: &'a [u8]) -> Self {
        Self::Gray(plane)
    }

    /// Color image from three planes.
    pub fn rgb(red: &'a [u8], green: &'a [u8], blue: &'a [u8]) -> Self {
        Self::Rgb([red, green, blue])
    }

    /// Build an image from a list of planes.
    ///
    /// # Errors
    ///
    /// [`PackError::UnsupportedChannelCount`] unless exactly one or three
    /// planes are given.
    pub fn from_planes(planes: &[&'a [u8]]) -> Result<Self, PackError> {
        match *planes {
            [gray] => Ok(Self::Gray(gray)),
            [red, green, blue] => Ok(Self::Rgb([red, green, blue])),
            _ => Err(PackError::UnsupportedChannelCount {
                channels: planes.len(),
            }),
        }
    }

    /// Borrow a gray-scale plane from an `imgref` image.
    ///
    /// # Errors
    ///
    /// [`PackError::DimensionMismatch`] if rows are padded (stride differs
    /// from width) or the buffer is shorter than `width * height`. For padded
    /// rows `actual` is `stride * height`.
    pub fn from_imgref(img: ImgRef<'a, u8>) -> Result<Self, PackError> {
        let expected = img.width() * img.height();
        // A single row may carry any stride.
        let padded = img.height() > 1 && img.stride() != img.width();
        let strided = img.stride() * img.height();
        let buf = img.into_buf();
        if padded || buf.len() < expected {
            return Err(PackError::DimensionMismatch {
                channel: 0,
                expected,
                actual: if padded { strided } else { buf.len() },
            });
        }
        Ok(Self::Gray(&buf[..expected]))
    }

    /// Number of planes: 1 or 3.
    #[inline]
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray(_) => 1,
            Self::Rgb(_) => 3,
        }
    }

    /// Whether this is a single-plane gray-scale image.
    #[inline]
    pub fn is_gray(&self) -> bool {
        matches!(self, Self::Gray(_))
    }

    /// The planes, in red, green, blue order for color images.
    pub fn planes(&self) -> &[&'a [u8]] {
        match self {
            Self::Gray(plane) => core::slice::from_ref(plane),
            Self::Rgb(planes) => planes,
        }
    }

    /// Check that every plane holds exactly `rows * columns` samples.
    ///
    /// # Errors
    ///
    /// [`PackError::DimensionMismatch`] naming the first plane whose length
    /// differs, or if `rows * columns` overflows.
    pub fn check_dimensions(&self, rows: usize, columns: usize) -> Result<(), PackError> {
        let expected = rows.checked_mul(columns);
        for (channel, plane) in self.planes().iter().enumerate() {
            if expected != Some(plane.len()) {
                return Err(PackError::DimensionMismatch {
                    channel,
                    expected: expected.unwrap_or(usize::MAX),
                    actual: plane.len(),
                });
            }
        }
        Ok(())
    }

    /// Red, green and blue samples at a row-major pixel index.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds for any plane.
    #[inline]
    pub fn sample(&self, index: usize) -> Rgb<u8> {
        match self {
            Self::Gray(plane) => {
                let v = plane[index];
                Rgb { r: v, g: v, b: v }
            }
            Self::Rgb([r, g, b]) => Rgb {
                r: r[index],
                g: g[index],
                b: b[index],
            },
        }
    }

    /// Samples of one row, `columns` pixels wide, starting at pixel `start`.
    pub(crate) fn row_samples(
        &self,
        start: usize,
        columns: usize,
    ) -> impl Iterator<Item = Rgb<u8>> + '_ {
        (start..start + columns).map(move |i| self.sample(i))
    }
}
