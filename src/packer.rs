//! Planar-to-packed pixel conversion.
//!
//! [`pack`] runs a resolved [`FormatPlan`] over every pixel of a
//! [`PlanarImage`]: each 8-bit sample is quantized into its channel's range,
//! the fields are combined into one pixel word, and the low-order
//! `bytes_per_pixel` bytes of that word are written in the requested
//! [`ByteOrder`].
//!
//! Output pixels depend only on the input samples at the same position, so
//! rows can be packed independently (see `Packer::pack_parallel` behind the
//! `rayon` feature).

use alloc::vec::Vec;
use core::fmt;

use crate::byte_order::ByteOrder;
use crate::error::PackError;
use crate::limits::PackLimits;
use crate::mask::FormatPlan;
use crate::planar::PlanarImage;

/// Packed, interleaved pixels ready to hand to a display.
///
/// `rows * columns * bytes_per_pixel` bytes, row-major, no padding between
/// pixels or rows.
#[derive(Clone, PartialEq, Eq)]
pub struct PackedBuffer {
    data: Vec<u8>,
    rows: usize,
    columns: usize,
    bytes_per_pixel: usize,
}

impl PackedBuffer {
    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Pixels per row.
    #[inline]
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Bytes occupied by one pixel.
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.columns * self.bytes_per_pixel
    }

    /// The packed bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the packed bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= rows`.
    pub fn row(&self, y: usize) -> &[u8] {
        assert!(y < self.rows, "row {y} out of bounds ({} rows)", self.rows);
        let stride = self.stride();
        &self.data[y * stride..(y + 1) * stride]
    }

    /// Bytes of the pixel at (`row`, `column`).
    ///
    /// # Panics
    ///
    /// Panics if the position is outside the image.
    pub fn pixel(&self, row: usize, column: usize) -> &[u8] {
        assert!(
            column < self.columns,
            "column {column} out of bounds ({} columns)",
            self.columns
        );
        let start = column * self.bytes_per_pixel;
        &self.row(row)[start..start + self.bytes_per_pixel]
    }
}

impl AsRef<[u8]> for PackedBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<PackedBuffer> for Vec<u8> {
    fn from(buf: PackedBuffer) -> Self {
        buf.data
    }
}

impl fmt::Debug for PackedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PackedBuffer({}x{}, {} bytes/pixel)",
            self.columns, self.rows, self.bytes_per_pixel
        )
    }
}

/// Pack a planar image into `plan`'s pixel format.
///
/// Every plane of `image` must hold exactly `rows * columns` samples.
/// Nothing is produced unless the whole image can be converted.
///
/// # Errors
///
/// - [`PackError::DimensionMismatch`] if a plane's length is not
///   `rows * columns`.
/// - [`PackError::AllocationFailure`] if the output buffer cannot be
///   allocated.
///
/// # Example
///
/// ```
/// use truecolor_pack::{ByteOrder, PlanarImage, pack, resolve};
///
/// let plan = resolve(0xFF_0000, 0x00_FF00, 0x00_00FF, 24).unwrap();
/// let image = PlanarImage::rgb(&[255], &[128], &[0]);
/// let packed = pack(&plan, ByteOrder::LeastSignificantFirst, &image, 1, 1).unwrap();
/// assert_eq!(packed.as_bytes(), &[0x00, 0x80, 0xFF]);
/// ```
pub fn pack(
    plan: &FormatPlan,
    order: ByteOrder,
    image: &PlanarImage<'_>,
    rows: usize,
    columns: usize,
) -> Result<PackedBuffer, PackError> {
    let mut data = prepare(plan, order, image, rows, columns)?;
    let stride = columns * plan.bytes_per_pixel();
    if stride > 0 {
        for (row, out) in data.chunks_exact_mut(stride).enumerate() {
            pack_row(plan, order, image, row * columns, out);
        }
    }
    Ok(finish(plan, data, rows, columns))
}

/// Reusable packing configuration: target format, byte order, and limits.
///
/// Build one per target format and pack any number of images with it.
///
/// ```
/// use truecolor_pack::{ChannelMasks, FormatPlan, PackLimits, Packer, PlanarImage};
///
/// let plan = FormatPlan::from_masks(ChannelMasks::RGB565, 16).unwrap();
/// let packer = Packer::new(plan).with_limits(PackLimits::none().with_max_pixels(1 << 20));
///
/// let gray = [0u8, 255];
/// let packed = packer.pack(&PlanarImage::gray(&gray), 1, 2).unwrap();
/// assert_eq!(packed.as_bytes().len(), 4);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Packer {
    plan: FormatPlan,
    order: ByteOrder,
    limits: PackLimits,
}

impl Packer {
    /// Packer for `plan` using the host byte order and no limits.
    pub fn new(plan: FormatPlan) -> Self {
        Self {
            plan,
            order: ByteOrder::host(),
            limits: PackLimits::none(),
        }
    }

    /// Override the byte order, e.g. for a display with a different
    /// image byte order than the host.
    pub fn with_byte_order(mut self, order: ByteOrder) -> Self {
        self.order = order;
        self
    }

    /// Apply limits checked before every pack.
    pub fn with_limits(mut self, limits: PackLimits) -> Self {
        self.limits = limits;
        self
    }

    /// The target pixel format.
    pub fn plan(&self) -> &FormatPlan {
        &self.plan
    }

    /// Byte order used when writing pixels.
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Configured limits.
    pub fn limits(&self) -> &PackLimits {
        &self.limits
    }

    /// Output size in bytes for an image of the given dimensions, or `None`
    /// on overflow.
    pub fn output_size(&self, rows: usize, columns: usize) -> Option<usize> {
        output_len(rows, columns, self.plan.bytes_per_pixel())
    }

    /// Check limits, then [`pack`] `image`.
    ///
    /// # Errors
    ///
    /// [`PackError::Limit`] if a configured limit is exceeded, otherwise the
    /// errors of [`pack`].
    pub fn pack(
        &self,
        image: &PlanarImage<'_>,
        rows: usize,
        columns: usize,
    ) -> Result<PackedBuffer, PackError> {
        self.check_limits(rows, columns)?;
        pack(&self.plan, self.order, image, rows, columns)
    }

    /// Like [`Packer::pack`], with rows packed concurrently on the rayon
    /// thread pool. The output is identical.
    #[cfg(feature = "rayon")]
    pub fn pack_parallel(
        &self,
        image: &PlanarImage<'_>,
        rows: usize,
        columns: usize,
    ) -> Result<PackedBuffer, PackError> {
        use rayon::prelude::*;

        self.check_limits(rows, columns)?;
        let (plan, order) = (&self.plan, self.order);
        let mut data = prepare(plan, order, image, rows, columns)?;
        let stride = columns * plan.bytes_per_pixel();
        if stride > 0 {
            data.par_chunks_mut(stride)
                .enumerate()
                .for_each(|(row, out)| {
                    log::trace!("packing row {row}");
                    pack_row(plan, order, image, row * columns, out);
                });
        }
        Ok(finish(plan, data, rows, columns))
    }

    fn check_limits(&self, rows: usize, columns: usize) -> Result<(), PackError> {
        if !self.limits.has_any() {
            return Ok(());
        }
        self.limits.check_dimensions(rows, columns)?;
        let bytes = self
            .output_size(rows, columns)
            .map_or(u64::MAX, |n| n as u64);
        self.limits.check_output_size(bytes)?;
        Ok(())
    }
}

fn output_len(rows: usize, columns: usize, bytes_per_pixel: usize) -> Option<usize> {
    rows.checked_mul(columns)?.checked_mul(bytes_per_pixel)
}

/// Validate `image` and allocate a zeroed output buffer.
fn prepare(
    plan: &FormatPlan,
    order: ByteOrder,
    image: &PlanarImage<'_>,
    rows: usize,
    columns: usize,
) -> Result<Vec<u8>, PackError> {
    image.check_dimensions(rows, columns)?;
    let bytes = output_len(rows, columns, plan.bytes_per_pixel())
        .ok_or(PackError::AllocationFailure { bytes: u64::MAX })?;

    let mut data = Vec::new();
    data.try_reserve_exact(bytes)
        .map_err(|_| PackError::AllocationFailure {
            bytes: bytes as u64,
        })?;
    data.resize(bytes, 0);

    log::debug!(
        "packing {rows}x{columns} {} image into {} bytes/pixel ({order:?})",
        if image.is_gray() { "gray" } else { "rgb" },
        plan.bytes_per_pixel(),
    );
    Ok(data)
}

fn finish(plan: &FormatPlan, data: Vec<u8>, rows: usize, columns: usize) -> PackedBuffer {
    PackedBuffer {
        data,
        rows,
        columns,
        bytes_per_pixel: plan.bytes_per_pixel(),
    }
}

/// Pack one row starting at pixel index `start` into `out`.
#[inline]
fn pack_row(
    plan: &FormatPlan,
    order: ByteOrder,
    image: &PlanarImage<'_>,
    start: usize,
    out: &mut [u8],
) {
    let bpp = plan.bytes_per_pixel();
    let columns = out.len() / bpp;
    for (sample, pixel) in image
        .row_samples(start, columns)
        .zip(out.chunks_exact_mut(bpp))
    {
        order.write_word(plan.encode_pixel(sample), pixel);
    }
}
