//! Caller-side limits on packing work.
//!
//! [`PackLimits`] caps image dimensions and output size. [`LimitExceeded`]
//! is returned when a check fails. Checks run before any pixel is touched.

/// Limits applied by a [`Packer`](crate::Packer) before packing.
///
/// All fields are optional; `None` means no limit for that resource.
///
/// # Example
///
/// ```
/// use truecolor_pack::PackLimits;
///
/// let limits = PackLimits::none()
///     .with_max_pixels(4096 * 4096)
///     .with_max_output(64 * 1024 * 1024);
/// assert!(limits.check_dimensions(512, 512).is_ok());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct PackLimits {
    /// Maximum number of rows.
    pub max_rows: Option<usize>,
    /// Maximum number of columns (pixels per row).
    pub max_columns: Option<usize>,
    /// Maximum total pixels (rows × columns).
    pub max_pixels: Option<u64>,
    /// Maximum packed output size in bytes.
    pub max_output_bytes: Option<u64>,
}

impl PackLimits {
    /// No limits (all fields `None`).
    pub fn none() -> Self {
        Self::default()
    }

    /// Set maximum number of rows.
    pub fn with_max_rows(mut self, rows: usize) -> Self {
        self.max_rows = Some(rows);
        self
    }

    /// Set maximum number of columns.
    pub fn with_max_columns(mut self, columns: usize) -> Self {
        self.max_columns = Some(columns);
        self
    }

    /// Set maximum total pixels.
    pub fn with_max_pixels(mut self, max: u64) -> Self {
        self.max_pixels = Some(max);
        self
    }

    /// Set maximum packed output size in bytes.
    pub fn with_max_output(mut self, bytes: u64) -> Self {
        self.max_output_bytes = Some(bytes);
        self
    }

    /// Whether any limits are set.
    pub fn has_any(&self) -> bool {
        self.max_rows.is_some()
            || self.max_columns.is_some()
            || self.max_pixels.is_some()
            || self.max_output_bytes.is_some()
    }

    /// Check image dimensions against `max_rows`, `max_columns`, and `max_pixels`.
    pub fn check_dimensions(&self, rows: usize, columns: usize) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_rows
            && rows > max
        {
            return Err(LimitExceeded::Rows { actual: rows, max });
        }
        if let Some(max) = self.max_columns
            && columns > max
        {
            return Err(LimitExceeded::Columns {
                actual: columns,
                max,
            });
        }
        if let Some(max) = self.max_pixels {
            let pixels = (rows as u64).saturating_mul(columns as u64);
            if pixels > max {
                return Err(LimitExceeded::Pixels {
                    actual: pixels,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Check packed output size against `max_output_bytes`.
    pub fn check_output_size(&self, bytes: u64) -> Result<(), LimitExceeded> {
        if let Some(max) = self.max_output_bytes
            && bytes > max
        {
            return Err(LimitExceeded::OutputSize { actual: bytes, max });
        }
        Ok(())
    }
}

/// A pack limit was exceeded.
///
/// Each variant carries the actual value and the limit it broke.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LimitExceeded {
    /// Row count exceeded `max_rows`.
    Rows {
        /// Actual rows.
        actual: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// Column count exceeded `max_columns`.
    Columns {
        /// Actual columns.
        actual: usize,
        /// Maximum allowed.
        max: usize,
    },
    /// Pixel count exceeded `max_pixels`.
    Pixels {
        /// Actual pixel count.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
    /// Packed output exceeded `max_output_bytes`.
    OutputSize {
        /// Output size in bytes.
        actual: u64,
        /// Maximum allowed.
        max: u64,
    },
}

impl core::fmt::Display for LimitExceeded {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Rows { actual, max } => write!(f, "rows {actual} exceeds limit {max}"),
            Self::Columns { actual, max } => write!(f, "columns {actual} exceeds limit {max}"),
            Self::Pixels { actual, max } => {
                write!(f, "pixel count {actual} exceeds limit {max}")
            }
            Self::OutputSize { actual, max } => {
                write!(f, "output size {actual} bytes exceeds limit {max}")
            }
        }
    }
}

impl core::error::Error for LimitExceeded {}
