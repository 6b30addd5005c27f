//! Error type shared by the resolver and the packer.

use core::fmt;

use crate::limits::LimitExceeded;

/// Errors from resolving a pixel format or packing an image.
///
/// Every variant describes invalid static configuration (a bad pixel width,
/// mismatched buffers, too many channels). Nothing here is transient, so
/// callers should not retry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum PackError {
    /// The pixel bit-width is not a whole number of bytes between 1 and 4.
    UnsupportedPixelWidth {
        /// Bits per pixel reported by the target format.
        bits: u32,
    },
    /// A channel plane does not hold exactly `rows * columns` samples.
    DimensionMismatch {
        /// Index of the offending plane (0 = red or gray).
        channel: usize,
        /// `rows * columns`.
        expected: usize,
        /// Actual plane length.
        actual: usize,
    },
    /// Only gray-scale (1) and RGB (3) planar images are supported.
    UnsupportedChannelCount {
        /// Number of planes supplied.
        channels: usize,
    },
    /// The output buffer could not be allocated.
    AllocationFailure {
        /// Requested size, saturated at `u64::MAX` on overflow.
        bytes: u64,
    },
    /// A configured [`PackLimits`](crate::PackLimits) check failed.
    Limit(LimitExceeded),
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedPixelWidth { bits } => write!(
                f,
                "{bits} bits per pixel is not supported (need a multiple of 8, at most 32)"
            ),
            Self::DimensionMismatch {
                channel,
                expected,
                actual,
            } => write!(
                f,
                "channel {channel} holds {actual} samples, expected {expected}"
            ),
            Self::UnsupportedChannelCount { channels } => {
                write!(f, "{channels} channels supplied, expected 1 or 3")
            }
            Self::AllocationFailure { bytes } => {
                write!(f, "cannot allocate {bytes} bytes for the packed buffer")
            }
            Self::Limit(err) => write!(f, "limit exceeded: {err}"),
        }
    }
}

impl core::error::Error for PackError {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Limit(err) => Some(err),
            _ => None,
        }
    }
}

impl From<LimitExceeded> for PackError {
    fn from(err: LimitExceeded) -> Self {
        Self::Limit(err)
    }
}
