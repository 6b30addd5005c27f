//! Channel mask decoding.
//!
//! A true-color visual describes its pixel layout with one bit-mask per
//! channel. [`resolve`] turns those masks into a [`FormatPlan`]: for each
//! channel the bit offset of the field and the number of values it can hold.

use rgb::Rgb;

use crate::byte_order::ByteOrder;
use crate::error::PackError;

/// Bits of a pixel word reserved for one channel, e.g. `0x00FF_0000`.
///
/// Expected to be a single contiguous run of set bits. Contiguity is assumed,
/// not validated.
pub type ChannelMask = u32;

/// The red, green and blue masks of a true-color visual.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelMasks {
    /// Bits carrying the red channel.
    pub red: ChannelMask,
    /// Bits carrying the green channel.
    pub green: ChannelMask,
    /// Bits carrying the blue channel.
    pub blue: ChannelMask,
}

impl ChannelMasks {
    /// Bundle three masks.
    pub const fn new(red: ChannelMask, green: ChannelMask, blue: ChannelMask) -> Self {
        Self { red, green, blue }
    }

    /// Red in bits 16..24, green in 8..16, blue in 0..8.
    pub const RGB888: Self = Self::new(0x00FF_0000, 0x0000_FF00, 0x0000_00FF);

    /// Blue in bits 16..24, green in 8..16, red in 0..8.
    pub const BGR888: Self = Self::new(0x0000_00FF, 0x0000_FF00, 0x00FF_0000);

    /// 5-6-5 layout of 16-bit visuals.
    pub const RGB565: Self = Self::new(0xF800, 0x07E0, 0x001F);
}

/// Where one channel lives in a pixel word and how many values it can take.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChannelEncoding {
    offset: u32,
    levels: u64,
}

impl ChannelEncoding {
    /// Decode a channel mask.
    ///
    /// `offset` is the index of the lowest set bit and `levels` is
    /// `(mask >> offset) + 1`, which is `2^n` for a contiguous run of `n`
    /// bits. A zero mask yields a channel with a single level, always
    /// encoded as 0.
    pub const fn from_mask(mask: ChannelMask) -> Self {
        if mask == 0 {
            return Self {
                offset: 0,
                levels: 1,
            };
        }
        let offset = mask.trailing_zeros();
        Self {
            offset,
            levels: (mask >> offset) as u64 + 1,
        }
    }

    /// Bit position of the channel's least significant bit.
    #[inline]
    pub const fn offset(self) -> u32 {
        self.offset
    }

    /// Number of distinct values the channel can hold.
    #[inline]
    pub const fn levels(self) -> u64 {
        self.levels
    }

    /// Width of the channel field in bits, for contiguous masks.
    #[inline]
    pub const fn bits(self) -> u32 {
        self.levels.trailing_zeros()
    }

    /// The mask this encoding was decoded from.
    #[inline]
    pub const fn mask(self) -> ChannelMask {
        ((self.levels - 1) << self.offset) as u32
    }

    /// Map an 8-bit sample onto `0..levels`.
    ///
    /// Computes `round(levels * sample / 256)` with halves rounded up, then
    /// saturates at `levels - 1` so that bright samples never overflow the
    /// field.
    #[inline]
    pub const fn quantize(self, sample: u8) -> u64 {
        let q = (2 * self.levels * sample as u64 + 256) / 512;
        if q >= self.levels { self.levels - 1 } else { q }
    }

    /// Representative 8-bit sample of a quantized level.
    ///
    /// `round(level * 256 / levels)`, halves rounded up, clamped to 255.
    #[inline]
    pub const fn expand(self, level: u64) -> u8 {
        let v = (2 * level * 256 + self.levels) / (2 * self.levels);
        if v > 255 { 255 } else { v as u8 }
    }

    fn is_contiguous(mask: ChannelMask) -> bool {
        if mask == 0 {
            return true;
        }
        let run = u64::from(mask >> mask.trailing_zeros());
        run & (run + 1) == 0
    }
}

/// Encoding plan for one true-color pixel format.
///
/// Resolved once per target format and reused for every image packed into
/// it. Cheap to copy and safe to share between threads.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FormatPlan {
    red: ChannelEncoding,
    green: ChannelEncoding,
    blue: ChannelEncoding,
    bytes_per_pixel: usize,
}

impl FormatPlan {
    /// Resolve a plan from a mask triple. See [`resolve`].
    pub fn from_masks(masks: ChannelMasks, pixel_bits: u32) -> Result<Self, PackError> {
        if pixel_bits == 0 || pixel_bits > 32 || pixel_bits % 8 != 0 {
            return Err(PackError::UnsupportedPixelWidth { bits: pixel_bits });
        }

        for (name, mask) in [
            ("red", masks.red),
            ("green", masks.green),
            ("blue", masks.blue),
        ] {
            if !ChannelEncoding::is_contiguous(mask) {
                log::warn!("{name} mask {mask:#010x} is not contiguous; packed output is unspecified");
            }
            if pixel_bits < 32 && mask >> pixel_bits != 0 {
                log::warn!("{name} mask {mask:#010x} does not fit in {pixel_bits} bits");
            }
        }

        let plan = Self {
            red: ChannelEncoding::from_mask(masks.red),
            green: ChannelEncoding::from_mask(masks.green),
            blue: ChannelEncoding::from_mask(masks.blue),
            bytes_per_pixel: (pixel_bits / 8) as usize,
        };
        log::debug!(
            "resolved pixel format: {} bytes/pixel, red {}@{}, green {}@{}, blue {}@{}",
            plan.bytes_per_pixel,
            plan.red.levels,
            plan.red.offset,
            plan.green.levels,
            plan.green.offset,
            plan.blue.levels,
            plan.blue.offset,
        );
        Ok(plan)
    }

    /// Red channel encoding.
    #[inline]
    pub fn red(&self) -> ChannelEncoding {
        self.red
    }

    /// Green channel encoding.
    #[inline]
    pub fn green(&self) -> ChannelEncoding {
        self.green
    }

    /// Blue channel encoding.
    #[inline]
    pub fn blue(&self) -> ChannelEncoding {
        self.blue
    }

    /// Size of one packed pixel in bytes (1 to 4).
    #[inline]
    pub fn bytes_per_pixel(&self) -> usize {
        self.bytes_per_pixel
    }

    /// Size of one packed pixel in bits.
    #[inline]
    pub fn pixel_bits(&self) -> u32 {
        self.bytes_per_pixel as u32 * 8
    }

    /// Quantize one RGB sample and assemble its pixel word.
    #[inline]
    pub fn encode_pixel(&self, sample: Rgb<u8>) -> u32 {
        let word = (self.red.quantize(sample.r) << self.red.offset)
            | (self.green.quantize(sample.g) << self.green.offset)
            | (self.blue.quantize(sample.b) << self.blue.offset);
        // Fields of non-overlapping 32-bit masks never reach bit 32.
        word as u32
    }

    /// Read the per-channel levels back out of one packed pixel.
    ///
    /// `bytes` must be one pixel as written by the packer in `order`.
    pub fn decode_pixel(&self, bytes: &[u8], order: ByteOrder) -> Rgb<u64> {
        let word = u64::from(order.read_word(bytes));
        let field = |enc: ChannelEncoding| (word >> enc.offset) & (enc.levels - 1);
        Rgb {
            r: field(self.red),
            g: field(self.green),
            b: field(self.blue),
        }
    }
}

/// Resolve channel masks and a pixel width into a [`FormatPlan`].
///
/// Masks are assumed non-overlapping and contiguous. `pixel_bits` is the
/// storage size of one pixel and must be 8, 16, 24 or 32.
///
/// # Errors
///
/// [`PackError::UnsupportedPixelWidth`] if `pixel_bits` is not a whole number
/// of bytes between 1 and 4.
///
/// # Example
///
/// ```
/// use truecolor_pack::resolve;
///
/// let plan = resolve(0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 32).unwrap();
/// assert_eq!(plan.green().offset(), 8);
/// assert_eq!(plan.green().levels(), 256);
/// assert_eq!(plan.bytes_per_pixel(), 4);
///
/// assert!(resolve(0x7C00, 0x03E0, 0x001F, 15).is_err());
/// ```
pub fn resolve(
    red_mask: ChannelMask,
    green_mask: ChannelMask,
    blue_mask: ChannelMask,
    pixel_bits: u32,
) -> Result<FormatPlan, PackError> {
    FormatPlan::from_masks(ChannelMasks::new(red_mask, green_mask, blue_mask), pixel_bits)
}

/// Frame-buffer bits per pixel for a visual of the given depth.
///
/// Displays store pixels in units of their bitmap unit, except that 16-bit
/// deep visuals are always stored in 16 bits.
pub const fn pixel_bits_for_visual(depth: u32, bitmap_unit: u32) -> u32 {
    if depth == 16 { 16 } else { bitmap_unit }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contiguous_masks_decode() {
        let enc = ChannelEncoding::from_mask(0x0000_FF00);
        assert_eq!(enc.offset(), 8);
        assert_eq!(enc.levels(), 256);
        assert_eq!(enc.bits(), 8);
        assert_eq!(enc.mask(), 0x0000_FF00);

        for n in 1..=32u32 {
            for shift in 0..=(32 - n) {
                let mask = (((1u64 << n) - 1) << shift) as u32;
                let enc = ChannelEncoding::from_mask(mask);
                assert_eq!(enc.offset(), shift, "mask {mask:#x}");
                assert_eq!(enc.levels(), 1u64 << n, "mask {mask:#x}");
            }
        }
    }

    #[test]
    fn zero_mask_is_single_level() {
        let enc = ChannelEncoding::from_mask(0);
        assert_eq!(enc.offset(), 0);
        assert_eq!(enc.levels(), 1);
        assert_eq!(enc.quantize(255), 0);
    }

    #[test]
    fn rgb565_plan() {
        let plan = FormatPlan::from_masks(ChannelMasks::RGB565, 16).unwrap();
        assert_eq!(plan.bytes_per_pixel(), 2);
        assert_eq!(plan.pixel_bits(), 16);
        assert_eq!((plan.red().offset(), plan.red().levels()), (11, 32));
        assert_eq!((plan.green().offset(), plan.green().levels()), (5, 64));
        assert_eq!((plan.blue().offset(), plan.blue().levels()), (0, 32));
    }

    #[test]
    fn pixel_width_must_be_whole_bytes() {
        for bits in [0, 1, 7, 12, 15, 31, 40, 64] {
            assert_eq!(
                resolve(0xF800, 0x07E0, 0x001F, bits),
                Err(PackError::UnsupportedPixelWidth { bits })
            );
        }
        for bits in [8, 16, 24, 32] {
            let plan = resolve(0xE0, 0x1C, 0x03, bits).unwrap();
            assert_eq!(plan.bytes_per_pixel(), bits as usize / 8);
        }
    }

    #[test]
    fn resolve_is_deterministic() {
        let a = resolve(0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 24).unwrap();
        let b = FormatPlan::from_masks(ChannelMasks::RGB888, 24).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn quantize_rounds_half_up() {
        // 2 * 64 / 256 = 0.5
        assert_eq!(ChannelEncoding::from_mask(0x1).quantize(64), 1);
        assert_eq!(ChannelEncoding::from_mask(0x1).quantize(63), 0);
        // 4 * 32 / 256 = 0.5, 4 * 96 / 256 = 1.5
        assert_eq!(ChannelEncoding::from_mask(0x3).quantize(32), 1);
        assert_eq!(ChannelEncoding::from_mask(0x3).quantize(96), 2);
        // full byte is the identity
        let full = ChannelEncoding::from_mask(0xFF);
        for s in 0..=255u8 {
            assert_eq!(full.quantize(s), u64::from(s));
        }
    }

    #[test]
    fn quantize_never_reaches_levels() {
        for n in 0..=32u32 {
            let mask = ((1u64 << n) - 1) as u32;
            let enc = ChannelEncoding::from_mask(mask);
            for s in 0..=255u8 {
                assert!(enc.quantize(s) < enc.levels(), "levels {} s {s}", enc.levels());
            }
            let top = enc.quantize(255);
            assert!(top <= enc.levels() - 1);
            if enc.levels() <= 256 {
                assert_eq!(top, enc.levels() - 1, "levels {}", enc.levels());
            } else {
                // Wider channels cannot reach their top code from 8 bits.
                assert_eq!(top, enc.levels() * 255 / 256, "levels {}", enc.levels());
            }
        }
    }

    #[test]
    fn expand_stays_within_one_step() {
        for n in 0..=32u32 {
            let enc = ChannelEncoding::from_mask(((1u64 << n) - 1) as u32);
            let step = 256u64.div_ceil(enc.levels());
            for s in 0..=255u8 {
                let back = enc.expand(enc.quantize(s));
                assert!(
                    u64::from(back.abs_diff(s)) <= step,
                    "levels {} s {s} back {back}",
                    enc.levels()
                );
            }
        }
    }

    #[test]
    fn encode_pixel_places_fields() {
        let plan = FormatPlan::from_masks(ChannelMasks::RGB888, 24).unwrap();
        let word = plan.encode_pixel(Rgb {
            r: 255,
            g: 128,
            b: 0,
        });
        assert_eq!(word, 0x00FF_8000);

        let plan = FormatPlan::from_masks(ChannelMasks::RGB565, 16).unwrap();
        let white = plan.encode_pixel(Rgb {
            r: 255,
            g: 255,
            b: 255,
        });
        assert_eq!(white, 0xFFFF);
    }

    #[test]
    fn decode_pixel_reads_levels() {
        let plan = FormatPlan::from_masks(ChannelMasks::RGB565, 16).unwrap();
        let levels = plan.decode_pixel(&[0xF8, 0x1F], ByteOrder::MostSignificantFirst);
        assert_eq!((levels.r, levels.g, levels.b), (31, 0, 31));
        let levels = plan.decode_pixel(&[0x1F, 0xF8], ByteOrder::LeastSignificantFirst);
        assert_eq!((levels.r, levels.g, levels.b), (31, 0, 31));
    }

    #[test]
    fn full_width_mask() {
        let plan = resolve(0xFFFF_FFFF, 0, 0, 32).unwrap();
        assert_eq!(plan.red().levels(), 1 << 32);
        let word = plan.encode_pixel(Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(word, 0xFF00_0000);
        let levels = plan.decode_pixel(&word.to_le_bytes(), ByteOrder::LeastSignificantFirst);
        assert_eq!(levels.r, 0xFF00_0000);
    }

    #[test]
    fn visual_pixel_bits() {
        assert_eq!(pixel_bits_for_visual(24, 32), 32);
        assert_eq!(pixel_bits_for_visual(16, 32), 16);
        assert_eq!(pixel_bits_for_visual(8, 8), 8);
    }
}
