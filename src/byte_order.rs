//! Host byte order detection.

/// Order of bytes inside a multi-byte integer as stored in memory.
///
/// Decides which end of an assembled pixel word carries its low-order
/// bytes once the word is laid out in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Big-endian: the most significant byte comes first.
    MostSignificantFirst,
    /// Little-endian: the least significant byte comes first.
    LeastSignificantFirst,
}

impl ByteOrder {
    /// Byte order of the host, detected once at compile time.
    pub const HOST: Self = Self::detect();

    /// Detect the host byte order.
    ///
    /// Lays out `0x01020304` as a native `u32` and looks at the first byte
    /// in memory: `0x01` means the most significant byte is stored first.
    pub const fn detect() -> Self {
        let probe = 0x0102_0304u32.to_ne_bytes();
        if probe[0] == 0x01 {
            Self::MostSignificantFirst
        } else {
            Self::LeastSignificantFirst
        }
    }

    /// The cached host byte order. Same value as [`ByteOrder::HOST`].
    #[inline]
    pub const fn host() -> Self {
        Self::HOST
    }

    /// Write the `len` low-order bytes of `word` into `out`.
    ///
    /// `out` must be exactly `len` bytes long and `len` at most 4.
    #[inline]
    pub(crate) fn write_word(self, word: u32, out: &mut [u8]) {
        let len = out.len();
        match self {
            // Trailing bytes of the big-endian layout hold the low-order part.
            Self::MostSignificantFirst => out.copy_from_slice(&word.to_be_bytes()[4 - len..]),
            Self::LeastSignificantFirst => out.copy_from_slice(&word.to_le_bytes()[..len]),
        }
    }

    /// Reassemble a word from a packed pixel written by [`write_word`](Self::write_word).
    #[inline]
    pub(crate) fn read_word(self, bytes: &[u8]) -> u32 {
        match self {
            Self::MostSignificantFirst => bytes
                .iter()
                .fold(0u32, |word, &b| (word << 8) | u32::from(b)),
            Self::LeastSignificantFirst => bytes
                .iter()
                .rev()
                .fold(0u32, |word, &b| (word << 8) | u32::from(b)),
        }
    }
}
