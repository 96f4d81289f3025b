//! Checksum algorithms
//!
//! Three algorithms are in use across the families. All of them run over a
//! payload that has already been flattened. [`ChecksumKind`] picks one and
//! knows how wide it is on the wire; trailing checksums (K4, K5) go through
//! [`ChecksumKind::verify_trailing`] and [`ChecksumKind::append`], leading
//! ones (K5000) through [`ChecksumKind::check`].

use crate::cursor::SyxReader;
use crate::error::{Result, SyxError};
use crate::options::{ChecksumPolicy, DecodeOptions};
use crate::writer::SyxWriter;

/// Seed added to the byte sums
pub const BYTE_SUM_SEED: u8 = 0xA5;

/// Value the 16-bit word sum is subtracted from
pub const WORD_SUM_SEED: u16 = 0x5A3C;

/// `(Σ payload + 0xA5) & 0x7F`, so the result is a valid SysEx data byte
pub fn seven_bit_sum(payload: &[u8]) -> u8 {
    byte_sum(payload) & 0x7F
}

/// `(Σ payload + 0xA5) mod 256`, no masking
pub fn byte_sum(payload: &[u8]) -> u8 {
    payload
        .iter()
        .fold(BYTE_SUM_SEED, |sum, &b| sum.wrapping_add(b))
}

/// `(0x5A3C - Σ little-endian words) & 0xFFFF`
///
/// An odd trailing byte counts as the low byte of a final word.
pub fn word_sum(payload: &[u8]) -> u16 {
    let sum = payload.chunks(2).fold(0u16, |sum, pair| {
        let word = match *pair {
            [lo, hi] => u16::from_le_bytes([lo, hi]),
            [lo] => u16::from(lo),
            _ => 0,
        };
        sum.wrapping_add(word)
    });
    WORD_SUM_SEED.wrapping_sub(sum)
}

/// A checksum algorithm together with its wire width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    /// [`seven_bit_sum`], one byte
    SevenBitSum,
    /// [`byte_sum`], one byte
    ByteSum,
    /// [`word_sum`], two bytes low first
    WordSum,
}

impl ChecksumKind {
    /// Compute over `payload`, widened to 16 bits
    pub fn compute(self, payload: &[u8]) -> u16 {
        match self {
            Self::SevenBitSum => u16::from(seven_bit_sum(payload)),
            Self::ByteSum => u16::from(byte_sum(payload)),
            Self::WordSum => word_sum(payload),
        }
    }

    /// Number of bytes the checksum occupies on the wire
    pub const fn width(self) -> usize {
        match self {
            Self::SevenBitSum | Self::ByteSum => 1,
            Self::WordSum => 2,
        }
    }

    /// Wire bytes for a computed checksum
    pub fn to_bytes(self, checksum: u16) -> Vec<u8> {
        match self {
            Self::SevenBitSum | Self::ByteSum => vec![checksum as u8],
            Self::WordSum => checksum.to_le_bytes().to_vec(),
        }
    }

    /// Stored checksum from its wire bytes, low byte first
    fn read(self, stored: &[u8]) -> u16 {
        stored
            .iter()
            .take(self.width())
            .rev()
            .fold(0, |sum, &b| (sum << 8) | u16::from(b))
    }

    /// Compare the `stored` wire bytes at `offset` with the sum of `payload`
    pub fn check(
        self,
        unit: &'static str,
        offset: usize,
        stored: &[u8],
        payload: &[u8],
        options: &DecodeOptions,
    ) -> Result<()> {
        verify(unit, offset, self.read(stored), self.compute(payload), options)
    }

    /// Check the checksum closing the `size`-byte unit at the reader's
    /// position, before any of its fields are read
    pub fn verify_trailing(
        self,
        reader: &SyxReader<'_>,
        size: usize,
        options: &DecodeOptions,
    ) -> Result<()> {
        let bytes = reader.peek_bytes(size)?;
        let Some(split) = size.checked_sub(self.width()) else {
            return Err(SyxError::StructuralLength {
                unit: reader.unit(),
                expected: self.width(),
                actual: size,
            });
        };
        let (payload, stored) = bytes.split_at(split);
        self.check(
            reader.unit(),
            reader.position() + split,
            stored,
            payload,
            options,
        )
    }

    /// Write the checksum of `payload`, for units that lead with it
    pub fn write(self, writer: &mut SyxWriter, payload: &[u8]) {
        writer.extend(&self.to_bytes(self.compute(payload)));
    }

    /// Append the checksum of everything written since `start`
    pub fn append(self, writer: &mut SyxWriter, start: usize) {
        let sum = self.compute(&writer.bytes()[start..]);
        writer.extend(&self.to_bytes(sum));
    }
}

/// Compare a stored checksum with the computed one under `options`
///
/// `offset` is the absolute position of the stored checksum.
pub fn verify(
    unit: &'static str,
    offset: usize,
    stored: u16,
    computed: u16,
    options: &DecodeOptions,
) -> Result<()> {
    if stored == computed {
        return Ok(());
    }
    match options.checksum {
        ChecksumPolicy::Strict => Err(SyxError::ChecksumMismatch {
            unit,
            offset,
            stored,
            computed,
        }),
        ChecksumPolicy::Warn => {
            tracing::warn!(
                "{} @ {:#06x}: checksum mismatch (stored {:#06x}, computed {:#06x}), continuing",
                unit,
                offset,
                stored,
                computed
            );
            Ok(())
        }
        ChecksumPolicy::Ignore => Ok(()),
    }
}
