//! Pieces shared by every K4 unit

use ksynth_core::SyxWriter;
use ksynth_core::checksum::ChecksumKind;

/// Every K4 unit closes with a one-byte seven-bit sum of the bytes before it
pub(crate) const CHECKSUM: ChecksumKind = ChecksumKind::SevenBitSum;

/// Write `count` reserved zero bytes
pub(crate) fn reserved(writer: &mut SyxWriter, count: usize) {
    for _ in 0..count {
        writer.push(0);
    }
}
