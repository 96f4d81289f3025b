//! Nybble transport
//!
//! Over MIDI each data byte travels as two bytes carrying four bits each,
//! low nybble first.

use ksynth_core::bits::{high_nybble, low_nybble, nybbles_to_byte};
use ksynth_core::{ByteValue, Result, SyxError, SyxReader, WireRule, ranged_value};

ranged_value! {
    /// One transported half-byte
    pub struct Nybble(0..=15, default 0, WireRule::Unmasked);
}

/// Split every byte into two transport bytes, low nybble first
pub fn nybblize(data: &[u8]) -> Vec<u8> {
    data.iter()
        .flat_map(|&b| [low_nybble(b), high_nybble(b)])
        .collect()
}

/// Join transport bytes back into data bytes
pub fn denybblize(data: &[u8]) -> Result<Vec<u8>> {
    if data.len() % 2 != 0 {
        return Err(SyxError::StructuralLength {
            unit: "nybbles",
            expected: data.len() + 1,
            actual: data.len(),
        });
    }
    let mut reader = SyxReader::new("nybbles", data);
    let mut out = Vec::with_capacity(data.len() / 2);
    while !reader.is_empty() {
        let low: Nybble = reader.value()?;
        let high: Nybble = reader.value()?;
        out.push(nybbles_to_byte(high.to_wire(), low.to_wire()));
    }
    reader.finish()?;
    Ok(out)
}
