//! Additive harmonics: levels, per-harmonic settings and envelopes
//!
//! The per-harmonic settings are packed two to a byte, odd harmonic in the
//! low nybble. Within a nybble bit 3 enables modulation and bits 0-1 pick
//! one of the four harmonic envelopes.
//!
//! With 63 harmonics the last byte only has one occupant, and it sits in the
//! *high* nybble. The low nybble of that byte is ignored when decoding and
//! written as zero, so a dump with anything else there does not come back
//! byte-identical.

use ksynth_core::bits::{
    bit_range, high_nybble, is_bit_set, join_flag, low_nybble, nybbles_to_byte, split_flag,
    with_bit,
};
use ksynth_core::{ByteValue, RangedValue, Result, SyxReader, SyxWriter};
use rand::Rng;

use crate::HARMONIC_COUNT;
use crate::envelope::Envelope;
use crate::params::{Depth, EnvelopeNumber, Level};

/// Bytes holding the packed per-harmonic settings
pub const SETTINGS_SIZE: usize = 32;

/// Harmonic envelopes per source
pub const HARMONIC_ENVELOPES: usize = 4;

/// One partial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Harmonic {
    pub level: Level,
    /// Follows the harmonic modulation depths
    pub modulated: bool,
    pub envelope: EnvelopeNumber,
}

impl Harmonic {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            level: Level::random(rng),
            modulated: rng.random(),
            envelope: EnvelopeNumber::random(rng),
        }
    }

    fn to_nybble(self) -> u8 {
        with_bit(self.envelope.to_wire(), 3, self.modulated)
    }
}

/// Harmonic envelope with its on/off switch and effect depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HarmonicEnvelope {
    pub active: bool,
    pub effect: Depth,
    pub envelope: Envelope,
}

impl HarmonicEnvelope {
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        let (active, effect) = split_flag(reader.read_u8()?);
        Ok(Self {
            active,
            effect: reader.decode(effect)?,
            envelope: Envelope::read(reader)?,
        })
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        writer.push(join_flag(self.active, self.effect.to_wire()));
        self.envelope.write(writer);
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            active: rng.random(),
            effect: Depth::random(rng),
            envelope: Envelope::random(rng),
        }
    }
}

/// Read the 63 levels followed by the 32 packed settings bytes
pub(crate) fn read_harmonics(reader: &mut SyxReader<'_>) -> Result<[Harmonic; HARMONIC_COUNT]> {
    let mut harmonics = [Harmonic::default(); HARMONIC_COUNT];
    for harmonic in harmonics.iter_mut() {
        harmonic.level = reader.value()?;
    }

    let (pairs, last) = harmonics.split_at_mut(HARMONIC_COUNT - 1);
    for pair in pairs.chunks_exact_mut(2) {
        let b = reader.read_u8()?;
        apply_nybble(reader, &mut pair[0], low_nybble(b))?;
        apply_nybble(reader, &mut pair[1], high_nybble(b))?;
    }
    // harmonic 63 lives in the high nybble; the low one is not used
    let b = reader.read_u8()?;
    apply_nybble(reader, &mut last[0], high_nybble(b))?;

    Ok(harmonics)
}

fn apply_nybble(reader: &SyxReader<'_>, harmonic: &mut Harmonic, nybble: u8) -> Result<()> {
    harmonic.modulated = is_bit_set(nybble, 3);
    harmonic.envelope = reader.decode(bit_range(nybble, 0, 2))?;
    Ok(())
}

/// Write the levels and the packed settings
pub(crate) fn write_harmonics(writer: &mut SyxWriter, harmonics: &[Harmonic; HARMONIC_COUNT]) {
    for harmonic in harmonics {
        writer.value(harmonic.level);
    }
    let (pairs, last) = harmonics.split_at(HARMONIC_COUNT - 1);
    for pair in pairs.chunks_exact(2) {
        writer.push(nybbles_to_byte(pair[1].to_nybble(), pair[0].to_nybble()));
    }
    writer.push(nybbles_to_byte(last[0].to_nybble(), 0));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harmonics() -> [Harmonic; HARMONIC_COUNT] {
        std::array::from_fn(|i| Harmonic {
            level: Level::new(i as i32).unwrap(),
            modulated: i % 3 == 0,
            envelope: EnvelopeNumber::new(i as i32 % 4 + 1).unwrap(),
        })
    }

    #[test]
    fn test_settings_nybble_order() {
        let mut writer = SyxWriter::new("harmonics", HARMONIC_COUNT + SETTINGS_SIZE);
        write_harmonics(&mut writer, &harmonics());
        let bytes = writer.finish().unwrap();
        let settings = &bytes[HARMONIC_COUNT..];
        // harmonic 1: modulated, envelope 1; harmonic 2: envelope 2
        assert_eq!(settings[0], 0x18);
        // harmonic 63 (index 62): envelope 3, not modulated, high nybble
        assert_eq!(settings[31], 0x20);
    }

    #[test]
    fn test_harmonic_63_round_trips() {
        let original = harmonics();
        let mut writer = SyxWriter::new("harmonics", HARMONIC_COUNT + SETTINGS_SIZE);
        write_harmonics(&mut writer, &original);
        let bytes = writer.finish().unwrap();
        let mut reader = SyxReader::new("harmonics", &bytes);
        assert_eq!(read_harmonics(&mut reader).unwrap(), original);
        assert!(reader.is_empty());
    }

    #[test]
    fn test_last_low_nybble_is_ignored() {
        // Known round-trip exception: the spare nybble does not survive
        let mut writer = SyxWriter::new("harmonics", HARMONIC_COUNT + SETTINGS_SIZE);
        write_harmonics(&mut writer, &harmonics());
        let mut bytes = writer.finish().unwrap();
        bytes[HARMONIC_COUNT + 31] |= 0x0B;

        let mut reader = SyxReader::new("harmonics", &bytes);
        let decoded = read_harmonics(&mut reader).unwrap();
        assert_eq!(decoded, harmonics());

        let mut writer = SyxWriter::new("harmonics", HARMONIC_COUNT + SETTINGS_SIZE);
        write_harmonics(&mut writer, &decoded);
        let again = writer.finish().unwrap();
        assert_eq!(again[HARMONIC_COUNT + 31], 0x20);
        assert_ne!(again, bytes);
    }
}
