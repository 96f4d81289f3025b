//! Combi: four sections layering single patches
//!
//! The leading checksum is the unmasked [`byte_sum`] of everything after it,
//! so it may have bit 7 set.

use ksynth_core::bits::{is_bit_set, with_bit};
use ksynth_core::checksum::ChecksumKind;
use ksynth_core::{
    DecodeOptions, PatchName, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData,
    WireKind, decode_repeated, encode_repeated,
};
use rand::Rng;

use crate::params::{Bipolar, Channel, Coarse, EffectPath, Key, Level, PatchBank, PatchSlot};
use crate::source::VelocitySwitch;
use crate::{COMBI_SECTIONS, COMBI_SECTION_SIZE, COMBI_SIZE};

/// Leading combi checksum, all eight bits kept
const CHECKSUM: ChecksumKind = ChecksumKind::ByteSum;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombiSection {
    pub bank: PatchBank,
    pub patch: PatchSlot,
    pub volume: Level,
    pub pan: Bipolar,
    pub effect_path: EffectPath,
    pub transpose: Coarse,
    pub tune: Bipolar,
    pub zone_low: Key,
    pub zone_high: Key,
    pub velocity_switch: VelocitySwitch,
    pub channel: Channel,
    pub effect_send: Level,
}

impl Default for CombiSection {
    fn default() -> Self {
        Self {
            bank: PatchBank::default(),
            patch: PatchSlot::default(),
            volume: Level::clamped(100),
            pan: Bipolar::default(),
            effect_path: EffectPath::default(),
            transpose: Coarse::default(),
            tune: Bipolar::default(),
            zone_low: Key::clamped(0),
            zone_high: Key::clamped(127),
            velocity_switch: VelocitySwitch::default(),
            channel: Channel::default(),
            effect_send: Level::default(),
        }
    }
}

impl CombiSection {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            bank: PatchBank::random(rng),
            patch: PatchSlot::random(rng),
            volume: Level::random(rng),
            pan: Bipolar::random(rng),
            effect_path: EffectPath::random(rng),
            transpose: Coarse::random(rng),
            tune: Bipolar::random(rng),
            zone_low: Key::random(rng),
            zone_high: Key::random(rng),
            velocity_switch: VelocitySwitch::random(rng),
            channel: Channel::random(rng),
            effect_send: Level::random(rng),
        }
    }
}

impl SystemExclusiveData for CombiSection {
    const UNIT: &'static str = "combi section";

    fn decode(reader: &mut SyxReader<'_>, _options: &DecodeOptions) -> Result<Self> {
        Ok(Self {
            bank: reader.kind()?,
            patch: reader.value()?,
            volume: reader.value()?,
            pan: reader.value()?,
            effect_path: reader.value()?,
            transpose: reader.value()?,
            tune: reader.value()?,
            zone_low: reader.value()?,
            zone_high: reader.value()?,
            velocity_switch: VelocitySwitch::read(reader)?,
            channel: reader.value()?,
            effect_send: reader.value()?,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        writer.kind(self.bank);
        writer.value(self.patch);
        writer.value(self.volume);
        writer.value(self.pan);
        writer.value(self.effect_path);
        writer.value(self.transpose);
        writer.value(self.tune);
        writer.value(self.zone_low);
        writer.value(self.zone_high);
        self.velocity_switch.write(writer);
        writer.value(self.channel);
        writer.value(self.effect_send);
        Ok(())
    }

    fn data_size(&self) -> usize {
        COMBI_SECTION_SIZE
    }
}

/// K5000 combi
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combi {
    pub name: PatchName<8>,
    pub volume: Level,
    /// Bit *i* of the wire byte set means section *i* is muted
    pub section_muted: [bool; COMBI_SECTIONS],
    /// Always [`COMBI_SECTIONS`] entries
    pub sections: Vec<CombiSection>,
}

impl Default for Combi {
    fn default() -> Self {
        Self {
            name: PatchName::default(),
            volume: Level::clamped(100),
            section_muted: [false; COMBI_SECTIONS],
            sections: vec![CombiSection::default(); COMBI_SECTIONS],
        }
    }
}

impl Combi {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            name: PatchName::random(rng),
            volume: Level::random(rng),
            section_muted: std::array::from_fn(|_| rng.random()),
            sections: (0..COMBI_SECTIONS)
                .map(|_| CombiSection::random(rng))
                .collect(),
        }
    }
}

impl SystemExclusiveData for Combi {
    const UNIT: &'static str = "combi";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        let bytes = reader.peek_bytes(COMBI_SIZE)?;
        let (stored, payload) = bytes.split_at(1);
        CHECKSUM.check(Self::UNIT, reader.position(), stored, payload, options)?;
        reader.skip(1)?;

        let name = PatchName::read(reader)?;
        let volume = reader.value()?;
        let b = reader.read_u8()?;
        let section_muted = std::array::from_fn(|i| is_bit_set(b, i as u8));
        let sections = decode_repeated(reader, COMBI_SECTIONS, options)?;

        Ok(Self {
            name,
            volume,
            section_muted,
            sections,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        let mut body = SyxWriter::new(Self::UNIT, COMBI_SIZE - 1);
        self.name.write(&mut body);
        body.value(self.volume);
        let muted = self
            .section_muted
            .iter()
            .enumerate()
            .fold(0, |b, (i, &muted)| with_bit(b, i as u8, muted));
        body.push(muted);
        encode_repeated(&mut body, &self.sections, COMBI_SECTIONS)?;

        let body = body.finish()?;
        CHECKSUM.write(writer, &body);
        writer.extend(&body);
        Ok(())
    }

    fn data_size(&self) -> usize {
        COMBI_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksynth_core::SyxError;
    use ksynth_core::checksum::byte_sum;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_combi_layout() {
        let mut combi = Combi::default();
        combi.section_muted[2] = true;
        combi.sections[1].bank = PatchBank::E;
        combi.sections[1].channel = Channel::new(16).unwrap();
        let bytes = combi.to_bytes().unwrap();
        assert_eq!(bytes.len(), COMBI_SIZE);
        assert_eq!(bytes[10], 0b0100);
        // section 2 starts at 11 + 12
        assert_eq!(bytes[23], 2);
        assert_eq!(bytes[23 + 10], 15);
        assert_eq!(bytes[0], byte_sum(&bytes[1..]));
        assert_eq!(Combi::from_bytes(&bytes).unwrap(), combi);
    }

    #[test]
    fn test_checksum_is_unmasked() {
        let mut rng = Pcg32::seed_from_u64(11);
        let high = (0..64)
            .map(|_| Combi::random(&mut rng).to_bytes().unwrap())
            .find(|bytes| bytes[0] & 0x80 != 0);
        let bytes = high.expect("some combi sums past 0x7F");
        assert_eq!(Combi::from_bytes(&bytes).unwrap().to_bytes().unwrap(), bytes);
    }

    #[test]
    fn test_corrupt_combi() {
        let mut bytes = Combi::default().to_bytes().unwrap();
        bytes[9] = 99;
        assert!(matches!(
            Combi::from_bytes(&bytes),
            Err(SyxError::ChecksumMismatch { unit: "combi", offset: 0, .. })
        ));
    }

    #[test]
    fn test_section_errors_name_the_section() {
        let mut combi = Combi::default();
        let mut bytes = combi.to_bytes().unwrap();
        // receive channel of section 4 (one-based, 16 is the last)
        bytes[11 + 36 + 10] = 16;
        bytes[0] = byte_sum(&bytes[1..]);
        let err = Combi::from_bytes(&bytes).unwrap_err();
        assert_eq!(err.unit(), Some("combi section"));
        assert_eq!(err.offset(), Some(57));

        combi.sections.pop();
        assert!(matches!(
            combi.to_bytes(),
            Err(SyxError::StructuralLength { unit: "combi section", .. })
        ));
    }
}
