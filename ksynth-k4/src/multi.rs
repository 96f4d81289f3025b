//! Multi patch: eight sections layering single patches

use ksynth_core::bits::{bit_range, is_bit_set, set_bit_range, with_bit};
use ksynth_core::{
    ByteValue, DecodeOptions, PatchName, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData,
    WireKind, decode_repeated, encode_repeated,
};
use rand::Rng;

use crate::params::{
    Channel, Depth, EffectNumber, Key, Level, PatchNumber, PlayMode, Submix, Transpose,
    VelocitySwitch,
};
use crate::{MULTI_SIZE, SECTION_COUNT, SECTION_SIZE, unit};

/// One layer of a multi patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub patch: PatchNumber,
    pub zone_low: Key,
    pub zone_high: Key,
    pub channel: Channel,
    pub velocity_switch: VelocitySwitch,
    pub muted: bool,
    pub submix: Submix,
    pub play_mode: PlayMode,
    pub level: Level,
    pub transpose: Transpose,
    pub tune: Depth,
}

impl Default for Section {
    fn default() -> Self {
        Self {
            patch: PatchNumber::default(),
            zone_low: Key::clamped(0),
            zone_high: Key::clamped(127),
            channel: Channel::default(),
            velocity_switch: VelocitySwitch::default(),
            muted: false,
            submix: Submix::default(),
            play_mode: PlayMode::default(),
            level: Level::clamped(100),
            transpose: Transpose::default(),
            tune: Depth::default(),
        }
    }
}

impl Section {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            patch: PatchNumber::random(rng),
            zone_low: Key::random(rng),
            zone_high: Key::random(rng),
            channel: Channel::random(rng),
            velocity_switch: VelocitySwitch::random(rng),
            muted: rng.random(),
            submix: Submix::random(rng),
            play_mode: PlayMode::random(rng),
            level: Level::random(rng),
            transpose: Transpose::random(rng),
            tune: Depth::random(rng),
        }
    }
}

impl SystemExclusiveData for Section {
    const UNIT: &'static str = "section";

    fn decode(reader: &mut SyxReader<'_>, _options: &DecodeOptions) -> Result<Self> {
        let b = reader.read_u8()?;
        let patch = reader.decode(bit_range(b, 0, 6))?;
        let zone_low = reader.value()?;
        let zone_high = reader.value()?;

        let b = reader.read_u8()?;
        let channel = reader.decode(bit_range(b, 0, 4))?;
        let velocity_switch = reader.decode_kind(bit_range(b, 4, 2))?;
        let muted = is_bit_set(b, 6);

        let b = reader.read_u8()?;
        let submix = reader.decode_kind(bit_range(b, 0, 3))?;
        let play_mode = reader.decode_kind(bit_range(b, 3, 2))?;

        Ok(Self {
            patch,
            zone_low,
            zone_high,
            channel,
            velocity_switch,
            muted,
            submix,
            play_mode,
            level: reader.value()?,
            transpose: reader.value()?,
            tune: reader.value()?,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        writer.value(self.patch);
        writer.value(self.zone_low);
        writer.value(self.zone_high);
        let b = set_bit_range(self.channel.to_wire(), 4, 2, self.velocity_switch.to_wire());
        writer.push(with_bit(b, 6, self.muted));
        writer.push(set_bit_range(self.submix.to_wire(), 3, 2, self.play_mode.to_wire()));
        writer.value(self.level);
        writer.value(self.transpose);
        writer.value(self.tune);
        Ok(())
    }

    fn data_size(&self) -> usize {
        SECTION_SIZE
    }
}

/// K4 multi patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiPatch {
    pub name: PatchName<10>,
    pub volume: Level,
    pub effect: EffectNumber,
    /// Always [`SECTION_COUNT`] entries
    pub sections: Vec<Section>,
}

impl Default for MultiPatch {
    fn default() -> Self {
        Self {
            name: PatchName::default(),
            volume: Level::clamped(80),
            effect: EffectNumber::default(),
            sections: vec![Section::default(); SECTION_COUNT],
        }
    }
}

impl MultiPatch {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            name: PatchName::random(rng),
            volume: Level::random(rng),
            effect: EffectNumber::random(rng),
            sections: (0..SECTION_COUNT).map(|_| Section::random(rng)).collect(),
        }
    }
}

impl SystemExclusiveData for MultiPatch {
    const UNIT: &'static str = "multi";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        unit::CHECKSUM.verify_trailing(reader, MULTI_SIZE, options)?;
        let patch = Self {
            name: PatchName::read(reader)?,
            volume: reader.value()?,
            effect: reader.value()?,
            sections: decode_repeated(reader, SECTION_COUNT, options)?,
        };
        reader.skip(1)?;
        Ok(patch)
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        let start = writer.len();
        self.name.write(writer);
        writer.value(self.volume);
        writer.value(self.effect);
        encode_repeated(writer, &self.sections, SECTION_COUNT)?;
        unit::CHECKSUM.append(writer, start);
        Ok(())
    }

    fn data_size(&self) -> usize {
        MULTI_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_packing() {
        let section = Section {
            patch: PatchNumber::new(64).unwrap(),
            channel: Channel::new(16).unwrap(),
            velocity_switch: VelocitySwitch::Loud,
            muted: true,
            submix: Submix::H,
            play_mode: PlayMode::Mix,
            ..Default::default()
        };
        let bytes = section.to_bytes().unwrap();
        assert_eq!(bytes[0], 63);
        assert_eq!(bytes[3], 0x0F | (2 << 4) | 0x40);
        assert_eq!(bytes[4], 0x07 | (2 << 3));
        assert_eq!(Section::from_bytes(&bytes).unwrap(), section);
    }

    #[test]
    fn test_invalid_velocity_switch() {
        let mut bytes = Section::default().to_bytes().unwrap();
        bytes[3] = 3 << 4;
        assert!(matches!(
            Section::from_bytes(&bytes),
            Err(ksynth_core::SyxError::InvalidKind { kind: "VelocitySwitch", offset: 3, .. })
        ));
    }

    #[test]
    fn test_wrong_section_count() {
        let mut multi = MultiPatch::default();
        multi.sections.pop();
        assert!(matches!(
            multi.to_bytes(),
            Err(ksynth_core::SyxError::StructuralLength { unit: "section", expected: 8, actual: 7 })
        ));
    }
}
