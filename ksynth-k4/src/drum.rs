//! Drum kit: a common block followed by one unit per key
//!
//! Every block carries its own checksum, so a single corrupt note is
//! reported with the note's offset rather than the kit's.

use ksynth_core::bits::{bit_range, set_bit_range};
use ksynth_core::{
    DecodeOptions, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData, WireKind,
    decode_repeated, encode_repeated,
};
use rand::Rng;

use crate::params::{Channel, Depth, Level, Submix, WaveNumber};
use crate::{DRUM_COMMON_SIZE, DRUM_NOTE_COUNT, DRUM_NOTE_SIZE, DRUM_SIZE, unit};

const COMMON_RESERVED: usize = 7;

/// Settings shared by every drum note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrumCommon {
    pub channel: Channel,
    pub volume: Level,
    pub velocity_depth: Depth,
}

impl Default for DrumCommon {
    fn default() -> Self {
        Self {
            channel: Channel::clamped(10),
            volume: Level::clamped(100),
            velocity_depth: Depth::default(),
        }
    }
}

impl SystemExclusiveData for DrumCommon {
    const UNIT: &'static str = "drum common";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        unit::CHECKSUM.verify_trailing(reader, DRUM_COMMON_SIZE, options)?;
        let common = Self {
            channel: reader.value()?,
            volume: reader.value()?,
            velocity_depth: reader.value()?,
        };
        reader.skip(COMMON_RESERVED + 1)?;
        Ok(common)
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        let start = writer.len();
        writer.value(self.channel);
        writer.value(self.volume);
        writer.value(self.velocity_depth);
        unit::reserved(writer, COMMON_RESERVED);
        unit::CHECKSUM.append(writer, start);
        Ok(())
    }

    fn data_size(&self) -> usize {
        DRUM_COMMON_SIZE
    }
}

/// One of the two PCM voices of a drum note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrumSource {
    pub wave: WaveNumber,
    pub decay: Level,
    pub tune: Depth,
    pub level: Level,
}

/// Drum note: two sources stored parameter by parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrumNote {
    pub submix: Submix,
    pub sources: [DrumSource; 2],
}

impl DrumNote {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            submix: Submix::random(rng),
            sources: std::array::from_fn(|_| DrumSource {
                wave: WaveNumber::random(rng),
                decay: Level::random(rng),
                tune: Depth::random(rng),
                level: Level::random(rng),
            }),
        }
    }
}

impl SystemExclusiveData for DrumNote {
    const UNIT: &'static str = "drum note";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        unit::CHECKSUM.verify_trailing(reader, DRUM_NOTE_SIZE, options)?;
        let b = reader.read_u8()?;
        let submix = reader.decode_kind(bit_range(b, 4, 3))?;
        let high = [u16::from(b & 0x01), u16::from(reader.read_u8()? & 0x01)];

        let mut sources = [DrumSource::default(); 2];
        for (source, high) in sources.iter_mut().zip(high) {
            let low = reader.read_u8()?;
            source.wave = reader.decode_wide((high << 7) | u16::from(low & 0x7F))?;
        }
        for source in sources.iter_mut() {
            source.decay = reader.value()?;
        }
        for source in sources.iter_mut() {
            source.tune = reader.value()?;
        }
        for source in sources.iter_mut() {
            source.level = reader.value()?;
        }
        reader.skip(1)?;
        Ok(Self { submix, sources })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        let start = writer.len();
        let [wave1, wave2] = self.sources.map(|s| s.wave.to_wide());
        writer.push(set_bit_range(((wave1 >> 7) & 0x01) as u8, 4, 3, self.submix.to_wire()));
        writer.push(((wave2 >> 7) & 0x01) as u8);
        writer.push((wave1 & 0x7F) as u8);
        writer.push((wave2 & 0x7F) as u8);
        for source in &self.sources {
            writer.value(source.decay);
        }
        for source in &self.sources {
            writer.value(source.tune);
        }
        for source in &self.sources {
            writer.value(source.level);
        }
        unit::CHECKSUM.append(writer, start);
        Ok(())
    }

    fn data_size(&self) -> usize {
        DRUM_NOTE_SIZE
    }
}

/// K4 drum kit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrumKit {
    pub common: DrumCommon,
    /// Always [`DRUM_NOTE_COUNT`] entries
    pub notes: Vec<DrumNote>,
}

impl Default for DrumKit {
    fn default() -> Self {
        Self {
            common: DrumCommon::default(),
            notes: vec![DrumNote::default(); DRUM_NOTE_COUNT],
        }
    }
}

impl DrumKit {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            common: DrumCommon {
                channel: Channel::random(rng),
                volume: Level::random(rng),
                velocity_depth: Depth::random(rng),
            },
            notes: (0..DRUM_NOTE_COUNT).map(|_| DrumNote::random(rng)).collect(),
        }
    }
}

impl SystemExclusiveData for DrumKit {
    const UNIT: &'static str = "drum kit";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        Ok(Self {
            common: DrumCommon::decode_nested(reader, options)?,
            notes: decode_repeated(reader, DRUM_NOTE_COUNT, options)?,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        self.common.encode_nested(writer)?;
        encode_repeated(writer, &self.notes, DRUM_NOTE_COUNT)
    }

    fn data_size(&self) -> usize {
        DRUM_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ksynth_core::SyxError;

    #[test]
    fn test_note_layout() {
        let mut note = DrumNote {
            submix: Submix::C,
            ..Default::default()
        };
        note.sources[0].wave = WaveNumber::new(129).unwrap();
        note.sources[1].wave = WaveNumber::new(3).unwrap();
        note.sources[1].tune = Depth::new(-50).unwrap();
        let bytes = note.to_bytes().unwrap();
        assert_eq!(bytes[0], 0x01 | (2 << 4));
        assert_eq!(bytes[1], 0x00);
        assert_eq!(&bytes[2..4], &[0, 2]);
        assert_eq!(&bytes[6..8], &[50, 0]);
        assert_eq!(DrumNote::from_bytes(&bytes).unwrap(), note);
    }

    #[test]
    fn test_kit_is_its_blocks_in_order() {
        let mut kit = DrumKit::default();
        kit.notes[5].submix = Submix::H;
        let bytes = kit.to_bytes().unwrap();
        assert_eq!(&bytes[..DRUM_COMMON_SIZE], &kit.common.to_bytes().unwrap()[..]);
        for (i, chunk) in bytes[DRUM_COMMON_SIZE..].chunks(DRUM_NOTE_SIZE).enumerate() {
            assert_eq!(chunk, &kit.notes[i].to_bytes().unwrap()[..]);
        }
    }

    #[test]
    fn test_corrupt_note_reports_its_own_offset() {
        let mut bytes = DrumKit::default().to_bytes().unwrap();
        assert_eq!(bytes.len(), DRUM_SIZE);
        // fourth note, decay of source 1
        let note = DRUM_COMMON_SIZE + 3 * DRUM_NOTE_SIZE;
        bytes[note + 4] ^= 0x01;
        match DrumKit::from_bytes(&bytes) {
            Err(SyxError::ChecksumMismatch { unit, offset, .. }) => {
                assert_eq!(unit, "drum note");
                assert_eq!(offset, note + DRUM_NOTE_SIZE - 1);
            }
            other => panic!("expected checksum mismatch, got {other:?}"),
        }
    }
}
