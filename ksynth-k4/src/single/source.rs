//! One of the four PCM sources of a single patch

use ksynth_core::bits::{bit_range, is_bit_set, set_bit_range, with_bit};
use ksynth_core::{ByteValue, DecodeOptions, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData};
use rand::Rng;

use super::envelope::{Envelope, Modulation, TimeModulation};
use crate::SOURCE_SIZE;
use crate::params::{Coarse, Curve, Depth, Key, Level, WaveNumber};

/// PCM source with its amplifier (DCA)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Source {
    pub delay: Level,
    pub wave: WaveNumber,
    pub ks_curve: Curve,
    pub coarse: Coarse,
    /// Pitch follows the keyboard; otherwise `fixed_key` sounds
    pub key_track: bool,
    pub fixed_key: Key,
    pub fine: Depth,
    pub pressure_freq: bool,
    /// Vibrato and auto-bend apply to this source
    pub vibrato: bool,
    pub velocity_curve: Curve,
    pub level: Level,
    pub envelope: Envelope,
    pub level_mod: Modulation,
    pub time_mod: TimeModulation,
}

impl Source {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            delay: Level::random(rng),
            wave: WaveNumber::random(rng),
            ks_curve: Curve::random(rng),
            coarse: Coarse::random(rng),
            key_track: rng.random(),
            fixed_key: Key::random(rng),
            fine: Depth::random(rng),
            pressure_freq: rng.random(),
            vibrato: rng.random(),
            velocity_curve: Curve::random(rng),
            level: Level::random(rng),
            envelope: Envelope::random(rng),
            level_mod: Modulation::random(rng),
            time_mod: TimeModulation::random(rng),
        }
    }
}

impl SystemExclusiveData for Source {
    const UNIT: &'static str = "source";

    fn decode(reader: &mut SyxReader<'_>, _options: &DecodeOptions) -> Result<Self> {
        let delay = reader.value()?;

        // wave number is split: high bit here, low seven bits in the next byte
        let b = reader.read_u8()?;
        let wave_high = u16::from(b & 0x01);
        let ks_curve = reader.decode(bit_range(b, 4, 3))?;
        let b = reader.read_u8()?;
        let wave = reader.decode_wide((wave_high << 7) | u16::from(b & 0x7F))?;

        let b = reader.read_u8()?;
        let coarse = reader.decode(bit_range(b, 0, 6))?;
        let key_track = is_bit_set(b, 6);
        let fixed_key = reader.value()?;
        let fine = reader.value()?;

        let b = reader.read_u8()?;
        let pressure_freq = is_bit_set(b, 0);
        let vibrato = is_bit_set(b, 1);
        let velocity_curve = reader.decode(bit_range(b, 2, 3))?;

        Ok(Self {
            delay,
            wave,
            ks_curve,
            coarse,
            key_track,
            fixed_key,
            fine,
            pressure_freq,
            vibrato,
            velocity_curve,
            level: reader.value()?,
            envelope: Envelope::read(reader)?,
            level_mod: Modulation::read(reader)?,
            time_mod: TimeModulation::read(reader)?,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        writer.value(self.delay);
        let wave = self.wave.to_wide();
        writer.push(set_bit_range(((wave >> 7) & 0x01) as u8, 4, 3, self.ks_curve.to_wire()));
        writer.push((wave & 0x7F) as u8);
        writer.push(with_bit(self.coarse.to_wire(), 6, self.key_track));
        writer.value(self.fixed_key);
        writer.value(self.fine);
        let flags = with_bit(with_bit(0, 0, self.pressure_freq), 1, self.vibrato);
        writer.push(set_bit_range(flags, 2, 3, self.velocity_curve.to_wire()));
        writer.value(self.level);
        self.envelope.write(writer);
        self.level_mod.write(writer);
        self.time_mod.write(writer);
        Ok(())
    }

    fn data_size(&self) -> usize {
        SOURCE_SIZE
    }
}
