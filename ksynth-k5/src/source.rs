//! One additive source: pitch, harmonics, filter and amplifier

use ksynth_core::bits::{join_flag, split_flag};
use ksynth_core::{ByteValue, DecodeOptions, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData};
use rand::Rng;

use crate::envelope::{Envelope, PitchEnvelope};
use crate::harmonic::{
    HARMONIC_ENVELOPES, Harmonic, HarmonicEnvelope, read_harmonics, write_harmonics,
};
use crate::params::{
    Bipolar, Coarse, Depth, HarmonicNumber, Key, Level, Rate, RateScaling, Transpose,
};
use crate::{HARMONIC_COUNT, SOURCE_SIZE};

/// Pitch section
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pitch {
    pub delay: Rate,
    pub coarse: Coarse,
    pub fine: Bipolar,
    pub key_track: bool,
    pub fixed_key: Key,
    pub env_depth: Transpose,
    pub env_loop: bool,
    pub env_velocity_depth: Depth,
    pub envelope: PitchEnvelope,
}

/// Depths of the harmonic modulation and the harmonics it applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarmonicModulation {
    pub velocity: Depth,
    pub pressure: Depth,
    pub key_scaling: Depth,
    pub lfo: Depth,
    pub range_low: HarmonicNumber,
    pub range_high: HarmonicNumber,
}

impl Default for HarmonicModulation {
    fn default() -> Self {
        Self {
            velocity: Depth::default(),
            pressure: Depth::default(),
            key_scaling: Depth::default(),
            lfo: Depth::default(),
            range_low: HarmonicNumber::clamped(1),
            range_high: HarmonicNumber::clamped(63),
        }
    }
}

/// Digital filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Filter {
    pub cutoff: Level,
    pub slope: Level,
    pub velocity_depth: Depth,
    pub pressure_depth: Depth,
    pub ks_depth: Depth,
    pub lfo_depth: Depth,
    pub env_depth: Bipolar,
    pub envelope: Envelope,
}

/// Amplifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Amplifier {
    pub velocity_depth: Depth,
    pub pressure_depth: Depth,
    pub ks_depth: Depth,
    pub lfo: bool,
    pub lfo_depth: Depth,
    pub envelope: Envelope,
    pub velocity_rate: RateScaling,
    pub ks_rate: RateScaling,
}

/// Key scaling of the output level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyScaling {
    pub break_key: Key,
    pub left_depth: Bipolar,
    pub right_depth: Bipolar,
}

/// K5 source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub pitch: Pitch,
    pub harmonics: [Harmonic; HARMONIC_COUNT],
    pub harmonic_mod: HarmonicModulation,
    pub harmonic_envelopes: [HarmonicEnvelope; HARMONIC_ENVELOPES],
    pub filter: Filter,
    pub amplifier: Amplifier,
    pub key_scaling: KeyScaling,
    pub output: Level,
}

impl Default for Source {
    fn default() -> Self {
        let mut harmonics = [Harmonic::default(); HARMONIC_COUNT];
        harmonics[0].level = Level::clamped(99);
        Self {
            pitch: Pitch::default(),
            harmonics,
            harmonic_mod: HarmonicModulation::default(),
            harmonic_envelopes: [HarmonicEnvelope::default(); HARMONIC_ENVELOPES],
            filter: Filter::default(),
            amplifier: Amplifier::default(),
            key_scaling: KeyScaling::default(),
            output: Level::clamped(99),
        }
    }
}

impl Source {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            pitch: Pitch {
                delay: Rate::random(rng),
                coarse: Coarse::random(rng),
                fine: Bipolar::random(rng),
                key_track: rng.random(),
                fixed_key: Key::random(rng),
                env_depth: Transpose::random(rng),
                env_loop: rng.random(),
                env_velocity_depth: Depth::random(rng),
                envelope: PitchEnvelope::random(rng),
            },
            harmonics: std::array::from_fn(|_| Harmonic::random(rng)),
            harmonic_mod: HarmonicModulation {
                velocity: Depth::random(rng),
                pressure: Depth::random(rng),
                key_scaling: Depth::random(rng),
                lfo: Depth::random(rng),
                range_low: HarmonicNumber::random(rng),
                range_high: HarmonicNumber::random(rng),
            },
            harmonic_envelopes: std::array::from_fn(|_| HarmonicEnvelope::random(rng)),
            filter: Filter {
                cutoff: Level::random(rng),
                slope: Level::random(rng),
                velocity_depth: Depth::random(rng),
                pressure_depth: Depth::random(rng),
                ks_depth: Depth::random(rng),
                lfo_depth: Depth::random(rng),
                env_depth: Bipolar::random(rng),
                envelope: Envelope::random(rng),
            },
            amplifier: Amplifier {
                velocity_depth: Depth::random(rng),
                pressure_depth: Depth::random(rng),
                ks_depth: Depth::random(rng),
                lfo: rng.random(),
                lfo_depth: Depth::random(rng),
                envelope: Envelope::random(rng),
                velocity_rate: RateScaling::random(rng),
                ks_rate: RateScaling::random(rng),
            },
            key_scaling: KeyScaling {
                break_key: Key::random(rng),
                left_depth: Bipolar::random(rng),
                right_depth: Bipolar::random(rng),
            },
            output: Level::random(rng),
        }
    }
}

impl SystemExclusiveData for Source {
    const UNIT: &'static str = "source";

    fn decode(reader: &mut SyxReader<'_>, _options: &DecodeOptions) -> Result<Self> {
        let delay = reader.value()?;
        let coarse = reader.value()?;
        let fine = reader.value()?;
        let (key_track, key) = split_flag(reader.read_u8()?);
        let fixed_key = reader.decode(key)?;
        let env_depth = reader.value()?;
        let (env_loop, depth) = split_flag(reader.read_u8()?);
        let pitch = Pitch {
            delay,
            coarse,
            fine,
            key_track,
            fixed_key,
            env_depth,
            env_loop,
            env_velocity_depth: reader.decode(depth)?,
            envelope: PitchEnvelope::read(reader)?,
        };

        let harmonics = read_harmonics(reader)?;
        let harmonic_mod = HarmonicModulation {
            velocity: reader.value()?,
            pressure: reader.value()?,
            key_scaling: reader.value()?,
            lfo: reader.value()?,
            range_low: reader.value()?,
            range_high: reader.value()?,
        };
        let mut harmonic_envelopes = [HarmonicEnvelope::default(); HARMONIC_ENVELOPES];
        for envelope in harmonic_envelopes.iter_mut() {
            *envelope = HarmonicEnvelope::read(reader)?;
        }

        let filter = Filter {
            cutoff: reader.value()?,
            slope: reader.value()?,
            velocity_depth: reader.value()?,
            pressure_depth: reader.value()?,
            ks_depth: reader.value()?,
            lfo_depth: reader.value()?,
            env_depth: reader.value()?,
            envelope: Envelope::read(reader)?,
        };

        let velocity_depth = reader.value()?;
        let pressure_depth = reader.value()?;
        let ks_depth = reader.value()?;
        let (lfo, depth) = split_flag(reader.read_u8()?);
        let amplifier = Amplifier {
            velocity_depth,
            pressure_depth,
            ks_depth,
            lfo,
            lfo_depth: reader.decode(depth)?,
            envelope: Envelope::read(reader)?,
            velocity_rate: reader.value()?,
            ks_rate: reader.value()?,
        };

        Ok(Self {
            pitch,
            harmonics,
            harmonic_mod,
            harmonic_envelopes,
            filter,
            amplifier,
            key_scaling: KeyScaling {
                break_key: reader.value()?,
                left_depth: reader.value()?,
                right_depth: reader.value()?,
            },
            output: reader.value()?,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        let pitch = &self.pitch;
        writer.value(pitch.delay);
        writer.value(pitch.coarse);
        writer.value(pitch.fine);
        writer.push(join_flag(pitch.key_track, pitch.fixed_key.to_wire()));
        writer.value(pitch.env_depth);
        writer.push(join_flag(pitch.env_loop, pitch.env_velocity_depth.to_wire()));
        pitch.envelope.write(writer);

        write_harmonics(writer, &self.harmonics);
        let hm = &self.harmonic_mod;
        writer.value(hm.velocity);
        writer.value(hm.pressure);
        writer.value(hm.key_scaling);
        writer.value(hm.lfo);
        writer.value(hm.range_low);
        writer.value(hm.range_high);
        for envelope in &self.harmonic_envelopes {
            envelope.write(writer);
        }

        let filter = &self.filter;
        writer.value(filter.cutoff);
        writer.value(filter.slope);
        writer.value(filter.velocity_depth);
        writer.value(filter.pressure_depth);
        writer.value(filter.ks_depth);
        writer.value(filter.lfo_depth);
        writer.value(filter.env_depth);
        filter.envelope.write(writer);

        let amp = &self.amplifier;
        writer.value(amp.velocity_depth);
        writer.value(amp.pressure_depth);
        writer.value(amp.ks_depth);
        writer.push(join_flag(amp.lfo, amp.lfo_depth.to_wire()));
        amp.envelope.write(writer);
        writer.value(amp.velocity_rate);
        writer.value(amp.ks_rate);

        writer.value(self.key_scaling.break_key);
        writer.value(self.key_scaling.left_depth);
        writer.value(self.key_scaling.right_depth);
        writer.value(self.output);
        Ok(())
    }

    fn data_size(&self) -> usize {
        SOURCE_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_size() {
        let bytes = Source::default().to_bytes().unwrap();
        assert_eq!(bytes.len(), SOURCE_SIZE);
        assert_eq!(Source::from_bytes(&bytes).unwrap(), Source::default());
    }

    #[test]
    fn test_field_offsets() {
        let mut source = Source::default();
        source.pitch.key_track = true;
        source.pitch.fixed_key = Key::new(36).unwrap();
        source.harmonics[62].level = Level::new(77).unwrap();
        source.harmonic_mod.range_high = HarmonicNumber::new(40).unwrap();
        source.filter.cutoff = Level::new(55).unwrap();
        source.amplifier.lfo = true;
        source.amplifier.lfo_depth = Depth::new(9).unwrap();
        source.output = Level::new(12).unwrap();

        let bytes = source.to_bytes().unwrap();
        assert_eq!(bytes[3], 0x80 | 36);
        assert_eq!(bytes[80], 77);
        assert_eq!(bytes[118], 39);
        assert_eq!(bytes[179], 55);
        assert_eq!(bytes[203], 0x80 | 9);
        assert_eq!(bytes[223], 12);
    }
}
