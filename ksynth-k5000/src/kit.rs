//! Additive kit: harmonic levels, formant filter and harmonic envelopes
//!
//! ```text
//! 0    checksum over bytes 1..=804
//! 1    common (12)
//! 13   morf (13)
//! 26   formant filter (11)
//! 37   soft harmonic levels (64)
//! 101  loud harmonic levels (64)
//! 165  formant filter bands (128)
//! 293  harmonic envelopes (64 × 8)
//! 805  unused, written as zero
//! ```

use ksynth_core::checksum::ChecksumKind;
use ksynth_core::{
    DecodeOptions, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData, WireKind,
};
use rand::Rng;

use crate::params::{
    Bipolar, FormantLfoShape, FormantModulator, HarmonicGroup, Key, Level, MorfLoop, MorfSource,
    VelocityCurve,
};
use crate::{FORMANT_BANDS, KIT_HARMONICS, KIT_SIZE};

const CHECKSUM: ChecksumKind = ChecksumKind::SevenBitSum;

/// Kit-wide settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KitCommon {
    /// Morf replaces the harmonic levels below when on
    pub morf: bool,
    pub total_gain: Level,
    pub group: HarmonicGroup,
    pub ks_gain: Bipolar,
    pub velocity_curve: VelocityCurve,
    pub velocity_depth: Level,
    pub balance_curve: VelocityCurve,
    pub balance_depth: Level,
    pub breakpoint: Key,
    pub bright: Bipolar,
    pub dark: Bipolar,
    pub odd_even: Bipolar,
}

/// Patch and source a morf step copies its harmonics from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MorfCopy {
    pub patch: Level,
    pub source: MorfSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Morf {
    pub copies: [MorfCopy; 4],
    pub times: [Level; 4],
    pub loop_kind: MorfLoop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FormantFilter {
    pub bias: Bipolar,
    pub modulator: FormantModulator,
    pub env_depth: Bipolar,
    pub attack: Level,
    pub decay1_time: Level,
    pub decay1_level: Bipolar,
    pub decay2_time: Level,
    pub decay2_level: Bipolar,
    pub release: Level,
    pub lfo_speed: Level,
    pub lfo_shape: FormantLfoShape,
}

/// One (rate, level) step of a harmonic envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stage {
    pub rate: Level,
    pub level: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HarmonicEnvelope {
    pub attack: Stage,
    pub decay1: Stage,
    pub decay2: Stage,
    pub release: Stage,
}

/// K5000 additive kit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditiveKit {
    pub common: KitCommon,
    pub morf: Morf,
    pub formant: FormantFilter,
    pub soft_levels: [Level; KIT_HARMONICS],
    pub loud_levels: [Level; KIT_HARMONICS],
    pub formant_bands: [Level; FORMANT_BANDS],
    pub envelopes: [HarmonicEnvelope; KIT_HARMONICS],
}

impl Default for AdditiveKit {
    fn default() -> Self {
        let mut soft_levels = [Level::default(); KIT_HARMONICS];
        soft_levels[0] = Level::clamped(127);
        Self {
            common: KitCommon::default(),
            morf: Morf::default(),
            formant: FormantFilter::default(),
            soft_levels,
            loud_levels: soft_levels,
            formant_bands: [Level::clamped(127); FORMANT_BANDS],
            envelopes: [HarmonicEnvelope::default(); KIT_HARMONICS],
        }
    }
}

fn read_levels<const N: usize>(reader: &mut SyxReader<'_>) -> Result<[Level; N]> {
    let mut levels = [Level::default(); N];
    for level in levels.iter_mut() {
        *level = reader.value()?;
    }
    Ok(levels)
}

fn random_levels<R: Rng, const N: usize>(rng: &mut R) -> [Level; N] {
    std::array::from_fn(|_| Level::random(rng))
}

impl AdditiveKit {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            common: KitCommon {
                morf: rng.random(),
                total_gain: Level::random(rng),
                group: HarmonicGroup::random(rng),
                ks_gain: Bipolar::random(rng),
                velocity_curve: VelocityCurve::random(rng),
                velocity_depth: Level::random(rng),
                balance_curve: VelocityCurve::random(rng),
                balance_depth: Level::random(rng),
                breakpoint: Key::random(rng),
                bright: Bipolar::random(rng),
                dark: Bipolar::random(rng),
                odd_even: Bipolar::random(rng),
            },
            morf: Morf {
                copies: std::array::from_fn(|_| MorfCopy {
                    patch: Level::random(rng),
                    source: MorfSource::random(rng),
                }),
                times: random_levels(rng),
                loop_kind: MorfLoop::random(rng),
            },
            formant: FormantFilter {
                bias: Bipolar::random(rng),
                modulator: FormantModulator::random(rng),
                env_depth: Bipolar::random(rng),
                attack: Level::random(rng),
                decay1_time: Level::random(rng),
                decay1_level: Bipolar::random(rng),
                decay2_time: Level::random(rng),
                decay2_level: Bipolar::random(rng),
                release: Level::random(rng),
                lfo_speed: Level::random(rng),
                lfo_shape: FormantLfoShape::random(rng),
            },
            soft_levels: random_levels(rng),
            loud_levels: random_levels(rng),
            formant_bands: random_levels(rng),
            envelopes: std::array::from_fn(|_| {
                let mut stage = || Stage {
                    rate: Level::random(rng),
                    level: Level::random(rng),
                };
                HarmonicEnvelope {
                    attack: stage(),
                    decay1: stage(),
                    decay2: stage(),
                    release: stage(),
                }
            }),
        }
    }
}

impl SystemExclusiveData for AdditiveKit {
    const UNIT: &'static str = "additive kit";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        let bytes = reader.peek_bytes(KIT_SIZE)?;
        CHECKSUM.check(
            reader.unit(),
            reader.position(),
            &bytes[..1],
            &bytes[1..KIT_SIZE - 1],
            options,
        )?;
        reader.skip(1)?;

        let common = KitCommon {
            morf: reader.flag()?,
            total_gain: reader.value()?,
            group: reader.kind()?,
            ks_gain: reader.value()?,
            velocity_curve: reader.value()?,
            velocity_depth: reader.value()?,
            balance_curve: reader.value()?,
            balance_depth: reader.value()?,
            breakpoint: reader.value()?,
            bright: reader.value()?,
            dark: reader.value()?,
            odd_even: reader.value()?,
        };

        let mut copies = [MorfCopy::default(); 4];
        for copy in copies.iter_mut() {
            *copy = MorfCopy {
                patch: reader.value()?,
                source: reader.value()?,
            };
        }
        let morf = Morf {
            copies,
            times: read_levels(reader)?,
            loop_kind: reader.kind()?,
        };

        let formant = FormantFilter {
            bias: reader.value()?,
            modulator: reader.kind()?,
            env_depth: reader.value()?,
            attack: reader.value()?,
            decay1_time: reader.value()?,
            decay1_level: reader.value()?,
            decay2_time: reader.value()?,
            decay2_level: reader.value()?,
            release: reader.value()?,
            lfo_speed: reader.value()?,
            lfo_shape: reader.kind()?,
        };

        let soft_levels = read_levels(reader)?;
        let loud_levels = read_levels(reader)?;
        let formant_bands = read_levels(reader)?;

        let mut envelopes = [HarmonicEnvelope::default(); KIT_HARMONICS];
        for envelope in envelopes.iter_mut() {
            let mut stages = [Stage::default(); 4];
            for stage in stages.iter_mut() {
                stage.rate = reader.value()?;
                stage.level = reader.value()?;
            }
            let [attack, decay1, decay2, release] = stages;
            *envelope = HarmonicEnvelope {
                attack,
                decay1,
                decay2,
                release,
            };
        }

        // trailing dummy byte
        reader.skip(1)?;

        Ok(Self {
            common,
            morf,
            formant,
            soft_levels,
            loud_levels,
            formant_bands,
            envelopes,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        let mut body = SyxWriter::new(Self::UNIT, KIT_SIZE - 2);

        let c = &self.common;
        body.flag(c.morf);
        body.value(c.total_gain);
        body.kind(c.group);
        body.value(c.ks_gain);
        body.value(c.velocity_curve);
        body.value(c.velocity_depth);
        body.value(c.balance_curve);
        body.value(c.balance_depth);
        body.value(c.breakpoint);
        body.value(c.bright);
        body.value(c.dark);
        body.value(c.odd_even);

        for copy in &self.morf.copies {
            body.value(copy.patch);
            body.value(copy.source);
        }
        for time in &self.morf.times {
            body.value(*time);
        }
        body.kind(self.morf.loop_kind);

        let f = &self.formant;
        body.value(f.bias);
        body.kind(f.modulator);
        body.value(f.env_depth);
        body.value(f.attack);
        body.value(f.decay1_time);
        body.value(f.decay1_level);
        body.value(f.decay2_time);
        body.value(f.decay2_level);
        body.value(f.release);
        body.value(f.lfo_speed);
        body.kind(f.lfo_shape);

        for level in self
            .soft_levels
            .iter()
            .chain(&self.loud_levels)
            .chain(&self.formant_bands)
        {
            body.value(*level);
        }
        for envelope in &self.envelopes {
            for stage in [envelope.attack, envelope.decay1, envelope.decay2, envelope.release] {
                body.value(stage.rate);
                body.value(stage.level);
            }
        }

        let body = body.finish()?;
        CHECKSUM.write(writer, &body);
        writer.extend(&body);
        writer.push(0);
        Ok(())
    }

    fn data_size(&self) -> usize {
        KIT_SIZE
    }
}
