//! DCF: filter with its own six-stage envelope

use ksynth_core::{RangedValue, Result, SyxReader, SyxWriter, WireKind};
use rand::Rng;

use crate::params::{Bipolar, FilterLevel, FilterMode, Level, Resonance, VelocityCurve};

/// Attack, two decays and release; decay levels are signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FilterEnvelope {
    pub attack: Level,
    pub decay1_time: Level,
    pub decay1_level: Bipolar,
    pub decay2_time: Level,
    pub decay2_level: Bipolar,
    pub release: Level,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter {
    /// Bypassed when off
    pub active: bool,
    pub mode: FilterMode,
    pub velocity_curve: VelocityCurve,
    pub resonance: Resonance,
    pub level: FilterLevel,
    pub cutoff: Level,
    pub ks_depth: Bipolar,
    pub velocity_depth: Bipolar,
    pub env_depth: Bipolar,
    pub envelope: FilterEnvelope,
    pub ks_attack: Bipolar,
    pub ks_decay1: Bipolar,
    pub velocity_env: Bipolar,
    pub velocity_attack: Bipolar,
    pub velocity_decay1: Bipolar,
}

impl Default for Filter {
    fn default() -> Self {
        Self {
            active: false,
            mode: FilterMode::default(),
            velocity_curve: VelocityCurve::default(),
            resonance: Resonance::default(),
            level: FilterLevel::default(),
            cutoff: Level::clamped(127),
            ks_depth: Bipolar::default(),
            velocity_depth: Bipolar::default(),
            env_depth: Bipolar::default(),
            envelope: FilterEnvelope::default(),
            ks_attack: Bipolar::default(),
            ks_decay1: Bipolar::default(),
            velocity_env: Bipolar::default(),
            velocity_attack: Bipolar::default(),
            velocity_decay1: Bipolar::default(),
        }
    }
}

impl Filter {
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        Ok(Self {
            active: reader.flag()?,
            mode: reader.kind()?,
            velocity_curve: reader.value()?,
            resonance: reader.value()?,
            level: reader.value()?,
            cutoff: reader.value()?,
            ks_depth: reader.value()?,
            velocity_depth: reader.value()?,
            env_depth: reader.value()?,
            envelope: FilterEnvelope {
                attack: reader.value()?,
                decay1_time: reader.value()?,
                decay1_level: reader.value()?,
                decay2_time: reader.value()?,
                decay2_level: reader.value()?,
                release: reader.value()?,
            },
            ks_attack: reader.value()?,
            ks_decay1: reader.value()?,
            velocity_env: reader.value()?,
            velocity_attack: reader.value()?,
            velocity_decay1: reader.value()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        writer.flag(self.active);
        writer.kind(self.mode);
        writer.value(self.velocity_curve);
        writer.value(self.resonance);
        writer.value(self.level);
        writer.value(self.cutoff);
        writer.value(self.ks_depth);
        writer.value(self.velocity_depth);
        writer.value(self.env_depth);
        let env = &self.envelope;
        writer.value(env.attack);
        writer.value(env.decay1_time);
        writer.value(env.decay1_level);
        writer.value(env.decay2_time);
        writer.value(env.decay2_level);
        writer.value(env.release);
        writer.value(self.ks_attack);
        writer.value(self.ks_decay1);
        writer.value(self.velocity_env);
        writer.value(self.velocity_attack);
        writer.value(self.velocity_decay1);
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            active: rng.random(),
            mode: FilterMode::random(rng),
            velocity_curve: VelocityCurve::random(rng),
            resonance: Resonance::random(rng),
            level: FilterLevel::random(rng),
            cutoff: Level::random(rng),
            ks_depth: Bipolar::random(rng),
            velocity_depth: Bipolar::random(rng),
            env_depth: Bipolar::random(rng),
            envelope: FilterEnvelope {
                attack: Level::random(rng),
                decay1_time: Level::random(rng),
                decay1_level: Bipolar::random(rng),
                decay2_time: Level::random(rng),
                decay2_level: Bipolar::random(rng),
                release: Level::random(rng),
            },
            ks_attack: Bipolar::random(rng),
            ks_decay1: Bipolar::random(rng),
            velocity_env: Bipolar::random(rng),
            velocity_attack: Bipolar::random(rng),
            velocity_decay1: Bipolar::random(rng),
        }
    }
}
