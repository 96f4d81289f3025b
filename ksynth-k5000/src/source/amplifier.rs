//! DCA: amplitude envelope and its modifiers

use ksynth_core::{RangedValue, Result, SyxReader, SyxWriter};
use rand::Rng;

use crate::params::{Bipolar, Level, VelocityCurve};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmpEnvelope {
    pub attack: Level,
    pub decay1_time: Level,
    pub decay1_level: Level,
    pub decay2_time: Level,
    pub decay2_level: Level,
    pub release: Level,
}

/// Envelope modifiers, one set for key scaling and one for velocity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AmpModifiers {
    pub level: Bipolar,
    pub attack: Bipolar,
    pub decay1: Bipolar,
    pub release: Bipolar,
}

impl AmpModifiers {
    fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        Ok(Self {
            level: reader.value()?,
            attack: reader.value()?,
            decay1: reader.value()?,
            release: reader.value()?,
        })
    }

    fn write(&self, writer: &mut SyxWriter) {
        writer.value(self.level);
        writer.value(self.attack);
        writer.value(self.decay1);
        writer.value(self.release);
    }

    fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            level: Bipolar::random(rng),
            attack: Bipolar::random(rng),
            decay1: Bipolar::random(rng),
            release: Bipolar::random(rng),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Amplifier {
    pub velocity_curve: VelocityCurve,
    pub envelope: AmpEnvelope,
    pub key_scaling: AmpModifiers,
    pub velocity: AmpModifiers,
}

impl Amplifier {
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        Ok(Self {
            velocity_curve: reader.value()?,
            envelope: AmpEnvelope {
                attack: reader.value()?,
                decay1_time: reader.value()?,
                decay1_level: reader.value()?,
                decay2_time: reader.value()?,
                decay2_level: reader.value()?,
                release: reader.value()?,
            },
            key_scaling: AmpModifiers::read(reader)?,
            velocity: AmpModifiers::read(reader)?,
        })
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        writer.value(self.velocity_curve);
        let env = &self.envelope;
        writer.value(env.attack);
        writer.value(env.decay1_time);
        writer.value(env.decay1_level);
        writer.value(env.decay2_time);
        writer.value(env.decay2_level);
        writer.value(env.release);
        self.key_scaling.write(writer);
        self.velocity.write(writer);
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            velocity_curve: VelocityCurve::random(rng),
            envelope: AmpEnvelope {
                attack: Level::random(rng),
                decay1_time: Level::random(rng),
                decay1_level: Level::random(rng),
                decay2_time: Level::random(rng),
                decay2_level: Level::random(rng),
                release: Level::random(rng),
            },
            key_scaling: AmpModifiers::random(rng),
            velocity: AmpModifiers::random(rng),
        }
    }
}
