//! Envelope and modulation rows shared by sources and filters

use ksynth_core::{RangedValue, Result, SyxReader, SyxWriter};
use rand::Rng;

use crate::params::{Depth, Level};

/// ADSR envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Envelope {
    pub attack: Level,
    pub decay: Level,
    pub sustain: Level,
    pub release: Level,
}

impl Envelope {
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        Ok(Self {
            attack: reader.value()?,
            decay: reader.value()?,
            sustain: reader.value()?,
            release: reader.value()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        writer.value(self.attack);
        writer.value(self.decay);
        writer.value(self.sustain);
        writer.value(self.release);
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            attack: Level::random(rng),
            decay: Level::random(rng),
            sustain: Level::random(rng),
            release: Level::random(rng),
        }
    }
}

/// Level or cutoff modulation by velocity, pressure and key scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modulation {
    pub velocity: Depth,
    pub pressure: Depth,
    pub key_scaling: Depth,
}

impl Modulation {
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        Ok(Self {
            velocity: reader.value()?,
            pressure: reader.value()?,
            key_scaling: reader.value()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        writer.value(self.velocity);
        writer.value(self.pressure);
        writer.value(self.key_scaling);
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            velocity: Depth::random(rng),
            pressure: Depth::random(rng),
            key_scaling: Depth::random(rng),
        }
    }
}

/// Envelope time modulation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeModulation {
    pub on_velocity: Depth,
    pub off_velocity: Depth,
    pub key_scaling: Depth,
}

impl TimeModulation {
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        Ok(Self {
            on_velocity: reader.value()?,
            off_velocity: reader.value()?,
            key_scaling: reader.value()?,
        })
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        writer.value(self.on_velocity);
        writer.value(self.off_velocity);
        writer.value(self.key_scaling);
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            on_velocity: Depth::random(rng),
            off_velocity: Depth::random(rng),
            key_scaling: Depth::random(rng),
        }
    }
}
