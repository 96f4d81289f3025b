//! Per-source LFO

use ksynth_core::{ByteValue, RangedValue, Result, SyxReader, SyxWriter, WireKind};
use rand::Rng;

use crate::params::{Bipolar, Level, LfoDepth, LfoWaveform};

/// Depth of one LFO destination plus its key scaling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LfoTarget<D> {
    pub depth: D,
    pub key_scaling: Bipolar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lfo {
    pub waveform: LfoWaveform,
    pub speed: Level,
    pub delay: Level,
    pub fade_in_time: Level,
    pub fade_in_speed: Level,
    pub pitch: LfoTarget<LfoDepth>,
    pub cutoff: LfoTarget<Level>,
    pub amplitude: LfoTarget<Level>,
}

impl<D: ByteValue> LfoTarget<D> {
    fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        Ok(Self {
            depth: reader.value()?,
            key_scaling: reader.value()?,
        })
    }

    fn write(&self, writer: &mut SyxWriter) {
        writer.value(self.depth);
        writer.value(self.key_scaling);
    }

    fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            depth: D::random(rng),
            key_scaling: Bipolar::random(rng),
        }
    }
}

impl Lfo {
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        Ok(Self {
            waveform: reader.kind()?,
            speed: reader.value()?,
            delay: reader.value()?,
            fade_in_time: reader.value()?,
            fade_in_speed: reader.value()?,
            pitch: LfoTarget::read(reader)?,
            cutoff: LfoTarget::read(reader)?,
            amplitude: LfoTarget::read(reader)?,
        })
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        writer.kind(self.waveform);
        writer.value(self.speed);
        writer.value(self.delay);
        writer.value(self.fade_in_time);
        writer.value(self.fade_in_speed);
        self.pitch.write(writer);
        self.cutoff.write(writer);
        self.amplitude.write(writer);
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            waveform: LfoWaveform::random(rng),
            speed: Level::random(rng),
            delay: Level::random(rng),
            fade_in_time: Level::random(rng),
            fade_in_speed: Level::random(rng),
            pitch: LfoTarget::random(rng),
            cutoff: LfoTarget::random(rng),
            amplitude: LfoTarget::random(rng),
        }
    }
}
