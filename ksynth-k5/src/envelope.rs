//! Multi-segment envelopes

use ksynth_core::{RangedValue, Result, SyxReader, SyxWriter};
use rand::Rng;

use crate::params::{Bipolar, Depth, Rate};

/// Segments in the harmonic, filter and amplifier envelopes
pub const SEGMENTS: usize = 7;

/// Segments in the pitch envelope
pub const PITCH_SEGMENTS: usize = 6;

/// One (rate, level) step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Segment {
    pub rate: Rate,
    pub level: Depth,
}

/// One pitch envelope step; levels are signed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PitchSegment {
    pub rate: Rate,
    pub level: Bipolar,
}

/// Seven-segment envelope used by the harmonics, filter and amplifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Envelope {
    pub segments: [Segment; SEGMENTS],
}

impl Envelope {
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        let mut segments = [Segment::default(); SEGMENTS];
        for segment in segments.iter_mut() {
            segment.rate = reader.value()?;
            segment.level = reader.value()?;
        }
        Ok(Self { segments })
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        for segment in &self.segments {
            writer.value(segment.rate);
            writer.value(segment.level);
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            segments: std::array::from_fn(|_| Segment {
                rate: Rate::random(rng),
                level: Depth::random(rng),
            }),
        }
    }
}

/// Pitch envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PitchEnvelope {
    pub segments: [PitchSegment; PITCH_SEGMENTS],
}

impl PitchEnvelope {
    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        let mut segments = [PitchSegment::default(); PITCH_SEGMENTS];
        for segment in segments.iter_mut() {
            segment.rate = reader.value()?;
            segment.level = reader.value()?;
        }
        Ok(Self { segments })
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        for segment in &self.segments {
            writer.value(segment.rate);
            writer.value(segment.level);
        }
    }

    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            segments: std::array::from_fn(|_| PitchSegment {
                rate: Rate::random(rng),
                level: Bipolar::random(rng),
            }),
        }
    }
}
