//! DCF settings, one per source pair

use ksynth_core::bits::{bit_range, is_bit_set, with_bit};
use ksynth_core::{ByteValue, DecodeOptions, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData};
use rand::Rng;

use super::envelope::{Envelope, Modulation, TimeModulation};
use crate::FILTER_SIZE;
use crate::params::{Depth, Level, Resonance};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Filter {
    pub cutoff: Level,
    pub resonance: Resonance,
    /// LFO modulates the cutoff
    pub lfo: bool,
    pub cutoff_mod: Modulation,
    pub env_depth: Depth,
    pub env_velocity_depth: Depth,
    pub envelope: Envelope,
    pub time_mod: TimeModulation,
}

impl Filter {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            cutoff: Level::random(rng),
            resonance: Resonance::random(rng),
            lfo: rng.random(),
            cutoff_mod: Modulation::random(rng),
            env_depth: Depth::random(rng),
            env_velocity_depth: Depth::random(rng),
            envelope: Envelope::random(rng),
            time_mod: TimeModulation::random(rng),
        }
    }
}

impl SystemExclusiveData for Filter {
    const UNIT: &'static str = "filter";

    fn decode(reader: &mut SyxReader<'_>, _options: &DecodeOptions) -> Result<Self> {
        let cutoff = reader.value()?;
        let b = reader.read_u8()?;
        Ok(Self {
            cutoff,
            resonance: reader.decode(bit_range(b, 0, 3))?,
            lfo: is_bit_set(b, 3),
            cutoff_mod: Modulation::read(reader)?,
            env_depth: reader.value()?,
            env_velocity_depth: reader.value()?,
            envelope: Envelope::read(reader)?,
            time_mod: TimeModulation::read(reader)?,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        writer.value(self.cutoff);
        writer.push(with_bit(self.resonance.to_wire(), 3, self.lfo));
        self.cutoff_mod.write(writer);
        writer.value(self.env_depth);
        writer.value(self.env_velocity_depth);
        self.envelope.write(writer);
        self.time_mod.write(writer);
        Ok(())
    }

    fn data_size(&self) -> usize {
        FILTER_SIZE
    }
}
