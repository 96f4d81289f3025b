//! Full memory dump: singles, multis, drum kit and effects

use ksynth_core::{
    DecodeOptions, Result, SyxReader, SyxWriter, SystemExclusiveData, decode_repeated,
    encode_repeated,
};
use rand::Rng;

use crate::drum::DrumKit;
use crate::effect::EffectPatch;
use crate::multi::MultiPatch;
use crate::single::SinglePatch;
use crate::{BANK_EFFECTS, BANK_MULTIS, BANK_SINGLES, BANK_SIZE};

/// Patches per letter group on the front panel
const GROUP_SIZE: usize = 16;

/// Front-panel name of a single or multi slot, `A-1` to `D-16`
pub fn slot_name(index: usize) -> String {
    let group = (b'A' + (index / GROUP_SIZE % 4) as u8) as char;
    format!("{}-{}", group, index % GROUP_SIZE + 1)
}

/// K4 bank
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    pub singles: Vec<SinglePatch>,
    pub multis: Vec<MultiPatch>,
    pub drum: DrumKit,
    pub effects: Vec<EffectPatch>,
}

impl Default for Bank {
    fn default() -> Self {
        Self {
            singles: vec![SinglePatch::default(); BANK_SINGLES],
            multis: vec![MultiPatch::default(); BANK_MULTIS],
            drum: DrumKit::default(),
            effects: vec![EffectPatch::default(); BANK_EFFECTS],
        }
    }
}

impl Bank {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            singles: (0..BANK_SINGLES).map(|_| SinglePatch::random(rng)).collect(),
            multis: (0..BANK_MULTIS).map(|_| MultiPatch::random(rng)).collect(),
            drum: DrumKit::random(rng),
            effects: (0..BANK_EFFECTS).map(|_| EffectPatch::random(rng)).collect(),
        }
    }
}

impl SystemExclusiveData for Bank {
    const UNIT: &'static str = "bank";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        let singles = decode_repeated(reader, BANK_SINGLES, options)?;
        let multis = decode_repeated(reader, BANK_MULTIS, options)?;
        let drum = DrumKit::decode_nested(reader, options)?;
        let effects = decode_repeated(reader, BANK_EFFECTS, options)?;
        tracing::debug!(
            "bank: {} singles, {} multis, {} effects",
            singles.len(),
            multis.len(),
            effects.len()
        );
        Ok(Self {
            singles,
            multis,
            drum,
            effects,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        encode_repeated(writer, &self.singles, BANK_SINGLES)?;
        encode_repeated(writer, &self.multis, BANK_MULTIS)?;
        self.drum.encode_nested(writer)?;
        encode_repeated(writer, &self.effects, BANK_EFFECTS)
    }

    fn data_size(&self) -> usize {
        BANK_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_names() {
        assert_eq!(slot_name(0), "A-1");
        assert_eq!(slot_name(15), "A-16");
        assert_eq!(slot_name(16), "B-1");
        assert_eq!(slot_name(63), "D-16");
    }
}
