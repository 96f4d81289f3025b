//! Effect patch: effect algorithm plus per-submix routing

use ksynth_core::{
    DecodeOptions, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData,
};
use rand::Rng;

use crate::params::{EffectParam, EffectParam3, EffectType, Level, Pan};
use crate::{EFFECT_SIZE, unit};

const RESERVED: usize = 6;

/// Routing of one submix channel into the effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SubmixSettings {
    pub pan: Pan,
    pub send1: Level,
    pub send2: Level,
}

/// K4 effect patch
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EffectPatch {
    pub effect_type: EffectType,
    pub param1: EffectParam,
    pub param2: EffectParam,
    pub param3: EffectParam3,
    /// Submixes A to H
    pub submixes: [SubmixSettings; 8],
}

impl EffectPatch {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            effect_type: EffectType::random(rng),
            param1: EffectParam::random(rng),
            param2: EffectParam::random(rng),
            param3: EffectParam3::random(rng),
            submixes: std::array::from_fn(|_| SubmixSettings {
                pan: Pan::random(rng),
                send1: Level::random(rng),
                send2: Level::random(rng),
            }),
        }
    }
}

impl SystemExclusiveData for EffectPatch {
    const UNIT: &'static str = "effect";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        unit::CHECKSUM.verify_trailing(reader, EFFECT_SIZE, options)?;
        let effect_type = reader.value()?;
        let param1 = reader.value()?;
        let param2 = reader.value()?;
        let param3 = reader.value()?;
        reader.skip(RESERVED)?;
        let mut submixes = [SubmixSettings::default(); 8];
        for submix in submixes.iter_mut() {
            *submix = SubmixSettings {
                pan: reader.value()?,
                send1: reader.value()?,
                send2: reader.value()?,
            };
        }
        reader.skip(1)?;
        Ok(Self {
            effect_type,
            param1,
            param2,
            param3,
            submixes,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        let start = writer.len();
        writer.value(self.effect_type);
        writer.value(self.param1);
        writer.value(self.param2);
        writer.value(self.param3);
        unit::reserved(writer, RESERVED);
        for submix in &self.submixes {
            writer.value(submix.pan);
            writer.value(submix.send1);
            writer.value(submix.send2);
        }
        unit::CHECKSUM.append(writer, start);
        Ok(())
    }

    fn data_size(&self) -> usize {
        EFFECT_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_bytes_are_zero() {
        let effect = EffectPatch {
            param1: EffectParam::new(-7).unwrap(),
            param2: EffectParam::new(7).unwrap(),
            ..Default::default()
        };
        let bytes = effect.to_bytes().unwrap();
        assert_eq!(bytes.len(), EFFECT_SIZE);
        assert_eq!(&bytes[1..3], &[0, 14]);
        assert!(bytes[4..10].iter().all(|&b| b == 0));
        // default pan sits at the centre
        assert_eq!(bytes[10], 7);
    }

    #[test]
    fn test_reserved_bytes_are_ignored() {
        let mut bytes = EffectPatch::default().to_bytes().unwrap();
        bytes[5] = 0x33;
        let sum = ksynth_core::checksum::seven_bit_sum(&bytes[..EFFECT_SIZE - 1]);
        bytes[EFFECT_SIZE - 1] = sum;
        assert_eq!(EffectPatch::from_bytes(&bytes).unwrap(), EffectPatch::default());
    }
}
