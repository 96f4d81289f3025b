//! Bank of single patches

use ksynth_core::{
    DecodeOptions, Result, SyxReader, SyxWriter, SystemExclusiveData, decode_repeated,
    encode_repeated,
};
use rand::Rng;

use crate::single::SinglePatch;
use crate::{BANK_SINGLES, BANK_SIZE};

/// K5 bank of [`BANK_SINGLES`] single patches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    pub singles: Vec<SinglePatch>,
}

impl Default for Bank {
    fn default() -> Self {
        Self {
            singles: vec![SinglePatch::default(); BANK_SINGLES],
        }
    }
}

impl Bank {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            singles: (0..BANK_SINGLES).map(|_| SinglePatch::random(rng)).collect(),
        }
    }
}

impl SystemExclusiveData for Bank {
    const UNIT: &'static str = "bank";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        Ok(Self {
            singles: decode_repeated(reader, BANK_SINGLES, options)?,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        encode_repeated(writer, &self.singles, BANK_SINGLES)
    }

    fn data_size(&self) -> usize {
        BANK_SIZE
    }
}
