//! Single patch: common block, two interleaved sources, word checksum

use ksynth_core::checksum::ChecksumKind;
use ksynth_core::interleave::{decode_interleaved, encode_interleaved};
use ksynth_core::{DecodeOptions, Result, SyxReader, SyxWriter, SystemExclusiveData};
use rand::Rng;

use crate::common::Common;
use crate::source::Source;
use crate::{CHECKSUM_SIZE, SINGLE_SIZE, SOURCE_SIZE};

/// 16-bit sum trailing the patch, low byte first
const CHECKSUM: ChecksumKind = ChecksumKind::WordSum;

const _: () = assert!(CHECKSUM.width() == CHECKSUM_SIZE);

/// K5 single patch
///
/// The two sources are stored byte-interleaved: source 1 on the even
/// offsets of the source region, source 2 on the odd ones.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SinglePatch {
    pub common: Common,
    pub sources: [Source; 2],
}

impl SinglePatch {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            common: Common::random(rng),
            sources: [Source::random(rng), Source::random(rng)],
        }
    }
}

impl SystemExclusiveData for SinglePatch {
    const UNIT: &'static str = "single";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        CHECKSUM.verify_trailing(reader, SINGLE_SIZE, options)?;

        let common = Common::decode_nested(reader, options)?;
        tracing::trace!("interleaved sources @ {:#06x}", reader.position());
        let sources = decode_interleaved(reader, SOURCE_SIZE, options)?;
        reader.skip(CHECKSUM_SIZE)?;
        Ok(Self { common, sources })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        let start = writer.len();
        self.common.encode_nested(writer)?;
        encode_interleaved(writer, &self.sources)?;
        CHECKSUM.append(writer, start);
        Ok(())
    }

    fn data_size(&self) -> usize {
        SINGLE_SIZE
    }
}
