//! Single patch: variable source count, each source optionally additive
//!
//! ```text
//! 0    checksum
//! 1    common (33)
//! 34   source 1 (86) [+ additive kit (806)]
//! ...  source 2..N
//! ```
//!
//! The checksum covers the common block and the source bodies. Kits are left
//! out; they carry their own.

use ksynth_core::checksum::ChecksumKind;
use ksynth_core::{DecodeOptions, Result, SyxError, SyxReader, SyxWriter, SystemExclusiveData};
use rand::Rng;

use crate::common::Common;
use crate::source::Source;
use crate::{COMMON_SIZE, MAX_SOURCES, MIN_SOURCES, SOURCE_SIZE};

const CHECKSUM: ChecksumKind = ChecksumKind::SevenBitSum;

/// Offset of the source count byte from the start of the patch
const SOURCE_COUNT_OFFSET: usize = 11;

/// K5000 single patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinglePatch {
    pub common: Common,
    /// Between two and six sources
    pub sources: Vec<Source>,
}

impl Default for SinglePatch {
    fn default() -> Self {
        Self {
            common: Common::default(),
            sources: vec![Source::default(), Source::default()],
        }
    }
}

fn check_count(count: usize) -> Result<u8> {
    match u8::try_from(count) {
        Ok(n) if (MIN_SOURCES..=MAX_SOURCES).contains(&count) => Ok(n),
        _ => Err(SyxError::SourceLimit {
            unit: SinglePatch::UNIT,
            count,
            min: MIN_SOURCES,
            max: MAX_SOURCES,
        }),
    }
}

impl SinglePatch {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let count = rng.random_range(MIN_SOURCES..=MAX_SOURCES);
        Self {
            common: Common::random(rng),
            sources: (0..count).map(|_| Source::random(rng)).collect(),
        }
    }

    /// Number of sources playing an additive kit
    pub fn additive_count(&self) -> usize {
        self.sources.iter().filter(|s| s.is_additive()).count()
    }
}

impl SystemExclusiveData for SinglePatch {
    const UNIT: &'static str = "single patch";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        let checksum_offset = reader.position();
        let stored = reader.read_u8()?;

        let mut covered = reader.peek_bytes(COMMON_SIZE)?.to_vec();
        let (common, count) = reader.scoped("common", Common::read)?;
        if !(MIN_SOURCES..=MAX_SOURCES).contains(&usize::from(count)) {
            return Err(SyxError::SourceCount {
                unit: Self::UNIT,
                offset: checksum_offset + SOURCE_COUNT_OFFSET,
                count,
                min: MIN_SOURCES as u8,
                max: MAX_SOURCES as u8,
            });
        }

        let mut sources = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            covered.extend_from_slice(reader.peek_bytes(SOURCE_SIZE)?);
            sources.push(Source::decode_nested(reader, options)?);
        }
        let patch = Self { common, sources };
        tracing::debug!(
            "{} sources, {} additive",
            patch.sources.len(),
            patch.additive_count()
        );

        CHECKSUM.check(Self::UNIT, checksum_offset, &[stored], &covered, options)?;

        Ok(patch)
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        let count = check_count(self.sources.len())?;

        let mut covered = SyxWriter::new(
            Self::UNIT,
            COMMON_SIZE + SOURCE_SIZE * self.sources.len(),
        );
        self.common.write(&mut covered, count);
        for source in &self.sources {
            source.encode_body(&mut covered);
        }
        let covered = covered.finish()?;
        CHECKSUM.write(writer, &covered);

        let (common, bodies) = covered.split_at(COMMON_SIZE);
        writer.extend(common);
        for (source, body) in self.sources.iter().zip(bodies.chunks(SOURCE_SIZE)) {
            writer.extend(body);
            if let Some(kit) = source.wave.kit() {
                kit.encode_nested(writer)?;
            }
        }
        Ok(())
    }

    fn data_size(&self) -> usize {
        1 + COMMON_SIZE + self.sources.iter().map(|s| s.data_size()).sum::<usize>()
    }
}
