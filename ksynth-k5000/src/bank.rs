//! Banks: sparse single-patch banks behind a tone map, and combi banks

use std::collections::BTreeMap;

use ksynth_core::{
    DecodeOptions, RangedValue, Result, SyxReader, SyxWriter, SystemExclusiveData,
    decode_repeated, encode_repeated,
};
use rand::Rng;

use crate::combi::Combi;
use crate::params::PatchSlot;
use crate::single::SinglePatch;
use crate::{BANK_COMBIS, BANK_PATCHES, COMBI_SIZE, TONE_MAP_SIZE};

/// Bits carried by each tone map byte
const BITS_PER_BYTE: usize = 7;

/// Which of the 128 slots of a bank hold a patch
///
/// On the wire, bit `i % 7` of byte `i / 7` marks slot `i`. The five bits
/// past slot 127 are written as zero and ignored when read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ToneMap(u128);

impl ToneMap {
    pub fn contains(&self, slot: PatchSlot) -> bool {
        self.0 & (1u128 << slot.value()) != 0
    }

    pub fn insert(&mut self, slot: PatchSlot) {
        self.0 |= 1u128 << slot.value();
    }

    pub fn remove(&mut self, slot: PatchSlot) {
        self.0 &= !(1u128 << slot.value());
    }

    /// Number of occupied slots
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Occupied slots in ascending order
    pub fn iter(&self) -> impl Iterator<Item = PatchSlot> + '_ {
        (0..BANK_PATCHES as i32)
            .map(PatchSlot::clamped)
            .filter(|&slot| self.contains(slot))
    }

    pub(crate) fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        let bytes = reader.read_bytes(TONE_MAP_SIZE)?;
        let mut map = 0u128;
        for slot in 0..BANK_PATCHES {
            if bytes[slot / BITS_PER_BYTE] & (1 << (slot % BITS_PER_BYTE)) != 0 {
                map |= 1u128 << slot;
            }
        }
        Ok(Self(map))
    }

    pub(crate) fn write(&self, writer: &mut SyxWriter) {
        let mut bytes = [0u8; TONE_MAP_SIZE];
        for slot in self.iter() {
            let i = slot.value() as usize;
            bytes[i / BITS_PER_BYTE] |= 1 << (i % BITS_PER_BYTE);
        }
        writer.extend(&bytes);
    }
}

impl FromIterator<PatchSlot> for ToneMap {
    fn from_iter<I: IntoIterator<Item = PatchSlot>>(iter: I) -> Self {
        let mut map = Self::default();
        for slot in iter {
            map.insert(slot);
        }
        map
    }
}

/// Bank of single patches, only the occupied slots present
///
/// Patches vary in length, so decoding walks them one after another in
/// slot order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SingleBank {
    pub patches: BTreeMap<PatchSlot, SinglePatch>,
}

impl SingleBank {
    pub fn tone_map(&self) -> ToneMap {
        self.patches.keys().copied().collect()
    }

    pub fn random<R: Rng>(rng: &mut R, count: usize) -> Self {
        let mut patches = BTreeMap::new();
        while patches.len() < count.min(BANK_PATCHES) {
            patches.insert(PatchSlot::random(rng), SinglePatch::random(rng));
        }
        Self { patches }
    }
}

impl SystemExclusiveData for SingleBank {
    const UNIT: &'static str = "single bank";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        let map = ToneMap::read(reader)?;
        tracing::debug!("tone map: {} patches", map.len());
        let mut patches = BTreeMap::new();
        for slot in map.iter() {
            tracing::trace!("slot {} @ {:#06x}", slot, reader.position());
            patches.insert(slot, SinglePatch::decode_nested(reader, options)?);
        }
        Ok(Self { patches })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        self.tone_map().write(writer);
        for patch in self.patches.values() {
            patch.encode_nested(writer)?;
        }
        Ok(())
    }

    fn data_size(&self) -> usize {
        TONE_MAP_SIZE + self.patches.values().map(|p| p.data_size()).sum::<usize>()
    }
}

/// Bank of [`BANK_COMBIS`] combis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombiBank {
    pub combis: Vec<Combi>,
}

impl Default for CombiBank {
    fn default() -> Self {
        Self {
            combis: vec![Combi::default(); BANK_COMBIS],
        }
    }
}

impl CombiBank {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            combis: (0..BANK_COMBIS).map(|_| Combi::random(rng)).collect(),
        }
    }
}

impl SystemExclusiveData for CombiBank {
    const UNIT: &'static str = "combi bank";

    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        Ok(Self {
            combis: decode_repeated(reader, BANK_COMBIS, options)?,
        })
    }

    fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
        encode_repeated(writer, &self.combis, BANK_COMBIS)
    }

    fn data_size(&self) -> usize {
        BANK_COMBIS * COMBI_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(n: i32) -> PatchSlot {
        PatchSlot::new(n).unwrap()
    }

    #[test]
    fn test_tone_map_bits() {
        let map: ToneMap = [0, 6, 7, 127].into_iter().map(slot).collect();
        let mut writer = SyxWriter::new("tone map", TONE_MAP_SIZE);
        map.write(&mut writer);
        let bytes = writer.finish().unwrap();
        assert_eq!(bytes[0], 0b100_0001);
        assert_eq!(bytes[1], 0b000_0001);
        // 127 = 18 * 7 + 1
        assert_eq!(bytes[18], 0b000_0010);
        assert!(bytes.iter().all(|b| b & 0x80 == 0));

        let mut reader = SyxReader::new("tone map", &bytes);
        let read = ToneMap::read(&mut reader).unwrap();
        assert_eq!(read, map);
        assert_eq!(read.len(), 4);
        assert_eq!(read.iter().map(|s| s.value()).collect::<Vec<_>>(), vec![0, 6, 7, 127]);
    }

    #[test]
    fn test_unused_tone_map_bits_are_ignored() {
        let mut bytes = [0u8; TONE_MAP_SIZE];
        bytes[18] = 0b111_1100;
        let mut reader = SyxReader::new("tone map", &bytes);
        assert!(ToneMap::read(&mut reader).unwrap().is_empty());
    }

    #[test]
    fn test_remove() {
        let mut map = ToneMap::default();
        map.insert(slot(40));
        assert!(map.contains(slot(40)));
        map.remove(slot(40));
        assert!(!map.contains(slot(40)));
    }
}
