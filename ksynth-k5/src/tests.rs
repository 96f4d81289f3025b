//! Whole-patch tests across the K5 codec

use ksynth_core::checksum::word_sum;
use ksynth_core::interleave::deinterleave;
use ksynth_core::{DecodeOptions, RangedValue, SyxError, SystemExclusiveData};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::*;

fn rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

#[test]
fn test_default_single_layout() {
    let bytes = SinglePatch::default().to_bytes().unwrap();
    assert_eq!(bytes.len(), SINGLE_SIZE);
    assert_eq!(SINGLE_SIZE, 492);
    let sum = word_sum(&bytes[..490]);
    assert_eq!(&bytes[490..], &sum.to_le_bytes());
}

#[test]
fn test_common_block_leads_the_patch() {
    let single = SinglePatch::random(&mut rng(42));
    let bytes = single.to_bytes().unwrap();
    assert_eq!(&bytes[..COMMON_SIZE], &single.common.to_bytes().unwrap()[..]);
}

#[test]
fn test_source_streams_do_not_mix() {
    let mut rng = rng(5);
    let single = SinglePatch::random(&mut rng);
    let bytes = single.to_bytes().unwrap();

    let region = &bytes[COMMON_SIZE..COMMON_SIZE + SOURCE_REGION_SIZE];
    let streams = deinterleave("sources", region, 2).unwrap();
    assert_eq!(streams[0].len(), SOURCE_SIZE);
    assert_eq!(streams[1].len(), SOURCE_SIZE);
    assert_eq!(streams[0], single.sources[0].to_bytes().unwrap());
    assert_eq!(streams[1], single.sources[1].to_bytes().unwrap());

    // source 1 on even offsets, source 2 on odd
    assert_eq!(region[0], streams[0][0]);
    assert_eq!(region[1], streams[1][0]);
    assert_eq!(region[447], streams[1][223]);
}

#[test]
fn test_changing_one_source_leaves_the_other() {
    let mut single = SinglePatch::default();
    let before = single.to_bytes().unwrap();
    single.sources[1].output = Level::new(1).unwrap();
    let after = single.to_bytes().unwrap();

    let changed: Vec<usize> = (0..SINGLE_SIZE - CHECKSUM_SIZE)
        .filter(|&i| before[i] != after[i])
        .collect();
    // output level is the last byte of source 2: 42 + 223 * 2 + 1
    assert_eq!(changed, vec![489]);
}

#[test]
fn test_random_singles_round_trip() {
    let mut rng = rng(0x4B35);
    for _ in 0..20 {
        let single = SinglePatch::random(&mut rng);
        let bytes = single.to_bytes().unwrap();
        let decoded = SinglePatch::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, single);
        assert_eq!(decoded.to_bytes().unwrap(), bytes);
    }
}

#[test]
fn test_source_error_offset_in_interleaved_region() {
    let mut bytes = SinglePatch::default().to_bytes().unwrap();
    // coarse of source 2: stream byte 1, so 42 + 1 * 2 + 1
    bytes[45] = 0x7F;
    let sum = word_sum(&bytes[..490]);
    bytes[490..].copy_from_slice(&sum.to_le_bytes());

    let err = SinglePatch::from_bytes(&bytes).unwrap_err();
    assert_eq!(err.unit(), Some("source"));
    assert_eq!(err.offset(), Some(45));
}

#[test]
fn test_corruption_changes_word_sum() {
    let bytes = SinglePatch::random(&mut rng(9)).to_bytes().unwrap();
    for i in [0, 41, 42, 43, 300, 489] {
        let mut corrupt = bytes.clone();
        corrupt[i] ^= 0x04;
        assert!(matches!(
            SinglePatch::from_bytes(&corrupt),
            Err(SyxError::ChecksumMismatch { unit: "single", offset: 490, .. })
        ));
    }
}

#[test]
fn test_corrupt_checksum_can_be_bypassed() {
    let single = SinglePatch::default();
    let mut bytes = single.to_bytes().unwrap();
    bytes[491] ^= 0x10;
    assert!(SinglePatch::from_bytes(&bytes).is_err());
    let recovered = SinglePatch::from_bytes_with(&bytes, &DecodeOptions::recovery()).unwrap();
    assert_eq!(recovered, single);
}

#[test]
fn test_harmonic_63_quirk_in_patch() {
    let mut bytes = SinglePatch::default().to_bytes().unwrap();
    // last settings byte of source 1: stream offset 18 + 63 + 31 = 112
    let offset = COMMON_SIZE + 112 * 2;
    bytes[offset] |= 0x05;
    let sum = word_sum(&bytes[..490]);
    bytes[490..].copy_from_slice(&sum.to_le_bytes());

    let decoded = SinglePatch::from_bytes(&bytes).unwrap();
    assert_eq!(decoded, SinglePatch::default());
    let again = decoded.to_bytes().unwrap();
    assert_eq!(again[offset] & 0x0F, 0);
    assert_ne!(again, bytes);
}

#[test]
fn test_bank_round_trip() {
    let bank = Bank::random(&mut rng(48));
    let bytes = bank.to_bytes().unwrap();
    assert_eq!(bytes.len(), BANK_SIZE);
    assert_eq!(Bank::from_bytes(&bytes).unwrap(), bank);
}

#[test]
fn test_nybblized_patch() {
    let single = SinglePatch::random(&mut rng(3));
    let bytes = single.to_bytes().unwrap();
    let transport = nybblize(&bytes);
    assert_eq!(transport.len(), 2 * SINGLE_SIZE);
    assert!(transport.iter().all(|&b| b <= 0x0F));
    let restored = denybblize(&transport).unwrap();
    assert_eq!(SinglePatch::from_bytes(&restored).unwrap(), single);
}
