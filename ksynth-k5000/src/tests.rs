//! Whole-patch tests across the K5000 codec

use ksynth_core::checksum::seven_bit_sum;
use ksynth_core::{
    ByteValue, ChecksumPolicy, DecodeOptions, RangeError, RangedValue, SyxError, SystemExclusiveData,
};
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::*;

fn rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

/// Rewrite the leading patch checksum after editing a PCM-only patch
fn fix_checksum(bytes: &mut [u8]) {
    bytes[0] = seven_bit_sum(&bytes[1..]);
}

fn mixed_patch() -> SinglePatch {
    let mut kit = AdditiveKit::default();
    kit.soft_levels[1] = Level::new(90).unwrap();
    SinglePatch {
        common: Common::default(),
        sources: vec![
            Source::additive(kit),
            Source::pcm(PcmWave::new(511).unwrap()),
        ],
    }
}

// =============================================================================
// Layout
// =============================================================================

#[test]
fn test_default_single_layout() {
    let bytes = SinglePatch::default().to_bytes().unwrap();
    assert_eq!(bytes.len(), 1 + COMMON_SIZE + 2 * SOURCE_SIZE);
    assert_eq!(bytes[0], seven_bit_sum(&bytes[1..]));
    // count, then one playing bit per possible source
    assert_eq!(bytes[11], 2);
    assert_eq!(bytes[12], 0b11_1111);
    assert_eq!(SinglePatch::from_bytes(&bytes).unwrap(), SinglePatch::default());
}

#[test]
fn test_muted_source_clears_its_bit() {
    let mut single = SinglePatch::default();
    single.common.source_muted[1] = true;
    single.common.source_muted[5] = true;
    let bytes = single.to_bytes().unwrap();
    assert_eq!(bytes[12], 0b01_1101);
    assert_eq!(SinglePatch::from_bytes(&bytes).unwrap(), single);
}

#[test]
fn test_switch_nybbles() {
    let mut single = SinglePatch::default();
    single.common.switch1 = SwitchAssign::new(9).unwrap();
    single.common.switch2 = SwitchAssign::new(3).unwrap();
    let bytes = single.to_bytes().unwrap();
    assert_eq!(bytes[COMMON_SIZE], 0x93);
}

// =============================================================================
// Additive branching
// =============================================================================

#[test]
fn test_additive_source_consumes_kit() {
    let single = mixed_patch();
    let bytes = single.to_bytes().unwrap();
    assert_eq!(bytes.len(), 1 + COMMON_SIZE + SOURCE_SIZE + KIT_SIZE + SOURCE_SIZE);

    // the kit sits right after the first source body
    let kit_start = 1 + COMMON_SIZE + SOURCE_SIZE;
    let kit = &bytes[kit_start..kit_start + KIT_SIZE];
    assert_eq!(kit[0], seven_bit_sum(&kit[1..KIT_SIZE - 1]));
    assert_eq!(kit[38], 90);

    // the second source body follows the kit: wave 511 = 3 << 7 | 127
    let second = kit_start + KIT_SIZE;
    assert_eq!(&bytes[second + 16..second + 18], &[3, 127]);

    let decoded = SinglePatch::from_bytes(&bytes).unwrap();
    assert!(decoded.sources[0].is_additive());
    assert!(!decoded.sources[1].is_additive());
    assert_eq!(decoded.additive_count(), 1);
    assert_eq!(decoded, single);
}

#[test]
fn test_pcm_source_consumes_no_kit() {
    let source = Source::pcm(PcmWave::new(12).unwrap());
    let mut bytes = source.to_bytes().unwrap();
    assert_eq!(bytes.len(), SOURCE_SIZE);
    bytes.extend(AdditiveKit::default().to_bytes().unwrap());
    assert_eq!(
        Source::from_bytes(&bytes),
        Err(SyxError::StructuralLength {
            unit: "source",
            expected: SOURCE_SIZE,
            actual: SOURCE_SIZE + KIT_SIZE,
        })
    );
}

#[test]
fn test_missing_kit_is_eof() {
    let bytes = mixed_patch().to_bytes().unwrap();
    let truncated = &bytes[..1 + COMMON_SIZE + SOURCE_SIZE + 100];
    assert!(matches!(
        SinglePatch::from_bytes(truncated),
        Err(SyxError::UnexpectedEof { unit: "additive kit", .. })
    ));
}

#[test]
fn test_patch_checksum_skips_kits() {
    let single = mixed_patch();
    let before = single.to_bytes().unwrap();

    let mut edited = single.clone();
    if let Wave::Additive(kit) = &mut edited.sources[0].wave {
        kit.loud_levels[10] = Level::new(77).unwrap();
    }
    let after = edited.to_bytes().unwrap();

    assert_eq!(before[0], after[0]);
    let kit_start = 1 + COMMON_SIZE + SOURCE_SIZE;
    assert_ne!(before[kit_start], after[kit_start]);
}

// =============================================================================
// Domains
// =============================================================================

#[test]
fn test_fine_tune_wire_zero_is_out_of_range() {
    assert_eq!(
        Bipolar::from_wire(0),
        Err(RangeError {
            name: "Bipolar",
            value: -64,
            min: -63,
            max: 63,
        })
    );

    let mut bytes = SinglePatch::default().to_bytes().unwrap();
    // fine tune of source 1
    let offset = 1 + COMMON_SIZE + 19;
    bytes[offset] = 0;
    fix_checksum(&mut bytes);
    match SinglePatch::from_bytes(&bytes) {
        Err(SyxError::Value {
            unit: "source",
            offset: at,
            source,
        }) => {
            assert_eq!(at, offset);
            assert_eq!(source.value, -64);
        }
        other => panic!("expected a range error, got {other:?}"),
    }
}

#[test]
fn test_fine_tune_bounds_round_trip() {
    for fine in [-63, 0, 63] {
        let mut single = SinglePatch::default();
        single.sources[0].fine = Bipolar::new(fine).unwrap();
        let bytes = single.to_bytes().unwrap();
        assert_eq!(i32::from(bytes[1 + COMMON_SIZE + 19]), fine + 64);
        assert_eq!(SinglePatch::from_bytes(&bytes).unwrap(), single);
    }
}

// =============================================================================
// Source count
// =============================================================================

#[test]
fn test_source_count_is_validated_before_sources() {
    for count in [0, 1, 7, 0x7F] {
        let mut bytes = SinglePatch::default().to_bytes().unwrap();
        bytes[11] = count;
        fix_checksum(&mut bytes);
        assert_eq!(
            SinglePatch::from_bytes(&bytes),
            Err(SyxError::SourceCount {
                unit: "single patch",
                offset: 11,
                count,
                min: 2,
                max: 6,
            })
        );
    }
}

#[test]
fn test_count_larger_than_buffer_is_eof() {
    let mut bytes = SinglePatch::default().to_bytes().unwrap();
    bytes[11] = 3;
    assert!(matches!(
        SinglePatch::from_bytes(&bytes),
        Err(SyxError::UnexpectedEof { .. })
    ));
}

#[test]
fn test_encoding_needs_two_to_six_sources() {
    let mut single = SinglePatch::default();
    single.sources.truncate(1);
    let err = single.to_bytes().unwrap_err();
    assert_eq!(
        err,
        SyxError::SourceLimit {
            unit: "single patch",
            count: 1,
            min: 2,
            max: 6,
        }
    );
    assert_eq!(err.offset(), None);

    single.sources = vec![Source::default(); 300];
    assert!(matches!(
        single.to_bytes(),
        Err(SyxError::SourceLimit { count: 300, .. })
    ));

    single.sources = vec![Source::default(); MAX_SOURCES];
    let bytes = single.to_bytes().unwrap();
    assert_eq!(bytes[11], 6);
    assert_eq!(SinglePatch::from_bytes(&bytes).unwrap(), single);
}

#[test]
fn test_bad_source_list_in_bank_has_no_offset() {
    let mut short = SinglePatch::default();
    short.sources.truncate(1);
    let mut bank = SingleBank::default();
    bank.patches.insert(PatchSlot::new(0).unwrap(), SinglePatch::default());
    bank.patches.insert(PatchSlot::new(9).unwrap(), short);
    assert!(matches!(
        bank.to_bytes(),
        Err(SyxError::SourceLimit { unit: "single patch", count: 1, .. })
    ));
}

// =============================================================================
// Checksums
// =============================================================================

#[test]
fn test_corrupt_common_byte_is_detected() {
    let mut bytes = SinglePatch::default().to_bytes().unwrap();
    // volume 115 -> 116 stays in range
    bytes[9] += 1;
    assert!(matches!(
        SinglePatch::from_bytes(&bytes),
        Err(SyxError::ChecksumMismatch { unit: "single patch", offset: 0, .. })
    ));

    let recovered = SinglePatch::from_bytes_with(&bytes, &DecodeOptions::recovery()).unwrap();
    assert_eq!(recovered.common.volume.value(), 116);
    let ignore = DecodeOptions {
        checksum: ChecksumPolicy::Ignore,
    };
    assert!(SinglePatch::from_bytes_with(&bytes, &ignore).is_ok());
}

#[test]
fn test_corrupt_kit_is_reported_at_its_checksum() {
    let mut bytes = mixed_patch().to_bytes().unwrap();
    let kit_start = 1 + COMMON_SIZE + SOURCE_SIZE;
    bytes[kit_start + 200] ^= 0x01;
    assert!(matches!(
        SinglePatch::from_bytes(&bytes),
        Err(SyxError::ChecksumMismatch { unit: "additive kit", offset, .. }) if offset == kit_start
    ));
}

// =============================================================================
// Randomized round trips
// =============================================================================

#[test]
fn test_random_singles_round_trip() {
    let mut rng = rng(0x5000);
    for _ in 0..20 {
        let single = SinglePatch::random(&mut rng);
        let bytes = single.to_bytes().unwrap();
        assert_eq!(bytes.len(), single.data_size());
        let decoded = SinglePatch::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, single);
        assert_eq!(decoded.to_bytes().unwrap(), bytes);
    }
}

#[test]
fn test_random_combis_round_trip() {
    let mut rng = rng(0xC0);
    for _ in 0..20 {
        let combi = Combi::random(&mut rng);
        let bytes = combi.to_bytes().unwrap();
        assert_eq!(Combi::from_bytes(&bytes).unwrap(), combi);
    }
}

// =============================================================================
// Banks
// =============================================================================

#[test]
fn test_single_bank_round_trip() {
    let mut rng = rng(0xBA);
    let bank = SingleBank::random(&mut rng, 5);
    assert_eq!(bank.tone_map().len(), 5);
    let bytes = bank.to_bytes().unwrap();
    assert_eq!(bytes.len(), bank.data_size());
    assert_eq!(SingleBank::from_bytes(&bytes).unwrap(), bank);
}

#[test]
fn test_single_bank_walks_variable_patches() {
    let mut bank = SingleBank::default();
    bank.patches.insert(PatchSlot::new(3).unwrap(), mixed_patch());
    bank.patches.insert(PatchSlot::new(100).unwrap(), SinglePatch::default());
    let bytes = bank.to_bytes().unwrap();

    let first = mixed_patch().data_size();
    assert_eq!(bytes.len(), TONE_MAP_SIZE + first + SinglePatch::default().data_size());
    // 100 = 14 * 7 + 2
    assert_eq!(bytes[0], 0b000_1000);
    assert_eq!(bytes[14], 0b000_0100);

    // errors in the second patch point into the whole bank
    let mut corrupt = bytes.clone();
    let second = TONE_MAP_SIZE + first;
    corrupt[second + 9] += 1;
    assert!(matches!(
        SingleBank::from_bytes(&corrupt),
        Err(SyxError::ChecksumMismatch { unit: "single patch", offset, .. }) if offset == second
    ));
}

#[test]
fn test_empty_single_bank() {
    let bytes = SingleBank::default().to_bytes().unwrap();
    assert_eq!(bytes, vec![0; TONE_MAP_SIZE]);
    assert!(SingleBank::from_bytes(&bytes).unwrap().patches.is_empty());
}

#[test]
fn test_combi_bank_round_trip() {
    let bank = CombiBank::random(&mut rng(64));
    let bytes = bank.to_bytes().unwrap();
    assert_eq!(bytes.len(), BANK_COMBIS * COMBI_SIZE);
    assert_eq!(CombiBank::from_bytes(&bytes).unwrap(), bank);
}
