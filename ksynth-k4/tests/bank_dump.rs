//! Whole-bank decoding through the public API

use ksynth_core::{DecodeOptions, PatchName, SyxError, SystemExclusiveData};
use ksynth_k4::{BANK_SIZE, Bank, slot_name};
use rand::SeedableRng;
use rand_pcg::Pcg32;

#[test]
fn test_bank_round_trip() {
    let mut bank = Bank::random(&mut Pcg32::seed_from_u64(0x4B4));
    bank.singles[17].name = PatchName::new("Strings 2").unwrap();

    let bytes = bank.to_bytes().unwrap();
    assert_eq!(bytes.len(), BANK_SIZE);

    let decoded = Bank::from_bytes(&bytes).unwrap();
    assert_eq!(slot_name(17), "B-2");
    assert_eq!(decoded.singles[17].name.to_string(), "Strings 2");
    assert_eq!(decoded, bank);
}

#[test]
fn test_relaxed_options_from_toml() {
    let bank = Bank::default();
    let mut bytes = bank.to_bytes().unwrap();
    // trailing checksum of the last effect patch
    bytes[BANK_SIZE - 1] ^= 0x01;

    assert!(matches!(
        Bank::from_bytes(&bytes),
        Err(SyxError::ChecksumMismatch { unit: "effect", offset, .. }) if offset == BANK_SIZE - 1
    ));

    let options = DecodeOptions::from_toml_str("checksum = \"warn\"").unwrap();
    let recovered = Bank::from_bytes_with(&bytes, &options).unwrap();
    assert_eq!(recovered, bank);
}
