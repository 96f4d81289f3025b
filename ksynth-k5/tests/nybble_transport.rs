//! Single patches carried over MIDI as nybbles

use ksynth_core::{PatchName, SystemExclusiveData};
use ksynth_k5::{SINGLE_SIZE, SinglePatch, denybblize, nybblize};
use rand::SeedableRng;
use rand_pcg::Pcg32;

#[test]
fn test_patch_survives_nybble_transport() {
    let mut single = SinglePatch::random(&mut Pcg32::seed_from_u64(0x4B5));
    single.common.name = PatchName::new("BELLS").unwrap();

    let transport = nybblize(&single.to_bytes().unwrap());
    assert_eq!(transport.len(), 2 * SINGLE_SIZE);
    assert!(transport.iter().all(|&b| b < 0x10));

    let bytes = denybblize(&transport).unwrap();
    let decoded = SinglePatch::from_bytes(&bytes).unwrap();
    assert_eq!(decoded.common.name.to_string(), "BELLS");
    assert_eq!(decoded, single);
}

#[test]
fn test_truncated_transport_is_rejected() {
    let transport = nybblize(&SinglePatch::default().to_bytes().unwrap());
    assert!(denybblize(&transport[..transport.len() - 1]).is_err());
}
