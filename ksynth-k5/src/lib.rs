//! ksynth-k5: K5 patch data codec
//!
//! A K5 single patch is a 42-byte common block, two 224-byte additive
//! sources stored byte-interleaved, and a two-byte checksum:
//!
//! ```text
//! 0    common (42)
//! 42   s1[0] s2[0] s1[1] s2[1] ... s1[223] s2[223]
//! 490  checksum low, checksum high
//! ```
//!
//! The checksum is `0x5A3C` minus the sum of the first 490 bytes taken as
//! little-endian 16-bit words.
//!
//! Dumps travelling over MIDI are nybblized; see [`nybblize`] and
//! [`denybblize`].

mod bank;
mod common;
mod envelope;
mod harmonic;
mod nybble;
mod params;
mod single;
mod source;

pub use bank::Bank;
pub use common::{Common, Lfo};
pub use envelope::{Envelope, PITCH_SEGMENTS, PitchEnvelope, PitchSegment, SEGMENTS, Segment};
pub use harmonic::{HARMONIC_ENVELOPES, Harmonic, HarmonicEnvelope, SETTINGS_SIZE};
pub use nybble::{Nybble, denybblize, nybblize};
pub use params::*;
pub use single::SinglePatch;
pub use source::{Amplifier, Filter, HarmonicModulation, KeyScaling, Pitch, Source};

/// Common block size
pub const COMMON_SIZE: usize = 42;

/// Bytes per source
pub const SOURCE_SIZE: usize = 224;

/// Interleaved source region size
pub const SOURCE_REGION_SIZE: usize = 2 * SOURCE_SIZE;

/// Checksum width
pub const CHECKSUM_SIZE: usize = 2;

/// Single patch size
pub const SINGLE_SIZE: usize = COMMON_SIZE + SOURCE_REGION_SIZE + CHECKSUM_SIZE;

/// Harmonics per source
pub const HARMONIC_COUNT: usize = 63;

/// Formant filter bands
pub const FORMANT_BANDS: usize = 11;

/// Single patches in a bank
pub const BANK_SINGLES: usize = 48;

/// Whole bank size
pub const BANK_SIZE: usize = BANK_SINGLES * SINGLE_SIZE;

#[cfg(test)]
mod tests;
