//! ksynth-k5000: K5000 patch data codec
//!
//! A K5000 single patch has a variable shape. The common block declares how
//! many sources follow (two to six), and each source whose oscillator plays
//! wave 512 is followed by an additive kit:
//!
//! ```text
//! 0    checksum
//! 1    common (33)
//! 34   source 1 (86)
//!      additive kit (806), only if source 1 is additive
//! ...  sources 2..N, same rule
//! ```
//!
//! Three checksums are in play. The patch checksum and the per-kit checksum
//! are 7-bit sums; the combi checksum is an unmasked byte sum.

mod bank;
mod combi;
mod common;
mod kit;
mod params;
mod single;
mod source;

pub use bank::{CombiBank, SingleBank, ToneMap};
pub use combi::{Combi, CombiSection};
pub use common::{Common, MacroController};
pub use kit::{AdditiveKit, FormantFilter, HarmonicEnvelope, KitCommon, Morf, MorfCopy, Stage};
pub use params::*;
pub use single::SinglePatch;
pub use source::{
    AmpEnvelope, AmpModifiers, Amplifier, AssignableController, Control, Filter, FilterEnvelope,
    Lfo, LfoTarget, PitchEnvelope, Source, VelocitySwitch, Wave,
};

/// Common block size
pub const COMMON_SIZE: usize = 33;

/// Source body size, without any kit
pub const SOURCE_SIZE: usize = 86;

/// Additive kit size
pub const KIT_SIZE: usize = 806;

/// Harmonics per additive kit
pub const KIT_HARMONICS: usize = 64;

/// Formant filter bands per additive kit
pub const FORMANT_BANDS: usize = 128;

pub const MIN_SOURCES: usize = 2;
pub const MAX_SOURCES: usize = 6;

/// Wave number that selects additive synthesis
pub const ADDITIVE_WAVE: u16 = 512;

/// Combi size
pub const COMBI_SIZE: usize = 59;

pub const COMBI_SECTIONS: usize = 4;
pub const COMBI_SECTION_SIZE: usize = 12;

/// Tone map size
pub const TONE_MAP_SIZE: usize = 19;

/// Slots in a single-patch bank
pub const BANK_PATCHES: usize = 128;

/// Combis in a combi bank
pub const BANK_COMBIS: usize = 64;

#[cfg(test)]
mod tests;
