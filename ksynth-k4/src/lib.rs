//! ksynth-k4: K4 patch data codec
//!
//! Every K4 unit has a fixed size and ends in a one-byte seven-bit checksum.
//!
//! | Unit | Size |
//! |---|---|
//! | [`SinglePatch`] | 131 |
//! | [`MultiPatch`] | 77 |
//! | [`EffectPatch`] | 35 |
//! | [`DrumKit`] | 11 + 61 × 11 |
//! | [`Bank`] | 15,114 |
//!
//! Inside a single patch the four sources and the two filters are not stored
//! one after the other: each parameter row holds the value for every source
//! (or filter) in turn.
//!
//! # Usage
//!
//! ```ignore
//! use ksynth_core::SystemExclusiveData;
//! use ksynth_k4::Bank;
//!
//! let data = std::fs::read("bank.syx").unwrap();
//! let bank = Bank::from_bytes(&data).unwrap();
//! for (i, single) in bank.singles.iter().enumerate() {
//!     println!("{} {}", ksynth_k4::slot_name(i), single.name);
//! }
//! ```

mod bank;
mod drum;
mod effect;
mod multi;
mod params;
mod single;
mod unit;

pub use bank::{Bank, slot_name};
pub use drum::{DrumCommon, DrumKit, DrumNote, DrumSource};
pub use effect::{EffectPatch, SubmixSettings};
pub use multi::{MultiPatch, Section};
pub use params::*;
pub use single::{
    AutoBend, Envelope, Filter, Lfo, Modulation, SinglePatch, Source, TimeModulation, Vibrato,
};

// =============================================================================
// Constants
// =============================================================================

/// Single patch size
pub const SINGLE_SIZE: usize = 131;

/// Multi patch size
pub const MULTI_SIZE: usize = 77;

/// Effect patch size
pub const EFFECT_SIZE: usize = 35;

/// Drum kit common block size
pub const DRUM_COMMON_SIZE: usize = 11;

/// Size of one drum note
pub const DRUM_NOTE_SIZE: usize = 11;

/// Drum notes in a kit
pub const DRUM_NOTE_COUNT: usize = 61;

/// Whole drum kit size
pub const DRUM_SIZE: usize = DRUM_COMMON_SIZE + DRUM_NOTE_COUNT * DRUM_NOTE_SIZE;

/// Sources per single patch
pub const SOURCE_COUNT: usize = 4;

/// Bytes per source
pub const SOURCE_SIZE: usize = 18;

/// Filters per single patch
pub const FILTER_COUNT: usize = 2;

/// Bytes per filter
pub const FILTER_SIZE: usize = 14;

/// Sections per multi patch
pub const SECTION_COUNT: usize = 8;

/// Bytes per multi section
pub const SECTION_SIZE: usize = 8;

/// Single patches in a bank
pub const BANK_SINGLES: usize = 64;

/// Multi patches in a bank
pub const BANK_MULTIS: usize = 64;

/// Effect patches in a bank
pub const BANK_EFFECTS: usize = 32;

/// Whole bank size
pub const BANK_SIZE: usize = BANK_SINGLES * SINGLE_SIZE
    + BANK_MULTIS * MULTI_SIZE
    + DRUM_SIZE
    + BANK_EFFECTS * EFFECT_SIZE;
