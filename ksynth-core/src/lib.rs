//! ksynth-core: shared machinery for the ksynth SysEx patch codecs
//!
//! The family crates (`ksynth-k4`, `ksynth-k5`, `ksynth-k5000`) describe
//! their byte layouts in terms of the pieces defined here:
//!
//! - **Ranged values** ([`RangedValue`], [`ranged_value!`]): parameter
//!   newtypes that know their domain and their wire transform
//! - **Wire kinds** ([`WireKind`], [`wire_kind!`]): enumerated selectors
//! - **Bit helpers** ([`bits`]): flags, nybbles and sub-ranges
//! - **Checksums** ([`checksum`]): the three per-family algorithms
//! - **Cursors** ([`SyxReader`], [`SyxWriter`]): unit-scoped reading and
//!   writing with absolute offsets and length assertions
//! - **Interleaving** ([`interleave`]): byte-rotated sub-streams
//! - **Names** ([`PatchName`]): fixed-width names with glyph substitution
//! - **Options** ([`DecodeOptions`]): checksum policy, loadable from TOML
//!
//! # Usage
//!
//! ```ignore
//! use ksynth_core::{SystemExclusiveData, DecodeOptions};
//! use ksynth_k4::SinglePatch;
//!
//! let data = std::fs::read("patch.syx").unwrap();
//! let patch = SinglePatch::from_bytes(&data[..131]).unwrap();
//! assert_eq!(patch.to_bytes().unwrap(), &data[..131]);
//! ```

pub mod bits;
pub mod checksum;
mod cursor;
mod data;
mod error;
pub mod interleave;
mod kind;
mod name;
mod options;
mod ranged;
mod writer;

pub use checksum::ChecksumKind;
pub use cursor::SyxReader;
pub use data::{SystemExclusiveData, decode_repeated, encode_repeated};
pub use error::{RangeError, Result, SyxError};
pub use kind::WireKind;
pub use name::{GLYPHS, NameByte, PatchName, byte_to_char, char_to_byte};
pub use options::{ChecksumPolicy, DecodeOptions};
pub use ranged::{ByteValue, RangedValue, WireRule};
pub use writer::SyxWriter;
