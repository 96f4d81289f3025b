//! Fixed-width patch names
//!
//! Names are stored as raw 7-bit bytes, padded with spaces. Three codes show
//! glyphs on the instruments' displays instead of their ASCII meaning:
//!
//! | Byte | Glyph |
//! |---|---|
//! | `0x5C` | `¥` |
//! | `0x7E` | `→` |
//! | `0x7F` | `←` |

use std::fmt;

use rand::Rng;

use crate::cursor::SyxReader;
use crate::error::{Result, SyxError};
use crate::ranged::WireRule;
use crate::ranged_value;
use crate::writer::SyxWriter;

/// Byte/glyph substitutions applied when converting names to text and back
pub const GLYPHS: [(u8, char); 3] = [(0x5C, '¥'), (0x7E, '→'), (0x7F, '←')];

ranged_value! {
    /// One character code of a patch name
    pub struct NameByte(0..=127, default 32, WireRule::Unmasked);
}

/// Map a name byte to the character the instrument shows
pub fn byte_to_char(byte: u8) -> char {
    GLYPHS
        .iter()
        .find(|(b, _)| *b == byte)
        .map(|(_, c)| *c)
        .unwrap_or(if (0x20..0x7F).contains(&byte) {
            byte as char
        } else {
            '?'
        })
}

/// Map a character to its name byte, if it has one
pub fn char_to_byte(ch: char) -> Option<u8> {
    if let Some((b, _)) = GLYPHS.iter().find(|(_, c)| *c == ch) {
        return Some(*b);
    }
    match ch {
        ' '..='~' if ch != '\\' && ch != '~' => Some(ch as u8),
        _ => None,
    }
}

/// An `N`-byte patch name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchName<const N: usize> {
    bytes: [u8; N],
}

impl<const N: usize> Default for PatchName<N> {
    fn default() -> Self {
        Self { bytes: [b' '; N] }
    }
}

impl<const N: usize> PatchName<N> {
    /// Encode a name, truncating to `N` characters and padding with spaces
    pub fn new(name: &str) -> Result<Self> {
        let mut bytes = [b' '; N];
        for (slot, ch) in bytes.iter_mut().zip(name.chars()) {
            *slot = char_to_byte(ch).ok_or(SyxError::UnsupportedCharacter(ch))?;
        }
        Ok(Self { bytes })
    }

    /// Wrap raw name bytes; every byte must be a 7-bit data byte
    pub fn from_wire(bytes: [u8; N]) -> std::result::Result<Self, crate::RangeError> {
        for &b in &bytes {
            <NameByte as crate::RangedValue>::from_wide(u16::from(b))?;
        }
        Ok(Self { bytes })
    }

    /// Raw name bytes
    pub fn to_wire(&self) -> [u8; N] {
        self.bytes
    }

    /// Name as displayed, trailing spaces removed
    pub fn as_string(&self) -> String {
        let s: String = self.bytes.iter().map(|&b| byte_to_char(b)).collect();
        s.trim_end().to_string()
    }

    /// Read `N` name bytes
    pub fn read(reader: &mut SyxReader<'_>) -> Result<Self> {
        let bytes = reader.read_array::<N>()?;
        let offset = reader.position() - N;
        Self::from_wire(bytes).map_err(|source| {
            // Point at the offending byte rather than the whole field
            let index = bytes.iter().position(|&b| b > 0x7F).unwrap_or(0);
            SyxError::Value {
                unit: reader.unit(),
                offset: offset + index,
                source,
            }
        })
    }

    /// Write the `N` name bytes
    pub fn write(&self, writer: &mut SyxWriter) {
        writer.extend(&self.bytes);
    }

    /// Random printable name
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        let mut bytes = [b' '; N];
        for b in bytes.iter_mut() {
            *b = rng.random_range(b'A'..=b'Z');
        }
        Self { bytes }
    }
}

impl<const N: usize> fmt::Display for PatchName<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_name() {
        let name = PatchName::<10>::new("Warm Pad").unwrap();
        assert_eq!(&name.to_wire(), b"Warm Pad  ");
        assert_eq!(name.as_string(), "Warm Pad");
    }

    #[test]
    fn test_truncates_to_width() {
        let name = PatchName::<8>::new("Very long name").unwrap();
        assert_eq!(&name.to_wire(), b"Very lon");
    }

    #[test]
    fn test_glyph_substitution() {
        let name = PatchName::<8>::new("A→B←¥").unwrap();
        assert_eq!(name.to_wire(), [b'A', 0x7E, b'B', 0x7F, 0x5C, b' ', b' ', b' ']);
        assert_eq!(name.as_string(), "A→B←¥");
    }

    #[test]
    fn test_unrepresentable_characters() {
        assert_eq!(
            PatchName::<8>::new("é"),
            Err(SyxError::UnsupportedCharacter('é'))
        );
        // Backslash and tilde codes are taken by glyphs
        assert!(PatchName::<8>::new("\\").is_err());
        assert!(PatchName::<8>::new("~").is_err());
    }

    #[test]
    fn test_raw_bytes_survive() {
        // Control bytes show as '?' but are kept as-is
        let raw = [0x00, b'A', 0x7E, b' ', b' ', b' ', b' ', b' '];
        let name = PatchName::<8>::from_wire(raw).unwrap();
        assert_eq!(name.to_wire(), raw);
        assert_eq!(name.as_string(), "?A→");
    }

    #[test]
    fn test_read_rejects_high_bytes() {
        let data = [b'A', b'B', 0x80, b' ', b' ', b' ', b' ', b' '];
        let mut reader = SyxReader::new("name", &data);
        let err = PatchName::<8>::read(&mut reader).unwrap_err();
        assert_eq!(err.offset(), Some(2));
    }
}
