//! Unit-scoped byte sink for encoding

use crate::error::{Result, SyxError};
use crate::kind::WireKind;
use crate::ranged::ByteValue;

/// Byte sink for one structural unit with a declared length
///
/// [`SyxWriter::finish`] refuses to hand out the bytes unless exactly the
/// declared number was written.
#[derive(Debug, Clone)]
pub struct SyxWriter {
    unit: &'static str,
    expected: usize,
    data: Vec<u8>,
}

impl SyxWriter {
    pub fn new(unit: &'static str, expected: usize) -> Self {
        Self {
            unit,
            expected,
            data: Vec::with_capacity(expected),
        }
    }

    pub fn unit(&self) -> &'static str {
        self.unit
    }

    /// Bytes written so far
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The bytes written so far
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn push(&mut self, byte: u8) {
        self.data.push(byte);
    }

    pub fn extend(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Write a ranged value as one wire byte
    pub fn value<T: ByteValue>(&mut self, value: T) {
        self.push(value.to_wire());
    }

    /// Write a selector as one wire byte
    pub fn kind<T: WireKind>(&mut self, kind: T) {
        self.push(kind.to_wire());
    }

    /// Write a whole-byte switch as 0 or 1
    pub fn flag(&mut self, on: bool) {
        self.push(u8::from(on));
    }

    /// Write a nested unit of `size` bytes
    ///
    /// The closure gets its own writer; its length is checked before the
    /// bytes are appended here.
    pub fn unit_with<F>(&mut self, unit: &'static str, size: usize, f: F) -> Result<()>
    where
        F: FnOnce(&mut SyxWriter) -> Result<()>,
    {
        let mut child = SyxWriter::new(unit, size);
        f(&mut child)?;
        let bytes = child.finish()?;
        self.extend(&bytes);
        Ok(())
    }

    /// Close the unit and return its bytes
    pub fn finish(self) -> Result<Vec<u8>> {
        if self.data.len() != self.expected {
            return Err(SyxError::StructuralLength {
                unit: self.unit,
                expected: self.expected,
                actual: self.data.len(),
            });
        }
        Ok(self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_length_succeeds() {
        let mut writer = SyxWriter::new("unit", 3);
        writer.push(1);
        writer.extend(&[2, 3]);
        assert_eq!(writer.finish().unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn test_short_and_long_writes_fail() {
        let mut short = SyxWriter::new("unit", 3);
        short.push(1);
        assert_eq!(
            short.finish(),
            Err(SyxError::StructuralLength {
                unit: "unit",
                expected: 3,
                actual: 1
            })
        );

        let mut long = SyxWriter::new("unit", 1);
        long.extend(&[1, 2]);
        assert!(long.finish().is_err());
    }

    #[test]
    fn test_nested_unit_checked_before_append() {
        let mut writer = SyxWriter::new("outer", 4);
        writer.push(0xAA);
        writer
            .unit_with("inner", 3, |w| {
                w.extend(&[1, 2, 3]);
                Ok(())
            })
            .unwrap();
        assert_eq!(writer.finish().unwrap(), vec![0xAA, 1, 2, 3]);

        let mut writer = SyxWriter::new("outer", 4);
        let err = writer
            .unit_with("inner", 3, |w| {
                w.push(1);
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err.unit(), Some("inner"));
        assert!(writer.is_empty());
    }
}
