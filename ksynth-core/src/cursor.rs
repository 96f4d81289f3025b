//! Unit-scoped byte cursor for decoding

use crate::error::{Result, SyxError};
use crate::kind::WireKind;
use crate::ranged::{ByteValue, RangedValue};

/// Sequential reader over one structural unit
///
/// Offsets reported in errors are absolute: a reader carved out of a parent
/// with [`SyxReader::sub`] keeps counting from the parent's position, and a
/// reader over a de-interleaved stream ([`SyxReader::strided`]) maps each
/// byte back to where it sat in the original buffer.
#[derive(Debug, Clone)]
pub struct SyxReader<'a> {
    unit: &'static str,
    data: &'a [u8],
    /// Absolute offset of `data[0]`
    base: usize,
    /// Distance between consecutive bytes in the original buffer
    stride: usize,
    pos: usize,
    /// Absolute offset of the most recently read byte
    last: usize,
}

impl<'a> SyxReader<'a> {
    /// Reader over a whole buffer
    pub fn new(unit: &'static str, data: &'a [u8]) -> Self {
        Self::strided(unit, data, 0, 1)
    }

    /// Reader over a stream whose bytes sat `stride` apart in the original
    /// buffer, starting at absolute offset `first`
    pub fn strided(unit: &'static str, data: &'a [u8], first: usize, stride: usize) -> Self {
        Self {
            unit,
            data,
            base: first,
            stride,
            pos: 0,
            last: first,
        }
    }

    /// Name of the unit being read
    pub fn unit(&self) -> &'static str {
        self.unit
    }

    /// Absolute offset of the next byte
    pub fn position(&self) -> usize {
        self.absolute(self.pos)
    }

    fn absolute(&self, index: usize) -> usize {
        self.base + index * self.stride
    }

    /// Bytes left in this unit
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn eof(&self, needed: usize) -> SyxError {
        SyxError::UnexpectedEof {
            unit: self.unit,
            offset: self.position(),
            needed: needed - self.remaining(),
        }
    }

    /// Read one byte
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = self.peek()?;
        self.last = self.position();
        self.pos += 1;
        Ok(byte)
    }

    /// Look at the next byte without consuming it
    pub fn peek(&self) -> Result<u8> {
        self.data.get(self.pos).copied().ok_or_else(|| self.eof(1))
    }

    /// Look at the next `len` bytes without consuming them
    pub fn peek_bytes(&self, len: usize) -> Result<&'a [u8]> {
        self.data
            .get(self.pos..self.pos + len)
            .ok_or_else(|| self.eof(len))
    }

    /// Read `len` bytes
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(len)?;
        if len > 0 {
            self.last = self.absolute(self.pos + len - 1);
        }
        self.pos += len;
        Ok(bytes)
    }

    /// Read a fixed-size array
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Skip `len` bytes
    pub fn skip(&mut self, len: usize) -> Result<()> {
        self.read_bytes(len).map(|_| ())
    }

    /// Carve the next `len` bytes out as a child unit
    ///
    /// The parent advances past the child immediately; the child must be
    /// consumed completely and closed with [`SyxReader::finish`].
    pub fn sub(&mut self, unit: &'static str, len: usize) -> Result<SyxReader<'a>> {
        let base = self.position();
        let data = self.data.get(self.pos..self.pos + len).ok_or_else(|| {
            SyxError::UnexpectedEof {
                unit,
                offset: base,
                needed: len - self.remaining(),
            }
        })?;
        self.pos += len;
        tracing::trace!("{} @ {:#06x}: {} bytes", unit, base, len);
        Ok(SyxReader {
            unit,
            data,
            base,
            stride: self.stride,
            pos: 0,
            last: base,
        })
    }

    /// Run `f` with errors attributed to `unit`
    ///
    /// Used for nested units that share the parent's buffer and offsets.
    pub fn scoped<T, F>(&mut self, unit: &'static str, f: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let parent = std::mem::replace(&mut self.unit, unit);
        let result = f(self);
        self.unit = parent;
        result
    }

    /// Read one byte and convert it with the value's wire rule
    pub fn value<T: ByteValue>(&mut self) -> Result<T> {
        let wire = self.read_u8()?;
        self.decode(wire)
    }

    /// Convert bits taken from the most recently read byte
    pub fn decode<T: ByteValue>(&self, wire: u8) -> Result<T> {
        self.decode_wide(u16::from(wire))
    }

    /// Convert a wire value assembled from the most recently read bytes
    pub fn decode_wide<T: RangedValue>(&self, wire: u16) -> Result<T> {
        T::from_wide(wire).map_err(|source| SyxError::Value {
            unit: self.unit,
            offset: self.last,
            source,
        })
    }

    /// Read one byte as an enumerated selector
    pub fn kind<T: WireKind>(&mut self) -> Result<T> {
        let wire = self.read_u8()?;
        self.decode_kind(wire)
    }

    /// Convert bits taken from the most recently read byte into a selector
    pub fn decode_kind<T: WireKind>(&self, wire: u8) -> Result<T> {
        T::from_wire(wire).ok_or(SyxError::InvalidKind {
            unit: self.unit,
            offset: self.last,
            kind: T::NAME,
            value: wire,
        })
    }

    /// Read a whole-byte switch, which must be 0 or 1
    pub fn flag(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(SyxError::InvalidKind {
                unit: self.unit,
                offset: self.last,
                kind: "flag",
                value,
            }),
        }
    }

    /// Close the unit; every byte must have been consumed
    pub fn finish(self) -> Result<()> {
        if self.pos != self.data.len() {
            return Err(SyxError::StructuralLength {
                unit: self.unit,
                expected: self.data.len(),
                actual: self.pos,
            });
        }
        Ok(())
    }
}
