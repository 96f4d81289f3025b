//! The decode/encode contract every structural unit implements

use crate::cursor::SyxReader;
use crate::error::{Result, SyxError};
use crate::options::DecodeOptions;
use crate::writer::SyxWriter;

/// A structural unit with a device-exact byte layout
///
/// Implementors supply the cursor walk in both directions; the provided
/// methods wrap it with the whole-buffer and length checks.
pub trait SystemExclusiveData: Sized {
    /// Unit name used in diagnostics
    const UNIT: &'static str;

    /// Consume this unit from `reader`
    fn decode(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self>;

    /// Emit this unit into `writer`
    fn encode(&self, writer: &mut SyxWriter) -> Result<()>;

    /// Serialized length in bytes
    fn data_size(&self) -> usize;

    /// Consume this unit as part of a larger one, reporting errors under
    /// [`Self::UNIT`](Self::UNIT)
    fn decode_nested(reader: &mut SyxReader<'_>, options: &DecodeOptions) -> Result<Self> {
        reader.scoped(Self::UNIT, |reader| Self::decode(reader, options))
    }

    /// Emit this unit as part of a larger one
    ///
    /// The unit is written to its own buffer first, so a length mismatch is
    /// reported under [`Self::UNIT`](Self::UNIT) rather than the parent's.
    fn encode_nested(&self, writer: &mut SyxWriter) -> Result<()> {
        writer.unit_with(Self::UNIT, self.data_size(), |w| self.encode(w))
    }

    /// Decode a buffer holding exactly one unit, with strict checksums
    fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with(data, &DecodeOptions::default())
    }

    /// Decode a buffer holding exactly one unit
    fn from_bytes_with(data: &[u8], options: &DecodeOptions) -> Result<Self> {
        let mut reader = SyxReader::new(Self::UNIT, data);
        let unit = Self::decode(&mut reader, options)?;
        if !reader.is_empty() {
            return Err(SyxError::StructuralLength {
                unit: Self::UNIT,
                expected: data.len() - reader.remaining(),
                actual: data.len(),
            });
        }
        tracing::debug!("decoded {} ({} bytes)", Self::UNIT, data.len());
        Ok(unit)
    }

    /// Encode into a fresh buffer of exactly [`data_size`](Self::data_size) bytes
    fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = SyxWriter::new(Self::UNIT, self.data_size());
        self.encode(&mut writer)?;
        let bytes = writer.finish()?;
        tracing::debug!("encoded {} ({} bytes)", Self::UNIT, bytes.len());
        Ok(bytes)
    }
}

/// Decode `count` consecutive units
pub fn decode_repeated<T: SystemExclusiveData>(
    reader: &mut SyxReader<'_>,
    count: usize,
    options: &DecodeOptions,
) -> Result<Vec<T>> {
    (0..count).map(|_| T::decode_nested(reader, options)).collect()
}

/// Encode exactly `count` consecutive units
pub fn encode_repeated<T: SystemExclusiveData>(
    writer: &mut SyxWriter,
    units: &[T],
    count: usize,
) -> Result<()> {
    if units.len() != count {
        return Err(SyxError::StructuralLength {
            unit: T::UNIT,
            expected: count,
            actual: units.len(),
        });
    }
    for unit in units {
        unit.encode_nested(writer)?;
    }
    Ok(())
}
