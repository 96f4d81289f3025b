//! Byte-interleaved sub-streams
//!
//! Several sources' records are sometimes stored one byte at a time in
//! rotation (`s1[0] s2[0] s1[1] s2[1] ...`). With four sources and one
//! parameter per row the same helpers also handle "grouped by parameter"
//! layouts.

use crate::cursor::SyxReader;
use crate::data::SystemExclusiveData;
use crate::error::{Result, SyxError};
use crate::options::DecodeOptions;
use crate::writer::SyxWriter;

/// Split `region` into `ways` streams, taking every `ways`-th byte
pub fn deinterleave(unit: &'static str, region: &[u8], ways: usize) -> Result<Vec<Vec<u8>>> {
    if ways == 0 || region.len() % ways != 0 {
        return Err(SyxError::StructuralLength {
            unit,
            expected: region.len().next_multiple_of(ways.max(1)),
            actual: region.len(),
        });
    }
    let stream_len = region.len() / ways;
    let mut streams = vec![Vec::with_capacity(stream_len); ways];
    for row in region.chunks_exact(ways) {
        for (stream, &byte) in streams.iter_mut().zip(row) {
            stream.push(byte);
        }
    }
    Ok(streams)
}

/// Merge equal-length streams back into one region
pub fn interleave<S: AsRef<[u8]>>(unit: &'static str, streams: &[S]) -> Result<Vec<u8>> {
    let Some(first) = streams.first() else {
        return Ok(Vec::new());
    };
    let stream_len = first.as_ref().len();
    if let Some(bad) = streams.iter().find(|s| s.as_ref().len() != stream_len) {
        return Err(SyxError::StructuralLength {
            unit,
            expected: stream_len,
            actual: bad.as_ref().len(),
        });
    }
    let mut region = Vec::with_capacity(stream_len * streams.len());
    for i in 0..stream_len {
        for stream in streams {
            region.push(stream.as_ref()[i]);
        }
    }
    Ok(region)
}

/// Decode `N` interleaved units of `size` bytes each
///
/// Each stream gets its own strided reader so errors still point at the byte
/// in the interleaved buffer.
pub fn decode_interleaved<T, const N: usize>(
    reader: &mut SyxReader<'_>,
    size: usize,
    options: &DecodeOptions,
) -> Result<[T; N]>
where
    T: SystemExclusiveData,
{
    let first = reader.position();
    let region = reader.read_bytes(N * size)?;
    let streams = deinterleave(T::UNIT, region, N)?;
    let mut units = Vec::with_capacity(N);
    for (i, stream) in streams.iter().enumerate() {
        let mut stream_reader = SyxReader::strided(T::UNIT, stream, first + i, N);
        units.push(T::decode(&mut stream_reader, options)?);
        stream_reader.finish()?;
    }
    <[T; N]>::try_from(units).map_err(|units| SyxError::StructuralLength {
        unit: T::UNIT,
        expected: N,
        actual: units.len(),
    })
}

/// Encode units one stream each and write them interleaved
pub fn encode_interleaved<T: SystemExclusiveData>(writer: &mut SyxWriter, units: &[T]) -> Result<()> {
    let streams = units
        .iter()
        .map(SystemExclusiveData::to_bytes)
        .collect::<Result<Vec<_>>>()?;
    writer.extend(&interleave(T::UNIT, &streams)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_way_split() {
        let region = [1u8, 101, 2, 102, 3, 103];
        let streams = deinterleave("region", &region, 2).unwrap();
        assert_eq!(streams, vec![vec![1, 2, 3], vec![101, 102, 103]]);
        assert_eq!(interleave("region", &streams).unwrap(), region.to_vec());
    }

    #[test]
    fn test_no_cross_contamination() {
        // 448 bytes: even bytes belong to stream 0 (all < 0x80),
        // odd bytes to stream 1 (all >= 0x80)
        let region: Vec<u8> = (0..448)
            .map(|i| if i % 2 == 0 { (i / 2 % 128) as u8 } else { 0x80 | (i / 2 % 128) as u8 })
            .collect();
        let streams = deinterleave("region", &region, 2).unwrap();
        assert_eq!(streams[0].len(), 224);
        assert_eq!(streams[1].len(), 224);
        assert!(streams[0].iter().all(|&b| b < 0x80));
        assert!(streams[1].iter().all(|&b| b >= 0x80));
    }

    #[test]
    fn test_uneven_region_rejected() {
        assert!(deinterleave("region", &[0u8; 5], 2).is_err());
        assert!(deinterleave("region", &[0u8; 4], 0).is_err());
    }

    use crate::ranged::{RangedValue, WireRule};
    use crate::ranged_value;

    ranged_value! {
        struct Depth(-50..=50, default 0, WireRule::Centered(50));
    }

    #[derive(Debug, PartialEq)]
    struct Pair(u8, Depth);

    impl SystemExclusiveData for Pair {
        const UNIT: &'static str = "pair";

        fn decode(reader: &mut SyxReader<'_>, _options: &DecodeOptions) -> Result<Self> {
            Ok(Self(reader.read_u8()?, reader.value()?))
        }

        fn encode(&self, writer: &mut SyxWriter) -> Result<()> {
            writer.push(self.0);
            writer.value(self.1);
            Ok(())
        }

        fn data_size(&self) -> usize {
            2
        }
    }

    fn depth(value: i32) -> Depth {
        Depth::new(value).unwrap()
    }

    #[test]
    fn test_typed_streams() {
        let data = [9u8, 1, 2, 3, 54, 55, 56];
        let mut reader = SyxReader::new("outer", &data);
        reader.skip(1).unwrap();
        let pairs: [Pair; 3] =
            decode_interleaved(&mut reader, 2, &DecodeOptions::default()).unwrap();
        assert_eq!(pairs, [Pair(1, depth(4)), Pair(2, depth(5)), Pair(3, depth(6))]);
        assert!(reader.is_empty());

        let mut writer = SyxWriter::new("outer", 6);
        encode_interleaved(&mut writer, &pairs).unwrap();
        assert_eq!(writer.finish().unwrap(), &data[1..]);
    }

    #[test]
    fn test_typed_stream_offsets_map_back() {
        // Stream 1 starts at offset 2; its second byte sits at 2 + 2 = 4
        let data = [0u8, 0, 0, 50, 0xF0];
        let mut reader = SyxReader::new("outer", &data);
        reader.skip(1).unwrap();
        let err = decode_interleaved::<Pair, 2>(&mut reader, 2, &DecodeOptions::default())
            .unwrap_err();
        assert_eq!(err.unit(), Some("pair"));
        assert_eq!(err.offset(), Some(4));
    }

    #[test]
    fn test_mismatched_streams_rejected() {
        let streams = [vec![1u8, 2], vec![3u8]];
        assert!(matches!(
            interleave("region", &streams),
            Err(SyxError::StructuralLength { expected: 2, actual: 1, .. })
        ));
    }
}
