use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rayon::prelude::*;

use crate::error::{BvError, BvResult};

/// Packs independently coded byte ranges into one self-delimited blob:
/// a segment count, then per segment a little-endian length, a CRC32 and
/// the payload.
pub fn pack_segments(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut out = Vec::new();
    out.write_u32::<LittleEndian>(segments.len() as u32).unwrap();
    for seg in segments {
        out.write_u32::<LittleEndian>(seg.len() as u32).unwrap();
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(seg);
        out.write_u32::<LittleEndian>(hasher.finalize()).unwrap();
        out.extend_from_slice(seg);
    }
    out
}

/// Splits a packed blob back into its segment payloads, verifying each
/// CRC. Truncated framing is a container-level error; the coder below
/// never sees it.
pub fn split_segments(data: &[u8]) -> BvResult<Vec<&[u8]>> {
    let mut cursor = std::io::Cursor::new(data);
    let count = cursor
        .read_u32::<LittleEndian>()
        .map_err(|_| BvError::InvalidSegment("missing segment count".into()))?
        as usize;

    let mut segments = Vec::with_capacity(count);
    for i in 0..count {
        let len = cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| BvError::InvalidSegment(format!("missing length of segment {}", i)))?
            as usize;
        let crc = cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| BvError::InvalidSegment(format!("missing CRC of segment {}", i)))?;

        let start = cursor.position() as usize;
        if start + len > data.len() {
            return Err(BvError::InvalidSegment(format!(
                "segment {} truncated: {} of {} bytes",
                i,
                data.len() - start,
                len
            )));
        }
        let payload = &data[start..start + len];
        cursor.set_position((start + len) as u64);

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(payload);
        let actual = hasher.finalize();
        if actual != crc {
            return Err(BvError::CrcMismatch {
                expected: crc,
                actual,
            });
        }
        segments.push(payload);
    }
    Ok(segments)
}

/// Encodes independent units in parallel, one coder instance per unit,
/// and packs the results. The closure owns its unit's whole bitstream,
/// so no synchronization happens below this fan-out.
pub fn encode_segments<T, F>(units: &[T], encode: F) -> Vec<u8>
where
    T: Sync,
    F: Fn(&T) -> Vec<u8> + Sync,
{
    let payloads: Vec<Vec<u8>> = units.par_iter().map(&encode).collect();
    pack_segments(&payloads)
}

/// Decodes a packed blob in parallel, one coder instance per segment.
pub fn decode_segments<T, F>(data: &[u8], decode: F) -> BvResult<Vec<T>>
where
    T: Send,
    F: Fn(&[u8]) -> T + Sync,
{
    let payloads = split_segments(data)?;
    Ok(payloads.par_iter().map(|p| decode(p)).collect())
}
