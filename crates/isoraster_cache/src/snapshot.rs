//! # Canvas Snapshots
//!
//! A snapshot is the colour and depth buffers of one canvas, stored so a
//! display can resume where it left off instead of rendering from scratch.
//!
//! ## Format
//!
//! ```text
//! [4 bytes: magic "ISOC"]
//! [4 bytes: version]
//! [4 bytes: width]
//! [4 bytes: height]
//! [4 bytes: uncompressed payload length]
//! [4 bytes: compressed payload length]
//! [N bytes: lz4 block (RGBA bytes, then depths as i16 LE)]
//! [4 bytes: CRC32 of everything above]
//! ```
//!
//! All integers are little-endian.

use crate::error::{CacheError, CacheResult};
use isoraster_shared::Rgba;

/// Magic bytes identifying a snapshot.
const SNAPSHOT_MAGIC: &[u8; 4] = b"ISOC";

/// Current snapshot format version.
const SNAPSHOT_VERSION: u32 = 1;

/// Header size in bytes (magic + five u32 fields).
const HEADER_LEN: usize = 4 + 4 * 5;

/// Trailer size in bytes (CRC32).
const TRAILER_LEN: usize = 4;

/// Bytes per pixel in the payload: four colour bytes plus an i16 depth.
const PIXEL_PAYLOAD_LEN: usize = 4 + 2;

/// Colour and depth buffers of one canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CanvasSnapshot {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Row-major colours, `width * height` entries
    pub colors: Vec<Rgba>,
    /// Row-major depths, `width * height` entries
    pub depths: Vec<i16>,
}

impl CanvasSnapshot {
    /// Number of pixels the dimensions call for.
    #[must_use]
    pub const fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Fails unless this snapshot fits a `width` x `height` canvas.
    pub fn check_dimensions(&self, width: u32, height: u32) -> CacheResult<()> {
        let buffers_ok = self.colors.len() == self.pixel_count() && self.depths.len() == self.pixel_count();
        if self.width == width && self.height == height && buffers_ok {
            Ok(())
        } else {
            Err(CacheError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                found_width: self.width,
                found_height: self.height,
            })
        }
    }

    /// Serializes the snapshot to bytes.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut raw = Vec::with_capacity(self.colors.len() * PIXEL_PAYLOAD_LEN);
        raw.extend_from_slice(bytemuck::cast_slice(&self.colors));
        for depth in &self.depths {
            raw.extend_from_slice(&depth.to_le_bytes());
        }
        let compressed = lz4_flex::compress(&raw);

        let mut buf = Vec::with_capacity(HEADER_LEN + compressed.len() + TRAILER_LEN);
        buf.extend_from_slice(SNAPSHOT_MAGIC);
        buf.extend_from_slice(&SNAPSHOT_VERSION.to_le_bytes());
        buf.extend_from_slice(&self.width.to_le_bytes());
        buf.extend_from_slice(&self.height.to_le_bytes());
        buf.extend_from_slice(&(raw.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(compressed.len() as u32).to_le_bytes());
        buf.extend_from_slice(&compressed);

        let crc = crc32fast::hash(&buf);
        buf.extend_from_slice(&crc.to_le_bytes());
        buf
    }

    /// Parses a snapshot written by [`CanvasSnapshot::encode`].
    pub fn decode(data: &[u8]) -> CacheResult<Self> {
        if data.len() < HEADER_LEN + TRAILER_LEN {
            return Err(CacheError::Truncated {
                needed: HEADER_LEN + TRAILER_LEN,
                available: data.len(),
            });
        }
        if &data[0..4] != SNAPSHOT_MAGIC {
            return Err(CacheError::BadMagic);
        }

        let version = read_u32(data, 4);
        if version != SNAPSHOT_VERSION {
            return Err(CacheError::UnsupportedVersion(version));
        }

        let width = read_u32(data, 8);
        let height = read_u32(data, 12);
        let raw_len = read_u32(data, 16) as usize;
        let compressed_len = read_u32(data, 20) as usize;

        let needed = HEADER_LEN + compressed_len + TRAILER_LEN;
        if data.len() < needed {
            return Err(CacheError::Truncated { needed, available: data.len() });
        }

        let body_end = HEADER_LEN + compressed_len;
        let stored = read_u32(data, body_end);
        let computed = crc32fast::hash(&data[..body_end]);
        if stored != computed {
            return Err(CacheError::ChecksumMismatch { stored, computed });
        }

        let pixels = width as usize * height as usize;
        if raw_len != pixels * PIXEL_PAYLOAD_LEN {
            return Err(CacheError::Truncated {
                needed: pixels * PIXEL_PAYLOAD_LEN,
                available: raw_len,
            });
        }

        let raw = lz4_flex::decompress(&data[HEADER_LEN..body_end], raw_len)
            .map_err(|e| CacheError::Decompress(e.to_string()))?;
        if raw.len() != raw_len {
            return Err(CacheError::Decompress(format!(
                "expected {raw_len} bytes, got {}",
                raw.len()
            )));
        }

        let (color_bytes, depth_bytes) = raw.split_at(pixels * 4);
        let colors = bytemuck::cast_slice::<u8, Rgba>(color_bytes).to_vec();
        let depths = depth_bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Ok(Self { width, height, colors, depths })
    }
}

/// Reads a little-endian u32 at `offset`. Callers check the length first.
fn read_u32(data: &[u8], offset: usize) -> u32 {
    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CanvasSnapshot {
        let width = 16;
        let height = 8;
        let colors = (0..width * height)
            .map(|i| Rgba::new(i as u8, (i * 3) as u8, 7, if i % 5 == 0 { 0 } else { 255 }))
            .collect();
        let depths = (0..width * height)
            .map(|i| if i % 7 == 0 { i16::MAX } else { i as i16 - 40 })
            .collect();
        CanvasSnapshot { width, height, colors, depths }
    }

    #[test]
    fn test_encode_decode() {
        let snapshot = sample();
        let bytes = snapshot.encode();
        assert_eq!(&bytes[0..4], b"ISOC");
        assert_eq!(CanvasSnapshot::decode(&bytes).unwrap(), snapshot);
    }

    #[test]
    fn test_flipped_byte_fails_checksum() {
        let mut bytes = sample().encode();
        bytes[HEADER_LEN + 1] ^= 0xFF;
        assert!(matches!(
            CanvasSnapshot::decode(&bytes),
            Err(CacheError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn test_bad_magic_and_version() {
        let mut bytes = sample().encode();
        bytes[0] = b'X';
        assert!(matches!(CanvasSnapshot::decode(&bytes), Err(CacheError::BadMagic)));

        let mut bytes = sample().encode();
        bytes[4] = 9;
        assert!(matches!(
            CanvasSnapshot::decode(&bytes),
            Err(CacheError::UnsupportedVersion(9))
        ));
    }

    #[test]
    fn test_truncated() {
        let bytes = sample().encode();
        assert!(matches!(
            CanvasSnapshot::decode(&bytes[..bytes.len() - 10]),
            Err(CacheError::Truncated { .. })
        ));
        assert!(matches!(CanvasSnapshot::decode(&[]), Err(CacheError::Truncated { .. })));
    }

    #[test]
    fn test_check_dimensions() {
        let snapshot = sample();
        assert!(snapshot.check_dimensions(16, 8).is_ok());
        assert!(matches!(
            snapshot.check_dimensions(128, 128),
            Err(CacheError::DimensionMismatch { found_width: 16, .. })
        ));
    }
}
