//! Canonical RIFF/WAVE header codec.
//!
//! All multi-byte integers are little-endian.
//!
//! Layout (44 bytes total):
//! ```text
//! [0..4]   container id     b"RIFF"
//! [4..8]   container size   u32 le  (36 + data size)
//! [8..12]  format id        b"WAVE"
//! [12..16] subchunk1 id     b"fmt "
//! [16..20] subchunk1 size   u32 le  (16 for PCM)
//! [20..22] audio format     u16 le  (1 = linear PCM)
//! [22..24] channels         u16 le
//! [24..28] sample rate      u32 le
//! [28..32] byte rate        u32 le
//! [32..34] block align      u16 le
//! [34..36] bits per sample  u16 le
//! [36..40] subchunk2 id     b"data"
//! [40..44] subchunk2 size   u32 le
//! ```
//!
//! Only the container and format ids are validated on decode. Files in the
//! wild often carry extra chunks between `fmt ` and `data`, so the canonical
//! `data` fields are advisory; [`crate::reader`] locates the payload by
//! scanning chunks.

/// Container id
pub const RIFF: [u8; 4] = *b"RIFF";
/// Format id
pub const WAVE: [u8; 4] = *b"WAVE";
/// Format chunk id
pub const FMT: [u8; 4] = *b"fmt ";
/// Payload chunk id
pub const DATA: [u8; 4] = *b"data";

/// Offset of the first chunk after the outer `RIFF....WAVE` header.
pub const FIRST_CHUNK_OFFSET: u64 = 12;

/// Size of a chunk header (id + length).
pub const CHUNK_HEADER_LEN: u64 = 8;

/// Linear PCM format tag.
pub const FORMAT_PCM: u16 = 1;

/// Container format errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror_no_std::Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FormatError {
    /// Container or format id is not `RIFF`/`WAVE`.
    #[error("not a RIFF/WAVE file")]
    BadMagic,
    /// File ended before the 44-byte header.
    #[error("file shorter than the canonical header")]
    TruncatedHeader,
    /// Chunk scan reached end of file without a `data` chunk.
    #[error("no data chunk")]
    MissingDataChunk,
    /// Payload would not fit the 32-bit size fields.
    #[error("payload exceeds 4 GiB")]
    PayloadTooLarge,
}

/// Decoded canonical header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WavHeader {
    /// Container size field (file length minus 8)
    pub riff_size: u32,
    /// Id found where `fmt ` is expected
    pub fmt_id: [u8; 4],
    /// Format chunk length
    pub fmt_size: u32,
    /// Audio format tag
    pub audio_format: u16,
    /// Channel count
    pub channels: u16,
    /// Declared sample rate
    pub sample_rate: u32,
    /// Bytes per second
    pub byte_rate: u32,
    /// Bytes per frame
    pub block_align: u16,
    /// Bits per sample
    pub bits_per_sample: u16,
    /// Id found where `data` is expected
    pub data_id: [u8; 4],
    /// Declared payload length (advisory)
    pub data_size: u32,
}

impl WavHeader {
    /// Encoded size in bytes.
    pub const SIZE: usize = 44;

    /// Header for a 16-bit stereo PCM payload of `data_size` bytes.
    ///
    /// Returns `None` if `36 + data_size` overflows the container size field.
    pub fn pcm16_stereo(sample_rate: u32, data_size: u32) -> Option<Self> {
        Some(Self {
            riff_size: data_size.checked_add(36)?,
            fmt_id: FMT,
            fmt_size: 16,
            audio_format: FORMAT_PCM,
            channels: 2,
            sample_rate,
            byte_rate: sample_rate.checked_mul(4)?,
            block_align: 4,
            bits_per_sample: 16,
            data_id: DATA,
            data_size,
        })
    }

    /// Encode the header into a 44-byte buffer.
    ///
    /// # Safety (lint allow)
    /// All range indices are compile-time constants within `[0, SIZE)`.
    #[must_use]
    #[allow(clippy::indexing_slicing)]
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&RIFF);
        buf[4..8].copy_from_slice(&self.riff_size.to_le_bytes());
        buf[8..12].copy_from_slice(&WAVE);
        buf[12..16].copy_from_slice(&self.fmt_id);
        buf[16..20].copy_from_slice(&self.fmt_size.to_le_bytes());
        buf[20..22].copy_from_slice(&self.audio_format.to_le_bytes());
        buf[22..24].copy_from_slice(&self.channels.to_le_bytes());
        buf[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        buf[28..32].copy_from_slice(&self.byte_rate.to_le_bytes());
        buf[32..34].copy_from_slice(&self.block_align.to_le_bytes());
        buf[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        buf[36..40].copy_from_slice(&self.data_id);
        buf[40..44].copy_from_slice(&self.data_size.to_le_bytes());
        buf
    }

    /// Decode a header from a 44-byte buffer.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::BadMagic`] if bytes 0..4 are not `RIFF` or
    /// bytes 8..12 are not `WAVE`.
    #[allow(clippy::indexing_slicing)]
    pub fn decode(buf: &[u8; Self::SIZE]) -> Result<Self, FormatError> {
        if buf[0..4] != RIFF || buf[8..12] != WAVE {
            return Err(FormatError::BadMagic);
        }
        Ok(Self {
            riff_size: le_u32(buf, 4),
            fmt_id: id(buf, 12),
            fmt_size: le_u32(buf, 16),
            audio_format: le_u16(buf, 20),
            channels: le_u16(buf, 22),
            sample_rate: le_u32(buf, 24),
            byte_rate: le_u32(buf, 28),
            block_align: le_u16(buf, 32),
            bits_per_sample: le_u16(buf, 34),
            data_id: id(buf, 36),
            data_size: le_u32(buf, 40),
        })
    }
}

// All offsets below are constants < 44 - width.
#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
fn id(buf: &[u8; WavHeader::SIZE], at: usize) -> [u8; 4] {
    [buf[at], buf[at + 1], buf[at + 2], buf[at + 3]]
}

fn le_u32(buf: &[u8; WavHeader::SIZE], at: usize) -> u32 {
    u32::from_le_bytes(id(buf, at))
}

#[allow(clippy::indexing_slicing, clippy::arithmetic_side_effects)]
fn le_u16(buf: &[u8; WavHeader::SIZE], at: usize) -> u16 {
    u16::from_le_bytes([buf[at], buf[at + 1]])
}

/// Parse a chunk header (`id`, `length`).
pub fn parse_chunk_header(buf: [u8; 8]) -> ([u8; 4], u32) {
    let [a, b, c, d, l0, l1, l2, l3] = buf;
    ([a, b, c, d], u32::from_le_bytes([l0, l1, l2, l3]))
}
