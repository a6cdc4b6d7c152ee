//! Container reader: canonical header plus tolerant chunk scan.
//!
//! ```text
//! open()          read 44 bytes, check RIFF/WAVE         → WavReader
//! into_payload()  scan chunks from offset 12 for "data"  → WavPayload
//! read_chunk()    stream payload, clipped to its length
//! ```
//!
//! The `data` length found by the scan is authoritative. The length in the
//! canonical header is kept for diagnostics only, since any chunk placed
//! before `data` shifts it out of the canonical slot.

use platform::File;

use crate::cursor::StreamCursor;
use crate::error::StreamError;
use crate::io::read_full;
use crate::wav::{
    parse_chunk_header, FormatError, WavHeader, CHUNK_HEADER_LEN, DATA, FIRST_CHUNK_OFFSET,
};

/// An opened WAV file with a validated outer header.
pub struct WavReader<F: File> {
    file: F,
    header: WavHeader,
}

impl<F: File> WavReader<F> {
    /// Read and validate the canonical header.
    ///
    /// # Errors
    ///
    /// - [`StreamError::Io`] on read failure.
    /// - [`FormatError::TruncatedHeader`] if the file is shorter than 44 bytes.
    /// - [`FormatError::BadMagic`] if the `RIFF`/`WAVE` ids do not match.
    pub async fn open(mut file: F) -> Result<Self, StreamError<F::Error>> {
        let mut buf = [0u8; WavHeader::SIZE];
        let n = read_full(&mut file, &mut buf)
            .await
            .map_err(StreamError::Io)?;
        if n < WavHeader::SIZE {
            return Err(FormatError::TruncatedHeader.into());
        }
        let header = WavHeader::decode(&buf)?;
        debug!(
            "wav: declared rate {} ch {} bits {} data {}",
            header.sample_rate,
            header.channels,
            header.bits_per_sample,
            header.data_size
        );
        Ok(Self { file, header })
    }

    /// Canonical header as read from the first 44 bytes.
    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    /// Locate the `data` chunk and position the file at its first byte.
    ///
    /// Starting right after `RIFF<size>WAVE`, reads `<id><len>` pairs and
    /// skips `len` bytes until the id is `data`.
    ///
    /// # Errors
    ///
    /// - [`StreamError::Io`] on seek or read failure.
    /// - [`FormatError::MissingDataChunk`] if the file ends first.
    pub async fn into_payload(mut self) -> Result<WavPayload<F>, StreamError<F::Error>> {
        let mut pos = FIRST_CHUNK_OFFSET;
        loop {
            self.file.seek(pos).await.map_err(StreamError::Io)?;
            let mut raw = [0u8; 8];
            let n = read_full(&mut self.file, &mut raw)
                .await
                .map_err(StreamError::Io)?;
            if n < raw.len() {
                return Err(FormatError::MissingDataChunk.into());
            }
            let (id, len) = parse_chunk_header(raw);
            let body = pos
                .checked_add(CHUNK_HEADER_LEN)
                .ok_or(FormatError::MissingDataChunk)?;
            if id == DATA {
                if len != self.header.data_size {
                    warn!(
                        "wav: header data size {} differs from chunk size {}",
                        self.header.data_size,
                        len
                    );
                }
                debug!("wav: data chunk at {} len {}", body, len);
                return Ok(WavPayload {
                    file: self.file,
                    header: self.header,
                    offset: body,
                    cursor: StreamCursor::new(u64::from(len)),
                });
            }
            pos = body
                .checked_add(u64::from(len))
                .ok_or(FormatError::MissingDataChunk)?;
        }
    }
}

/// The located payload of a WAV file.
pub struct WavPayload<F: File> {
    file: F,
    header: WavHeader,
    offset: u64,
    cursor: StreamCursor,
}

impl<F: File> WavPayload<F> {
    /// Payload length from the `data` chunk.
    pub fn len(&self) -> u64 {
        self.cursor.target()
    }

    /// Whether the payload is empty.
    pub fn is_empty(&self) -> bool {
        self.cursor.target() == 0
    }

    /// File offset of the first payload byte.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Payload bytes not yet read.
    pub fn remaining(&self) -> u64 {
        self.cursor.remaining()
    }

    /// Canonical header from the start of the file.
    pub fn header(&self) -> &WavHeader {
        &self.header
    }

    /// Read the next piece of payload into `buf`, never past the payload end.
    ///
    /// Returns `Ok(0)` once the payload is exhausted or the file ends early.
    pub async fn read_chunk(&mut self, buf: &mut [u8]) -> Result<usize, F::Error> {
        let want = self.cursor.next_len(buf.len());
        let Some(dst) = buf.get_mut(..want) else {
            return Ok(0);
        };
        if dst.is_empty() {
            return Ok(0);
        }
        let n = self.file.read(dst).await?;
        self.cursor.advance(n);
        Ok(n)
    }
}
