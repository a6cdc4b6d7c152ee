//! Short-read / short-write helpers over [`platform::File`].

use platform::File;

use crate::error::StreamError;

/// Fill `buf` from the current position, retrying on short reads.
///
/// Returns the number of bytes read (less than `buf.len()` only at EOF).
pub(crate) async fn read_full<F: File>(file: &mut F, buf: &mut [u8]) -> Result<usize, F::Error> {
    let mut pos = 0;
    while let Some(rest) = buf.get_mut(pos..) {
        if rest.is_empty() {
            break;
        }
        let n = file.read(rest).await?;
        if n == 0 {
            break;
        }
        pos = pos.saturating_add(n);
    }
    Ok(pos)
}

/// Write all of `buf`, retrying on short writes.
pub(crate) async fn write_all<F: File>(
    file: &mut F,
    buf: &[u8],
) -> Result<(), StreamError<F::Error>> {
    let mut pos = 0;
    while let Some(rest) = buf.get(pos..) {
        if rest.is_empty() {
            break;
        }
        let n = file.write(rest).await.map_err(StreamError::Io)?;
        if n == 0 {
            return Err(StreamError::WriteZero);
        }
        pos = pos.saturating_add(n);
    }
    Ok(())
}
