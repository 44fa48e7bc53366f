//! Copying file contents onto a connection.

use tokio::fs::File;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

/// Buffer size on both sides of the copy
const BUFFER_SIZE: usize = 8192;

/// Copies every byte of `file` to `out` in order, then flushes.
///
/// Returns the number of bytes copied. Any read or write error aborts the
/// transfer; there is no retry.
pub async fn send_file<W>(file: File, out: &mut W) -> anyhow::Result<u64>
where
    W: AsyncWrite + Unpin,
{
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut writer = BufWriter::with_capacity(BUFFER_SIZE, out);

    let copied = tokio::io::copy_buf(&mut reader, &mut writer).await?;
    writer.flush().await?;

    Ok(copied)
}
