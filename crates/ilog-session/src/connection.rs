//! Line-oriented halves of the server connection.
//!
//! Receiving is newline-delimited (a trailing CR is dropped, invalid UTF-8
//! is replaced); sending appends CRLF and flushes every line.

use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader,
};
use tracing::{trace, warn};

use crate::error::SessionError;

/// Longest inbound line kept. Anything past it, up to the next newline, is
/// discarded.
pub const MAX_LINE_BYTES: u64 = 8192;

/// Reads protocol lines from the server.
pub struct LineReader<R> {
    reader: BufReader<R>,
    buf: Vec<u8>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(read: R) -> Self {
        Self {
            reader: BufReader::new(read),
            buf: Vec::with_capacity(512),
        }
    }

    /// Next line without its terminator, or `None` at end-of-stream.
    pub async fn next_line(&mut self) -> Result<Option<String>, SessionError> {
        self.buf.clear();
        let n = (&mut self.reader)
            .take(MAX_LINE_BYTES)
            .read_until(b'\n', &mut self.buf)
            .await
            .map_err(SessionError::Receive)?;
        if n == 0 {
            return Ok(None);
        }
        if n as u64 == MAX_LINE_BYTES && self.buf.last() != Some(&b'\n') {
            let skipped = self.skip_rest_of_line().await?;
            warn!(limit = MAX_LINE_BYTES, skipped, "overlong line truncated");
        }

        let mut end = self.buf.len();
        while end > 0 && matches!(self.buf[end - 1], b'\n' | b'\r') {
            end -= 1;
        }
        let line = String::from_utf8_lossy(&self.buf[..end]).into_owned();
        trace!(line = %line, "recv");
        Ok(Some(line))
    }

    /// Consume input through the next newline (or end-of-stream).
    async fn skip_rest_of_line(&mut self) -> Result<usize, SessionError> {
        let mut skipped = 0;
        loop {
            let (used, found) = {
                let available = self.reader.fill_buf().await.map_err(SessionError::Receive)?;
                if available.is_empty() {
                    return Ok(skipped);
                }
                match available.iter().position(|&b| b == b'\n') {
                    Some(i) => (i + 1, true),
                    None => (available.len(), false),
                }
            };
            self.reader.consume(used);
            skipped += used;
            if found {
                return Ok(skipped);
            }
        }
    }
}

/// Writes protocol lines to the server.
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(write: W) -> Self {
        Self { writer: write }
    }

    /// Send one line, CRLF-terminated, and flush.
    pub async fn send(&mut self, line: &str) -> Result<(), SessionError> {
        trace!(line = %line, "send");
        let mut bytes = Vec::with_capacity(line.len() + 2);
        bytes.extend_from_slice(line.as_bytes());
        bytes.extend_from_slice(b"\r\n");
        self.writer
            .write_all(&bytes)
            .await
            .map_err(SessionError::Send)?;
        self.writer.flush().await.map_err(SessionError::Send)
    }

    pub async fn shutdown(&mut self) -> std::io::Result<()> {
        self.writer.shutdown().await
    }
}
