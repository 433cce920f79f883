//! Output sinks for conversion records.

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use super::error::SinkError;
use super::types::OutputRecord;

/// Destination for output records, one line each.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Writes one record.
    async fn emit(&self, record: &OutputRecord) -> Result<(), SinkError>;
}

/// Writes rendered records as newline-terminated lines to an async writer.
///
/// Each record is flushed before `emit` returns so that a consumer reading
/// the other end of a pipe sees results as soon as they are produced.
pub struct LineSink<W> {
    writer: Mutex<W>,
}

impl<W> LineSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl LineSink<tokio::io::Stdout> {
    /// A sink writing to the process's standard output.
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> OutputSink for LineSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn emit(&self, record: &OutputRecord) -> Result<(), SinkError> {
        let mut line = record.render();
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}
