//! Streaming request source: newline-delimited JSON records.

use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::pipeline::{ConversionPipeline, PipelineError, PipelineSummary};

/// One streaming record: `{"culture": ..., "input": ..., "format"?: ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRecord {
    pub culture: String,
    pub input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

/// Reads records line by line until a blank line or end of input.
///
/// Valid records are submitted as they arrive. A line that is not a valid
/// record gets an immediate error record and no ticket; reading continues.
pub struct StreamSource<R> {
    reader: R,
}

impl<R> StreamSource<R>
where
    R: AsyncBufRead + Unpin,
{
    /// Wraps a line reader.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Consumes the stream, then waits for every submitted request.
    ///
    /// Stops reading early once the pipeline has halted. A read error stops
    /// reading too; requests already submitted still complete before the
    /// error is returned.
    pub async fn run(self, mut pipeline: ConversionPipeline) -> Result<PipelineSummary, PipelineError> {
        let mut reader = self.reader;
        let mut buf = Vec::new();
        let mut line_number = 0usize;
        let mut stopped_by = None;

        loop {
            if pipeline.is_halted() {
                tracing::debug!(line = line_number, "Pipeline halted, no longer reading records");
                break;
            }

            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    tracing::debug!(line = line_number, "End of input");
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(line = line_number, error = %e, "Failed to read record");
                    stopped_by = Some(PipelineError::Read(e));
                    break;
                }
            }
            line_number += 1;

            let raw = trim_line_ending(&buf);
            let line = match std::str::from_utf8(raw) {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!(line = line_number, error = %e, "Record is not valid UTF-8");
                    let input = String::from_utf8_lossy(raw).into_owned();
                    if let Err(e) = pipeline
                        .reject(input, "Malformed record: invalid UTF-8")
                        .await
                    {
                        stopped_by = Some(e);
                        break;
                    }
                    continue;
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                tracing::debug!(line = line_number, "Blank line, ending stream");
                break;
            }

            match serde_json::from_str::<StreamRecord>(trimmed) {
                Ok(record) => {
                    pipeline.submit(record.culture, record.input, record.format);
                }
                Err(e) => {
                    tracing::warn!(line = line_number, error = %e, "Malformed record");
                    if let Err(e) = pipeline
                        .reject(line, format!("Malformed record: {}", e))
                        .await
                    {
                        stopped_by = Some(e);
                        break;
                    }
                }
            }
        }

        let summary = pipeline.finish().await?;
        match stopped_by {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }
}

/// Strips a trailing `\n` or `\r\n`.
fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
