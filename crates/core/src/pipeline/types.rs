//! Types for the pipeline module.

use serde::{Deserialize, Serialize};

/// Position of a request in submission order. The first ticket is 1.
pub type Ticket = u64;

/// Format used when a request does not name one.
pub const DEFAULT_FORMAT: &str = "jdn";

/// A single conversion, fixed at submission time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    /// Ordering key assigned by the barrier.
    pub ticket: Ticket,
    /// Culture id, case-sensitive.
    pub culture_id: String,
    /// Text to parse.
    pub input: String,
    /// Output format keyword or pattern.
    pub format: String,
}

impl ConversionRequest {
    /// Creates a request.
    pub fn new(
        ticket: Ticket,
        culture_id: impl Into<String>,
        input: impl Into<String>,
        format: impl Into<String>,
    ) -> Self {
        Self {
            ticket,
            culture_id: culture_id.into(),
            input: input.into(),
            format: format.into(),
        }
    }

    /// The interpreted output format.
    pub fn output_format(&self) -> OutputFormat<'_> {
        OutputFormat::parse(&self.format)
    }
}

/// How a parsed instant is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat<'a> {
    /// The linear day count ("jdn" or "julian").
    JulianDay,
    /// Every field of the instant as JSON ("json").
    Json,
    /// A culture formatting pattern.
    Pattern(&'a str),
}

impl<'a> OutputFormat<'a> {
    /// Interprets a format string; keywords match case-insensitively.
    pub fn parse(format: &'a str) -> Self {
        if format.eq_ignore_ascii_case("jdn") || format.eq_ignore_ascii_case("julian") {
            Self::JulianDay
        } else if format.eq_ignore_ascii_case("json") {
            Self::Json
        } else {
            Self::Pattern(format)
        }
    }
}

/// Error line payload: `{"error":true,"message":...,"input":...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error: bool,
    pub message: String,
    pub input: String,
}

impl ErrorRecord {
    /// Creates an error record.
    pub fn new(message: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            error: true,
            message: message.into(),
            input: input.into(),
        }
    }
}

/// One line of output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputRecord {
    /// A successful conversion.
    Value {
        ticket: Ticket,
        text: String,
    },
    /// A failed conversion; `ticket` is `None` for records that never entered
    /// the pipeline (malformed stream lines).
    Error {
        ticket: Option<Ticket>,
        record: ErrorRecord,
    },
}

impl OutputRecord {
    /// Ticket of the request that produced this record.
    pub fn ticket(&self) -> Option<Ticket> {
        match self {
            Self::Value { ticket, .. } => Some(*ticket),
            Self::Error { ticket, .. } => *ticket,
        }
    }

    /// Whether this is an error record.
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    /// Renders the record as a single output line, without a trailing newline.
    pub fn render(&self) -> String {
        match self {
            Self::Value { text, .. } => text.clone(),
            // Serializing a struct of strings and a bool cannot fail.
            Self::Error { record, .. } => serde_json::to_string(record).unwrap_or_default(),
        }
    }
}

/// Terminal state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestOutcome {
    /// A value record was written.
    Converted,
    /// An error record was written.
    Failed,
    /// Nothing was written because the pipeline halted on an earlier ticket.
    Aborted,
}

impl RequestOutcome {
    /// Label used for metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Converted => "converted",
            Self::Failed => "failed",
            Self::Aborted => "aborted",
        }
    }
}

/// Counts for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Tickets handed out.
    pub submitted: u64,
    pub converted: u64,
    pub failed: u64,
    pub aborted: u64,
    /// Streaming lines rejected without a ticket.
    pub rejected: u64,
}

impl PipelineSummary {
    /// Records the outcome of one request.
    pub fn record(&mut self, outcome: RequestOutcome) {
        match outcome {
            RequestOutcome::Converted => self.converted += 1,
            RequestOutcome::Failed => self.failed += 1,
            RequestOutcome::Aborted => self.aborted += 1,
        }
    }

    /// Requests that have reached a terminal state.
    pub fn finished(&self) -> u64 {
        self.converted + self.failed + self.aborted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_keywords() {
        assert_eq!(OutputFormat::parse("jdn"), OutputFormat::JulianDay);
        assert_eq!(OutputFormat::parse("JDN"), OutputFormat::JulianDay);
        assert_eq!(OutputFormat::parse("Julian"), OutputFormat::JulianDay);
        assert_eq!(OutputFormat::parse("JSON"), OutputFormat::Json);
        assert_eq!(OutputFormat::parse("%Y"), OutputFormat::Pattern("%Y"));
        assert_eq!(OutputFormat::parse(""), OutputFormat::Pattern(""));
    }

    #[test]
    fn test_error_record_render() {
        let record = OutputRecord::Error {
            ticket: Some(3),
            record: ErrorRecord::new("bad date", "2024-02-30"),
        };
        assert_eq!(
            record.render(),
            r#"{"error":true,"message":"bad date","input":"2024-02-30"}"#
        );
        assert!(record.is_error());
        assert_eq!(record.ticket(), Some(3));
    }

    #[test]
    fn test_value_record_render() {
        let record = OutputRecord::Value {
            ticket: 1,
            text: "2460311".to_string(),
        };
        assert_eq!(record.render(), "2460311");
        assert!(!record.is_error());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = PipelineSummary {
            submitted: 3,
            ..Default::default()
        };
        summary.record(RequestOutcome::Converted);
        summary.record(RequestOutcome::Failed);
        summary.record(RequestOutcome::Aborted);
        assert_eq!(summary.finished(), 3);
        assert_eq!(summary.failed, 1);
    }
}
