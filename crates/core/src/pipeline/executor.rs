//! Executes one request inside its turn and writes its record.

use std::sync::{Arc, Mutex, PoisonError};

use super::barrier::Turn;
use super::error::{ConversionError, SinkError};
use super::sink::OutputSink;
use super::types::{ConversionRequest, ErrorRecord, OutputFormat, OutputRecord, RequestOutcome, Ticket};
use crate::culture::{Culture, CultureError};
use crate::metrics::REQUESTS_TOTAL;

/// The request that stopped a run with halt-on-error enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Halt {
    pub ticket: Ticket,
    pub message: String,
}

/// Parses and formats requests, writing exactly one record per request.
pub struct ConversionExecutor {
    sink: Arc<dyn OutputSink>,
    halt_on_error: bool,
    halt: Mutex<Option<Halt>>,
}

impl ConversionExecutor {
    /// Creates an executor writing to `sink`.
    pub fn new(sink: Arc<dyn OutputSink>, halt_on_error: bool) -> Self {
        Self {
            sink,
            halt_on_error,
            halt: Mutex::new(None),
        }
    }

    /// Parses the request input and renders it in the requested format.
    pub fn convert(
        culture: &dyn Culture,
        request: &ConversionRequest,
    ) -> Result<String, ConversionError> {
        let instant = culture
            .parse_instant(&request.input)
            .map_err(ConversionError::Parse)?;

        match request.output_format() {
            OutputFormat::JulianDay => Ok(instant.julian_day.to_string()),
            OutputFormat::Json => Ok(serde_json::to_string(&instant)?),
            OutputFormat::Pattern(pattern) => culture
                .format_instant(&instant, pattern)
                .map_err(ConversionError::Format),
        }
    }

    /// Runs `request` with its resolved culture and releases `turn`.
    ///
    /// A failed culture resolution is reported as the request's error record.
    /// The turn is released on every path, including when the sink fails.
    pub async fn run(
        &self,
        resolved: Result<Arc<dyn Culture>, CultureError>,
        request: &ConversionRequest,
        turn: Turn,
    ) -> Result<RequestOutcome, SinkError> {
        let outcome = self.execute(resolved, request).await;

        if let Err(e) = turn.complete() {
            tracing::warn!(ticket = request.ticket, error = %e, "Failed to release turn");
        }

        if let Ok(outcome) = &outcome {
            REQUESTS_TOTAL.with_label_values(&[outcome.as_str()]).inc();
        }
        outcome
    }

    async fn execute(
        &self,
        resolved: Result<Arc<dyn Culture>, CultureError>,
        request: &ConversionRequest,
    ) -> Result<RequestOutcome, SinkError> {
        if let Some(halt) = self.halted() {
            tracing::debug!(
                ticket = request.ticket,
                halted_at = halt.ticket,
                "Skipping request after halt"
            );
            return Ok(RequestOutcome::Aborted);
        }

        tracing::debug!(ticket = request.ticket, culture = %request.culture_id, "Executing request");

        let result = resolved
            .map_err(|source| ConversionError::CultureLoad {
                culture_id: request.culture_id.clone(),
                source,
            })
            .and_then(|culture| Self::convert(culture.as_ref(), request));

        let (record, outcome) = match result {
            Ok(text) => (
                OutputRecord::Value {
                    ticket: request.ticket,
                    text,
                },
                RequestOutcome::Converted,
            ),
            Err(e) => {
                tracing::warn!(
                    ticket = request.ticket,
                    culture = %request.culture_id,
                    input = %request.input,
                    error = %e,
                    "Conversion failed"
                );
                if self.halt_on_error {
                    self.set_halt(request.ticket, e.to_string());
                }
                (
                    OutputRecord::Error {
                        ticket: Some(request.ticket),
                        record: ErrorRecord::new(e.to_string(), request.input.clone()),
                    },
                    RequestOutcome::Failed,
                )
            }
        };

        if let Err(e) = self.sink.emit(&record).await {
            tracing::error!(ticket = request.ticket, error = %e, "Failed to write record");
            self.set_halt(request.ticket, e.to_string());
            return Err(e);
        }

        Ok(outcome)
    }

    fn set_halt(&self, ticket: Ticket, message: String) {
        let mut halt = self.halt.lock().unwrap_or_else(PoisonError::into_inner);
        if halt.is_none() {
            *halt = Some(Halt { ticket, message });
        }
    }

    /// The halt recorded so far, if any.
    pub fn halted(&self) -> Option<Halt> {
        self.halt
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
