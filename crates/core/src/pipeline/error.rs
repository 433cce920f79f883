//! Error types for the pipeline module.

use thiserror::Error;

use super::types::Ticket;
use crate::culture::CultureError;

/// Why a single request could not be converted.
///
/// These never escape the pipeline; they become error records.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The request's culture could not be loaded.
    #[error("Failed to load culture {culture_id}: {source}")]
    CultureLoad {
        culture_id: String,
        #[source]
        source: CultureError,
    },

    /// The input does not parse under the culture.
    #[error("{0}")]
    Parse(#[source] CultureError),

    /// The instant could not be rendered with the requested pattern.
    #[error("{0}")]
    Format(#[source] CultureError),

    /// The instant could not be serialized as JSON.
    #[error("Failed to serialize instant: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Misuse of the ticket barrier.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BarrierError {
    /// The ticket was never handed out.
    #[error("Ticket {ticket} was never issued")]
    UnknownTicket { ticket: Ticket },

    /// The ticket has already completed.
    #[error("Ticket {ticket} already completed (completed through {completed_through})")]
    AlreadyCompleted {
        ticket: Ticket,
        completed_through: Ticket,
    },

    /// Only the ticket right after `completed_through` may advance.
    #[error("Ticket {ticket} cannot advance (completed through {completed_through})")]
    OutOfTurn {
        ticket: Ticket,
        completed_through: Ticket,
    },

    /// The barrier was dropped while a request waited on it.
    #[error("Barrier closed")]
    Closed,
}

/// Failure writing to the output sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// I/O error writing a record.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The sink no longer accepts records.
    #[error("Output sink closed")]
    Closed,
}

/// Errors that end a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Halt-on-error is enabled and a request failed.
    #[error("Halted at ticket {ticket}: {message}")]
    Halted { ticket: Ticket, message: String },

    /// Output could not be written.
    #[error("Output failed: {0}")]
    Sink(#[from] SinkError),

    /// The ticket barrier was misused.
    #[error("Ordering barrier error: {0}")]
    Barrier(#[from] BarrierError),

    /// A request task panicked or was cancelled.
    #[error("Request task failed: {0}")]
    TaskFailed(String),

    /// Reading request records failed.
    #[error("Failed to read requests: {0}")]
    Read(#[source] std::io::Error),
}
