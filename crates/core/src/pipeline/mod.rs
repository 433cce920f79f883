//! Pipeline module: ordered, cached, asynchronous conversions.
//!
//! This module provides the `ConversionPipeline` which coordinates:
//! - Ticketing: every request gets a strictly increasing ticket on submission
//! - Resolution: cultures are loaded through a memoizing `CultureCache`
//! - Ordering: a `TicketBarrier` lets each request execute only after every
//!   earlier ticket has completed
//! - Execution: the `ConversionExecutor` parses, formats and writes exactly
//!   one record per request, then releases its turn
//!
//! Resolution runs concurrently across requests, so a slow culture load only
//! delays the requests after it, never reorders them.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use cultureconv_core::culture::DirectoryCultureLoader;
//! use cultureconv_core::pipeline::{ConversionPipeline, LineSink, PipelineConfig, PipelineError};
//!
//! # async fn run() -> Result<(), PipelineError> {
//! let loader = Arc::new(DirectoryCultureLoader::builtin_only());
//! let sink = Arc::new(LineSink::stdout());
//! let mut pipeline = ConversionPipeline::new(PipelineConfig::default(), loader, sink);
//!
//! pipeline.submit("gregorian", "2024-01-01", None);
//! pipeline.submit("en-US", "06/15/2024", Some("json".to_string()));
//!
//! let summary = pipeline.finish().await?;
//! println!("Converted: {}", summary.converted);
//! # Ok(())
//! # }
//! ```

mod barrier;
mod cache;
mod config;
mod error;
mod executor;
mod processor;
mod sink;
mod types;

pub use barrier::{TicketBarrier, Turn};
pub use cache::{CacheStats, CultureCache};
pub use config::PipelineConfig;
pub use error::{BarrierError, ConversionError, PipelineError, SinkError};
pub use executor::{ConversionExecutor, Halt};
pub use processor::ConversionPipeline;
pub use sink::{LineSink, OutputSink};
pub use types::{
    ConversionRequest, ErrorRecord, OutputFormat, OutputRecord, PipelineSummary,
    RequestOutcome, Ticket, DEFAULT_FORMAT,
};
