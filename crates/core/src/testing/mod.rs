//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the pipeline's collaborator
//! traits, allowing ordering and caching behavior to be tested without culture
//! data on disk or a real output stream.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use cultureconv_core::pipeline::{ConversionPipeline, PipelineConfig, PipelineError};
//! use cultureconv_core::testing::{MockCultureLoader, MockSink};
//!
//! # async fn run() -> Result<(), PipelineError> {
//! let loader = Arc::new(MockCultureLoader::new());
//! let sink = Arc::new(MockSink::new());
//! loader.set_delay("slow", Duration::from_millis(50));
//!
//! let mut pipeline = ConversionPipeline::new(PipelineConfig::default(), loader.clone(), sink.clone());
//! pipeline.submit("slow", "2024-01-01", None);
//! pipeline.submit("gregorian", "2024-01-02", None);
//! pipeline.finish().await?;
//!
//! assert_eq!(sink.tickets(), vec![Some(1), Some(2)]);
//! # Ok(())
//! # }
//! ```

mod mock_loader;
mod mock_sink;

pub use mock_loader::MockCultureLoader;
pub use mock_sink::MockSink;
