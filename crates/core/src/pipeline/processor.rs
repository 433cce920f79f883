//! The ordered conversion pipeline.

use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

use super::barrier::TicketBarrier;
use super::cache::CultureCache;
use super::config::PipelineConfig;
use super::error::PipelineError;
use super::executor::ConversionExecutor;
use super::sink::OutputSink;
use super::types::{ConversionRequest, ErrorRecord, OutputRecord, PipelineSummary, RequestOutcome, Ticket};
use crate::culture::CultureLoader;
use crate::metrics::{MALFORMED_RECORDS, TURN_WAIT_DURATION};

/// Accepts conversion requests and writes their records in submission order.
///
/// Each submitted request becomes a task that resolves its culture, waits
/// for its turn, then executes. Resolution overlaps freely across requests;
/// execution and output are serialized by ticket.
///
/// All state (ticket counters, culture cache, halt flag) belongs to this
/// instance, so independent pipelines do not interact unless they are
/// built over a shared cache with [`ConversionPipeline::with_cache`].
pub struct ConversionPipeline {
    config: PipelineConfig,
    cache: Arc<CultureCache>,
    barrier: Arc<TicketBarrier>,
    executor: Arc<ConversionExecutor>,
    sink: Arc<dyn OutputSink>,
    tasks: JoinSet<Result<RequestOutcome, PipelineError>>,
    summary: PipelineSummary,
}

impl ConversionPipeline {
    /// Creates a pipeline with a fresh culture cache over `loader`.
    pub fn new(
        config: PipelineConfig,
        loader: Arc<dyn CultureLoader>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self::with_cache(config, Arc::new(CultureCache::new(loader)), sink)
    }

    /// Creates a pipeline that resolves cultures through an existing cache.
    pub fn with_cache(
        config: PipelineConfig,
        cache: Arc<CultureCache>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        let executor = Arc::new(ConversionExecutor::new(
            Arc::clone(&sink),
            config.halt_on_error,
        ));

        Self {
            config,
            cache,
            barrier: Arc::new(TicketBarrier::new()),
            executor,
            sink,
            tasks: JoinSet::new(),
            summary: PipelineSummary::default(),
        }
    }

    /// The culture cache used by this pipeline.
    pub fn cache(&self) -> &Arc<CultureCache> {
        &self.cache
    }

    /// The ticket barrier used by this pipeline.
    pub fn barrier(&self) -> &Arc<TicketBarrier> {
        &self.barrier
    }

    /// Format applied when a request names none.
    pub fn default_format(&self) -> &str {
        &self.config.default_format
    }

    /// Whether a failure has stopped the run.
    pub fn is_halted(&self) -> bool {
        self.executor.halted().is_some()
    }

    /// Tickets handed out so far.
    pub fn submitted(&self) -> u64 {
        self.barrier.issued()
    }

    /// Submits a request and returns its ticket without waiting for it.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(
        &mut self,
        culture_id: impl Into<String>,
        input: impl Into<String>,
        format: Option<String>,
    ) -> Ticket {
        let ticket = self.barrier.submit();
        let format = format.unwrap_or_else(|| self.config.default_format.clone());
        let request = ConversionRequest::new(ticket, culture_id, input, format);

        tracing::debug!(
            ticket,
            culture = %request.culture_id,
            format = %request.format,
            "Request submitted"
        );

        let cache = Arc::clone(&self.cache);
        let barrier = Arc::clone(&self.barrier);
        let executor = Arc::clone(&self.executor);

        self.tasks.spawn(async move {
            let resolved = cache.resolve(&request.culture_id).await;

            let wait_start = Instant::now();
            let turn = barrier.await_turn(request.ticket).await?;
            TURN_WAIT_DURATION.observe(wait_start.elapsed().as_secs_f64());

            Ok(executor.run(resolved, &request, turn).await?)
        });

        ticket
    }

    /// Writes an error record for input that never became a request.
    ///
    /// The record is written immediately, ahead of any pending tickets, and
    /// consumes no ticket.
    pub async fn reject(
        &mut self,
        input: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<(), PipelineError> {
        self.summary.rejected += 1;
        MALFORMED_RECORDS.inc();

        let record = OutputRecord::Error {
            ticket: None,
            record: ErrorRecord::new(message, input),
        };
        self.sink.emit(&record).await?;
        Ok(())
    }

    /// Waits for every submitted request and returns the run's counts.
    ///
    /// Returns `PipelineError::Halted` when halt-on-error stopped the run.
    pub async fn finish(mut self) -> Result<PipelineSummary, PipelineError> {
        let mut first_error = None;

        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(Ok(outcome)) => self.summary.record(outcome),
                Ok(Err(e)) => {
                    first_error.get_or_insert(e);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Request task failed");
                    first_error.get_or_insert(PipelineError::TaskFailed(e.to_string()));
                }
            }
        }

        self.summary.submitted = self.barrier.issued();
        let summary = self.summary;

        tracing::info!(
            submitted = summary.submitted,
            finished = summary.finished(),
            converted = summary.converted,
            failed = summary.failed,
            aborted = summary.aborted,
            rejected = summary.rejected,
            "Pipeline finished"
        );

        if let Some(e) = first_error {
            return Err(e);
        }
        if let Some(halt) = self.executor.halted() {
            return Err(PipelineError::Halted {
                ticket: halt.ticket,
                message: halt.message,
            });
        }
        Ok(summary)
    }
}

impl std::fmt::Debug for ConversionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionPipeline")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .field("barrier", &self.barrier)
            .field("pending", &self.tasks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockCultureLoader, MockSink};
    use std::time::Duration;

    fn pipeline(
        config: PipelineConfig,
    ) -> (ConversionPipeline, Arc<MockCultureLoader>, Arc<MockSink>) {
        let loader = Arc::new(MockCultureLoader::new());
        let sink = Arc::new(MockSink::new());
        let pipeline = ConversionPipeline::new(config, loader.clone(), sink.clone());
        (pipeline, loader, sink)
    }

    #[tokio::test]
    async fn test_submit_assigns_increasing_tickets() {
        let (mut pipeline, _, sink) = pipeline(PipelineConfig::default());
        let t1 = pipeline.submit("gregorian", "2024-01-01", None);
        let t2 = pipeline.submit("gregorian", "2024-01-02", None);
        assert_eq!((t1, t2), (1, 2));

        let summary = pipeline.finish().await.unwrap();
        assert_eq!(summary.submitted, 2);
        assert_eq!(summary.converted, 2);
        assert_eq!(sink.lines(), vec!["2460311", "2460312"]);
    }

    #[tokio::test]
    async fn test_default_format_applies() {
        let (mut pipeline, _, sink) =
            pipeline(PipelineConfig::default().with_default_format("%Y"));
        pipeline.submit("gregorian", "2024-01-01", None);
        pipeline.submit("gregorian", "2024-01-01", Some("jdn".to_string()));
        pipeline.finish().await.unwrap();
        assert_eq!(sink.lines(), vec!["2024", "2460311"]);
    }

    #[tokio::test]
    async fn test_slow_culture_keeps_order() {
        let (mut pipeline, loader, sink) = pipeline(PipelineConfig::default());
        loader.set_delay("slow", Duration::from_millis(50));

        pipeline.submit("slow", "2024-01-01", None);
        pipeline.submit("gregorian", "2024-06-15", None);
        pipeline.finish().await.unwrap();

        assert_eq!(sink.tickets(), vec![Some(1), Some(2)]);
        assert_eq!(sink.lines(), vec!["2460311", "2460477"]);
    }

    #[tokio::test]
    async fn test_failures_are_skipped_by_default() {
        let (mut pipeline, _, sink) = pipeline(PipelineConfig::default());
        pipeline.submit("gregorian", "2024-02-30", None);
        pipeline.submit("gregorian", "2024-01-01", None);

        let summary = pipeline.finish().await.unwrap();
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.converted, 1);
        let records = sink.records();
        assert!(records[0].is_error());
        assert_eq!(records[1].render(), "2460311");
    }

    #[tokio::test]
    async fn test_halt_on_error() {
        let (mut pipeline, _, sink) =
            pipeline(PipelineConfig::default().with_halt_on_error(true));
        pipeline.submit("gregorian", "2024-01-01", None);
        pipeline.submit("gregorian", "garbage", None);
        pipeline.submit("gregorian", "2024-01-02", None);

        let err = pipeline.finish().await.unwrap_err();
        assert!(matches!(err, PipelineError::Halted { ticket: 2, .. }));
        assert_eq!(sink.records().len(), 2);
    }

    #[tokio::test]
    async fn test_reject_writes_immediately() {
        let (mut pipeline, loader, sink) = pipeline(PipelineConfig::default());
        loader.set_delay("gregorian", Duration::from_millis(30));

        pipeline.submit("gregorian", "2024-01-01", None);
        pipeline.reject("{nope", "Malformed record").await.unwrap();

        let summary = pipeline.finish().await.unwrap();
        assert_eq!(summary.rejected, 1);
        assert_eq!(summary.submitted, 1);
        assert_eq!(sink.tickets(), vec![None, Some(1)]);
    }

    #[tokio::test]
    async fn test_pipelines_are_independent() {
        let (mut first, _, first_sink) = pipeline(PipelineConfig::default());
        let (mut second, _, second_sink) = pipeline(PipelineConfig::default());

        assert_eq!(first.submit("gregorian", "2024-01-01", None), 1);
        assert_eq!(second.submit("gregorian", "2023-12-31", None), 1);

        first.finish().await.unwrap();
        second.finish().await.unwrap();
        assert_eq!(first_sink.lines(), vec!["2460311"]);
        assert_eq!(second_sink.lines(), vec!["2460310"]);
    }

    #[tokio::test]
    async fn test_shared_cache_across_pipelines() {
        let loader = Arc::new(MockCultureLoader::new());
        let cache = Arc::new(CultureCache::new(loader.clone()));

        for _ in 0..2 {
            let sink = Arc::new(MockSink::new());
            let mut pipeline =
                ConversionPipeline::with_cache(PipelineConfig::default(), cache.clone(), sink);
            pipeline.submit("gregorian", "2024-01-01", None);
            pipeline.finish().await.unwrap();
        }

        assert_eq!(loader.load_count("gregorian"), 1);
    }
}
