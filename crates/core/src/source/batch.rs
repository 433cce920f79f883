//! Batch request source: one culture, many inputs, one format.

use crate::pipeline::{ConversionPipeline, PipelineError, PipelineSummary};

/// A fixed list of inputs converted under a single culture.
#[derive(Debug, Clone)]
pub struct BatchSource {
    culture_id: String,
    inputs: Vec<String>,
    format: Option<String>,
}

impl BatchSource {
    /// Creates a batch over `inputs`, in order.
    pub fn new<I, S>(culture_id: impl Into<String>, inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            culture_id: culture_id.into(),
            inputs: inputs.into_iter().map(Into::into).collect(),
            format: None,
        }
    }

    /// Uses `format` for every input instead of the pipeline default.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Number of inputs in the batch.
    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    /// Whether the batch has no inputs.
    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }

    /// Submits every input, then waits for all of them.
    ///
    /// Submission does not wait on resolution, so every input's culture
    /// lookup starts immediately.
    pub async fn run(self, mut pipeline: ConversionPipeline) -> Result<PipelineSummary, PipelineError> {
        tracing::debug!(
            culture = %self.culture_id,
            inputs = self.inputs.len(),
            "Submitting batch"
        );

        for input in self.inputs {
            pipeline.submit(self.culture_id.clone(), input, self.format.clone());
        }

        pipeline.finish().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineConfig;
    use crate::testing::{MockCultureLoader, MockSink};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_batch_in_order() {
        let loader = Arc::new(MockCultureLoader::new());
        let sink = Arc::new(MockSink::new());
        let pipeline = ConversionPipeline::new(PipelineConfig::default(), loader.clone(), sink.clone());

        let batch = BatchSource::new("gregorian", ["2024-01-01", "2024-06-15", "2023-12-31"]);
        assert_eq!(batch.len(), 3);
        let summary = batch.run(pipeline).await.unwrap();

        assert_eq!(summary.converted, 3);
        assert_eq!(sink.lines(), vec!["2460311", "2460477", "2460310"]);
        assert_eq!(loader.load_count("gregorian"), 1);
    }

    #[tokio::test]
    async fn test_batch_shared_format() {
        let loader = Arc::new(MockCultureLoader::new());
        let sink = Arc::new(MockSink::new());
        let pipeline = ConversionPipeline::new(PipelineConfig::default(), loader, sink.clone());

        BatchSource::new("gregorian", ["2024-01-01", "2024-01-02"])
            .with_format("%a")
            .run(pipeline)
            .await
            .unwrap();

        assert_eq!(sink.lines(), vec!["Mon", "Tue"]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let loader = Arc::new(MockCultureLoader::new());
        let sink = Arc::new(MockSink::new());
        let pipeline = ConversionPipeline::new(PipelineConfig::default(), loader.clone(), sink.clone());

        let batch = BatchSource::new("gregorian", Vec::<String>::new());
        assert!(batch.is_empty());
        let summary = batch.run(pipeline).await.unwrap();

        assert_eq!(summary.submitted, 0);
        assert!(sink.records().is_empty());
        assert!(loader.loads().is_empty());
    }
}
