pub mod config;
pub mod culture;
pub mod metrics;
pub mod pipeline;
pub mod source;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, DataConfig, LoggingConfig, CONFIG_ENV_VAR, DEFAULT_CONFIG_PATH,
};
pub use culture::{
    Culture, CultureDefinition, CultureError, CultureLoader, DirectoryCultureLoader,
    GregorianCulture, Instant,
};
pub use pipeline::{
    ConversionPipeline, CultureCache, LineSink, OutputRecord, OutputSink, PipelineConfig,
    PipelineError, PipelineSummary, Ticket, TicketBarrier,
};
pub use source::{BatchSource, StreamRecord, StreamSource};
