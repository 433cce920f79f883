//! Trait definitions for the culture module.

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

use super::error::CultureError;
use super::types::Instant;

/// A resolved calendar/locale ruleset.
pub trait Culture: Send + Sync + fmt::Debug {
    /// Returns the id this culture was loaded under.
    fn id(&self) -> &str;

    /// Parses text into an instant.
    fn parse_instant(&self, text: &str) -> Result<Instant, CultureError>;

    /// Renders an instant with a culture-specific pattern.
    fn format_instant(&self, instant: &Instant, pattern: &str) -> Result<String, CultureError>;
}

/// A provider that can load cultures by id.
#[async_trait]
pub trait CultureLoader: Send + Sync {
    /// Returns the name of this loader implementation.
    fn name(&self) -> &str;

    /// Loads the culture registered under `id`.
    ///
    /// May take arbitrarily long. Callers that need memoization go through
    /// `CultureCache`.
    async fn load_culture(&self, id: &str) -> Result<Arc<dyn Culture>, CultureError>;
}
