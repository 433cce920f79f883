//! Mock culture loader for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::culture::{Culture, CultureDefinition, CultureError, CultureLoader, GregorianCulture};

#[derive(Debug, Default)]
struct LoaderState {
    delays: HashMap<String, Duration>,
    pending_failures: HashMap<String, u32>,
    unknown: HashSet<String>,
    definitions: HashMap<String, CultureDefinition>,
    loads: Vec<String>,
}

/// Mock implementation of the CultureLoader trait.
///
/// Every id loads as a Gregorian culture unless configured otherwise:
/// - per-id load latency
/// - a number of failures before loads succeed
/// - ids that do not exist
/// - custom definitions
///
/// Every invocation is recorded, including failed ones.
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use cultureconv_core::culture::{CultureError, CultureLoader};
/// use cultureconv_core::testing::MockCultureLoader;
///
/// # async fn run() -> Result<(), CultureError> {
/// let loader = MockCultureLoader::new();
/// loader.set_delay("slow", Duration::from_millis(50));
/// loader.fail_next("flaky", 1);
///
/// let _culture = loader.load_culture("slow").await?;
/// assert_eq!(loader.load_count("slow"), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockCultureLoader {
    state: Arc<Mutex<LoaderState>>,
}

impl MockCultureLoader {
    /// Create a new mock loader.
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, LoaderState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Delay every load of `id` by `delay`.
    pub fn set_delay(&self, id: &str, delay: Duration) {
        self.state().delays.insert(id.to_string(), delay);
    }

    /// Fail the next `times` loads of `id`.
    pub fn fail_next(&self, id: &str, times: u32) {
        self.state().pending_failures.insert(id.to_string(), times);
    }

    /// Make `id` unknown to the loader.
    pub fn set_unknown(&self, id: &str) {
        self.state().unknown.insert(id.to_string());
    }

    /// Load `id` from a custom definition.
    pub fn set_definition(&self, id: &str, definition: CultureDefinition) {
        self.state().definitions.insert(id.to_string(), definition);
    }

    /// Number of times `id` was loaded.
    pub fn load_count(&self, id: &str) -> usize {
        self.state().loads.iter().filter(|loaded| *loaded == id).count()
    }

    /// Every load in call order.
    pub fn loads(&self) -> Vec<String> {
        self.state().loads.clone()
    }
}

#[async_trait]
impl CultureLoader for MockCultureLoader {
    fn name(&self) -> &str {
        "mock"
    }

    async fn load_culture(&self, id: &str) -> Result<Arc<dyn Culture>, CultureError> {
        let delay = {
            let mut state = self.state();
            state.loads.push(id.to_string());
            state.delays.get(id).copied()
        };

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state();
        if let Some(remaining) = state.pending_failures.get_mut(id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(CultureError::Io(std::io::Error::other(
                    "simulated culture load failure",
                )));
            }
        }

        if state.unknown.contains(id) {
            return Err(CultureError::NotFound { id: id.to_string() });
        }

        let definition = state.definitions.get(id).cloned().unwrap_or_default();
        let culture = GregorianCulture::from_definition(id, definition)?;
        Ok(Arc::new(culture))
    }
}
