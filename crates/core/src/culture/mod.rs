//! Culture module: calendar/locale rulesets that parse and format instants.
//!
//! The pipeline only depends on the two traits defined here:
//! - `CultureLoader` resolves an id to a culture, asynchronously and fallibly
//! - `Culture` parses text to an `Instant` and formats it back
//!
//! `DirectoryCultureLoader` is the bundled provider. It reads TOML culture
//! definitions from a data directory and falls back to built-in cultures.
//!
//! # Example
//!
//! ```no_run
//! use cultureconv_core::culture::{Culture, CultureLoader, DirectoryCultureLoader};
//!
//! # async fn run() -> Result<(), cultureconv_core::culture::CultureError> {
//! let loader = DirectoryCultureLoader::builtin_only();
//! let culture = loader.load_culture("gregorian").await?;
//! let instant = culture.parse_instant("2024-01-01")?;
//! assert_eq!(instant.julian_day, 2460311);
//! println!("{}", culture.format_instant(&instant, "%A, %B %d")?);
//! # Ok(())
//! # }
//! ```

mod error;
mod gregorian;
mod loader;
mod traits;
mod types;

pub use error::CultureError;
pub use gregorian::{date_from_julian_day, GregorianCulture};
pub use loader::{builtin_definition, DirectoryCultureLoader, BUILTIN_CULTURES};
pub use traits::{Culture, CultureLoader};
pub use types::{CalendarKind, CultureDefinition, Instant, JDN_CE_OFFSET};
