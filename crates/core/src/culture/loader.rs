//! Filesystem-backed culture loader with built-in fallbacks.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::error::CultureError;
use super::gregorian::GregorianCulture;
use super::traits::{Culture, CultureLoader};
use super::types::CultureDefinition;

/// Ids of the cultures available without a data directory.
pub const BUILTIN_CULTURES: &[&str] = &["gregorian", "en-US"];

/// Returns the definition of a built-in culture.
pub fn builtin_definition(id: &str) -> Option<CultureDefinition> {
    match id {
        "gregorian" => Some(CultureDefinition::default().with_name("Gregorian (ISO 8601)")),
        "en-US" => Some(
            CultureDefinition::default()
                .with_name("English (United States)")
                .with_date_formats(["%m/%d/%Y", "%B %d, %Y"]),
        ),
        _ => None,
    }
}

/// Loads cultures from `<data_dir>/<id>.toml`, falling back to built-ins.
///
/// A definition file in the data directory shadows a built-in of the same id.
#[derive(Debug, Clone, Default)]
pub struct DirectoryCultureLoader {
    data_dir: Option<PathBuf>,
}

impl DirectoryCultureLoader {
    /// Creates a loader reading from `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: Some(data_dir.into()),
        }
    }

    /// Creates a loader that only knows the built-in cultures.
    pub fn builtin_only() -> Self {
        Self { data_dir: None }
    }

    /// Returns the data directory, if any.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    fn definition_path(&self, id: &str) -> Option<PathBuf> {
        self.data_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.toml", id)))
    }

    async fn read_definition(path: &Path) -> Result<Option<CultureDefinition>, CultureError> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        toml::from_str(&contents)
            .map(Some)
            .map_err(|e| CultureError::invalid_definition(path, e.to_string()))
    }
}

/// Rejects ids that cannot be used as a file stem inside the data directory.
fn validate_id(id: &str) -> Result<(), CultureError> {
    let invalid = id.is_empty()
        || id.contains(['/', '\\'])
        || id.contains("..")
        || id.chars().any(char::is_control);

    if invalid {
        return Err(CultureError::InvalidId { id: id.to_string() });
    }
    Ok(())
}

#[async_trait]
impl CultureLoader for DirectoryCultureLoader {
    fn name(&self) -> &str {
        "directory"
    }

    async fn load_culture(&self, id: &str) -> Result<Arc<dyn Culture>, CultureError> {
        validate_id(id)?;

        if let Some(path) = self.definition_path(id) {
            if let Some(definition) = Self::read_definition(&path).await? {
                tracing::debug!(culture = id, path = %path.display(), "Loaded culture definition");
                let culture = GregorianCulture::from_definition(id, definition)?;
                return Ok(Arc::new(culture));
            }
        }

        match builtin_definition(id) {
            Some(definition) => {
                tracing::debug!(culture = id, "Using built-in culture");
                Ok(Arc::new(GregorianCulture::from_definition(id, definition)?))
            }
            None => Err(CultureError::NotFound { id: id.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_builtin_cultures() {
        let loader = DirectoryCultureLoader::builtin_only();
        for id in BUILTIN_CULTURES {
            let culture = loader.load_culture(id).await.unwrap();
            assert_eq!(culture.id(), *id);
        }

        let us = loader.load_culture("en-US").await.unwrap();
        assert_eq!(us.parse_instant("06/15/2024").unwrap().julian_day, 2_460_477);
        assert_eq!(
            us.parse_instant("June 15, 2024").unwrap().julian_day,
            2_460_477
        );
    }

    #[tokio::test]
    async fn test_unknown_culture() {
        let loader = DirectoryCultureLoader::builtin_only();
        let err = loader.load_culture("klingon").await.unwrap_err();
        assert!(matches!(err, CultureError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_rejects_path_like_ids() {
        let loader = DirectoryCultureLoader::builtin_only();
        for id in ["", "../etc/passwd", "a/b", "a\\b"] {
            let err = loader.load_culture(id).await.unwrap_err();
            assert!(matches!(err, CultureError::InvalidId { .. }), "id {:?}", id);
        }
    }

    #[tokio::test]
    async fn test_loads_definition_from_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("de-DE.toml"),
            r#"
name = "Deutsch"
date_formats = ["%d.%m.%Y"]
"#,
        )
        .unwrap();

        let loader = DirectoryCultureLoader::new(dir.path());
        let culture = loader.load_culture("de-DE").await.unwrap();
        assert_eq!(
            culture.parse_instant("31.12.2023").unwrap().julian_day,
            2_460_310
        );

        // Built-ins remain reachable through a data directory.
        assert!(loader.load_culture("gregorian").await.is_ok());
    }

    #[tokio::test]
    async fn test_directory_shadows_builtin() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("gregorian.toml"),
            "date_formats = [\"%Y/%m/%d\"]\n",
        )
        .unwrap();

        let loader = DirectoryCultureLoader::new(dir.path());
        let culture = loader.load_culture("gregorian").await.unwrap();
        assert!(culture.parse_instant("2024/01/01").is_ok());
        assert!(culture.parse_instant("2024-01-01").is_err());
    }

    #[tokio::test]
    async fn test_invalid_definition() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("broken.toml"), "date_formats = 12").unwrap();
        std::fs::write(dir.path().join("lunar.toml"), "calendar = \"lunar\"").unwrap();

        let loader = DirectoryCultureLoader::new(dir.path());
        assert!(matches!(
            loader.load_culture("broken").await.unwrap_err(),
            CultureError::InvalidDefinition { .. }
        ));
        assert!(matches!(
            loader.load_culture("lunar").await.unwrap_err(),
            CultureError::UnsupportedCalendar { .. }
        ));
    }
}
