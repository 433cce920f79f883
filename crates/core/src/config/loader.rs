use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix for environment overrides, e.g. `CULTURECONV_PIPELINE__HALT_ON_ERROR`.
pub const ENV_PREFIX: &str = "CULTURECONV_";

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "CULTURECONV_CONFIG";

/// Configuration file read when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "cultureconv.toml";

fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
}

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    figment(path)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from file if it exists, defaults otherwise.
/// Environment overrides apply either way.
pub fn load_config_or_default(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "No configuration file, using defaults");
    }

    figment(path)
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[data]
directory = "/usr/share/cultures"

[pipeline]
default_format = "json"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(
            config.data.directory,
            Some(PathBuf::from("/usr/share/cultures"))
        );
        assert_eq!(config.pipeline.default_format, "json");
        assert!(!config.pipeline.halt_on_error);
        assert_eq!(config.logging.filter, "warn");
    }

    #[test]
    fn test_load_config_from_str_empty() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_config_from_str_wrong_type() {
        let toml = r#"
[pipeline]
halt_on_error = "sometimes"
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/cultureconv.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[pipeline]
halt_on_error = true

[logging]
filter = "cultureconv_core=debug"
"#
        )
        .unwrap();

        // Jail serializes environment access with the override tests.
        Jail::expect_with(|_jail| {
            let config = load_config(temp_file.path()).map_err(|e| e.to_string())?;
            assert!(config.pipeline.halt_on_error);
            assert_eq!(config.pipeline.default_format, "jdn");
            assert_eq!(config.logging.filter, "cultureconv_core=debug");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        Jail::expect_with(|_jail| {
            let config = load_config_or_default(Path::new("absent.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn test_env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "cultureconv.toml",
                r#"
[pipeline]
default_format = "%Y"
"#,
            )?;
            jail.set_env("CULTURECONV_PIPELINE__DEFAULT_FORMAT", "json");
            jail.set_env("CULTURECONV_PIPELINE__HALT_ON_ERROR", "true");
            jail.set_env("CULTURECONV_DATA__DIRECTORY", "cultures");

            let config = load_config(Path::new("cultureconv.toml")).map_err(|e| e.to_string())?;
            assert_eq!(config.pipeline.default_format, "json");
            assert!(config.pipeline.halt_on_error);
            assert_eq!(config.data.directory, Some(PathBuf::from("cultures")));
            Ok(())
        });
    }

    #[test]
    fn test_config_path_variable_is_ignored_by_extraction() {
        Jail::expect_with(|jail| {
            jail.set_env(CONFIG_ENV_VAR, "elsewhere.toml");
            let config = load_config_or_default(Path::new(DEFAULT_CONFIG_PATH)).map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }
}
