use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Default output format is not blank
/// - Data directory, when set, is an existing directory
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.pipeline.default_format.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "pipeline.default_format cannot be empty".to_string(),
        ));
    }

    if let Some(directory) = &config.data.directory {
        if !directory.is_dir() {
            return Err(ConfigError::ValidationError(format!(
                "data.directory is not a directory: {}",
                directory.display()
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DataConfig;
    use crate::pipeline::PipelineConfig;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_blank_format_fails() {
        let config = Config {
            pipeline: PipelineConfig::default().with_default_format("  "),
            ..Config::default()
        };
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_validate_data_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data: DataConfig {
                directory: Some(dir.path().to_path_buf()),
            },
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());

        let file = tempfile::NamedTempFile::new().unwrap();
        let config = Config {
            data: DataConfig {
                directory: Some(file.path().to_path_buf()),
            },
            ..Config::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
