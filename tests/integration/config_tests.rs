//! Configuration layering and validation tests

#[cfg(test)]
mod tests {
    use crate::common::numbered_range;
    use gridprobe::config::{EngineConfig, LogFormat};
    use gridprobe::{Config, Engine, GridError};
    use std::io::Write;
    use tempfile::NamedTempFile;

    // ==================== Layering ====================

    /// Environment values override the file where they are set
    #[tokio::test]
    async fn test_file_then_environment() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"engine:\n  concurrency: 2\nprobes:\n  http_timeout_secs: 4\n")
            .unwrap();

        let config = Config::from_file(file.path())
            .await
            .unwrap()
            .with_lookup(|key| match key {
                "GRIDPROBE_CONCURRENCY" => Some("6".to_string()),
                "GRIDPROBE_LOG_FORMAT" => Some("json".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.engine.concurrency, 6);
        assert_eq!(config.probes.http_timeout_secs, 4);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.validate().is_ok());
    }

    /// Serialized configuration loads back unchanged
    #[tokio::test]
    async fn test_yaml_export_reloads() {
        let mut config = Config::default();
        config.engine.concurrency = 3;
        config.probes.ffprobe_path = "/opt/bin/ffprobe".to_string();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(config.to_yaml().unwrap().as_bytes()).unwrap();

        let loaded = Config::from_file(file.path()).await.unwrap();
        assert_eq!(loaded, config);
    }

    /// Setting the environment to the default still replaces a file value
    #[tokio::test]
    async fn test_environment_restores_automatic_concurrency() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"engine:\n  concurrency: 4\n").unwrap();

        let config = Config::from_file(file.path())
            .await
            .unwrap()
            .with_lookup(|key| (key == "GRIDPROBE_CONCURRENCY").then(|| "0".to_string()))
            .unwrap();
        assert_eq!(config.engine.concurrency, 0);
    }

    /// A file that is not YAML is a configuration failure, not an input error
    #[tokio::test]
    async fn test_malformed_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"engine:\n  concurrency: lots\n").unwrap();

        let err = Config::from_file(file.path()).await.unwrap_err();
        assert!(matches!(err, GridError::Yaml(_)));
        assert!(!err.is_input_error());
    }

    // ==================== Validation ====================

    /// An unknown log level fails the whole configuration
    #[test]
    fn test_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "chatty".to_string();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, GridError::Config(_)));
        assert!(!err.is_input_error());
    }

    // ==================== Engine sizing ====================

    /// Configured concurrency is clamped to the item count
    #[test]
    fn test_engine_from_config_clamps() {
        let config = EngineConfig { concurrency: 64 };
        let engine = Engine::from_config(&numbered_range(5), &config).unwrap();
        assert_eq!(engine.concurrency(), 5);
    }
}
