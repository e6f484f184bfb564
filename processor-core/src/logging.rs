use crate::error::ProcessorError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Logging configuration shared by the binaries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Whether to include file and line number information
    pub include_file_info: bool,

    /// Whether to enable colored output
    pub enable_colors: bool,

    /// Module-specific log levels
    pub module_levels: BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let mut module_levels = BTreeMap::new();

        // Keep the transport stack quiet unless asked
        module_levels.insert("h2".to_string(), "warn".to_string());
        module_levels.insert("hyper".to_string(), "warn".to_string());
        module_levels.insert("tower".to_string(), "warn".to_string());
        module_levels.insert("tonic".to_string(), "info".to_string());

        Self {
            level: "info".to_string(),
            include_file_info: false,
            enable_colors: true,
            module_levels,
        }
    }
}

impl LoggingConfig {
    /// Same as the default, with everything at debug level.
    pub fn debug() -> Self {
        Self {
            level: "debug".to_string(),
            include_file_info: true,
            ..Default::default()
        }
    }

    /// Filter built from this config. `RUST_LOG`, when set, wins.
    pub fn env_filter(&self) -> Result<EnvFilter, ProcessorError> {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return Ok(filter);
        }

        if !levels::is_valid_level(&self.level) {
            return Err(ProcessorError::Logging(format!(
                "Invalid log level: {}",
                self.level
            )));
        }

        let mut filter = EnvFilter::new(&self.level);
        for (module, level) in &self.module_levels {
            let directive = format!("{}={}", module, level);
            filter = filter.add_directive(
                directive
                    .parse()
                    .map_err(|e| ProcessorError::Logging(format!("Invalid log directive: {}", e)))?,
            );
        }
        Ok(filter)
    }
}

/// Initialize logging based on the provided configuration
pub fn init_logging(config: &LoggingConfig) -> Result<(), ProcessorError> {
    let result = tracing_subscriber::registry()
        .with(config.env_filter()?)
        .with(
            fmt::layer()
                .with_target(true)
                .with_file(config.include_file_info)
                .with_line_number(config.include_file_info)
                .with_ansi(config.enable_colors),
        )
        .try_init();

    match result {
        Ok(_) => tracing::debug!("Logging initialized with level: {}", config.level),
        // Tests and embedders may have installed a subscriber already
        Err(_) => tracing::debug!("Logging already initialized, skipping"),
    }

    Ok(())
}

/// Log level utilities
pub mod levels {
    /// Check if a log level string is valid
    pub fn is_valid_level(level: &str) -> bool {
        matches!(
            level.to_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_logging_config() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(!config.include_file_info);
        assert!(config.enable_colors);
        assert_eq!(config.module_levels.get("h2").map(String::as_str), Some("warn"));
    }

    #[test]
    fn test_debug_config() {
        let config = LoggingConfig::debug();
        assert_eq!(config.level, "debug");
        assert!(config.include_file_info);
        assert!(!config.module_levels.is_empty());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let config = LoggingConfig {
            level: "loud".to_string(),
            ..Default::default()
        };
        if std::env::var("RUST_LOG").is_err() {
            assert!(matches!(config.env_filter(), Err(ProcessorError::Logging(_))));
        }
    }

    #[test]
    fn test_log_level_validation() {
        assert!(levels::is_valid_level("info"));
        assert!(levels::is_valid_level("DEBUG"));
        assert!(!levels::is_valid_level("invalid"));
        assert!(!levels::is_valid_level(""));
    }

    #[test]
    fn test_init_logging_twice_is_fine() {
        let config = LoggingConfig::default();
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_ok());
    }
}
