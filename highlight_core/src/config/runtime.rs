// RUNTIME PREFERENCES (User Experience)

use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnginePreferences {
    /// Whether to log token/line statistics when a tokenize call completes
    pub log_statistics: bool,

    /// Whether to log every stack push and pop at debug level
    pub trace_transitions: bool,
}

impl EnginePreferences {
    /// No statistics and no tracing, independent of the environment
    pub const fn quiet() -> Self {
        Self {
            log_statistics: false,
            trace_transitions: false,
        }
    }
}

/// Reads `HIGHLIGHT_ENGINE_*`
impl Default for EnginePreferences {
    fn default() -> Self {
        Self {
            log_statistics: env::var(env_vars::ENGINE_LOG_STATISTICS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            trace_transitions: env::var(env_vars::ENGINE_TRACE_TRANSITIONS)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the configured logger
    pub min_log_level: LogLevel,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Warning),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables and CLI flags)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    pub engine: EnginePreferences,
    pub logging: LoggingPreferences,
}

/// Environment variable names for configuration
pub mod env_vars {
    // Engine
    pub const ENGINE_LOG_STATISTICS: &str = "HIGHLIGHT_ENGINE_LOG_STATISTICS";
    pub const ENGINE_TRACE_TRANSITIONS: &str = "HIGHLIGHT_ENGINE_TRACE_TRANSITIONS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "HIGHLIGHT_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "HIGHLIGHT_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "HIGHLIGHT_LOGGING_MIN_LEVEL";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("verbose"), None);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Error < LogLevel::Warning);
        assert!(LogLevel::Info < LogLevel::Debug);
        assert_eq!(
            LogLevel::Info.to_events_log_level(),
            crate::logging::LogLevel::Info
        );
    }

    #[test]
    fn test_runtime_config_serializes() {
        let config = RuntimeConfig {
            engine: EnginePreferences {
                log_statistics: false,
                trace_transitions: true,
            },
            logging: LoggingPreferences {
                use_structured_logging: true,
                enable_console_logging: false,
                min_log_level: LogLevel::Debug,
            },
        };

        let text = toml::to_string(&config).unwrap();
        let parsed: RuntimeConfig = toml::from_str(&text).unwrap();
        assert!(parsed.engine.trace_transitions);
        assert_eq!(parsed.logging.min_log_level, LogLevel::Debug);
    }
}
