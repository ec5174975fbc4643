//! Logging macros
//!
//! Context values accept any `Display` type: `"key" => value`.

/// Log error with a code
#[macro_export]
macro_rules! log_error {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::error($code, $message),
            vec![],
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::error($code, $message),
                context_strings,
            )
        }
    };
}

/// Log success with a code
#[macro_export]
macro_rules! log_success {
    ($code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::success($code, $message),
            vec![],
        )
    };

    ($code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::success($code, $message),
                context_strings,
            )
        }
    };
}

/// Log informational message
#[macro_export]
macro_rules! log_info {
    ($message:expr) => {
        $crate::logging::log_with_context($crate::logging::LogEvent::info($message), vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::info($message),
                context_strings,
            )
        }
    };
}

/// Log warning, optionally with a code: `log_warning!(code = X, "msg", ...)`
#[macro_export]
macro_rules! log_warning {
    (code = $code:expr, $message:expr) => {
        $crate::logging::log_with_context(
            $crate::logging::LogEvent::warning_with_code($code, $message),
            vec![],
        )
    };

    (code = $code:expr, $message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::warning_with_code($code, $message),
                context_strings,
            )
        }
    };

    ($message:expr) => {
        $crate::logging::log_with_context($crate::logging::LogEvent::warning($message), vec![])
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::warning($message),
                context_strings,
            )
        }
    };
}

/// Log debug message; context is only formatted when debug is enabled
#[macro_export]
macro_rules! log_debug {
    ($message:expr) => {
        if $crate::logging::debug_enabled() {
            $crate::logging::log_with_context($crate::logging::LogEvent::debug($message), vec![])
        }
    };

    ($message:expr, $($key:expr => $value:expr),+ $(,)?) => {
        if $crate::logging::debug_enabled() {
            let context_strings: Vec<(&str, String)> = vec![$(($key, format!("{}", $value))),+];
            $crate::logging::log_with_context(
                $crate::logging::LogEvent::debug($message),
                context_strings,
            )
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::logging::codes;

    #[test]
    fn test_macros_expand_without_global_logger() {
        let depth: usize = 3;

        log_error!(codes::matching::STACK_OVERFLOW, "Stack overflow",
            "depth" => depth,
            "state" => "root"
        );
        log_success!(codes::success::TOKENIZATION_COMPLETE, "done", "tokens" => 42);
        log_info!("Processing", "lexer" => "json");
        log_warning!("Plain warning");
        log_warning!(code = codes::input::INVALID_ENCODING, "Bad bytes", "offset" => 7);
        log_debug!("Trace", "state" => "root",);
    }
}
