// build.rs - TOML-driven constant generation
use std::env;
use std::fs;
use std::path::Path;

#[derive(serde::Deserialize)]
struct CompileTimeConfig {
    engine: EngineLimits,
    logging: LoggingLimits,
}

#[derive(serde::Deserialize)]
struct EngineLimits {
    max_line_chunk: usize,
    max_pending_subject: usize,
    max_stack_depth: usize,
}

#[derive(serde::Deserialize)]
struct LoggingLimits {
    log_buffer_size: usize,
    max_log_message_length: usize,
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=HIGHLIGHT_BUILD_PROFILE");
    println!("cargo:rerun-if-env-changed=HIGHLIGHT_CONFIG_DIR");

    let profile =
        env::var("HIGHLIGHT_BUILD_PROFILE").unwrap_or_else(|_| "development".to_string());
    let config_dir = env::var("HIGHLIGHT_CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

    // Find workspace root (parent of highlight_core directory)
    let manifest_dir = env::var("CARGO_MANIFEST_DIR").unwrap();
    let workspace_root = Path::new(&manifest_dir)
        .parent()
        .expect("Could not find workspace root (parent directory)");

    let config_path = workspace_root
        .join(&config_dir)
        .join(format!("{}.toml", profile));

    println!("cargo:rerun-if-changed={}", config_path.display());

    if !config_path.exists() {
        panic!(
            "Configuration file not found: {}\nWorkspace root: {}\nLooking for: {}/{}/{}.toml",
            config_path.display(),
            workspace_root.display(),
            workspace_root.display(),
            config_dir,
            profile
        );
    }

    let config_content = fs::read_to_string(&config_path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", config_path.display(), e));

    let config: CompileTimeConfig = toml::from_str(&config_content)
        .unwrap_or_else(|e| panic!("Invalid TOML in {}: {}", config_path.display(), e));

    validate_constraints(&config, &profile);
    generate_constants(&config, &profile);
}

fn validate_constraints(config: &CompileTimeConfig, profile: &str) {
    const ABSOLUTE_MAX_PENDING_SUBJECT: usize = 256 * 1024 * 1024;
    const ABSOLUTE_MAX_STACK_DEPTH: usize = 1_000_000;

    if config.engine.max_line_chunk == 0 {
        panic!("LIMITS: max_line_chunk must be greater than zero");
    }

    if config.engine.max_pending_subject < config.engine.max_line_chunk {
        panic!("LIMITS: max_pending_subject must be at least max_line_chunk");
    }

    if config.engine.max_pending_subject > ABSOLUTE_MAX_PENDING_SUBJECT {
        panic!("LIMITS: max_pending_subject exceeds absolute maximum");
    }

    if config.engine.max_stack_depth == 0 || config.engine.max_stack_depth > ABSOLUTE_MAX_STACK_DEPTH
    {
        panic!("LIMITS: max_stack_depth must be within 1..={}", ABSOLUTE_MAX_STACK_DEPTH);
    }

    if config.logging.log_buffer_size < 100 || config.logging.log_buffer_size > 100_000 {
        panic!("LIMITS: log_buffer_size must be within 100..=100000");
    }

    if profile == "production" && config.engine.max_pending_subject > 16 * 1024 * 1024 {
        panic!("PRODUCTION: max_pending_subject too high for production");
    }
}

fn generate_constants(config: &CompileTimeConfig, profile: &str) {
    let out_dir = env::var("OUT_DIR").unwrap();
    let output_path = Path::new(&out_dir).join("constants.rs");

    let constants_code = format!(
        r#"
// Generated compile-time constants from TOML configuration
// Profile: {}
// DO NOT EDIT - Generated by build.rs

pub mod compile_time {{
    pub mod engine {{
        pub const MAX_LINE_CHUNK: usize = {};
        pub const MAX_PENDING_SUBJECT: usize = {};
        pub const MAX_STACK_DEPTH: usize = {};
    }}

    pub mod logging {{
        pub const LOG_BUFFER_SIZE: usize = {};
        pub const MAX_LOG_MESSAGE_LENGTH: usize = {};
    }}
}}
"#,
        profile,
        config.engine.max_line_chunk,
        config.engine.max_pending_subject,
        config.engine.max_stack_depth,
        config.logging.log_buffer_size,
        config.logging.max_log_message_length,
    );

    fs::write(output_path, constants_code).unwrap();
}
