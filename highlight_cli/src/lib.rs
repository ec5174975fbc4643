//! # highlight
//!
//! Front end for `highlight_core`: picks a tokenizer for the input, runs the
//! requested stage of the token pipeline and renders the result.

pub mod cli;
pub mod error;
pub mod output;

pub use cli::{Cli, ColorMode, Mode, OutputKind};
pub use error::CliError;

use highlight_core::config::EnginePreferences;
use highlight_core::{lexers, LexerError, LexerSpec, Token, Tokenizer, TokenizerRegistry};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings the host resolves once per process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunContext {
    pub engine: EnginePreferences,
    /// Write colour escape codes in terminal output
    pub color: bool,
}

impl RunContext {
    /// No engine statistics and no colour
    pub fn plain() -> Self {
        Self {
            engine: EnginePreferences::quiet(),
            color: false,
        }
    }
}

/// Registry holding the built-in lexers plus any loaded from `spec_paths`
///
/// A loaded specification replaces a built-in lexer of the same name.
pub fn create_registry(
    spec_paths: &[PathBuf],
    engine: EnginePreferences,
) -> Result<TokenizerRegistry, CliError> {
    let mut registry = TokenizerRegistry::new().with_preferences(engine);
    lexers::register_builtin(&mut registry)?;

    for path in spec_paths {
        let spec_load = |source| CliError::SpecLoad {
            path: path.clone(),
            source,
        };
        let spec = LexerSpec::from_path(path).map_err(spec_load)?;
        registry.register_spec(&spec).map_err(spec_load)?;
        log::info!("loaded lexer '{}' from {}", spec.name, path.display());
    }

    Ok(registry)
}

/// Pick the tokenizer for this invocation
///
/// An explicit lexer name wins, then the content type, then the base name
/// of the input file. Standard input has no name to go on.
pub fn resolve_tokenizer(
    registry: &TokenizerRegistry,
    cli: &Cli,
) -> Result<Arc<dyn Tokenizer>, CliError> {
    if let Some(name) = &cli.lexer {
        return registry
            .get(name)
            .ok_or_else(|| CliError::UnknownLexer { name: name.clone() });
    }

    if let Some(content_type) = &cli.content_type {
        return registry
            .lookup_by_media_type(content_type)?
            .ok_or_else(|| CliError::UnresolvedContentType {
                content_type: content_type.clone(),
            });
    }

    match &cli.file {
        Some(path) => {
            let filename = base_name(path);
            registry
                .lookup_by_filename(&filename)?
                .ok_or(CliError::UnresolvedFilename { filename })
        }
        None => Err(CliError::NoTokenizer),
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Execute the command, reading `stdin` when no file is given
pub fn run(
    cli: &Cli,
    context: &RunContext,
    stdin: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let registry = create_registry(&cli.specs, context.engine.clone())?;

    if cli.list {
        return write_listing(&registry, out);
    }

    let tokenizer = resolve_tokenizer(&registry, cli)?;
    log::debug!("using lexer '{}'", tokenizer.name());

    match &cli.file {
        Some(path) => {
            let file = File::open(path).map_err(|source| CliError::Open {
                path: path.clone(),
                source,
            })?;
            render(tokenizer.as_ref(), cli, context.color, &mut BufReader::new(file), out)
        }
        None => render(tokenizer.as_ref(), cli, context.color, stdin, out),
    }
}

/// Run `input` through `tokenizer` at the requested stage and render it
pub fn render(
    tokenizer: &dyn Tokenizer,
    cli: &Cli,
    color: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut outputter = output::create_outputter(cli.output, out, color);
    let mut emit = |token: Token| outputter.emit(&token).map_err(LexerError::downstream);

    match cli.mode {
        Mode::Raw => tokenizer.tokenize(input, &mut emit)?,
        Mode::Filtered => tokenizer.highlight(input, &mut emit)?,
        Mode::Formatted => tokenizer.format(input, &mut emit)?,
    }

    outputter.finish()?;
    Ok(())
}

fn write_listing(registry: &TokenizerRegistry, out: &mut dyn Write) -> Result<(), CliError> {
    for name in registry.names() {
        let Some(tokenizer) = registry.get(name) else {
            continue;
        };
        writeln!(
            out,
            "{:<8}\t{}\t{}",
            name,
            tokenizer.media_types().join(", "),
            tokenizer.filenames().join(", ")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use clap::Parser;
    use tempfile::TempDir;

    fn run_in(context: &RunContext, args: &[&str], stdin: &str) -> Result<String, CliError> {
        let mut argv = vec!["highlight"];
        argv.extend_from_slice(args);
        let cli = Cli::parse_from(argv);

        let mut out = Vec::new();
        run(&cli, context, &mut stdin.as_bytes(), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn run_with(args: &[&str], stdin: &str) -> Result<String, CliError> {
        run_in(&RunContext::plain(), args, stdin)
    }

    #[test]
    fn test_stdin_requires_a_tokenizer() {
        assert_matches!(run_with(&[], "{}"), Err(CliError::NoTokenizer));
    }

    #[test]
    fn test_content_type_selects_lexer() {
        let out = run_with(&["-t", "application/json", "-o", "text", "-m", "raw"], "[1, 2]").unwrap();
        assert_eq!(out, "[1, 2]");
    }

    #[test]
    fn test_unresolved_content_type() {
        assert_matches!(
            run_with(&["-t", "image/png"], ""),
            Err(CliError::UnresolvedContentType { content_type }) if content_type == "image/png"
        );
    }

    #[test]
    fn test_invalid_content_type_is_engine_error() {
        assert_matches!(
            run_with(&["-t", "not a type"], ""),
            Err(CliError::Engine(LexerError::InvalidMediaType { .. }))
        );
    }

    #[test]
    fn test_unknown_lexer_name() {
        assert_matches!(
            run_with(&["-l", "cobol"], ""),
            Err(CliError::UnknownLexer { name }) if name == "cobol"
        );
    }

    #[test]
    fn test_formatted_json_is_indented() {
        let out = run_with(&["-l", "json", "-o", "text"], r#"{"a":[1]}"#).unwrap();
        assert_eq!(out, "{\n  \"a\": [\n    1\n  ]\n}");
    }

    #[test]
    fn test_filtered_mode_skips_formatter() {
        let out = run_with(&["-l", "json", "-o", "text", "-m", "filtered"], r#"{"a": 1}"#).unwrap();
        assert_eq!(out, r#"{"a": 1}"#);
    }

    #[test]
    fn test_debug_output_names_states() {
        let out = run_with(&["-l", "json", "-o", "debug", "-m", "raw"], "true").unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].trim_start().starts_with("boolean\t"));
        assert!(lines[0].ends_with("\"true\""));
    }

    #[test]
    fn test_term_output_colour_follows_context() {
        let plain = run_with(&["-l", "json"], r#"{"a": 1}"#).unwrap();
        assert_eq!(plain, "{\n  \"a\": 1\n}");

        let colored = RunContext {
            color: true,
            ..RunContext::plain()
        };
        let painted = run_in(&colored, &["-l", "json"], r#"{"a": 1}"#).unwrap();
        assert!(painted.contains("\x1b["));
        assert!(painted.contains("1"));
    }

    #[test]
    fn test_file_input_resolved_by_base_name() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("style.css");
        std::fs::write(&path, "p { margin: 0; }").unwrap();

        let out = run_with(&["-o", "text", path.to_str().unwrap()], "").unwrap();
        assert_eq!(out, "p { margin: 0; }");
    }

    #[test]
    fn test_file_with_unknown_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();

        assert_matches!(
            run_with(&[path.to_str().unwrap()], ""),
            Err(CliError::UnresolvedFilename { filename }) if filename == "notes.txt"
        );
    }

    #[test]
    fn test_missing_file() {
        assert_matches!(
            run_with(&["-l", "css", "/nonexistent/style.css"], ""),
            Err(CliError::Open { .. })
        );
    }

    #[test]
    fn test_spec_file_adds_lexer() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ini.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
name = "ini"
filenames = ["*.ini"]

[[states.root]]
regexp = '\[[^\]]*\]'
type = "tag"

[[states.root]]
regexp = '[^\[]+'
type = "text"
"#
        )
        .unwrap();

        let spec = path.to_str().unwrap();
        let out = run_with(&["--spec", spec, "-l", "ini", "-o", "json"], "[main]\nx=1\n").unwrap();
        let first: serde_json::Value = serde_json::from_str(out.lines().next().unwrap()).unwrap();
        assert_eq!(first["type"], "tag");
        assert_eq!(first["value"], "[main]");

        let listing = run_with(&["--spec", spec, "--list"], "").unwrap();
        assert!(listing.lines().any(|line| line.starts_with("ini")));
    }

    #[test]
    fn test_broken_spec_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, r#"{"name": "broken", "states": {"other": []}}"#).unwrap();

        assert_matches!(
            run_with(&["--spec", path.to_str().unwrap(), "--list"], ""),
            Err(CliError::SpecLoad {
                source: LexerError::MissingRootState { .. },
                ..
            })
        );
    }

    #[test]
    fn test_listing_shows_builtins() {
        let listing = run_with(&["--list"], "").unwrap();
        let names: Vec<_> = listing
            .lines()
            .filter_map(|line| line.split_whitespace().next())
            .collect();
        assert_eq!(names, vec!["css", "html", "http", "json"]);
        assert!(listing.contains("text/css"));
    }
}
