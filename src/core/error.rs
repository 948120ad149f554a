//! Fatal error taxonomy for an extraction run.
//!
//! "Pattern did not match" and "name already emitted" are not errors;
//! both are normal control flow inside the engine.

use std::path::PathBuf;

use miette::Diagnostic;

/// Every condition that aborts a run with exit status 1.
#[derive(Debug, Diagnostic, thiserror::Error)]
pub enum ExtractError
{
    #[error("cannot open input header {}", .path.display())]
    #[diagnostic(code(glextract::open_input))]
    CannotOpenInput
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open definition stream {}", .path.display())]
    #[diagnostic(code(glextract::open_rules))]
    CannotOpenDefinitionStream
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot open output {}", .path.display())]
    #[diagnostic(code(glextract::open_output))]
    CannotOpenOutput
    {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("input {} is {size} bytes, limit is {limit}", .path.display())]
    #[diagnostic(
        code(glextract::input_too_large),
        help("raise `max_input_bytes` in glextract.toml or pass --max-input-bytes")
    )]
    InputTooLarge
    {
        path: PathBuf,
        size: u64,
        limit: u64,
    },

    #[error("region for `{guard}` opened at line {line} by `{begin}` is never closed")]
    #[diagnostic(
        code(glextract::unterminated_region),
        help("check that the rule's end pattern matches the header layout")
    )]
    UnterminatedRegion
    {
        guard: String,
        begin: String,
        line: usize,
    },

    #[error("failed to read definition stream at line {line}")]
    #[diagnostic(code(glextract::read_rules))]
    ReadRules
    {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("rule starting at line {line} of the definition stream is incomplete")]
    #[diagnostic(
        code(glextract::incomplete_rule),
        help("each rule is three lines: guard name, begin pattern, end pattern")
    )]
    IncompleteRule
    {
        line: usize
    },

    #[error("invalid pattern `{pattern}`")]
    #[diagnostic(code(glextract::invalid_pattern))]
    InvalidPattern
    {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("missing required {0} path")]
    #[diagnostic(
        code(glextract::missing_path),
        help("usage: glextract [OPTIONS] <RULES> <INPUT> <OUTPUT>")
    )]
    MissingPath(&'static str),

    #[error("failed to write output")]
    #[diagnostic(code(glextract::write))]
    Write(#[from] std::io::Error),
}
