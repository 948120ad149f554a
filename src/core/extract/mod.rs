//! Extraction run: file bookkeeping around the rule-driven engine.

pub mod engine;

pub use engine::{ConstantPlacement, Engine, ExtractReport};

use std::io::Write;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use tracing::{instrument, warn};

use crate::cli::{AppContext, ExtractArgs};
use crate::core::{
    dedup::{DedupGate, EmittedNames},
    emit::EmitKinds,
    error::ExtractError,
    patterns::{Keywords, PatternSet},
    rules::{compile_rules, read_rules},
};
use crate::infra::config::{Config, DEFAULT_MAX_INPUT_BYTES, load_config};
use crate::infra::io::{OutputSink, read_input, read_rule_stream};

/// Immutable configuration for one run, built once from flags and config.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractOptions {
    pub append: bool,
    pub kinds: EmitKinds,
    pub constants: ConstantPlacement,
    pub max_input_bytes: u64,
    pub keywords: Keywords,
    pub dry_run: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            append: false,
            kinds: EmitKinds::default(),
            constants: ConstantPlacement::default(),
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
            keywords: Keywords::default(),
            dry_run: false,
        }
    }
}

impl ExtractOptions {
    /// Flags win over the config file; the config file wins over defaults.
    pub fn resolve(args: &ExtractArgs, config: &Config, ctx: &AppContext) -> Self {
        let kinds = if args.kinds.is_empty() {
            EmitKinds::from_list(&config.kinds)
        } else {
            EmitKinds::from_list(&args.kinds)
        };

        Self {
            append: args.append,
            kinds,
            constants: args.constants.unwrap_or(config.constants),
            max_input_bytes: args.max_input_bytes.unwrap_or(config.max_input_bytes),
            keywords: config.keywords(),
            dry_run: ctx.dry_run,
        }
    }
}

/// The three files a run works on.
#[derive(Debug, Clone)]
pub struct ExtractPaths {
    pub rules: PathBuf,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl ExtractPaths {
    pub fn from_args(args: &ExtractArgs) -> Result<Self, ExtractError> {
        Ok(Self {
            rules: args.rules.clone().ok_or(ExtractError::MissingPath("rule stream"))?,
            input: args.input.clone().ok_or(ExtractError::MissingPath("input header"))?,
            output: args.output.clone().ok_or(ExtractError::MissingPath("output"))?,
        })
    }
}

/// Run one extraction against the filesystem.
///
/// Inputs are loaded and every rule marker compiled before the output is
/// opened, so a bad rule stream or oversized header never truncates an
/// existing artifact.
#[instrument(skip(opts), fields(append = opts.append, dry_run = opts.dry_run))]
pub fn execute(paths: &ExtractPaths, opts: &ExtractOptions) -> Result<ExtractReport, ExtractError> {
    let rule_bytes = read_rule_stream(&paths.rules)?;
    let rules = read_rules(rule_bytes.as_slice())?;
    let input = read_input(&paths.input, opts.max_input_bytes)?;

    let patterns = PatternSet::new(&opts.keywords)?;
    let compiled = compile_rules(&patterns, &rules)?;
    let engine = Engine::new(&patterns, opts.kinds, opts.constants);

    if opts.dry_run {
        let names = if opts.append {
            EmittedNames::prescan(&patterns, &OutputSink::peek(&paths.output)?)
        } else {
            EmittedNames::default()
        };
        return engine.run_compiled(
            input.as_ref(),
            &compiled,
            &mut DedupGate::new(names),
            &mut std::io::sink(),
        );
    }

    let sink = OutputSink::open(&paths.output, opts.append)?;
    let separator = sink.needs_separator();
    let names = if opts.append {
        EmittedNames::prescan(&patterns, &sink.existing)
    } else {
        EmittedNames::default()
    };
    let mut file = sink.file;

    // Whatever was produced before a fatal error is still written
    let mut staged = Vec::new();
    let result = engine.run_compiled(input.as_ref(), &compiled, &mut DedupGate::new(names), &mut staged);

    if !staged.is_empty() {
        if separator {
            file.write_all(b"\n")?;
        }
        file.write_all(&staged)?;
    }
    file.flush()?;

    result
}

/// CLI entry point for the default command.
pub fn run(args: ExtractArgs, ctx: &AppContext) -> Result<(), ExtractError> {
    let config = load_config().unwrap_or_else(|e| {
        warn!(error = %format!("{e:#}"), "configuration ignored, using defaults");
        Config::default()
    });

    let paths = ExtractPaths::from_args(&args)?;
    let opts = ExtractOptions::resolve(&args, &config, ctx);
    let report = execute(&paths, &opts)?;

    if args.json {
        let mut stdout = std::io::stdout().lock();
        serde_json::to_writer(&mut stdout, &report).map_err(std::io::Error::from)?;
        writeln!(stdout)?;
        return Ok(());
    }

    if ctx.quiet {
        return Ok(());
    }

    let summary = format!(
        "{} accepted, {} skipped (functions {}/{}, constants {}/{})",
        report.accepted(),
        report.skipped(),
        report.functions.accepted,
        report.functions.skipped,
        report.constants.accepted,
        report.constants.skipped,
    );

    if opts.dry_run {
        let line = format!("DRY RUN: {summary}, {} left untouched", paths.output.display());
        if ctx.no_color {
            println!("{line}");
        } else {
            println!("{}", line.yellow());
        }
    } else {
        let mark = if ctx.no_color { "✓".to_string() } else { "✓".green().to_string() };
        println!("{mark} {summary} -> {}", paths.output.display());
    }

    Ok(())
}
