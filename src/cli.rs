use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::core::{emit::EmitKind, extract::ConstantPlacement};

/// Shared application context for global flags
#[derive(Clone, Debug, Default)]
pub struct AppContext {
    pub quiet: bool,    // global --quiet
    pub verbose: bool,  // global --verbose
    pub no_color: bool, // global --no-color
    pub dry_run: bool,  // global --dry-run
}

#[derive(Parser)]
#[command(name = "glextract")]
#[command(
    about = "Extracts GL API prototypes and constants from C headers into macro-invocation include files"
)]
#[command(version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[command(flatten)]
    pub extract: ExtractArgs,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Suppress the progress line and non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log each rule and region as it is scanned
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Scan and report without touching the output file
    #[arg(long, global = true)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a glextract.toml config file
    Init(InitArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Default, Args)]
pub struct ExtractArgs {
    /// Rule stream: guard name, begin pattern, end pattern per rule
    #[arg(value_name = "RULES")]
    pub rules: Option<PathBuf>,

    /// Header file to scan
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Generated include file
    #[arg(value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Keep existing output and skip names it already defines
    #[arg(short, long)]
    pub append: bool,

    /// Emission kinds to write (default: all, or the config file's list)
    #[arg(short = 'k', long = "kind", value_enum, value_delimiter = ',')]
    pub kinds: Vec<EmitKind>,

    /// Place constant lines before or after the declarations
    #[arg(long, value_enum)]
    pub constants: Option<ConstantPlacement>,

    /// Refuse inputs larger than this many bytes
    #[arg(long, value_name = "BYTES")]
    pub max_input_bytes: Option<u64>,

    /// Print the run report as a single JSON line
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Parser)]
pub struct InitArgs {
    /// Directory to create the config in
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Target shell
    #[arg(value_enum)]
    pub shell: Shell,

    /// Directory to write the completion file into
    #[arg(long, conflicts_with = "stdout")]
    pub out_dir: Option<PathBuf>,

    /// Print the completion script to stdout
    #[arg(long)]
    pub stdout: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
    Elvish,
}
