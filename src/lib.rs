//! **glextract** - Extracts GL API prototypes and hex constants from C headers
//!
//! Rule-driven regex scanning over raw header bytes, emitting
//! `GLDEFINE`/`DEF_GLMETHOD`/`DEF_GLCONST` lines that downstream code expands
//! into declarations, definitions, and loaders. Append mode re-reads the
//! existing artifact so no name is emitted twice.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Extraction engine - patterns, scanning, dedup, and emission
pub mod core {
    /// Fatal error taxonomy mapped to exit status 1
    pub mod error;
    pub use error::ExtractError;

    /// Named sub-patterns, placeholder expansion, compiled pattern set
    pub mod patterns;
    pub use patterns::{Keywords, PatternSet};

    /// Rule stream reader (guard, begin, end triples)
    pub mod rules;
    pub use rules::{ExtractionRule, read_rules};

    /// Begin/end bounded region location
    pub mod scan;

    /// Function prototype and argument parsing
    pub mod prototype;
    pub use prototype::{ArgPair, FunctionRecord};

    /// Hexadecimal `#define` extraction
    pub mod constant;
    pub use constant::ConstantRecord;

    /// Emitted-name sets and accept/skip gating
    pub mod dedup;
    pub use dedup::{DedupGate, EmittedNames, Tally};

    /// Macro-invocation line rendering
    pub mod emit;
    pub use emit::{EmitKind, EmitKinds};

    /// Rule-driven driver and file bookkeeping
    pub mod extract;
    pub use extract::{ExtractOptions, ExtractReport, execute, run as extract_run};
}

/// Infrastructure - Configuration, I/O, and utilities
pub mod infra {
    /// Configuration management with TOML support
    pub mod config;
    pub use config::{Config, init as config_init, load_config};

    /// Size-capped input loading and output sink handling
    pub mod io;
    pub use io::{FileContent, OutputSink, read_input};

    /// Byte offset to line mapping for diagnostics
    pub mod line_index;
    pub use line_index::NewlineIndex;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use core::{ExtractError, ExtractOptions, ExtractReport, execute, extract_run};
pub use infra::{Config, load_config};
