use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use glextract::cli::{AppContext, Cli, Commands};
use owo_colors::OwoColorize;

fn main() -> ExitCode {
    // Bare invocation shows usage and succeeds
    if std::env::args_os().len() <= 1 {
        let _ = Cli::command().print_help();
        return ExitCode::SUCCESS;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // --help/--version print to stdout and are not failures
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    // Build a context once, pass everywhere
    let ctx = AppContext {
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
        dry_run: cli.dry_run,
    };

    if let Err(err) = init_tracing(&ctx) {
        eprintln!("{err:#}");
    }

    if ctx.no_color {
        let _ = miette::set_hook(Box::new(|_| {
            Box::new(miette::MietteHandlerOpts::new().color(false).build())
        }));
    }

    let result = match cli.command {
        Some(Commands::Init(args)) => glextract::infra::config::init(args, &ctx),
        Some(Commands::Completions(args)) => glextract::completion::run(args, &ctx),
        None => match glextract::core::extract_run(cli.extract, &ctx) {
            Ok(()) => Ok(()),
            Err(err) => {
                eprintln!("{:?}", miette::Report::new(err));
                return ExitCode::FAILURE;
            }
        },
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            if ctx.no_color {
                eprintln!("error: {err:#}");
            } else {
                eprintln!("{} {err:#}", "error:".red().bold());
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(ctx: &AppContext) -> anyhow::Result<()> {
    let level = if ctx.quiet {
        "error"
    } else if ctx.verbose {
        "debug"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("GLEXTRACT_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!ctx.no_color)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
