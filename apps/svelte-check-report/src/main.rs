//! svelte-check-report binary entry point.
//! Resolves configuration, runs the check, and publishes the results.

use clap::Parser;
use log::{debug, LevelFilter};
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::process::ExitCode;
use svelte_check_report::cli::{Cli, Commands};
use svelte_check_report::config::{self, Effective};
use svelte_check_report::output::{self, error_prefix, info_prefix, note_prefix};
use svelte_check_report::render::{self, RenderContext};
use svelte_check_report::{annotate, run, Error};

fn init_logger(quiet: bool, verbose: u8) {
    let level = match (quiet, verbose) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .format_target(false)
        .parse_default_env()
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.quiet, cli.verbose);
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Commands::Check(args) => {
            let eff = match config::resolve_effective(&args.into_overrides()) {
                Ok(eff) => eff,
                Err(e) => return fatal(&e),
            };
            match check(&eff) {
                Ok(true) => ExitCode::FAILURE,
                Ok(false) => ExitCode::SUCCESS,
                Err(e) => fatal(&e),
            }
        }
    }
}

fn fatal(e: &Error) -> ExitCode {
    eprintln!("{} {}", error_prefix(), e);
    ExitCode::from(2)
}

/// Run the check and publish results. Returns whether the build should fail.
fn check(eff: &Effective) -> Result<bool, Error> {
    debug!("effective config: {:?}", eff);
    if config::load_config(&eff.repo_root)?.is_none() {
        eprintln!(
            "{} No svelte-check-report.toml found; using defaults.",
            note_prefix()
        );
    }

    let report = run::run_check(eff)?;

    if eff.annotations {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        annotate::emit(&report.store, &mut lock)
            .and_then(|_| lock.flush())
            .map_err(|e| Error::Io {
                path: "<stdout>".into(),
                source: e,
            })?;
    }

    let markdown = render::render(&report.store, &RenderContext::new(eff.blob_base.clone()));
    if let Some(path) = &eff.summary_file {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut f| writeln!(f, "{}", markdown))
            .map_err(|e| Error::Io {
                path: path.clone(),
                source: e,
            })?;
        eprintln!("{} summary written to {}", info_prefix(), path.display());
    }

    output::print_report(&report, &eff.output, &markdown);

    if let Some(message) = &report.verdict.message {
        eprintln!("{} {}", error_prefix(), message);
    }
    Ok(report.verdict.failed)
}
