//! Weft CLI - incremental compilation driver for Twirl-style templates
//!
//! Usage: weft <COMMAND>
//!
//! Commands:
//!   compile  Compile templates that changed since the last build
//!   status   Show the change set without touching anything
//!   clean    Delete all tracked outputs and the build snapshot

mod cli;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use serde_json::json;

use weft::changes::{classify, PriorBuild};
use weft::driver::{BuildOptions, CompileDriver};
use weft::fs::{FileSystem, LocalFs};
use weft::mapper::OutputMapper;
use weft::tracker::{discover_sources, BuildSnapshot, ChangeTracker};
use weft::variant::resolve_variant;
use weft::JavaCompiler;

use cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Compile {
            ref source_dir,
            ref output_dir,
            ref classpath,
            ref state,
            full,
            fork,
            dry_run,
        } => run_compile(
            &cli, source_dir, output_dir, classpath, state, full, fork, dry_run,
        ),
        Commands::Status {
            ref source_dir,
            ref classpath,
            ref state,
        } => run_status(&cli, source_dir, classpath, state),
        Commands::Clean {
            ref output_dir,
            ref state,
            dry_run,
        } => run_clean(&cli, output_dir, state, dry_run),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                println!("{}", json!({ "error": format!("{e:#}") }));
            } else {
                eprintln!("error: {e:#}");
            }
            ExitCode::FAILURE
        }
    }
}

/// Load incremental state: the persisted snapshot projected against the
/// current source tree. `None` means full rebuild.
fn load_prior(
    cli: &Cli,
    fs: &LocalFs,
    state: &Path,
    current: &BTreeSet<PathBuf>,
    full: bool,
) -> Result<Option<PriorBuild>> {
    if full {
        if cli.verbose > 0 && !cli.json {
            eprintln!("full rebuild requested, ignoring {}", state.display());
        }
        return Ok(None);
    }

    let Some(snapshot) = BuildSnapshot::load(fs, state) else {
        if cli.verbose > 0 && !cli.json {
            eprintln!("no usable snapshot at {}, full rebuild", state.display());
        }
        return Ok(None);
    };

    let tracker = ChangeTracker::new(fs);
    Ok(Some(tracker.prior_build(&snapshot, current)?))
}

#[allow(clippy::too_many_arguments)]
fn run_compile(
    cli: &Cli,
    source_dir: &Path,
    output_dir: &Path,
    classpath: &[PathBuf],
    state: &Path,
    full: bool,
    fork: bool,
    dry_run: bool,
) -> Result<()> {
    let fs = LocalFs::new();
    let current = discover_sources(source_dir)?;
    let prior = load_prior(cli, &fs, state, &current, full)?;

    if dry_run {
        let changes = classify(&current, prior.as_ref());
        let variant = resolve_variant(classpath);
        if cli.json {
            println!(
                "{}",
                json!({
                    "dry_run": true,
                    "variant": format!("{variant:?}"),
                    "out_of_date": changes.out_of_date,
                    "removed": changes.removed,
                    "unchanged": changes.unchanged.len(),
                })
            );
        } else {
            println!(
                "would compile {} template(s), delete {} stale output(s), leave {} untouched",
                changes.out_of_date.len(),
                changes.removed.len(),
                changes.unchanged.len()
            );
            for path in &changes.out_of_date {
                println!("  compile {}", path.display());
            }
            for path in &changes.removed {
                println!("  remove output of {}", path.display());
            }
        }
        return Ok(());
    }

    let compiler = JavaCompiler::from_env();
    let mapper = OutputMapper::scala(output_dir);
    let driver = CompileDriver::new(&compiler, &fs, mapper);

    let options = BuildOptions {
        source_root: source_dir.to_path_buf(),
        classpath: classpath.to_vec(),
        fork,
    };

    let report = driver.run(&current, prior.as_ref(), &options)?;

    // Only a finished build may replace the snapshot; a failed compile keeps
    // the old one so the next run retries the same set.
    let tracker = ChangeTracker::new(&fs);
    tracker.snapshot(&current)?.save(&fs, state)?;

    for warning in &report.warnings {
        eprintln!(
            "warning: could not delete {}: {}",
            warning.output.display(),
            warning.message
        );
    }

    if cli.json {
        println!("{}", serde_json::to_string(&report)?);
    } else if report.is_up_to_date() {
        if report.removed_outputs > 0 {
            println!(
                "up to date ({} stale output(s) removed)",
                report.removed_outputs
            );
        } else {
            println!("up to date");
        }
    } else if let weft::BuildOutcome::Compiled { sources } = report.outcome {
        println!(
            "compiled {} template(s), removed {} stale output(s)",
            sources, report.removed_outputs
        );
    }

    Ok(())
}

fn run_status(cli: &Cli, source_dir: &Path, classpath: &[PathBuf], state: &Path) -> Result<()> {
    let fs = LocalFs::new();
    let current = discover_sources(source_dir)?;
    let prior = load_prior(cli, &fs, state, &current, false)?;

    let changes = classify(&current, prior.as_ref());
    let variant = resolve_variant(classpath);

    if cli.json {
        println!(
            "{}",
            json!({
                "variant": format!("{variant:?}"),
                "out_of_date": changes.out_of_date,
                "removed": changes.removed,
                "unchanged": changes.unchanged,
                "up_to_date": changes.is_up_to_date(),
            })
        );
        return Ok(());
    }

    println!("compiler variant: {variant:?}");
    println!(
        "{} out of date, {} removed, {} unchanged",
        changes.out_of_date.len(),
        changes.removed.len(),
        changes.unchanged.len()
    );
    if cli.verbose > 0 {
        for path in &changes.out_of_date {
            println!("  out-of-date {}", path.display());
        }
        for path in &changes.removed {
            println!("  removed     {}", path.display());
        }
        for path in &changes.unchanged {
            println!("  unchanged   {}", path.display());
        }
    }

    Ok(())
}

fn run_clean(cli: &Cli, output_dir: &Path, state: &Path, dry_run: bool) -> Result<()> {
    let fs = LocalFs::new();
    let mapper = OutputMapper::scala(output_dir);

    let Some(snapshot) = BuildSnapshot::load(&fs, state) else {
        if cli.json {
            println!("{}", json!({ "deleted": 0 }));
        } else {
            println!("nothing to clean (no build snapshot)");
        }
        return Ok(());
    };

    let mut deleted = 0usize;
    for source in snapshot.sources() {
        let output = mapper.map(&source)?;
        if dry_run {
            println!("would delete {}", output.display());
            continue;
        }
        match fs.remove_file(&output) {
            Ok(()) => {
                deleted += 1;
                if cli.verbose > 0 && !cli.json {
                    eprintln!("deleted {}", output.display());
                }
            }
            Err(e) if e.is_not_found() => {}
            Err(e) => eprintln!("warning: could not delete {}: {}", output.display(), e),
        }
    }

    if !dry_run {
        if let Err(e) = fs.remove_file(state) {
            if !e.is_not_found() {
                eprintln!("warning: could not delete {}: {}", state.display(), e);
            }
        }
    }

    if cli.json {
        println!("{}", json!({ "deleted": deleted, "dry_run": dry_run }));
    } else if !dry_run {
        println!("deleted {} output(s)", deleted);
    }

    Ok(())
}
