//! minifmt conformance harness CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use minifmt_harness::bounds::{self, BoundsReport};
use minifmt_harness::exec::{render_format, render_scan};
use minifmt_harness::fixtures::load_fixture_dir;
use minifmt_harness::structured_log::{
    ArtifactIndex, LogEmitter, LogLevel, now_utc, validate_log_file,
};
use minifmt_harness::{
    ArgSpec, ConformanceReport, FixtureSet, HarnessConfig, TargetSpec, TestRunner,
    VerificationSummary,
};

/// Conformance harness for the minifmt formatting engines.
#[derive(Debug, Parser)]
#[command(name = "harness", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run fixture sets against the engines and report.
    Verify {
        /// Directory of fixture JSON files (overrides MINIFMT_FIXTURE_DIR).
        #[arg(long)]
        fixture: Option<PathBuf>,
        /// Markdown report path; a `.json` twin is written next to it.
        #[arg(long)]
        report: Option<PathBuf>,
        /// JSONL event log path (overrides MINIFMT_LOG).
        #[arg(long)]
        log: Option<PathBuf>,
        /// Fixed report timestamp, for reproducible output.
        #[arg(long)]
        timestamp: Option<String>,
    },
    /// Format one directive string and print the rendering.
    Render {
        #[arg(long)]
        format: String,
        /// Operand: int:N, uint:N, char:C, ptr:N, str:TEXT, null, count.
        #[arg(long = "arg")]
        args: Vec<ArgSpec>,
        /// Destination capacity; unbounded when omitted.
        #[arg(long)]
        capacity: Option<usize>,
    },
    /// Scan one input and print the assigned targets.
    Scan {
        #[arg(long)]
        input: String,
        #[arg(long)]
        format: String,
        /// Target: int, uint, ptr, chars:N, count.
        #[arg(long = "target")]
        targets: Vec<TargetSpec>,
    },
    /// Replay formatter fixtures at every capacity and check bounded writes.
    BoundsSweep {
        /// Directory of fixture JSON files (overrides MINIFMT_FIXTURE_DIR).
        #[arg(long)]
        fixture: Option<PathBuf>,
    },
    /// Validate a JSONL log produced by `verify`.
    ValidateLog {
        #[arg(long)]
        input: PathBuf,
    },
}

fn load_sets(dir: &std::path::Path) -> Result<Vec<FixtureSet>, Box<dyn std::error::Error>> {
    let (sets, skipped) = load_fixture_dir(dir)?;
    for (path, err) in skipped {
        eprintln!("Skipping {}: {}", path.display(), err);
    }
    Ok(sets)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let env = HarnessConfig::from_env();

    match cli.command {
        Command::Verify {
            fixture,
            report,
            log,
            timestamp,
        } => {
            let config = env.with_overrides(fixture, log);
            eprintln!(
                "Verifying against fixtures in {}",
                config.fixture_dir.display()
            );
            let fixture_sets = load_sets(&config.fixture_dir)?;

            let run_id = format!("verify-{}", std::process::id());
            let runner = TestRunner::new("verify");
            let mut results = Vec::new();
            match &config.log_path {
                Some(log_path) => {
                    let mut emitter = LogEmitter::to_file(log_path, &run_id, &runner.campaign)?
                        .with_min_level(config.log_level);
                    emitter.emit(LogLevel::Info, "run_start")?;
                    for set in &fixture_sets {
                        results.extend(runner.run_logged(set, &mut emitter)?);
                    }
                    emitter.emit(LogLevel::Info, "run_end")?;
                    emitter.flush()?;
                    eprintln!(
                        "Wrote {} log entries to {}",
                        emitter.emitted(),
                        log_path.display()
                    );
                }
                None => {
                    for set in &fixture_sets {
                        results.extend(runner.run(set));
                    }
                }
            }

            // Stable ordering so reports from identical runs hash identically.
            results.sort_by(|a, b| {
                a.family
                    .cmp(&b.family)
                    .then_with(|| a.symbol.cmp(&b.symbol))
                    .then_with(|| a.case_name.cmp(&b.case_name))
            });

            let report_doc = ConformanceReport {
                title: String::from("minifmt Conformance Report"),
                campaign: runner.campaign.clone(),
                timestamp: timestamp.unwrap_or_else(now_utc),
                summary: VerificationSummary::from_results(results),
            };

            eprintln!(
                "Verification complete: total={}, passed={}, failed={}",
                report_doc.summary.total, report_doc.summary.passed, report_doc.summary.failed
            );
            for failure in report_doc.summary.failures() {
                eprintln!("FAIL {} ({})", failure.case_name, failure.symbol);
                if let Some(diff) = &failure.diff {
                    eprint!("{diff}");
                }
            }

            if let Some(report_path) = report {
                eprintln!("Writing report to {}", report_path.display());
                let markdown = report_doc.to_markdown();
                let json = report_doc.to_json();
                let json_path = report_path.with_extension("json");
                std::fs::write(&report_path, &markdown)?;
                std::fs::write(&json_path, &json)?;

                let mut index = ArtifactIndex::new(&run_id);
                index.add_bytes(&report_path, "report_markdown", markdown.as_bytes());
                index.add_bytes(&json_path, "report_json", json.as_bytes());
                if let Some(log_path) = &config.log_path {
                    index.add_file(log_path, "log_jsonl")?;
                }
                let index_path = report_path.with_extension("artifacts.json");
                std::fs::write(&index_path, index.to_json()?)?;
                eprintln!(
                    "Results digest {} (index: {})",
                    report_doc.results_digest(),
                    index_path.display()
                );
            }

            if !report_doc.summary.all_passed() {
                return Err("Conformance verification failed".into());
            }
        }
        Command::Render {
            format,
            args,
            capacity,
        } => {
            println!("{}", render_format(format.as_bytes(), &args, capacity));
        }
        Command::Scan {
            input,
            format,
            targets,
        } => {
            println!(
                "{}",
                render_scan(input.as_bytes(), format.as_bytes(), &targets)
            );
        }
        Command::BoundsSweep { fixture } => {
            let config = env.with_overrides(fixture, None);
            eprintln!("Sweeping capacities for fixtures in {}", config.fixture_dir.display());
            let mut report = BoundsReport::default();
            for set in load_sets(&config.fixture_dir)? {
                let set_report = bounds::sweep_set(&set)?;
                eprintln!(
                    "{}: {} cases, {} calls, {} violations",
                    set.family,
                    set_report.cases,
                    set_report.calls,
                    set_report.violations.len()
                );
                report.absorb(set_report);
            }
            for v in &report.violations {
                eprintln!("VIOLATION {} at capacity {}: {}", v.case_name, v.capacity, v.message);
            }
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_clean() {
                return Err(format!("{} bounded-write violations", report.violations.len()).into());
            }
        }
        Command::ValidateLog { input } => {
            let (lines, errors) = validate_log_file(&input)?;
            for err in &errors {
                eprintln!("{err}");
            }
            eprintln!(
                "Validated {} lines in {}: {} errors",
                lines,
                input.display(),
                errors.len()
            );
            if !errors.is_empty() {
                return Err("Log validation failed".into());
            }
        }
    }

    Ok(())
}
