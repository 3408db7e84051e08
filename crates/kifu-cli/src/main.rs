//! Kifu CLI
//!
//! Command-line interface for building a relational game corpus out of a
//! directory of game records.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use kifu_ingest::{
    check_validity, decode_date, decode_event, decode_rank, decode_winner, event_country,
    extract_text, load_directory, run_corpus, Color, PipelineConfig, PipelineReport, Verdict,
};

#[derive(Parser)]
#[command(name = "kifu")]
#[command(author, version, about = "Kifu: professional game records to relational rows")]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a corpus pass over every file below a directory.
    ///
    /// Files are visited sorted by name so ids are reproducible.
    Import {
        /// Directory holding the record files
        input: PathBuf,
        /// Output JSON file for the exported rows
        #[arg(short, long)]
        out: PathBuf,
        /// Also write the pass report as JSON
        #[arg(long)]
        report: Option<PathBuf>,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// Decode single record files and print their verdicts
    Check {
        /// Record files
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
}

#[derive(Args)]
struct PipelineArgs {
    /// Pipeline configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Leave records failing validation out of the corpus
    #[arg(long)]
    exclude_invalid: bool,
    /// Decode records in parallel before the sequential fold
    #[arg(long)]
    parallel: bool,
    /// Log progress every N entries (0 disables)
    #[arg(long)]
    progress_every: Option<usize>,
}

impl PipelineArgs {
    fn resolve(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => PipelineConfig::default(),
        };
        if self.exclude_invalid {
            config.exclude_invalid = true;
        }
        if self.parallel {
            config.parallel_decode = true;
        }
        if let Some(n) = self.progress_every {
            config.progress_interval = n;
        }
        Ok(config)
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Import {
            input,
            out,
            report,
            pipeline,
        } => cmd_import(&input, &out, report.as_deref(), &pipeline.resolve()?),
        Commands::Check { files } => cmd_check(&files),
    }
}

fn cmd_import(
    input: &Path,
    out: &Path,
    report_out: Option<&Path>,
    config: &PipelineConfig,
) -> Result<()> {
    tracing::debug!(?config, "pipeline configuration");
    let entries = load_directory(input)?;
    println!(
        "{} {} ({} files)",
        "Importing".green().bold(),
        input.display(),
        entries.len()
    );

    let output = run_corpus(&entries, config)?;
    let export = output.corpus.export();
    fs::write(out, serde_json::to_string_pretty(&export)?)
        .with_context(|| format!("writing {}", out.display()))?;

    if let Some(path) = report_out {
        fs::write(path, serde_json::to_string_pretty(&output.report)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    print_summary(&output.report, export.players.len(), export.events.len().saturating_sub(1));
    println!("  {} {}", "→".cyan(), out.display());
    if let Some(path) = report_out {
        println!("  {} {}", "→".cyan(), path.display());
    }
    Ok(())
}

fn print_summary(report: &PipelineReport, players: usize, events: usize) {
    println!(
        "  {} games={} accepted={} invalid_imported={} players={} events={}",
        "→".yellow(),
        report.imported(),
        report.accepted,
        report.invalid_imported,
        players,
        events
    );
    if report.invalid_excluded > 0 {
        println!(
            "  {} excluded {} invalid records",
            "→".yellow(),
            report.invalid_excluded
        );
    }
    println!(
        "  {} skipped: not_records={} unparseable={} undecodable_events={}",
        "→".yellow(),
        report.not_records,
        report.unparseable,
        report.undecodable_events
    );
    for (label, count) in &report.rejections {
        println!("    {:>6}  {}", count, label.dimmed());
    }
}

fn cmd_check(files: &[PathBuf]) -> Result<()> {
    for path in files {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let text = String::from_utf8_lossy(&bytes);
        println!("{}", path.display().to_string().bold());

        let record = match extract_text(&text) {
            Ok(record) => record,
            Err(err) => {
                println!("  {} {}", "unparseable".red().bold(), err);
                continue;
            }
        };

        match check_validity(&record) {
            Verdict::Accept => println!("  {}", "accepted".green().bold()),
            Verdict::Reject(rejection) => {
                println!("  {} {}", "rejected".yellow().bold(), rejection)
            }
        }

        let tags = &record.tags;
        println!("  moves   {}", record.moves.len());
        match decode_date(&tags.date) {
            Ok(date) => println!("  date    {}", date),
            Err(err) => println!("  date    {}", err.to_string().red()),
        }
        for color in [Color::Black, Color::White] {
            println!(
                "  {:<7} {} ({})",
                color.to_string(),
                tags.player_name(color),
                decode_rank(tags.player_rank(color))
            );
        }
        println!("  winner  {:?}", decode_winner(&tags.result));
        match decode_event(&tags.event) {
            Ok(event) => println!(
                "  event   {} #{} series={:?} country={}",
                event.event_name,
                event.number,
                event.base_name,
                event_country(&event)
            ),
            Err(err) => println!("  event   {}", err.to_string().red()),
        }
    }
    Ok(())
}
