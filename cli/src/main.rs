mod config;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use eclipse_schedule_core::validate_table;
use eclipse_schedule_export::{save_csv, write_csv, write_json};
use eclipse_schedule_parser::{
    MalformedPolicy, ParseDiagnostics, ParseOutcome, ParserConfig, ScheduleInput, ScheduleParser,
};
use serde::Serialize;
use tracing::Level;

use crate::config::RunConfig;

/// CLI-specific output format enum with clap argument parsing support.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliOutputFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliMalformedPolicy {
    Skip,
    Abort,
}

impl From<CliMalformedPolicy> for MalformedPolicy {
    fn from(policy: CliMalformedPolicy) -> Self {
        match policy {
            CliMalformedPolicy::Skip => Self::Skip,
            CliMalformedPolicy::Abort => Self::Abort,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "schedule-parse", version)]
#[command(about = "Extract COMPDAT/COMPDATL well connections from Eclipse schedule files")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Silence log output and the run summary.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse a schedule file and export its connection table.
    Parse(ParseArgs),
    /// Print the normalized line sequence of a schedule file.
    Normalize(NormalizeArgs),
    /// Check a schedule file against the input contract and validate its table.
    Check(CheckArgs),
    /// Write a run configuration file filled with default values.
    InitConfig(InitConfigArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// Schedule file (.inc); overrides `input` from the config file.
    #[arg(long)]
    input: Option<PathBuf>,
    /// YAML run configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Source encoding label (e.g. utf-8, windows-1251).
    #[arg(long)]
    encoding: Option<String>,
    /// Read the file in fragments of this many bytes.
    #[arg(long)]
    chunk_size: Option<usize>,
}

#[derive(Debug, Args)]
struct ParseArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Output file; the table goes to stdout when omitted.
    #[arg(long)]
    output: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value = "csv")]
    format: CliOutputFormat,
    /// CSV field delimiter.
    #[arg(long)]
    delimiter: Option<char>,
    /// CSV output encoding label.
    #[arg(long)]
    output_encoding: Option<String>,
    /// Prepend a zero-based row index column.
    #[arg(long)]
    write_index: bool,
    /// Omit the CSV header row.
    #[arg(long)]
    no_header: bool,
    /// Policy for record lines with the wrong number of fields.
    #[arg(long)]
    on_malformed: Option<CliMalformedPolicy>,
    /// Do not emit rows for dates without connections.
    #[arg(long)]
    no_empty_dates: bool,
    /// Fail when the schedule has no END marker.
    #[arg(long)]
    require_end: bool,
    /// Pretty-print JSON output.
    #[arg(long)]
    pretty: bool,
}

#[derive(Debug, Args)]
struct NormalizeArgs {
    #[command(flatten)]
    source: SourceArgs,
}

#[derive(Debug, Args)]
struct CheckArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Fail when the schedule has no END marker.
    #[arg(long)]
    require_end: bool,
    /// Print the report as JSON.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Args)]
struct InitConfigArgs {
    /// Path of the configuration file to write.
    #[arg(long)]
    output: PathBuf,
    /// Overwrite an existing file.
    #[arg(long)]
    force: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Command::Parse(args) => run_parse(args, cli.quiet),
        Command::Normalize(args) => run_normalize(args),
        Command::Check(args) => run_check(args),
        Command::InitConfig(args) => run_init_config(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8, quiet: bool) {
    if quiet {
        return;
    }
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(level)
        .with_target(false)
        .init();
}

/// Loads the run configuration and applies the shared source flags.
fn resolve_source(source: &SourceArgs) -> Result<(RunConfig, PathBuf), String> {
    let mut run = RunConfig::load_or_default(source.config.as_deref())?;
    if let Some(input) = &source.input {
        run.input = Some(input.clone());
    }
    if let Some(encoding) = &source.encoding {
        run.parser.encoding = encoding.clone();
    }
    if let Some(chunk_size) = source.chunk_size {
        run.parser.chunk_size = Some(chunk_size);
    }

    let input = run.input.clone().ok_or_else(|| {
        "No input file given; pass --input or set `input` in the config file".to_string()
    })?;
    Ok((run, input))
}

fn open_parser(input: &Path, config: ParserConfig) -> Result<ScheduleParser, String> {
    ScheduleParser::new(input, config).map_err(|err| err.to_string())
}

fn parse_schedule(input: &Path, config: ParserConfig) -> Result<ParseOutcome, String> {
    open_parser(input, config)?
        .parse()
        .map_err(|err| format!("Failed to parse '{}': {err}", input.display()))
}

fn run_parse(args: ParseArgs, quiet: bool) -> Result<(), String> {
    let (mut run, input) = resolve_source(&args.source)?;
    if let Some(output) = args.output {
        run.output = Some(output);
    }
    if let Some(delimiter) = args.delimiter {
        run.export.delimiter = delimiter;
    }
    if let Some(encoding) = args.output_encoding {
        run.export.encoding = encoding;
    }
    if args.write_index {
        run.export.write_index = true;
    }
    if args.no_header {
        run.export.write_header = false;
    }
    if let Some(policy) = args.on_malformed {
        run.parser.on_malformed = policy.into();
    }
    if args.no_empty_dates {
        run.parser.emit_empty_dates = false;
    }
    if args.require_end {
        run.parser.require_terminator = true;
    }

    let outcome = parse_schedule(&input, run.parser.clone())?;
    let table = &outcome.table;

    match (&run.output, args.format) {
        (Some(path), CliOutputFormat::Csv) => save_csv(table, path, &run.export)
            .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?,
        (Some(path), CliOutputFormat::Json) => {
            let file = fs::File::create(path)
                .map_err(|err| format!("Failed to create '{}': {err}", path.display()))?;
            write_json(table, BufWriter::new(file), args.pretty)
                .map_err(|err| format!("Failed to write '{}': {err}", path.display()))?;
        }
        (None, CliOutputFormat::Csv) => write_csv(table, io::stdout().lock(), &run.export)
            .map_err(|err| format!("Failed to write CSV: {err}"))?,
        (None, CliOutputFormat::Json) => {
            let mut stdout = io::stdout().lock();
            write_json(table, &mut stdout, args.pretty)
                .map_err(|err| format!("Failed to write JSON: {err}"))?;
            writeln!(stdout).map_err(|err| format!("Failed to write JSON: {err}"))?;
        }
    }

    if !quiet {
        eprintln!("{}", summary_line(&input, &outcome.diagnostics));
    }
    Ok(())
}

fn summary_line(input: &Path, diagnostics: &ParseDiagnostics) -> String {
    format!(
        "Parsed {} row(s) from '{}': {} connection(s), {} date-only, {} skipped",
        diagnostics.rows(),
        input.display(),
        diagnostics.records,
        diagnostics.date_only_records,
        diagnostics.skipped.len()
    )
}

fn run_normalize(args: NormalizeArgs) -> Result<(), String> {
    let (run, input) = resolve_source(&args.source)?;
    let lines = open_parser(&input, run.parser)?
        .normalized_lines()
        .map_err(|err| format!("Failed to read '{}': {err}", input.display()))?;

    let mut stdout = io::stdout().lock();
    for line in lines {
        writeln!(stdout, "{line}").map_err(|err| format!("Failed to write output: {err}"))?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct CheckReport {
    input: PathBuf,
    size: u64,
    diagnostics: ParseDiagnostics,
    skipped_records: Vec<String>,
    issues: Vec<String>,
}

fn run_check(args: CheckArgs) -> Result<(), String> {
    let (mut run, input) = resolve_source(&args.source)?;
    if args.require_end {
        run.parser.require_terminator = true;
    }

    let checked = ScheduleInput::check(&input).map_err(|err| err.to_string())?;
    let outcome = parse_schedule(&input, run.parser)?;
    let issues: Vec<String> = validate_table(&outcome.table)
        .iter()
        .map(ToString::to_string)
        .collect();

    let report = CheckReport {
        input: checked.path().to_path_buf(),
        size: checked.size(),
        skipped_records: outcome
            .diagnostics
            .skipped
            .iter()
            .map(ToString::to_string)
            .collect(),
        diagnostics: outcome.diagnostics,
        issues,
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| format!("Failed to serialize report: {e}"))?;
        println!("{json}");
    } else {
        print_check_report(&report);
    }

    if report.issues.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "{} validation issue(s) in '{}'",
            report.issues.len(),
            input.display()
        ))
    }
}

fn print_check_report(report: &CheckReport) {
    let diagnostics = &report.diagnostics;
    println!("Input: {} ({} bytes)", report.input.display(), report.size);
    println!("Normalized lines: {}", diagnostics.normalized_lines);
    println!("Blocks: {}", diagnostics.blocks);
    println!(
        "Rows: {} ({} connection(s), {} date-only)",
        diagnostics.rows(),
        diagnostics.records,
        diagnostics.date_only_records
    );
    println!("Discarded lines: {}", diagnostics.discarded_lines);
    if !diagnostics.terminated {
        println!(
            "Warning: no END marker; {} trailing line(s) dropped",
            diagnostics.unterminated_lines
        );
    }
    for skipped in &report.skipped_records {
        println!("Skipped: {skipped}");
    }
    for issue in &report.issues {
        println!("Issue: {issue}");
    }
    if report.issues.is_empty() {
        println!("OK");
    }
}

fn run_init_config(args: InitConfigArgs) -> Result<(), String> {
    if args.output.exists() && !args.force {
        return Err(format!(
            "'{}' already exists; pass --force to overwrite",
            args.output.display()
        ));
    }
    RunConfig::default().save(&args.output)?;
    println!("Wrote {}", args.output.display());
    Ok(())
}
