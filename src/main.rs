use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use weechat_script_lint::analyzer::{LintOptions, ScriptAnalyzer};
use weechat_script_lint::discovery::{collect_scripts, parse_ignored_files};
use weechat_script_lint::report::{scores_by_score, scores_listing, Summary, FATAL_EXIT_CODE};
use weechat_script_lint::{LintError, Severity};

/// Command line interface configuration using `clap`.
#[derive(Parser)]
#[command(version, about = "Static analysis tool for WeeChat scripts", long_about = None)]
struct Cli {
    /// Do not use colors in output
    #[arg(short = 'c', long)]
    no_colors: bool,

    /// Comma-separated list of file names to ignore
    #[arg(short = 'i', long, value_name = "FILES")]
    ignore_files: Option<String>,

    /// Level of messages to display: error = errors only, warning = errors and
    /// warnings, info = all messages
    #[arg(short, long, value_enum, default_value_t = Severity::Info)]
    level: Severity,

    /// Comma-separated list of message names to ignore
    #[arg(short = 'm', long, value_name = "NAMES")]
    ignore_messages: Option<String>,

    /// Display only the name of scripts with messages; no summary and no exit code message
    #[arg(short, long)]
    name_only: bool,

    /// Do not display any message
    #[arg(short, long)]
    quiet: bool,

    /// Recursively find scripts in sub-directories
    #[arg(short, long)]
    recursive: bool,

    /// Count warnings as errors in the returned code
    #[arg(short, long)]
    strict: bool,

    /// Display scores by script, grouped by score; no report and no exit code message
    #[arg(short = 'S', long)]
    score: bool,

    /// Output results as JSON
    #[arg(short, long)]
    json: bool,

    /// Verbose output (repeat for more)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Paths to directories or WeeChat scripts
    #[arg(required = true)]
    paths: Vec<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("FATAL: {}", e);
            FATAL_EXIT_CODE
        }
    };
    std::process::exit(code);
}

/// Analyzes all scripts and prints the results; returns the exit code.
fn run(cli: &Cli) -> Result<i32> {
    let use_colors = !cli.no_colors;
    let ignored_files = parse_ignored_files(cli.ignore_files.as_deref().unwrap_or_default());
    let options = LintOptions::default()
        .with_ignore_list(cli.ignore_messages.as_deref().unwrap_or_default())
        .with_min_level(cli.level)
        .with_colors(use_colors);

    // Discover all scripts first: an invalid path aborts before any report.
    let mut scripts = Vec::new();
    for path in &cli.paths {
        scripts.extend(collect_scripts(path, cli.recursive, &ignored_files)?);
    }
    info!(scripts = scripts.len(), "Analyzing scripts");

    // Scripts are independent: analyze them in parallel, results keep discovery order.
    let analyzers = scripts
        .par_iter()
        .map(|path| {
            let mut analyzer = ScriptAnalyzer::new(path, options.clone())?;
            analyzer.check()?;
            Ok(analyzer)
        })
        .collect::<Result<Vec<ScriptAnalyzer>, LintError>>()?;

    let mut summary = Summary::default();
    for analyzer in &analyzers {
        summary.add(analyzer);
    }
    let code = summary.exit_code(cli.strict);

    if cli.json {
        let results: Vec<_> = analyzers.iter().map(ScriptAnalyzer::result).collect();
        if !cli.quiet {
            println!(
                "{}",
                serde_json::to_string_pretty(&results).context("cannot serialize results")?
            );
        }
        return Ok(code);
    }

    if !cli.quiet && !cli.score {
        for analyzer in &analyzers {
            let report = analyzer.get_report(cli.name_only);
            if !report.is_empty() {
                println!("{}", report);
            }
        }
    }
    if !cli.quiet && cli.score && !summary.scores.is_empty() {
        println!("{}", scores_by_score(&summary.scores, use_colors));
    }
    if !cli.quiet && !cli.name_only && !cli.score {
        if !summary.scores.is_empty() {
            println!("{}", scores_listing(&summary.scores, use_colors));
        }
        println!("{}", summary.status_line(use_colors));
        println!("Exiting with code {}", code);
    }

    Ok(code)
}

/// Logs go to stderr so they never mix with reports.
fn setup_logging(verbosity: u8, quiet: bool) {
    let filter = match (quiet, verbosity) {
        (true, _) => "off",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}
