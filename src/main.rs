use mutsense::aggregate::{AcceptAll, FileResolver, SourceRoot};
use mutsense::output;
use mutsense::profile::RulesProfile;
use mutsense::report;
use mutsense::rules::{ActiveRules, RuleId};
use mutsense::sensor::{self, Analysis};

use std::process;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "mutsense", version, about = "Mutation-testing metrics and quality rules")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a mutation report: per-file metrics and rule violations
    Analyze {
        /// JSON mutation report
        #[arg(short, long)]
        report: Utf8PathBuf,
        /// Rules profile (TOML). Without one, every rule is active with defaults
        #[arg(short, long)]
        profile: Option<Utf8PathBuf>,
        /// Only keep mutants whose source file exists under this directory
        #[arg(long)]
        source_root: Option<Utf8PathBuf>,
        /// Write the full analysis as JSON to this path
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
        /// Skip the analysis entirely
        #[arg(long, env = "MUTSENSE_SKIP")]
        skip: bool,
        /// Output JSON instead of human-readable text
        #[arg(long)]
        json: bool,
        /// Exit code only, no output
        #[arg(short, long)]
        quiet: bool,
    },
    /// List the rules and their parameters
    Rules {
        /// Output JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Analyze {
            report,
            profile,
            source_root,
            output,
            skip,
            json,
            quiet,
        } => cmd_analyze(report, profile, source_root, output, skip, json, quiet),
        Commands::Rules { json } => cmd_rules(json),
    };

    process::exit(exit_code);
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("MUTSENSE_LOG")
        .or_else(|_| tracing_subscriber::EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| "mutsense=warn".into());

    // stdout carries the report; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_analyze(
    report_path: Utf8PathBuf,
    profile: Option<Utf8PathBuf>,
    source_root: Option<Utf8PathBuf>,
    output_path: Option<Utf8PathBuf>,
    skip: bool,
    json_mode: bool,
    quiet: bool,
) -> i32 {
    // Skip short-circuits before the profile or report is read.
    let analysis = if skip {
        tracing::info!("analysis skipped");
        Analysis::empty()
    } else {
        let rules = match profile {
            Some(path) => match RulesProfile::load(&path) {
                Ok(p) => p.active_rules(),
                Err(e) => {
                    output::print_error(&e.to_string());
                    return 2;
                }
            },
            None => ActiveRules::all(),
        };

        match report::load_report(&report_path) {
            Ok(mutants) => {
                let resolver: Box<dyn FileResolver> = match source_root {
                    Some(root) => Box::new(SourceRoot::new(root)),
                    None => Box::new(AcceptAll),
                };
                sensor::analyze(&mutants, &*resolver, &rules)
            }
            Err(e) => {
                tracing::warn!("{e}; nothing to analyze");
                Analysis::empty()
            }
        }
    };

    if let Some(path) = output_path {
        if let Err(e) = report::save_analysis(&analysis, &path) {
            output::print_error(&e.to_string());
            return 3;
        }
    }

    let code = if analysis.issues.is_empty() { 0 } else { 1 };
    if quiet {
        return code;
    }

    if json_mode {
        match serde_json::to_string(&analysis) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                output::print_error(&format!("Failed to serialize analysis: {e}"));
                return 3;
            }
        }
    } else {
        output::print_analysis(&analysis);
    }

    code
}

fn cmd_rules(json_mode: bool) -> i32 {
    if !json_mode {
        output::print_rules();
        return 0;
    }

    let rules: Vec<serde_json::Value> = RuleId::ALL
        .iter()
        .map(|rule| {
            let params: serde_json::Map<String, serde_json::Value> = rule
                .parameters()
                .iter()
                .map(|(name, default)| (name.to_string(), serde_json::Value::from(*default)))
                .collect();
            serde_json::json!({
                "key": rule.key(),
                "description": rule.description(),
                "parameters": params,
            })
        })
        .collect();
    println!("{}", serde_json::Value::Array(rules));
    0
}
