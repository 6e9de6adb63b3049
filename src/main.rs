//! PhishGuard CLI - classify URLs from the command line
//!
//! URLs come from arguments or, when none are given, one per line on stdin.
//! Results print as a verdict panel, or as JSON with `--json`.

use clap::Parser;
use eyre::Result;
use phishguard::{classify, AppError, DetectorConfig, HistoryStore, ScanResult};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "phishguard", version, about = "Hybrid RF + LSTM URL phishing classifier")]
struct Cli {
    /// Print results as JSON
    #[arg(long)]
    json: bool,

    /// JSON file overriding the keyword, brand, homograph, TLD and shortener lists
    #[arg(long, value_name = "PATH")]
    model_config: Option<PathBuf>,

    /// Append results to a JSON history file
    #[arg(long, value_name = "PATH")]
    history: Option<PathBuf>,

    /// URLs to scan (reads stdin when omitted)
    urls: Vec<String>,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for --json
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = match &cli.model_config {
        Some(path) => DetectorConfig::from_json_file(path)?,
        None => DetectorConfig::from_env()?,
    };

    let inputs: Vec<String> = if cli.urls.is_empty() {
        io::stdin().lock().lines().collect::<io::Result<_>>()?
    } else {
        cli.urls.clone()
    };

    let mut results = Vec::new();
    for input in &inputs {
        let url = input.trim();
        if url.is_empty() {
            eprintln!("{}", AppError::empty_url().message);
            continue;
        }
        let result = classify(url, &config);
        if !cli.json {
            print_result(&result);
        }
        results.push(result);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    }

    if let Some(path) = &cli.history {
        let store = HistoryStore::new(path);
        let mut history = store.load()?;
        // Oldest first so the last scanned URL ends up most recent
        for result in results {
            history.record(result);
        }
        if let Err(e) = store.save(&history) {
            warn!("⚠️ Failed to save history: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}

fn print_result(result: &ScanResult) {
    println!();
    println!("{} {}", result.verdict.emoji(), result.verdict.headline());
    println!("   {}", result.display_url());
    println!("   Confidence: {}%", result.confidence);
    for (label, value) in result.detail_rows() {
        println!("   {:<18} {}", label, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "phishguard",
            "--json",
            "--model-config",
            "rules.json",
            "https://example.com",
            "not a url",
        ]);
        assert!(cli.json);
        assert_eq!(cli.model_config, Some(PathBuf::from("rules.json")));
        assert_eq!(cli.urls.len(), 2);
    }
}
