//! Grounded CLI
//!
//! Answers questions over a chunked report corpus with retrieval-augmented
//! generation, using one of three strategies or comparing all of them.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use commands::{AskCommand, CompareCommand};
use grounded_core::{config::AppConfig, logging};
use std::path::PathBuf;

/// Grounded - source-grounded answers over a report corpus
#[derive(Parser, Debug)]
#[command(name = "grounded")]
#[command(about = "Source-grounded question answering over a report corpus", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to workspace directory (default: current directory)
    #[arg(short, long, global = true, env = "GROUNDED_WORKSPACE")]
    workspace: Option<PathBuf>,

    /// Path to config file
    #[arg(short, long, global = true, env = "GROUNDED_CONFIG")]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    /// Emit log lines as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// LLM provider (ollama, openai)
    #[arg(short, long, global = true, env = "GROUNDED_PROVIDER")]
    provider: Option<String>,

    /// Model identifier
    #[arg(short, long, global = true, env = "GROUNDED_MODEL")]
    model: Option<String>,

    /// Corpus chunk file (JSON or JSONL)
    #[arg(long, global = true, env = "GROUNDED_CORPUS")]
    corpus: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Answer a question with one strategy
    Ask(AskCommand),

    /// Run every strategy on the same questions and report side by side
    Compare(CompareCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load_with(cli.workspace.as_deref(), cli.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(
            None,
            None,
            cli.provider,
            cli.model,
            cli.corpus,
            cli.log_level,
            cli.verbose,
            cli.no_color,
            cli.log_json,
        );

    logging::init_logging(config.log_level.as_deref(), config.no_color, config.log_json)
        .context("Failed to initialize logging")?;

    tracing::debug!("Workspace: {:?}", config.workspace);
    tracing::debug!("Provider: {}, model: {}", config.provider, config.model);

    config.validate().context("Invalid configuration")?;

    let command_name = match &cli.command {
        Commands::Ask(_) => "ask",
        Commands::Compare(_) => "compare",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Compare(cmd) => cmd.execute(&config).await,
    };

    if let Err(e) = &result {
        tracing::error!("Command failed: {:#}", e);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use grounded_knowledge::Strategy;

    #[test]
    fn test_parse_ask_with_strategy() {
        let cli = Cli::try_parse_from([
            "grounded",
            "--corpus",
            "tcs.jsonl",
            "ask",
            "What was revenue?",
            "--strategy",
            "multi-query",
            "--json",
        ])
        .unwrap();

        assert_eq!(cli.corpus, Some(PathBuf::from("tcs.jsonl")));
        match cli.command {
            Commands::Ask(cmd) => {
                assert_eq!(cmd.question, "What was revenue?");
                assert_eq!(cmd.strategy, Strategy::MultiQuery);
                assert!(cmd.json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_ask_defaults_to_direct() {
        let cli = Cli::try_parse_from(["grounded", "ask", "q"]).unwrap();
        match cli.command {
            Commands::Ask(cmd) => assert_eq!(cmd.strategy, Strategy::Direct),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_unknown_strategy() {
        assert!(Cli::try_parse_from(["grounded", "ask", "q", "--strategy", "rerank"]).is_err());
    }

    #[test]
    fn test_parse_compare_requires_input() {
        assert!(Cli::try_parse_from(["grounded", "compare"]).is_err());
        assert!(Cli::try_parse_from(["grounded", "compare", "--questions", "q.txt"]).is_ok());
    }
}
