// src/main.rs — Optiscope entry point

use clap::Parser;

use optiscope::cli::{Cli, Commands};
use optiscope::infra::config::Config;
use optiscope::infra::logger;
use optiscope::prompt::SAMPLE_QUESTIONS;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Respects RUST_LOG; the listener logs every message at info.
    let level = match (&cli.command, cli.verbose) {
        (_, true) => "debug",
        (Commands::Listen { .. }, false) => "info",
        _ => "warn",
    };
    logger::init_logging(level);

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Load config (falls back to defaults if no config.toml)
    let mut config = if let Some(ref path) = cli.config {
        Config::load_from(std::path::Path::new(path))?
    } else {
        Config::load()?
    };
    if let Some(dir) = cli.data_dir {
        config.paths.data_dir = dir.into();
    }

    match cli.command {
        Commands::Summarize {
            model,
            chat_model,
            chat,
            no_cost,
        } => optiscope::cli::run::run_summarize(&config, model, chat_model, chat, !no_cost).await,
        Commands::Extract {
            category,
            file,
            model,
        } => optiscope::cli::run::run_extract(&config, &category, file.as_deref(), model).await,
        Commands::Analyze {
            alarm,
            pm_summary,
            out,
            model,
        } => optiscope::cli::run::run_analyze(&config, alarm, pm_summary, out, model).await,
        Commands::Diagnose { model } => optiscope::cli::run::run_diagnose(&config, model).await,
        Commands::Export {
            input,
            format,
            output,
        } => optiscope::cli::export::run_export(&input, &format, output.as_deref()),
        Commands::Listen {
            brokers,
            topic,
            group_id,
            stdin,
        } => optiscope::cli::listen::run_listen(&config, brokers, topic, group_id, stdin).await,
        Commands::Questions => {
            optiscope::cli::chat::print_questions(&SAMPLE_QUESTIONS);
            Ok(())
        }
    }
}
