// src/cli/mod.rs — CLI definition (clap derive)

pub mod chat;
pub mod export;
pub mod listen;
pub mod run;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "optiscope",
    about = "Optical network fault diagnosis from XML telemetry",
    version
)]
pub struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Telemetry root holding alarm/, pm/ and topology/ (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Summarize alarm, PM and topology XML with the cloud backend
    Summarize {
        /// Model for the summary (defaults to config)
        #[arg(long)]
        model: Option<String>,
        /// Model for follow-up chat (defaults to config)
        #[arg(long)]
        chat_model: Option<String>,
        /// Enter the follow-up chat after summarizing
        #[arg(long)]
        chat: bool,
        /// Do not print the cost of each call
        #[arg(long)]
        no_cost: bool,
    },
    /// Compress one category's XML with the local backend
    Extract {
        /// alarm or pm
        #[arg(short, long, default_value = "pm")]
        category: String,
        /// File inside the category folder (first *.xml when omitted)
        #[arg(short, long)]
        file: Option<String>,
        /// Local model (defaults to config)
        #[arg(long)]
        model: Option<String>,
    },
    /// Diagnose from raw alarm XML and a compressed PM summary (local backend)
    Analyze {
        #[arg(long)]
        alarm: Option<String>,
        #[arg(long)]
        pm_summary: Option<String>,
        /// Where to save the analysis
        #[arg(short, long)]
        out: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
    /// Local two-pass pipeline: PM extraction, then analysis
    Diagnose {
        #[arg(long)]
        model: Option<String>,
    },
    /// Render a saved result as plain text or Markdown
    Export {
        /// Result file to export
        #[arg(short, long)]
        input: String,
        /// text or markdown
        #[arg(short, long, default_value = "text")]
        format: String,
        /// Output file path (defaults to stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Log raw alarm notifications from the Kafka alarm topic
    Listen {
        /// Bootstrap broker host:port, repeatable (defaults to config)
        #[arg(long = "broker")]
        brokers: Vec<String>,
        /// Topic to subscribe to (defaults to config)
        #[arg(long)]
        topic: Option<String>,
        /// Consumer group id (defaults to config)
        #[arg(long)]
        group_id: Option<String>,
        /// Read newline-delimited messages from stdin instead of Kafka
        #[arg(long)]
        stdin: bool,
    },
    /// Print sample follow-up questions
    Questions,
}
