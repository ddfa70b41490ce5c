//! Minimal chat host around the unfurl pipeline.
//!
//! Each stdin line is treated as one chat message on a single always-enabled
//! channel; replies go to stdout. With no `--domain` flags nothing is
//! monitored and every URL goes straight to the title fallback.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use unfurl_core::{ConfigSnapshot, DEFAULT_MAX_TITLE_LENGTH};
use unfurl_engine::{ConfigSource, FetchSettings, Pipeline, ReplySink, ReqwestFetcher};
use unfurl_logging::LogDestination;

const STDIN_CHANNEL: &str = "stdin";

#[derive(Debug, Parser)]
#[command(
    name = "unfurl",
    about = "Summarize URLs found in chat messages read from stdin."
)]
struct Cli {
    /// Domain to monitor for oEmbed resolution (repeatable).
    #[arg(long = "domain", value_name = "HOST")]
    domains: Vec<String>,

    /// Maximum length of a fallback page title, in characters.
    #[arg(long, default_value_t = DEFAULT_MAX_TITLE_LENGTH)]
    max_title_length: usize,

    /// Disable the page-title fallback.
    #[arg(long)]
    no_title_fallback: bool,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 10)]
    timeout_secs: u64,

    /// Also write logs to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

struct CliConfig {
    snapshot: ConfigSnapshot,
}

impl ConfigSource for CliConfig {
    fn is_channel_enabled(&self, channel_id: &str) -> bool {
        channel_id == STDIN_CHANNEL
    }

    fn snapshot(&self) -> ConfigSnapshot {
        self.snapshot.clone()
    }
}

struct StdoutSink;

impl ReplySink for StdoutSink {
    fn emit(&self, text: &str) {
        println!("{text}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.log_file {
        Some(ref path) => unfurl_logging::initialize(LogDestination::Both(path.clone())),
        None => unfurl_logging::initialize(LogDestination::Terminal),
    }

    let config = CliConfig {
        snapshot: ConfigSnapshot::new(&cli.domains, !cli.no_title_fallback, cli.max_title_length),
    };
    let settings = FetchSettings {
        request_timeout: Duration::from_secs(cli.timeout_secs),
        ..FetchSettings::default()
    };
    let pipeline = Pipeline::new(Arc::new(ReqwestFetcher::new(settings)));

    log::info!("unfurl: reading messages from stdin");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        pipeline
            .process_message(STDIN_CHANNEL, &line, &config, &StdoutSink)
            .await;
    }
    Ok(())
}
