// src/cli/listen.rs — `optiscope listen`

use tokio::io::BufReader;

use crate::infra::config::{Config, ListenerConfig};
use crate::listener;

/// Merge command-line overrides into the `[listener]` section.
fn listener_config(
    config: &Config,
    brokers: Vec<String>,
    topic: Option<String>,
    group_id: Option<String>,
) -> ListenerConfig {
    let mut lc = config.listener.clone();
    if !brokers.is_empty() {
        lc.brokers = brokers;
    }
    if let Some(topic) = topic {
        lc.topic = topic;
    }
    if let Some(group_id) = group_id {
        lc.group_id = group_id;
    }
    lc
}

pub async fn run_listen(
    config: &Config,
    brokers: Vec<String>,
    topic: Option<String>,
    group_id: Option<String>,
    from_stdin: bool,
) -> anyhow::Result<()> {
    let lc = listener_config(config, brokers, topic, group_id);

    // Messages are already logged by the listener.
    let stats = if from_stdin {
        listener::listen(&lc.topic, BufReader::new(tokio::io::stdin()), |_| {}).await?
    } else {
        tokio::select! {
            result = listener::listen_kafka(&lc, |_| {}) => result?,
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Interrupted; listener stopped.");
                return Ok(());
            }
        }
    };
    eprintln!(
        "Feed closed: {} received, {} decoded, {} skipped",
        stats.received, stats.decoded, stats.skipped
    );
    Ok(())
}
