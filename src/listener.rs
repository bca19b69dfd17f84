// src/listener.rs — Alarm notification ingestion stub
//
// Subscribes to the alarm topic on a Kafka cluster, decodes each record value
// as UTF-8 and logs it. Independent of the diagnostic pipeline. Records are
// handled one at a time; a record that fails to decode is logged and skipped.
// A newline-delimited feed (e.g. a captured log on stdin) goes through the
// same decode path.

use std::fmt::Display;
use std::sync::Arc;

use futures::stream::{self, Stream, StreamExt};
use rskafka::client::consumer::{StartOffset, StreamConsumerBuilder};
use rskafka::client::partition::UnknownTopicHandling;
use rskafka::client::ClientBuilder;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::infra::config::ListenerConfig;
use crate::infra::errors::OptiscopeError;

/// Counters for one listening run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListenerStats {
    pub received: u64,
    pub decoded: u64,
    pub skipped: u64,
    pub fetch_errors: u64,
}

pub fn decode_message(raw: &[u8]) -> Result<String, OptiscopeError> {
    String::from_utf8(raw.to_vec()).map_err(|e| OptiscopeError::Decode(e.to_string()))
}

fn dispatch<F>(topic: &str, raw: &[u8], stats: &mut ListenerStats, on_message: &mut F)
where
    F: FnMut(&str),
{
    stats.received += 1;
    match decode_message(raw) {
        Ok(text) => {
            stats.decoded += 1;
            tracing::info!(topic, "Received alarm message: {text}");
            on_message(&text);
        }
        Err(e) => {
            stats.skipped += 1;
            tracing::error!(topic, "{e}");
        }
    }
}

fn log_closed(topic: &str, stats: &ListenerStats) {
    tracing::info!(
        topic,
        "Feed closed: {} received, {} decoded, {} skipped",
        stats.received,
        stats.decoded,
        stats.skipped
    );
}

/// Consume record values until the stream ends. Fetch errors are logged and
/// the stream is polled again.
pub async fn consume<S, E, F>(
    topic: &str,
    mut records: S,
    mut on_message: F,
) -> Result<ListenerStats, OptiscopeError>
where
    S: Stream<Item = Result<Vec<u8>, E>> + Unpin,
    E: Display,
    F: FnMut(&str),
{
    let mut stats = ListenerStats::default();

    while let Some(item) = records.next().await {
        match item {
            Ok(raw) => dispatch(topic, &raw, &mut stats, &mut on_message),
            Err(e) => {
                stats.fetch_errors += 1;
                tracing::error!(topic, "Fetch failed: {e}");
            }
        }
    }

    log_closed(topic, &stats);
    Ok(stats)
}

/// Consume a newline-delimited feed until EOF. Blank lines are ignored.
pub async fn listen<R, F>(
    topic: &str,
    mut feed: R,
    mut on_message: F,
) -> Result<ListenerStats, OptiscopeError>
where
    R: AsyncBufRead + Unpin,
    F: FnMut(&str),
{
    let mut stats = ListenerStats::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        let n = feed.read_until(b'\n', &mut buf).await?;
        if n == 0 {
            break;
        }

        let raw = trim_line_ending(&buf);
        if raw.is_empty() {
            continue;
        }
        dispatch(topic, raw, &mut stats, &mut on_message);
    }

    log_closed(topic, &stats);
    Ok(stats)
}

/// Subscribe to every partition of the configured topic, starting at the
/// latest offset, and run until the process is stopped.
pub async fn listen_kafka<F>(config: &ListenerConfig, on_message: F) -> Result<ListenerStats, OptiscopeError>
where
    F: FnMut(&str),
{
    if config.brokers.is_empty() {
        return Err(OptiscopeError::Config("[listener] brokers is empty".into()));
    }
    let brokers = config.brokers.join(",");

    let client = ClientBuilder::new(config.brokers.clone())
        .build()
        .await
        .map_err(|e| OptiscopeError::Feed(format!("Kafka consumer failed to start: {e}")))?;

    let partitions = client
        .list_topics()
        .await
        .map_err(|e| OptiscopeError::Feed(e.to_string()))?
        .into_iter()
        .find(|t| t.name == config.topic)
        .map(|t| t.partitions)
        .ok_or_else(|| {
            OptiscopeError::Feed(format!("topic `{}` not found on {brokers}", config.topic))
        })?;

    let mut streams = Vec::with_capacity(partitions.len());
    for partition in partitions {
        let partition_client = client
            .partition_client(config.topic.clone(), partition, UnknownTopicHandling::Error)
            .await
            .map_err(|e| OptiscopeError::Feed(e.to_string()))?;
        let consumer = StreamConsumerBuilder::new(Arc::new(partition_client), StartOffset::Latest)
            .with_max_wait_ms(config.max_wait_ms)
            .build();
        streams.push(
            consumer
                .map(|item| item.map(|(record, _high_watermark)| record.record.value.unwrap_or_default()))
                .boxed_local(),
        );
    }

    tracing::info!(
        "Listening to topic `{}` on broker {} (group {}, {} partition(s))...",
        config.topic,
        brokers,
        config.group_id,
        streams.len()
    );
    consume(&config.topic, stream::select_all(streams), on_message).await
}

fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
