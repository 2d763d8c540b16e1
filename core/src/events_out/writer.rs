use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::config::EventsOutConfig;

#[derive(Clone)]
pub struct EventsOutTx {
    tx: mpsc::Sender<String>,
    dropped: Arc<AtomicU64>,
    drop_when_full: bool,
}

impl EventsOutTx {
    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub async fn send_line(&self, line: String) {
        if self.drop_when_full {
            if self.tx.try_send(line).is_err() {
                let count = self.dropped.fetch_add(1, Ordering::Relaxed);
                // Log every 100 dropped events to avoid log spam
                if count % 100 == 0 {
                    tracing::warn!(
                        target: "regcheck.events_out",
                        dropped_total = count + 1,
                        "events_out channel full, messages are being dropped"
                    );
                }
            }
        } else if self.tx.send(line).await.is_err() {
            tracing::debug!(
                target: "regcheck.events_out",
                "events_out writer closed, send failed"
            );
        }
    }
}

/// Handle on the writer task; [`EventsOutHandle::finish`] flushes and waits for it.
pub struct EventsOutHandle {
    task: JoinHandle<()>,
    ready: Option<oneshot::Receiver<Result<(), String>>>,
}

impl EventsOutHandle {
    pub async fn finish(self, tx: EventsOutTx) {
        drop(tx);
        let _ = self.task.await;
    }

    async fn ready(&mut self) -> Result<(), String> {
        match self.ready.take() {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err("events_out writer exited".to_string())),
            None => Ok(()),
        }
    }
}

/// Start the background writer. Returns `None` when events are disabled.
///
/// Every clone of the returned sender must be dropped before
/// [`EventsOutHandle::finish`] can complete.
pub async fn start_events_out(
    cfg: &EventsOutConfig,
) -> Result<Option<(EventsOutTx, EventsOutHandle)>, String> {
    if !cfg.enabled {
        return Ok(None);
    }
    if cfg.path.trim().is_empty() {
        tracing::warn!(
            target: "regcheck.events_out",
            "events_out path is empty in config, no events will be written"
        );
        return Ok(None);
    }

    let (tx, mut rx) = mpsc::channel::<String>(cfg.channel_capacity.max(1));
    let (ready_tx, ready_rx) = oneshot::channel();
    let path = cfg.path.clone();

    let task = tokio::spawn(async move {
        let mut writer: Box<dyn tokio::io::AsyncWrite + Unpin + Send> = if path == "stdout:" {
            Box::new(tokio::io::stdout())
        } else {
            match tokio::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .await
            {
                Ok(f) => Box::new(f),
                Err(e) => {
                    let _ = ready_tx.send(Err(format!("cannot open {path}: {e}")));
                    return;
                }
            }
        };
        let _ = ready_tx.send(Ok(()));

        let mut write_count = 0usize;
        while let Some(mut line) = rx.recv().await {
            if !line.ends_with('\n') {
                line.push('\n');
            }
            if writer.write_all(line.as_bytes()).await.is_err() {
                tracing::error!(
                    target: "regcheck.events_out",
                    "failed to write to events_out, writer task exiting"
                );
                return;
            }
            write_count += 1;
            if (write_count % 10 == 0 || path == "stdout:") && writer.flush().await.is_err() {
                tracing::error!(target: "regcheck.events_out", "failed to flush events_out");
                return;
            }
        }
        let _ = writer.flush().await;
    });

    let mut handle = EventsOutHandle {
        task,
        ready: Some(ready_rx),
    };
    handle.ready().await?;

    tracing::info!(
        target: "regcheck.events_out",
        path = %cfg.path,
        channel_capacity = cfg.channel_capacity,
        drop_when_full = cfg.drop_when_full,
        "events_out writer started"
    );

    Ok(Some((
        EventsOutTx {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
            drop_when_full: cfg.drop_when_full,
        },
        handle,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events_out::{write_event, LifecycleEvent};

    #[tokio::test]
    async fn disabled_config_starts_nothing() {
        let cfg = EventsOutConfig::default();
        assert!(start_events_out(&cfg).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn writes_one_json_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let cfg = EventsOutConfig {
            enabled: true,
            path: path.display().to_string(),
            ..EventsOutConfig::default()
        };

        let (tx, handle) = start_events_out(&cfg).await.unwrap().unwrap();
        write_event(Some(&tx), &LifecycleEvent::new("session.start").run_id("r1")).await;
        write_event(
            Some(&tx),
            &LifecycleEvent::new("test.result")
                .run_id("r1")
                .test("saxpy_test")
                .data(serde_json::json!({ "passed": true })),
        )
        .await;
        handle.finish(tx).await;

        let text = std::fs::read_to_string(&path).unwrap();
        let events: Vec<LifecycleEvent> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].event_type, "session.start");
        assert_eq!(events[1].test.as_deref(), Some("saxpy_test"));
        assert_eq!(events[1].data, Some(serde_json::json!({ "passed": true })));
    }

    #[tokio::test]
    async fn unopenable_path_is_an_error() {
        let cfg = EventsOutConfig {
            enabled: true,
            path: "/nonexistent-dir/regcheck/events.jsonl".to_string(),
            ..EventsOutConfig::default()
        };
        assert!(start_events_out(&cfg).await.is_err());
    }
}
