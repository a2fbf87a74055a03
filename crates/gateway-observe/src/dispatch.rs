use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::model::TraceEvent;
use crate::sink::TraceSink;

enum Command {
    Record(Box<TraceEvent>),
    Flush(oneshot::Sender<()>),
}

/// Hands trace events to a background worker without awaiting the sink.
///
/// `emit` never blocks the request path: a full or closed queue drops the
/// event and bumps the `dropped` counter.
#[derive(Clone)]
pub struct TraceDispatcher {
    tx: mpsc::Sender<Command>,
    dropped: Arc<AtomicU64>,
}

impl TraceDispatcher {
    /// Starts the worker on the current tokio runtime.
    pub fn spawn(sink: Arc<dyn TraceSink>, capacity: usize) -> Self {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        tokio::spawn(run_worker(sink, rx));
        Self {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn emit(&self, event: TraceEvent) {
        if let Err(err) = self.tx.try_send(Command::Record(Box::new(event))) {
            let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            let reason = match err {
                mpsc::error::TrySendError::Full(_) => "queue_full",
                mpsc::error::TrySendError::Closed(_) => "worker_closed",
            };
            warn!(reason, dropped_total = total, "trace event dropped");
        }
    }

    /// Resolves once every event enqueued before the call has reached the sink.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).await.is_err() {
            return;
        }
        let _ = ack_rx.await;
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

async fn run_worker(sink: Arc<dyn TraceSink>, mut rx: mpsc::Receiver<Command>) {
    while let Some(command) = rx.recv().await {
        match command {
            Command::Record(event) => {
                let action = event.action.clone();
                if let Err(err) = sink.record(*event).await {
                    let obj = err.into_inner();
                    warn!(
                        action = %action,
                        code = %obj.code,
                        error = obj.message_dev.as_deref().unwrap_or(&obj.message_user),
                        "trace sink rejected event"
                    );
                }
            }
            Command::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("trace worker stopped");
}
