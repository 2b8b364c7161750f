//! Settlement worker
//!
//! Settlement talks to an external contract and can be slow, so it never runs
//! on the move path. The service pushes requests onto an unbounded queue and a
//! single spawned task drains it in order.

use super::coordinator::SettlementCoordinator;
use crate::game::Outcome;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementRequest {
    pub code: String,
    pub outcome: Outcome,
}

enum WorkerMessage {
    Settle(SettlementRequest),
    Flush(oneshot::Sender<()>),
}

/// Sending half of the settlement queue
#[derive(Clone)]
pub struct SettlementQueue {
    tx: mpsc::UnboundedSender<WorkerMessage>,
}

impl SettlementQueue {
    pub fn enqueue(&self, code: &str, outcome: Outcome) {
        let request = SettlementRequest {
            code: code.to_string(),
            outcome,
        };
        if self.tx.send(WorkerMessage::Settle(request)).is_err() {
            warn!("[ESCROW] Settlement worker stopped, dropping request for {}", code);
        }
    }

    /// Wait until every request enqueued before this call has been handled
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(WorkerMessage::Flush(done_tx)).is_ok() {
            let _ = done_rx.await;
        }
    }
}

pub struct SettlementWorker {
    queue: SettlementQueue,
    handle: JoinHandle<()>,
}

impl SettlementWorker {
    pub fn spawn(coordinator: Arc<SettlementCoordinator>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(coordinator, rx));
        Self {
            queue: SettlementQueue { tx },
            handle,
        }
    }

    pub fn queue(&self) -> SettlementQueue {
        self.queue.clone()
    }

    /// Stop the worker after the queued requests are handled
    pub async fn shutdown(self) {
        self.queue.flush().await;
        self.handle.abort();
    }
}

async fn run(coordinator: Arc<SettlementCoordinator>, mut rx: mpsc::UnboundedReceiver<WorkerMessage>) {
    while let Some(message) = rx.recv().await {
        match message {
            WorkerMessage::Settle(request) => {
                debug!("[ESCROW] Settling {} ({})", request.code, request.outcome);
                if let Err(e) = coordinator.settle(&request.code, request.outcome).await {
                    error!("[ESCROW] Settlement of {} failed: {}", request.code, e);
                }
            }
            WorkerMessage::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
}
