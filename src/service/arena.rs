//! Collaborator wiring
//!
//! [`Arena`] builds the service, the settlement coordinator and its worker
//! around one shared set of collaborators and one lock registry.

use super::broadcast::Broadcaster;
use super::locks::MatchLocks;
use super::match_service::MatchService;
use super::store::MatchStore;
use crate::core::ArenaConfig;
use crate::escrow::{CustodyContract, SettlementCoordinator, SettlementWorker};
use std::sync::Arc;
use tracing::info;

pub struct Arena {
    pub service: Arc<MatchService>,
    pub coordinator: Arc<SettlementCoordinator>,
    locks: Arc<MatchLocks>,
    worker: SettlementWorker,
}

impl Arena {
    /// Must be called from within a tokio runtime
    pub fn new(
        config: ArenaConfig,
        store: Arc<dyn MatchStore>,
        custody: Arc<dyn CustodyContract>,
        broadcaster: Arc<dyn Broadcaster>,
    ) -> Self {
        let locks = Arc::new(MatchLocks::new());
        let coordinator = Arc::new(SettlementCoordinator::new(
            config.clone(),
            Arc::clone(&store),
            custody,
            Arc::clone(&broadcaster),
            Arc::clone(&locks),
        ));
        let worker = SettlementWorker::spawn(Arc::clone(&coordinator));
        let service = MatchService::new(
            &config,
            store,
            broadcaster,
            Arc::clone(&locks),
            worker.queue(),
        );
        info!(
            "[ARENA] Ready: {}s turns, operator {}",
            config.turn_seconds, config.operator_address
        );
        Self {
            service,
            coordinator,
            locks,
            worker,
        }
    }

    /// Lock registry shared by the service and the coordinator
    pub fn locks(&self) -> &MatchLocks {
        &self.locks
    }

    /// Wait for every settlement queued so far
    pub async fn settled(&self) {
        self.worker.queue().flush().await;
    }

    pub async fn shutdown(self) {
        self.worker.shutdown().await;
    }
}
