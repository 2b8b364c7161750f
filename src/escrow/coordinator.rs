//! Settlement coordinator
//!
//! Maps a finished match's outcome onto the custody contract and records the
//! result in the match's local escrow status.
//!
//! # Settlement
//!
//! 1. A match without a wager needs nothing.
//! 2. The contract's view is read first. Resolved or Refunded escrows were
//!    already settled, so the local status just catches up. That read is what
//!    makes repeated `settle` calls safe.
//! 3. Active escrows are resolved: a win pays the winner's seat identity, a
//!    draw passes the configured draw signal.
//!
//! A local Settled or Refunded status is never replaced by a later attempt, so
//! overlapping settlements of one match agree on the final status.
//!
//! Contract failures never propagate to players. They are logged and recorded
//! as [`EscrowStatus::Failed`], which [`SettlementCoordinator::retry`] picks up.

use super::contract::{ContractError, ContractStatus, CustodyContract};
use crate::core::{ArenaConfig, StoreError};
use crate::game::{EscrowStatus, Match, Outcome};
use crate::service::{Broadcaster, MatchEvent, MatchLocks, MatchStore};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug)]
pub enum SettlementError {
    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("match {code} is not finished")]
    NotFinished { code: String },

    #[error("match {code} not found")]
    MatchNotFound { code: String },
}

pub type SettlementResult<T> = Result<T, SettlementError>;

pub struct SettlementCoordinator {
    config: ArenaConfig,
    store: Arc<dyn MatchStore>,
    contract: Arc<dyn CustodyContract>,
    broadcaster: Arc<dyn Broadcaster>,
    locks: Arc<MatchLocks>,
}

impl SettlementCoordinator {
    pub fn new(
        config: ArenaConfig,
        store: Arc<dyn MatchStore>,
        contract: Arc<dyn CustodyContract>,
        broadcaster: Arc<dyn Broadcaster>,
        locks: Arc<MatchLocks>,
    ) -> Self {
        Self {
            config,
            store,
            contract,
            broadcaster,
            locks,
        }
    }

    /// Settle the wager of `code` for `outcome`
    ///
    /// Returns the recorded escrow status, or `None` when the match has no
    /// wager.
    pub async fn settle(
        &self,
        code: &str,
        outcome: Outcome,
    ) -> SettlementResult<Option<EscrowStatus>> {
        let m = self.load(code).await?;
        let Some(wager) = m.wager.as_ref() else {
            debug!("[ESCROW] {} has no wager", code);
            return Ok(None);
        };
        if wager.escrow_status.is_final() {
            return Ok(Some(wager.escrow_status));
        }

        let status = self.settle_with_contract(&m, outcome).await;
        let recorded = self.record_status(code, status).await?;
        Ok(Some(recorded))
    }

    /// Settle again after a failed or missed attempt
    pub async fn retry(&self, code: &str) -> SettlementResult<Option<EscrowStatus>> {
        let m = self.load(code).await?;
        let outcome = match (m.is_finished(), m.winner) {
            (true, Some(outcome)) => outcome,
            _ => {
                return Err(SettlementError::NotFinished {
                    code: code.to_string(),
                })
            }
        };
        info!("[ESCROW] Retrying settlement of {}", code);
        self.settle(code, outcome).await
    }

    /// Refund an escrow that has sat unresolved past the refund timeout
    ///
    /// Returns `true` when a refund was issued.
    pub async fn refund_expired(&self, code: &str, now: DateTime<Utc>) -> SettlementResult<bool> {
        let view = self.contract.get_match(code).await?;
        if !matches!(view.status, ContractStatus::Pending | ContractStatus::Active) {
            return Ok(false);
        }
        let age = now.signed_duration_since(view.created_at);
        if age.to_std().map_or(true, |age| age < self.config.refund_timeout()) {
            return Ok(false);
        }

        let tx = self.contract.refund(code, &self.config.operator_address).await?;
        info!("[ESCROW] Refunded expired escrow {} (tx {})", code, tx);
        if self.store.load(code).await?.is_some() {
            self.record_status(code, EscrowStatus::Refunded).await?;
        }
        Ok(true)
    }

    async fn settle_with_contract(&self, m: &Match, outcome: Outcome) -> EscrowStatus {
        let view = match self.contract.get_match(&m.code).await {
            Ok(view) => view,
            Err(ContractError::NotFound { .. }) => {
                warn!("[ESCROW] No escrow on record for {}", m.code);
                return EscrowStatus::Failed;
            }
            Err(e) => {
                error!("[ESCROW] Failed to read escrow {}: {}", m.code, e);
                return EscrowStatus::Failed;
            }
        };

        match view.status {
            ContractStatus::Resolved => EscrowStatus::Settled,
            ContractStatus::Refunded => EscrowStatus::Refunded,
            ContractStatus::Pending => {
                warn!("[ESCROW] Escrow {} never received the second stake", m.code);
                EscrowStatus::Failed
            }
            ContractStatus::Active => {
                let Some(target) = self.payout_target(m, outcome) else {
                    error!("[ESCROW] {} has no identity for {}", m.code, outcome);
                    return EscrowStatus::Failed;
                };
                match self
                    .contract
                    .resolve(&m.code, &self.config.operator_address, &target)
                    .await
                {
                    Ok(tx) => {
                        info!("[ESCROW] Resolved {} to {} (tx {})", m.code, target, tx);
                        EscrowStatus::Settled
                    }
                    Err(e) => match self.contract.get_match(&m.code).await {
                        Ok(view) if view.status == ContractStatus::Resolved => {
                            debug!("[ESCROW] {} was resolved by a concurrent attempt", m.code);
                            EscrowStatus::Settled
                        }
                        _ => {
                            error!("[ESCROW] Resolve failed for {}: {}", m.code, e);
                            EscrowStatus::Failed
                        }
                    },
                }
            }
        }
    }

    fn payout_target(&self, m: &Match, outcome: Outcome) -> Option<String> {
        match outcome {
            Outcome::Draw => Some(self.config.draw_signal_address.clone()),
            Outcome::Winner(color) => m.seat(color).map(str::to_string),
        }
    }

    /// Load-modify-save of the escrow status under the match lock
    ///
    /// Returns the status stored afterwards. A final status is kept.
    async fn record_status(
        &self,
        code: &str,
        status: EscrowStatus,
    ) -> SettlementResult<EscrowStatus> {
        let _guard = self.locks.lock(code).await;
        let mut m = self.load(code).await?;
        let Some(wager) = m.wager.as_mut() else {
            return Ok(status);
        };
        if wager.escrow_status == status {
            return Ok(status);
        }
        if wager.escrow_status.is_final() {
            warn!(
                "[ESCROW] {} already {:?}, not recording {:?}",
                code, wager.escrow_status, status
            );
            return Ok(wager.escrow_status);
        }
        wager.escrow_status = status;
        self.store.save(&m).await?;
        self.broadcaster.publish(
            code,
            MatchEvent::Settlement {
                code: code.to_string(),
                escrow_status: status,
            },
        );
        Ok(status)
    }

    async fn load(&self, code: &str) -> SettlementResult<Match> {
        self.store
            .load(code)
            .await?
            .ok_or_else(|| SettlementError::MatchNotFound {
                code: code.to_string(),
            })
    }
}
