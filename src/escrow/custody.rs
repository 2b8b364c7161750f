//! In-memory custody contract
//!
//! Simulates the contract's state machine and authorization rules:
//!
//! - only the operator may `resolve`, and only an Active escrow
//! - the winner must be one of the players or the draw signal
//! - the operator may `refund` an unresolved escrow at any time; anyone else
//!   only once it is older than the refund timeout

use super::contract::{
    ContractError, ContractResult, ContractStatus, CustodyContract, EscrowMatchView, TxHash,
};
use crate::core::ArenaConfig;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tracing::debug;
use uuid::Uuid;

pub struct InMemoryCustody {
    operator: String,
    draw_signal: String,
    refund_timeout: Duration,
    escrows: Mutex<HashMap<String, EscrowMatchView>>,
    resolve_calls: AtomicUsize,
    unreachable: AtomicBool,
}

impl InMemoryCustody {
    pub fn new(
        operator: impl Into<String>,
        draw_signal: impl Into<String>,
        refund_timeout: Duration,
    ) -> Self {
        Self {
            operator: operator.into(),
            draw_signal: draw_signal.into(),
            refund_timeout,
            escrows: Mutex::new(HashMap::new()),
            resolve_calls: AtomicUsize::new(0),
            unreachable: AtomicBool::new(false),
        }
    }

    pub fn from_config(config: &ArenaConfig) -> Self {
        Self::new(
            config.operator_address.clone(),
            config.draw_signal_address.clone(),
            Duration::seconds(config.refund_timeout_secs as i64),
        )
    }

    /// Number of `resolve` calls received, successful or not
    pub fn resolve_calls(&self) -> usize {
        self.resolve_calls.load(Ordering::SeqCst)
    }

    /// Make every call fail with [`ContractError::Unreachable`]
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    /// Shift an escrow's creation time back by `by`
    pub fn backdate(&self, code: &str, by: Duration) {
        if let Some(view) = self.escrows.lock().get_mut(code) {
            view.created_at = view.created_at - by;
        }
    }

    fn reachable(&self) -> ContractResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(ContractError::Unreachable("connection refused".to_string()))
        } else {
            Ok(())
        }
    }

    fn tx_hash() -> TxHash {
        format!("0x{}", Uuid::new_v4().simple())
    }
}

fn not_found(code: &str) -> ContractError {
    ContractError::NotFound {
        code: code.to_string(),
    }
}

#[async_trait]
impl CustodyContract for InMemoryCustody {
    async fn get_match(&self, code: &str) -> ContractResult<EscrowMatchView> {
        self.reachable()?;
        self.escrows
            .lock()
            .get(code)
            .cloned()
            .ok_or_else(|| not_found(code))
    }

    async fn create_match(
        &self,
        code: &str,
        creator: &str,
        token: &str,
        amount: u64,
    ) -> ContractResult<TxHash> {
        self.reachable()?;
        let mut escrows = self.escrows.lock();
        if escrows.contains_key(code) {
            return Err(ContractError::Reverted(format!("escrow {code} exists")));
        }
        escrows.insert(
            code.to_string(),
            EscrowMatchView {
                player1: creator.to_string(),
                player2: None,
                token: token.to_string(),
                wager_amount: amount,
                total_staked: amount,
                created_at: Utc::now(),
                status: ContractStatus::Pending,
                winner: None,
            },
        );
        debug!("[CUSTODY] {} opened by {} for {} {}", code, creator, amount, token);
        Ok(Self::tx_hash())
    }

    async fn join_match(&self, code: &str, player: &str) -> ContractResult<TxHash> {
        self.reachable()?;
        let mut escrows = self.escrows.lock();
        let view = escrows.get_mut(code).ok_or_else(|| not_found(code))?;
        if view.status != ContractStatus::Pending {
            return Err(ContractError::Reverted("escrow not open".to_string()));
        }
        if view.player1 == player {
            return Err(ContractError::Reverted("cannot join own escrow".to_string()));
        }
        view.player2 = Some(player.to_string());
        view.total_staked += view.wager_amount;
        view.status = ContractStatus::Active;
        Ok(Self::tx_hash())
    }

    async fn resolve(&self, code: &str, caller: &str, winner: &str) -> ContractResult<TxHash> {
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        self.reachable()?;
        if caller != self.operator {
            return Err(ContractError::Unauthorized {
                caller: caller.to_string(),
                action: "resolve",
            });
        }
        let mut escrows = self.escrows.lock();
        let view = escrows.get_mut(code).ok_or_else(|| not_found(code))?;
        if view.status != ContractStatus::Active {
            return Err(ContractError::Reverted(format!(
                "escrow is {:?}, not Active",
                view.status
            )));
        }
        let is_player = view.player1 == winner || view.player2.as_deref() == Some(winner);
        if !is_player && winner != self.draw_signal {
            return Err(ContractError::Reverted(format!("{winner} is not a player")));
        }
        view.status = ContractStatus::Resolved;
        view.winner = Some(winner.to_string());
        Ok(Self::tx_hash())
    }

    async fn refund(&self, code: &str, caller: &str) -> ContractResult<TxHash> {
        self.reachable()?;
        let mut escrows = self.escrows.lock();
        let view = escrows.get_mut(code).ok_or_else(|| not_found(code))?;
        if !matches!(view.status, ContractStatus::Pending | ContractStatus::Active) {
            return Err(ContractError::Reverted("escrow already closed".to_string()));
        }
        let expired = Utc::now() - view.created_at >= self.refund_timeout;
        if caller != self.operator && !expired {
            return Err(ContractError::Unauthorized {
                caller: caller.to_string(),
                action: "refund before timeout",
            });
        }
        view.status = ContractStatus::Refunded;
        Ok(Self::tx_hash())
    }
}
