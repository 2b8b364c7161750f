//! Custody contract interface
//!
//! The contract holds both stakes and pays out on `resolve`. The core only
//! reads its view of a match and issues `resolve` or `refund`; the contract
//! itself is external.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Transaction reference returned by state-changing calls
pub type TxHash = String;

/// Custody-side lifecycle: Pending → Active → Resolved | Refunded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContractStatus {
    /// Creator staked, waiting for the second player
    Pending,
    /// Both stakes held
    Active,
    Resolved,
    Refunded,
}

/// The contract's record of one escrowed match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowMatchView {
    pub player1: String,
    pub player2: Option<String>,
    pub token: String,
    pub wager_amount: u64,
    pub total_staked: u64,
    pub created_at: DateTime<Utc>,
    pub status: ContractStatus,
    /// Payout target once resolved
    pub winner: Option<String>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContractError {
    #[error("escrow for match {code} not found")]
    NotFound { code: String },

    #[error("{caller} is not authorized to {action}")]
    Unauthorized { caller: String, action: &'static str },

    #[error("transaction reverted: {0}")]
    Reverted(String),

    #[error("custody contract unreachable: {0}")]
    Unreachable(String),
}

pub type ContractResult<T> = Result<T, ContractError>;

#[async_trait]
pub trait CustodyContract: Send + Sync {
    async fn get_match(&self, code: &str) -> ContractResult<EscrowMatchView>;

    /// Open an escrow with the creator's stake
    async fn create_match(
        &self,
        code: &str,
        creator: &str,
        token: &str,
        amount: u64,
    ) -> ContractResult<TxHash>;

    /// Add the second stake; the escrow becomes Active
    async fn join_match(&self, code: &str, player: &str) -> ContractResult<TxHash>;

    /// Pay the pot to `winner`, or split it when `winner` is the draw signal
    async fn resolve(&self, code: &str, caller: &str, winner: &str) -> ContractResult<TxHash>;

    /// Return each stake to its owner
    async fn refund(&self, code: &str, caller: &str) -> ContractResult<TxHash>;
}
