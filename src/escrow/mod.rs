//! Escrow module - wager custody and settlement
//!
//! - `contract` - [`CustodyContract`] trait and the contract's match view
//! - `custody` - [`InMemoryCustody`], a simulated contract
//! - `coordinator` - [`SettlementCoordinator`]: outcome → payout policy
//! - `worker` - [`SettlementWorker`]: runs settlement off the move path

pub mod contract;
pub mod coordinator;
pub mod custody;
pub mod worker;


pub use contract::{
    ContractError, ContractResult, ContractStatus, CustodyContract, EscrowMatchView, TxHash,
};
pub use coordinator::{SettlementCoordinator, SettlementError, SettlementResult};
pub use custody::InMemoryCustody;
pub use worker::{SettlementQueue, SettlementRequest, SettlementWorker};
