//! Match persistence
//!
//! [`MatchStore`] is the persistence seam. Failures are [`StoreError`]s and are
//! fatal to whatever operation hit them. [`InMemoryStore`] backs tests and the
//! demo binary.
//!
//! A played move changes the match and adds a history record. Both go through
//! [`MatchStore::commit_move`] so either both are stored or neither is.

pub use crate::core::{StoreError, StoreResult};
use crate::game::{Match, MoveRecord};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

#[async_trait]
pub trait MatchStore: Send + Sync {
    async fn load(&self, code: &str) -> StoreResult<Option<Match>>;

    /// Insert or replace the match under its code
    async fn save(&self, m: &Match) -> StoreResult<()>;

    async fn append_move_record(&self, record: MoveRecord) -> StoreResult<()>;

    /// Save `m` and append `record` as one write
    async fn commit_move(&self, m: &Match, record: MoveRecord) -> StoreResult<()>;

    /// Records for `code` in the order they were appended
    async fn move_records(&self, code: &str) -> StoreResult<Vec<MoveRecord>>;
}

#[derive(Default)]
pub struct InMemoryStore {
    matches: RwLock<HashMap<String, Match>>,
    records: RwLock<HashMap<String, Vec<MoveRecord>>>,
    fail_writes: AtomicBool,
    fail_records: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `save` and `append_move_record` fail until switched off
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make only move-record writes fail; match saves keep working
    pub fn set_fail_records(&self, fail: bool) {
        self.fail_records.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("writes disabled".to_string()))
        } else {
            Ok(())
        }
    }

    fn check_records_writable(&self) -> StoreResult<()> {
        self.check_writable()?;
        if self.fail_records.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("move records disabled".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MatchStore for InMemoryStore {
    async fn load(&self, code: &str) -> StoreResult<Option<Match>> {
        Ok(self.matches.read().get(code).cloned())
    }

    async fn save(&self, m: &Match) -> StoreResult<()> {
        self.check_writable()?;
        self.matches.write().insert(m.code.clone(), m.clone());
        Ok(())
    }

    async fn append_move_record(&self, record: MoveRecord) -> StoreResult<()> {
        self.check_records_writable()?;
        self.records
            .write()
            .entry(record.match_code.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn commit_move(&self, m: &Match, record: MoveRecord) -> StoreResult<()> {
        self.check_records_writable()?;
        let mut matches = self.matches.write();
        let mut records = self.records.write();
        matches.insert(m.code.clone(), m.clone());
        records
            .entry(record.match_code.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    async fn move_records(&self, code: &str) -> StoreResult<Vec<MoveRecord>> {
        Ok(self.records.read().get(code).cloned().unwrap_or_default())
    }
}
