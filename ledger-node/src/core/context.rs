//! Execution context shared by the managers
//!
//! # Write flow
//!
//! ```text
//! execute(op)
//!     ├─ 1. Read the clock once
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Run the contract operation (reads, writes, queued notifications)
//!     ├─ 4. Commit (dropped on error: nothing is written, nothing is sent)
//!     └─ 5. Broadcast the queued notifications
//! ```

use super::clock::{Clock, SystemClock};
use super::error::ContractResult;
use crate::ledger::{LedgerSnapshot, LedgerStorage, LedgerTxn};
use crate::notify::NotificationBus;
use chrono::{DateTime, Utc};
use std::sync::Arc;

#[derive(Clone)]
pub struct LedgerContext {
    storage: LedgerStorage,
    bus: NotificationBus,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for LedgerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerContext")
            .field("storage", &self.storage)
            .field("subscribers", &self.bus.subscriber_count())
            .finish()
    }
}

impl LedgerContext {
    pub fn new(storage: LedgerStorage, bus: NotificationBus) -> Self {
        Self {
            storage,
            bus,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn storage(&self) -> &LedgerStorage {
        &self.storage
    }

    pub fn bus(&self) -> &NotificationBus {
        &self.bus
    }

    /// Run `op` in one write transaction and broadcast after commit
    pub fn execute<T>(
        &self,
        op: impl FnOnce(&mut LedgerTxn, DateTime<Utc>) -> ContractResult<T>,
    ) -> ContractResult<T> {
        let now = self.now();
        let mut txn = self.storage.begin()?;
        let value = op(&mut txn, now)?;
        let notifications = txn.commit()?;
        self.bus.publish(notifications);
        Ok(value)
    }

    /// Run `op` against a read snapshot
    pub fn read<T>(&self, op: impl FnOnce(&LedgerSnapshot) -> ContractResult<T>) -> ContractResult<T> {
        let snapshot = self.storage.snapshot()?;
        op(&snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ContractError;
    use crate::core::clock::ManualClock;
    use crate::ledger::{StateReader, StateStore};
    use shared::util::from_unix;

    fn test_context() -> LedgerContext {
        LedgerContext::new(
            LedgerStorage::open_in_memory().unwrap(),
            NotificationBus::new(16),
        )
        .with_clock(Arc::new(ManualClock::new(from_unix(1_700_000_000))))
    }

    #[test]
    fn test_execute_commits_then_broadcasts() {
        let ctx = test_context();
        let mut rx = ctx.bus().subscribe();

        let stamped = ctx
            .execute(|txn, now| {
                txn.put_state("k", b"v")?;
                txn.emit("ProductCreated", b"{}".to_vec());
                Ok(now)
            })
            .unwrap();
        assert_eq!(stamped, from_unix(1_700_000_000));

        assert_eq!(rx.try_recv().unwrap().topic, "ProductCreated");
        let value = ctx.read(|snap| Ok(snap.get_state("k")?)).unwrap();
        assert_eq!(value, Some(b"v".to_vec()));
    }

    #[test]
    fn test_execute_error_discards_writes_and_notifications() {
        let ctx = test_context();
        let mut rx = ctx.bus().subscribe();

        let result: ContractResult<()> = ctx.execute(|txn, _| {
            txn.put_state("k", b"v")?;
            txn.emit("ProductCreated", b"{}".to_vec());
            Err(ContractError::validation("late failure"))
        });
        assert!(matches!(result, Err(ContractError::Validation(_))));

        assert!(rx.try_recv().is_err());
        let value = ctx.read(|snap| Ok(snap.get_state("k")?)).unwrap();
        assert!(value.is_none());
    }
}
