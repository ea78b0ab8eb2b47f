use super::{ContractError, ContractResult};
use crate::ledger::records::find_record;
use crate::ledger::{LedgerRecord, StateReader};

/// Load the record stored under `key`, `NotFound` if absent
pub fn require_record<R: LedgerRecord>(store: &impl StateReader, key: &str) -> ContractResult<R> {
    find_record(store, key)?.ok_or_else(|| ContractError::not_found(R::KIND, key))
}
