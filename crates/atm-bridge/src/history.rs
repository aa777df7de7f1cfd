//! Append-only log of confirmed transactions.

use atm_core::types::TransactionRecord;

/// Records in the order their transactions were confirmed. There is no way
/// to remove or edit an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionLog {
    records: Vec<TransactionRecord>,
}

impl TransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, record: TransactionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn last(&self) -> Option<&TransactionRecord> {
        self.records.last()
    }
}
