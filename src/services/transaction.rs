//! Transaction service
//!
//! Adds, lists and deletes transactions. Every mutation holds the storage
//! commit lock across the in-memory change and the rewrite of
//! transactions.json; a failed write rolls the in-memory change back.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::audit::{AuditEntry, EntityType};
use crate::error::{QuarterbookError, QuarterbookResult};
use crate::models::{NewTransaction, Quarter, Transaction, TransactionId, TransactionType};
use crate::storage::Storage;

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Store a new transaction and return it with its assigned id.
    ///
    /// No validation happens here; callers hand in already-checked input.
    pub fn add(&self, input: NewTransaction) -> QuarterbookResult<Transaction> {
        let mut added = self.add_batch(vec![input])?;
        added
            .pop()
            .ok_or_else(|| QuarterbookError::Storage("Transaction was not stored".into()))
    }

    /// Store several transactions under one commit, in input order
    pub fn add_batch(&self, inputs: Vec<NewTransaction>) -> QuarterbookResult<Vec<Transaction>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let _guard = self.storage.begin_commit()?;

        let mut last = self.storage.transactions.last_id()?;
        let mut added = Vec::with_capacity(inputs.len());
        for input in inputs {
            let id = TransactionId::next_after(last);
            last = Some(id);
            let txn = Transaction::from_new(id, input);
            self.storage.transactions.insert(txn.clone())?;
            added.push(txn);
        }

        if let Err(e) = self.storage.transactions.save() {
            for txn in &added {
                self.storage.transactions.delete(txn.id)?;
            }
            return Err(e);
        }

        let entries: Vec<AuditEntry> = added
            .iter()
            .map(|txn| {
                AuditEntry::create(
                    EntityType::Transaction,
                    txn.id.to_string(),
                    Some(txn.description.clone()),
                    txn,
                )
            })
            .collect();
        self.storage.log_batch(&entries);

        debug!(count = added.len(), "added transactions");
        Ok(added)
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> QuarterbookResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Transactions matching quarter, type and year, newest date first
    pub fn list(
        &self,
        quarter: Quarter,
        kind: TransactionType,
        year: i32,
    ) -> QuarterbookResult<Vec<Transaction>> {
        self.storage.transactions.get_by_bucket(quarter, kind, year)
    }

    /// Every stored transaction in insertion order
    pub fn list_all(&self) -> QuarterbookResult<Vec<Transaction>> {
        self.storage.transactions.get_all()
    }

    /// Delete by id, returning the removed record
    pub fn delete(&self, id: TransactionId) -> QuarterbookResult<Transaction> {
        let _guard = self.storage.begin_commit()?;
        self.remove_locked(id)
    }

    /// Delete the first transaction, in insertion order, with this quarter,
    /// type and date. `None` when nothing matches.
    pub fn delete_matching(
        &self,
        quarter: Quarter,
        kind: TransactionType,
        date: NaiveDate,
    ) -> QuarterbookResult<Option<Transaction>> {
        let _guard = self.storage.begin_commit()?;

        match self
            .storage
            .transactions
            .find_first_matching(quarter, kind, date)?
        {
            Some(id) => self.remove_locked(id).map(Some),
            None => Ok(None),
        }
    }

    pub fn count(&self) -> QuarterbookResult<usize> {
        self.storage.transactions.count()
    }

    /// Caller holds the commit lock
    fn remove_locked(&self, id: TransactionId) -> QuarterbookResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .delete(id)?
            .ok_or_else(|| QuarterbookError::transaction_not_found(id.to_string()))?;

        if let Err(e) = self.storage.transactions.save() {
            self.storage.transactions.insert(txn.clone())?;
            return Err(e);
        }

        self.storage.log_delete(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(txn.description.clone()),
            &txn,
        );

        info!(id = %txn.id, "deleted transaction");
        Ok(txn)
    }
}
