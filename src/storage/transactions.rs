//! Transaction repository for JSON storage
//!
//! Holds every transaction in memory, indexed by `(year, quarter, type)`, and
//! writes the whole collection back to transactions.json as a flat array.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::QuarterbookError;
use crate::models::{Quarter, Transaction, TransactionId, TransactionType};

use super::file_io::{read_json, write_json_atomic};

/// Index key: one bucket per year, quarter and type
type BucketKey = (i32, Quarter, TransactionType);

fn bucket_of(txn: &Transaction) -> BucketKey {
    (txn.year, txn.quarter, txn.kind)
}

/// Repository for transaction persistence with indexing
pub struct TransactionRepository {
    path: PathBuf,
    /// Keyed by id; ids grow monotonically so this is insertion order
    data: RwLock<BTreeMap<TransactionId, Transaction>>,
    /// Index: (year, quarter, type) -> transaction ids in insertion order
    by_bucket: RwLock<HashMap<BucketKey, Vec<TransactionId>>>,
}

impl TransactionRepository {
    /// Create a new transaction repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(BTreeMap::new()),
            by_bucket: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and build the index
    pub fn load(&self) -> Result<(), QuarterbookError> {
        let file_data: Vec<Transaction> = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_bucket = self.by_bucket.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        by_bucket.clear();

        for txn in file_data {
            by_bucket.entry(bucket_of(&txn)).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        debug!(count = data.len(), path = %self.path.display(), "loaded transactions");
        Ok(())
    }

    /// Write the full collection to disk, oldest first
    pub fn save(&self) -> Result<(), QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let transactions: Vec<&Transaction> = data.values().collect();
        write_json_atomic(&self.path, &transactions)?;

        debug!(count = transactions.len(), "committed transactions");
        Ok(())
    }

    /// Get a transaction by ID
    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all transactions in insertion order
    pub fn get_all(&self) -> Result<Vec<Transaction>, QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().cloned().collect())
    }

    /// Transactions in one bucket, newest date first; equal dates keep
    /// insertion order
    pub fn get_by_bucket(
        &self,
        quarter: Quarter,
        kind: TransactionType,
        year: i32,
    ) -> Result<Vec<Transaction>, QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        let by_bucket = self.by_bucket.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let ids = by_bucket
            .get(&(year, quarter, kind))
            .map(|v| v.as_slice())
            .unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    /// All transactions whose stored year matches
    pub fn get_by_year(&self, year: i32) -> Result<Vec<Transaction>, QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.values().filter(|t| t.year == year).cloned().collect())
    }

    /// Highest id issued so far
    pub fn last_id(&self) -> Result<Option<TransactionId>, QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.keys().next_back().copied())
    }

    /// Insert a transaction (replaces one with the same id)
    pub fn insert(&self, txn: Transaction) -> Result<(), QuarterbookError> {
        let mut data = self.data.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_bucket = self.by_bucket.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        if let Some(old) = data.get(&txn.id) {
            if let Some(ids) = by_bucket.get_mut(&bucket_of(old)) {
                ids.retain(|&id| id != txn.id);
            }
        }

        by_bucket.entry(bucket_of(&txn)).or_default().push(txn.id);
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Delete a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, QuarterbookError> {
        let mut data = self.data.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_bucket = self.by_bucket.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let removed = data.remove(&id);
        if let Some(txn) = &removed {
            if let Some(ids) = by_bucket.get_mut(&bucket_of(txn)) {
                ids.retain(|&tid| tid != id);
            }
        }
        Ok(removed)
    }

    /// First transaction, in insertion order, with this quarter, type and date
    pub fn find_first_matching(
        &self,
        quarter: Quarter,
        kind: TransactionType,
        date: NaiveDate,
    ) -> Result<Option<TransactionId>, QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data
            .values()
            .find(|t| t.quarter == quarter && t.kind == kind && t.date == date)
            .map(|t| t.id))
    }

    /// Drop every transaction whose year differs from `year`, returning the
    /// removed records
    pub fn retain_year(&self, year: i32) -> Result<Vec<Transaction>, QuarterbookError> {
        let mut data = self.data.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;
        let mut by_bucket = self.by_bucket.write().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let doomed: Vec<TransactionId> = data
            .values()
            .filter(|t| t.year != year)
            .map(|t| t.id)
            .collect();

        let removed: Vec<Transaction> = doomed.iter().filter_map(|id| data.remove(id)).collect();
        by_bucket.retain(|(bucket_year, _, _), _| *bucket_year == year);

        Ok(removed)
    }

    /// Count transactions
    pub fn count(&self) -> Result<usize, QuarterbookError> {
        let data = self.data.read().map_err(|e| {
            QuarterbookError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, NewTransaction};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("transactions.json");
        let repo = TransactionRepository::new(path);
        (temp_dir, repo)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn txn(id: i64, quarter: Quarter, kind: TransactionType, cents: i64, on: NaiveDate) -> Transaction {
        Transaction::from_new(
            TransactionId::new(id),
            NewTransaction::new(quarter, kind, Money::from_cents(cents), on),
        )
    }

    #[test]
    fn test_empty_load() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();
        assert_eq!(repo.count().unwrap(), 0);
        assert_eq!(repo.last_id().unwrap(), None);
    }

    #[test]
    fn test_insert_and_get() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let t = txn(1, Quarter::Q1, TransactionType::Income, 5000, date(2024, 1, 15));
        repo.insert(t).unwrap();

        let retrieved = repo.get(TransactionId::new(1)).unwrap().unwrap();
        assert_eq!(retrieved.amount.cents(), 5000);
        assert_eq!(repo.last_id().unwrap(), Some(TransactionId::new(1)));
    }

    #[test]
    fn test_bucket_query_sorted_newest_first() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.insert(txn(1, Quarter::Q2, TransactionType::Expenditure, 100, date(2024, 4, 2))).unwrap();
        repo.insert(txn(2, Quarter::Q2, TransactionType::Expenditure, 200, date(2024, 5, 9))).unwrap();
        repo.insert(txn(3, Quarter::Q2, TransactionType::Expenditure, 300, date(2024, 4, 2))).unwrap();
        repo.insert(txn(4, Quarter::Q2, TransactionType::Income, 400, date(2024, 6, 1))).unwrap();
        repo.insert(txn(5, Quarter::Q1, TransactionType::Expenditure, 500, date(2024, 2, 1))).unwrap();

        let found = repo
            .get_by_bucket(Quarter::Q2, TransactionType::Expenditure, 2024)
            .unwrap();
        let ids: Vec<i64> = found.iter().map(|t| t.id.value()).collect();
        assert_eq!(ids, vec![2, 1, 3]);

        assert!(repo
            .get_by_bucket(Quarter::Q3, TransactionType::Income, 2024)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.insert(txn(7, Quarter::Q3, TransactionType::Income, 5000, date(2024, 8, 1))).unwrap();
        repo.save().unwrap();

        let raw = std::fs::read_to_string(temp_dir.path().join("transactions.json")).unwrap();
        assert!(raw.trim_start().starts_with('['));

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();

        assert_eq!(repo2.count().unwrap(), 1);
        let found = repo2
            .get_by_bucket(Quarter::Q3, TransactionType::Income, 2024)
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_delete_updates_index() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.insert(txn(1, Quarter::Q1, TransactionType::Income, 5000, date(2024, 1, 15))).unwrap();
        let removed = repo.delete(TransactionId::new(1)).unwrap();
        assert!(removed.is_some());
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo
            .get_by_bucket(Quarter::Q1, TransactionType::Income, 2024)
            .unwrap()
            .is_empty());

        assert!(repo.delete(TransactionId::new(1)).unwrap().is_none());
    }

    #[test]
    fn test_find_first_matching() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        let on = date(2024, 3, 3);
        repo.insert(txn(10, Quarter::Q1, TransactionType::Income, 100, on)).unwrap();
        repo.insert(txn(11, Quarter::Q1, TransactionType::Income, 200, on)).unwrap();

        let first = repo
            .find_first_matching(Quarter::Q1, TransactionType::Income, on)
            .unwrap();
        assert_eq!(first, Some(TransactionId::new(10)));
        assert_eq!(
            repo.find_first_matching(Quarter::Q1, TransactionType::Expenditure, on)
                .unwrap(),
            None
        );
    }

    #[test]
    fn test_retain_year() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.insert(txn(1, Quarter::Q1, TransactionType::Income, 100, date(2023, 1, 1))).unwrap();
        repo.insert(txn(2, Quarter::Q1, TransactionType::Income, 200, date(2024, 1, 1))).unwrap();
        repo.insert(txn(3, Quarter::Q4, TransactionType::Expenditure, 300, date(2025, 1, 1))).unwrap();

        let removed = repo.retain_year(2024).unwrap();
        let removed_ids: Vec<i64> = removed.iter().map(|t| t.id.value()).collect();
        assert_eq!(removed_ids, vec![1, 3]);
        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.get(TransactionId::new(2)).unwrap().is_some());
        assert!(repo.get_by_year(2023).unwrap().is_empty());
    }
}
