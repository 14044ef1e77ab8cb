//! Net Worth Widget
//!
//! A cash balance, a list of assets and an append-only transaction log. The
//! whole ledger is stored under one key so a transaction and its balance
//! change are written together.

use crate::storage::{KeyValueStore, Namespace};
use crate::widgets::{new_id, required, Widget, WidgetError, WidgetResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const LEDGER_KEY: &str = "ledger";

/// Cash balance of a fresh ledger
pub const STARTING_BALANCE: f64 = 1_000_000_000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn for_amount(amount: f64) -> Self {
        if amount >= 0.0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub kind: TransactionKind,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ledger {
    pub balance: f64,
    /// Newest first
    pub assets: Vec<Asset>,
    /// Newest first
    pub transactions: Vec<Transaction>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self {
            balance: STARTING_BALANCE,
            assets: Vec::new(),
            transactions: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NetWorthSummary {
    pub cash: f64,
    pub total_assets: f64,
    pub net_worth: f64,
}

pub struct NetWorthTracker {
    ns: Namespace,
    ledger: Ledger,
}

impl Widget for NetWorthTracker {
    const NAMESPACE: &'static str = "networth";

    fn reset(&mut self) {
        self.ledger = Ledger::default();
    }
}

impl NetWorthTracker {
    pub fn mount(store: Arc<dyn KeyValueStore>) -> Self {
        let ns = Self::namespace(store);
        let ledger: Ledger = ns.load_or_default(LEDGER_KEY);

        tracing::info!(
            assets = ledger.assets.len(),
            transactions = ledger.transactions.len(),
            "Net worth tracker mounted"
        );
        Self { ns, ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn summary(&self) -> NetWorthSummary {
        let total_assets: f64 = self.ledger.assets.iter().map(|a| a.amount).sum();
        NetWorthSummary {
            cash: self.ledger.balance,
            total_assets,
            net_worth: self.ledger.balance + total_assets,
        }
    }

    pub fn add_asset(&mut self, name: &str, amount: f64) -> WidgetResult<Asset> {
        let name = required(name, "Asset name")?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(WidgetError::Validation(
                "Asset amount must be a positive number".to_string(),
            ));
        }

        let asset = Asset {
            id: new_id(),
            name,
            amount,
            added_at: Utc::now(),
        };

        let mut next = self.ledger.clone();
        next.assets.insert(0, asset.clone());
        self.commit(next)?;

        tracing::info!(id = %asset.id, amount, "Asset added");
        Ok(asset)
    }

    pub fn remove_asset(&mut self, id: &str) -> WidgetResult<Asset> {
        let index = self
            .ledger
            .assets
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| WidgetError::NotFound(format!("asset {}", id)))?;

        let mut next = self.ledger.clone();
        let removed = next.assets.remove(index);
        self.commit(next)?;

        tracing::info!(id = %removed.id, "Asset removed");
        Ok(removed)
    }

    /// Log a transaction and apply it to the cash balance
    pub fn add_transaction(&mut self, name: &str, amount: f64) -> WidgetResult<Transaction> {
        let name = required(name, "Transaction name")?;
        if !amount.is_finite() {
            return Err(WidgetError::Validation(
                "Transaction amount must be a number".to_string(),
            ));
        }

        let transaction = Transaction {
            id: new_id(),
            name,
            amount,
            kind: TransactionKind::for_amount(amount),
            timestamp: Utc::now(),
        };

        let mut next = self.ledger.clone();
        next.balance += amount;
        next.transactions.insert(0, transaction.clone());
        self.commit(next)?;

        tracing::info!(
            id = %transaction.id,
            amount,
            balance = self.ledger.balance,
            "Transaction recorded"
        );
        Ok(transaction)
    }

    fn commit(&mut self, next: Ledger) -> WidgetResult<()> {
        self.ns.save(LEDGER_KEY, &next)?;
        self.ledger = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn tracker() -> (NetWorthTracker, Arc<dyn KeyValueStore>) {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (NetWorthTracker::mount(Arc::clone(&store)), store)
    }

    #[test]
    fn test_fresh_ledger() {
        let (tracker, _) = tracker();
        let summary = tracker.summary();
        assert_eq!(summary.cash, STARTING_BALANCE);
        assert_eq!(summary.total_assets, 0.0);
        assert_eq!(summary.net_worth, STARTING_BALANCE);
    }

    #[test]
    fn test_assets() {
        let (mut tracker, _) = tracker();
        let house = tracker.add_asset("House", 500_000.0).unwrap();
        tracker.add_asset(" Car ", 20_000.0).unwrap();

        assert_eq!(tracker.ledger().assets[0].name, "Car");
        assert_eq!(tracker.summary().total_assets, 520_000.0);
        assert_eq!(tracker.summary().net_worth, STARTING_BALANCE + 520_000.0);

        tracker.remove_asset(&house.id).unwrap();
        assert_eq!(tracker.summary().total_assets, 20_000.0);
        assert!(matches!(
            tracker.remove_asset(&house.id),
            Err(WidgetError::NotFound(_))
        ));
    }

    #[test]
    fn test_invalid_asset_amounts() {
        let (mut tracker, _) = tracker();
        for amount in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                tracker.add_asset("Boat", amount),
                Err(WidgetError::Validation(_))
            ));
        }
        assert!(tracker.add_asset("", 10.0).is_err());
        assert!(tracker.ledger().assets.is_empty());
    }

    #[test]
    fn test_transactions_adjust_balance() {
        let (mut tracker, store) = tracker();
        let salary = tracker.add_transaction("Salary", 1_000.0).unwrap();
        let rent = tracker.add_transaction("Rent", -2_500.0).unwrap();

        assert_eq!(salary.kind, TransactionKind::Income);
        assert_eq!(rent.kind, TransactionKind::Expense);
        assert_eq!(tracker.ledger().transactions[0].name, "Rent");
        assert_eq!(tracker.summary().cash, STARTING_BALANCE - 1_500.0);

        let remounted = NetWorthTracker::mount(store);
        assert_eq!(remounted.summary().cash, STARTING_BALANCE - 1_500.0);
        assert_eq!(remounted.ledger().transactions.len(), 2);
    }

    #[test]
    fn test_zero_transaction_is_income() {
        assert_eq!(TransactionKind::for_amount(0.0), TransactionKind::Income);
    }
}
