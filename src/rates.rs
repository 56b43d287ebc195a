//! Rate table and currency conversion
//!
//! Every rate is a factor "units of TWD per 1 unit of this currency", so
//! any conversion runs through the base in a star topology:
//! `amount * table[from] / table[to]`. A table is built wholesale by the
//! rate source and never mutated entry-by-entry afterwards; [`RateStore`]
//! swaps whole snapshots so a conversion in progress always sees either
//! the fully-old or fully-new table.

use crate::error::{FxCalcError, Result};
use crate::types::{Amount, CurrencyCode, Rate, Timestamp, BASE_CURRENCY};
use chrono::Utc;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};

/// Mapping from currency code to base-currency factor
///
/// Invariants: the base currency is always present with factor exactly 1.0,
/// and every factor is positive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateTable {
    rates: HashMap<CurrencyCode, Rate>,
    fetched_at: Timestamp,
}

impl RateTable {
    /// Create a table holding only the base currency
    pub fn new() -> Self {
        let mut rates = HashMap::new();
        rates.insert(BASE_CURRENCY.to_string(), 1.0);
        Self {
            rates,
            fetched_at: Utc::now(),
        }
    }

    /// Build a table from (code, factor) pairs
    ///
    /// The base currency is pinned to 1.0 whether or not the entries carry
    /// it. Fails on any non-positive factor or on an entry that contradicts
    /// the base invariant.
    pub fn from_entries<I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (CurrencyCode, Rate)>,
    {
        let mut table = Self::new();
        for (code, rate) in entries {
            table.insert(code, rate)?;
        }
        Ok(table)
    }

    /// Insert a single rate
    pub fn insert(&mut self, code: CurrencyCode, rate: Rate) -> Result<()> {
        if !rate.is_finite() || rate <= 0.0 {
            return Err(FxCalcError::InvalidData(format!(
                "rate must be positive, got {rate} for {code}"
            )));
        }
        let code = code.to_uppercase();
        if code == BASE_CURRENCY && rate != 1.0 {
            return Err(FxCalcError::InvalidData(format!(
                "base currency {BASE_CURRENCY} must have factor 1.0, got {rate}"
            )));
        }
        self.rates.insert(code, rate);
        Ok(())
    }

    /// Factor for a code, if present
    pub fn get(&self, code: &str) -> Option<Rate> {
        self.rates.get(&code.to_uppercase()).copied()
    }

    /// Whether a code is present
    pub fn contains(&self, code: &str) -> bool {
        self.rates.contains_key(&code.to_uppercase())
    }

    /// All codes, sorted
    pub fn codes(&self) -> Vec<CurrencyCode> {
        let mut codes: Vec<CurrencyCode> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// Number of currencies in the table
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// When this table was built
    pub fn fetched_at(&self) -> Timestamp {
        self.fetched_at
    }

    /// Convert an amount between two currencies through the base.
    ///
    /// Both codes must be present; a missing code is an
    /// [`FxCalcError::UnknownCurrency`], never a silent factor of 1.0.
    pub fn convert(&self, amount: Amount, from: &str, to: &str) -> Result<Amount> {
        let from_rate = self
            .get(from)
            .ok_or_else(|| FxCalcError::UnknownCurrency(from.to_uppercase()))?;
        let to_rate = self
            .get(to)
            .ok_or_else(|| FxCalcError::UnknownCurrency(to.to_uppercase()))?;

        if from.eq_ignore_ascii_case(to) {
            return Ok(amount);
        }
        Ok(amount * from_rate / to_rate)
    }

    /// Convert an amount in `from` into base-currency units
    pub fn to_base(&self, amount: Amount, from: &str) -> Result<Amount> {
        self.convert(amount, from, BASE_CURRENCY)
    }

    /// Convert a base-currency amount into `to`
    pub fn from_base(&self, amount: Amount, to: &str) -> Result<Amount> {
        self.convert(amount, BASE_CURRENCY, to)
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared, occasionally-refreshed rate table
///
/// Single writer, many readers: a refresh replaces the whole snapshot
/// atomically, so no reader ever observes a torn table.
#[derive(Debug)]
pub struct RateStore {
    inner: RwLock<Arc<RateTable>>,
}

impl RateStore {
    pub fn new(initial: RateTable) -> Self {
        Self {
            inner: RwLock::new(Arc::new(initial)),
        }
    }

    /// Current snapshot; cheap to clone, stays valid across replacements
    pub fn snapshot(&self) -> Arc<RateTable> {
        self.inner.read().unwrap().clone()
    }

    /// Atomically replace the whole table
    pub fn replace(&self, table: RateTable) {
        *self.inner.write().unwrap() = Arc::new(table);
    }
}

impl Default for RateStore {
    fn default() -> Self {
        Self::new(RateTable::new())
    }
}
