//! Rate feed adapters
//!
//! [`BotCsvSource`] fetches the Bank of Taiwan daily exchange-rate CSV and
//! turns it into a [`RateTable`]. The feed is parsed defensively: the
//! currency code is extracted from a labeled field (`美金 (USD)` or a
//! dedicated code column), spot buy/sell prices are averaged when both are
//! present, a single side is used when only one is, numeric cells may carry
//! thousands separators, and unrecognizable rows are skipped with a warning.
//!
//! [`CachedRateSource`] wraps any source with a TTL cache and serves the
//! last-known-good table when a refresh fails. [`fallback_table`] is the
//! hard-coded table of last resort.

use crate::error::{FxCalcError, Result};
use crate::rates::RateTable;
use reqwest::Client;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Bank of Taiwan daily CSV feed
pub const BOT_CSV_URL: &str = "https://rate.bot.com.tw/xrt/flcsv/0/day";

/// Nominal cache lifetime for fetched tables
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

/// Anything that can produce a fresh rate table
pub trait RateSource: Send + Sync {
    /// Fetch and parse a full table. On success the base currency is
    /// guaranteed present with factor 1.0.
    fn fetch(&self) -> impl Future<Output = Result<RateTable>> + Send;
}

/// Rate source backed by the Bank of Taiwan CSV feed
pub struct BotCsvSource {
    client: Client,
    url: String,
}

impl BotCsvSource {
    pub fn new() -> Result<Self> {
        Self::with_url(BOT_CSV_URL)
    }

    /// Point the source at a different endpoint (tests, mirrors)
    pub fn with_url(url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(12))
            .user_agent("fxcalc/0.1")
            .build()
            .map_err(|e| FxCalcError::RateFetch(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }
}

impl RateSource for BotCsvSource {
    fn fetch(&self) -> impl Future<Output = Result<RateTable>> + Send {
        async move {
            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| FxCalcError::RateFetch(format!("HTTP request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(FxCalcError::RateFetch(format!(
                    "rate feed returned status {}",
                    response.status()
                )));
            }

            let text = response
                .text()
                .await
                .map_err(|e| FxCalcError::RateFetch(format!("failed to read response: {e}")))?;

            parse_bot_csv(&text)
        }
    }
}

/// Parse the BOT CSV payload into a rate table
pub fn parse_bot_csv(text: &str) -> Result<RateTable> {
    // The feed is served with a UTF-8 BOM
    let text = text.trim_start_matches('\u{feff}');

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| FxCalcError::RateFetch(format!("unreadable CSV header: {e}")))?
        .clone();

    let find = |names: &[&str]| -> Option<usize> {
        headers
            .iter()
            .position(|h| names.iter().any(|n| h.trim().contains(n)))
    };

    let currency_col = find(&["幣別", "Currency"]);
    let code_col = find(&["Currency Code"]);
    let buy_col = find(&["即期買入", "Spot Buy"]);
    let sell_col = find(&["即期賣出", "Spot Sell"]);

    if buy_col.is_none() && sell_col.is_none() {
        return Err(FxCalcError::RateFetch(
            "rate feed is missing spot buy/sell columns".to_string(),
        ));
    }

    let mut table = RateTable::new();
    let mut parsed = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                log::warn!("skipping malformed CSV row: {e}");
                continue;
            }
        };

        let code = currency_col
            .and_then(|i| record.get(i))
            .and_then(extract_code)
            .or_else(|| {
                code_col
                    .and_then(|i| record.get(i))
                    .map(|s| s.trim().to_uppercase())
                    .filter(|s| !s.is_empty())
            });
        let Some(code) = code else { continue };

        let buy = buy_col.and_then(|i| record.get(i)).and_then(parse_decimal);
        let sell = sell_col.and_then(|i| record.get(i)).and_then(parse_decimal);

        let rate = match (buy, sell) {
            (Some(b), Some(s)) => (b + s) / 2.0,
            (Some(b), None) => b,
            (None, Some(s)) => s,
            (None, None) => continue,
        };

        match table.insert(code.clone(), rate) {
            Ok(()) => parsed += 1,
            Err(e) => log::warn!("skipping {code}: {e}"),
        }
    }

    if parsed == 0 {
        return Err(FxCalcError::RateFetch(
            "no usable currency rows in rate feed".to_string(),
        ));
    }

    Ok(table)
}

/// Pull a currency code out of a labeled field like `美金 (USD)` or `USD`
fn extract_code(field: &str) -> Option<String> {
    if let Some(open) = field.find('(') {
        let rest = &field[open + 1..];
        let close = rest.find(')')?;
        let code = rest[..close].trim();
        if !code.is_empty() && code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Some(code.to_uppercase());
        }
        return None;
    }

    let trimmed = field.trim();
    if (2..=5).contains(&trimmed.len()) && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Some(trimmed.to_uppercase());
    }
    None
}

/// Parse a numeric cell, tolerating thousands separators and placeholder
/// dashes for unquoted sides
fn parse_decimal(cell: &str) -> Option<f64> {
    let cleaned: String = cell.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    if cleaned.is_empty() || cleaned == "-" {
        return None;
    }
    cleaned.parse().ok()
}

/// Hard-coded table of last resort, used when no fetch has ever succeeded
pub fn fallback_table() -> RateTable {
    RateTable::from_entries(vec![
        ("USD".to_string(), 31.2),
        ("JPY".to_string(), 0.22),
        ("EUR".to_string(), 33.5),
        ("CNY".to_string(), 4.5),
    ])
    .expect("fallback rates are static and valid")
}

/// TTL cache around a rate source
///
/// A table older than the TTL triggers a re-fetch on the next access; when
/// the re-fetch fails the stale table is served as last-known-good and a
/// warning is logged. The raw fetch error only surfaces when there is no
/// cached table at all.
pub struct CachedRateSource<S> {
    source: S,
    ttl: Duration,
    cached: Mutex<Option<(Instant, Arc<RateTable>)>>,
}

impl<S: RateSource> CachedRateSource<S> {
    pub fn new(source: S) -> Self {
        Self::with_ttl(source, DEFAULT_TTL)
    }

    pub fn with_ttl(source: S, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            cached: Mutex::new(None),
        }
    }

    /// Current table, fetching if the cache is empty or expired
    pub async fn get(&self) -> Result<Arc<RateTable>> {
        if let Some(table) = self.fresh_cached() {
            return Ok(table);
        }

        match self.source.fetch().await {
            Ok(table) => {
                let table = Arc::new(table);
                *self.cached.lock().unwrap() = Some((Instant::now(), table.clone()));
                Ok(table)
            }
            Err(e) => {
                let stale = self.cached.lock().unwrap().as_ref().map(|(_, t)| t.clone());
                match stale {
                    Some(table) => {
                        log::warn!("rate fetch failed, serving last-known-good table: {e}");
                        Ok(table)
                    }
                    None => Err(e),
                }
            }
        }
    }

    /// Drop the cache and fetch immediately
    pub async fn force_refresh(&self) -> Result<Arc<RateTable>> {
        let table = Arc::new(self.source.fetch().await?);
        *self.cached.lock().unwrap() = Some((Instant::now(), table.clone()));
        Ok(table)
    }

    fn fresh_cached(&self) -> Option<Arc<RateTable>> {
        let guard = self.cached.lock().unwrap();
        guard
            .as_ref()
            .filter(|(at, _)| at.elapsed() < self.ttl)
            .map(|(_, t)| t.clone())
    }
}
