//! # fxcalc
//!
//! A personal currency-conversion calculator with a live exchange-rate feed.
//!
//! The core is a restricted arithmetic expression evaluator plus a
//! currency-normalization layer that converts amounts through a common base
//! currency (TWD). A rate source adapter fetches the Bank of Taiwan daily
//! CSV feed into an immutable rate-table snapshot; any UI layer drives the
//! [`calculator::Calculator`] state machine with keystrokes and displays
//! formatted results.
//!
//! ## Example
//!
//! ```rust
//! use fxcalc::prelude::*;
//!
//! let table = RateTable::from_entries(vec![("USD".to_string(), 31.2)]).unwrap();
//! let mut calc = Calculator::new();
//!
//! calc.press("2+3*4");
//! assert_eq!(calc.calculate().unwrap(), 14.0);
//!
//! calc.clear_all();
//! calc.press("3120");
//! calc.calculate().unwrap();
//! calc.switch_currency("USD", &table);
//! assert_eq!(calc.display(), "100 USD");
//! ```

pub mod calculator;
pub mod error;
pub mod eval;
pub mod format;
pub mod rates;
pub mod source;
pub mod types;

pub mod prelude {
    //! Commonly used types and functions
    pub use crate::calculator::Calculator;
    pub use crate::error::{FxCalcError, Result};
    pub use crate::eval::{evaluate, sanitize};
    pub use crate::format::{format_canonical, format_number};
    pub use crate::rates::{RateStore, RateTable};
    pub use crate::source::{fallback_table, BotCsvSource, CachedRateSource, RateSource};
    pub use crate::types::{Amount, CurrencyCode, Rate, BASE_CURRENCY};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_lib_compile() {
        // Smoke test to ensure library compiles
    }
}
