//! Calculator controller: keystroke-driven state machine
//!
//! Holds one user session's state: the pending expression buffer, the last
//! result, the selected currency, and an accumulator memory. Memory is
//! always denominated in the base currency, so switching currencies never
//! silently changes the remembered value.
//!
//! The controller never recovers from evaluator or converter errors on its
//! own except where dead-ending the UI would be worse: `toggle_sign` falls
//! back to textual negation, and `switch_currency` skips the conversion but
//! still commits the code switch.

use crate::error::Result;
use crate::eval::{evaluate, sanitize};
use crate::format::{format_canonical, format_number};
use crate::rates::RateTable;
use crate::types::{Amount, CurrencyCode, BASE_CURRENCY};

/// One session's calculator state
#[derive(Debug, Clone)]
pub struct Calculator {
    expr: String,
    last: Amount,
    selected: CurrencyCode,
    /// Accumulator memory, always in base-currency units
    memory: Amount,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            expr: String::new(),
            last: 0.0,
            selected: BASE_CURRENCY.to_string(),
            memory: 0.0,
        }
    }

    /// Pending expression buffer (may be invalid mid-entry)
    pub fn expression(&self) -> &str {
        &self.expr
    }

    /// Last successfully computed result
    pub fn last(&self) -> Amount {
        self.last
    }

    /// Currently selected currency code
    pub fn selected(&self) -> &str {
        &self.selected
    }

    /// Memory accumulator, in base-currency units
    pub fn memory(&self) -> Amount {
        self.memory
    }

    /// Formatted result plus selected code, e.g. "1,234.5 USD"
    pub fn display(&self) -> String {
        format!("{} {}", format_number(self.last), self.selected)
    }

    /// Append a keystroke token to the expression. No validation happens at
    /// press time; the buffer is allowed to be invalid mid-entry.
    pub fn press(&mut self, token: &str) {
        self.expr.push_str(token);
    }

    /// Drop the last character; no-op on an empty buffer
    pub fn backspace(&mut self) {
        self.expr.pop();
    }

    /// Reset the expression and last result
    pub fn clear_all(&mut self) {
        self.expr.clear();
        self.last = 0.0;
    }

    /// Negate the pending entry.
    ///
    /// Evaluates the whole expression and, on success, replaces it with the
    /// negated canonical result. If evaluation fails the sign of the
    /// trailing numeric token is toggled textually instead (or `-` is
    /// prepended when there is no trailing number); evaluator failures never
    /// escape from here.
    pub fn toggle_sign(&mut self) {
        if self.expr.is_empty() {
            self.expr.push('-');
            return;
        }

        if let Ok(value) = evaluate(&sanitize(&self.expr)) {
            self.expr = format_canonical(-value);
            return;
        }

        match trailing_number_span(&self.expr) {
            Some(start) => {
                let token = self.expr[start..].to_string();
                let toggled = match token.strip_prefix('-') {
                    Some(rest) => rest.to_string(),
                    None => format!("-{token}"),
                };
                self.expr.truncate(start);
                self.expr.push_str(&toggled);
            }
            None => self.expr.insert(0, '-'),
        }
    }

    /// Evaluate the expression buffer.
    ///
    /// On success the result becomes `last` and the buffer is reset to its
    /// canonical string form, so repeated `=` presses are idempotent. On
    /// failure (`ParseError` or `DivisionByZero`) nothing is mutated and the
    /// error is returned for the caller to surface.
    pub fn calculate(&mut self) -> Result<Amount> {
        let value = evaluate(&sanitize(&self.expr))?;
        self.last = value;
        self.expr = format_canonical(value);
        Ok(value)
    }

    /// Copy the last result back into the expression buffer
    pub fn answer_to_expression(&mut self) {
        self.expr = format_canonical(self.last);
    }

    /// Switch the selected currency, converting the displayed amount when
    /// possible.
    ///
    /// Conversion happens only when the last result is nonzero and both the
    /// previous and new codes exist in the table; otherwise it is skipped
    /// with a warning. The code switch itself is always committed.
    pub fn switch_currency(&mut self, new_code: &str, table: &RateTable) {
        let new_code = new_code.to_uppercase();
        if new_code == self.selected {
            return;
        }

        if self.last != 0.0 && table.contains(&self.selected) && table.contains(&new_code) {
            match table.convert(self.last, &self.selected, &new_code) {
                Ok(converted) => {
                    self.last = converted;
                    self.expr = format_canonical(converted);
                }
                Err(e) => log::warn!(
                    "skipping conversion {} -> {}: {}",
                    self.selected,
                    new_code,
                    e
                ),
            }
        } else if self.last != 0.0 {
            log::warn!(
                "rate table missing {} or {}, amount left unconverted",
                self.selected,
                new_code
            );
        }

        self.selected = new_code;
    }

    /// Re-validate the selected code against a freshly loaded table,
    /// falling back to the base currency if the code vanished
    pub fn sync_with_table(&mut self, table: &RateTable) {
        if !table.contains(&self.selected) {
            log::warn!(
                "{} no longer in rate table, falling back to {}",
                self.selected,
                BASE_CURRENCY
            );
            self.selected = BASE_CURRENCY.to_string();
        }
    }

    /// Evaluate the buffer and add the result to memory, converted into
    /// base-currency units first
    pub fn memory_add(&mut self, table: &RateTable) -> Result<()> {
        let value = self.calculate()?;
        let in_base = table.to_base(value, &self.selected)?;
        self.memory += in_base;
        Ok(())
    }

    /// Evaluate the buffer and subtract the result from memory, converted
    /// into base-currency units first
    pub fn memory_subtract(&mut self, table: &RateTable) -> Result<()> {
        let value = self.calculate()?;
        let in_base = table.to_base(value, &self.selected)?;
        self.memory -= in_base;
        Ok(())
    }

    /// Recall memory into the display, converted into the selected currency
    pub fn memory_recall(&mut self, table: &RateTable) -> Result<Amount> {
        let recalled = table.from_base(self.memory, &self.selected)?;
        self.last = recalled;
        self.expr = format_canonical(recalled);
        Ok(recalled)
    }

    pub fn memory_clear(&mut self) {
        self.memory = 0.0;
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

/// Start of a trailing numeric token (digits and dots, with an optional
/// leading minus), or None if the buffer does not end in a number
fn trailing_number_span(expr: &str) -> Option<usize> {
    let bytes = expr.as_bytes();
    let mut start = bytes.len();
    while start > 0 && (bytes[start - 1].is_ascii_digit() || bytes[start - 1] == b'.') {
        start -= 1;
    }
    if start == bytes.len() {
        return None;
    }
    if start > 0 && bytes[start - 1] == b'-' {
        start -= 1;
    }
    Some(start)
}
