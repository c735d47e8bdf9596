//! Append-only buy/sell ledger for one symbol.
//!
//! The log is the single source of truth for position state: flat when
//! `shares == 0`, long otherwise. Entries are never mutated after append and
//! append order is chronological order.

use chrono::NaiveDate;

use super::error::TrendbandError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeAction {
    Buy,
    Sell,
}

/// One executed instruction, created exactly once.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeEntry {
    pub date: NaiveDate,
    pub action: TradeAction,
    pub price: f64,
    pub shares: u64,
    /// Cash remaining after this instruction settled.
    pub cash_after: f64,
}

/// A paired buy/sell with realized P&L — the normalized view over the raw
/// log. Each buy pairs with its chronologically next sell.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTrip {
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: NaiveDate,
    pub exit_price: f64,
    pub shares: u64,
    pub pnl: f64,
}

#[derive(Debug, Clone)]
pub struct TradeLog {
    symbol: String,
    cash: f64,
    shares: u64,
    entries: Vec<TradeEntry>,
}

impl TradeLog {
    pub fn new(symbol: impl Into<String>, capital: f64) -> Self {
        TradeLog {
            symbol: symbol.into(),
            cash: capital,
            shares: 0,
            entries: Vec::new(),
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Current position size. Zero means flat.
    pub fn shares(&self) -> u64 {
        self.shares
    }

    pub fn is_long(&self) -> bool {
        self.shares > 0
    }

    /// Convert all available cash into whole shares at `price`.
    ///
    /// Returns the share count bought. Zero affordable shares leaves the
    /// position flat and appends nothing. Buying while long is a broken
    /// mutual-exclusion invariant and fails hard.
    pub fn buy(&mut self, date: NaiveDate, price: f64) -> Result<u64, TrendbandError> {
        if self.is_long() {
            return Err(TrendbandError::State {
                date,
                reason: format!("buy {} while already long {} shares", self.symbol, self.shares),
            });
        }

        let shares = (self.cash / price).floor() as u64;
        if shares == 0 {
            return Ok(0);
        }

        self.cash -= shares as f64 * price;
        self.shares = shares;
        self.entries.push(TradeEntry {
            date,
            action: TradeAction::Buy,
            price,
            shares,
            cash_after: self.cash,
        });
        Ok(shares)
    }

    /// Convert all held shares back to cash at `price`.
    ///
    /// Selling while flat is a broken invariant and fails hard.
    pub fn sell(&mut self, date: NaiveDate, price: f64) -> Result<u64, TrendbandError> {
        if !self.is_long() {
            return Err(TrendbandError::State {
                date,
                reason: format!("sell {} while flat", self.symbol),
            });
        }

        let shares = self.shares;
        self.cash += shares as f64 * price;
        self.shares = 0;
        self.entries.push(TradeEntry {
            date,
            action: TradeAction::Sell,
            price,
            shares,
            cash_after: self.cash,
        });
        Ok(shares)
    }

    /// Raw log: every instruction, in append order.
    pub fn entries(&self) -> &[TradeEntry] {
        &self.entries
    }

    /// Normalized log: buy/sell round trips with realized P&L.
    ///
    /// An unpaired trailing buy (should not occur after a finalized run,
    /// since the engine force-liquidates on the last bar) is dropped.
    pub fn round_trips(&self) -> Vec<RoundTrip> {
        let mut trips = Vec::new();
        let mut open: Option<&TradeEntry> = None;

        for entry in &self.entries {
            match entry.action {
                TradeAction::Buy => open = Some(entry),
                TradeAction::Sell => {
                    if let Some(buy) = open.take() {
                        trips.push(RoundTrip {
                            entry_date: buy.date,
                            entry_price: buy.price,
                            exit_date: entry.date,
                            exit_price: entry.price,
                            shares: entry.shares,
                            pnl: entry.shares as f64 * (entry.price - buy.price),
                        });
                    }
                }
            }
        }
        trips
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn buy_converts_all_cash_to_whole_shares() {
        let mut log = TradeLog::new("SPY", 10_000.0);
        let shares = log.buy(date(2), 33.0).unwrap();

        assert_eq!(shares, 303); // floor(10000 / 33)
        assert_eq!(log.shares(), 303);
        assert_relative_eq!(log.cash(), 10_000.0 - 303.0 * 33.0);
        assert_eq!(log.entries().len(), 1);
        assert_eq!(log.entries()[0].action, TradeAction::Buy);
    }

    #[test]
    fn buy_while_long_is_state_error() {
        let mut log = TradeLog::new("SPY", 10_000.0);
        log.buy(date(2), 100.0).unwrap();

        let err = log.buy(date(3), 100.0).unwrap_err();
        assert!(matches!(err, TrendbandError::State { .. }));
    }

    #[test]
    fn sell_while_flat_is_state_error() {
        let mut log = TradeLog::new("SPY", 10_000.0);
        let err = log.sell(date(2), 100.0).unwrap_err();
        assert!(matches!(err, TrendbandError::State { .. }));
    }

    #[test]
    fn buy_with_insufficient_cash_stays_flat() {
        let mut log = TradeLog::new("SPY", 50.0);
        let shares = log.buy(date(2), 100.0).unwrap();

        assert_eq!(shares, 0);
        assert!(!log.is_long());
        assert!(log.entries().is_empty());
        assert_relative_eq!(log.cash(), 50.0);
    }

    #[test]
    fn sell_restores_cash() {
        let mut log = TradeLog::new("SPY", 10_000.0);
        log.buy(date(2), 100.0).unwrap();
        log.sell(date(5), 110.0).unwrap();

        assert_eq!(log.shares(), 0);
        assert_relative_eq!(log.cash(), 10_000.0 + 100.0 * 10.0);
        assert_eq!(log.entries().len(), 2);
    }

    #[test]
    fn flat_round_trip_conserves_cash() {
        let mut log = TradeLog::new("SPY", 10_000.0);
        log.buy(date(2), 100.0).unwrap();
        log.sell(date(5), 100.0).unwrap();
        assert_relative_eq!(log.cash(), 10_000.0);
    }

    #[test]
    fn round_trips_pair_buy_with_next_sell() {
        let mut log = TradeLog::new("SPY", 10_000.0);
        log.buy(date(2), 100.0).unwrap();
        log.sell(date(5), 110.0).unwrap();
        log.buy(date(8), 105.0).unwrap();
        log.sell(date(12), 95.0).unwrap();

        let trips = log.round_trips();
        assert_eq!(trips.len(), 2);

        assert_eq!(trips[0].entry_date, date(2));
        assert_eq!(trips[0].exit_date, date(5));
        assert_relative_eq!(trips[0].pnl, 100.0 * 10.0);

        assert_eq!(trips[1].entry_date, date(8));
        assert_eq!(trips[1].exit_date, date(12));
        assert!(trips[1].pnl < 0.0);
    }

    #[test]
    fn round_trips_drop_unpaired_open_buy() {
        let mut log = TradeLog::new("SPY", 10_000.0);
        log.buy(date(2), 100.0).unwrap();
        assert!(log.round_trips().is_empty());
    }

    #[test]
    fn entries_record_cash_after() {
        let mut log = TradeLog::new("SPY", 1_000.0);
        log.buy(date(2), 300.0).unwrap(); // 3 shares, 100 left
        assert_relative_eq!(log.entries()[0].cash_after, 100.0);

        log.sell(date(3), 400.0).unwrap();
        assert_relative_eq!(log.entries()[1].cash_after, 1_300.0);
    }
}
