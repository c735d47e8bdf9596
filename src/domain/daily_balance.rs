//! Per-day mark-to-market record.
//!
//! One entry per bar processed, trade or no trade. Prior entries are never
//! mutated. Equity marks the position at the bar's close; high/low are
//! carried only for reporting ranges.

use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct BalanceEntry {
    pub date: NaiveDate,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub shares: u64,
    pub cash: f64,
    /// cash + shares * close
    pub equity: f64,
}

#[derive(Debug, Clone, Default)]
pub struct DailyBalance {
    entries: Vec<BalanceEntry>,
}

impl DailyBalance {
    pub fn new() -> Self {
        DailyBalance {
            entries: Vec::new(),
        }
    }

    pub fn append(
        &mut self,
        date: NaiveDate,
        high: f64,
        low: f64,
        close: f64,
        shares: u64,
        cash: f64,
    ) {
        let equity = cash + shares as f64 * close;
        self.entries.push(BalanceEntry {
            date,
            high,
            low,
            close,
            shares,
            cash,
            equity,
        });
    }

    pub fn entries(&self) -> &[BalanceEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
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
    fn append_marks_equity_at_close() {
        let mut dbal = DailyBalance::new();
        dbal.append(date(2), 110.0, 90.0, 105.0, 10, 500.0);

        assert_eq!(dbal.len(), 1);
        let entry = &dbal.entries()[0];
        assert_relative_eq!(entry.equity, 500.0 + 10.0 * 105.0);
    }

    #[test]
    fn flat_position_equity_is_cash() {
        let mut dbal = DailyBalance::new();
        dbal.append(date(2), 110.0, 90.0, 105.0, 0, 10_000.0);
        assert_relative_eq!(dbal.entries()[0].equity, 10_000.0);
    }

    #[test]
    fn high_low_do_not_affect_equity() {
        let mut dbal = DailyBalance::new();
        dbal.append(date(2), 200.0, 10.0, 100.0, 5, 0.0);
        assert_relative_eq!(dbal.entries()[0].equity, 500.0);
    }

    #[test]
    fn entries_preserve_append_order() {
        let mut dbal = DailyBalance::new();
        dbal.append(date(2), 1.0, 1.0, 1.0, 0, 1.0);
        dbal.append(date(3), 2.0, 2.0, 2.0, 0, 2.0);
        dbal.append(date(4), 3.0, 3.0, 3.0, 0, 3.0);

        let dates: Vec<NaiveDate> = dbal.entries().iter().map(|e| e.date).collect();
        assert_eq!(dates, vec![date(2), date(3), date(4)]);
    }
}
