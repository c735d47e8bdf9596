//! Summary performance statistics.
//!
//! Reduces the finalized trade log and daily balance history into named
//! metrics, consumed read-only by the reporting layer. Metrics are
//! addressable by name so the summary table can be driven from config.

use super::daily_balance::BalanceEntry;
use super::trade_log::TradeLog;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Metric names understood by [`Stats::get`], in display order.
pub const METRIC_NAMES: &[&str] = &[
    "total_return",
    "annualized_return",
    "sharpe_ratio",
    "sortino_ratio",
    "max_drawdown",
    "max_drawdown_days",
    "total_trades",
    "win_rate",
    "profit_factor",
    "avg_win",
    "avg_loss",
    "largest_win",
    "largest_loss",
    "exposure",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Stats {
    pub total_return: f64,
    pub annualized_return: f64,
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    pub max_drawdown: f64,
    pub max_drawdown_days: i64,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub trades_breakeven: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    /// Fraction of bars spent holding a position.
    pub exposure: f64,
}

impl Stats {
    pub fn compute(trade_log: &TradeLog, daily_balance: &[BalanceEntry], capital: f64) -> Self {
        let final_equity = daily_balance.last().map(|e| e.equity).unwrap_or(capital);

        let total_return = if capital > 0.0 {
            (final_equity - capital) / capital
        } else {
            0.0
        };

        let years = daily_balance.len() as f64 / TRADING_DAYS_PER_YEAR;
        let annualized_return = if years > 0.0 && total_return > -1.0 {
            (1.0 + total_return).powf(1.0 / years) - 1.0
        } else {
            0.0
        };

        let (max_drawdown, max_drawdown_days) = drawdown(daily_balance);
        let (sharpe_ratio, sortino_ratio) = risk_adjusted(daily_balance);

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut trades_breakeven = 0usize;
        let mut total_wins = 0.0_f64;
        let mut total_losses = 0.0_f64;
        let mut largest_win = 0.0_f64;
        let mut largest_loss = 0.0_f64;

        for trip in trade_log.round_trips() {
            if trip.pnl > 0.0 {
                trades_won += 1;
                total_wins += trip.pnl;
                largest_win = largest_win.max(trip.pnl);
            } else if trip.pnl < 0.0 {
                trades_lost += 1;
                total_losses += trip.pnl.abs();
                largest_loss = largest_loss.max(trip.pnl.abs());
            } else {
                trades_breakeven += 1;
            }
        }

        let total_trades = trades_won + trades_lost + trades_breakeven;
        let win_rate = if total_trades > 0 {
            trades_won as f64 / total_trades as f64
        } else {
            0.0
        };

        let profit_factor = if total_losses > 0.0 {
            total_wins / total_losses
        } else if total_wins > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        let avg_win = if trades_won > 0 {
            total_wins / trades_won as f64
        } else {
            0.0
        };
        let avg_loss = if trades_lost > 0 {
            total_losses / trades_lost as f64
        } else {
            0.0
        };

        let days_in_market = daily_balance.iter().filter(|e| e.shares > 0).count();
        let exposure = if daily_balance.is_empty() {
            0.0
        } else {
            days_in_market as f64 / daily_balance.len() as f64
        };

        Stats {
            total_return,
            annualized_return,
            sharpe_ratio,
            sortino_ratio,
            max_drawdown,
            max_drawdown_days,
            trades_won,
            trades_lost,
            trades_breakeven,
            win_rate,
            profit_factor,
            avg_win,
            avg_loss,
            largest_win,
            largest_loss,
            exposure,
        }
    }

    pub fn total_trades(&self) -> usize {
        self.trades_won + self.trades_lost + self.trades_breakeven
    }

    /// Look up a metric by name. `None` for unknown names.
    pub fn get(&self, name: &str) -> Option<f64> {
        let value = match name {
            "total_return" => self.total_return,
            "annualized_return" => self.annualized_return,
            "sharpe_ratio" => self.sharpe_ratio,
            "sortino_ratio" => self.sortino_ratio,
            "max_drawdown" => self.max_drawdown,
            "max_drawdown_days" => self.max_drawdown_days as f64,
            "total_trades" => self.total_trades() as f64,
            "win_rate" => self.win_rate,
            "profit_factor" => self.profit_factor,
            "avg_win" => self.avg_win,
            "avg_loss" => self.avg_loss,
            "largest_win" => self.largest_win,
            "largest_loss" => self.largest_loss,
            "exposure" => self.exposure,
            _ => return None,
        };
        Some(value)
    }
}

fn drawdown(balance: &[BalanceEntry]) -> (f64, i64) {
    if balance.is_empty() {
        return (0.0, 0);
    }

    let mut peak = balance[0].equity;
    let mut max_dd = 0.0_f64;
    let mut max_dd_days = 0i64;
    let mut current_dd_days = 0i64;

    for entry in balance {
        if entry.equity > peak {
            peak = entry.equity;
            current_dd_days = 0;
        } else if peak > 0.0 {
            let dd = (peak - entry.equity) / peak;
            max_dd = max_dd.max(dd);
            current_dd_days += 1;
            max_dd_days = max_dd_days.max(current_dd_days);
        }
    }

    (max_dd, max_dd_days)
}

fn risk_adjusted(balance: &[BalanceEntry]) -> (f64, f64) {
    if balance.len() < 2 {
        return (0.0, 0.0);
    }

    let returns: Vec<f64> = balance
        .windows(2)
        .map(|w| {
            if w[0].equity > 0.0 {
                (w[1].equity - w[0].equity) / w[0].equity
            } else {
                0.0
            }
        })
        .collect();

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;
    let stddev = variance.sqrt();

    let sharpe = if stddev > 0.0 {
        (mean / stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    };

    let downside: f64 = returns
        .iter()
        .filter(|&&r| r < 0.0)
        .map(|r| r.powi(2))
        .sum::<f64>()
        / n;
    let downside_stddev = downside.sqrt();

    let sortino = if downside_stddev > 0.0 {
        (mean / downside_stddev) * TRADING_DAYS_PER_YEAR.sqrt()
    } else {
        0.0
    };

    (sharpe, sortino)
}
