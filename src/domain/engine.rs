//! The backtest event loop.
//!
//! A day-by-day state machine over the finalized series. Rule evaluation is
//! a pure function of (bar, position state, last-bar flag, strategy
//! parameters); the driver loop applies its output to the owned TradeLog and
//! DailyBalance accumulators. The decision at bar `i` depends only on bars
//! `0..=i` — there is no access to later bars.

use super::daily_balance::DailyBalance;
use super::error::TrendbandError;
use super::ohlcv::SignalBar;
use super::run_config::StrategyParams;
use super::trade_log::TradeLog;

/// At most one signal fires per bar: exit evaluation strictly precedes
/// entry, so a bar that exits never re-enters the same day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Enter,
    Exit,
}

/// Finalized logs for one run.
#[derive(Debug, Clone)]
pub struct BacktestResult {
    pub trade_log: TradeLog,
    pub daily_balance: DailyBalance,
}

/// Evaluate the trading rule for a single bar.
///
/// Exit (only when long) fires if the regime filter disagrees, the close
/// breaks the lower band, or this is the final bar (forced liquidation).
/// Entry (only when flat, and only when no exit fired) fires when the
/// regime permits and the close breaks the upper band. With a zero band
/// both thresholds collapse to the sma and the inequalities stay strict.
pub fn evaluate(
    bar: &SignalBar,
    is_long: bool,
    is_last_bar: bool,
    params: &StrategyParams,
) -> Option<Signal> {
    let upper_band = bar.sma * (1.0 + params.percent_band / 100.0);
    let lower_band = bar.sma * (1.0 - params.percent_band / 100.0);

    if is_long {
        let regime_exit = params.use_regime_filter && bar.regime < 0.0;
        if regime_exit || bar.close < lower_band || is_last_bar {
            return Some(Signal::Exit);
        }
    } else {
        let regime_ok = bar.regime > 0.0 || !params.use_regime_filter;
        if regime_ok && bar.close > upper_band {
            return Some(Signal::Enter);
        }
    }
    None
}

/// Run the simulation over a finalized series.
///
/// Iterates each bar exactly once in chronological order, trades at the
/// bar's close, and appends one balance entry per bar regardless of whether
/// a trade fired. The series must already be validated and finalized; an
/// invariant violation mid-loop aborts the run with no partial logs.
pub fn run(
    symbol: &str,
    series: &[SignalBar],
    capital: f64,
    params: &StrategyParams,
) -> Result<BacktestResult, TrendbandError> {
    let mut tlog = TradeLog::new(symbol, capital);
    let mut dbal = DailyBalance::new();

    let last = series.len().saturating_sub(1);
    for (i, bar) in series.iter().enumerate() {
        match evaluate(bar, tlog.is_long(), i == last, params) {
            Some(Signal::Exit) => {
                tlog.sell(bar.date, bar.close)?;
            }
            Some(Signal::Enter) => {
                tlog.buy(bar.date, bar.close)?;
            }
            None => {}
        }
        dbal.append(bar.date, bar.high, bar.low, bar.close, tlog.shares(), tlog.cash());
    }

    Ok(BacktestResult {
        trade_log: tlog,
        daily_balance: dbal,
    })
}
