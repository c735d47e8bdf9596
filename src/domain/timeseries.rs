//! Series preparation: period selection, indicator annotation, finalization.
//!
//! The engine only ever sees a finalized series — validated, trimmed to the
//! requested period, and with every indicator defined on every bar.

use std::collections::HashMap;

use chrono::NaiveDate;

use super::error::TrendbandError;
use super::indicator;
use super::ohlcv::{IndicatorBar, OhlcvBar, SignalBar};
use super::run_config::RunConfig;

/// Trim a fetched series to `[start, end]`, optionally switching to
/// split/dividend-adjusted prices.
pub fn select_period(
    bars: &[OhlcvBar],
    start: NaiveDate,
    end: NaiveDate,
    use_adjusted: bool,
) -> Vec<OhlcvBar> {
    bars.iter()
        .filter(|b| b.date >= start && b.date <= end)
        .map(|b| if use_adjusted { b.adjusted() } else { b.clone() })
        .collect()
}

/// Input validation run once, before the simulation loop.
///
/// A malformed bar aborts the whole run: silently skipping one would
/// corrupt the causal order of trades and balance entries.
pub fn validate(symbol: &str, bars: &[OhlcvBar]) -> Result<(), TrendbandError> {
    if bars.is_empty() {
        return Err(TrendbandError::Data {
            symbol: symbol.to_string(),
            reason: "no bars in selected period".into(),
        });
    }

    for (i, bar) in bars.iter().enumerate() {
        for (name, value) in [
            ("open", bar.open),
            ("high", bar.high),
            ("low", bar.low),
            ("close", bar.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(TrendbandError::Data {
                    symbol: symbol.to_string(),
                    reason: format!("bad {name} price {value} on {}", bar.date),
                });
            }
        }
        if i > 0 && bar.date <= bars[i - 1].date {
            return Err(TrendbandError::Data {
                symbol: symbol.to_string(),
                reason: format!(
                    "non-monotonic dates: {} followed by {}",
                    bars[i - 1].date,
                    bar.date
                ),
            });
        }
    }
    Ok(())
}

/// Attach the sma and the regime signal to each bar.
///
/// The regime comes from a crossover on the reference series and is joined
/// onto the traded series by date; dates the reference never saw stay
/// undefined.
pub fn annotate(
    bars: &[OhlcvBar],
    reference: &[OhlcvBar],
    config: &RunConfig,
) -> Vec<IndicatorBar> {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let sma = indicator::sma(&closes, config.strategy.sma_period);

    let ref_closes: Vec<f64> = reference.iter().map(|b| b.close).collect();
    let ref_regime = indicator::crossover(&ref_closes, config.regime_fast, config.regime_slow);
    let regime_by_date: HashMap<NaiveDate, f64> = reference
        .iter()
        .zip(ref_regime.iter())
        .filter_map(|(bar, r)| r.map(|r| (bar.date, r)))
        .collect();

    bars.iter()
        .zip(sma.iter())
        .map(|(bar, sma)| IndicatorBar {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            sma: *sma,
            regime: regime_by_date.get(&bar.date).copied(),
        })
        .collect()
}

/// Drop leading bars that lack an indicator value and return the trimmed
/// series with its new effective start date.
///
/// A hole after the first fully-defined bar means the traded and reference
/// series are misaligned, which is fatal.
pub fn finalize(
    symbol: &str,
    series: &[IndicatorBar],
    start: NaiveDate,
) -> Result<(Vec<SignalBar>, NaiveDate), TrendbandError> {
    let first = series
        .iter()
        .position(|b| b.sma.is_some() && b.regime.is_some())
        .ok_or_else(|| TrendbandError::Data {
            symbol: symbol.to_string(),
            reason: "series too short for indicator warm-up".into(),
        })?;

    let mut out = Vec::with_capacity(series.len() - first);
    for bar in &series[first..] {
        let (sma, regime) = match (bar.sma, bar.regime) {
            (Some(s), Some(r)) => (s, r),
            _ => {
                return Err(TrendbandError::Data {
                    symbol: symbol.to_string(),
                    reason: format!("indicator hole on {}", bar.date),
                });
            }
        };
        out.push(SignalBar {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            sma,
            regime,
        });
    }

    let effective_start = out[0].date.max(start);
    Ok((out, effective_start))
}
