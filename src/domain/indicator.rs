//! Trailing-window indicators.
//!
//! Only what the strategy needs: a simple moving average and a two-window
//! crossover signal. Both return one slot per input value, `None` while the
//! window has not filled, so output stays index-aligned with the input.

/// Simple moving average over a trailing `window`.
///
/// Undefined (`None`) for the first `window - 1` slots. A zero window is a
/// configuration defect and is rejected upstream; here it yields all `None`.
pub fn sma(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);
    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }
    out
}

/// Crossover signal between a fast and a slow moving average of `values`.
///
/// +1.0 where sma(fast) > sma(slow), -1.0 otherwise. `None` until both
/// averages are defined. With `fast = 1` this degenerates to "price above
/// its slow average", the classic regime filter.
pub fn crossover(values: &[f64], fast: usize, slow: usize) -> Vec<Option<f64>> {
    let fast_ma = sma(values, fast);
    let slow_ma = sma(values, slow);

    fast_ma
        .iter()
        .zip(slow_ma.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(if f > s { 1.0 } else { -1.0 }),
            _ => None,
        })
        .collect()
}
