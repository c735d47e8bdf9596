//! Configuration validation.
//!
//! Every field is checked up front, before any data is fetched. A backtest
//! never starts with a config it would later trip over.

use chrono::NaiveDate;

use crate::domain::error::TrendbandError;
use crate::ports::config_port::ConfigPort;

pub fn validate_run_config(config: &dyn ConfigPort) -> Result<(), TrendbandError> {
    validate_capital(config)?;
    validate_sma_period(config)?;
    validate_percent_band(config)?;
    validate_regime_windows(config)?;
    validate_dates(config)?;
    validate_symbols(config)?;
    Ok(())
}

fn validate_capital(config: &dyn ConfigPort) -> Result<(), TrendbandError> {
    let value = config.get_double("backtest", "capital", 0.0);
    if value <= 0.0 {
        return Err(TrendbandError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "capital".to_string(),
            reason: "capital must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_sma_period(config: &dyn ConfigPort) -> Result<(), TrendbandError> {
    let value = config.get_int("strategy", "sma_period", 200);
    if value < 1 {
        return Err(TrendbandError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "sma_period".to_string(),
            reason: "sma_period must be at least 1".to_string(),
        });
    }
    Ok(())
}

fn validate_percent_band(config: &dyn ConfigPort) -> Result<(), TrendbandError> {
    let value = config.get_double("strategy", "percent_band", 0.0);
    if value < 0.0 {
        return Err(TrendbandError::ConfigInvalid {
            section: "strategy".to_string(),
            key: "percent_band".to_string(),
            reason: "percent_band must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_regime_windows(config: &dyn ConfigPort) -> Result<(), TrendbandError> {
    for key in ["regime_fast", "regime_slow"] {
        let default = if key == "regime_fast" { 1 } else { 200 };
        let value = config.get_int("strategy", key, default);
        if value < 1 {
            return Err(TrendbandError::ConfigInvalid {
                section: "strategy".to_string(),
                key: key.to_string(),
                reason: format!("{key} must be at least 1"),
            });
        }
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TrendbandError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;
    if start >= end {
        return Err(TrendbandError::ConfigInvalid {
            section: "backtest".to_string(),
            key: "start_date".to_string(),
            reason: "start_date must be before end_date".to_string(),
        });
    }
    Ok(())
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, TrendbandError> {
    match config.get_string("backtest", key) {
        None => Err(TrendbandError::ConfigMissing {
            section: "backtest".to_string(),
            key: key.to_string(),
        }),
        Some(s) => {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| TrendbandError::ConfigInvalid {
                section: "backtest".to_string(),
                key: key.to_string(),
                reason: format!("invalid {key} format, expected YYYY-MM-DD"),
            })
        }
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), TrendbandError> {
    let symbols = config.get_string("backtest", "symbols");
    let symbol = config.get_string("backtest", "symbol");

    match (symbols, symbol) {
        (Some(s), _) if !s.trim().is_empty() => Ok(()),
        (None, Some(s)) if !s.trim().is_empty() => Ok(()),
        _ => Err(TrendbandError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbol".to_string(),
        }),
    }
}
