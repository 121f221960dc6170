//! Configuration validation.
//!
//! Checks all config fields before a run starts. Every key has a
//! working default, so an empty file validates; only values that are
//! present and out of range fail.

use crate::domain::error::DiptraderError;
use crate::ports::config_port::ConfigPort;

pub fn validate_simulation_config(config: &dyn ConfigPort) -> Result<(), DiptraderError> {
    validate_initial_cash(config)?;
    validate_weeks(config)?;
    validate_selector(config)?;
    validate_engine(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), DiptraderError> {
    match config.get_string("data", "dir") {
        Some(s) if !s.trim().is_empty() => {}
        _ => {
            return Err(DiptraderError::ConfigMissing {
                section: "data".to_string(),
                key: "dir".to_string(),
            })
        }
    }

    match config.get_string("data", "symbols") {
        Some(s) if !s.trim().is_empty() => Ok(()),
        _ => Err(DiptraderError::ConfigMissing {
            section: "data".to_string(),
            key: "symbols".to_string(),
        }),
    }
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), DiptraderError> {
    let value = config.get_double("simulation", "initial_cash", 10_000.0);
    if value <= 0.0 {
        return Err(DiptraderError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "initial_cash".to_string(),
            reason: "initial_cash must be positive".to_string(),
        });
    }
    Ok(())
}

fn validate_weeks(config: &dyn ConfigPort) -> Result<(), DiptraderError> {
    let value = config.get_int("simulation", "weeks", 52);
    if value < 0 {
        return Err(DiptraderError::ConfigInvalid {
            section: "simulation".to_string(),
            key: "weeks".to_string(),
            reason: "weeks must be non-negative".to_string(),
        });
    }
    Ok(())
}

fn validate_selector(config: &dyn ConfigPort) -> Result<(), DiptraderError> {
    let min_vol = config.get_double("selector", "min_volatility", 0.01);
    if min_vol < 0.0 {
        return Err(DiptraderError::ConfigInvalid {
            section: "selector".to_string(),
            key: "min_volatility".to_string(),
            reason: "min_volatility must be non-negative".to_string(),
        });
    }

    let max_vol = config.get_double("selector", "max_volatility", 0.5);
    if max_vol <= min_vol {
        return Err(DiptraderError::ConfigInvalid {
            section: "selector".to_string(),
            key: "max_volatility".to_string(),
            reason: "max_volatility must be greater than min_volatility".to_string(),
        });
    }

    let min_points = config.get_int("selector", "min_data_points", 30);
    if min_points < 2 {
        return Err(DiptraderError::ConfigInvalid {
            section: "selector".to_string(),
            key: "min_data_points".to_string(),
            reason: "min_data_points must be at least 2".to_string(),
        });
    }
    Ok(())
}

fn validate_engine(config: &dyn ConfigPort) -> Result<(), DiptraderError> {
    let buy_threshold = config.get_double("engine", "buy_threshold", -0.05);
    if buy_threshold >= 0.0 {
        return Err(DiptraderError::ConfigInvalid {
            section: "engine".to_string(),
            key: "buy_threshold".to_string(),
            reason: "buy_threshold must be negative".to_string(),
        });
    }

    let sell_threshold = config.get_double("engine", "sell_threshold", 0.10);
    if sell_threshold <= 0.0 {
        return Err(DiptraderError::ConfigInvalid {
            section: "engine".to_string(),
            key: "sell_threshold".to_string(),
            reason: "sell_threshold must be positive".to_string(),
        });
    }

    let buy_amount = config.get_double("engine", "buy_amount", 5.0);
    if buy_amount <= 0.0 {
        return Err(DiptraderError::ConfigInvalid {
            section: "engine".to_string(),
            key: "buy_amount".to_string(),
            reason: "buy_amount must be positive".to_string(),
        });
    }

    let sell_amount = config.get_double("engine", "sell_amount", 10.0);
    if sell_amount <= 0.0 {
        return Err(DiptraderError::ConfigInvalid {
            section: "engine".to_string(),
            key: "sell_amount".to_string(),
            reason: "sell_amount must be positive".to_string(),
        });
    }
    Ok(())
}
