//! Warning and critical bounds

use std::fmt;

use crate::Status;

/// The largest value a percentage policy can take
pub const PERCENT: f64 = 100.0;

/// Returned when a policy is built with bounds that can never make sense
#[derive(Debug, PartialEq, Clone)]
pub enum ConfigurationError {
    /// The warning bound is not below the critical bound
    WarningNotBelowCritical { warning: f64, critical: f64 },
    /// A bound is not in `(0, upper]`
    OutOfRange { name: &'static str, value: f64, upper: f64 },
}

impl fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::ConfigurationError::*;
        match *self {
            WarningNotBelowCritical { warning, critical } => write!(
                f,
                "warning threshold ({}) must be lower than critical threshold ({})",
                warning, critical
            ),
            OutOfRange { name, value, upper } => write!(
                f,
                "{} threshold ({}) must be greater than 0 and at most {}",
                name, value, upper
            ),
        }
    }
}

/// A validated pair of thresholds: `0 < warning < critical <= upper`
///
/// There is no way to build one of these that violates that invariant, so
/// evaluating against it never fails.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ThresholdPolicy {
    warning: f64,
    critical: f64,
    upper: f64,
}

impl ThresholdPolicy {
    /// A policy for percentages
    pub fn percent(warning: f64, critical: f64) -> Result<ThresholdPolicy, ConfigurationError> {
        ThresholdPolicy::bounded(warning, critical, PERCENT)
    }

    /// A policy for a quantity whose largest sensible value is `upper`
    pub fn bounded(
        warning: f64,
        critical: f64,
        upper: f64,
    ) -> Result<ThresholdPolicy, ConfigurationError> {
        check_range("warning", warning, upper)?;
        check_range("critical", critical, upper)?;
        if warning >= critical {
            return Err(ConfigurationError::WarningNotBelowCritical { warning, critical });
        }
        Ok(ThresholdPolicy {
            warning,
            critical,
            upper,
        })
    }

    pub fn warning(&self) -> f64 {
        self.warning
    }

    pub fn critical(&self) -> f64 {
        self.critical
    }

    pub fn upper(&self) -> f64 {
        self.upper
    }

    /// The base numeric rule
    pub fn classify(&self, value: f64) -> Status {
        if value < self.warning {
            Status::Ok
        } else if value < self.critical {
            Status::Warning
        } else {
            Status::Critical
        }
    }
}

fn check_range(name: &'static str, value: f64, upper: f64) -> Result<(), ConfigurationError> {
    // written so that NaN lands in the error branch
    if value > 0.0 && value <= upper {
        Ok(())
    } else {
        Err(ConfigurationError::OutOfRange { name, value, upper })
    }
}
