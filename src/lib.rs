//! tabin-db2-plugins: health checks for DB2 databases
//!
//! Each binary in this crate is a check meant to be run by a monitoring
//! supervisor (nagios, sensu, or a Check_MK agent over ssh). They all follow
//! the same shape:
//!
//! * parse flags into a [`ThresholdPolicy`](threshold/struct.ThresholdPolicy.html)
//!   and some domain-specific overrides
//! * ask DB2 for numbers via the [`db2`](db2/index.html) module, producing a
//!   [`Measurement`](evaluate/struct.Measurement.html)
//! * [`evaluate`](evaluate/fn.evaluate.html) the measurement into a
//!   [`Report`](report/struct.Report.html), print it, and exit with the
//!   report's status
//!
//! See the [`scripts`](scripts/index.html) module for the `--help` of every
//! check.

use std::fmt;
use std::process;
use std::str::FromStr;

use serde::Deserialize;

pub mod category;
pub mod db2;
pub mod evaluate;
pub mod lock;
pub mod plugin;
pub mod report;
pub mod scripts;
pub mod threshold;
pub mod trace;
pub mod units;

pub use crate::evaluate::{evaluate, Measurement, Overrides};
pub use crate::report::{PerfMetric, Report};
pub use crate::threshold::{ConfigurationError, ThresholdPolicy};

/// All possible exit statuses for a check
///
/// `Unknown` means "could not determine", it is not a severity between
/// `Warning` and `Critical`, so this is deliberately not `Ord`. Use
/// [`severity`](#method.severity) to compare the known levels.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Status {
    /// Exit with the conventional nagios code for this status
    pub fn exit(self) -> ! {
        process::exit(self.code())
    }

    /// 0, 1, 2 or 3
    pub fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::Warning => 1,
            Status::Critical => 2,
            Status::Unknown => 3,
        }
    }

    /// Position on the numeric scale, `None` for `Unknown`
    pub fn severity(self) -> Option<u8> {
        match self {
            Status::Ok => Some(0),
            Status::Warning => Some(1),
            Status::Critical => Some(2),
            Status::Unknown => None,
        }
    }

    /// All the strings that `from_str` accepts as canonical names
    pub fn str_values() -> [&'static str; 4] {
        ["ok", "warning", "critical", "unknown"]
    }
}

impl FromStr for Status {
    type Err = String;

    /// Primarily useful to construct from argv
    fn from_str(s: &str) -> Result<Status, String> {
        match s.to_lowercase().as_ref() {
            "ok" => Ok(Status::Ok),
            "warning" | "warn" => Ok(Status::Warning),
            "critical" | "crit" => Ok(Status::Critical),
            "unknown" => Ok(Status::Unknown),
            _ => Err(format!("Unexpected exit status: {}", s)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let msg = match *self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        };
        write!(f, "{}", msg)
    }
}
