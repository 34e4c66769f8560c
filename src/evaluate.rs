//! Turn a measurement into a report
//!
//! Precedence, highest first:
//!
//! 1. The data could not be read at all: UNKNOWN
//! 2. The thing being measured does not exist: OK if that is acceptable,
//!    CRITICAL otherwise
//! 3. Categorical state (HADR role and state, SMS temporary tablespaces,
//!    `--ignore-thresholds`) that decides the outcome on its own
//! 4. The numeric thresholds, followed by the categorical adjustments that
//!    only shift their result (tablespace auto-resize and state)

use crate::category::{
    Category, HadrRole, HadrState, HadrStatus, TablespaceKind, TablespaceState,
};
use crate::report::{PerfMetric, Report};
use crate::threshold::ThresholdPolicy;
use crate::Status;

/// What we managed to learn from DB2
#[derive(Debug, PartialEq, Clone)]
pub enum Reading {
    Value(f64),
    /// The entity (tablespace, HADR pair) does not exist
    Absent,
    /// Could not get data: command failure, permissions, unparseable output
    Unavailable(String),
}

/// A single number from DB2, with everything needed to describe it
#[derive(Debug, PartialEq, Clone)]
pub struct Measurement {
    /// Used in messages, e.g. `tablespace USERSPACE1`
    pub entity: String,
    /// Used as the perfdata label
    pub metric: String,
    pub unit: &'static str,
    pub reading: Reading,
    /// Extra context appended to numeric messages, e.g. `1.2G of 4.0G`
    pub detail: Option<String>,
    pub category: Category,
}

impl Measurement {
    pub fn new(entity: &str, metric: &str, unit: &'static str, reading: Reading) -> Measurement {
        Measurement {
            entity: entity.to_owned(),
            metric: metric.to_owned(),
            unit,
            reading,
            detail: None,
            category: Category::Plain,
        }
    }

    pub fn unavailable<S: Into<String>>(entity: &str, metric: &str, reason: S) -> Measurement {
        Measurement::new(entity, metric, "", Reading::Unavailable(reason.into()))
    }

    pub fn with_detail<S: Into<String>>(mut self, detail: S) -> Measurement {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Measurement {
        self.category = category;
        self
    }
}

/// Flags from the command line that change how a measurement is judged
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Overrides {
    /// An absent entity is fine
    pub absent_ok: bool,
    /// Report the value but never alert on it
    pub ignore_thresholds: bool,
}

/// Judge `measurement` against `policy`
///
/// Pure: the same arguments always produce the same report.
pub fn evaluate(
    measurement: &Measurement,
    policy: &ThresholdPolicy,
    overrides: &Overrides,
) -> Report {
    let value = match measurement.reading {
        Reading::Unavailable(ref reason) => {
            return Report::new(
                Status::Unknown,
                format!("unable to check {}: {}", measurement.entity, reason),
            );
        }
        Reading::Absent => return absent(measurement, overrides),
        Reading::Value(value) => value,
    };

    let metric = PerfMetric::new(&measurement.metric, value, measurement.unit)
        .with_bounds(policy.warning(), policy.critical())
        .with_max(policy.upper());

    if let Some(forced) = forced(measurement, value, overrides) {
        return forced.with_metric(metric);
    }

    let report = numeric(measurement, value, policy).with_metric(metric);
    match measurement.category {
        Category::Tablespace(ref tbsp) => adjust_tablespace(report, tbsp),
        _ => report,
    }
}

fn absent(measurement: &Measurement, overrides: &Overrides) -> Report {
    if overrides.absent_ok {
        Report::new(
            Status::Ok,
            format!("{} does not exist, which is allowed", measurement.entity),
        )
    } else {
        Report::new(
            Status::Critical,
            format!("{} does not exist", measurement.entity),
        )
    }
}

fn describe(measurement: &Measurement, value: f64) -> String {
    match measurement.detail {
        Some(ref detail) => format!(
            "{} is at {:.1}{} ({})",
            measurement.entity, value, measurement.unit, detail
        ),
        None => format!("{} is at {:.1}{}", measurement.entity, value, measurement.unit),
    }
}

/// Categorical states that decide the status without looking at thresholds
fn forced(measurement: &Measurement, value: f64, overrides: &Overrides) -> Option<Report> {
    if overrides.ignore_thresholds {
        return Some(Report::new(
            Status::Ok,
            format!("{}, thresholds ignored", describe(measurement, value)),
        ));
    }
    match measurement.category {
        Category::Plain => None,
        Category::Tablespace(ref tbsp) => {
            if tbsp.kind == TablespaceKind::Sms && tbsp.content.is_temporary_or_any() {
                Some(Report::new(
                    Status::Ok,
                    format!(
                        "{}, SMS tablespaces grow with their filesystem",
                        describe(measurement, value)
                    ),
                ))
            } else {
                None
            }
        }
        Category::Hadr(ref hadr) => forced_hadr(measurement, hadr),
    }
}

fn forced_hadr(measurement: &Measurement, hadr: &HadrStatus) -> Option<Report> {
    let status = match (hadr.role, &hadr.state) {
        (HadrRole::Primary, &HadrState::Disconnected) => Status::Critical,
        (HadrRole::Standby, &HadrState::RemoteCatchupPending) => Status::Warning,
        (HadrRole::Standby, &HadrState::Disconnected) => Status::Critical,
        _ => return None,
    };
    Some(Report::new(
        status,
        format!(
            "{} is {} in state {}",
            measurement.entity, hadr.role, hadr.state
        ),
    ))
}

fn numeric(measurement: &Measurement, value: f64, policy: &ThresholdPolicy) -> Report {
    let status = policy.classify(value);
    let bound = match status {
        Status::Ok => format!("below {}{}", policy.warning(), measurement.unit),
        Status::Warning => format!("warning at {}{}", policy.warning(), measurement.unit),
        _ => format!("critical at {}{}", policy.critical(), measurement.unit),
    };
    Report::new(
        status,
        format!("{}, {}", describe(measurement, value), bound),
    )
}

fn adjust_tablespace(report: Report, tbsp: &TablespaceState) -> Report {
    let report = if tbsp.auto_resize && report.status == Status::Critical {
        report
            .with_status(Status::Ok)
            .with_message(format!(
                "{}, but auto-resize is enabled: make sure the filesystem has room",
                report.message
            ))
    } else {
        report
    };
    if tbsp.is_normal() {
        report
    } else {
        let report = report.prefixed(&tbsp.state);
        if report.status == Status::Ok {
            report.with_status(Status::Warning)
        } else {
            report
        }
    }
}
