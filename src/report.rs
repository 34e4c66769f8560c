//! The outcome of a check, and the two ways of printing it

use std::fmt;

use crate::Status;

/// One piece of performance data
///
/// Rendered as `name=value[unit];warn;crit;0;max`, with empty fields for
/// missing bounds.
#[derive(Debug, PartialEq, Clone)]
pub struct PerfMetric {
    pub name: String,
    pub value: f64,
    pub unit: &'static str,
    pub warn: Option<f64>,
    pub crit: Option<f64>,
    pub max: Option<f64>,
}

impl PerfMetric {
    pub fn new(name: &str, value: f64, unit: &'static str) -> PerfMetric {
        PerfMetric {
            name: name.to_owned(),
            value,
            unit,
            warn: None,
            crit: None,
            max: None,
        }
    }

    pub fn with_bounds(mut self, warn: f64, crit: f64) -> PerfMetric {
        self.warn = Some(warn);
        self.crit = Some(crit);
        self
    }

    pub fn with_max(mut self, max: f64) -> PerfMetric {
        self.max = Some(max);
        self
    }

    fn write_fields(&self, f: &mut fmt::Formatter, unit: &str) -> fmt::Result {
        write!(
            f,
            "{}={}{};{};{};0;{}",
            self.name,
            number(self.value),
            unit,
            self.warn.map(number).unwrap_or_default(),
            self.crit.map(number).unwrap_or_default(),
            self.max.map(number).unwrap_or_default()
        )
    }
}

impl fmt::Display for PerfMetric {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_fields(f, self.unit)
    }
}

/// Check_MK does not understand units in local check perfdata
struct NoUnit<'a>(&'a PerfMetric);

impl<'a> fmt::Display for NoUnit<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.write_fields(f, "")
    }
}

/// Status, message and metrics
///
/// Reports are values: every `with_*`/`prefixed` method hands back a new
/// report rather than changing this one.
#[derive(Debug, PartialEq, Clone)]
pub struct Report {
    pub status: Status,
    pub message: String,
    pub metrics: Vec<PerfMetric>,
}

impl Report {
    pub fn new<S: Into<String>>(status: Status, message: S) -> Report {
        Report {
            status,
            message: message.into(),
            metrics: Vec::new(),
        }
    }

    pub fn with_metric(&self, metric: PerfMetric) -> Report {
        let mut metrics = self.metrics.clone();
        metrics.push(metric);
        Report {
            metrics,
            ..self.clone()
        }
    }

    pub fn with_status(&self, status: Status) -> Report {
        Report {
            status,
            ..self.clone()
        }
    }

    pub fn with_message<S: Into<String>>(&self, message: S) -> Report {
        Report {
            message: message.into(),
            ..self.clone()
        }
    }

    /// Prepend `prefix: ` to the message
    pub fn prefixed(&self, prefix: &str) -> Report {
        self.with_message(format!("{}: {}", prefix, self.message))
    }

    /// The default rendering: a status line, plus a perfdata line if there
    /// are any metrics
    pub fn render(&self) -> String {
        let mut out = format!("{}: {}", self.status, self.message);
        if !self.metrics.is_empty() {
            let perf = self
                .metrics
                .iter()
                .map(|m| m.to_string())
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str("\n| ");
            out.push_str(&perf);
        }
        out
    }

    /// A Check_MK local check line: `<code> <service> <perfdata> <text>`
    pub fn render_check_mk(&self, service: &str) -> String {
        let perf = if self.metrics.is_empty() {
            "-".to_owned()
        } else {
            self.metrics
                .iter()
                .map(|m| NoUnit(m).to_string())
                .collect::<Vec<_>>()
                .join("|")
        };
        format!(
            "{} {} {} {}: {}",
            self.status.code(),
            service_name(service),
            perf,
            self.status,
            self.message.replace('\n', " ")
        )
    }
}

/// Check_MK splits local check lines on whitespace
pub fn service_name(service: &str) -> String {
    service.split_whitespace().collect::<Vec<_>>().join("_")
}

/// Integers print without a fraction, everything else with at most two
/// decimal places
fn number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        let s = format!("{:.2}", n);
        s.trim_end_matches('0').trim_end_matches('.').to_owned()
    }
}
