//! Transaction log utilization from `SYSIBMADM.LOG_UTILIZATION`

use std::cmp::Ordering;

use tracing::debug;

use super::{nullable, Db2, ParseError, Result};
use crate::evaluate::{Measurement, Reading};
use crate::units::kb_to_human_size;

pub const QUERY: &str = "SELECT LOG_UTILIZATION_PERCENT, TOTAL_LOG_USED_KB, \
                         TOTAL_LOG_AVAILABLE_KB FROM SYSIBMADM.LOG_UTILIZATION";

/// One row per database partition
///
/// `percent_used` is `None` with infinite logging, where the log can never
/// fill up.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct LogUsage {
    pub percent_used: Option<f64>,
    pub used_kb: u64,
    pub available_kb: Option<u64>,
}

fn parse_row(line: &str) -> Result<LogUsage> {
    let err = |field| ParseError {
        field,
        output: line.to_owned(),
    };
    let cols = line.split_whitespace().collect::<Vec<_>>();
    if cols.len() != 3 {
        return Err(err("3 columns").into());
    }
    Ok(LogUsage {
        percent_used: nullable(cols[0]),
        used_kb: nullable(cols[1]).ok_or_else(|| err("TOTAL_LOG_USED_KB"))?,
        // -1 means infinite logging
        available_kb: nullable::<i64>(cols[2])
            .and_then(|kb| if kb < 0 { None } else { Some(kb as u64) }),
    })
}

pub fn parse(output: &str) -> Result<Vec<LogUsage>> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_row)
        .collect()
}

fn fullest(rows: Vec<LogUsage>) -> Option<LogUsage> {
    rows.into_iter().max_by(|l, r| {
        l.percent_used
            .unwrap_or(0.0)
            .partial_cmp(&r.percent_used.unwrap_or(0.0))
            .unwrap_or(Ordering::Equal)
    })
}

pub fn to_measurement(database: &str, rows: Vec<LogUsage>) -> Measurement {
    let entity = format!("transaction log of {}", database);
    match fullest(rows) {
        None => Measurement::unavailable(&entity, "log", "no rows in SYSIBMADM.LOG_UTILIZATION"),
        Some(LogUsage {
            percent_used: None,
            used_kb,
            ..
        }) => Measurement::new(&entity, "log", "%", Reading::Value(0.0)).with_detail(format!(
            "{} used, infinite logging",
            kb_to_human_size(used_kb)
        )),
        Some(LogUsage {
            percent_used: Some(percent),
            used_kb,
            available_kb,
        }) => Measurement::new(&entity, "log", "%", Reading::Value(percent)).with_detail(format!(
            "{} used, {} available",
            kb_to_human_size(used_kb),
            available_kb
                .map(kb_to_human_size)
                .unwrap_or_else(|| "unlimited".to_owned())
        )),
    }
}

fn load(db2: &dyn Db2, database: &str) -> Result<Vec<LogUsage>> {
    let rows = db2.connect(database).and_then(|()| db2.query(QUERY));
    db2.terminate();
    parse(&rows?)
}

pub fn measure(db2: &dyn Db2, database: &str) -> Measurement {
    let database = database.to_uppercase();
    match load(db2, &database) {
        Ok(rows) => {
            debug!("log rows: {:?}", rows);
            to_measurement(&database, rows)
        }
        Err(e) => Measurement::unavailable(
            &format!("transaction log of {}", database),
            "log",
            e.to_string(),
        ),
    }
}
