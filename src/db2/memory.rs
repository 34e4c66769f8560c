//! Instance memory usage from `db2pd -dbptnmem`

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::{Db2, ParseError, Program, Result};
use crate::evaluate::{Measurement, Reading};
use crate::units::{kb_to_human_size, percent};

lazy_static! {
    static ref LIMIT: Regex = Regex::new(r"(?m)^\s*Memory Limit:\s+(\d+)\s*KB").unwrap();
    static ref CURRENT: Regex = Regex::new(r"(?m)^\s*Current usage:\s+(\d+)\s*KB").unwrap();
}

const ENTITY: &str = "instance memory";

/// The database member memory controller statistics
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct MemoryUsage {
    pub limit_kb: u64,
    pub current_kb: u64,
}

impl MemoryUsage {
    pub fn percent_used(&self) -> f64 {
        percent(self.current_kb, self.limit_kb)
    }
}

fn kb(re: &Regex, field: &'static str, output: &str) -> Result<u64> {
    re.captures(output)
        .and_then(|caps| caps[1].parse().ok())
        .ok_or_else(|| {
            ParseError {
                field,
                output: output.to_owned(),
            }
            .into()
        })
}

pub fn parse(output: &str) -> Result<MemoryUsage> {
    Ok(MemoryUsage {
        limit_kb: kb(&LIMIT, "Memory Limit", output)?,
        current_kb: kb(&CURRENT, "Current usage", output)?,
    })
}

pub fn to_measurement(usage: &MemoryUsage) -> Measurement {
    Measurement::new(ENTITY, "memory", "%", Reading::Value(usage.percent_used())).with_detail(
        format!(
            "{} of {} limit",
            kb_to_human_size(usage.current_kb),
            kb_to_human_size(usage.limit_kb)
        ),
    )
}

pub fn measure(db2: &dyn Db2) -> Measurement {
    match db2.run(Program::Db2pd, &["-dbptnmem"]).and_then(|out| parse(&out)) {
        Ok(usage) => {
            debug!("memory usage: {:?}", usage);
            to_measurement(&usage)
        }
        Err(e) => Measurement::unavailable(ENTITY, "memory", e.to_string()),
    }
}
