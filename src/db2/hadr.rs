//! HADR status from `db2pd -hadr -db <database>`
//!
//! `db2pd` prints one block of `KEY = VALUE` lines per standby, each starting
//! with `HADR_ROLE`.

use std::cmp::Ordering;

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::{identifier, Db2, ParseError, Program, Result};
use crate::category::{Category, HadrRole, HadrState, HadrStatus};
use crate::evaluate::{Measurement, Reading};

lazy_static! {
    static ref FIELD: Regex =
        Regex::new(r"^\s*([A-Za-z_]+(?:\([a-z]+\))?)\s*=\s*(.*?)\s*$").unwrap();
}

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// One primary/standby pair
#[derive(Debug, PartialEq, Clone)]
pub struct Pair {
    pub status: HadrStatus,
    pub log_gap_bytes: u64,
}

impl Pair {
    fn log_gap_mb(&self) -> f64 {
        self.log_gap_bytes as f64 / BYTES_PER_MB
    }

    /// States that decide the outcome without looking at the log gap
    fn is_troubled(&self) -> bool {
        match self.status.state {
            HadrState::Disconnected | HadrState::RemoteCatchupPending => true,
            _ => false,
        }
    }
}

#[derive(Default)]
struct Block {
    role: Option<String>,
    state: Option<String>,
    connect_status: Option<String>,
    log_gap: Option<String>,
}

impl Block {
    fn into_pair(self, output: &str) -> Result<Option<Pair>> {
        let err = |field| ParseError {
            field,
            output: output.to_owned(),
        };
        let role = match self.role {
            Some(ref role) if role.eq_ignore_ascii_case("STANDARD") => return Ok(None),
            Some(role) => role.parse::<HadrRole>().map_err(|_| err("HADR_ROLE"))?,
            None => return Ok(None),
        };
        let mut state = self
            .state
            .ok_or_else(|| err("HADR_STATE"))?
            .parse::<HadrState>()
            .map_err(|_| err("HADR_STATE"))?;
        if let Some(ref connect) = self.connect_status {
            if connect.eq_ignore_ascii_case("DISCONNECTED") {
                state = HadrState::Disconnected;
            }
        }
        let log_gap_bytes = match self.log_gap {
            Some(ref gap) => gap.parse().map_err(|_| err("HADR_LOG_GAP(bytes)"))?,
            None => 0,
        };
        Ok(Some(Pair {
            status: HadrStatus { role, state },
            log_gap_bytes,
        }))
    }
}

/// Parse `db2pd -hadr` output
///
/// An empty vec means the database is not configured for HADR, or is not
/// activated at all.
pub fn parse(output: &str) -> Result<Vec<Pair>> {
    if output.contains("not activated") {
        return Ok(Vec::new());
    }
    let mut blocks: Vec<Block> = Vec::new();
    for line in output.lines() {
        let caps = match FIELD.captures(line) {
            Some(caps) => caps,
            None => continue,
        };
        let value = caps[2].to_owned();
        match &caps[1] {
            "HADR_ROLE" => blocks.push(Block {
                role: Some(value),
                ..Block::default()
            }),
            key => {
                if let Some(block) = blocks.last_mut() {
                    match key {
                        "HADR_STATE" => block.state = Some(value),
                        "HADR_CONNECT_STATUS" => block.connect_status = Some(value),
                        "HADR_LOG_GAP(bytes)" => block.log_gap = Some(value),
                        _ => {}
                    }
                }
            }
        }
    }
    let mut pairs = Vec::new();
    for block in blocks {
        if let Some(pair) = block.into_pair(output)? {
            pairs.push(pair);
        }
    }
    Ok(pairs)
}

/// The pair most in need of attention
fn worst(pairs: Vec<Pair>) -> Option<Pair> {
    pairs.into_iter().max_by(|l, r| {
        (l.is_troubled(), l.log_gap_bytes)
            .partial_cmp(&(r.is_troubled(), r.log_gap_bytes))
            .unwrap_or(Ordering::Equal)
    })
}

pub fn to_measurement(database: &str, pairs: Vec<Pair>) -> Measurement {
    let entity = format!("HADR on {}", database);
    match worst(pairs) {
        None => Measurement::new(&entity, "log_gap", "MB", Reading::Absent),
        Some(pair) => {
            Measurement::new(&entity, "log_gap", "MB", Reading::Value(pair.log_gap_mb()))
                .with_detail(format!(
                    "log gap, {} in state {}",
                    pair.status.role, pair.status.state
                ))
                .with_category(Category::Hadr(pair.status))
        }
    }
}

pub fn measure(db2: &dyn Db2, database: &str) -> Measurement {
    let loaded = identifier(database).and_then(|database| {
        let output = db2.run(Program::Db2pd, &["-hadr", "-db", database.as_str()])?;
        parse(&output)
    });
    match loaded {
        Ok(pairs) => {
            debug!("hadr pairs: {:?}", pairs);
            to_measurement(&database.to_uppercase(), pairs)
        }
        Err(e) => Measurement::unavailable(
            &format!("HADR on {}", database),
            "log_gap",
            e.to_string(),
        ),
    }
}

#[cfg(test)]
mod test {
    use super::{measure, parse, Pair};
    use crate::category::{Category, HadrRole, HadrState, HadrStatus};
    use crate::db2::test::FakeDb2;
    use crate::evaluate::{evaluate, Overrides, Reading};
    use crate::threshold::ThresholdPolicy;
    use crate::Status;

    static PRIMARY: &str = "
Database Member 0 -- Database SAMPLE -- Active -- Up 0 days 00:23:17

                            HADR_ROLE = PRIMARY
                          REPLAY_TYPE = PHYSICAL
                        HADR_SYNCMODE = NEARSYNC
                           STANDBY_ID = 1
                        LOG_STREAM_ID = 0
                           HADR_STATE = PEER
                           HADR_FLAGS =
                  PRIMARY_MEMBER_HOST = db2a
                     PRIMARY_INSTANCE = db2inst1
                  HADR_CONNECT_STATUS = CONNECTED
             HADR_CONNECT_STATUS_TIME = 11/30/2012 10:01:52.520693 (1354287712)
                  HADR_LOG_GAP(bytes) = 2097152
";

    static INACTIVE: &str = "
Database SAMPLE not activated on database member 0 or this database name cannot be
found in the local database directory.
";

    static STANDBY_PENDING: &str = "
                            HADR_ROLE = STANDBY
                           HADR_STATE = REMOTE_CATCHUP_PENDING
                  HADR_CONNECT_STATUS = CONNECTED
                  HADR_LOG_GAP(bytes) = 0
";

    static MULTI: &str = "
                            HADR_ROLE = PRIMARY
                           STANDBY_ID = 1
                           HADR_STATE = PEER
                  HADR_CONNECT_STATUS = CONNECTED
                  HADR_LOG_GAP(bytes) = 0
                            HADR_ROLE = PRIMARY
                           STANDBY_ID = 2
                           HADR_STATE = REMOTE_CATCHUP
                  HADR_CONNECT_STATUS = DISCONNECTED
                  HADR_LOG_GAP(bytes) = 0
                            HADR_ROLE = PRIMARY
                           STANDBY_ID = 3
                           HADR_STATE = REMOTE_CATCHUP
                  HADR_CONNECT_STATUS = CONNECTED
                  HADR_LOG_GAP(bytes) = 104857600
";

    #[test]
    fn parses_primary() {
        assert_eq!(
            parse(PRIMARY).unwrap(),
            vec![Pair {
                status: HadrStatus {
                    role: HadrRole::Primary,
                    state: HadrState::Peer,
                },
                log_gap_bytes: 2_097_152,
            }]
        );
    }

    #[test]
    fn parses_catchup_pending_standby() {
        let pairs = parse(STANDBY_PENDING).unwrap();
        assert_eq!(pairs[0].status.role, HadrRole::Standby);
        assert_eq!(pairs[0].status.state, HadrState::RemoteCatchupPending);
    }

    #[test]
    fn disconnected_connect_status_wins() {
        let pairs = parse(MULTI).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[1].status.state, HadrState::Disconnected);
    }

    #[test]
    fn not_configured_is_empty() {
        assert!(parse("Database Member 0 -- Database SAMPLE -- Active\n").unwrap().is_empty());
        assert!(parse("HADR_ROLE = STANDARD\n").unwrap().is_empty());
    }

    #[test]
    fn inactive_database_is_absent() {
        assert!(parse(INACTIVE).unwrap().is_empty());

        let db2 = FakeDb2::new(vec![("-hadr", Ok(INACTIVE))]);
        let m = measure(&db2, "sample");
        assert_eq!(m.reading, Reading::Absent);

        let allowed = Overrides {
            absent_ok: true,
            ..Overrides::default()
        };
        let policy = ThresholdPolicy::bounded(64.0, 256.0, 1_048_576.0).unwrap();
        assert_eq!(evaluate(&m, &policy, &allowed).status, Status::Ok);
        assert_eq!(
            evaluate(&m, &policy, &Overrides::default()).status,
            Status::Critical
        );
    }

    #[test]
    fn measures_log_gap_in_mb() {
        let db2 = FakeDb2::new(vec![("-hadr", Ok(PRIMARY))]);
        let m = measure(&db2, "sample");
        assert_eq!(m.reading, Reading::Value(2.0));
        assert_eq!(db2.calls.borrow()[0], "db2pd -hadr -db SAMPLE");
    }

    #[test]
    fn measures_the_troubled_standby() {
        let db2 = FakeDb2::new(vec![("-hadr", Ok(MULTI))]);
        let m = measure(&db2, "sample");
        match m.category {
            Category::Hadr(ref status) => assert_eq!(status.state, HadrState::Disconnected),
            ref other => panic!("wrong category {:?}", other),
        }
    }

    #[test]
    fn missing_hadr_is_absent() {
        let db2 = FakeDb2::new(vec![("-hadr", Ok("HADR_ROLE = STANDARD\n"))]);
        assert_eq!(measure(&db2, "sample").reading, Reading::Absent);
    }
}
