//! Tablespace utilization from `SYSIBMADM.TBSP_UTILIZATION`

use std::cmp::Ordering;

use tracing::debug;

use super::{identifier, nullable, Db2, ParseError, Result};
use crate::category::{Category, TablespaceState};
use crate::evaluate::{Measurement, Reading};
use crate::units::{kb_to_human_size, percent};

const COLUMNS: &str = "TBSP_NAME, TBSP_TYPE, TBSP_CONTENT_TYPE, TBSP_STATE, \
                       TBSP_AUTO_RESIZE_ENABLED, TBSP_UTILIZATION_PERCENT, \
                       TBSP_USED_SIZE_KB, TBSP_TOTAL_SIZE_KB";

/// One row of the utilization view
///
/// Partitioned databases return one row per partition.
#[derive(Debug, PartialEq, Clone)]
pub struct Utilization {
    pub name: String,
    pub state: TablespaceState,
    pub percent_used: f64,
    pub used_kb: u64,
    pub total_kb: u64,
}

pub fn query_for(name: &str) -> Result<String> {
    Ok(format!(
        "SELECT {} FROM SYSIBMADM.TBSP_UTILIZATION WHERE TBSP_NAME = '{}'",
        COLUMNS,
        identifier(name)?
    ))
}

/// Parse the `db2 -x` output of `query_for`
///
/// An empty vec means the tablespace does not exist.
pub fn parse(output: &str) -> Result<Vec<Utilization>> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("SQL0100W"))
        .map(parse_row)
        .collect()
}

fn parse_row(line: &str) -> Result<Utilization> {
    let err = |field| ParseError {
        field,
        output: line.to_owned(),
    };
    let cols = line.split_whitespace().collect::<Vec<_>>();
    if cols.len() != 8 {
        return Err(err("8 columns").into());
    }
    let kind = cols[1].parse().map_err(|_| err("TBSP_TYPE"))?;
    let content = cols[2].parse().map_err(|_| err("TBSP_CONTENT_TYPE"))?;
    let auto_resize = nullable::<u8>(cols[4]).unwrap_or(0) == 1;
    let used_kb = nullable(cols[6]).ok_or_else(|| err("TBSP_USED_SIZE_KB"))?;
    let total_kb = nullable(cols[7]).ok_or_else(|| err("TBSP_TOTAL_SIZE_KB"))?;
    // SMS tablespaces have no utilization percent
    let percent_used = nullable(cols[5]).unwrap_or_else(|| percent(used_kb, total_kb));
    Ok(Utilization {
        name: cols[0].to_owned(),
        state: TablespaceState {
            kind,
            content,
            state: cols[3].to_owned(),
            auto_resize,
        },
        percent_used,
        used_kb,
        total_kb,
    })
}

/// The partition closest to full
fn fullest(rows: Vec<Utilization>) -> Option<Utilization> {
    rows.into_iter().max_by(|l, r| {
        l.percent_used
            .partial_cmp(&r.percent_used)
            .unwrap_or(Ordering::Equal)
    })
}

pub fn to_measurement(name: &str, rows: Vec<Utilization>) -> Measurement {
    let entity = format!("tablespace {}", name);
    match fullest(rows) {
        None => Measurement::new(&entity, name, "%", Reading::Absent),
        Some(row) => Measurement::new(&entity, name, "%", Reading::Value(row.percent_used))
            .with_detail(format!(
                "{} of {} used",
                kb_to_human_size(row.used_kb),
                kb_to_human_size(row.total_kb)
            ))
            .with_category(Category::Tablespace(row.state)),
    }
}

fn load(db2: &dyn Db2, database: &str, name: &str) -> Result<Vec<Utilization>> {
    let sql = query_for(name)?;
    let rows = db2.connect(database).and_then(|()| db2.query(&sql));
    db2.terminate();
    parse(&rows?)
}

pub fn measure(db2: &dyn Db2, database: &str, name: &str) -> Measurement {
    let name = name.to_uppercase();
    match load(db2, database, &name) {
        Ok(rows) => {
            debug!("tablespace rows: {:?}", rows);
            to_measurement(&name, rows)
        }
        Err(e) => Measurement::unavailable(&format!("tablespace {}", name), &name, e.to_string()),
    }
}

#[cfg(test)]
mod test {
    use super::{measure, parse, query_for, Utilization};
    use crate::category::{Category, ContentType, TablespaceKind, TablespaceState};
    use crate::db2::test::FakeDb2;
    use crate::evaluate::Reading;

    #[test]
    fn parses_dms_row() {
        let rows = parse(
            "USERSPACE1         DMS   LARGE   NORMAL   1   42.17   1727   4096\n",
        )
        .unwrap();
        assert_eq!(
            rows,
            vec![Utilization {
                name: "USERSPACE1".to_owned(),
                state: TablespaceState {
                    kind: TablespaceKind::Dms,
                    content: ContentType::Large,
                    state: "NORMAL".to_owned(),
                    auto_resize: true,
                },
                percent_used: 42.17,
                used_kb: 1727,
                total_kb: 4096,
            }]
        );
    }

    #[test]
    fn sms_rows_compute_their_percent() {
        let rows = parse("TEMPSPACE1   SMS   SYSTEMP   NORMAL   -   -   4   16\n").unwrap();
        assert_eq!(rows[0].percent_used, 25.0);
        assert!(!rows[0].state.auto_resize);
        assert_eq!(rows[0].state.kind, TablespaceKind::Sms);
    }

    #[test]
    fn no_rows_is_empty() {
        assert!(parse("").unwrap().is_empty());
        let no_rows = "\nSQL0100W  No row was found for FETCH, UPDATE or DELETE; or the result \
                       of a query is an empty table.  SQLSTATE=02000\n";
        assert!(parse(no_rows).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse("USERSPACE1 DMS").is_err());
        assert!(parse("USERSPACE1 XMS LARGE NORMAL 1 4 1 4").is_err());
    }

    #[test]
    fn query_rejects_bad_names() {
        assert!(query_for("USER'SPACE").is_err());
        assert!(query_for("userspace1").unwrap().ends_with("TBSP_NAME = 'USERSPACE1'"));
    }

    #[test]
    fn measures_the_fullest_partition() {
        let db2 = FakeDb2::new(vec![(
            "-x",
            Ok("USERSPACE1 DMS LARGE NORMAL 0 40.0 40 100\n\
                USERSPACE1 DMS LARGE NORMAL 0 90.0 90 100\n\
                USERSPACE1 DMS LARGE NORMAL 0 60.0 60 100\n"),
        )]);
        let m = measure(&db2, "sample", "userspace1");
        assert_eq!(m.reading, Reading::Value(90.0));
        assert_eq!(m.entity, "tablespace USERSPACE1");
        match m.category {
            Category::Tablespace(ref state) => assert_eq!(state.state, "NORMAL"),
            ref other => panic!("wrong category {:?}", other),
        }
        let calls = db2.calls.borrow();
        assert_eq!(calls[0], "db2 connect to SAMPLE");
        assert_eq!(calls.last().unwrap(), "db2 terminate");
    }

    #[test]
    fn failed_connect_still_terminates() {
        let db2 = FakeDb2::new(vec![(
            "connect",
            Err("SQL1032N  No start database manager command was issued."),
        )]);
        match measure(&db2, "sample", "userspace1").reading {
            Reading::Unavailable(ref message) => assert!(message.contains("SQL1032N")),
            ref other => panic!("expected unavailable, got {:?}", other),
        }
        let calls = db2.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1], "db2 terminate");
    }

    #[test]
    fn missing_tablespace_is_absent() {
        let db2 = FakeDb2::new(vec![("-x", Ok(""))]);
        assert_eq!(measure(&db2, "sample", "GONE").reading, Reading::Absent);
    }

    #[test]
    fn connection_failure_is_unavailable() {
        let db2 = FakeDb2::new(vec![(
            "connect",
            Err("SQL1032N  No start database manager command was issued.  SQLSTATE=57019"),
        )]);
        match measure(&db2, "sample", "USERSPACE1").reading {
            Reading::Unavailable(reason) => assert!(reason.contains("SQL1032N"), "{}", reason),
            other => panic!("expected unavailable, got {:?}", other),
        }
    }
}
