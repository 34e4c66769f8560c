//! Regenerate `src/scripts.rs` from the `--help` of every check
//!
//! Run from the repository root after `cargo build`:
//!
//! ```plain
//! $ cargo run -p make-docs > src/scripts.rs
//! ```

use std::env;
use std::process::{self, Command};

struct Check {
    name: &'static str,
    about: &'static str,
}

static CHECKS: &[Check] = &[
    Check {
        name: "check-db2-tablespace",
        about: "Needs a DB2 client that can connect to the database.",
    },
    Check {
        name: "check-db2-hadr",
        about: "Runs `db2pd`, so it must run on the database server as the instance owner.",
    },
    Check {
        name: "check-db2-memory",
        about: "Runs `db2pd`, so it must run on the database server as the instance owner.",
    },
    Check {
        name: "check-db2-log",
        about: "Needs a DB2 client that can connect to the database.",
    },
];

fn main() {
    let bin_dir = env::args().nth(1).unwrap_or_else(|| "target/debug".to_owned());
    match render(&bin_dir) {
        Ok(out) => print!("{}", out),
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    }
}

fn render(bin_dir: &str) -> Result<String, String> {
    let preamble = "Documentation about the various scripts contained herein\n";

    let mut out: String = cp(preamble.split('\n'));
    out.push('\n');
    out.push_str(&cp(CHECKS.iter().map(|c| format!("- [{0}](#{0})", c.name))));
    out.push('\n');
    for check in CHECKS {
        out.push_str(&format!(
            "\
//!
//! # {0}
//!
//! {1}
//!
//! ```plain
//! $ {0} --help
",
            check.name, check.about
        ));
        let path = format!("{}/{}", bin_dir, check.name);
        let output = Command::new(&path)
            .arg("--help")
            .output()
            .map_err(|e| format!("Couldn't execute command {}: {}", path, e))?;
        let help = String::from_utf8(output.stdout)
            .map_err(|_| format!("Couldn't convert command {} help to utf8", check.name))?;
        out.push_str(&cp(help.split('\n')));
        out.push_str("\n//! ```\n");
    }
    out.push('\n');
    Ok(out)
}

/// Comment each line in the iterator
fn cp<S: AsRef<str>, I: Iterator<Item = S>>(s: I) -> String {
    s.map(|s| format!("//! {}", s.as_ref()))
        .map(|s| s.trim().into())
        .collect::<Vec<String>>()
        .join("\n")
}
