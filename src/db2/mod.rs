//! Talking to DB2
//!
//! Everything goes through the `db2` command line processor or `db2pd`,
//! whose text output gets scraped by the submodules. Each submodule has a
//! `parse` function that works on text (and is what the tests exercise) and
//! a `measure` function that runs the commands and never fails: anything
//! that goes wrong becomes an unavailable `Measurement`.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process::Command;
use std::result::Result as StdResult;

use derive_more::From;
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

pub mod hadr;
pub mod log;
pub mod memory;
pub mod tablespace;

lazy_static! {
    static ref SQL_MESSAGE: Regex = Regex::new(r"(?m)^(SQL\d{4,5}[NWC])\s+(.*)$").unwrap();
    static ref IDENTIFIER: Regex = Regex::new(r"^[A-Za-z0-9_#@$]{1,128}$").unwrap();
}

/// Every error from this module can be converted into a `Db2Error`
#[derive(Debug, From)]
pub enum Db2Error {
    /// The command could not be started at all
    Io(io::Error),
    /// The command ran but reported an error
    CommandFailed(CommandFailed),
    /// The command succeeded but we could not understand its output
    Parse(ParseError),
    /// A database or tablespace name that we refuse to put into SQL
    InvalidName(InvalidName),
}

impl fmt::Display for Db2Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::Db2Error::*;
        match *self {
            Io(ref e) => write!(f, "{}", e),
            CommandFailed(ref e) => write!(f, "{}", e),
            Parse(ref e) => write!(f, "{}", e),
            InvalidName(ref e) => write!(f, "{}", e),
        }
    }
}

#[derive(Debug)]
pub struct CommandFailed {
    pub command: String,
    pub code: Option<i32>,
    pub output: String,
}

impl CommandFailed {
    /// The first `SQLnnnnX` message in the output, if there is one
    pub fn sql_message(&self) -> Option<String> {
        SQL_MESSAGE
            .captures(&self.output)
            .map(|caps| format!("{} {}", &caps[1], caps[2].trim()))
    }
}

impl fmt::Display for CommandFailed {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let code = self
            .code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_owned());
        match self.sql_message() {
            Some(msg) => write!(f, "`{}` failed ({}): {}", self.command, code, msg),
            None => write!(
                f,
                "`{}` failed ({}): {}",
                self.command,
                code,
                self.output.trim()
            ),
        }
    }
}

#[derive(Debug, PartialEq)]
pub struct ParseError {
    pub field: &'static str,
    pub output: String,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "unable to find '{}' in output '{}'",
            self.field,
            self.output.trim()
        )
    }
}

#[derive(Debug, PartialEq)]
pub struct InvalidName(pub String);

impl fmt::Display for InvalidName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "'{}' is not a valid DB2 identifier", self.0)
    }
}

pub type Result<T> = StdResult<T, Db2Error>;

/// The DB2 binaries we shell out to
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Program {
    /// The command line processor
    Db2,
    /// The problem determination tool
    Db2pd,
}

impl Program {
    pub fn name(self) -> &'static str {
        match self {
            Program::Db2 => "db2",
            Program::Db2pd => "db2pd",
        }
    }
}

/// Something that can run DB2 commands
///
/// Implementations return stdout on success. Exit code 1 from the CLP means
/// "no rows", and 2 is a warning; both count as success.
pub trait Db2 {
    fn run(&self, program: Program, args: &[&str]) -> Result<String>;

    fn connect(&self, database: &str) -> Result<()> {
        let database = identifier(database)?;
        self.run(Program::Db2, &["connect", "to", database.as_str()])?;
        Ok(())
    }

    /// Run a query with `-x`, so only the data rows get printed
    fn query(&self, sql: &str) -> Result<String> {
        self.run(Program::Db2, &["-x", sql])
    }

    /// Best-effort: end the CLP back-end process
    fn terminate(&self) {
        if let Err(e) = self.run(Program::Db2, &["terminate"]) {
            debug!("db2 terminate failed: {}", e);
        }
    }
}

/// Runs the real binaries
#[derive(Debug, Clone, Default)]
pub struct CommandRunner {
    /// Directory that holds `db2` and `db2pd`, searched in `PATH` if unset
    bin_dir: Option<PathBuf>,
}

impl CommandRunner {
    pub fn new(bin_dir: Option<PathBuf>) -> CommandRunner {
        CommandRunner { bin_dir }
    }

    /// Binaries live in `<home>/sqllib/bin` for an instance owned by the
    /// user whose home is `home`
    pub fn for_instance_home(home: Option<PathBuf>) -> CommandRunner {
        CommandRunner::new(home.map(|h| h.join("sqllib").join("bin")))
    }

    fn program_path(&self, program: Program) -> PathBuf {
        match self.bin_dir {
            Some(ref dir) => dir.join(program.name()),
            None => PathBuf::from(program.name()),
        }
    }
}

impl Db2 for CommandRunner {
    fn run(&self, program: Program, args: &[&str]) -> Result<String> {
        let path = self.program_path(program);
        let command = format!("{} {}", path.display(), args.join(" "));
        debug!("running `{}`", command);
        let output = Command::new(&path).args(args).output()?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        debug!(code = ?output.status.code(), "output of `{}`:\n{}", command, stdout);
        match output.status.code() {
            Some(0) | Some(1) | Some(2) => Ok(stdout),
            code => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                Err(CommandFailed {
                    command,
                    code,
                    output: format!("{}{}", stdout, stderr),
                }
                .into())
            }
        }
    }
}

/// Uppercase and validate a name before it goes anywhere near SQL
pub fn identifier(name: &str) -> Result<String> {
    if IDENTIFIER.is_match(name) {
        Ok(name.to_uppercase())
    } else {
        Err(InvalidName(name.to_owned()).into())
    }
}

/// A column from `db2 -x` output, where `-` means NULL
fn nullable<T: std::str::FromStr>(column: &str) -> Option<T> {
    if column == "-" {
        None
    } else {
        column.parse().ok()
    }
}

#[cfg(test)]
pub(crate) mod test {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use super::{identifier, CommandFailed, Db2, Db2Error, Program, Result};

    /// Canned outputs, keyed by the first argument
    pub(crate) struct FakeDb2 {
        pub outputs: HashMap<&'static str, StdResult>,
        pub calls: RefCell<Vec<String>>,
    }

    pub(crate) type StdResult = std::result::Result<&'static str, &'static str>;

    impl FakeDb2 {
        pub(crate) fn new(outputs: Vec<(&'static str, StdResult)>) -> FakeDb2 {
            FakeDb2 {
                outputs: outputs.into_iter().collect(),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl Db2 for FakeDb2 {
        fn run(&self, program: Program, args: &[&str]) -> Result<String> {
            let command = format!("{} {}", program.name(), args.join(" "));
            self.calls.borrow_mut().push(command.clone());
            let key = if args[0] == "-x" { "-x" } else { args[0] };
            match self.outputs.get(key) {
                Some(Ok(out)) => Ok((*out).to_owned()),
                Some(Err(out)) => Err(CommandFailed {
                    command,
                    code: Some(4),
                    output: (*out).to_owned(),
                }
                .into()),
                None => Ok(String::new()),
            }
        }
    }

    #[test]
    fn sql_message_is_extracted() {
        let err = CommandFailed {
            command: "db2 connect to NOPE".to_owned(),
            code: Some(4),
            output: "\nSQL1013N  The database alias name or database name \"NOPE\" could not \
                     be found.  SQLSTATE=42705\n"
                .to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "`db2 connect to NOPE` failed (4): SQL1013N The database alias name or \
             database name \"NOPE\" could not be found.  SQLSTATE=42705"
        );
    }

    #[test]
    fn identifiers_are_validated() {
        assert_eq!(identifier("userspace1").unwrap(), "USERSPACE1");
        match identifier("x'; drop table t; --") {
            Err(Db2Error::InvalidName(_)) => {}
            other => panic!("expected invalid name, got {:?}", other),
        }
    }

    #[test]
    fn connect_uses_the_validated_name() {
        let db2 = FakeDb2::new(vec![]);
        db2.connect("sample").unwrap();
        assert_eq!(*db2.calls.borrow(), vec!["db2 connect to SAMPLE".to_owned()]);
    }
}
