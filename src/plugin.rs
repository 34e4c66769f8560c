//! The parts every check binary shares: common flags, the trace file, the
//! instance lock, and printing the final report

use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use structopt::StructOpt;
use tracing::debug;

use crate::db2::CommandRunner;
use crate::lock::{lock_key, InstanceLock};
use crate::report::Report;
use crate::threshold::{ConfigurationError, ThresholdPolicy};
use crate::trace;
use crate::Status;

/// Flags accepted by every check
#[derive(StructOpt, Deserialize, Debug)]
pub struct CommonArgs {
    #[structopt(
        short = "i",
        long = "instance-home",
        parse(from_os_str),
        help = "Home directory of the DB2 instance owner. Binaries are run from \
                <DIR>/sqllib/bin. Default: search PATH"
    )]
    pub instance_home: Option<PathBuf>,
    #[structopt(
        long = "check-mk",
        name = "SERVICE",
        help = "Print a single Check_MK local check line for <SERVICE> instead of \
                nagios output"
    )]
    pub check_mk: Option<String>,
    #[structopt(
        long = "trace",
        name = "FILE",
        parse(from_os_str),
        help = "Append a debug trace of commands run and values parsed to <FILE>"
    )]
    pub trace: Option<PathBuf>,
    #[structopt(
        long = "lock-dir",
        default_value = "/tmp",
        parse(from_os_str),
        help = "Where to keep the lock file that stops two identical checks \
                running at once"
    )]
    pub lock_dir: PathBuf,
}

/// Format `report` the way the supervisor asked for
pub fn render(report: &Report, check_mk: Option<&str>) -> String {
    match check_mk {
        Some(service) => report.render_check_mk(service),
        None => report.render(),
    }
}

/// Print `report` and exit with its status
pub fn emit(report: &Report, args: &CommonArgs) -> ! {
    println!("{}", render(report, args.check_mk.as_deref()));
    report.status.exit()
}

/// Unwrap a policy or exit UNKNOWN
///
/// Called before anything touches DB2.
pub fn policy_or_exit(
    policy: Result<ThresholdPolicy, ConfigurationError>,
    args: &CommonArgs,
) -> ThresholdPolicy {
    policy.unwrap_or_else(|e| {
        emit(
            &Report::new(Status::Unknown, format!("invalid thresholds: {}", e)),
            args,
        )
    })
}

/// A running check: tracing is set up and the instance lock is held
pub struct Plugin {
    name: &'static str,
    args: CommonArgs,
    lock: Option<InstanceLock>,
}

impl Plugin {
    /// Set up tracing and take the lock for this exact command line
    ///
    /// Exits UNKNOWN if either fails, or if another copy of this check with
    /// the same arguments is still running.
    pub fn start(name: &'static str, args: CommonArgs) -> Plugin {
        if let Some(ref path) = args.trace {
            if let Err(e) = trace::init(path) {
                emit(&Report::new(Status::Unknown, e), &args);
            }
        }
        let argv = env::args().skip(1).collect::<Vec<_>>();
        let key = lock_key(name, &argv);
        let lock = match InstanceLock::acquire(&args.lock_dir, &key) {
            Ok(lock) => lock,
            Err(e) => emit(&Report::new(Status::Unknown, e.to_string()), &args),
        };
        debug!("{} started with {:?}", name, argv);
        Plugin {
            name,
            args,
            lock: Some(lock),
        }
    }

    pub fn runner(&self) -> CommandRunner {
        CommandRunner::for_instance_home(self.args.instance_home.clone())
    }

    /// Print the report, release the lock, and exit
    pub fn finish(mut self, report: &Report) -> ! {
        debug!("{} finished: {:?}", self.name, report);
        // process::exit skips destructors
        drop(self.lock.take());
        emit(report, &self.args)
    }
}
