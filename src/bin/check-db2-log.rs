//! Check DB2 transaction log usage

use serde::Deserialize;
use structopt::StructOpt;

use tabin_db2_plugins::db2::log;
use tabin_db2_plugins::plugin::{policy_or_exit, CommonArgs, Plugin};
use tabin_db2_plugins::{evaluate, Overrides, ThresholdPolicy};

/// Check how much of the active transaction log space is in use.
///
/// Reads SYSIBMADM.LOG_UTILIZATION. A full log stops all writes to the
/// database. With infinite logging the log cannot fill up, and this always
/// reports 0%.
#[derive(Deserialize, StructOpt, Debug)]
#[structopt(
    name = "check-db2-log (part of tabin-db2-plugins)",
    raw(setting = "structopt::clap::AppSettings::ColoredHelp")
)]
struct Args {
    #[structopt(short = "d", long = "database", help = "The database to connect to")]
    database: String,
    #[structopt(
        short = "w",
        long = "warn",
        help = "Percent of log space used to warn at",
        default_value = "80"
    )]
    warn: f64,
    #[structopt(
        short = "c",
        long = "crit",
        help = "Percent of log space used to go critical at",
        default_value = "90"
    )]
    crit: f64,
    #[structopt(flatten)]
    common: CommonArgs,
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    let policy = policy_or_exit(ThresholdPolicy::percent(args.warn, args.crit), &args.common);

    let plugin = Plugin::start("check-db2-log", args.common);
    let measurement = log::measure(&plugin.runner(), &args.database);
    plugin.finish(&evaluate(&measurement, &policy, &Overrides::default()));
}
