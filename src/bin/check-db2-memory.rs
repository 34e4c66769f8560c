//! Check DB2 instance memory usage

use serde::Deserialize;
use structopt::StructOpt;

use tabin_db2_plugins::db2::memory;
use tabin_db2_plugins::plugin::{policy_or_exit, CommonArgs, Plugin};
use tabin_db2_plugins::{evaluate, Overrides, ThresholdPolicy};

/// Check the memory used by a DB2 instance against its instance memory limit.
///
/// Runs `db2pd -dbptnmem`.
#[derive(Deserialize, StructOpt, Debug)]
#[structopt(
    name = "check-db2-memory (part of tabin-db2-plugins)",
    raw(setting = "structopt::clap::AppSettings::ColoredHelp")
)]
struct Args {
    #[structopt(
        short = "w",
        long = "warn",
        help = "Percent of the memory limit to warn at",
        default_value = "80"
    )]
    warn: f64,
    #[structopt(
        short = "c",
        long = "crit",
        help = "Percent of the memory limit to go critical at",
        default_value = "90"
    )]
    crit: f64,
    #[structopt(
        long = "ignore-thresholds",
        help = "Always exit OK, only report usage. Useful with \
                INSTANCE_MEMORY=AUTOMATIC, where DB2 manages the limit itself"
    )]
    ignore_thresholds: bool,
    #[structopt(flatten)]
    common: CommonArgs,
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    let policy = policy_or_exit(ThresholdPolicy::percent(args.warn, args.crit), &args.common);
    let overrides = Overrides {
        ignore_thresholds: args.ignore_thresholds,
        ..Overrides::default()
    };

    let plugin = Plugin::start("check-db2-memory", args.common);
    let measurement = memory::measure(&plugin.runner());
    plugin.finish(&evaluate(&measurement, &policy, &overrides));
}
