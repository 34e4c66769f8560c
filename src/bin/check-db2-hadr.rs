//! Check DB2 HADR replication

use serde::Deserialize;
use structopt::StructOpt;

use tabin_db2_plugins::db2::hadr;
use tabin_db2_plugins::plugin::{policy_or_exit, CommonArgs, Plugin};
use tabin_db2_plugins::{evaluate, Overrides, ThresholdPolicy};

/// Largest log gap we accept a threshold for: one TiB
const MAX_GAP_MB: f64 = 1024.0 * 1024.0;

/// Check DB2 HADR replication state and log gap.
///
/// Runs `db2pd -hadr` on either the primary or the standby.
#[derive(Deserialize, StructOpt, Debug)]
#[structopt(
    name = "check-db2-hadr (part of tabin-db2-plugins)",
    raw(setting = "structopt::clap::AppSettings::ColoredHelp"),
    after_help = "States:

    Regardless of the log gap:

    * a primary whose standby is disconnected is critical
    * a standby that is disconnected is critical
    * a standby in REMOTE_CATCHUP_PENDING is a warning

    Otherwise the log gap between primary and standby, in MB, is compared to
    --warn and --crit. With several standbys the one in the worst shape is
    reported."
)]
struct Args {
    #[structopt(short = "d", long = "database", help = "The HADR database")]
    database: String,
    #[structopt(
        short = "w",
        long = "warn",
        help = "Log gap in MB to warn at",
        default_value = "64"
    )]
    warn: f64,
    #[structopt(
        short = "c",
        long = "crit",
        help = "Log gap in MB to go critical at",
        default_value = "256"
    )]
    crit: f64,
    #[structopt(
        long = "allow-standard",
        help = "Exit OK if the database is not configured for HADR, instead of critical"
    )]
    allow_standard: bool,
    #[structopt(flatten)]
    common: CommonArgs,
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    let policy = policy_or_exit(
        ThresholdPolicy::bounded(args.warn, args.crit, MAX_GAP_MB),
        &args.common,
    );
    let overrides = Overrides {
        absent_ok: args.allow_standard,
        ..Overrides::default()
    };

    let plugin = Plugin::start("check-db2-hadr", args.common);
    let measurement = hadr::measure(&plugin.runner(), &args.database);
    plugin.finish(&evaluate(&measurement, &policy, &overrides));
}
