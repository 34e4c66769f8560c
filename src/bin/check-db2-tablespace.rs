//! Check how full a DB2 tablespace is

use serde::Deserialize;
use structopt::StructOpt;

use tabin_db2_plugins::db2::tablespace;
use tabin_db2_plugins::plugin::{policy_or_exit, CommonArgs, Plugin};
use tabin_db2_plugins::{evaluate, Overrides, ThresholdPolicy};

/// Check how full a DB2 tablespace is.
///
/// Reads SYSIBMADM.TBSP_UTILIZATION. On partitioned databases the fullest
/// partition is reported.
#[derive(Deserialize, StructOpt, Debug)]
#[structopt(
    name = "check-db2-tablespace (part of tabin-db2-plugins)",
    raw(setting = "structopt::clap::AppSettings::ColoredHelp"),
    after_help = "Special cases:

    * Tablespaces with auto-resize enabled never go critical, since DB2 will
      grow them. They still warn, and the message reminds you to keep an eye
      on the filesystem.
    * SMS tablespaces holding temporary or 'any' content are always OK: they
      grow until their filesystem is full.
    * A tablespace that is not in the NORMAL state (e.g. BACKUP_PENDING) is at
      least a warning."
)]
struct Args {
    #[structopt(short = "d", long = "database", help = "The database to connect to")]
    database: String,
    #[structopt(short = "t", long = "tablespace", help = "The tablespace to check")]
    tablespace: String,
    #[structopt(
        short = "w",
        long = "warn",
        help = "Percent used to warn at",
        default_value = "80"
    )]
    warn: f64,
    #[structopt(
        short = "c",
        long = "crit",
        help = "Percent used to go critical at",
        default_value = "90"
    )]
    crit: f64,
    #[structopt(
        long = "allow-missing",
        help = "Exit OK if the tablespace does not exist, instead of critical"
    )]
    allow_missing: bool,
    #[structopt(flatten)]
    common: CommonArgs,
}

#[cfg_attr(test, allow(dead_code))]
fn main() {
    let args = Args::from_args();
    let policy = policy_or_exit(ThresholdPolicy::percent(args.warn, args.crit), &args.common);
    let overrides = Overrides {
        absent_ok: args.allow_missing,
        ..Overrides::default()
    };

    let plugin = Plugin::start("check-db2-tablespace", args.common);
    let measurement = tablespace::measure(&plugin.runner(), &args.database, &args.tablespace);
    plugin.finish(&evaluate(&measurement, &policy, &overrides));
}

#[cfg(test)]
mod test {
    use structopt::StructOpt;

    use super::Args;

    #[test]
    fn usage_is_valid() {
        let args = Args::from_iter(["arg0", "-d", "sample", "-t", "userspace1"].iter());
        assert_eq!(args.warn, 80.0);
        assert_eq!(args.crit, 90.0);
        assert!(!args.allow_missing);
        assert_eq!(args.common.lock_dir.to_str(), Some("/tmp"));

        let args = Args::from_iter(
            [
                "arg0",
                "--database",
                "sample",
                "--tablespace",
                "tempspace1",
                "-w",
                "70",
                "-c",
                "75",
                "--allow-missing",
                "--check-mk",
                "DB2 TEMPSPACE1",
            ]
            .iter(),
        );
        assert_eq!(args.crit, 75.0);
        assert!(args.allow_missing);
        assert_eq!(args.common.check_mk.unwrap(), "DB2 TEMPSPACE1");
    }
}
