//! Documentation about the various scripts contained herein
//!
//! - [check-db2-tablespace](#check-db2-tablespace)
//! - [check-db2-hadr](#check-db2-hadr)
//! - [check-db2-memory](#check-db2-memory)
//! - [check-db2-log](#check-db2-log)
//!
//! # check-db2-tablespace
//!
//! Needs a DB2 client that can connect to the database.
//!
//! ```plain
//! $ check-db2-tablespace --help
//! check-db2-tablespace (part of tabin-db2-plugins) 0.1.0
//! Brandon W Maister <quodlibetor@gmail.com>
//! Check how full a DB2 tablespace is.
//!
//! Reads SYSIBMADM.TBSP_UTILIZATION. On partitioned databases the fullest partition is reported.
//!
//! USAGE:
//!     check-db2-tablespace [FLAGS] [OPTIONS] --database <database> --tablespace <tablespace>
//!
//! FLAGS:
//!         --allow-missing    Exit OK if the tablespace does not exist, instead of critical
//!     -h, --help             Prints help information
//!     -V, --version          Prints version information
//!
//! OPTIONS:
//!         --check-mk <SERVICE>           Print a single Check_MK local check line for <SERVICE> instead of nagios
//!                                        output
//!     -c, --crit <crit>                  Percent used to go critical at [default: 90]
//!     -d, --database <database>          The database to connect to
//!     -i, --instance-home <instance_home>
//!             Home directory of the DB2 instance owner. Binaries are run from <DIR>/sqllib/bin. Default: search PATH
//!
//!         --lock-dir <lock_dir>
//!             Where to keep the lock file that stops two identical checks running at once [default: /tmp]
//!
//!     -t, --tablespace <tablespace>      The tablespace to check
//!         --trace <FILE>                 Append a debug trace of commands run and values parsed to <FILE>
//!     -w, --warn <warn>                  Percent used to warn at [default: 80]
//!
//! Special cases:
//!
//!     * Tablespaces with auto-resize enabled never go critical, since DB2 will
//!       grow them. They still warn, and the message reminds you to keep an eye
//!       on the filesystem.
//!     * SMS tablespaces holding temporary or 'any' content are always OK: they
//!       grow until their filesystem is full.
//!     * A tablespace that is not in the NORMAL state (e.g. BACKUP_PENDING) is at
//!       least a warning.
//! ```
//!
//! # check-db2-hadr
//!
//! Runs `db2pd`, so it must run on the database server as the instance owner.
//!
//! ```plain
//! $ check-db2-hadr --help
//! check-db2-hadr (part of tabin-db2-plugins) 0.1.0
//! Brandon W Maister <quodlibetor@gmail.com>
//! Check DB2 HADR replication state and log gap.
//!
//! Runs `db2pd -hadr` on either the primary or the standby.
//!
//! USAGE:
//!     check-db2-hadr [FLAGS] [OPTIONS] --database <database>
//!
//! FLAGS:
//!         --allow-standard    Exit OK if the database is not configured for HADR, instead of critical
//!     -h, --help              Prints help information
//!     -V, --version           Prints version information
//!
//! OPTIONS:
//!         --check-mk <SERVICE>           Print a single Check_MK local check line for <SERVICE> instead of nagios
//!                                        output
//!     -c, --crit <crit>                  Log gap in MB to go critical at [default: 256]
//!     -d, --database <database>          The HADR database
//!     -i, --instance-home <instance_home>
//!             Home directory of the DB2 instance owner. Binaries are run from <DIR>/sqllib/bin. Default: search PATH
//!
//!         --lock-dir <lock_dir>
//!             Where to keep the lock file that stops two identical checks running at once [default: /tmp]
//!
//!         --trace <FILE>                 Append a debug trace of commands run and values parsed to <FILE>
//!     -w, --warn <warn>                  Log gap in MB to warn at [default: 64]
//!
//! States:
//!
//!     Regardless of the log gap:
//!
//!     * a primary whose standby is disconnected is critical
//!     * a standby that is disconnected is critical
//!     * a standby in REMOTE_CATCHUP_PENDING is a warning
//!
//!     Otherwise the log gap between primary and standby, in MB, is compared to
//!     --warn and --crit. With several standbys the one in the worst shape is
//!     reported.
//! ```
//!
//! # check-db2-memory
//!
//! Runs `db2pd`, so it must run on the database server as the instance owner.
//!
//! ```plain
//! $ check-db2-memory --help
//! check-db2-memory (part of tabin-db2-plugins) 0.1.0
//! Brandon W Maister <quodlibetor@gmail.com>
//! Check the memory used by a DB2 instance against its instance memory limit.
//!
//! Runs `db2pd -dbptnmem`.
//!
//! USAGE:
//!     check-db2-memory [FLAGS] [OPTIONS]
//!
//! FLAGS:
//!     -h, --help                 Prints help information
//!         --ignore-thresholds    Always exit OK, only report usage. Useful with INSTANCE_MEMORY=AUTOMATIC, where DB2
//!                                manages the limit itself
//!     -V, --version              Prints version information
//!
//! OPTIONS:
//!         --check-mk <SERVICE>           Print a single Check_MK local check line for <SERVICE> instead of nagios
//!                                        output
//!     -c, --crit <crit>                  Percent of the memory limit to go critical at [default: 90]
//!     -i, --instance-home <instance_home>
//!             Home directory of the DB2 instance owner. Binaries are run from <DIR>/sqllib/bin. Default: search PATH
//!
//!         --lock-dir <lock_dir>
//!             Where to keep the lock file that stops two identical checks running at once [default: /tmp]
//!
//!         --trace <FILE>                 Append a debug trace of commands run and values parsed to <FILE>
//!     -w, --warn <warn>                  Percent of the memory limit to warn at [default: 80]
//! ```
//!
//! # check-db2-log
//!
//! Needs a DB2 client that can connect to the database.
//!
//! ```plain
//! $ check-db2-log --help
//! check-db2-log (part of tabin-db2-plugins) 0.1.0
//! Brandon W Maister <quodlibetor@gmail.com>
//! Check how much of the active transaction log space is in use.
//!
//! Reads SYSIBMADM.LOG_UTILIZATION. A full log stops all writes to the database. With infinite logging the log cannot
//! fill up, and this always reports 0%.
//!
//! USAGE:
//!     check-db2-log [OPTIONS] --database <database>
//!
//! FLAGS:
//!     -h, --help       Prints help information
//!     -V, --version    Prints version information
//!
//! OPTIONS:
//!         --check-mk <SERVICE>           Print a single Check_MK local check line for <SERVICE> instead of nagios
//!                                        output
//!     -c, --crit <crit>                  Percent of log space used to go critical at [default: 90]
//!     -d, --database <database>          The database to connect to
//!     -i, --instance-home <instance_home>
//!             Home directory of the DB2 instance owner. Binaries are run from <DIR>/sqllib/bin. Default: search PATH
//!
//!         --lock-dir <lock_dir>
//!             Where to keep the lock file that stops two identical checks running at once [default: /tmp]
//!
//!         --trace <FILE>                 Append a debug trace of commands run and values parsed to <FILE>
//!     -w, --warn <warn>                  Percent of log space used to warn at [default: 80]
//! ```
