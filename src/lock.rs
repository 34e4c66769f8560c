//! Only one copy of a check per set of arguments
//!
//! Supervisors happily start a new check while the last one is still stuck
//! waiting on DB2. Ownership is an exclusive `flock` on `<key>.lock`, which
//! the kernel drops when the holder exits, so a file left behind by a dead
//! process is simply locked again. The pid inside is only for the message.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::os::unix::fs::MetadataExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use derive_more::From;
use nix::errno::Errno;
use nix::fcntl::{flock, FlockArg};
use nix::unistd::getpid;
use tracing::debug;

#[derive(Debug, From)]
pub enum LockError {
    Io(io::Error),
    /// Another live process holds the lock
    Held(Held),
}

#[derive(Debug, PartialEq)]
pub struct Held {
    /// `None` if the holder has not written its pid yet
    pub pid: Option<i32>,
    pub path: PathBuf,
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            LockError::Io(ref e) => write!(f, "unable to manage lock file: {}", e),
            LockError::Held(Held {
                pid: Some(pid),
                ref path,
            }) => write!(
                f,
                "another instance (pid {}) is still running, lock file {}",
                pid,
                path.display()
            ),
            LockError::Held(Held { pid: None, ref path }) => write!(
                f,
                "another instance is still running, lock file {}",
                path.display()
            ),
        }
    }
}

/// Turn a check name and its arguments into something safe to use as a file
/// name
pub fn lock_key<S: AsRef<str>>(name: &str, args: &[S]) -> String {
    let mut key = name.to_owned();
    for arg in args {
        key.push('_');
        key.push_str(arg.as_ref());
    }
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A held lock, released when dropped
#[derive(Debug)]
pub struct InstanceLock {
    path: PathBuf,
    // the flock lives as long as this descriptor
    file: File,
}

impl InstanceLock {
    pub fn acquire(dir: &Path, key: &str) -> Result<InstanceLock, LockError> {
        let path = dir.join(format!("{}.lock", key));
        loop {
            let mut file = OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .open(&path)?;
            match flock(file.as_raw_fd(), FlockArg::LockExclusiveNonblock) {
                Ok(()) => {}
                Err(e) if e == Errno::EWOULDBLOCK => {
                    let pid = holder(&mut file)?;
                    return Err(Held { pid, path }.into());
                }
                Err(e) => return Err(io::Error::from(e).into()),
            }
            // the previous owner may have unlinked the file between our open
            // and our flock, leaving us holding a lock nobody else can see
            if !same_file(&file, &path)? {
                debug!("lock {} was replaced, retrying", path.display());
                continue;
            }
            let lock = InstanceLock { path, file };
            // if this fails the lock is dropped, which removes the file again
            lock.write_pid()?;
            debug!("acquired lock {}", lock.path.display());
            return Ok(lock);
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_pid(&self) -> io::Result<()> {
        let mut file = &self.file;
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        writeln!(file, "{}", getpid())?;
        file.flush()
    }
}

impl Drop for InstanceLock {
    fn drop(&mut self) {
        // unlink while still holding the flock, the descriptor closes after
        if let Err(e) = fs::remove_file(&self.path) {
            debug!("unable to remove lock {}: {}", self.path.display(), e);
        }
    }
}

/// The pid recorded in the lock file, `None` if it is empty or unreadable
fn holder(file: &mut File) -> io::Result<Option<i32>> {
    let mut contents = String::new();
    file.read_to_string(&mut contents)?;
    Ok(contents.trim().parse().ok())
}

/// Whether `path` still names the file we have open
fn same_file(file: &File, path: &Path) -> io::Result<bool> {
    let open = file.metadata()?;
    match fs::metadata(path) {
        Ok(named) => Ok(open.dev() == named.dev() && open.ino() == named.ino()),
        Err(ref e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod test {
    use std::fs;
    use std::sync::{Arc, Barrier};
    use std::thread;

    use assert_matches::assert_matches;
    use nix::unistd::getpid;
    use tempfile::tempdir;

    use super::{lock_key, InstanceLock, LockError};

    #[test]
    fn keys_are_sanitized() {
        assert_eq!(
            lock_key("check-db2-tablespace", &["-d", "SAMPLE", "-t", "USER SPACE/1"]),
            "check-db2-tablespace_-d_SAMPLE_-t_USER_SPACE_1"
        );
    }

    #[test]
    fn second_acquire_is_refused() {
        let dir = tempdir().unwrap();
        let first = InstanceLock::acquire(dir.path(), "check").unwrap();
        let contents = fs::read_to_string(first.path()).unwrap();
        assert_eq!(contents.trim(), getpid().to_string());

        assert_matches!(
            InstanceLock::acquire(dir.path(), "check"),
            Err(LockError::Held(ref held)) if held.pid == Some(getpid().as_raw())
        );
        // refusing must not disturb the owner's file
        assert!(first.path().exists());
    }

    #[test]
    fn released_on_drop() {
        let dir = tempdir().unwrap();
        let path = {
            let lock = InstanceLock::acquire(dir.path(), "check").unwrap();
            lock.path().to_owned()
        };
        assert!(!path.exists());
        InstanceLock::acquire(dir.path(), "check").unwrap();
    }

    #[test]
    fn stale_locks_are_taken_over() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("check.lock");
        // pid_max on linux is at most 2^22
        fs::write(&path, "99999999\n").unwrap();
        let lock = InstanceLock::acquire(dir.path(), "check").unwrap();
        assert_eq!(
            fs::read_to_string(lock.path()).unwrap().trim(),
            getpid().to_string()
        );

        drop(lock);
        fs::write(&path, "garbage").unwrap();
        InstanceLock::acquire(dir.path(), "check").unwrap();
    }

    #[test]
    fn racing_for_a_stale_lock_has_one_winner() {
        const RACERS: usize = 4;
        let dir = tempdir().unwrap();
        for _ in 0..100 {
            fs::write(dir.path().join("check.lock"), "99999999\n").unwrap();
            let start = Arc::new(Barrier::new(RACERS));
            let done = Arc::new(Barrier::new(RACERS));
            let racers = (0..RACERS)
                .map(|_| {
                    let (start, done) = (start.clone(), done.clone());
                    let dir = dir.path().to_owned();
                    thread::spawn(move || {
                        start.wait();
                        let lock = InstanceLock::acquire(&dir, "check");
                        // everyone holds what they got until all have tried
                        done.wait();
                        lock.is_ok()
                    })
                })
                .collect::<Vec<_>>();
            let owners = racers
                .into_iter()
                .map(|racer| racer.join().unwrap())
                .filter(|owned| *owned)
                .count();
            assert_eq!(owners, 1);
        }
    }

    #[test]
    fn different_keys_do_not_conflict() {
        let dir = tempdir().unwrap();
        let _a = InstanceLock::acquire(dir.path(), "a").unwrap();
        let _b = InstanceLock::acquire(dir.path(), "b").unwrap();
    }
}
