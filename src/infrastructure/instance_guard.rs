use std::{
    fs::{self, File, OpenOptions},
    io::{ErrorKind, Seek, SeekFrom, Write},
    path::{Path, PathBuf},
    process, thread,
    time::{Duration, Instant},
};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use fs2::FileExt;
use serde::{Deserialize, Serialize};

const LOCK_FILENAME: &str = ".intake.lock";
const WAIT_INTERVAL: Duration = Duration::from_millis(500);
const MAX_WAIT: Duration = Duration::from_secs(20);

/// Exclusive claim on a data directory so only one worker moves files
/// through its inbox.
#[derive(Debug)]
pub struct InstanceGuard {
    file: File,
    path: PathBuf,
}

impl InstanceGuard {
    pub fn acquire(data_dir: &Path) -> Result<Self> {
        Self::acquire_within(data_dir, MAX_WAIT)
    }

    fn acquire_within(data_dir: &Path, max_wait: Duration) -> Result<Self> {
        let lock_path = data_dir.join(LOCK_FILENAME);
        fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to ensure data dir {}", data_dir.display()))?;

        let start = Instant::now();
        loop {
            let mut file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .truncate(false)
                .open(&lock_path)
                .with_context(|| format!("failed to open lock file {}", lock_path.display()))?;

            match file.try_lock_exclusive() {
                Ok(()) => {
                    write_lock_info(&mut file, process::id())?;
                    tracing::info!(
                        target: "lifecycle",
                        pid = process::id(),
                        path = %lock_path.display(),
                        "acquired intake lock"
                    );
                    return Ok(Self {
                        file,
                        path: lock_path,
                    });
                }
                Err(err) if err.kind() == ErrorKind::WouldBlock => {
                    if let Some(info) = read_lock_info(&lock_path)? {
                        tracing::debug!(
                            target: "lifecycle",
                            holder = info.pid,
                            started_at = info.started_at,
                            "intake lock held by another worker; waiting"
                        );
                    }
                }
                Err(err) => return Err(err.into()),
            }

            if start.elapsed() >= max_wait {
                let holder = read_lock_info(&lock_path)?
                    .map(|info| info.pid.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                return Err(anyhow!(
                    "another intake worker (pid {}) owns {}; waited {:?}",
                    holder,
                    data_dir.display(),
                    max_wait
                ));
            }

            drop(file);
            thread::sleep(WAIT_INTERVAL);
        }
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != ErrorKind::NotFound {
                tracing::warn!(
                    target: "lifecycle",
                    path = %self.path.display(),
                    error = %err,
                    "failed to remove lock file on shutdown"
                );
            }
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LockInfo {
    pid: u32,
    started_at: i64,
}

fn write_lock_info(file: &mut File, pid: u32) -> Result<()> {
    let info = LockInfo {
        pid,
        started_at: Utc::now().timestamp_millis(),
    };
    let payload = serde_json::to_vec(&info)?;
    file.set_len(0)?;
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&payload)?;
    file.sync_all()?;
    Ok(())
}

fn read_lock_info(lock_path: &Path) -> Result<Option<LockInfo>> {
    match fs::read_to_string(lock_path) {
        Ok(contents) if contents.trim().is_empty() => Ok(None),
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(info) => Ok(Some(info)),
            Err(err) => {
                tracing::warn!(
                    target: "lifecycle",
                    path = %lock_path.display(),
                    error = %err,
                    "failed to parse lock file metadata"
                );
                Ok(None)
            }
        },
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}
