use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::{Context, Result};
use chrono::Utc;
use tokio::{fs, task::JoinHandle, time::sleep};

use crate::{
    domain::{FileKind, SubmissionFile, SubmissionJob},
    infrastructure::{directories::ResolvedPaths, shutdown::ShutdownListener},
    tasks::queue::{Priority, SubmissionQueue},
};

/// Watches the inbox and turns each top-level entry into a submission.
///
/// Entries whose name starts with `.` are ignored, so uploaders can write
/// under a hidden name and rename once the copy is complete.
pub struct InboxScanner {
    inbox_dir: PathBuf,
    processing_dir: PathBuf,
    queue: Arc<SubmissionQueue<SubmissionJob>>,
    poll_interval: Duration,
}

impl InboxScanner {
    pub fn new(
        paths: &ResolvedPaths,
        queue: Arc<SubmissionQueue<SubmissionJob>>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            inbox_dir: paths.inbox_dir.clone(),
            processing_dir: paths.processing_dir.clone(),
            queue,
            poll_interval,
        }
    }

    pub fn spawn(self: Arc<Self>, mut shutdown: ShutdownListener) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                if shutdown.is_triggered() {
                    break;
                }
                if let Err(err) = self.scan_once().await {
                    tracing::error!(target: "inbox", error = %err, "inbox scan failed");
                }
                tokio::select! {
                    _ = sleep(self.poll_interval) => {}
                    _ = shutdown.notified() => break,
                }
            }
            tracing::info!(target: "inbox", "inbox scanner stopped");
        })
    }

    /// Moves submissions left in `processing/` by an interrupted run back to the inbox.
    pub async fn recover_interrupted(&self) -> Result<usize> {
        let mut recovered = 0;
        for (name, path) in visible_entries(&self.processing_dir).await? {
            let target = unique_path(&self.inbox_dir, &name).await;
            fs::rename(&path, &target)
                .await
                .with_context(|| format!("failed to return {} to the inbox", path.display()))?;
            recovered += 1;
        }
        if recovered > 0 {
            tracing::warn!(target: "inbox", recovered, "requeued interrupted submissions");
        }
        Ok(recovered)
    }

    pub async fn scan_once(&self) -> Result<usize> {
        let mut claimed = 0;
        for (name, path) in visible_entries(&self.inbox_dir).await? {
            let claimed_path = unique_path(&self.processing_dir, &name).await;
            if let Err(err) = fs::rename(&path, &claimed_path).await {
                tracing::warn!(
                    target: "inbox",
                    error = %err,
                    entry = %path.display(),
                    "failed to claim inbox entry"
                );
                continue;
            }

            let files = collect_files(&claimed_path).await;
            let job = SubmissionJob {
                id: claimed_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or(name),
                path: claimed_path,
                files,
                received_at: Utc::now(),
            };
            let priority = Priority::for_job(&job);
            tracing::info!(
                target: "inbox",
                submission = %job.id,
                files = job.files.len(),
                ?priority,
                "submission claimed"
            );
            self.queue.push(priority, job);
            claimed += 1;
        }
        Ok(claimed)
    }
}

async fn visible_entries(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut entries = Vec::new();
    let mut reader = fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read {}", dir.display()))?;
    while let Some(entry) = reader.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        entries.push((name, entry.path()));
    }
    entries.sort();
    Ok(entries)
}

/// Lists the classifiable files of a claimed entry, recursing into directories.
/// Entries that cannot be inspected are skipped so a claimed submission is
/// always queued.
async fn collect_files(root: &Path) -> Vec<SubmissionFile> {
    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(path) = pending.pop() {
        let metadata = match fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(err) => {
                tracing::warn!(
                    target: "inbox",
                    error = %err,
                    file = %path.display(),
                    "skipping unreadable entry"
                );
                continue;
            }
        };
        if metadata.is_dir() {
            match visible_entries(&path).await {
                Ok(children) => pending.extend(children.into_iter().map(|(_, child)| child)),
                Err(err) => tracing::warn!(
                    target: "inbox",
                    error = %err,
                    dir = %path.display(),
                    "skipping unreadable directory"
                ),
            }
            continue;
        }
        let Some(kind) = FileKind::from_path(&path) else {
            tracing::debug!(target: "inbox", file = %path.display(), "skipping unsupported file");
            continue;
        };
        let name = relative_name(root, &path);
        files.push(SubmissionFile { name, path, kind });
    }
    files.sort_by(|a, b| a.name.cmp(&b.name));
    files
}

fn relative_name(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().into_owned(),
        _ => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
    }
}

/// `dir/name`, or `dir/name-N` when that path is already taken.
pub(crate) async fn unique_path(dir: &Path, name: &str) -> PathBuf {
    let candidate = dir.join(name);
    if !fs::try_exists(&candidate).await.unwrap_or(false) {
        return candidate;
    }
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    let mut n = 1;
    loop {
        let numbered = match ext {
            Some(ext) => format!("{stem}-{n}.{ext}"),
            None => format!("{stem}-{n}"),
        };
        let candidate = dir.join(numbered);
        if !fs::try_exists(&candidate).await.unwrap_or(false) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::DirectoryConfig, infrastructure::directories::ensure_directories};

    fn layout() -> (tempfile::TempDir, ResolvedPaths) {
        let root = tempfile::tempdir().unwrap();
        let paths = ensure_directories(&DirectoryConfig {
            logs_dir: root.path().join("logs").display().to_string(),
            data_dir: root.path().join("data").display().to_string(),
            inbox_dir: None,
        })
        .unwrap();
        (root, paths)
    }

    fn scanner(paths: &ResolvedPaths) -> (InboxScanner, Arc<SubmissionQueue<SubmissionJob>>) {
        let queue = Arc::new(SubmissionQueue::new());
        (
            InboxScanner::new(paths, queue.clone(), Duration::from_millis(10)),
            queue,
        )
    }

    #[tokio::test]
    async fn claims_files_and_directories() {
        let (_root, paths) = layout();
        std::fs::write(paths.inbox_dir.join("east-london.csv"), "fajr,5:30").unwrap();
        let batch = paths.inbox_dir.join("masjid-photos");
        std::fs::create_dir_all(batch.join("week2")).unwrap();
        std::fs::write(batch.join("week1.jpg"), b"jpg").unwrap();
        std::fs::write(batch.join("week2/page.png"), b"png").unwrap();
        std::fs::write(batch.join("notes.docx"), b"doc").unwrap();
        std::fs::write(paths.inbox_dir.join(".uploading.csv"), "partial").unwrap();

        let (scanner, queue) = scanner(&paths);
        assert_eq!(scanner.scan_once().await.unwrap(), 2);

        let jobs = queue.drain_ordered();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, "east-london.csv");
        assert_eq!(jobs[0].files.len(), 1);
        assert_eq!(jobs[0].files[0].name, "east-london.csv");
        assert_eq!(jobs[1].id, "masjid-photos");
        let names: Vec<&str> = jobs[1].files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["week1.jpg", "week2/page.png"]);

        assert!(paths.processing_dir.join("east-london.csv").exists());
        assert!(paths.inbox_dir.join(".uploading.csv").exists());
        assert!(!paths.inbox_dir.join("east-london.csv").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn dangling_symlink_does_not_strand_submission() {
        let (_root, paths) = layout();
        let batch = paths.inbox_dir.join("a-batch");
        std::fs::create_dir_all(&batch).unwrap();
        std::fs::write(batch.join("times.csv"), "fajr,5:30").unwrap();
        std::os::unix::fs::symlink(batch.join("missing.png"), batch.join("broken.png")).unwrap();
        std::fs::write(paths.inbox_dir.join("b-later.csv"), "isha,21:30").unwrap();

        let (scanner, queue) = scanner(&paths);
        assert_eq!(scanner.scan_once().await.unwrap(), 2);

        let jobs = queue.drain_ordered();
        let batch_job = jobs.iter().find(|job| job.id == "a-batch").unwrap();
        let names: Vec<&str> = batch_job.files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["times.csv"]);
        assert!(jobs.iter().any(|job| job.id == "b-later.csv"));
        assert!(std::fs::read_dir(&paths.inbox_dir).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn recovery_returns_processing_entries_to_inbox() {
        let (_root, paths) = layout();
        std::fs::write(paths.processing_dir.join("stale.png"), b"png").unwrap();
        std::fs::write(paths.inbox_dir.join("stale.png"), b"newer").unwrap();

        let (scanner, _) = scanner(&paths);
        assert_eq!(scanner.recover_interrupted().await.unwrap(), 1);
        assert!(paths.inbox_dir.join("stale-1.png").exists());
        assert!(!paths.processing_dir.join("stale.png").exists());
    }

    #[tokio::test]
    async fn unique_path_numbers_collisions() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("report.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("report-1.json"), b"{}").unwrap();
        assert_eq!(
            unique_path(dir.path(), "report.json").await,
            dir.path().join("report-2.json")
        );
        assert_eq!(unique_path(dir.path(), "batch").await, dir.path().join("batch"));
    }
}
