use std::{fs, path::PathBuf};

use anyhow::{Context, Result};

use crate::config::DirectoryConfig;

/// Every directory the intake worker reads from or files submissions into.
#[derive(Debug, Clone)]
pub struct ResolvedPaths {
    pub logs_dir: PathBuf,
    pub data_dir: PathBuf,
    pub inbox_dir: PathBuf,
    pub processing_dir: PathBuf,
    pub accepted_dir: PathBuf,
    pub review_dir: PathBuf,
    pub reports_dir: PathBuf,
}

pub fn ensure_directories(cfg: &DirectoryConfig) -> Result<ResolvedPaths> {
    let logs_dir = ensure_dir(PathBuf::from(&cfg.logs_dir))?;
    let data_dir = ensure_dir(PathBuf::from(&cfg.data_dir))?;
    let inbox_dir = match &cfg.inbox_dir {
        Some(path) => ensure_dir(PathBuf::from(path))?,
        None => ensure_dir(data_dir.join("inbox"))?,
    };

    let paths = ResolvedPaths {
        processing_dir: ensure_dir(data_dir.join("processing"))?,
        accepted_dir: ensure_dir(data_dir.join("accepted"))?,
        review_dir: ensure_dir(data_dir.join("review"))?,
        reports_dir: ensure_dir(data_dir.join("reports"))?,
        logs_dir,
        data_dir,
        inbox_dir,
    };

    for dir in [&paths.processing_dir, &paths.reports_dir] {
        let probe_file = dir.join(".write-test");
        fs::write(&probe_file, b"ok")
            .with_context(|| format!("directory {} is not writable", dir.display()))?;
        fs::remove_file(&probe_file)?;
    }
    Ok(paths)
}

fn ensure_dir(dir: PathBuf) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create directory {}", dir.display()))?;
    }
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = fs::metadata(&dir) {
            let mut perms = metadata.permissions();
            perms.set_mode(0o755);
            let _ = fs::set_permissions(&dir, perms);
        }
    }
    Ok(dir.canonicalize().unwrap_or(dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_layout_under_data_dir() {
        let root = tempfile::tempdir().unwrap();
        let cfg = DirectoryConfig {
            logs_dir: root.path().join("logs").display().to_string(),
            data_dir: root.path().join("data").display().to_string(),
            inbox_dir: None,
        };
        let paths = ensure_directories(&cfg).unwrap();
        assert!(paths.inbox_dir.ends_with("data/inbox"));
        for dir in [
            &paths.logs_dir,
            &paths.inbox_dir,
            &paths.processing_dir,
            &paths.accepted_dir,
            &paths.review_dir,
            &paths.reports_dir,
        ] {
            assert!(dir.is_dir(), "{} missing", dir.display());
        }
    }

    #[test]
    fn honours_explicit_inbox() {
        let root = tempfile::tempdir().unwrap();
        let cfg = DirectoryConfig {
            logs_dir: root.path().join("logs").display().to_string(),
            data_dir: root.path().join("data").display().to_string(),
            inbox_dir: Some(root.path().join("uploads").display().to_string()),
        };
        let paths = ensure_directories(&cfg).unwrap();
        assert!(paths.inbox_dir.ends_with("uploads"));
    }
}
