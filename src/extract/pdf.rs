use std::path::{Path, PathBuf};

use tokio::process::Command;

use crate::config::PdfConfig;

use super::ExtractError;

const PAGE_PREFIX: &str = "page";

#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// 1-based page number.
    pub number: usize,
    pub png: Vec<u8>,
}

/// Converts PDF submissions into page images with poppler's `pdftoppm`.
#[derive(Debug, Clone)]
pub struct PdfRenderer {
    command: String,
    dpi: u32,
    max_pages: usize,
}

impl PdfRenderer {
    pub fn new(config: &PdfConfig) -> Self {
        Self {
            command: config.command.clone(),
            dpi: config.dpi,
            max_pages: config.max_pages,
        }
    }

    pub async fn render(&self, pdf: &[u8]) -> Result<Vec<RenderedPage>, ExtractError> {
        if pdf.is_empty() {
            return Err(ExtractError::Empty);
        }
        let scratch = tempfile::Builder::new().prefix("intake-pdf-").tempdir()?;
        let input = scratch.path().join("input.pdf");
        tokio::fs::write(&input, pdf).await?;

        let output = Command::new(&self.command)
            .arg("-png")
            .arg("-r")
            .arg(self.dpi.to_string())
            .arg("-l")
            .arg(self.max_pages.to_string())
            .arg(&input)
            .arg(scratch.path().join(PAGE_PREFIX))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| ExtractError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ExtractError::ToolFailed {
                command: self.command.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let mut pages = Vec::new();
        for (number, path) in list_pages(scratch.path()).await? {
            pages.push(RenderedPage {
                number,
                png: tokio::fs::read(&path).await?,
            });
        }
        if pages.is_empty() {
            return Err(ExtractError::Empty);
        }

        tracing::debug!(target: "pdf", pages = pages.len(), "pdf rendered");
        Ok(pages)
    }
}

async fn list_pages(dir: &Path) -> Result<Vec<(usize, PathBuf)>, ExtractError> {
    let mut pages = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        if let Some(number) = name.to_str().and_then(page_number) {
            pages.push((number, entry.path()));
        }
    }
    pages.sort_by_key(|(number, _)| *number);
    Ok(pages)
}

/// Parses `page-7.png` / `page-07.png` as written by `pdftoppm`.
fn page_number(file_name: &str) -> Option<usize> {
    file_name
        .strip_prefix(PAGE_PREFIX)?
        .strip_prefix('-')?
        .strip_suffix(".png")?
        .parse()
        .ok()
}
