use std::future::Future;

use tempfile::TempDir;
use tokio::process::Command;

use crate::config::OcrConfig;

use super::ExtractError;

/// A text-recognition engine bound to a single acquisition.
pub trait OcrEngine: Send {
    fn recognize(
        &mut self,
        image: &[u8],
    ) -> impl Future<Output = Result<String, ExtractError>> + Send;

    /// Releases the engine. Dropping an engine without calling this must
    /// still free everything it holds.
    fn terminate(self) -> impl Future<Output = ()> + Send;
}

pub trait OcrEngineFactory: Send + Sync {
    type Engine: OcrEngine;

    fn acquire(&self) -> impl Future<Output = Result<Self::Engine, ExtractError>> + Send;
}

/// Acquires an engine, recognizes one image and terminates the engine on
/// both the success and the error path.
pub async fn with_engine<F: OcrEngineFactory>(
    factory: &F,
    image: &[u8],
) -> Result<String, ExtractError> {
    let mut engine = factory.acquire().await?;
    let outcome = engine.recognize(image).await;
    engine.terminate().await;
    outcome
}

#[derive(Debug, Clone)]
pub struct TesseractFactory {
    command: String,
    lang: String,
}

impl TesseractFactory {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            command: config.command.clone(),
            lang: config.lang.clone(),
        }
    }
}

impl OcrEngineFactory for TesseractFactory {
    type Engine = TesseractEngine;

    async fn acquire(&self) -> Result<TesseractEngine, ExtractError> {
        let workspace = tempfile::Builder::new().prefix("intake-ocr-").tempdir()?;
        tracing::debug!(
            target: "ocr",
            workspace = %workspace.path().display(),
            "ocr engine acquired"
        );
        Ok(TesseractEngine {
            workspace,
            command: self.command.clone(),
            lang: self.lang.clone(),
            runs: 0,
        })
    }
}

/// Runs the `tesseract` CLI inside a scratch directory owned by the engine.
#[derive(Debug)]
pub struct TesseractEngine {
    workspace: TempDir,
    command: String,
    lang: String,
    runs: usize,
}

impl OcrEngine for TesseractEngine {
    async fn recognize(&mut self, image: &[u8]) -> Result<String, ExtractError> {
        if image.is_empty() {
            return Err(ExtractError::Empty);
        }
        self.runs += 1;
        let input = self.workspace.path().join(format!("input-{}", self.runs));
        tokio::fs::write(&input, image).await?;

        let output = Command::new(&self.command)
            .arg(&input)
            .arg("stdout")
            .arg("-l")
            .arg(&self.lang)
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

        let text = String::from_utf8_lossy(&output.stdout).into_owned();
        tracing::debug!(target: "ocr", chars = text.chars().count(), "ocr text recognized");
        Ok(text)
    }

    async fn terminate(self) {
        let path = self.workspace.path().to_path_buf();
        if let Err(err) = self.workspace.close() {
            tracing::warn!(
                target: "ocr",
                path = %path.display(),
                error = %err,
                "failed to clean up ocr workspace"
            );
        }
    }
}
