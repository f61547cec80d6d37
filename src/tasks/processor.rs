use std::{path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use chrono::Utc;
use chrono_tz::Tz;
use futures::future::join_all;
use tokio::{fs, task::JoinHandle, time::sleep};

use crate::{
    domain::{
        ClassificationResult, FileKind, FileReport, SubmissionFile, SubmissionJob,
        SubmissionReport,
    },
    extract::{OcrEngineFactory, PdfRenderer},
    infrastructure::{directories::ResolvedPaths, shutdown::ShutdownListener},
    tasks::{inbox::unique_path, queue::SubmissionQueue},
    validation::{validate_csv, validate_image, validate_pdf},
};

/// Extraction backends handed to each file's classification task.
#[derive(Clone)]
pub struct Extractors<F> {
    pub ocr: F,
    pub pdf: PdfRenderer,
}

pub struct SubmissionProcessor<F> {
    queue: Arc<SubmissionQueue<SubmissionJob>>,
    extractors: Extractors<F>,
    accepted_dir: PathBuf,
    review_dir: PathBuf,
    reports_dir: PathBuf,
    timezone: Tz,
}

impl<F> SubmissionProcessor<F>
where
    F: OcrEngineFactory + Clone + 'static,
{
    pub fn new(
        queue: Arc<SubmissionQueue<SubmissionJob>>,
        extractors: Extractors<F>,
        paths: &ResolvedPaths,
        timezone: Tz,
    ) -> Self {
        Self {
            queue,
            extractors,
            accepted_dir: paths.accepted_dir.clone(),
            review_dir: paths.review_dir.clone(),
            reports_dir: paths.reports_dir.clone(),
            timezone,
        }
    }

    pub fn spawn(self: Arc<Self>, mut shutdown: ShutdownListener) -> JoinHandle<()> {
        tokio::spawn(async move {
            if let Err(err) = self.run_loop(&mut shutdown).await {
                tracing::error!(target: "processor", error = %err, "submission processor crashed");
            }
        })
    }

    async fn run_loop(&self, shutdown: &mut ShutdownListener) -> Result<()> {
        loop {
            if shutdown.is_triggered() {
                break;
            }

            let batch = self.queue.drain_ordered();
            if batch.is_empty() {
                tokio::select! {
                    _ = sleep(Duration::from_millis(500)) => {}
                    _ = shutdown.notified() => break,
                }
                continue;
            }

            tracing::info!(target: "processor", total = batch.len(), "processing batch");
            for job in batch {
                if shutdown.is_triggered() {
                    tracing::info!(
                        target: "processor",
                        "shutdown requested; remaining submissions stay in processing"
                    );
                    break;
                }
                if let Err(err) = self.handle_job(&job, shutdown).await {
                    tracing::error!(
                        target: "processor",
                        error = %err,
                        submission = %job.id,
                        "failed to handle submission"
                    );
                }
            }
        }
        tracing::info!(target: "processor", "submission processor stopped");
        Ok(())
    }

    /// Classifies one submission and files it. Returns `None` when shutdown
    /// interrupted classification; the submission is then left in place.
    pub async fn handle_job(
        &self,
        job: &SubmissionJob,
        shutdown: &mut ShutdownListener,
    ) -> Result<Option<SubmissionReport>> {
        let classify_all = join_all(
            job.files
                .iter()
                .cloned()
                .map(|file| classify_file(self.extractors.clone(), file)),
        );

        let entries = tokio::select! {
            biased;
            _ = shutdown.notified() => {
                tracing::info!(
                    target: "processor",
                    submission = %job.id,
                    "shutdown requested during classification; submission left for recovery"
                );
                return Ok(None);
            }
            entries = classify_all => entries.into_iter().flatten().collect::<Vec<_>>(),
        };

        let report = SubmissionReport::new(job, entries, Utc::now(), self.timezone);
        self.file_submission(job, &report).await?;
        Ok(Some(report))
    }

    async fn file_submission(&self, job: &SubmissionJob, report: &SubmissionReport) -> Result<()> {
        let report_path = unique_path(&self.reports_dir, &format!("{}.json", job.id)).await;
        let payload = serde_json::to_vec_pretty(report)?;
        fs::write(&report_path, payload)
            .await
            .with_context(|| format!("failed to write report {}", report_path.display()))?;

        let target_dir = if report.accepted {
            &self.accepted_dir
        } else {
            &self.review_dir
        };
        let target = unique_path(target_dir, &job.id).await;
        fs::rename(&job.path, &target)
            .await
            .with_context(|| format!("failed to move submission {}", job.path.display()))?;

        let best = report
            .entries
            .iter()
            .map(|entry| entry.result.confidence)
            .max()
            .unwrap_or(0);
        tracing::info!(
            target: "processor",
            submission = %job.id,
            accepted = report.accepted,
            entries = report.entries.len(),
            best_confidence = best,
            report = %report_path.display(),
            "submission filed"
        );
        Ok(())
    }
}

async fn classify_file<F: OcrEngineFactory>(
    extractors: Extractors<F>,
    file: SubmissionFile,
) -> Vec<FileReport> {
    let bytes = match fs::read(&file.path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(
                target: "processor",
                error = %err,
                file = %file.path.display(),
                "failed to read submission file"
            );
            return vec![FileReport {
                file: file.name,
                page: None,
                result: ClassificationResult::failure(file.kind.source()),
            }];
        }
    };

    let results = match file.kind {
        FileKind::Csv => vec![(None, validate_csv(&bytes))],
        FileKind::Image => vec![(None, validate_image(&extractors.ocr, &bytes).await)],
        FileKind::Pdf => validate_pdf(&extractors.pdf, &extractors.ocr, &bytes).await,
    };

    for (page, result) in &results {
        tracing::debug!(
            target: "processor",
            file = %file.name,
            page = ?page,
            confidence = result.confidence,
            valid = result.is_valid,
            "file classified"
        );
    }

    results
        .into_iter()
        .map(|(page, result)| FileReport {
            file: file.name.clone(),
            page,
            result,
        })
        .collect()
}
