use std::{sync::Arc, time::Duration};

use anyhow::Result;
use chrono_tz::Tz;
use tokio::task::JoinHandle;

use crate::{
    config::AppConfig,
    domain::SubmissionJob,
    extract::{PdfRenderer, TesseractFactory},
    infrastructure::{directories::ResolvedPaths, shutdown::Shutdown},
    tasks::{
        inbox::InboxScanner,
        processor::{Extractors, SubmissionProcessor},
        queue::SubmissionQueue,
    },
};

pub struct TimetableIntakeApp {
    _paths: ResolvedPaths,
    queue: Arc<SubmissionQueue<SubmissionJob>>,
    scanner_handle: JoinHandle<()>,
    processor_handle: JoinHandle<()>,
    shutdown: Shutdown,
}

impl TimetableIntakeApp {
    pub async fn initialize(
        config: AppConfig,
        paths: ResolvedPaths,
        shutdown: Shutdown,
    ) -> Result<Self> {
        let timezone = resolve_timezone(&config.timezone);
        let queue = Arc::new(SubmissionQueue::<SubmissionJob>::new());

        let scanner = Arc::new(InboxScanner::new(
            &paths,
            queue.clone(),
            config.intake.poll_interval,
        ));
        scanner.recover_interrupted().await?;

        let extractors = Extractors {
            ocr: TesseractFactory::new(&config.ocr),
            pdf: PdfRenderer::new(&config.pdf),
        };
        let processor = Arc::new(SubmissionProcessor::new(
            queue.clone(),
            extractors,
            &paths,
            timezone,
        ));

        let scanner_handle = scanner.spawn(shutdown.subscribe());
        let processor_handle = processor.spawn(shutdown.subscribe());

        Ok(Self {
            _paths: paths,
            queue,
            scanner_handle,
            processor_handle,
            shutdown,
        })
    }

    pub async fn run(self) -> Result<()> {
        let TimetableIntakeApp {
            _paths: _,
            queue,
            scanner_handle,
            processor_handle,
            shutdown,
        } = self;

        tracing::info!("timetable intake worker started");

        shutdown.subscribe().notified().await;
        tracing::info!("shutdown signal received (CTRL+C / SIGTERM)");

        let shutdown_timeout = Duration::from_secs(5);
        join_with_timeout("inbox", scanner_handle, shutdown_timeout).await;
        join_with_timeout("processor", processor_handle, shutdown_timeout).await;

        let pending = queue.snapshot();
        if pending.high_priority + pending.normal_priority > 0 {
            tracing::info!(
                high = pending.high_priority,
                normal = pending.normal_priority,
                "queued submissions stay in processing until next start"
            );
        }

        tracing::info!("timetable intake worker stopped");
        Ok(())
    }
}

async fn join_with_timeout(name: &'static str, mut handle: JoinHandle<()>, limit: Duration) {
    let wait = tokio::time::sleep(limit);
    tokio::pin!(wait);
    tokio::select! {
        res = &mut handle => {
            if let Err(err) = res {
                if err.is_panic() {
                    tracing::error!(target: "lifecycle", task = name, "task panicked");
                }
            }
        }
        _ = &mut wait => {
            tracing::warn!(
                target: "lifecycle",
                task = name,
                "task did not stop within {:?}; aborting",
                limit
            );
            handle.abort();
        }
    }
}

fn resolve_timezone(name: &str) -> Tz {
    name.parse().unwrap_or_else(|_| {
        tracing::warn!(timezone = name, "unknown REPORT_TIMEZONE; falling back to UTC");
        Tz::UTC
    })
}
