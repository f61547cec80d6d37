use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::types::{ClassificationResult, SourceKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Image,
    Pdf,
}

impl FileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" | "txt" => Some(FileKind::Csv),
            "png" | "jpg" | "jpeg" | "webp" | "bmp" | "gif" | "tif" | "tiff" => {
                Some(FileKind::Image)
            }
            "pdf" => Some(FileKind::Pdf),
            _ => None,
        }
    }

    /// Modality the classifier sees for files of this kind. PDF pages are OCR'd as images.
    pub fn source(&self) -> SourceKind {
        match self {
            FileKind::Csv => SourceKind::Csv,
            FileKind::Image | FileKind::Pdf => SourceKind::Image,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionFile {
    pub name: String,
    pub path: PathBuf,
    pub kind: FileKind,
}

#[derive(Debug, Clone)]
pub struct SubmissionJob {
    pub id: String,
    /// Location of the claimed entry inside `processing/`.
    pub path: PathBuf,
    pub files: Vec<SubmissionFile>,
    pub received_at: DateTime<Utc>,
}

impl SubmissionJob {
    pub fn needs_ocr(&self) -> bool {
        self.files.iter().any(|file| file.kind != FileKind::Csv)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    pub result: ClassificationResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionReport {
    pub submission_id: String,
    pub received_at: String,
    pub processed_at: String,
    pub accepted: bool,
    pub entries: Vec<FileReport>,
}

impl SubmissionReport {
    pub fn new(
        job: &SubmissionJob,
        entries: Vec<FileReport>,
        processed_at: DateTime<Utc>,
        tz: Tz,
    ) -> Self {
        let accepted = !entries.is_empty() && entries.iter().all(|entry| entry.result.is_valid);
        Self {
            submission_id: job.id.clone(),
            received_at: job.received_at.with_timezone(&tz).to_rfc3339(),
            processed_at: processed_at.with_timezone(&tz).to_rfc3339(),
            accepted,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> SubmissionJob {
        SubmissionJob {
            id: "masjid-upload".into(),
            path: PathBuf::from("processing/masjid-upload"),
            files: Vec::new(),
            received_at: Utc::now(),
        }
    }

    fn entry(is_valid: bool) -> FileReport {
        let mut result = ClassificationResult::failure(SourceKind::Image);
        result.is_valid = is_valid;
        FileReport {
            file: "page.png".into(),
            page: None,
            result,
        }
    }

    #[test]
    fn file_kind_from_extension() {
        assert_eq!(FileKind::from_path(Path::new("a/Times.CSV")), Some(FileKind::Csv));
        assert_eq!(FileKind::from_path(Path::new("photo.jpeg")), Some(FileKind::Image));
        assert_eq!(FileKind::from_path(Path::new("scan.pdf")), Some(FileKind::Pdf));
        assert_eq!(FileKind::from_path(Path::new("notes.docx")), None);
        assert_eq!(FileKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn report_accepts_only_when_every_entry_is_valid() {
        let job = job();
        let now = Utc::now();
        assert!(SubmissionReport::new(&job, vec![entry(true), entry(true)], now, Tz::UTC).accepted);
        assert!(!SubmissionReport::new(&job, vec![entry(true), entry(false)], now, Tz::UTC).accepted);
        assert!(!SubmissionReport::new(&job, Vec::new(), now, Tz::UTC).accepted);
    }
}
