pub mod submission;
pub mod types;

pub use submission::{FileKind, FileReport, SubmissionFile, SubmissionJob, SubmissionReport};
pub use types::{
    CanonicalPrayer, ClassificationInput, ClassificationResult, DetectedEntities, QueueSnapshot,
    SourceKind,
};
