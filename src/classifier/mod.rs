//! Timetable content classifier.
//!
//! Both OCR text and CSV text go through the same [`classify`] path; the
//! source kind only decides whether the CSV structure bonus applies and
//! which wording the rejection message uses.

pub mod detector;
pub mod dictionaries;
pub mod scoring;
pub mod verdict;

use crate::domain::{ClassificationInput, ClassificationResult};

pub fn classify(input: &ClassificationInput) -> ClassificationResult {
    let entities = detector::detect(&input.raw_text);
    let has_header = detector::has_header_phrase(&input.raw_text);
    let breakdown = scoring::score(&entities, has_header, input.source, input.rows.as_deref());
    let confidence = breakdown.total();

    tracing::debug!(
        target: "classifier",
        source = ?input.source,
        prayers = breakdown.prayers,
        times = breakdown.times,
        months = breakdown.months,
        header = breakdown.header,
        structure = breakdown.structure,
        confidence,
        "scored timetable candidate"
    );

    verdict::verdict(
        confidence,
        entities,
        input.source,
        input.row_count(),
        &input.raw_text,
    )
}
