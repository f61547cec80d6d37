use crate::domain::{types::preview, ClassificationResult, DetectedEntities, SourceKind};

/// Minimum confidence for a submission to count as a prayer timetable.
pub const VALIDITY_THRESHOLD: u8 = 50;
const AMBIGUOUS_THRESHOLD: u8 = 30;

pub fn verdict(
    confidence: u8,
    entities: DetectedEntities,
    source: SourceKind,
    row_count: Option<usize>,
    raw_text: &str,
) -> ClassificationResult {
    let is_valid = confidence >= VALIDITY_THRESHOLD;
    let message = message_for(is_valid, confidence, &entities, source, row_count);

    ClassificationResult {
        is_valid,
        confidence,
        detected_prayers: entities
            .prayers
            .iter()
            .map(|prayer| prayer.as_str().to_string())
            .collect(),
        detected_times: entities.times,
        detected_months: entities.months,
        raw_text: preview(raw_text),
        message,
    }
}

fn message_for(
    is_valid: bool,
    confidence: u8,
    entities: &DetectedEntities,
    source: SourceKind,
    row_count: Option<usize>,
) -> String {
    if is_valid {
        let rows = match (source, row_count) {
            (SourceKind::Csv, Some(rows)) => format!(" in {rows} rows"),
            _ => String::new(),
        };
        return format!(
            "Prayer timetable detected! Found {} prayer names and {} times{}.",
            entities.prayers.len(),
            entities.times.len(),
            rows
        );
    }
    if confidence >= AMBIGUOUS_THRESHOLD {
        return "This might be a prayer timetable, but we could not clearly identify enough prayer times."
            .to_string();
    }
    if !entities.times.is_empty() {
        return "We found some times, but could not identify this as a prayer timetable."
            .to_string();
    }
    let hint = match source {
        SourceKind::Image => "take a clearer picture",
        SourceKind::Csv => "upload a valid CSV",
    };
    format!("This does not appear to be a prayer timetable. Please {hint}.")
}
