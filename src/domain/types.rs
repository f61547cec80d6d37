use std::fmt;

use serde::{Deserialize, Serialize};

/// Characters of source text retained on a result for diagnostics.
pub const RAW_TEXT_PREVIEW_CHARS: usize = 500;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Image,
    Csv,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalPrayer {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    Sunrise,
    Jummah,
}

impl CanonicalPrayer {
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalPrayer::Fajr => "Fajr",
            CanonicalPrayer::Dhuhr => "Dhuhr",
            CanonicalPrayer::Asr => "Asr",
            CanonicalPrayer::Maghrib => "Maghrib",
            CanonicalPrayer::Isha => "Isha",
            CanonicalPrayer::Sunrise => "Sunrise",
            CanonicalPrayer::Jummah => "Jummah",
        }
    }
}

impl fmt::Display for CanonicalPrayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Text handed to the classifier, already extracted from its source.
#[derive(Debug, Clone)]
pub struct ClassificationInput {
    /// Lowercased full text.
    pub raw_text: String,
    pub source: SourceKind,
    /// Parsed cells, only present for CSV input.
    pub rows: Option<Vec<Vec<String>>>,
}

impl ClassificationInput {
    pub fn image(text: &str) -> Self {
        Self {
            raw_text: text.to_lowercase(),
            source: SourceKind::Image,
            rows: None,
        }
    }

    pub fn csv(raw_text: String, rows: Vec<Vec<String>>) -> Self {
        Self {
            raw_text,
            source: SourceKind::Csv,
            rows: Some(rows),
        }
    }

    pub fn row_count(&self) -> Option<usize> {
        self.rows.as_ref().map(Vec::len)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetectedEntities {
    pub prayers: Vec<CanonicalPrayer>,
    pub times: Vec<String>,
    pub months: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub is_valid: bool,
    pub confidence: u8,
    pub detected_prayers: Vec<String>,
    pub detected_times: Vec<String>,
    pub detected_months: Vec<String>,
    pub raw_text: String,
    pub message: String,
}

impl ClassificationResult {
    /// Zero-confidence result returned when the source could not be read.
    pub fn failure(source: SourceKind) -> Self {
        let message = match source {
            SourceKind::Image => "Failed to process the image. Please try again.",
            SourceKind::Csv => "Failed to read the CSV file. Please try again.",
        };
        Self {
            is_valid: false,
            confidence: 0,
            detected_prayers: Vec::new(),
            detected_times: Vec::new(),
            detected_months: Vec::new(),
            raw_text: String::new(),
            message: message.to_string(),
        }
    }
}

pub fn preview(text: &str) -> String {
    text.chars().take(RAW_TEXT_PREVIEW_CHARS).collect()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct QueueSnapshot {
    pub high_priority: usize,
    pub normal_priority: usize,
}
