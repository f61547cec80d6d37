//! Call boundary for timetable validation.
//!
//! Extraction failures stop here: they are logged and turned into a
//! zero-confidence [`ClassificationResult`], so callers only ever branch on
//! `is_valid`.

use crate::{
    classifier::classify,
    domain::{ClassificationInput, ClassificationResult, SourceKind},
    extract::{parse_csv, with_engine, OcrEngineFactory, PdfRenderer},
};

pub fn validate_csv(bytes: &[u8]) -> ClassificationResult {
    match parse_csv(bytes) {
        Ok(doc) => {
            tracing::debug!(
                target: "classifier",
                rows = doc.rows.len(),
                delimiter = ?doc.delimiter,
                "csv parsed"
            );
            classify(&ClassificationInput::csv(doc.raw_text, doc.rows))
        }
        Err(err) => {
            tracing::warn!(target: "classifier", error = %err, "failed to read csv submission");
            ClassificationResult::failure(SourceKind::Csv)
        }
    }
}

pub async fn validate_image<F: OcrEngineFactory>(factory: &F, image: &[u8]) -> ClassificationResult {
    match with_engine(factory, image).await {
        Ok(text) => classify(&ClassificationInput::image(&text)),
        Err(err) => {
            tracing::warn!(target: "classifier", error = %err, "failed to recognize image submission");
            ClassificationResult::failure(SourceKind::Image)
        }
    }
}

/// Renders a PDF and validates every page as its own image. A PDF that cannot
/// be rendered yields a single failure entry without a page number.
pub async fn validate_pdf<F: OcrEngineFactory>(
    renderer: &PdfRenderer,
    factory: &F,
    pdf: &[u8],
) -> Vec<(Option<usize>, ClassificationResult)> {
    let pages = match renderer.render(pdf).await {
        Ok(pages) => pages,
        Err(err) => {
            tracing::warn!(target: "pdf", error = %err, "failed to render pdf submission");
            return vec![(None, ClassificationResult::failure(SourceKind::Image))];
        }
    };

    let mut results = Vec::with_capacity(pages.len());
    for page in &pages {
        results.push((Some(page.number), validate_image(factory, &page.png).await));
    }
    results
}
