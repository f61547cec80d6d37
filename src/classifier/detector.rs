use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DetectedEntities;

use super::dictionaries::{canonical_prayer, ALL_KEYWORDS, HEADER_PHRASES, MONTHS};

static TIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[0-9]{1,2}:[0-9]{2}(?:\s*[AaPp][Mm])?\b").expect("valid time regex")
});

/// Scans lowercased text for prayer names, clock times and month names.
///
/// Keyword and month matching is plain substring search, so short entries
/// such as `asr` or `may` also hit inside longer words.
pub fn detect(text: &str) -> DetectedEntities {
    let mut entities = DetectedEntities::default();

    for keyword in ALL_KEYWORDS.iter() {
        if !text.contains(keyword) {
            continue;
        }
        if let Some(prayer) = canonical_prayer(keyword) {
            if !entities.prayers.contains(&prayer) {
                entities.prayers.push(prayer);
            }
        }
    }

    for found in TIME_REGEX.find_iter(text) {
        let time = found.as_str();
        if !entities.times.iter().any(|seen| seen == time) {
            entities.times.push(time.to_string());
        }
    }

    // Overlapping entries (march/mar) both land here; only presence is scored.
    for month in MONTHS {
        if text.contains(month) {
            entities.months.push(capitalize(month));
        }
    }

    entities
}

pub fn has_header_phrase(text: &str) -> bool {
    HEADER_PHRASES.iter().any(|phrase| text.contains(phrase))
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CanonicalPrayer;

    #[test]
    fn synonyms_collapse_to_one_canonical_entry() {
        let entities = detect("zohr 1:15 zuhr 1:30");
        assert_eq!(entities.prayers, vec![CanonicalPrayer::Dhuhr]);
    }

    #[test]
    fn prayers_follow_dictionary_order_not_text_order() {
        let entities = detect("isha 21:00 then fajr 5:00");
        assert_eq!(
            entities.prayers,
            vec![CanonicalPrayer::Fajr, CanonicalPrayer::Isha]
        );
    }

    #[test]
    fn arabic_and_urdu_names_are_detected() {
        let entities = detect("فجر ٥ ظہر عصر");
        assert_eq!(
            entities.prayers,
            vec![
                CanonicalPrayer::Fajr,
                CanonicalPrayer::Dhuhr,
                CanonicalPrayer::Asr
            ]
        );
    }

    #[test]
    fn generic_keywords_do_not_populate_prayers() {
        let entities = detect("prayer timetable salah namaz jamaat");
        assert!(entities.prayers.is_empty());
    }

    #[test]
    fn repeated_time_is_counted_once() {
        let entities = detect("5:30 and again 5:30");
        assert_eq!(entities.times, vec!["5:30".to_string()]);
    }

    #[test]
    fn time_with_marker_is_distinct_from_bare_time() {
        let entities = detect("fajr 5:30 sunrise 5:30 am");
        assert_eq!(
            entities.times,
            vec!["5:30".to_string(), "5:30 am".to_string()]
        );
    }

    #[test]
    fn marker_case_is_preserved() {
        let entities = detect("12:45 PM");
        assert_eq!(entities.times, vec!["12:45 PM".to_string()]);
    }

    #[test]
    fn only_ascii_digits_form_times() {
        let entities = detect("فجر ٥:٣٠ ظہر ١:١٥ عصر 4:45");
        assert_eq!(entities.times, vec!["4:45".to_string()]);
    }

    #[test]
    fn long_digit_runs_are_not_times() {
        let entities = detect("ref 123:456");
        assert!(entities.times.is_empty());
    }

    #[test]
    fn months_are_capitalized_and_not_deduplicated() {
        let entities = detect("march 2025, ramadan 1446");
        assert_eq!(
            entities.months,
            vec!["March".to_string(), "Mar".to_string(), "Ramadan".to_string()]
        );
    }

    #[test]
    fn header_phrase_detection() {
        assert!(has_header_phrase("east london masjid prayer times"));
        assert!(has_header_phrase("weekly schedule"));
        assert!(!has_header_phrase("office hours"));
    }
}
