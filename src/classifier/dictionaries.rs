use once_cell::sync::Lazy;

use crate::domain::CanonicalPrayer;

/// Prayer synonyms grouped by the canonical name they normalize to.
pub static PRAYER_SYNONYMS: &[(CanonicalPrayer, &[&str])] = &[
    (CanonicalPrayer::Fajr, &["fajr", "fajar", "fajir", "فجر"]),
    (
        CanonicalPrayer::Dhuhr,
        &["dhuhr", "zuhr", "zohr", "duhr", "ظهر", "ظہر"],
    ),
    (CanonicalPrayer::Asr, &["asr", "asar", "عصر"]),
    (
        CanonicalPrayer::Maghrib,
        &["maghrib", "magrib", "maghreb", "مغرب"],
    ),
    (CanonicalPrayer::Isha, &["isha", "esha", "ishaa", "عشاء", "عشا"]),
    (
        CanonicalPrayer::Sunrise,
        &["sunrise", "shuruq", "ishraq", "شروق"],
    ),
    (
        CanonicalPrayer::Jummah,
        &["jummah", "jumma", "jumuah", "friday", "جمعة"],
    ),
];

/// Timetable vocabulary that is scanned but never maps to a prayer.
pub static GENERIC_KEYWORDS: &[&str] = &[
    "prayer",
    "salah",
    "salat",
    "namaz",
    "jamaat",
    "jamat",
    "congregation",
    "timetable",
    "schedule",
    "times",
    "صلاة",
    "جماعة",
    "نماز",
];

pub static MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
    "jan",
    "feb",
    "mar",
    "apr",
    "jun",
    "jul",
    "aug",
    "sep",
    "oct",
    "nov",
    "dec",
    "muharram",
    "safar",
    "rabi",
    "jumada",
    "rajab",
    "shaban",
    "ramadan",
    "shawwal",
    "dhul",
];

pub static HEADER_PHRASES: &[&str] = &[
    "timetable",
    "schedule",
    "prayer times",
    "salah times",
    "namaz",
];

/// Every keyword in scan order: synonyms by group, then generic vocabulary.
pub static ALL_KEYWORDS: Lazy<Vec<&'static str>> = Lazy::new(|| {
    PRAYER_SYNONYMS
        .iter()
        .flat_map(|(_, synonyms)| synonyms.iter().copied())
        .chain(GENERIC_KEYWORDS.iter().copied())
        .collect()
});

pub fn canonical_prayer(keyword: &str) -> Option<CanonicalPrayer> {
    PRAYER_SYNONYMS
        .iter()
        .find(|(_, synonyms)| synonyms.contains(&keyword))
        .map(|(prayer, _)| *prayer)
}
