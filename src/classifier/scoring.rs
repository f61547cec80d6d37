use crate::domain::{DetectedEntities, SourceKind};

pub const MAX_CONFIDENCE: u8 = 100;
const STRUCTURE_MIN_ROWS: usize = 5;
const STRUCTURE_MIN_COLUMNS: usize = 3;

/// Per-component points making up a confidence score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreBreakdown {
    pub prayers: u8,
    pub times: u8,
    pub months: u8,
    pub header: u8,
    pub structure: u8,
}

impl ScoreBreakdown {
    /// Sum of all components, clamped to [`MAX_CONFIDENCE`].
    pub fn total(&self) -> u8 {
        let sum = self.prayers + self.times + self.months + self.header + self.structure;
        sum.min(MAX_CONFIDENCE)
    }
}

pub fn score(
    entities: &DetectedEntities,
    has_header: bool,
    source: SourceKind,
    rows: Option<&[Vec<String>]>,
) -> ScoreBreakdown {
    let structure = match (source, rows) {
        (SourceKind::Csv, Some(rows)) if has_consistent_structure(rows) => 5,
        _ => 0,
    };
    ScoreBreakdown {
        prayers: prayer_points(entities.prayers.len()),
        times: time_points(entities.times.len()),
        months: if entities.months.is_empty() { 0 } else { 15 },
        header: if has_header { 10 } else { 0 },
        structure,
    }
}

fn prayer_points(count: usize) -> u8 {
    match count {
        0 => 0,
        1..=2 => 15,
        3..=4 => 30,
        _ => 40,
    }
}

fn time_points(count: usize) -> u8 {
    match count {
        0 => 0,
        1..=2 => 10,
        3..=4 => 20,
        5..=6 => 30,
        _ => 35,
    }
}

fn has_consistent_structure(rows: &[Vec<String>]) -> bool {
    if rows.len() < STRUCTURE_MIN_ROWS {
        return false;
    }
    let width = rows[0].len();
    width >= STRUCTURE_MIN_COLUMNS && rows.iter().all(|row| row.len() == width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CanonicalPrayer;

    fn entities(prayers: usize, times: usize, months: usize) -> DetectedEntities {
        let all = [
            CanonicalPrayer::Fajr,
            CanonicalPrayer::Dhuhr,
            CanonicalPrayer::Asr,
            CanonicalPrayer::Maghrib,
            CanonicalPrayer::Isha,
            CanonicalPrayer::Sunrise,
            CanonicalPrayer::Jummah,
        ];
        DetectedEntities {
            prayers: all.iter().copied().take(prayers).collect(),
            times: (0..times).map(|i| format!("{}:00", i + 1)).collect(),
            months: (0..months).map(|_| "Ramadan".to_string()).collect(),
        }
    }

    fn grid(rows: usize, columns: usize) -> Vec<Vec<String>> {
        vec![vec!["x".to_string(); columns]; rows]
    }

    #[test]
    fn prayer_tiers() {
        assert_eq!(prayer_points(0), 0);
        assert_eq!(prayer_points(1), 15);
        assert_eq!(prayer_points(2), 15);
        assert_eq!(prayer_points(3), 30);
        assert_eq!(prayer_points(4), 30);
        assert_eq!(prayer_points(5), 40);
        assert_eq!(prayer_points(7), 40);
    }

    #[test]
    fn time_tiers() {
        assert_eq!(time_points(0), 0);
        assert_eq!(time_points(1), 10);
        assert_eq!(time_points(3), 20);
        assert_eq!(time_points(5), 30);
        assert_eq!(time_points(6), 30);
        assert_eq!(time_points(7), 35);
        assert_eq!(time_points(40), 35);
    }

    #[test]
    fn nothing_detected_scores_zero() {
        let breakdown = score(&entities(0, 0, 0), false, SourceKind::Image, None);
        assert_eq!(breakdown, ScoreBreakdown::default());
        assert_eq!(breakdown.total(), 0);
    }

    #[test]
    fn month_points_depend_only_on_presence() {
        let one = score(&entities(0, 0, 1), false, SourceKind::Image, None);
        let many = score(&entities(0, 0, 4), false, SourceKind::Image, None);
        assert_eq!(one.months, 15);
        assert_eq!(many.months, 15);
    }

    #[test]
    fn structure_bonus_requires_csv_rows() {
        let rows = grid(5, 4);
        let csv = score(&entities(0, 0, 0), false, SourceKind::Csv, Some(&rows));
        let image = score(&entities(0, 0, 0), false, SourceKind::Image, Some(&rows));
        assert_eq!(csv.structure, 5);
        assert_eq!(image.structure, 0);
    }

    #[test]
    fn structure_bonus_rejects_short_narrow_or_ragged_tables() {
        assert!(!has_consistent_structure(&grid(4, 4)));
        assert!(!has_consistent_structure(&grid(6, 2)));
        let mut ragged = grid(6, 4);
        ragged[3].pop();
        assert!(!has_consistent_structure(&ragged));
        assert!(has_consistent_structure(&grid(5, 3)));
    }

    #[test]
    fn csv_total_is_clamped() {
        let rows = grid(8, 7);
        let breakdown = score(&entities(7, 9, 1), true, SourceKind::Csv, Some(&rows));
        assert_eq!(breakdown.prayers + breakdown.times + breakdown.months, 90);
        assert_eq!(breakdown.header + breakdown.structure, 15);
        assert_eq!(breakdown.total(), MAX_CONFIDENCE);
    }

    #[test]
    fn image_maximum_is_one_hundred() {
        let breakdown = score(&entities(5, 7, 1), true, SourceKind::Image, None);
        assert_eq!(breakdown.total(), 100);
    }
}
