use super::ExtractError;

const SNIFF_LINES: usize = 5;
const CANDIDATE_DELIMITERS: [char; 3] = [',', ';', '\t'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDocument {
    pub rows: Vec<Vec<String>>,
    /// Whole file text, lowercased.
    pub raw_text: String,
    pub delimiter: char,
}

pub fn parse_csv(bytes: &[u8]) -> Result<CsvDocument, ExtractError> {
    let text = std::str::from_utf8(bytes).map_err(|_| ExtractError::Unreadable)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
        .collect();
    if lines.is_empty() {
        return Err(ExtractError::Empty);
    }

    let delimiter = sniff_delimiter(&lines);
    let rows: Vec<Vec<String>> = lines
        .iter()
        .map(|line| line.split(delimiter).map(clean_cell).collect())
        .collect();

    Ok(CsvDocument {
        rows,
        raw_text: text.to_lowercase(),
        delimiter,
    })
}

fn sniff_delimiter(lines: &[&str]) -> char {
    let sample = &lines[..lines.len().min(SNIFF_LINES)];
    let mut best = ',';
    let mut best_count = 0;
    for candidate in CANDIDATE_DELIMITERS {
        let count: usize = sample
            .iter()
            .map(|line| line.matches(candidate).count())
            .sum();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

fn clean_cell(cell: &str) -> String {
    let cell = cell.trim();
    let cell = cell
        .strip_prefix('"')
        .or_else(|| cell.strip_prefix('\''))
        .unwrap_or(cell);
    let cell = cell
        .strip_suffix('"')
        .or_else(|| cell.strip_suffix('\''))
        .unwrap_or(cell);
    cell.to_string()
}
