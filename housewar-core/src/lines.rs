//! Parsing helpers shared by the plain-text and CSV formats

use csv::ReaderBuilder;

/// Trimmed, non-empty lines
pub fn non_blank_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim).filter(|line| !line.is_empty())
}

/// Headerless CSV records with the line each starts on
///
/// Records may have any number of fields and fields are kept untrimmed.
/// Blank lines yield no record; unreadable records are skipped with a warning.
pub fn csv_records(text: &str) -> Vec<(usize, Vec<String>)> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => {
                let line = record.position().map_or(0, |p| p.line() as usize);
                records.push((line, record.iter().map(str::to_string).collect()));
            }
            Err(e) => tracing::warn!("Skipping unreadable CSV record: {}", e),
        }
    }
    records
}
