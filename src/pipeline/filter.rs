// src/pipeline/filter.rs

//! Suspicious-row filter.
//!
//! Reads the log as delimited text with a header row and flags every row
//! that shows an HTTP error, probes a sensitive path, or comes from a known
//! scanner.

use csv::ReaderBuilder;

use crate::error::Result;
use crate::models::{Detection, HeaderIndex, LogRow, ScanReport, SuspiciousEntry};

/// Path fragments that indicate probing for secrets or admin panels.
pub const SENSITIVE_PATHS: [&str; 4] = [".env", ".git", "phpinfo", "admin"];

/// User-agent fragments of internet-wide scanners.
pub const SCANNER_AGENTS: [&str; 2] = ["Assetnote", "Censys"];

/// Status code 400 or above.
pub fn is_error(status: i64) -> bool {
    status >= 400
}

/// Path contains a sensitive fragment, ignoring case.
pub fn is_sensitive_path(path: &str) -> bool {
    let path = path.to_lowercase();
    SENSITIVE_PATHS.iter().any(|fragment| path.contains(fragment))
}

/// User agent contains a scanner fragment. Case-sensitive.
pub fn is_bot(user_agent: &str) -> bool {
    SCANNER_AGENTS.iter().any(|fragment| user_agent.contains(fragment))
}

/// Evaluate every predicate against one row.
///
/// Fails if the status cannot be parsed, even when another predicate
/// would already flag the row.
pub fn detect(row: &LogRow<'_>) -> Result<Detection> {
    Ok(Detection {
        error: is_error(row.status_code()?),
        sensitive_path: is_sensitive_path(row.path()),
        bot: is_bot(row.user_agent()),
    })
}

/// Maps record byte offsets to 1-based file lines.
///
/// The reader's own line count drifts on CRLF input and skipped blank
/// lines, so lines are counted from the text instead. Offsets must be
/// passed in increasing order.
struct LineCounter<'a> {
    content: &'a [u8],
    offset: usize,
    line: u64,
}

impl<'a> LineCounter<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content: content.as_bytes(),
            offset: 0,
            line: 1,
        }
    }

    /// Line of the first byte of the record found at or after `offset`.
    fn line_at(&mut self, offset: usize) -> u64 {
        let offset = offset.clamp(self.offset, self.content.len());
        let skipped = self.content[offset..]
            .iter()
            .take_while(|&&b| b == b'\r' || b == b'\n')
            .count();
        let start = offset + skipped;

        self.line += self.content[self.offset..start]
            .iter()
            .filter(|&&b| b == b'\n')
            .count() as u64;
        self.offset = start;
        self.line
    }
}

/// Scan a whole log and collect the flagged rows in file order.
pub fn scan(content: &str, delimiter: u8) -> Result<ScanReport> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let index = HeaderIndex::from_headers(reader.headers()?);
    let mut report = ScanReport::default();
    let mut lines = LineCounter::new(content);

    for result in reader.records() {
        let record = result?;
        let offset = record.position().map(|p| p.byte() as usize).unwrap_or_default();
        let line = lines.line_at(offset);
        let row = index.row(&record, line);
        report.rows_scanned += 1;

        let detection = detect(&row)?;
        if detection.any() {
            log::debug!("Line {} flagged: {:?}", line, detection);
            report.entries.push(SuspiciousEntry::new(&row, detection));
        }
    }

    Ok(report)
}
