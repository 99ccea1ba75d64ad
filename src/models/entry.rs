//! Suspicious entry data structures.

use std::fmt;

use serde::Serialize;

use super::LogRow;

/// Which detection predicates matched a row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Detection {
    /// Status code was 400 or above
    pub error: bool,
    /// Path touched a sensitive location
    pub sensitive_path: bool,
    /// User agent belongs to a known scanner
    pub bot: bool,
}

impl Detection {
    pub fn any(&self) -> bool {
        self.error || self.sensitive_path || self.bot
    }
}

/// A flagged log row, rendered for the analysis prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuspiciousEntry {
    /// Line number in the source file
    pub line: u64,

    /// Predicates that flagged the row
    pub detection: Detection,

    /// Rendered summary line
    pub text: String,
}

impl SuspiciousEntry {
    pub fn new(row: &LogRow<'_>, detection: Detection) -> Self {
        Self {
            line: row.line,
            detection,
            text: render(row),
        }
    }
}

impl fmt::Display for SuspiciousEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Render a row as the pipe-delimited summary line.
pub fn render(row: &LogRow<'_>) -> String {
    format!(
        "MÉTODO: {} | IP: {} | RUTA: {} | STATUS: {} | AGENTE: {}",
        row.method(),
        row.ip(),
        row.path(),
        row.status(),
        row.user_agent()
    )
}

/// Entries produced by scanning one log file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    /// Number of data rows read (header excluded)
    pub rows_scanned: usize,

    /// Flagged rows in file order
    pub entries: Vec<SuspiciousEntry>,
}

impl ScanReport {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of entries flagged by each predicate: (errors, sensitive paths, bots).
    pub fn breakdown(&self) -> (usize, usize, usize) {
        self.entries.iter().fold((0, 0, 0), |(e, p, b), entry| {
            (
                e + entry.detection.error as usize,
                p + entry.detection.sensitive_path as usize,
                b + entry.detection.bot as usize,
            )
        })
    }
}
