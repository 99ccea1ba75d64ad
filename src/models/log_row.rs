//! Access-log row model and column lookup.

use std::num::IntErrorKind;

use csv::StringRecord;

use crate::error::{AppError, Result};

/// Column carrying the HTTP status code.
pub const COL_STATUS: &str = "sc-status";
/// Column carrying the request path.
pub const COL_PATH: &str = "cs-uri-stem";
/// Column carrying the client address.
pub const COL_IP: &str = "c-ip";
/// Column carrying the user agent.
pub const COL_USER_AGENT: &str = "cs(User-Agent)";
/// Escaped spelling of [`COL_USER_AGENT`] found in some exports.
pub const COL_USER_AGENT_ESCAPED: &str = r"cs\(User-Agent)";
/// Column carrying the HTTP method.
pub const COL_METHOD: &str = "cs-method";

pub const DEFAULT_STATUS: &str = "200";
pub const DEFAULT_PATH: &str = "";
pub const DEFAULT_IP: &str = "0.0.0.0";
pub const DEFAULT_USER_AGENT: &str = "";
pub const DEFAULT_METHOD: &str = "";

/// Outcome of looking a column up in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field<'a> {
    Present(&'a str),
    Absent,
}

impl<'a> Field<'a> {
    /// The value, or `default` when the column is absent.
    ///
    /// An empty cell is present and stays empty.
    pub fn or(self, default: &'a str) -> &'a str {
        match self {
            Field::Present(value) => value,
            Field::Absent => default,
        }
    }
}

/// Positions of the recognized columns within the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderIndex {
    status: Option<usize>,
    path: Option<usize>,
    ip: Option<usize>,
    user_agent: Option<usize>,
    method: Option<usize>,
}

impl HeaderIndex {
    /// Resolve column positions from a header record.
    ///
    /// When a name repeats, the last occurrence wins.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut index = Self::default();
        for (pos, name) in headers.iter().enumerate() {
            match name {
                COL_STATUS => index.status = Some(pos),
                COL_PATH => index.path = Some(pos),
                COL_IP => index.ip = Some(pos),
                COL_USER_AGENT => index.user_agent = Some(pos),
                COL_USER_AGENT_ESCAPED => {
                    index.user_agent.get_or_insert(pos);
                }
                COL_METHOD => index.method = Some(pos),
                _ => {}
            }
        }
        index
    }

    /// Build the row view of one data record.
    pub fn row<'r>(&self, record: &'r StringRecord, line: u64) -> LogRow<'r> {
        let lookup = move |pos: Option<usize>| match pos.and_then(|p| record.get(p)) {
            Some(value) => Field::Present(value),
            None => Field::Absent,
        };

        LogRow {
            line,
            status: lookup(self.status),
            path: lookup(self.path),
            ip: lookup(self.ip),
            user_agent: lookup(self.user_agent),
            method: lookup(self.method),
        }
    }
}

/// One parsed access-log line, borrowed from its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow<'a> {
    /// Line number in the source file (1-based)
    pub line: u64,
    pub status: Field<'a>,
    pub path: Field<'a>,
    pub ip: Field<'a>,
    pub user_agent: Field<'a>,
    pub method: Field<'a>,
}

impl<'a> LogRow<'a> {
    pub fn status(&self) -> &'a str {
        self.status.or(DEFAULT_STATUS)
    }

    pub fn path(&self) -> &'a str {
        self.path.or(DEFAULT_PATH)
    }

    pub fn ip(&self) -> &'a str {
        self.ip.or(DEFAULT_IP)
    }

    pub fn user_agent(&self) -> &'a str {
        self.user_agent.or(DEFAULT_USER_AGENT)
    }

    pub fn method(&self) -> &'a str {
        self.method.or(DEFAULT_METHOD)
    }

    /// Parse the status as an integer.
    ///
    /// Surrounding whitespace is ignored. Integers beyond the `i64` range
    /// saturate. Anything else that is not an integer is a parse error for
    /// this line.
    pub fn status_code(&self) -> Result<i64> {
        let raw = self.status();
        match raw.trim().parse::<i64>() {
            Ok(code) => Ok(code),
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => Ok(i64::MAX),
                IntErrorKind::NegOverflow => Ok(i64::MIN),
                _ => Err(AppError::parse(
                    self.line,
                    format!("invalid status {raw:?}: {e}"),
                )),
            },
        }
    }
}
