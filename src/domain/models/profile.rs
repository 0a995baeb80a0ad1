//! Coverage profile model.
//!
//! A profile is the line-oriented text the Go toolchain writes with
//! `-coverprofile`:
//!
//! ```text
//! mode: set
//! github.com/org/project/parser/lexer.go:14.39,16.2 1 1
//! github.com/org/project/parser/lexer.go:18.2,20.16 3 0
//! ```
//!
//! Every record names a source block (`path:startLine.startCol,endLine.endCol`),
//! the number of statements in it and how often it executed.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::ReportingError;

const MODE_PREFIX: &str = "mode:";

/// How execution counts were collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverMode {
    /// Each block is either covered (1) or not (0).
    Set,
    /// Counts are execution totals.
    Count,
    /// Like `Count`, but safe for concurrent tests.
    Atomic,
}

impl CoverMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Count => "count",
            Self::Atomic => "atomic",
        }
    }
}

impl fmt::Display for CoverMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CoverMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set" => Ok(Self::Set),
            "count" => Ok(Self::Count),
            "atomic" => Ok(Self::Atomic),
            other => Err(format!("unknown cover mode '{other}'")),
        }
    }
}

/// A line/column position inside a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    fn parse(s: &str) -> Result<Self, String> {
        let (line, column) = s
            .split_once('.')
            .ok_or_else(|| format!("expected line.column, got '{s}'"))?;
        Ok(Self {
            line: line
                .parse()
                .map_err(|_| format!("invalid line number '{line}'"))?,
            column: column
                .parse()
                .map_err(|_| format!("invalid column number '{column}'"))?,
        })
    }
}

/// One instrumented block of source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CoverageRecord {
    /// Source path as the test runner reported it (usually an import path).
    pub path: String,
    pub start: Position,
    pub end: Position,
    /// Number of statements in the block.
    pub statements: u64,
    /// Execution count (0/1 in `set` mode).
    pub count: u64,
}

impl CoverageRecord {
    pub fn new(path: impl Into<String>, start: Position, end: Position, statements: u64, count: u64) -> Self {
        Self {
            path: path.into(),
            start,
            end,
            statements,
            count,
        }
    }

    pub const fn is_covered(&self) -> bool {
        self.count > 0
    }
}

impl FromStr for CoverageRecord {
    type Err = String;

    /// Parse `path:10.2,12.16 3 1`. The path is split at the last `:` so that
    /// Windows drive letters survive.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut fields = line.rsplitn(3, ' ');
        let count = fields.next().unwrap_or_default();
        let statements = fields
            .next()
            .ok_or_else(|| "expected 'path:range statements count'".to_string())?;
        let location = fields
            .next()
            .ok_or_else(|| "expected 'path:range statements count'".to_string())?;

        let (path, range) = location
            .rsplit_once(':')
            .ok_or_else(|| format!("missing ':' between path and range in '{location}'"))?;
        if path.is_empty() {
            return Err("empty source path".to_string());
        }
        let (start, end) = range
            .split_once(',')
            .ok_or_else(|| format!("expected start,end range, got '{range}'"))?;

        Ok(Self {
            path: path.to_string(),
            start: Position::parse(start)?,
            end: Position::parse(end)?,
            statements: statements
                .parse()
                .map_err(|_| format!("invalid statement count '{statements}'"))?,
            count: count
                .parse()
                .map_err(|_| format!("invalid execution count '{count}'"))?,
        })
    }
}

impl fmt::Display for CoverageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}.{},{}.{} {} {}",
            self.path,
            self.start.line,
            self.start.column,
            self.end.line,
            self.end.column,
            self.statements,
            self.count
        )
    }
}

/// A whole coverage profile: mode header plus records in file order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageProfile {
    pub mode: CoverMode,
    pub records: Vec<CoverageRecord>,
}

impl CoverageProfile {
    pub const fn new(mode: CoverMode, records: Vec<CoverageRecord>) -> Self {
        Self { mode, records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Parse profile text. The first non-blank line must be the mode header;
    /// blank lines elsewhere are ignored.
    pub fn parse(text: &str) -> Result<Self, ReportingError> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(idx, line)| (idx + 1, line.trim_end_matches('\r')))
            .filter(|(_, line)| !line.trim().is_empty());

        let (header_no, header) = lines.next().ok_or_else(|| ReportingError::ProfileParse {
            line: 1,
            message: "missing 'mode:' header".to_string(),
        })?;
        let mode = header
            .strip_prefix(MODE_PREFIX)
            .ok_or_else(|| ReportingError::ProfileParse {
                line: header_no,
                message: format!("expected 'mode:' header, got '{header}'"),
            })?
            .trim()
            .parse::<CoverMode>()
            .map_err(|message| ReportingError::ProfileParse {
                line: header_no,
                message,
            })?;

        let records = lines
            .map(|(line_no, line)| {
                line.parse::<CoverageRecord>()
                    .map_err(|message| ReportingError::ProfileParse {
                        line: line_no,
                        message,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { mode, records })
    }

    /// Serialize back to profile text, one record per line.
    pub fn render(&self) -> String {
        let mut out = format!("{MODE_PREFIX} {}\n", self.mode);
        for record in &self.records {
            out.push_str(&record.to_string());
            out.push('\n');
        }
        out
    }

    pub async fn read(path: &Path) -> Result<Self, ReportingError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ReportingError::io(path, e))?;
        Self::parse(&text)
    }

    pub async fn write(&self, path: &Path) -> Result<(), ReportingError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ReportingError::io(parent, e))?;
        }
        tokio::fs::write(path, self.render())
            .await
            .map_err(|e| ReportingError::io(path, e))
    }
}
