//! Common types shared between the error and output modules.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Location Type
// ============================================================================

/// Location in a source file.
///
/// - `file`: path relative to the working directory when possible
/// - `line`: 1-indexed line number
/// - `col`: 1-indexed column, UTF-8 bytes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    /// File path.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed, UTF-8 bytes).
    pub col: u32,
}

impl Location {
    /// Create a new location.
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
        }
    }

    /// Parse a location from "path:line:col" format.
    ///
    /// Robust against paths containing colons.
    pub fn parse(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.rsplitn(3, ':').collect();
        if parts.len() != 3 {
            return None;
        }
        let col: u32 = parts[0].parse().ok()?;
        let line: u32 = parts[1].parse().ok()?;
        Some(Location::new(parts[2], line, col))
    }

    fn sort_key(&self) -> (&str, u32, u32) {
        (&self.file, self.line, self.col)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

impl PartialOrd for Location {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Location {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display_round_trip() {
        let loc = Location::parse("src/a:b.go:12:3").unwrap();
        assert_eq!(loc.file, "src/a:b.go");
        assert_eq!(loc.line, 12);
        assert_eq!(loc.col, 3);
        assert_eq!(loc.to_string(), "src/a:b.go:12:3");
    }

    #[test]
    fn parse_rejects_missing_column() {
        assert!(Location::parse("a.go:12").is_none());
    }

    #[test]
    fn ordering_is_file_line_col() {
        let mut locs = vec![
            Location::new("b.go", 1, 1),
            Location::new("a.go", 9, 1),
            Location::new("a.go", 2, 7),
        ];
        locs.sort();
        assert_eq!(locs[0], Location::new("a.go", 2, 7));
        assert_eq!(locs[2], Location::new("b.go", 1, 1));
    }
}
