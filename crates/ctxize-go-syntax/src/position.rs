// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Global source positions.
//!
//! Every file added to a [`FileSet`] receives a disjoint range of [`Pos`]
//! values, so a single `Pos` identifies both a file and a byte offset within
//! it. `Pos(0)` is reserved for synthesized nodes that have no source
//! location.

use std::fmt;

/// A position in the global position space of a [`FileSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Pos(pub u32);

impl Pos {
    /// The position of synthesized nodes.
    pub const NONE: Pos = Pos(0);

    /// True for positions that came from source text.
    pub fn is_valid(self) -> bool {
        self.0 != 0
    }

    /// The position `n` bytes further on.
    pub fn add(self, n: usize) -> Pos {
        if self.is_valid() {
            Pos(self.0 + n as u32)
        } else {
            self
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Half-open range `[start, end)` of positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    /// The span of synthesized nodes.
    pub const NONE: Span = Span {
        start: Pos::NONE,
        end: Pos::NONE,
    };

    pub fn new(start: Pos, end: Pos) -> Self {
        Span { start, end }
    }

    pub fn is_valid(&self) -> bool {
        self.start.is_valid()
    }

    /// True if `pos` lies inside this span. Synthesized spans contain nothing.
    pub fn contains(&self, pos: Pos) -> bool {
        self.is_valid() && self.start <= pos && pos < self.end
    }

    /// Length in bytes.
    pub fn len(&self) -> u32 {
        self.end.0.saturating_sub(self.start.0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A resolved position: file name plus 1-indexed line and byte column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub filename: String,
    pub offset: usize,
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.filename, self.line, self.column)
    }
}

/// Bookkeeping for one file in a [`FileSet`].
#[derive(Debug, Clone)]
pub struct FileInfo {
    pub name: String,
    pub base: u32,
    pub size: u32,
    lines: Vec<u32>,
}

impl FileInfo {
    /// Position of byte `offset` of this file.
    pub fn pos(&self, offset: usize) -> Pos {
        Pos(self.base + offset as u32)
    }

    /// Byte offset of a position known to be in this file.
    pub fn offset(&self, pos: Pos) -> usize {
        (pos.0 - self.base) as usize
    }

    /// True if `pos` falls in this file's range, end of file included.
    pub fn contains(&self, pos: Pos) -> bool {
        pos.0 >= self.base && pos.0 <= self.base + self.size
    }

    /// 1-indexed line and column of a byte offset.
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset as u32;
        let idx = match self.lines.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i - 1,
        };
        (idx as u32 + 1, offset - self.lines[idx] + 1)
    }
}

/// The set of files sharing one position space.
#[derive(Debug, Clone)]
pub struct FileSet {
    files: Vec<FileInfo>,
    next_base: u32,
}

impl Default for FileSet {
    fn default() -> Self {
        FileSet::new()
    }
}

impl FileSet {
    pub fn new() -> Self {
        FileSet {
            files: Vec::new(),
            next_base: 1,
        }
    }

    /// Register a file and return its base position.
    pub fn add_file(&mut self, name: impl Into<String>, content: &str) -> u32 {
        let base = self.next_base;
        let mut lines = vec![0u32];
        lines.extend(memchr::memchr_iter(b'\n', content.as_bytes()).map(|i| i as u32 + 1));
        let size = content.len() as u32;
        self.files.push(FileInfo {
            name: name.into(),
            base,
            size,
            lines,
        });
        // +1 so the EOF position of one file never aliases the next file.
        self.next_base = base + size + 1;
        base
    }

    /// The file containing `pos`, if any.
    pub fn file(&self, pos: Pos) -> Option<&FileInfo> {
        if !pos.is_valid() {
            return None;
        }
        let idx = match self.files.binary_search_by_key(&pos.0, |f| f.base) {
            Ok(i) => i,
            Err(0) => return None,
            Err(i) => i - 1,
        };
        self.files.get(idx).filter(|f| f.contains(pos))
    }

    /// Resolve a position for diagnostics.
    pub fn position(&self, pos: Pos) -> Option<Position> {
        let file = self.file(pos)?;
        let offset = file.offset(pos);
        let (line, column) = file.line_col(offset);
        Some(Position {
            filename: file.name.clone(),
            offset,
            line,
            column,
        })
    }

    pub fn files(&self) -> &[FileInfo] {
        &self.files
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn files_get_disjoint_ranges() {
        let mut fset = FileSet::new();
        let a = fset.add_file("a.go", "package a\n");
        let b = fset.add_file("b.go", "package b\n");
        assert_eq!(a, 1);
        assert_eq!(b, 12);
        assert_eq!(fset.file(Pos(11)).map(|f| f.name.as_str()), Some("a.go"));
        assert_eq!(fset.file(Pos(12)).map(|f| f.name.as_str()), Some("b.go"));
        assert!(fset.file(Pos::NONE).is_none());
        assert!(fset.file(Pos(999)).is_none());
    }

    #[test]
    fn position_reports_line_and_column() {
        let mut fset = FileSet::new();
        fset.add_file("x.go", "package x\n\nfunc F() {}\n");
        let base = fset.add_file("y.go", "package y\nvar v int\n");
        let pos = fset.position(Pos(base + 14)).unwrap();
        assert_eq!(pos.filename, "y.go");
        assert_eq!((pos.line, pos.column), (2, 5));
        assert_eq!(pos.to_string(), "y.go:2:5");
    }

    #[test]
    fn span_contains_half_open() {
        let span = Span::new(Pos(10), Pos(15));
        assert!(span.contains(Pos(10)));
        assert!(span.contains(Pos(14)));
        assert!(!span.contains(Pos(15)));
        assert!(!Span::NONE.contains(Pos(0)));
        assert_eq!(span.len(), 5);
    }

    #[test]
    fn synthesized_positions_do_not_move() {
        assert_eq!(Pos::NONE.add(5), Pos::NONE);
        assert_eq!(Pos(3).add(5), Pos(8));
    }
}
