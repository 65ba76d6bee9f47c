// Copyright (c) Ken Kocienda and other contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Node identity and comment attachment shared by all node types.

use std::fmt;

use crate::position::Pos;

// ============================================================================
// NodeId
// ============================================================================

/// Identity of a function or call node within one parsed file.
///
/// Ids are assigned in parse order starting at 1. Nodes built outside the
/// parser (or parsed detached from any file) carry [`NodeId::NONE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeId(pub u32);

impl NodeId {
    pub const NONE: NodeId = NodeId(0);

    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }

    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// ============================================================================
// Comments
// ============================================================================

/// A single `//` or `/* */` comment, text included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub pos: Pos,
    /// Source line, used to keep comments that shared a line together.
    pub line: u32,
}

/// Comments on adjacent lines, printed as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommentGroup {
    pub list: Vec<Comment>,
    /// A blank line separated this group from what came before it.
    pub blank_before: bool,
    /// A blank line separates this group from what follows it.
    pub blank_after: bool,
}

impl CommentGroup {
    /// A single-comment group, for synthesized code.
    pub fn line(text: impl Into<String>) -> Self {
        CommentGroup {
            list: vec![Comment {
                text: text.into(),
                pos: Pos::NONE,
                line: 0,
            }],
            blank_before: false,
            blank_after: false,
        }
    }

    /// Comment text with markers removed, one entry per line.
    pub fn text(&self) -> String {
        let mut lines = Vec::new();
        for c in &self.list {
            if let Some(rest) = c.text.strip_prefix("//") {
                lines.push(rest.strip_prefix(' ').unwrap_or(rest).to_string());
            } else {
                let inner = c
                    .text
                    .trim_start_matches("/*")
                    .trim_end_matches("*/")
                    .trim();
                lines.push(inner.to_string());
            }
        }
        lines.join("\n")
    }
}

/// Comments attached to a node: groups above it and one on its last line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Comments {
    pub leading: Vec<CommentGroup>,
    pub trailing: Option<CommentGroup>,
}

impl Comments {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_none()
    }

    /// True if any leading group is a directive such as `//go:build ignore`.
    pub fn has_directive(&self, directive: &str) -> bool {
        self.leading
            .iter()
            .flat_map(|g| g.list.iter())
            .any(|c| c.text.trim_end() == directive)
    }
}
