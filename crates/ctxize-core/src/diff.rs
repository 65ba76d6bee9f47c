//! Unified diff generation utilities.
//!
//! Produces standard unified diff format between the loaded and the rewritten
//! contents of a file. Used by `--dry-run`.

use crate::text::split_lines;

/// Number of unchanged lines shown around each change.
const CONTEXT_LINES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Equal(usize, usize),
    Delete(usize),
    Insert(usize),
}

/// Generate a unified diff for one file.
///
/// Returns an empty string when the contents are identical.
pub fn generate_unified_diff(path: &str, old: &str, new: &str) -> String {
    if old == new {
        return String::new();
    }
    let (old_lines, old_terminated) = split_lines(old);
    let (new_lines, new_terminated) = split_lines(new);
    let ops = diff_lines(&old_lines, &new_lines);

    let mut out = String::new();
    out.push_str(&format!("--- a/{}\n", path));
    out.push_str(&format!("+++ b/{}\n", path));

    for hunk in group_hunks(&ops) {
        let hunk_ops = &ops[hunk.0..hunk.1];
        let (old_start, old_len, new_start, new_len) = hunk_range(hunk_ops);
        out.push_str(&format!(
            "@@ -{} +{} @@\n",
            format_range(old_start, old_len),
            format_range(new_start, new_len)
        ));
        for op in hunk_ops {
            match *op {
                Op::Equal(i, _) => {
                    push_line(&mut out, ' ', old_lines[i]);
                    if i + 1 == old_lines.len() && !old_terminated {
                        out.push_str("\\ No newline at end of file\n");
                    }
                }
                Op::Delete(i) => {
                    push_line(&mut out, '-', old_lines[i]);
                    if i + 1 == old_lines.len() && !old_terminated {
                        out.push_str("\\ No newline at end of file\n");
                    }
                }
                Op::Insert(j) => {
                    push_line(&mut out, '+', new_lines[j]);
                    if j + 1 == new_lines.len() && !new_terminated {
                        out.push_str("\\ No newline at end of file\n");
                    }
                }
            }
        }
    }

    out
}

fn push_line(out: &mut String, marker: char, line: &str) {
    out.push(marker);
    out.push_str(line);
    out.push('\n');
}

fn format_range(start: usize, len: usize) -> String {
    match len {
        0 => format!("{},0", start),
        1 => format!("{}", start + 1),
        _ => format!("{},{}", start + 1, len),
    }
}

/// Line-level diff: common prefix and suffix are stripped, the middle is
/// solved with a longest-common-subsequence table.
fn diff_lines(old: &[&str], new: &[&str]) -> Vec<Op> {
    let prefix = old
        .iter()
        .zip(new.iter())
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = old[prefix..]
        .iter()
        .rev()
        .zip(new[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let mut ops: Vec<Op> = (0..prefix).map(|i| Op::Equal(i, i)).collect();

    let a = &old[prefix..old.len() - suffix];
    let b = &new[prefix..new.len() - suffix];
    let n = a.len();
    let m = b.len();

    // lcs[i][j] = LCS length of a[i..] and b[j..]
    let width = m + 1;
    let mut lcs = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            lcs[i * width + j] = if a[i] == b[j] {
                lcs[(i + 1) * width + j + 1] + 1
            } else {
                lcs[(i + 1) * width + j].max(lcs[i * width + j + 1])
            };
        }
    }

    let (mut i, mut j) = (0, 0);
    while i < n || j < m {
        if i < n && j < m && a[i] == b[j] {
            ops.push(Op::Equal(prefix + i, prefix + j));
            i += 1;
            j += 1;
        } else if i < n && (j == m || lcs[(i + 1) * width + j] >= lcs[i * width + j + 1]) {
            ops.push(Op::Delete(prefix + i));
            i += 1;
        } else {
            ops.push(Op::Insert(prefix + j));
            j += 1;
        }
    }

    for k in 0..suffix {
        ops.push(Op::Equal(old.len() - suffix + k, new.len() - suffix + k));
    }
    ops
}

/// Group ops into hunks as half-open index ranges into `ops`.
fn group_hunks(ops: &[Op]) -> Vec<(usize, usize)> {
    let changes: Vec<usize> = ops
        .iter()
        .enumerate()
        .filter(|(_, op)| !matches!(op, Op::Equal(..)))
        .map(|(idx, _)| idx)
        .collect();

    let mut hunks: Vec<(usize, usize)> = Vec::new();
    for idx in changes {
        let start = idx.saturating_sub(CONTEXT_LINES);
        let end = (idx + CONTEXT_LINES + 1).min(ops.len());
        match hunks.last_mut() {
            Some(last) if start <= last.1 => last.1 = end,
            _ => hunks.push((start, end)),
        }
    }
    hunks
}

/// Compute (old_start, old_len, new_start, new_len) for a hunk, 0-indexed.
fn hunk_range(ops: &[Op]) -> (usize, usize, usize, usize) {
    let mut old_start = None;
    let mut new_start = None;
    let mut old_len = 0;
    let mut new_len = 0;
    // Insert-only or delete-only hunks still need a start on the other side.
    let mut old_cursor = None;
    let mut new_cursor = None;

    for op in ops {
        match *op {
            Op::Equal(i, j) => {
                old_start.get_or_insert(i);
                new_start.get_or_insert(j);
                old_len += 1;
                new_len += 1;
                old_cursor = Some(i + 1);
                new_cursor = Some(j + 1);
            }
            Op::Delete(i) => {
                old_start.get_or_insert(i);
                old_len += 1;
                old_cursor = Some(i + 1);
            }
            Op::Insert(j) => {
                new_start.get_or_insert(j);
                new_len += 1;
                new_cursor = Some(j + 1);
            }
        }
    }

    let old_start = old_start.unwrap_or_else(|| old_cursor.unwrap_or(0));
    let new_start = new_start.unwrap_or_else(|| new_cursor.unwrap_or(0));
    (old_start, old_len, new_start, new_len)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_contents_produce_no_diff() {
        assert_eq!(generate_unified_diff("a.go", "x\n", "x\n"), "");
    }

    #[test]
    fn single_line_change() {
        let old = "package foo\n\nfunc F() {}\n";
        let new = "package foo\n\nfunc F(ctx context.Context) {}\n";
        let diff = generate_unified_diff("foo/foo.go", old, new);
        assert_eq!(
            diff,
            "--- a/foo/foo.go\n+++ b/foo/foo.go\n@@ -1,3 +1,3 @@\n package foo\n \n-func F() {}\n+func F(ctx context.Context) {}\n"
        );
    }

    #[test]
    fn inserted_lines_are_marked() {
        let old = "func bar() {\n\tfoo.F()\n}\n";
        let new = "func bar() {\n\tctx := context.TODO()\n\tfoo.F(ctx)\n}\n";
        let diff = generate_unified_diff("bar.go", old, new);
        assert!(diff.contains("@@ -1,3 +1,4 @@"));
        assert!(diff.contains("+\tctx := context.TODO()\n"));
        assert!(diff.contains("-\tfoo.F()\n"));
        assert!(diff.contains("+\tfoo.F(ctx)\n"));
        assert!(diff.contains(" func bar() {\n"));
    }

    #[test]
    fn distant_changes_make_separate_hunks() {
        let old: String = (0..20).map(|i| format!("line{}\n", i)).collect();
        let new = old
            .replace("line1\n", "LINE1\n")
            .replace("line18\n", "LINE18\n");
        let diff = generate_unified_diff("f", &old, &new);
        assert_eq!(diff.matches("@@ -").count(), 2);
    }

    #[test]
    fn missing_trailing_newline_is_reported() {
        let diff = generate_unified_diff("f", "a\nb", "a\nc");
        assert!(diff.contains("-b\n\\ No newline at end of file\n"));
        assert!(diff.contains("+c\n\\ No newline at end of file\n"));
    }

    #[test]
    fn insert_into_empty_file() {
        let diff = generate_unified_diff("f", "", "a\n");
        assert!(diff.contains("@@ -0,0 +1 @@\n+a\n"));
    }
}
