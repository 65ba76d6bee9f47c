//! Text utilities.

/// Split text into lines without their terminators.
///
/// Unlike `str::lines`, the result records whether the final line was
/// terminated so diffs can report a missing trailing newline.
pub fn split_lines(content: &str) -> (Vec<&str>, bool) {
    if content.is_empty() {
        return (Vec::new(), true);
    }
    let terminated = content.ends_with('\n');
    let body = if terminated {
        &content[..content.len() - 1]
    } else {
        content
    };
    (body.split('\n').collect(), terminated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_lines_tracks_terminator() {
        assert_eq!(split_lines("a\nb\n"), (vec!["a", "b"], true));
        assert_eq!(split_lines("a\nb"), (vec!["a", "b"], false));
        assert_eq!(split_lines(""), (vec![], true));
    }
}
