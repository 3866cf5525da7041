//! Post-processing shared by every format

/// Drop blank and whitespace-only lines, rejoining the rest with `\n`
///
/// Kept lines are otherwise untouched apart from a trailing `\r`, so quotes
/// taken from the text still match it literally.
pub fn drop_blank_lines(raw: &str) -> String {
    raw.split('\n')
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
