//! Splitting raw `| a | b |` rows into cells.

/// Split a table row into trimmed cells.
///
/// The leading pipe and anything after the final pipe are dropped when
/// empty. `\|`, `\\` and `\n` are unescaped; other backslashes are kept.
pub(super) fn split_cells(row: &str) -> Vec<String> {
    let body = row.trim();
    let body = body.strip_prefix('|').unwrap_or(body);
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some('|') => cell.push('|'),
                Some('\\') => cell.push('\\'),
                Some('n') => cell.push('\n'),
                Some(other) => {
                    cell.push('\\');
                    cell.push(other);
                }
                None => cell.push('\\'),
            },
            '|' => cells.push(std::mem::take(&mut cell).trim().to_string()),
            other => cell.push(other),
        }
    }
    let tail = cell.trim();
    if !tail.is_empty() {
        cells.push(tail.to_string());
    }
    cells
}
