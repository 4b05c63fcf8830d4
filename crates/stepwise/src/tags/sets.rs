//! Order-preserving tag-set unions.

use hashbrown::HashSet;

fn normalise(tag: &str) -> String {
    let trimmed = tag.trim();
    if trimmed.starts_with('@') {
        trimmed.to_string()
    } else {
        format!("@{trimmed}")
    }
}

/// Append `additions` to `target`, normalising every tag to `@name` form and
/// keeping the first occurrence of each.
fn extend_tag_set(target: &mut Vec<String>, additions: &[String]) {
    for tag in target.iter_mut() {
        *tag = normalise(tag);
    }
    let mut seen = HashSet::new();
    target.retain(|tag| seen.insert(tag.clone()));
    for tag in additions {
        let formatted = normalise(tag);
        if seen.insert(formatted.clone()) {
            target.push(formatted);
        }
    }
}

/// Union of `base` and `additions` in first-seen order.
pub(crate) fn merge_tag_sets(base: &[String], additions: &[String]) -> Vec<String> {
    let mut merged = base.to_vec();
    extend_tag_set(&mut merged, additions);
    merged
}
