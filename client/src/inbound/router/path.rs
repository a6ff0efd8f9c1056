//! Path normalisation and `:param` pattern matching.

use std::collections::BTreeMap;

/// Strip query, fragment and trailing slashes; always starts with `/`.
pub(super) fn normalise(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();
    let trimmed = path.trim_matches('/');
    format!("/{trimmed}")
}

/// Match a normalised `path` against `pattern`, capturing `:param` segments.
pub(super) fn match_pattern(pattern: &str, path: &str) -> Option<BTreeMap<String, String>> {
    let mut pattern_segments = segments(pattern);
    let mut path_segments = segments(path);
    let mut params = BTreeMap::new();
    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return Some(params),
            (Some(expected), Some(actual)) => {
                if let Some(name) = expected.strip_prefix(':') {
                    params.insert(name.to_owned(), actual.to_owned());
                } else if expected != actual {
                    return None;
                }
            }
            _ => return None,
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}
