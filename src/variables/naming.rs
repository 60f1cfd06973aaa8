use ahash::AHashSet;

/// Fallback for names that sanitize to nothing.
pub const DEFAULT_VARIABLE_NAME: &str = "newVariable";
/// Names starting with this are reserved for internal variables.
pub const RESERVED_PREFIX: &str = "__";

pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}

/// Turns arbitrary user text into an identifier.
///
/// Whitespace and dashes become underscores, anything else outside
/// `[A-Za-z0-9_]` is dropped, and a leading digit gets an underscore prefix.
pub fn sanitize_identifier(name: &str) -> String {
    let mut out: String = name
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '_' => Some(c),
            c if c.is_whitespace() || c == '-' => Some('_'),
            _ => None,
        })
        .collect();
    if out.is_empty() {
        return DEFAULT_VARIABLE_NAME.to_string();
    }
    if out.starts_with(|c: char| c.is_ascii_digit()) {
        out.insert(0, '_');
    }
    out
}

/// Returns `name` if it is not taken, otherwise bumps its numeric suffix
/// until it is: `score` becomes `score_1`, `count_1` becomes `count_2`.
pub fn unique_name(name: &str, taken: &AHashSet<String>) -> String {
    let mut candidate = name.to_string();
    while taken.contains(&candidate) {
        candidate = increment_suffix(&candidate);
    }
    candidate
}

/// Increments a trailing number, or appends `_1` when there is none.
pub fn increment_suffix(name: &str) -> String {
    let stem = name.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &name[stem.len()..];
    match digits.parse::<u64>() {
        Ok(n) if !digits.is_empty() => match n.checked_add(1) {
            Some(next) => format!("{}{}", stem, next),
            None => format!("{}_1", name),
        },
        _ => format!("{}_1", name),
    }
}
