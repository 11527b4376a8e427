//! Small query helpers shared by the repositories.

/// Upper bound on bound parameters per `IN (...)` list.
///
/// SQLite caps the number of parameters per statement (`SQLITE_MAX_VARIABLE_NUMBER`,
/// 999 on older builds); 500 leaves room for the other filters in the query.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices that fit in one `IN (...)` clause.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// Escape character used with [`like_pattern`].
pub const LIKE_ESCAPE: char = '\\';

/// Builds a lower-cased `%term%` pattern for case-insensitive substring search.
///
/// Returns `None` for blank terms so callers can skip the filter. `%` and `_`
/// in the term match literally when the query uses `ESCAPE '\'`.
pub fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for ch in term.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(ch);
    }
    escaped.push('%');
    Some(escaped)
}
