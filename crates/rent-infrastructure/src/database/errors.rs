//! sqlx error mapping

use rent_core::error::DomainError;
use tracing::error;

/// Logs and wraps a storage fault.
pub(crate) fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("Database error {}: {}", context, e);
    DomainError::DatabaseError(e.to_string())
}

/// Maps a unique violation on a known constraint to `Conflict`.
pub(crate) fn write_error(
    context: &str,
    e: sqlx::Error,
    conflicts: &[(&str, &'static str, &str)],
) -> DomainError {
    if let Some(db) = e.as_database_error() {
        if db.is_unique_violation() {
            let constraint = db.constraint().unwrap_or_default();
            if let Some((_, field, value)) = conflicts.iter().find(|(name, _, _)| *name == constraint) {
                return DomainError::conflict(field, *value);
            }
        }
    }
    db_error(context, e)
}

/// `%term%` for ILIKE with wildcards in the term escaped.
pub(crate) fn like_pattern(term: Option<&str>) -> Option<String> {
    let term = term.map(str::trim).filter(|t| !t.is_empty())?;
    let escaped = term.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
    Some(format!("%{}%", escaped))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern(Some(" 50%_off ")).as_deref(), Some("%50\\%\\_off%"));
        assert_eq!(like_pattern(Some("  ")), None);
        assert_eq!(like_pattern(None), None);
    }
}
