//! Leading-keyword classification of custom query SQL.
//!
//! Deliberately not a SQL parser: the contract is "cheaply infer the HTTP
//! method and a presumed-readonly flag". Callers depend only on this module,
//! so an AST-based classifier can replace the heuristic without touching
//! them.

use crate::models::HttpMethod;

/// Derived method and mutability for a SQL statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub method: HttpMethod,
    pub is_readonly: bool,
}

/// Classify `sql` by its leading keyword.
///
/// A statement starting with `select` is served as `GET`; everything else is
/// `POST`. `is_readonly` is true for `select` statements and for any
/// statement containing the substring `pragma` (case-insensitive) anywhere —
/// intentionally permissive for introspection pragmas, and a heuristic, not
/// a security boundary.
pub fn classify(sql: &str) -> Classification {
    let lowered = sql.trim().to_lowercase();
    let is_select = lowered.starts_with("select");
    Classification {
        method: if is_select { HttpMethod::Get } else { HttpMethod::Post },
        is_readonly: is_select || lowered.contains("pragma"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_is_get_readonly() {
        let c = classify("SELECT * FROM t");
        assert_eq!(c.method, HttpMethod::Get);
        assert!(c.is_readonly);

        let c = classify("   \n select 1");
        assert_eq!(c.method, HttpMethod::Get, "leading whitespace is trimmed");
        assert!(c.is_readonly);
    }

    #[test]
    fn test_mutation_is_post() {
        let c = classify("insert into t values (1)");
        assert_eq!(c.method, HttpMethod::Post);
        assert!(!c.is_readonly);

        let c = classify("UPDATE t SET a = 1");
        assert_eq!(c.method, HttpMethod::Post);
        assert!(!c.is_readonly);
    }

    /// PRAGMA does not start with SELECT (so POST) but the substring rule
    /// marks it readonly
    #[test]
    fn test_pragma_is_post_but_readonly() {
        let c = classify("PRAGMA table_info(t)");
        assert_eq!(c.method, HttpMethod::Post);
        assert!(c.is_readonly);
    }

    /// The substring rule is deliberately permissive: merely mentioning
    /// pragma anywhere flips the flag
    #[test]
    fn test_pragma_mention_anywhere() {
        let c = classify("delete from notes where body = 'pragma'");
        assert_eq!(c.method, HttpMethod::Post);
        assert!(c.is_readonly);
    }

    #[test]
    fn test_empty_sql() {
        let c = classify("");
        assert_eq!(c.method, HttpMethod::Post);
        assert!(!c.is_readonly);
    }
}
