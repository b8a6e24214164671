//! Identifier validation and quoting for SQL injection prevention.
//!
//! SQL identifiers (table names, column names) cannot be passed as
//! parameters in prepared statements - only data values can be parameterized.
//! To safely construct dynamic SQL with identifiers, we:
//!
//! 1. Validate identifiers for suspicious patterns (null bytes, excessive length)
//! 2. Apply MySQL backtick quoting
//! 3. Escape embedded backticks by doubling them
//!
//! This prevents SQL injection through identifier names while allowing the
//! dynamic table/column selection an online migration tool requires.

use crate::error::{MigrateError, Result};

/// Maximum identifier length (MySQL limit).
const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Validate an identifier for security issues.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes (injection vector)
/// - Identifiers exceeding maximum length
///
/// # Errors
///
/// Returns `MigrateError::Config` for invalid identifiers with a descriptive message.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(MigrateError::Config(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(MigrateError::Config(format!(
            "SECURITY: Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(MigrateError::Config(format!(
            "SECURITY: Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote a MySQL identifier using backticks.
///
/// Escapes backticks by doubling them and wraps in backticks.
/// Validates the identifier before quoting.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(quote("users")?, "`users`");
/// assert_eq!(quote("table`name")?, "`table``name`");
/// ```
pub fn quote(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("`{}`", name.replace('`', "``")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_identifier_normal() {
        assert!(validate_identifier("users").is_ok());
        assert!(validate_identifier("my_table").is_ok());
        assert!(validate_identifier("Table123").is_ok());
        assert!(validate_identifier("column with spaces").is_ok());
        assert!(validate_identifier("日本語").is_ok()); // Unicode
    }

    #[test]
    fn test_validate_identifier_rejects_empty() {
        let result = validate_identifier("");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_validate_identifier_rejects_null_byte() {
        let result = validate_identifier("table\0name");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("null byte"));
    }

    #[test]
    fn test_validate_identifier_rejects_too_long() {
        let long_name = "a".repeat(MAX_IDENTIFIER_LENGTH + 1);
        let result = validate_identifier(&long_name);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("maximum length"));
    }

    #[test]
    fn test_validate_identifier_accepts_max_length() {
        let max_name = "a".repeat(MAX_IDENTIFIER_LENGTH);
        assert!(validate_identifier(&max_name).is_ok());
    }

    #[test]
    fn test_quote_normal() {
        assert_eq!(quote("users").unwrap(), "`users`");
        assert_eq!(quote("my_table").unwrap(), "`my_table`");
    }

    #[test]
    fn test_quote_escapes_backtick() {
        assert_eq!(quote("table`name").unwrap(), "`table``name`");
        assert_eq!(quote("a`b`c").unwrap(), "`a``b``c`");
    }

    #[test]
    fn test_quote_rejects_null_byte() {
        assert!(quote("table\0name").is_err());
    }

    #[test]
    fn test_quote_sql_injection_safely_quoted() {
        let result = quote("Robert`); DROP TABLE Students;--");
        assert!(result.is_ok());
        assert_eq!(result.unwrap(), "`Robert``); DROP TABLE Students;--`");
    }
}
