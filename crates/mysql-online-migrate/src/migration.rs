//! Migration descriptor: which table pair a copy run operates on.
//!
//! The chunker never inspects schema types. Everything it needs - quoted
//! table names, the insert column list, the typed select list, the optional
//! row filter - is precomputed here at construction time, so SQL assembly
//! in the copy loop is plain string formatting.

use crate::error::{MigrateError, Result};
use crate::identifier;

/// A table taking part in a migration, with its integer primary-key column.
#[derive(Debug, Clone)]
pub struct TableRef {
    name: String,
    primary_key: String,
}

impl TableRef {
    /// Reference a table keyed by the conventional `id` column.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_primary_key(name, "id")
    }

    /// Reference a table with an explicit primary-key column.
    pub fn with_primary_key(name: impl Into<String>, primary_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: primary_key.into(),
        }
    }

    /// Table name, unquoted.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Primary-key column name, unquoted.
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }
}

/// One copied column: its name in both tables, plus an optional origin-side
/// select expression for columns whose definition changed (e.g. a cast).
#[derive(Debug, Clone)]
pub struct CopyColumn {
    name: String,
    select_expr: Option<String>,
}

impl CopyColumn {
    /// A column copied verbatim.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            select_expr: None,
        }
    }

    /// A column copied through an explicit select expression,
    /// e.g. `CAST(`amount` AS DECIMAL(12,2))`.
    pub fn with_expr(name: impl Into<String>, select_expr: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            select_expr: Some(select_expr.into()),
        }
    }
}

/// The set of columns present (and compatible) in both origin and destination.
#[derive(Debug, Clone)]
pub struct ColumnIntersection {
    columns: Vec<CopyColumn>,
}

impl ColumnIntersection {
    pub fn new(columns: Vec<CopyColumn>) -> Self {
        Self { columns }
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Comma-joined destination column list for the INSERT side.
    pub fn joined(&self) -> Result<String> {
        let cols = self
            .columns
            .iter()
            .map(|c| identifier::quote(&c.name))
            .collect::<Result<Vec<_>>>()?;
        Ok(cols.join(", "))
    }

    /// Comma-joined origin select expressions for the SELECT side.
    ///
    /// Plain columns are qualified with the origin table; cast columns use
    /// their expression verbatim.
    pub fn typed(&self, origin: &str) -> Result<String> {
        let table = identifier::quote(origin)?;
        let cols = self
            .columns
            .iter()
            .map(|c| match &c.select_expr {
                Some(expr) => Ok(expr.clone()),
                None => Ok(format!("{}.{}", table, identifier::quote(&c.name)?)),
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(cols.join(", "))
    }
}

/// Read-only description of a single table migration, consumed by the chunker.
#[derive(Debug, Clone)]
pub struct Migration {
    origin: TableRef,
    destination: TableRef,
    conditions: Option<String>,
    origin_quoted: String,
    destination_quoted: String,
    key_quoted: String,
    insert_columns: String,
    select_columns: String,
}

impl Migration {
    /// Build a migration descriptor, validating identifiers and precomputing
    /// the SQL projections derived from the column intersection.
    pub fn new(
        origin: TableRef,
        destination: TableRef,
        intersection: ColumnIntersection,
        conditions: Option<String>,
    ) -> Result<Self> {
        if intersection.is_empty() {
            return Err(MigrateError::Config(
                "migration must copy at least one column".to_string(),
            ));
        }

        let origin_quoted = identifier::quote(origin.name())?;
        let destination_quoted = identifier::quote(destination.name())?;
        let key_quoted = identifier::quote(origin.primary_key())?;
        let insert_columns = intersection.joined()?;
        let select_columns = intersection.typed(origin.name())?;

        Ok(Self {
            origin,
            destination,
            conditions,
            origin_quoted,
            destination_quoted,
            key_quoted,
            insert_columns,
            select_columns,
        })
    }

    /// Origin table name, unquoted (for logging).
    pub fn origin_name(&self) -> &str {
        self.origin.name()
    }

    /// Destination table name, unquoted (for logging).
    pub fn destination_name(&self) -> &str {
        self.destination.name()
    }

    /// Quoted origin table for SQL text.
    pub fn origin_table(&self) -> &str {
        &self.origin_quoted
    }

    /// Quoted destination table for SQL text.
    pub fn destination_table(&self) -> &str {
        &self.destination_quoted
    }

    /// Quoted primary-key column of the origin table.
    pub fn origin_key(&self) -> &str {
        &self.key_quoted
    }

    /// Destination column list for the INSERT side of the copy.
    pub fn insert_columns(&self) -> &str {
        &self.insert_columns
    }

    /// Origin select expressions for the SELECT side of the copy.
    pub fn select_columns(&self) -> &str {
        &self.select_columns
    }

    /// Optional row filter; rows failing it are never copied.
    pub fn conditions(&self) -> Option<&str> {
        self.conditions.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn intersection() -> ColumnIntersection {
        ColumnIntersection::new(vec![
            CopyColumn::named("id"),
            CopyColumn::named("email"),
        ])
    }

    #[test]
    fn test_joined_quotes_destination_columns() {
        assert_eq!(intersection().joined().unwrap(), "`id`, `email`");
    }

    #[test]
    fn test_typed_qualifies_with_origin() {
        assert_eq!(
            intersection().typed("users").unwrap(),
            "`users`.`id`, `users`.`email`"
        );
    }

    #[test]
    fn test_typed_uses_cast_expression_verbatim() {
        let intersection = ColumnIntersection::new(vec![
            CopyColumn::named("id"),
            CopyColumn::with_expr("amount", "CAST(`users`.`amount` AS DECIMAL(12,2))"),
        ]);
        assert_eq!(
            intersection.typed("users").unwrap(),
            "`users`.`id`, CAST(`users`.`amount` AS DECIMAL(12,2))"
        );
    }

    #[test]
    fn test_migration_precomputes_projections() {
        let migration = Migration::new(
            TableRef::new("users"),
            TableRef::new("users_new"),
            intersection(),
            None,
        )
        .unwrap();

        assert_eq!(migration.origin_table(), "`users`");
        assert_eq!(migration.destination_table(), "`users_new`");
        assert_eq!(migration.origin_key(), "`id`");
        assert_eq!(migration.insert_columns(), "`id`, `email`");
        assert_eq!(migration.select_columns(), "`users`.`id`, `users`.`email`");
        assert!(migration.conditions().is_none());
    }

    #[test]
    fn test_migration_with_custom_primary_key() {
        let migration = Migration::new(
            TableRef::with_primary_key("events", "event_id"),
            TableRef::new("events_new"),
            ColumnIntersection::new(vec![CopyColumn::named("event_id")]),
            None,
        )
        .unwrap();
        assert_eq!(migration.origin_key(), "`event_id`");
    }

    #[test]
    fn test_migration_rejects_empty_intersection() {
        let result = Migration::new(
            TableRef::new("users"),
            TableRef::new("users_new"),
            ColumnIntersection::new(vec![]),
            None,
        );
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("at least one column"));
    }

    #[test]
    fn test_migration_rejects_invalid_table_name() {
        let result = Migration::new(
            TableRef::new("users\0"),
            TableRef::new("users_new"),
            intersection(),
            None,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_conditions_are_preserved() {
        let migration = Migration::new(
            TableRef::new("users"),
            TableRef::new("users_new"),
            intersection(),
            Some("`users`.`deleted_at` IS NULL".to_string()),
        )
        .unwrap();
        assert_eq!(
            migration.conditions(),
            Some("`users`.`deleted_at` IS NULL")
        );
    }
}
