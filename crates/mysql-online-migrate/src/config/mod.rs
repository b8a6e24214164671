//! Configuration loading and validation.

mod types;
mod validation;

pub use types::*;

use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::migration::{ColumnIntersection, CopyColumn, Migration, TableRef};
use crate::throttler::TimeThrottler;

impl Config {
    /// Load configuration from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Config = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}

impl CopyConfig {
    /// Build the migration descriptor this configuration describes.
    pub fn migration(&self) -> Result<Migration> {
        let columns = self
            .columns
            .iter()
            .map(|spec| match spec {
                ColumnSpec::Name(name) => CopyColumn::named(name),
                ColumnSpec::Cast { name, select_expr } => {
                    CopyColumn::with_expr(name, select_expr)
                }
            })
            .collect();

        Migration::new(
            TableRef::with_primary_key(&self.origin, &self.primary_key),
            TableRef::with_primary_key(&self.destination, &self.primary_key),
            ColumnIntersection::new(columns),
            self.conditions.clone(),
        )
    }

    /// Build the throttler this configuration describes.
    pub fn throttler(&self) -> TimeThrottler {
        TimeThrottler::new(self.stride, Duration::from_millis(self.throttle_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_YAML: &str = r#"
database:
  host: localhost
  database: app
  user: root
  password: secret
copy:
  origin: users
  destination: users_new
  columns:
    - id
    - email
"#;

    #[test]
    fn test_minimal_yaml_fills_defaults() {
        let config = Config::from_yaml(MINIMAL_YAML).unwrap();
        assert_eq!(config.database.port, 3306);
        assert_eq!(config.copy.primary_key, "id");
        assert_eq!(config.copy.stride, 40_000);
        assert_eq!(config.copy.throttle_ms, 100);
        assert!(config.copy.autoincrementing);
        assert!(config.copy.start.is_none());
        assert!(config.copy.limit.is_none());
    }

    #[test]
    fn test_cast_column_spec() {
        let yaml = r#"
database:
  host: localhost
  database: app
  user: root
copy:
  origin: users
  destination: users_new
  columns:
    - id
    - name: amount
      select_expr: CAST(`users`.`amount` AS DECIMAL(12,2))
"#;
        let config = Config::from_yaml(yaml).unwrap();
        let migration = config.copy.migration().unwrap();
        assert_eq!(
            migration.select_columns(),
            "`users`.`id`, CAST(`users`.`amount` AS DECIMAL(12,2))"
        );
    }

    #[test]
    fn test_invalid_yaml_is_rejected() {
        let yaml = r#"
database:
  host: localhost
"#;
        assert!(Config::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_password_not_serialized() {
        let config = Config::from_yaml(MINIMAL_YAML).unwrap();
        let yaml = serde_yaml::to_string(&config).unwrap();
        assert!(!yaml.contains("secret"), "Password was serialized: {}", yaml);
    }

    #[test]
    fn test_migration_from_config() {
        let config = Config::from_yaml(MINIMAL_YAML).unwrap();
        let migration = config.copy.migration().unwrap();
        assert_eq!(migration.origin_name(), "users");
        assert_eq!(migration.destination_name(), "users_new");
        assert_eq!(migration.insert_columns(), "`id`, `email`");
    }
}
