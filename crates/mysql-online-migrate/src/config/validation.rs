//! Configuration validation.

use super::Config;
use crate::error::{MigrateError, Result};

/// Validate the configuration.
pub fn validate(config: &Config) -> Result<()> {
    // Database validation
    if config.database.host.is_empty() {
        return Err(MigrateError::Config("database.host is required".into()));
    }
    if config.database.database.is_empty() {
        return Err(MigrateError::Config("database.database is required".into()));
    }
    if config.database.user.is_empty() {
        return Err(MigrateError::Config("database.user is required".into()));
    }
    if config.database.max_connections == 0 {
        return Err(MigrateError::Config(
            "database.max_connections must be at least 1".into(),
        ));
    }

    // Copy validation
    if config.copy.origin.is_empty() {
        return Err(MigrateError::Config("copy.origin is required".into()));
    }
    if config.copy.destination.is_empty() {
        return Err(MigrateError::Config("copy.destination is required".into()));
    }
    if config.copy.origin == config.copy.destination {
        return Err(MigrateError::Config(
            "copy.origin and copy.destination cannot be the same table".into(),
        ));
    }
    if config.copy.columns.is_empty() {
        return Err(MigrateError::Config(
            "copy.columns must name at least one column".into(),
        ));
    }
    if config.copy.stride == 0 {
        return Err(MigrateError::Config("copy.stride must be at least 1".into()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ColumnSpec, CopyConfig, DatabaseConfig};

    fn valid_config() -> Config {
        Config {
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 3306,
                database: "app".to_string(),
                user: "root".to_string(),
                password: "password".to_string(),
                max_connections: 4,
            },
            copy: CopyConfig {
                origin: "users".to_string(),
                destination: "users_new".to_string(),
                primary_key: "id".to_string(),
                columns: vec![
                    ColumnSpec::Name("id".to_string()),
                    ColumnSpec::Name("email".to_string()),
                ],
                conditions: None,
                start: None,
                limit: None,
                autoincrementing: true,
                stride: 40_000,
                throttle_ms: 100,
            },
        }
    }

    #[test]
    fn test_valid_config() {
        let config = valid_config();
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_missing_host() {
        let mut config = valid_config();
        config.database.host = "".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_missing_user() {
        let mut config = valid_config();
        config.database.user = "".to_string();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_same_origin_and_destination() {
        let mut config = valid_config();
        config.copy.destination = "users".to_string();
        let err = validate(&config).unwrap_err();
        assert!(err.to_string().contains("same table"));
    }

    #[test]
    fn test_empty_columns() {
        let mut config = valid_config();
        config.copy.columns.clear();
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_stride() {
        let mut config = valid_config();
        config.copy.stride = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_max_connections() {
        let mut config = valid_config();
        config.database.max_connections = 0;
        assert!(validate(&config).is_err());
    }
}
