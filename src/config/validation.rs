use crate::config::types::{CatalogConfig, Config, HttpConfig, OutputConfig, OutputMode};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_catalog_config(&config.catalog)?;
    validate_http_config(&config.http)?;
    validate_output_config(&config.output)?;
    validate_database_config(config)?;
    Ok(())
}

/// Validates the catalog location
fn validate_catalog_config(config: &CatalogConfig) -> Result<(), ConfigError> {
    let url = config
        .first_page_url()
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid catalog URL: {}", e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidUrl(format!(
            "Catalog URL '{}' must use http or https",
            url
        )));
    }

    if config.start_url.is_none() && config.app_id == 0 {
        return Err(ConfigError::Validation(
            "app_id must be set when start_url is not given".to_string(),
        ));
    }

    Ok(())
}

fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }
    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.mode == OutputMode::File && config.sql_file.is_empty() {
        return Err(ConfigError::Validation(
            "sql_file cannot be empty in file mode".to_string(),
        ));
    }

    validate_table_name(&config.table)
}

/// Database settings are only needed for direct writes
fn validate_database_config(config: &Config) -> Result<(), ConfigError> {
    if config.output.mode != OutputMode::Database {
        return Ok(());
    }

    match &config.database {
        None => Err(ConfigError::Validation(
            "[database] section is required in database mode".to_string(),
        )),
        Some(db) if db.path.is_empty() => Err(ConfigError::Validation(
            "database path cannot be empty".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

/// The table name is spliced into SQL text, so only plain identifiers are accepted
fn validate_table_name(table: &str) -> Result<(), ConfigError> {
    if table.is_empty() {
        return Err(ConfigError::Validation(
            "table cannot be empty".to_string(),
        ));
    }

    if table.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(ConfigError::Validation(format!(
            "table '{}' cannot start with a digit",
            table
        )));
    }

    if !table.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ConfigError::Validation(format!(
            "table must contain only ASCII letters, digits and underscores, got '{}'",
            table
        )));
    }

    Ok(())
}
