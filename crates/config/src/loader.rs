//! Config loading and `path.to.key=value` overrides.

use std::{fs, path::Path};

use toml::{value::Table, Value};

use crate::{config::Config, errors::ConfigError};

/// Loads the config at `path`, applies the overrides in order, and validates the result.
pub fn load_config(path: &Path, overrides: &[String]) -> Result<Config, ConfigError> {
    let config_str = fs::read_to_string(path)?;
    parse_config(&config_str, overrides)
}

/// Like [`load_config`], for a config already in memory. An empty string gives the defaults.
pub fn parse_config(config_str: &str, overrides: &[String]) -> Result<Config, ConfigError> {
    let mut config_toml: Value = toml::from_str(config_str)?;

    let overrides = overrides
        .iter()
        .map(|o| parse_override(o))
        .collect::<Result<Vec<_>, ConfigError>>()?;

    let table = config_toml
        .as_table_mut()
        .ok_or(ConfigError::TraverseNonTableAt {
            key: "<root>".to_string(),
            path: "".to_string(),
        })?;

    for (path, val) in overrides {
        apply_override(&path, val, table)?;
    }

    let config = config_toml.try_into::<Config>()?;
    config.validate()?;
    Ok(config)
}

/// Parses `a.b.c=value` into its path and a TOML value.
///
/// The value is read as a TOML scalar (so `8`, `true` and `"x"` keep their types) and falls back
/// to a bare string.
pub fn parse_override(s: &str) -> Result<(String, Value), ConfigError> {
    let (path, raw) = s
        .split_once('=')
        .ok_or_else(|| ConfigError::InvalidOverride(s.to_string()))?;
    let path = path.trim();
    let raw = raw.trim();
    if path.is_empty() || path.split('.').any(str::is_empty) {
        return Err(ConfigError::InvalidOverride(s.to_string()));
    }

    let value = toml::from_str::<Table>(&format!("v = {raw}"))
        .ok()
        .and_then(|mut t| t.remove("v"))
        .unwrap_or_else(|| Value::String(raw.to_string()));

    Ok((path.to_string(), value))
}

/// Sets `value` at the dotted `path`, creating missing intermediate tables.
pub fn apply_override(path: &str, value: Value, table: &mut Table) -> Result<(), ConfigError> {
    let mut parts = path.split('.').peekable();
    let mut cur = table;
    let mut traversed = String::new();

    while let Some(key) = parts.next() {
        if parts.peek().is_none() {
            cur.insert(key.to_string(), value);
            return Ok(());
        }

        let next = cur
            .entry(key.to_string())
            .or_insert(Value::Table(Table::new()));
        cur = next
            .as_table_mut()
            .ok_or_else(|| ConfigError::TraverseNonTableAt {
                key: key.to_string(),
                path: traversed.clone(),
            })?;

        if !traversed.is_empty() {
            traversed.push('.');
        }
        traversed.push_str(key);
    }

    Err(ConfigError::MissingKey(path.to_string()))
}
