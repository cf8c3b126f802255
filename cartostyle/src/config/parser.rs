//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::render::RowOrder;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [engine] section
    if let Some(section) = ini.section(Some("engine")) {
        if let Some(v) = section.get("library") {
            let v = v.trim();
            config.engine.library = (!v.is_empty()).then(|| expand_tilde(v));
        }
        if let Some(v) = section.get("resource_dir") {
            let v = v.trim();
            if !v.is_empty() {
                config.engine.resource_dir = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("row_order") {
            config.engine.row_order =
                RowOrder::parse(v).ok_or_else(|| ConfigFileError::InvalidValue {
                    section: "engine".to_string(),
                    key: "row_order".to_string(),
                    value: v.to_string(),
                    reason: "must be 'top-down' or 'bottom-up'".to_string(),
                })?;
        }
        if let Some(v) = section.get("reentrant") {
            config.engine.reentrant = parse_bool("engine", "reentrant", v)?;
        }
    }

    // [render] section
    if let Some(section) = ini.section(Some("render")) {
        if let Some(v) = section.get("srs") {
            let v = v.trim();
            if !v.is_empty() {
                config.render.srs = v.to_string();
            }
        }
        if let Some(v) = section.get("background_color") {
            let v = v.trim();
            if !v.is_empty() {
                config.render.background_color = v.to_string();
            }
        }
        if let Some(v) = section.get("max_width") {
            config.render.max_width = parse_positive("render", "max_width", v, "pixels")?;
        }
        if let Some(v) = section.get("max_height") {
            config.render.max_height = parse_positive("render", "max_height", v, "pixels")?;
        }
        if let Some(v) = section.get("timeout") {
            config.render.timeout = parse_positive("render", "timeout", v, "seconds")?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn parse_positive<T>(section: &str, key: &str, value: &str, unit: &str) -> Result<T, ConfigFileError>
where
    T: FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: format!("must be a positive integer ({})", unit),
        }),
    }
}

fn parse_bool(section: &str, key: &str, value: &str) -> Result<bool, ConfigFileError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(ConfigFileError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: "must be true or false".to_string(),
        }),
    }
}

/// Expand a leading `~/` to the user's home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
