//! XML configuration support.
//! - Loads settings from config.xml (quick_xml + serde).
//! - A missing file means "use defaults"; a malformed file or unknown field is an error.
//!
//! Example:
//! ```xml
//! <config>
//!   <log_level>info</log_level>
//!   <log_file>/var/log/ytool.log</log_file>
//!   <durability>full</durability>
//!   <http_timeout_seconds>10</http_timeout_seconds>
//!   <user_agent>ytool-ci</user_agent>
//! </config>
//! ```

use anyhow::{anyhow, Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use super::paths::default_config_path;
use super::types::{Config, LogLevel};
use crate::fs_ops::DurabilityMode;

/// Struct mirroring the XML config for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
struct XmlConfig {
    log_level: Option<String>,
    log_file: Option<String>,
    durability: Option<String>,
    #[serde(default, deserialize_with = "de_u64_trimmed_opt")]
    http_timeout_seconds: Option<u64>,
    user_agent: Option<String>,
}

// Custom deserializer that trims surrounding whitespace for optional u64
fn de_u64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|e| D::Error::custom(format!("invalid number '{s}': {e}"))),
    }
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

// Map XmlConfig -> Config
fn xml_to_config(parsed: XmlConfig) -> Result<Config> {
    let mut cfg = Config::default();

    if let Some(s) = non_empty(parsed.log_level) {
        cfg.log_level = s.parse::<LogLevel>().map_err(|e| anyhow!(e))?;
    }
    cfg.log_file = non_empty(parsed.log_file).map(PathBuf::from);
    if let Some(s) = non_empty(parsed.durability) {
        cfg.durability = s.parse::<DurabilityMode>().map_err(|e| anyhow!(e))?;
    }
    if let Some(secs) = parsed.http_timeout_seconds {
        cfg.http.timeout = Duration::from_secs(secs);
    }
    if let Some(ua) = non_empty(parsed.user_agent) {
        cfg.http.user_agent = ua;
    }
    Ok(cfg)
}

/// Load a Config from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    let parsed: XmlConfig = from_xml_str(&contents)
        .with_context(|| format!("parse config xml '{}'", path.display()))?;
    xml_to_config(parsed).with_context(|| format!("invalid value in config xml '{}'", path.display()))
}

/// Load the config from the default location; defaults if the file does not exist.
pub fn load_config() -> Result<(Config, Option<PathBuf>)> {
    let path = default_config_path()?;
    match fs::metadata(&path) {
        Ok(_) => {
            debug!(path = %path.display(), "loading config");
            Ok((load_config_from_xml_path(&path)?, Some(path)))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok((Config::default(), None)),
        Err(e) => Err(e).with_context(|| format!("stat config '{}'", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(xml: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let p = dir.path().join("config.xml");
        fs::write(&p, xml).unwrap();
        (dir, p)
    }

    #[test]
    fn full_config_parses() {
        let (_d, p) = write(
            "<config>\n  <log_level> debug </log_level>\n  <log_file>/tmp/y.log</log_file>\n  <durability>data</durability>\n  <http_timeout_seconds> 7 </http_timeout_seconds>\n  <user_agent>ua/1</user_agent>\n</config>",
        );
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/tmp/y.log")));
        assert_eq!(cfg.durability, DurabilityMode::Data);
        assert_eq!(cfg.http.timeout, Duration::from_secs(7));
        assert_eq!(cfg.http.user_agent, "ua/1");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let (_d, p) = write("<config></config>");
        let cfg = load_config_from_xml_path(&p).unwrap();
        assert_eq!(cfg.log_level, LogLevel::Normal);
        assert_eq!(cfg.durability, DurabilityMode::Full);
        assert_eq!(cfg.log_file, None);
        assert_eq!(
            cfg.http.timeout,
            Duration::from_secs(crate::config::HTTP_TIMEOUT_SECS_DEFAULT)
        );
    }

    #[test]
    fn unknown_field_is_error() {
        let (_d, p) = write("<config><download_base>/x</download_base></config>");
        assert!(load_config_from_xml_path(&p).is_err());
    }

    #[test]
    fn bad_values_are_errors() {
        let (_d, p) = write("<config><log_level>loud</log_level></config>");
        assert!(load_config_from_xml_path(&p).is_err());
        let (_d, p) = write("<config><http_timeout_seconds>soon</http_timeout_seconds></config>");
        assert!(load_config_from_xml_path(&p).is_err());
    }
}
