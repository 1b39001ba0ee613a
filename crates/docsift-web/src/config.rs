//! Environment-driven runtime settings.

use std::path::PathBuf;
use std::time::Duration;

use docsift_core::BYTES_PER_MB;
use docsift_extractors::ToolConfig;

/// Service settings, read once at startup. A bad value aborts startup
/// instead of being silently replaced by a default.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Hard cap on the uploaded file size, enforced before extraction.
    pub max_upload_bytes: u64,
    /// Deadline for a single decode step.
    pub extract_timeout: Duration,
    /// Directory uploads are staged in while a decoder runs.
    pub scratch_dir: PathBuf,
    pub tesseract_program: String,
    pub tesseract_languages: String,
    pub antiword_program: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: `{value}` ({reason})")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let host = lookup("DOCSIFT_HOST").unwrap_or_else(|| "0.0.0.0".to_owned());
        let port = parse(lookup("DOCSIFT_PORT"), "DOCSIFT_PORT", 5002)?;
        let max_upload_bytes = parse(
            lookup("DOCSIFT_MAX_UPLOAD_BYTES"),
            "DOCSIFT_MAX_UPLOAD_BYTES",
            16 * BYTES_PER_MB,
        )?;
        if max_upload_bytes == 0 {
            return Err(ConfigError::Invalid {
                name: "DOCSIFT_MAX_UPLOAD_BYTES",
                value: "0".to_owned(),
                reason: "must be positive".to_owned(),
            });
        }
        let timeout_secs: u64 = parse(
            lookup("DOCSIFT_EXTRACT_TIMEOUT_SECS"),
            "DOCSIFT_EXTRACT_TIMEOUT_SECS",
            60,
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "DOCSIFT_EXTRACT_TIMEOUT_SECS",
                value: "0".to_owned(),
                reason: "must be positive".to_owned(),
            });
        }
        let scratch_dir = lookup("DOCSIFT_SCRATCH_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join("docsift"));

        Ok(Self {
            host,
            port,
            max_upload_bytes,
            extract_timeout: Duration::from_secs(timeout_secs),
            scratch_dir,
            tesseract_program: lookup("DOCSIFT_TESSERACT_CMD")
                .unwrap_or_else(|| "tesseract".to_owned()),
            tesseract_languages: lookup("DOCSIFT_TESSERACT_LANGS")
                .unwrap_or_else(|| "eng".to_owned()),
            antiword_program: lookup("DOCSIFT_ANTIWORD_CMD")
                .unwrap_or_else(|| "antiword".to_owned()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn tool_config(&self) -> ToolConfig {
        ToolConfig {
            tesseract_program: self.tesseract_program.clone(),
            tesseract_languages: self.tesseract_languages.clone(),
            antiword_program: self.antiword_program.clone(),
        }
    }
}

/// Human label for a byte cap, e.g. `16MB`.
pub fn size_label(bytes: u64) -> String {
    if bytes % BYTES_PER_MB == 0 {
        format!("{}MB", bytes / BYTES_PER_MB)
    } else {
        format!("{bytes} bytes")
    }
}

fn parse<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|err| ConfigError::Invalid {
            name,
            value: raw.clone(),
            reason: format!("{err}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        Config::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:5002");
        assert_eq!(config.max_upload_bytes, 16 * BYTES_PER_MB);
        assert_eq!(config.extract_timeout, Duration::from_secs(60));
        assert_eq!(config.tesseract_program, "tesseract");
        assert_eq!(config.antiword_program, "antiword");
    }

    #[test]
    fn overrides_are_honored() {
        let config = config_from(&[
            ("DOCSIFT_HOST", "127.0.0.1"),
            ("DOCSIFT_PORT", "8080"),
            ("DOCSIFT_MAX_UPLOAD_BYTES", "1048576"),
            ("DOCSIFT_EXTRACT_TIMEOUT_SECS", "5"),
            ("DOCSIFT_TESSERACT_LANGS", "eng+deu"),
        ])
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
        assert_eq!(config.max_upload_bytes, 1_048_576);
        assert_eq!(config.extract_timeout, Duration::from_secs(5));
        assert_eq!(config.tesseract_languages, "eng+deu");
    }

    #[test]
    fn malformed_numbers_fail_startup() {
        assert!(config_from(&[("DOCSIFT_PORT", "not-a-port")]).is_err());
        assert!(config_from(&[("DOCSIFT_MAX_UPLOAD_BYTES", "sixteen")]).is_err());
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(config_from(&[("DOCSIFT_MAX_UPLOAD_BYTES", "0")]).is_err());
        assert!(config_from(&[("DOCSIFT_EXTRACT_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn size_labels_read_naturally() {
        assert_eq!(size_label(16 * BYTES_PER_MB), "16MB");
        assert_eq!(size_label(BYTES_PER_MB), "1MB");
        assert_eq!(size_label(1500), "1500 bytes");
    }
}
