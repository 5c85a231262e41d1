use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path, time::Duration};

use crate::targets::{http, BasicAuth, Site};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not open config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("site must be an absolute http(s) url, got {0:?}")]
    InvalidSite(String),
    #[error("timeout_seconds must be greater than zero")]
    ZeroTimeout,
    #[error("auth is enabled but no username is set")]
    MissingUsername,
}

fn default_timeout() -> u64 {
    http::DEFAULT_TIMEOUT.as_secs()
}

#[derive(Deserialize)]
struct Auth {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    #[serde(default = "enabled_by_default")]
    enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    site: String,
    user_agent: Option<String>,
    #[serde(default = "default_timeout")]
    timeout_seconds: u64,
    auth: Option<Auth>,
}

pub struct Config {
    pub site: Site,
    pub timeout: Duration,
}

pub fn parse(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let config: RawConfig = serde_yaml::from_reader(reader)?;
    config.validate()
}

pub fn from_str(data: &str) -> Result<Config, ConfigError> {
    let config: RawConfig = serde_yaml::from_str(data)?;
    config.validate()
}

impl RawConfig {
    fn validate(self) -> Result<Config, ConfigError> {
        match reqwest::Url::parse(&self.site) {
            Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
            _ => return Err(ConfigError::InvalidSite(self.site)),
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::ZeroTimeout);
        }

        let mut site = Site::new(self.site);
        if let Some(user_agent) = self.user_agent {
            site = site.with_user_agent(user_agent);
        }
        if let Some(auth) = self.auth {
            if auth.enabled && auth.username.is_empty() {
                return Err(ConfigError::MissingUsername);
            }
            site = site.with_auth(BasicAuth {
                username: auth.username,
                password: auth.password,
                enabled: auth.enabled,
            });
        }

        Ok(Config {
            site,
            timeout: Duration::from_secs(self.timeout_seconds),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_minimal() {
        let config = from_str("site: https://blog.example.com/\n").unwrap();
        assert_eq!(config.site.url, "https://blog.example.com");
        assert_eq!(config.site.user_agent, http::default_user_agent());
        assert_eq!(config.site.auth, None);
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_full() {
        let config = from_str(
            r#"
site: https://shop.example.com
user_agent: site-monitor/2.0
timeout_seconds: 3
auth:
  username: monitor
  password: hunter2
"#,
        )
        .unwrap();
        assert_eq!(config.site.user_agent, "site-monitor/2.0");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(
            config.site.auth,
            Some(BasicAuth {
                username: "monitor".into(),
                password: "hunter2".into(),
                enabled: true,
            })
        );
    }

    #[test]
    fn test_disabled_auth_may_be_empty() {
        let config = from_str("site: http://localhost:8080\nauth:\n  enabled: false\n").unwrap();
        assert!(!config.site.auth.unwrap().enabled);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            from_str("site: blog.example.com"),
            Err(ConfigError::InvalidSite(_))
        ));
        assert!(matches!(
            from_str("site: ftp://blog.example.com"),
            Err(ConfigError::InvalidSite(_))
        ));
        assert!(matches!(
            from_str("site: https://blog.example.com\ntimeout_seconds: 0"),
            Err(ConfigError::ZeroTimeout)
        ));
        assert!(matches!(
            from_str("site: https://blog.example.com\nauth:\n  password: x"),
            Err(ConfigError::MissingUsername)
        ));
        assert!(matches!(
            from_str("site: https://blog.example.com\nlisten: 0.0.0.0:80"),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "site: https://blog.example.com").unwrap();

        let config = parse(file.path()).unwrap();
        assert_eq!(config.site.describe(), "https://blog.example.com");

        assert!(matches!(
            parse("/nonexistent/config.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
