//! Configuration for the cPanel DNS client
//!
//! Configuration comes from a dotenv-style key-value file (`.dns-env`):
//!
//! ```text
//! # comment
//! CPANEL_DOMAIN = cpanel.example.com
//! CPANEL_PORT = 2083
//! CPANEL_USERNAME = username
//! CPANEL_PASSWORD = "p@ss word"
//! DNS_ZONE = example.com
//! RECORD_TTL = 3600  # seconds
//! ```
//!
//! Lines are read with `dotenvy` without touching the process environment.
//! Unquoted values end at whitespace and may carry a trailing `# comment`;
//! double quotes allow escapes and `$VAR` substitution, single quotes keep
//! the value literal.

use crate::error::{Error, Result};
use crate::record::validate_domain_name;
use std::collections::HashMap;
use std::io::Cursor;

/// Contents written when no configuration file exists yet
pub const ENV_TEMPLATE: &str = "
# cpanel-dns configuration file

CPANEL_DOMAIN = example.com
CPANEL_PORT = 2083
CPANEL_USERNAME = username
CPANEL_PASSWORD = password

DNS_ZONE = example.com
RECORD_TTL = 3600

# Optional
# LOG_LEVEL = info
# DRY_RUN = false
";

/// Zone name shipped in [`ENV_TEMPLATE`]
pub const PLACEHOLDER_ZONE: &str = "example.com";

const DEFAULT_PORT: u16 = 2083;
const DEFAULT_TTL: u32 = 3600;
const DEFAULT_LOG_LEVEL: &str = "info";

/// cPanel connection and zone settings
#[derive(Clone, PartialEq, Eq)]
pub struct CpanelConfig {
    /// Dashboard hostname (without scheme or port)
    pub hostname: String,
    /// Dashboard port
    pub port: u16,
    /// cPanel account username
    pub username: String,
    /// cPanel account password
    /// ⚠️ NEVER log this value
    pub password: String,
    /// DNS zone to edit
    pub zone: String,
    /// TTL for added records
    pub ttl: u32,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Read from the API but skip zone edits
    pub dry_run: bool,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for CpanelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpanelConfig")
            .field("hostname", &self.hostname)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("zone", &self.zone)
            .field("ttl", &self.ttl)
            .field("log_level", &self.log_level)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CpanelConfig {
    /// Parse configuration from dotenv-style text
    pub fn parse(contents: &str) -> Result<Self> {
        let mut values = parse_env_lines(contents)?;

        let mut required = |key: &str| {
            values
                .remove(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| Error::config(format!("{} is required", key)))
        };

        let hostname = required("CPANEL_DOMAIN")?;
        let username = required("CPANEL_USERNAME")?;
        let password = required("CPANEL_PASSWORD")?;
        let zone = required("DNS_ZONE")?;

        let port = match values.remove("CPANEL_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::config(format!("CPANEL_PORT is not a valid port: {}", raw)))?,
            None => DEFAULT_PORT,
        };

        let ttl = match values.remove("RECORD_TTL") {
            Some(raw) => raw
                .parse()
                .map_err(|_| Error::config(format!("RECORD_TTL is not a valid number: {}", raw)))?,
            None => DEFAULT_TTL,
        };

        let log_level = values
            .remove("LOG_LEVEL")
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let dry_run = match values.remove("DRY_RUN") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| Error::config(format!("DRY_RUN must be true or false: {}", raw)))?,
            None => false,
        };

        for key in values.keys() {
            tracing::warn!("Ignoring unknown configuration key: {}", key);
        }

        Ok(Self {
            hostname,
            port,
            username,
            password,
            zone,
            ttl,
            log_level,
            dry_run,
        })
    }

    /// Whether the configuration still carries the template zone
    pub fn is_default(&self) -> bool {
        self.zone == PLACEHOLDER_ZONE
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        validate_domain_name(&self.hostname)
            .map_err(|e| Error::config(format!("CPANEL_DOMAIN is invalid: {}", e)))?;

        validate_domain_name(&self.zone)
            .map_err(|e| Error::config(format!("DNS_ZONE is invalid: {}", e)))?;

        if self.port == 0 {
            return Err(Error::config("CPANEL_PORT must be greater than 0"));
        }

        if self.ttl == 0 {
            return Err(Error::config("RECORD_TTL must be greater than 0"));
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(Error::config(format!(
                    "LOG_LEVEL '{}' is not valid. \
                    Valid levels: trace, debug, info, warn, error",
                    self.log_level
                )));
            }
        }

        Ok(())
    }

    /// Base URL of the dashboard
    pub fn base_url(&self) -> String {
        format!("https://{}:{}", self.hostname, self.port)
    }

    /// Password with every character replaced by `*`
    pub fn masked_password(&self) -> String {
        "*".repeat(self.password.chars().count())
    }
}

/// Split dotenv-style text into key/value pairs
fn parse_env_lines(contents: &str) -> Result<HashMap<String, String>> {
    dotenvy::from_read_iter(Cursor::new(contents))
        .map(|item| item.map_err(|e| Error::config(format!("Malformed configuration: {}", e))))
        .collect()
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
