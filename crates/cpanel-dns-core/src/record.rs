//! Record types shared by the matcher and the UAPI client

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Record type string used for ACME challenge records
pub const TXT_RECORD_TYPE: &str = "TXT";

/// An add/delete intent: target hostname plus token value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRequest {
    fqdn: String,
    token: String,
}

impl RecordRequest {
    /// Create a validated request
    ///
    /// A single trailing dot on `fqdn` is accepted and dropped.
    pub fn new(fqdn: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let fqdn = fqdn.into();
        let fqdn = fqdn.strip_suffix('.').unwrap_or(&fqdn).to_string();
        let token = token.into();

        validate_domain_name(&fqdn)?;

        if token.is_empty() {
            return Err(Error::invalid_input("Token value cannot be empty"));
        }

        Ok(Self { fqdn, token })
    }

    /// The hostname without trailing dot
    pub fn fqdn(&self) -> &str {
        &self.fqdn
    }

    /// The TXT payload
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The hostname with a trailing dot, as cPanel expects for `dname`
    pub fn absolute_name(&self) -> String {
        format!("{}.", self.fqdn)
    }
}

/// A decoded entry of a parsed zone
///
/// `line_index` is the positional identifier cPanel uses as the target of
/// a `remove` edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRecord {
    /// Line index within the zone file
    pub line_index: u64,
    /// Record type (A, TXT, SOA, ...)
    pub record_type: String,
    /// Decoded domain name, usually absolute (`_acme-challenge.example.com.`)
    pub name: String,
    /// Decoded data values
    pub data: Vec<String>,
}

impl ZoneRecord {
    /// Whether this is a TXT record
    pub fn is_txt(&self) -> bool {
        self.record_type == TXT_RECORD_TYPE
    }

    /// First data value, if any
    pub fn first_value(&self) -> Option<&str> {
        self.data.first().map(String::as_str)
    }
}

/// Validate that a string is a usable DNS hostname
///
/// Basic RFC 1035 checks. Underscores are allowed because ACME challenge
/// labels start with one.
pub fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        return Err(Error::invalid_input("Domain name cannot be empty"));
    }

    // RFC 1035: 253 chars max
    if domain.len() > 253 {
        return Err(Error::invalid_input(format!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        )));
    }

    for label in domain.split('.') {
        if label.is_empty() {
            return Err(Error::invalid_input(format!(
                "Domain name has empty label: '{}'",
                domain
            )));
        }

        if label.len() > 63 {
            return Err(Error::invalid_input(format!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            )));
        }

        if !label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(Error::invalid_input(format!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric, hyphen and underscore only.",
                label
            )));
        }

        if label.starts_with('-') || label.ends_with('-') {
            return Err(Error::invalid_input(format!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_drops_trailing_dot() {
        let request = RecordRequest::new("_acme-challenge.example.com.", "abc123").unwrap();
        assert_eq!(request.fqdn(), "_acme-challenge.example.com");
        assert_eq!(request.absolute_name(), "_acme-challenge.example.com.");
    }

    #[test]
    fn test_request_rejects_empty_token() {
        let result = RecordRequest::new("_acme-challenge.example.com", "");
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_domain_validation() {
        assert!(validate_domain_name("_acme-challenge.example.com").is_ok());
        assert!(validate_domain_name("www.example.co.uk").is_ok());

        assert!(validate_domain_name("").is_err());
        assert!(validate_domain_name("example..com").is_err());
        assert!(validate_domain_name("-bad.example.com").is_err());
        assert!(validate_domain_name("sp ace.example.com").is_err());
        assert!(validate_domain_name(&"a".repeat(64)).is_err());
    }

    #[test]
    fn test_zone_record_helpers() {
        let record = ZoneRecord {
            line_index: 12,
            record_type: "TXT".to_string(),
            name: "_acme-challenge.example.com.".to_string(),
            data: vec!["abc123".to_string()],
        };

        assert!(record.is_txt());
        assert_eq!(record.first_value(), Some("abc123"));

        let soa = ZoneRecord {
            record_type: "SOA".to_string(),
            data: Vec::new(),
            ..record
        };
        assert!(!soa.is_txt());
        assert_eq!(soa.first_value(), None);
    }
}
