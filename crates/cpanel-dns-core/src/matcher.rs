// # Record Matcher
//
// Locates the TXT record a delete request refers to.
//
// A record matches when:
// - its type is TXT,
// - the request's subdomain (hostname minus registrable domain, computed
//   against the public suffix list) is a substring of the record name,
// - the request's token is a substring of the record's first data value.
//
// Matching is substring-based on purpose. It tolerates formatting
// differences (trailing dots, quoting) and can produce false positives when
// several records share overlapping fragments. The first match in zone
// order wins.

use crate::error::{Error, Result};
use crate::record::{RecordRequest, ZoneRecord};

/// Extract the subdomain part of a hostname
///
/// `_acme-challenge.example.com` → `_acme-challenge`,
/// `a.b.example.co.uk` → `a.b`, `example.com` → empty string.
///
/// Both the ICANN and the private sections of the public suffix list apply,
/// so under a private suffix the registrable domain is one label longer:
/// `_acme-challenge.foo.github.io` → `_acme-challenge`, not
/// `_acme-challenge.foo`. A shorter subdomain matches more record names.
///
/// Fails when the hostname is itself a public suffix.
pub fn subdomain_of(fqdn: &str) -> Result<&str> {
    let host = fqdn.strip_suffix('.').unwrap_or(fqdn);
    let lowered = host.to_ascii_lowercase();

    let registrable = psl::domain_str(&lowered).ok_or_else(|| {
        Error::invalid_input(format!("No registrable domain in hostname: {}", fqdn))
    })?;

    // Lowercasing is ASCII-only, so byte offsets line up with `host`.
    let prefix = &host[..host.len() - registrable.len()];
    Ok(prefix.strip_suffix('.').unwrap_or(prefix))
}

/// Matches zone records against one delete request
#[derive(Debug, Clone)]
pub struct RecordMatcher<'a> {
    subdomain: &'a str,
    token: &'a str,
}

impl<'a> RecordMatcher<'a> {
    /// Build a matcher for a request
    pub fn new(request: &'a RecordRequest) -> Result<Self> {
        Ok(Self {
            subdomain: subdomain_of(request.fqdn())?,
            token: request.token(),
        })
    }

    /// The subdomain fragment searched for in record names
    pub fn subdomain(&self) -> &str {
        self.subdomain
    }

    /// Whether a single record matches
    pub fn matches(&self, record: &ZoneRecord) -> bool {
        record.is_txt()
            && record.name.contains(self.subdomain)
            && record
                .first_value()
                .is_some_and(|value| value.contains(self.token))
    }

    /// First matching record in zone order
    ///
    /// Records are pulled one at a time and the scan stops at the first
    /// match. An error yielded before a match ends the scan; anything after
    /// the match is never read.
    pub fn find<I>(&self, records: I) -> Result<Option<ZoneRecord>>
    where
        I: IntoIterator<Item = Result<ZoneRecord>>,
    {
        for record in records {
            let record = record?;
            if self.matches(&record) {
                tracing::debug!(
                    "Matched TXT record at line {}: {}",
                    record.line_index,
                    record.name
                );
                return Ok(Some(record));
            }
        }

        tracing::debug!("No TXT record matched subdomain '{}'", self.subdomain);
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn txt(line_index: u64, name: &str, value: &str) -> ZoneRecord {
        ZoneRecord {
            line_index,
            record_type: "TXT".to_string(),
            name: name.to_string(),
            data: vec![value.to_string()],
        }
    }

    #[test]
    fn test_subdomain_extraction() {
        assert_eq!(subdomain_of("_acme-challenge.example.com").unwrap(), "_acme-challenge");
        assert_eq!(subdomain_of("_acme-challenge.example.com.").unwrap(), "_acme-challenge");
        assert_eq!(subdomain_of("a.b.example.co.uk").unwrap(), "a.b");
        assert_eq!(subdomain_of("example.com").unwrap(), "");
        assert_eq!(subdomain_of("_ACME-Challenge.Example.COM").unwrap(), "_ACME-Challenge");
    }

    #[test]
    fn test_subdomain_under_private_suffix() {
        assert_eq!(subdomain_of("_acme-challenge.foo.github.io").unwrap(), "_acme-challenge");
    }

    #[test]
    fn test_subdomain_of_bare_suffix_fails() {
        assert!(matches!(subdomain_of("co.uk"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_substring_match() {
        let request = RecordRequest::new("_acme-challenge.example.com", "abc123").unwrap();
        let matcher = RecordMatcher::new(&request).unwrap();

        assert!(matcher.matches(&txt(7, "_acme-challenge.example.com.", "abc123xyz")));
        assert!(!matcher.matches(&txt(7, "_acme-challenge.example.com.", "zzz")));
        assert!(!matcher.matches(&txt(7, "www.example.com.", "abc123")));
    }

    #[test]
    fn test_non_txt_records_never_match() {
        let request = RecordRequest::new("_acme-challenge.example.com", "abc123").unwrap();
        let matcher = RecordMatcher::new(&request).unwrap();

        let mut record = txt(3, "_acme-challenge.example.com.", "abc123");
        record.record_type = "CNAME".to_string();
        assert!(!matcher.matches(&record));
    }

    #[test]
    fn test_only_first_value_is_inspected() {
        let request = RecordRequest::new("_acme-challenge.example.com", "abc123").unwrap();
        let matcher = RecordMatcher::new(&request).unwrap();

        let mut record = txt(9, "_acme-challenge.example.com.", "other");
        record.data.push("abc123".to_string());
        assert!(!matcher.matches(&record));

        record.data.clear();
        assert!(!matcher.matches(&record));
    }

    #[test]
    fn test_first_match_wins() {
        let request = RecordRequest::new("_acme-challenge.example.com", "abc").unwrap();
        let matcher = RecordMatcher::new(&request).unwrap();

        let records = vec![
            txt(4, "www.example.com.", "abc"),
            txt(10, "_acme-challenge.example.com.", "abc-first"),
            txt(11, "_acme-challenge.example.com.", "abc-second"),
        ];

        let found = matcher.find(records.into_iter().map(Ok)).unwrap().unwrap();
        assert_eq!(found.line_index, 10);
    }

    #[test]
    fn test_apex_request_matches_any_name() {
        // Empty subdomain is a substring of every name; only the token filters.
        let request = RecordRequest::new("example.com", "verify=1").unwrap();
        let matcher = RecordMatcher::new(&request).unwrap();

        assert_eq!(matcher.subdomain(), "");
        assert!(matcher.matches(&txt(2, "mail.example.com.", "verify=1")));
    }

    #[test]
    fn test_no_match_returns_none() {
        let request = RecordRequest::new("_acme-challenge.example.com", "abc123").unwrap();
        let matcher = RecordMatcher::new(&request).unwrap();

        let records = vec![txt(5, "_acme-challenge.example.com.", "different")];
        assert!(matcher.find(records.into_iter().map(Ok)).unwrap().is_none());
    }

    #[test]
    fn test_scan_stops_at_first_match() {
        let request = RecordRequest::new("_acme-challenge.example.com", "abc123").unwrap();
        let matcher = RecordMatcher::new(&request).unwrap();

        let records = vec![
            Ok(txt(14, "_acme-challenge.example.com.", "abc123")),
            Err(Error::provider("cpanel", "undecodable entry")),
        ];

        let found = matcher.find(records).unwrap().unwrap();
        assert_eq!(found.line_index, 14);
    }

    #[test]
    fn test_error_before_match_ends_scan() {
        let request = RecordRequest::new("_acme-challenge.example.com", "abc123").unwrap();
        let matcher = RecordMatcher::new(&request).unwrap();

        let records = vec![
            Err(Error::provider("cpanel", "undecodable entry")),
            Ok(txt(14, "_acme-challenge.example.com.", "abc123")),
        ];

        assert!(matches!(matcher.find(records), Err(Error::Provider { .. })));
    }
}
