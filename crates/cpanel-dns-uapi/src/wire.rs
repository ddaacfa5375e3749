//! UAPI wire formats
//!
//! Response shapes of `/login/`, `DNS::parse_zone` and `DNS::mass_edit_zone`
//! plus the request payload for added records.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use cpanel_dns_core::record::TXT_RECORD_TYPE;
use cpanel_dns_core::{Error, RecordRequest, Result, ZoneRecord};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PROVIDER_NAME;

/// Position of the SOA record in `parse_zone`'s `data` array
///
/// cPanel does not document this ordering. The first lines of a parsed zone
/// are control/comment entries followed by the SOA record, and the serial
/// lookup depends on that staying true.
pub const SOA_ENTRY_INDEX: usize = 3;

/// Position of the serial among the SOA record's data values
/// (mname, rname, serial, refresh, ...)
pub const SOA_SERIAL_FIELD: usize = 2;

/// One line of a `DNS::parse_zone` response
///
/// Control lines and comments carry no `record_type`, so every field is
/// optional at this level.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneEntry {
    /// Line index within the zone file
    #[serde(default)]
    pub line_index: Option<u64>,

    /// Record type for `type == "record"` entries
    #[serde(default)]
    pub record_type: Option<String>,

    /// Entry kind (`record`, `control`, `comment`)
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    /// Base64-encoded domain name
    #[serde(default)]
    pub dname_b64: Option<String>,

    /// Base64-encoded data values
    #[serde(default)]
    pub data_b64: Option<Vec<String>>,
}

impl ZoneEntry {
    /// Whether this entry is a TXT record
    pub fn is_txt(&self) -> bool {
        self.record_type.as_deref() == Some(TXT_RECORD_TYPE)
    }

    /// Encoded data values (empty when absent)
    pub fn data_values(&self) -> &[String] {
        self.data_b64.as_deref().unwrap_or(&[])
    }

    /// Decode into a [`ZoneRecord`]
    pub fn decode(&self) -> Result<ZoneRecord> {
        let line_index = self
            .line_index
            .ok_or_else(|| malformed("zone entry has no line_index"))?;

        let record_type = self
            .record_type
            .clone()
            .ok_or_else(|| malformed(format!("zone entry {} has no record_type", line_index)))?;

        let name = self
            .dname_b64
            .as_deref()
            .ok_or_else(|| malformed(format!("zone entry {} has no dname_b64", line_index)))
            .and_then(decode_b64)?;

        let data = self
            .data_values()
            .iter()
            .map(|value| decode_b64(value))
            .collect::<Result<Vec<_>>>()?;

        Ok(ZoneRecord {
            line_index,
            record_type,
            name,
            data,
        })
    }
}

/// Record description submitted as the `add` field of a mass edit
#[derive(Debug, Serialize)]
pub struct AddRecordPayload<'a> {
    pub dname: String,
    pub ttl: u32,
    pub record_type: &'a str,
    pub data: [&'a str; 1],
}

impl<'a> AddRecordPayload<'a> {
    /// Describe a TXT record for `request`
    pub fn txt(request: &'a RecordRequest, ttl: u32) -> Self {
        Self {
            dname: request.absolute_name(),
            ttl,
            record_type: TXT_RECORD_TYPE,
            data: [request.token()],
        }
    }

    /// Compact JSON text, as placed in the form field
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A single zone change
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneEdit {
    /// Add the record described by this JSON text
    Add(String),
    /// Remove the record at this line index
    Remove(u64),
}

impl ZoneEdit {
    /// Form field name and value for this edit
    pub fn form_field(&self) -> (&'static str, String) {
        match self {
            ZoneEdit::Add(json) => ("add", json.clone()),
            ZoneEdit::Remove(line_index) => ("remove", line_index.to_string()),
        }
    }
}

/// Strip the leading separator from a login `security_token`
///
/// `/cpsess0123456789` → `cpsess0123456789`. Returns `None` when nothing
/// remains.
pub fn strip_token_prefix(raw: &str) -> Option<&str> {
    let mut chars = raw.chars();
    chars.next()?;
    Some(chars.as_str()).filter(|rest| !rest.is_empty())
}

/// Whether a login response reports success
pub fn login_succeeded(payload: &Value) -> bool {
    let status = payload
        .get("status")
        .and_then(|s| s.as_i64().or_else(|| s.as_bool().map(i64::from)))
        .unwrap_or(0);
    status != 0
}

/// Pass the payload through if its `errors` field is empty
///
/// `null`, a missing field and an empty array all count as empty. Anything
/// else becomes `Error::Api` carrying the whole payload.
pub fn ensure_no_errors(payload: Value) -> Result<Value> {
    let has_errors = match payload.get("errors") {
        None | Some(Value::Null) => false,
        Some(Value::Array(errors)) => !errors.is_empty(),
        Some(Value::String(message)) => !message.is_empty(),
        Some(_) => true,
    };

    if has_errors {
        Err(Error::api(payload))
    } else {
        Ok(payload)
    }
}

/// Extract the `data` array of a `parse_zone` response
pub fn zone_entries(mut payload: Value) -> Result<Vec<ZoneEntry>> {
    let data = payload
        .get_mut("data")
        .map(Value::take)
        .filter(Value::is_array)
        .ok_or_else(|| malformed("parse_zone response has no data array"))?;

    serde_json::from_value(data)
        .map_err(|e| malformed(format!("Failed to parse zone entries: {}", e)))
}

/// Read the zone serial from the SOA entry of a parsed zone
pub fn serial_from_zone(entries: &[ZoneEntry]) -> Result<u64> {
    let soa = entries.get(SOA_ENTRY_INDEX).ok_or_else(|| {
        malformed(format!(
            "parse_zone returned {} entries, no SOA at index {}",
            entries.len(),
            SOA_ENTRY_INDEX
        ))
    })?;

    if soa.record_type.as_deref() != Some("SOA") {
        tracing::warn!(
            "Zone entry {} is {:?}, not SOA; serial may be wrong",
            SOA_ENTRY_INDEX,
            soa.record_type
        );
    }

    let encoded = soa.data_values().get(SOA_SERIAL_FIELD).ok_or_else(|| {
        malformed(format!("SOA entry has no data value at {}", SOA_SERIAL_FIELD))
    })?;

    let text = decode_b64(encoded)?;
    text.trim()
        .parse()
        .map_err(|_| malformed(format!("SOA serial is not a number: {}", text)))
}

fn decode_b64(encoded: &str) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|e| malformed(format!("Invalid base64 '{}': {}", encoded, e)))?;

    String::from_utf8(bytes).map_err(|e| malformed(format!("Decoded value is not UTF-8: {}", e)))
}

fn malformed(message: impl Into<String>) -> Error {
    Error::provider(PROVIDER_NAME, message)
}
