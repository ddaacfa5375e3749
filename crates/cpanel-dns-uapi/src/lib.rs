// # cPanel UAPI Client
//
// This crate manages ACME challenge TXT records through cPanel's UAPI.
//
// ## Flow
//
// - Login once per process; the session cookie and security token are kept
//   on the client and reused by every later call
// - Add: fetch serial → `mass_edit_zone` with `add=<json>`
// - Delete: parse zone → first matching TXT → fetch serial →
//   `mass_edit_zone` with `remove=<line_index>`
//
// Every mutating call reads the zone serial immediately beforehand. The
// serial is never cached, but nothing locks the zone either: an external
// edit between the read and the write makes cPanel reject the change.
//
// - ❌ NO retry logic (errors end the invocation)
// - ❌ NO deduplication on add
// - ❌ NO rollback on partial failure
//
// ## Security Requirements
//
// - Password and security token NEVER appear in logs or `Debug` output
//
// ## API Reference
//
// - Login: POST `/login/?login_only=1` (form: `user`, `pass`)
// - Parse zone: GET `/{token}/execute/DNS/parse_zone?zone=...`
// - Edit zone: POST `/{token}/execute/DNS/mass_edit_zone?zone=...`
//   (form: `zone`, `serial`, `add` | `remove`)

pub mod wire;

use async_trait::async_trait;
use cpanel_dns_core::traits::{ChangeResult, TxtRecordProvider};
use cpanel_dns_core::{CpanelConfig, Error, RecordMatcher, RecordRequest, Result};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, CONNECTION, HeaderMap, HeaderValue};
use serde_json::Value;
use std::time::Duration;

use wire::{AddRecordPayload, ZoneEdit, ZoneEntry};

/// Provider name used in errors and logs
pub const PROVIDER_NAME: &str = "cpanel";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// cPanel UAPI client
///
/// Holds the HTTP session and, after [`CpanelClient::login`], the security
/// token. One client serves one invocation.
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the client will:
/// - Log in and read the zone as usual
/// - Log the intended `mass_edit_zone` form
/// - **NOT** modify the zone
pub struct CpanelClient {
    /// HTTP client with cookie store
    client: reqwest::Client,

    /// `https://host:port`
    base_url: String,

    username: String,

    /// ⚠️ NEVER log this value
    password: String,

    /// Zone being edited
    zone: String,

    /// TTL for added records
    ttl: u32,

    /// Security token without its leading separator
    /// ⚠️ NEVER log this value
    security_token: Option<String>,

    /// Dry-run mode: if true, read the zone but skip edits
    dry_run: bool,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for CpanelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpanelClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("zone", &self.zone)
            .field("ttl", &self.ttl)
            .field(
                "security_token",
                &self.security_token.as_ref().map(|_| "<REDACTED>"),
            )
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CpanelClient {
    /// Create a client from configuration
    ///
    /// No request is made until [`CpanelClient::login`].
    pub fn new(config: &CpanelConfig) -> Result<Self> {
        if config.username.is_empty() || config.password.is_empty() {
            return Err(Error::config("cPanel username and password are required"));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            username: config.username.clone(),
            password: config.password.clone(),
            zone: config.zone.clone(),
            ttl: config.ttl,
            security_token: None,
            dry_run: config.dry_run,
        })
    }

    /// Point the client at another base URL (e.g. a local test server)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Whether `login` has succeeded
    pub fn is_authenticated(&self) -> bool {
        self.security_token.is_some()
    }

    /// Whether zone edits are skipped
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Log in to the dashboard and keep the security token
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /login/?login_only=1
    /// user=...&pass=...
    /// ```
    ///
    /// Response: `{"status": 1, "security_token": "/cpsess0123456789", ...}`.
    /// The leading `/` is dropped before use.
    pub async fn login(&mut self) -> Result<()> {
        tracing::debug!("Logging in to {} as {}", self.base_url, self.username);

        let response = self
            .client
            .post(format!("{}/login/", self.base_url))
            .query(&[("login_only", "1")])
            .form(&[
                ("user", self.username.as_str()),
                ("pass", self.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::http(format!("Login request failed: {}", e)))?;

        let payload = read_json(response, "login").await?;

        if !wire::login_succeeded(&payload) {
            return Err(Error::auth(payload.to_string()));
        }

        let token = payload
            .get("security_token")
            .and_then(Value::as_str)
            .and_then(wire::strip_token_prefix)
            .ok_or_else(|| Error::auth("Login response carries no usable security_token"))?;

        self.security_token = Some(token.to_string());
        tracing::info!("Logged in to cPanel as {}", self.username);
        Ok(())
    }

    /// Fetch the current zone serial
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /{token}/execute/DNS/parse_zone?zone=example.com
    /// ```
    ///
    /// The serial is read from the SOA entry at a fixed position; see
    /// [`wire::SOA_ENTRY_INDEX`].
    pub async fn get_serial(&self) -> Result<u64> {
        let entries = self.parse_zone().await?;
        let serial = wire::serial_from_zone(&entries)?;

        tracing::debug!("Zone {} serial: {}", self.zone, serial);
        Ok(serial)
    }

    /// Fetch every line of the zone as returned by `DNS::parse_zone`
    pub async fn parse_zone(&self) -> Result<Vec<ZoneEntry>> {
        tracing::debug!("Parsing zone {}", self.zone);

        let response = self
            .client
            .get(self.execute_url("parse_zone")?)
            .query(&[("zone", self.zone.as_str())])
            .send()
            .await
            .map_err(|e| Error::http(format!("parse_zone request failed: {}", e)))?;

        let payload = read_json(response, "parse_zone").await?;
        wire::zone_entries(wire::ensure_no_errors(payload)?)
    }

    /// Add a TXT record
    ///
    /// Not idempotent: the same request twice creates two records.
    pub async fn add_record(&self, request: &RecordRequest) -> Result<ChangeResult> {
        let serial = self.get_serial().await?;
        let payload = AddRecordPayload::txt(request, self.ttl);

        tracing::info!(
            "Adding TXT record {} (ttl {}) to zone {}",
            payload.dname,
            self.ttl,
            self.zone
        );

        self.mass_edit(serial, ZoneEdit::Add(payload.to_json()?))
            .await?;

        Ok(ChangeResult::Added {
            name: payload.dname,
            serial,
        })
    }

    /// Find the first TXT record matching `request` and remove it
    ///
    /// Returns `Error::NotFound` without editing the zone when nothing
    /// matches.
    pub async fn parse_and_delete(&self, request: &RecordRequest) -> Result<ChangeResult> {
        let matcher = RecordMatcher::new(request)?;
        let entries = self.parse_zone().await?;

        // Decoded lazily so entries past the match are never inspected
        let txt_records = entries
            .iter()
            .filter(|entry| entry.is_txt())
            .map(ZoneEntry::decode);

        let line_index = match matcher.find(txt_records)? {
            Some(record) => record.line_index,
            None => {
                return Err(Error::not_found(format!(
                    "no TXT record for {} containing the given token in zone {}",
                    request.fqdn(),
                    self.zone
                )));
            }
        };

        self.delete_by_index(line_index).await
    }

    /// Remove the zone line at `line_index`
    ///
    /// Fetches its own serial; nothing read earlier is reused.
    pub async fn delete_by_index(&self, line_index: u64) -> Result<ChangeResult> {
        let serial = self.get_serial().await?;

        tracing::info!("Removing line {} from zone {}", line_index, self.zone);
        self.mass_edit(serial, ZoneEdit::Remove(line_index)).await?;

        Ok(ChangeResult::Removed { line_index, serial })
    }

    /// Submit one edit against `serial`
    ///
    /// # API Call
    ///
    /// ```http
    /// POST /{token}/execute/DNS/mass_edit_zone?zone=example.com
    /// zone=example.com&serial=2021122201&remove=14
    /// ```
    async fn mass_edit(&self, serial: u64, edit: ZoneEdit) -> Result<()> {
        let (field, value) = edit.form_field();
        let form = [
            ("zone", self.zone.clone()),
            ("serial", serial.to_string()),
            (field, value),
        ];

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send mass_edit_zone for zone {} with form: {:?}",
                self.zone,
                form
            );
            return Ok(());
        }

        let response = self
            .client
            .post(self.execute_url("mass_edit_zone")?)
            .query(&[("zone", self.zone.as_str())])
            .form(&form)
            .send()
            .await
            .map_err(|e| Error::http(format!("mass_edit_zone request failed: {}", e)))?;

        let payload = read_json(response, "mass_edit_zone").await?;
        wire::ensure_no_errors(payload)?;
        Ok(())
    }

    /// URL of a `DNS` module function under the session token
    fn execute_url(&self, function: &str) -> Result<String> {
        let token = self
            .security_token
            .as_deref()
            .ok_or_else(|| Error::auth("not logged in to cPanel"))?;

        Ok(format!("{}/{}/execute/DNS/{}", self.base_url, token, function))
    }
}

/// Read a response body as JSON
///
/// cPanel answers most failures with a JSON body, so the body is parsed
/// first and the HTTP status only decides the error for non-JSON bodies.
async fn read_json(response: reqwest::Response, context: &str) -> Result<Value> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::http(format!("Failed to read {} response: {}", context, e)))?;

    match serde_json::from_str(&body) {
        Ok(payload) => Ok(payload),
        Err(e) if status.is_success() => Err(Error::provider(
            PROVIDER_NAME,
            format!("Failed to parse {} response: {}", context, e),
        )),
        Err(_) => Err(status_error(status, context, &body)),
    }
}

fn status_error(status: StatusCode, context: &str, body: &str) -> Error {
    match status.as_u16() {
        401 | 403 => Error::auth(format!(
            "{} rejected: invalid credentials or expired session. Status: {}",
            context, status
        )),
        429 => Error::rate_limited(format!(
            "Rate limit exceeded. Please retry later. Status: {}",
            status
        )),
        500..=599 => Error::provider(
            PROVIDER_NAME,
            format!("cPanel server error: {} - {}", status, body),
        ),
        _ => Error::http(format!("{} failed: {} - {}", context, status, body)),
    }
}

#[async_trait]
impl TxtRecordProvider for CpanelClient {
    async fn add_txt_record(&self, request: &RecordRequest) -> Result<ChangeResult> {
        self.add_record(request).await
    }

    async fn delete_txt_record(&self, request: &RecordRequest) -> Result<ChangeResult> {
        self.parse_and_delete(request).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}
