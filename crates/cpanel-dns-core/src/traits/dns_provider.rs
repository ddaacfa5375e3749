// # TXT Record Provider Trait
//
// Defines the interface for publishing and withdrawing ACME DNS-01
// challenge records.
//
// ## Implementations
//
// - cPanel UAPI: `cpanel-dns-uapi` crate
//
// ## Usage
//
// ```rust,ignore
// use cpanel_dns_core::{RecordRequest, TxtRecordProvider};
//
// async fn publish(provider: &dyn TxtRecordProvider) -> cpanel_dns_core::Result<()> {
//     let request = RecordRequest::new("_acme-challenge.example.com", "DGyRejmCefe7v4Nf")?;
//     provider.add_txt_record(&request).await?;
//     Ok(())
// }
// ```

use crate::record::RecordRequest;
use async_trait::async_trait;
use serde::Serialize;

/// Result of a zone change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ChangeResult {
    /// A TXT record was added
    Added {
        /// Absolute record name that was submitted
        name: String,
        /// Zone serial the edit was submitted against
        serial: u64,
    },
    /// A record was removed by line index
    Removed {
        /// Line index of the removed record
        line_index: u64,
        /// Zone serial the edit was submitted against
        serial: u64,
    },
}

/// Trait for TXT record provider implementations
///
/// Each call is a single logical operation: implementations read whatever
/// zone state they need (e.g. the serial) inside the call and never reuse
/// it across calls.
///
/// # Idempotency
///
/// `add_txt_record` is NOT idempotent. Adding the same name/token twice
/// creates two records.
///
/// # Retries
///
/// Implementations return errors instead of retrying.
#[async_trait]
pub trait TxtRecordProvider: Send + Sync {
    /// Add a TXT record for `request`
    async fn add_txt_record(&self, request: &RecordRequest) -> Result<ChangeResult, crate::Error>;

    /// Remove the first TXT record matching `request`
    ///
    /// Returns `Error::NotFound` when nothing matches; no change is made then.
    async fn delete_txt_record(
        &self,
        request: &RecordRequest,
    ) -> Result<ChangeResult, crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
