// # cpanel-dns-core
//
// Core library for managing ACME challenge TXT records on cPanel zones.
//
// ## Architecture Overview
//
// - **TxtRecordProvider**: Trait for adding/removing TXT records
// - **RecordMatcher**: Locates the TXT record a delete request refers to
// - **CpanelConfig**: Dashboard, credential and zone settings
// - **Error**: Error taxonomy shared by every crate in the workspace
//
// The HTTP client for cPanel's UAPI lives in `cpanel-dns-uapi`.

pub mod config;
pub mod error;
pub mod matcher;
pub mod record;
pub mod traits;

// Re-export core types for convenience
pub use config::CpanelConfig;
pub use error::{Error, Result};
pub use matcher::RecordMatcher;
pub use record::{RecordRequest, ZoneRecord};
pub use traits::{ChangeResult, TxtRecordProvider};
