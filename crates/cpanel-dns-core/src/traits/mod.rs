//! Core traits for cPanel DNS management
//!
//! - [`TxtRecordProvider`]: Add and remove ACME challenge TXT records

pub mod dns_provider;

pub use dns_provider::{ChangeResult, TxtRecordProvider};
