//! Protocol implementations behind the [`crate::Resolve`] seam.

/// DNS lookups via hickory-resolver
pub mod dns;

pub use dns::{classify_error, classify_response_code, DnsResolver};
