//! # dn-check Library
//!
//! A fast library for finding out which names are still unregistered across
//! a set of top-level domains, using plain DNS lookups.
//!
//! Every name is combined with every TLD and each `name.tld` is probed
//! concurrently. A name that does not exist (NXDOMAIN) is reported as
//! available; a name that resolves, even without address records, is reported
//! as taken. Lookups that fail for any other reason produce no verdict.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dn_check_lib::{CheckConfig, NameChecker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let checker = NameChecker::with_config(CheckConfig::default());
//!     let names = vec!["yahoo".to_string(), "sun4everyone".to_string()];
//!     let results = checker.run(&names, &["com".to_string()]).await?;
//!
//!     for name in &results {
//!         for verdict in &name.verdicts {
//!             println!("{}.{} : {}", name.name, verdict.tld, verdict.available);
//!         }
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Bounded concurrency**: at most `concurrency` lookups in flight
//! - **Per-lookup deadline**: a stalled lookup never holds up the run
//! - **Deterministic output**: names in input order, verdicts in TLD order
//! - **Pluggable resolver**: anything implementing [`Resolve`]

// Re-export main public API types and functions
// This makes them available as dn_check_lib::TypeName
pub use aggregate::ResultAggregator;
pub use checker::NameChecker;
pub use config::{
    load_env_config, parse_timeout, ConfigManager, DefaultsConfig, EnvConfig, FileConfig,
};
pub use error::DnCheckError;
pub use probe::{probe, ProbeReport};
pub use protocols::{classify_error, classify_response_code, DnsResolver};
pub use resolver::{FailureKind, Outcome, Resolve, TransientError};
pub use types::{
    CheckConfig, NameResult, ProbeRequest, ResolverKind, ResultSet, TldVerdict,
    DEFAULT_CONCURRENCY, DEFAULT_TIMEOUT, DEFAULT_TLD, MAX_CONCURRENCY,
};
pub use utils::{is_blank, normalize_name, read_names_file, split_names, split_tlds};

// Internal modules - these are not part of the public API
mod aggregate;
mod checker;
mod concurrent;
mod config;
mod error;
mod probe;
mod protocols;
mod resolver;
mod types;
mod utils;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DnCheckError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
