//! # Domwatch Library
//!
//! Decides whether a domain name is available for registration by asking
//! DNS directly: the authoritative nameservers of the domain's top-level
//! zone are looked up through a bootstrap server, then probed for records
//! of the domain. If none of them knows it, the domain is reported available.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use domwatch_lib::DomainChecker;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let checker = DomainChecker::new();
//!     let result = checker.check_domain("example.com").await?;
//!
//!     println!("Domain: {} - Available: {:?}", result.domain, result.available);
//!     Ok(())
//! }
//! ```
//!
//! ## Lower-level API
//!
//! [`is_domain_available`], [`resolve_nameservers`] and [`probe`] take any
//! [`DnsExchange`] and [`DiagnosticSink`], so the whole algorithm can run
//! against a scripted exchanger without touching the network.

// Re-export main public API types and functions
pub use checker::{is_domain_available, DomainChecker};
pub use config::{
    load_env_config, load_env_config_from, parse_timeout, parse_timeout_string, ConfigManager,
    DefaultsConfig, EnvConfig, FileConfig,
};
pub use diagnostics::{DiagnosticSink, MemorySink, NullSink, TracingSink};
pub use error::DomainCheckError;
pub use prober::{probe, probe_detailed, ProbeReport};
pub use protocols::{
    DnsExchange, DnsQuery, DnsResponse, MessageBuilder, NetworkExchange, RecordTypeMapper,
    DNS_PORT,
};
pub use resolver::{resolve_nameservers, top_level_zone};
pub use types::{
    parse_record_types, Availability, CheckConfig, DomainResult, RecordType, Transport,
    DEFAULT_BOOTSTRAP_SERVER, DEFAULT_EXCHANGE_TIMEOUT,
};
pub use utils::{fully_qualified, is_dns_name, load_domains_from_file, normalize_domain};

// Internal modules - these are not part of the public API
mod checker;
mod config;
mod diagnostics;
mod error;
mod prober;
mod protocols;
mod resolver;
mod types;
mod utils;

#[cfg(test)]
mod testing;

// Type alias for convenience
pub type Result<T> = std::result::Result<T, DomainCheckError>;

// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
