//! DNS protocol plumbing used by the resolver and the prober.
//!
//! This module contains query construction, response parsing, record type
//! mapping and the network exchange over TCP or UDP.

/// Single-question query messages
pub mod message;

/// Response decoding
pub mod response;

/// Probe type <-> hickory type mapping
pub mod record_type;

/// UDP/TCP exchange and the exchange trait
pub mod exchange;

// Re-export commonly used functions and types
pub use exchange::{DnsExchange, NetworkExchange, DNS_PORT};
pub use message::{DnsQuery, MessageBuilder};
pub use record_type::RecordTypeMapper;
pub use response::DnsResponse;
