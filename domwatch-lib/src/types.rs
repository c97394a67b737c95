//! Core data types for domain availability checking.
//!
//! This module defines the values that flow through a check: the transport
//! and record types selected by the caller, the checker configuration, and
//! the per-domain result.

use crate::error::DomainCheckError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Bootstrap server asked for the NS records of a top-level zone.
pub const DEFAULT_BOOTSTRAP_SERVER: &str = "8.8.8.8";

/// Per-exchange timeout used when none is configured.
pub const DEFAULT_EXCHANGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Protocol carrying DNS queries and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Transport {
    #[default]
    Tcp,
    Udp,
}

impl Transport {
    pub fn as_str(&self) -> &'static str {
        match self {
            Transport::Tcp => "tcp",
            Transport::Udp => "udp",
        }
    }
}

impl FromStr for Transport {
    type Err = DomainCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "tcp" => Ok(Transport::Tcp),
            "udp" => Ok(Transport::Udp),
            other => Err(DomainCheckError::config(format!(
                "Unknown transport '{}', use 'tcp' or 'udp'",
                other
            ))),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DNS record types that can be used as existence probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    A,
    NS,
    CNAME,
    SOA,
    PTR,
    MX,
    TXT,
    AAAA,
    LOC,
    SRV,
    SPF,
}

impl RecordType {
    /// Every supported probe type, in IANA code order.
    pub const ALL: [RecordType; 11] = [
        RecordType::A,
        RecordType::NS,
        RecordType::CNAME,
        RecordType::SOA,
        RecordType::PTR,
        RecordType::MX,
        RecordType::TXT,
        RecordType::AAAA,
        RecordType::LOC,
        RecordType::SRV,
        RecordType::SPF,
    ];

    /// IANA resource record type code.
    pub fn code(&self) -> u16 {
        match self {
            RecordType::A => 1,
            RecordType::NS => 2,
            RecordType::CNAME => 5,
            RecordType::SOA => 6,
            RecordType::PTR => 12,
            RecordType::MX => 15,
            RecordType::TXT => 16,
            RecordType::AAAA => 28,
            RecordType::LOC => 29,
            RecordType::SRV => 33,
            RecordType::SPF => 99,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::A => "A",
            RecordType::NS => "NS",
            RecordType::CNAME => "CNAME",
            RecordType::SOA => "SOA",
            RecordType::PTR => "PTR",
            RecordType::MX => "MX",
            RecordType::TXT => "TXT",
            RecordType::AAAA => "AAAA",
            RecordType::LOC => "LOC",
            RecordType::SRV => "SRV",
            RecordType::SPF => "SPF",
        }
    }

    /// Types probed when the caller does not pick any: NS, then SOA.
    pub fn default_set() -> Vec<RecordType> {
        vec![RecordType::NS, RecordType::SOA]
    }
}

impl FromStr for RecordType {
    type Err = DomainCheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        RecordType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == wanted)
            .ok_or_else(|| {
                DomainCheckError::config(format!(
                    "Unknown record type '{}'. Supported: {}",
                    s.trim(),
                    RecordType::ALL
                        .iter()
                        .map(|t| t.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse record type names, dropping duplicates while keeping first-seen order.
///
/// An empty input yields an empty list; callers decide whether that is an error.
pub fn parse_record_types<S: AsRef<str>>(names: &[S]) -> Result<Vec<RecordType>, DomainCheckError> {
    let mut types = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref();
        if name.trim().is_empty() {
            continue;
        }
        let record_type = name.parse::<RecordType>()?;
        if !types.contains(&record_type) {
            types.push(record_type);
        }
    }
    Ok(types)
}

/// Outcome of probing a domain's authoritative nameservers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// Every exchange completed and none returned answer or authority data
    Available,

    /// At least one nameserver returned answer or authority data
    Registered,

    /// No exchange succeeded, so the "available" verdict carries no evidence
    Indeterminate,

    /// The check could not be performed (see the error message)
    Unknown,
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Availability::Available => write!(f, "Available"),
            Availability::Registered => write!(f, "Registered"),
            Availability::Indeterminate => write!(f, "Indeterminate"),
            Availability::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Result of a domain availability check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainResult {
    /// The domain name that was checked (e.g., "example.com")
    pub domain: String,

    /// Whether the domain is available for registration.
    /// - `Some(true)`: no nameserver knows the domain
    /// - `Some(false)`: the domain is delegated/registered
    /// - `None`: the check failed, see `error_message`
    pub available: Option<bool>,

    /// Finer-grained verdict distinguishing "no evidence" from "all queries failed"
    pub status: Availability,

    /// Authoritative nameservers of the top-level zone that were consulted
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub nameservers: Vec<String>,

    /// Number of probe exchanges sent to the nameservers
    pub exchanges: usize,

    /// Number of probe exchanges that failed at the transport level
    pub failed_exchanges: usize,

    /// How long the domain check took to complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub check_duration: Option<Duration>,

    /// Any error message if the check failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DomainResult {
    /// Build the result for a domain whose check returned an error.
    pub fn from_error<D: Into<String>>(domain: D, error: &DomainCheckError) -> Self {
        Self {
            domain: domain.into(),
            available: None,
            status: Availability::Unknown,
            nameservers: Vec::new(),
            exchanges: 0,
            failed_exchanges: 0,
            check_duration: None,
            error_message: Some(error.to_string()),
        }
    }
}

/// Configuration options for domain checking operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckConfig {
    /// DNS server asked for the NS records of the top-level zone
    /// Default: 8.8.8.8
    pub server: String,

    /// Transport used for every exchange
    /// Default: TCP
    pub transport: Transport,

    /// Record types probed, in order
    /// Default: NS, SOA
    pub record_types: Vec<RecordType>,

    /// Timeout for each individual DNS exchange
    /// Default: 2 seconds
    #[serde(skip)]
    pub timeout: Duration,

    /// Maximum number of domains checked at the same time
    /// Default: 1, Range: 1-100
    pub concurrency: usize,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_BOOTSTRAP_SERVER.to_string(),
            transport: Transport::default(),
            record_types: RecordType::default_set(),
            timeout: DEFAULT_EXCHANGE_TIMEOUT,
            concurrency: 1,
        }
    }
}

impl CheckConfig {
    /// Set the bootstrap DNS server.
    pub fn with_server<S: Into<String>>(mut self, server: S) -> Self {
        self.server = server.into();
        self
    }

    /// Set the transport used for every exchange.
    pub fn with_transport(mut self, transport: Transport) -> Self {
        self.transport = transport;
        self
    }

    /// Set the record types to probe.
    pub fn with_record_types(mut self, record_types: Vec<RecordType>) -> Self {
        self.record_types = record_types;
        self
    }

    /// Set the per-exchange timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set how many domains may be checked at once.
    ///
    /// Automatically caps concurrency at 100 to prevent resource exhaustion.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_parsing() {
        assert_eq!("tcp".parse::<Transport>().unwrap(), Transport::Tcp);
        assert_eq!(" UDP ".parse::<Transport>().unwrap(), Transport::Udp);
        assert!("quic".parse::<Transport>().is_err());
        assert_eq!(Transport::default(), Transport::Tcp);
        assert_eq!(Transport::Udp.to_string(), "udp");
    }

    #[test]
    fn test_record_type_codes() {
        assert_eq!(RecordType::A.code(), 1);
        assert_eq!(RecordType::NS.code(), 2);
        assert_eq!(RecordType::SOA.code(), 6);
        assert_eq!(RecordType::AAAA.code(), 28);
        assert_eq!(RecordType::LOC.code(), 29);
        assert_eq!(RecordType::SPF.code(), 99);
    }

    #[test]
    fn test_record_type_parsing_is_case_insensitive() {
        assert_eq!("soa".parse::<RecordType>().unwrap(), RecordType::SOA);
        assert_eq!("Aaaa".parse::<RecordType>().unwrap(), RecordType::AAAA);
        let err = "WKS".parse::<RecordType>().unwrap_err();
        assert!(err.to_string().contains("Unknown record type 'WKS'"));
    }

    #[test]
    fn test_parse_record_types_keeps_order_and_drops_duplicates() {
        let types = parse_record_types(&["soa", "NS", "SOA", "", "mx"]).unwrap();
        assert_eq!(types, vec![RecordType::SOA, RecordType::NS, RecordType::MX]);

        let empty: Vec<String> = Vec::new();
        assert!(parse_record_types(&empty).unwrap().is_empty());
    }

    #[test]
    fn test_default_config() {
        let config = CheckConfig::default();
        assert_eq!(config.server, "8.8.8.8");
        assert_eq!(config.transport, Transport::Tcp);
        assert_eq!(config.record_types, vec![RecordType::NS, RecordType::SOA]);
        assert_eq!(config.timeout, Duration::from_secs(2));
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn test_concurrency_is_clamped() {
        assert_eq!(CheckConfig::default().with_concurrency(0).concurrency, 1);
        assert_eq!(CheckConfig::default().with_concurrency(500).concurrency, 100);
    }

    #[test]
    fn test_result_from_error() {
        let err = DomainCheckError::NoNameservers {
            domain: "example.zz".to_string(),
        };
        let result = DomainResult::from_error("example.zz", &err);
        assert_eq!(result.available, None);
        assert_eq!(result.status, Availability::Unknown);
        assert_eq!(
            result.error_message.as_deref(),
            Some("Unable to find nameservers for 'example.zz'")
        );
    }

    #[test]
    fn test_result_json_shape() {
        let err = DomainCheckError::NoRecordTypes;
        let json = serde_json::to_value(DomainResult::from_error("example.com", &err)).unwrap();

        assert_eq!(json["domain"], "example.com");
        assert_eq!(json["status"], "unknown");
        assert!(json["available"].is_null());
        assert!(json.get("nameservers").is_none());
        assert_eq!(json["error_message"], "No type to query selected");
    }
}
