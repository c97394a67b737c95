//! DNS response parsing.
//!
//! Only the parts of a response the checker looks at are kept: the answer and
//! authority sections, the response code and the header flags.

use crate::error::DomainCheckError;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{RData, Record};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub id: u16,

    pub rcode: ResponseCode,

    pub truncated: bool,

    pub answers: Vec<Record>,

    pub authorities: Vec<Record>,
}

impl DnsResponse {
    /// Build a NOERROR response from already-decoded sections.
    pub fn new(answers: Vec<Record>, authorities: Vec<Record>) -> Self {
        Self {
            id: 0,
            rcode: ResponseCode::NoError,
            truncated: false,
            answers,
            authorities,
        }
    }

    /// Decode a response from wire format.
    pub fn parse(response_bytes: &[u8]) -> Result<Self, DomainCheckError> {
        let message = Message::from_vec(response_bytes)
            .map_err(|e| DomainCheckError::parse(format!("Failed to parse DNS response: {}", e)))?;

        let response = Self {
            id: message.id(),
            rcode: message.response_code(),
            truncated: message.truncated(),
            answers: message.answers().to_vec(),
            authorities: message.name_servers().to_vec(),
        };

        debug!(
            id = response.id,
            rcode = ?response.rcode,
            answers = response.answers.len(),
            authorities = response.authorities.len(),
            truncated = response.truncated,
            "DNS response parsed"
        );

        Ok(response)
    }

    /// Whether the answer or authority section holds at least one record.
    pub fn has_records(&self) -> bool {
        !self.answers.is_empty() || !self.authorities.is_empty()
    }

    /// Nameserver hostnames from the NS records of the answer section.
    ///
    /// Names are returned in answer order with trailing dots and surrounding
    /// whitespace removed.
    pub fn nameserver_names(&self) -> Vec<String> {
        self.answers
            .iter()
            .filter_map(|record| match record.data() {
                RData::NS(ns) => Some(ns.to_utf8()),
                _ => None,
            })
            .map(|name| name.trim().trim_matches('.').trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }
}
