//! DNS query construction.
//!
//! Every exchange carries exactly one question: some nameservers reject
//! messages with several questions.

use super::record_type::RecordTypeMapper;
use crate::error::DomainCheckError;
use crate::types::RecordType;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::fmt;
use std::str::FromStr;

/// A single-question query: fully-qualified name plus record type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuery {
    pub name: String,
    pub record_type: RecordType,
}

impl DnsQuery {
    pub fn new<N: Into<String>>(name: N, record_type: RecordType) -> Self {
        Self {
            name: name.into(),
            record_type,
        }
    }
}

impl fmt::Display for DnsQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.record_type)
    }
}

/// Builds DNS query messages in wire format
pub struct MessageBuilder;

impl MessageBuilder {
    /// Build a query message and return its id together with the wire bytes.
    ///
    /// The message has a random id, the RD flag set and one IN-class question.
    pub fn build_query(query: &DnsQuery) -> Result<(u16, Vec<u8>), DomainCheckError> {
        let name = Name::from_str(&query.name).map_err(|e| {
            DomainCheckError::invalid_domain(&query.name, format!("not encodable: {}", e))
        })?;

        let mut question = Query::new();
        question.set_name(name);
        question.set_query_type(RecordTypeMapper::to_hickory(query.record_type));
        question.set_query_class(DNSClass::IN);

        let id = fastrand::u16(..);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(question);

        let bytes = Self::serialize_message(&message)?;
        Ok((id, bytes))
    }

    fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainCheckError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message
            .emit(&mut encoder)
            .map_err(|e| DomainCheckError::internal(format!("Failed to serialize DNS message: {}", e)))?;

        Ok(buf)
    }
}
