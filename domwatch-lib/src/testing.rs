//! Scripted exchanger shared by the unit tests.

use crate::error::DomainCheckError;
use crate::protocols::{DnsExchange, DnsQuery, DnsResponse};
use crate::types::{RecordType, Transport};
use async_trait::async_trait;
use hickory_proto::rr::rdata::{NS, SOA};
use hickory_proto::rr::{Name, RData, Record};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Mutex;

pub(crate) type Reply = Result<DnsResponse, DomainCheckError>;

/// Answers from a table keyed by (server, record type), optionally narrowed
/// to one query name; unknown keys get an empty NOERROR response. Every call
/// is logged.
#[derive(Default)]
pub(crate) struct ScriptedExchange {
    replies: HashMap<(String, RecordType), Reply>,
    named: HashMap<(String, String, RecordType), Reply>,
    calls: Mutex<Vec<(String, DnsQuery, Transport)>>,
}

impl ScriptedExchange {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(mut self, server: &str, record_type: RecordType, reply: Reply) -> Self {
        self.replies.insert((server.to_string(), record_type), reply);
        self
    }

    /// Reply only when the query name matches `name` (case-insensitive).
    pub(crate) fn reply_for(
        mut self,
        server: &str,
        name: &str,
        record_type: RecordType,
        reply: Reply,
    ) -> Self {
        self.named.insert(
            (server.to_string(), name.to_ascii_lowercase(), record_type),
            reply,
        );
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, DnsQuery, Transport)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl DnsExchange for ScriptedExchange {
    async fn exchange(&self, server: &str, query: &DnsQuery, transport: Transport) -> Reply {
        self.calls
            .lock()
            .unwrap()
            .push((server.to_string(), query.clone(), transport));
        let named = (
            server.to_string(),
            query.name.to_ascii_lowercase(),
            query.record_type,
        );
        self.named
            .get(&named)
            .or_else(|| self.replies.get(&(server.to_string(), query.record_type)))
            .cloned()
            .unwrap_or_else(|| Ok(DnsResponse::new(vec![], vec![])))
    }
}

pub(crate) fn ns_record(zone: &str, host: &str) -> Record {
    Record::from_rdata(
        Name::from_str(zone).unwrap(),
        172800,
        RData::NS(NS(Name::from_str(host).unwrap())),
    )
}

pub(crate) fn soa_record(zone: &str) -> Record {
    let soa = SOA::new(
        Name::from_str(&format!("ns1.{}", zone)).unwrap(),
        Name::from_str(&format!("hostmaster.{}", zone)).unwrap(),
        2024010101,
        7200,
        3600,
        1209600,
        3600,
    );
    Record::from_rdata(Name::from_str(zone).unwrap(), 3600, RData::SOA(soa))
}

pub(crate) fn answer(records: Vec<Record>) -> Reply {
    Ok(DnsResponse::new(records, vec![]))
}

pub(crate) fn authority(records: Vec<Record>) -> Reply {
    Ok(DnsResponse::new(vec![], records))
}

pub(crate) fn unreachable(server: &str) -> Reply {
    Err(DomainCheckError::network_with_source(
        format!("Connection to {}:53 failed", server),
        "connection refused",
    ))
}
