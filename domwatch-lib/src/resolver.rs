//! Authoritative nameserver discovery for a domain's top-level zone.
//!
//! A single NS query for the zone ("com.") is sent to a trusted bootstrap
//! server; the NS records of its answer section are the authoritative set.
//! There is no retry and no second bootstrap server.

use crate::diagnostics::DiagnosticSink;
use crate::error::DomainCheckError;
use crate::protocols::{DnsExchange, DnsQuery};
use crate::types::{RecordType, Transport};
use crate::utils::{fully_qualified, top_level_label};
use tracing::debug;

/// Fully-qualified top-level zone of a domain ("example.com" -> "com.").
pub fn top_level_zone(domain: &str) -> Result<String, DomainCheckError> {
    top_level_label(domain)
        .map(fully_qualified)
        .ok_or_else(|| DomainCheckError::invalid_domain(domain, "Invalid domain"))
}

/// Resolve the authoritative nameservers of `domain`'s top-level zone.
///
/// Returns the NS hostnames in the order the bootstrap server listed them,
/// without trailing dots. The list may be empty when the answer held records
/// but none of type NS; callers must treat that as a failure.
///
/// # Errors
///
/// - `InvalidDomain` if `domain` has no label separator (no network activity)
/// - any exchange error from the bootstrap query, unchanged
/// - `BootstrapError` if the answer section is empty
pub async fn resolve_nameservers(
    exchange: &dyn DnsExchange,
    bootstrap_server: &str,
    domain: &str,
    transport: Transport,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<String>, DomainCheckError> {
    sink.record(&format!("Getting root ns for '{}'", domain));

    let zone = top_level_zone(domain)?;
    let query = DnsQuery::new(zone.clone(), RecordType::NS);

    let response = exchange.exchange(bootstrap_server, &query, transport).await?;

    if response.answers.is_empty() {
        return Err(DomainCheckError::bootstrap(
            zone.clone(),
            format!("No nameservers found for '{}'", zone),
        ));
    }

    let nameservers = response.nameserver_names();
    debug!(
        zone = %zone,
        server = bootstrap_server,
        count = nameservers.len(),
        "Resolved top-level nameservers"
    );

    Ok(nameservers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{MemorySink, NullSink};
    use crate::protocols::DnsResponse;
    use async_trait::async_trait;
    use hickory_proto::rr::rdata::{A, NS};
    use hickory_proto::rr::{Name, RData, Record};
    use std::net::Ipv4Addr;
    use std::str::FromStr;
    use std::sync::Mutex;

    /// Replies to every query with the same canned response.
    struct Canned {
        response: Result<DnsResponse, DomainCheckError>,
        seen: Mutex<Vec<(String, DnsQuery, Transport)>>,
    }

    impl Canned {
        fn new(response: Result<DnsResponse, DomainCheckError>) -> Self {
            Self {
                response,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn seen(&self) -> Vec<(String, DnsQuery, Transport)> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DnsExchange for Canned {
        async fn exchange(
            &self,
            server: &str,
            query: &DnsQuery,
            transport: Transport,
        ) -> Result<DnsResponse, DomainCheckError> {
            self.seen
                .lock()
                .unwrap()
                .push((server.to_string(), query.clone(), transport));
            self.response.clone()
        }
    }

    fn ns(host: &str) -> Record {
        Record::from_rdata(
            Name::from_str("com.").unwrap(),
            172800,
            RData::NS(NS(Name::from_str(host).unwrap())),
        )
    }

    #[test]
    fn test_top_level_zone() {
        assert_eq!(top_level_zone("example.com").unwrap(), "com.");
        assert_eq!(top_level_zone("a.b.example.org").unwrap(), "org.");
        assert!(top_level_zone("localhost").is_err());
    }

    #[tokio::test]
    async fn test_resolves_ns_records_in_order() {
        let exchange = Canned::new(Ok(DnsResponse::new(
            vec![ns("a.gtld-servers.net."), ns("b.gtld-servers.net.")],
            vec![],
        )));
        let sink = MemorySink::new();

        let nameservers =
            resolve_nameservers(&exchange, "8.8.8.8", "example.com", Transport::Udp, &sink)
                .await
                .unwrap();

        assert_eq!(nameservers, vec!["a.gtld-servers.net", "b.gtld-servers.net"]);
        let seen = exchange.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "8.8.8.8");
        assert_eq!(seen[0].1, DnsQuery::new("com.", RecordType::NS));
        assert_eq!(seen[0].2, Transport::Udp);
        assert_eq!(sink.lines(), vec!["Getting root ns for 'example.com'"]);
    }

    #[tokio::test]
    async fn test_domain_without_dot_fails_before_network() {
        let exchange = Canned::new(Ok(DnsResponse::new(vec![], vec![])));

        let err = resolve_nameservers(&exchange, "8.8.8.8", "localhost", Transport::Tcp, &NullSink)
            .await
            .unwrap_err();

        assert!(matches!(err, DomainCheckError::InvalidDomain { .. }));
        assert!(exchange.seen().is_empty());
    }

    #[tokio::test]
    async fn test_empty_answer_is_bootstrap_error() {
        let exchange = Canned::new(Ok(DnsResponse::new(vec![], vec![ns("a.root-servers.net.")])));

        let err = resolve_nameservers(&exchange, "8.8.8.8", "example.zz", Transport::Tcp, &NullSink)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DomainCheckError::bootstrap("zz.", "No nameservers found for 'zz.'")
        );
    }

    #[tokio::test]
    async fn test_answer_without_ns_records_yields_empty_list() {
        let a = Record::from_rdata(
            Name::from_str("com.").unwrap(),
            60,
            RData::A(A(Ipv4Addr::new(192, 0, 2, 7))),
        );
        let exchange = Canned::new(Ok(DnsResponse::new(vec![a], vec![])));

        let nameservers =
            resolve_nameservers(&exchange, "8.8.8.8", "example.com", Transport::Tcp, &NullSink)
                .await
                .unwrap();

        assert!(nameservers.is_empty());
    }

    #[tokio::test]
    async fn test_exchange_error_is_propagated_unchanged() {
        let failure = DomainCheckError::network_with_source("Connection to 8.8.8.8:53 failed", "refused");
        let exchange = Canned::new(Err(failure.clone()));

        let err = resolve_nameservers(&exchange, "8.8.8.8", "example.com", Transport::Tcp, &NullSink)
            .await
            .unwrap_err();

        assert_eq!(err, failure);
    }
}
