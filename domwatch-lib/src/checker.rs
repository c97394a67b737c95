//! Availability checking.
//!
//! [`is_domain_available`] is the whole policy in one call: resolve the
//! top-level nameservers through a bootstrap server, probe them, and call the
//! domain available when none of them knows it. [`DomainChecker`] wraps the
//! same steps with configuration, timing and batch processing.

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::error::DomainCheckError;
use crate::prober::{probe, probe_detailed};
use crate::protocols::{DnsExchange, NetworkExchange};
use crate::resolver::resolve_nameservers;
use crate::types::{CheckConfig, DomainResult, RecordType, Transport};
use crate::utils::normalize_domain;
use futures::stream::{self, Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Decide whether `domain` is available for registration.
///
/// Returns `true` when no authoritative nameserver of the top-level zone
/// returned answer or authority data for any of `record_types`.
///
/// # Errors
///
/// - `NoRecordTypes` when `record_types` is empty, before any network activity
/// - `InvalidDomain` when the domain has no label separator
/// - resolver errors, unchanged
/// - `NoNameservers` when resolution produced an empty list
pub async fn is_domain_available(
    exchange: &dyn DnsExchange,
    bootstrap_server: &str,
    domain: &str,
    transport: Transport,
    record_types: &[RecordType],
    sink: &dyn DiagnosticSink,
) -> Result<bool, DomainCheckError> {
    if record_types.is_empty() {
        return Err(DomainCheckError::NoRecordTypes);
    }

    let nameservers = nameservers_for(exchange, bootstrap_server, domain, transport, sink).await?;
    let exists = probe(exchange, domain, &nameservers, transport, record_types, sink).await?;

    Ok(!exists)
}

async fn nameservers_for(
    exchange: &dyn DnsExchange,
    bootstrap_server: &str,
    domain: &str,
    transport: Transport,
    sink: &dyn DiagnosticSink,
) -> Result<Vec<String>, DomainCheckError> {
    let nameservers =
        resolve_nameservers(exchange, bootstrap_server, domain, transport, sink).await?;

    if nameservers.is_empty() {
        return Err(DomainCheckError::NoNameservers {
            domain: domain.to_string(),
        });
    }

    Ok(nameservers)
}

/// Domain checker that carries its configuration, exchanger and trace sink.
///
/// # Example
///
/// ```rust,no_run
/// use domwatch_lib::{CheckConfig, DomainChecker, Transport};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = CheckConfig::default().with_transport(Transport::Udp);
///     let checker = DomainChecker::with_config(config);
///     let result = checker.check_domain("example.com").await?;
///     println!("{}: {}", result.domain, result.status);
///     Ok(())
/// }
/// ```
pub struct DomainChecker {
    config: CheckConfig,
    exchange: Arc<dyn DnsExchange>,
    sink: Arc<dyn DiagnosticSink>,
}

impl DomainChecker {
    /// Checker with default configuration, talking to the network.
    pub fn new() -> Self {
        Self::with_config(CheckConfig::default())
    }

    /// Checker with custom configuration, talking to the network.
    ///
    /// The configured timeout bounds each individual exchange.
    pub fn with_config(config: CheckConfig) -> Self {
        let exchange = Arc::new(NetworkExchange::with_timeout(config.timeout));
        Self {
            config,
            exchange,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the exchanger, e.g. with a scripted one in tests.
    pub fn with_exchange(mut self, exchange: Arc<dyn DnsExchange>) -> Self {
        self.exchange = exchange;
        self
    }

    /// Replace the sink receiving trace lines.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Check a single domain.
    ///
    /// Input is normalized first (whitespace and trailing dots removed).
    ///
    /// # Errors
    ///
    /// Invalid input, an empty record type list, and resolution failures are
    /// returned as errors. Nameservers that fail during probing are not.
    pub async fn check_domain(&self, domain: &str) -> Result<DomainResult, DomainCheckError> {
        let domain = normalize_domain(domain)?;
        let record_types = &self.config.record_types;
        if record_types.is_empty() {
            return Err(DomainCheckError::NoRecordTypes);
        }

        let started = Instant::now();
        let exchange = self.exchange.as_ref();
        let sink = self.sink.as_ref();
        let transport = self.config.transport;

        let nameservers =
            nameservers_for(exchange, &self.config.server, &domain, transport, sink).await?;
        let report =
            probe_detailed(exchange, &domain, &nameservers, transport, record_types, sink).await?;

        let elapsed = started.elapsed();
        debug!(
            domain = %domain,
            status = %report.status(),
            exchanges = report.exchanges,
            failed = report.failed_exchanges,
            elapsed_ms = elapsed.as_millis() as u64,
            "Domain check finished"
        );

        Ok(DomainResult {
            domain,
            available: Some(!report.exists),
            status: report.status(),
            nameservers,
            exchanges: report.exchanges,
            failed_exchanges: report.failed_exchanges,
            check_duration: Some(elapsed),
            error_message: None,
        })
    }

    /// Check several domains and collect every result, in input order.
    ///
    /// A failing domain does not stop the batch: its error is folded into a
    /// result with status `Unknown`.
    pub async fn check_domains(&self, domains: &[String]) -> Vec<DomainResult> {
        info!(
            count = domains.len(),
            concurrency = self.config.concurrency,
            "Checking domains"
        );
        self.check_domains_stream(domains).collect().await
    }

    /// Check several domains, yielding results in input order as they finish.
    ///
    /// At most `concurrency` checks are in flight; each check still sends
    /// its own exchanges one at a time.
    pub fn check_domains_stream<'a>(
        &'a self,
        domains: &'a [String],
    ) -> Pin<Box<dyn Stream<Item = DomainResult> + Send + 'a>> {
        let concurrency = self.config.concurrency.max(1);
        let stream = stream::iter(domains)
            .map(move |domain| async move {
                match self.check_domain(domain).await {
                    Ok(result) => result,
                    Err(e) => {
                        debug!(domain = %domain, error = %e, "Domain check failed");
                        DomainResult::from_error(domain.trim(), &e)
                    }
                }
            })
            .buffered(concurrency);

        Box::pin(stream)
    }

    /// Current configuration.
    pub fn config(&self) -> &CheckConfig {
        &self.config
    }
}

impl Default for DomainChecker {
    fn default() -> Self {
        Self::new()
    }
}
