//! Existence probing against authoritative nameservers.
//!
//! Record types form the outer loop and nameservers the inner one. The first
//! response carrying answer or authority records ends the whole probe. A
//! nameserver that fails at the transport level is skipped; when every
//! exchange fails the probe still completes and reports "does not exist".

use crate::diagnostics::DiagnosticSink;
use crate::error::DomainCheckError;
use crate::protocols::{DnsExchange, DnsQuery};
use crate::types::{Availability, RecordType, Transport};
use crate::utils::fully_qualified;
use tracing::debug;

/// What a probe found, plus how much work it took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeReport {
    /// A nameserver returned answer or authority data for the domain
    pub exists: bool,

    /// Exchanges sent, successful or not
    pub exchanges: usize,

    /// Exchanges that failed at the transport level
    pub failed_exchanges: usize,
}

impl ProbeReport {
    /// Map the report onto the three-way verdict.
    ///
    /// A probe where no exchange succeeded is `Indeterminate` even though
    /// `exists` is false.
    pub fn status(&self) -> Availability {
        if self.exists {
            Availability::Registered
        } else if self.failed_exchanges == self.exchanges {
            Availability::Indeterminate
        } else {
            Availability::Available
        }
    }
}

/// Probe `nameservers` for `domain` and report whether it exists.
///
/// # Errors
///
/// `NoRecordTypes` if `record_types` is empty. Exchange failures are never
/// returned; they are written to `sink` and the next nameserver is tried.
pub async fn probe(
    exchange: &dyn DnsExchange,
    domain: &str,
    nameservers: &[String],
    transport: Transport,
    record_types: &[RecordType],
    sink: &dyn DiagnosticSink,
) -> Result<bool, DomainCheckError> {
    let report = probe_detailed(exchange, domain, nameservers, transport, record_types, sink).await?;
    Ok(report.exists)
}

/// Same as [`probe`], returning exchange counts alongside the verdict.
pub async fn probe_detailed(
    exchange: &dyn DnsExchange,
    domain: &str,
    nameservers: &[String],
    transport: Transport,
    record_types: &[RecordType],
    sink: &dyn DiagnosticSink,
) -> Result<ProbeReport, DomainCheckError> {
    if record_types.is_empty() {
        return Err(DomainCheckError::NoRecordTypes);
    }

    let name = fully_qualified(domain);
    let mut report = ProbeReport {
        exists: false,
        exchanges: 0,
        failed_exchanges: 0,
    };

    'types: for &record_type in record_types {
        let query = DnsQuery::new(name.clone(), record_type);

        for nameserver in nameservers {
            sink.record(&format!(
                "Querying '{}' with type '{}'",
                nameserver, record_type
            ));
            report.exchanges += 1;

            let response = match exchange.exchange(nameserver, &query, transport).await {
                Ok(response) => response,
                Err(e) => {
                    report.failed_exchanges += 1;
                    sink.record(&format!("Error from nameserver {}: {}", nameserver, e));
                    continue;
                }
            };

            if response.has_records() {
                debug!(
                    domain = %name,
                    nameserver = %nameserver,
                    record_type = %record_type,
                    answers = response.answers.len(),
                    authorities = response.authorities.len(),
                    "Nameserver knows the domain"
                );
                report.exists = true;
                break 'types;
            }
        }
    }

    if report.exists {
        sink.record(&format!("{} is not available", name));
    } else {
        sink.record(&format!("{} is available", name));
    }

    Ok(report)
}
