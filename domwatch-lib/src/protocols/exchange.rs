//! DNS exchange over UDP or TCP (RFC 1035 §4.2).
//!
//! One exchange is one query message sent to one server and the matching
//! response read back. UDP messages are sent as-is; TCP messages carry a
//! two-byte big-endian length prefix. Nothing is pooled or reused between
//! exchanges.

use super::message::{DnsQuery, MessageBuilder};
use super::response::DnsResponse;
use crate::error::DomainCheckError;
use crate::types::{Transport, DEFAULT_EXCHANGE_TIMEOUT};
use async_trait::async_trait;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tracing::{debug, warn};

/// Standard DNS port
pub const DNS_PORT: u16 = 53;

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

const MAX_TCP_MESSAGE_SIZE: usize = 65535;

/// Sends a single DNS query to a server and returns its decoded response.
///
/// `server` is an IP address, `ip:port`, hostname or `hostname:port`.
#[async_trait]
pub trait DnsExchange: Send + Sync {
    async fn exchange(
        &self,
        server: &str,
        query: &DnsQuery,
        transport: Transport,
    ) -> Result<DnsResponse, DomainCheckError>;
}

/// Exchange implementation that talks to real DNS servers.
#[derive(Debug, Clone)]
pub struct NetworkExchange {
    timeout: Duration,
    port: u16,
}

impl Default for NetworkExchange {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkExchange {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_EXCHANGE_TIMEOUT,
            port: DNS_PORT,
        }
    }

    /// Create an exchanger with a custom per-step timeout.
    ///
    /// The timeout applies to each of connect, send and receive.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            port: DNS_PORT,
        }
    }

    /// Use a port other than 53 for servers given without one.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn resolve_server(&self, server: &str) -> Result<SocketAddr, DomainCheckError> {
        let server = server.trim();

        if let Ok(addr) = server.parse::<SocketAddr>() {
            return Ok(addr);
        }
        let bare = server.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = bare.parse::<IpAddr>() {
            return Ok(SocketAddr::new(ip, self.port));
        }

        let (host, port) = match server.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => match port.parse::<u16>() {
                Ok(port) => (host, port),
                Err(_) => (server, self.port),
            },
            _ => (server, self.port),
        };

        let addrs = tokio::time::timeout(self.timeout, lookup_host((host, port)))
            .await
            .map_err(|_| {
                DomainCheckError::timeout(format!("resolving address of {}", host), self.timeout)
            })?
            .map_err(|e| {
                DomainCheckError::network_with_source(
                    format!("Failed to resolve address of '{}'", host),
                    e.to_string(),
                )
            })?;

        let mut candidates: Vec<SocketAddr> = addrs.collect();
        // Prefer IPv4: many hosts have no IPv6 route.
        candidates.sort_by_key(|addr| !addr.is_ipv4());
        candidates.into_iter().next().ok_or_else(|| {
            DomainCheckError::network(format!("No address found for '{}'", host))
        })
    }

    async fn send_udp(
        &self,
        server_addr: SocketAddr,
        message_bytes: &[u8],
    ) -> Result<Vec<u8>, DomainCheckError> {
        let bind_addr = if server_addr.is_ipv4() {
            SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0)
        } else {
            SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), 0)
        };

        let socket = UdpSocket::bind(bind_addr).await.map_err(|e| {
            DomainCheckError::network_with_source("Failed to bind UDP socket", e.to_string())
        })?;

        let bytes_sent = tokio::time::timeout(self.timeout, socket.send_to(message_bytes, server_addr))
            .await
            .map_err(|_| {
                DomainCheckError::timeout(format!("sending UDP query to {}", server_addr), self.timeout)
            })?
            .map_err(|e| {
                DomainCheckError::network_with_source(
                    format!("Failed to send UDP query to {}", server_addr),
                    e.to_string(),
                )
            })?;

        debug!(server = %server_addr, bytes_sent = bytes_sent, "UDP query sent");

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];

        let (bytes_received, from_addr) =
            tokio::time::timeout(self.timeout, socket.recv_from(&mut recv_buf))
                .await
                .map_err(|_| {
                    DomainCheckError::timeout(
                        format!("waiting for UDP response from {}", server_addr),
                        self.timeout,
                    )
                })?
                .map_err(|e| {
                    DomainCheckError::network_with_source(
                        format!("Failed to receive UDP response from {}", server_addr),
                        e.to_string(),
                    )
                })?;

        if from_addr.ip() != server_addr.ip() {
            warn!(
                expected = %server_addr,
                received_from = %from_addr,
                "UDP response from unexpected source"
            );
        }

        recv_buf.truncate(bytes_received);

        debug!(server = %server_addr, bytes_received = bytes_received, "UDP response received");

        Ok(recv_buf)
    }

    async fn send_tcp(
        &self,
        server_addr: SocketAddr,
        message_bytes: &[u8],
    ) -> Result<Vec<u8>, DomainCheckError> {
        let mut stream = tokio::time::timeout(self.timeout, TcpStream::connect(server_addr))
            .await
            .map_err(|_| {
                DomainCheckError::timeout(format!("connecting to {}", server_addr), self.timeout)
            })?
            .map_err(|e| {
                DomainCheckError::network_with_source(
                    format!("Connection to {} failed", server_addr),
                    e.to_string(),
                )
            })?;

        stream.set_nodelay(true)?;

        tokio::time::timeout(self.timeout, send_with_length_prefix(&mut stream, message_bytes))
            .await
            .map_err(|_| {
                DomainCheckError::timeout(format!("sending TCP query to {}", server_addr), self.timeout)
            })??;

        debug!(server = %server_addr, message_len = message_bytes.len(), "TCP query sent");

        let response_bytes = tokio::time::timeout(self.timeout, read_with_length_prefix(&mut stream))
            .await
            .map_err(|_| {
                DomainCheckError::timeout(
                    format!("waiting for TCP response from {}", server_addr),
                    self.timeout,
                )
            })??;

        debug!(server = %server_addr, response_len = response_bytes.len(), "TCP response received");

        Ok(response_bytes)
    }
}

#[async_trait]
impl DnsExchange for NetworkExchange {
    async fn exchange(
        &self,
        server: &str,
        query: &DnsQuery,
        transport: Transport,
    ) -> Result<DnsResponse, DomainCheckError> {
        let (id, request) = MessageBuilder::build_query(query)?;
        let server_addr = self.resolve_server(server).await?;

        let raw = match transport {
            Transport::Udp => self.send_udp(server_addr, &request).await?,
            Transport::Tcp => self.send_tcp(server_addr, &request).await?,
        };

        let response = DnsResponse::parse(&raw)?;
        if response.id != id {
            return Err(DomainCheckError::network(format!(
                "Response id {} from {} does not match query id {}",
                response.id, server_addr, id
            )));
        }
        if response.truncated {
            warn!(server = %server_addr, query = %query, "Truncated response");
        }

        Ok(response)
    }
}

async fn send_with_length_prefix<S>(stream: &mut S, message_bytes: &[u8]) -> Result<(), DomainCheckError>
where
    S: AsyncWriteExt + Unpin,
{
    let length = u16::try_from(message_bytes.len())
        .map_err(|_| DomainCheckError::internal("DNS message exceeds 65535 bytes"))?;

    stream.write_all(&length.to_be_bytes()).await.map_err(|e| {
        DomainCheckError::network_with_source("Failed to write length prefix", e.to_string())
    })?;
    stream.write_all(message_bytes).await.map_err(|e| {
        DomainCheckError::network_with_source("Failed to write DNS message", e.to_string())
    })?;
    stream.flush().await.map_err(|e| {
        DomainCheckError::network_with_source("Failed to flush stream", e.to_string())
    })?;

    Ok(())
}

async fn read_with_length_prefix<S>(stream: &mut S) -> Result<Vec<u8>, DomainCheckError>
where
    S: AsyncReadExt + Unpin,
{
    let mut len_buf = [0u8; 2];
    stream.read_exact(&mut len_buf).await.map_err(|e| {
        DomainCheckError::network_with_source("Failed to read response length", e.to_string())
    })?;

    let response_len = u16::from_be_bytes(len_buf) as usize;
    if response_len > MAX_TCP_MESSAGE_SIZE {
        return Err(DomainCheckError::parse(format!(
            "Response too large: {} bytes (max {})",
            response_len, MAX_TCP_MESSAGE_SIZE
        )));
    }

    let mut response = vec![0u8; response_len];
    stream.read_exact(&mut response).await.map_err(|e| {
        DomainCheckError::network_with_source("Failed to read response body", e.to_string())
    })?;

    Ok(response)
}
