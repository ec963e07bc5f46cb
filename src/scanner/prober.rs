//! Connectivity probing.
//!
//! A probe is one bounded-time TCP connect to a single socket address. The
//! [`Prober`] trait is the seam the worker pool drives; [`TcpConnectProber`]
//! is the real implementation, and tests substitute their own.

use async_trait::async_trait;
use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;

/// Default connect timeout per probe.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// A single-port reachability check.
///
/// Implementations must not surface errors: any failure to connect means
/// the port is unreachable.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Return `true` if a connection to `addr` was established.
    async fn probe(&self, addr: SocketAddr) -> bool;
}

/// Why a probe did not connect. Only used for trace logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeFailure {
    /// The host answered with a reset.
    Refused,
    /// No answer within the timeout.
    TimedOut,
    /// No route to the host or network.
    Unreachable,
    /// Any other socket error.
    Other(io::ErrorKind),
}

impl ProbeFailure {
    fn classify(err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::ConnectionRefused => Self::Refused,
            io::ErrorKind::TimedOut => Self::TimedOut,
            io::ErrorKind::HostUnreachable | io::ErrorKind::NetworkUnreachable => {
                Self::Unreachable
            }
            kind => Self::Other(kind),
        }
    }
}

impl fmt::Display for ProbeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Refused => write!(f, "refused"),
            Self::TimedOut => write!(f, "timed out"),
            Self::Unreachable => write!(f, "unreachable"),
            Self::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// TCP connect prober.
///
/// Completes the full handshake, so it needs no privileges. Exactly one
/// connect attempt is made per call; the stream is dropped as soon as the
/// result is known, and a timed-out attempt drops the pending socket with
/// the cancelled future.
#[derive(Debug, Clone)]
pub struct TcpConnectProber {
    timeout: Duration,
}

impl TcpConnectProber {
    /// Create a prober with the given per-connect timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The configured connect timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn connect(&self, addr: SocketAddr) -> Result<TcpStream, ProbeFailure> {
        match timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => Ok(stream),
            Ok(Err(e)) => Err(ProbeFailure::classify(&e)),
            Err(_) => Err(ProbeFailure::TimedOut),
        }
    }
}

impl Default for TcpConnectProber {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

#[async_trait]
impl Prober for TcpConnectProber {
    async fn probe(&self, addr: SocketAddr) -> bool {
        match self.connect(addr).await {
            Ok(stream) => {
                drop(stream);
                true
            }
            Err(failure) => {
                tracing::trace!(%addr, %failure, "probe failed");
                false
            }
        }
    }
}
