//! Scanner module - orchestrates a connect scan of one host.
//!
//! A scan moves through fixed phases: the target is resolved, every port of
//! the range is queued, a bounded pool of workers probes them concurrently,
//! the orchestrator drains the pool, and the open ports are sorted into a
//! [`ScanReport`]. Cancellation is cooperative and checked between phases
//! and before each withdrawal from the queue.

pub mod aggregator;
pub mod pool;
pub mod prober;
pub mod progress;
pub mod queue;
pub mod rate_limiter;

pub use aggregator::{ProbeOutcome, ResultAggregator};
pub use pool::{PoolStats, WorkerContext, WorkerPool};
pub use prober::{Prober, TcpConnectProber, DEFAULT_TIMEOUT};
pub use progress::ProgressTracker;
pub use queue::WorkQueue;
pub use rate_limiter::RateLimiter;

use crate::error::{ScanError, ScanResult};
use crate::types::{PortRange, ScanTarget};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;

/// Default number of concurrent workers.
pub const DEFAULT_THREADS: usize = 100;

/// Lifecycle of a single scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Initializing,
    Resolving,
    Queuing,
    Scanning,
    Draining,
    Completed,
    Aborted,
}

impl fmt::Display for ScanPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::Resolving => "resolving",
            Self::Queuing => "queuing",
            Self::Scanning => "scanning",
            Self::Draining => "draining",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// Configuration for a scan.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Ports to probe.
    pub range: PortRange,
    /// Upper bound on concurrent workers.
    pub threads: usize,
    /// Connect timeout per probe.
    pub timeout: Duration,
    /// Probe starts per second, 0 for unlimited.
    pub rate_limit: u32,
    /// Draw a progress bar while scanning.
    pub show_progress: bool,
}

impl ScanConfig {
    /// Create a configuration for `range` with default settings.
    pub fn new(range: PortRange) -> Self {
        Self {
            range,
            threads: DEFAULT_THREADS,
            timeout: DEFAULT_TIMEOUT,
            rate_limit: 0,
            show_progress: false,
        }
    }

    /// Set the worker count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the connect timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the probe rate limit.
    pub fn with_rate_limit(mut self, rate_limit: u32) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Enable the progress bar.
    pub fn with_progress(mut self) -> Self {
        self.show_progress = true;
        self
    }

    /// Check the settings the type system cannot.
    pub fn validate(&self) -> ScanResult<()> {
        if self.threads == 0 {
            return Err(ScanError::InvalidConfig(
                "thread count must be at least 1".to_string(),
            ));
        }
        if self.timeout.is_zero() {
            return Err(ScanError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of a finished or interrupted scan.
#[derive(Debug, Clone)]
pub struct ScanReport {
    /// The resolved target.
    pub target: ScanTarget,
    /// The range that was requested.
    pub range: PortRange,
    /// Reachable ports, sorted ascending by port number.
    pub open_ports: Vec<ProbeOutcome>,
    /// Wall-clock time from queuing to the end of draining.
    pub duration: Duration,
    /// `Completed`, or `Aborted` if the scan was cancelled.
    pub phase: ScanPhase,
    /// Workers spawned.
    pub workers: usize,
    /// Probes that ran to completion.
    pub probed: usize,
}

impl ScanReport {
    /// Whether every port of the range was probed.
    pub fn is_complete(&self) -> bool {
        self.phase == ScanPhase::Completed
    }

    /// Duration in fractional seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}

/// Drives one scan from target resolution to a sorted report.
pub struct Orchestrator<P: ?Sized = TcpConnectProber> {
    config: ScanConfig,
    prober: Arc<P>,
    cancel: CancellationToken,
}

impl Orchestrator<TcpConnectProber> {
    /// Create an orchestrator probing with real TCP connects.
    pub fn new(config: ScanConfig) -> Self {
        let prober = Arc::new(TcpConnectProber::new(config.timeout));
        Self::with_prober(config, prober)
    }
}

impl<P> Orchestrator<P>
where
    P: Prober + ?Sized + 'static,
{
    /// Create an orchestrator with a custom prober.
    pub fn with_prober(config: ScanConfig, prober: Arc<P>) -> Self {
        Self {
            config,
            prober,
            cancel: CancellationToken::new(),
        }
    }

    /// Use an externally owned cancellation token.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Token that aborts this scan when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// The active configuration.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Resolve `host` and scan it.
    ///
    /// Fails only on invalid configuration or when `host` cannot be
    /// resolved; in both cases no port is queued.
    pub async fn run(&self, host: &str) -> ScanResult<ScanReport> {
        let target = self.resolve(host).await?;
        self.scan(target).await
    }

    /// Validate the configuration and resolve `host`, without scanning.
    pub async fn resolve(&self, host: &str) -> ScanResult<ScanTarget> {
        self.enter(ScanPhase::Initializing);
        self.config.validate()?;

        self.enter(ScanPhase::Resolving);
        ScanTarget::resolve(host).await
    }

    /// Scan an already resolved target.
    pub async fn scan(&self, target: ScanTarget) -> ScanResult<ScanReport> {
        self.config.validate()?;
        let started = Instant::now();

        if self.cancel.is_cancelled() {
            return Ok(self.finish(target, Vec::new(), PoolStats::default(), started, false));
        }

        self.enter(ScanPhase::Queuing);
        let queue = Arc::new(WorkQueue::new(self.config.range));
        let total = queue.total();
        let progress = Arc::new(if self.config.show_progress {
            ProgressTracker::with_bar(total)
        } else {
            ProgressTracker::hidden(total)
        });
        let results = Arc::new(ResultAggregator::new());

        let limiter = RateLimiter::per_second(self.config.rate_limit);
        if let Some(limiter) = &limiter {
            tracing::debug!(rate = limiter.rate(), "probe rate limited");
        }

        let ctx = WorkerContext {
            target: target.ip,
            prober: Arc::clone(&self.prober),
            queue: Arc::clone(&queue),
            results: Arc::clone(&results),
            progress: Arc::clone(&progress),
            limiter,
            cancel: self.cancel.clone(),
        };

        self.enter(ScanPhase::Scanning);
        let running = WorkerPool::new(self.config.threads).spawn(ctx);

        self.enter(ScanPhase::Draining);
        let stats = running.drain().await;

        let finished = queue.is_exhausted() && stats.probed == total;
        if finished {
            progress.finish();
        } else {
            progress.abandon();
            if !self.cancel.is_cancelled() {
                tracing::warn!(
                    probed = stats.probed,
                    total,
                    "workers stopped before every port was probed"
                );
            }
        }

        let completed = finished || !self.cancel.is_cancelled();
        Ok(self.finish(target, results.snapshot(), stats, started, completed))
    }

    fn finish(
        &self,
        target: ScanTarget,
        mut open_ports: Vec<ProbeOutcome>,
        stats: PoolStats,
        started: Instant,
        completed: bool,
    ) -> ScanReport {
        open_ports.sort_by_key(|o| o.port);
        let phase = if completed {
            ScanPhase::Completed
        } else {
            ScanPhase::Aborted
        };
        self.enter(phase);

        let report = ScanReport {
            target,
            range: self.config.range,
            open_ports,
            duration: started.elapsed(),
            phase,
            workers: stats.workers,
            probed: stats.probed,
        };

        tracing::info!(
            target = %report.target,
            range = %report.range,
            open = report.open_ports.len(),
            probed = report.probed,
            workers = report.workers,
            elapsed_ms = report.duration.as_millis() as u64,
            phase = %report.phase,
            "scan finished"
        );
        report
    }

    fn enter(&self, phase: ScanPhase) {
        tracing::debug!(%phase, "scan phase");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::net::{IpAddr, Ipv4Addr, SocketAddr};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Opens a fixed set of ports and counts every call.
    struct FixedProber {
        open: Vec<u16>,
        calls: AtomicUsize,
        delay: Duration,
    }

    impl FixedProber {
        fn new(open: &[u16]) -> Self {
            Self {
                open: open.to_vec(),
                calls: AtomicUsize::new(0),
                delay: Duration::ZERO,
            }
        }

        fn slow(open: &[u16], delay: Duration) -> Self {
            Self {
                delay,
                ..Self::new(open)
            }
        }
    }

    #[async_trait]
    impl Prober for FixedProber {
        async fn probe(&self, addr: SocketAddr) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.open.contains(&addr.port())
        }
    }

    fn localhost() -> ScanTarget {
        ScanTarget::new("localhost", IpAddr::V4(Ipv4Addr::LOCALHOST))
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(ScanPhase::Draining.to_string(), "draining");
        assert_eq!(ScanPhase::Aborted.to_string(), "aborted");
    }

    #[test]
    fn test_config_defaults_and_validation() {
        let config = ScanConfig::new(PortRange::new(1, 1024).unwrap());
        assert_eq!(config.threads, 100);
        assert_eq!(config.timeout, Duration::from_secs(1));
        assert!(config.validate().is_ok());

        assert!(config.clone().with_threads(0).validate().is_err());
        assert!(config.with_timeout(Duration::ZERO).validate().is_err());
    }

    #[tokio::test]
    async fn test_results_sorted_and_in_range() {
        let range = PortRange::new(8000, 8100).unwrap();
        let prober = Arc::new(FixedProber::new(&[8100, 8080, 8000, 9000]));
        let orchestrator =
            Orchestrator::with_prober(ScanConfig::new(range).with_threads(7), prober);

        let report = orchestrator.scan(localhost()).await.unwrap();

        let ports: Vec<u16> = report.open_ports.iter().map(|o| o.port.as_u16()).collect();
        assert_eq!(ports, vec![8000, 8080, 8100]);
        assert!(report.open_ports.iter().all(|o| o.reachable));
        assert_eq!(report.open_ports[1].service, "http-alt");
        assert_eq!(report.phase, ScanPhase::Completed);
        assert_eq!(report.probed, 101);
        assert_eq!(report.workers, 7);
    }

    #[tokio::test]
    async fn test_single_port_scan_uses_one_worker() {
        let range = PortRange::new(1, 1).unwrap();
        let prober = Arc::new(FixedProber::new(&[]));
        let orchestrator =
            Orchestrator::with_prober(ScanConfig::new(range), Arc::clone(&prober));

        let report = orchestrator.scan(localhost()).await.unwrap();

        assert!(report.open_ports.is_empty());
        assert_eq!(report.workers, 1);
        assert_eq!(prober.calls.load(Ordering::SeqCst), 1);
        assert!(report.is_complete());
    }

    #[tokio::test]
    async fn test_same_content_across_runs() {
        let range = PortRange::new(1, 300).unwrap();
        let prober = Arc::new(FixedProber::new(&[3, 150, 299]));
        let orchestrator =
            Orchestrator::with_prober(ScanConfig::new(range).with_threads(50), prober);

        let first = orchestrator.scan(localhost()).await.unwrap();
        let second = orchestrator.scan(localhost()).await.unwrap();
        assert_eq!(first.open_ports, second.open_ports);
    }

    #[tokio::test]
    async fn test_resolution_failure_probes_nothing() {
        let range = PortRange::new(1, 100).unwrap();
        let prober = Arc::new(FixedProber::new(&[]));
        let orchestrator =
            Orchestrator::with_prober(ScanConfig::new(range), Arc::clone(&prober));

        let err = orchestrator.run("no such host!").await.unwrap_err();

        assert!(matches!(err, ScanError::Resolution { .. }));
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_invalid_config_rejected_before_resolution() {
        let range = PortRange::new(1, 10).unwrap();
        let orchestrator = Orchestrator::with_prober(
            ScanConfig::new(range).with_threads(0),
            Arc::new(FixedProber::new(&[])),
        );
        let err = orchestrator.run("127.0.0.1").await.unwrap_err();
        assert!(matches!(err, ScanError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_cancel_before_scan_reports_aborted() {
        let range = PortRange::new(1, 50).unwrap();
        let prober = Arc::new(FixedProber::new(&[1]));
        let orchestrator =
            Orchestrator::with_prober(ScanConfig::new(range), Arc::clone(&prober));
        orchestrator.cancellation_token().cancel();

        let report = orchestrator.scan(localhost()).await.unwrap();

        assert_eq!(report.phase, ScanPhase::Aborted);
        assert!(report.open_ports.is_empty());
        assert_eq!(prober.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_cancel_mid_scan_keeps_partial_results() {
        let range = PortRange::new(1, 1000).unwrap();
        let prober = Arc::new(FixedProber::slow(&[1, 2, 3], Duration::from_millis(20)));
        let cancel = CancellationToken::new();
        let orchestrator = Orchestrator::with_prober(
            ScanConfig::new(range).with_threads(4),
            Arc::clone(&prober),
        )
        .with_cancellation(cancel.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            cancel.cancel();
        });
        let report = orchestrator.scan(localhost()).await.unwrap();
        canceller.await.unwrap();

        assert_eq!(report.phase, ScanPhase::Aborted);
        assert!(report.probed < 1000);
        assert_eq!(report.probed, prober.calls.load(Ordering::SeqCst));
        // The first withdrawals are ports 1-4, all probed before the cancel.
        let ports: Vec<u16> = report.open_ports.iter().map(|o| o.port.as_u16()).collect();
        assert_eq!(ports, vec![1, 2, 3]);
    }
}
