//! Fixed-size worker pool.
//!
//! Each worker is a tokio task that loops: withdraw a port from the shared
//! [`WorkQueue`], probe it, record the outcome, count progress. A worker stops
//! when the queue is exhausted or the scan is cancelled. Joining every worker
//! is the draining barrier the orchestrator waits on.

use super::aggregator::{ProbeOutcome, ResultAggregator};
use super::progress::ProgressTracker;
use super::prober::Prober;
use super::queue::WorkQueue;
use super::rate_limiter::RateLimiter;
use futures::FutureExt;
use std::net::{IpAddr, SocketAddr};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// State shared by every worker of one scan.
pub struct WorkerContext<P: ?Sized> {
    pub target: IpAddr,
    pub prober: Arc<P>,
    pub queue: Arc<WorkQueue>,
    pub results: Arc<ResultAggregator>,
    pub progress: Arc<ProgressTracker>,
    pub limiter: Option<RateLimiter>,
    pub cancel: CancellationToken,
}

impl<P: ?Sized> Clone for WorkerContext<P> {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            prober: Arc::clone(&self.prober),
            queue: Arc::clone(&self.queue),
            results: Arc::clone(&self.results),
            progress: Arc::clone(&self.progress),
            limiter: self.limiter.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

/// What the pool did, reported once every worker has stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Workers actually spawned.
    pub workers: usize,
    /// Probes that ran to completion.
    pub probed: usize,
}

/// A pool of at most `size` concurrent workers.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    size: usize,
}

impl WorkerPool {
    /// Create a pool that spawns up to `size` workers (at least one).
    pub fn new(size: usize) -> Self {
        Self { size: size.max(1) }
    }

    /// Number of workers needed for `work` items: never more than the work.
    pub fn workers_for(&self, work: usize) -> usize {
        self.size.min(work)
    }

    /// Spawn the workers. They start pulling from the queue immediately.
    pub fn spawn<P>(&self, ctx: WorkerContext<P>) -> RunningPool
    where
        P: Prober + ?Sized + 'static,
    {
        let workers = self.workers_for(ctx.queue.remaining());
        let mut tasks = JoinSet::new();
        for id in 0..workers {
            tasks.spawn(work(id, ctx.clone()));
        }
        tracing::debug!(workers, "worker pool started");

        RunningPool { tasks, workers }
    }

    /// Spawn the workers and wait until all of them have stopped.
    pub async fn run<P>(&self, ctx: WorkerContext<P>) -> PoolStats
    where
        P: Prober + ?Sized + 'static,
    {
        self.spawn(ctx).drain().await
    }
}

/// Workers that have been spawned and not yet joined.
pub struct RunningPool {
    tasks: JoinSet<usize>,
    workers: usize,
}

impl RunningPool {
    /// Wait for every worker to stop.
    ///
    /// Workers only stop on an exhausted queue or a cancelled scan, so once
    /// this returns no probe is in flight.
    pub async fn drain(mut self) -> PoolStats {
        let mut probed = 0;
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok(count) => probed += count,
                Err(e) => tracing::warn!(error = %e, "worker task failed"),
            }
        }

        PoolStats {
            workers: self.workers,
            probed,
        }
    }
}

/// One worker's loop. Returns how many probes it completed.
async fn work<P>(id: usize, ctx: WorkerContext<P>) -> usize
where
    P: Prober + ?Sized,
{
    let mut probed = 0;

    loop {
        if ctx.cancel.is_cancelled() {
            break;
        }
        let Some(port) = ctx.queue.take() else {
            break;
        };

        if let Some(limiter) = &ctx.limiter {
            tokio::select! {
                _ = limiter.wait() => {}
                _ = ctx.cancel.cancelled() => break,
            }
        }

        let addr = SocketAddr::new(ctx.target, port.as_u16());
        let reachable = AssertUnwindSafe(ctx.prober.probe(addr))
            .catch_unwind()
            .await
            .unwrap_or_else(|_| {
                tracing::warn!(%addr, "probe panicked, treating port as unreachable");
                false
            });

        if reachable {
            ctx.results.record(ProbeOutcome::new(port, true));
            ctx.progress.found(port.as_u16());
        }
        ctx.progress.increment();
        probed += 1;
    }

    tracing::trace!(worker = id, probed, "worker finished");
    probed
}
