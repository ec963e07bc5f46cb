//! Shared work queue of ports still to be probed.
//!
//! The queue is a cursor over a [`PortRange`]: withdrawing a port is a single
//! atomic increment, so concurrent workers can never receive the same port
//! and no port is skipped. Withdrawal never waits; an exhausted queue is the
//! workers' signal to stop.

use crate::types::{Port, PortRange};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Exactly-once distribution of the ports in a range.
#[derive(Debug)]
pub struct WorkQueue {
    range: PortRange,
    cursor: AtomicUsize,
}

impl WorkQueue {
    /// Create a queue holding every port in `range` once.
    pub fn new(range: PortRange) -> Self {
        Self {
            range,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Withdraw the next port, or `None` once every port has been handed out.
    pub fn take(&self) -> Option<Port> {
        let offset = self.cursor.fetch_add(1, Ordering::Relaxed);
        self.range.nth(offset)
    }

    /// Total number of ports the queue was created with.
    pub fn total(&self) -> usize {
        self.range.len()
    }

    /// Number of ports withdrawn so far.
    pub fn withdrawn(&self) -> usize {
        self.cursor.load(Ordering::Relaxed).min(self.range.len())
    }

    /// Number of ports not yet withdrawn.
    pub fn remaining(&self) -> usize {
        self.total() - self.withdrawn()
    }

    /// Whether every port has been withdrawn.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_single_port_queue() {
        let queue = WorkQueue::new(PortRange::new(443, 443).unwrap());
        assert_eq!(queue.take(), Port::new(443));
        assert!(queue.is_exhausted());
        assert_eq!(queue.take(), None);
        assert_eq!(queue.take(), None);
        assert_eq!(queue.withdrawn(), 1);
    }

    #[test]
    fn test_take_in_order() {
        let queue = WorkQueue::new(PortRange::new(10, 12).unwrap());
        let taken: Vec<u16> = std::iter::from_fn(|| queue.take())
            .map(Port::as_u16)
            .collect();
        assert_eq!(taken, vec![10, 11, 12]);
        assert_eq!(queue.remaining(), 0);
    }

    #[test]
    fn test_upper_edge_of_port_space() {
        let queue = WorkQueue::new(PortRange::new(65534, 65535).unwrap());
        assert_eq!(queue.take(), Port::new(65534));
        assert_eq!(queue.take(), Port::new(65535));
        assert_eq!(queue.take(), None);
    }

    #[test]
    fn test_concurrent_take_is_exactly_once() {
        let range = PortRange::new(1, 20_000).unwrap();
        let queue = Arc::new(WorkQueue::new(range));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let queue = Arc::clone(&queue);
                std::thread::spawn(move || {
                    let mut mine = Vec::new();
                    while let Some(port) = queue.take() {
                        mine.push(port);
                    }
                    mine
                })
            })
            .collect();

        let mut seen = HashSet::new();
        let mut count = 0;
        for handle in handles {
            for port in handle.join().unwrap() {
                assert!(seen.insert(port), "port {} handed out twice", port);
                count += 1;
            }
        }

        assert_eq!(count, range.len());
        assert!(range.iter().all(|p| seen.contains(&p)));
        assert!(queue.is_exhausted());
    }
}
