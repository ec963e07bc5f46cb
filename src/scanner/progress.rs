//! Scan progress tracking.
//!
//! The count of completed probes lives in an atomic, separate from the
//! result lock. Rendering through `indicatif` is optional and purely
//! observational: a hidden tracker still counts.

use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};

const BAR_TEMPLATE: &str =
    "Scanning: [{bar:50.cyan/blue}] {percent}% ({pos}/{len}) {elapsed_precise} {msg}";

/// Monotonic counter of completed probes, optionally drawn as a bar.
pub struct ProgressTracker {
    done: AtomicUsize,
    total: usize,
    bar: Option<ProgressBar>,
}

impl ProgressTracker {
    /// A tracker that counts without drawing anything.
    pub fn hidden(total: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            bar: None,
        }
    }

    /// A tracker that also draws a progress bar on stderr.
    pub fn with_bar(total: usize) -> Self {
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-");
        let bar = ProgressBar::new(total as u64);
        bar.set_style(style);

        Self {
            done: AtomicUsize::new(0),
            total,
            bar: Some(bar),
        }
    }

    /// Count one completed probe.
    pub fn increment(&self) {
        self.done.fetch_add(1, Ordering::Relaxed);
        if let Some(bar) = &self.bar {
            bar.inc(1);
        }
    }

    /// Note an open port on the bar, if one is drawn.
    pub fn found(&self, port: u16) {
        if let Some(bar) = &self.bar {
            bar.set_message(format!("open: {}", port));
        }
    }

    /// Probes completed so far.
    pub fn value(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }

    /// Total number of probes expected.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Close the bar after a completed scan.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message("done");
        }
    }

    /// Leave the bar where it stopped after an aborted scan.
    pub fn abandon(&self) {
        if let Some(bar) = &self.bar {
            bar.abandon_with_message("interrupted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_hidden_tracker_counts() {
        let progress = ProgressTracker::hidden(3);
        progress.increment();
        progress.increment();
        assert_eq!(progress.value(), 2);
        assert_eq!(progress.total(), 3);
        progress.finish();
    }

    #[test]
    fn test_concurrent_increment() {
        let progress = Arc::new(ProgressTracker::hidden(4000));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let progress = Arc::clone(&progress);
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        progress.increment();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(progress.value(), 4000);
    }

    #[test]
    fn test_bar_tracks_value() {
        let progress = ProgressTracker::with_bar(2);
        progress.increment();
        progress.found(80);
        assert_eq!(progress.value(), 1);
        progress.abandon();
    }
}
