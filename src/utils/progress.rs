//! Periodic progress logging while streaming records.

use std::time::Instant;

use tracing::info;

/// Default number of records between progress messages
pub const DEFAULT_PROGRESS_INTERVAL: u64 = 1_000_000;

/// Logs every `interval` records with the last position seen
#[derive(Debug)]
pub struct ProgressLogger {
    interval: u64,
    count: u64,
    last_contig: Option<String>,
    last_position: Option<usize>,
    started: Instant,
}

impl ProgressLogger {
    #[must_use]
    pub fn new(interval: u64) -> Self {
        Self {
            interval: interval.max(1),
            count: 0,
            last_contig: None,
            last_position: None,
            started: Instant::now(),
        }
    }

    /// Count one record; returns true when a progress message was emitted
    pub fn record(&mut self, contig: Option<&str>, position: Option<usize>) -> bool {
        self.count += 1;

        if self.last_contig.as_deref() != contig {
            self.last_contig = contig.map(str::to_string);
        }
        self.last_position = position;

        if self.count % self.interval != 0 {
            return false;
        }

        info!(
            records = self.count,
            contig = self.last_contig.as_deref().unwrap_or("*"),
            position = self.last_position.unwrap_or(0),
            elapsed_secs = self.started.elapsed().as_secs(),
            "Processed records"
        );
        true
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Log the final count
    pub fn finish(&self) {
        info!(
            records = self.count,
            elapsed_secs = self.started.elapsed().as_secs(),
            "Finished"
        );
    }
}

impl Default for ProgressLogger {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRESS_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logs_on_interval() {
        let mut progress = ProgressLogger::new(3);
        let logged: Vec<bool> = (0..7)
            .map(|i| progress.record(Some("chr1"), Some(i)))
            .collect();
        assert_eq!(logged, vec![false, false, true, false, false, true, false]);
        assert_eq!(progress.count(), 7);
        assert_eq!(progress.last_position, Some(6));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let mut progress = ProgressLogger::new(0);
        assert!(progress.record(None, None));
        assert!(progress.record(None, None));
    }
}
