//! Workload statistics of an [EventQueue](super::EventQueue).
//!
//! ```
//! # use gatesim::simulation::{EventQueue, QueueOptions, Transition};
//! # use gatesim::circuit::GateIndex;
//! let mut queue = QueueOptions { stats: true, debug: false }.build();
//! queue.push(Transition::new(GateIndex::new(0), true, 0, 0));
//! queue.pop();
//!
//! let stats = queue.stats().unwrap();
//! assert_eq!(stats.insert_count, 1);
//! assert_eq!(stats.max_length, 1);
//!
//! // Show the statistics
//! println!("{}", stats);
//! ```

use std::fmt;

/// Lengths observed by an instrumented queue.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct QueueStats {
    /// Longest the queue ever got
    pub max_length: usize,
    /// Number of insertions
    pub insert_count: usize,
    /// Average queue length right before an insertion
    pub insert_avg: f64,
    /// Number of extractions
    pub extract_count: usize,
    /// Average queue length right before an extraction
    pub extract_avg: f64,
}

/// Running totals kept by [StatsQueue](super::StatsQueue).
#[derive(Clone, Copy, Debug, Default)]
pub(super) struct QueueWork {
    max_length: usize,
    insert_work: usize,
    insert_count: usize,
    extract_work: usize,
    extract_count: usize,
}

impl QueueWork {
    /// Record an insertion into a queue that had `length` items.
    pub(super) fn record_insert(&mut self, length: usize) {
        self.insert_work += length;
        self.insert_count += 1;
        self.max_length = self.max_length.max(length + 1);
    }

    /// Record an extraction from a queue that had `length` items.
    pub(super) fn record_extract(&mut self, length: usize) {
        self.extract_work += length;
        self.extract_count += 1;
    }

    pub(super) fn stats(&self) -> QueueStats {
        let avg = |work: usize, count: usize| {
            if count == 0 {
                0.
            } else {
                work as f64 / count as f64
            }
        };
        QueueStats {
            max_length: self.max_length,
            insert_count: self.insert_count,
            insert_avg: avg(self.insert_work, self.insert_count),
            extract_count: self.extract_count,
            extract_avg: avg(self.extract_work, self.extract_count),
        }
    }
}

impl fmt::Display for QueueStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Queue stats:")?;
        writeln!(f, "  Max length: {}", self.max_length)?;
        writeln!(f, "  Inserts: {}", self.insert_count)?;
        writeln!(f, "      avg length: {:.2}", self.insert_avg)?;
        writeln!(f, "  Extracts: {}", self.extract_count)?;
        writeln!(f, "      avg length: {:.2}", self.extract_avg)?;
        fmt::Result::Ok(())
    }
}
