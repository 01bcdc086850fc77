use super::stats::{QueueStats, QueueWork};
use super::Transition;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::fmt::Debug;
use tracing::debug;

/// Priority queue of pending [Transition]s, extracting the earliest one first.
///
/// Instrumentation is layered on top of an implementation by wrapping it, see [QueueOptions].
pub trait EventQueue: Debug {
    /// Inserts `transition` in the queue.
    fn push(&mut self, transition: Transition);

    /// Returns the earliest transition without removing it.
    fn peek(&self) -> Option<&Transition>;

    /// Removes the earliest transition and returns it.
    fn pop(&mut self) -> Option<Transition>;

    /// Returns the number of pending transitions.
    fn len(&self) -> usize;

    /// Returns true if there are no pending transitions.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the workload statistics if the queue is instrumented.
    fn stats(&self) -> Option<QueueStats> {
        None
    }
}

/// [EventQueue] backed by a binary min-heap.
#[derive(Debug, Clone, Default)]
pub struct HeapQueue {
    heap: BinaryHeap<Reverse<Transition>>,
}

impl HeapQueue {
    /// Returns an empty [HeapQueue].
    pub fn new() -> Self {
        Default::default()
    }
}

impl EventQueue for HeapQueue {
    #[inline(always)]
    fn push(&mut self, transition: Transition) {
        self.heap.push(Reverse(transition))
    }

    #[inline(always)]
    fn peek(&self) -> Option<&Transition> {
        self.heap.peek().map(|Reverse(t)| t)
    }

    #[inline(always)]
    fn pop(&mut self) -> Option<Transition> {
        self.heap.pop().map(|Reverse(t)| t)
    }

    #[inline(always)]
    fn len(&self) -> usize {
        self.heap.len()
    }
}

/// Wraps an [EventQueue] to record its length on every insertion and extraction.
#[derive(Debug, Clone, Default)]
pub struct StatsQueue<Q> {
    inner: Q,
    work: QueueWork,
}

impl<Q: EventQueue> StatsQueue<Q> {
    /// Returns a new [StatsQueue] instrumenting `inner`.
    pub fn new(inner: Q) -> Self {
        StatsQueue {
            inner,
            work: Default::default(),
        }
    }
}

impl<Q: EventQueue> EventQueue for StatsQueue<Q> {
    fn push(&mut self, transition: Transition) {
        self.work.record_insert(self.inner.len());
        self.inner.push(transition)
    }

    fn peek(&self) -> Option<&Transition> {
        self.inner.peek()
    }

    fn pop(&mut self) -> Option<Transition> {
        self.work.record_extract(self.inner.len());
        self.inner.pop()
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn stats(&self) -> Option<QueueStats> {
        Some(self.work.stats())
    }
}

/// Wraps an [EventQueue] to log every insertion and extraction at debug level.
#[derive(Debug, Clone, Default)]
pub struct TracingQueue<Q> {
    inner: Q,
}

impl<Q: EventQueue> TracingQueue<Q> {
    /// Returns a new [TracingQueue] logging the operations on `inner`.
    pub fn new(inner: Q) -> Self {
        TracingQueue { inner }
    }
}

impl<Q: EventQueue> EventQueue for TracingQueue<Q> {
    fn push(&mut self, transition: Transition) {
        debug!("+ {}", transition);
        self.inner.push(transition)
    }

    fn peek(&self) -> Option<&Transition> {
        self.inner.peek()
    }

    fn pop(&mut self) -> Option<Transition> {
        let transition = self.inner.pop();
        if let Some(transition) = &transition {
            debug!("- {}", transition);
        }
        transition
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    fn stats(&self) -> Option<QueueStats> {
        self.inner.stats()
    }
}

impl EventQueue for Box<dyn EventQueue> {
    fn push(&mut self, transition: Transition) {
        (**self).push(transition)
    }

    fn peek(&self) -> Option<&Transition> {
        (**self).peek()
    }

    fn pop(&mut self) -> Option<Transition> {
        (**self).pop()
    }

    fn len(&self) -> usize {
        (**self).len()
    }

    fn stats(&self) -> Option<QueueStats> {
        (**self).stats()
    }
}

/// Selects the instrumentation wrapped around the [HeapQueue] of a simulation.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct QueueOptions {
    /// Collect workload statistics, see [QueueStats].
    pub stats: bool,
    /// Log every queue operation at debug level.
    pub debug: bool,
}

impl QueueOptions {
    /// Returns a new queue, wrapped according to `self`.
    pub fn build(&self) -> Box<dyn EventQueue> {
        let mut queue: Box<dyn EventQueue> = Box::new(HeapQueue::new());
        if self.stats {
            queue = Box::new(StatsQueue::new(queue));
        }
        if self.debug {
            queue = Box::new(TracingQueue::new(queue));
        }
        queue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuit::GateIndex;

    fn t(time: u64, id: u64) -> Transition {
        Transition::new(GateIndex::new(0), true, time, id)
    }

    fn drain(queue: &mut dyn EventQueue) -> Vec<(u64, u64)> {
        let mut out = Vec::new();
        while let Some(transition) = queue.pop() {
            out.push((transition.time, transition.id));
        }
        out
    }

    #[test]
    fn test_heap_order() {
        let mut queue = HeapQueue::new();
        assert!(queue.is_empty());
        assert_eq!(queue.peek(), None);

        queue.push(t(5, 0));
        queue.push(t(1, 1));
        queue.push(t(5, 2));
        queue.push(t(1, 3));
        queue.push(t(0, 4));
        assert_eq!(queue.len(), 5);
        assert_eq!(queue.peek(), Some(&t(0, 4)));

        assert_eq!(
            drain(&mut queue),
            vec![(0, 4), (1, 1), (1, 3), (5, 0), (5, 2)]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_wrappers_keep_order() {
        for stats in [false, true] {
            for debug in [false, true] {
                let mut queue = QueueOptions { stats, debug }.build();
                for (i, time) in [3, 1, 2, 1].iter().enumerate() {
                    queue.push(t(*time, i as u64));
                }
                assert_eq!(
                    drain(&mut queue),
                    vec![(1, 1), (1, 3), (2, 2), (3, 0)],
                    "stats: {}, debug: {}",
                    stats,
                    debug
                );
                assert_eq!(queue.stats().is_some(), stats);
            }
        }
    }

    #[test]
    fn test_stats_queue() {
        let mut queue = StatsQueue::new(HeapQueue::new());
        queue.push(t(0, 0));
        queue.push(t(0, 1));
        queue.pop();
        queue.push(t(0, 2));
        queue.pop();
        queue.pop();
        // Popping an empty queue still counts as an extraction.
        queue.pop();

        let stats = queue.stats().unwrap();
        assert_eq!(stats.max_length, 2);
        assert_eq!(stats.insert_count, 3);
        assert_eq!(stats.insert_avg, 2. / 3.);
        assert_eq!(stats.extract_count, 4);
        assert_eq!(stats.extract_avg, 5. / 4.);
    }

    #[test]
    fn test_tracing_queue_forwards_stats() {
        let queue = TracingQueue::new(StatsQueue::new(HeapQueue::new()));
        assert_eq!(queue.stats(), Some(QueueStats::default()));
        assert_eq!(TracingQueue::new(HeapQueue::new()).stats(), None);
    }
}
