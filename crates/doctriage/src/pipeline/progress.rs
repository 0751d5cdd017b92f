use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;

/// Pipeline stages, for observability only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskPhase {
    Hashing,
    Classifying,
    AwaitingOperator,
    Moving,
    RegisteringDuplicate,
}

/// Events emitted by the pipeline during processing.
pub enum ProgressEvent {
    Phase {
        phase: TaskPhase,
        message: String,
    },
    Completed {
        destination: String,
        category: Option<String>,
        duplicate: bool,
    },
    Failed {
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Reporter that forwards phase transitions to the log.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase { phase, message } => {
                debug!("{:?}: {}", phase, message);
            }
            ProgressEvent::Completed {
                destination,
                category,
                duplicate,
            } => {
                debug!(
                    "Completed -> {} (category: {:?}, duplicate: {})",
                    destination, category, duplicate
                );
            }
            ProgressEvent::Failed { error } => {
                debug!("Failed: {}", error);
            }
        }
    }
}

/// Process-wide completed/total counter. Incremented exactly once per
/// finished task, success or failure.
pub struct ProgressCounter {
    completed: AtomicUsize,
    total: usize,
}

impl ProgressCounter {
    pub fn new(total: usize) -> Self {
        Self {
            completed: AtomicUsize::new(0),
            total,
        }
    }

    /// Records one finished task and returns the new completed count.
    pub fn record(&self) -> usize {
        self.completed.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    pub fn total(&self) -> usize {
        self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_counts_each_record_once() {
        let counter = ProgressCounter::new(3);
        assert_eq!(counter.completed(), 0);
        assert_eq!(counter.record(), 1);
        assert_eq!(counter.record(), 2);
        assert_eq!(counter.record(), 3);
        assert_eq!(counter.completed(), counter.total());
    }

    #[test]
    fn test_counter_is_safe_across_threads() {
        let counter = ProgressCounter::new(100);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..25 {
                        counter.record();
                    }
                });
            }
        });
        assert_eq!(counter.completed(), 100);
    }
}
