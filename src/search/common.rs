use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// Progress of the one-time index build
#[derive(Debug, Default)]
pub struct IndexingStatus {
    /// Pages requested
    pub total: AtomicUsize,

    /// Pages whose retrieval settled, successfully or not
    pub completed: AtomicUsize,

    /// Pages dropped from the index
    pub errors: AtomicUsize,

    /// Set once every retrieval has settled
    pub is_complete: AtomicBool,
}

impl IndexingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, total: usize) {
        self.total.store(total, Ordering::SeqCst);
    }

    pub fn record_success(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn record_failure(&self) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    pub fn mark_complete(&self) {
        self.is_complete.store(true, Ordering::SeqCst);
    }

    pub fn is_complete(&self) -> bool {
        self.is_complete.load(Ordering::SeqCst)
    }

    /// Get progress percentage (0.0 - 100.0)
    pub fn progress(&self) -> f32 {
        let total = self.total.load(Ordering::SeqCst);
        if total == 0 {
            return if self.is_complete() { 100.0 } else { 0.0 };
        }
        self.completed.load(Ordering::SeqCst) as f32 / total as f32 * 100.0
    }

    /// Get status summary
    pub fn summary(&self) -> String {
        let total = self.total.load(Ordering::SeqCst);
        let completed = self.completed.load(Ordering::SeqCst);
        let errors = self.errors.load(Ordering::SeqCst);

        if self.is_complete() {
            format!(
                "Index ready: {} of {} pages indexed ({} failed)",
                total.saturating_sub(errors),
                total,
                errors
            )
        } else {
            format!("Indexing: {completed}/{total} pages settled ({errors} failed)")
        }
    }
}
