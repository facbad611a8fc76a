//! Translation options.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslateOptions {
    /// Worker threads for the body pass. `None` uses the global rayon pool.
    pub jobs: Option<usize>,
    /// Store side-effecting `dup` operands in a temporary instead of
    /// evaluating them once per consumer.
    pub materialize_dup: bool,
}

impl TranslateOptions {
    #[must_use]
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = Some(jobs);
        self
    }

    #[must_use]
    pub fn with_materialize_dup(mut self, enabled: bool) -> Self {
        self.materialize_dup = enabled;
        self
    }
}
