use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StageStatus {
    /// Started but not yet finished.
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone)]
pub struct StageRecord {
    pub name: &'static str,
    pub status: StageStatus,
    pub started_at: Instant,
    pub completed_at: Option<Instant>,
}

impl StageRecord {
    /// Wall time spent in the stage, once it has finished.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        self.completed_at
            .map(|done| done.saturating_duration_since(self.started_at))
    }
}

/// Ordered trace of the stages a pipeline run entered.
#[derive(Debug, Default, Clone)]
pub struct RunLog {
    records: Vec<StageRecord>,
}

impl RunLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_start(&mut self, name: &'static str) {
        self.records.push(StageRecord {
            name,
            status: StageStatus::Running,
            started_at: Instant::now(),
            completed_at: None,
        });
    }

    pub(crate) fn record_success(&mut self) {
        self.finish_last(StageStatus::Completed);
    }

    pub(crate) fn record_failure(&mut self) {
        self.finish_last(StageStatus::Failed);
    }

    fn finish_last(&mut self, status: StageStatus) {
        if let Some(record) = self.records.last_mut() {
            record.status = status;
            record.completed_at = Some(Instant::now());
        }
    }

    #[must_use]
    pub fn records(&self) -> &[StageRecord] {
        &self.records
    }

    /// Name of the stage that failed, if the run failed.
    #[must_use]
    pub fn failed_stage(&self) -> Option<&'static str> {
        self.records
            .iter()
            .find(|r| r.status == StageStatus::Failed)
            .map(|r| r.name)
    }

    /// Names of the stages that completed, in execution order.
    #[must_use]
    pub fn completed_stages(&self) -> Vec<&'static str> {
        self.records
            .iter()
            .filter(|r| r.status == StageStatus::Completed)
            .map(|r| r.name)
            .collect()
    }

    /// One line per stage, suitable for terminal output.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut lines = Vec::new();
        for record in &self.records {
            let status = match record.status {
                StageStatus::Running => "…",
                StageStatus::Completed => "✓",
                StageStatus::Failed => "✗",
            };
            lines.push(format!("{status} {}", record.name));
        }
        lines.join("\n")
    }
}
