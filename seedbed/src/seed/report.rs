//! Structured results of a seeding run.

use crate::host::{ContentModel, RecordId};
use crate::pipeline::PipelineMetrics;

#[derive(Debug, Clone, PartialEq)]
pub enum EntryStatus {
    Created { id: RecordId },
    Failed { reason: String },
}

/// Result of importing one seed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryOutcome {
    pub model: ContentModel,
    pub label: String,
    pub status: EntryStatus,
}

impl EntryOutcome {
    pub fn created(model: ContentModel, label: String, id: RecordId) -> Self {
        Self {
            model,
            label,
            status: EntryStatus::Created { id },
        }
    }

    pub fn failed(model: ContentModel, label: String, reason: String) -> Self {
        Self {
            model,
            label,
            status: EntryStatus::Failed { reason },
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self.status, EntryStatus::Created { .. })
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match &self.status {
            EntryStatus::Failed { reason } => Some(reason),
            EntryStatus::Created { .. } => None,
        }
    }
}

/// Everything a seeding run did.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    pub permissions_granted: usize,
    pub entries: Vec<EntryOutcome>,
    pub metrics: PipelineMetrics,
}

impl SeedReport {
    pub fn created_count(&self, model: ContentModel) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.model == model && entry.is_created())
            .count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &EntryOutcome> {
        self.entries.iter().filter(|entry| !entry.is_created())
    }

    pub fn is_complete(&self) -> bool {
        self.failures().next().is_none()
    }

    pub fn log_summary(&self) {
        for model in ContentModel::ALL {
            let total = self.entries.iter().filter(|e| e.model == model).count();
            tracing::info!(
                model = %model,
                created = self.created_count(model),
                total,
                duration_ms = self
                    .metrics
                    .stage(model.as_str())
                    .map(|stage| stage.duration_ms)
                    .unwrap_or(0),
                "Seed phase finished"
            );
        }

        let failed = self.failures().count();
        if failed > 0 {
            tracing::warn!(
                failed,
                permissions = self.permissions_granted,
                total_ms = self.metrics.total_duration_ms,
                "Seeding finished with failures"
            );
        } else {
            tracing::info!(
                entries = self.entries.len(),
                permissions = self.permissions_granted,
                total_ms = self.metrics.total_duration_ms,
                "Seeding finished"
            );
        }
    }
}
