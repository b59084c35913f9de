//! Task: import one seed record.

use async_trait::async_trait;

use seedbed_shared::SeedbedResult;

use super::{SeedCtx, task_start};
use crate::pipeline::PipelineTask;
use crate::seed::records::SeedRecord;

pub(crate) struct EntryTask<R> {
    name: String,
    record: R,
}

impl<R: SeedRecord> EntryTask<R> {
    pub fn new(record: R) -> Self {
        Self {
            name: format!("{}:{}", R::MODEL, record.label()),
            record,
        }
    }
}

#[async_trait]
impl<R: SeedRecord> PipelineTask<SeedCtx> for EntryTask<R> {
    /// Always succeeds; failures are recorded in the report.
    async fn run(self: Box<Self>, ctx: SeedCtx) -> SeedbedResult<()> {
        task_start(&self.name);

        let EntryTask { record, .. } = *self;
        let outcome = ctx.importer.import_record(record, &ctx.resolver).await;

        ctx.report.lock().entries.push(outcome);
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
