//! Task trait for pipeline execution.

use async_trait::async_trait;
use seedbed_shared::SeedbedResult;

/// A unit of work run by the pipeline with a shared, cloned context.
#[async_trait]
pub trait PipelineTask<Ctx>: Send + Sync {
    async fn run(self: Box<Self>, ctx: Ctx) -> SeedbedResult<()>;

    /// Name used in logs and metrics.
    fn name(&self) -> &str;
}

pub type BoxedTask<Ctx> = Box<dyn PipelineTask<Ctx>>;
