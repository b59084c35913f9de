//! Task: grant public read permissions.

use async_trait::async_trait;

use seedbed_shared::SeedbedResult;

use super::{SeedCtx, task_start};
use crate::pipeline::PipelineTask;
use crate::seed::permissions::{PermissionInitializer, PermissionMapping};

pub(crate) struct PublicPermissionsTask {
    mapping: PermissionMapping,
}

impl PublicPermissionsTask {
    pub fn new(mapping: PermissionMapping) -> Self {
        Self { mapping }
    }
}

#[async_trait]
impl PipelineTask<SeedCtx> for PublicPermissionsTask {
    /// Errors here abort the remaining phases.
    async fn run(self: Box<Self>, ctx: SeedCtx) -> SeedbedResult<()> {
        task_start(self.name());

        let initializer = PermissionInitializer::new(ctx.host.permissions.clone());
        let granted = initializer
            .set_public_permissions(&self.mapping)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Public permission setup failed"))?;

        ctx.report.lock().permissions_granted += granted;
        Ok(())
    }

    fn name(&self) -> &str {
        "public_permissions"
    }
}
