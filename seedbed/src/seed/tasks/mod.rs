//! Pipeline tasks for the seeding phases.

mod entry;
mod permissions;

pub(crate) use entry::EntryTask;
pub(crate) use permissions::PublicPermissionsTask;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::files::FileResolver;
use crate::host::Host;
use crate::seed::importer::EntryImporter;
use crate::seed::report::SeedReport;

/// State shared by every task of one seeding run.
pub(crate) struct SeedPipelineContext {
    pub host: Host,
    pub importer: EntryImporter,
    pub resolver: FileResolver,
    pub report: Mutex<SeedReport>,
}

impl SeedPipelineContext {
    pub fn new(host: Host, resolver: FileResolver) -> Self {
        let importer = EntryImporter::new(&host);
        Self {
            host,
            importer,
            resolver,
            report: Mutex::new(SeedReport::default()),
        }
    }
}

pub(crate) type SeedCtx = Arc<SeedPipelineContext>;

fn task_start(task_name: &str) {
    tracing::trace!(task = task_name, "Seed task starting");
}
