//! Seed orchestration.
//!
//! ## Execution plan
//!
//! ```text
//! 1. permissions   (grant public read on every seeded type)
//! 2. category ─┬─  (one task per entry, bounded fan-out)
//! 3. writer   ─┤   (picture: <email>.jpg)
//! 4. article  ─┤   (image: <slug>.jpg, force-published)
//! 5. global   ─┘   (favicon.png, default-image.png)
//! ```
//!
//! Phases run strictly in order. Entry failures are recorded and never stop
//! the run; a permissions failure aborts everything after it.

use std::sync::Arc;

use seedbed_shared::SeedbedResult;

use super::dataset::SeedDataset;
use super::permissions::{PermissionMapping, default_public_permissions};
use super::records::SeedRecord;
use super::report::SeedReport;
use super::tasks::{EntryTask, PublicPermissionsTask, SeedCtx, SeedPipelineContext};
use crate::config::DEFAULT_MAX_CONCURRENCY;
use crate::files::FileResolver;
use crate::host::{ContentModel, Host};
use crate::pipeline::{BoxedTask, ExecutionPlan, PipelineBuilder, PipelineExecutor, Stage};

pub const PERMISSIONS_STAGE: &str = "permissions";

pub struct SeedOrchestrator {
    host: Host,
    resolver: FileResolver,
    dataset: SeedDataset,
    permissions: PermissionMapping,
    max_concurrency: usize,
}

impl SeedOrchestrator {
    pub fn new(host: Host, resolver: FileResolver, dataset: SeedDataset) -> Self {
        Self {
            host,
            resolver,
            dataset,
            permissions: default_public_permissions(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    pub fn with_permissions(mut self, permissions: PermissionMapping) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    /// Run every seeding phase and report per-entry outcomes.
    pub async fn import_seed_data(self) -> SeedbedResult<SeedReport> {
        let SeedOrchestrator {
            host,
            resolver,
            dataset,
            permissions,
            max_concurrency,
        } = self;

        tracing::info!(
            entries = dataset.entry_count(),
            max_concurrency,
            "Bootstrapping seed data"
        );

        let ctx: SeedCtx = Arc::new(SeedPipelineContext::new(host, resolver));
        let plan = execution_plan(dataset, permissions, max_concurrency);
        let pipeline = PipelineBuilder::from_plan(plan);
        let metrics = PipelineExecutor::execute(pipeline, Arc::clone(&ctx)).await?;

        let mut report = std::mem::take(&mut *ctx.report.lock());
        report.metrics = metrics;
        report.log_summary();

        Ok(report)
    }
}

fn execution_plan(
    dataset: SeedDataset,
    permissions: PermissionMapping,
    max_concurrency: usize,
) -> ExecutionPlan<SeedCtx> {
    let SeedDataset {
        categories,
        writers,
        articles,
        global,
    } = dataset;

    let stages: Vec<Stage<BoxedTask<SeedCtx>>> = vec![
        Stage::sequential(vec![
            Box::new(PublicPermissionsTask::new(permissions)) as BoxedTask<SeedCtx>
        ])
        .with_label(PERMISSIONS_STAGE),
        Stage::parallel_bounded(entry_tasks(categories), max_concurrency)
            .with_label(ContentModel::Category.as_str()),
        Stage::parallel_bounded(entry_tasks(writers), max_concurrency)
            .with_label(ContentModel::Writer.as_str()),
        Stage::parallel_bounded(entry_tasks(articles), max_concurrency)
            .with_label(ContentModel::Article.as_str()),
        Stage::sequential(entry_tasks(global)).with_label(ContentModel::Global.as_str()),
    ];

    ExecutionPlan::new(stages)
}

fn entry_tasks<R, I>(records: I) -> Vec<BoxedTask<SeedCtx>>
where
    R: SeedRecord,
    I: IntoIterator<Item = R>,
{
    records
        .into_iter()
        .map(|record| Box::new(EntryTask::new(record)) as BoxedTask<SeedCtx>)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{HostEvent, InMemoryHost};
    use serde_json::json;
    use tempfile::TempDir;

    fn dataset() -> SeedDataset {
        serde_json::from_value(json!({
            "categories": [
                {"name": "news", "slug": "news"},
                {"name": "tech", "slug": "tech"}
            ],
            "writers": [{"name": "David Doe", "email": "daviddoe@strapi.io"}],
            "articles": [{"title": "Hello", "slug": "hello", "publishedAt": null}],
            "global": {"siteName": "Blog", "defaultSeo": {"metaTitle": "Page", "metaDescription": "d"}}
        }))
        .unwrap()
    }

    fn uploads(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"bytes").unwrap();
        }
        dir
    }

    fn all_uploads() -> TempDir {
        uploads(&[
            "daviddoe@strapi.io.jpg",
            "hello.jpg",
            "favicon.png",
            "default-image.png",
        ])
    }

    #[tokio::test]
    async fn test_phases_run_in_order() {
        let dir = all_uploads();
        let memory = Arc::new(InMemoryHost::new());
        let orchestrator =
            SeedOrchestrator::new(memory.host(), FileResolver::new(dir.path()), dataset());

        let report = orchestrator.import_seed_data().await.unwrap();

        assert!(report.is_complete());
        assert_eq!(report.permissions_granted, 7);
        let creates: Vec<ContentModel> = memory
            .events()
            .into_iter()
            .filter_map(|event| match event {
                HostEvent::Create { model } => Some(model),
                _ => None,
            })
            .collect();
        assert_eq!(
            creates,
            vec![
                ContentModel::Category,
                ContentModel::Category,
                ContentModel::Writer,
                ContentModel::Article,
                ContentModel::Global,
            ]
        );
        // Every grant lands before the first content write
        let first_create = memory
            .events()
            .iter()
            .position(|e| matches!(e, HostEvent::Create { .. }))
            .unwrap();
        let last_grant = memory
            .events()
            .iter()
            .rposition(|e| matches!(e, HostEvent::Grant { .. }))
            .unwrap();
        assert!(last_grant < first_create);

        let labels: Vec<_> = report
            .metrics
            .stages
            .iter()
            .map(|s| s.label.clone().unwrap())
            .collect();
        assert_eq!(
            labels,
            vec!["permissions", "category", "writer", "article", "global"]
        );
    }

    #[tokio::test]
    async fn test_article_published_and_images_attached() {
        let dir = all_uploads();
        let memory = Arc::new(InMemoryHost::new());

        SeedOrchestrator::new(memory.host(), FileResolver::new(dir.path()), dataset())
            .import_seed_data()
            .await
            .unwrap();

        let article = &memory.content(ContentModel::Article)[0].fields;
        assert!(article["publishedAt"].is_string());
        assert!(article["image"].is_string());

        let writer = &memory.content(ContentModel::Writer)[0].fields;
        let uploads = memory.uploads();
        assert!(
            uploads
                .iter()
                .any(|(_, asset)| serde_json::Value::from(asset.id.clone()) == writer["picture"])
        );
    }

    #[tokio::test]
    async fn test_entry_failure_does_not_stop_later_phases() {
        let dir = all_uploads();
        let memory = Arc::new(InMemoryHost::new().fail_upload_of("daviddoe@strapi.io.jpg"));

        let report = SeedOrchestrator::new(memory.host(), FileResolver::new(dir.path()), dataset())
            .import_seed_data()
            .await
            .unwrap();

        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.created_count(ContentModel::Writer), 0);
        assert_eq!(report.created_count(ContentModel::Article), 1);
        assert_eq!(report.created_count(ContentModel::Global), 1);
        assert_eq!(memory.calls().content_creates, 4);
    }

    #[tokio::test]
    async fn test_sibling_entries_survive_a_failed_upload() {
        let dir = uploads(&["one.jpg", "three.jpg"]);
        let memory = Arc::new(InMemoryHost::new().fail_upload_of("one.jpg"));
        let dataset: SeedDataset = serde_json::from_value(json!({
            "articles": [
                {"title": "1", "slug": "one"},
                {"title": "2", "slug": "two"},
                {"title": "3", "slug": "three"}
            ]
        }))
        .unwrap();

        let report = SeedOrchestrator::new(memory.host(), FileResolver::new(dir.path()), dataset)
            .with_max_concurrency(2)
            .import_seed_data()
            .await
            .unwrap();

        // one: upload rejected, two: file missing, three: created
        assert_eq!(report.created_count(ContentModel::Article), 1);
        assert_eq!(report.failures().count(), 2);
        assert_eq!(memory.calls().uploads, 2);
        assert_eq!(memory.calls().content_creates, 1);
    }

    #[tokio::test]
    async fn test_missing_public_role_aborts_seeding() {
        let dir = all_uploads();
        let memory = Arc::new(InMemoryHost::new().without_public_role());

        let result = SeedOrchestrator::new(memory.host(), FileResolver::new(dir.path()), dataset())
            .import_seed_data()
            .await;

        assert!(result.is_err());
        let calls = memory.calls();
        assert_eq!(calls.content_creates, 0);
        assert_eq!(calls.uploads, 0);
    }

    #[tokio::test]
    async fn test_custom_permission_mapping() {
        let memory = Arc::new(InMemoryHost::new());
        let dir = uploads(&[]);

        let report =
            SeedOrchestrator::new(memory.host(), FileResolver::new(dir.path()), SeedDataset::default())
                .with_permissions(vec![("global".into(), vec!["find".into()])])
                .import_seed_data()
                .await
                .unwrap();

        assert_eq!(report.permissions_granted, 1);
        assert!(report.entries.is_empty());
    }
}
