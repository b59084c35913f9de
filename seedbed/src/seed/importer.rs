//! Entry importer: upload attachments, then create the entry.

use std::sync::Arc;

use serde_json::{Map, Value};

use seedbed_shared::{SeedbedError, SeedbedResult};

use super::records::{FileAttachment, SeedEntry, SeedRecord};
use super::report::EntryOutcome;
use crate::files::FileResolver;
use crate::host::{
    AssetStore, ContentModel, ContentRecord, ContentStore, FileInfo, Host, UploadRequest,
};

#[derive(Clone)]
pub struct EntryImporter {
    content: Arc<dyn ContentStore>,
    assets: Arc<dyn AssetStore>,
}

impl EntryImporter {
    pub fn new(host: &Host) -> Self {
        Self {
            content: Arc::clone(&host.content),
            assets: Arc::clone(&host.assets),
        }
    }

    /// Create one entry, uploading its files first.
    ///
    /// Never fails: any upload or create error is logged with the entry
    /// payload and returned as a failed outcome.
    pub async fn create_entry(
        &self,
        entry: SeedEntry,
        files: Vec<FileAttachment>,
    ) -> EntryOutcome {
        let SeedEntry {
            model,
            label,
            fields,
        } = entry;
        let payload = Value::Object(fields.clone());

        match self.upload_and_create(model, fields, files).await {
            Ok(record) => {
                tracing::debug!(model = %model, entry = %label, id = %record.id, "Created seed entry");
                EntryOutcome::created(model, label, record.id)
            }
            Err(e) => {
                tracing::warn!(
                    model = %model,
                    entry = %label,
                    payload = %payload,
                    error = %e,
                    "Failed to import seed entry"
                );
                EntryOutcome::failed(model, label, e.to_string())
            }
        }
    }

    /// Resolve a record's files and import it.
    ///
    /// A missing upload file, or a missing field an upload name derives
    /// from, fails this entry only.
    pub async fn import_record<R: SeedRecord>(
        &self,
        record: R,
        resolver: &FileResolver,
    ) -> EntryOutcome {
        let label = record.label();

        let files = match resolve_attachments(&record, resolver) {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(
                    model = %R::MODEL,
                    entry = %label,
                    error = %e,
                    "Seed attachments unavailable"
                );
                return EntryOutcome::failed(R::MODEL, label, e.to_string());
            }
        };

        match record.into_entry() {
            Ok(entry) => self.create_entry(entry, files).await,
            Err(e) => {
                tracing::warn!(model = %R::MODEL, entry = %label, error = %e, "Invalid seed record");
                EntryOutcome::failed(R::MODEL, label, e.to_string())
            }
        }
    }

    async fn upload_and_create(
        &self,
        model: ContentModel,
        mut fields: Map<String, Value>,
        files: Vec<FileAttachment>,
    ) -> SeedbedResult<ContentRecord> {
        for FileAttachment { slot, file } in files {
            let display_name = file.display_name().to_string();
            let bytes = tokio::fs::read(&file.path).await?;

            let assets = self
                .assets
                .upload(UploadRequest {
                    file,
                    bytes,
                    info: FileInfo::named(&display_name),
                })
                .await?;

            let asset = assets.into_iter().next().ok_or_else(|| {
                SeedbedError::Upload(format!("no asset returned for '{}'", display_name))
            })?;

            tracing::trace!(slot = slot.path(), asset = %asset.id, "Attached asset");
            slot.assign(&mut fields, asset.id);
        }

        self.content.create(model, fields).await
    }
}

fn resolve_attachments<R: SeedRecord>(
    record: &R,
    resolver: &FileResolver,
) -> SeedbedResult<Vec<FileAttachment>> {
    record
        .attachments()?
        .into_iter()
        .map(|(slot, name)| {
            Ok(FileAttachment {
                slot,
                file: resolver.resolve(&name)?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::memory::{CallCounts, HostEvent, InMemoryHost};
    use crate::seed::records::{AssetSlot, GlobalSeed, WriterSeed};
    use serde_json::json;
    use tempfile::TempDir;

    fn uploads_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::write(dir.path().join(name), b"image-bytes").unwrap();
        }
        dir
    }

    fn entry(model: ContentModel, fields: serde_json::Value) -> SeedEntry {
        SeedEntry {
            model,
            label: "test".into(),
            fields: fields.as_object().cloned().unwrap(),
        }
    }

    #[tokio::test]
    async fn test_entry_without_files_is_created_unmodified() {
        let memory = Arc::new(InMemoryHost::new());
        let importer = EntryImporter::new(&memory.host());
        let fields = json!({"name": "news", "slug": "news"});

        let outcome = importer
            .create_entry(entry(ContentModel::Category, fields.clone()), vec![])
            .await;

        assert!(outcome.is_created());
        let calls = memory.calls();
        assert_eq!(calls.content_creates, 1);
        assert_eq!(calls.uploads, 0);
        let stored = memory.content(ContentModel::Category);
        assert_eq!(Value::Object(stored[0].fields.clone()), fields);
    }

    #[tokio::test]
    async fn test_files_uploaded_before_create_and_replaced_by_ids() {
        let dir = uploads_dir(&["favicon.png", "default-image.png"]);
        let resolver = FileResolver::new(dir.path());
        let memory = Arc::new(InMemoryHost::new());
        let importer = EntryImporter::new(&memory.host());

        let files = vec![
            FileAttachment {
                slot: AssetSlot::Favicon,
                file: resolver.resolve("favicon.png").unwrap(),
            },
            FileAttachment {
                slot: AssetSlot::ShareImage,
                file: resolver.resolve("default-image.png").unwrap(),
            },
        ];
        let outcome = importer
            .create_entry(
                entry(
                    ContentModel::Global,
                    json!({"siteName": "Blog", "favicon": "favicon.png", "defaultSeo": {"metaTitle": "Page"}}),
                ),
                files,
            )
            .await;

        assert!(outcome.is_created());
        assert_eq!(
            memory.events(),
            vec![
                HostEvent::Upload {
                    name: "favicon.png".into()
                },
                HostEvent::Upload {
                    name: "default-image.png".into()
                },
                HostEvent::Create {
                    model: ContentModel::Global
                },
            ]
        );

        let uploads = memory.uploads();
        let stored = &memory.content(ContentModel::Global)[0].fields;
        assert_eq!(stored["favicon"], Value::from(uploads[0].1.id.clone()));
        assert_eq!(
            stored["defaultSeo"]["shareImage"],
            Value::from(uploads[1].1.id.clone())
        );
        assert_eq!(stored["defaultSeo"]["metaTitle"], json!("Page"));
        assert_eq!(uploads[0].0, FileInfo::named("favicon"));
        assert_eq!(uploads[1].1.mime, "image/png");
    }

    #[tokio::test]
    async fn test_upload_failure_skips_create_and_reports() {
        let dir = uploads_dir(&["a@example.com.jpg"]);
        let resolver = FileResolver::new(dir.path());
        let memory = Arc::new(InMemoryHost::new().fail_upload_of("a@example.com.jpg"));
        let importer = EntryImporter::new(&memory.host());

        let writer = WriterSeed {
            name: Some("A".into()),
            email: Some("a@example.com".into()),
            extra: Map::new(),
        };
        let outcome = importer.import_record(writer, &resolver).await;

        assert!(!outcome.is_created());
        assert!(outcome.failure_reason().unwrap().contains("provider rejected"));
        assert_eq!(memory.calls().content_creates, 0);
    }

    #[tokio::test]
    async fn test_empty_upload_response_fails_entry() {
        let dir = uploads_dir(&["favicon.png", "default-image.png"]);
        let resolver = FileResolver::new(dir.path());
        let memory = Arc::new(InMemoryHost::new().with_empty_uploads());
        let importer = EntryImporter::new(&memory.host());

        let global: GlobalSeed = serde_json::from_value(json!({"siteName": "Blog"})).unwrap();
        let outcome = importer.import_record(global, &resolver).await;

        assert!(outcome.failure_reason().unwrap().contains("no asset returned"));
        assert_eq!(memory.calls().uploads, 1);
        assert_eq!(memory.calls().content_creates, 0);
    }

    #[tokio::test]
    async fn test_missing_file_fails_entry_without_host_calls() {
        let dir = uploads_dir(&[]);
        let resolver = FileResolver::new(dir.path());
        let memory = Arc::new(InMemoryHost::new());
        let importer = EntryImporter::new(&memory.host());

        let writer = WriterSeed {
            name: Some("B".into()),
            email: Some("b@example.com".into()),
            extra: Map::new(),
        };
        let outcome = importer.import_record(writer, &resolver).await;

        assert!(outcome.failure_reason().unwrap().contains("file not found"));
        assert_eq!(memory.calls(), CallCounts::default());
    }

    #[tokio::test]
    async fn test_content_failure_is_reported() {
        let memory = Arc::new(InMemoryHost::new().fail_content_for(ContentModel::Category));
        let importer = EntryImporter::new(&memory.host());

        let outcome = importer
            .create_entry(entry(ContentModel::Category, json!({"slug": "x"})), vec![])
            .await;

        assert_eq!(outcome.model, ContentModel::Category);
        assert!(outcome.failure_reason().unwrap().contains("rejected the entry"));
    }
}
