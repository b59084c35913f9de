//! Typed seed records.
//!
//! Each content model has its own record type that knows which files it
//! carries and where their asset ids go. Attributes the types do not name
//! are kept in `extra` and forwarded untouched.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use seedbed_shared::{SeedbedError, SeedbedResult};

use crate::files::FileDescriptor;
use crate::host::{ContentModel, RecordId};

/// Entry field that receives an uploaded asset id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetSlot {
    /// `picture` on a writer.
    Picture,
    /// `image` on an article.
    Image,
    /// `favicon` on the global settings.
    Favicon,
    /// `defaultSeo.shareImage` on the global settings.
    ShareImage,
}

impl AssetSlot {
    pub fn path(&self) -> &'static str {
        match self {
            AssetSlot::Picture => "picture",
            AssetSlot::Image => "image",
            AssetSlot::Favicon => "favicon",
            AssetSlot::ShareImage => "defaultSeo.shareImage",
        }
    }

    /// Store `id` in the slot, replacing whatever was there.
    pub fn assign(&self, fields: &mut Map<String, Value>, id: RecordId) {
        match self {
            AssetSlot::Picture => {
                fields.insert("picture".to_string(), id.into());
            }
            AssetSlot::Image => {
                fields.insert("image".to_string(), id.into());
            }
            AssetSlot::Favicon => {
                fields.insert("favicon".to_string(), id.into());
            }
            AssetSlot::ShareImage => {
                let seo = fields
                    .entry("defaultSeo")
                    .or_insert_with(|| Value::Object(Map::new()));
                if !seo.is_object() {
                    *seo = Value::Object(Map::new());
                }
                if let Value::Object(seo) = seo {
                    seo.insert("shareImage".to_string(), id.into());
                }
            }
        }
    }
}

/// A file resolved for a slot.
#[derive(Debug, Clone)]
pub struct FileAttachment {
    pub slot: AssetSlot,
    pub file: FileDescriptor,
}

/// Content ready for the importer.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedEntry {
    pub model: ContentModel,
    /// Human-readable handle for logs, e.g. a slug or email.
    pub label: String,
    pub fields: Map<String, Value>,
}

pub trait SeedRecord: Serialize + Send + Sync + Sized + 'static {
    const MODEL: ContentModel;

    fn label(&self) -> String;

    /// Logical upload names this record references, per slot.
    ///
    /// Fails when a field the file names derive from is missing.
    fn attachments(&self) -> SeedbedResult<Vec<(AssetSlot, String)>> {
        Ok(Vec::new())
    }

    /// Adjust serialized fields before creation.
    fn finalize(_fields: &mut Map<String, Value>) {}

    fn into_entry(self) -> SeedbedResult<SeedEntry> {
        let label = self.label();
        let mut fields = match serde_json::to_value(&self)? {
            Value::Object(fields) => fields,
            other => {
                return Err(SeedbedError::Dataset(format!(
                    "{} record '{}' did not serialize to an object: {}",
                    Self::MODEL,
                    label,
                    other
                )));
            }
        };
        Self::finalize(&mut fields);

        Ok(SeedEntry {
            model: Self::MODEL,
            label,
            fields,
        })
    }
}

/// Label for entries that carry none of their identifying fields.
const UNNAMED: &str = "unnamed";

fn label_from(candidates: [Option<&String>; 2]) -> String {
    candidates
        .into_iter()
        .flatten()
        .next()
        .cloned()
        .unwrap_or_else(|| UNNAMED.to_string())
}

fn required<'a>(
    value: &'a Option<String>,
    model: ContentModel,
    field: &str,
) -> SeedbedResult<&'a str> {
    value
        .as_deref()
        .ok_or_else(|| SeedbedError::Dataset(format!("{} entry has no {}", model, field)))
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategorySeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SeedRecord for CategorySeed {
    const MODEL: ContentModel = ContentModel::Category;

    fn label(&self) -> String {
        label_from([self.slug.as_ref(), self.name.as_ref()])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriterSeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Names the picture upload, `<email>.jpg`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SeedRecord for WriterSeed {
    const MODEL: ContentModel = ContentModel::Writer;

    fn label(&self) -> String {
        label_from([self.email.as_ref(), self.name.as_ref()])
    }

    fn attachments(&self) -> SeedbedResult<Vec<(AssetSlot, String)>> {
        let email = required(&self.email, Self::MODEL, "email")?;
        Ok(vec![(AssetSlot::Picture, format!("{}.jpg", email))])
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArticleSeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Names the cover upload, `<slug>.jpg`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SeedRecord for ArticleSeed {
    const MODEL: ContentModel = ContentModel::Article;

    fn label(&self) -> String {
        label_from([self.slug.as_ref(), self.title.as_ref()])
    }

    fn attachments(&self) -> SeedbedResult<Vec<(AssetSlot, String)>> {
        let slug = required(&self.slug, Self::MODEL, "slug")?;
        Ok(vec![(AssetSlot::Image, format!("{}.jpg", slug))])
    }

    /// Articles are always published, whatever the dataset says.
    fn finalize(fields: &mut Map<String, Value>) {
        fields.insert(
            "publishedAt".to_string(),
            Value::String(Utc::now().to_rfc3339()),
        );
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultSeo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSeed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_seo: Option<DefaultSeo>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SeedRecord for GlobalSeed {
    const MODEL: ContentModel = ContentModel::Global;

    fn label(&self) -> String {
        "global".to_string()
    }

    fn attachments(&self) -> SeedbedResult<Vec<(AssetSlot, String)>> {
        Ok(vec![
            (AssetSlot::Favicon, "favicon.png".to_string()),
            (AssetSlot::ShareImage, "default-image.png".to_string()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_share_image_creates_nested_object() {
        let mut fields = Map::new();
        AssetSlot::ShareImage.assign(&mut fields, RecordId::new("42"));
        assert_eq!(Value::Object(fields), json!({"defaultSeo": {"shareImage": "42"}}));
    }

    #[test]
    fn test_share_image_keeps_sibling_seo_fields() {
        let mut fields = json!({"defaultSeo": {"metaTitle": "Page", "shareImage": null}})
            .as_object()
            .cloned()
            .unwrap();
        AssetSlot::ShareImage.assign(&mut fields, RecordId::new("7"));
        assert_eq!(fields["defaultSeo"]["metaTitle"], json!("Page"));
        assert_eq!(fields["defaultSeo"]["shareImage"], json!("7"));
    }

    #[test]
    fn test_share_image_replaces_non_object_seo() {
        let mut fields = json!({"defaultSeo": "oops"}).as_object().cloned().unwrap();
        AssetSlot::ShareImage.assign(&mut fields, RecordId::new("7"));
        assert_eq!(fields["defaultSeo"], json!({"shareImage": "7"}));
    }

    #[test]
    fn test_article_is_forced_published() {
        let article: ArticleSeed = serde_json::from_value(json!({
            "title": "Hello",
            "slug": "hello",
            "publishedAt": null,
            "category": 1
        }))
        .unwrap();

        let entry = article.into_entry().unwrap();
        assert_eq!(entry.model, ContentModel::Article);
        assert_eq!(entry.label, "hello");
        assert!(entry.fields["publishedAt"].is_string());
        assert_eq!(entry.fields["category"], json!(1));
    }

    #[test]
    fn test_category_round_trips_unknown_fields() {
        let category: CategorySeed =
            serde_json::from_value(json!({"name": "News", "slug": "news", "color": "red"}))
                .unwrap();
        let entry = category.into_entry().unwrap();
        assert_eq!(
            Value::Object(entry.fields),
            json!({"name": "News", "slug": "news", "color": "red"})
        );
    }

    #[test]
    fn test_attachment_names() {
        let writer = WriterSeed {
            name: Some("David".into()),
            email: Some("david@example.com".into()),
            extra: Map::new(),
        };
        assert_eq!(
            writer.attachments().unwrap(),
            vec![(AssetSlot::Picture, "david@example.com.jpg".to_string())]
        );

        let global: GlobalSeed = serde_json::from_value(json!({"siteName": "Blog"})).unwrap();
        let slots: Vec<_> = global
            .attachments()
            .unwrap()
            .into_iter()
            .map(|(s, _)| s)
            .collect();
        assert_eq!(slots, vec![AssetSlot::Favicon, AssetSlot::ShareImage]);
    }

    #[test]
    fn test_incomplete_records_still_parse() {
        let category: CategorySeed = serde_json::from_value(json!({"slug": "food"})).unwrap();
        assert_eq!(category.label(), "food");
        assert_eq!(
            Value::Object(category.into_entry().unwrap().fields),
            json!({"slug": "food"})
        );

        let category: CategorySeed = serde_json::from_value(json!({"color": "red"})).unwrap();
        assert_eq!(category.label(), "unnamed");

        let global: GlobalSeed =
            serde_json::from_value(json!({"defaultSeo": {"metaTitle": "Page"}})).unwrap();
        assert_eq!(global.default_seo.unwrap().meta_description, None);
    }

    #[test]
    fn test_file_name_fields_are_required_for_attachments() {
        let writer: WriterSeed = serde_json::from_value(json!({"name": "Anonymous"})).unwrap();
        assert_eq!(writer.label(), "Anonymous");
        let err = writer.attachments().unwrap_err();
        assert!(err.to_string().contains("writer entry has no email"));

        let article: ArticleSeed = serde_json::from_value(json!({"title": "Untitled"})).unwrap();
        assert!(article.attachments().is_err());
    }
}
