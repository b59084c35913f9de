//! Static seed dataset (`data.json`).

use std::path::Path;

use serde::{Deserialize, Serialize};

use seedbed_shared::{SeedbedError, SeedbedResult};

use super::records::{ArticleSeed, CategorySeed, GlobalSeed, WriterSeed};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedDataset {
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
    #[serde(default)]
    pub writers: Vec<WriterSeed>,
    #[serde(default)]
    pub articles: Vec<ArticleSeed>,
    #[serde(default)]
    pub global: Option<GlobalSeed>,
}

impl SeedDataset {
    pub fn load(path: &Path) -> SeedbedResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            SeedbedError::Dataset(format!("cannot read {}: {}", path.display(), e))
        })?;
        let dataset = Self::from_json_str(&raw)
            .map_err(|e| SeedbedError::Dataset(format!("{}: {}", path.display(), e)))?;

        tracing::debug!(
            path = %path.display(),
            categories = dataset.categories.len(),
            writers = dataset.writers.len(),
            articles = dataset.articles.len(),
            global = dataset.global.is_some(),
            "Loaded seed dataset"
        );

        Ok(dataset)
    }

    pub fn from_json_str(raw: &str) -> SeedbedResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn entry_count(&self) -> usize {
        self.categories.len()
            + self.writers.len()
            + self.articles.len()
            + usize::from(self.global.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "global": {
            "siteName": "Strapi Blog",
            "defaultSeo": {"metaTitle": "Page", "metaDescription": "A blog", "shareImage": null},
            "favicon": null
        },
        "writers": [{"name": "David Doe", "email": "daviddoe@strapi.io"}],
        "categories": [
            {"name": "news", "slug": "news"},
            {"name": "tech", "slug": "tech"}
        ],
        "articles": [
            {"title": "Hello", "slug": "hello", "description": "d", "category": 1, "author": 1}
        ],
        "homepage": {"seo": {}}
    }"#;

    #[test]
    fn test_parse_sample() {
        let dataset = SeedDataset::from_json_str(SAMPLE).unwrap();
        assert_eq!(dataset.categories.len(), 2);
        assert_eq!(dataset.writers[0].email.as_deref(), Some("daviddoe@strapi.io"));
        assert_eq!(dataset.articles[0].extra["author"], serde_json::json!(1));
        let global = dataset.global.as_ref().unwrap();
        assert_eq!(
            global.default_seo.as_ref().unwrap().meta_title.as_deref(),
            Some("Page")
        );
        assert_eq!(dataset.entry_count(), 5);
    }

    #[test]
    fn test_incomplete_entries_load() {
        let dataset = SeedDataset::from_json_str(
            r#"{"categories": [{"name": "news", "slug": "news"}, {"slug": "food"}],
                "writers": [{"name": "No Email"}],
                "global": {}}"#,
        )
        .unwrap();
        assert_eq!(dataset.entry_count(), 4);
        assert_eq!(dataset.categories[1].name, None);
    }

    #[test]
    fn test_missing_sections_default_empty() {
        let dataset = SeedDataset::from_json_str("{}").unwrap();
        assert_eq!(dataset, SeedDataset::default());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = SeedDataset::load(&dir.path().join("data.json")).unwrap_err();
        assert!(matches!(err, SeedbedError::Dataset(_)));
    }

    #[test]
    fn test_load_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, SAMPLE).unwrap();
        assert_eq!(SeedDataset::load(&path).unwrap().writers.len(), 1);
    }
}
