//! Resolution of logical upload names to files on disk.

mod mime;

pub use mime::mime_for_extension;

use seedbed_shared::{SeedbedError, SeedbedResult};
use std::path::{Path, PathBuf};

/// A seed file resolved on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub path: PathBuf,
    /// Logical name, e.g. `favicon.png`.
    pub name: String,
    pub size: u64,
    pub mime: &'static str,
}

impl FileDescriptor {
    /// Name with its last extension stripped, used as upload display name.
    ///
    /// Only the final extension goes: `daviddoe@strapi.io.jpg` becomes
    /// `daviddoe@strapi.io`, not `daviddoe@strapi` as a split on the first
    /// dot would give.
    pub fn display_name(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(&self.name)
    }
}

/// Resolves upload names relative to a fixed uploads directory.
#[derive(Debug, Clone)]
pub struct FileResolver {
    uploads_dir: PathBuf,
}

impl FileResolver {
    pub fn new(uploads_dir: impl Into<PathBuf>) -> Self {
        Self {
            uploads_dir: uploads_dir.into(),
        }
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    /// Stat `name` under the uploads directory.
    ///
    /// MIME type comes from the extension only; contents are never read.
    pub fn resolve(&self, name: &str) -> SeedbedResult<FileDescriptor> {
        let path = self.uploads_dir.join(name);

        let metadata = match std::fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(SeedbedError::FileNotFound(path));
            }
            Err(e) => return Err(e.into()),
        };

        if !metadata.is_file() {
            return Err(SeedbedError::FileNotFound(path));
        }

        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        Ok(FileDescriptor {
            name: name.to_string(),
            size: metadata.len(),
            mime: mime_for_extension(extension),
            path,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_reports_size_and_mime() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("favicon.png"), [0u8; 42]).unwrap();

        let resolver = FileResolver::new(dir.path());
        let file = resolver.resolve("favicon.png").unwrap();

        assert_eq!(file.size, 42);
        assert_eq!(file.mime, "image/png");
        assert_eq!(file.name, "favicon.png");
        assert_eq!(file.path, dir.path().join("favicon.png"));
    }

    #[test]
    fn test_resolve_missing_file() {
        let dir = TempDir::new().unwrap();
        let resolver = FileResolver::new(dir.path());

        let err = resolver.resolve("nope.jpg").unwrap_err();
        assert!(matches!(err, SeedbedError::FileNotFound(_)));
    }

    #[test]
    fn test_resolve_ignores_contents_for_mime() {
        let dir = TempDir::new().unwrap();
        // PNG magic bytes in a .jpg file
        std::fs::write(dir.path().join("cover.jpg"), b"\x89PNG\r\n").unwrap();

        let file = FileResolver::new(dir.path()).resolve("cover.jpg").unwrap();
        assert_eq!(file.mime, "image/jpeg");
    }

    #[test]
    fn test_display_name_strips_last_extension() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("daviddoe@strapi.io.jpg"), b"x").unwrap();

        let file = FileResolver::new(dir.path())
            .resolve("daviddoe@strapi.io.jpg")
            .unwrap();
        assert_eq!(file.display_name(), "daviddoe@strapi.io");
    }

    #[test]
    fn test_directory_is_not_a_file() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();

        let err = FileResolver::new(dir.path()).resolve("nested").unwrap_err();
        assert!(matches!(err, SeedbedError::FileNotFound(_)));
    }
}
