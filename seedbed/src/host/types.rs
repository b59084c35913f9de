//! Request and record types exchanged with the host.

use crate::files::FileDescriptor;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Identifier of a record owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<RecordId> for Value {
    fn from(id: RecordId) -> Self {
        Value::String(id.0)
    }
}

/// Content types seeded on first boot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentModel {
    Category,
    Writer,
    Article,
    Global,
}

impl ContentModel {
    pub const ALL: [ContentModel; 4] = [
        ContentModel::Category,
        ContentModel::Writer,
        ContentModel::Article,
        ContentModel::Global,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentModel::Category => "category",
            ContentModel::Writer => "writer",
            ContentModel::Article => "article",
            ContentModel::Global => "global",
        }
    }

    /// Fully qualified content-type uid, e.g. `api::article.article`.
    pub fn uid(&self) -> String {
        format!("api::{0}.{0}", self.as_str())
    }
}

impl fmt::Display for ContentModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: RecordId,
    pub model: ContentModel,
    pub fields: Map<String, Value>,
}

/// Metadata attached to an uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub alternative_text: String,
    pub caption: String,
    pub name: String,
}

impl FileInfo {
    /// Use one display name for alt-text, caption and name.
    pub fn named(display_name: &str) -> Self {
        Self {
            alternative_text: display_name.to_string(),
            caption: display_name.to_string(),
            name: display_name.to_string(),
        }
    }
}

pub struct UploadRequest {
    pub file: FileDescriptor,
    pub bytes: Vec<u8>,
    pub info: FileInfo,
}

impl fmt::Debug for UploadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadRequest")
            .field("file", &self.file)
            .field("bytes", &self.bytes.len())
            .field("info", &self.info)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetRecord {
    pub id: RecordId,
    pub name: String,
    pub mime: String,
    pub size: u64,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleFilter {
    pub role_type: String,
}

impl RoleFilter {
    /// The anonymous-access role.
    pub fn public() -> Self {
        Self {
            role_type: "public".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleRecord {
    pub id: RecordId,
    pub name: String,
    pub code: Option<String>,
    pub role_type: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRecord {
    pub id: RecordId,
    pub action: String,
    pub role: RecordId,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdminUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub password: Option<String>,
    pub is_active: bool,
    pub blocked: bool,
    pub registration_token: Option<String>,
    pub roles: Vec<RecordId>,
}

impl fmt::Debug for NewAdminUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAdminUser")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("firstname", &self.firstname)
            .field("lastname", &self.lastname)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("is_active", &self.is_active)
            .field("blocked", &self.blocked)
            .field("roles", &self.roles)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserRecord {
    pub id: RecordId,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAdminRole {
    pub name: String,
    pub code: String,
    pub description: String,
}

impl NewAdminRole {
    pub fn super_admin() -> Self {
        Self {
            name: "Super Admin".to_string(),
            code: "strapi-super-admin".to_string(),
            description: "Super Admins can access and manage all features and settings."
                .to_string(),
        }
    }
}

/// Settings namespace: `(environment, type, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SettingsScope {
    pub environment: String,
    pub kind: String,
    pub name: String,
}

impl SettingsScope {
    /// Scope holding the first-run flag for `environment`.
    pub fn setup(environment: &str) -> Self {
        Self {
            environment: environment.to_string(),
            kind: "type".to_string(),
            name: "setup".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VersionedValue {
    pub value: Value,
    pub version: u64,
}
