//! Contracts consumed from the content-management host.
//!
//! seedbed never persists content itself. Every write goes through one of
//! the traits below; a host adapter implements them against the real
//! platform, and [`memory::InMemoryHost`] implements them in-process.

pub mod memory;
mod types;

use async_trait::async_trait;
use seedbed_shared::SeedbedResult;
use serde_json::{Map, Value};
use std::sync::Arc;

pub use types::{
    AdminUserRecord, AssetRecord, ContentModel, ContentRecord, FileInfo, NewAdminRole,
    NewAdminUser, PermissionRecord, RecordId, RoleFilter, RoleRecord, SettingsScope,
    UploadRequest, VersionedValue,
};

/// Process-wide key-value settings, scoped by environment and namespace.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, scope: &SettingsScope, key: &str) -> SeedbedResult<Option<VersionedValue>>;

    /// Write `value` only if the stored version still equals `expected_version`
    /// (`None` meaning the key must be absent). Returns whether the write won.
    async fn compare_and_swap(
        &self,
        scope: &SettingsScope,
        key: &str,
        expected_version: Option<u64>,
        value: Value,
    ) -> SeedbedResult<bool>;
}

#[async_trait]
pub trait ContentStore: Send + Sync {
    async fn create(
        &self,
        model: ContentModel,
        fields: Map<String, Value>,
    ) -> SeedbedResult<ContentRecord>;
}

#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Store the uploaded bytes. Hosts return at least one record on success.
    async fn upload(&self, request: UploadRequest) -> SeedbedResult<Vec<AssetRecord>>;
}

#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn find_role(&self, filter: &RoleFilter) -> SeedbedResult<Option<RoleRecord>>;

    async fn create_permission(
        &self,
        action: &str,
        role_id: &RecordId,
    ) -> SeedbedResult<PermissionRecord>;
}

#[async_trait]
pub trait AdminUserService: Send + Sync {
    async fn exists(&self) -> SeedbedResult<bool>;

    async fn create(&self, user: NewAdminUser) -> SeedbedResult<AdminUserRecord>;
}

#[async_trait]
pub trait AdminRoleService: Send + Sync {
    async fn get_super_admin(&self) -> SeedbedResult<Option<RoleRecord>>;

    async fn create(&self, role: NewAdminRole) -> SeedbedResult<RoleRecord>;
}

/// Handles to every host service the bootstrap touches.
///
/// Cheap to clone; all services are shared via `Arc`.
#[derive(Clone)]
pub struct Host {
    pub content: Arc<dyn ContentStore>,
    pub assets: Arc<dyn AssetStore>,
    pub permissions: Arc<dyn PermissionStore>,
    pub admin_users: Arc<dyn AdminUserService>,
    pub admin_roles: Arc<dyn AdminRoleService>,
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host").finish()
    }
}
