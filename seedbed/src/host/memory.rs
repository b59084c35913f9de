//! In-process host.
//!
//! Implements every host contract over plain collections and records each
//! call, so a bootstrap can be dry-run locally and asserted on in tests.
//! Faults can be injected per operation.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Map, Value};
use ulid::Ulid;

use seedbed_shared::{SeedbedError, SeedbedResult};

use super::{
    AdminRoleService, AdminUserRecord, AdminUserService, AssetRecord, AssetStore, ContentModel,
    ContentRecord, ContentStore, FileInfo, Host, NewAdminRole, NewAdminUser, PermissionRecord,
    PermissionStore, RecordId, RoleFilter, RoleRecord, UploadRequest,
};

const SUPER_ADMIN_CODE: &str = "strapi-super-admin";

/// Host calls in the order they were received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Upload { name: String },
    Create { model: ContentModel },
    Grant { action: String },
    CreateAdminRole,
    CreateAdminUser,
}

/// Per-operation call counters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub content_creates: usize,
    pub uploads: usize,
    pub role_lookups: usize,
    pub permission_creates: usize,
    pub admin_exists_checks: usize,
    pub admin_user_creates: usize,
    pub super_admin_lookups: usize,
    pub admin_role_creates: usize,
}

impl CallCounts {
    /// Calls touching admin roles or identities.
    pub fn admin_calls(&self) -> usize {
        self.admin_exists_checks
            + self.admin_user_creates
            + self.super_admin_lookups
            + self.admin_role_creates
    }
}

#[derive(Debug, Default)]
struct Faults {
    failing_uploads: HashSet<String>,
    failing_models: HashSet<ContentModel>,
    empty_uploads: bool,
    permission_creates: bool,
    admin_role_create: bool,
    admin_user_create: bool,
}

#[derive(Debug, Default)]
struct MemoryState {
    events: Vec<HostEvent>,
    calls: CallCounts,
    content: Vec<ContentRecord>,
    uploads: Vec<(FileInfo, AssetRecord)>,
    roles: Vec<RoleRecord>,
    permissions: Vec<PermissionRecord>,
    admin_roles: Vec<RoleRecord>,
    admin_users: Vec<NewAdminUser>,
}

#[derive(Debug)]
pub struct InMemoryHost {
    state: Mutex<MemoryState>,
    faults: Faults,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryHost {
    /// Fresh platform with `public` and `authenticated` roles and no admin.
    pub fn new() -> Self {
        let roles = ["public", "authenticated"]
            .into_iter()
            .map(|role_type| RoleRecord {
                id: next_id(),
                name: role_type.to_string(),
                code: None,
                role_type: Some(role_type.to_string()),
            })
            .collect();

        Self {
            state: Mutex::new(MemoryState {
                roles,
                ..Default::default()
            }),
            faults: Faults::default(),
        }
    }

    pub fn without_public_role(self) -> Self {
        self.state
            .lock()
            .roles
            .retain(|role| role.role_type.as_deref() != Some("public"));
        self
    }

    pub fn with_super_admin_role(self) -> Self {
        self.state.lock().admin_roles.push(RoleRecord {
            id: next_id(),
            name: "Super Admin".to_string(),
            code: Some(SUPER_ADMIN_CODE.to_string()),
            role_type: None,
        });
        self
    }

    pub fn with_admin(self, email: &str) -> Self {
        self.state.lock().admin_users.push(NewAdminUser {
            username: None,
            email: Some(email.to_string()),
            firstname: None,
            lastname: None,
            password: None,
            is_active: true,
            blocked: false,
            registration_token: None,
            roles: Vec::new(),
        });
        self
    }

    /// Fail uploads whose logical file name equals `name`.
    pub fn fail_upload_of(mut self, name: &str) -> Self {
        self.faults.failing_uploads.insert(name.to_string());
        self
    }

    /// Uploads succeed but return no asset records.
    pub fn with_empty_uploads(mut self) -> Self {
        self.faults.empty_uploads = true;
        self
    }

    pub fn fail_content_for(mut self, model: ContentModel) -> Self {
        self.faults.failing_models.insert(model);
        self
    }

    pub fn fail_permission_creates(mut self) -> Self {
        self.faults.permission_creates = true;
        self
    }

    pub fn fail_admin_role_create(mut self) -> Self {
        self.faults.admin_role_create = true;
        self
    }

    pub fn fail_admin_user_create(mut self) -> Self {
        self.faults.admin_user_create = true;
        self
    }

    /// Service handles backed by this host.
    pub fn host(self: &Arc<Self>) -> Host {
        let this: Arc<InMemoryHost> = Arc::clone(self);
        Host {
            content: this.clone(),
            assets: this.clone(),
            permissions: this.clone(),
            admin_users: this.clone(),
            admin_roles: this,
        }
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().calls.clone()
    }

    pub fn events(&self) -> Vec<HostEvent> {
        self.state.lock().events.clone()
    }

    pub fn content(&self, model: ContentModel) -> Vec<ContentRecord> {
        self.state
            .lock()
            .content
            .iter()
            .filter(|record| record.model == model)
            .cloned()
            .collect()
    }

    pub fn uploads(&self) -> Vec<(FileInfo, AssetRecord)> {
        self.state.lock().uploads.clone()
    }

    pub fn permissions(&self) -> Vec<PermissionRecord> {
        self.state.lock().permissions.clone()
    }

    pub fn admin_users(&self) -> Vec<NewAdminUser> {
        self.state.lock().admin_users.clone()
    }

    pub fn admin_roles(&self) -> Vec<RoleRecord> {
        self.state.lock().admin_roles.clone()
    }
}

fn next_id() -> RecordId {
    RecordId::new(Ulid::new().to_string())
}

#[async_trait]
impl ContentStore for InMemoryHost {
    async fn create(
        &self,
        model: ContentModel,
        fields: Map<String, Value>,
    ) -> SeedbedResult<ContentRecord> {
        let mut state = self.state.lock();
        state.calls.content_creates += 1;
        state.events.push(HostEvent::Create { model });

        if self.faults.failing_models.contains(&model) {
            return Err(SeedbedError::Content(format!(
                "{} rejected the entry",
                model.uid()
            )));
        }

        let record = ContentRecord {
            id: next_id(),
            model,
            fields,
        };
        state.content.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl AssetStore for InMemoryHost {
    async fn upload(&self, request: UploadRequest) -> SeedbedResult<Vec<AssetRecord>> {
        let mut state = self.state.lock();
        state.calls.uploads += 1;
        state.events.push(HostEvent::Upload {
            name: request.file.name.clone(),
        });

        if self.faults.failing_uploads.contains(&request.file.name) {
            return Err(SeedbedError::Upload(format!(
                "provider rejected {}",
                request.file.name
            )));
        }
        if self.faults.empty_uploads {
            return Ok(Vec::new());
        }

        let record = AssetRecord {
            id: next_id(),
            name: request.info.name.clone(),
            mime: request.file.mime.to_string(),
            size: request.bytes.len() as u64,
            url: Some(format!("/uploads/{}", request.file.name)),
        };
        state.uploads.push((request.info, record.clone()));
        Ok(vec![record])
    }
}

#[async_trait]
impl PermissionStore for InMemoryHost {
    async fn find_role(&self, filter: &RoleFilter) -> SeedbedResult<Option<RoleRecord>> {
        let mut state = self.state.lock();
        state.calls.role_lookups += 1;
        Ok(state
            .roles
            .iter()
            .find(|role| role.role_type.as_deref() == Some(filter.role_type.as_str()))
            .cloned())
    }

    async fn create_permission(
        &self,
        action: &str,
        role_id: &RecordId,
    ) -> SeedbedResult<PermissionRecord> {
        let mut state = self.state.lock();
        state.calls.permission_creates += 1;
        state.events.push(HostEvent::Grant {
            action: action.to_string(),
        });

        if self.faults.permission_creates {
            return Err(SeedbedError::Permission(format!(
                "permission store rejected {}",
                action
            )));
        }

        let record = PermissionRecord {
            id: next_id(),
            action: action.to_string(),
            role: role_id.clone(),
        };
        state.permissions.push(record.clone());
        Ok(record)
    }
}

#[async_trait]
impl AdminUserService for InMemoryHost {
    async fn exists(&self) -> SeedbedResult<bool> {
        let mut state = self.state.lock();
        state.calls.admin_exists_checks += 1;
        Ok(!state.admin_users.is_empty())
    }

    async fn create(&self, user: NewAdminUser) -> SeedbedResult<AdminUserRecord> {
        let mut state = self.state.lock();
        state.calls.admin_user_creates += 1;
        state.events.push(HostEvent::CreateAdminUser);

        if self.faults.admin_user_create {
            return Err(SeedbedError::Admin("identity service unavailable".into()));
        }

        let record = AdminUserRecord {
            id: next_id(),
            email: user.email.clone(),
        };
        state.admin_users.push(user);
        Ok(record)
    }
}

#[async_trait]
impl AdminRoleService for InMemoryHost {
    async fn get_super_admin(&self) -> SeedbedResult<Option<RoleRecord>> {
        let mut state = self.state.lock();
        state.calls.super_admin_lookups += 1;
        Ok(state
            .admin_roles
            .iter()
            .find(|role| role.code.as_deref() == Some(SUPER_ADMIN_CODE))
            .cloned())
    }

    async fn create(&self, role: NewAdminRole) -> SeedbedResult<RoleRecord> {
        let mut state = self.state.lock();
        state.calls.admin_role_creates += 1;
        state.events.push(HostEvent::CreateAdminRole);

        if self.faults.admin_role_create {
            return Err(SeedbedError::Admin("role service unavailable".into()));
        }

        let record = RoleRecord {
            id: next_id(),
            name: role.name,
            code: Some(role.code),
            role_type: None,
        };
        state.admin_roles.push(record.clone());
        Ok(record)
    }
}
