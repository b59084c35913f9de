//! Bootstrap admin account.

use std::sync::Arc;

use seedbed_shared::SeedbedResult;

use crate::config::AdminCredentials;
use crate::host::{
    AdminRoleService, AdminUserService, Host, NewAdminRole, NewAdminUser, RecordId, RoleRecord,
};

#[derive(Debug, Clone, PartialEq)]
pub enum AdminOutcome {
    /// Provisioning switched off by configuration.
    Disabled,
    /// An admin was already present; nothing was created.
    AlreadyExists,
    /// No super-admin role could be found or created.
    RoleUnavailable,
    Created { id: RecordId },
    Failed { reason: String },
}

pub struct AdminProvisioner {
    users: Arc<dyn AdminUserService>,
    roles: Arc<dyn AdminRoleService>,
    enabled: bool,
    credentials: AdminCredentials,
}

impl AdminProvisioner {
    pub fn new(host: &Host, enabled: bool, credentials: AdminCredentials) -> Self {
        Self {
            users: Arc::clone(&host.admin_users),
            roles: Arc::clone(&host.admin_roles),
            enabled,
            credentials,
        }
    }

    /// Ensure an admin account exists.
    ///
    /// Never fails: host errors are logged and reported in the outcome so
    /// startup continues whatever happens here.
    pub async fn create_admin_user(&self) -> AdminOutcome {
        if !self.enabled {
            tracing::info!("Admin creation disabled by ADMIN_CREATE=false, skipping user creation");
            return AdminOutcome::Disabled;
        }

        match self.users.exists().await {
            Ok(true) => return AdminOutcome::AlreadyExists,
            Ok(false) => {}
            Err(e) => {
                tracing::error!(error = %e, "Could not check for existing admin");
                return AdminOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        }

        let role = match self.super_admin_role().await {
            Ok(Some(role)) => role,
            Ok(None) => {
                tracing::warn!("Super admin role unavailable, skipping user creation");
                return AdminOutcome::RoleUnavailable;
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not look up super admin role");
                return AdminOutcome::Failed {
                    reason: e.to_string(),
                };
            }
        };

        tracing::info!("Setting up admin user");
        let credentials = self.credentials.clone();
        let user = NewAdminUser {
            username: credentials.username,
            email: credentials.email,
            firstname: credentials.firstname,
            lastname: credentials.lastname,
            password: credentials.password,
            is_active: true,
            blocked: false,
            registration_token: None,
            roles: vec![role.id],
        };

        match self.users.create(user).await {
            Ok(record) => {
                tracing::info!(id = %record.id, "Admin account created");
                AdminOutcome::Created { id: record.id }
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not create admin user");
                AdminOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Find the super-admin role, creating it once if missing.
    ///
    /// A failed create is logged and followed by a second lookup, in case
    /// the role appeared anyway.
    async fn super_admin_role(&self) -> SeedbedResult<Option<RoleRecord>> {
        if let Some(role) = self.roles.get_super_admin().await? {
            return Ok(Some(role));
        }

        tracing::info!("Super admin role does not exist, creating it");
        if let Err(e) = self.roles.create(NewAdminRole::super_admin()).await {
            tracing::error!(error = %e, "Could not create admin role");
        }

        self.roles.get_super_admin().await
    }
}
