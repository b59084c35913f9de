//! Public read permissions on seeded content types.

use std::sync::Arc;

use futures::future::join_all;

use seedbed_shared::{SeedbedError, SeedbedResult};

use crate::host::{PermissionStore, RoleFilter};

/// Controller name → actions to grant.
pub type PermissionMapping = Vec<(String, Vec<String>)>;

/// Read access for every seeded content type.
pub fn default_public_permissions() -> PermissionMapping {
    [
        ("global", &["find"][..]),
        ("article", &["find", "findOne"][..]),
        ("category", &["find", "findOne"][..]),
        ("writer", &["find", "findOne"][..]),
    ]
    .into_iter()
    .map(|(controller, actions)| {
        (
            controller.to_string(),
            actions.iter().map(|a| a.to_string()).collect(),
        )
    })
    .collect()
}

/// Fully qualified action, e.g. `api::article.article.findOne`.
pub fn action_id(controller: &str, action: &str) -> String {
    format!("api::{0}.{0}.{1}", controller, action)
}

pub struct PermissionInitializer {
    store: Arc<dyn PermissionStore>,
}

impl PermissionInitializer {
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    /// Grant every mapped action to the public role.
    ///
    /// Grants are issued concurrently and all of them settle before this
    /// returns. Existing grants are not checked, so running twice duplicates
    /// them. Returns the number of grants created, or the first failure.
    pub async fn set_public_permissions(
        &self,
        mapping: &[(String, Vec<String>)],
    ) -> SeedbedResult<usize> {
        let role = self
            .store
            .find_role(&RoleFilter::public())
            .await?
            .ok_or_else(|| SeedbedError::NotFound("public role".into()))?;

        let actions: Vec<String> = mapping
            .iter()
            .flat_map(|(controller, actions)| {
                actions.iter().map(move |action| action_id(controller, action))
            })
            .collect();

        let results = join_all(
            actions
                .iter()
                .map(|action| self.store.create_permission(action, &role.id)),
        )
        .await;

        let mut granted = 0;
        let mut first_error = None;
        for (action, result) in actions.iter().zip(results) {
            match result {
                Ok(_) => granted += 1,
                Err(e) => {
                    tracing::warn!(action = %action, error = %e, "Failed to grant public permission");
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        tracing::info!(role = %role.id, granted, "Granted public permissions");
        Ok(granted)
    }
}
