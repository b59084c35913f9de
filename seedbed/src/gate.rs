//! First-run gate.
//!
//! Consulted once at startup. Reading the gate marks the installation as
//! initialized, whatever happens afterwards.

use std::sync::Arc;

use serde_json::Value;

use seedbed_shared::SeedbedResult;

use crate::host::{SettingsScope, SettingsStore};

pub const INIT_HAS_RUN_KEY: &str = "initHasRun";

pub struct FirstRunGate {
    store: Arc<dyn SettingsStore>,
    scope: SettingsScope,
}

impl FirstRunGate {
    /// Gate scoped to a deployment environment (e.g. `production`).
    pub fn new(store: Arc<dyn SettingsStore>, environment: &str) -> Self {
        Self {
            store,
            scope: SettingsScope::setup(environment),
        }
    }

    /// Returns true exactly once per installation.
    ///
    /// Sets the flag as a side effect. The write is a compare-and-swap on
    /// the version read, so when two processes race on a fresh install only
    /// the one whose write lands first sees `true`.
    pub async fn is_first_run(&self) -> SeedbedResult<bool> {
        let current = self.store.get(&self.scope, INIT_HAS_RUN_KEY).await?;

        let has_run = current
            .as_ref()
            .map(|stored| is_truthy(&stored.value))
            .unwrap_or(false);
        let expected_version = current.map(|stored| stored.version);

        let won = self
            .store
            .compare_and_swap(
                &self.scope,
                INIT_HAS_RUN_KEY,
                expected_version,
                Value::Bool(true),
            )
            .await?;

        if !won {
            tracing::info!(
                environment = %self.scope.environment,
                "Setup flag claimed by another process"
            );
        }

        Ok(!has_run && won)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
