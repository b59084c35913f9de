//! SQLite implementation of the key-value settings store.

use async_trait::async_trait;
use chrono::Utc;
use rusqlite::OptionalExtension;
use serde_json::Value;

use seedbed_shared::SeedbedResult;

use super::{Database, db_err};
use crate::host::{SettingsScope, SettingsStore, VersionedValue};

/// Versioned settings persisted in the seedbed database.
///
/// Every successful write bumps the row version. A fresh key starts at
/// version 1.
#[derive(Debug, Clone)]
pub struct SqliteSettingsStore {
    db: Database,
}

impl SqliteSettingsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn get(&self, scope: &SettingsScope, key: &str) -> SeedbedResult<Option<VersionedValue>> {
        let row: Option<(String, i64)> = {
            let conn = self.db.conn();
            db_err!(
                conn.query_row(
                    "SELECT value, version FROM settings
                     WHERE environment = ?1 AND type = ?2 AND name = ?3 AND key = ?4",
                    rusqlite::params![scope.environment, scope.kind, scope.name, key],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()
            )?
        };

        match row {
            Some((raw, version)) => Ok(Some(VersionedValue {
                value: serde_json::from_str(&raw)?,
                version: version as u64,
            })),
            None => Ok(None),
        }
    }

    async fn compare_and_swap(
        &self,
        scope: &SettingsScope,
        key: &str,
        expected_version: Option<u64>,
        value: Value,
    ) -> SeedbedResult<bool> {
        let raw = serde_json::to_string(&value)?;
        let now = Utc::now().to_rfc3339();
        let conn = self.db.conn();

        let changed = match expected_version {
            None => db_err!(conn.execute(
                "INSERT INTO settings (environment, type, name, key, value, version, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6)
                 ON CONFLICT (environment, type, name, key) DO NOTHING",
                rusqlite::params![scope.environment, scope.kind, scope.name, key, raw, now],
            ))?,
            Some(version) => db_err!(conn.execute(
                "UPDATE settings SET value = ?5, version = version + 1, updated_at = ?6
                 WHERE environment = ?1 AND type = ?2 AND name = ?3 AND key = ?4
                   AND version = ?7",
                rusqlite::params![
                    scope.environment,
                    scope.kind,
                    scope.name,
                    key,
                    raw,
                    now,
                    version as i64
                ],
            ))?,
        };

        tracing::trace!(
            environment = %scope.environment,
            key,
            expected_version = ?expected_version,
            won = changed == 1,
            "Settings compare-and-swap"
        );

        Ok(changed == 1)
    }
}
