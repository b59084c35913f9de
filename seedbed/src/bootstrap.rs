//! Startup hook.
//!
//! ```text
//! is_first_run? ── no ──> AlreadySeeded
//!      │
//!     yes
//!      ├─> admin provisioning      (unless ADMIN_CREATE=false)
//!      └─> content seeding         (only if BOOTSTRAP_CONTENT=true)
//! ```
//!
//! The flag is set before anything else happens, so a run that fails
//! halfway is not retried on the next boot.

use std::sync::Arc;

use seedbed_shared::SeedbedResult;

use crate::config::SeedOptions;
use crate::db::{Database, SqliteSettingsStore};
use crate::files::FileResolver;
use crate::gate::FirstRunGate;
use crate::host::{Host, SettingsStore};
use crate::logging::init_logging;
use crate::seed::{AdminOutcome, AdminProvisioner, SeedDataset, SeedOrchestrator, SeedReport};

/// What happened to the seed content on a first run.
#[derive(Debug)]
pub enum ContentOutcome {
    /// `BOOTSTRAP_CONTENT` was not `true`.
    Skipped,
    Seeded(SeedReport),
    /// Seeding stopped before finishing; entries created so far remain.
    Failed { reason: String },
}

#[derive(Debug)]
pub enum BootstrapOutcome {
    AlreadySeeded,
    FirstRun {
        admin: AdminOutcome,
        content: ContentOutcome,
    },
}

impl BootstrapOutcome {
    pub fn is_first_run(&self) -> bool {
        matches!(self, BootstrapOutcome::FirstRun { .. })
    }
}

pub struct Bootstrap {
    host: Host,
    settings: Arc<dyn SettingsStore>,
    options: SeedOptions,
}

impl Bootstrap {
    pub fn new(host: Host, settings: Arc<dyn SettingsStore>, options: SeedOptions) -> Self {
        Self {
            host,
            settings,
            options,
        }
    }

    /// Bootstrap backed by the SQLite settings database under the home dir.
    ///
    /// Also installs logging to `<home>/logs`.
    pub fn open(host: Host, options: SeedOptions) -> SeedbedResult<Self> {
        options.sanitize()?;
        init_logging(Some(&options.log_dir()))?;

        let db_path = options.settings_db_path();
        let db = Database::open(&db_path)?;
        tracing::debug!(path = %db_path.display(), "Opened settings database");

        Ok(Self::new(
            host,
            Arc::new(SqliteSettingsStore::new(db)),
            options,
        ))
    }

    pub fn options(&self) -> &SeedOptions {
        &self.options
    }

    /// Run the startup hook.
    ///
    /// Only settings-store errors are returned. Admin and content failures
    /// are logged and reported in the outcome.
    pub async fn run(&self) -> SeedbedResult<BootstrapOutcome> {
        let gate = FirstRunGate::new(Arc::clone(&self.settings), &self.options.environment);
        if !gate.is_first_run().await? {
            tracing::debug!(
                environment = %self.options.environment,
                "Installation already initialized"
            );
            return Ok(BootstrapOutcome::AlreadySeeded);
        }

        tracing::info!("First install, checking what to create");

        let admin = AdminProvisioner::new(
            &self.host,
            self.options.admin_create,
            self.options.admin.clone(),
        )
        .create_admin_user()
        .await;

        let content = if self.options.bootstrap_content {
            self.seed_content().await
        } else {
            ContentOutcome::Skipped
        };

        Ok(BootstrapOutcome::FirstRun { admin, content })
    }

    async fn seed_content(&self) -> ContentOutcome {
        tracing::info!(data_dir = %self.options.data_dir.display(), "Setting up the template");

        match self.import().await {
            Ok(report) => {
                tracing::info!("Ready to go");
                ContentOutcome::Seeded(report)
            }
            Err(e) => {
                tracing::error!(error = %e, "Could not import seed data");
                ContentOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn import(&self) -> SeedbedResult<SeedReport> {
        let dataset = SeedDataset::load(&self.options.dataset_path())?;
        let resolver = FileResolver::new(self.options.uploads_dir());

        SeedOrchestrator::new(self.host.clone(), resolver, dataset)
            .with_max_concurrency(self.options.max_concurrency)
            .import_seed_data()
            .await
    }
}
