//! seedbed: first-boot provisioning for a content-management backend.
//!
//! On the first start of an installation, [`Bootstrap`] provisions an admin
//! account, grants public read access on the seeded content types and
//! imports the static seed dataset with its media files. The host platform
//! is reached only through the traits in [`host`].
//!
//! ```ignore
//! use seedbed::{Bootstrap, SeedOptions};
//!
//! let options = SeedOptions::from_env()?;
//! let outcome = Bootstrap::open(host, options)?.run().await?;
//! ```

pub mod bootstrap;
pub mod config;
pub mod db;
pub mod files;
pub mod gate;
pub mod host;
pub mod logging;
pub mod pipeline;
pub mod seed;

pub use bootstrap::{Bootstrap, BootstrapOutcome, ContentOutcome};
pub use config::{AdminCredentials, PluginConfig, SeedOptions, UploadProvider};
pub use gate::FirstRunGate;
pub use host::Host;
pub use logging::init_logging;
pub use seed::{AdminOutcome, SeedOrchestrator, SeedReport};
pub use seedbed_shared::{SeedbedError, SeedbedResult};
