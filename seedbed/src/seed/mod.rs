//! Seed content import.
//!
//! [`orchestrator::SeedOrchestrator`] drives the phases; each entry goes
//! through [`importer::EntryImporter`]. [`admin::AdminProvisioner`] runs
//! separately, before any content phase.

pub mod admin;
pub mod dataset;
pub mod importer;
pub mod orchestrator;
pub mod permissions;
pub mod records;
pub mod report;
mod tasks;

pub use admin::{AdminOutcome, AdminProvisioner};
pub use dataset::SeedDataset;
pub use importer::EntryImporter;
pub use orchestrator::SeedOrchestrator;
pub use permissions::{
    PermissionInitializer, PermissionMapping, action_id, default_public_permissions,
};
pub use records::{
    ArticleSeed, AssetSlot, CategorySeed, DefaultSeo, FileAttachment, GlobalSeed, SeedEntry,
    SeedRecord, WriterSeed,
};
pub use report::{EntryOutcome, EntryStatus, SeedReport};
