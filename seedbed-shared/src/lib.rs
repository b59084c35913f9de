//! Types shared between seedbed and host adapter crates.

pub mod errors;

pub use errors::{SeedbedError, SeedbedResult};
