//! # arbiter-storage
//!
//! Persisted state for the Arbiter engine.
//!
//! - [`FileStateStore`]: JSON files under a state directory. Every write goes
//!   to a temporary file in the target directory and is atomically renamed
//!   into place, so readers never observe a partial file.
//! - [`InMemoryStateStore`]: ephemeral state for embedding and tests.
//!
//! Reads are resilient: missing files are empty state, corrupt files are
//! empty state plus a diagnostic.

pub mod atomic;
pub mod file_store;
pub mod memory_store;
pub mod paths;
pub mod recovery;

pub use file_store::FileStateStore;
pub use memory_store::InMemoryStateStore;
