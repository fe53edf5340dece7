//! `model` crate — domain entities and platform constants.
//!
//! Entities are value objects shaped by the remote platform's rows; nothing
//! here performs I/O. Queries and the data-sync service live in their own
//! crates and construct these types through the service-layer mapper.

pub mod access;
pub mod codes;
pub mod models;
pub mod trigger;

pub use access::{co_owner_access_mask, co_owner_access_names, AccessRight, CO_OWNER_RIGHTS};
pub use models::{Flow, Owner, OwnerKind, Solution};
pub use trigger::{derive_trigger, TriggerText};
