//! Core types for uevent delivery.
//!
//! This module provides foundational types used throughout the crate:
//! - **IDs**: Arena handles (ObjectId, CollectionId) and namespace tags
//! - **Errors**: Application error types with thiserror derives
//! - **Config**: Buffer limits, endpoint capacities, helper path

mod config;
mod errors;
mod ids;

pub use config::Config;
pub use errors::{Error, HookError, Result};
pub use ids::{CollectionId, NamespaceId, ObjectId};
