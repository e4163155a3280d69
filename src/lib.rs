//! # uevent-core - Object Lifecycle Event Delivery
//!
//! Turns a state transition on a hierarchical kernel object into a structured
//! event, delivers it best-effort to all interested subscribers scoped by
//! isolation context, and optionally hands it off to an external helper
//! process:
//! - Six canonical lifecycle actions with a strict string codec
//! - Bounded `key=value` environment buffers with typed append helpers
//! - Namespace resolution over an explicit object/collection hierarchy
//! - Per-namespace multicast endpoints under one registry lock that also
//!   owns the global, gap-free event sequence
//! - No-wait usermode helper spawn carrying the event as its environment
//!
//! ## Architecture
//!
//! Dispatch runs on whatever task triggers the transition; there is no
//! dedicated dispatcher thread:
//! ```text
//!   caller ── dispatch(object, action, extras)
//!      │
//!      ├─ resolve owning collection ── gate: suppress / filter / subsystem
//!      ├─ EnvBuffer: ACTION, DEVPATH, SUBSYSTEM, extras..., on_emit hook
//!      │
//!      │        ┌──────── SubscriberRegistry (one mutex) ────────┐
//!      ├──────► │ seqnum += 1, SEQNUM=<n>,                       │
//!      │        │ "<action>@<devpath>\0<entries>" → endpoints    │
//!      │        └────────────────────────────────────────────────┘
//!      │
//!      └─ usermode helper (optional, no-wait, initial namespace only)
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

// Re-export public API
pub mod action;
pub mod dispatch;
pub mod envbuf;
pub mod helper;
pub mod hierarchy;
pub mod namespace;
pub mod registry;
pub mod types;

// Internal utilities
pub mod observability;

pub use action::Action;
pub use dispatch::{DispatchOutcome, Dispatcher, HELPER_SEARCH_PATH};
pub use envbuf::EnvBuffer;
pub use helper::{HelperSpawner, ProcessSpawner};
pub use hierarchy::{CollectionHooks, Hierarchy, NoHooks, ObjectKind, PlainKind};
pub use registry::{Listener, SubscriberRegistry, BROADCAST_GROUP};
pub use types::{CollectionId, Config, Error, HookError, NamespaceId, ObjectId, Result};
