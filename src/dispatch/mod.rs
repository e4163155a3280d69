//! Delivery dispatcher.
//!
//! One dispatch call runs a single linear pipeline on the calling task:
//! resolve the owning collection, gate (suppression, filter hook, subsystem
//! name), build the environment buffer, give the collection's emit hook its
//! last chance, then take the registry lock to sequence and broadcast, and
//! finally hand the buffer to the usermode helper when one is configured.
//!
//! Any stage may end the dispatch early with a distinguishable outcome:
//! fatal conditions return an [`Error`](crate::types::Error), while
//! [`DispatchOutcome::Suppressed`] and [`DispatchOutcome::Filtered`] are
//! success outcomes meaning "no delivery attempted". Event delivery never
//! blocks or reverses the lifecycle transition that triggered it.

use std::fmt;
use std::sync::Arc;

use crate::action::Action;
use crate::envbuf::EnvBuffer;
use crate::helper::{HelperSpawner, ProcessSpawner};
use crate::hierarchy::Hierarchy;
use crate::namespace;
use crate::registry::SubscriberRegistry;
use crate::types::{Config, Error, ObjectId, Result};

/// Search path handed to the usermode helper.
pub const HELPER_SEARCH_PATH: &str = "/sbin:/bin:/usr/sbin:/usr/bin";

/// Caller-visible result of a successful dispatch call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event was sequenced and offered to every eligible endpoint.
    Delivered {
        /// Globally unique sequence number assigned to this event.
        seqnum: u64,
        /// Endpoints the payload was actually handed to.
        endpoints_reached: usize,
    },
    /// The object's suppression flag dropped the event before any buffer
    /// was built.
    Suppressed,
    /// The collection's filter hook (or an unset subsystem name) dropped
    /// the event.
    Filtered,
}

/// Orchestrates gating, encoding, sequencing, and both delivery channels.
#[derive(Clone)]
pub struct Dispatcher {
    config: Config,
    registry: Arc<SubscriberRegistry>,
    spawner: Arc<dyn HelperSpawner>,
}

impl Dispatcher {
    /// Dispatcher with the production process spawner.
    pub fn new(config: Config, registry: Arc<SubscriberRegistry>) -> Self {
        Self::with_spawner(config, registry, Arc::new(ProcessSpawner))
    }

    /// Dispatcher with an injected spawn provider.
    pub fn with_spawner(
        config: Config,
        registry: Arc<SubscriberRegistry>,
        spawner: Arc<dyn HelperSpawner>,
    ) -> Self {
        Self {
            config,
            registry,
            spawner,
        }
    }

    pub fn registry(&self) -> &Arc<SubscriberRegistry> {
        &self.registry
    }

    /// Announces `action` on `object` with no extra entries.
    pub async fn dispatch_simple(
        &self,
        hierarchy: &Hierarchy,
        object: ObjectId,
        action: Action,
    ) -> Result<DispatchOutcome> {
        self.dispatch(hierarchy, object, action, &[]).await
    }

    /// Announces `action` on `object`, appending `extras` verbatim after the
    /// reserved `ACTION`/`DEVPATH`/`SUBSYSTEM` entries.
    pub async fn dispatch(
        &self,
        hierarchy: &Hierarchy,
        object: ObjectId,
        action: Action,
        extras: &[&str],
    ) -> Result<DispatchOutcome> {
        // Nearest collection on the parent chain; objects outside any
        // collection cannot use event delivery at all.
        let Some(collection) = hierarchy.owning_collection(object) else {
            tracing::debug!(
                object = hierarchy.name_of(object),
                "event for object without owning collection"
            );
            return Err(Error::missing_collection(hierarchy.name_of(object)));
        };

        // Suppressed objects drop the event before any buffer exists.
        if hierarchy.is_suppressed(object) {
            tracing::debug!(
                object = hierarchy.name_of(object),
                action = action.as_str(),
                "suppression flag dropped the event"
            );
            return Ok(DispatchOutcome::Suppressed);
        }

        let hooks = hierarchy.collection_hooks(collection);

        if !hooks.filter(hierarchy, object) {
            tracing::debug!(
                object = hierarchy.name_of(object),
                action = action.as_str(),
                "filter hook dropped the event"
            );
            return Ok(DispatchOutcome::Filtered);
        }

        // Originating subsystem: hook override, else the collection's name.
        let subsystem = hooks
            .name_of(hierarchy, object)
            .unwrap_or_else(|| hierarchy.collection_name(collection).to_string());
        if subsystem.is_empty() {
            tracing::debug!(
                object = hierarchy.name_of(object),
                "unset subsystem dropped the event"
            );
            return Ok(DispatchOutcome::Filtered);
        }

        let devpath = hierarchy.path_of(object);
        let mut env = EnvBuffer::new(self.config.max_env_bytes, self.config.max_env_keys);
        env.append("ACTION", action.as_str())?;
        env.append("DEVPATH", &devpath)?;
        env.append("SUBSYSTEM", &subsystem)?;
        for extra in extras {
            env.append_raw(extra)?;
        }

        // Collection-specific additions; a hook error aborts the dispatch.
        hooks
            .on_emit(hierarchy, object, &mut env)
            .map_err(Error::hook)?;

        // One-shot bookkeeping so teardown can tell whether an announcement
        // is still owed. Not consumed by this dispatcher.
        match action {
            Action::Add => hierarchy.mark_add_announced(object),
            Action::Remove => hierarchy.mark_remove_announced(object),
            _ => {}
        }

        let object_ns = namespace::owning_namespace(hierarchy, object);
        let header = format!("{}@{}", action.as_str(), devpath);
        let (seqnum, endpoints_reached) =
            self.registry.broadcast(&mut env, &header, object_ns)?;

        // Usermode helper hand-off; the buffer moves into the spawn and is
        // released by its completion task.
        if let Some(helper) = &self.config.helper_path {
            if namespace::usermode_admits(object_ns) {
                env.append("HOME", "/")?;
                env.append("PATH", HELPER_SEARCH_PATH)?;
                let args = [subsystem];
                self.spawner.spawn_no_wait(helper, &args, env).await?;
            }
        }

        Ok(DispatchOutcome::Delivered {
            seqnum,
            endpoints_reached,
        })
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
