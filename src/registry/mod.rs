//! Subscriber registry: per-namespace endpoints and the global sequence.
//!
//! One mutex guards both the endpoint list and the event sequence counter.
//! Registration/teardown and the sequenced broadcast loop all serialize on
//! it, which buys a globally consistent, gap-free sequence order at the cost
//! of holding the lock across a variable-length delivery loop. Nothing
//! awaits while the lock is held.
//!
//! Delivery is best-effort: a full endpoint channel ("no buffer space") and
//! a closed one ("no listener") both count as success. Dropped payloads are
//! the subscriber's problem, never the publisher's.
//!
//! The registry is an explicit, constructible object: tests build isolated
//! registries, production wires one `Arc<SubscriberRegistry>` into the
//! dispatcher and into the namespace lifecycle hooks.

use std::sync::{Mutex, MutexGuard};

use bytes::{BufMut, Bytes, BytesMut};
use tokio::sync::mpsc;

use crate::envbuf::EnvBuffer;
use crate::namespace;
use crate::types::{Config, Error, NamespaceId, Result};

/// Fixed multicast group identifier shared by all subscriber endpoints.
pub const BROADCAST_GROUP: u32 = 1;

/// Receiving half of one namespace's endpoint.
#[derive(Debug)]
pub struct Listener {
    namespace: NamespaceId,
    rx: mpsc::Receiver<Bytes>,
}

impl Listener {
    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    /// Waits for the next wire payload. `None` once the endpoint is
    /// unregistered and the channel drained.
    pub async fn recv(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    /// Non-blocking variant of [`Listener::recv`].
    pub fn try_recv(&mut self) -> Option<Bytes> {
        self.rx.try_recv().ok()
    }
}

#[derive(Debug)]
struct Endpoint {
    namespace: NamespaceId,
    tx: mpsc::Sender<Bytes>,
}

#[derive(Debug)]
struct RegistryInner {
    seqnum: u64,
    endpoints: Vec<Endpoint>,
}

/// Process-wide set of subscriber endpoints plus the sequence counter.
#[derive(Debug)]
pub struct SubscriberRegistry {
    endpoint_capacity: usize,
    max_endpoints: usize,
    inner: Mutex<RegistryInner>,
}

impl SubscriberRegistry {
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint_capacity: config.endpoint_capacity.max(1),
            max_endpoints: config.max_endpoints,
            inner: Mutex::new(RegistryInner {
                seqnum: 0,
                endpoints: Vec::new(),
            }),
        }
    }

    /// Binds a new endpoint for `ns` to the fixed broadcast group.
    ///
    /// At most one endpoint may exist per namespace. Fails with
    /// `ResourceExhausted` when the endpoint cap is reached and
    /// `ProtocolUnavailable` when the namespace is already bound.
    pub fn register(&self, ns: NamespaceId) -> Result<Listener> {
        let mut inner = self.lock();

        if inner.endpoints.len() >= self.max_endpoints {
            return Err(Error::resource_exhausted(format!(
                "endpoint cap {} reached",
                self.max_endpoints
            )));
        }
        if inner.endpoints.iter().any(|e| e.namespace == ns) {
            return Err(Error::protocol_unavailable(format!(
                "{ns} already bound to broadcast group {BROADCAST_GROUP}"
            )));
        }

        let (tx, rx) = mpsc::channel(self.endpoint_capacity);
        inner.endpoints.push(Endpoint { namespace: ns, tx });
        tracing::debug!(namespace = %ns, "endpoint registered");

        Ok(Listener { namespace: ns, rx })
    }

    /// Removes the endpoint for `ns` and releases its channel.
    ///
    /// Removing a namespace with no registered endpoint is a caller contract
    /// violation; it is logged and otherwise ignored.
    pub fn unregister(&self, ns: NamespaceId) {
        let mut inner = self.lock();
        let before = inner.endpoints.len();
        inner.endpoints.retain(|e| e.namespace != ns);
        if inner.endpoints.len() == before {
            tracing::warn!(namespace = %ns, "unregister for namespace with no endpoint");
        } else {
            tracing::debug!(namespace = %ns, "endpoint unregistered");
        }
    }

    pub fn endpoint_count(&self) -> usize {
        self.lock().endpoints.len()
    }

    /// Last sequence number handed out.
    pub fn current_seqnum(&self) -> u64 {
        self.lock().seqnum
    }

    /// The locked phase of a dispatch: assigns the next sequence number,
    /// appends `SEQNUM`, and fans the finished payload out to every eligible
    /// endpoint while still holding the lock.
    ///
    /// `header` is the `"<action>@<devpath>"` prefix of the wire payload.
    /// Returns the assigned sequence number and the number of endpoints the
    /// payload was handed to. A buffer overflow while appending `SEQNUM`
    /// aborts after releasing the lock; the sequence number stays consumed.
    pub fn broadcast(
        &self,
        env: &mut EnvBuffer,
        header: &str,
        object_ns: Option<NamespaceId>,
    ) -> Result<(u64, usize)> {
        let mut inner = self.lock();

        inner.seqnum += 1;
        let seqnum = inner.seqnum;
        env.append_u64("SEQNUM", seqnum)?;

        // One payload serves every endpoint; Bytes clones are refcounted.
        let payload = wire_payload(header, env);

        let mut reached = 0usize;
        for endpoint in &inner.endpoints {
            // No active listener: skip without building per-endpoint state.
            if endpoint.tx.is_closed() {
                continue;
            }
            if !namespace::broadcast_admits(endpoint.namespace, object_ns) {
                continue;
            }
            match endpoint.tx.try_send(payload.clone()) {
                Ok(()) => reached += 1,
                // No buffer space: best-effort semantics, the subscriber
                // handles its own losses.
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::debug!(namespace = %endpoint.namespace, seqnum, "endpoint queue full, payload dropped");
                }
                // Listener went away between the closed check and the send.
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    tracing::debug!(namespace = %endpoint.namespace, seqnum, "endpoint closed, payload dropped");
                }
            }
        }

        Ok((seqnum, reached))
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        // Seqnum and endpoint list cannot be torn by a panicked holder;
        // recover the guard instead of propagating poison.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Builds the wire payload: `"<action>@<devpath>\0"` header followed by each
/// environment entry, each independently NUL-terminated. No length prefix.
fn wire_payload(header: &str, env: &EnvBuffer) -> Bytes {
    let mut buf = BytesMut::with_capacity(header.len() + 1 + env.byte_len());
    buf.put_slice(header.as_bytes());
    buf.put_u8(0);
    buf.put_slice(env.blob());
    buf.freeze()
}
