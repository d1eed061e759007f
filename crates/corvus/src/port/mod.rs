// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Typed port wiring between components.
//!
//! # Architecture
//!
//! A port is the only call path between components. Wiring is static:
//! every output port is connected exactly once at initialization, before
//! any task starts, and never rewired. Three connection kinds:
//!
//! - **Sync**: the caller's task runs the callee's handler directly.
//! - **Guarded**: sync, with the callee's guard mutex held across the
//!   handler.
//! - **Async**: the arguments are serialized into a message tagged with
//!   the callee's port selector and enqueued on the callee's queue; the
//!   caller returns immediately.
//!
//! Async connections carry a full-queue policy. `Block` parks the caller
//! until space frees up, `Drop` discards the message and bumps the
//! callee's dropped counter, `Assert` treats overflow as an invariant
//! violation. After enqueue the caller holds no reference to the copy.
//!
//! [`CallPort`] is the request/response variant for synchronous queries
//! that return a value (parameter reads, time lookups). It has no async
//! form.

use crate::comp::{Msg, QueuedComponent};
use crate::ser::{SerBuffer, Serializable};
use corvus_os::queue::{Blocking, Queue, QueueError};
use corvus_os::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// What an async connection does when the callee's queue is full.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueFullPolicy {
    /// Park the caller until the queue has room.
    Block,
    /// Discard the message and increment the callee's dropped counter.
    Drop,
    /// Overflow is an invariant violation.
    Assert,
}

type SyncHandler<A> = Arc<dyn Fn(&A) + Send + Sync>;

enum Connection<A> {
    Sync(SyncHandler<A>),
    Guarded {
        guard: Arc<Mutex<()>>,
        handler: SyncHandler<A>,
    },
    Async {
        queue: Arc<Queue<Msg>>,
        selector: u32,
        policy: QueueFullPolicy,
        dropped: Arc<AtomicU64>,
    },
}

/// One-way typed output port. `A` is the argument record carried per
/// invocation; async connections additionally require `A: Serializable`
/// so the record can be marshalled into the callee's queue.
pub struct OutputPort<A> {
    #[cfg(feature = "object-names")]
    name: String,
    conn: Option<Connection<A>>,
}

impl<A> OutputPort<A> {
    pub fn new(name: &str) -> Self {
        #[cfg(not(feature = "object-names"))]
        let _ = name;
        Self {
            #[cfg(feature = "object-names")]
            name: name.to_string(),
            conn: None,
        }
    }

    /// Port name, or `"UNKNOWN"` when names are compiled out.
    #[cfg(feature = "object-names")]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Port name, or `"UNKNOWN"` when names are compiled out.
    #[cfg(not(feature = "object-names"))]
    pub fn name(&self) -> &str {
        crate::comp::passive::UNKNOWN_NAME
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Wire to a handler run on the caller's task. Connecting twice is an
    /// invariant violation.
    pub fn connect_sync<F>(&mut self, handler: F)
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        crate::corvus_assert!(self.conn.is_none());
        self.conn = Some(Connection::Sync(Arc::new(handler)));
    }

    /// Wire to a handler run under the callee's guard mutex.
    pub fn connect_guarded<F>(&mut self, guard: Arc<Mutex<()>>, handler: F)
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        crate::corvus_assert!(self.conn.is_none());
        self.conn = Some(Connection::Guarded {
            guard,
            handler: Arc::new(handler),
        });
    }

    /// Invoke through a connected port. Invoking unconnected is an
    /// invariant violation; use [`OutputPort::invoke_hook`] for ports that
    /// are optional by design.
    pub fn invoke(&self, args: &A)
    where
        A: Serializable,
    {
        match &self.conn {
            Some(conn) => self.dispatch(conn, args),
            None => crate::corvus_assert!(false),
        }
    }

    /// Invoke if connected, silently return otherwise. For hook ports
    /// whose default behavior is a no-op.
    pub fn invoke_hook(&self, args: &A)
    where
        A: Serializable,
    {
        if let Some(conn) = &self.conn {
            self.dispatch(conn, args);
        }
    }

    fn dispatch(&self, conn: &Connection<A>, args: &A)
    where
        A: Serializable,
    {
        #[cfg(feature = "port-tracing")]
        log::trace!("[Port] invoke '{}'", self.name());

        match conn {
            Connection::Sync(handler) => handler(args),
            Connection::Guarded { guard, handler } => {
                let _held = guard.lock();
                handler(args);
            }
            Connection::Async {
                queue,
                selector,
                policy,
                dropped,
            } => send_async(queue, *selector, *policy, dropped, args),
        }
    }
}

impl<A: Serializable> OutputPort<A> {
    /// Wire to a queued or active callee. Each invocation serializes the
    /// argument record and enqueues it tagged with `selector`; the
    /// callee's dispatch matches on the selector to route it.
    pub fn connect_async(&mut self, callee: &QueuedComponent, selector: u32, policy: QueueFullPolicy) {
        crate::corvus_assert!(self.conn.is_none());
        self.conn = Some(Connection::Async {
            queue: callee.msg_queue(),
            selector,
            policy,
            dropped: callee.dropped_handle(),
        });
    }
}

fn send_async<A: Serializable>(
    queue: &Queue<Msg>,
    selector: u32,
    policy: QueueFullPolicy,
    dropped: &AtomicU64,
    args: &A,
) {
    let mut msg = Msg::new(selector);
    if args.serialize(&mut msg.args).is_err() {
        // The argument record must fit the fixed message blob; sizing is
        // a build-time decision, so failure here is a wiring bug.
        crate::corvus_assert!(false, selector);
        return;
    }

    match policy {
        QueueFullPolicy::Block => {
            if let Err(e) = queue.send(msg, Blocking::Block) {
                log::error!("[Port] enqueue on '{}' failed: {}", queue.name(), e);
            }
        }
        QueueFullPolicy::Drop => match queue.try_send(msg) {
            Ok(()) => {}
            Err((QueueError::Full, _)) => {
                dropped.fetch_add(1, Ordering::Relaxed);
            }
            Err((e, _)) => {
                log::error!("[Port] enqueue on '{}' failed: {}", queue.name(), e);
            }
        },
        QueueFullPolicy::Assert => {
            if queue.try_send(msg).is_err() {
                crate::corvus_assert!(false, selector);
            }
        }
    }
}

type CallHandler<A, R> = Arc<dyn Fn(&A) -> R + Send + Sync>;

enum CallConnection<A, R> {
    Sync(CallHandler<A, R>),
    Guarded {
        guard: Arc<Mutex<()>>,
        handler: CallHandler<A, R>,
    },
}

/// Request/response port: a synchronous call that returns a value.
pub struct CallPort<A, R> {
    #[cfg(feature = "object-names")]
    name: String,
    conn: Option<CallConnection<A, R>>,
}

impl<A, R> CallPort<A, R> {
    pub fn new(name: &str) -> Self {
        #[cfg(not(feature = "object-names"))]
        let _ = name;
        Self {
            #[cfg(feature = "object-names")]
            name: name.to_string(),
            conn: None,
        }
    }

    /// Port name, or `"UNKNOWN"` when names are compiled out.
    #[cfg(feature = "object-names")]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Port name, or `"UNKNOWN"` when names are compiled out.
    #[cfg(not(feature = "object-names"))]
    pub fn name(&self) -> &str {
        crate::comp::passive::UNKNOWN_NAME
    }

    pub fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    pub fn connect_sync<F>(&mut self, handler: F)
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        crate::corvus_assert!(self.conn.is_none());
        self.conn = Some(CallConnection::Sync(Arc::new(handler)));
    }

    pub fn connect_guarded<F>(&mut self, guard: Arc<Mutex<()>>, handler: F)
    where
        F: Fn(&A) -> R + Send + Sync + 'static,
    {
        crate::corvus_assert!(self.conn.is_none());
        self.conn = Some(CallConnection::Guarded {
            guard,
            handler: Arc::new(handler),
        });
    }

    /// Call through the port. Calling unconnected is an invariant
    /// violation: there is no value to return.
    pub fn call(&self, args: &A) -> R {
        #[cfg(feature = "port-tracing")]
        log::trace!("[Port] call '{}'", self.name());

        match &self.conn {
            Some(CallConnection::Sync(handler)) => handler(args),
            Some(CallConnection::Guarded { guard, handler }) => {
                let _held = guard.lock();
                handler(args)
            }
            None => {
                crate::corvus_assert!(false);
                unreachable!("call port invoked before wiring")
            }
        }
    }
}

/// Empty argument record for signal-only ports (cycle outputs, pings).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoArgs;

impl Serializable for NoArgs {
    fn serialize(&self, _buf: &mut dyn SerBuffer) -> crate::ser::SerResult<()> {
        Ok(())
    }

    fn deserialize(&mut self, _buf: &mut dyn SerBuffer) -> crate::ser::SerResult<()> {
        Ok(())
    }

    #[cfg(feature = "serializable-text")]
    fn to_text(&self) -> String {
        String::from("()")
    }
}
