// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Queued component base.
//!
//! Adds a bounded message queue to the passive base. Messages are
//! `{selector, marshalled args}` pairs; the selector is the async input
//! port's small integer tag, and dispatch is a match over selectors in the
//! component's [`MsgHandler`] (the role code generation fills in the
//! heritage framework).

use super::passive::PassiveComponent;
use crate::ser::{MsgArgBuffer, SerBuffer};
use corvus_os::queue::{Blocking, Queue, QueueError};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Distinguished selector posted by `exit()`; dispatch returns
/// [`MsgDispatch::Exit`] when it surfaces.
pub const ACTIVE_COMPONENT_EXIT: u32 = u32::MAX;

/// Fallback queue naming when component names are compiled out.
#[cfg(not(feature = "object-names"))]
static QUEUE_COUNTER: std::sync::atomic::AtomicUsize = std::sync::atomic::AtomicUsize::new(0);

/// Outcome of dispatching one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MsgDispatch {
    /// A message was dispatched normally.
    Ok,
    /// Non-blocking drain found no message.
    Empty,
    /// Dispatch failed (decode error or broken queue).
    Error,
    /// The exit sentinel surfaced.
    Exit,
}

/// One queued port invocation: port selector plus marshalled arguments.
#[derive(Debug, Clone)]
pub struct Msg {
    pub selector: u32,
    pub args: MsgArgBuffer,
}

impl Msg {
    pub fn new(selector: u32) -> Self {
        Self {
            selector,
            args: MsgArgBuffer::new(),
        }
    }

    /// The sentinel message posted by `exit()`.
    pub fn exit_sentinel() -> Self {
        Self::new(ACTIVE_COMPONENT_EXIT)
    }
}

/// Per-component message handling, implemented by each concrete component.
pub trait MsgHandler: Send {
    /// Runs once on the owning task before any message is dispatched
    /// (active components only).
    fn preamble(&mut self) {}

    /// Route one message: match on `selector`, deserialize the port
    /// arguments from `args`, call the handler.
    fn handle_msg(&mut self, selector: u32, args: &mut dyn SerBuffer) -> MsgDispatch;

    /// Runs once on the owning task after the dispatch loop exits
    /// (active components only).
    fn finalizer(&mut self) {}
}

/// Queued component base: passive identity plus a message queue.
pub struct QueuedComponent {
    base: PassiveComponent,
    queue: Option<Arc<Queue<Msg>>>,
    dropped: Arc<AtomicU64>,
}

impl QueuedComponent {
    pub fn new(name: &str, instance: u32) -> Self {
        Self {
            base: PassiveComponent::new(name, instance),
            queue: None,
            dropped: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Create the message queue. Called once at initialization.
    ///
    /// `msg_size` is the largest serialized message this component will
    /// receive; it must fit the fixed message blob. Double creation and
    /// oversized messages are invariant violations.
    pub fn create_queue(&mut self, depth: usize, msg_size: usize) {
        crate::corvus_assert!(self.queue.is_none());
        crate::corvus_assert!(depth > 0, depth);
        crate::corvus_assert!(
            msg_size <= crate::config::MSG_ARG_BUFFER_MAX_SIZE,
            msg_size,
            crate::config::MSG_ARG_BUFFER_MAX_SIZE
        );

        let queue_name = self.queue_name();
        self.queue = Some(Arc::new(Queue::new(&queue_name, depth)));
    }

    #[cfg(feature = "object-names")]
    fn queue_name(&self) -> String {
        self.base.name().to_string()
    }

    #[cfg(not(feature = "object-names"))]
    fn queue_name(&self) -> String {
        format!("queue_{}", QUEUE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Shared queue handle for wiring async input ports.
    pub fn msg_queue(&self) -> Arc<Queue<Msg>> {
        match &self.queue {
            Some(q) => Arc::clone(q),
            None => {
                crate::corvus_assert!(false);
                unreachable!("queue wired before create_queue")
            }
        }
    }

    /// True once `create_queue` has run.
    pub fn has_queue(&self) -> bool {
        self.queue.is_some()
    }

    /// Shared dropped-message counter, handed to drop-on-full connections.
    pub(crate) fn dropped_handle(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.dropped)
    }

    /// Messages dropped by full-queue drop policy since creation.
    pub fn msgs_dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Pop and dispatch one message through `handler`.
    pub fn do_dispatch(&self, handler: &mut dyn MsgHandler, mode: Blocking) -> MsgDispatch {
        match &self.queue {
            Some(queue) => dispatch_msg(queue, handler, mode),
            None => MsgDispatch::Error,
        }
    }

    // Delegated passive accessors.

    pub fn name(&self) -> &str {
        self.base.name()
    }

    pub fn instance(&self) -> u32 {
        self.base.instance()
    }

    pub fn id_base(&self) -> u32 {
        self.base.id_base()
    }

    pub fn set_id_base(&mut self, base: u32) {
        self.base.set_id_base(base);
    }

    pub fn passive(&self) -> &PassiveComponent {
        &self.base
    }
}

/// Shared dispatch core: pop one message, recognize the exit sentinel,
/// route everything else to the handler. Used from both the queued base
/// and the active component's task loop.
pub(crate) fn dispatch_msg(
    queue: &Queue<Msg>,
    handler: &mut dyn MsgHandler,
    mode: Blocking,
) -> MsgDispatch {
    match queue.receive(mode) {
        Ok(mut msg) => {
            if msg.selector == ACTIVE_COMPONENT_EXIT {
                return MsgDispatch::Exit;
            }
            msg.args.reset_deser();
            handler.handle_msg(msg.selector, &mut msg.args)
        }
        Err(QueueError::Empty) => MsgDispatch::Empty,
        Err(_) => MsgDispatch::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::Endian;

    struct Recorder {
        seen: Vec<(u32, u32)>,
    }

    impl MsgHandler for Recorder {
        fn handle_msg(&mut self, selector: u32, args: &mut dyn SerBuffer) -> MsgDispatch {
            match args.read_u32(Endian::Big) {
                Ok(v) => {
                    self.seen.push((selector, v));
                    MsgDispatch::Ok
                }
                Err(_) => MsgDispatch::Error,
            }
        }
    }

    fn msg(selector: u32, value: u32) -> Msg {
        let mut m = Msg::new(selector);
        m.args
            .write_u32(value, Endian::Big)
            .expect("write should succeed");
        m
    }

    #[test]
    fn test_dispatch_routes_selector_and_args() {
        let mut comp = QueuedComponent::new("queued", 0);
        comp.create_queue(4, 16);
        let queue = comp.msg_queue();
        queue
            .send(msg(3, 77), Blocking::NonBlock)
            .expect("send should succeed");

        let mut handler = Recorder { seen: Vec::new() };
        assert_eq!(
            comp.do_dispatch(&mut handler, Blocking::NonBlock),
            MsgDispatch::Ok
        );
        assert_eq!(handler.seen, vec![(3, 77)]);
    }

    #[test]
    fn test_nonblocking_drain_reports_empty() {
        let mut comp = QueuedComponent::new("empty", 0);
        comp.create_queue(2, 16);
        let mut handler = Recorder { seen: Vec::new() };
        assert_eq!(
            comp.do_dispatch(&mut handler, Blocking::NonBlock),
            MsgDispatch::Empty
        );
    }

    #[test]
    fn test_exit_sentinel_surfaces_as_exit() {
        let mut comp = QueuedComponent::new("exiting", 0);
        comp.create_queue(2, 16);
        comp.msg_queue()
            .send(Msg::exit_sentinel(), Blocking::NonBlock)
            .expect("send should succeed");

        let mut handler = Recorder { seen: Vec::new() };
        assert_eq!(
            comp.do_dispatch(&mut handler, Blocking::NonBlock),
            MsgDispatch::Exit
        );
        assert!(handler.seen.is_empty());
    }

    #[test]
    fn test_dispatch_without_queue_is_error() {
        let comp = QueuedComponent::new("unqueued", 0);
        let mut handler = Recorder { seen: Vec::new() };
        assert_eq!(
            comp.do_dispatch(&mut handler, Blocking::NonBlock),
            MsgDispatch::Error
        );
    }

    #[test]
    fn test_drop_counter_starts_at_zero() {
        let comp = QueuedComponent::new("counting", 0);
        assert_eq!(comp.msgs_dropped(), 0);
        comp.dropped_handle().fetch_add(2, Ordering::Relaxed);
        assert_eq!(comp.msgs_dropped(), 2);
    }
}
