// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Active component base.
//!
//! An active component owns a task that drains its queue. The task runs a
//! two-phase routine: `preamble()` once, then the dispatch loop until an
//! exit sentinel or dispatch error, then `finalizer()` once. The lifecycle
//! stage is observable from any task; making it explicit lets operators
//! tell "preamble never ran" from "stuck in loop" from "finalizer crashed".

use super::queued::{dispatch_msg, Msg, MsgDispatch, MsgHandler, QueuedComponent};
use corvus_os::queue::{Blocking, Queue};
use corvus_os::task::{Task, TaskOptions, TaskStatus};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle stage. Transitions are strictly monotonic:
/// `Created -> Dispatching -> Finalizing -> Done`, each entered once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Lifecycle {
    /// Constructed; task not yet in the dispatch loop.
    Created = 0,
    /// Preamble ran; the task is dispatching messages.
    Dispatching = 1,
    /// Dispatch loop exited; finalizer is running.
    Finalizing = 2,
    /// Finalizer done; the task has exited or is returning.
    Done = 3,
}

impl Lifecycle {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => Lifecycle::Created,
            1 => Lifecycle::Dispatching,
            2 => Lifecycle::Finalizing,
            _ => Lifecycle::Done,
        }
    }
}

/// Active component: queued base plus an owned task running `H`.
pub struct ActiveComponent<H: MsgHandler + 'static> {
    queued: QueuedComponent,
    handler: Option<H>,
    stage: Arc<AtomicU8>,
    task: Task,
}

impl<H: MsgHandler + 'static> ActiveComponent<H> {
    pub fn new(name: &str, instance: u32, handler: H) -> Self {
        Self {
            queued: QueuedComponent::new(name, instance),
            handler: Some(handler),
            stage: Arc::new(AtomicU8::new(Lifecycle::Created as u8)),
            task: Task::new(name),
        }
    }

    /// Create the message queue. Must precede [`ActiveComponent::start`].
    pub fn create_queue(&mut self, depth: usize, msg_size: usize) {
        self.queued.create_queue(depth, msg_size);
    }

    /// Start the owned task. Queue creation and port wiring must be done;
    /// starting twice or starting without a queue is an invariant
    /// violation.
    pub fn start(&mut self, opts: TaskOptions) -> TaskStatus {
        crate::corvus_assert!(self.queued.has_queue());
        let handler = match self.handler.take() {
            Some(h) => h,
            None => {
                crate::corvus_assert!(false);
                return TaskStatus::AlreadyStarted;
            }
        };

        let queue = self.queued.msg_queue();
        let stage = Arc::clone(&self.stage);
        self.task
            .start(opts, move || task_state_machine(queue, stage, handler))
    }

    /// Post the exit sentinel. The task finishes its current message,
    /// observes the sentinel, runs the finalizer, and exits.
    pub fn exit(&self) {
        // Blocking: the exit request must not be lost to a full queue.
        let _ = self.queued.msg_queue().send(Msg::exit_sentinel(), Blocking::Block);
    }

    /// Block until the task terminates; returns the terminal task status.
    pub fn join(&mut self) -> TaskStatus {
        self.task.join()
    }

    /// Current lifecycle stage.
    ///
    /// Readable from any task: the stage is an atomic with release stores
    /// and acquire loads, so readers see a monotonic snapshot (never torn,
    /// never regressing).
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::from_u8(self.stage.load(Ordering::Acquire))
    }

    // Delegated accessors.

    pub fn name(&self) -> &str {
        self.queued.name()
    }

    pub fn instance(&self) -> u32 {
        self.queued.instance()
    }

    pub fn set_id_base(&mut self, base: u32) {
        self.queued.set_id_base(base);
    }

    pub fn id_base(&self) -> u32 {
        self.queued.id_base()
    }

    pub fn msgs_dropped(&self) -> u64 {
        self.queued.msgs_dropped()
    }

    /// Queued base, for wiring async input ports at this component.
    pub fn queued(&self) -> &QueuedComponent {
        &self.queued
    }
}

/// The task-side lifecycle state machine.
fn task_state_machine<H: MsgHandler>(queue: Arc<Queue<Msg>>, stage: Arc<AtomicU8>, mut handler: H) {
    handler.preamble();
    stage.store(Lifecycle::Dispatching as u8, Ordering::Release);

    loop {
        match dispatch_msg(&queue, &mut handler, Blocking::Block) {
            MsgDispatch::Ok | MsgDispatch::Empty => {}
            MsgDispatch::Exit => break,
            MsgDispatch::Error => {
                log::error!("[Active] '{}' dispatch error, exiting loop", queue.name());
                break;
            }
        }
    }

    stage.store(Lifecycle::Finalizing as u8, Ordering::Release);
    handler.finalizer();
    stage.store(Lifecycle::Done as u8, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ser::{Endian, SerBuffer};
    use parking_lot::Mutex;

    #[derive(Clone, Default)]
    struct Journal {
        events: Arc<Mutex<Vec<String>>>,
    }

    struct JournalHandler {
        journal: Journal,
    }

    impl MsgHandler for JournalHandler {
        fn preamble(&mut self) {
            self.journal.events.lock().push("preamble".into());
        }

        fn handle_msg(&mut self, selector: u32, args: &mut dyn SerBuffer) -> MsgDispatch {
            let value = match args.read_u32(Endian::Big) {
                Ok(v) => v,
                Err(_) => return MsgDispatch::Error,
            };
            self.journal
                .events
                .lock()
                .push(format!("msg {} {}", selector, value));
            MsgDispatch::Ok
        }

        fn finalizer(&mut self) {
            self.journal.events.lock().push("finalizer".into());
        }
    }

    fn work_msg(value: u32) -> Msg {
        let mut m = Msg::new(1);
        m.args
            .write_u32(value, Endian::Big)
            .expect("write should succeed");
        m
    }

    #[test]
    fn test_lifecycle_and_hook_order() {
        let journal = Journal::default();
        let mut comp = ActiveComponent::new(
            "worker",
            0,
            JournalHandler {
                journal: journal.clone(),
            },
        );
        comp.create_queue(8, 16);
        assert_eq!(comp.lifecycle(), Lifecycle::Created);

        assert_eq!(comp.start(TaskOptions::default()), TaskStatus::Ok);
        let queue = comp.queued().msg_queue();
        for v in [10, 20, 30] {
            queue
                .send(work_msg(v), Blocking::Block)
                .expect("send should succeed");
        }
        comp.exit();
        assert_eq!(comp.join(), TaskStatus::Ok);
        assert_eq!(comp.lifecycle(), Lifecycle::Done);

        let events = journal.events.lock();
        assert_eq!(
            *events,
            vec![
                "preamble".to_string(),
                "msg 1 10".to_string(),
                "msg 1 20".to_string(),
                "msg 1 30".to_string(),
                "finalizer".to_string(),
            ]
        );
    }

    #[test]
    fn test_dispatch_error_exits_through_finalizer() {
        let journal = Journal::default();
        let mut comp = ActiveComponent::new(
            "erroring",
            0,
            JournalHandler {
                journal: journal.clone(),
            },
        );
        comp.create_queue(4, 16);
        comp.start(TaskOptions::default());

        // Empty args: handle_msg fails to decode and reports Error.
        comp.queued()
            .msg_queue()
            .send(Msg::new(1), Blocking::Block)
            .expect("send should succeed");
        assert_eq!(comp.join(), TaskStatus::Ok);
        assert_eq!(comp.lifecycle(), Lifecycle::Done);
        assert_eq!(
            journal.events.lock().last().map(String::as_str),
            Some("finalizer")
        );
    }

    #[test]
    fn test_created_until_preamble_completes() {
        use std::sync::mpsc;

        struct Gated {
            entered: mpsc::Sender<()>,
            gate: mpsc::Receiver<()>,
        }
        impl MsgHandler for Gated {
            fn preamble(&mut self) {
                self.entered.send(()).expect("send should succeed");
                self.gate.recv().expect("recv should succeed");
            }
            fn handle_msg(&mut self, _selector: u32, _args: &mut dyn SerBuffer) -> MsgDispatch {
                MsgDispatch::Ok
            }
        }

        let (entered_tx, entered_rx) = mpsc::channel();
        let (gate_tx, gate_rx) = mpsc::channel();
        let mut comp = ActiveComponent::new(
            "gated",
            0,
            Gated {
                entered: entered_tx,
                gate: gate_rx,
            },
        );
        comp.create_queue(4, 16);
        comp.start(TaskOptions::default());

        // Preamble in flight: the dispatch loop is not entered yet, so
        // the stage still reads Created.
        entered_rx.recv().expect("recv should succeed");
        assert_eq!(comp.lifecycle(), Lifecycle::Created);

        gate_tx.send(()).expect("send should succeed");
        comp.exit();
        assert_eq!(comp.join(), TaskStatus::Ok);
        assert_eq!(comp.lifecycle(), Lifecycle::Done);
    }

    #[test]
    fn test_exit_before_work_skips_handlers() {
        let journal = Journal::default();
        let mut comp = ActiveComponent::new(
            "idle",
            0,
            JournalHandler {
                journal: journal.clone(),
            },
        );
        comp.create_queue(4, 16);
        comp.start(TaskOptions::default());
        comp.exit();
        comp.join();

        let events = journal.events.lock();
        assert_eq!(*events, vec!["preamble".to_string(), "finalizer".to_string()]);
    }
}
