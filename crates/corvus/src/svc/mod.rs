// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Framework service components: the reusable building blocks every
//! deployment wires in. All are passive; they run on whichever task
//! invokes their ports.

pub mod com_splitter;
pub mod fatal;
pub mod prm_store;
pub mod rate_group_driver;
pub mod tlm_store;

pub use com_splitter::{ComSplitter, COM_SPLITTER_OUTPUTS};
pub use fatal::{FatalHandler, FatalHook, ScopedFatalHook};
pub use prm_store::{ParamValid, PrmStore};
pub use rate_group_driver::{Divider, DividerSet, RateGroupDriver};
pub use tlm_store::{TlmStore, TlmValid};
