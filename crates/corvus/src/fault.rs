// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Assertion handling.
//!
//! Invariant violations (bad enum tag, impossible state, null wiring) are
//! not recoverable errors; they route through a single process-wide
//! handler. The handler receives a file tag, a line number, and up to
//! [`crate::config::ASSERT_ARG_SLOTS`] numeric slots. Tests install a
//! capturing hook through [`ScopedAssertHook`] and survive the assertion;
//! without a hook the process halts via panic.
//!
//! The file tag is the source path by default; with the `assert-file-id`
//! feature it is an fnv1a-32 hash of the path, trading ROM strings for
//! integer ids. With `no-assert` the [`corvus_assert!`] macro compiles to
//! nothing, condition unevaluated.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Identifies the asserting source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTag {
    /// Source path as embedded by `file!()`.
    Path(&'static str),
    /// fnv1a-32 hash of the source path (`assert-file-id` builds).
    Id(u32),
}

impl fmt::Display for FileTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileTag::Path(p) => write!(f, "{}", p),
            FileTag::Id(id) => write!(f, "file-id {:#010X}", id),
        }
    }
}

/// Receiver for assertion reports.
pub trait AssertHook: Send + Sync {
    /// Called with the failure site and its numeric argument slots.
    fn report(&self, file: FileTag, line: u32, args: &[i64]);
}

static ASSERT_HOOK: RwLock<Option<Arc<dyn AssertHook>>> = RwLock::new(None);

/// Install the process-wide assertion hook, replacing any previous one.
pub fn install_hook(hook: Arc<dyn AssertHook>) {
    *ASSERT_HOOK.write() = Some(hook);
}

/// Remove the process-wide assertion hook.
pub fn clear_hook() {
    *ASSERT_HOOK.write() = None;
}

/// RAII hook installation for tests: installs on construction, clears on
/// drop. Keep one alive for the duration of the assertion under test.
pub struct ScopedAssertHook;

impl ScopedAssertHook {
    pub fn install(hook: Arc<dyn AssertHook>) -> Self {
        install_hook(hook);
        Self
    }
}

impl Drop for ScopedAssertHook {
    fn drop(&mut self) {
        clear_hook();
    }
}

/// Deliver an assertion failure to the hook, or halt.
///
/// A registered hook captures the report and the caller continues (the
/// hook decides whether that is survivable). With no hook this panics,
/// which halts the process under flight `panic = "abort"` profiles.
pub fn assert_failure(file: FileTag, line: u32, args: &[i64]) {
    let capped = &args[..args.len().min(crate::config::ASSERT_ARG_SLOTS)];
    let hook = ASSERT_HOOK.read().clone();
    match hook {
        Some(hook) => hook.report(file, line, capped),
        None => panic!("ASSERT {} line {} args {:?}", file, line, capped),
    }
}

/// Build the file tag for the current assertion payload configuration.
#[cfg(not(feature = "assert-file-id"))]
pub fn file_tag(path: &'static str) -> FileTag {
    FileTag::Path(path)
}

/// Build the file tag for the current assertion payload configuration.
#[cfg(feature = "assert-file-id")]
pub fn file_tag(path: &'static str) -> FileTag {
    FileTag::Id(fnv1a32(path))
}

#[allow(dead_code)] // referenced only by the assert-file-id configuration and tests
fn fnv1a32(s: &str) -> u32 {
    let mut hash: u32 = 0x811C_9DC5;
    for b in s.bytes() {
        hash ^= u32::from(b);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

/// Assert an invariant, reporting up to six numeric context slots.
///
/// ```ignore
/// corvus_assert!(index < table.len(), index as i64, table.len() as i64);
/// ```
#[macro_export]
#[cfg(not(feature = "no-assert"))]
macro_rules! corvus_assert {
    ($cond:expr $(, $arg:expr)* $(,)?) => {
        if !($cond) {
            $crate::fault::assert_failure(
                $crate::fault::file_tag(file!()),
                line!(),
                &[$(($arg) as i64),*],
            );
        }
    };
}

/// No-op assertion (`no-assert` builds): nothing evaluated, nothing emitted.
#[macro_export]
#[cfg(feature = "no-assert")]
macro_rules! corvus_assert {
    ($cond:expr $(, $arg:expr)* $(,)?) => {
        if false {
            let _ = (&$cond, $(&$arg),*);
        }
    };
}
