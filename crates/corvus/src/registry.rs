// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Process-wide object registry (`object-registration` feature).
//!
//! Debug-only bookkeeping: every component base registers its description
//! at construction so an operator can dump what was instantiated. Side
//! effect only; nothing in the runtime reads it back.

use parking_lot::RwLock;

static OBJECTS: RwLock<Vec<String>> = RwLock::new(Vec::new());

/// Record a constructed object's description.
pub fn register(description: &str) {
    OBJECTS.write().push(description.to_string());
}

/// Number of registered objects.
pub fn count() -> usize {
    OBJECTS.read().len()
}

/// Snapshot of all registered descriptions, in construction order.
pub fn dump() -> Vec<String> {
    OBJECTS.read().clone()
}

/// Clear the registry (tests only; flight code never unregisters).
pub fn clear() {
    OBJECTS.write().clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_dump_in_order() {
        clear();
        register("rg_driver");
        register("tlm_store");
        let snapshot = dump();
        assert_eq!(snapshot, vec!["rg_driver".to_string(), "tlm_store".to_string()]);
        assert_eq!(count(), 2);
        clear();
    }
}
