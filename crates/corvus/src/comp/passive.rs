// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Passive component base.
//!
//! Carries identity only: a name (elidable for ROM-constrained builds), an
//! instance number, and the identifier base a code generator uses to offset
//! locally numbered opcodes, channels, events, and parameters into globally
//! unique ids.

/// Name reported when component names are compiled out.
#[cfg(any(not(feature = "object-names"), test))]
pub(crate) const UNKNOWN_NAME: &str = "UNKNOWN";

/// Base data for every component tier.
#[derive(Debug)]
pub struct PassiveComponent {
    #[cfg(feature = "object-names")]
    name: String,
    instance: u32,
    id_base: u32,
}

impl PassiveComponent {
    /// Construct with a name and instance number.
    ///
    /// With `object-registration` the component announces itself to the
    /// process-wide registry; with names compiled out the registry records
    /// the instance number only.
    pub fn new(name: &str, instance: u32) -> Self {
        #[cfg(feature = "object-registration")]
        crate::registry::register(&format!("{} [{}]", name, instance));
        #[cfg(not(feature = "object-names"))]
        let _ = name;

        Self {
            #[cfg(feature = "object-names")]
            name: name.to_string(),
            instance,
            id_base: 0,
        }
    }

    /// Component name, or `"UNKNOWN"` when names are compiled out.
    #[cfg(feature = "object-names")]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Component name, or `"UNKNOWN"` when names are compiled out.
    #[cfg(not(feature = "object-names"))]
    pub fn name(&self) -> &str {
        UNKNOWN_NAME
    }

    /// Instance number assigned at initialization.
    pub fn instance(&self) -> u32 {
        self.instance
    }

    /// Offset added to locally numbered ids to form global ids.
    pub fn id_base(&self) -> u32 {
        self.id_base
    }

    pub fn set_id_base(&mut self, base: u32) {
        self.id_base = base;
    }

    /// Offset a locally numbered id into the global space.
    pub fn global_id(&self, local: u32) -> u32 {
        self.id_base + local
    }

    /// Operator-facing rendering.
    #[cfg(feature = "object-to-string")]
    pub fn to_text(&self) -> String {
        format!("Comp: {}", self.name())
    }
}
