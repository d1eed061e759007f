// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 corvus-fsw.dev

//! Com buffer splitter: replicates one input buffer to every connected
//! output. Downlink paths use it to feed a radio and a recorder from a
//! single packet source.

use crate::comp::PassiveComponent;
use crate::port::OutputPort;
use crate::ser::ComBuffer;

/// Number of replication outputs.
pub const COM_SPLITTER_OUTPUTS: usize = 4;

pub struct ComSplitter {
    base: PassiveComponent,
    com_out: Vec<OutputPort<ComBuffer>>,
}

impl ComSplitter {
    pub fn new(name: &str, instance: u32) -> Self {
        let com_out = (0..COM_SPLITTER_OUTPUTS)
            .map(|i| OutputPort::new(&format!("{}.com_out[{}]", name, i)))
            .collect();
        Self {
            base: PassiveComponent::new(name, instance),
            com_out,
        }
    }

    /// Replicate `buf` to every connected output, ascending index order.
    ///
    /// Sync receivers borrow the caller's buffer for the handler call;
    /// async receivers get their own marshalled copy. Either way no
    /// receiver can corrupt another's view.
    pub fn com_in(&self, buf: &ComBuffer) {
        for port in &self.com_out {
            port.invoke_hook(buf);
        }
    }

    pub fn com_out_mut(&mut self, index: usize) -> &mut OutputPort<ComBuffer> {
        crate::corvus_assert!(index < COM_SPLITTER_OUTPUTS, index as i64);
        &mut self.com_out[index]
    }

    pub fn name(&self) -> &str {
        self.base.name()
    }
}
