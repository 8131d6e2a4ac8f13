// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The IP-append fragment table.
//!
//! Network boot environments provide a few fixed kernel command line fragments, such as `ip=...` on bit 0
//! and `BOOTIF=...` on bit 1. The `ipappend` directive picks fragments from the table with a bitmask.

use alloc::vec::Vec;

use crate::refstr::RefStr;

/// The maximum amount of fragments, one per bit of the mask.
pub const MAX_FRAGMENTS: usize = 32;

/// A table mapping bit positions to command line fragments.
#[derive(Clone, Debug, Default)]
pub struct IpAppend {
    /// The fragments. A missing slot selects nothing.
    fragments: Vec<Option<RefStr>>,
}

impl IpAppend {
    /// Creates an empty [`IpAppend`] table.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new() -> Self {
        Self {
            fragments: Vec::new(),
        }
    }

    /// Sets the fragment of a bit position.
    ///
    /// Positions at or past [`MAX_FRAGMENTS`] are ignored.
    pub fn set(&mut self, bit: usize, fragment: &str) -> &mut Self {
        if bit < MAX_FRAGMENTS {
            if self.fragments.len() <= bit {
                self.fragments.resize(bit + 1, None);
            }
            self.fragments[bit] = Some(RefStr::new(fragment));
        }
        self
    }

    /// Returns the fragments selected by `mask`, in bit order.
    pub fn selected(&self, mask: u32) -> impl Iterator<Item = &RefStr> {
        self.fragments
            .iter()
            .enumerate()
            .filter(move |(bit, _)| mask & (1 << bit) != 0)
            .filter_map(|(_, fragment)| fragment.as_ref())
    }
}
