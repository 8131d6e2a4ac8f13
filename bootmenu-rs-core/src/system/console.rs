// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Immediate text output, used by `say` and function key help.

use alloc::string::String;
use uefi::system::with_stdout;

/// Somewhere text can be printed right away.
pub trait Console {
    /// Prints `text` as is. No newline is added.
    fn print(&mut self, text: &str);
}

/// A [`Console`] that prints to the UEFI standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct UefiConsole;

impl Console for UefiConsole {
    fn print(&mut self, text: &str) {
        with_stdout(|stdout| {
            let _ = core::fmt::Write::write_str(stdout, text);
        });
    }
}

/// A [`Console`] that collects everything printed to it.
#[derive(Clone, Debug, Default)]
pub struct BufferConsole {
    /// Everything printed so far.
    output: String,
}

impl BufferConsole {
    /// Creates an empty [`BufferConsole`].
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    /// Returns everything printed so far.
    #[must_use = "Has no effect if the result is unused"]
    pub fn output(&self) -> &str {
        &self.output
    }
}

impl Console for BufferConsole {
    fn print(&mut self, text: &str) {
        self.output.push_str(text);
    }
}
