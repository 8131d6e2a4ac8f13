// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`MenuConfig`], the result of compiling a set of configuration files.
//!
//! Compiling happens in two passes. The parser reads every file front to back and builds the menu tree; at
//! that point `goto` and `exit` may still name menus that appear later. The resolution pass then looks up
//! those targets, picks the default entries and the starting menu, and expands labels in the timeout and
//! error commands. Use [`builder::MenuCompiler`] to run both.

use alloc::{format, string::String};
use core::time::Duration;

use bitflags::bitflags;

use crate::{
    menu::{MenuEntry, MenuId, MenuTree, layout::FKEY_COUNT},
    refstr::RefStr,
    system::{console::Console, fs::ConfigSource},
};

pub mod builder;
pub mod ipappend;
pub mod label;
pub mod scanner;

mod parser;
mod resolve;

bitflags! {
    /// Global switches set by top level directives.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct GlobalFlags: u16 {
        /// Always show the boot prompt (`prompt`).
        const FORCE_PROMPT = 1 << 0;

        /// Ignore the escape keys that force the prompt (`noescape`).
        const NO_ESCAPE = 1 << 1;

        /// Disable label completion at the prompt (`nocomplete`).
        const NO_COMPLETE = 1 << 2;

        /// Allow booting kernels that are not defined by a label (`implicit`).
        const ALLOW_IMPLICIT = 1 << 3;

        /// Print output to the display console (`console`).
        const DISPLAY_CONSOLE = 1 << 4;

        /// Do not halt when booting an entry fails (`nohalt`).
        const NO_HALT = 1 << 5;

        /// Only show the menu while a shift key is held (`menu shiftkey`).
        const SHIFT_KEY = 1 << 6;

        /// Hide the menu until a key is pressed (`menu hidden`).
        const HIDDEN_MENU = 1 << 7;
    }
}

impl Default for GlobalFlags {
    fn default() -> Self {
        Self::ALLOW_IMPLICIT | Self::DISPLAY_CONSOLE | Self::NO_HALT
    }
}

/// A compiled menu configuration.
#[derive(Clone, Debug)]
pub struct MenuConfig {
    /// Every menu and entry.
    pub tree: MenuTree,

    /// The menu shown first.
    pub start_menu: MenuId,

    /// The menu holding the default entry, if the global default was found.
    pub default_menu: Option<MenuId>,

    /// The raw default command line, for when no menu entry is chosen.
    pub default_cmd: Option<RefStr>,

    /// The target of the last `default` directive.
    pub global_default: Option<RefStr>,

    /// The global on-error command.
    pub on_error: Option<RefStr>,

    /// The global switches.
    pub flags: GlobalFlags,

    /// Time before booting regardless of user activity. Zero waits forever.
    pub total_timeout: Duration,

    /// Whether a `ui` directive was seen.
    pub has_ui: bool,

    /// Whether `menu save` or `menu nosave` was seen.
    pub menu_save: bool,
}

impl MenuConfig {
    /// Finds the first created entry whose label is the first word of `text`.
    #[must_use = "Has no effect if the result is unused"]
    pub fn find_label(&self, text: &str) -> Option<&MenuEntry> {
        self.tree.find_label(text).map(|id| self.tree.entry(id))
    }

    /// Returns every label that starts with `prefix`, in creation order.
    ///
    /// Unlabelled rows such as separators are skipped, while hidden entries are included.
    pub fn labels_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a RefStr> {
        self.tree
            .entries()
            .filter_map(|(_, entry)| entry.label.as_ref())
            .filter(move |label| !label.is_empty() && label.starts_with(prefix))
    }

    /// Prints the help file bound to function key `fkey` (0 for F1) of `menu`.
    ///
    /// The file is preceded by a newline. Nothing is printed if the key has no help file or it cannot be read.
    pub fn show_help(
        &self,
        menu: MenuId,
        fkey: usize,
        source: &mut dyn ConfigSource,
        console: &mut dyn Console,
    ) {
        if fkey >= FKEY_COUNT {
            return;
        }
        let Some(name) = self.tree.menu(menu).fkey_help[fkey].textname.as_ref() else {
            return;
        };

        match source.read(name) {
            Ok(text) => console.print(&format!("\n{}", String::from_utf8_lossy(&text))),
            Err(e) => log::debug!("Could not read help file {name}: {e}"),
        }
    }
}
