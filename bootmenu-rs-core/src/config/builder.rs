// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Compiler builder.

use alloc::string::String;

use crate::{
    config::{MenuConfig, ipappend::IpAppend, parser::Parser},
    system::{console::Console, fs::ConfigSource, variable::SavedDefault},
};

/// How deep includes may nest when nothing else is configured.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 16;

/// A builder to configure and run a compile into a [`MenuConfig`].
///
/// # Example
///
/// ```
/// use bootmenu_rs_core::{
///     config::{builder::MenuCompiler, ipappend::IpAppend},
///     system::{console::BufferConsole, fs::MemoryFileSystem, variable::FixedSavedDefault},
/// };
///
/// let mut fs = MemoryFileSystem::new();
/// fs.insert("extlinux.conf", b"say Booting\nmenu save\nlabel a\nlabel b\nipappend 1\n");
///
/// let mut console = BufferConsole::new();
/// let mut saved = FixedSavedDefault(Some("b".into()));
/// let mut ipappend = IpAppend::new();
/// ipappend.set(0, "ip=dhcp");
///
/// let config = MenuCompiler::new(&mut fs)
///     .console(&mut console)
///     .saved_default(&mut saved)
///     .ipappend(ipappend)
///     .compile(&[]);
///
/// let root = config.tree.menu(config.tree.root());
/// assert_eq!(root.default_entry, 1);
/// assert_eq!(config.find_label("b").and_then(|e| e.cmdline.as_deref()), Some("b ip=dhcp"));
/// assert_eq!(console.output(), "Booting\n");
/// ```
#[must_use = "Has no effect if the result is unused"]
pub struct MenuCompiler<'a> {
    /// Where configuration files come from.
    source: &'a mut dyn ConfigSource,

    /// Where `say` output goes.
    console: Option<&'a mut dyn Console>,

    /// The label saved by a previous boot.
    saved_default: Option<&'a mut dyn SavedDefault>,

    /// The IP-append fragments.
    ipappend: IpAppend,

    /// The name tried first when no file is given.
    default_name: Option<String>,

    /// How deep includes may nest.
    max_include_depth: usize,
}

impl<'a> MenuCompiler<'a> {
    /// Constructs a new [`MenuCompiler`] reading from `source`.
    pub fn new(source: &'a mut dyn ConfigSource) -> Self {
        Self {
            source,
            console: None,
            saved_default: None,
            ipappend: IpAppend::new(),
            default_name: None,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    /// Sets where `say` output goes.
    ///
    /// Without a console, `say` lines are logged at the info level instead.
    pub fn console(mut self, console: &'a mut dyn Console) -> Self {
        self.console = Some(console);
        self
    }

    /// Sets the store of the label saved by a previous boot.
    ///
    /// This is only consulted if the configuration uses `menu save` or `menu nosave`.
    pub fn saved_default(mut self, saved_default: &'a mut dyn SavedDefault) -> Self {
        self.saved_default = Some(saved_default);
        self
    }

    /// Sets the IP-append fragment table.
    pub fn ipappend(mut self, ipappend: IpAppend) -> Self {
        self.ipappend = ipappend;
        self
    }

    /// Sets the configuration name that is tried first when [`Self::compile`] is given no files.
    pub fn default_name(mut self, default_name: impl Into<String>) -> Self {
        self.default_name = Some(default_name.into());
        self
    }

    /// Sets how deep includes may nest. Includes past the limit are skipped.
    pub const fn max_include_depth(mut self, max_include_depth: usize) -> Self {
        self.max_include_depth = max_include_depth;
        self
    }

    /// Compiles `files`, in order, into a [`MenuConfig`].
    ///
    /// Each file falls back to the conventional configuration names if it cannot be read. With no files at
    /// all, the default name and then the conventional names are tried.
    #[must_use = "Has no effect if the result is unused"]
    pub fn compile(self, files: &[&str]) -> MenuConfig {
        let Self {
            source,
            console,
            saved_default,
            ipappend,
            default_name,
            max_include_depth,
        } = self;

        let mut parser = Parser::new(source, console, ipappend, max_include_depth);
        if files.is_empty() {
            parser.parse_primary(None, default_name.as_deref());
        } else {
            for &file in files {
                parser.parse_primary(Some(file), None);
            }
        }

        let mut config = parser.finish();
        config.resolve(saved_default);
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::fs::MemoryFileSystem;

    #[test]
    fn test_default_name_first() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("custom.cfg", b"label custom\n");
        fs.insert("extlinux.conf", b"label ext\n");

        let config = MenuCompiler::new(&mut fs).default_name("custom.cfg").compile(&[]);
        assert!(config.find_label("custom").is_some());
        assert!(config.find_label("ext").is_none());
    }

    #[test]
    fn test_several_files_share_state() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("a.cfg", b"append quiet\nlabel a\n");
        fs.insert("b.cfg", b"kernel vmlinuz\n");

        let config = MenuCompiler::new(&mut fs).compile(&["a.cfg", "b.cfg"]);
        let entry = config.find_label("a").expect("defined in a.cfg");
        assert_eq!(entry.cmdline.as_deref(), Some("vmlinuz quiet"));
    }

    #[test]
    fn test_include_depth() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("a.cfg", b"include b.cfg\n");
        fs.insert("b.cfg", b"label b\ninclude c.cfg\n");
        fs.insert("c.cfg", b"label c\n");

        let config = MenuCompiler::new(&mut fs).max_include_depth(1).compile(&["a.cfg"]);
        assert!(config.find_label("b").is_some());
        assert!(config.find_label("c").is_none());
    }
}
