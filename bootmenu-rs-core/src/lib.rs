// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The `bootmenu-rs` library crate.
//!
//! This compiles directive-based boot menu configuration files (`extlinux.conf`, `isolinux.cfg`,
//! `syslinux.cfg` and whatever they include) into a navigable [`menu::MenuTree`]. A presentation layer
//! draws the tree, and a boot layer runs the command line of whatever entry gets chosen; neither is part of
//! this crate.
//!
//! Compiling is permissive: unknown directives are ignored, malformed numbers read as zero, and labels that
//! cannot be found leave entries disabled. What was skipped is reported through the [`log`] crate.
//!
//! ```
//! use bootmenu_rs_core::{config::builder::MenuCompiler, system::fs::MemoryFileSystem};
//!
//! let mut fs = MemoryFileSystem::new();
//! fs.insert("syslinux.cfg", b"default linux\nlabel linux\n  kernel vmlinuz\n  append quiet\n");
//!
//! let config = MenuCompiler::new(&mut fs).compile(&["syslinux.cfg"]);
//! let entry = config.find_label("linux").expect("linux is defined");
//! assert_eq!(entry.cmdline.as_deref(), Some("vmlinuz quiet"));
//! ```
//!
//! ## MSRV
//!
//! The minimum supported rust version is 1.88.0.

#![cfg_attr(not(any(fuzzing, test, doctest)), no_std)]

/// The primary result type that wraps around [`crate::error::MenuError`].
pub type MenuResult<T> = Result<T, crate::error::MenuError>;

pub mod config;
pub mod error;
pub mod menu;
pub mod refstr;
pub mod system;

extern crate alloc;
