// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

#![no_main]

use bootmenu_rs_core::{config::builder::MenuCompiler, system::fs::MemoryFileSystem};
use libfuzzer_sys::fuzz_target;

// the input is the primary file, and is also reachable as an include target so recursion gets exercised
fuzz_target!(|data: &[u8]| {
    let mut fs = MemoryFileSystem::new();
    fs.insert("syslinux.cfg", data).insert("self.cfg", data);
    let _ = MenuCompiler::new(&mut fs).compile(&[]);
});
