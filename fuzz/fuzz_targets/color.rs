// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let (_, rest) = bootmenu_rs_core::menu::color::parse_argb_prefix(data);
    assert!(rest.len() <= data.len());
});
