// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Panic handler for firmware builds: report the panic, wait, then reboot.
//!
//! Behind the `panic_handler` feature, so that host builds (tests, the fuzzer) and applications with their
//! own handler are left alone.

#![cfg(feature = "panic_handler")]
use core::fmt::Write;

/// How long the panic message stays on screen, in microseconds.
const PANIC_STALL: usize = 5_000_000;

/// The panic handler.
#[panic_handler]
fn panic_handler(info: &core::panic::PanicInfo) -> ! {
    uefi::system::with_stdout(|stdout| {
        let _ = writeln!(stdout, "[PANIC] boot menu: {info}");
        let _ = writeln!(stdout, "Rebooting in {} seconds", PANIC_STALL / 1_000_000);
    });
    uefi::boot::stall(PANIC_STALL);
    uefi::runtime::reset(uefi::runtime::ResetType::COLD, uefi::Status::ABORTED, None);
}
