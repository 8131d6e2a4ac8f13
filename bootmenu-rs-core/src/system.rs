// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The services the compiler and its frontends use from the outside world.

pub mod console;
pub mod fs;
pub mod helper;
pub mod log_backend;
pub mod variable;

mod global_allocator;
mod panic_handler;
