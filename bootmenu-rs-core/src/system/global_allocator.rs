// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Routes heap allocations of the menu tree to UEFI boot services pool memory.
//!
//! Behind the `global_allocator` feature, so that host builds (tests, the fuzzer) and applications with their
//! own allocator are left alone.

#![cfg(feature = "global_allocator")]
use uefi::allocator::Allocator;

/// The UEFI pool allocator.
#[global_allocator]
static POOL: Allocator = Allocator;
