// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`MenuError`], which encapsulates the errors of the collaborator services.
//!
//! Compiling a configuration never fails. These errors only come from reading files, UEFI variables and
//! similar services, when they are used directly.

use thiserror::Error;

/// An `Error` resulting from a service used by the boot menu.
#[derive(Error, Debug)]
pub enum MenuError {
    /// An error with UEFI, or a service from the [`uefi`] crate.
    #[error("UEFI Error")]
    Uefi(#[from] uefi::Error),

    /// A `String` could not be converted into a `CString16`
    #[error("String Conversion Error")]
    StrError(#[from] crate::system::helper::StrError),

    /// An error occurred while reading a configuration file.
    #[error("Filesystem Error")]
    FsError(#[from] crate::system::fs::FsError),
}
