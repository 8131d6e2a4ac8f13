// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! String helpers for talking to UEFI services.

use alloc::string::String;
use thiserror::Error;
use uefi::CString16;

/// An `Error` that may result from converting a [`String`] to another format.
#[derive(Error, Debug)]
pub enum StrError {
    /// A [`String`] could not be converted into a [`CString16`]
    #[error("Could not convert String to CString16")]
    CstrFromStr(#[from] uefi::data_types::FromStrError),
}

/// Gets a [`CString16`] from an [`&str`].
///
/// # Errors
///
/// May return an `Error` if the string could not be converted into a [`CString16`], either due to unsupported
/// characters or an invalid nul character.
pub(crate) fn str_to_cstr(str: &str) -> Result<CString16, StrError> {
    Ok(CString16::try_from(str)?)
}

/// Normalizes a path to make it more aligned with UEFI expectations
///
/// Configuration files name their includes with forward slashes, UEFI wants backslashes.
#[must_use = "Has no effect if the result is unused"]
pub(crate) fn normalize_path(path: &str) -> String {
    path.replace('/', "\\")
}

/// Decodes a stored label, dropping any trailing nul characters.
#[must_use = "Has no effect if the result is unused"]
pub(crate) fn bytes_to_label(bytes: &[u8]) -> String {
    let end = bytes.iter().rposition(|&c| c != 0).map_or(0, |last| last + 1);
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use alloc::borrow::ToOwned;

    use super::*;

    #[test]
    fn test_str_to_cstr() -> Result<(), StrError> {
        let cstr = str_to_cstr("isolinux.cfg")?;
        let str = String::from(&cstr);
        assert_eq!(str, "isolinux.cfg".to_owned());
        Ok(())
    }

    #[test]
    fn test_normalize_path() {
        let path = "/boot/syslinux/menu.cfg";
        assert_eq!(normalize_path(path), "\\boot\\syslinux\\menu.cfg");
        let path = "\\a\\completely\\normal\\path";
        assert_eq!(normalize_path(path), path);
    }

    #[test]
    fn test_bytes_to_label() {
        assert_eq!(bytes_to_label(b"linux\0\0"), "linux");
        assert_eq!(bytes_to_label(b"linux"), "linux");
        assert_eq!(bytes_to_label(b"\0"), "");
        assert_eq!(bytes_to_label(b""), "");
    }
}
