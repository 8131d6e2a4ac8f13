// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Persisted default label storage.
//!
//! When a configuration uses `menu save`, the label of the last booted entry is kept across boots and
//! becomes the default of the next compile. On firmware it lives in a UEFI variable in a custom vendor
//! namespace.

use alloc::string::String;
use log::warn;
use uefi::{
    CStr16, Status, cstr16, guid,
    runtime::{self, VariableAttributes, VariableVendor},
};

use crate::{
    MenuResult,
    error::MenuError,
    system::helper::bytes_to_label,
};

/// The custom variable namespace for the boot menu.
const BOOTMENU_GUID: uefi::Guid = guid!("5d0c6a51-7b8e-4f0a-9a43-2c1e7f3b9d64");

/// The name of the variable holding the saved label.
const MENU_SAVE: &CStr16 = cstr16!("MenuSave");

/// A read-only store of the label saved by a previous boot.
pub trait SavedDefault {
    /// Returns the saved label, if there is one.
    fn saved_label(&mut self) -> Option<String>;
}

/// A [`SavedDefault`] backed by the `MenuSave` UEFI variable.
///
/// This namespace is accessible at GUID `5d0c6a51-7b8e-4f0a-9a43-2c1e7f3b9d64`.
#[derive(Clone, Copy, Debug, Default)]
pub struct UefiVariableStore;

impl UefiVariableStore {
    /// Constructs a new [`UefiVariableStore`].
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new() -> Self {
        Self
    }

    /// Reads the saved label.
    ///
    /// A variable that does not exist is not an error and yields [`None`].
    ///
    /// # Errors
    ///
    /// May return an `Error` for many reasons, see [`runtime::get_variable_boxed`]
    pub fn load_label(&self) -> MenuResult<Option<String>> {
        match runtime::get_variable_boxed(MENU_SAVE, &VariableVendor(BOOTMENU_GUID)) {
            Ok((bytes, _)) => Ok(Some(bytes_to_label(&bytes)).filter(|label| !label.is_empty())),
            Err(e) if e.status() == Status::NOT_FOUND => Ok(None),
            Err(e) => Err(MenuError::Uefi(e.to_err_without_payload())),
        }
    }

    /// Saves a label for the next boot. An empty label deletes the variable.
    ///
    /// # Errors
    ///
    /// May return an `Error` for many reasons, see [`runtime::set_variable`]
    pub fn store_label(&mut self, label: &str) -> MenuResult<()> {
        let attrs = VariableAttributes::NON_VOLATILE
            | VariableAttributes::BOOTSERVICE_ACCESS
            | VariableAttributes::RUNTIME_ACCESS;
        Ok(runtime::set_variable(
            MENU_SAVE,
            &VariableVendor(BOOTMENU_GUID),
            attrs,
            label.as_bytes(),
        )?)
    }
}

impl SavedDefault for UefiVariableStore {
    fn saved_label(&mut self) -> Option<String> {
        self.load_label().unwrap_or_else(|e| {
            warn!("Could not read the saved default: {e}");
            None
        })
    }
}

/// A [`SavedDefault`] that always returns the same label.
#[derive(Clone, Debug, Default)]
pub struct FixedSavedDefault(pub Option<String>);

impl SavedDefault for FixedSavedDefault {
    fn saved_label(&mut self) -> Option<String> {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use alloc::borrow::ToOwned;

    use super::*;

    #[test]
    fn test_fixed_saved_default() {
        let mut saved = FixedSavedDefault(Some("linux".to_owned()));
        assert_eq!(saved.saved_label().as_deref(), Some("linux"));
        assert_eq!(FixedSavedDefault(None).saved_label(), None);
    }
}
