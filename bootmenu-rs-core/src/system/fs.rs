// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Where configuration files come from.
//!
//! The compiler reads every file through [`ConfigSource`]. On firmware this is [`UefiFileSystem`], which wraps
//! the UEFI [`SimpleFileSystem`] protocol. [`MemoryFileSystem`] keeps files in memory, for tests, fuzzing and
//! frontends that already hold the configuration text.
//!
//! These filesystem helpers are guaranteed to support FAT filesystems, as mandated by the UEFI specification.
//! Other filesystems work as long as the firmware or a loaded driver provides [`SimpleFileSystem`] for them.

use alloc::{
    collections::btree_map::BTreeMap,
    string::{String, ToString},
    vec,
    vec::Vec,
};
use thiserror::Error;
use uefi::{
    CStr16, Handle, Status,
    boot::{self, ScopedProtocol},
    proto::media::{
        file::{File, FileAttribute, FileInfo, FileMode, RegularFile},
        fs::SimpleFileSystem,
    },
};

use crate::{
    MenuResult,
    system::helper::{StrError, normalize_path, str_to_cstr},
};

/// The largest file that will be read. Configuration files are far smaller than this.
pub(crate) const ONE_GIGABYTE: usize = 1024 * 1024 * 1024;

/// An error that may result from reading a configuration file.
#[derive(Error, Debug)]
pub enum FsError {
    /// A file could not be opened.
    #[error("Failed to open file")]
    OpenErr(Status),

    /// A file could not be read.
    #[error("Failed to read file")]
    ReadErr(Status),

    /// The file does not exist.
    #[error("File \"{0}\" not found")]
    NotFound(String),

    /// The path could not be converted into a UEFI path.
    #[error("Invalid path")]
    InvalidPath(#[from] StrError),
}

/// A provider of configuration file contents.
pub trait ConfigSource {
    /// Reads the entire content of the file at `path`.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the file does not exist or could not be read.
    fn read(&mut self, path: &str) -> Result<Vec<u8>, FsError>;
}

/// A rust-ier wrapper around [`SimpleFileSystem`].
///
/// This is similar to [`uefi::fs::FileSystem`], with different design decisions.
pub struct UefiFileSystem(ScopedProtocol<SimpleFileSystem>);

impl UefiFileSystem {
    /// Create a new [`UefiFileSystem`].
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new(fs: ScopedProtocol<SimpleFileSystem>) -> Self {
        Self(fs)
    }

    /// Create a new [`UefiFileSystem`] from a handle that supports [`SimpleFileSystem`].
    ///
    /// # Errors
    ///
    /// May return an `Error` if the handle does not actually support [`SimpleFileSystem`].
    pub fn from_handle(handle: Handle) -> MenuResult<Self> {
        let fs = boot::open_protocol_exclusive(handle)?;
        Ok(Self(fs))
    }

    /// Create a new [`UefiFileSystem`] from the same filesystem as the running image.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the image's filesystem does not support [`SimpleFileSystem`] for some reason.
    pub fn from_image_fs() -> MenuResult<Self> {
        let fs = boot::get_image_file_system(boot::image_handle())?;
        Ok(Self(fs))
    }

    /// Reads the entire content of a file into a [`Vec<u8>`].
    ///
    /// # Errors
    ///
    /// May return an `Error` if the volume couldn't be opened, the path does not point to a valid file, or
    /// the file could not be read for any reason.
    pub fn read_cstr(&mut self, path: &CStr16) -> Result<Vec<u8>, FsError> {
        let mut file = self.get_regular_file(path)?;

        let info = file
            .get_boxed_info::<FileInfo>()
            .map_err(|e| FsError::ReadErr(e.status()))?;

        let size = usize::try_from(info.file_size()).map_or(ONE_GIGABYTE, |s| s.min(ONE_GIGABYTE));

        let mut buf = vec![0; size];
        let read = file
            .read(&mut buf)
            .map_err(|e| FsError::ReadErr(e.status()))?;
        buf.truncate(read);

        Ok(buf)
    }

    /// Gets a handle to a [`RegularFile`] in the filesystem.
    ///
    /// # Errors
    ///
    /// May return an `Error` if the volume couldn't be opened, or the path does not point to a file.
    fn get_regular_file(&mut self, path: &CStr16) -> Result<RegularFile, FsError> {
        let mut root = self
            .0
            .open_volume()
            .map_err(|e| FsError::OpenErr(e.status()))?;
        root.open(path, FileMode::Read, FileAttribute::empty())
            .map_err(|e| FsError::OpenErr(e.status()))?
            .into_regular_file()
            .ok_or(FsError::OpenErr(Status::INVALID_PARAMETER))
    }
}

impl ConfigSource for UefiFileSystem {
    fn read(&mut self, path: &str) -> Result<Vec<u8>, FsError> {
        let path = str_to_cstr(&normalize_path(path))?;
        self.read_cstr(&path)
    }
}

/// A [`ConfigSource`] that holds its files in memory.
///
/// Every read is remembered, so the order in which names were tried can be checked.
#[derive(Clone, Debug, Default)]
pub struct MemoryFileSystem {
    /// File contents by path.
    files: BTreeMap<String, Vec<u8>>,

    /// Every path that was read, in order.
    attempts: Vec<String>,
}

impl MemoryFileSystem {
    /// Creates an empty [`MemoryFileSystem`].
    #[must_use = "Has no effect if the result is unused"]
    pub const fn new() -> Self {
        Self {
            files: BTreeMap::new(),
            attempts: Vec::new(),
        }
    }

    /// Adds or replaces a file.
    pub fn insert(&mut self, path: &str, contents: &[u8]) -> &mut Self {
        self.files.insert(path.to_string(), contents.to_vec());
        self
    }

    /// Returns every path that was read so far, whether it existed or not.
    #[must_use = "Has no effect if the result is unused"]
    pub fn attempts(&self) -> &[String] {
        &self.attempts
    }
}

impl ConfigSource for MemoryFileSystem {
    fn read(&mut self, path: &str) -> Result<Vec<u8>, FsError> {
        self.attempts.push(path.to_string());
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fs() {
        let mut fs = MemoryFileSystem::new();
        fs.insert("a.cfg", b"label a\n");

        assert_eq!(fs.read("a.cfg").expect("inserted above"), b"label a\n");
        assert!(matches!(fs.read("b.cfg"), Err(FsError::NotFound(name)) if name == "b.cfg"));
        assert_eq!(fs.attempts(), ["a.cfg", "b.cfg"]);
    }
}
