// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`RefStr`], the immutable shared string every text field of the menu tree holds.
//!
//! A [`RefStr`] is created once and then only cloned or dropped. Cloning hands out another owner of the
//! same storage, and the storage is freed when the last owner goes away. Submenus take snapshots of
//! their parent's strings by cloning, so a snapshot shares storage with its parent until either side
//! replaces the field.

use alloc::{borrow::Cow, rc::Rc, string::String};
use core::{fmt, ops::Deref};

/// An immutable, reference counted string.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefStr(Rc<str>);

impl RefStr {
    /// Creates a new [`RefStr`] with a single owner.
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(text: &str) -> Self {
        Self(Rc::from(text))
    }

    /// Creates a new [`RefStr`] from raw configuration bytes.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    #[must_use = "Has no effect if the result is unused"]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match String::from_utf8_lossy(bytes) {
            Cow::Borrowed(text) => Self::new(text),
            Cow::Owned(text) => Self::from(text),
        }
    }

    /// Returns the text as an [`&str`].
    #[must_use = "Has no effect if the result is unused"]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns how many owners currently share this string's storage.
    #[must_use = "Has no effect if the result is unused"]
    pub fn ref_count(this: &Self) -> usize {
        Rc::strong_count(&this.0)
    }

    /// Checks if two strings are the very same storage, not just equal text.
    #[must_use = "Has no effect if the result is unused"]
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        Rc::ptr_eq(&this.0, &other.0)
    }

    /// Same as [`Self::ptr_eq`], treating two absent strings as the same.
    #[must_use = "Has no effect if the result is unused"]
    pub fn opt_ptr_eq(this: Option<&Self>, other: Option<&Self>) -> bool {
        match (this, other) {
            (Some(this), Some(other)) => Self::ptr_eq(this, other),
            (None, None) => true,
            _ => false,
        }
    }

    /// Returns the string with every `^` hotkey marker removed.
    ///
    /// If there is no marker, another owner of the same storage is returned instead of a copy.
    #[must_use = "Has no effect if the result is unused"]
    pub fn strip_caret(&self) -> Self {
        if self.contains('^') {
            Self::from(self.replace('^', ""))
        } else {
            self.clone()
        }
    }
}

impl Deref for RefStr {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<str> for RefStr {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RefStr {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for RefStr {
    fn from(value: String) -> Self {
        Self(Rc::from(value))
    }
}

impl fmt::Display for RefStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for RefStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

/// Owner of the shared empty string.
///
/// One pool lives for the duration of a compilation, and every "empty but present" field is a clone of
/// its string rather than a fresh allocation.
pub struct StrPool {
    /// The shared empty string.
    empty: RefStr,
}

impl StrPool {
    /// Creates a new [`StrPool`].
    #[must_use = "Has no effect if the result is unused"]
    pub fn new() -> Self {
        Self {
            empty: RefStr::new(""),
        }
    }

    /// Returns another owner of the shared empty string.
    #[must_use = "Has no effect if the result is unused"]
    pub fn empty(&self) -> RefStr {
        self.empty.clone()
    }
}

impl Default for StrPool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_storage() {
        let a = RefStr::new("vmlinuz");
        let weak = Rc::downgrade(&a.0);
        let b = a.clone();
        assert_eq!(RefStr::ref_count(&a), 2);
        assert!(RefStr::ptr_eq(&a, &b));

        drop(a);
        assert_eq!(weak.strong_count(), 1); // b still holds the storage
        assert_eq!(b.as_str(), "vmlinuz");

        drop(b);
        assert!(weak.upgrade().is_none()); // freed once the last owner went away
    }

    #[test]
    fn test_equal_text_is_not_same_storage() {
        let a = RefStr::new("linux");
        let b = RefStr::new("linux");
        assert_eq!(a, b);
        assert!(!RefStr::ptr_eq(&a, &b));
        assert!(RefStr::opt_ptr_eq(None, None));
        assert!(!RefStr::opt_ptr_eq(Some(&a), None));
    }

    #[test]
    fn test_pool_empty_is_shared() {
        let pool = StrPool::new();
        let a = pool.empty();
        let b = pool.empty();
        assert!(RefStr::ptr_eq(&a, &b));
        assert_eq!(RefStr::ref_count(&a), 3);
        assert!(a.is_empty());
    }

    #[test]
    fn test_strip_caret() {
        let plain = RefStr::new("Boot");
        assert!(RefStr::ptr_eq(&plain.strip_caret(), &plain));

        let marked = RefStr::new("^Boot ^Again");
        assert_eq!(marked.strip_caret().as_str(), "Boot Again");
    }

    #[test]
    fn test_from_bytes_lossy() {
        let text = RefStr::from_bytes(b"abc\xffdef");
        assert_eq!(text.as_str(), "abc\u{fffd}def");
    }
}
