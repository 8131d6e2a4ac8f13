// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`MenuTree`], the compiled menu hierarchy.
//!
//! The tree is an arena: menus and entries are stored in creation order and refer to each other by
//! [`MenuId`] and [`EntryId`]. Every entry belongs to exactly one menu, and the arena's entry order doubles
//! as the global list used for label lookups.
//!
//! Two menus always exist. The root menu is the top level, and the hidden menu collects entries marked
//! `menu hide`, which can still be found by label but are never shown.

use alloc::{collections::BTreeMap, string::String, vec::Vec};
use core::time::Duration;

use crate::{
    menu::{
        color::ColorTable,
        layout::{FKEY_COUNT, FkeyHelp, LayoutParams, Messages},
    },
    refstr::{RefStr, StrPool},
};

pub mod color;
pub mod layout;

/// The label of the root menu.
pub const ROOT_MENU_LABEL: &str = ".top";

/// The label of the hidden menu.
pub const HIDDEN_MENU_LABEL: &str = ".hidden";

/// Refers to a [`Menu`] of a [`MenuTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MenuId(usize);

impl MenuId {
    /// Returns the creation index of the menu.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Refers to a [`MenuEntry`] of a [`MenuTree`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntryId(usize);

impl EntryId {
    /// Returns the creation index of the entry.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// What happens when an entry is chosen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MenuAction {
    /// Run the entry's command line.
    Cmd,

    /// Jump to a menu.
    Goto(MenuId),

    /// Jump to a menu that has not been looked up yet.
    GotoUnresolved(RefStr),

    /// Leave the current menu for another one.
    Exit(MenuId),

    /// Leave the current menu for one that has not been looked up yet.
    ExitUnresolved(RefStr),

    /// Leave the menu system.
    Quit,

    /// Open a submenu.
    Submenu(MenuId),

    /// Not selectable.
    Disabled,
}

impl MenuAction {
    /// Returns the menu this action leads to, if any.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn target(&self) -> Option<MenuId> {
        match self {
            Self::Goto(menu) | Self::Exit(menu) | Self::Submenu(menu) => Some(*menu),
            _ => None,
        }
    }

    /// Checks if the action still needs its target looked up.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn is_unresolved(&self) -> bool {
        matches!(self, Self::GotoUnresolved(_) | Self::ExitUnresolved(_))
    }
}

/// A row of a [`Menu`].
#[derive(Clone, Debug)]
pub struct MenuEntry {
    /// The menu the entry belongs to.
    pub menu: MenuId,

    /// The position of the entry in its menu.
    pub index: usize,

    /// The text displayed for the entry. A `^` marks the hotkey.
    pub display_name: Option<RefStr>,

    /// The label the entry is looked up by.
    pub label: Option<RefStr>,

    /// The password required to choose the entry.
    pub passwd: Option<RefStr>,

    /// Raw help text shown while the entry is selected.
    pub help_text: Option<String>,

    /// The hotkey registered for the entry.
    pub hotkey: Option<u8>,

    /// What happens when the entry is chosen.
    pub action: MenuAction,

    /// The command line run by a [`MenuAction::Cmd`] entry.
    pub cmdline: Option<RefStr>,

    /// Whether choosing the entry saves its label as the next default.
    pub save: bool,
}

/// A node of the menu tree.
#[derive(Clone, Debug)]
pub struct Menu {
    /// The label `goto` and `exit` look the menu up by.
    pub label: Option<RefStr>,

    /// The title drawn above the entries.
    pub title: RefStr,

    /// The entries of the menu, in display order.
    pub entries: Vec<EntryId>,

    /// Hotkeys of the menu. The first entry to claim a key keeps it.
    pub hotkeys: BTreeMap<u8, EntryId>,

    /// The colour table.
    pub colors: ColorTable,

    /// The prompt strings.
    pub messages: Messages,

    /// The layout parameters.
    pub params: LayoutParams,

    /// Help for each function key.
    pub fkey_help: [FkeyHelp; FKEY_COUNT],

    /// Command run when the timeout expires.
    pub on_timeout: Option<RefStr>,

    /// Command run when booting an entry fails.
    pub on_error: Option<RefStr>,

    /// Password that unlocks every entry.
    pub master_passwd: Option<RefStr>,

    /// Background image.
    pub background: Option<RefStr>,

    /// The index of the default entry.
    pub default_entry: usize,

    /// The index of the selected entry.
    pub current_entry: usize,

    /// Whether the command line may be edited.
    pub allow_edit: bool,

    /// Whether entries save their label as the next default unless they say otherwise.
    pub save: bool,

    /// Time before the default entry is booted. Zero waits forever.
    pub timeout: Duration,

    /// The menu this menu was opened from.
    pub parent: Option<MenuId>,

    /// The entry of the parent that opens this menu.
    pub parent_entry: Option<EntryId>,
}

impl Menu {
    /// Creates a top level menu out of the built in defaults.
    fn with_defaults(label: RefStr, pool: &StrPool) -> Self {
        Self {
            label: Some(label),
            title: pool.empty(),
            entries: Vec::new(),
            hotkeys: BTreeMap::new(),
            colors: ColorTable::default(),
            messages: Messages::default(),
            params: LayoutParams::default(),
            fkey_help: Default::default(),
            on_timeout: None,
            on_error: None,
            master_passwd: None,
            background: None,
            default_entry: 0,
            current_entry: 0,
            allow_edit: true,
            save: false,
            timeout: Duration::ZERO,
            parent: None,
            parent_entry: None,
        }
    }

    /// Creates a submenu that starts out as a snapshot of `parent`.
    ///
    /// The snapshot shares its strings with the parent, but later changes on either side are not seen
    /// by the other.
    fn snapshot_of(
        parent: &Self,
        parent_id: MenuId,
        parent_entry: EntryId,
        label: Option<RefStr>,
        pool: &StrPool,
    ) -> Self {
        Self {
            label,
            title: pool.empty(),
            entries: Vec::new(),
            hotkeys: BTreeMap::new(),
            colors: parent.colors.clone(),
            messages: parent.messages.clone(),
            params: parent.params,
            fkey_help: parent.fkey_help.clone(),
            on_timeout: parent.on_timeout.clone(),
            on_error: parent.on_error.clone(),
            master_passwd: parent.master_passwd.clone(),
            background: parent.background.clone(),
            default_entry: 0,
            current_entry: 0,
            allow_edit: parent.allow_edit,
            save: parent.save,
            timeout: parent.timeout,
            parent: Some(parent_id),
            parent_entry: Some(parent_entry),
        }
    }
}

/// The compiled menu hierarchy.
#[derive(Clone, Debug)]
pub struct MenuTree {
    /// Every menu, in creation order.
    menus: Vec<Menu>,

    /// Every entry, in creation order.
    entries: Vec<MenuEntry>,

    /// The top level menu.
    root: MenuId,

    /// The menu holding hidden entries.
    hidden: MenuId,
}

impl MenuTree {
    /// Creates a tree holding only the hidden and root menus.
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(pool: &StrPool) -> Self {
        let mut tree = Self {
            menus: Vec::with_capacity(4),
            entries: Vec::with_capacity(16),
            root: MenuId(0),
            hidden: MenuId(0),
        };
        tree.hidden = tree.push_menu(Menu::with_defaults(RefStr::new(HIDDEN_MENU_LABEL), pool));
        tree.root = tree.push_menu(Menu::with_defaults(RefStr::new(ROOT_MENU_LABEL), pool));
        tree
    }

    /// Returns the top level menu.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn root(&self) -> MenuId {
        self.root
    }

    /// Returns the menu holding hidden entries.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn hidden(&self) -> MenuId {
        self.hidden
    }

    /// Gets a menu.
    #[must_use = "Has no effect if the result is unused"]
    pub fn menu(&self, id: MenuId) -> &Menu {
        &self.menus[id.0]
    }

    /// Gets a mutable menu.
    pub fn menu_mut(&mut self, id: MenuId) -> &mut Menu {
        &mut self.menus[id.0]
    }

    /// Gets an entry.
    #[must_use = "Has no effect if the result is unused"]
    pub fn entry(&self, id: EntryId) -> &MenuEntry {
        &self.entries[id.0]
    }

    /// Gets a mutable entry.
    pub fn entry_mut(&mut self, id: EntryId) -> &mut MenuEntry {
        &mut self.entries[id.0]
    }

    /// Returns every menu in creation order.
    pub fn menus(&self) -> impl DoubleEndedIterator<Item = (MenuId, &Menu)> {
        self.menus.iter().enumerate().map(|(i, m)| (MenuId(i), m))
    }

    /// Returns every entry in creation order, hidden or not.
    pub fn entries(&self) -> impl Iterator<Item = (EntryId, &MenuEntry)> {
        self.entries.iter().enumerate().map(|(i, e)| (EntryId(i), e))
    }

    /// Returns the entries of a menu in display order.
    pub fn menu_entries(&self, id: MenuId) -> impl Iterator<Item = &MenuEntry> {
        self.menu(id).entries.iter().map(|&e| self.entry(e))
    }

    /// Returns the amount of menus.
    #[must_use = "Has no effect if the result is unused"]
    pub fn menu_count(&self) -> usize {
        self.menus.len()
    }

    /// Returns the amount of entries.
    #[must_use = "Has no effect if the result is unused"]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Finds a menu by its label.
    ///
    /// The most recently created menu with that label wins.
    #[must_use = "Has no effect if the result is unused"]
    pub fn find_menu(&self, label: &str) -> Option<MenuId> {
        self.menus()
            .rev()
            .find(|(_, m)| m.label.as_deref() == Some(label))
            .map(|(id, _)| id)
    }

    /// Finds the first created entry whose label is the first word of `text`.
    ///
    /// Anything after the first whitespace of `text` (such as extra options) is ignored.
    #[must_use = "Has no effect if the result is unused"]
    pub fn find_label(&self, text: &str) -> Option<EntryId> {
        let word = &text[..first_word_len(text)];
        self.entries()
            .find(|(_, e)| e.label.as_deref() == Some(word))
            .map(|(id, _)| id)
    }

    /// Allocates a submenu of `parent`, opened by `parent_entry`.
    ///
    /// The opening entry becomes a [`MenuAction::Submenu`] entry pointing at the new menu.
    pub(crate) fn new_menu(
        &mut self,
        parent: MenuId,
        parent_entry: EntryId,
        label: Option<RefStr>,
        pool: &StrPool,
    ) -> MenuId {
        let menu = Menu::snapshot_of(self.menu(parent), parent, parent_entry, label, pool);
        let id = self.push_menu(menu);
        self.entry_mut(parent_entry).action = MenuAction::Submenu(id);
        id
    }

    /// Appends a blank entry to a menu and to the global entry list.
    pub(crate) fn new_entry(&mut self, menu: MenuId, action: MenuAction) -> EntryId {
        let id = EntryId(self.entries.len());
        let entries = &mut self.menu_mut(menu).entries;
        let index = entries.len();
        entries.push(id);

        self.entries.push(MenuEntry {
            menu,
            index,
            display_name: None,
            label: None,
            passwd: None,
            help_text: None,
            hotkey: None,
            action,
            cmdline: None,
            save: false,
        });
        id
    }

    /// Opens a submenu of `current` whose opening entry displays `tag`.
    ///
    /// The new menu's label is the same string as the entry's display name. An empty tag leaves both
    /// absent.
    pub(crate) fn begin_submenu(&mut self, current: MenuId, tag: &[u8], pool: &StrPool) -> MenuId {
        let entry = self.new_entry(current, MenuAction::Disabled);
        let name = (!tag.is_empty()).then(|| RefStr::from_bytes(tag));
        self.entry_mut(entry).display_name.clone_from(&name);
        self.new_menu(current, entry, name, pool)
    }

    /// Returns the menu to continue with after a submenu ends.
    ///
    /// Ending the root menu keeps the root menu.
    #[must_use = "Has no effect if the result is unused"]
    pub(crate) fn end_submenu(&self, current: MenuId) -> MenuId {
        self.menu(current).parent.unwrap_or(current)
    }

    /// Registers the hotkey marked in an entry's display name, unless the entry is disabled or another
    /// entry of `menu` already holds that key.
    pub(crate) fn consider_for_hotkey(&mut self, menu: MenuId, entry: EntryId) {
        let me = self.entry(entry);
        if me.action == MenuAction::Disabled {
            return;
        }

        let Some(hotkey) = me
            .display_name
            .as_deref()
            .and_then(|name| name.split_once('^'))
            .and_then(|(_, rest)| rest.bytes().next())
            .map(|key| key & !0x20)
        else {
            return;
        };

        if let alloc::collections::btree_map::Entry::Vacant(slot) =
            self.menu_mut(menu).hotkeys.entry(hotkey)
        {
            slot.insert(entry);
            self.entry_mut(entry).hotkey = Some(hotkey);
        }
    }

    /// Adds a menu to the arena.
    fn push_menu(&mut self, menu: Menu) -> MenuId {
        let id = MenuId(self.menus.len());
        self.menus.push(menu);
        id
    }
}

/// Returns the byte length of the first word of `text`, where any control character or space ends a word.
pub(crate) fn first_word_len(text: &str) -> usize {
    text.bytes().position(|c| c <= b' ').unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::layout::{LayoutParam, MessageKind};

    #[test]
    fn test_new_tree() {
        let pool = StrPool::new();
        let tree = MenuTree::new(&pool);
        assert_eq!(tree.menu_count(), 2);
        assert_eq!(tree.find_menu(ROOT_MENU_LABEL), Some(tree.root()));
        assert_eq!(tree.find_menu(HIDDEN_MENU_LABEL), Some(tree.hidden()));
        assert!(tree.menu(tree.root()).allow_edit);
        assert!(tree.menu(tree.root()).title.is_empty());
    }

    #[test]
    fn test_submenu_snapshot() {
        let pool = StrPool::new();
        let mut tree = MenuTree::new(&pool);
        let root = tree.root();
        tree.menu_mut(root).master_passwd = Some(RefStr::new("secret"));
        tree.menu_mut(root).params[LayoutParam::Rows] = 5;
        tree.menu_mut(root).on_timeout = Some(RefStr::new("linux"));
        tree.menu_mut(root).on_error = Some(RefStr::new("rescue"));

        let sub = tree.begin_submenu(root, b"Tools", &pool);
        let shared = tree.menu(sub).master_passwd.clone().expect("copied from parent");
        assert!(RefStr::ptr_eq(
            &shared,
            tree.menu(root).master_passwd.as_ref().expect("set above")
        ));

        // changes after the child exists do not propagate
        tree.menu_mut(root).params[LayoutParam::Rows] = 9;
        tree.menu_mut(root).messages[MessageKind::Tab] = RefStr::new("changed");
        assert_eq!(tree.menu(sub).params[LayoutParam::Rows], 5);
        assert_eq!(
            tree.menu(sub).messages[MessageKind::Tab].as_str(),
            "Press [Tab] to edit options"
        );

        let parent = tree.menu_mut(root);
        parent.colors.slots_mut()[0].argb_fg = 0x1234_5678;
        parent.timeout = Duration::from_secs(5);
        parent.fkey_help[0].textname = Some(RefStr::new("f1.txt"));
        parent.on_timeout = Some(RefStr::new("memtest"));
        parent.on_error = Some(RefStr::new("halt"));

        let child = tree.menu(sub);
        assert_eq!(child.colors, ColorTable::default());
        assert_eq!(child.timeout, Duration::ZERO);
        assert!(child.fkey_help[0].textname.is_none());
        assert_eq!(child.on_timeout.as_deref(), Some("linux"));
        assert_eq!(child.on_error.as_deref(), Some("rescue"));
    }

    #[test]
    fn test_begin_and_end_submenu() {
        let pool = StrPool::new();
        let mut tree = MenuTree::new(&pool);
        let root = tree.root();
        let sub = tree.begin_submenu(root, b"Tools", &pool);

        let opener = tree.menu(sub).parent_entry.expect("submenus have an opener");
        assert_eq!(tree.entry(opener).action, MenuAction::Submenu(sub));
        assert!(RefStr::opt_ptr_eq(
            tree.entry(opener).display_name.as_ref(),
            tree.menu(sub).label.as_ref()
        ));
        assert_eq!(tree.end_submenu(sub), root);
        assert_eq!(tree.end_submenu(root), root);
    }

    #[test]
    fn test_hotkey_first_claim_wins() {
        let pool = StrPool::new();
        let mut tree = MenuTree::new(&pool);
        let root = tree.root();

        let add = |tree: &mut MenuTree, name: &str| {
            let e = tree.new_entry(root, MenuAction::Cmd);
            tree.entry_mut(e).display_name = Some(RefStr::new(name));
            tree.consider_for_hotkey(root, e);
            e
        };

        let boot = add(&mut tree, "^Boot");
        let again = add(&mut tree, "Boot ^again");
        let more = add(&mut tree, "^Boot Once More");

        assert_eq!(tree.entry(boot).hotkey, Some(b'B'));
        assert_eq!(tree.entry(again).hotkey, Some(b'A'));
        assert_eq!(tree.entry(more).hotkey, None);
        assert_eq!(tree.menu(root).hotkeys.get(&b'B'), Some(&boot));
    }

    #[test]
    fn test_find_label_first_word() {
        let pool = StrPool::new();
        let mut tree = MenuTree::new(&pool);
        let root = tree.root();
        let first = tree.new_entry(root, MenuAction::Cmd);
        tree.entry_mut(first).label = Some(RefStr::new("linux"));
        let second = tree.new_entry(root, MenuAction::Cmd);
        tree.entry_mut(second).label = Some(RefStr::new("linux"));

        assert_eq!(tree.find_label("linux single"), Some(first));
        assert_eq!(tree.find_label("lin"), None);
        assert_eq!(tree.find_label("linux2"), None);
    }
}
