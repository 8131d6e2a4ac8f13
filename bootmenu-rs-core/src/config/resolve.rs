// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The pass that runs once every file has been parsed.

use alloc::{string::String, vec::Vec};

use log::debug;

use crate::{
    config::MenuConfig,
    menu::{MenuAction, MenuId, first_word_len},
    refstr::RefStr,
    system::variable::SavedDefault,
};

impl MenuConfig {
    /// Resolves what the parser could not know yet.
    ///
    /// In order: `goto` and `exit` targets are looked up, the global default and then the saved default pick
    /// the default entry and starting menu, every menu's selection moves to its default, and labels leading
    /// the on-timeout and on-error commands are expanded.
    pub(crate) fn resolve(&mut self, saved: Option<&mut dyn SavedDefault>) {
        self.resolve_targets();
        self.apply_global_default();
        if self.menu_save {
            self.apply_saved_default(saved);
        }

        let menus: Vec<MenuId> = self.tree.menus().map(|(id, _)| id).collect();
        for id in menus {
            let menu = self.tree.menu_mut(id);
            menu.current_entry = menu.default_entry;

            let on_timeout = menu.on_timeout.take();
            let on_error = menu.on_error.take();
            let on_timeout = on_timeout.map(|cmd| self.unlabel(cmd));
            let on_error = on_error.map(|cmd| self.unlabel(cmd));

            let menu = self.tree.menu_mut(id);
            menu.on_timeout = on_timeout;
            menu.on_error = on_error;
        }
    }

    /// Converts every unresolved `goto` or `exit` into its resolved form, or disables it.
    fn resolve_targets(&mut self) {
        let pending: Vec<_> = self
            .tree
            .entries()
            .filter(|(_, entry)| entry.action.is_unresolved())
            .map(|(id, _)| id)
            .collect();

        for id in pending {
            let action = match &self.tree.entry(id).action {
                MenuAction::GotoUnresolved(target) => self.find_target(target).map(MenuAction::Goto),
                MenuAction::ExitUnresolved(target) => self.find_target(target).map(MenuAction::Exit),
                _ => continue,
            };

            let entry = self.tree.entry_mut(id);
            entry.action = action.unwrap_or_else(|| {
                debug!(
                    "Disabling entry {}: its target cannot be found",
                    entry.label.as_deref().unwrap_or_default()
                );
                MenuAction::Disabled
            });
        }
    }

    /// Looks up the menu a `goto` or `exit` leads to.
    ///
    /// Menu labels are tried first, most recently created menu first. Failing that, an entry label leads
    /// to the menu that holds the entry. The hidden menu is never a target.
    fn find_target(&self, target: &str) -> Option<MenuId> {
        self.tree
            .find_menu(target)
            .or_else(|| self.tree.find_label(target).map(|id| self.tree.entry(id).menu))
            .filter(|&menu| menu != self.tree.hidden())
    }

    /// Makes the entry named by the last `default` directive the default of its menu, and that menu the
    /// starting menu.
    fn apply_global_default(&mut self) {
        let Some(target) = self.global_default.clone() else {
            return;
        };

        if !self.select_default(&target) {
            debug!("Default {target} does not name a visible entry");
            return;
        }
        self.default_menu = Some(self.start_menu);
    }

    /// Makes the label saved by a previous boot the default, overriding the global default.
    fn apply_saved_default(&mut self, saved: Option<&mut dyn SavedDefault>) {
        let Some(label) = saved.and_then(|saved| saved.saved_label()) else {
            return;
        };

        if label.is_empty() || !self.select_default(&label) {
            debug!("Saved default {label} does not name a visible entry");
        }
    }

    /// Makes the entry labelled `target` the default of its menu and starts there.
    ///
    /// Hidden entries are never selected. Returns whether an entry was found.
    fn select_default(&mut self, target: &str) -> bool {
        let Some(id) = self.tree.find_label(target) else {
            return false;
        };

        let entry = self.tree.entry(id);
        let (menu, index) = (entry.menu, entry.index);
        if menu == self.tree.hidden() {
            return false;
        }

        self.tree.menu_mut(menu).default_entry = index;
        self.start_menu = menu;
        true
    }

    /// Replaces a leading label in a command with that label's command line, keeping the rest.
    fn unlabel(&self, cmd: RefStr) -> RefStr {
        let Some(id) = self.tree.find_label(&cmd) else {
            return cmd;
        };
        let Some(line) = self.tree.entry(id).cmdline.as_ref() else {
            return cmd;
        };

        let rest = &cmd[first_word_len(&cmd)..];
        let mut expanded = String::with_capacity(line.len() + rest.len());
        expanded.push_str(line);
        expanded.push_str(rest);
        RefStr::from(expanded)
    }
}

#[cfg(test)]
mod tests {
    use alloc::borrow::ToOwned;
    use core::time::Duration;

    use super::*;
    use crate::{
        config::builder::MenuCompiler,
        system::{fs::MemoryFileSystem, variable::FixedSavedDefault},
    };

    fn compile(text: &str) -> MenuConfig {
        compile_saved(text, None)
    }

    fn compile_saved(text: &str, saved: Option<&str>) -> MenuConfig {
        let mut fs = MemoryFileSystem::new();
        fs.insert("syslinux.cfg", text.as_bytes());
        let mut saved = FixedSavedDefault(saved.map(ToOwned::to_owned));
        MenuCompiler::new(&mut fs)
            .saved_default(&mut saved)
            .compile(&["syslinux.cfg"])
    }

    #[test]
    fn test_goto_label_resolves_to_its_menu() {
        let config = compile("label A\nkernel vmlinuz\nlabel B\nkernel other\nmenu goto A\n");
        let root = config.tree.root();
        let actions: Vec<_> = config.tree.menu_entries(root).map(|e| e.action.clone()).collect();
        assert_eq!(actions, [MenuAction::Cmd, MenuAction::Goto(root)]);
    }

    #[test]
    fn test_goto_menu_label() {
        let config = compile(
            "label jump\nmenu goto extras\nmenu begin extras\nlabel x\nmenu end\nlabel nowhere\nmenu goto nosuchlabel\n",
        );
        let extras = config.tree.find_menu("extras").expect("created by begin");

        let jump = config.find_label("jump").expect("defined");
        assert_eq!(jump.action, MenuAction::Goto(extras));

        let nowhere = config.find_label("nowhere").expect("defined");
        assert_eq!(nowhere.action, MenuAction::Disabled);
    }

    #[test]
    fn test_goto_never_reaches_hidden_menu() {
        let config = compile(
            "label ghost\nkernel secret\nmenu hide\nlabel jump\nmenu goto ghost\nlabel peek\nmenu goto .hidden\n",
        );
        assert_eq!(config.find_label("jump").expect("defined").action, MenuAction::Disabled);
        assert_eq!(config.find_label("peek").expect("defined").action, MenuAction::Disabled);
        assert_eq!(config.find_label("ghost").expect("defined").menu, config.tree.hidden());
    }

    #[test]
    fn test_exit() {
        let config = compile(
            "menu begin sub\nlabel back\nmenu exit\nlabel away\nmenu exit sub2\nlabel lost\nmenu exit nope\nmenu end\nmenu begin sub2\nmenu end\nlabel top\nmenu exit\n",
        );
        let root = config.tree.root();
        let sub2 = config.tree.find_menu("sub2").expect("created by begin");

        assert_eq!(config.find_label("back").expect("defined").action, MenuAction::Exit(root));
        assert_eq!(config.find_label("away").expect("defined").action, MenuAction::Exit(sub2));
        assert_eq!(config.find_label("lost").expect("defined").action, MenuAction::Disabled);
        // exit outside of a submenu is ignored
        assert_eq!(config.find_label("top").expect("defined").action, MenuAction::Cmd);
    }

    #[test]
    fn test_global_default() {
        let config = compile(
            "default two extra options\nlabel one\nmenu begin sub\nlabel two\nmenu end\nlabel hidden\nmenu hide\n",
        );
        let sub = config.tree.find_menu("sub").expect("created by begin");
        assert_eq!(config.start_menu, sub);
        assert_eq!(config.default_menu, Some(sub));
        assert_eq!(config.tree.menu(sub).default_entry, 0);
        assert_eq!(config.tree.menu(sub).current_entry, 0);

        let config = compile("default hidden\nlabel one\nlabel two\nlabel hidden\nmenu hide\n");
        assert_eq!(config.start_menu, config.tree.root());
        assert_eq!(config.default_menu, None);
    }

    #[test]
    fn test_menu_default_sets_current_entry() {
        let config = compile("label one\nlabel two\nmenu default\nlabel three\n");
        let root = config.tree.menu(config.tree.root());
        assert_eq!(root.default_entry, 1);
        assert_eq!(root.current_entry, 1);
    }

    #[test]
    fn test_saved_default_overrides_global() {
        let text = "menu save\ndefault one\nlabel one\nlabel two\n";

        let config = compile_saved(text, Some("two"));
        assert_eq!(config.tree.menu(config.tree.root()).default_entry, 1);

        let config = compile_saved(text, None);
        assert_eq!(config.tree.menu(config.tree.root()).default_entry, 0);

        // without menu save the store is not consulted
        let config = compile_saved("default one\nlabel one\nlabel two\n", Some("two"));
        assert_eq!(config.tree.menu(config.tree.root()).default_entry, 0);
    }

    #[test]
    fn test_unlabel_commands() {
        let config = compile(
            "ontimeout linux single\nmenu onerror unknown cmd\nlabel linux\nkernel vmlinuz\nappend ro\n",
        );
        let root = config.tree.menu(config.tree.root());
        assert_eq!(root.on_timeout.as_deref(), Some("vmlinuz ro single"));
        assert_eq!(root.on_error.as_deref(), Some("unknown cmd"));
    }

    #[test]
    fn test_submenu_inherits_until_created() {
        let config = compile(
            "menu master passwd secret\nmenu color title * #fff\nmenu rows 5\nmenu save\ntimeout 10\nf1 early.txt\nontimeout early\nmenu onerror early\nmenu begin sub\nmenu end\nmenu rows 9\nmenu master passwd other\nmenu color title * #000\ntimeout 30\nf1 late.txt\nontimeout late\nmenu onerror late\n",
        );
        let root = config.tree.menu(config.tree.root());
        let sub = config.tree.menu(config.tree.find_menu("sub").expect("created by begin"));

        assert_eq!(sub.master_passwd.as_deref(), Some("secret"));
        assert_eq!(root.master_passwd.as_deref(), Some("other"));
        assert_eq!(sub.params, {
            let mut params = root.params;
            params[crate::menu::layout::LayoutParam::Rows] = 5;
            params
        });
        assert_eq!(sub.colors.get("title").map(|c| c.argb_fg), Some(0xffff_ffff));
        assert_eq!(root.colors.get("title").map(|c| c.argb_fg), Some(0xff00_0000));
        assert_eq!(sub.timeout, Duration::from_secs(1));
        assert_eq!(root.timeout, Duration::from_secs(3));
        assert_eq!(sub.fkey_help[0].textname.as_deref(), Some("early.txt"));
        assert_eq!(root.fkey_help[0].textname.as_deref(), Some("late.txt"));
        assert_eq!(sub.on_timeout.as_deref(), Some("early"));
        assert_eq!(root.on_timeout.as_deref(), Some("late"));
        assert_eq!(sub.on_error.as_deref(), Some("early"));
        assert_eq!(root.on_error.as_deref(), Some("late"));
        assert!(sub.save);
    }
}
