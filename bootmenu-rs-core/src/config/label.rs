// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Provides [`LabelData`], the pending entry of the parser, and the finalizer that turns it into a [`MenuEntry`].
//!
//! [`MenuEntry`]: crate::menu::MenuEntry

use alloc::string::String;

use crate::{
    config::{ipappend::IpAppend, scanner::MAX_LINE},
    menu::{EntryId, MenuAction, MenuId, MenuTree},
    refstr::{RefStr, StrPool},
};

/// How the target of a command entry is booted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KernelType {
    /// No loader.
    None,

    /// Boot from a local disk.
    LocalBoot,

    /// Detect the loader from the file name.
    #[default]
    Kernel,

    /// A Linux kernel.
    Linux,

    /// A boot sector.
    Boot,

    /// A boot sector that keeps the partition table.
    Bss,

    /// A PXE network boot program.
    Pxe,

    /// A floppy disk image.
    FdImage,

    /// A COMBOOT program.
    ComBoot,

    /// A COM32 module.
    Com32,

    /// Another configuration file.
    Config,
}

impl KernelType {
    /// Every kernel type, in the order directives are matched.
    pub const ALL: [Self; 11] = [
        Self::None,
        Self::LocalBoot,
        Self::Kernel,
        Self::Linux,
        Self::Boot,
        Self::Bss,
        Self::Pxe,
        Self::FdImage,
        Self::ComBoot,
        Self::Com32,
        Self::Config,
    ];

    /// The directive name of the kernel type.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::LocalBoot => "localboot",
            Self::Kernel => "kernel",
            Self::Linux => "linux",
            Self::Boot => "boot",
            Self::Bss => "bss",
            Self::Pxe => "pxe",
            Self::FdImage => "fdimage",
            Self::ComBoot => "comboot",
            Self::Com32 => "com32",
            Self::Config => "config",
        }
    }
}

/// The entry currently being described by the parser.
///
/// Fields are filled in as directives arrive, and [`LabelData::record`] turns the whole thing into an entry.
#[derive(Clone, Debug, Default)]
pub struct LabelData {
    /// The label. Nothing is recorded without one.
    pub label: Option<RefStr>,

    /// The boot target.
    pub kernel: Option<RefStr>,

    /// How the target is booted.
    pub kind: KernelType,

    /// Per-entry append text, overriding the global one.
    pub append: Option<RefStr>,

    /// Initial ramdisk path.
    pub initrd: Option<RefStr>,

    /// Display text overriding the label.
    pub menu_label: Option<RefStr>,

    /// Password of the entry.
    pub passwd: Option<RefStr>,

    /// Help text, line terminators included.
    pub help_text: Option<String>,

    /// Which IP-append fragments the command line gets.
    pub ipappend: u32,

    /// Record on the hidden menu.
    pub hide: bool,

    /// Become the default of its menu.
    pub default: bool,

    /// Spacer row.
    pub separator: bool,

    /// Not selectable.
    pub disabled: bool,

    /// Amount of spaces in front of the display text.
    pub indent: i32,

    /// Explicit action, if any. Entries without one run their command line.
    pub action: Option<MenuAction>,

    /// Explicit save setting. Without one, the menu's setting applies.
    pub save: Option<bool>,
}

impl LabelData {
    /// Starts describing a new entry whose label and target are both `label`.
    #[must_use = "Has no effect if the result is unused"]
    pub fn new(label: RefStr, ipappend: u32) -> Self {
        Self {
            kernel: Some(label.clone()),
            label: Some(label),
            ipappend,
            ..Self::default()
        }
    }

    /// Checks if there is a pending entry.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn is_pending(&self) -> bool {
        self.label.is_some()
    }

    /// Finalizes the pending entry into `menu`, and resets the accumulator.
    ///
    /// Does nothing and returns [`None`] if there is no pending entry. `append` is the global append text
    /// in effect at this point.
    pub fn record(
        &mut self,
        tree: &mut MenuTree,
        menu: MenuId,
        append: Option<&RefStr>,
        ipappend: &IpAppend,
        pool: &StrPool,
    ) -> Option<EntryId> {
        if !self.is_pending() {
            return None;
        }
        let ld = core::mem::take(self);
        let label = ld.label?;

        let menu = if ld.hide { tree.hidden() } else { menu };
        let inactive = ld.separator || ld.disabled;
        let action = if inactive {
            MenuAction::Disabled
        } else {
            ld.action.unwrap_or(MenuAction::Cmd)
        };

        let mut display = ld.menu_label.unwrap_or_else(|| label.clone());
        if ld.indent != 0 {
            let width = usize::try_from(ld.indent.unsigned_abs()).map_or(MAX_LINE, |w| w.min(MAX_LINE));
            let mut indented = String::with_capacity(width + display.len());
            indented.extend(core::iter::repeat_n(' ', width));
            indented.push_str(&display);
            display = RefStr::from(indented);
        }
        if ld.separator {
            display = pool.empty();
        }

        let cmdline = (action == MenuAction::Cmd).then(|| {
            command_line(
                ld.kind,
                ld.kernel.as_deref().unwrap_or_default(),
                ld.append.as_ref().or(append),
                ipappend,
                ld.ipappend,
                ld.initrd.as_ref(),
            )
        });

        let save = ld.save.unwrap_or(tree.menu(menu).save);
        let is_cmd = action == MenuAction::Cmd;

        let id = tree.new_entry(menu, action);
        let entry = tree.entry_mut(id);
        entry.display_name = Some(display);
        entry.label = (!inactive).then_some(label);
        entry.passwd = if inactive { None } else { ld.passwd };
        entry.help_text = ld.help_text;
        entry.cmdline = cmdline;
        entry.save = save;
        let index = entry.index;

        tree.consider_for_hotkey(menu, id);

        if ld.default && is_cmd {
            tree.menu_mut(menu).default_entry = index;
        }

        Some(id)
    }
}

/// Builds the command line of an entry.
///
/// The parts are, in order: a `.type ` prefix for anything but [`KernelType::Kernel`], the target, the
/// append text unless it is empty or a lone `-`, every selected IP-append fragment and an `initrd=` option.
fn command_line(
    kind: KernelType,
    kernel: &str,
    append: Option<&RefStr>,
    ipappend: &IpAppend,
    mask: u32,
    initrd: Option<&RefStr>,
) -> RefStr {
    let mut cmd = String::with_capacity(kernel.len() + 32);

    if kind != KernelType::Kernel {
        cmd.push('.');
        cmd.push_str(kind.as_str());
        cmd.push(' ');
    }
    cmd.push_str(kernel);

    if let Some(append) = append.filter(|a| !a.is_empty() && a.as_str() != "-") {
        cmd.push(' ');
        cmd.push_str(append);
    }

    for fragment in ipappend.selected(mask) {
        cmd.push(' ');
        cmd.push_str(fragment);
    }

    if let Some(initrd) = initrd {
        cmd.push_str(" initrd=");
        cmd.push_str(initrd);
    }

    RefStr::from(cmd)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(label: &str) -> LabelData {
        LabelData::new(RefStr::new(label), 0)
    }

    fn record(ld: &mut LabelData, tree: &mut MenuTree, append: Option<&RefStr>) -> Option<EntryId> {
        let pool = StrPool::new();
        let root = tree.root();
        ld.record(tree, root, append, &IpAppend::new(), &pool)
    }

    #[test]
    fn test_nothing_pending() {
        let pool = StrPool::new();
        let mut tree = MenuTree::new(&pool);
        let mut ld = LabelData {
            hide: true,
            ..LabelData::default()
        };
        assert_eq!(record(&mut ld, &mut tree, None), None);
        assert_eq!(tree.entry_count(), 0);
    }

    #[test]
    fn test_command_line_order() {
        let pool = StrPool::new();
        let mut tree = MenuTree::new(&pool);
        let mut ipappend = IpAppend::new();
        ipappend.set(0, "ip=dhcp").set(1, "BOOTIF=01");

        let mut ld = pending("rescue");
        ld.kernel = Some(RefStr::new("vmlinuz"));
        ld.kind = KernelType::Linux;
        ld.append = Some(RefStr::new("quiet"));
        ld.initrd = Some(RefStr::new("initrd.img"));
        ld.ipappend = 0b11;

        let root = tree.root();
        let id = ld.record(&mut tree, root, None, &ipappend, &pool).expect("label is pending");
        assert_eq!(
            tree.entry(id).cmdline.as_deref(),
            Some(".linux vmlinuz quiet ip=dhcp BOOTIF=01 initrd=initrd.img")
        );
        assert!(!ld.is_pending());
        assert!(ld.append.is_none());
    }

    #[test]
    fn test_append_fallback() {
        let pool = StrPool::new();
        let mut tree = MenuTree::new(&pool);
        let global = RefStr::new("console=ttyS0");

        let mut ld = pending("a");
        let a = record(&mut ld, &mut tree, Some(&global)).expect("pending");
        assert_eq!(tree.entry(a).cmdline.as_deref(), Some("a console=ttyS0"));

        let mut ld = pending("b");
        ld.append = Some(RefStr::new("-"));
        let b = record(&mut ld, &mut tree, Some(&global)).expect("pending");
        assert_eq!(tree.entry(b).cmdline.as_deref(), Some("b"));
    }

    #[test]
    fn test_separator_and_disabled() {
        let pool = StrPool::new();
        let mut tree = MenuTree::new(&pool);

        let mut ld = LabelData::new(pool.empty(), 0);
        ld.separator = true;
        let root = tree.root();
        let sep = ld.record(&mut tree, root, None, &IpAppend::new(), &pool).expect("pending");
        let entry = tree.entry(sep);
        assert_eq!(entry.action, MenuAction::Disabled);
        assert!(entry.label.is_none());
        assert!(RefStr::ptr_eq(entry.display_name.as_ref().expect("set"), &pool.empty()));

        let mut ld = pending("^off");
        ld.disabled = true;
        ld.passwd = Some(RefStr::new("pw"));
        let off = record(&mut ld, &mut tree, None).expect("pending");
        assert_eq!(tree.entry(off).action, MenuAction::Disabled);
        assert!(tree.entry(off).passwd.is_none());
        assert!(tree.entry(off).hotkey.is_none());
        assert!(tree.entry(off).cmdline.is_none());
    }

    #[test]
    fn test_hidden_default_and_indent() {
        let pool = StrPool::new();
        let mut tree = MenuTree::new(&pool);

        let mut ld = pending("first");
        record(&mut ld, &mut tree, None);

        let mut ld = pending("second");
        ld.default = true;
        ld.indent = 2;
        let second = record(&mut ld, &mut tree, None).expect("pending");
        assert_eq!(tree.menu(tree.root()).default_entry, 1);
        assert_eq!(tree.entry(second).display_name.as_deref(), Some("  second"));

        let mut ld = pending("ghost");
        ld.hide = true;
        let ghost = record(&mut ld, &mut tree, None).expect("pending");
        assert_eq!(tree.entry(ghost).menu, tree.hidden());
        assert_eq!(tree.find_label("ghost"), Some(ghost));
    }

    #[test]
    fn test_save_falls_back_to_menu() {
        let pool = StrPool::new();
        let mut tree = MenuTree::new(&pool);
        let root = tree.root();
        tree.menu_mut(root).save = true;

        let mut ld = pending("a");
        let a = record(&mut ld, &mut tree, None).expect("pending");
        let mut ld = pending("b");
        ld.save = Some(false);
        let b = record(&mut ld, &mut tree, None).expect("pending");

        assert!(tree.entry(a).save);
        assert!(!tree.entry(b).save);
    }
}
