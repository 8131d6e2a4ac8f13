// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! The directive interpreter.
//!
//! [`Parser`] holds every piece of state that is threaded through a set of configuration files: the menu
//! tree under construction, the current menu, the pending entry, the global append text and mask, and the
//! include depth. An untagged `include` parses the included file with the very same state, so it behaves
//! as if the text had been pasted in place.
//!
//! Nothing in here fails. Unknown directives and malformed arguments are skipped or read as zero.

use alloc::{
    format,
    string::{String, ToString},
};
use core::time::Duration;

use log::{debug, info, warn};

use crate::{
    config::{
        GlobalFlags, MenuConfig,
        ipappend::IpAppend,
        label::{KernelType, LabelData},
        scanner::{
            LineReader, is_space, looking_at, parse_int, parse_long, skip_space, split_word,
            strip_line_end,
        },
    },
    menu::{
        EntryId, MenuAction, MenuId, MenuTree,
        color::{
            ColorSlot, MSG_COLORS_DEF_BG, MSG_COLORS_DEF_FG, MSG_COLORS_DEF_SHADOW, Shadow,
            parse_argb_prefix,
        },
        layout::{FKEY_COUNT, FkeyHelp, LayoutParam, MessageKind},
    },
    refstr::{RefStr, StrPool},
    system::{console::Console, fs::ConfigSource},
};

/// The configuration names tried, in order, when a primary file cannot be opened.
pub const FALLBACK_NAMES: [&str; 3] = ["extlinux.conf", "isolinux.cfg", "syslinux.cfg"];

/// Milliseconds per tick of a timeout value.
const CLK_TCK: i64 = 1000;

/// Which directive the raw default command line came from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
enum DefaultLevel {
    /// Nothing set it yet.
    #[default]
    None,

    /// A `default` directive.
    Default,

    /// A `ui` directive, which always wins.
    Ui,
}

/// The parser context.
pub struct Parser<'a> {
    /// Where configuration files come from.
    source: &'a mut dyn ConfigSource,

    /// Where `say` output goes.
    console: Option<&'a mut dyn Console>,

    /// The IP-append fragments.
    ipappend: IpAppend,

    /// How deep includes may nest.
    max_depth: usize,

    /// Owner of the shared empty string.
    pool: StrPool,

    /// The tree under construction.
    tree: MenuTree,

    /// The menu directives apply to.
    current: MenuId,

    /// The menu shown first.
    start: MenuId,

    /// The pending entry.
    ld: LabelData,

    /// The global append text.
    append: Option<RefStr>,

    /// The global IP-append mask.
    ipappend_mask: u32,

    /// The current include nesting.
    depth: usize,

    /// The target of the last `default` directive.
    global_default: Option<RefStr>,

    /// The raw default command line.
    default_cmd: Option<RefStr>,

    /// Which directive set `default_cmd`.
    default_level: DefaultLevel,

    /// Whether a `ui` directive was seen.
    has_ui: bool,

    /// Whether `menu save` or `menu nosave` was seen.
    menu_save: bool,

    /// The global on-error command.
    on_error: Option<RefStr>,

    /// The global flags.
    flags: GlobalFlags,

    /// The global total timeout.
    total_timeout: Duration,
}

impl<'a> Parser<'a> {
    /// Creates a parser with an empty tree whose current menu is the root menu.
    pub fn new(
        source: &'a mut dyn ConfigSource,
        console: Option<&'a mut dyn Console>,
        ipappend: IpAppend,
        max_depth: usize,
    ) -> Self {
        let pool = StrPool::new();
        let tree = MenuTree::new(&pool);
        let root = tree.root();
        Self {
            source,
            console,
            ipappend,
            max_depth,
            pool,
            tree,
            current: root,
            start: root,
            ld: LabelData::default(),
            append: None,
            ipappend_mask: 0,
            depth: 0,
            global_default: None,
            default_cmd: None,
            default_level: DefaultLevel::None,
            has_ui: false,
            menu_save: false,
            on_error: None,
            flags: GlobalFlags::default(),
            total_timeout: Duration::ZERO,
        }
    }

    /// Parses a top level configuration file.
    ///
    /// `name` is tried first, then each of [`FALLBACK_NAMES`]; the first that can be read is parsed. Without a
    /// `name`, `default_name` takes its place. If nothing can be read, parsing continues with what it has.
    pub fn parse_primary(&mut self, name: Option<&str>, default_name: Option<&str>) {
        let first = name.or(default_name);
        let candidates = first.into_iter().chain(FALLBACK_NAMES);

        for candidate in candidates {
            match self.source.read(candidate) {
                Ok(data) => {
                    debug!("Parsing configuration {candidate}");
                    self.parse_bytes(&data);
                    return;
                }
                Err(e) => debug!("Could not read configuration {candidate}: {e}"),
            }
        }

        warn!(
            "No configuration could be read (tried {})",
            first.unwrap_or("no primary name")
        );
    }

    /// Parses an included file, without any fallback names.
    fn parse_include(&mut self, name: &str) {
        if self.depth >= self.max_depth {
            warn!("Skipping include {name}: nested deeper than {}", self.max_depth);
            return;
        }

        let data = match self.source.read(name) {
            Ok(data) => data,
            Err(e) => {
                warn!("Could not read include {name}: {e}");
                return;
            }
        };

        debug!("Parsing include {name}");
        self.depth += 1;
        self.parse_bytes(&data);
        self.depth -= 1;
    }

    /// Parses every line of a file.
    pub fn parse_bytes(&mut self, data: &[u8]) {
        let mut lines = LineReader::new(data);
        while let Some(raw) = lines.next() {
            self.parse_line(raw, &mut lines);
        }
    }

    /// Records the last pending entry and hands over the unresolved configuration.
    #[must_use = "Has no effect if the result is unused"]
    pub fn finish(mut self) -> MenuConfig {
        self.record();
        MenuConfig {
            tree: self.tree,
            start_menu: self.start,
            default_menu: None,
            default_cmd: self.default_cmd,
            global_default: self.global_default,
            on_error: self.on_error,
            flags: self.flags,
            total_timeout: self.total_timeout,
            has_ui: self.has_ui,
            menu_save: self.menu_save,
        }
    }

    /// Finalizes the pending entry into the current menu.
    fn record(&mut self) {
        self.ld.record(
            &mut self.tree,
            self.current,
            self.append.as_ref(),
            &self.ipappend,
            &self.pool,
        );
    }

    /// Classifies a raw line and applies it.
    ///
    /// `lines` is only consumed by text blocks, which swallow lines up to `endtext`.
    fn parse_line(&mut self, raw: &[u8], lines: &mut LineReader<'_>) {
        let p = skip_space(strip_line_end(raw));
        if p.is_empty() || p[0] == b'#' {
            return;
        }

        if let Some(rest) = looking_at(p, b"menu") {
            self.menu_directive(skip_space(rest));
        } else if let Some(rest) = looking_at(p, b"text") {
            self.text_block(skip_space(rest), lines);
        } else if let Some((slot, rest)) = fkey_slot(p) {
            self.fkey_help(slot, skip_space(rest));
        } else if let Some(rest) = looking_at(p, b"include") {
            self.include(rest);
        } else {
            self.directive(p);
        }
    }

    /// Applies a `menu <keyword>` directive. `p` points just past `menu`.
    fn menu_directive(&mut self, p: &[u8]) {
        let cur = self.current;

        if let Some(rest) = looking_at(p, b"label") {
            self.menu_label(text(rest));
        } else if let Some(rest) = looking_at(p, b"title") {
            self.menu_title(text(rest));
        } else if looking_at(p, b"default").is_some() {
            if self.ld.is_pending() {
                self.ld.default = true;
            } else if let Some((parent, opener)) = self.opener() {
                let index = self.tree.entry(opener).index;
                self.tree.menu_mut(parent).default_entry = index;
            }
        } else if looking_at(p, b"hide").is_some() {
            self.ld.hide = true;
        } else if let Some(rest) = looking_at(p, b"passwd") {
            let passwd = Some(text(rest));
            if self.ld.is_pending() {
                self.ld.passwd = passwd;
            } else if let Some((_, opener)) = self.opener() {
                self.tree.entry_mut(opener).passwd = passwd;
            }
        } else if looking_at(p, b"shiftkey").is_some() {
            self.flags.insert(GlobalFlags::SHIFT_KEY);
        } else if looking_at(p, b"save").is_some() {
            self.set_save(true);
        } else if looking_at(p, b"nosave").is_some() {
            self.set_save(false);
        } else if let Some(rest) = looking_at(p, b"onerror") {
            self.set_on_error(text(rest));
        } else if let Some(rest) = looking_at(p, b"master") {
            if let Some(rest) = looking_at(skip_space(rest), b"passwd") {
                self.tree.menu_mut(cur).master_passwd = Some(text(rest));
            }
        } else if let Some(rest) = looking_at(p, b"include") {
            self.include(rest);
        } else if let Some(rest) = looking_at(p, b"background") {
            let (word, _) = split_word(skip_space(rest));
            self.tree.menu_mut(cur).background = Some(RefStr::from_bytes(word));
        } else if looking_at(p, b"hidden").is_some() {
            self.flags.insert(GlobalFlags::HIDDEN_MENU);
        } else if let Some((kind, rest)) = MessageKind::ALL
            .into_iter()
            .find_map(|kind| looking_at(p, kind.name().as_bytes()).map(|rest| (kind, rest)))
        {
            self.tree.menu_mut(cur).messages[kind] = text(rest);
        } else if let Some(rest) = looking_at(p, b"color").or_else(|| looking_at(p, b"colour")) {
            let p = skip_space(rest);
            let colors = &mut self.tree.menu_mut(cur).colors;
            if let Some((slot, rest)) = colors
                .slots_mut()
                .iter_mut()
                .find_map(|slot| looking_at(p, slot.name.as_bytes()).map(|rest| (slot, rest)))
            {
                set_color(slot, skip_space(rest));
            }
        } else if let Some(rest) = looking_at(p, b"msgcolor").or_else(|| looking_at(p, b"msgcolour")) {
            let (fg, bg, shadow) = msg_colors(skip_space(rest));
            self.tree.menu_mut(cur).colors.set_msg_colors(fg, bg, shadow);
        } else if looking_at(p, b"separator").is_some() {
            self.record();
            self.ld.label = Some(self.pool.empty());
            self.ld.separator = true;
            self.record();
        } else if looking_at(p, b"disable").is_some() || looking_at(p, b"disabled").is_some() {
            self.ld.disabled = true;
        } else if let Some(rest) = looking_at(p, b"indent") {
            self.ld.indent = parse_int(skip_space(rest));
        } else if let Some(rest) = looking_at(p, b"begin") {
            self.record();
            self.current = self.tree.begin_submenu(cur, skip_space(rest), &self.pool);
        } else if looking_at(p, b"end").is_some() {
            self.record();
            self.current = self.tree.end_submenu(cur);
        } else if looking_at(p, b"quit").is_some() {
            if self.ld.is_pending() {
                self.ld.action = Some(MenuAction::Quit);
            }
        } else if let Some(rest) = looking_at(p, b"goto") {
            if self.ld.is_pending() {
                self.ld.action = Some(MenuAction::GotoUnresolved(text(rest)));
            }
        } else if let Some(rest) = looking_at(p, b"exit") {
            let target = skip_space(rest);
            if self.ld.is_pending()
                && let Some(parent) = self.tree.menu(cur).parent
            {
                self.ld.action = Some(if target.is_empty() {
                    MenuAction::Exit(parent)
                } else {
                    MenuAction::ExitUnresolved(RefStr::from_bytes(target))
                });
            }
        } else if looking_at(p, b"start").is_some() {
            self.start = cur;
        } else if let Some((param, rest)) = LayoutParam::ALL
            .into_iter()
            .find_map(|param| looking_at(p, param.name().as_bytes()).map(|rest| (param, rest)))
        {
            self.tree.menu_mut(cur).params[param] = parse_int(skip_space(rest));
        } else {
            debug!("Ignoring unknown menu directive: {}", String::from_utf8_lossy(p));
        }
    }

    /// Applies `menu label`: the pending entry's display text, or else the display text of the entry that
    /// opens the current submenu.
    fn menu_label(&mut self, label: RefStr) {
        if self.ld.is_pending() {
            self.ld.menu_label = Some(label);
            return;
        }

        let Some((parent, opener)) = self.opener() else {
            return;
        };
        let title = label.strip_caret();
        self.tree.entry_mut(opener).display_name = Some(label);
        self.tree.consider_for_hotkey(parent, opener);

        let menu = self.tree.menu_mut(self.current);
        if menu.title.is_empty() {
            menu.title = title;
        }
    }

    /// Applies `menu title`.
    ///
    /// An opening entry that still displays the submenu's own tag takes the title as its display text.
    fn menu_title(&mut self, title: RefStr) {
        let cur = self.current;
        self.tree.menu_mut(cur).title = title.clone();

        if let Some((_, opener)) = self.opener() {
            let shows_tag = RefStr::opt_ptr_eq(
                self.tree.entry(opener).display_name.as_ref(),
                self.tree.menu(cur).label.as_ref(),
            );
            if shows_tag {
                self.tree.entry_mut(opener).display_name = Some(title);
            }
        }
    }

    /// Returns the parent menu and opening entry of the current menu, if it is a submenu.
    fn opener(&self) -> Option<(MenuId, EntryId)> {
        let menu = self.tree.menu(self.current);
        menu.parent.zip(menu.parent_entry)
    }

    /// Applies `menu save` or `menu nosave`.
    fn set_save(&mut self, save: bool) {
        self.menu_save = true;
        if self.ld.is_pending() {
            self.ld.save = Some(save);
        } else {
            self.tree.menu_mut(self.current).save = save;
        }
    }

    /// Sets the on-error command of the current menu and the global one.
    fn set_on_error(&mut self, cmd: RefStr) {
        self.tree.menu_mut(self.current).on_error = Some(cmd.clone());
        self.on_error = Some(cmd);
    }

    /// Consumes a `text` block up to its `endtext` line.
    ///
    /// Only `text help` blocks are kept; they are added to the pending entry's help text as they are.
    fn text_block(&mut self, p: &[u8], lines: &mut LineReader<'_>) {
        let help = looking_at(p, b"help").is_some();

        for raw in lines.by_ref() {
            if looking_at(skip_space(raw), b"endtext").is_some() {
                break;
            }
            if help {
                let raw = strip_nul(raw);
                self.ld
                    .help_text
                    .get_or_insert_with(String::new)
                    .push_str(&String::from_utf8_lossy(raw));
            }
        }
    }

    /// Replaces a function key help slot of the current menu with `<file> [<background>]`.
    fn fkey_help(&mut self, slot: usize, p: &[u8]) {
        let (file, rest) = split_word(p);
        let background = (!rest.is_empty()).then(|| RefStr::from_bytes(split_word(skip_space(rest)).0));

        self.tree.menu_mut(self.current).fkey_help[slot] = FkeyHelp {
            textname: Some(RefStr::from_bytes(file)),
            background,
        };
    }

    /// Applies `include <file> [<tag>]`. `p` points just past `include`.
    ///
    /// With a tag, the included entries land in a new submenu labelled with it.
    fn include(&mut self, p: &[u8]) {
        let (file, rest) = split_word(skip_space(p));
        let file = String::from_utf8_lossy(file).to_string();
        let tag = skip_space(rest);

        if tag.is_empty() {
            self.parse_include(&file);
        } else {
            self.record();
            self.current = self.tree.begin_submenu(self.current, tag, &self.pool);
            self.parse_include(&file);
            self.record();
            self.current = self.tree.end_submenu(self.current);
        }
    }

    /// Applies any directive that is not a `menu`, `text`, function key or `include` line.
    fn directive(&mut self, p: &[u8]) {
        let cur = self.current;

        if let Some(rest) = looking_at(p, b"append") {
            let append = Some(text(rest));
            if self.ld.is_pending() {
                self.ld.append = append;
            } else {
                self.append = append;
            }
        } else if let Some(rest) = looking_at(p, b"initrd") {
            if self.ld.is_pending() {
                self.ld.initrd = Some(text(rest));
            }
        } else if let Some(rest) = looking_at(p, b"label") {
            self.record();
            self.ld = LabelData::new(text(rest), self.ipappend_mask);
        } else if let Some((kind, rest)) = KernelType::ALL
            .into_iter()
            .find_map(|kind| looking_at(p, kind.as_str().as_bytes()).map(|rest| (kind, rest)))
        {
            if self.ld.is_pending() {
                self.ld.kernel = Some(text(rest));
                self.ld.kind = kind;
            }
        } else if let Some(rest) = looking_at(p, b"timeout") {
            self.tree.menu_mut(cur).timeout = ticks(i64::from(parse_int(skip_space(rest))));
        } else if let Some(rest) = looking_at(p, b"totaltimeout") {
            self.total_timeout = ticks(parse_long(skip_space(rest)));
        } else if let Some(rest) = looking_at(p, b"ontimeout") {
            self.tree.menu_mut(cur).on_timeout = Some(text(rest));
        } else if let Some(rest) = looking_at(p, b"allowoptions") {
            self.tree.menu_mut(cur).allow_edit = parse_int(skip_space(rest)) != 0;
        } else if let Some(rest) = looking_at(p, b"ipappend") {
            let mask = parse_int(skip_space(rest)).cast_unsigned();
            if self.ld.is_pending() {
                self.ld.ipappend = mask;
            } else {
                self.ipappend_mask = mask;
            }
        } else if let Some(rest) = looking_at(p, b"default") {
            let target = text(rest);
            if self.default_level < DefaultLevel::Ui {
                self.default_level = DefaultLevel::Default;
                self.default_cmd = Some(target.clone());
            }
            self.global_default = Some(target);
        } else if let Some(rest) = looking_at(p, b"ui") {
            self.has_ui = true;
            self.default_level = DefaultLevel::Ui;
            self.default_cmd = Some(text(rest));
        } else if let Some((flag, rest)) = FLAG_DIRECTIVES
            .into_iter()
            .find_map(|(name, flag)| looking_at(p, name).map(|rest| (flag, rest)))
        {
            self.flags.set(flag, parse_int(skip_space(rest)) != 0);
        } else if let Some(rest) = looking_at(p, b"onerror") {
            self.set_on_error(text(rest));
        } else if ["display", "font", "kbdmap", "serial"]
            .into_iter()
            .any(|name| looking_at(p, name.as_bytes()).is_some())
        {
            debug!("Ignoring unsupported directive: {}", String::from_utf8_lossy(p));
        } else if looking_at(p, b"say").is_some() {
            let said = String::from_utf8_lossy(p.get(4..).unwrap_or_default());
            self.say(&said);
        } else {
            debug!("Ignoring unknown directive: {}", String::from_utf8_lossy(p));
        }
    }

    /// Prints a line to the console, or logs it if there is none.
    fn say(&mut self, line: &str) {
        match self.console.as_deref_mut() {
            Some(console) => console.print(&format!("{line}\n")),
            None => info!("{line}"),
        }
    }
}

/// Directives that set or clear a global flag from an integer argument.
const FLAG_DIRECTIVES: [(&[u8], GlobalFlags); 6] = [
    (b"implicit", GlobalFlags::ALLOW_IMPLICIT),
    (b"prompt", GlobalFlags::FORCE_PROMPT),
    (b"console", GlobalFlags::DISPLAY_CONSOLE),
    (b"noescape", GlobalFlags::NO_ESCAPE),
    (b"nocomplete", GlobalFlags::NO_COMPLETE),
    (b"nohalt", GlobalFlags::NO_HALT),
];

/// Reads the rest of a directive as a string argument.
fn text(rest: &[u8]) -> RefStr {
    RefStr::from_bytes(skip_space(rest))
}

/// Cuts a raw line at its first NUL.
fn strip_nul(raw: &[u8]) -> &[u8] {
    raw.iter().position(|&c| c == 0).map_or(raw, |end| &raw[..end])
}

/// Converts a timeout in tenths of a second to a [`Duration`]. Negative values become zero.
fn ticks(tenths: i64) -> Duration {
    let millis = tenths.saturating_mul(CLK_TCK).saturating_add(9) / 10;
    Duration::from_millis(u64::try_from(millis).unwrap_or(0))
}

/// Checks if the cursor is at a function key (`f1` to `f12`, or `f0`), returning its help slot.
///
/// `fN` maps to slot `N - 1`, while `f0` maps to slot 10.
fn fkey_slot(p: &[u8]) -> Option<(usize, &[u8])> {
    let (&first, rest) = p.split_first()?;
    if first | 0x20 != b'f' {
        return None;
    }

    let digits = rest.iter().take_while(|c| c.is_ascii_digit()).count();
    let (number, rest) = rest.split_at(digits);
    if !rest.first().is_none_or(|&c| is_space(c)) {
        return None;
    }

    let no = number
        .iter()
        .try_fold(0usize, |acc, &c| acc.checked_mul(10)?.checked_add(usize::from(c - b'0')))?;
    match no {
        0 => Some((10, rest)),
        1..=FKEY_COUNT => Some((no - 1, rest)),
        _ => None,
    }
}

/// Applies `<ansi|*> <fg|*> <bg|*> <shadow>` to a colour slot. Missing trailing fields keep their value.
fn set_color(slot: &mut ColorSlot, p: &[u8]) {
    if p.is_empty() {
        return;
    }
    let p = if let Some(rest) = looking_at(p, b"*") {
        rest
    } else {
        let (ansi, rest) = split_word(p);
        slot.ansi = RefStr::from_bytes(ansi);
        rest
    };

    let p = skip_space(p);
    if p.is_empty() {
        return;
    }
    let p = if let Some(rest) = looking_at(p, b"*") {
        rest
    } else {
        let (fg, rest) = parse_argb_prefix(p);
        slot.argb_fg = fg;
        rest
    };

    let p = skip_space(p);
    if p.is_empty() {
        return;
    }
    let p = if let Some(rest) = looking_at(p, b"*") {
        rest
    } else {
        let (bg, rest) = parse_argb_prefix(p);
        slot.argb_bg = bg;
        rest
    };

    if let Some(shadow) = skip_space(p).first().and_then(|&c| Shadow::from_letter(c)) {
        slot.shadow = shadow;
    }
}

/// Reads the `<fg|*> <bg|*> <shadow>` arguments of `menu msgcolor`, with defaults for anything missing.
///
/// A `*` keeps the default but is not skipped, so everything after it also keeps its default.
fn msg_colors(p: &[u8]) -> (u32, u32, Shadow) {
    let mut fg = MSG_COLORS_DEF_FG;
    let mut bg = MSG_COLORS_DEF_BG;
    let mut shadow = MSG_COLORS_DEF_SHADOW;

    if p.is_empty() {
        return (fg, bg, shadow);
    }
    let mut p = p;
    if looking_at(p, b"*").is_none() {
        let (value, rest) = parse_argb_prefix(p);
        fg = value;
        p = rest;
    }

    p = skip_space(p);
    if p.is_empty() {
        return (fg, bg, shadow);
    }
    if looking_at(p, b"*").is_none() {
        let (value, rest) = parse_argb_prefix(p);
        bg = value;
        p = rest;
    }

    if let Some(value) = skip_space(p).first().and_then(|&c| Shadow::from_letter(c)) {
        shadow = value;
    }
    (fg, bg, shadow)
}
