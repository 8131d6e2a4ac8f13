// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Menu colour tables and the ARGB colour parser.
//!
//! Every menu carries a [`ColorTable`]: a fixed, ordered list of named slots, each with an ANSI attribute
//! string for text consoles, foreground and background ARGB values for graphical consoles, and a shadow mode.
//! The first [`NAMED_COLORS`] slots are the named ones (`screen`, `border`, ...), followed by 256 generated
//! `msgXX` slots used for PC attribute bytes in displayed messages.

use alloc::{format, vec::Vec};

use crate::refstr::RefStr;

/// The colour returned for a malformed colour value (opaque bright red).
pub const ARGB_ERROR: u32 = 0xffff_0000;

/// Default foreground mask of the generated message colours.
pub const MSG_COLORS_DEF_FG: u32 = 0x90ff_ffff;

/// Default background mask of the generated message colours.
pub const MSG_COLORS_DEF_BG: u32 = 0x80ff_ffff;

/// Default shadow mode of the generated message colours.
pub const MSG_COLORS_DEF_SHADOW: Shadow = Shadow::Normal;

/// The amount of named slots in a [`ColorTable`].
pub const NAMED_COLORS: usize = DEFAULT_COLORS.len();

/// The amount of generated `msgXX` slots in a [`ColorTable`].
pub const MSG_COLORS: usize = 256;

/// How a colour slot is shadowed on graphical consoles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Shadow {
    /// No shadow.
    None,

    /// Standard shadow.
    #[default]
    Normal,

    /// Shadow the whole cell.
    All,

    /// Reverse shadow.
    Reverse,
}

impl Shadow {
    /// Picks a shadow mode from the first letter of its name, ignoring case.
    ///
    /// `n` is none, `s` is standard, `a` is all and `r` is reverse. Anything else yields [`None`].
    #[must_use = "Has no effect if the result is unused"]
    pub const fn from_letter(letter: u8) -> Option<Self> {
        match letter | 0x20 {
            b'n' => Some(Self::None),
            b's' => Some(Self::Normal),
            b'a' => Some(Self::All),
            b'r' => Some(Self::Reverse),
            _ => None,
        }
    }
}

/// The built in named colours: name, ANSI attributes, foreground, background, shadow.
const DEFAULT_COLORS: [(&str, &str, u32, u32, Shadow); 18] = [
    ("screen", "37;40", 0x80ff_ffff, 0x0000_0000, Shadow::Normal),
    ("border", "30;44", 0x4000_0000, 0x0000_0000, Shadow::Normal),
    ("title", "1;36;44", 0xc000_90f0, 0x0000_0000, Shadow::Normal),
    ("unsel", "37;44", 0x90ff_ffff, 0x0000_0000, Shadow::Normal),
    ("hotkey", "1;37;44", 0xffff_ffff, 0x0000_0000, Shadow::Normal),
    ("sel", "7;37;40", 0xe000_0000, 0x20ff_8000, Shadow::All),
    ("hotsel", "1;7;37;40", 0xe040_0000, 0x20ff_8000, Shadow::All),
    ("disabled", "1;30;44", 0x60cc_cccc, 0x0000_0000, Shadow::Normal),
    ("scrollbar", "30;44", 0x4000_0000, 0x0000_0000, Shadow::Normal),
    ("tabmsg", "31;40", 0x90ff_ff00, 0x0000_0000, Shadow::Normal),
    ("cmdmark", "1;36;40", 0xc000_ffff, 0x0000_0000, Shadow::Normal),
    ("cmdline", "37;40", 0xc0ff_ffff, 0x0000_0000, Shadow::Normal),
    ("pwdborder", "30;47", 0x80ff_ffff, 0x20ff_ffff, Shadow::Normal),
    ("pwdheader", "31;47", 0x80ff_8080, 0x20ff_ffff, Shadow::Normal),
    ("pwdentry", "30;47", 0x80ff_ffff, 0x20ff_ffff, Shadow::Normal),
    ("timeout_msg", "37;40", 0x80ff_ffff, 0x0000_0000, Shadow::Normal),
    ("timeout", "1;37;40", 0xc0ff_ffff, 0x0000_0000, Shadow::Normal),
    ("help", "37;40", 0xc0ff_ffff, 0x0000_0000, Shadow::Normal),
];

/// PC colour index to ANSI colour index.
const PC_TO_ANSI: [u8; 8] = [0, 4, 2, 6, 1, 5, 3, 7];

/// PC colour index to RGB.
const PC_TO_RGB: [u32; 8] = [
    0x00_0000, 0x00_00ff, 0x00_ff00, 0x00_ffff, 0xff_0000, 0xff_00ff, 0xff_ff00, 0xff_ffff,
];

/// A single named colour.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorSlot {
    /// The name used by `menu color <name>`.
    pub name: RefStr,

    /// ANSI SGR attributes, such as `1;37;44`.
    pub ansi: RefStr,

    /// Foreground colour.
    pub argb_fg: u32,

    /// Background colour.
    pub argb_bg: u32,

    /// Shadow mode.
    pub shadow: Shadow,
}

/// The colour table of a menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorTable(Vec<ColorSlot>);

impl ColorTable {
    /// Returns the slots in table order.
    #[must_use = "Has no effect if the result is unused"]
    pub fn slots(&self) -> &[ColorSlot] {
        &self.0
    }

    /// Returns mutable access to the slots in table order.
    pub fn slots_mut(&mut self) -> &mut [ColorSlot] {
        &mut self.0
    }

    /// Gets a slot by its name.
    #[must_use = "Has no effect if the result is unused"]
    pub fn get(&self, name: &str) -> Option<&ColorSlot> {
        self.0.iter().find(|slot| &*slot.name == name)
    }

    /// Regenerates every `msgXX` slot from a foreground and background mask.
    ///
    /// The low nibble of `XX` is the PC foreground colour and the high nibble the PC background colour,
    /// with bit 3 of each nibble meaning high intensity. A background of 0 is always transparent.
    pub fn set_msg_colors(&mut self, fg: u32, bg: u32, shadow: Shadow) {
        let fga = fg & 0xff00_0000;
        let fgh = ((fg >> 1) & 0xff00_0000) | 0x8000_0000;
        let bga = bg & 0xff00_0000;
        let bgh = ((bg >> 1) & 0xff00_0000) | 0x8000_0000;

        for (i, slot) in self.0.iter_mut().skip(NAMED_COLORS).enumerate() {
            let fg_idx = i & 15;
            let bg_idx = i >> 4;

            let mut fg_rgb = PC_TO_RGB[fg_idx & 7] & fg;
            fg_rgb |= if fg_idx & 8 == 0 { fga } else { fgh };

            let bg_rgb = match bg_idx {
                0 => 0, // default black background, assume transparent
                _ if bg_idx & 8 != 0 => (PC_TO_RGB[bg_idx & 7] & bg) | bgh,
                _ => (PC_TO_RGB[bg_idx & 7] & bg) | bga,
            };

            slot.argb_fg = fg_rgb;
            slot.argb_bg = bg_rgb;
            slot.shadow = shadow;
        }
    }
}

impl Default for ColorTable {
    fn default() -> Self {
        let mut slots = Vec::with_capacity(NAMED_COLORS + MSG_COLORS);

        slots.extend(
            DEFAULT_COLORS
                .iter()
                .map(|&(name, ansi, argb_fg, argb_bg, shadow)| ColorSlot {
                    name: RefStr::new(name),
                    ansi: RefStr::new(ansi),
                    argb_fg,
                    argb_bg,
                    shadow,
                }),
        );

        slots.extend((0..MSG_COLORS).map(|i| {
            let bright = if i & 8 == 0 { "" } else { "1;" };
            ColorSlot {
                name: RefStr::from(format!("msg{i:02x}")),
                ansi: RefStr::from(format!(
                    "{bright}3{};4{}",
                    PC_TO_ANSI[i & 7],
                    PC_TO_ANSI[(i >> 4) & 7]
                )),
                argb_fg: 0,
                argb_bg: 0,
                shadow: Shadow::Normal,
            }
        }));

        let mut table = Self(slots);
        table.set_msg_colors(MSG_COLORS_DEF_FG, MSG_COLORS_DEF_BG, MSG_COLORS_DEF_SHADOW);
        table
    }
}

/// Returns the value of an ASCII hex digit.
fn hexval(c: u8) -> u32 {
    let c = c | 0x20;
    if c.is_ascii_digit() {
        u32::from(c - b'0')
    } else {
        u32::from(c - b'a') + 10
    }
}

/// Returns the value of two ASCII hex digits.
fn hexval2(p: &[u8]) -> u32 {
    (hexval(p[0]) << 4) + hexval(p[1])
}

/// Parses an ARGB colour from the start of `input`, returning the colour and the rest of the input.
///
/// An optional leading `#` is skipped, then the run of hex digits decides the format:
///
/// | digits | format |
/// | --- | --- |
/// | 3 | `#rgb` |
/// | 4 | `#argb` |
/// | 6, 9, 12 | `#rrggbb`, `#rrrgggbbb`, `#rrrrggggbbbb` |
/// | 8, 16 | `#aarrggbb`, `#aaaarrrrggggbbbb` |
///
/// Single digits are doubled, and for wider channels only the two most significant digits count. Formats
/// without an alpha channel are opaque. Any other digit count yields [`ARGB_ERROR`].
#[must_use = "Has no effect if the result is unused"]
pub fn parse_argb_prefix(input: &[u8]) -> (u32, &[u8]) {
    let sp = input.strip_prefix(b"#").unwrap_or(input);
    let len = sp.iter().take_while(|c| c.is_ascii_hexdigit()).count();
    let (digits, rest) = sp.split_at(len);

    let argb = match len {
        3 => {
            0xff00_0000
                + ((hexval(digits[0]) * 0x11) << 16)
                + ((hexval(digits[1]) * 0x11) << 8)
                + (hexval(digits[2]) * 0x11)
        }
        4 => {
            ((hexval(digits[0]) * 0x11) << 24)
                + ((hexval(digits[1]) * 0x11) << 16)
                + ((hexval(digits[2]) * 0x11) << 8)
                + (hexval(digits[3]) * 0x11)
        }
        6 | 9 | 12 => {
            let dl = len / 3;
            0xff00_0000
                + (hexval2(digits) << 16)
                + (hexval2(&digits[dl..]) << 8)
                + hexval2(&digits[dl * 2..])
        }
        // #aaarrrgggbbb is indistinguishable from #rrrrggggbbbb, the latter is assumed
        8 | 16 => {
            let dl = len / 4;
            (hexval2(digits) << 24)
                + (hexval2(&digits[dl..]) << 16)
                + (hexval2(&digits[dl * 2..]) << 8)
                + hexval2(&digits[dl * 3..])
        }
        _ => ARGB_ERROR,
    };

    (argb, rest)
}

/// Parses an ARGB colour string, ignoring anything after the hex digits.
///
/// See [`parse_argb_prefix`] for the accepted formats.
#[must_use = "Has no effect if the result is unused"]
pub fn parse_argb(input: &str) -> u32 {
    parse_argb_prefix(input.as_bytes()).0
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_short_forms_double_each_digit() {
        assert_eq!(parse_argb("#abc"), 0xffaa_bbcc);
        assert_eq!(parse_argb("#abc"), parse_argb("#aabbcc"));
        assert_eq!(parse_argb("abc") >> 24, 0xff);
        assert_eq!(parse_argb("#8abc"), 0x88aa_bbcc);
    }

    #[test]
    fn test_long_forms() {
        assert_eq!(parse_argb("#1234ab"), 0xff12_34ab);
        assert_eq!(parse_argb("#123456789"), 0xff12_4578);
        assert_eq!(parse_argb("#1111aaaa5555"), 0xff11_aa55);
        assert_eq!(parse_argb("#801234ab"), 0x8012_34ab);
        assert_eq!(parse_argb("#8000111122223333"), 0x8011_2233);
        assert_eq!(parse_argb("#AbCdEf"), 0xffab_cdef);
    }

    #[test]
    fn test_bad_lengths() {
        assert_eq!(parse_argb("#12345"), ARGB_ERROR);
        assert_eq!(parse_argb(""), ARGB_ERROR);
        assert_eq!(parse_argb("#"), ARGB_ERROR);
        assert_eq!(parse_argb("red"), ARGB_ERROR); // no leading hex digits at all
    }

    #[test]
    fn test_prefix_returns_rest() {
        let (argb, rest) = parse_argb_prefix(b"#fff #000 std");
        assert_eq!(argb, 0xffff_ffff);
        assert_eq!(rest, b" #000 std");

        let (argb, rest) = parse_argb_prefix(b"zzz");
        assert_eq!(argb, ARGB_ERROR);
        assert_eq!(rest, b"zzz");
    }

    #[test]
    fn test_shadow_letters() {
        assert_eq!(Shadow::from_letter(b'N'), Some(Shadow::None));
        assert_eq!(Shadow::from_letter(b's'), Some(Shadow::Normal));
        assert_eq!(Shadow::from_letter(b'a'), Some(Shadow::All));
        assert_eq!(Shadow::from_letter(b'R'), Some(Shadow::Reverse));
        assert_eq!(Shadow::from_letter(b'x'), None);
        assert_eq!(Shadow::from_letter(0), None);
    }

    #[test]
    fn test_default_table() {
        let table = ColorTable::default();
        assert_eq!(table.slots().len(), NAMED_COLORS + MSG_COLORS);

        let sel = table.get("sel").expect("sel is a built in colour");
        assert_eq!(sel.ansi.as_str(), "7;37;40");
        assert_eq!(sel.shadow, Shadow::All);

        let msg = table.get("msg1f").expect("msg1f is a generated colour");
        assert_eq!(msg.ansi.as_str(), "1;37;44");
        // bright white on blue
        assert_eq!(msg.argb_fg, 0xc8ff_ffff);
        assert_eq!(msg.argb_bg, 0x8000_00ff);

        let black = table.get("msg07").expect("msg07 is a generated colour");
        assert_eq!(black.ansi.as_str(), "37;40");
        assert_eq!(black.argb_bg, 0); // transparent
    }

    #[test]
    fn test_set_msg_colors() {
        let mut table = ColorTable::default();
        table.set_msg_colors(0xff00_ff00, 0x4000_0000, Shadow::None);
        let slot = table.get("msg02").expect("msg02 is a generated colour");
        assert_eq!(slot.argb_fg, 0xff00_ff00);
        assert_eq!(slot.shadow, Shadow::None);
        // named colours are untouched
        assert_eq!(table.get("screen").map(|s| s.argb_fg), Some(0x80ff_ffff));
    }

    proptest! {
        #[test]
        fn doesnt_panic(x in any::<Vec<u8>>()) {
            let (_, rest) = parse_argb_prefix(&x);
            prop_assert!(rest.len() <= x.len());
        }

        #[test]
        fn rgb_is_opaque(r in 0u8..16, g in 0u8..16, b in 0u8..16) {
            let text = format!("#{r:x}{g:x}{b:x}");
            prop_assert_eq!(parse_argb(&text) >> 24, 0xff);
        }
    }
}
