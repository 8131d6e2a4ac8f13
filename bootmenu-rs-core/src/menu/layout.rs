// SPDX-FileCopyrightText: 2025 some100 <ootinnyoo@outlook.com>
// SPDX-License-Identifier: MIT

//! Per-menu layout parameters, message strings and function key help.

use core::ops::{Index, IndexMut};

use crate::refstr::RefStr;

/// The amount of function key help slots (F1 to F12).
pub const FKEY_COUNT: usize = 12;

/// A named integer that controls where the presentation layer draws things.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutParam {
    /// Menu width.
    Width,

    /// Left margin.
    Margin,

    /// Margin of the password prompt.
    PasswordMargin,

    /// Amount of visible entry rows.
    Rows,

    /// Row of the tab message.
    TabMsgRow,

    /// Row of the command line editor.
    CmdlineRow,

    /// Last usable row.
    EndRow,

    /// Row of the password prompt.
    PasswordRow,

    /// Row of the timeout message.
    TimeoutRow,

    /// First row of the entry help text.
    HelpMsgRow,

    /// Last row of the entry help text.
    HelpMsgEndRow,

    /// Horizontal shift of the whole menu.
    HShift,

    /// Vertical shift of the whole menu.
    VShift,

    /// Row of the hidden menu prompt.
    HiddenRow,
}

impl LayoutParam {
    /// Every parameter, in table order.
    pub const ALL: [Self; 14] = [
        Self::Width,
        Self::Margin,
        Self::PasswordMargin,
        Self::Rows,
        Self::TabMsgRow,
        Self::CmdlineRow,
        Self::EndRow,
        Self::PasswordRow,
        Self::TimeoutRow,
        Self::HelpMsgRow,
        Self::HelpMsgEndRow,
        Self::HShift,
        Self::VShift,
        Self::HiddenRow,
    ];

    /// The directive name of the parameter.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Margin => "margin",
            Self::PasswordMargin => "passwordmargin",
            Self::Rows => "rows",
            Self::TabMsgRow => "tabmsgrow",
            Self::CmdlineRow => "cmdlinerow",
            Self::EndRow => "endrow",
            Self::PasswordRow => "passwordrow",
            Self::TimeoutRow => "timeoutrow",
            Self::HelpMsgRow => "helpmsgrow",
            Self::HelpMsgEndRow => "helpmsgendrow",
            Self::HShift => "hshift",
            Self::VShift => "vshift",
            Self::HiddenRow => "hiddenrow",
        }
    }

    /// The value of the parameter when nothing sets it.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn default_value(self) -> i32 {
        match self {
            Self::Width | Self::HShift | Self::VShift => 0,
            Self::Margin => 10,
            Self::PasswordMargin => 3,
            Self::Rows => 12,
            Self::TabMsgRow | Self::CmdlineRow => 18,
            Self::EndRow | Self::HelpMsgEndRow => -1,
            Self::PasswordRow => 11,
            Self::TimeoutRow => 20,
            Self::HelpMsgRow => 22,
            Self::HiddenRow => -2,
        }
    }
}

/// The layout parameter values of a menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LayoutParams([i32; LayoutParam::ALL.len()]);

impl Default for LayoutParams {
    fn default() -> Self {
        Self(LayoutParam::ALL.map(LayoutParam::default_value))
    }
}

impl Index<LayoutParam> for LayoutParams {
    type Output = i32;

    fn index(&self, index: LayoutParam) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl IndexMut<LayoutParam> for LayoutParams {
    fn index_mut(&mut self, index: LayoutParam) -> &mut Self::Output {
        &mut self.0[index as usize]
    }
}

/// A configurable prompt string of a menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    /// Shown while counting down to the default entry.
    Autoboot,

    /// Shown when editing the command line is allowed.
    Tab,

    /// Shown when editing the command line is not allowed.
    NoTab,

    /// Shown when asking for a password.
    PassPrompt,
}

impl MessageKind {
    /// Every message, in table order.
    pub const ALL: [Self; 4] = [Self::Autoboot, Self::Tab, Self::NoTab, Self::PassPrompt];

    /// The directive name of the message.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Autoboot => "autoboot",
            Self::Tab => "tabmsg",
            Self::NoTab => "notabmsg",
            Self::PassPrompt => "passprompt",
        }
    }

    /// The text of the message when nothing sets it.
    #[must_use = "Has no effect if the result is unused"]
    pub const fn default_text(self) -> &'static str {
        match self {
            Self::Autoboot => "Automatic boot in # second{,s}...",
            Self::Tab => "Press [Tab] to edit options",
            Self::NoTab => "",
            Self::PassPrompt => "Password required",
        }
    }
}

/// The message strings of a menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Messages([RefStr; MessageKind::ALL.len()]);

impl Default for Messages {
    fn default() -> Self {
        Self(MessageKind::ALL.map(|kind| RefStr::new(kind.default_text())))
    }
}

impl Index<MessageKind> for Messages {
    type Output = RefStr;

    fn index(&self, index: MessageKind) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl IndexMut<MessageKind> for Messages {
    fn index_mut(&mut self, index: MessageKind) -> &mut Self::Output {
        &mut self.0[index as usize]
    }
}

/// The help shown for a function key.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FkeyHelp {
    /// The file displayed when the key is pressed.
    pub textname: Option<RefStr>,

    /// The background image used while the file is displayed.
    pub background: Option<RefStr>,
}
