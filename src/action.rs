//! Lifecycle actions and their canonical string tokens.
//!
//! The six actions are fixed; every action has exactly one lowercase token and
//! no two actions share one. Decoding is strict: after stripping at most one
//! trailing newline or NUL, the remaining text must match a full token.

use std::fmt;
use std::str::FromStr;

use crate::types::{Error, Result};

/// Lifecycle transition announced for an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Remove,
    Change,
    Move,
    Online,
    Offline,
}

impl Action {
    /// All actions, in canonical order.
    pub const ALL: [Action; 6] = [
        Action::Add,
        Action::Remove,
        Action::Change,
        Action::Move,
        Action::Online,
        Action::Offline,
    ];

    /// Canonical wire token for this action. Total; never fails.
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Add => "add",
            Action::Remove => "remove",
            Action::Change => "change",
            Action::Move => "move",
            Action::Online => "online",
            Action::Offline => "offline",
        }
    }

    /// Decode a token, ignoring at most one trailing `'\n'` or `'\0'`.
    ///
    /// The remaining text must consume a whole canonical token; a valid prefix
    /// with trailing characters (`"addX"`) is rejected, as is empty input.
    pub fn parse(text: &str) -> Result<Action> {
        let trimmed = text
            .strip_suffix('\n')
            .or_else(|| text.strip_suffix('\0'))
            .unwrap_or(text);

        if trimmed.is_empty() {
            return Err(Error::invalid_action(text));
        }

        Action::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == trimmed)
            .ok_or_else(|| Error::invalid_action(text))
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Action> {
        Action::parse(s)
    }
}
