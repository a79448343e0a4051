//! Role table for RACI data cells.
//!
//! The table is fixed and ordered. Index 0 is the blank role, which is also
//! what any unrecognized text maps to for styling and cycling. The literal
//! text of a cell is never rewritten by a lookup.

use serde::{Deserialize, Serialize};

/// Role labels in cycle order.
pub const ROLE_LABELS: [&str; 5] = ["", "Responsible", "Accountable", "Consulted", "Informed"];

/// Style identifiers, paired 1:1 with [`ROLE_LABELS`].
pub const ROLE_STYLES: [&str; 5] = ["secondary", "danger", "warning", "info", "success"];

/// Number of roles in the table (including blank).
pub const ROLE_COUNT: usize = ROLE_LABELS.len();

/// A role a data cell can hold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Blank,
    Responsible,
    Accountable,
    Consulted,
    Informed,
}

impl Role {
    /// All roles in table order.
    pub const ALL: [Role; ROLE_COUNT] = [
        Role::Blank,
        Role::Responsible,
        Role::Accountable,
        Role::Consulted,
        Role::Informed,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Role> {
        Self::ALL.get(index).copied()
    }

    /// Exact-match lookup. Returns `None` for text outside the table.
    pub fn from_label(label: &str) -> Option<Role> {
        ROLE_LABELS
            .iter()
            .position(|l| *l == label)
            .and_then(Role::from_index)
    }

    /// Lookup that folds unrecognized text into [`Role::Blank`].
    pub fn matched(value: &str) -> Role {
        Self::from_label(value).unwrap_or_default()
    }

    pub fn label(self) -> &'static str {
        ROLE_LABELS[self.index()]
    }

    pub fn style(self) -> &'static str {
        ROLE_STYLES[self.index()]
    }

    /// Next role in the table, wrapping after the last one.
    pub fn next(self) -> Role {
        Self::ALL[(self.index() + 1) % ROLE_COUNT]
    }

    /// Roles that carry a color rule in exports (everything but blank).
    pub fn assignable() -> impl Iterator<Item = Role> {
        Self::ALL.into_iter().filter(|r| *r != Role::Blank)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Role index of a cell value (0 when the text is not a role label).
pub fn role_index(value: &str) -> usize {
    Role::matched(value).index()
}

/// Style id used to render a cell value.
pub fn style_for(value: &str) -> &'static str {
    Role::matched(value).style()
}

/// Role a data cell advances to when activated.
///
/// Unrecognized text counts as blank, so it advances to `Responsible`.
pub fn cycle(value: &str) -> Role {
    Role::matched(value).next()
}
