//! Table icons and the suggestion state shown next to a selected table
//!
//! Icons are a static name → glyph table. The suggestion keeps the icon and
//! its accent color as separate fields; they are combined only when drawn.

use crate::theme::{DEFAULT_ICON_COLOR, ICON_PALETTE};
use rand::seq::IndexedRandom;
use rand::Rng;
use regex::Regex;
use std::sync::LazyLock;

/// Name forced when a suggestion does not arrive in time
pub const FALLBACK_ICON_NAME: &str = "Table";

/// A named glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Icon {
    pub name: &'static str,
    pub glyph: &'static str,
}

/// Every icon the suggestion service may name
pub const ICON_CATALOG: &[Icon] = &[
    Icon { name: "Table", glyph: "▦" },
    Icon { name: "Users", glyph: "👥" },
    Icon { name: "User", glyph: "👤" },
    Icon { name: "ShoppingCart", glyph: "🛒" },
    Icon { name: "Package", glyph: "📦" },
    Icon { name: "CreditCard", glyph: "💳" },
    Icon { name: "DollarSign", glyph: "$" },
    Icon { name: "Receipt", glyph: "🧾" },
    Icon { name: "Calendar", glyph: "📅" },
    Icon { name: "Clock", glyph: "🕒" },
    Icon { name: "Mail", glyph: "✉" },
    Icon { name: "MessageSquare", glyph: "💬" },
    Icon { name: "Phone", glyph: "☎" },
    Icon { name: "MapPin", glyph: "📍" },
    Icon { name: "Globe", glyph: "🌐" },
    Icon { name: "Truck", glyph: "🚚" },
    Icon { name: "Building", glyph: "🏢" },
    Icon { name: "Briefcase", glyph: "💼" },
    Icon { name: "FileText", glyph: "📄" },
    Icon { name: "Folder", glyph: "📁" },
    Icon { name: "Image", glyph: "🖼" },
    Icon { name: "BarChart", glyph: "📊" },
    Icon { name: "TrendingUp", glyph: "📈" },
    Icon { name: "Activity", glyph: "〜" },
    Icon { name: "Tag", glyph: "🏷" },
    Icon { name: "Star", glyph: "★" },
    Icon { name: "Heart", glyph: "♥" },
    Icon { name: "Bell", glyph: "🔔" },
    Icon { name: "Lock", glyph: "🔒" },
    Icon { name: "Key", glyph: "🔑" },
    Icon { name: "Settings", glyph: "⚙" },
    Icon { name: "Database", glyph: "🛢" },
    Icon { name: "Server", glyph: "🖥" },
    Icon { name: "Code", glyph: "</>" },
    Icon { name: "Bug", glyph: "🐞" },
    Icon { name: "Book", glyph: "📖" },
    Icon { name: "GraduationCap", glyph: "🎓" },
    Icon { name: "Music", glyph: "♫" },
    Icon { name: "Film", glyph: "🎞" },
    Icon { name: "Car", glyph: "🚗" },
    Icon { name: "Plane", glyph: "✈" },
    Icon { name: "Home", glyph: "🏠" },
    Icon { name: "Store", glyph: "🏬" },
    Icon { name: "Gift", glyph: "🎁" },
    Icon { name: "Ticket", glyph: "🎟" },
    Icon { name: "Link", glyph: "🔗" },
    Icon { name: "List", glyph: "☰" },
];

static NON_ALPHANUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9]").expect("static pattern"));

/// Strip every character that cannot appear in an icon name
pub fn normalize_icon_name(raw: &str) -> String {
    NON_ALPHANUMERIC.replace_all(raw, "").to_string()
}

pub fn lookup_icon(name: &str) -> Option<&'static Icon> {
    ICON_CATALOG.iter().find(|icon| icon.name == name)
}

/// The icon used whenever a name is unknown
pub fn default_icon() -> &'static Icon {
    &ICON_CATALOG[0]
}

/// Pick one accent color uniformly from the palette
pub fn random_accent<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    ICON_PALETTE.choose(rng).copied().unwrap_or(DEFAULT_ICON_COLOR)
}

/// How a suggestion request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconOutcome {
    /// The service answered with a best match (raw, not yet normalized)
    Resolved(String),
    /// The deadline passed first
    TimedOut,
    /// The request failed
    Failed(String),
}

/// Icon shown for the selected table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSuggestion {
    pub is_loading: bool,
    pub suggested_icon_name: Option<String>,
    pub icon: &'static Icon,
    pub color: &'static str,
}

impl Default for IconSuggestion {
    fn default() -> Self {
        Self {
            is_loading: false,
            suggested_icon_name: None,
            icon: default_icon(),
            color: DEFAULT_ICON_COLOR,
        }
    }
}

impl IconSuggestion {
    /// Mark a request as in flight
    pub fn begin(&mut self) {
        self.is_loading = true;
    }

    /// Stop waiting without changing the displayed icon
    pub fn cancel(&mut self) {
        self.is_loading = false;
    }

    /// Apply a finished request. Returns the failure message, if any.
    pub fn apply<R: Rng + ?Sized>(&mut self, outcome: IconOutcome, rng: &mut R) -> Option<String> {
        match outcome {
            IconOutcome::Resolved(raw) => {
                let name = normalize_icon_name(&raw);
                let icon = lookup_icon(&name).unwrap_or_else(default_icon);
                *self = Self {
                    is_loading: false,
                    suggested_icon_name: Some(icon.name.to_string()),
                    icon,
                    color: random_accent(rng),
                };
                None
            }
            IconOutcome::TimedOut => {
                self.fall_back();
                None
            }
            IconOutcome::Failed(message) => {
                self.is_loading = false;
                Some(message)
            }
        }
    }

    /// Settle on the fallback icon, keeping the current color
    pub fn fall_back(&mut self) {
        *self = Self {
            is_loading: false,
            suggested_icon_name: Some(FALLBACK_ICON_NAME.to_string()),
            icon: default_icon(),
            color: self.color,
        };
    }

    /// Use an icon picked by hand
    pub fn choose(&mut self, icon: &'static Icon, color: &'static str) {
        *self = Self {
            is_loading: false,
            suggested_icon_name: Some(icon.name.to_string()),
            icon,
            color,
        };
    }
}
