//! Sub-pages of the "use" help page and their query selectors.

use serde::{Deserialize, Serialize};

/// Value of the `p` query parameter that selects the "use" page.
pub const USE_PAGE: &str = "use.htm";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKey {
    #[default]
    First,
    Costs,
    Operations,
    Sync,
}

impl PageKey {
    /// Sidebar order.
    pub const ALL: [PageKey; 4] = [
        PageKey::First,
        PageKey::Costs,
        PageKey::Operations,
        PageKey::Sync,
    ];

    /// Resolves the `s` query parameter. Only exact whitelist matches are
    /// recognized; anything else, including a missing value, is `First`.
    pub fn from_selector(selector: Option<&str>) -> Self {
        selector
            .and_then(|s| Self::ALL.into_iter().find(|key| key.selector() == s))
            .unwrap_or_default()
    }

    pub fn selector(self) -> &'static str {
        match self {
            PageKey::First => "first.htm",
            PageKey::Costs => "costs.htm",
            PageKey::Operations => "operations.htm",
            PageKey::Sync => "sync.htm",
        }
    }

    pub fn template_name(self) -> &'static str {
        match self {
            PageKey::First => "first",
            PageKey::Costs => "costs",
            PageKey::Operations => "operations",
            PageKey::Sync => "sync",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PageKey::First => "Premier lancement",
            PageKey::Costs => "Charges/Revenus",
            PageKey::Operations => "Operations",
            PageKey::Sync => "Synchronisation",
        }
    }

    /// Link target of the sidebar entry, relative to the current page.
    pub fn href(self) -> String {
        format!("?p={USE_PAGE}&s={}", self.selector())
    }
}

#[cfg(test)]
#[path = "tests/pages_tests.rs"]
mod tests;
