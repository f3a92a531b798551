//! UI state - presentation state separate from domain data

/// Main application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Entering warehouse credentials
    Connect,
    /// Browsing the catalog and naming the table
    Browse,
}

/// Which pane of the browse screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Tree,
    DisplayName,
}

impl Focus {
    pub fn toggle(&self) -> Focus {
        match self {
            Focus::Tree => Focus::DisplayName,
            Focus::DisplayName => Focus::Tree,
        }
    }
}
