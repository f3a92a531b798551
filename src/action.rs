//! Action enum - All possible application actions
//!
//! Actions are discrete operations that the application can perform.
//! Components emit Actions in response to events, and the App processes
//! them to update state.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick for polling background tasks
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Force quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────
    /// Move to next row
    NextItem,
    /// Move to previous row
    PrevItem,
    /// Jump to first row
    FirstItem,
    /// Jump to last row
    LastItem,
    /// Expand/collapse the row under the cursor, or click the table
    ActivateRow,
    /// Move focus between the tree and the display name field
    FocusNext,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Open the list of existing connections
    OpenDataSourceSelector,
    /// Open the manual icon picker
    OpenIconPicker,
    /// Close the current modal
    CloseModal,
    /// Confirm the current modal action
    ConfirmModal,
    /// Navigate up in modal
    ModalUp,
    /// Navigate down in modal
    ModalDown,

    // ─────────────────────────────────────────────────────────────────────────
    // Connection form
    // ─────────────────────────────────────────────────────────────────────────
    /// Connection fields are filled in; list the tables they can see
    TestConnection,
    /// Reload the tables of the current source
    RefreshCatalog,
    /// Go back to the connection form
    EditConnection,

    // ─────────────────────────────────────────────────────────────────────────
    // Display name
    // ─────────────────────────────────────────────────────────────────────────
    /// Add character to the display name
    NameInput(char),
    /// Remove last character from the display name
    NameBackspace,

    // ─────────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────────
    /// Validate the draft and create the table
    Submit,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextItem => write!(f, "NextItem"),
            Action::PrevItem => write!(f, "PrevItem"),
            Action::FirstItem => write!(f, "FirstItem"),
            Action::LastItem => write!(f, "LastItem"),
            Action::ActivateRow => write!(f, "ActivateRow"),
            Action::FocusNext => write!(f, "FocusNext"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::OpenDataSourceSelector => write!(f, "OpenDataSourceSelector"),
            Action::OpenIconPicker => write!(f, "OpenIconPicker"),
            Action::CloseModal => write!(f, "CloseModal"),
            Action::ConfirmModal => write!(f, "ConfirmModal"),
            Action::ModalUp => write!(f, "ModalUp"),
            Action::ModalDown => write!(f, "ModalDown"),
            Action::TestConnection => write!(f, "TestConnection"),
            Action::RefreshCatalog => write!(f, "RefreshCatalog"),
            Action::EditConnection => write!(f, "EditConnection"),
            Action::NameInput(c) => write!(f, "NameInput('{}')", c),
            Action::NameBackspace => write!(f, "NameBackspace"),
            Action::Submit => write!(f, "Submit"),
        }
    }
}
