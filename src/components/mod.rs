//! UI Components
//!
//! Each component encapsulates its own state, event handling, and rendering logic.
//! Components communicate through Actions rather than direct state mutation.

pub mod browse;
pub mod catalog_tree;
pub mod connection_form;
pub mod data_source_selector;
pub mod error_dialog;
pub mod help_dialog;
pub mod icon_picker;
pub mod layout;
pub mod preview;
pub mod quit_dialog;

pub use browse::{draw_browse_screen, BrowseComponent, BrowseRenderContext};
pub use connection_form::ConnectionForm;
pub use data_source_selector::DataSourceSelector;
pub use error_dialog::ErrorDialog;
pub use help_dialog::HelpDialog;
pub use icon_picker::IconPicker;
pub use layout::{calculate_browse_layout, centered_popup};
pub use quit_dialog::QuitDialog;
