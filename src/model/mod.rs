//! Model layer - centralized state management
//!
//! This module contains all state-related types:
//! - `Catalog` / `NestedCatalog` - what a connection can see
//! - `SelectionState` - tree selection and expansion
//! - `IconSuggestion` - icon shown for the selected table
//! - `TableCreationDraft` - the form submitted at the end
//! - `ImportWorkflow` - ties the above together
//! - `ModalStack` - Modal overlay management

pub mod catalog;
pub mod connection;
pub mod draft;
pub mod icon;
pub mod modal;
pub mod selection;
pub mod ui;
pub mod workflow;

// Re-export commonly used types
pub use catalog::{Catalog, NestedCatalog, TablePreviewItem};
pub use connection::{ConnectionDraft, DataSource, WarehouseKind};
pub use draft::{DraftError, NewTable};
pub use icon::IconOutcome;
pub use selection::SelectionState;
pub use workflow::{
    CatalogSource, CatalogStatus, ImportWorkflow, SubmissionPlan, WorkflowCapabilities,
    WorkflowEffect,
};
