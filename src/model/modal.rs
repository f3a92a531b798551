//! Modal stack for managing overlays
//!
//! Overlays are an enum-based stack; only the top modal receives input.

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Quit confirmation dialog
    QuitConfirm,
    /// Pick one of the workspace's existing connections
    DataSourceSelector { selected_index: usize },
    /// Pick an icon by hand
    IconPicker { selected_index: usize },
    /// A remote call failed
    Error { title: String, message: String },
    /// Help dialog showing all keyboard shortcuts
    Help { scroll_offset: usize },
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    /// Create a new empty modal stack
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    /// Push a modal onto the stack
    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    /// Pop the top modal from the stack
    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    /// Get a reference to the top modal without removing it
    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    /// Get a mutable reference to the top modal
    pub fn top_mut(&mut self) -> Option<&mut Modal> {
        self.stack.last_mut()
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Iterate from bottom to top, in draw order
    pub fn iter(&self) -> impl Iterator<Item = &Modal> {
        self.stack.iter()
    }

    /// Show an error on top of whatever is open
    pub fn push_error(&mut self, title: &str, message: impl Into<String>) {
        self.push(Modal::Error {
            title: title.to_string(),
            message: message.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        stack.push(Modal::Help { scroll_offset: 0 });

        assert_eq!(stack.pop(), Some(Modal::Help { scroll_offset: 0 }));
        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_modal_stack_top_mut() {
        let mut stack = ModalStack::new();
        stack.push(Modal::IconPicker { selected_index: 0 });

        if let Some(Modal::IconPicker { selected_index }) = stack.top_mut() {
            *selected_index = 4;
        }

        assert_eq!(stack.top(), Some(&Modal::IconPicker { selected_index: 4 }));
    }

    #[test]
    fn test_error_goes_on_top() {
        let mut stack = ModalStack::new();
        stack.push(Modal::DataSourceSelector { selected_index: 1 });
        stack.push_error("Listing tables failed", "HTTP 500");

        assert_eq!(
            stack.top(),
            Some(&Modal::Error {
                title: "Listing tables failed".to_string(),
                message: "HTTP 500".to_string(),
            })
        );
        assert_eq!(stack.iter().count(), 2);
    }
}
