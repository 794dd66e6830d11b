//! The closed capability variant over editable elements and the adapter
//! operations dispatched on it.

use std::sync::{Arc, Mutex};

/// Capability variant of an editable element, decided once when the element
/// is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SurfaceKind {
    /// A plain, caret-addressable text field (input, textarea).
    ValueField,
    /// A rich-text editable region.
    RichText,
}

/// Returned when a field type rejects caret placement. Callers swallow it.
#[derive(Debug)]
pub struct CaretRejected;

/// Low-level operations of a value-bearing text field.
pub trait ValueField: Send {
    fn value(&self) -> String;
    fn set_value(&mut self, text: &str);
    /// Move the caret to the given character index. Some field types reject
    /// caret placement.
    fn move_caret_to(&mut self, index: usize) -> Result<(), CaretRejected>;
    /// Synthesize the input-changed notification host listeners expect.
    fn notify_input(&mut self);
    fn focus(&mut self);
}

/// Low-level operations of a rich-text editable region.
pub trait RichTextRegion: Send {
    fn text_content(&self) -> String;
    fn set_text_content(&mut self, text: &str);
    /// Collapse the selection to the end of the content.
    fn collapse_selection_to_end(&mut self);
    /// Synthesize the input-changed notification host listeners expect.
    fn notify_input(&mut self);
    fn focus(&mut self);
}

/// An editable surface, dispatched once at this boundary.
pub enum Surface {
    Value(Box<dyn ValueField>),
    Rich(Box<dyn RichTextRegion>),
}

/// A surface shared between the session (programmatic writes) and the host
/// (user edits).
pub type SharedSurface = Arc<Mutex<Surface>>;

impl Surface {
    pub fn kind(&self) -> SurfaceKind {
        match self {
            Surface::Value(_) => SurfaceKind::ValueField,
            Surface::Rich(_) => SurfaceKind::RichText,
        }
    }

    /// Read the current text of the surface.
    pub fn text(&self) -> String {
        match self {
            Surface::Value(field) => field.value(),
            Surface::Rich(region) => region.text_content(),
        }
    }

    /// Write `text` to the surface if it differs from the current content.
    ///
    /// A changed value-bearing field gets its caret moved to end-of-text
    /// (placement failures are swallowed); a rich-text region gets its
    /// selection collapsed to the end. Any actual change synthesizes an
    /// input-changed notification so host listeners observe it as typing.
    pub fn set_text(&mut self, text: &str) {
        match self {
            Surface::Value(field) => {
                if field.value() != text {
                    field.set_value(text);
                    field.notify_input();
                    tracing::debug!(chars = text.chars().count(), "Value field updated");
                }
                let _ = field.move_caret_to(text.chars().count());
            }
            Surface::Rich(region) => {
                if region.text_content() != text {
                    region.set_text_content(text);
                    region.notify_input();
                    tracing::debug!(chars = text.chars().count(), "Rich region updated");
                }
                region.collapse_selection_to_end();
            }
        }
    }

    pub fn focus(&mut self) {
        match self {
            Surface::Value(field) => field.focus(),
            Surface::Rich(region) => region.focus(),
        }
    }
}

/// Wrap a surface for sharing between the session and the host.
pub fn shared(surface: Surface) -> SharedSurface {
    Arc::new(Mutex::new(surface))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{RichRegion, TextBox};

    #[test]
    fn test_kind_dispatch() {
        let value = Surface::Value(Box::new(TextBox::new()));
        assert_eq!(value.kind(), SurfaceKind::ValueField);

        let rich = Surface::Rich(Box::new(RichRegion::new()));
        assert_eq!(rich.kind(), SurfaceKind::RichText);
    }

    #[test]
    fn test_value_field_text_round_trip() {
        let field = TextBox::with_text("seed");
        let mut surface = Surface::Value(Box::new(field.clone()));

        assert_eq!(surface.text(), "seed");
        surface.set_text("seed and more");
        assert_eq!(surface.text(), "seed and more");
        assert_eq!(field.value(), "seed and more");
    }

    #[test]
    fn test_write_if_different_skips_notification() {
        let field = TextBox::with_text("same");
        let mut surface = Surface::Value(Box::new(field.clone()));

        surface.set_text("same");
        assert_eq!(field.input_events(), 0);

        surface.set_text("changed");
        assert_eq!(field.input_events(), 1);

        surface.set_text("changed");
        assert_eq!(field.input_events(), 1);
    }

    #[test]
    fn test_caret_moves_to_end_of_text() {
        let field = TextBox::new();
        let mut surface = Surface::Value(Box::new(field.clone()));

        surface.set_text("hello");
        assert_eq!(field.caret(), 5);
    }

    #[test]
    fn test_caret_rejection_is_swallowed() {
        let field = TextBox::rejecting_caret();
        let mut surface = Surface::Value(Box::new(field.clone()));

        // Must not panic; the write itself still lands.
        surface.set_text("hello");
        assert_eq!(field.value(), "hello");
        assert_eq!(field.caret(), 0);
    }

    #[test]
    fn test_rich_region_collapses_selection() {
        let region = RichRegion::with_text("draft");
        let mut surface = Surface::Rich(Box::new(region.clone()));

        surface.set_text("draft two");
        assert_eq!(region.text_content(), "draft two");
        assert!(region.selection_at_end());
        assert_eq!(region.input_events(), 1);
    }

    #[test]
    fn test_focus_reaches_element() {
        let field = TextBox::new();
        let mut surface = Surface::Value(Box::new(field.clone()));
        surface.focus();
        assert!(field.is_focused());
    }
}
