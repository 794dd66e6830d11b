//! In-memory surfaces for tests and the demo driver.
//!
//! Handles are cheap clones over shared state, so a test can keep a probe
//! while the session owns the surface.

use std::sync::{Arc, Mutex};

use crate::surface::{CaretRejected, RichTextRegion, ValueField};

/// An in-memory value-bearing text field.
#[derive(Clone)]
pub struct TextBox {
    inner: Arc<Mutex<TextBoxState>>,
}

struct TextBoxState {
    value: String,
    caret: usize,
    accepts_caret: bool,
    focused: bool,
    input_events: u32,
}

impl TextBox {
    pub fn new() -> Self {
        Self::with_text("")
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(TextBoxState {
                value: text.to_string(),
                caret: 0,
                accepts_caret: true,
                focused: false,
                input_events: 0,
            })),
        }
    }

    /// A field whose type rejects caret placement (like an email input).
    pub fn rejecting_caret() -> Self {
        let field = Self::new();
        field.inner.lock().expect("state mutex poisoned").accepts_caret = false;
        field
    }

    pub fn caret(&self) -> usize {
        self.inner.lock().expect("state mutex poisoned").caret
    }

    pub fn is_focused(&self) -> bool {
        self.inner.lock().expect("state mutex poisoned").focused
    }

    /// Number of synthesized input-changed notifications observed so far.
    pub fn input_events(&self) -> u32 {
        self.inner.lock().expect("state mutex poisoned").input_events
    }
}

impl Default for TextBox {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueField for TextBox {
    fn value(&self) -> String {
        self.inner.lock().expect("state mutex poisoned").value.clone()
    }

    fn set_value(&mut self, text: &str) {
        self.inner.lock().expect("state mutex poisoned").value = text.to_string();
    }

    fn move_caret_to(&mut self, index: usize) -> Result<(), CaretRejected> {
        let mut state = self.inner.lock().expect("state mutex poisoned");
        if !state.accepts_caret {
            return Err(CaretRejected);
        }
        state.caret = index;
        Ok(())
    }

    fn notify_input(&mut self) {
        self.inner.lock().expect("state mutex poisoned").input_events += 1;
    }

    fn focus(&mut self) {
        self.inner.lock().expect("state mutex poisoned").focused = true;
    }
}

/// An in-memory rich-text editable region.
#[derive(Clone)]
pub struct RichRegion {
    inner: Arc<Mutex<RichRegionState>>,
}

struct RichRegionState {
    content: String,
    selection_at_end: bool,
    focused: bool,
    input_events: u32,
}

impl RichRegion {
    pub fn new() -> Self {
        Self::with_text("")
    }

    pub fn with_text(text: &str) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RichRegionState {
                content: text.to_string(),
                selection_at_end: false,
                focused: false,
                input_events: 0,
            })),
        }
    }

    pub fn selection_at_end(&self) -> bool {
        self.inner.lock().expect("state mutex poisoned").selection_at_end
    }

    pub fn is_focused(&self) -> bool {
        self.inner.lock().expect("state mutex poisoned").focused
    }

    /// Number of synthesized input-changed notifications observed so far.
    pub fn input_events(&self) -> u32 {
        self.inner.lock().expect("state mutex poisoned").input_events
    }
}

impl Default for RichRegion {
    fn default() -> Self {
        Self::new()
    }
}

impl RichTextRegion for RichRegion {
    fn text_content(&self) -> String {
        self.inner.lock().expect("state mutex poisoned").content.clone()
    }

    fn set_text_content(&mut self, text: &str) {
        let mut state = self.inner.lock().expect("state mutex poisoned");
        state.content = text.to_string();
        // Replacing content leaves the selection wherever the host put it.
        state.selection_at_end = false;
    }

    fn collapse_selection_to_end(&mut self) {
        self.inner.lock().expect("state mutex poisoned").selection_at_end = true;
    }

    fn notify_input(&mut self) {
        self.inner.lock().expect("state mutex poisoned").input_events += 1;
    }

    fn focus(&mut self) {
        self.inner.lock().expect("state mutex poisoned").focused = true;
    }
}
