//! Editable-surface adapter: uniform text I/O over the two element
//! capability variants (value-bearing fields and rich-text regions).
//!
//! The adapter knows nothing about recognition; it is the boundary through
//! which a dictation session reads and writes element text. In-memory
//! implementations are provided for tests and the demo driver.

pub mod memory;
pub mod surface;

pub use memory::{RichRegion, TextBox};
pub use surface::{
    CaretRejected, RichTextRegion, SharedSurface, Surface, SurfaceKind, ValueField,
};
