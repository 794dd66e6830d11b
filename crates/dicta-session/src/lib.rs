//! Dicta session crate - dictation session state machine, suppression
//! window, recognizer boundary, and the single-active-session registry.
//!
//! A session binds one recognizer to one editable surface and reconciles
//! three racing writers of the same text: asynchronous recognition results,
//! the user's own edits, and the session's programmatic writes.

pub mod control;
pub mod events;
pub mod recognizer;
pub mod registry;
pub mod session;
pub mod suppress;

pub use control::{ControlSurface, LoggingControl, RecordingControl, SharedControl};
pub use events::{
    Key, RecognitionResult, RecognitionResults, SessionEvent, UserInputEvent, UserInputKind,
};
pub use recognizer::{
    Recognizer, RecognizerErrorCode, RecognizerFactory, RecognizerSettings, ScriptedRecognizer,
};
pub use registry::SessionRegistry;
pub use session::{DictationSession, SessionPhase, DEFAULT_MAX_RESTARTS};
pub use suppress::SuppressionWindow;
