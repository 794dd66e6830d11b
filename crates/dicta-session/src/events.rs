//! Event variants consumed by the session state machine.
//!
//! Recognizer callbacks, host listeners, and the registry all feed the
//! session through these explicit values, so the transition logic is
//! testable without a live host or a live recognizer.

use crate::recognizer::RecognizerErrorCode;

/// One entry in a recognition event's ordered result list.
#[derive(Clone, Debug, PartialEq)]
pub struct RecognitionResult {
    pub transcript: String,
    /// Final results will not be revised; interim ones may be replaced.
    pub is_final: bool,
}

impl RecognitionResult {
    pub fn final_fragment(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            is_final: true,
        }
    }

    pub fn interim_fragment(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
            is_final: false,
        }
    }
}

/// A recognition result notification.
///
/// Results arrive in non-decreasing transcript order; `result_index` marks
/// the first entry that changed since the previous notification.
#[derive(Clone, Debug, PartialEq)]
pub struct RecognitionResults {
    pub result_index: usize,
    pub results: Vec<RecognitionResult>,
}

/// Key identity of a keydown, reduced to what the session reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// What a user input event did to the element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UserInputKind {
    /// A key was pressed while the element had focus.
    Keydown { key: Key, shifted: bool },
    /// The element's text content changed.
    TextChanged,
}

/// An input event observed on the bound element.
///
/// `trusted` distinguishes genuine user gestures from synthetic events
/// dispatched by scripts; non-trusted events are ignored unconditionally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UserInputEvent {
    pub trusted: bool,
    pub kind: UserInputKind,
}

impl UserInputEvent {
    pub fn trusted(kind: UserInputKind) -> Self {
        Self {
            trusted: true,
            kind,
        }
    }

    pub fn synthetic(kind: UserInputKind) -> Self {
        Self {
            trusted: false,
            kind,
        }
    }
}

/// Everything a session can be fed.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    /// The recognizer acknowledged its start operation.
    RecognizerStarted,
    /// An ordered batch of interim/final recognition results.
    RecognizerResult(RecognitionResults),
    /// The recognizer reported an error.
    RecognizerError(RecognizerErrorCode),
    /// The recognizer stopped delivering, solicited or not.
    RecognizerEnd,
    /// An input or keydown event on the bound element.
    UserInput(UserInputEvent),
    /// The bound element lost focus.
    Blur,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_constructors() {
        let f = RecognitionResult::final_fragment("done");
        assert!(f.is_final);
        assert_eq!(f.transcript, "done");

        let i = RecognitionResult::interim_fragment("part");
        assert!(!i.is_final);
    }

    #[test]
    fn test_input_event_constructors() {
        let typed = UserInputEvent::trusted(UserInputKind::TextChanged);
        assert!(typed.trusted);

        let scripted = UserInputEvent::synthetic(UserInputKind::TextChanged);
        assert!(!scripted.trusted);
    }
}
