//! The recognizer boundary.
//!
//! A recognizer is an external capability: start and stop are non-blocking
//! requests whose effects arrive later as result/error/end notifications.
//! The trait abstracts over the real engine so tests and the demo driver
//! can use the scripted implementation.

use std::fmt;
use std::sync::{Arc, Mutex};

use dicta_core::{DictaError, Result};

/// Settings a recognizer is configured with at session start.
#[derive(Clone, Debug)]
pub struct RecognizerSettings {
    /// BCP-47 language tag.
    pub language: String,
    /// Keep listening across utterances instead of stopping after one.
    pub continuous: bool,
    /// Deliver not-yet-final results as they form.
    pub interim_results: bool,
}

impl RecognizerSettings {
    /// Dictation settings: continuous listening with interim results.
    pub fn for_language(language: &str) -> Self {
        Self {
            language: language.to_string(),
            continuous: true,
            interim_results: true,
        }
    }
}

/// Error codes a recognizer reports, consumed by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecognizerErrorCode {
    /// No speech was detected. Recoverable noise.
    NoSpeech,
    /// No audio could be captured. Recoverable noise.
    AudioCapture,
    /// The recognizer was aborted, the expected result of a programmatic stop.
    Aborted,
    /// Anything else, surfaced to the user.
    Other(String),
}

impl RecognizerErrorCode {
    /// Map a wire code ("no-speech", "audio-capture", "aborted", ...) to a
    /// variant.
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => RecognizerErrorCode::NoSpeech,
            "audio-capture" => RecognizerErrorCode::AudioCapture,
            "aborted" => RecognizerErrorCode::Aborted,
            other => RecognizerErrorCode::Other(other.to_string()),
        }
    }

    pub fn as_code(&self) -> &str {
        match self {
            RecognizerErrorCode::NoSpeech => "no-speech",
            RecognizerErrorCode::AudioCapture => "audio-capture",
            RecognizerErrorCode::Aborted => "aborted",
            RecognizerErrorCode::Other(code) => code,
        }
    }

    /// Recoverable noise: the session keeps listening.
    pub fn is_noise(&self) -> bool {
        matches!(
            self,
            RecognizerErrorCode::NoSpeech | RecognizerErrorCode::AudioCapture
        )
    }

    /// Expected termination of a programmatic stop: silent cleanup.
    pub fn is_abort(&self) -> bool {
        matches!(self, RecognizerErrorCode::Aborted)
    }
}

impl fmt::Display for RecognizerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_code())
    }
}

/// A speech recognizer bound to one session.
///
/// Both operations are fire-and-forget; outcomes arrive asynchronously as
/// [`crate::events::SessionEvent`] values. `stop` must tolerate an already
/// stopped engine.
pub trait Recognizer: Send {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
}

/// Creates a recognizer for the given settings, or fails when the
/// environment has no recognition capability.
pub type RecognizerFactory =
    Box<dyn Fn(&RecognizerSettings) -> Result<Box<dyn Recognizer>> + Send + Sync>;

/// Scripted recognizer for tests and the demo driver.
///
/// Records start/stop calls; the event stream itself is fed to the session
/// by the test or the script player. Handles are cheap clones over shared
/// state so a probe survives handing the recognizer to a session.
#[derive(Clone)]
pub struct ScriptedRecognizer {
    inner: Arc<Mutex<ScriptedState>>,
}

#[derive(Default)]
struct ScriptedState {
    running: bool,
    start_calls: u32,
    stop_calls: u32,
    fail_start: bool,
    fail_stop: bool,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(ScriptedState::default())),
        }
    }

    /// A recognizer whose start operation always fails, for the
    /// unsupported-environment path.
    pub fn failing_start() -> Self {
        let recognizer = Self::new();
        recognizer.inner.lock().expect("state mutex poisoned").fail_start = true;
        recognizer
    }

    /// A recognizer whose stop operation fails.
    pub fn failing_stop() -> Self {
        let recognizer = Self::new();
        recognizer.inner.lock().expect("state mutex poisoned").fail_stop = true;
        recognizer
    }

    pub fn is_running(&self) -> bool {
        self.inner.lock().expect("state mutex poisoned").running
    }

    pub fn start_calls(&self) -> u32 {
        self.inner.lock().expect("state mutex poisoned").start_calls
    }

    pub fn stop_calls(&self) -> u32 {
        self.inner.lock().expect("state mutex poisoned").stop_calls
    }
}

impl Default for ScriptedRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer for ScriptedRecognizer {
    fn start(&mut self) -> Result<()> {
        let mut state = self.inner.lock().expect("state mutex poisoned");
        if state.fail_start {
            return Err(DictaError::Recognizer(
                "speech recognition not supported".to_string(),
            ));
        }
        state.start_calls += 1;
        state.running = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut state = self.inner.lock().expect("state mutex poisoned");
        state.stop_calls += 1;
        if state.fail_stop {
            return Err(DictaError::Recognizer("stop rejected".to_string()));
        }
        // Stopping an already stopped engine is a no-op.
        state.running = false;
        Ok(())
    }
}
