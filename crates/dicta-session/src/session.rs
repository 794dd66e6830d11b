//! The dictation session state machine.
//!
//! A session owns one recognizer bound to one editable surface. It folds
//! recognition results into an accumulated text buffer, writes the merged
//! text back to the surface, and tells apart its own programmatic writes
//! from genuine user edits so the two never feed back into each other.
//!
//! Every entry point takes the current instant from the caller, so the
//! suppression window, the write-gate, and both timers behave
//! deterministically under test.

use std::fmt;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use dicta_core::{ControlState, Result, SurfaceId};
use dicta_element::SharedSurface;
use dicta_text::{combine, translate};

use crate::control::SharedControl;
use crate::events::{Key, RecognitionResults, SessionEvent, UserInputEvent, UserInputKind};
use crate::recognizer::{Recognizer, RecognizerErrorCode};
use crate::suppress::SuppressionWindow;

/// Debounce for surface writes triggered by interim results.
const INTERIM_WRITE_DEBOUNCE: Duration = Duration::from_millis(100);

/// Window after a programmatic write during which all input notifications
/// on the element are disregarded. Content-editable hosts may emit
/// supplementary events between the mutation and the host settling.
const SUPPRESSION_WINDOW: Duration = Duration::from_millis(150);

/// Input-change notifications this close to a programmatic write are taken
/// to be echoes of it, not user edits.
const PROGRAMMATIC_WRITE_GATE: Duration = Duration::from_millis(500);

/// Delay before restarting a recognizer that terminated unsolicited.
const RESTART_DELAY: Duration = Duration::from_millis(100);

/// Cap on automatic restarts per session.
pub const DEFAULT_MAX_RESTARTS: u32 = 50;

/// Lifecycle phase of a dictation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    /// Constructed, not started.
    Idle,
    /// Start requested, waiting for the recognizer's acknowledgment.
    Starting,
    /// Receiving recognition results.
    Listening,
    /// Recognizer terminated unsolicited; a restart is pending.
    Restarting,
    /// Stop requested, waiting for the recognizer's end notification.
    Stopping,
    /// Cleanup ran; the session is finished.
    Closed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionPhase::Idle => write!(f, "Idle"),
            SessionPhase::Starting => write!(f, "Starting"),
            SessionPhase::Listening => write!(f, "Listening"),
            SessionPhase::Restarting => write!(f, "Restarting"),
            SessionPhase::Stopping => write!(f, "Stopping"),
            SessionPhase::Closed => write!(f, "Closed"),
        }
    }
}

impl SessionPhase {
    /// Returns whether a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: &SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            (Idle, Starting)
                | (Starting, Listening)
                | (Starting, Stopping)
                | (Starting, Closed)
                | (Listening, Restarting)
                | (Restarting, Listening)
                | (Listening, Stopping)
                | (Restarting, Stopping)
                | (Listening, Closed)
                | (Restarting, Closed)
                | (Stopping, Closed)
        )
    }
}

/// One live dictation session: a recognizer bound to an editable surface.
pub struct DictationSession {
    id: Uuid,
    surface_id: SurfaceId,
    started_at: DateTime<Utc>,
    surface: SharedSurface,
    control: SharedControl,
    recognizer: Box<dyn Recognizer>,
    language: String,

    phase: SessionPhase,
    /// True from start until a terminal stop is requested.
    is_active: bool,
    /// Whether the element listeners are currently attached.
    listeners_attached: bool,

    /// Base text plus everything finalized so far. Never contains the
    /// current interim fragment.
    accumulated_text: String,
    /// The latest not-yet-final fragment; replaced wholesale per event.
    current_interim: String,

    suppression: SuppressionWindow,
    last_programmatic_write: Option<Instant>,

    restart_attempts: u32,
    max_restarts: u32,

    /// Pending debounced surface write.
    write_due: Option<Instant>,
    /// Pending recognizer restart.
    restart_due: Option<Instant>,

    surfaced_error: Option<String>,
}

impl DictationSession {
    pub fn new(
        surface_id: SurfaceId,
        surface: SharedSurface,
        control: SharedControl,
        recognizer: Box<dyn Recognizer>,
        language: String,
        max_restarts: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            surface_id,
            started_at: Utc::now(),
            surface,
            control,
            recognizer,
            language,
            phase: SessionPhase::Idle,
            is_active: false,
            listeners_attached: false,
            accumulated_text: String::new(),
            current_interim: String::new(),
            suppression: SuppressionWindow::new(),
            last_programmatic_write: None,
            restart_attempts: 0,
            max_restarts,
            write_due: None,
            restart_due: None,
            surfaced_error: None,
        }
    }

    /// Start the session: capture the element's current text as the base,
    /// start the recognizer, attach listeners, and show the recording
    /// state.
    ///
    /// On failure the error is surfaced on the control, no listeners are
    /// attached, and the session closes.
    pub fn start(&mut self) -> Result<()> {
        if self.is_active {
            return Ok(());
        }

        self.set_phase(SessionPhase::Starting);
        self.is_active = true;
        self.restart_attempts = 0;
        self.current_interim.clear();

        {
            let mut surface = self.surface.lock().expect("surface mutex poisoned");
            self.accumulated_text = surface.text();
            surface.focus();
        }

        match self.recognizer.start() {
            Ok(()) => {
                self.listeners_attached = true;
                self.last_programmatic_write = None;
                self.suppression.clear();
                self.set_control(ControlState::Recording);
                tracing::info!(
                    session_id = %self.id,
                    surface_id = %self.surface_id,
                    base_chars = self.accumulated_text.chars().count(),
                    "Dictation session started"
                );
                Ok(())
            }
            Err(e) => {
                let message = e.to_string();
                tracing::warn!(session_id = %self.id, error = %message, "Failed to start recognizer");
                self.is_active = false;
                self.surfaced_error = Some(message.clone());
                self.set_control(ControlState::Error(message));
                self.set_phase(SessionPhase::Closed);
                Err(e)
            }
        }
    }

    /// Request a terminal stop.
    ///
    /// Safe to call at any time and any number of times. Cleanup is
    /// deferred to the recognizer's end notification so trailing results
    /// are not lost; if the stop call itself fails, cleanup runs directly.
    pub fn request_stop(&mut self, now: Instant) {
        if !self.is_active {
            return;
        }

        tracing::info!(session_id = %self.id, "Stopping dictation");
        self.is_active = false;
        self.set_phase(SessionPhase::Stopping);
        self.set_control(ControlState::Processing);

        if let Err(e) = self.recognizer.stop() {
            tracing::warn!(session_id = %self.id, error = %e, "Recognizer stop failed");
            self.cleanup(now, None);
        }
    }

    /// Feed one event into the state machine.
    pub fn handle_event(&mut self, event: SessionEvent, now: Instant) {
        match event {
            SessionEvent::RecognizerStarted => self.handle_recognizer_started(),
            SessionEvent::RecognizerResult(results) => self.handle_result(results, now),
            SessionEvent::RecognizerError(code) => self.handle_error(code, now),
            SessionEvent::RecognizerEnd => self.handle_end(now),
            SessionEvent::UserInput(input) => self.handle_user_input(input, now),
            SessionEvent::Blur => self.handle_blur(now),
        }
    }

    /// Fire any timer whose deadline has passed.
    pub fn on_tick(&mut self, now: Instant) {
        if self.write_due.is_some_and(|due| now >= due) {
            self.write_due = None;
            if self.is_active {
                self.write_display_text(now);
            }
        }

        if self.restart_due.is_some_and(|due| now >= due) {
            self.restart_due = None;
            if self.is_active {
                match self.recognizer.start() {
                    Ok(()) => {
                        tracing::debug!(
                            session_id = %self.id,
                            attempt = self.restart_attempts,
                            "Recognizer restarted"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(session_id = %self.id, error = %e, "Failed to restart recognizer");
                        self.cleanup(now, None);
                    }
                }
            }
        }
    }

    /// The earliest pending timer deadline, if any.
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.write_due, self.restart_due) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    fn handle_recognizer_started(&mut self) {
        if !self.is_active {
            return;
        }
        self.set_phase(SessionPhase::Listening);
        self.set_control(ControlState::Recording);
    }

    fn handle_result(&mut self, event: RecognitionResults, now: Instant) {
        if !self.is_active {
            return;
        }

        let mut final_text = String::new();
        let mut interim_text = String::new();
        let mut has_final = false;

        for result in event.results.iter().skip(event.result_index) {
            if result.is_final {
                final_text.push_str(&result.transcript);
                has_final = true;
            } else {
                interim_text.push_str(&result.transcript);
            }
        }

        if !final_text.is_empty() {
            final_text = translate(&final_text, &self.language);
        }
        if !interim_text.is_empty() {
            interim_text = translate(&interim_text, &self.language);
        }

        if has_final && !final_text.is_empty() {
            self.accumulated_text = combine(&self.accumulated_text, &final_text, "");
            tracing::debug!(
                session_id = %self.id,
                total_chars = self.accumulated_text.chars().count(),
                "Final fragment accumulated"
            );
        }

        // The interim is replaced wholesale, never appended.
        self.current_interim = interim_text;

        self.write_due = None;
        if has_final {
            self.write_display_text(now);
        } else {
            self.write_due = Some(now + INTERIM_WRITE_DEBOUNCE);
        }
    }

    fn handle_user_input(&mut self, input: UserInputEvent, now: Instant) {
        if !self.listeners_attached {
            return;
        }
        if self.suppression.is_suppressed(now) {
            return;
        }
        // Programmatic events from other scripts are never a reason to stop.
        if !input.trusted {
            return;
        }

        match input.kind {
            UserInputKind::Keydown {
                key: Key::Enter,
                shifted: false,
            } => {
                tracing::debug!(session_id = %self.id, "User pressed Enter - stopping");
                self.request_stop(now);
            }
            UserInputKind::Keydown { .. } => {}
            UserInputKind::TextChanged => {
                if self
                    .last_programmatic_write
                    .is_some_and(|last| now.duration_since(last) < PROGRAMMATIC_WRITE_GATE)
                {
                    tracing::debug!(
                        session_id = %self.id,
                        "Ignoring input event - recent programmatic write"
                    );
                    return;
                }

                let current = self.surface.lock().expect("surface mutex poisoned").text();
                let expected = combine(&self.accumulated_text, "", &self.current_interim);
                if current != expected {
                    tracing::debug!(session_id = %self.id, "User edited element - stopping");
                    self.request_stop(now);
                }
            }
        }
    }

    fn handle_blur(&mut self, now: Instant) {
        if !self.listeners_attached {
            return;
        }
        if self.suppression.is_suppressed(now) {
            return;
        }
        tracing::debug!(session_id = %self.id, "Element lost focus - stopping");
        self.request_stop(now);
    }

    fn handle_end(&mut self, now: Instant) {
        if self.phase == SessionPhase::Closed {
            return;
        }

        if !self.is_active {
            // The expected end of a requested stop.
            self.cleanup(now, None);
            return;
        }

        // Unsolicited termination: restart until the cap.
        if self.restart_attempts >= self.max_restarts {
            tracing::warn!(session_id = %self.id, "Restart cap reached");
            self.cleanup(now, None);
            return;
        }

        self.restart_attempts += 1;
        self.current_interim.clear();
        if self.phase == SessionPhase::Listening {
            self.set_phase(SessionPhase::Restarting);
        }
        self.restart_due = Some(now + RESTART_DELAY);
        tracing::debug!(
            session_id = %self.id,
            attempt = self.restart_attempts,
            "Recognizer ended unsolicited, restart scheduled"
        );
    }

    fn handle_error(&mut self, code: RecognizerErrorCode, now: Instant) {
        if self.phase == SessionPhase::Closed {
            return;
        }

        if code.is_noise() {
            tracing::debug!(session_id = %self.id, code = %code, "Ignoring recoverable recognizer error");
            return;
        }

        if code.is_abort() {
            self.cleanup(now, None);
            return;
        }

        tracing::warn!(session_id = %self.id, code = %code, "Recognizer error");
        self.cleanup(now, Some(format!("Recognition error: {}", code)));
    }

    /// Tear the session down: cancel timers, detach listeners, fold any
    /// pending interim into the final write so no spoken content is
    /// dropped, and settle the control.
    fn cleanup(&mut self, now: Instant, error: Option<String>) {
        if self.phase == SessionPhase::Closed {
            return;
        }

        self.is_active = false;
        self.write_due = None;
        self.restart_due = None;
        self.listeners_attached = false;

        let final_text = combine(&self.accumulated_text, &self.current_interim, "");
        self.current_interim.clear();

        self.last_programmatic_write = Some(now);
        self.surface
            .lock()
            .expect("surface mutex poisoned")
            .set_text(&final_text);
        self.accumulated_text = final_text;

        match error {
            Some(message) => {
                self.surfaced_error = Some(message.clone());
                self.set_control(ControlState::Error(message));
            }
            None => self.set_control(ControlState::Idle),
        }

        self.set_phase(SessionPhase::Closed);
        tracing::info!(
            session_id = %self.id,
            final_chars = self.accumulated_text.chars().count(),
            elapsed_secs = self.elapsed_secs(),
            "Dictation session closed"
        );
    }

    /// Merge the accumulated text with the live interim and push it to the
    /// surface, marking the write so it is not mistaken for a user edit.
    fn write_display_text(&mut self, now: Instant) {
        let text = combine(&self.accumulated_text, "", &self.current_interim);
        self.last_programmatic_write = Some(now);
        self.suppression.arm(now, SUPPRESSION_WINDOW);
        self.surface
            .lock()
            .expect("surface mutex poisoned")
            .set_text(&text);
    }

    fn set_control(&mut self, state: ControlState) {
        self.control
            .lock()
            .expect("control mutex poisoned")
            .set_state(state);
    }

    fn set_phase(&mut self, next: SessionPhase) {
        if self.phase != next {
            tracing::debug!(session_id = %self.id, "Session phase: {} -> {}", self.phase, next);
            self.phase = next;
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.surface_id
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn is_closed(&self) -> bool {
        self.phase == SessionPhase::Closed
    }

    pub fn restart_attempts(&self) -> u32 {
        self.restart_attempts
    }

    pub fn accumulated_text(&self) -> &str {
        &self.accumulated_text
    }

    pub fn current_interim(&self) -> &str {
        &self.current_interim
    }

    /// The error message surfaced on the control, if the session ended in
    /// one. The registry uses this to schedule the idle revert.
    pub fn surfaced_error(&self) -> Option<&str> {
        self.surfaced_error.as_deref()
    }

    /// Returns the elapsed duration of this session in seconds.
    pub fn elapsed_secs(&self) -> f32 {
        let elapsed = Utc::now() - self.started_at;
        elapsed.num_milliseconds() as f32 / 1000.0
    }
}

impl fmt::Debug for DictationSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DictationSession")
            .field("id", &self.id)
            .field("surface_id", &self.surface_id)
            .field("phase", &self.phase)
            .field("is_active", &self.is_active)
            .field("restart_attempts", &self.restart_attempts)
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
