//! The session registry: at most one active dictation session
//! process-wide.
//!
//! The registry owns the optional active session explicitly, so the
//! stop-before-start invariant is an operation rather than a convention.
//! Sessions whose stop is still waiting on the recognizer's end
//! notification drain here until they close, so trailing results keep a
//! target.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use uuid::Uuid;

use dicta_core::{ControlState, DictaError, DictationConfig, ElementKind, Result, SurfaceId};
use dicta_element::SharedSurface;

use crate::control::SharedControl;
use crate::events::{SessionEvent, UserInputEvent};
use crate::recognizer::{RecognizerFactory, RecognizerSettings};
use crate::session::{DictationSession, DEFAULT_MAX_RESTARTS};

/// How long an error state stays on a control before reverting to idle.
const ERROR_DISPLAY: Duration = Duration::from_secs(3);

struct AttachedElement {
    kind: ElementKind,
    surface: SharedSurface,
    control: SharedControl,
}

/// Routes control clicks and element events, enforcing the
/// single-active-session invariant.
pub struct SessionRegistry {
    config: DictationConfig,
    hostname: String,
    recognizer_factory: RecognizerFactory,
    elements: HashMap<SurfaceId, AttachedElement>,
    active: Option<DictationSession>,
    /// Stopped sessions still waiting for their recognizer's end
    /// notification.
    draining: Vec<DictationSession>,
    /// Controls showing an error, with the instant they revert to idle.
    error_reverts: Vec<(SurfaceId, Instant)>,
}

impl SessionRegistry {
    /// Create a registry for one page, with an immutable config snapshot.
    pub fn new(config: DictationConfig, hostname: &str, recognizer_factory: RecognizerFactory) -> Self {
        Self {
            config,
            hostname: hostname.to_string(),
            recognizer_factory,
            elements: HashMap::new(),
            active: None,
            draining: Vec::new(),
            error_reverts: Vec::new(),
        }
    }

    /// Track an eligible element. Called by the discovery collaborator when
    /// a field becomes eligible; refuses elements the configuration
    /// excludes. Attaching an already tracked element is a no-op.
    pub fn attach(
        &mut self,
        id: SurfaceId,
        kind: ElementKind,
        surface: SharedSurface,
        control: SharedControl,
    ) -> Result<()> {
        if !self.config.enabled {
            return Err(DictaError::Eligibility("dictation is disabled".to_string()));
        }
        if !self.config.site_allowed(&self.hostname) {
            return Err(DictaError::Eligibility(format!(
                "site '{}' is not in the allow-list",
                self.hostname
            )));
        }
        if !self.config.kind_eligible(&kind) {
            return Err(DictaError::Eligibility(format!(
                "element kind {:?} is not enabled",
                kind
            )));
        }

        if self.elements.contains_key(&id) {
            return Ok(());
        }

        tracing::debug!(surface_id = %id, kind = ?kind, "Element attached");
        self.elements.insert(
            id,
            AttachedElement {
                kind,
                surface,
                control,
            },
        );
        Ok(())
    }

    /// Stop tracking an element. Any session bound to it is stopped first
    /// so no orphaned recognizer keeps writing into a detached reference.
    pub fn detach(&mut self, id: SurfaceId, now: Instant) {
        if self.active.as_ref().is_some_and(|s| s.surface_id() == id) {
            self.stop_active(now);
        }
        if self.elements.remove(&id).is_some() {
            tracing::debug!(surface_id = %id, "Element detached");
        }
        self.error_reverts.retain(|(rid, _)| *rid != id);
        self.reap(now);
    }

    /// Handle a click on an element's control: toggle the active session
    /// off if it is bound to this element, otherwise stop whatever is
    /// running and start a session here.
    pub fn toggle(&mut self, id: SurfaceId, now: Instant) -> Result<()> {
        if !self.elements.contains_key(&id) {
            return Err(DictaError::Session(format!("unknown element {}", id)));
        }

        if self.active.as_ref().is_some_and(|s| s.surface_id() == id) {
            self.stop_active(now);
            self.reap(now);
            return Ok(());
        }

        // A session on a different element stops before the new one starts.
        if self.active.is_some() {
            self.stop_active(now);
        }

        let (surface, control) = {
            let element = self.elements.get(&id).expect("element checked above");
            (element.surface.clone(), element.control.clone())
        };

        let settings = RecognizerSettings::for_language(&self.config.language);
        let recognizer = match (self.recognizer_factory)(&settings) {
            Ok(recognizer) => recognizer,
            Err(e) => {
                // Unsupported environment: no session is created.
                let message = e.to_string();
                tracing::warn!(surface_id = %id, error = %message, "No recognition capability");
                control
                    .lock()
                    .expect("control mutex poisoned")
                    .set_state(ControlState::Error(message));
                self.error_reverts.push((id, now + ERROR_DISPLAY));
                return Err(e);
            }
        };

        let mut session = DictationSession::new(
            id,
            surface,
            control,
            recognizer,
            self.config.language.clone(),
            DEFAULT_MAX_RESTARTS,
        );

        match session.start() {
            Ok(()) => {
                self.active = Some(session);
                self.reap(now);
                Ok(())
            }
            Err(e) => {
                self.error_reverts.push((id, now + ERROR_DISPLAY));
                Err(e)
            }
        }
    }

    /// Route a recognizer notification to the session it belongs to.
    pub fn handle_recognizer_event(&mut self, session_id: Uuid, event: SessionEvent, now: Instant) {
        if let Some(session) = self
            .active
            .iter_mut()
            .chain(self.draining.iter_mut())
            .find(|s| s.id() == session_id)
        {
            session.handle_event(event, now);
        }
        self.reap(now);
    }

    /// Route an input/keydown event observed on an element.
    pub fn handle_user_input(&mut self, id: SurfaceId, event: UserInputEvent, now: Instant) {
        for session in self
            .active
            .iter_mut()
            .chain(self.draining.iter_mut())
            .filter(|s| s.surface_id() == id)
        {
            session.handle_event(SessionEvent::UserInput(event), now);
        }
        self.reap(now);
    }

    /// Route a blur event observed on an element.
    pub fn handle_blur(&mut self, id: SurfaceId, now: Instant) {
        for session in self
            .active
            .iter_mut()
            .chain(self.draining.iter_mut())
            .filter(|s| s.surface_id() == id)
        {
            session.handle_event(SessionEvent::Blur, now);
        }
        self.reap(now);
    }

    /// Fire due timers: session debounce/restart deadlines and error
    /// reverts.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(session) = self.active.as_mut() {
            session.on_tick(now);
        }
        for session in self.draining.iter_mut() {
            session.on_tick(now);
        }
        self.reap(now);

        let due: Vec<SurfaceId> = self
            .error_reverts
            .iter()
            .filter(|(_, at)| now >= *at)
            .map(|(id, _)| *id)
            .collect();
        self.error_reverts.retain(|(_, at)| now < *at);

        for id in due {
            // A control claimed by a newer session keeps its state.
            if self.active.as_ref().is_some_and(|s| s.surface_id() == id) {
                continue;
            }
            if let Some(element) = self.elements.get(&id) {
                element
                    .control
                    .lock()
                    .expect("control mutex poisoned")
                    .set_state(ControlState::Idle);
                tracing::debug!(surface_id = %id, "Error indicator reverted to idle");
            }
        }
    }

    /// The earliest pending deadline across sessions and error reverts.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.active
            .iter()
            .chain(self.draining.iter())
            .filter_map(|s| s.next_deadline())
            .chain(self.error_reverts.iter().map(|(_, at)| *at))
            .min()
    }

    /// The element the active session is bound to, if any.
    pub fn active_surface(&self) -> Option<SurfaceId> {
        self.active.as_ref().map(|s| s.surface_id())
    }

    /// The active session, if any.
    pub fn active(&self) -> Option<&DictationSession> {
        self.active.as_ref()
    }

    /// The kind an element was attached with, if it is tracked.
    pub fn element_kind(&self, id: SurfaceId) -> Option<&ElementKind> {
        self.elements.get(&id).map(|e| &e.kind)
    }

    /// Number of sessions stopped but still awaiting their end
    /// notification.
    pub fn draining_count(&self) -> usize {
        self.draining.len()
    }

    fn stop_active(&mut self, now: Instant) {
        if let Some(mut session) = self.active.take() {
            session.request_stop(now);
            if !session.is_closed() {
                self.draining.push(session);
            } else {
                self.note_closed(&session, now);
            }
        }
    }

    /// Drop closed sessions and schedule error reverts for the ones that
    /// ended in a surfaced error.
    fn reap(&mut self, now: Instant) {
        if self.active.as_ref().is_some_and(|s| s.is_closed()) {
            if let Some(session) = self.active.take() {
                self.note_closed(&session, now);
            }
        }

        let mut open = Vec::new();
        for session in self.draining.drain(..) {
            if session.is_closed() {
                let id = session.surface_id();
                if session.surfaced_error().is_some() {
                    self.error_reverts.push((id, now + ERROR_DISPLAY));
                }
            } else {
                open.push(session);
            }
        }
        self.draining = open;
    }

    fn note_closed(&mut self, session: &DictationSession, now: Instant) {
        if session.surfaced_error().is_some() {
            self.error_reverts
                .push((session.surface_id(), now + ERROR_DISPLAY));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
