//! The control surface a session renders its state to.

use std::sync::{Arc, Mutex};

use dicta_core::ControlState;

/// Receives visual state transitions for the control bound to an element.
///
/// Implementations render them however the host does (a button, a tray
/// icon, a log line). Error states are transient; the registry reverts
/// them to idle after a few seconds.
pub trait ControlSurface: Send {
    fn set_state(&mut self, state: ControlState);
}

/// A control shared between the session and the registry.
pub type SharedControl = Arc<Mutex<dyn ControlSurface>>;

/// Wrap a control for sharing.
pub fn shared(control: impl ControlSurface + 'static) -> SharedControl {
    Arc::new(Mutex::new(control))
}

/// Control that records every transition, for tests.
#[derive(Clone, Default)]
pub struct RecordingControl {
    states: Arc<Mutex<Vec<ControlState>>>,
}

impl RecordingControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn states(&self) -> Vec<ControlState> {
        self.states.lock().expect("state mutex poisoned").clone()
    }

    pub fn last(&self) -> Option<ControlState> {
        self.states.lock().expect("state mutex poisoned").last().cloned()
    }
}

impl ControlSurface for RecordingControl {
    fn set_state(&mut self, state: ControlState) {
        self.states.lock().expect("state mutex poisoned").push(state);
    }
}

/// Control that logs transitions, used by the demo driver.
pub struct LoggingControl {
    label: String,
}

impl LoggingControl {
    pub fn new(label: &str) -> Self {
        Self {
            label: label.to_string(),
        }
    }
}

impl ControlSurface for LoggingControl {
    fn set_state(&mut self, state: ControlState) {
        tracing::info!(control = %self.label, state = %state, "Control state changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_control_tracks_transitions() {
        let probe = RecordingControl::new();
        let mut control = probe.clone();

        control.set_state(ControlState::Recording);
        control.set_state(ControlState::Idle);

        assert_eq!(
            probe.states(),
            vec![ControlState::Recording, ControlState::Idle]
        );
        assert_eq!(probe.last(), Some(ControlState::Idle));
    }
}
