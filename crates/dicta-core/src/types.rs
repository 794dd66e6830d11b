use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of an editable surface tracked by the session layer.
///
/// The discovery collaborator assigns one id per attached element and uses
/// it for every later call that refers to the element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(pub Uuid);

impl SurfaceId {
    /// Create a fresh surface id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Kind of editable element, as reported by the discovery collaborator.
///
/// Eligibility is decided against the configuration, see
/// [`crate::config::DictationConfig::kind_eligible`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A multi-line text area.
    Textarea,
    /// A single-line input with the given type attribute ("text", "search", ...).
    Input(String),
    /// A rich-text editable region matched by a user-configured selector.
    RichText,
}

/// Visual state of the dictation control attached to an element.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    /// Ready; a click starts dictation.
    Idle,
    /// Recording; a click stops dictation.
    Recording,
    /// Stop requested; waiting for trailing recognition results.
    Processing,
    /// A failure to surface, shown transiently before reverting to idle.
    Error(String),
}

impl fmt::Display for ControlState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlState::Idle => write!(f, "idle"),
            ControlState::Recording => write!(f, "recording"),
            ControlState::Processing => write!(f, "processing"),
            ControlState::Error(msg) => write!(f, "error: {}", msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_id_unique() {
        let a = SurfaceId::new();
        let b = SurfaceId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_surface_id_display_round_trip() {
        let id = SurfaceId::new();
        let shown = id.to_string();
        assert_eq!(shown, id.0.to_string());
    }

    #[test]
    fn test_element_kind_serialization() {
        let kind = ElementKind::Input("search".to_string());
        let json = serde_json::to_string(&kind).unwrap();
        let back: ElementKind = serde_json::from_str(&json).unwrap();
        assert_eq!(kind, back);

        let json = serde_json::to_string(&ElementKind::Textarea).unwrap();
        assert_eq!(json, "\"textarea\"");
    }

    #[test]
    fn test_control_state_display() {
        assert_eq!(ControlState::Idle.to_string(), "idle");
        assert_eq!(ControlState::Recording.to_string(), "recording");
        assert_eq!(ControlState::Processing.to_string(), "processing");
        assert_eq!(
            ControlState::Error("mic denied".to_string()).to_string(),
            "error: mic denied"
        );
    }

    #[test]
    fn test_control_state_serialization_round_trip() {
        let states = vec![
            ControlState::Idle,
            ControlState::Recording,
            ControlState::Processing,
            ControlState::Error("boom".to_string()),
        ];
        for state in states {
            let json = serde_json::to_string(&state).unwrap();
            let back: ControlState = serde_json::from_str(&json).unwrap();
            assert_eq!(state, back);
        }
    }
}
