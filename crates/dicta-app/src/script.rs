//! Recognition scripts for the simulation driver.
//!
//! A script is a JSON-lines file; each line waits, then delivers one event
//! to the registry, standing in for the recognizer callbacks and user
//! gestures a live host would produce.

use std::path::Path;

use serde::{Deserialize, Serialize};

use dicta_core::Result;

/// One step of a recognition script.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptStep {
    /// Milliseconds to wait before delivering the event.
    #[serde(default)]
    pub after_ms: u64,
    pub event: ScriptEvent,
}

/// One entry in a scripted result batch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScriptResult {
    pub transcript: String,
    #[serde(default)]
    pub is_final: bool,
}

/// An event the script delivers.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptEvent {
    /// The recognizer acknowledged its start.
    Started,
    /// A recognition result batch.
    Result {
        #[serde(default)]
        result_index: usize,
        results: Vec<ScriptResult>,
    },
    /// A recognizer error, by wire code ("no-speech", "aborted", ...).
    Error { code: String },
    /// The recognizer stopped delivering.
    End,
    /// A click on the element's control.
    Click,
    /// The user pressing Enter in the field.
    UserEnter {
        #[serde(default)]
        shifted: bool,
    },
    /// The user typing: replaces the field text and fires a trusted input
    /// event.
    UserEdit { text: String },
    /// The field losing focus.
    Blur,
}

/// Load a script from a JSON-lines file. Blank lines are skipped.
pub fn load_script(path: &Path) -> Result<Vec<ScriptStep>> {
    let content = std::fs::read_to_string(path)?;
    let mut steps = Vec::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        steps.push(serde_json::from_str(line)?);
    }
    Ok(steps)
}

/// The built-in demo: dictate a sentence with a spoken period, leave an
/// interim fragment pending, and stop through the control.
pub fn demo_script() -> Vec<ScriptStep> {
    vec![
        ScriptStep {
            after_ms: 0,
            event: ScriptEvent::Started,
        },
        ScriptStep {
            after_ms: 50,
            event: ScriptEvent::Result {
                result_index: 0,
                results: vec![ScriptResult {
                    transcript: "hell".to_string(),
                    is_final: false,
                }],
            },
        },
        ScriptStep {
            after_ms: 150,
            event: ScriptEvent::Result {
                result_index: 0,
                results: vec![ScriptResult {
                    transcript: "hello world period".to_string(),
                    is_final: true,
                }],
            },
        },
        ScriptStep {
            after_ms: 150,
            event: ScriptEvent::Result {
                result_index: 1,
                results: vec![
                    ScriptResult {
                        transcript: "hello world period".to_string(),
                        is_final: true,
                    },
                    ScriptResult {
                        transcript: "and more".to_string(),
                        is_final: false,
                    },
                ],
            },
        },
        ScriptStep {
            after_ms: 50,
            event: ScriptEvent::Click,
        },
        ScriptStep {
            after_ms: 30,
            event: ScriptEvent::End,
        },
    ]
}
