//! Tokio driver that replays a recognition script against a live registry.
//!
//! The registry and session are synchronous and deadline-based; this loop
//! converts their pending deadlines into sleeps and feeds script events in
//! order, the single-threaded way a host event loop would.

use std::time::{Duration, Instant};

use uuid::Uuid;

use dicta_core::{Result, SurfaceId};
use dicta_element::{TextBox, ValueField};
use dicta_session::{
    Key, RecognitionResult, RecognitionResults, RecognizerErrorCode, SessionEvent,
    SessionRegistry, UserInputEvent, UserInputKind,
};

use crate::script::{ScriptEvent, ScriptStep};

/// Replay `steps` against the registry, starting dictation on
/// `surface_id`, and return the field's final text.
pub async fn run(
    mut registry: SessionRegistry,
    surface_id: SurfaceId,
    field: TextBox,
    steps: Vec<ScriptStep>,
) -> Result<String> {
    registry.toggle(surface_id, Instant::now())?;
    let mut session_id = registry.active().map(|s| s.id());

    for step in steps {
        let wake = Instant::now() + Duration::from_millis(step.after_ms);
        run_timers_until(&mut registry, wake).await;
        apply(
            &mut registry,
            &mut session_id,
            surface_id,
            &field,
            step.event,
        )?;
    }

    // A session the script left running stops here; its end notification
    // completes the final write.
    if registry.active_surface().is_some() {
        registry.toggle(surface_id, Instant::now())?;
        if let Some(id) = session_id {
            registry.handle_recognizer_event(id, SessionEvent::RecognizerEnd, Instant::now());
        }
    }
    drain_timers(&mut registry).await;

    Ok(field.value())
}

fn apply(
    registry: &mut SessionRegistry,
    session_id: &mut Option<Uuid>,
    surface_id: SurfaceId,
    field: &TextBox,
    event: ScriptEvent,
) -> Result<()> {
    let now = Instant::now();
    match event {
        ScriptEvent::Click => {
            registry.toggle(surface_id, now)?;
            if let Some(session) = registry.active() {
                *session_id = Some(session.id());
            }
        }
        ScriptEvent::Started => feed(registry, session_id, SessionEvent::RecognizerStarted, now),
        ScriptEvent::Result {
            result_index,
            results,
        } => {
            let results = RecognitionResults {
                result_index,
                results: results
                    .into_iter()
                    .map(|r| RecognitionResult {
                        transcript: r.transcript,
                        is_final: r.is_final,
                    })
                    .collect(),
            };
            feed(
                registry,
                session_id,
                SessionEvent::RecognizerResult(results),
                now,
            );
        }
        ScriptEvent::Error { code } => feed(
            registry,
            session_id,
            SessionEvent::RecognizerError(RecognizerErrorCode::from_code(&code)),
            now,
        ),
        ScriptEvent::End => feed(registry, session_id, SessionEvent::RecognizerEnd, now),
        ScriptEvent::UserEnter { shifted } => registry.handle_user_input(
            surface_id,
            UserInputEvent::trusted(UserInputKind::Keydown {
                key: Key::Enter,
                shifted,
            }),
            now,
        ),
        ScriptEvent::UserEdit { text } => {
            field.clone().set_value(&text);
            registry.handle_user_input(
                surface_id,
                UserInputEvent::trusted(UserInputKind::TextChanged),
                now,
            );
        }
        ScriptEvent::Blur => registry.handle_blur(surface_id, now),
    }
    Ok(())
}

fn feed(
    registry: &mut SessionRegistry,
    session_id: &Option<Uuid>,
    event: SessionEvent,
    now: Instant,
) {
    if let Some(id) = session_id {
        registry.handle_recognizer_event(*id, event, now);
    }
}

/// Fire registry deadlines that come due before `wake`, then sleep until
/// `wake` itself.
async fn run_timers_until(registry: &mut SessionRegistry, wake: Instant) {
    while let Some(deadline) = registry.next_deadline() {
        if deadline >= wake {
            break;
        }
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        registry.on_tick(Instant::now());
    }
    let now = Instant::now();
    if wake > now {
        tokio::time::sleep_until(tokio::time::Instant::from_std(wake)).await;
    }
}

/// Fire every remaining deadline so pending writes and reverts settle.
async fn drain_timers(registry: &mut SessionRegistry) {
    while let Some(deadline) = registry.next_deadline() {
        tokio::time::sleep_until(tokio::time::Instant::from_std(deadline)).await;
        registry.on_tick(Instant::now());
    }
}
