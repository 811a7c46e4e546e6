use crate::session::event::SessionEvent;
use crate::session::types::{CanvasId, SessionId};

/// Decides whether an event from the shared transport belongs to the
/// observed session. Stateless; switching the observed session never
/// reprocesses events that were already applied.
#[derive(Debug, Clone)]
pub struct SessionFilter {
    session_id: SessionId,
    canvas_id: CanvasId,
}

impl SessionFilter {
    pub fn new(session_id: SessionId, canvas_id: CanvasId) -> Self {
        Self {
            session_id,
            canvas_id,
        }
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// An event passes when its session field is absent (broadcast) or
    /// matches the observed session. Generated-media events are scoped
    /// by canvas first: a missing or matching canvas passes, and a
    /// foreign canvas passes only when the session field is present and
    /// matches.
    pub fn accepts(&self, event: &SessionEvent) -> bool {
        match event {
            SessionEvent::ImageGenerated {
                session_id,
                canvas_id,
                ..
            }
            | SessionEvent::VideoGenerated {
                session_id,
                canvas_id,
                ..
            } => {
                let canvas_matches = canvas_id
                    .as_ref()
                    .is_none_or(|id| id == &self.canvas_id);
                let session_matches = session_id
                    .as_ref()
                    .is_some_and(|id| id == &self.session_id);
                canvas_matches || session_matches
            }
            _ => event
                .session_id()
                .is_none_or(|id| id == &self.session_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::types::ToolCallId;

    fn filter() -> SessionFilter {
        SessionFilter::new(
            SessionId::from_string("s1"),
            CanvasId::from_string("c1"),
        )
    }

    #[test]
    fn passes_matching_and_broadcast_events() {
        let f = filter();
        assert!(f.accepts(&SessionEvent::Delta {
            session_id: Some(SessionId::from_string("s1")),
            text: "x".to_string(),
        }));
        assert!(f.accepts(&SessionEvent::Done { session_id: None }));
    }

    #[test]
    fn drops_foreign_session_events() {
        let f = filter();
        assert!(!f.accepts(&SessionEvent::ToolCallConfirmed {
            session_id: Some(SessionId::from_string("other")),
            id: ToolCallId::from_string("t1"),
        }));
    }

    #[test]
    fn media_events_pass_on_canvas_or_session_match() {
        let f = filter();
        // Foreign session but matching canvas still passes.
        assert!(f.accepts(&SessionEvent::ImageGenerated {
            session_id: Some(SessionId::from_string("other")),
            canvas_id: Some(CanvasId::from_string("c1")),
            image_url: "https://x/a.png".to_string(),
        }));
        // Foreign on both axes is dropped.
        assert!(!f.accepts(&SessionEvent::VideoGenerated {
            session_id: Some(SessionId::from_string("other")),
            canvas_id: Some(CanvasId::from_string("c2")),
            video_url: "https://x/a.mp4".to_string(),
        }));
    }

    #[test]
    fn foreign_canvas_without_session_is_dropped() {
        let f = filter();
        // A mismatched canvas is not rescued by a missing session field.
        assert!(!f.accepts(&SessionEvent::ImageGenerated {
            session_id: None,
            canvas_id: Some(CanvasId::from_string("c2")),
            image_url: "https://x/a.png".to_string(),
        }));
        // No canvas at all still behaves as a broadcast.
        assert!(f.accepts(&SessionEvent::ImageGenerated {
            session_id: None,
            canvas_id: None,
            image_url: "https://x/a.png".to_string(),
        }));
    }
}
