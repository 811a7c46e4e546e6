//! Per-session runtime loop.
//!
//! One cooperative task owns the [`SessionState`]: it filters inbound
//! transport events, runs each through the reducer to completion, and
//! services local commands (approve/decline, cancel, resync). Observers
//! read the state through a `watch` channel and notices through an
//! `mpsc` side-channel. Outbound HTTP is spawned fire-and-forget so the
//! loop never blocks on the network.

use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use crate::api::{AgentApi, ConfirmationRequest};
use crate::error::{Error, Result};
use crate::session::event::SessionEvent;
use crate::session::filter::SessionFilter;
use crate::session::reduce::{reduce, Effect, NoticeLevel};
use crate::session::state::{Pending, SessionState};
use crate::session::types::{CanvasId, SessionId, ToolCallId};

/// Ephemeral user-visible notification from the event stream.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Local actions on a session, issued by the UI layer.
#[derive(Debug)]
pub enum SessionCommand {
    /// Approve or decline a confirmation-gated tool call. The gate only
    /// moves when the backend's confirmed/cancelled event arrives.
    DecideToolCall {
        tool_call_id: ToolCallId,
        confirmed: bool,
    },
    /// Optimistically clear the pending indicator and ask the backend to
    /// stop. Late events may re-arm the indicator; that window is
    /// accepted.
    CancelGeneration,
    /// Locally mark the agent as producing output, e.g. right after the
    /// user sends a message, before the first stream event lands.
    MarkPending(Pending),
    /// Re-fetch the authoritative snapshot and replace local state.
    Resync,
    Shutdown,
}

/// Cheap handle for driving one session's runtime.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    session_id: SessionId,
    events_tx: mpsc::UnboundedSender<SessionEvent>,
    commands_tx: mpsc::UnboundedSender<SessionCommand>,
    state_rx: watch::Receiver<SessionState>,
}

impl SessionHandle {
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Feed one transport event into the session. Foreign-session events
    /// are accepted here and dropped by the filter inside the loop.
    pub fn publish_event(&self, event: SessionEvent) -> Result<()> {
        self.events_tx
            .send(event)
            .map_err(|_| Error::SessionClosed)
    }

    pub fn command(&self, command: SessionCommand) -> Result<()> {
        self.commands_tx
            .send(command)
            .map_err(|_| Error::SessionClosed)
    }

    pub fn approve_tool_call(&self, tool_call_id: ToolCallId) -> Result<()> {
        self.command(SessionCommand::DecideToolCall {
            tool_call_id,
            confirmed: true,
        })
    }

    pub fn decline_tool_call(&self, tool_call_id: ToolCallId) -> Result<()> {
        self.command(SessionCommand::DecideToolCall {
            tool_call_id,
            confirmed: false,
        })
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state_rx.borrow().clone()
    }

    /// Watch for state changes.
    pub fn watch_state(&self) -> watch::Receiver<SessionState> {
        self.state_rx.clone()
    }
}

pub struct SessionRuntime {
    state: SessionState,
    filter: SessionFilter,
    api: Arc<AgentApi>,
    events_rx: mpsc::UnboundedReceiver<SessionEvent>,
    commands_rx: mpsc::UnboundedReceiver<SessionCommand>,
    state_tx: watch::Sender<SessionState>,
    notices_tx: mpsc::UnboundedSender<Notice>,
}

impl SessionRuntime {
    /// Spawn the runtime task for one session. Returns the driving
    /// handle and the notice side-channel.
    pub fn spawn(
        session_id: SessionId,
        canvas_id: CanvasId,
        api: Arc<AgentApi>,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<Notice>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (notices_tx, notices_rx) = mpsc::unbounded_channel();

        let state = SessionState::new(session_id.clone());
        let (state_tx, state_rx) = watch::channel(state.clone());

        let runtime = Self {
            state,
            filter: SessionFilter::new(session_id.clone(), canvas_id),
            api,
            events_rx,
            commands_rx,
            state_tx,
            notices_tx,
        };
        tokio::spawn(runtime.run());

        let handle = SessionHandle {
            session_id,
            events_tx,
            commands_tx,
            state_rx,
        };
        (handle, notices_rx)
    }

    async fn run(mut self) {
        // Initial population. Events that arrive while this is in flight
        // queue on the channel and apply after the snapshot; that race
        // is accepted.
        self.resync().await;

        loop {
            tokio::select! {
                command = self.commands_rx.recv() => {
                    match command {
                        Some(SessionCommand::Shutdown) | None => break,
                        Some(command) => self.handle_command(command).await,
                    }
                }
                event = self.events_rx.recv() => {
                    match event {
                        Some(event) => self.handle_event(event),
                        None => break,
                    }
                }
            }
        }

        debug!(session_id = %self.state.session_id, "session runtime stopped");
    }

    fn handle_event(&mut self, event: SessionEvent) {
        if !self.filter.accepts(&event) {
            return;
        }

        for effect in reduce(&mut self.state, event) {
            match effect {
                Effect::Notify { level, message } => {
                    let _ = self.notices_tx.send(Notice { level, message });
                }
            }
        }

        self.publish_state();
    }

    async fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::DecideToolCall {
                tool_call_id,
                confirmed,
            } => {
                let request = ConfirmationRequest {
                    session_id: self.state.session_id.clone(),
                    tool_call_id,
                    confirmed,
                };
                let api = Arc::clone(&self.api);
                tokio::spawn(async move {
                    if let Err(error) = api.submit_tool_confirmation(&request).await {
                        warn!(
                            session_id = %request.session_id,
                            tool_call_id = %request.tool_call_id,
                            %error,
                            "tool confirmation submission failed"
                        );
                    }
                });
            }

            SessionCommand::CancelGeneration => {
                self.state.pending = None;
                self.publish_state();

                let api = Arc::clone(&self.api);
                let session_id = self.state.session_id.clone();
                tokio::spawn(async move {
                    if let Err(error) = api.cancel_session(&session_id).await {
                        warn!(%session_id, %error, "session cancellation failed");
                    }
                });
            }

            SessionCommand::MarkPending(pending) => {
                self.state.pending = Some(pending);
                self.publish_state();
            }

            SessionCommand::Resync => self.resync().await,

            // Handled by the select loop.
            SessionCommand::Shutdown => {}
        }
    }

    /// Fetch the authoritative snapshot and feed it through the same
    /// all_messages reduce path as a streamed snapshot.
    async fn resync(&mut self) {
        match self.api.fetch_session(&self.state.session_id).await {
            Ok(messages) => {
                self.handle_event(SessionEvent::AllMessages {
                    session_id: Some(self.state.session_id.clone()),
                    messages,
                });
            }
            Err(error) => {
                warn!(
                    session_id = %self.state.session_id,
                    %error,
                    "session snapshot fetch failed"
                );
            }
        }
    }

    fn publish_state(&self) {
        let _ = self.state_tx.send(self.state.clone());
    }
}
