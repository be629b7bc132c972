//! Voice session control.
//!
//! A hosted voice-agent collaborator runs the actual conversation; this
//! module owns the session lifecycle around it. The process assumes a
//! single session, and the controller models that assumption explicitly
//! as a two-state machine (`Idle` / `Active`) with guarded transitions:
//! double-start and stop-without-start fail with
//! [`VoiceError::InvalidState`] instead of handing the collaborator an
//! undefined call sequence.

pub mod agent;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

/// Errors from session control.
#[derive(Debug, Error)]
pub enum VoiceError {
    /// A start/stop transition was attempted from the wrong state
    #[error("invalid session state: {0}")]
    InvalidState(&'static str),

    /// The voice-agent API answered with a non-success status
    #[error("voice agent error: HTTP {status}: {body}")]
    Remote { status: u16, body: String },

    /// Transport-level failure
    #[error("http error: {0}")]
    Http(String),
}

/// Result type for voice operations.
pub type VoiceResult<T> = Result<T, VoiceError>;

/// Fixed assistant persona passed verbatim to the voice-agent API.
///
/// Field names follow the collaborator's JSON contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistantConfig {
    pub first_message: String,
    pub context: String,
    pub model: ModelConfig,
    pub voice: VoiceConfig,
    pub interruptions_enabled: bool,
    pub recording_enabled: bool,
    pub end_call_message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoiceConfig {
    pub provider: String,
    pub voice_id: String,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            first_message: "Would you like to start?".to_string(),
            context: "You are an assistant that explains research papers concisely and \
                      in an easy to understand way. Provide clear, high-level explanations \
                      of the papers the user is interested in, as if explaining them to a \
                      student with no prior knowledge of the topic."
                .to_string(),
            model: ModelConfig {
                provider: "groq".to_string(),
                model: "llama-3.1-405b-reasoning".to_string(),
            },
            voice: VoiceConfig {
                provider: "cartesia".to_string(),
                voice_id: "default".to_string(),
            },
            interruptions_enabled: false,
            recording_enabled: true,
            end_call_message: "Thank you".to_string(),
        }
    }
}

/// The hosted voice-agent collaborator, seen from the session controller.
#[async_trait]
pub trait VoiceAgent: Send + Sync {
    /// Start one session with the given assistant configuration.
    async fn start(&self, config: &AssistantConfig) -> VoiceResult<()>;

    /// Stop the running session.
    async fn stop(&self) -> VoiceResult<()>;
}

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
}

/// Guarded single-session controller over a voice agent.
pub struct VoiceController {
    agent: Box<dyn VoiceAgent>,
    config: AssistantConfig,
    state: Mutex<SessionState>,
}

impl VoiceController {
    pub fn new(agent: Box<dyn VoiceAgent>, config: AssistantConfig) -> Self {
        Self {
            agent,
            config,
            state: Mutex::new(SessionState::Idle),
        }
    }

    /// Start a session.
    ///
    /// # Errors
    /// [`VoiceError::InvalidState`] when a session is already active; the
    /// collaborator's errors otherwise. The state only becomes `Active`
    /// after the collaborator accepted the start.
    pub async fn start_session(&self) -> VoiceResult<()> {
        let mut state = self.state.lock().await;
        if *state == SessionState::Active {
            return Err(VoiceError::InvalidState("session already active"));
        }

        self.agent.start(&self.config).await?;
        *state = SessionState::Active;
        info!("voice session started");
        Ok(())
    }

    /// Stop the active session.
    ///
    /// # Errors
    /// [`VoiceError::InvalidState`] when no session is active. The state
    /// returns to `Idle` even if the collaborator's stop fails, so a
    /// wedged remote session can't lock the controller out of a restart.
    pub async fn stop_session(&self) -> VoiceResult<()> {
        let mut state = self.state.lock().await;
        if *state == SessionState::Idle {
            return Err(VoiceError::InvalidState("no active session"));
        }

        *state = SessionState::Idle;
        self.agent.stop().await?;
        info!("voice session stopped");
        Ok(())
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> SessionState {
        *self.state.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct MockAgent {
        starts: Arc<AtomicUsize>,
        stops: Arc<AtomicUsize>,
        fail_start: bool,
    }

    #[async_trait]
    impl VoiceAgent for MockAgent {
        async fn start(&self, _config: &AssistantConfig) -> VoiceResult<()> {
            if self.fail_start {
                return Err(VoiceError::Remote {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) -> VoiceResult<()> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn controller(agent: MockAgent) -> VoiceController {
        VoiceController::new(Box::new(agent), AssistantConfig::default())
    }

    #[tokio::test]
    async fn start_then_stop_roundtrip() {
        let starts = Arc::new(AtomicUsize::new(0));
        let stops = Arc::new(AtomicUsize::new(0));
        let ctl = controller(MockAgent {
            starts: starts.clone(),
            stops: stops.clone(),
            fail_start: false,
        });

        ctl.start_session().await.unwrap();
        assert_eq!(ctl.state().await, SessionState::Active);
        ctl.stop_session().await.unwrap();
        assert_eq!(ctl.state().await, SessionState::Idle);

        assert_eq!(starts.load(Ordering::SeqCst), 1);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn double_start_is_invalid_state() {
        let ctl = controller(MockAgent::default());
        ctl.start_session().await.unwrap();

        let err = ctl.start_session().await.unwrap_err();
        assert!(matches!(err, VoiceError::InvalidState(_)));
        assert_eq!(ctl.state().await, SessionState::Active);
    }

    #[tokio::test]
    async fn stop_without_start_is_invalid_state() {
        let ctl = controller(MockAgent::default());
        let err = ctl.stop_session().await.unwrap_err();
        assert!(matches!(err, VoiceError::InvalidState(_)));
    }

    #[tokio::test]
    async fn failed_start_leaves_controller_idle() {
        let ctl = controller(MockAgent {
            fail_start: true,
            ..MockAgent::default()
        });

        let err = ctl.start_session().await.unwrap_err();
        assert!(matches!(err, VoiceError::Remote { status: 503, .. }));
        assert_eq!(ctl.state().await, SessionState::Idle);

        // A later start must not be blocked by the failed attempt.
        let err = ctl.stop_session().await.unwrap_err();
        assert!(matches!(err, VoiceError::InvalidState(_)));
    }

    #[test]
    fn assistant_config_serializes_with_collaborator_field_names() {
        let json = serde_json::to_value(AssistantConfig::default()).unwrap();
        assert!(json.get("firstMessage").is_some());
        assert!(json.get("interruptionsEnabled").is_some());
        assert!(json["voice"].get("voiceId").is_some());
        assert_eq!(json["model"]["provider"], "groq");
    }
}
