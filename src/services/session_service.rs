// src/services/session_service.rs
use crate::errors::StudioError;
use crate::models::*;
use crate::services::enhancer::PromptEnhancer;
use crate::services::image_generator::ImageGenerator;
use crate::services::prompt_composer::compose_prompt;
use crate::services::suggester::PromptSuggester;
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use uuid::Uuid;

pub const GENERATION_FAILED_MESSAGE: &str = "Failed to generate image. Please try again.";

/// State of one studio session. All transitions go through the methods
/// below; none of them touch the network.
#[derive(Debug, Clone)]
pub struct Session {
    id: Uuid,
    status: AppStatus,
    text_busy: bool,
    error: Option<String>,
    history: Vec<GeneratedImage>,
    current: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: AppStatus::Idle,
            text_busy: false,
            error: None,
            history: Vec::new(),
            current: None,
            created_at: Utc::now(),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            id: self.id,
            status: self.status,
            text_busy: self.text_busy,
            error: self.error.clone(),
            current: self
                .current
                .and_then(|id| self.history.iter().find(|image| image.id == id))
                .cloned(),
            history: self.history.clone(),
            created_at: self.created_at,
        }
    }

    pub fn begin_generation(&mut self) -> Result<(), StudioError> {
        if self.status == AppStatus::Generating {
            return Err(StudioError::Busy("an image is already generating".into()));
        }
        if self.text_busy {
            return Err(StudioError::Busy("a prompt operation is in progress".into()));
        }
        self.status = AppStatus::Generating;
        self.error = None;
        Ok(())
    }

    pub fn complete_generation(&mut self, image: GeneratedImage) {
        self.current = Some(image.id);
        self.history.insert(0, image);
        self.status = AppStatus::Success;
        self.error = None;
    }

    pub fn fail_generation(&mut self, message: impl Into<String>) {
        self.status = AppStatus::Error;
        self.error = Some(message.into());
    }

    pub fn begin_text_operation(&mut self) -> Result<(), StudioError> {
        if self.text_busy {
            return Err(StudioError::Busy("a prompt operation is in progress".into()));
        }
        if self.status == AppStatus::Generating {
            return Err(StudioError::Busy("an image is already generating".into()));
        }
        self.text_busy = true;
        Ok(())
    }

    pub fn end_text_operation(&mut self) {
        self.text_busy = false;
    }

    pub fn select(&mut self, image_id: Uuid) -> Result<(), StudioError> {
        if !self.history.iter().any(|image| image.id == image_id) {
            return Err(StudioError::NotFound(format!("image {}", image_id)));
        }
        self.current = Some(image_id);
        Ok(())
    }

    pub fn clear_history(&mut self) -> Result<(), StudioError> {
        if self.status == AppStatus::Generating {
            return Err(StudioError::Busy("an image is already generating".into()));
        }
        self.history.clear();
        self.current = None;
        if self.status == AppStatus::Success {
            self.status = AppStatus::Idle;
        }
        Ok(())
    }

    pub fn image(&self, image_id: Uuid) -> Option<&GeneratedImage> {
        self.history.iter().find(|image| image.id == image_id)
    }

    /// Moves a running text operation straight into a generation, with no
    /// window in which another action could claim the session.
    pub fn hand_over_to_generation(&mut self) -> Result<(), StudioError> {
        if !self.text_busy {
            return Err(StudioError::Busy("no prompt operation to hand over".into()));
        }
        self.text_busy = false;
        self.begin_generation()
    }

    pub fn ensure_idle(&self) -> Result<(), StudioError> {
        if self.status == AppStatus::Generating {
            return Err(StudioError::Busy("an image is already generating".into()));
        }
        if self.text_busy {
            return Err(StudioError::Busy("a prompt operation is in progress".into()));
        }
        Ok(())
    }
}

/// Builds the backend config for a request, or `None` when there is nothing
/// to draw: no subject and no reference image.
fn generation_config(request: &GenerateRequest) -> Option<GenerationConfig> {
    let reference_image = request
        .reference_image
        .clone()
        .filter(|image| !image.trim().is_empty());
    let prompt = compose_prompt(&request.prompt, &request.style_id, request.tone);

    if reference_image.is_none() && (request.prompt.trim().is_empty() || prompt.is_empty()) {
        return None;
    }

    Some(GenerationConfig {
        prompt,
        negative_prompt: request.negative_prompt.clone(),
        aspect_ratio: request.aspect_ratio,
        style_id: request.style_id.clone(),
        reference_image,
    })
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy)]
enum Operation {
    Generation,
    Text,
}

/// Releases a session's in-flight marker if the owning request is dropped
/// before it commits, e.g. when the client disconnects.
struct OperationGuard<'a> {
    sessions: &'a RwLock<HashMap<Uuid, Session>>,
    session_id: Uuid,
    operation: Operation,
    armed: bool,
}

impl OperationGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(session) = sessions.get_mut(&self.session_id) {
            match self.operation {
                Operation::Generation => {
                    warn!("Generation for session {} was interrupted", self.session_id);
                    session.fail_generation(GENERATION_FAILED_MESSAGE);
                }
                Operation::Text => session.end_text_operation(),
            }
        }
    }
}

/// Owns every session and sequences studio commands against the prompt and
/// image clients.
pub struct SessionService {
    sessions: RwLock<HashMap<Uuid, Session>>,
    enhancer: PromptEnhancer,
    suggester: PromptSuggester,
    generator: ImageGenerator,
}

impl SessionService {
    pub fn new(
        enhancer: PromptEnhancer,
        suggester: PromptSuggester,
        generator: ImageGenerator,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            enhancer,
            suggester,
            generator,
        }
    }

    fn with_session<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut Session) -> Result<R, StudioError>,
    ) -> Result<R, StudioError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let session = sessions
            .get_mut(&session_id)
            .ok_or_else(|| StudioError::NotFound(format!("session {}", session_id)))?;
        f(session)
    }

    fn read_session<R>(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&Session) -> R,
    ) -> Result<R, StudioError> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(&session_id)
            .map(f)
            .ok_or_else(|| StudioError::NotFound(format!("session {}", session_id)))
    }

    fn begin(
        &self,
        session_id: Uuid,
        operation: Operation,
    ) -> Result<OperationGuard<'_>, StudioError> {
        self.with_session(session_id, |session| match operation {
            Operation::Generation => session.begin_generation(),
            Operation::Text => session.begin_text_operation(),
        })?;
        Ok(self.guard(session_id, operation))
    }

    fn guard(&self, session_id: Uuid, operation: Operation) -> OperationGuard<'_> {
        OperationGuard {
            sessions: &self.sessions,
            session_id,
            operation,
            armed: true,
        }
    }

    // Trades a text guard for a generation guard under one write lock.
    fn hand_over<'a>(
        &'a self,
        text_guard: OperationGuard<'a>,
    ) -> Result<OperationGuard<'a>, StudioError> {
        let session_id = text_guard.session_id;
        self.with_session(session_id, Session::hand_over_to_generation)?;
        text_guard.disarm();
        Ok(self.guard(session_id, Operation::Generation))
    }

    pub fn create(&self) -> SessionSnapshot {
        let session = Session::new();
        let snapshot = session.snapshot();
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.id, session);
        info!("Created session {}", snapshot.id);
        snapshot
    }

    pub fn snapshot(&self, session_id: Uuid) -> Result<SessionSnapshot, StudioError> {
        self.read_session(session_id, Session::snapshot)
    }

    /// Drops a session and its history. Refused while an action is running.
    pub fn remove(&self, session_id: Uuid) -> Result<(), StudioError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .get(&session_id)
            .ok_or_else(|| StudioError::NotFound(format!("session {}", session_id)))?
            .ensure_idle()?;
        sessions.remove(&session_id);
        info!("Removed session {}", session_id);
        Ok(())
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub async fn enhance(
        &self,
        session_id: Uuid,
        request: &EnhanceRequest,
    ) -> Result<String, StudioError> {
        if request.prompt.trim().is_empty() {
            return Err(StudioError::Validation("prompt must not be empty".into()));
        }

        let guard = self.begin(session_id, Operation::Text)?;
        let prompt = self
            .enhancer
            .enhance(&request.prompt, request.tone, request.aspect_ratio)
            .await;
        drop(guard);
        Ok(prompt)
    }

    pub async fn suggest(
        &self,
        session_id: Uuid,
        request: &SuggestRequest,
    ) -> Result<String, StudioError> {
        let guard = self.begin(session_id, Operation::Text)?;
        let prompt = self
            .suggester
            .suggest(request.tone, request.aspect_ratio)
            .await;
        drop(guard);
        Ok(prompt)
    }

    /// Runs one generation. An empty prompt with no reference image is a
    /// no-op that returns the current snapshot.
    pub async fn generate(
        &self,
        session_id: Uuid,
        request: &GenerateRequest,
    ) -> Result<SessionSnapshot, StudioError> {
        let Some(config) = generation_config(request) else {
            return self.snapshot(session_id);
        };

        let guard = self.begin(session_id, Operation::Generation)?;
        self.run_generation(session_id, guard, &config, request).await
    }

    /// Suggests a fresh idea, then generates it. The session stays claimed
    /// from the start of the suggestion until the image is committed.
    pub async fn surprise(
        &self,
        session_id: Uuid,
        request: &SurpriseRequest,
    ) -> Result<(String, SessionSnapshot), StudioError> {
        let text_guard = self.begin(session_id, Operation::Text)?;
        let prompt = self
            .suggester
            .suggest(request.tone, request.aspect_ratio)
            .await;

        let generate = GenerateRequest {
            prompt: prompt.clone(),
            negative_prompt: None,
            style_id: request.style_id.clone(),
            tone: request.tone,
            aspect_ratio: request.aspect_ratio,
            reference_image: None,
        };
        let Some(config) = generation_config(&generate) else {
            drop(text_guard);
            return Ok((prompt, self.snapshot(session_id)?));
        };

        let guard = self.hand_over(text_guard)?;
        let snapshot = self
            .run_generation(session_id, guard, &config, &generate)
            .await?;
        Ok((prompt, snapshot))
    }

    async fn run_generation(
        &self,
        session_id: Uuid,
        guard: OperationGuard<'_>,
        config: &GenerationConfig,
        request: &GenerateRequest,
    ) -> Result<SessionSnapshot, StudioError> {
        let result = self.generator.generate(config).await;
        guard.disarm();

        self.with_session(session_id, |session| {
            match result {
                Ok(data) => {
                    let image =
                        GeneratedImage::new(data, request.prompt.clone(), request.aspect_ratio);
                    info!("Session {} generated image {}", session_id, image.id);
                    session.complete_generation(image);
                }
                Err(e) => {
                    warn!("Session {} generation failed: {}", session_id, e);
                    session.fail_generation(GENERATION_FAILED_MESSAGE);
                }
            }
            Ok(session.snapshot())
        })
    }

    pub fn select_history_item(
        &self,
        session_id: Uuid,
        image_id: Uuid,
    ) -> Result<SessionSnapshot, StudioError> {
        self.with_session(session_id, |session| {
            session.select(image_id)?;
            Ok(session.snapshot())
        })
    }

    pub fn clear_history(&self, session_id: Uuid) -> Result<SessionSnapshot, StudioError> {
        self.with_session(session_id, |session| {
            session.clear_history()?;
            Ok(session.snapshot())
        })
    }

    pub fn image(&self, session_id: Uuid, image_id: Uuid) -> Result<GeneratedImage, StudioError> {
        self.read_session(session_id, |session| session.image(image_id).cloned())?
            .ok_or_else(|| StudioError::NotFound(format!("image {}", image_id)))
    }
}
