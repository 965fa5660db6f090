//! Bridge between editing sessions and generation providers.
//!
//! The bridge owns the request lifecycle: it validates prompts, checks that
//! a credential is configured, and keeps one in-flight latch per target so
//! a second request for the same pane is rejected instead of queued.
//! Requests for different targets do not block each other.

use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{Result, TriptychError};
use crate::generate::provider::{
    CodeRequest, GeneratedImage, GenerationTarget, GenerativeProvider, ImageRequest, ProviderInfo,
};
use crate::session::BufferKind;

/// Lifecycle state of one generation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestState {
    #[default]
    Idle,
    Pending,
}

/// Proof that a request was admitted for a target. Must be handed back to
/// [`GenerationBridge::finish`] when the request settles.
#[derive(Debug)]
pub struct RequestTicket {
    target: GenerationTarget,
    seq: u64,
}

impl RequestTicket {
    pub fn target(&self) -> GenerationTarget {
        self.target
    }
}

#[derive(Debug, Default)]
struct TargetState {
    pending: bool,
    seq: u64,
}

/// Validates and dispatches generation requests.
pub struct GenerationBridge {
    provider: Arc<dyn GenerativeProvider>,
    credential: Option<String>,
    states: HashMap<GenerationTarget, TargetState>,
}

impl GenerationBridge {
    /// Creates a bridge with no credential configured. Requests fail until
    /// one is set.
    pub fn new(provider: Arc<dyn GenerativeProvider>) -> Self {
        GenerationBridge {
            provider,
            credential: None,
            states: HashMap::new(),
        }
    }

    /// Sets the credential at construction time.
    pub fn with_credential(mut self, credential: impl Into<String>) -> Self {
        self.credential = Some(credential.into());
        self
    }

    pub fn set_credential(&mut self, credential: Option<String>) {
        self.credential = credential.filter(|c| !c.trim().is_empty());
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Describes the provider behind this bridge.
    pub fn provider_info(&self) -> ProviderInfo {
        self.provider.info().clone()
    }

    /// Current lifecycle state for a target.
    pub fn state(&self, target: GenerationTarget) -> RequestState {
        match self.states.get(&target) {
            Some(state) if state.pending => RequestState::Pending,
            _ => RequestState::Idle,
        }
    }

    /// Admits a request for `target`, rejecting it if one is already in
    /// flight for the same target.
    pub fn begin(&mut self, target: GenerationTarget) -> Result<RequestTicket> {
        let state = self.states.entry(target).or_default();
        if state.pending {
            log::warn!("Rejected {} request: one is already in flight", target);
            return Err(TriptychError::GenerationPending {
                target: target.to_string(),
            });
        }
        state.pending = true;
        state.seq += 1;
        log::debug!("Admitted {} request #{}", target, state.seq);
        Ok(RequestTicket {
            target,
            seq: state.seq,
        })
    }

    /// Settles a request. Returns false when the ticket is stale, which
    /// leaves the current state untouched.
    pub fn finish(&mut self, ticket: RequestTicket) -> bool {
        match self.states.get_mut(&ticket.target) {
            Some(state) if state.pending && state.seq == ticket.seq => {
                state.pending = false;
                true
            }
            _ => {
                log::debug!("Ignored stale ticket for {} request", ticket.target);
                false
            }
        }
    }

    /// Generates replacement code for one pane.
    ///
    /// Validation happens in order: an empty prompt, then a missing
    /// credential, then an in-flight request for the same pane. The
    /// provider is only consulted once all three pass.
    pub fn generate_code(
        &mut self,
        prompt: &str,
        kind: BufferKind,
        current_code: &str,
    ) -> Result<String> {
        if prompt.trim().is_empty() {
            return Err(TriptychError::EmptyPrompt);
        }
        if self.credential.is_none() {
            return Err(TriptychError::MissingCredential);
        }
        let ticket = self.begin(GenerationTarget::from(kind))?;

        let request = CodeRequest::new(prompt, kind).with_current_code(current_code);
        let result = self.provider.generate_code(&request);
        self.finish(ticket);

        match &result {
            Ok(code) => log::info!(
                "Generated {} characters for the {} pane",
                code.len(),
                kind
            ),
            Err(e) => log::error!("Generation for {} pane failed: {}", kind, e),
        }
        result
    }

    /// Generates an image record for a prompt, optionally tied to a
    /// project.
    pub fn generate_image(
        &mut self,
        prompt: &str,
        project_id: Option<Uuid>,
    ) -> Result<GeneratedImage> {
        if prompt.trim().is_empty() {
            return Err(TriptychError::EmptyPrompt);
        }
        if self.credential.is_none() {
            return Err(TriptychError::MissingCredential);
        }
        let ticket = self.begin(GenerationTarget::Image)?;

        let mut request = ImageRequest::new(prompt);
        request.project_id = project_id;
        let result = self.provider.generate_image(&request);
        self.finish(ticket);

        match &result {
            Ok(image) => log::info!("Generated image record: {}", image.image_url),
            Err(e) => log::error!("Image generation failed: {}", e),
        }
        result
    }
}
