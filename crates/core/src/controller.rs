mod builder;

use std::fmt::{self, Debug};

use persona_chat_model::{Credential, ModelRequest};
use tracing::Instrument;

pub use builder::ControllerBuilder;

use crate::conversation::{Conversation, Message};
use crate::error::Error;
use crate::model_client::ModelClient;

/// The configuration stage of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No credential yet. Submitting will fail until one is configured.
    #[default]
    AwaitingCredential,
    /// Messages can be submitted.
    Ready,
}

#[derive(Clone, Debug)]
struct Settings {
    credential: Credential,
    model: String,
}

/// Drives one chat session: owns the transcript, sends it to the
/// completion service and records the replies.
///
/// Mutating operations take `&mut self`, so at most one request can be in
/// flight for a given transcript. Callers that share a controller across
/// tasks have to serialize access themselves.
pub struct Controller {
    model_client: ModelClient,
    persona: Option<String>,
    settings: Option<Settings>,
    conversation: Conversation,
}

impl Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("persona", &self.persona)
            .field("settings", &self.settings)
            .field("conversation", &self.conversation)
            .finish_non_exhaustive()
    }
}

impl Controller {
    fn from_builder(builder: ControllerBuilder) -> Result<Self, Error> {
        let ControllerBuilder {
            model_client,
            persona,
            settings,
        } = builder;

        let mut controller = Self {
            conversation: Conversation::seeded(persona.as_deref()),
            model_client,
            persona,
            settings: None,
        };
        if let Some((credential, model)) = settings {
            controller.configure(credential, model)?;
        }
        Ok(controller)
    }

    /// Returns the current configuration stage.
    #[inline]
    pub fn state(&self) -> SessionState {
        if self.settings.is_some() {
            SessionState::Ready
        } else {
            SessionState::AwaitingCredential
        }
    }

    /// Returns the transcript.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns the model identifier in use, if configured.
    #[inline]
    pub fn model(&self) -> Option<&str> {
        self.settings.as_ref().map(|s| s.model.as_str())
    }

    /// Sets or replaces the credential and model used by later
    /// submissions.
    ///
    /// On failure the previous configuration, if any, stays in effect.
    pub fn configure<C, M>(
        &mut self,
        credential: C,
        model: M,
    ) -> Result<(), Error>
    where
        C: Into<Credential>,
        M: Into<String>,
    {
        let credential = credential.into();
        if credential.is_empty() {
            return Err(Error::Configuration("the API key is empty".to_owned()));
        }
        let model = model.into().trim().to_owned();
        if model.is_empty() {
            return Err(Error::Configuration(
                "the model identifier is empty".to_owned(),
            ));
        }

        debug!("configured model {model}");
        self.settings = Some(Settings { credential, model });
        Ok(())
    }

    /// Appends `text` as a user message, sends the whole transcript to the
    /// completion service and returns the assistant's reply.
    ///
    /// The user message stays in the transcript even if the request fails.
    /// The reply is appended only on success. Exactly one request is made
    /// per call.
    ///
    /// # Cancel safety
    ///
    /// If the returned future is dropped while the request is in flight,
    /// the transcript is left as after a failed request.
    pub async fn submit(&mut self, text: &str) -> Result<String, Error> {
        if text.trim().is_empty() {
            return Err(Error::EmptyInput);
        }
        let Some(settings) = &self.settings else {
            return Err(Error::Configuration(
                "no API key has been configured".to_owned(),
            ));
        };

        self.conversation.push(Message::user(text));
        let request = ModelRequest {
            credential: settings.credential.clone(),
            model: settings.model.clone(),
            messages: self.conversation.to_model_messages(),
        };

        let span = debug_span!("submit", turn = self.conversation.len());
        match self.model_client.send_request(request).instrument(span).await {
            Ok(resp) => {
                debug!(
                    "got a reply of {} bytes, finished with {:?}",
                    resp.text.len(),
                    resp.finish_reason
                );
                self.conversation.push(Message::assistant(resp.text.clone()));
                Ok(resp.text)
            }
            Err(err) => {
                warn!("completion failed: {err}");
                Err(Error::Completion {
                    kind: err.kind(),
                    message: err.to_string(),
                })
            }
        }
    }

    /// Resets the transcript to its initial state: empty, or holding only
    /// the persona instruction if one was set.
    #[inline]
    pub fn clear(&mut self) {
        self.conversation = Conversation::seeded(self.persona.as_deref());
    }
}
