use persona_chat_model::{Credential, ModelProvider};

use super::Controller;
use crate::error::Error;
use crate::model_client::ModelClient;

/// [`Controller`] builder.
pub struct ControllerBuilder {
    pub(crate) model_client: ModelClient,
    pub(crate) persona: Option<String>,
    pub(crate) settings: Option<(Credential, String)>,
}

impl ControllerBuilder {
    /// Creates a new builder with the specified model provider.
    #[inline]
    pub fn with_model_provider<P: ModelProvider + 'static>(
        provider: P,
    ) -> Self {
        Self {
            model_client: ModelClient::new(provider),
            persona: None,
            settings: None,
        }
    }

    /// Sets the persona instruction.
    ///
    /// The persona becomes the first message of the transcript. It is sent
    /// with every request and restored by [`Controller::clear`], but left out
    /// of [`Conversation::visible_messages`].
    ///
    /// [`Conversation::visible_messages`]:
    ///     crate::conversation::Conversation::visible_messages
    #[inline]
    pub fn with_persona<S: Into<String>>(mut self, persona: S) -> Self {
        self.persona = Some(persona.into());
        self
    }

    /// Removes a previously set persona instruction.
    #[inline]
    pub fn without_persona(mut self) -> Self {
        self.persona = None;
        self
    }

    /// Pre-configures the credential and model, so the controller starts
    /// in the [`Ready`](super::SessionState::Ready) state.
    #[inline]
    pub fn with_credential<C, M>(mut self, credential: C, model: M) -> Self
    where
        C: Into<Credential>,
        M: Into<String>,
    {
        self.settings = Some((credential.into(), model.into()));
        self
    }

    /// Builds the controller.
    ///
    /// Fails if a pre-configured credential or model is blank.
    #[inline]
    pub fn build(self) -> Result<Controller, Error> {
        Controller::from_builder(self)
    }
}
