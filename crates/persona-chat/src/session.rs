use persona_chat_core::conversation::Conversation;
use persona_chat_core::{
    Controller, ControllerBuilder, Credential, Error, SessionState,
};
use persona_chat_model::ModelProvider;
use persona_chat_openai_model::{OpenAIConfig, OpenAIProvider};

/// The persona the chatbot plays unless told otherwise.
pub const DEFAULT_PERSONA: &str = concat!(
    "You are a digital version of Maddy. ",
    "You are a friendly and helpful chatbot."
);

/// The model used unless told otherwise.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// A session builder.
///
/// See [`Session`].
pub struct SessionBuilder {
    controller_builder: ControllerBuilder,
}

impl SessionBuilder {
    /// Creates a session builder with a specified model provider.
    ///
    /// The session has no persona until [`with_persona`](Self::with_persona)
    /// is called.
    pub fn with_model_provider<M: ModelProvider + 'static>(
        provider: M,
    ) -> Self {
        let controller_builder =
            ControllerBuilder::with_model_provider(provider);
        Self { controller_builder }
    }

    /// Creates a session builder talking to an OpenAI-compatible service,
    /// playing [`DEFAULT_PERSONA`].
    pub fn with_openai_config(config: OpenAIConfig) -> Self {
        Self::with_model_provider(OpenAIProvider::new(config))
            .with_persona(DEFAULT_PERSONA)
    }

    /// Sets the persona instruction.
    #[inline]
    pub fn with_persona<S: Into<String>>(mut self, persona: S) -> Self {
        self.controller_builder = self.controller_builder.with_persona(persona);
        self
    }

    /// Removes the persona instruction.
    #[inline]
    pub fn without_persona(mut self) -> Self {
        self.controller_builder = self.controller_builder.without_persona();
        self
    }

    /// Pre-configures a deployment credential and model.
    #[inline]
    pub fn with_credential<C, M>(mut self, credential: C, model: M) -> Self
    where
        C: Into<Credential>,
        M: Into<String>,
    {
        self.controller_builder =
            self.controller_builder.with_credential(credential, model);
        self
    }

    /// Builds a new session.
    pub fn build(self) -> Result<Session, Error> {
        let controller = self.controller_builder.build()?;
        Ok(Session { controller })
    }
}

/// A chat session, like a window that displays messages and has an input
/// box.
///
/// The session holds a fully configured controller, and it is basically a
/// wrapper around [`Controller`].
#[derive(Debug)]
pub struct Session {
    controller: Controller,
}

impl Session {
    /// Sends a message and waits for the reply.
    #[inline]
    pub async fn send_message(
        &mut self,
        message: &str,
    ) -> Result<String, Error> {
        self.controller.submit(message).await
    }

    /// Sets the credential and model for the following messages.
    #[inline]
    pub fn configure<C, M>(
        &mut self,
        credential: C,
        model: M,
    ) -> Result<(), Error>
    where
        C: Into<Credential>,
        M: Into<String>,
    {
        self.controller.configure(credential, model)
    }

    /// Starts the conversation over.
    #[inline]
    pub fn clear(&mut self) {
        self.controller.clear();
    }

    /// Returns whether the session can send messages yet.
    #[inline]
    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    /// Returns the model in use, if configured.
    #[inline]
    pub fn model(&self) -> Option<&str> {
        self.controller.model()
    }

    /// Returns the transcript.
    #[inline]
    pub fn conversation(&self) -> &Conversation {
        self.controller.conversation()
    }

    /// Renders the displayable part of the transcript as pretty JSON.
    pub fn export_transcript(&self) -> serde_json::Result<String> {
        let visible: Vec<_> = self.conversation().visible_messages().collect();
        serde_json::to_string_pretty(&visible)
    }
}

#[cfg(test)]
mod tests {
    use persona_chat_core::conversation::{Message, Role};
    use persona_chat_test_model::{PresetResponse, TestModelProvider};

    use super::*;

    #[tokio::test]
    async fn test_session_round_trip() {
        let mut model_provider = TestModelProvider::default();
        model_provider.add_response(PresetResponse::with_text("hi there"));

        let mut session = SessionBuilder::with_model_provider(model_provider)
            .with_persona(DEFAULT_PERSONA)
            .build()
            .unwrap();
        assert_eq!(session.state(), SessionState::AwaitingCredential);
        session.configure("k", DEFAULT_MODEL).unwrap();

        let reply = session.send_message("hello").await.unwrap();
        assert_eq!(reply, "hi there");
        assert_eq!(session.conversation().len(), 3);
        assert_eq!(
            session.conversation().messages()[0],
            Message::system(DEFAULT_PERSONA)
        );

        let exported = session.export_transcript().unwrap();
        let parsed: Vec<Message> = serde_json::from_str(&exported).unwrap();
        assert_eq!(
            parsed.iter().map(|m| m.role).collect::<Vec<_>>(),
            vec![Role::User, Role::Assistant]
        );
    }

    #[test]
    fn test_without_persona() {
        let session =
            SessionBuilder::with_model_provider(TestModelProvider::default())
                .with_persona(DEFAULT_PERSONA)
                .without_persona()
                .with_credential("k", DEFAULT_MODEL)
                .build()
                .unwrap();
        assert!(session.conversation().is_empty());
        assert_eq!(session.state(), SessionState::Ready);
    }
}
