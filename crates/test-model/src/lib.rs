//! A local fake model for testing purpose.

mod preset;

use std::collections::VecDeque;
use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, ready};
use std::time::Duration;

use persona_chat_model::{
    ErrorKind, ModelFinishReason, ModelProvider, ModelProviderError,
    ModelRequest, ModelResponse, ModelResponseEvent,
};
use tokio::time::{Sleep, sleep};

pub use preset::*;

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl From<PresetFailure> for Error {
    fn from(failure: PresetFailure) -> Self {
        Self {
            message: failure.message,
            kind: failure.kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for Error {}

impl ModelProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

pub struct TestModelResponse {
    events: VecDeque<PresetEvent>,
    completed: bool,
    delay: Duration,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl ModelResponse for TestModelResponse {
    type Error = crate::Error;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.get_mut();
        if this.completed {
            // In case this method is called after completion.
            return Poll::Ready(Ok(None));
        }

        let delay = this.delay;
        let timer = this.sleep.get_or_insert_with(|| Box::pin(sleep(delay)));
        ready!(timer.as_mut().poll(cx));
        this.sleep = None;

        match this.events.pop_front() {
            Some(PresetEvent::MessageDelta(msg)) => {
                Poll::Ready(Ok(Some(ModelResponseEvent::MessageDelta(msg))))
            }
            Some(PresetEvent::Failure(failure)) => {
                this.completed = true;
                Poll::Ready(Err(failure.into()))
            }
            None => {
                this.completed = true;
                Poll::Ready(Ok(Some(ModelResponseEvent::Completed(
                    ModelFinishReason::Stop,
                ))))
            }
        }
    }
}

#[derive(Default)]
struct ScriptState {
    responses: VecDeque<PresetResponse>,
    requests: Vec<ModelRequest>,
}

/// A local fake model for testing purpose.
///
/// Before sending requests, you need to setup the script, which is how
/// the model should respond to the upcoming requests. Each request takes
/// the next preset response in order. If the script runs out, an error
/// will be returned.
///
/// Every request is recorded, so tests can inspect what the model has
/// seen. Clones share the same script and records.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestModelProvider {
    state: Arc<Mutex<ScriptState>>,
    delay: Option<Duration>,
}

impl TestModelProvider {
    #[inline]
    pub fn add_response(&mut self, preset: PresetResponse) {
        self.lock_state().responses.push_back(preset);
    }

    #[inline]
    pub fn set_delay(&mut self, duration: Duration) {
        self.delay = Some(duration);
    }

    /// Returns how many requests this model has received.
    #[inline]
    pub fn call_count(&self) -> usize {
        self.lock_state().requests.len()
    }

    /// Returns all received requests, in order.
    #[inline]
    pub fn requests(&self) -> Vec<ModelRequest> {
        self.lock_state().requests.clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Debug for TestModelProvider {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let state = self.lock_state();
        f.debug_struct("TestModelProvider")
            .field("remaining_responses", &state.responses.len())
            .field("call_count", &state.requests.len())
            .finish()
    }
}

impl ModelProvider for TestModelProvider {
    type Error = crate::Error;
    type Response = TestModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let mut state = self.lock_state();
        state.requests.push(req.clone());

        let result = match state.responses.pop_front() {
            None => Err(Error {
                message: "no more preset responses".to_owned(),
                kind: ErrorKind::Other,
            }),
            Some(PresetResponse {
                failure: Some(failure),
                ..
            }) => Err(failure.into()),
            Some(PresetResponse { events, .. }) => Ok(TestModelResponse {
                events: events.into(),
                completed: false,
                delay: self.delay.unwrap_or(Duration::from_millis(1)),
                sleep: None,
            }),
        };
        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use std::future::poll_fn;
    use std::pin::pin;

    use persona_chat_model::{Credential, ModelMessage};

    use super::*;

    async fn collect_response(
        resp: TestModelResponse,
    ) -> Result<String, Error> {
        let mut resp = pin!(resp);
        let mut msg = String::new();
        while let Some(event) =
            poll_fn(|cx| resp.as_mut().poll_next_event(cx)).await?
        {
            if let ModelResponseEvent::MessageDelta(delta) = event {
                msg.push_str(&delta);
            }
        }
        Ok(msg)
    }

    fn request(messages: Vec<ModelMessage>) -> ModelRequest {
        ModelRequest {
            credential: Credential::new("k"),
            model: "m".to_owned(),
            messages,
        }
    }

    #[tokio::test]
    async fn test_send_request() {
        let mut provider = TestModelProvider::default();
        provider.add_response(PresetResponse::with_events([
            PresetEvent::MessageDelta("Hello, ".to_owned()),
            PresetEvent::MessageDelta("world!".to_owned()),
        ]));
        provider.add_response(PresetResponse::with_text("Sure."));

        let mut req = request(vec![ModelMessage::User("Hi".to_owned())]);
        let resp = provider.send_request(&req).await.unwrap();
        let msg = collect_response(resp).await.unwrap();
        assert_eq!(msg, "Hello, world!");

        req.messages.push(ModelMessage::Assistant(msg));
        req.messages.push(ModelMessage::User("Help me".to_owned()));
        let resp = provider.send_request(&req).await.unwrap();
        assert_eq!(collect_response(resp).await.unwrap(), "Sure.");

        assert_eq!(provider.call_count(), 2);
        assert_eq!(provider.requests()[1], req);
    }

    #[tokio::test]
    async fn test_failures() {
        let mut provider = TestModelProvider::default();
        provider.add_response(PresetResponse::failure(
            ErrorKind::Unauthorized,
            "Invalid API Key",
        ));
        provider.add_response(PresetResponse::with_events([
            PresetEvent::MessageDelta("Half".to_owned()),
            PresetEvent::Failure(PresetFailure {
                kind: ErrorKind::Other,
                message: "connection reset".to_owned(),
            }),
        ]));

        let req = request(vec![ModelMessage::User("Hi".to_owned())]);
        let Err(err) = provider.send_request(&req).await else {
            panic!("expected an error");
        };
        assert_eq!(err.kind(), ErrorKind::Unauthorized);
        assert_eq!(err.to_string(), "Invalid API Key");

        let resp = provider.send_request(&req).await.unwrap();
        let err = collect_response(resp).await.unwrap_err();
        assert_eq!(err.to_string(), "connection reset");

        // The script is exhausted now.
        let Err(err) = provider.send_request(&req).await else {
            panic!("expected an error");
        };
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(provider.call_count(), 3);
    }
}
