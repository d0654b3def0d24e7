use std::collections::VecDeque;
use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::future::ready;
use std::pin::Pin;
use std::task::{self, Poll, ready};
use std::time::Duration;

use persona_chat_model::{
    Credential, ErrorKind, ModelFinishReason, ModelMessage, ModelProvider,
    ModelProviderError, ModelRequest, ModelResponse, ModelResponseEvent,
};
use tokio::time::{Sleep, sleep};

#[derive(Debug)]
struct FakeModelProviderError(ErrorKind);

impl Display for FakeModelProviderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Error for FakeModelProviderError {}

impl ModelProviderError for FakeModelProviderError {
    fn kind(&self) -> ErrorKind {
        self.0
    }
}

/// Echoes the last user message back, one word per event.
#[derive(Debug)]
struct FakeModelResponse {
    fake_items: VecDeque<String>,
    finished: bool,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl FakeModelResponse {
    fn new(input: &str) -> Self {
        let fake_items = format!("You said {}", input)
            .split(" ")
            .map(ToString::to_string)
            .collect();
        Self {
            fake_items,
            finished: false,
            sleep: None,
        }
    }
}

impl ModelResponse for FakeModelResponse {
    type Error = FakeModelProviderError;

    fn poll_next_event(
        self: Pin<&mut Self>,
        cx: &mut task::Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        let this = self.get_mut();
        if let Some(sleep) = &mut this.sleep {
            ready!(sleep.as_mut().poll(cx));
            this.sleep = None;

            if let Some(mut this_item) = this.fake_items.pop_front() {
                if !this.fake_items.is_empty() {
                    this_item.push(' ');
                }
                return Poll::Ready(Ok(Some(
                    ModelResponseEvent::MessageDelta(this_item),
                )));
            }

            if !this.finished {
                this.finished = true;
                return Poll::Ready(Ok(Some(ModelResponseEvent::Completed(
                    ModelFinishReason::Stop,
                ))));
            }
            return Poll::Ready(Ok(None));
        }
        this.sleep = Some(Box::pin(sleep(Duration::from_millis(1))));
        Pin::new(this).poll_next_event(cx)
    }
}

struct FakeModelProvider;

impl ModelProvider for FakeModelProvider {
    type Error = FakeModelProviderError;
    type Response = FakeModelResponse;

    fn send_request(
        &self,
        req: &ModelRequest,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + Send + 'static
    {
        let result = 'blk: {
            if req.credential.is_empty() {
                break 'blk Err(FakeModelProviderError(
                    ErrorKind::Unauthorized,
                ));
            }

            let content =
                req.messages.iter().rev().find_map(|msg| match msg {
                    ModelMessage::User(text) => Some(text.as_str()),
                    _ => None,
                });
            let Some(content) = content else {
                break 'blk Err(FakeModelProviderError(ErrorKind::Other));
            };

            Ok(FakeModelResponse::new(content))
        };
        ready(result)
    }
}

mod tests {
    use std::future::poll_fn;

    use super::*;

    fn request(credential: &str, messages: Vec<ModelMessage>) -> ModelRequest {
        ModelRequest {
            credential: Credential::new(credential),
            model: "fake".to_owned(),
            messages,
        }
    }

    #[tokio::test]
    async fn test_completion() {
        let provider = FakeModelProvider;
        let req = request(
            "k",
            vec![
                ModelMessage::System("Be nice.".to_string()),
                ModelMessage::User("Good morning".to_string()),
            ],
        );
        let mut resp = provider.send_request(&req).await.unwrap();

        let mut resp_message = String::new();
        let mut finish_reason = None;
        loop {
            let resp_fut =
                poll_fn(|cx| Pin::new(&mut resp).poll_next_event(cx));
            match resp_fut.await {
                Ok(Some(event)) => match event {
                    ModelResponseEvent::MessageDelta(delta) => {
                        resp_message.push_str(&delta);
                    }
                    ModelResponseEvent::Completed(reason) => {
                        finish_reason = Some(reason);
                    }
                },
                Ok(None) => break,
                Err(err) => unreachable!("unexpected error: {err:?}"),
            }
        }

        assert_eq!(resp_message, "You said Good morning");
        assert_eq!(finish_reason, Some(ModelFinishReason::Stop));
    }

    #[tokio::test]
    async fn test_error() {
        let provider = FakeModelProvider;

        let err = provider.send_request(&request("k", vec![])).await;
        assert_eq!(err.unwrap_err().kind(), ErrorKind::Other);

        let req = request("  ", vec![ModelMessage::User("Hi".to_owned())]);
        let err = provider.send_request(&req).await;
        assert_eq!(err.unwrap_err().kind(), ErrorKind::Unauthorized);
    }
}
