use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

use persona_chat_model::{
    ErrorKind, ModelFinishReason, ModelResponse, ModelResponseEvent,
};

use crate::Error;
use crate::proto::{self, ChatCompletion};

/// A fully received chat completion.
///
/// The body has already been read when this value is created, so the
/// events are always ready: the assistant text as one delta, followed by
/// the finish reason.
#[derive(Debug)]
pub struct OpenAIResponse {
    events: VecDeque<ModelResponseEvent>,
}

impl OpenAIResponse {
    pub(crate) fn from_completion(
        mut completion: ChatCompletion,
    ) -> Result<Self, Error> {
        if completion.choices.is_empty() {
            return Err(Error::new(
                "completion contains no choices",
                ErrorKind::InvalidResponse,
            ));
        }
        let choice = completion.choices.swap_remove(0);
        trace!(
            "completion {:?} finished with {:?}",
            completion.id, choice.finish_reason
        );

        let finish_reason =
            proto::finish_reason(choice.finish_reason.as_deref());
        let Some(content) = choice.message.content else {
            // A reply without text is never a completion worth recording.
            return Err(match finish_reason {
                ModelFinishReason::ContentFilter => Error::new(
                    "the reply was withheld by the content filter",
                    ErrorKind::Moderated,
                ),
                _ => Error::new(
                    "completion contains no message content",
                    ErrorKind::InvalidResponse,
                ),
            });
        };

        let events = VecDeque::from([
            ModelResponseEvent::MessageDelta(content),
            ModelResponseEvent::Completed(finish_reason),
        ]);
        Ok(Self { events })
    }
}

impl ModelResponse for OpenAIResponse {
    type Error = crate::Error;

    #[inline]
    fn poll_next_event(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
    ) -> Poll<Result<Option<ModelResponseEvent>, Self::Error>> {
        Poll::Ready(Ok(self.get_mut().events.pop_front()))
    }
}
