use async_trait::async_trait;
use log::warn;
use teloxide::{
    prelude::*,
    types::{MessageId, ParseMode},
    ApiError, RequestError,
};

use crate::quiz::render::{Renderer, Surface};

/// Telegram refuses longer message texts.
pub const MESSAGE_TEXT_LIMIT: usize = 4096;

/// Ids of the bot messages that play the quiz container and the error notice in a chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Display {
    pub container: Option<i32>,
    pub notice: Option<i32>,
}

/// A chat seen as a page: one message edited in place for the quiz, one for the error notice.
pub struct ChatSurface {
    bot: Bot,
    chat_id: ChatId,
    container: Option<i32>,
}

enum Edit {
    Done,
    Gone,
}

impl ChatSurface {
    pub fn renderer(bot: Bot, chat_id: ChatId, display: Display) -> Renderer<ChatSurface> {
        let surface = ChatSurface {
            bot,
            chat_id,
            container: display.container,
        };
        Renderer::with_notice(surface, display.notice)
    }

    /// What has to be remembered in the dialogue to keep drawing on the same messages.
    pub fn display(renderer: &Renderer<ChatSurface>) -> Display {
        Display {
            container: renderer.surface().container,
            notice: renderer.notice().copied(),
        }
    }

    async fn send(&self, markup: &str) -> Result<i32, RequestError> {
        let message = self
            .bot
            .send_message(self.chat_id, markup)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(message.id.0)
    }

    async fn edit(&self, id: i32, markup: &str) -> Result<Edit, RequestError> {
        let edited = self
            .bot
            .edit_message_text(self.chat_id, MessageId(id), markup)
            .parse_mode(ParseMode::Html)
            .await;
        match edited {
            Ok(_) => Ok(Edit::Done),
            // Same text twice in a row, e.g. the same error after pressing the button again
            Err(RequestError::Api(ApiError::MessageNotModified)) => Ok(Edit::Done),
            // The user deleted the message
            Err(RequestError::Api(ApiError::MessageToEditNotFound)) => {
                warn!("Message {} is gone in chat {}", id, self.chat_id);
                Ok(Edit::Gone)
            }
            Err(err) => Err(err),
        }
    }
}

#[async_trait]
impl Surface for ChatSurface {
    type Notice = i32;
    type Error = RequestError;

    fn max_markup_len(&self) -> Option<usize> {
        Some(MESSAGE_TEXT_LIMIT)
    }

    async fn replace_container(&mut self, markup: &str) -> Result<(), RequestError> {
        if let Some(id) = self.container {
            if let Edit::Done = self.edit(id, markup).await? {
                return Ok(());
            }
        }
        self.container = Some(self.send(markup).await?);
        Ok(())
    }

    async fn insert_notice(&mut self, markup: &str) -> Result<i32, RequestError> {
        self.send(markup).await
    }

    async fn update_notice(&mut self, notice: &i32, markup: &str) -> Result<bool, RequestError> {
        Ok(matches!(self.edit(*notice, markup).await?, Edit::Done))
    }
}
