pub mod types;

use crate::backend::notifier::{Message, MessageSink};
use crate::backend::types::ChatId;
use crate::backend::SendError;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use types::{
    AnswerCallbackQuery, DeleteMessage, EditMessageText, GetUpdates, InlineKeyboardMarkup,
    Message as TgMessage, Response, SendMessage, Update,
};

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("telegram api error {code}: {description}")]
    Api { code: i64, description: String },
}

/// Minimal Telegram Bot API client.
pub struct Bot {
    client: reqwest::Client,
    endpoint: String,
}

impl Bot {
    /// `timeout` bounds every call except `getUpdates`, which waits for its
    /// own long-polling timeout instead.
    pub fn new(api_url: &str, token: &str, timeout: Duration) -> Result<Self, Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/bot{token}", api_url.trim_end_matches('/')),
        })
    }
    async fn call<P, T>(&self, method: &str, payload: &P) -> Result<T, Error>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.call_with_timeout(method, payload, None).await
    }
    async fn call_with_timeout<P, T>(
        &self,
        method: &str,
        payload: &P,
        timeout: Option<Duration>,
    ) -> Result<T, Error>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self
            .client
            .post(format!("{}/{method}", self.endpoint))
            .json(payload);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request.send().await?.json::<Response<T>>().await?;
        match response {
            Response {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            Response {
                error_code,
                description,
                ..
            } => Err(Error::Api {
                code: error_code.unwrap_or_default(),
                description: description.unwrap_or_else(|| format!("{method} returned no result")),
            }),
        }
    }
    /// Long-polls for updates newer than `offset`.
    pub async fn get_updates(&self, offset: Option<i64>, timeout: u64) -> Result<Vec<Update>, Error> {
        let payload = GetUpdates {
            offset,
            timeout,
            allowed_updates: vec!["message", "callback_query"],
        };
        self.call_with_timeout(
            "getUpdates",
            &payload,
            Some(Duration::from_secs(timeout + 10)),
        )
        .await
    }
    pub async fn send_message(&self, request: &SendMessage) -> Result<TgMessage, Error> {
        self.call("sendMessage", request).await
    }
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Result<(), Error> {
        let payload = EditMessageText {
            chat_id,
            message_id,
            text: text.to_string(),
            reply_markup,
        };
        // the result is either the edited message or `true`
        self.call::<_, serde_json::Value>("editMessageText", &payload)
            .await
            .map(|_| ())
    }
    pub async fn answer_callback_query(&self, id: &str, text: Option<&str>) -> Result<(), Error> {
        let payload = AnswerCallbackQuery {
            callback_query_id: id.to_string(),
            text: text.map(String::from),
        };
        self.call::<_, bool>("answerCallbackQuery", &payload)
            .await
            .map(|_| ())
    }
    pub async fn delete_message(&self, chat_id: i64, message_id: i64) -> Result<(), Error> {
        self.call::<_, bool>("deleteMessage", &DeleteMessage { chat_id, message_id })
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl MessageSink for Bot {
    async fn send(&self, chat: ChatId, message: &Message) -> Result<(), SendError> {
        let mut request = SendMessage::new(chat.0, message.text.clone());
        if message.markdown {
            request = request.markdown();
        }
        if !message.link_preview {
            request = request.without_preview();
        }
        self.send_message(&request)
            .await
            .map(|_| ())
            .map_err(|e| SendError(e.to_string()))
    }
}
