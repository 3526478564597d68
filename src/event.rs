use crate::backend::types::ChatId;
use crate::telegram::types::Update;
use crate::telegram::Bot;
use crate::types::Event;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time;

const RETRY_DELAY: Duration = Duration::from_secs(5);

/// Long-polls the bot for updates and forwards them as [`Event`]s.
pub struct EventHandler {
    task: JoinHandle<()>,
    rx: UnboundedReceiver<Event>,
}

impl EventHandler {
    pub fn new(bot: Arc<Bot>, poll_timeout: u64) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(async move {
            let mut offset = None;
            loop {
                match bot.get_updates(offset, poll_timeout).await {
                    Ok(updates) => {
                        for update in updates {
                            offset = Some(update.update_id + 1);
                            if !Self::handle_update(update, &tx) {
                                return log::debug!("event receiver dropped");
                            }
                        }
                    }
                    Err(e) => {
                        log::warn!("failed to get updates: {e}");
                        time::sleep(RETRY_DELAY).await;
                    }
                }
            }
        });
        Self { task, rx }
    }
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
    /// Returns `false` once nobody listens anymore.
    fn handle_update(update: Update, tx: &UnboundedSender<Event>) -> bool {
        match into_event(update) {
            Some(event) => tx.send(event).is_ok(),
            None => true,
        }
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        self.task.abort();
    }
}

fn into_event(update: Update) -> Option<Event> {
    if let Some(query) = update.callback_query {
        return Some(Event::Callback {
            id: query.id,
            message: query
                .message
                .map(|message| (ChatId(message.chat.id), message.message_id)),
            data: query.data.unwrap_or_default(),
        });
    }
    let message = update.message?;
    let chat = ChatId(message.chat.id);
    let text = message.text?;
    match text.strip_prefix('/') {
        Some(command) => {
            // "/start@SomeBot arg" -> "start"
            let name = command
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .split('@')
                .next()
                .unwrap_or_default();
            Some(Event::Command {
                chat,
                name: name.to_string(),
            })
        }
        None => Some(Event::Text { chat, text }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telegram::types::{CallbackQuery, Chat, Message};

    fn message(text: Option<&str>) -> Message {
        Message {
            message_id: 5,
            chat: Chat { id: 42 },
            text: text.map(String::from),
        }
    }

    fn update(message: Option<Message>, callback_query: Option<CallbackQuery>) -> Update {
        Update {
            update_id: 1,
            message,
            callback_query,
        }
    }

    #[test]
    fn command_event() {
        assert_eq!(
            into_event(update(Some(message(Some("/start@postwatch_bot now"))), None)),
            Some(Event::Command {
                chat: ChatId(42),
                name: String::from("start"),
            })
        );
    }

    #[test]
    fn text_event() {
        assert_eq!(
            into_event(update(
                Some(message(Some("https://www.reddit.com/user/alice/"))),
                None
            )),
            Some(Event::Text {
                chat: ChatId(42),
                text: String::from("https://www.reddit.com/user/alice/"),
            })
        );
        assert_eq!(into_event(update(Some(message(None)), None)), None);
    }

    #[test]
    fn callback_event() {
        let query = CallbackQuery {
            id: String::from("q1"),
            message: Some(message(None)),
            data: Some(String::from("select_reddit")),
        };
        assert_eq!(
            into_event(update(None, Some(query))),
            Some(Event::Callback {
                id: String::from("q1"),
                message: Some((ChatId(42), 5)),
                data: String::from("select_reddit"),
            })
        );
    }

    #[test]
    fn callback_event_without_message() {
        let query = CallbackQuery {
            id: String::from("q2"),
            message: None,
            data: Some(String::from("add_user")),
        };
        assert_eq!(
            into_event(update(None, Some(query))),
            Some(Event::Callback {
                id: String::from("q2"),
                message: None,
                data: String::from("add_user"),
            })
        );
    }
}
