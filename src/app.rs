use crate::backend::fetcher::RedditFetcher;
use crate::backend::notifier::Notifier;
use crate::backend::types::ChatId;
use crate::backend::{Error as BackendError, Manager, Selection, Watcher};
use crate::config::Config;
use crate::event::EventHandler;
use crate::menu;
use crate::telegram::types::SendMessage;
use crate::telegram::Bot;
use crate::types::{Action, Event};
use color_eyre::{eyre, Result};
use std::sync::Arc;
use std::time::Duration;

pub struct App {
    config: Config,
    bot: Arc<Bot>,
    manager: Manager,
    /// Last profile menu sent as a fresh message, replaced on toggle.
    menu_message: Option<(ChatId, i64)>,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        log::debug!("App::new(watcher: {:?})", config.watcher);
        let token = config
            .telegram
            .token
            .as_deref()
            .ok_or_else(|| eyre::eyre!("telegram bot token is not configured"))?;
        let bot = Arc::new(Bot::new(
            &config.telegram.api_url,
            token,
            Duration::from_secs(config.telegram.request_timeout),
        )?);
        let notifier = Notifier::new(bot.clone(), &config.notifier);
        let watcher = Watcher::new(
            Arc::new(RedditFetcher::new(&config.watcher)?),
            Arc::new(notifier),
            config.watcher.clone(),
        );
        Ok(Self {
            config,
            bot,
            manager: Manager::new(watcher),
            menu_message: None,
        })
    }
    pub async fn run(&mut self) -> Result<()> {
        let mut events = EventHandler::new(self.bot.clone(), self.config.telegram.poll_timeout);
        loop {
            tokio::select! {
                event = events.next() => {
                    let Some(event) = event else {
                        break log::warn!("event channel closed");
                    };
                    log::info!("Event {event:?}");
                    if let Err(e) = self.handle_event(event).await {
                        log::error!("failed to handle event: {e}");
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    break log::info!("interrupted");
                }
            }
        }
        self.manager.shutdown().await;
        Ok(())
    }
    async fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Command { chat, name } => match name.as_str() {
                "start" => self.start(chat).await,
                _ => {
                    log::debug!("ignore command /{name}");
                    Ok(())
                }
            },
            Event::Text { chat, text } => self.handle_profile_link(chat, &text).await,
            Event::Callback { id, message, data } => {
                let action = data.parse::<Action>();
                // every query is answered, even the ones we cannot handle
                let notice = match &action {
                    Ok(Action::ToggleUser(username)) if self.manager.get(username).is_none() => {
                        Some(format!("User {username} is not tracked."))
                    }
                    Ok(_) => None,
                    Err(e) => Some(e.clone()),
                };
                self.bot.answer_callback_query(&id, notice.as_deref()).await?;
                match (action, message) {
                    (Ok(action), Some((chat, message_id))) if notice.is_none() => {
                        self.handle_action(chat, message_id, action).await
                    }
                    (Ok(_), None) => {
                        log::debug!("callback {id} has no message to act on");
                        Ok(())
                    }
                    (Ok(_), Some(_)) => Ok(()),
                    (Err(e), _) => Err(eyre::eyre!(e)),
                }
            }
        }
    }
    async fn handle_action(&mut self, chat: ChatId, message_id: i64, action: Action) -> Result<()> {
        match action {
            Action::SelectPlatform => {
                self.bot
                    .edit_message_text(
                        chat.0,
                        message_id,
                        menu::SELECT_PLATFORM,
                        Some(menu::platform_menu()),
                    )
                    .await?;
            }
            Action::SelectReddit => {
                self.bot
                    .edit_message_text(
                        chat.0,
                        message_id,
                        menu::PROFILES,
                        Some(menu::profile_menu(self.manager.list())),
                    )
                    .await?;
            }
            Action::AddUser => {
                self.bot
                    .send_message(&SendMessage::new(chat.0, menu::ENTER_LINK).without_preview())
                    .await?;
            }
            Action::ToggleUser(username) => {
                let profile = self.manager.select(chat, &username).await?;
                log::info!("now watching {}", profile.username);
                if let Some((menu_chat, menu_id)) = self.menu_message.take() {
                    if let Err(e) = self.bot.delete_message(menu_chat.0, menu_id).await {
                        log::warn!("failed to delete message: {e}");
                    }
                }
                self.send_profile_menu(chat, menu::PROFILES).await?;
            }
        }
        Ok(())
    }
    async fn start(&mut self, chat: ChatId) -> Result<()> {
        let message = self
            .bot
            .send_message(&SendMessage::new(chat.0, menu::WELCOME).reply_markup(menu::start_menu()))
            .await?;
        self.menu_message = Some((chat, message.message_id));
        Ok(())
    }
    async fn handle_profile_link(&mut self, chat: ChatId, text: &str) -> Result<()> {
        match self.manager.add_or_select(chat, text).await {
            Ok(Selection::Added(profile)) => {
                self.send_profile_menu(chat, &menu::added(&profile.username))
                    .await
            }
            Ok(Selection::Existing(profile)) => {
                self.bot
                    .send_message(&SendMessage::new(
                        chat.0,
                        menu::already_tracked(&profile.username),
                    ))
                    .await?;
                self.send_profile_menu(chat, menu::PROFILES).await
            }
            Err(BackendError::InvalidFormat(input)) => {
                log::debug!("rejected profile link {input:?}");
                self.bot
                    .send_message(&SendMessage::new(chat.0, menu::INVALID_URL))
                    .await?;
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
    async fn send_profile_menu(&mut self, chat: ChatId, text: &str) -> Result<()> {
        let request =
            SendMessage::new(chat.0, text).reply_markup(menu::profile_menu(self.manager.list()));
        let message = self.bot.send_message(&request).await?;
        self.menu_message = Some((chat, message.message_id));
        Ok(())
    }
}
