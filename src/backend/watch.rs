use super::config::Config;
use super::detector::detect;
use super::error::FetchError;
use super::fetcher::Fetch;
use super::notifier::{format_message, Message, Notifier};
use super::types::{ChatId, Post, Profile, Snapshot, SubscriptionKey};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    Idle,
    Running,
    Cancelled,
}

/// Spawns watch loops that share one fetcher, one notifier and one config.
pub struct Watcher {
    fetcher: Arc<dyn Fetch>,
    notifier: Arc<Notifier>,
    config: Config,
}

impl Watcher {
    pub fn new(fetcher: Arc<dyn Fetch>, notifier: Arc<Notifier>, config: Config) -> Self {
        Self {
            fetcher,
            notifier,
            config,
        }
    }
    pub fn config(&self) -> &Config {
        &self.config
    }
    /// Starts polling `profile` for `chat`. `last` is the snapshot previously
    /// seen for this chat and profile, if any.
    pub fn watch(&self, chat: ChatId, profile: &Profile, last: Option<Snapshot>) -> WatchHandle {
        let (quit_tx, quit_rx) = broadcast::channel(1);
        let (state_tx, state_rx) = watch::channel(WatchState::Idle);
        let status_message = Some(self.config.status_message.as_str())
            .filter(|s| !s.is_empty())
            .map(Message::plain);
        let watch_loop = WatchLoop {
            chat,
            username: profile.username.clone(),
            listing_url: profile.listing_url(),
            fetcher: self.fetcher.clone(),
            notifier: self.notifier.clone(),
            period: Duration::from_secs(self.config.interval.max(1)),
            status_message,
            last,
            state: state_tx,
        };
        WatchHandle {
            key: (chat, profile.username.clone()),
            quit: quit_tx,
            state: state_rx,
            task: tokio::spawn(watch_loop.run(quit_rx)),
        }
    }
}

/// A running watch loop. Dropping the handle also stops the loop, but only
/// [`WatchHandle::cancel`] waits for it and recovers its last snapshot.
pub struct WatchHandle {
    key: SubscriptionKey,
    quit: broadcast::Sender<()>,
    state: watch::Receiver<WatchState>,
    task: JoinHandle<Option<Snapshot>>,
}

impl WatchHandle {
    pub fn key(&self) -> &SubscriptionKey {
        &self.key
    }
    pub fn state(&self) -> WatchState {
        *self.state.borrow()
    }
    pub fn subscribe(&self) -> watch::Receiver<WatchState> {
        self.state.clone()
    }
    /// Requests the loop to stop and waits until it has. A pending fetch,
    /// delivery or sleep is abandoned.
    pub async fn cancel(self) -> Option<Snapshot> {
        if self.quit.send(()).is_err() {
            log::debug!("watch loop for {} already gone", self.key.1);
        }
        match self.task.await {
            Ok(last) => last,
            Err(e) => {
                log::error!("watch loop for {} failed: {e}", self.key.1);
                None
            }
        }
    }
}

struct WatchLoop {
    chat: ChatId,
    username: String,
    listing_url: String,
    fetcher: Arc<dyn Fetch>,
    notifier: Arc<Notifier>,
    period: Duration,
    status_message: Option<Message>,
    last: Option<Snapshot>,
    state: watch::Sender<WatchState>,
}

impl WatchLoop {
    async fn run(mut self, mut quit: broadcast::Receiver<()>) -> Option<Snapshot> {
        self.state.send_replace(WatchState::Running);
        log::debug!("start watching {} for {}", self.listing_url, self.chat);
        loop {
            let result = tokio::select! {
                biased;
                _ = quit.recv() => break,
                result = self.fetcher.fetch(&self.listing_url) => result,
            };
            if let Some(message) = self.observe(result) {
                tokio::select! {
                    biased;
                    _ = quit.recv() => break,
                    _ = self.notify(&message) => {}
                }
            }
            tokio::select! {
                biased;
                _ = quit.recv() => break,
                _ = time::sleep(self.period) => {}
            }
        }
        self.state.send_replace(WatchState::Cancelled);
        log::debug!("stop watching {} for {}", self.listing_url, self.chat);
        self.last
    }
    /// Records a changed snapshot as last seen and returns the notification
    /// for it. The snapshot counts as seen whether or not the delivery goes
    /// through.
    fn observe(&mut self, result: Result<Vec<Post>, FetchError>) -> Option<Message> {
        let snapshot = match result {
            Ok(posts) => Snapshot::new(posts),
            Err(e) => {
                log::warn!("failed to fetch {}: {e}", self.listing_url);
                return None;
            }
        };
        if !detect(&snapshot, self.last.as_ref()).is_changed() {
            return None;
        }
        let message = Message::markdown(format_message(&self.username, &snapshot));
        self.last = Some(snapshot);
        Some(message)
    }
    async fn notify(&self, message: &Message) {
        if let Err(e) = self.notifier.deliver(self.chat, message).await {
            log::error!("notification for {} not delivered: {e}", self.username);
        }
        if let Some(status) = &self.status_message {
            if let Err(e) = self.notifier.send_once(self.chat, status).await {
                log::warn!("failed to send status message: {e}");
            }
        }
    }
}
