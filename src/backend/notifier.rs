use super::config::NotifierConfig;
use super::error::{DeliveryFailed, SendError};
use super::types::{ChatId, Snapshot};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub markdown: bool,
    pub link_preview: bool,
}

impl Message {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: false,
            link_preview: false,
        }
    }
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            markdown: true,
            link_preview: false,
        }
    }
}

/// Transport used to hand a message to a chat.
#[async_trait]
pub trait MessageSink: Send + Sync {
    async fn send(&self, chat: ChatId, message: &Message) -> Result<(), SendError>;
}

pub struct Notifier {
    sink: Arc<dyn MessageSink>,
    retries: u32,
    delay: Duration,
}

impl Notifier {
    pub fn new(sink: Arc<dyn MessageSink>, config: &NotifierConfig) -> Self {
        Self {
            sink,
            retries: config.retries.max(1),
            delay: Duration::from_secs(config.delay),
        }
    }
    pub fn retries(&self) -> u32 {
        self.retries
    }
    /// Sends `message`, retrying with a fixed delay until the retry budget is
    /// spent. Exhaustion is logged here; callers decide whether to care.
    pub async fn deliver(&self, chat: ChatId, message: &Message) -> Result<(), DeliveryFailed> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.sink.send(chat, message).await {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.retries => {
                    log::warn!(
                        "failed to send message to {chat}, retrying in {:?} ({attempt}/{}): {e}",
                        self.delay,
                        self.retries
                    );
                    time::sleep(self.delay).await;
                }
                Err(e) => {
                    log::error!("failed to send message to {chat} after {attempt} attempts: {e}");
                    return Err(DeliveryFailed {
                        attempts: attempt,
                        source: e,
                    });
                }
            }
        }
    }
    /// Single attempt, for messages that are not worth retrying.
    pub async fn send_once(&self, chat: ChatId, message: &Message) -> Result<(), SendError> {
        self.sink.send(chat, message).await
    }
}

/// One context line followed by a `[title](url)` line per post.
pub fn format_message(username: &str, snapshot: &Snapshot) -> String {
    let mut lines = vec![format!("Latest Post of {username}:")];
    lines.extend(
        snapshot
            .posts()
            .iter()
            .map(|post| format!("[{}]({})", post.title, post.url)),
    );
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::types::Post;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct FlakySink {
        failures: u32,
        calls: AtomicU32,
    }

    impl FlakySink {
        fn new(failures: u32) -> Arc<Self> {
            Arc::new(Self {
                failures,
                calls: AtomicU32::new(0),
            })
        }
        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MessageSink for FlakySink {
        async fn send(&self, _: ChatId, _: &Message) -> Result<(), SendError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.failures {
                Err(SendError(format!("attempt {call} refused")))
            } else {
                Ok(())
            }
        }
    }

    fn notifier(sink: Arc<FlakySink>, retries: u32) -> Notifier {
        Notifier::new(sink, &NotifierConfig { retries, delay: 2 })
    }

    #[tokio::test(start_paused = true)]
    async fn deliver_first_attempt() {
        let sink = FlakySink::new(0);
        let result = notifier(sink.clone(), 3)
            .deliver(ChatId(1), &Message::plain("hi"))
            .await;
        assert!(result.is_ok());
        assert_eq!(sink.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn deliver_after_failures() {
        for n in 1..=3 {
            let sink = FlakySink::new(n - 1);
            let start = time::Instant::now();
            let result = notifier(sink.clone(), 3)
                .deliver(ChatId(1), &Message::plain("hi"))
                .await;
            assert!(result.is_ok(), "succeeds on attempt {n}");
            assert_eq!(sink.calls(), n);
            // linear: one fixed delay per failed attempt
            let waited = start.elapsed();
            let expected = Duration::from_secs(2 * u64::from(n - 1));
            assert!(waited >= expected && waited < expected + Duration::from_secs(1));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn deliver_exhausts_budget() {
        let sink = FlakySink::new(u32::MAX);
        let err = notifier(sink.clone(), 3)
            .deliver(ChatId(1), &Message::plain("hi"))
            .await
            .expect_err("always failing sink");
        assert_eq!(err.attempts, 3);
        assert_eq!(sink.calls(), 3);
        assert_eq!(err.source.0, "attempt 3 refused");
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_still_attempts_once() {
        let sink = FlakySink::new(u32::MAX);
        let notifier = notifier(sink.clone(), 0);
        assert_eq!(notifier.retries(), 1);
        assert!(notifier
            .deliver(ChatId(1), &Message::plain("hi"))
            .await
            .is_err());
        assert_eq!(sink.calls(), 1);
    }

    #[test]
    fn format() {
        let snapshot = Snapshot::new(vec![
            Post::new("Hello", "https://www.reddit.com/r/a/1/"),
            Post::new("World", "https://www.reddit.com/r/b/2/"),
        ]);
        assert_eq!(
            format_message("alice", &snapshot),
            "Latest Post of alice:\n[Hello](https://www.reddit.com/r/a/1/)\n[World](https://www.reddit.com/r/b/2/)"
        );
        assert_eq!(
            format_message("alice", &Snapshot::default()),
            "Latest Post of alice:"
        );
    }
}
