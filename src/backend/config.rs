use serde::{Deserialize, Serialize};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Seconds between two polls of the active profile.
    pub interval: u64,
    /// Posts kept from each fetch, newest first.
    pub max_posts: usize,
    pub base_url: String,
    pub user_agent: String,
    /// Seconds before a profile fetch is abandoned.
    pub request_timeout: u64,
    /// Sent after every notification; empty disables it.
    pub status_message: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: 3,
            max_posts: 1,
            base_url: String::from("https://www.reddit.com"),
            user_agent: String::from(USER_AGENT),
            request_timeout: 20,
            status_message: String::from("Checking for new posts..."),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotifierConfig {
    /// Delivery attempts per message, at least one.
    pub retries: u32,
    /// Seconds between two delivery attempts.
    pub delay: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            retries: 3,
            delay: 2,
        }
    }
}
