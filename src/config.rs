use crate::backend::config::{Config as WatcherConfig, NotifierConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Config {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub notifier: NotifierConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TelegramConfig {
    pub token: Option<String>,
    pub api_url: String,
    /// Long-polling timeout for `getUpdates`, in seconds.
    pub poll_timeout: u64,
    /// Seconds before any other Bot API call is abandoned.
    pub request_timeout: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: String::from("https://api.telegram.org"),
            poll_timeout: 30,
            request_timeout: 20,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty() {
        let config = toml::from_str::<Config>("").expect("failed to deserialize config");
        assert_eq!(config, Config::default());
        assert_eq!(config.watcher.interval, 3);
        assert_eq!(config.watcher.max_posts, 1);
        assert_eq!(config.notifier.retries, 3);
        assert_eq!(config.notifier.delay, 2);
        assert_eq!(config.telegram.request_timeout, 20);
    }

    #[test]
    fn deserialize() {
        let input = r#"
[telegram]
token = "123:abc"

[watcher]
interval = 60
max_posts = 5
status_message = ""

[notifier]
retries = 5
"#;
        let config = toml::from_str::<Config>(input).expect("failed to deserialize config");
        assert_eq!(
            config,
            Config {
                telegram: TelegramConfig {
                    token: Some(String::from("123:abc")),
                    ..TelegramConfig::default()
                },
                watcher: WatcherConfig {
                    interval: 60,
                    max_posts: 5,
                    status_message: String::new(),
                    ..WatcherConfig::default()
                },
                notifier: NotifierConfig { retries: 5, delay: 2 },
            }
        );
    }

    #[test]
    fn serialize() {
        let mut config = Config::default();
        config.telegram.token = Some(String::from("t"));
        config.watcher.base_url = String::from("https://old.reddit.com");
        let s = toml::to_string(&config).expect("failed to serialize config");
        let deserialized = toml::from_str::<Config>(&s).expect("failed to deserialize config");
        assert_eq!(deserialized, config);
    }
}
