use super::error::Error;
use super::types::{ChatId, Profile, Snapshot, SubscriptionKey};
use super::url::{self, ProfileUrl};
use super::watch::{WatchHandle, Watcher};
use indexmap::IndexMap;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    Added(Profile),
    Existing(Profile),
}

impl Selection {
    pub fn profile(&self) -> &Profile {
        match self {
            Self::Added(profile) | Self::Existing(profile) => profile,
        }
    }
}

/// Registry of tracked profiles and owner of the single running watch loop.
///
/// Every call that changes the active profile stops the current loop and
/// waits for it before the next one starts, so at most one loop ever runs.
pub struct Manager {
    watcher: Watcher,
    profiles: IndexMap<String, Profile>,
    handle: Option<WatchHandle>,
    last_seen: HashMap<SubscriptionKey, Snapshot>,
}

impl Manager {
    pub fn new(watcher: Watcher) -> Self {
        Self {
            watcher,
            profiles: IndexMap::new(),
            handle: None,
            last_seen: HashMap::new(),
        }
    }
    pub async fn add_or_select(&mut self, chat: ChatId, input: &str) -> Result<Selection, Error> {
        let ProfileUrl { username, url } = url::parse(input)?;
        let existing = self.profiles.contains_key(&username);
        if !existing {
            log::info!("tracking new profile {username}");
            self.profiles.insert(
                username.clone(),
                Profile {
                    username: username.clone(),
                    url,
                    active: false,
                },
            );
        }
        let profile = self.activate(chat, &username).await?;
        Ok(if existing {
            Selection::Existing(profile)
        } else {
            Selection::Added(profile)
        })
    }
    pub async fn select(&mut self, chat: ChatId, username: &str) -> Result<Profile, Error> {
        if !self.profiles.contains_key(username) {
            return Err(Error::NotFound(username.to_string()));
        }
        self.activate(chat, username).await
    }
    pub fn list(&self) -> impl Iterator<Item = &Profile> {
        self.profiles.values()
    }
    pub fn get(&self, username: &str) -> Option<&Profile> {
        self.profiles.get(username)
    }
    pub fn active(&self) -> Option<&Profile> {
        self.profiles.values().find(|profile| profile.active)
    }
    pub fn handle(&self) -> Option<&WatchHandle> {
        self.handle.as_ref()
    }
    pub fn last_seen(&self, key: &SubscriptionKey) -> Option<&Snapshot> {
        self.last_seen.get(key)
    }
    /// Stops the running loop, if any.
    pub async fn shutdown(&mut self) {
        self.stop().await;
    }
    async fn activate(&mut self, chat: ChatId, username: &str) -> Result<Profile, Error> {
        let profile = self
            .profiles
            .get(username)
            .cloned()
            .ok_or_else(|| Error::NotFound(username.to_string()))?;
        self.stop().await;
        for p in self.profiles.values_mut() {
            p.active = p.username == username;
        }
        let profile = Profile {
            active: true,
            ..profile
        };
        let last = self.last_seen.remove(&(chat, username.to_string()));
        log::debug!("activate {username} for {chat}");
        self.handle = Some(self.watcher.watch(chat, &profile, last));
        Ok(profile)
    }
    async fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            let key = handle.key().clone();
            if let Some(last) = handle.cancel().await {
                self.last_seen.insert(key, last);
            }
        }
    }
}
