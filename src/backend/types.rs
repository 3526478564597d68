use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Identifier of the chat a notification is delivered to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

impl Display for ChatId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub url: String,
}

impl Post {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
        }
    }
}

/// The posts observed for a profile by one successful fetch, in page order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snapshot(Vec<Post>);

impl Snapshot {
    pub fn new(posts: Vec<Post>) -> Self {
        Self(posts)
    }
    pub fn posts(&self) -> &[Post] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Post>> for Snapshot {
    fn from(posts: Vec<Post>) -> Self {
        Self(posts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub username: String,
    /// Normalized profile URL, always ending with a single `/`.
    pub url: String,
    pub active: bool,
}

impl Profile {
    pub fn listing_url(&self) -> String {
        super::url::listing_url(&self.url)
    }
}

/// Key of the last-seen snapshot map.
pub type SubscriptionKey = (ChatId, String);
