use crate::backend::types::ChatId;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Menu actions, carried as callback data on inline keyboard buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SelectPlatform,
    SelectReddit,
    AddUser,
    ToggleUser(String),
}

const TOGGLE_USER_PREFIX: &str = "toggle_user_";

impl Display for Action {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::SelectPlatform => write!(f, "select_platform"),
            Self::SelectReddit => write!(f, "select_reddit"),
            Self::AddUser => write!(f, "add_user"),
            Self::ToggleUser(username) => write!(f, "{TOGGLE_USER_PREFIX}{username}"),
        }
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "select_platform" => Ok(Self::SelectPlatform),
            "select_reddit" => Ok(Self::SelectReddit),
            "add_user" => Ok(Self::AddUser),
            _ => match s.strip_prefix(TOGGLE_USER_PREFIX) {
                Some(username) if !username.is_empty() => {
                    Ok(Self::ToggleUser(username.to_string()))
                }
                _ => Err(format!("unknown action: {s}")),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Command {
        chat: ChatId,
        name: String,
    },
    Text {
        chat: ChatId,
        text: String,
    },
    /// `message` is the chat and id of the message carrying the button; Telegram
    /// omits it for messages too old to be delivered.
    Callback {
        id: String,
        message: Option<(ChatId, i64)>,
        data: String,
    },
}
