use crate::backend::types::Profile;
use crate::telegram::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use crate::types::Action;

pub const WELCOME: &str = "Welcome! Please select a platform to track:";
pub const SELECT_PLATFORM: &str = "Select platforms to track:";
pub const PROFILES: &str = "Reddit users in track:";
pub const ENTER_LINK: &str =
    "Enter the link of the reddit user profile in the format: https://www.reddit.com/user/UserName/";
pub const INVALID_URL: &str = "Invalid URL format. Please try again.";

fn button(text: impl Into<String>, action: Action) -> Vec<InlineKeyboardButton> {
    vec![InlineKeyboardButton::new(text, action.to_string())]
}

pub fn start_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![button("Select platforms to track", Action::SelectPlatform)],
    }
}

pub fn platform_menu() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup {
        inline_keyboard: vec![button("Reddit", Action::SelectReddit)],
    }
}

/// "Back", one row per tracked profile (the active one checked), "Add user".
pub fn profile_menu<'a>(profiles: impl IntoIterator<Item = &'a Profile>) -> InlineKeyboardMarkup {
    let mut rows = vec![button("Back", Action::SelectPlatform)];
    rows.extend(profiles.into_iter().map(|profile| {
        let label = if profile.active {
            format!("{} ✅", profile.username)
        } else {
            profile.username.clone()
        };
        button(label, Action::ToggleUser(profile.username.clone()))
    }));
    rows.push(button("Add user", Action::AddUser));
    InlineKeyboardMarkup {
        inline_keyboard: rows,
    }
}

pub fn added(username: &str) -> String {
    format!("Added {username}")
}

pub fn already_tracked(username: &str) -> String {
    format!("User {username} is already being tracked.")
}
