//! Telegram bot that watches one Reddit profile at a time and sends a message
//! whenever the profile's latest posts change.
//!
//! [`backend`] holds the polling core: profile registry, watch loop, change
//! detection and notification with retry. [`app`] drives it from Telegram
//! updates through the menus in [`menu`].

pub mod app;
pub mod backend;
pub mod config;
pub mod event;
pub mod menu;
pub mod telegram;
pub mod types;
pub mod utils;
