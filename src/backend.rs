pub mod config;
pub mod detector;
mod error;
pub mod fetcher;
mod manager;
pub mod notifier;
pub mod types;
pub mod url;
mod watch;

pub use error::{DeliveryFailed, Error, FetchError, SendError};
pub use manager::{Manager, Selection};
pub use watch::{WatchHandle, WatchState, Watcher};
