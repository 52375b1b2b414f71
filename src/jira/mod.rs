pub mod client;
pub mod error;
pub mod types;

pub use client::JiraClient;
pub use error::JiraError;
pub use types::{CurrentUser, Issue, TransitionRef};
