use thiserror::Error;

use crate::jira::JiraError;

#[derive(Debug, Error)]
pub enum PontoError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Jira API error: {0}")]
    Jira(#[from] JiraError),
}

impl PontoError {
    /// Exit code for the process: configuration, auth and transport failures
    /// are all reported as 1. Graceful no-ops never reach this path.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
