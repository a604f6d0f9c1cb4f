use thiserror::Error;

/// Failure reported across the backend command boundary.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("command `{command}` failed: {message}")]
    Command { command: String, message: String },
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

impl BackendError {
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        BackendError::Command {
            command: command.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        ClientError::Validation(message.into())
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
